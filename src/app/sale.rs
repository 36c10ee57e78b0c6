use crate::core::{Economy, Player, SaleReceipt, SharedLedger};
use crate::utils::error::{Result, ShopError};

/// Sells the whole stack in the player's main hand.
///
/// The stack stays in the hand until the deposit has succeeded. A rejected
/// quantity, a missing economy, a failed deposit or a future dropped during
/// the deposit all leave the hand untouched.
pub async fn sell_hand(
    player_name: &str,
    player: &dyn Player,
    ledger: &SharedLedger,
    economy: Option<&dyn Economy>,
) -> Result<SaleReceipt> {
    let stack = match player.main_hand() {
        Some(stack) if stack.amount > 0 => stack,
        _ => return Err(ShopError::EmptyHand),
    };

    let quote = ledger.read(|ledger| ledger.quote(stack.item, stack.amount))?;
    let economy = economy.ok_or(ShopError::EconomyUnavailable)?;

    let balance = match economy.deposit(player_name, quote.total).await {
        Ok(balance) => balance,
        Err(e) => {
            tracing::warn!(player = player_name, "Deposit failed, stack kept: {}", e);
            return Err(e);
        }
    };
    player.set_main_hand(None);

    let receipt = SaleReceipt::from_quote(player_name, quote);
    tracing::info!(
        player = player_name,
        item = %receipt.item,
        quantity = receipt.quantity,
        total = receipt.total,
        balance,
        "💰 Sale completed"
    );
    Ok(receipt)
}
