use std::sync::Arc;

use mcshop::adapters::memory::{ConsoleSender, MemoryEconomy, MemoryPlayer, MemoryStore};
use mcshop::config::OutputFormat;
use mcshop::core::{Economy, ItemCatalog, Player};
use mcshop::{ItemId, ItemStack, ShopPlugin, ShopSettings, StaticCatalog};

const SET_PRICE: &str = "mcshop.setprice";
const SET_MIN: &str = "mcshop.setminamount";

fn catalog() -> Arc<dyn ItemCatalog> {
    Arc::new(
        StaticCatalog::new()
            .with_item(ItemId::new(1), "STONE")
            .with_item(ItemId::new(264), "DIAMOND"),
    )
}

fn plugin_with(
    settings: ShopSettings,
    data: &str,
    economy: Option<Arc<MemoryEconomy>>,
) -> ShopPlugin<MemoryStore> {
    let store = MemoryStore::from_toml(data).unwrap();
    let economy = economy.map(|e| e as Arc<dyn Economy>);
    ShopPlugin::enable(settings, store, catalog(), economy).unwrap()
}

fn plugin(data: &str) -> (ShopPlugin<MemoryStore>, Arc<MemoryEconomy>) {
    let economy = Arc::new(MemoryEconomy::new());
    let plugin = plugin_with(ShopSettings::default(), data, Some(economy.clone()));
    (plugin, economy)
}

#[tokio::test]
async fn test_admin_sets_price_and_player_sells() {
    let (plugin, economy) = plugin("");
    let admin = MemoryPlayer::new("admin")
        .with_permission(SET_PRICE)
        .with_permission(SET_MIN);

    assert!(plugin.on_command(&admin, "mcshop", &["setprice", "264", "150"]).await);
    assert_eq!(
        admin.last_message().unwrap(),
        "Price for item 264 set to 150.00$."
    );
    assert!(plugin.on_command(&admin, "MCSHOP", &["setminamount", "264", "2"]).await);
    assert_eq!(
        admin.last_message().unwrap(),
        "Minimum amount for item 264 set to 2."
    );

    let steve = MemoryPlayer::new("steve").holding(ItemStack::new(ItemId::new(264), 3));
    assert!(plugin.on_command(&steve, "mcshop", &["sellhand"]).await);

    assert_eq!(steve.last_message().unwrap(), "Sold 3 of DIAMOND for 450.00$.");
    assert_eq!(economy.balance("steve"), 450.0);
    assert!(steve.main_hand().is_none());
}

#[tokio::test]
async fn test_set_price_without_permission_is_rejected() {
    let (plugin, _) = plugin("");
    let player = MemoryPlayer::new("steve");

    assert!(plugin.on_command(&player, "mcshop", &["setprice", "1", "99"]).await);
    assert_eq!(
        player.last_message().unwrap(),
        "You don't have permission to use this command."
    );
    assert_eq!(plugin.ledger().read(|l| l.price(ItemId::new(1))), 10.0);
}

#[tokio::test]
async fn test_invalid_values_are_reported() {
    let (plugin, _) = plugin("[prices]\n1 = 4.0\n");
    let console = ConsoleSender::new();

    plugin.on_command(&console, "mcshop", &["setprice", "1", "abc"]).await;
    plugin.on_command(&console, "mcshop", &["setprice", "stone", "5"]).await;
    plugin.on_command(&console, "mcshop", &["setminamount", "1", "-3"]).await;

    assert_eq!(
        console.messages(),
        vec![
            "Invalid price: abc".to_string(),
            "Invalid item id: stone".to_string(),
            "Invalid min amount: -3".to_string(),
        ]
    );
    plugin.ledger().read(|l| {
        assert_eq!(l.price(ItemId::new(1)), 4.0);
        assert_eq!(l.min_amount(ItemId::new(1)), 1);
    });
}

#[tokio::test]
async fn test_sell_below_minimum_keeps_items() {
    let (plugin, economy) = plugin("[min-amounts]\n1 = 64\n");
    let stack = ItemStack::new(ItemId::new(1), 10);
    let player = MemoryPlayer::new("alex").holding(stack);

    assert!(plugin.on_command(&player, "mcshop", &["sellhand"]).await);
    assert_eq!(
        player.last_message().unwrap(),
        "You need at least 64 of this item to sell it."
    );
    assert_eq!(player.main_hand(), Some(stack));
    assert_eq!(economy.balance("alex"), 0.0);
}

#[tokio::test]
async fn test_console_cannot_sell() {
    let (plugin, _) = plugin("");
    let console = ConsoleSender::new();

    assert!(plugin.on_command(&console, "mcshop", &["sellhand"]).await);
    assert_eq!(
        console.messages(),
        vec!["This command can only be executed by a player.".to_string()]
    );
}

#[tokio::test]
async fn test_sell_without_economy() {
    let plugin = plugin_with(ShopSettings::default(), "", None);
    let stack = ItemStack::new(ItemId::new(1), 1);
    let player = MemoryPlayer::new("alex").holding(stack);

    plugin.on_command(&player, "mcshop", &["sellhand"]).await;
    assert_eq!(player.last_message().unwrap(), "Economy plugin not found.");
    assert_eq!(player.main_hand(), Some(stack));
}

#[tokio::test]
async fn test_require_listed_item_policy() {
    let mut settings = ShopSettings::default();
    settings.shop.require_listed_item = true;
    let plugin = plugin_with(settings, "[prices]\n1 = 4.0\n", None);
    let console = ConsoleSender::new();

    plugin.on_command(&console, "mcshop", &["setprice", "2", "5"]).await;
    plugin.on_command(&console, "mcshop", &["setprice", "1", "5"]).await;

    let messages = console.messages();
    assert_eq!(messages[0], "This item is not available in the shop.");
    assert_eq!(messages[1], "Price for item 1 set to 5.00$.");
    plugin.ledger().read(|l| {
        assert!(!l.has_price_entry(ItemId::new(2)));
        assert_eq!(l.price(ItemId::new(1)), 5.0);
    });
}

#[tokio::test]
async fn test_usage_errors_return_false() {
    let (plugin, _) = plugin("");
    let console = ConsoleSender::new();

    assert!(!plugin.on_command(&console, "mcshop", &["setprice", "1"]).await);
    assert!(!plugin.on_command(&console, "mcshop", &["buy"]).await);
    assert!(!plugin.on_command(&console, "warp", &[]).await);
    assert!(console.messages().is_empty());
}

#[tokio::test]
async fn test_listing_and_price_lookup() {
    let (plugin, _) = plugin("[prices]\n264 = 150.0\n[min-amounts]\n4 = 32\n");
    let console = ConsoleSender::new();

    assert!(plugin.on_command(&console, "mcshop", &[]).await);
    assert_eq!(
        console.messages(),
        vec![
            "MCShop - page 1/1".to_string(),
            "STONE (ID: 1) - Price: 10.00$, Min. Amount: 1".to_string(),
            "ITEM_4 (ID: 4) - Price: 10.00$, Min. Amount: 32".to_string(),
            "DIAMOND (ID: 264) - Price: 150.00$, Min. Amount: 1".to_string(),
        ]
    );

    let player = MemoryPlayer::new("alex");
    plugin.on_command(&player, "mcshop", &["price", "264"]).await;
    assert_eq!(
        player.last_message().unwrap(),
        "DIAMOND (ID: 264) - Price: 150.00$, Min. Amount: 1"
    );

    plugin.on_command(&player, "mcshop", &["list", "2"]).await;
    assert_eq!(player.last_message().unwrap(), "Invalid page: 2");
}

#[tokio::test]
async fn test_tab_completion() {
    let (plugin, _) = plugin("[prices]\n27 = 1.0\n");

    assert_eq!(plugin.tab_complete(&["se"]), vec!["sellhand", "setminamount", "setprice"]);
    assert_eq!(plugin.tab_complete(&["setp"]), vec!["setprice"]);
    assert_eq!(plugin.tab_complete(&["setprice", "2"]), vec!["27", "264"]);
    assert!(plugin.tab_complete(&["sellhand", ""]).is_empty());
    assert_eq!(plugin.tab_complete(&[]).len(), 5);
}

#[tokio::test]
async fn test_disable_flushes_and_survives_failure() {
    let (plugin, _) = plugin("[prices]\nbad = 1.0\n");
    let console = ConsoleSender::new();
    plugin.on_command(&console, "mcshop", &["setprice", "7", "3.5"]).await;

    plugin.disable().unwrap();
    let store = plugin.into_store();
    assert_eq!(store.persist_count(), 1);

    let price = store
        .document()
        .get("prices")
        .and_then(|s| s.get("7"))
        .and_then(|v| v.as_float());
    assert_eq!(price, Some(3.5));
    // unparseable keys are dropped on the next save
    assert!(store
        .document()
        .get("prices")
        .and_then(|s| s.get("bad"))
        .is_none());

    let mut failing = MemoryStore::new();
    failing.fail_persist(true);
    let plugin = ShopPlugin::enable(ShopSettings::default(), failing, catalog(), None).unwrap();
    assert!(plugin.disable().is_err());
    assert_eq!(plugin.ledger().read(|l| l.prices().len()), 0);
}

#[tokio::test]
async fn test_export_formats() {
    let (plugin, _) = plugin("[prices]\n264 = 150.0\n");

    let csv = plugin.export_catalog(OutputFormat::Csv).unwrap();
    assert!(csv.starts_with("item,name,price,min_amount"));
    assert!(csv.contains("264,DIAMOND,150.0,1,true,false"));

    let json: serde_json::Value =
        serde_json::from_str(&plugin.export_catalog(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn test_invalid_settings_refuse_to_enable() {
    let mut settings = ShopSettings::default();
    settings.shop.default_min_amount = 0;
    let result = ShopPlugin::enable(settings, MemoryStore::new(), catalog(), None);
    assert!(result.is_err());
}
