use std::sync::Arc;

use clap::Parser;
use mcshop::adapters::memory::{ConsoleSender, MemoryEconomy, MemoryPlayer};
use mcshop::app::commands::{COMMAND_NAME, USAGE};
use mcshop::config::OutputFormat;
use mcshop::core::{Economy, ItemCatalog};
use mcshop::utils::error::ErrorSeverity;
use mcshop::utils::logger;
use mcshop::utils::validation::parse_item_id;
use mcshop::{
    CliConfig, ItemStack, ShopCommand, ShopError, ShopPlugin, ShopSettings, StaticCatalog,
    TomlFileStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match ShopSettings::from_file_or_default(&config.settings) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load settings '{}': {}", config.settings, e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.log_json || settings.json_logs() {
        logger::init_json_logger(if config.verbose { "debug" } else { settings.log_level() });
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting mcshop console");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let data_file = config
        .store
        .clone()
        .unwrap_or_else(|| settings.data_file().to_string());
    tracing::info!("📁 Using data file: {}", data_file);

    let store = match TomlFileStore::open(&data_file) {
        Ok(store) => store,
        Err(e) => exit_with(&e),
    };

    let catalog: Arc<dyn ItemCatalog> = Arc::new(StaticCatalog::from_settings(&settings));
    let economy: Arc<dyn Economy> = Arc::new(MemoryEconomy::new());

    let plugin = match ShopPlugin::enable(settings, store, catalog, Some(economy)) {
        Ok(plugin) => plugin,
        Err(e) => exit_with(&e),
    };

    let args: Vec<&str> = config.args.iter().map(String::as_str).collect();
    let handled = if config.format != OutputFormat::Text && ShopCommand::is_listing(&args) {
        match plugin.export_catalog(config.format) {
            Ok(output) => println!("{}", output),
            Err(e) => exit_with(&e),
        }
        true
    } else if let Some(name) = &config.player {
        let mut player = MemoryPlayer::new(name.clone());
        for node in &config.permissions {
            player = player.with_permission(node.clone());
        }
        if let Some(hand) = &config.hand {
            match parse_hand(hand) {
                Ok(stack) => player = player.holding(stack),
                Err(e) => exit_with(&e),
            }
        }

        let handled = plugin.on_command(&player, COMMAND_NAME, &args).await;
        print_messages(&player.messages());
        handled
    } else {
        let console = ConsoleSender::new();
        let handled = plugin.on_command(&console, COMMAND_NAME, &args).await;
        print_messages(&console.messages());
        handled
    };

    if let Err(e) = plugin.disable() {
        exit_with(&e);
    }

    if !handled {
        eprintln!("Usage: {}", USAGE);
        std::process::exit(2);
    }

    Ok(())
}

fn print_messages(messages: &[String]) {
    for message in messages {
        println!("{}", message);
    }
}

/// `ID:AMOUNT`, e.g. `264:12`.
fn parse_hand(raw: &str) -> mcshop::Result<ItemStack> {
    let (item, amount) = raw
        .split_once(':')
        .ok_or_else(|| ShopError::invalid_value("hand", raw, "expected ID:AMOUNT"))?;
    let amount = amount
        .trim()
        .parse::<u32>()
        .map_err(|e| ShopError::invalid_value("hand", raw, e.to_string()))?;
    Ok(ItemStack::new(parse_item_id(item)?, amount))
}

fn exit_with(e: &ShopError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
