use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use zeroize::Zeroizing;

use luci::application::{AppController, PersistentStore};
use luci::domain::ports::StorePort;
use luci::infrastructure::{
    AppConfig, CliArgs, ConfigManager, FileStore, GeminiChatClient, KeyringStore, MemoryStore,
};
use luci::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn open_store(config: &AppConfig) -> Arc<dyn StorePort> {
    let Some(data_dir) = config.effective_data_dir() else {
        warn!("No data directory available, nothing will be saved");
        return Arc::new(MemoryStore::new());
    };

    info!(path = %data_dir.display(), keyring = config.use_keyring, "Opening store");
    let files = FileStore::new(data_dir);
    if config.use_keyring {
        Arc::new(KeyringStore::new(files))
    } else {
        Arc::new(files)
    }
}

fn create_app() -> Result<(App, Option<Zeroizing<String>>)> {
    let mut args = CliArgs::parse();
    let cli_key = args.api_key.take().map(Zeroizing::new);

    let manager = ConfigManager::new()
        .unwrap_or_else(|_| ConfigManager::with_dir(std::env::temp_dir().join(luci::NAME)));
    let mut config = manager.load_config(args.config.as_deref())?;
    config.merge_with_args(&args);

    init_logging(&config)?;

    info!(version = luci::VERSION, model = %config.engine.model, "Starting Luci");

    let store = PersistentStore::new(open_store(&config));
    let controller = AppController::initialize(store);
    let engine = Arc::new(GeminiChatClient::new(&config.engine)?);

    let app = App::new(controller, engine, &config);

    Ok((app, cli_key))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (app, cli_key) = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal, cli_key).await;

    ratatui::restore();

    result
}
