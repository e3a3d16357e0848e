use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use schooldesk::application::services::SessionStorage;
use schooldesk::infrastructure::{
    ApiClient, AppConfig, CliArgs, HttpAdminApi, HttpAuthApi, KeyringStore, MemoryStore,
    StorageManager,
};
use schooldesk::presentation::{App, AppOptions, AppPorts};

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

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_app() -> Result<App> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(
        version = schooldesk::VERSION,
        api = %config.api.root(),
        "Starting SchoolDesk"
    );

    let storage = SessionStorage::new(Arc::new(KeyringStore::new()), Arc::new(MemoryStore::new()));
    let client = ApiClient::new(&config.api, storage.clone())?;
    let admin = Arc::new(HttpAdminApi::new(client.clone()));

    let ports = AppPorts {
        auth: Arc::new(HttpAuthApi::new(client)),
        examinations: admin.clone(),
        classes: admin.clone(),
        students: admin.clone(),
        dashboard: admin,
    };

    let options = AppOptions {
        remember_me: config.remember_me,
        poll_interval: config.ui.poll_interval(),
        notification_duration: std::time::Duration::from_secs(config.ui.notification_duration),
    };

    Ok(App::new(ports, storage, options))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
