use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    config::{Config, DataPaths},
    data::{http::HttpFetcher, settings::SettingStore, sticky::StickyRepository},
    error::AppError,
    model::{emoji::EmojiRef, role::RoleRef},
    service::sticky::StickyService,
    state::AppState,
};

/// GitHub's API rejects requests without a user agent.
const USER_AGENT: &str = concat!("GlyfiBot/", env!("CARGO_PKG_VERSION"));

/// Creates every data directory.
pub async fn create_data_dirs(paths: &DataPaths) -> Result<(), AppError> {
    for dir in paths.all() {
        tokio::fs::create_dir_all(dir).await?;
    }

    Ok(())
}

/// HTTP client for downloads and the GitHub API.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    Ok(client)
}

/// Prepares the data directory and loads all persisted state.
///
/// # Arguments
/// - `config` - Application configuration
///
/// # Returns
/// - `Ok(AppState)` - State with settings and sticky registrations loaded
/// - `Err(AppError)` - A directory could not be created or a file could not be read
pub async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let paths = DataPaths::new(&config.data_dir);
    create_data_dirs(&paths).await?;

    let emoji: SettingStore<EmojiRef> = SettingStore::load(paths.settings.join("emoji.json")).await?;
    match emoji.get().await {
        Some(emoji) => tracing::info!("Loaded emoji {}", emoji),
        None => tracing::info!("Emoji has not been set."),
    }

    let role: SettingStore<RoleRef> = SettingStore::load(paths.settings.join("role.json")).await?;
    match role.get().await {
        Some(role) => tracing::info!("Loaded role {} ({})", role.name, role.id),
        None => tracing::info!("Role has not been set."),
    }

    let sticky = StickyService::load(StickyRepository::new(&paths.sticky)).await?;

    Ok(AppState {
        paths,
        http: HttpFetcher::new(setup_reqwest_client()?),
        emoji,
        role,
        sticky: Arc::new(sticky),
        typst_gate: Arc::new(Mutex::new(())),
        status_rotation_cron: config.status_rotation_cron.clone(),
        status_started: Arc::new(AtomicBool::new(false)),
    })
}
