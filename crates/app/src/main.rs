use std::process::ExitCode;
use std::sync::Arc;

use medassist::settings::SettingsStore;
use medassist::terminal;
use medassist_ask::{AskConfig, AskServiceClient};
use medassist_chat::SessionController;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so they never interleave with the transcript on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = SettingsStore::load();
    let settings = store.settings().clone();
    if !settings.ask.clone().install() {
        tracing::warn!("ask config was resolved before settings loaded");
    }
    let config = AskConfig::global();

    let client = match AskServiceClient::new(config) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!("failed to initialize ask client: {error}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        endpoint = %client.endpoint(),
        user_id = config.user_id,
        settings_path = ?store.config_path(),
        "ask service configured"
    );

    let controller = match SessionController::new(Arc::new(client), config.user_id) {
        Ok(controller) => controller.with_greeting(settings.greeting),
        Err(error) => {
            tracing::error!("failed to start session: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = terminal::run(controller).await {
        tracing::error!("terminal session failed: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
