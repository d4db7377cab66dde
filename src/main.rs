//! SCP Wiki - An in-memory catalogue of anomalous objects

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scp_wiki::{
    app::{App, AppContext},
    config::Config,
    console::{self, ConsoleInput, ConsolePrompt},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they do not interleave with the console
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scp_wiki=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting SCP Wiki...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // The prompt and the command loop read from the same stdin
    let input = ConsoleInput::stdin();
    let prompt = Arc::new(ConsolePrompt::new(input.clone()));

    let ctx = AppContext::from_config(&config, prompt).await;
    let mut app = App::new(ctx, config.notifications.dismiss_after());

    console::run(&mut app, input, tokio::io::stdout()).await?;

    Ok(())
}
