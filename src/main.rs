use greenland::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("greenland=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(ai_enabled = config.ai.is_enabled(), "starting AI-GreenLand");
    greenland::run_gui(config)
}
