mod cli;

use anyhow::Result;
use renderer::RendererConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::parse();
    initialise_tracing();

    let mut config = RendererConfig::default();
    if let Some((width, height)) = cli.size {
        config.surface_size = (width, height);
    }
    config.antialiasing = cli.msaa;
    config.enhanced_at_start = cli.enhanced;

    tracing::debug!(?config, "starting wave preview");
    renderer::run(config)
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
