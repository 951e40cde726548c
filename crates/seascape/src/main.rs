mod cli;

use anyhow::Result;
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::parse();
    initialise_tracing();

    let config = RendererConfig {
        surface_size: cli.size,
        window_title: cli.title,
        gpu_power: cli.power,
    };

    tracing::info!(
        width = config.surface_size.0,
        height = config.surface_size.1,
        power = %config.gpu_power,
        "starting seascape"
    );

    Renderer::new(config).run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
