use std::sync::Arc;

use argh::FromArgs;
use camino::Utf8PathBuf;
use interaction::{config, o11y, web};
use miette::Result;
use tracing::info;

/// interaction - serve a form page that greets whoever submits it
#[derive(FromArgs)]
struct Cli {
    /// config file path (default: /etc/interaction/interaction.toml)
    #[argh(option, long = "config")]
    config_path: Option<Utf8PathBuf>,

    /// listen address, overrides web.http_addr
    #[argh(option)]
    listen: Option<String>,

    /// show version information
    #[argh(switch)]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    if cli.version {
        println!("interaction {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = config::load(cli.config_path.as_deref())?;

    if let Some(listen) = cli.listen {
        config.web.http_addr = listen.into();
        config.validate()?;
    }

    o11y::init(&config.o11y)?;

    info!("Starting interaction...");
    match &config.source {
        Some(path) => info!("Loaded config from {path}"),
        None => info!("No config file found, using defaults"),
    }
    if let Some(path) = &config.web.page_path {
        info!("Serving page on {path}");
    } else {
        info!("Serving page on every path");
    }

    let shutdown = web::shutdown_signal()?;
    web::start(Arc::new(config), shutdown).await
}
