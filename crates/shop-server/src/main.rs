//! `shop`: run the storefront API.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use shop_cache::Cache;
use shop_payment::HmacGateway;
use shop_server::config::MailBackend;
use shop_server::{router, telemetry, AppState, ShopConfig};
use tracing::{debug, error, info, warn};

/// Storefront API server
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (TOML). Falls back to SHOP_CONFIG.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overriding the config and PORT.
    #[arg(short, long)]
    port: Option<u16>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ShopConfig::resolve(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate().context("Invalid configuration")?;

    if cli.check_config {
        println!("configuration ok");
        return Ok(());
    }

    telemetry::init_tracing(&config.log);

    let store = shop_db::open_store(&config.storage)
        .await
        .context("Failed to open document store")?;
    let gateway = HmacGateway::new(&config.payment.key_id, &config.payment.key_secret)
        .context("Failed to configure payment gateway")?;

    let mailer = config
        .mail
        .mailer()
        .context("Failed to configure passcode mailer")?;
    if config.mail.backend == MailBackend::Log {
        warn!("mail backend is `log`: passcodes are logged, not emailed");
    }

    let cache = Cache::new();
    tokio::spawn(purge_expired_entries(cache.clone()));

    let addr = config.server.bind_addr();
    let state = AppState::new(
        config,
        store,
        cache,
        mailer,
        Arc::new(gateway),
    )?;
    state
        .bootstrap_admin()
        .await
        .context("Failed to bootstrap admin account")?;

    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %listener.local_addr()?, "storefront API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

/// Drop expired sessions and passcodes once a minute.
async fn purge_expired_entries(cache: Cache) {
    let mut ticker = tokio::time::interval(Duration::from_secs(60));
    loop {
        ticker.tick().await;
        match cache.purge_expired() {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "expired cache entries removed"),
            Err(e) => warn!(error = %e, "cache purge failed"),
        }
    }
}

async fn shutdown_signal() {
    wait_for_signal(tokio::signal::ctrl_c()).await
}

/// Resolve when `signal` fires. A signal that cannot be listened for never
/// resolves, so the server keeps running.
async fn wait_for_signal<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutting down"),
        Err(e) => {
            error!(error = %e, "failed to listen for ctrl-c; graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}
