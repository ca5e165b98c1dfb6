// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Overlap service binary: loads prefs, applies command-line overrides, serves HTTP.

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use overlap_config::{load_prefs, PrefsOverrides};
use overlap_service::ServiceConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Voxel body overlap and stats service")]
struct Args {
    /// TCP listener for HTTP clients (default from prefs, else 0.0.0.0:25123)
    #[arg(long)]
    listen: Option<SocketAddr>,
    /// Service proxy host:port used to locate DVID when a request names no server
    #[arg(long)]
    proxy: Option<String>,
    /// Timeout for each DVID or proxy call, in seconds
    #[arg(long)]
    dvid_timeout_secs: Option<u64>,
    /// Directory holding the prefs file (default: platform config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> PrefsOverrides {
        PrefsOverrides {
            listen: self.listen,
            proxy: self.proxy.clone(),
            dvid_timeout_secs: self.dvid_timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let prefs = load_prefs(args.config_dir.as_deref()).with_overrides(&args.overrides());
    let config = ServiceConfig::from(&prefs);

    let listener = TcpListener::bind(prefs.listen)
        .await
        .with_context(|| format!("bind {}", prefs.listen))?;
    overlap_service::serve(listener, &config, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(?err, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!(?err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown requested");
}
