// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP service computing face overlap and surface statistics of bodies
//! fetched from a DVID server.
//!
//! Routes:
//! - `POST /overlap`, `POST /bodystats`: JSON requests
//! - `GET /interface/interface.raml`: RAML description
//! - `GET /` plus `POST /formhandler`, `POST /formhandler2`: HTML front end

pub mod config;
pub mod dvid;
pub mod error;
pub mod interface;
pub mod routes;

use std::future::Future;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

pub use config::ServiceConfig;
pub use dvid::{DvidClient, DvidError};
pub use error::ServiceError;
pub use routes::{router, AppState};

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: &ServiceConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(AppState::new(config).context("build DVID client")?);
    info!(addr = %listener.local_addr()?, proxy = ?config.proxy, "overlap service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server")?;
    info!("overlap service stopped");
    Ok(())
}
