// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP routes and handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::FormRejection, State},
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use overlap_core::{compute_overlap, compute_stats};
use overlap_proto::{BodiesRequest, FormRequest, Operation, OverlapResponse, StatsResponse};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::dvid::{without_scheme, DvidClient, DvidError};
use crate::error::ServiceError;
use crate::interface;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    dvid: DvidClient,
}

impl AppState {
    /// Builds state (and its HTTP client) from `config`.
    pub fn new(config: &ServiceConfig) -> Result<Self, DvidError> {
        Ok(Self {
            dvid: DvidClient::new(config)?,
        })
    }
}

/// Full router: JSON API, interface document, and the HTML form front end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(front_page))
        .route("/overlap", post(overlap_json))
        .route("/overlap/", post(overlap_json))
        .route("/bodystats", post(stats_json))
        .route("/bodystats/", post(stats_json))
        .route("/interface", get(interface_doc))
        .route("/interface/", get(interface_doc))
        .route("/interface/interface.raml", get(interface_doc))
        .route("/formhandler", post(overlap_form))
        .route("/formhandler/", post(overlap_form))
        .route("/formhandler2", post(stats_form))
        .route("/formhandler2/", post(stats_form))
        .with_state(Arc::new(state))
}

async fn overlap_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<OverlapResponse>, ServiceError> {
    let req = BodiesRequest::from_json(&body)?;
    run_overlap(&state, req).await.map(Json)
}

async fn stats_json(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<StatsResponse>, ServiceError> {
    let req = BodiesRequest::from_json(&body)?;
    run_stats(&state, req).await.map(Json)
}

async fn overlap_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FormRequest>, FormRejection>,
) -> Result<Json<OverlapResponse>, ServiceError> {
    let Form(form) = form?;
    run_overlap(&state, form.into_request()?).await.map(Json)
}

async fn stats_form(
    State(state): State<Arc<AppState>>,
    form: Result<Form<FormRequest>, FormRejection>,
) -> Result<Json<StatsResponse>, ServiceError> {
    let Form(form) = form?;
    run_stats(&state, form.into_request()?).await.map(Json)
}

async fn run_overlap(state: &AppState, req: BodiesRequest) -> Result<OverlapResponse, ServiceError> {
    let req = req.validate(Operation::Overlap)?;
    info!(uuid = %req.uuid, bodies = req.bodies.len(), "overlap request");
    let bodies = state.dvid.fetch_bodies(&req).await?;
    let records = tokio::task::spawn_blocking(move || compute_overlap(bodies)).await??;
    debug!(pairs = records.len(), "overlap computed");
    Ok(OverlapResponse::from(records.as_slice()))
}

async fn run_stats(state: &AppState, req: BodiesRequest) -> Result<StatsResponse, ServiceError> {
    let req = req.validate(Operation::Stats)?;
    info!(uuid = %req.uuid, bodies = req.bodies.len(), "bodystats request");
    let bodies = state.dvid.fetch_bodies(&req).await?;
    let stats = tokio::task::spawn_blocking(move || compute_stats(&bodies)).await?;
    Ok(StatsResponse::from(stats.as_slice()))
}

async fn interface_doc() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/raml+yaml"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        interface::RAML,
    )
}

async fn front_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let server = match state.dvid.resolve_server(None).await {
        Ok(server) => without_scheme(&server).to_owned(),
        Err(err) => {
            debug!(%err, "no default dvid server for form");
            String::new()
        }
    };
    Html(interface::form_html(&server))
}
