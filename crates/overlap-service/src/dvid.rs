// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! DVID client: proxy discovery and concurrent sparsevol fetches.

use futures_util::future::try_join_all;
use overlap_core::{BodyId, SparseBody};
use overlap_proto::{decode_sparse_body, DecodeError, ValidRequest};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ServiceConfig;

/// Errors raised while locating DVID or reading bodies from it.
#[derive(Debug, Error)]
pub enum DvidError {
    /// Request named no server and no proxy is configured.
    #[error("no proxy server location exists")]
    NoProxy,
    /// Proxy could not be reached or answered with junk.
    #[error("DVID server could not be located on proxy: {0}")]
    Proxy(String),
    /// A body stream could not be fetched.
    #[error("body could not be read from {url}: {reason}")]
    Fetch {
        /// Sparsevol URL that failed.
        url: String,
        /// Transport error or HTTP status.
        reason: String,
    },
    /// A body stream was fetched but did not decode.
    #[error("body {body} from {url}: {source}")]
    Decode {
        /// Body whose stream was malformed.
        body: BodyId,
        /// Sparsevol URL it came from.
        url: String,
        /// Decoder failure.
        #[source]
        source: DecodeError,
    },
    /// HTTP client could not be constructed.
    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ServiceLocation {
    #[serde(rename = "service-location")]
    location: Option<String>,
}

/// Shared HTTP client for DVID and the service proxy.
#[derive(Debug, Clone)]
pub struct DvidClient {
    http: reqwest::Client,
    proxy: Option<String>,
}

impl DvidClient {
    /// Builds a client with the configured timeout and proxy.
    pub fn new(config: &ServiceConfig) -> Result<Self, DvidError> {
        let http = reqwest::Client::builder()
            .timeout(config.dvid_timeout)
            .build()?;
        Ok(Self {
            http,
            proxy: config.proxy.clone(),
        })
    }

    /// Base URL of the DVID server: the requested `host:port`, or the
    /// `service-location` the proxy reports for DVID.
    pub async fn resolve_server(&self, requested: Option<&str>) -> Result<String, DvidError> {
        if let Some(server) = requested {
            return Ok(with_scheme(server));
        }
        let proxy = self.proxy.as_deref().ok_or(DvidError::NoProxy)?;
        let url = format!("http://{proxy}/services/dvid/node");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DvidError::Proxy(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DvidError::Proxy(format!("{url} answered {}", resp.status())));
        }
        let found: ServiceLocation = resp
            .json()
            .await
            .map_err(|e| DvidError::Proxy(format!("error decoding JSON from proxy: {e}")))?;
        let location = found
            .location
            .filter(|l| !l.is_empty())
            .ok_or_else(|| DvidError::Proxy("no service location found for DVID".into()))?;
        debug!(%location, "dvid located via proxy");
        Ok(with_scheme(&location))
    }

    /// Fetches and decodes one body from `{server}/api/node/{uuid}/sp2body/sparsevol/{body}`.
    pub async fn fetch_body(
        &self,
        server: &str,
        uuid: &str,
        body: BodyId,
    ) -> Result<SparseBody, DvidError> {
        let url = sparsevol_url(server, uuid, body);
        let fetch_err = |reason: String| DvidError::Fetch {
            url: url.clone(),
            reason,
        };
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;
        if resp.status() != StatusCode::OK {
            return Err(fetch_err(resp.status().to_string()));
        }
        let bytes = resp.bytes().await.map_err(|e| fetch_err(e.to_string()))?;
        let decoded = decode_sparse_body(body, bytes).map_err(|source| DvidError::Decode {
            body,
            url: url.clone(),
            source,
        })?;
        debug!(%body, runs = decoded.run_count(), "fetched body");
        Ok(decoded)
    }

    /// Resolves the server, then fetches every requested body concurrently.
    /// Bodies come back in request order; the first failure aborts the rest.
    pub async fn fetch_bodies(&self, req: &ValidRequest) -> Result<Vec<SparseBody>, DvidError> {
        let server = self.resolve_server(req.dvid_server.as_deref()).await?;
        try_join_all(
            req.bodies
                .iter()
                .map(|&body| self.fetch_body(&server, &req.uuid, body)),
        )
        .await
    }
}

/// Sparsevol URL of `body` at node `uuid`.
pub fn sparsevol_url(server: &str, uuid: &str, body: BodyId) -> String {
    format!("{server}/api/node/{uuid}/sp2body/sparsevol/{body}")
}

/// Prefixes `http://` unless a scheme is present; drops trailing slashes.
pub fn with_scheme(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.starts_with("http://") || server.starts_with("https://") {
        server.to_owned()
    } else {
        format!("http://{server}")
    }
}

/// Inverse of [`with_scheme`] for display in the form.
pub fn without_scheme(server: &str) -> &str {
    server
        .strip_prefix("http://")
        .or_else(|| server.strip_prefix("https://"))
        .unwrap_or(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_added_once() {
        assert_eq!(with_scheme("emdata1:80"), "http://emdata1:80");
        assert_eq!(with_scheme("http://emdata1:80/"), "http://emdata1:80");
        assert_eq!(without_scheme("http://emdata1:80"), "emdata1:80");
        assert_eq!(without_scheme("emdata1:80"), "emdata1:80");
    }

    #[test]
    fn sparsevol_url_layout() {
        assert_eq!(
            sparsevol_url("http://h:1", "ab12", BodyId(42)),
            "http://h:1/api/node/ab12/sp2body/sparsevol/42"
        );
    }

    #[tokio::test]
    async fn missing_proxy_is_reported() {
        let client = DvidClient::new(&ServiceConfig::default()).unwrap();
        assert!(matches!(
            client.resolve_server(None).await,
            Err(DvidError::NoProxy)
        ));
    }
}
