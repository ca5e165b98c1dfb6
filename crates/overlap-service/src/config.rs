// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Runtime settings threaded into the service.

use std::time::Duration;

use overlap_config::ServicePrefs;

/// Settings the router and DVID client are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Proxy `host:port` used to discover DVID when a request names no server.
    pub proxy: Option<String>,
    /// Timeout applied to every DVID and proxy call.
    pub dvid_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from(&ServicePrefs::default())
    }
}

impl From<&ServicePrefs> for ServiceConfig {
    fn from(prefs: &ServicePrefs) -> Self {
        Self {
            proxy: prefs.proxy.clone().filter(|p| !p.is_empty()),
            dvid_timeout: Duration::from_secs(prefs.dvid_timeout_secs.max(1)),
        }
    }
}
