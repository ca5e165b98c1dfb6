// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Service preferences and the overrides layered on them.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Port the service listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 25123;

/// Saved preferences for the overlap service.
///
/// Missing fields take their defaults, so a prefs file may name only what it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePrefs {
    /// Address the HTTP listener binds.
    pub listen: SocketAddr,
    /// Proxy `host:port` used to discover the DVID server.
    pub proxy: Option<String>,
    /// Per-call timeout for DVID and proxy requests, in seconds.
    pub dvid_timeout_secs: u64,
}

impl Default for ServicePrefs {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            proxy: None,
            dvid_timeout_secs: 60,
        }
    }
}

/// Values given on the command line; each one set wins over the prefs file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefsOverrides {
    /// Listener address.
    pub listen: Option<SocketAddr>,
    /// Proxy `host:port`; an empty string clears the saved proxy.
    pub proxy: Option<String>,
    /// DVID timeout in seconds.
    pub dvid_timeout_secs: Option<u64>,
}

impl ServicePrefs {
    /// Applies `overrides` on top of these prefs.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &PrefsOverrides) -> Self {
        if let Some(listen) = overrides.listen {
            self.listen = listen;
        }
        if let Some(proxy) = &overrides.proxy {
            self.proxy = Some(proxy.trim().to_owned()).filter(|p| !p.is_empty());
        }
        if let Some(secs) = overrides.dvid_timeout_secs {
            self.dvid_timeout_secs = secs;
        }
        self
    }
}
