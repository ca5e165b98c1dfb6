// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The JSON file [`ServicePrefs`] are kept in.

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::prefs::ServicePrefs;

/// File name of the prefs file inside its directory.
pub const PREFS_FILE_NAME: &str = "overlap-service.json";

/// Failures reading or writing the prefs file.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// No home directory to derive the platform config dir from.
    #[error("could not resolve config dir")]
    NoConfigDir,
    /// The file exists but could not be read.
    #[error("read {}: {source}", .path.display())]
    Read {
        /// Prefs file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file or its directory could not be written.
    #[error("write {}: {source}", .path.display())]
    Write {
        /// Prefs file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The file is not valid prefs JSON.
    #[error("parse {}: {source}", .path.display())]
    Parse {
        /// Prefs file path.
        path: PathBuf,
        /// JSON error.
        source: serde_json::Error,
    },
    /// Prefs could not be encoded.
    #[error("encode prefs: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Location of a prefs file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    /// Prefs file in the user config directory (e.g. `~/.config/overlap`).
    pub fn user() -> Result<Self, PrefsError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "overlap")
            .ok_or(PrefsError::NoConfigDir)?;
        Ok(Self::in_dir(proj.config_dir()))
    }

    /// Prefs file inside `dir`; nothing is created until the first write.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFS_FILE_NAME),
        }
    }

    /// Full path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the prefs. A missing or empty file reads as `None`.
    pub fn read(&self) -> Result<Option<ServicePrefs>, PrefsError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PrefsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| PrefsError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes `prefs` as pretty JSON, creating the directory if needed.
    pub fn write(&self, prefs: &ServicePrefs) -> Result<(), PrefsError> {
        let data = serde_json::to_vec_pretty(prefs)?;
        let write_err = |source| PrefsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        std::fs::write(&self.path, data).map_err(write_err)
    }

    /// Reads the prefs, writing the defaults first if the file has none.
    /// An existing file is never rewritten.
    pub fn load_or_init(&self) -> Result<ServicePrefs, PrefsError> {
        if let Some(prefs) = self.read()? {
            debug!(path = %self.path.display(), "prefs loaded");
            return Ok(prefs);
        }
        let prefs = ServicePrefs::default();
        self.write(&prefs)?;
        info!(path = %self.path.display(), "default prefs written");
        Ok(prefs)
    }
}

/// Best-effort prefs for service start-up: the file in `dir` (or the user
/// config dir), initialised with defaults when absent. Any failure is logged
/// and falls back to [`ServicePrefs::default`].
pub fn load_prefs(dir: Option<&Path>) -> ServicePrefs {
    let file = match dir {
        Some(dir) => PrefsFile::in_dir(dir),
        None => match PrefsFile::user() {
            Ok(file) => file,
            Err(err) => {
                warn!(%err, "no prefs location; using defaults");
                return ServicePrefs::default();
            }
        },
    };
    file.load_or_init().unwrap_or_else(|err| {
        warn!(%err, "could not load prefs; using defaults");
        ServicePrefs::default()
    })
}
