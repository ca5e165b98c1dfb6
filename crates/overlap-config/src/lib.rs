// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Preferences for the overlap service: the persisted [`ServicePrefs`], the
//! JSON file they live in, and the command-line overrides applied on top.

pub mod file;
pub mod prefs;

pub use file::{load_prefs, PrefsError, PrefsFile, PREFS_FILE_NAME};
pub use prefs::{PrefsOverrides, ServicePrefs};
