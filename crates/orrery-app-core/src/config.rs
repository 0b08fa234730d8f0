// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted showcase settings.
//!
//! Settings live as JSON blobs behind a [`ConfigStore`]; [`ConfigService`]
//! owns the encoding so stores only shuffle bytes. Two keys are in use:
//! [`SHOWCASE_CONFIG_KEY`] for tuning overrides and [`PREFS_KEY`] for the
//! visitor's quality preferences.

use orrery_core::ShowcaseConfig;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Blob key for [`ShowcaseConfig`] overrides.
pub const SHOWCASE_CONFIG_KEY: &str = "showcase";
/// Blob key for [`crate::prefs::ShowcasePrefs`].
pub const PREFS_KEY: &str = "prefs";

/// Byte-level settings storage (filesystem, `localStorage`, memory).
pub trait ConfigStore {
    /// Bytes stored under `key`, or [`ConfigError::NotFound`].
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Replace whatever is stored under `key`.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Why a settings blob could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key.
    #[error("no settings stored under this key")]
    NotFound,
    /// Storage medium failed.
    #[error("settings storage failed: {0}")]
    Io(#[from] std::io::Error),
    /// Blob is not valid JSON for the requested type.
    #[error("settings blob is malformed: {0}")]
    Serde(#[from] serde_json::Error),
    /// Blob decoded but its values are out of range.
    #[error("settings rejected: {0}")]
    Invalid(String),
    /// Store-specific failure.
    #[error("settings store error: {0}")]
    Other(String),
}

/// JSON codec in front of a [`ConfigStore`].
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wrap `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap back into the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// Decode the value under `key`; an absent key or empty blob is `None`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let bytes = match self.store.load_raw(key) {
            Err(ConfigError::NotFound) => return Ok(None),
            other => other?,
        };
        if bytes.is_empty() {
            debug!(key, "empty settings blob");
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Like [`Self::load`] but never fails: errors are logged and
    /// `T::default()` is returned so the page still starts.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key).unwrap_or_else(|err| {
            warn!(key, %err, "ignoring unreadable settings");
            None
        })
        .unwrap_or_default()
    }

    /// Stored [`ShowcaseConfig`] (defaults when absent), range-checked.
    pub fn load_showcase(&self) -> Result<ShowcaseConfig, ConfigError> {
        let config = self
            .load::<ShowcaseConfig>(SHOWCASE_CONFIG_KEY)?
            .unwrap_or_default();
        config
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(config)
    }

    /// Encode `value` as pretty JSON under `key`.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        let encoded = serde_json::to_vec_pretty(value)?;
        self.store.save_raw(key, &encoded)
    }
}
