// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use orrery_app_core::config::{ConfigError, ConfigStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Which store operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    /// Every call succeeds.
    #[default]
    Never,
    /// `load_raw` returns `ConfigError::Other`.
    OnLoad,
    /// `save_raw` returns `ConfigError::Other` and stores nothing.
    OnSave,
    /// Both operations fail.
    Always,
}

/// In-memory implementation of [`ConfigStore`] for testing.
///
/// Clones share state, so a test can keep one handle for inspection while a
/// `ConfigService` owns another.
///
/// ```
/// use orrery_app_core::config::{ConfigService, PREFS_KEY};
/// use orrery_app_core::prefs::ShowcasePrefs;
/// use orrery_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// service.save(PREFS_KEY, &ShowcasePrefs::default()).unwrap();
/// assert_eq!(store.saves(), 1);
/// assert!(store.contains_key(PREFS_KEY));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Blobs>>,
}

#[derive(Default)]
struct Blobs {
    data: BTreeMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    fail: FailMode,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw bytes under `key` (e.g. corrupted JSON).
    pub fn with_raw(key: &str, bytes: &[u8]) -> Self {
        let store = Self::new();
        store.blobs().data.insert(key.to_owned(), bytes.to_vec());
        store
    }

    fn blobs(&self) -> MutexGuard<'_, Blobs> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Switch failure injection.
    pub fn fail(&self, mode: FailMode) {
        self.blobs().fail = mode;
    }

    /// Number of `load_raw` attempts, failed ones included.
    pub fn loads(&self) -> usize {
        self.blobs().loads
    }

    /// Number of `save_raw` attempts, failed ones included.
    pub fn saves(&self) -> usize {
        self.blobs().saves
    }

    /// Whether `key` holds a blob.
    pub fn contains_key(&self, key: &str) -> bool {
        self.blobs().data.contains_key(key)
    }

    /// Stored bytes for `key`, decoded as UTF-8 for easy assertions.
    pub fn text(&self, key: &str) -> Option<String> {
        self.blobs()
            .data
            .get(key)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut blobs = self.blobs();
        blobs.loads += 1;
        if matches!(blobs.fail, FailMode::OnLoad | FailMode::Always) {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        blobs.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut blobs = self.blobs();
        blobs.saves += 1;
        if matches!(blobs.fail, FailMode::OnSave | FailMode::Always) {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        blobs.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
