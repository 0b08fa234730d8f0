// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `ConfigStore` for Orrery hosts (uses platform config dir).

use directories::ProjectDirs;
use orrery_app_core::config::{ConfigError, ConfigStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Store configs as JSON files under a base directory.
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// Create a store rooted at the user config directory (e.g., `~/.config/orrery`).
    pub fn new() -> Result<Self, ConfigError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "Orrery")
            .ok_or_else(|| ConfigError::Other("could not resolve config dir".into()))?;
        Self::at(proj.config_dir())
    }

    /// Create a store rooted at `base`, creating the directory if needed.
    pub fn at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base = base.as_ref().to_path_buf();
        fs::create_dir_all(&base)?;
        debug!(path = %base.display(), "config store ready");
        Ok(Self { base })
    }

    /// Directory holding the config files.
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ConfigError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConfigError::Invalid(format!("unsupported config key {key:?}")));
        }
        Ok(self.base.join(format!("{key}.json")))
    }
}

impl ConfigStore for FsConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.path_for(key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let path = self.path_for(key)?;
        // Write then rename so a crash never leaves a half-written prefs file.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, data)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use orrery_app_core::config::{ConfigService, PREFS_KEY};
    use orrery_app_core::prefs::ShowcasePrefs;
    use orrery_core::config::LayoutVariant;

    #[test]
    fn prefs_survive_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = ShowcasePrefs {
            layout_override: Some(LayoutVariant::Mobile),
            video_muted: true,
            ..ShowcasePrefs::default()
        };
        ConfigService::new(FsConfigStore::at(dir.path()).unwrap())
            .save(PREFS_KEY, &prefs)
            .unwrap();

        let reopened = ConfigService::new(FsConfigStore::at(dir.path()).unwrap());
        let loaded: Option<ShowcasePrefs> = reopened.load(PREFS_KEY).unwrap();
        assert_eq!(loaded, Some(prefs));
        let base = reopened.store().base();
        assert!(base.join("prefs.json").exists());
        assert!(!base.join("prefs.json.tmp").exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path()).unwrap();
        assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsConfigStore::at(dir.path()).unwrap();
        assert!(matches!(
            store.save_raw("../escape", b"{}"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(store.load_raw(""), Err(ConfigError::Invalid(_))));
    }
}
