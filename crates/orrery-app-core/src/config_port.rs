// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs port shared by the browser bridge and native tools.

use tracing::warn;

use crate::config::{ConfigService, ConfigStore, PREFS_KEY};
use crate::prefs::ShowcasePrefs;

/// Config-facing port for loading/saving showcase preferences.
pub trait PrefsPort {
    /// Load preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<ShowcasePrefs>;
    /// Persist preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ShowcasePrefs);
}

impl<S: ConfigStore> PrefsPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<ShowcasePrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "prefs unreadable; ignoring");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ShowcasePrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            warn!(%err, "failed to persist prefs");
        }
    }
}
