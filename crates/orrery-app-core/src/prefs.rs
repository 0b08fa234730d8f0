// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted showcase preferences (layout override, quality cap, motion,
//! video sound).

use orrery_core::{DeviceProfile, LayoutVariant, PerformanceTier};
use serde::{Deserialize, Serialize};

/// Viewport width below which the mobile layout is used.
pub const MOBILE_BREAKPOINT_PX: f32 = 768.0;

/// Saved preferences for the showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcasePrefs {
    /// Force a layout variant instead of deriving it from the viewport.
    pub layout_override: Option<LayoutVariant>,
    /// Highest tier the user wants (e.g. "battery saver").
    pub tier_cap: Option<PerformanceTier>,
    /// Honour `prefers-reduced-motion`: drop to the low tier.
    pub reduced_motion: bool,
    /// Start the fullscreen video muted.
    pub video_muted: bool,
}

impl ShowcasePrefs {
    /// Layout variant for a viewport `width_px` wide.
    pub fn layout_for(&self, width_px: f32) -> LayoutVariant {
        self.layout_override.unwrap_or(if width_px < MOBILE_BREAKPOINT_PX {
            LayoutVariant::Mobile
        } else {
            LayoutVariant::Desktop
        })
    }

    /// Apply the quality preferences to a detected profile. Never raises it.
    pub fn apply(&self, detected: DeviceProfile) -> DeviceProfile {
        let mut profile = detected;
        if let Some(cap) = self.tier_cap {
            profile = profile.capped(cap);
        }
        if self.reduced_motion {
            profile = profile.capped(PerformanceTier::Low);
        }
        profile
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_breakpoint_unless_overridden() {
        let prefs = ShowcasePrefs::default();
        assert_eq!(prefs.layout_for(767.0), LayoutVariant::Mobile);
        assert_eq!(prefs.layout_for(1280.0), LayoutVariant::Desktop);
        let forced = ShowcasePrefs {
            layout_override: Some(LayoutVariant::Mobile),
            ..ShowcasePrefs::default()
        };
        assert_eq!(forced.layout_for(1920.0), LayoutVariant::Mobile);
    }

    #[test]
    fn reduced_motion_drops_to_low() {
        let prefs = ShowcasePrefs {
            reduced_motion: true,
            ..ShowcasePrefs::default()
        };
        let profile = prefs.apply(DeviceProfile::default());
        assert_eq!(profile.tier, PerformanceTier::Low);
        assert!(!profile.enable_parallax);
    }

    #[test]
    fn prefs_json_is_camel_case() {
        let json = serde_json::to_string(&ShowcasePrefs {
            tier_cap: Some(PerformanceTier::Medium),
            ..ShowcasePrefs::default()
        })
        .unwrap();
        assert!(json.contains("\"tierCap\":\"medium\""));
    }
}
