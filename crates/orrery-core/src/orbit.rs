// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orbital layout: scroll progress to per-card pose.
//!
//! [`OrbitalLayout::pose`] is pure. The list-render pass and the hit-testing
//! pass call it independently and must agree bit for bit, so nothing here
//! caches or reads a clock.
// Item counts stay far below 2^24; index-to-float casts are exact.
#![allow(clippy::cast_precision_loss)]

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{ContentWindow, LayoutVariant, OrbitGeometry, OrbitTuning, ShowcaseConfig};
use crate::device::PerformanceTier;

/// Pose of one gallery card on the orbit for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitalPose {
    /// World-space position.
    pub position: Vec3,
    /// Orbit angle in radians (unwrapped).
    pub angle: f32,
    /// Depth remapped to [0, 1]; 1 is nearest the camera.
    pub frontness: f32,
    /// Uniform card scale.
    pub scale: f32,
    /// Card opacity in [0, 1].
    pub opacity: f32,
    /// Card sits in the front half of the orbit.
    pub is_front: bool,
    /// Glow intensity in [0, 1]; zero unless the tier allows glow.
    pub glow: f32,
    /// Card is the highlighted "active" card.
    pub active: bool,
    /// Card accepts pointer input.
    pub interactive: bool,
    /// Category badge opacity.
    pub badge_opacity: f32,
}

impl OrbitalPose {
    /// Whether the card is faint enough to skip rendering.
    pub fn is_culled(&self, cull_opacity: f32) -> bool {
        self.opacity < cull_opacity
    }
}

/// Orbit layout for one layout variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalLayout {
    geometry: OrbitGeometry,
    tuning: OrbitTuning,
    window: ContentWindow,
}

impl OrbitalLayout {
    /// Layout for `variant` using the tuning in `config`.
    pub fn new(config: &ShowcaseConfig, variant: LayoutVariant) -> Self {
        Self {
            geometry: *config.geometry(variant),
            tuning: config.orbit,
            window: config.content,
        }
    }

    /// Geometry in use.
    pub fn geometry(&self) -> &OrbitGeometry {
        &self.geometry
    }

    /// Shaping constants in use.
    pub fn tuning(&self) -> &OrbitTuning {
        &self.tuning
    }

    /// Scale range for `tier`: the low tier gets half the swing.
    pub fn scale_range(&self, tier: PerformanceTier) -> (f32, f32) {
        let (lo, hi) = (self.geometry.scale_min, self.geometry.scale_max);
        match tier {
            PerformanceTier::High | PerformanceTier::Medium => (lo, hi),
            PerformanceTier::Low => (lo, lo + (hi - lo) * 0.5),
        }
    }

    /// Remap depth `z` to frontness in [0, 1].
    pub fn frontness(&self, z: f32) -> f32 {
        let r = self.geometry.radius;
        let span = r * self.tuning.frontness_span;
        if span <= f32::EPSILON {
            return 0.0;
        }
        ((z + r * self.tuning.frontness_offset) / span).clamp(0.0, 1.0)
    }

    /// Pose of item `index` out of `count` at scroll `progress`.
    ///
    /// `count == 0` is treated as 1. Non-finite progress is treated as 0.
    pub fn pose(
        &self,
        index: usize,
        count: usize,
        progress: f32,
        tier: PerformanceTier,
    ) -> OrbitalPose {
        let t = &self.tuning;
        let r = self.geometry.radius;
        let count = count.max(1);
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let phase = (index % count) as f32 / count as f32;
        let normalized = self.window.normalize(progress);
        let angle = (normalized * t.rotation_turns + phase) * TAU;

        let x = angle.sin() * r;
        let z = angle.cos() * r * t.depth_compression;
        let y = (angle * t.wiggle_angle_factor + index as f32 * t.wiggle_index_phase).sin()
            * t.wiggle_amplitude;

        let frontness = self.frontness(z);
        let (scale_lo, scale_hi) = self.scale_range(tier);
        let scale = scale_lo + (scale_hi - scale_lo) * frontness;

        let base = self.window.fade_factor(progress);
        let lit = t.base_opacity + (1.0 - t.base_opacity) * frontness;
        let opacity = (base * lit).clamp(0.0, 1.0);

        let is_front = z > t.front_z_threshold;
        let glow = if tier == PerformanceTier::High && frontness > t.glow_threshold {
            frontness
        } else {
            0.0
        };

        OrbitalPose {
            position: Vec3::new(x, y, z),
            angle,
            frontness,
            scale,
            opacity,
            is_front,
            glow,
            active: frontness > t.active_threshold,
            interactive: is_front && frontness > t.glow_threshold && !self.is_culled(opacity),
            badge_opacity: frontness.max(0.6),
        }
    }

    /// Index of the front-most interactive card, if any.
    ///
    /// Ties resolve to the lower index.
    pub fn front_most(&self, count: usize, progress: f32, tier: PerformanceTier) -> Option<usize> {
        (0..count)
            .map(|i| (i, self.pose(i, count, progress, tier)))
            .filter(|(_, pose)| pose.interactive)
            .fold(None, |best: Option<(usize, f32)>, (i, pose)| match best {
                Some((_, f)) if f >= pose.frontness => best,
                _ => Some((i, pose.frontness)),
            })
            .map(|(i, _)| i)
    }

    fn is_culled(&self, opacity: f32) -> bool {
        opacity < self.tuning.cull_opacity
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn desktop() -> OrbitalLayout {
        OrbitalLayout::new(&ShowcaseConfig::default(), LayoutVariant::Desktop)
    }

    #[test]
    fn six_items_at_midpoint() {
        let layout = desktop();
        let pose = layout.pose(0, 6, 0.5, PerformanceTier::High);
        let normalized = (0.5 - 0.10) / 0.82;
        let angle = normalized * 1.2 * TAU;
        assert_relative_eq!(pose.position.x, angle.sin() * 2.4, epsilon = 1e-5);
        assert_relative_eq!(pose.position.z, angle.cos() * 2.4 * 0.75, epsilon = 1e-5);
        assert_relative_eq!(pose.position.y, (angle * 0.5).sin() * 1.2, epsilon = 1e-5);

        let again = layout.pose(0, 6, 0.5, PerformanceTier::High);
        assert_eq!(
            pose.position.to_array().map(f32::to_bits),
            again.position.to_array().map(f32::to_bits)
        );
        assert_eq!(pose.opacity.to_bits(), again.opacity.to_bits());
    }

    #[test]
    fn zero_count_is_guarded() {
        let layout = desktop();
        let zero = layout.pose(0, 0, 0.4, PerformanceTier::Medium);
        let one = layout.pose(0, 1, 0.4, PerformanceTier::Medium);
        assert_eq!(zero, one);
        assert!(zero.position.is_finite());
    }

    #[test]
    fn single_item_orbits_with_zero_phase() {
        let layout = desktop();
        let pose = layout.pose(0, 1, 0.10, PerformanceTier::High);
        // Start of the window, phase 0: straight in front.
        assert_relative_eq!(pose.position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pose.position.z, 1.8, epsilon = 1e-6);
    }

    #[test]
    fn outside_window_is_invisible() {
        let layout = desktop();
        for p in [0.0, 0.05, 0.10, 0.92, 0.97, 1.0] {
            for i in 0..6 {
                let pose = layout.pose(i, 6, p, PerformanceTier::High);
                assert_eq!(pose.opacity, 0.0, "progress {p} index {i}");
                assert!(!pose.interactive);
            }
        }
    }

    #[test]
    fn low_tier_has_no_glow_and_compressed_scale() {
        let layout = desktop();
        let (lo, hi) = layout.scale_range(PerformanceTier::Low);
        assert_relative_eq!(lo, 0.28);
        assert_relative_eq!(hi, 0.35, epsilon = 1e-6);
        for i in 0..6 {
            assert_eq!(layout.pose(i, 6, 0.5, PerformanceTier::Low).glow, 0.0);
            assert_eq!(layout.pose(i, 6, 0.5, PerformanceTier::Medium).glow, 0.0);
        }
    }

    #[test]
    fn mobile_uses_smaller_orbit() {
        let cfg = ShowcaseConfig::default();
        let mobile = OrbitalLayout::new(&cfg, LayoutVariant::Mobile);
        let pose = mobile.pose(0, 4, 0.10, PerformanceTier::High);
        assert_relative_eq!(pose.position.z, 1.8 * 0.75, epsilon = 1e-6);
        assert_eq!(mobile.geometry().card_width_px, 200);
    }

    #[test]
    fn front_most_picks_nearest_card() {
        let layout = desktop();
        let front = layout.front_most(6, 0.12, PerformanceTier::High);
        assert_eq!(front, Some(0));
        assert_eq!(layout.front_most(6, 0.02, PerformanceTier::High), None);
    }

    #[test]
    fn nan_progress_is_treated_as_start() {
        let layout = desktop();
        let pose = layout.pose(2, 6, f32::NAN, PerformanceTier::High);
        assert_eq!(pose.opacity, 0.0);
        assert!(pose.position.is_finite());
    }
}
