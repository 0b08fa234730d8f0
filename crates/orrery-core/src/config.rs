// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Showcase tuning.
//!
//! Every constant the layout, overlays and marquee use lives here so a host
//! can override them from JSON. Defaults reproduce the shipped look.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Layout variant chosen by the host from the viewport width.
///
/// Fixed input to the layout: the pose function never branches on screen
/// size itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Wide viewport.
    #[default]
    Desktop,
    /// Narrow viewport: smaller orbit, smaller cards, fewer items.
    Mobile,
}

/// Size-dependent orbit and camera parameters.
///
/// Inside [`ShowcaseConfig`] a partial object only overrides the fields it
/// names; the rest come from the variant's own preset ([`Self::DESKTOP`] or
/// [`Self::MOBILE`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitGeometry {
    /// Orbit radius in world units.
    pub radius: f32,
    /// Card scale at the back of the orbit.
    pub scale_min: f32,
    /// Card scale at the front of the orbit.
    pub scale_max: f32,
    /// Card width in CSS pixels.
    pub card_width_px: u32,
    /// Card height in CSS pixels.
    pub card_height_px: u32,
    /// Maximum number of gallery items placed on the orbit.
    pub max_items: usize,
    /// Camera distance from the origin.
    pub camera_z: f32,
    /// Vertical field of view in degrees.
    pub camera_fov_degrees: f32,
}

impl OrbitGeometry {
    /// Desktop geometry.
    pub const DESKTOP: Self = Self {
        radius: 2.4,
        scale_min: 0.28,
        scale_max: 0.42,
        card_width_px: 260,
        card_height_px: 165,
        max_items: 6,
        camera_z: 5.5,
        camera_fov_degrees: 55.0,
    };

    /// Mobile geometry.
    pub const MOBILE: Self = Self {
        radius: 1.8,
        scale_min: 0.22,
        scale_max: 0.35,
        card_width_px: 200,
        card_height_px: 130,
        max_items: 4,
        camera_z: 7.0,
        camera_fov_degrees: 60.0,
    };
}

impl Default for OrbitGeometry {
    fn default() -> Self {
        Self::DESKTOP
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeometryOverride {
    radius: Option<f32>,
    scale_min: Option<f32>,
    scale_max: Option<f32>,
    card_width_px: Option<u32>,
    card_height_px: Option<u32>,
    max_items: Option<usize>,
    camera_z: Option<f32>,
    camera_fov_degrees: Option<f32>,
}

impl GeometryOverride {
    fn onto(self, base: OrbitGeometry) -> OrbitGeometry {
        OrbitGeometry {
            radius: self.radius.unwrap_or(base.radius),
            scale_min: self.scale_min.unwrap_or(base.scale_min),
            scale_max: self.scale_max.unwrap_or(base.scale_max),
            card_width_px: self.card_width_px.unwrap_or(base.card_width_px),
            card_height_px: self.card_height_px.unwrap_or(base.card_height_px),
            max_items: self.max_items.unwrap_or(base.max_items),
            camera_z: self.camera_z.unwrap_or(base.camera_z),
            camera_fov_degrees: self.camera_fov_degrees.unwrap_or(base.camera_fov_degrees),
        }
    }
}

fn desktop_geometry<'de, D: Deserializer<'de>>(de: D) -> Result<OrbitGeometry, D::Error> {
    GeometryOverride::deserialize(de).map(|o| o.onto(OrbitGeometry::DESKTOP))
}

fn mobile_geometry<'de, D: Deserializer<'de>>(de: D) -> Result<OrbitGeometry, D::Error> {
    GeometryOverride::deserialize(de).map(|o| o.onto(OrbitGeometry::MOBILE))
}

/// Size-independent orbit shaping constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrbitTuning {
    /// Full turns travelled across the content window.
    pub rotation_turns: f32,
    /// Z compression that flattens the orbit into an ellipse.
    pub depth_compression: f32,
    /// Amplitude of the decorative vertical wiggle.
    pub wiggle_amplitude: f32,
    /// Angle multiplier of the wiggle.
    pub wiggle_angle_factor: f32,
    /// Per-index phase shift of the wiggle.
    pub wiggle_index_phase: f32,
    /// Frontness offset `k`: frontness = (z + r·k) / (r·m).
    pub frontness_offset: f32,
    /// Frontness span `m`.
    pub frontness_span: f32,
    /// Items with `z` above this are "in front".
    pub front_z_threshold: f32,
    /// Opacity at frontness 0 (fully back).
    pub base_opacity: f32,
    /// Items below this opacity are culled.
    pub cull_opacity: f32,
    /// Frontness above which glow and pointer input switch on.
    pub glow_threshold: f32,
    /// Frontness above which a card counts as active.
    pub active_threshold: f32,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            rotation_turns: 1.2,
            depth_compression: 0.75,
            wiggle_amplitude: 1.2,
            wiggle_angle_factor: 0.5,
            wiggle_index_phase: 0.4,
            frontness_offset: 0.3,
            frontness_span: 1.1,
            front_z_threshold: -0.3,
            base_opacity: 0.4,
            cull_opacity: 0.1,
            glow_threshold: 0.3,
            active_threshold: 0.5,
        }
    }
}

/// Scroll-progress sub-range in which gallery content is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentWindow {
    /// Progress at which content starts fading in.
    pub start: f32,
    /// Progress at which content has fully faded out.
    pub end: f32,
    /// Width of the linear fade at each boundary.
    pub fade: f32,
}

impl ContentWindow {
    /// Map progress into the window, clamped to [0, 1].
    pub fn normalize(&self, progress: f32) -> f32 {
        let range = self.end - self.start;
        if range <= f32::EPSILON {
            return 0.0;
        }
        ((progress - self.start) / range).clamp(0.0, 1.0)
    }

    /// Boundary fade in [0, 1]; zero outside the window.
    pub fn fade_factor(&self, progress: f32) -> f32 {
        if progress <= self.start || progress >= self.end {
            return 0.0;
        }
        if self.fade <= f32::EPSILON {
            return 1.0;
        }
        let rising = (progress - self.start) / self.fade;
        let falling = (self.end - progress) / self.fade;
        rising.min(falling).min(1.0)
    }

    /// Midpoint of the window.
    pub fn midpoint(&self) -> f32 {
        (self.start + self.end) * 0.5
    }
}

impl Default for ContentWindow {
    fn default() -> Self {
        Self {
            start: 0.10,
            end: 0.92,
            fade: 0.02,
        }
    }
}

/// Title overlay curve: ramp in, hold, ramp out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TitleCurve {
    /// End of the fade-in ramp.
    pub fade_in_end: f32,
    /// End of the hold at full opacity.
    pub hold_end: f32,
    /// End of the fade-out ramp.
    pub fade_out_end: f32,
    /// Scale gained per unit progress.
    pub scale_gain: f32,
}

impl Default for TitleCurve {
    fn default() -> Self {
        Self {
            fade_in_end: 0.03,
            hold_end: 0.12,
            fade_out_end: 0.18,
            scale_gain: 0.15,
        }
    }
}

/// Side progress indicator timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndicatorTuning {
    /// Window the active dot is derived from.
    pub window: ContentWindow,
    /// Indicator shows strictly after this progress.
    pub visible_after: f32,
    /// Indicator shows strictly before this progress.
    pub visible_before: f32,
    /// The "scroll" hint at the bottom fades out by this progress.
    pub scroll_hint_end: f32,
}

impl Default for IndicatorTuning {
    fn default() -> Self {
        Self {
            window: ContentWindow {
                start: 0.15,
                end: 0.85,
                fade: 0.0,
            },
            visible_after: 0.12,
            visible_before: 0.88,
            scroll_hint_end: 0.08,
        }
    }
}

/// Marquee card constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarqueeTuning {
    /// Scroll speed in CSS pixels per second.
    pub speed_px_per_sec: f32,
    /// Item width in CSS pixels.
    pub item_width_px: f32,
    /// Item height in CSS pixels.
    pub item_height_px: f32,
    /// Gap between items in CSS pixels.
    pub gap_px: f32,
    /// Description preview length in characters.
    pub preview_chars: usize,
}

impl Default for MarqueeTuning {
    fn default() -> Self {
        Self {
            speed_px_per_sec: 30.0,
            item_width_px: 140.0,
            item_height_px: 96.0,
            gap_px: 8.0,
            preview_chars: 120,
        }
    }
}

/// Scroll tracking constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollTuning {
    /// Minimum interval between page-level recomputes.
    pub page_sample_interval_ms: f64,
    /// Minimum interval between pinned-section recomputes (0 = every frame).
    pub pinned_sample_interval_ms: f64,
    /// Pinned scroll distance as a multiple of the viewport height.
    pub pinned_span_viewports: f32,
    /// Intersection margin used to mount the 3D scene early.
    pub intersection_margin_px: f32,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            page_sample_interval_ms: 50.0,
            pinned_sample_interval_ms: 0.0,
            pinned_span_viewports: 3.0,
            intersection_margin_px: 200.0,
        }
    }
}

/// Root showcase configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcaseConfig {
    /// Geometry for the desktop layout.
    #[serde(deserialize_with = "desktop_geometry")]
    pub desktop: OrbitGeometry,
    /// Geometry for the mobile layout.
    #[serde(deserialize_with = "mobile_geometry")]
    pub mobile: OrbitGeometry,
    /// Orbit shaping.
    pub orbit: OrbitTuning,
    /// Gallery content window.
    pub content: ContentWindow,
    /// Title overlay curve.
    pub title: TitleCurve,
    /// Progress indicator.
    pub indicator: IndicatorTuning,
    /// Marquee cards.
    pub marquee: MarqueeTuning,
    /// Scroll tracking.
    pub scroll: ScrollTuning,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            desktop: OrbitGeometry::DESKTOP,
            mobile: OrbitGeometry::MOBILE,
            orbit: OrbitTuning::default(),
            content: ContentWindow::default(),
            title: TitleCurve::default(),
            indicator: IndicatorTuning::default(),
            marquee: MarqueeTuning::default(),
            scroll: ScrollTuning::default(),
        }
    }
}

/// Rejected showcase configuration.
#[derive(Debug, Error)]
pub enum ShowcaseConfigError {
    /// JSON could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

impl ShowcaseConfig {
    /// Geometry for `variant`.
    pub fn geometry(&self, variant: LayoutVariant) -> &OrbitGeometry {
        match variant {
            LayoutVariant::Desktop => &self.desktop,
            LayoutVariant::Mobile => &self.mobile,
        }
    }

    /// Parse and validate a JSON override; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ShowcaseConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), ShowcaseConfigError> {
        let c = &self.content;
        if !(0.0..=1.0).contains(&c.start) || !(0.0..=1.0).contains(&c.end) || c.start >= c.end {
            return Err(ShowcaseConfigError::Invalid(
                "content window must satisfy 0 <= start < end <= 1",
            ));
        }
        if c.fade < 0.0 || c.fade * 2.0 > c.end - c.start {
            return Err(ShowcaseConfigError::Invalid(
                "content fade must fit twice inside the window",
            ));
        }
        if self.title.fade_out_end >= c.midpoint() {
            return Err(ShowcaseConfigError::Invalid(
                "title must be gone before the content midpoint",
            ));
        }
        for g in [&self.desktop, &self.mobile] {
            if g.radius <= 0.0 || g.scale_min <= 0.0 || g.scale_min > g.scale_max {
                return Err(ShowcaseConfigError::Invalid(
                    "orbit radius and scale range must be positive and ordered",
                ));
            }
            if g.max_items == 0 {
                return Err(ShowcaseConfigError::Invalid("orbit needs at least one item"));
            }
        }
        if self.orbit.frontness_span <= 0.0 {
            return Err(ShowcaseConfigError::Invalid("frontness span must be positive"));
        }
        if self.marquee.item_width_px + self.marquee.gap_px <= 0.0 {
            return Err(ShowcaseConfigError::Invalid("marquee stride must be positive"));
        }
        Ok(())
    }
}
