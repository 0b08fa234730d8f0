// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pinned gallery section composition.
//!
//! [`SceneComposer`] owns the render-mode decision for one section instance
//! and turns a single sampled progress value into everything drawn that
//! frame: orbit billboards (or the fallback grid), the spine, the title
//! overlay, the progress indicator and the scroll hint.
// Item counts stay far below 2^24; index-to-float casts are exact.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::BTreeSet;

use orrery_scene_port::{
    ApplyError, BillboardDef, CameraState, HighlightState, ObjectKey, SceneDelta, SceneOp,
    ScenePort,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ambient::{DecoratorStack, MotionInput};
use crate::config::{IndicatorTuning, LayoutVariant, OrbitGeometry, ShowcaseConfig, TitleCurve};
use crate::device::{DeviceProfile, PerformanceTier};
use crate::gallery::GalleryItem;
use crate::orbit::{OrbitalLayout, OrbitalPose};
use crate::scroll::Pointer;

/// How the gallery section draws its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// WebGL orbit.
    Full3D,
    /// Progressive 2D grid.
    FallbackGrid,
}

/// Render mode for a profile once the section has (or has not) been seen.
pub fn decide_render_mode(profile: &DeviceProfile, entered_viewport: bool) -> RenderMode {
    if profile.can_render_3d && profile.tier != PerformanceTier::Low && entered_viewport {
        RenderMode::Full3D
    } else {
        RenderMode::FallbackGrid
    }
}

/// One-shot viewport observer: fires on the first intersection, then
/// disconnects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportGate {
    fired: bool,
}

impl ViewportGate {
    /// Feed an intersection report; returns `true` exactly once.
    pub fn observe(&mut self, intersecting: bool) -> bool {
        if self.fired || !intersecting {
            return false;
        }
        self.fired = true;
        true
    }

    /// Whether the observer is still listening.
    pub fn is_connected(&self) -> bool {
        !self.fired
    }
}

/// Title overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TitleOverlay {
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Uniform scale.
    pub scale: f32,
}

/// Title overlay at `progress`: ramp in, hold, ramp out.
pub fn title_overlay(progress: f32, curve: &TitleCurve) -> TitleOverlay {
    let p = progress.clamp(0.0, 1.0);
    let opacity = if p < curve.fade_in_end {
        p / curve.fade_in_end
    } else if p < curve.hold_end {
        1.0
    } else if p < curve.fade_out_end {
        1.0 - (p - curve.hold_end) / (curve.fade_out_end - curve.hold_end)
    } else {
        0.0
    };
    TitleOverlay {
        opacity: opacity.clamp(0.0, 1.0),
        scale: 1.0 + p * curve.scale_gain,
    }
}

/// State of one indicator dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DotState {
    /// Already scrolled past.
    Past,
    /// Current item.
    Active,
    /// Not reached yet.
    Upcoming,
}

/// Side progress indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressIndicator {
    /// Opacity (0 or 1).
    pub opacity: f32,
    /// Index of the active dot.
    pub active_index: usize,
    /// Per-item dot states.
    pub dots: Vec<DotState>,
}

/// Indicator for `count` items at `progress`.
pub fn progress_indicator(
    progress: f32,
    count: usize,
    tuning: &IndicatorTuning,
) -> ProgressIndicator {
    let normalized = tuning.window.normalize(progress);
    let active_index = ((normalized * count as f32).floor() as usize).min(count.saturating_sub(1));
    let dots = (0..count)
        .map(|i| match i.cmp(&active_index) {
            std::cmp::Ordering::Less => DotState::Past,
            std::cmp::Ordering::Equal => DotState::Active,
            std::cmp::Ordering::Greater => DotState::Upcoming,
        })
        .collect();
    let visible = progress > tuning.visible_after && progress < tuning.visible_before;
    ProgressIndicator {
        opacity: if visible { 1.0 } else { 0.0 },
        active_index,
        dots,
    }
}

/// "Scroll" hint opacity: fades out over `[0, hint_end]`.
pub fn scroll_hint_opacity(progress: f32, hint_end: f32) -> f32 {
    if hint_end <= 0.0 || progress >= hint_end {
        return 0.0;
    }
    (1.0 - progress.max(0.0) / hint_end).clamp(0.0, 1.0)
}

/// One revealed fallback-grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Gallery item index.
    pub index: usize,
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Downward offset in CSS pixels, easing to 0.
    pub offset_y_px: f32,
}

/// Revealed fallback-grid cells for `count` items, in reading order.
pub fn fallback_grid(progress: f32, count: usize) -> Vec<GridCell> {
    let reveal = progress.clamp(0.0, 1.0) * count as f32;
    let last = reveal.ceil() as usize;
    (0..count)
        .take_while(|&i| i <= last)
        .map(|i| {
            let ahead = reveal - i as f32;
            GridCell {
                index: i,
                opacity: (ahead * 2.0).clamp(0.0, 1.0),
                offset_y_px: (20.0 - ahead * 20.0).clamp(0.0, 20.0),
            }
        })
        .collect()
}

/// Camera preset for `geometry` on `profile`.
pub fn camera_preset(geometry: &OrbitGeometry, profile: &DeviceProfile) -> CameraState {
    let high = profile.tier == PerformanceTier::High;
    CameraState {
        antialias: high,
        max_dpr: if high { 1.5 } else { 1.0 },
        continuous: high,
        ..CameraState::looking_at_origin(geometry.camera_z, geometry.camera_fov_degrees)
    }
}

/// A gallery item placed on the orbit this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitSlot {
    /// Gallery item index.
    pub index: usize,
    /// Billboard key.
    pub key: ObjectKey,
    /// Pose.
    pub pose: OrbitalPose,
    /// Skipped by the renderer this frame.
    pub culled: bool,
}

/// Everything the gallery section shows for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedFrame {
    /// The single progress value sampled for this frame.
    pub progress: f32,
    /// Pointer sampled for this frame.
    pub pointer: Pointer,
    /// Render mode in effect.
    pub mode: RenderMode,
    /// Title overlay.
    pub title: TitleOverlay,
    /// Side indicator.
    pub indicator: ProgressIndicator,
    /// Scroll hint opacity.
    pub scroll_hint_opacity: f32,
    /// Bottom progress bar width in percent.
    pub progress_bar_percent: f32,
    /// Orbit slots (empty in grid mode).
    pub orbit: Vec<OrbitSlot>,
    /// Grid cells (empty in 3D mode).
    pub grid: Vec<GridCell>,
    /// Show the CSS particle layer.
    pub lightweight_particles: bool,
}

/// Composition controller for one pinned gallery section.
#[derive(Debug)]
pub struct SceneComposer {
    config: ShowcaseConfig,
    profile: DeviceProfile,
    layout: OrbitalLayout,
    items: Vec<GalleryItem>,
    gate: ViewportGate,
    mode: Option<RenderMode>,
    decorators: DecoratorStack,
    epoch: u64,
    drawn: BTreeSet<ObjectKey>,
}

impl SceneComposer {
    /// Composer for `items` on `profile` using the `variant` layout.
    pub fn new(
        config: ShowcaseConfig,
        profile: DeviceProfile,
        variant: LayoutVariant,
        items: Vec<GalleryItem>,
    ) -> Self {
        Self {
            layout: OrbitalLayout::new(&config, variant),
            config,
            profile,
            items,
            gate: ViewportGate::default(),
            mode: None,
            decorators: DecoratorStack::pinned(),
            epoch: 0,
            drawn: BTreeSet::new(),
        }
    }

    /// Device profile in use.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Orbital layout in use.
    pub fn layout(&self) -> &OrbitalLayout {
        &self.layout
    }

    /// Gallery items.
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    /// Current render mode; the grid until the decision is latched.
    pub fn render_mode(&self) -> RenderMode {
        self.mode.unwrap_or(RenderMode::FallbackGrid)
    }

    /// Whether the render mode has been decided.
    pub fn is_decided(&self) -> bool {
        self.mode.is_some()
    }

    /// Feed a viewport intersection report. The first intersection latches
    /// the render mode for the lifetime of this composer.
    pub fn on_viewport_intersection(&mut self, intersecting: bool) -> RenderMode {
        if self.gate.observe(intersecting) && self.mode.is_none() {
            let mode = decide_render_mode(&self.profile, true);
            debug!(?mode, tier = ?self.profile.tier, "gallery render mode latched");
            self.mode = Some(mode);
        }
        self.render_mode()
    }

    /// The renderer could not be created or was lost: degrade for good.
    pub fn on_renderer_lost(&mut self, reason: &str) {
        if self.mode != Some(RenderMode::FallbackGrid) {
            warn!(reason, "renderer unavailable; falling back to grid");
        }
        self.mode = Some(RenderMode::FallbackGrid);
    }

    /// Number of items placed on the orbit.
    pub fn orbit_item_count(&self) -> usize {
        self.items.len().min(self.layout.geometry().max_items)
    }

    /// Camera preset for this section.
    pub fn camera(&self) -> CameraState {
        camera_preset(self.layout.geometry(), &self.profile)
    }

    /// Compose one frame from a single progress sample.
    pub fn compose(&self, progress: f32, pointer: Pointer) -> ComposedFrame {
        let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        let mode = self.render_mode();
        let (orbit, grid) = match mode {
            RenderMode::Full3D => (self.orbit_slots(progress), Vec::new()),
            RenderMode::FallbackGrid => (Vec::new(), fallback_grid(progress, self.items.len())),
        };
        ComposedFrame {
            progress,
            pointer,
            mode,
            title: title_overlay(progress, &self.config.title),
            indicator: progress_indicator(progress, self.items.len(), &self.config.indicator),
            scroll_hint_opacity: scroll_hint_opacity(
                progress,
                self.config.indicator.scroll_hint_end,
            ),
            progress_bar_percent: progress * 100.0,
            orbit,
            grid,
            lightweight_particles: self.profile.tier == PerformanceTier::Low,
        }
    }

    fn orbit_slots(&self, progress: f32) -> Vec<OrbitSlot> {
        let count = self.orbit_item_count();
        let cull = self.layout.tuning().cull_opacity;
        self.items
            .iter()
            .take(count)
            .enumerate()
            .map(|(index, item)| {
                let pose = self.layout.pose(index, count, progress, self.profile.tier);
                OrbitSlot {
                    index,
                    key: item.key(),
                    pose,
                    culled: pose.is_culled(cull),
                }
            })
            .collect()
    }

    /// Hover highlight for the billboard under the pointer, if it accepts
    /// input this frame.
    pub fn highlight(&self, frame: &ComposedFrame, hovered: Option<ObjectKey>) -> HighlightState {
        let hovered = hovered.filter(|key| {
            frame
                .orbit
                .iter()
                .any(|slot| slot.key == *key && slot.pose.interactive && !slot.culled)
        });
        HighlightState { hovered }
    }

    /// Build the scene delta for `frame`, advancing the decorators.
    ///
    /// Billboards culled or absent this frame but drawn last frame are
    /// removed. Grid mode clears whatever 3D content was drawn.
    pub fn scene_delta(&mut self, frame: &ComposedFrame, time_s: f32) -> SceneDelta {
        self.epoch += 1;
        let mut ops = Vec::new();
        let mut drawn = BTreeSet::new();
        if frame.mode == RenderMode::Full3D {
            let geometry = *self.layout.geometry();
            for slot in frame.orbit.iter().filter(|s| !s.culled) {
                let Some(item) = self.items.get(slot.index) else {
                    continue;
                };
                drawn.insert(slot.key);
                ops.push(SceneOp::UpsertBillboard(BillboardDef {
                    key: slot.key,
                    position: slot.pose.position.to_array(),
                    scale: slot.pose.scale,
                    opacity: slot.pose.opacity,
                    width_px: geometry.card_width_px,
                    height_px: geometry.card_height_px,
                    glow: slot.pose.glow,
                    interactive: slot.pose.interactive,
                    media: item.media.clone(),
                    title: item.title.clone(),
                    subtitle: item.subtitle.clone(),
                    category: item.category.clone(),
                    badge_opacity: slot.pose.badge_opacity,
                }));
            }
            for key in self.drawn.difference(&drawn) {
                ops.push(SceneOp::Remove { key: *key });
            }
            let input = MotionInput {
                time_s,
                progress: frame.progress,
                pointer: frame.pointer,
            };
            self.decorators.frame(&input, &mut ops);
        } else if !self.drawn.is_empty() {
            ops.push(SceneOp::Clear);
        }
        self.drawn = drawn;
        SceneDelta { epoch: self.epoch, ops }
    }

    /// Compose, build and present one frame on `port`.
    ///
    /// A backend failure degrades the section to the grid instead of
    /// propagating; other apply errors are returned.
    pub fn present<P: ScenePort + ?Sized>(
        &mut self,
        port: &mut P,
        progress: f32,
        pointer: Pointer,
        time_s: f32,
    ) -> Result<ComposedFrame, ApplyError> {
        let frame = self.compose(progress, pointer);
        if frame.mode != RenderMode::Full3D {
            if !self.drawn.is_empty() {
                let delta = self.scene_delta(&frame, time_s);
                if let Err(err) = port.apply_scene_delta(&delta) {
                    debug!(%err, "teardown delta not applied; renderer already gone");
                }
            }
            return Ok(frame);
        }
        let delta = self.scene_delta(&frame, time_s);
        match port.apply_scene_delta(&delta) {
            Ok(()) => {}
            Err(ApplyError::Backend(reason)) => {
                self.on_renderer_lost(&reason);
                self.drawn.clear();
                return Ok(self.compose(frame.progress, pointer));
            }
            Err(err) => return Err(err),
        }
        // The pinned camera stays put; the pointer only steers the spine.
        port.set_camera(&self.camera());
        port.render();
        Ok(frame)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::gallery::default_gallery;
    use approx::assert_relative_eq;

    fn high() -> DeviceProfile {
        DeviceProfile {
            tier: PerformanceTier::High,
            particle_budget: 80,
            enable_glow: true,
            ..DeviceProfile::default()
        }
    }

    fn composer(profile: DeviceProfile, variant: LayoutVariant) -> SceneComposer {
        SceneComposer::new(ShowcaseConfig::default(), profile, variant, default_gallery())
    }

    #[test]
    fn full_3d_needs_every_condition() {
        let p = high();
        assert_eq!(decide_render_mode(&p, true), RenderMode::Full3D);
        assert_eq!(decide_render_mode(&p, false), RenderMode::FallbackGrid);
        let no_gl = DeviceProfile { can_render_3d: false, ..p };
        assert_eq!(decide_render_mode(&no_gl, true), RenderMode::FallbackGrid);
        let low = DeviceProfile { tier: PerformanceTier::Low, ..p };
        assert_eq!(decide_render_mode(&low, true), RenderMode::FallbackGrid);
    }

    #[test]
    fn gate_fires_once() {
        let mut gate = ViewportGate::default();
        assert!(!gate.observe(false));
        assert!(gate.observe(true));
        assert!(!gate.is_connected());
        assert!(!gate.observe(true));
    }

    #[test]
    fn title_curve_shape() {
        let c = TitleCurve::default();
        assert_eq!(title_overlay(0.0, &c).opacity, 0.0);
        assert_relative_eq!(title_overlay(0.015, &c).opacity, 0.5, epsilon = 1e-5);
        assert_eq!(title_overlay(0.1, &c).opacity, 1.0);
        assert_relative_eq!(title_overlay(0.15, &c).opacity, 0.5, epsilon = 1e-5);
        assert_eq!(title_overlay(0.2, &c).opacity, 0.0);
        assert_relative_eq!(title_overlay(1.0, &c).scale, 1.15, epsilon = 1e-6);
    }

    #[test]
    fn indicator_clamps_active_dot() {
        let t = IndicatorTuning::default();
        let start = progress_indicator(0.1, 8, &t);
        assert_eq!(start.opacity, 0.0);
        assert_eq!(start.active_index, 0);
        let mid = progress_indicator(0.52, 8, &t);
        assert_eq!(mid.opacity, 1.0);
        assert_eq!(mid.active_index, 4);
        assert_eq!(mid.dots[3], DotState::Past);
        assert_eq!(mid.dots[5], DotState::Upcoming);
        assert_eq!(progress_indicator(0.86, 8, &t).active_index, 7);
        assert!(progress_indicator(0.5, 0, &t).dots.is_empty());
    }

    #[test]
    fn scroll_hint_fades_out() {
        assert_eq!(scroll_hint_opacity(0.0, 0.08), 1.0);
        assert_relative_eq!(scroll_hint_opacity(0.04, 0.08), 0.5, epsilon = 1e-6);
        assert_eq!(scroll_hint_opacity(0.08, 0.08), 0.0);
    }

    #[test]
    fn grid_reveals_in_reading_order() {
        let cells = fallback_grid(0.25, 8);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].opacity, 1.0);
        assert_eq!(cells[0].offset_y_px, 0.0);
        assert_eq!(cells[2].opacity, 0.0);
        assert_eq!(cells[2].offset_y_px, 20.0);
        assert_eq!(fallback_grid(1.0, 8).len(), 8);
        assert_eq!(fallback_grid(0.0, 8).len(), 1);
    }

    #[test]
    fn camera_preset_tracks_tier() {
        let cam = camera_preset(&OrbitGeometry::MOBILE, &DeviceProfile::default());
        assert_eq!(cam.position, [0.0, 0.0, 7.0]);
        assert_eq!(cam.fov_y_degrees, 60.0);
        assert!(!cam.antialias && !cam.continuous);
        assert_eq!(cam.max_dpr, 1.0);
        let hi = camera_preset(&OrbitGeometry::DESKTOP, &high());
        assert!(hi.antialias && hi.continuous);
        assert_eq!(hi.max_dpr, 1.5);
    }

    #[test]
    fn mode_latches_on_first_intersection() {
        let mut c = composer(high(), LayoutVariant::Desktop);
        assert_eq!(c.render_mode(), RenderMode::FallbackGrid);
        assert!(!c.is_decided());
        assert_eq!(c.on_viewport_intersection(true), RenderMode::Full3D);
        c.on_renderer_lost("context lost");
        assert_eq!(c.on_viewport_intersection(true), RenderMode::FallbackGrid);
    }

    #[test]
    fn orbit_is_capped_per_variant() {
        let mut desktop = composer(high(), LayoutVariant::Desktop);
        desktop.on_viewport_intersection(true);
        assert_eq!(desktop.compose(0.5, Pointer::CENTER).orbit.len(), 6);
        let mut mobile = composer(high(), LayoutVariant::Mobile);
        mobile.on_viewport_intersection(true);
        let frame = mobile.compose(0.5, Pointer::CENTER);
        assert_eq!(frame.orbit.len(), 4);
        assert!(frame.grid.is_empty());
        assert_eq!(frame.indicator.dots.len(), 8);
    }

    #[test]
    fn frame_uses_one_progress_sample() {
        let mut c = composer(high(), LayoutVariant::Desktop);
        c.on_viewport_intersection(true);
        let frame = c.compose(0.4, Pointer::CENTER);
        for slot in &frame.orbit {
            assert_eq!(slot.pose, c.layout().pose(slot.index, 6, 0.4, PerformanceTier::High));
        }
    }

    #[test]
    fn culled_billboards_are_removed() {
        let mut c = composer(high(), LayoutVariant::Desktop);
        c.on_viewport_intersection(true);
        let visible = c.compose(0.5, Pointer::CENTER);
        let first = c.scene_delta(&visible, 0.0);
        let upserts =
            first.ops.iter().filter(|op| matches!(op, SceneOp::UpsertBillboard(_))).count();
        assert!(upserts > 0);
        let gone = c.compose(0.99, Pointer::CENTER);
        let second = c.scene_delta(&gone, 0.016);
        let removes = second
            .ops
            .iter()
            .filter(|op| {
                matches!(op, SceneOp::Remove { key } if c.items().iter().any(|i| i.key() == *key))
            })
            .count();
        assert_eq!(removes, upserts);
        assert!(second.epoch > first.epoch);
    }

    #[test]
    fn low_tier_gets_grid_and_css_particles() {
        let low = DeviceProfile { tier: PerformanceTier::Low, ..DeviceProfile::default() };
        let mut c = composer(low, LayoutVariant::Desktop);
        assert_eq!(c.on_viewport_intersection(true), RenderMode::FallbackGrid);
        let frame = c.compose(0.5, Pointer::CENTER);
        assert!(frame.lightweight_particles);
        assert!(frame.orbit.is_empty());
        assert_eq!(frame.grid.len(), 5);
    }
}
