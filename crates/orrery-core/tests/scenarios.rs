// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]
//! End-to-end composition runs against the recording scene port.

use approx::assert_relative_eq;
use orrery_core::composition::RenderMode;
use orrery_core::config::{LayoutVariant, ShowcaseConfig};
use orrery_core::scroll::PinnedRegion;
use orrery_core::{
    default_gallery, detect, DeviceProfile, OrbitalLayout, PerformanceTier, PinnedScrollTracker,
    PlaybackCommand, Pointer, SamplePolicy, SceneComposer, VideoGate,
};
use orrery_dry_tests::{profile_for, DevicePreset, FailingProbe, FixedProbe, RecordingScenePort};
use proptest::prelude::*;

fn composer(profile: DeviceProfile, variant: LayoutVariant) -> SceneComposer {
    SceneComposer::new(ShowcaseConfig::default(), profile, variant, default_gallery())
}

#[test]
fn front_card_pose_is_reproducible() {
    let layout = OrbitalLayout::new(&ShowcaseConfig::default(), LayoutVariant::Desktop);
    let a = layout.pose(0, 6, 0.5, PerformanceTier::High);
    let b = layout.pose(0, 6, 0.5, PerformanceTier::High);
    assert_eq!(a, b);
    assert_relative_eq!(a.position.z, a.angle.cos() * 2.4 * 0.75, epsilon = 1e-5);
}

#[test]
fn missing_webgl_forces_the_grid() {
    let profile = profile_for(DevicePreset::NoWebgl);
    assert!(!profile.can_render_3d);
    assert_eq!(profile.score, 85 - 50);

    let mut c = composer(profile, LayoutVariant::Desktop);
    assert_eq!(c.on_viewport_intersection(true), RenderMode::FallbackGrid);
    let mut port = RecordingScenePort::new();
    let frame = c.present(&mut port, 0.5, Pointer::CENTER, 0.0).unwrap();
    assert_eq!(frame.mode, RenderMode::FallbackGrid);
    // Half way through eight items reveals cells 0..=4.
    assert_eq!(frame.grid.len(), 5);
    assert!(port.applied.is_empty());
    assert_eq!(port.render_count, 0);
}

#[test]
fn desktop_orbit_draws_capped_billboards_and_spine() {
    let mut c = composer(profile_for(DevicePreset::Workstation), LayoutVariant::Desktop);
    let mut port = RecordingScenePort::new();

    // Nothing mounts before the section is near the viewport.
    let idle = c.present(&mut port, 0.5, Pointer::CENTER, 0.0).unwrap();
    assert_eq!(idle.mode, RenderMode::FallbackGrid);
    assert!(!c.is_decided());

    assert_eq!(c.on_viewport_intersection(true), RenderMode::Full3D);
    let frame = c.present(&mut port, 0.5, Pointer::CENTER, 0.016).unwrap();
    assert_eq!(frame.orbit.len(), 6);
    let visible = frame.orbit.iter().filter(|s| !s.culled).count();
    assert_eq!(port.billboards.len(), visible);
    assert!(!port.meshes.is_empty(), "spine meshes expected mid-section");
    assert_eq!(port.render_count, 1);
    let camera = port.camera.unwrap();
    assert_eq!(camera.fov_y_degrees, 55.0);
    assert!(camera.antialias);
}

#[test]
fn pinned_camera_ignores_the_pointer() {
    let mut c = composer(profile_for(DevicePreset::Workstation), LayoutVariant::Desktop);
    let mut port = RecordingScenePort::new();
    c.on_viewport_intersection(true);
    for pointer in [Pointer { x: 1.0, y: 0.0 }, Pointer { x: 0.0, y: 1.0 }] {
        c.present(&mut port, 0.5, pointer, 0.0).unwrap();
        assert_eq!(port.camera.unwrap().position, [0.0, 0.0, 5.5]);
    }
}

#[test]
fn leaving_the_window_removes_billboards() {
    let mut c = composer(profile_for(DevicePreset::Workstation), LayoutVariant::Mobile);
    let mut port = RecordingScenePort::new();
    c.on_viewport_intersection(true);
    let frame = c.present(&mut port, 0.5, Pointer::CENTER, 0.0).unwrap();
    assert_eq!(frame.orbit.len(), 4);
    assert!(!port.billboards.is_empty());

    c.present(&mut port, 0.97, Pointer::CENTER, 0.1).unwrap();
    assert!(port.billboards.is_empty());
}

#[test]
fn lost_context_degrades_to_grid_for_good() {
    let mut c = composer(profile_for(DevicePreset::Workstation), LayoutVariant::Desktop);
    let mut port = RecordingScenePort::new().lose_context_after(2);
    c.on_viewport_intersection(true);
    c.present(&mut port, 0.4, Pointer::CENTER, 0.0).unwrap();
    let frame = c.present(&mut port, 0.45, Pointer::CENTER, 0.016).unwrap();
    assert_eq!(frame.mode, RenderMode::FallbackGrid);
    assert_eq!(c.render_mode(), RenderMode::FallbackGrid);
    // Re-entering the viewport does not re-mount the renderer.
    assert_eq!(c.on_viewport_intersection(true), RenderMode::FallbackGrid);
}

#[test]
fn teardown_on_a_dead_renderer_still_yields_the_grid() {
    let mut c = composer(profile_for(DevicePreset::Workstation), LayoutVariant::Desktop);
    let mut port = RecordingScenePort::new().lose_context_after(2);
    c.on_viewport_intersection(true);
    c.present(&mut port, 0.4, Pointer::CENTER, 0.0).unwrap();
    let drawn = port.object_count();
    assert!(drawn > 0);
    c.on_renderer_lost("webglcontextlost");
    let frame = c.present(&mut port, 0.45, Pointer::CENTER, 0.016).unwrap();
    assert_eq!(frame.mode, RenderMode::FallbackGrid);
    // The refused teardown left the dead scene untouched.
    assert_eq!(port.object_count(), drawn);
}

#[test]
fn video_pauses_on_the_tick_hover_ends() {
    let layout = OrbitalLayout::new(&ShowcaseConfig::default(), LayoutVariant::Desktop);
    let index = default_gallery().iter().position(|i| i.is_video()).unwrap();
    // Find a progress where the video card faces the camera.
    let progress = (0..=1000)
        .map(|i| i as f32 / 1000.0)
        .find(|&p| layout.pose(index, 6, p, PerformanceTier::High).frontness >= 0.9)
        .unwrap();
    let pose = layout.pose(index, 6, progress, PerformanceTier::High);

    let mut gate = VideoGate::default();
    gate.update_pose(&pose);
    assert_eq!(gate.set_hovered(true), Some(PlaybackCommand::Play));
    assert_eq!(gate.set_hovered(false), Some(PlaybackCommand::Pause));
    assert!(!gate.is_playing());
}

#[test]
fn low_tier_pinned_tracker_ignores_pointer() {
    let low = detect(&FailingProbe);
    assert_eq!(low.tier, PerformanceTier::Low);
    let region = PinnedRegion {
        start: 1000.0,
        viewport_height: 800.0,
        span_viewports: 3.0,
    };
    let mut tracker = PinnedScrollTracker::new(region, SamplePolicy::EVERY_FRAME, &low);
    tracker.on_pointer(Pointer { x: 0.9, y: 0.1 });
    tracker.on_scroll(2200.0);
    assert!(tracker.sample(0.0));
    let snap = tracker.snapshot();
    assert_eq!(snap.pointer, Pointer::CENTER);
    assert_relative_eq!(snap.progress, 0.5);
    assert!(snap.pinned);

    let frame = composer(low, LayoutVariant::Desktop).compose(snap.progress, snap.pointer);
    assert!(frame.lightweight_particles);
}

proptest! {
    #[test]
    fn no_3d_profile_never_composes_full3d(
        memory in 0.5f64..32.0,
        cores in 1u32..32,
        progress in 0.0f32..=1.0,
    ) {
        let probe = FixedProbe {
            memory_gb: memory,
            cores,
            webgl: false,
            ..FixedProbe::preset(DevicePreset::Workstation)
        };
        let profile = detect(&probe);
        prop_assert!(!profile.can_render_3d);
        let mut c = composer(profile, LayoutVariant::Desktop);
        prop_assert_eq!(c.on_viewport_intersection(true), RenderMode::FallbackGrid);
        prop_assert_eq!(c.compose(progress, Pointer::CENTER).mode, RenderMode::FallbackGrid);
    }

    #[test]
    fn low_tier_never_glows(memory in 0.5f64..2.0, cores in 1u32..2) {
        let probe = FixedProbe {
            memory_gb: memory,
            cores,
            ..FixedProbe::preset(DevicePreset::BudgetPhone)
        };
        let profile = detect(&probe);
        prop_assert_eq!(profile.tier, PerformanceTier::Low);
        prop_assert!(!profile.enable_glow);
    }
}
