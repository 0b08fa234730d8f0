// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs, clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]
//! Scroll a showcase session through its pinned section natively.

use orrery_core::{PlaybackCommand, RenderMode};
use orrery_dry_tests::{profile_for, DevicePreset};
use orrery_wasm::{SessionOptions, ShowcaseSession};

const SECTION_TOP: f32 = 1000.0;
const VIEWPORT_H: f32 = 800.0;

fn session(preset: DevicePreset) -> ShowcaseSession {
    let options = SessionOptions {
        viewport_width: 1440.0,
        viewport_height: VIEWPORT_H,
        section_top: SECTION_TOP,
        ..SessionOptions::default()
    };
    ShowcaseSession::new(&options, profile_for(preset)).unwrap()
}

fn scroll_to(progress: f32) -> f32 {
    SECTION_TOP + progress * VIEWPORT_H * 3.0
}

#[test]
fn full_journey_through_the_section() {
    let mut s = session(DevicePreset::Workstation);
    assert_eq!(s.on_intersection(true), RenderMode::Full3D);

    let mut now = 0.0;
    let mut last_bar = -1.0;
    let mut saw_title = false;
    let mut saw_indicator = false;
    for step in 0..=100 {
        let progress = step as f32 / 100.0;
        s.on_scroll(scroll_to(progress));
        let out = s.frame(now).unwrap();
        now += 16.0;
        assert!(out.frame.progress_bar_percent >= last_bar);
        last_bar = out.frame.progress_bar_percent;
        saw_title |= out.frame.title.opacity > 0.0;
        saw_indicator |= out.frame.indicator.opacity > 0.0;
        // Only cards that the renderer draws may take the pointer.
        for slot in &out.frame.orbit {
            if slot.culled {
                assert!(!slot.pose.interactive);
            }
        }
    }
    assert!(saw_title && saw_indicator);
    assert_eq!(last_bar, 100.0);
}

#[test]
fn grid_profile_never_emits_deltas() {
    let mut s = session(DevicePreset::BudgetPhone);
    assert_eq!(s.on_intersection(true), RenderMode::FallbackGrid);
    for step in 0..10 {
        s.on_scroll(scroll_to(step as f32 / 10.0));
        let out = s.frame(f64::from(step) * 16.0).unwrap();
        assert!(out.scene.deltas.is_empty());
        assert!(out.frame.orbit.is_empty());
        assert!(out.frame.lightweight_particles);
    }
}

#[test]
fn orbit_video_plays_only_while_hovered_in_front() {
    let mut s = session(DevicePreset::Workstation);
    s.on_intersection(true);
    let video = s.items().iter().position(|i| i.is_video()).unwrap();

    // Walk forward until the video card faces the camera.
    let mut now = 0.0;
    let mut front_at = None;
    for step in 0..=400 {
        let progress = step as f32 / 400.0;
        s.on_scroll(scroll_to(progress));
        let out = s.frame(now).unwrap();
        now += 16.0;
        let slot = out.frame.orbit[video];
        if slot.pose.is_front && slot.pose.frontness > 0.9 {
            front_at = Some(progress);
            break;
        }
    }
    assert!(front_at.is_some());

    assert_eq!(s.set_hovered_item(Some(video)), Some(PlaybackCommand::Play));
    assert_eq!(s.set_hovered_item(Some(0)), Some(PlaybackCommand::Pause));
    assert_eq!(s.set_hovered_item(None), None);
}

#[test]
fn frame_output_is_camel_case_json() {
    let mut s = session(DevicePreset::Workstation);
    s.on_intersection(true);
    s.on_scroll(scroll_to(0.5));
    let json = serde_json::to_value(s.frame(0.0).unwrap()).unwrap();
    assert!(json["frame"]["progressBarPercent"].is_number());
    assert!(json["scene"]["deltas"].is_array());
    assert_eq!(json["frame"]["mode"], "full3D");
}
