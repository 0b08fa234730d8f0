// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pinned gallery session: one composer, one tracker, one buffering port.

use orrery_app_core::prefs::ShowcasePrefs;
use orrery_core::composition::ComposedFrame;
use orrery_core::scroll::{PinnedRegion, PinnedScrollTracker};
use orrery_core::{
    default_gallery, DeviceProfile, GalleryItem, PlaybackCommand, Pointer, RenderMode,
    SamplePolicy, SceneComposer, ShowcaseConfig, ShowcaseConfigError, VideoGate,
};
use orrery_scene_port::{ApplyError, ObjectKey, ScenePort};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::port::{BufferingPort, PendingScene};

/// Failure raised by a showcase session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The host passed a config override that does not parse or validate.
    #[error(transparent)]
    Config(#[from] ShowcaseConfigError),
    /// A scene delta was rejected for a reason other than a lost context.
    #[error(transparent)]
    Scene(#[from] ApplyError),
}

/// Construction options passed by the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// Viewport width in CSS pixels.
    pub viewport_width: f32,
    /// Viewport height in CSS pixels.
    pub viewport_height: f32,
    /// Document offset of the pinned section.
    pub section_top: f32,
    /// Optional `ShowcaseConfig` override as JSON text.
    pub config: Option<String>,
    /// Saved preferences.
    pub prefs: ShowcasePrefs,
}

/// Output of one animation frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    /// Composed overlay state.
    pub frame: ComposedFrame,
    /// Renderer work for this frame.
    pub scene: PendingScene,
    /// Command for the orbit video, if its playback state changed.
    pub playback: Option<PlaybackCommand>,
    /// Section is pinned on screen.
    pub pinned: bool,
}

/// Gallery section state owned by one `ShowcaseController`.
#[derive(Debug)]
pub struct ShowcaseSession {
    composer: SceneComposer,
    tracker: PinnedScrollTracker,
    port: BufferingPort,
    video: VideoGate,
    video_slot: Option<usize>,
    hovered: Option<ObjectKey>,
    span_viewports: f32,
    started_ms: Option<f64>,
}

impl ShowcaseSession {
    /// Session for the detected profile, shaped by the saved prefs.
    pub fn new(options: &SessionOptions, detected: DeviceProfile) -> Result<Self, SessionError> {
        let config = match options.config.as_deref() {
            Some(json) => ShowcaseConfig::from_json(json)?,
            None => ShowcaseConfig::default(),
        };
        let profile = options.prefs.apply(detected);
        let variant = options.prefs.layout_for(options.viewport_width);
        let region = PinnedRegion {
            start: options.section_top,
            viewport_height: options.viewport_height,
            span_viewports: config.scroll.pinned_span_viewports,
        };
        let tracker = PinnedScrollTracker::new(
            region,
            SamplePolicy::new(config.scroll.pinned_sample_interval_ms),
            &profile,
        );
        let composer = SceneComposer::new(config, profile, variant, default_gallery());
        let video_slot = composer
            .items()
            .iter()
            .take(composer.orbit_item_count())
            .position(GalleryItem::is_video);
        debug!(?variant, tier = ?profile.tier, "showcase session created");
        Ok(Self {
            composer,
            tracker,
            port: BufferingPort::new(),
            video: VideoGate::default(),
            video_slot,
            hovered: None,
            span_viewports: config.scroll.pinned_span_viewports,
            started_ms: None,
        })
    }

    /// Profile in effect after prefs were applied.
    pub fn profile(&self) -> &DeviceProfile {
        self.composer.profile()
    }

    /// Gallery items, in orbit order.
    pub fn items(&self) -> &[GalleryItem] {
        self.composer.items()
    }

    /// Current render mode.
    pub fn render_mode(&self) -> RenderMode {
        self.composer.render_mode()
    }

    /// Record the window scroll offset.
    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.tracker.on_scroll(scroll_y);
    }

    /// Record a pointer move in client coordinates.
    pub fn on_pointer(
        &mut self,
        client_x: f32,
        client_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) {
        self.tracker
            .on_pointer(Pointer::from_client(client_x, client_y, viewport_width, viewport_height));
    }

    /// Intersection observer report for the section.
    pub fn on_intersection(&mut self, intersecting: bool) -> RenderMode {
        self.composer.on_viewport_intersection(intersecting)
    }

    /// Viewport or layout changed.
    pub fn on_resize(&mut self, width: u32, height: u32, dpr: f32, section_top: f32) {
        #[allow(clippy::cast_precision_loss)]
        let viewport_height = height as f32;
        self.tracker.set_region(PinnedRegion {
            start: section_top,
            viewport_height,
            span_viewports: self.span_viewports,
        });
        let dpr = self.composer.camera().surface_dpr(dpr);
        self.port.resize(width, height, dpr);
    }

    /// The page lost its WebGL context; the section stays on the grid.
    pub fn on_context_lost(&mut self, reason: &str) {
        self.port.mark_lost(reason);
        self.composer.on_renderer_lost(reason);
    }

    /// Pointer now over the orbit card for `item`, or over none.
    pub fn set_hovered_item(&mut self, item: Option<usize>) -> Option<PlaybackCommand> {
        self.hovered = item.and_then(|i| self.composer.items().get(i)).map(GalleryItem::key);
        let video_hovered = match (item, self.video_slot) {
            (Some(i), Some(v)) => i == v,
            _ => false,
        };
        self.video.set_hovered(video_hovered)
    }

    /// The page's `play()` promise rejected.
    pub fn on_play_rejected(&mut self) {
        self.video.on_play_rejected();
    }

    /// Advance one animation frame at host time `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> Result<FrameOutput, SessionError> {
        let started = *self.started_ms.get_or_insert(now_ms);
        self.tracker.sample(now_ms);
        let snapshot = self.tracker.snapshot();
        #[allow(clippy::cast_possible_truncation)]
        let time_s = ((now_ms - started).max(0.0) / 1000.0) as f32;

        let frame = self
            .composer
            .present(&mut self.port, snapshot.progress, snapshot.pointer, time_s)?;
        if frame.mode == RenderMode::Full3D {
            let highlight = self.composer.highlight(&frame, self.hovered);
            self.port.set_highlight(&highlight);
        }
        let playback = match self.video_slot.and_then(|i| frame.orbit.get(i)) {
            Some(slot) => self.video.update_pose(&slot.pose),
            // Grid mode or no video on the orbit: never leave it playing.
            None => self.video.set_hovered(false),
        };
        Ok(FrameOutput {
            frame,
            scene: self.port.take(),
            playback,
            pinned: snapshot.pinned,
        })
    }
}
