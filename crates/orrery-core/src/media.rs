// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Media presentation: orbit-card video gating, image load state, and the
//! engagement-card marquee with its fullscreen video modal.
// Item counts stay far below 2^24; index-to-float casts are exact.
#![allow(clippy::cast_precision_loss)]

use std::borrow::Cow;

use orrery_scene_port::{MediaKind, MediaRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MarqueeTuning;
use crate::orbit::OrbitalPose;

/// Command the host must forward to a `<video>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackCommand {
    /// Call `play()`; a rejection is reported via [`VideoGate::on_play_rejected`].
    Play,
    /// Call `pause()`.
    Pause,
}

/// Hover-and-front playback gate for one orbit video card.
///
/// Plays only while hovered *and* in front with frontness above the
/// threshold; any change that breaks either condition pauses in the same
/// call that observed it. A rejected `play()` is not retried until the
/// conditions break and hold again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoGate {
    threshold: f32,
    hovered: bool,
    in_front: bool,
    frontness: f32,
    playing: bool,
    rejected: bool,
}

impl VideoGate {
    /// Frontness above which hovered video plays.
    pub const DEFAULT_THRESHOLD: f32 = 0.5;

    /// Gate with a custom frontness threshold.
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            hovered: false,
            in_front: false,
            frontness: 0.0,
            playing: false,
            rejected: false,
        }
    }

    /// Whether the gate believes the video is playing.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether playback conditions currently hold.
    pub fn should_play(&self) -> bool {
        self.hovered && self.in_front && self.frontness > self.threshold
    }

    /// Pointer entered or left the card.
    pub fn set_hovered(&mut self, hovered: bool) -> Option<PlaybackCommand> {
        self.hovered = hovered;
        self.reconcile()
    }

    /// New pose for the card this frame.
    pub fn update_pose(&mut self, pose: &OrbitalPose) -> Option<PlaybackCommand> {
        self.in_front = pose.is_front;
        self.frontness = pose.frontness;
        self.reconcile()
    }

    /// `play()` was rejected (autoplay policy). Swallowed; the user still
    /// has the visible controls.
    pub fn on_play_rejected(&mut self) {
        debug!("video play() rejected; leaving paused");
        self.playing = false;
        self.rejected = true;
    }

    fn reconcile(&mut self) -> Option<PlaybackCommand> {
        let wanted = self.should_play();
        if !wanted {
            self.rejected = false;
        }
        match (wanted, self.playing) {
            (true, false) if self.rejected => None,
            (true, false) => {
                self.playing = true;
                Some(PlaybackCommand::Play)
            }
            (false, true) => {
                self.playing = false;
                Some(PlaybackCommand::Pause)
            }
            _ => None,
        }
    }
}

impl Default for VideoGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

/// Loading hints for card images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHints {
    /// `loading="lazy"`.
    pub lazy: bool,
    /// `decoding="async"`.
    pub async_decode: bool,
}

/// Hints applied to every gallery image.
pub const IMAGE_HINTS: ImageHints = ImageHints {
    lazy: true,
    async_decode: true,
};

/// Text shown in place of a broken image.
pub const IMAGE_UNAVAILABLE: &str = "Image unavailable";

/// Image load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadState {
    /// Request in flight; skeleton visible.
    #[default]
    Loading,
    /// Decoded and shown.
    Loaded,
    /// Failed; textual fallback shown.
    Failed,
}

impl LoadState {
    /// `load` event.
    #[must_use]
    pub fn on_load(self) -> Self {
        match self {
            Self::Loading => Self::Loaded,
            other => other,
        }
    }

    /// `error` event.
    #[must_use]
    pub fn on_error(self) -> Self {
        if self == Self::Failed {
            return self;
        }
        debug!("image failed to load; showing fallback text");
        Self::Failed
    }

    /// Skeleton placeholder visible.
    pub fn skeleton_visible(self) -> bool {
        self == Self::Loading
    }

    /// Fallback text, if any.
    pub fn fallback_text(self) -> Option<&'static str> {
        (self == Self::Failed).then_some(IMAGE_UNAVAILABLE)
    }
}

/// Description shortened to `max_chars` characters plus `"..."`.
pub fn description_preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
    }
}

/// Engagement card with a media strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCard {
    /// Card title.
    pub title: String,
    /// Category label shown in the modal.
    pub category: String,
    /// Full description.
    pub description: String,
    /// Media strip.
    pub media: Vec<MediaRef>,
}

/// Fullscreen video modal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoModal {
    /// Video source.
    pub src: String,
    /// Muted flag.
    pub muted: bool,
}

/// Continuous horizontal marquee for one engagement card.
#[derive(Debug, Clone)]
pub struct Marquee {
    tuning: MarqueeTuning,
    media: Vec<MediaRef>,
    mobile: bool,
    offset_px: f32,
    last_ms: Option<f64>,
    hover_paused: bool,
    touch_paused: bool,
    modal: Option<VideoModal>,
    muted: bool,
    expanded: bool,
}

impl Marquee {
    /// Marquee over `media`; `mobile` selects touch instead of hover pausing.
    pub fn new(tuning: MarqueeTuning, media: Vec<MediaRef>, mobile: bool, muted: bool) -> Self {
        Self {
            tuning,
            media,
            mobile,
            offset_px: 0.0,
            last_ms: None,
            hover_paused: false,
            touch_paused: false,
            modal: None,
            muted,
            expanded: false,
        }
    }

    /// Width of one item plus its gap.
    pub fn stride_px(&self) -> f32 {
        self.tuning.item_width_px + self.tuning.gap_px
    }

    /// Width of one full pass over the media list.
    pub fn cycle_px(&self) -> f32 {
        self.media.len() as f32 * self.stride_px()
    }

    /// Whether the strip scrolls at all.
    pub fn scrolls(&self) -> bool {
        self.media.len() > 1
    }

    /// Whether scrolling is paused.
    pub fn is_paused(&self) -> bool {
        self.hover_paused || self.touch_paused || self.modal.is_some()
    }

    /// Current offset in `[0, cycle)`.
    pub fn offset_px(&self) -> f32 {
        self.offset_px
    }

    /// Advance to `now_ms`; returns the new offset.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt_ms = self.last_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_ms = Some(now_ms);
        if self.scrolls() && !self.is_paused() {
            #[allow(clippy::cast_possible_truncation)]
            let advance = (f64::from(self.tuning.speed_px_per_sec) * dt_ms / 1000.0) as f32;
            self.advance_by(advance);
        }
        self.offset_px
    }

    /// Move the strip by `px`, wrapping seamlessly.
    pub fn advance_by(&mut self, px: f32) {
        let cycle = self.cycle_px();
        if cycle > 0.0 {
            self.offset_px = (self.offset_px + px).rem_euclid(cycle);
        }
    }

    /// Rendered slots: the list twice, so the wrap point is never visible.
    /// Yields `(media index, x position)`.
    pub fn slots(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        let n = self.media.len();
        let stride = self.stride_px();
        (0..n * 2).map(move |slot| (slot % n, slot as f32 * stride - self.offset_px))
    }

    /// Pointer entered the strip (desktop only).
    pub fn on_pointer_enter(&mut self) {
        if !self.mobile {
            self.hover_paused = true;
        }
    }

    /// Pointer left the strip (desktop only).
    pub fn on_pointer_leave(&mut self) {
        if !self.mobile {
            self.hover_paused = false;
        }
    }

    /// Touch started (mobile only).
    pub fn on_touch_start(&mut self) {
        if self.mobile {
            self.touch_paused = true;
        }
    }

    /// Touch ended (mobile only).
    pub fn on_touch_end(&mut self) {
        if self.mobile {
            self.touch_paused = false;
        }
    }

    /// Click on media `index`; videos open the modal. Returns whether it
    /// opened.
    pub fn on_item_click(&mut self, index: usize) -> bool {
        match self.media.get(index) {
            Some(m) if m.kind == MediaKind::Video => {
                self.modal = Some(VideoModal {
                    src: m.src.clone(),
                    muted: self.muted,
                });
                true
            }
            _ => false,
        }
    }

    /// Open modal, if any.
    pub fn modal(&self) -> Option<&VideoModal> {
        self.modal.as_ref()
    }

    /// Toggle the modal's mute flag; returns the new value.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        if let Some(modal) = &mut self.modal {
            modal.muted = self.muted;
        }
        self.muted
    }

    /// Close the modal and resume scrolling.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.hover_paused = false;
        self.touch_paused = false;
    }

    /// Keyboard event while mounted; `Escape` closes the modal.
    pub fn on_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.modal.is_some() {
            self.close_modal();
            return true;
        }
        false
    }

    /// Toggle the description between preview and full text.
    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Description as currently shown.
    pub fn description<'a>(&self, full: &'a str) -> Cow<'a, str> {
        if self.expanded {
            Cow::Borrowed(full)
        } else {
            description_preview(full, self.tuning.preview_chars)
        }
    }
}
