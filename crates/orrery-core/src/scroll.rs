// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scroll and pointer sampling.
//!
//! Raw browser events only overwrite pending values. Derived state is
//! recomputed in [`PageScrollTracker::sample`] / [`PinnedScrollTracker::sample`]
//! under a [`SamplePolicy`]: latest value wins, and a sample refused by the
//! policy leaves the pending value in place for the next eligible frame.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceProfile, PerformanceTier};

/// Pointer position normalized to the viewport, `(0.5, 0.5)` at rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    /// Horizontal position in [0, 1].
    pub x: f32,
    /// Vertical position in [0, 1].
    pub y: f32,
}

impl Pointer {
    /// Viewport centre.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Normalize client coordinates by the viewport size.
    pub fn from_client(
        client_x: f32,
        client_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) -> Self {
        let axis = |v: f32, extent: f32| {
            if extent > 0.0 && v.is_finite() {
                (v / extent).clamp(0.0, 1.0)
            } else {
                0.5
            }
        };
        Self {
            x: axis(client_x, viewport_width),
            y: axis(client_y, viewport_height),
        }
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Minimum spacing between recomputes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePolicy {
    min_interval_ms: f64,
}

impl SamplePolicy {
    /// Recompute on every frame.
    pub const EVERY_FRAME: Self = Self { min_interval_ms: 0.0 };

    /// Recompute at most once per `min_interval_ms`.
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms: min_interval_ms.max(0.0),
        }
    }

    /// Minimum interval in milliseconds.
    pub fn min_interval_ms(&self) -> f64 {
        self.min_interval_ms
    }

    /// Whether a recompute at `now_ms` is allowed after one at `last_ms`.
    pub fn admits(&self, last_ms: Option<f64>, now_ms: f64) -> bool {
        match last_ms {
            None => true,
            // A clock that went backwards (tab restore) always admits.
            Some(last) => now_ms < last || now_ms - last >= self.min_interval_ms,
        }
    }
}

/// Global page scroll progress; 0 when the page cannot scroll.
pub fn page_progress(scroll_y: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let scrollable = scroll_height - viewport_height;
    if scrollable <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    (scroll_y / scrollable).clamp(0.0, 1.0)
}

/// Viewport-relative bounding box of a page section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    /// Section id.
    pub id: String,
    /// Top edge relative to the viewport top.
    pub top: f32,
    /// Bottom edge relative to the viewport top.
    pub bottom: f32,
}

/// Last section (document order) straddling the viewport midline.
pub fn current_section(sections: &[SectionBounds], viewport_height: f32) -> Option<&str> {
    let mid = viewport_height * 0.5;
    sections
        .iter()
        .rev()
        .find(|s| s.top <= mid && s.bottom >= mid)
        .map(|s| s.id.as_str())
}

/// Page metrics captured from one scroll event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    /// Vertical scroll offset.
    pub scroll_y: f32,
    /// Total document height.
    pub scroll_height: f32,
    /// Viewport height.
    pub viewport_height: f32,
    /// Section boxes at the time of the event.
    pub sections: Vec<SectionBounds>,
}

/// Derived page-level state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// Global progress in [0, 1].
    pub progress: f32,
    /// Section under the viewport midline.
    pub current_section: Option<String>,
    /// Normalized pointer.
    pub pointer: Pointer,
}

/// Page-level tracker (progress, current section, pointer).
#[derive(Debug, Clone)]
pub struct PageScrollTracker {
    policy: SamplePolicy,
    last_sample_ms: Option<f64>,
    pending_metrics: Option<PageMetrics>,
    pending_pointer: Option<Pointer>,
    snapshot: PageSnapshot,
}

impl PageScrollTracker {
    /// Tracker with the given recompute policy.
    pub fn new(policy: SamplePolicy) -> Self {
        Self {
            policy,
            last_sample_ms: None,
            pending_metrics: None,
            pending_pointer: None,
            snapshot: PageSnapshot::default(),
        }
    }

    /// Record a scroll event.
    pub fn on_scroll(&mut self, metrics: PageMetrics) {
        self.pending_metrics = Some(metrics);
    }

    /// Record a pointer move.
    pub fn on_pointer(&mut self, pointer: Pointer) {
        self.pending_pointer = Some(pointer);
    }

    /// Whether raw input is waiting for a recompute.
    pub fn has_pending(&self) -> bool {
        self.pending_metrics.is_some() || self.pending_pointer.is_some()
    }

    /// Recompute if input is pending and the policy allows; returns whether
    /// the snapshot changed.
    pub fn sample(&mut self, now_ms: f64) -> bool {
        if !self.has_pending() || !self.policy.admits(self.last_sample_ms, now_ms) {
            return false;
        }
        self.last_sample_ms = Some(now_ms);
        let before = self.snapshot.clone();
        if let Some(m) = self.pending_metrics.take() {
            self.snapshot.progress = page_progress(m.scroll_y, m.scroll_height, m.viewport_height);
            self.snapshot.current_section =
                current_section(&m.sections, m.viewport_height).map(str::to_owned);
        }
        if let Some(p) = self.pending_pointer.take() {
            self.snapshot.pointer = p;
        }
        self.snapshot != before
    }

    /// Last derived state.
    pub fn snapshot(&self) -> &PageSnapshot {
        &self.snapshot
    }
}

/// Trigger region of a pinned section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRegion {
    /// Document offset of the section top.
    pub start: f32,
    /// Viewport height.
    pub viewport_height: f32,
    /// Scroll distance as a multiple of the viewport height.
    pub span_viewports: f32,
}

impl PinnedRegion {
    /// Scroll distance covered while pinned.
    pub fn span(&self) -> f32 {
        (self.viewport_height * self.span_viewports).max(0.0)
    }

    /// Progress through the region; monotonic in `scroll_y`.
    pub fn progress(&self, scroll_y: f32) -> f32 {
        let span = self.span();
        if span <= 0.0 || !scroll_y.is_finite() {
            return 0.0;
        }
        ((scroll_y - self.start) / span).clamp(0.0, 1.0)
    }

    /// Whether the section is held on screen at `scroll_y`.
    pub fn is_pinned(&self, scroll_y: f32) -> bool {
        scroll_y >= self.start && scroll_y <= self.start + self.span()
    }
}

/// Derived pinned-section state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PinnedSnapshot {
    /// Section progress in [0, 1].
    pub progress: f32,
    /// Section is currently pinned.
    pub pinned: bool,
    /// Normalized pointer (stays centred when tracking is off).
    pub pointer: Pointer,
}

/// Pinned-section tracker driving the orbit.
#[derive(Debug, Clone)]
pub struct PinnedScrollTracker {
    region: PinnedRegion,
    policy: SamplePolicy,
    track_pointer: bool,
    last_sample_ms: Option<f64>,
    pending_scroll_y: Option<f32>,
    pending_pointer: Option<Pointer>,
    snapshot: PinnedSnapshot,
}

impl PinnedScrollTracker {
    /// Tracker for `region`. Pointer tracking is off on the low tier.
    pub fn new(region: PinnedRegion, policy: SamplePolicy, profile: &DeviceProfile) -> Self {
        Self {
            region,
            policy,
            track_pointer: profile.tier != PerformanceTier::Low,
            last_sample_ms: None,
            pending_scroll_y: None,
            pending_pointer: None,
            snapshot: PinnedSnapshot::default(),
        }
    }

    /// Whether pointer moves are tracked at all.
    pub fn tracks_pointer(&self) -> bool {
        self.track_pointer
    }

    /// Replace the region after a layout change (resize).
    pub fn set_region(&mut self, region: PinnedRegion) {
        self.region = region;
    }

    /// Region in use.
    pub fn region(&self) -> &PinnedRegion {
        &self.region
    }

    /// Record a scroll offset.
    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.pending_scroll_y = Some(scroll_y);
    }

    /// Record a pointer move; ignored when tracking is off.
    pub fn on_pointer(&mut self, pointer: Pointer) {
        if self.track_pointer {
            self.pending_pointer = Some(pointer);
        }
    }

    /// Recompute if input is pending and the policy allows; returns whether
    /// the snapshot changed.
    pub fn sample(&mut self, now_ms: f64) -> bool {
        let pending = self.pending_scroll_y.is_some() || self.pending_pointer.is_some();
        if !pending || !self.policy.admits(self.last_sample_ms, now_ms) {
            return false;
        }
        self.last_sample_ms = Some(now_ms);
        let before = self.snapshot;
        if let Some(y) = self.pending_scroll_y.take() {
            self.snapshot.progress = self.region.progress(y);
            self.snapshot.pinned = self.region.is_pinned(y);
        }
        if let Some(p) = self.pending_pointer.take() {
            self.snapshot.pointer = p;
        }
        self.snapshot != before
    }

    /// Last derived state.
    pub fn snapshot(&self) -> PinnedSnapshot {
        self.snapshot
    }
}
