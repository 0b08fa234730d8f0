// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transient notifications shown after form submissions.
//!
//! Times are `Duration` offsets from page load handed in by the host; the
//! browser offers no monotonic `Instant` to wasm.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

/// Visual flavour of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ToastKind {
    /// Green check.
    Success,
    /// Neutral.
    Info,
    /// Red cross; the visitor should retry or email directly.
    Error,
}

/// Handle for dismissing a notification.
pub type ToastId = u64;

/// How long a notification stays up unless dismissed.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

/// Repeats of an identical notification closer than this collapse into one.
const REPEAT_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: ToastId,
    kind: ToastKind,
    title: String,
    body: Option<String>,
    shown_at: Duration,
    lifetime: Duration,
}

impl Entry {
    fn expires_at(&self) -> Duration {
        self.shown_at.saturating_add(self.lifetime)
    }

    fn alive_at(&self, now: Duration) -> bool {
        now < self.expires_at()
    }

    fn same_message(&self, kind: ToastKind, title: &str, body: Option<&str>) -> bool {
        self.kind == kind && self.title == title && self.body.as_deref() == body
    }
}

/// One notification as the page draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastRender {
    /// Dismiss handle.
    pub id: ToastId,
    /// Flavour.
    pub kind: ToastKind,
    /// Headline.
    pub title: String,
    /// Detail line.
    pub body: Option<String>,
    /// Remaining lifetime as a fraction; drives the countdown bar.
    pub progress: f32,
}

/// Bounded stack of notifications. The oldest is evicted when full.
#[derive(Debug)]
pub struct ToastService {
    entries: VecDeque<Entry>,
    capacity: usize,
    last_id: ToastId,
}

impl ToastService {
    /// Queue holding at most `capacity` notifications (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            last_id: 0,
        }
    }

    /// Show a notification at `now` for `ttl`.
    ///
    /// An identical message shown less than half a second ago is restarted
    /// instead of stacked, and its id is returned.
    pub fn push<S, B>(
        &mut self,
        kind: ToastKind,
        title: S,
        body: B,
        ttl: Duration,
        now: Duration,
    ) -> ToastId
    where
        S: Into<String>,
        B: Into<Option<String>>,
    {
        let title = title.into();
        let body = body.into();

        let repeat = self.entries.iter_mut().find(|entry| {
            entry.same_message(kind, &title, body.as_deref())
                && now.saturating_sub(entry.shown_at) <= REPEAT_WINDOW
        });
        if let Some(entry) = repeat {
            entry.shown_at = now;
            entry.lifetime = ttl;
            return entry.id;
        }

        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.last_id += 1;
        self.entries.push_back(Entry {
            id: self.last_id,
            kind,
            title,
            body,
            shown_at: now,
            lifetime: ttl,
        });
        self.last_id
    }

    /// Close `id`. False when it already expired or never existed.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(at) => self.entries.remove(at).is_some(),
            None => false,
        }
    }

    /// Forget notifications that have run out at `now`.
    pub fn retain_visible(&mut self, now: Duration) {
        self.entries.retain(|entry| entry.alive_at(now));
    }

    /// Notifications still up at `now`, oldest first.
    pub fn visible(&self, now: Duration) -> Vec<ToastRender> {
        self.entries
            .iter()
            .filter(|entry| entry.alive_at(now))
            .map(|entry| {
                let left = entry.expires_at().saturating_sub(now);
                ToastRender {
                    id: entry.id,
                    kind: entry.kind,
                    title: entry.title.clone(),
                    body: entry.body.clone(),
                    progress: left.as_secs_f32() / entry.lifetime.as_secs_f32(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn rapid_repeat_restarts_instead_of_stacking() {
        let mut toasts = ToastService::new(4);
        let first =
            toasts.push(ToastKind::Error, "Failed", None::<String>, DEFAULT_TOAST_TTL, ms(0));
        let again =
            toasts.push(ToastKind::Error, "Failed", None::<String>, DEFAULT_TOAST_TTL, ms(300));
        assert_eq!(first, again);
        assert_eq!(toasts.visible(ms(400)).len(), 1);
        let later =
            toasts.push(ToastKind::Error, "Failed", None::<String>, DEFAULT_TOAST_TTL, ms(1000));
        assert_ne!(first, later);
    }

    #[test]
    fn countdown_runs_out() {
        let mut toasts = ToastService::new(4);
        toasts.push(ToastKind::Success, "Message sent!", Some("body".to_owned()), ms(1000), ms(0));
        let shown = toasts.visible(ms(250));
        assert!((shown[0].progress - 0.75).abs() < 1e-6);
        toasts.retain_visible(ms(1000));
        assert!(toasts.visible(ms(1000)).is_empty());
    }

    #[test]
    fn full_queue_evicts_oldest() {
        let mut toasts = ToastService::new(2);
        let a = toasts.push(ToastKind::Info, "a", None::<String>, DEFAULT_TOAST_TTL, ms(0));
        let b = toasts.push(ToastKind::Info, "b", None::<String>, DEFAULT_TOAST_TTL, ms(0));
        toasts.push(ToastKind::Info, "c", None::<String>, DEFAULT_TOAST_TTL, ms(0));
        assert!(!toasts.dismiss(a));
        assert!(toasts.dismiss(b));
        let titles: Vec<_> = toasts.visible(ms(1)).into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["c"]);
    }
}
