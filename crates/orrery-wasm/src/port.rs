// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! [`ScenePort`] adapter that buffers one frame of calls for the JS renderer.
//!
//! The composer drives the port synchronously during `frame()`; the wrapper
//! then drains [`PendingScene`] and hands it to the page as a plain object.
//! A lost WebGL context is reported by the page and turns every later apply
//! into [`ApplyError::Backend`].

use orrery_scene_port::{ApplyError, CameraState, HighlightState, SceneDelta, ScenePort};
use serde::Serialize;

/// Viewport size requested by the composer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
    /// Device pixel ratio.
    pub dpr: f32,
}

/// Everything the renderer must do before the next paint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingScene {
    /// Deltas to apply, in order.
    pub deltas: Vec<SceneDelta>,
    /// Camera to use, when it changed.
    pub camera: Option<CameraState>,
    /// Hover highlight, when it was set.
    pub highlight: Option<HighlightState>,
    /// Draw a frame.
    pub render: bool,
    /// Resize the drawing buffer.
    pub viewport: Option<Viewport>,
    /// Tear the scene graph down.
    pub dispose: bool,
}

impl PendingScene {
    /// Whether there is nothing to forward.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Buffering scene port.
#[derive(Debug, Default)]
pub struct BufferingPort {
    pending: PendingScene,
    last_epoch: Option<u64>,
    lost: Option<String>,
}

impl BufferingPort {
    /// Empty port.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page reported the rendering context gone.
    pub fn mark_lost(&mut self, reason: &str) {
        self.lost = Some(reason.to_owned());
        self.pending.deltas.clear();
        self.pending.render = false;
    }

    /// Whether the context was reported lost.
    pub fn is_lost(&self) -> bool {
        self.lost.is_some()
    }

    /// Drain the buffered calls.
    pub fn take(&mut self) -> PendingScene {
        std::mem::take(&mut self.pending)
    }
}

impl ScenePort for BufferingPort {
    fn apply_scene_delta(&mut self, delta: &SceneDelta) -> Result<(), ApplyError> {
        if let Some(reason) = &self.lost {
            return Err(ApplyError::Backend(reason.clone()));
        }
        if self.last_epoch.is_some_and(|last| delta.epoch <= last) {
            return Ok(());
        }
        delta.validate()?;
        self.last_epoch = Some(delta.epoch);
        self.pending.deltas.push(delta.clone());
        Ok(())
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.pending.camera = Some(*camera);
    }

    fn set_highlight(&mut self, highlight: &HighlightState) {
        self.pending.highlight = Some(*highlight);
    }

    fn render(&mut self) {
        if self.lost.is_none() {
            self.pending.render = true;
        }
    }

    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.pending.viewport = Some(Viewport { width, height, dpr });
    }

    fn reset_epoch(&mut self) {
        self.last_epoch = None;
    }

    fn dispose(&mut self) {
        self.pending = PendingScene {
            dispose: true,
            ..PendingScene::default()
        };
        self.last_epoch = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use orrery_scene_port::SceneOp;

    fn delta(epoch: u64) -> SceneDelta {
        SceneDelta {
            epoch,
            ops: vec![SceneOp::Clear],
        }
    }

    #[test]
    fn buffers_until_drained() {
        let mut port = BufferingPort::new();
        port.apply_scene_delta(&delta(1)).unwrap();
        port.apply_scene_delta(&delta(2)).unwrap();
        port.render();
        let scene = port.take();
        assert_eq!(scene.deltas.len(), 2);
        assert!(scene.render);
        assert!(port.take().is_empty());
    }

    #[test]
    fn stale_epochs_are_skipped() {
        let mut port = BufferingPort::new();
        port.apply_scene_delta(&delta(3)).unwrap();
        port.apply_scene_delta(&delta(3)).unwrap();
        port.apply_scene_delta(&delta(2)).unwrap();
        assert_eq!(port.take().deltas.len(), 1);
        port.reset_epoch();
        port.apply_scene_delta(&delta(1)).unwrap();
        assert_eq!(port.take().deltas.len(), 1);
    }

    #[test]
    fn lost_context_fails_applies_and_drops_buffer() {
        let mut port = BufferingPort::new();
        port.apply_scene_delta(&delta(1)).unwrap();
        port.mark_lost("context lost");
        assert_eq!(
            port.apply_scene_delta(&delta(2)),
            Err(ApplyError::Backend("context lost".into()))
        );
        port.render();
        assert!(port.take().is_empty());
    }

    #[test]
    fn dispose_replaces_pending_work() {
        let mut port = BufferingPort::new();
        port.apply_scene_delta(&delta(1)).unwrap();
        port.resize(800, 600, 2.0);
        port.dispose();
        let scene = port.take();
        assert!(scene.dispose);
        assert!(scene.deltas.is_empty() && scene.viewport.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let mut port = BufferingPort::new();
        port.set_highlight(&HighlightState::default());
        let json = serde_json::to_value(port.take()).unwrap();
        assert!(json.get("highlight").is_some());
        assert_eq!(json["render"], false);
    }
}
