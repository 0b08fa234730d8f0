// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The [`ScenePort`] seam between composition and drawing.

use crate::{ApplyError, CameraState, HighlightState, SceneDelta};

/// Sink for composed frames.
///
/// One port backs the whole section: orbit billboards, the spine meshes and
/// particle clouds all arrive through the same [`SceneDelta`] stream. A port
/// remembers the newest epoch it applied and ignores anything not newer, so
/// replaying a frame is harmless.
pub trait ScenePort {
    /// Apply `delta` unless its epoch is stale.
    ///
    /// A port that can no longer draw reports [`ApplyError::Backend`]; the
    /// caller treats that as permanent.
    fn apply_scene_delta(&mut self, delta: &SceneDelta) -> Result<(), ApplyError>;

    /// Move the camera rig.
    fn set_camera(&mut self, camera: &CameraState);

    /// Update which billboard gets the hover lift.
    fn set_highlight(&mut self, highlight: &HighlightState);

    /// Draw what has been applied so far.
    fn render(&mut self);

    /// Surface is now `width` x `height` CSS pixels at `dpr`.
    fn resize(&mut self, width: u32, height: u32, dpr: f32);

    /// Accept epochs from zero again (after a remount). Objects stay put.
    fn reset_epoch(&mut self);

    /// Drop every object and GPU resource.
    fn dispose(&mut self);
}
