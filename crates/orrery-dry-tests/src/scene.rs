// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Headless scene port for exercising composition without a GPU.
//!
//! Tracks the live scene the way a renderer would (upserts replace, removes
//! delete, `Clear` wipes) and can simulate a lost rendering context.

use std::collections::BTreeMap;

use orrery_scene_port::{
    ApplyError, BillboardDef, CameraState, HighlightState, MeshDef, ObjectKey, PointCloudDef,
    SceneDelta, SceneOp, ScenePort,
};

/// Recording scene port.
#[derive(Debug, Default)]
pub struct RecordingScenePort {
    /// Live billboards.
    pub billboards: BTreeMap<ObjectKey, BillboardDef>,
    /// Live meshes.
    pub meshes: BTreeMap<ObjectKey, MeshDef>,
    /// Live point clouds.
    pub points: BTreeMap<ObjectKey, PointCloudDef>,
    /// Every delta accepted, in order.
    pub applied: Vec<SceneDelta>,
    /// Last camera set.
    pub camera: Option<CameraState>,
    /// Last highlight set.
    pub highlight: HighlightState,
    /// Number of `render` calls.
    pub render_count: u32,
    /// Last viewport size.
    pub viewport: Option<(u32, u32, f32)>,
    /// Whether `dispose` was called.
    pub disposed: bool,
    last_epoch: Option<u64>,
    lose_context_at: Option<u64>,
}

impl RecordingScenePort {
    /// Create an empty port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`ApplyError::Backend`] from the `n`-th applied delta on
    /// (1-based), as if the WebGL context was lost.
    pub fn lose_context_after(mut self, n: u64) -> Self {
        self.lose_context_at = Some(n);
        self
    }

    /// Total live objects.
    pub fn object_count(&self) -> usize {
        self.billboards.len() + self.meshes.len() + self.points.len()
    }

    /// Last epoch accepted.
    pub fn last_epoch(&self) -> Option<u64> {
        self.last_epoch
    }

    fn remove(&mut self, key: &ObjectKey) {
        self.billboards.remove(key);
        self.meshes.remove(key);
        self.points.remove(key);
    }

    fn clear(&mut self) {
        self.billboards.clear();
        self.meshes.clear();
        self.points.clear();
    }
}

impl ScenePort for RecordingScenePort {
    fn apply_scene_delta(&mut self, delta: &SceneDelta) -> Result<(), ApplyError> {
        if self.last_epoch.is_some_and(|last| delta.epoch <= last) {
            return Ok(());
        }
        let attempt = self.applied.len() as u64 + 1;
        if self.lose_context_at.is_some_and(|n| attempt >= n) {
            return Err(ApplyError::Backend("webgl context lost".into()));
        }
        delta.validate()?;
        for op in &delta.ops {
            match op {
                SceneOp::UpsertBillboard(b) => {
                    self.billboards.insert(b.key, b.clone());
                }
                SceneOp::UpsertMesh(m) => {
                    self.meshes.insert(m.key, *m);
                }
                SceneOp::UpsertPoints(p) => {
                    self.points.insert(p.key, p.clone());
                }
                SceneOp::Remove { key } => self.remove(key),
                SceneOp::Clear => self.clear(),
            }
        }
        self.last_epoch = Some(delta.epoch);
        self.applied.push(delta.clone());
        Ok(())
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = Some(*camera);
    }

    fn set_highlight(&mut self, highlight: &HighlightState) {
        self.highlight = *highlight;
    }

    fn render(&mut self) {
        self.render_count += 1;
    }

    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.viewport = Some((width, height, dpr));
    }

    fn reset_epoch(&mut self) {
        self.last_epoch = None;
    }

    fn dispose(&mut self) {
        self.disposed = true;
        self.clear();
        self.last_epoch = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use orrery_scene_port::MeshShape;

    fn mesh(seed: u8) -> MeshDef {
        MeshDef {
            key: ObjectKey([seed; 32]),
            shape: MeshShape::Sphere {
                radius: 1.0,
                segments: 32,
                wireframe: false,
            },
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: 1.0,
            color: [255; 4],
            emissive: [0; 4],
            emissive_intensity: 0.0,
            metalness: 0.5,
            roughness: 0.5,
            opacity: 1.0,
        }
    }

    fn delta(epoch: u64, ops: Vec<SceneOp>) -> SceneDelta {
        SceneDelta { epoch, ops }
    }

    #[test]
    fn stale_epochs_are_skipped() {
        let mut port = RecordingScenePort::new();
        port.apply_scene_delta(&delta(2, vec![SceneOp::UpsertMesh(mesh(1))]))
            .unwrap();
        port.apply_scene_delta(&delta(2, vec![SceneOp::Clear])).unwrap();
        assert_eq!(port.object_count(), 1);
        port.reset_epoch();
        port.apply_scene_delta(&delta(1, vec![SceneOp::Remove { key: ObjectKey([1; 32]) }]))
            .unwrap();
        assert_eq!(port.object_count(), 0);
    }

    #[test]
    fn lost_context_rejects_with_backend_error() {
        let mut port = RecordingScenePort::new().lose_context_after(2);
        port.apply_scene_delta(&delta(1, vec![SceneOp::UpsertMesh(mesh(1))]))
            .unwrap();
        let err = port.apply_scene_delta(&delta(2, vec![])).unwrap_err();
        assert!(matches!(err, ApplyError::Backend(_)));
        assert_eq!(port.applied.len(), 1);
    }

    #[test]
    fn dispose_wipes_scene() {
        let mut port = RecordingScenePort::new();
        port.apply_scene_delta(&delta(1, vec![SceneOp::UpsertMesh(mesh(3))]))
            .unwrap();
        port.dispose();
        assert!(port.disposed);
        assert_eq!(port.object_count(), 0);
        assert_eq!(port.last_epoch(), None);
    }
}
