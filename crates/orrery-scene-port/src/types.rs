// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core scene types for the rendering port contract.
//!
//! Pure domain objects. Wire encoding, when needed, comes from the optional
//! `serde` feature.

use alloc::string::String;
use alloc::vec::Vec;

/// 32-byte content-addressed key.
pub type Hash = [u8; 32];

/// Key for any scene object (billboard, mesh or point cloud).
///
/// Keys are derived by the composition layer from stable labels such as
/// `"orbit/3"` so the same object keeps its key across frames.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectKey(pub Hash);

impl AsRef<Hash> for ObjectKey {
    fn as_ref(&self) -> &Hash {
        &self.0
    }
}

/// RGBA color with 8-bit components.
pub type ColorRgba8 = [u8; 4];

/// Kind of media shown on a billboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Looping muted video.
    Video,
}

/// Media source attached to a billboard.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MediaRef {
    /// Source URL or asset path.
    pub src: String,
    /// Media kind.
    pub kind: MediaKind,
}

/// Camera-facing card placed in world space (a gallery item on the orbit).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BillboardDef {
    /// Unique key for this billboard.
    pub key: ObjectKey,
    /// Position in world space [x, y, z].
    pub position: [f32; 3],
    /// Uniform world scale applied to the card.
    pub scale: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Card width in CSS pixels before scaling.
    pub width_px: u32,
    /// Card height in CSS pixels before scaling.
    pub height_px: u32,
    /// Glow intensity in [0, 1]; 0 disables the glow.
    pub glow: f32,
    /// Whether the card accepts pointer input.
    pub interactive: bool,
    /// Media shown on the card.
    pub media: MediaRef,
    /// Title line.
    pub title: String,
    /// Subtitle line.
    pub subtitle: String,
    /// Category badge text.
    pub category: String,
    /// Category badge opacity in [0, 1].
    pub badge_opacity: f32,
}

/// Primitive mesh shapes used by the decorative scene.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", tag = "type"))]
pub enum MeshShape {
    /// Torus (ring).
    Torus {
        /// Ring radius.
        radius: f32,
        /// Tube radius.
        tube: f32,
        /// Radial segments around the tube.
        radial_segments: u32,
        /// Tubular segments around the ring.
        tubular_segments: u32,
    },
    /// UV sphere.
    Sphere {
        /// Sphere radius.
        radius: f32,
        /// Width and height segments.
        segments: u32,
        /// Draw as wireframe.
        wireframe: bool,
    },
    /// Capped cylinder (vertebra bodies, discs, spinal cord).
    Cylinder {
        /// Top radius.
        radius_top: f32,
        /// Bottom radius.
        radius_bottom: f32,
        /// Height.
        height: f32,
        /// Radial segments.
        segments: u32,
    },
    /// Regular octahedron.
    Octahedron {
        /// Circumradius.
        radius: f32,
    },
    /// Regular tetrahedron.
    Tetrahedron {
        /// Circumradius.
        radius: f32,
    },
}

/// Mesh definition for decorative geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MeshDef {
    /// Unique key for this mesh.
    pub key: ObjectKey,
    /// Geometry.
    pub shape: MeshShape,
    /// Position in world space.
    pub position: [f32; 3],
    /// Euler rotation (x, y, z) in radians.
    pub rotation: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
    /// Base color.
    pub color: ColorRgba8,
    /// Emissive color.
    pub emissive: ColorRgba8,
    /// Emissive intensity.
    pub emissive_intensity: f32,
    /// Metalness in [0, 1].
    pub metalness: f32,
    /// Roughness in [0, 1].
    pub roughness: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
}

/// Point cloud (particle field).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PointCloudDef {
    /// Unique key for this cloud.
    pub key: ObjectKey,
    /// Point positions in local space.
    pub positions: Vec<[f32; 3]>,
    /// Per-point RGB colors in [0, 1].
    pub colors: Vec<[f32; 3]>,
    /// Euler rotation (x, y, z) of the whole cloud.
    pub rotation: [f32; 3],
    /// Point size in world units.
    pub size: f32,
    /// Opacity in [0, 1].
    pub opacity: f32,
}

/// Scene operation.
///
/// Operations are applied in order within a [`SceneDelta`] batch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", tag = "op"))]
pub enum SceneOp {
    /// Insert or update a billboard.
    UpsertBillboard(BillboardDef),
    /// Insert or update a mesh.
    UpsertMesh(MeshDef),
    /// Insert or update a point cloud.
    UpsertPoints(PointCloudDef),
    /// Remove any object by key.
    Remove {
        /// Key of the object to remove.
        key: ObjectKey,
    },
    /// Clear the entire scene.
    Clear,
}

impl SceneOp {
    /// Key targeted by this op, if any.
    pub fn key(&self) -> Option<ObjectKey> {
        match self {
            Self::UpsertBillboard(b) => Some(b.key),
            Self::UpsertMesh(m) => Some(m.key),
            Self::UpsertPoints(p) => Some(p.key),
            Self::Remove { key } => Some(*key),
            Self::Clear => None,
        }
    }
}

/// Maximum number of operations allowed in a single [`SceneDelta`].
///
/// A frame never needs more than a few dozen ops; anything beyond this is a
/// runaway producer.
pub const MAX_OPS: usize = 4_096;

/// Scene delta: the batch of operations produced by one frame.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SceneDelta {
    /// Frame counter (monotonically increasing per port).
    pub epoch: u64,
    /// Operations to apply.
    pub ops: Vec<SceneOp>,
}

impl SceneDelta {
    /// Validate the batch size and reject non-finite transforms.
    pub fn validate(&self) -> Result<(), crate::ApplyError> {
        if self.ops.len() > MAX_OPS {
            return Err(crate::ApplyError::TooLarge(self.ops.len()));
        }
        for op in &self.ops {
            let finite = match op {
                SceneOp::UpsertBillboard(b) => {
                    crate::canonicalize_vec3(b.position).is_some()
                        && b.scale.is_finite()
                        && b.opacity.is_finite()
                }
                SceneOp::UpsertMesh(m) => {
                    crate::canonicalize_vec3(m.position).is_some()
                        && crate::canonicalize_vec3(m.rotation).is_some()
                        && m.scale.is_finite()
                }
                SceneOp::UpsertPoints(p) => crate::canonicalize_vec3(p.rotation).is_some(),
                SceneOp::Remove { .. } | SceneOp::Clear => true,
            };
            if !finite {
                return Err(crate::ApplyError::Invariant(String::from(
                    "non-finite transform in scene op",
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_delta_is_rejected() {
        let delta = SceneDelta {
            epoch: 1,
            ops: alloc::vec![SceneOp::Clear; MAX_OPS + 1],
        };
        assert_eq!(delta.validate(), Err(crate::ApplyError::TooLarge(MAX_OPS + 1)));
    }

    #[test]
    fn nan_mesh_position_is_rejected() {
        let mesh = MeshDef {
            key: ObjectKey([7; 32]),
            shape: MeshShape::Octahedron { radius: 0.4 },
            position: [f32::NAN, 0.0, 0.0],
            rotation: [0.0; 3],
            scale: 1.0,
            color: [0, 217, 255, 255],
            emissive: [0, 217, 255, 255],
            emissive_intensity: 0.2,
            metalness: 0.9,
            roughness: 0.1,
            opacity: 1.0,
        };
        let delta = SceneDelta {
            epoch: 1,
            ops: alloc::vec![SceneOp::UpsertMesh(mesh)],
        };
        assert!(matches!(
            delta.validate(),
            Err(crate::ApplyError::Invariant(_))
        ));
    }

    #[test]
    fn op_key_matches_target() {
        let key = ObjectKey([1; 32]);
        assert_eq!(SceneOp::Remove { key }.key(), Some(key));
        assert_eq!(SceneOp::Clear.key(), None);
    }
}
