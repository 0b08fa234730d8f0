// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer-facing vocabulary for the Orrery showcase.
//!
//! `orrery-core` decides where every card, mesh and particle goes; a
//! [`ScenePort`] implementation only draws what it is told. Nothing here
//! computes a pose or reads a clock: frame timing belongs to the host and
//! every [`SceneDelta`] carries the epoch of the frame that produced it.
//!
//! Features:
//!
//! - `std` (default): link the standard library; turn off for `no_std`.
//! - `serde`: serde derives on the types that cross into JavaScript.

#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use thiserror::Error;

/// Why a port refused a delta.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// More than [`MAX_OPS`] operations in one delta.
    #[error("delta carries {0} ops, over the per-frame limit")]
    TooLarge(usize),
    /// The delta itself is malformed (NaN position, infinite scale).
    #[error("malformed delta: {0}")]
    Invariant(alloc::string::String),
    /// The port can no longer draw, typically a lost WebGL context.
    #[error("renderer unavailable: {0}")]
    Backend(alloc::string::String),
}

mod camera;
mod canon;
mod highlight;
mod port;
mod types;

pub use camera::CameraState;
pub use canon::{canonicalize_f32, canonicalize_vec3};
pub use highlight::HighlightState;
pub use port::ScenePort;
pub use types::{
    BillboardDef, ColorRgba8, Hash, MediaKind, MediaRef, MeshDef, MeshShape, ObjectKey,
    PointCloudDef, SceneDelta, SceneOp, MAX_OPS,
};
