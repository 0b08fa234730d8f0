// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Perspective rig shared by the hero and gallery scenes.

/// Where the renderer's perspective camera sits and how its surface is made.
///
/// Both scenes look at the world origin; pointer parallax moves `position`
/// a little each frame while everything else stays fixed for the session.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CameraState {
    /// Eye position.
    pub position: [f32; 3],
    /// Point the eye looks at.
    pub target: [f32; 3],
    /// World up.
    pub up: [f32; 3],
    /// Vertical field of view, degrees.
    pub fov_y_degrees: f32,
    /// Clip range `[near, far]`.
    pub clip: [f32; 2],
    /// Upper bound on the drawing-buffer pixel ratio.
    pub max_dpr: f32,
    /// Request a multisampled surface.
    pub antialias: bool,
    /// Redraw every animation frame instead of only after a delta.
    pub continuous: bool,
}

impl CameraState {
    /// Rig `z` units in front of the origin with a `fov_y_degrees` lens.
    pub fn looking_at_origin(z: f32, fov_y_degrees: f32) -> Self {
        Self {
            position: [0.0, 0.0, z],
            fov_y_degrees,
            ..Self::default()
        }
    }

    /// Pixel ratio to allocate for a display reporting `device_dpr`.
    pub fn surface_dpr(&self, device_dpr: f32) -> f32 {
        if device_dpr.is_finite() && device_dpr > 0.0 {
            device_dpr.min(self.max_dpr)
        } else {
            1.0
        }
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0; 3],
            up: [0.0, 1.0, 0.0],
            fov_y_degrees: 75.0,
            clip: [0.1, 1000.0],
            max_dpr: 1.0,
            antialias: false,
            continuous: false,
        }
    }
}
