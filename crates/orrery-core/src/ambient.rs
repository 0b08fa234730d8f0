// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ambient motion decorators.
//!
//! Each decorator turns `(time, progress, pointer)` into a plain pose and then
//! renders that pose as scene ops. A [`DecoratorStack`] owns the decorators
//! registered for one canvas and runs them in order every frame.
// Particle and vertebra counts are tiny; index-to-float casts are exact.
#![allow(clippy::cast_precision_loss)]

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};

use glam::{Quat, Vec3};
use orrery_scene_port::{
    CameraState, ColorRgba8, MeshDef, MeshShape, ObjectKey, PointCloudDef, SceneOp,
};
use serde::{Deserialize, Serialize};

use crate::device::{DeviceProfile, PerformanceTier};
use crate::scroll::Pointer;
use crate::seed::{object_key, SeededUnit};

/// Per-frame input shared by every decorator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionInput {
    /// Seconds since the scene was mounted.
    pub time_s: f32,
    /// Scroll progress in [0, 1].
    pub progress: f32,
    /// Normalized pointer.
    pub pointer: Pointer,
}

/// Pose computed by a decorator for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoratorPose {
    /// Nothing to draw; previously drawn objects are removed.
    Hidden,
    /// Metallic ring.
    Ring(RingPose),
    /// Central globe.
    Globe(GlobePose),
    /// Particle field.
    Particles(ParticlePose),
    /// Floating shapes.
    Shapes(Vec<ShapePose>),
    /// Spine skeleton.
    Spine(SpinePose),
}

/// A visual variant driven by time, progress and pointer.
pub trait Decorator {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Compute this frame's pose. May advance internal easing state.
    fn compute_pose(&mut self, input: &MotionInput) -> DecoratorPose;

    /// Append scene ops for `pose`.
    fn render(&self, pose: &DecoratorPose, out: &mut Vec<SceneOp>);
}

#[derive(Debug, Clone, Copy)]
struct Material {
    color: ColorRgba8,
    emissive: ColorRgba8,
    emissive_intensity: f32,
    metalness: f32,
    roughness: f32,
    opacity: f32,
}

impl Material {
    fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    fn mesh(
        self,
        key: ObjectKey,
        shape: MeshShape,
        position: Vec3,
        rotation: Vec3,
        scale: f32,
    ) -> SceneOp {
        SceneOp::UpsertMesh(MeshDef {
            key,
            shape,
            position: position.to_array(),
            rotation: rotation.to_array(),
            scale,
            color: self.color,
            emissive: self.emissive,
            emissive_intensity: self.emissive_intensity,
            metalness: self.metalness,
            roughness: self.roughness,
            opacity: self.opacity,
        })
    }
}

const CYAN: ColorRgba8 = [0x00, 0xd9, 0xff, 0xff];
const TEAL: ColorRgba8 = [0x4e, 0xcd, 0xc4, 0xff];
const GREEN: ColorRgba8 = [0x00, 0xff, 0x88, 0xff];
const NEAR_BLACK: ColorRgba8 = [0x0a, 0x0a, 0x0a, 0xff];
const SPINE_CYAN: ColorRgba8 = [0x00, 0xd4, 0xff, 0xff];
const DISC_GREEN: ColorRgba8 = [0x00, 0xe5, 0xaa, 0xff];
const CORD_GREEN: ColorRgba8 = [0x00, 0xff, 0xcc, 0xff];

fn segments_for(high: bool, hi: u32, lo: u32) -> u32 {
    if high {
        hi
    } else {
        lo
    }
}

// ---------------------------------------------------------------------------
// Ring

/// Pose of the metallic ring pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPose {
    /// Outer ring Euler rotation.
    pub outer_rotation: Vec3,
    /// Outer ring scale.
    pub outer_scale: f32,
    /// Inner ring Euler rotation (high tier only).
    pub inner_rotation: Option<Vec3>,
}

/// Outer torus plus, on the high tier, a tilted inner torus.
#[derive(Debug, Clone)]
pub struct MetallicRing {
    high: bool,
    outer: ObjectKey,
    inner: ObjectKey,
}

impl MetallicRing {
    const OUTER: Material = Material {
        color: TEAL,
        emissive: CYAN,
        emissive_intensity: 0.15,
        metalness: 0.95,
        roughness: 0.1,
        opacity: 1.0,
    };
    const INNER: Material = Material {
        color: GREEN,
        emissive: GREEN,
        emissive_intensity: 0.1,
        metalness: 0.9,
        roughness: 0.15,
        opacity: 1.0,
    };

    /// Ring for `tier`.
    pub fn new(tier: PerformanceTier) -> Self {
        Self {
            high: tier == PerformanceTier::High,
            outer: object_key("ring", "outer"),
            inner: object_key("ring", "inner"),
        }
    }
}

impl Decorator for MetallicRing {
    fn name(&self) -> &'static str {
        "ring"
    }

    fn compute_pose(&mut self, input: &MotionInput) -> DecoratorPose {
        let t = input.time_s;
        let (px, py) = (input.pointer.x - 0.5, input.pointer.y - 0.5);
        let outer_rotation = Vec3::new(
            py * 0.5 + (t * 0.2).sin() * 0.1,
            px * 0.5 + t * 0.15,
            input.progress * TAU,
        );
        let inner_rotation = self.high.then(|| {
            Vec3::new(
                FRAC_PI_3 - t * 0.1 + py * 0.3,
                t * 0.2 + px * 0.3,
                0.0,
            )
        });
        DecoratorPose::Ring(RingPose {
            outer_rotation,
            outer_scale: 1.0 + input.progress * 0.3,
            inner_rotation,
        })
    }

    fn render(&self, pose: &DecoratorPose, out: &mut Vec<SceneOp>) {
        let DecoratorPose::Ring(pose) = pose else {
            out.push(SceneOp::Remove { key: self.outer });
            out.push(SceneOp::Remove { key: self.inner });
            return;
        };
        let tubular_segments = segments_for(self.high, 64, 32);
        out.push(Self::OUTER.mesh(
            self.outer,
            MeshShape::Torus { radius: 2.0, tube: 0.08, radial_segments: 16, tubular_segments },
            Vec3::ZERO,
            pose.outer_rotation,
            pose.outer_scale,
        ));
        match pose.inner_rotation {
            Some(rotation) => out.push(Self::INNER.mesh(
                self.inner,
                MeshShape::Torus { radius: 1.5, tube: 0.05, radial_segments: 16, tubular_segments },
                Vec3::ZERO,
                rotation,
                1.0,
            )),
            None => out.push(SceneOp::Remove { key: self.inner }),
        }
    }
}

// ---------------------------------------------------------------------------
// Globe

/// Pose of the central globe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobePose {
    /// Solid sphere rotation.
    pub solid_rotation: Vec3,
    /// Wireframe shell rotation.
    pub wire_rotation: Vec3,
}

/// Dark solid sphere inside a counter-rotating wireframe shell.
#[derive(Debug, Clone)]
pub struct CentralGlobe {
    high: bool,
    solid: ObjectKey,
    wire: ObjectKey,
}

impl CentralGlobe {
    const SOLID: Material = Material {
        color: NEAR_BLACK,
        emissive: CYAN,
        emissive_intensity: 0.1,
        metalness: 0.8,
        roughness: 0.2,
        opacity: 1.0,
    };
    const WIRE: Material = Material {
        color: CYAN,
        emissive: CYAN,
        emissive_intensity: 0.0,
        metalness: 0.0,
        roughness: 1.0,
        opacity: 0.4,
    };

    /// Globe for `tier`.
    pub fn new(tier: PerformanceTier) -> Self {
        Self {
            high: tier == PerformanceTier::High,
            solid: object_key("globe", "solid"),
            wire: object_key("globe", "wire"),
        }
    }
}

impl Decorator for CentralGlobe {
    fn name(&self) -> &'static str {
        "globe"
    }

    fn compute_pose(&mut self, input: &MotionInput) -> DecoratorPose {
        let t = input.time_s;
        DecoratorPose::Globe(GlobePose {
            solid_rotation: Vec3::new((input.pointer.y - 0.5) * 0.2, t * 0.1, 0.0),
            wire_rotation: Vec3::new(t * 0.05, -t * 0.08, 0.0),
        })
    }

    fn render(&self, pose: &DecoratorPose, out: &mut Vec<SceneOp>) {
        let DecoratorPose::Globe(pose) = pose else {
            out.push(SceneOp::Remove { key: self.solid });
            out.push(SceneOp::Remove { key: self.wire });
            return;
        };
        let segments = segments_for(self.high, 32, 16);
        out.push(Self::SOLID.mesh(
            self.solid,
            MeshShape::Sphere { radius: 0.8, segments, wireframe: false },
            Vec3::ZERO,
            pose.solid_rotation,
            1.0,
        ));
        out.push(Self::WIRE.mesh(
            self.wire,
            MeshShape::Sphere { radius: 0.85, segments: 12, wireframe: true },
            Vec3::ZERO,
            pose.wire_rotation,
            1.0,
        ));
    }
}

// ---------------------------------------------------------------------------
// Particles

/// Pose of the particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePose {
    /// Whole-cloud rotation.
    pub rotation: Vec3,
}

/// Seeded particles on a spherical shell, slowly spinning with scroll.
#[derive(Debug, Clone)]
pub struct ParticleField {
    key: ObjectKey,
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleField {
    /// Inner shell radius.
    pub const MIN_RADIUS: f32 = 3.0;
    /// Outer shell radius.
    pub const MAX_RADIUS: f32 = 8.0;

    /// Field with `count` particles drawn from `seed`.
    pub fn new(count: u32, seed: u64) -> Self {
        let rng = SeededUnit::new(seed);
        let mut positions = Vec::with_capacity(count as usize);
        let mut colors = Vec::with_capacity(count as usize);
        for i in 0..count {
            let theta = rng.unit("particle.theta", i) * TAU;
            let phi = (2.0 * rng.unit("particle.phi", i) - 1.0).clamp(-1.0, 1.0).acos();
            let radius = rng.range("particle.radius", i, Self::MIN_RADIUS, Self::MAX_RADIUS);
            positions.push([
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ]);
            // Blend between cyan and green.
            let mix = rng.unit("particle.color", i);
            colors.push([0.0, mix + (1.0 - mix) * 0.85, mix * 0.53 + (1.0 - mix)]);
        }
        Self {
            key: object_key("particles", "field"),
            positions,
            colors,
        }
    }

    /// Local particle positions.
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }
}

impl Decorator for ParticleField {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn compute_pose(&mut self, input: &MotionInput) -> DecoratorPose {
        let t = input.time_s;
        DecoratorPose::Particles(ParticlePose {
            rotation: Vec3::new((t * 0.1).sin() * 0.1, input.progress * PI + t * 0.02, 0.0),
        })
    }

    fn render(&self, pose: &DecoratorPose, out: &mut Vec<SceneOp>) {
        let DecoratorPose::Particles(pose) = pose else {
            out.push(SceneOp::Remove { key: self.key });
            return;
        };
        out.push(SceneOp::UpsertPoints(PointCloudDef {
            key: self.key,
            positions: self.positions.clone(),
            colors: self.colors.clone(),
            rotation: pose.rotation.to_array(),
            size: 0.04,
            opacity: 0.7,
        }));
    }
}

// ---------------------------------------------------------------------------
// Floating shapes

/// Pose of one floating shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePose {
    /// World position.
    pub position: Vec3,
    /// Euler rotation.
    pub rotation: Vec3,
}

/// An octahedron and a tetrahedron bobbing beside the globe (high tier only).
#[derive(Debug, Clone)]
pub struct FloatingShapes {
    keys: [ObjectKey; 2],
}

impl FloatingShapes {
    const ANCHORS: [Vec3; 2] = [Vec3::new(-3.0, 1.0, -2.0), Vec3::new(3.0, -1.0, -1.0)];
    const SHAPES: [MeshShape; 2] = [
        MeshShape::Octahedron { radius: 0.4 },
        MeshShape::Tetrahedron { radius: 0.5 },
    ];
    const MATERIALS: [Material; 2] = [
        Material {
            color: CYAN,
            emissive: CYAN,
            emissive_intensity: 0.2,
            metalness: 0.9,
            roughness: 0.1,
            opacity: 1.0,
        },
        Material {
            color: GREEN,
            emissive: GREEN,
            emissive_intensity: 0.2,
            metalness: 0.9,
            roughness: 0.1,
            opacity: 1.0,
        },
    ];

    /// Both shapes.
    pub fn new() -> Self {
        Self {
            keys: [object_key("shapes", "octahedron"), object_key("shapes", "tetrahedron")],
        }
    }
}

impl Default for FloatingShapes {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorator for FloatingShapes {
    fn name(&self) -> &'static str {
        "shapes"
    }

    fn compute_pose(&mut self, input: &MotionInput) -> DecoratorPose {
        let t = input.time_s;
        let poses = Self::ANCHORS
            .iter()
            .enumerate()
            .map(|(i, anchor)| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                ShapePose {
                    position: Vec3::new(anchor.x, (t * 0.3 + i as f32).sin() * 0.5, anchor.z),
                    rotation: Vec3::new(t * 0.2 * sign, -t * 0.1 * sign, 0.0),
                }
            })
            .collect();
        DecoratorPose::Shapes(poses)
    }

    fn render(&self, pose: &DecoratorPose, out: &mut Vec<SceneOp>) {
        let DecoratorPose::Shapes(poses) = pose else {
            out.extend(self.keys.iter().map(|&key| SceneOp::Remove { key }));
            return;
        };
        for (i, p) in poses.iter().enumerate().take(self.keys.len()) {
            let material = Self::MATERIALS[i];
            out.push(material.mesh(self.keys[i], Self::SHAPES[i], p.position, p.rotation, 1.0));
        }
    }
}

// ---------------------------------------------------------------------------
// Spine

/// Vertebra region; drives body proportions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertebraKind {
    /// Neck.
    Cervical,
    /// Upper back.
    Thoracic,
    /// Lower back.
    Lumbar,
}

impl VertebraKind {
    fn body(self) -> (f32, f32) {
        match self {
            Self::Cervical => (0.10, 0.06),
            Self::Thoracic => (0.14, 0.09),
            Self::Lumbar => (0.18, 0.11),
        }
    }
}

/// One vertebra in spine-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertebra {
    /// Vertical offset.
    pub y: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Region.
    pub kind: VertebraKind,
}

/// Pose of the spine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinePose {
    /// Fade factor in (0, 1].
    pub visibility: f32,
    /// Eased rotation about Y.
    pub rotation_y: f32,
}

/// Stylized vertebral column in the pinned gallery section.
#[derive(Debug, Clone)]
pub struct SpineSkeleton {
    vertebrae: Vec<Vertebra>,
    rotation_y: f32,
}

impl SpineSkeleton {
    /// Vertebra count.
    pub const VERTEBRAE: usize = 15;
    /// Vertical spacing between vertebrae.
    pub const SPACING: f32 = 0.45;
    /// Fraction of the remaining rotation covered per frame.
    pub const EASING: f32 = 0.03;

    const BODY: Material = Material {
        color: SPINE_CYAN,
        emissive: SPINE_CYAN,
        emissive_intensity: 0.5,
        metalness: 0.4,
        roughness: 0.35,
        opacity: 0.9,
    };
    const DISC: Material = Material {
        color: DISC_GREEN,
        emissive: DISC_GREEN,
        emissive_intensity: 0.3,
        metalness: 0.15,
        roughness: 0.55,
        opacity: 0.7,
    };
    const CORD: Material = Material {
        color: CORD_GREEN,
        emissive: CORD_GREEN,
        emissive_intensity: 0.0,
        metalness: 0.0,
        roughness: 1.0,
        opacity: 0.5,
    };

    /// Spine at rest.
    pub fn new() -> Self {
        let n = Self::VERTEBRAE as f32;
        let vertebrae = (0..Self::VERTEBRAE)
            .map(|i| {
                let u = i as f32 / n;
                let (kind, scale) = if u < 0.25 {
                    (VertebraKind::Cervical, 0.6 + u * 1.6)
                } else if u < 0.75 {
                    (VertebraKind::Thoracic, 0.8 + (u - 0.25) * 0.6)
                } else {
                    (VertebraKind::Lumbar, 1.0 + (u - 0.75) * 0.8)
                };
                Vertebra { y: 3.0 - i as f32 * Self::SPACING, scale, kind }
            })
            .collect();
        Self { vertebrae, rotation_y: 0.0 }
    }

    /// Vertebrae in spine-local space.
    pub fn vertebrae(&self) -> &[Vertebra] {
        &self.vertebrae
    }

    /// Fade factor: ramps in over [0, 0.1] and out over [0.9, 1].
    pub fn visibility(progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);
        if p < 0.10 {
            p / 0.10
        } else if p > 0.90 {
            (1.0 - p) / 0.10
        } else {
            1.0
        }
    }

    /// Discs between every other vertebra: `(y, scale)`.
    pub fn discs(&self) -> Vec<(f32, f32)> {
        self.vertebrae
            .iter()
            .step_by(2)
            .zip(self.vertebrae.iter().skip(2).step_by(2))
            .map(|(a, b)| ((a.y + b.y) * 0.5, (a.scale + b.scale) * 0.5))
            .collect()
    }

    fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        let vertebrae =
            (0..self.vertebrae.len()).map(|i| object_key("spine.vertebra", &i.to_string()));
        let discs = (0..self.discs().len()).map(|i| object_key("spine.disc", &i.to_string()));
        vertebrae.chain(discs).chain(std::iter::once(object_key("spine", "cord")))
    }
}

impl Default for SpineSkeleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorator for SpineSkeleton {
    fn name(&self) -> &'static str {
        "spine"
    }

    fn compute_pose(&mut self, input: &MotionInput) -> DecoratorPose {
        let target = (input.pointer.x - 0.5) * 0.3 + input.progress * FRAC_PI_2;
        self.rotation_y += (target - self.rotation_y) * Self::EASING;
        let visibility = Self::visibility(input.progress);
        if visibility < 0.01 {
            return DecoratorPose::Hidden;
        }
        DecoratorPose::Spine(SpinePose { visibility, rotation_y: self.rotation_y })
    }

    fn render(&self, pose: &DecoratorPose, out: &mut Vec<SceneOp>) {
        let DecoratorPose::Spine(pose) = pose else {
            out.extend(self.keys().map(|key| SceneOp::Remove { key }));
            return;
        };
        let spin = Quat::from_rotation_y(pose.rotation_y);
        let rotation = Vec3::new(0.0, pose.rotation_y, 0.0);
        let body = Self::BODY.with_opacity(Self::BODY.opacity * pose.visibility);
        for (i, v) in self.vertebrae.iter().enumerate() {
            let (width, height) = v.kind.body();
            out.push(body.mesh(
                object_key("spine.vertebra", &i.to_string()),
                MeshShape::Cylinder {
                    radius_top: width,
                    radius_bottom: width * 1.1,
                    height,
                    segments: 8,
                },
                spin * Vec3::new(0.0, v.y, 0.0),
                rotation,
                v.scale,
            ));
        }
        let disc = Self::DISC.with_opacity(Self::DISC.opacity * pose.visibility);
        for (i, (y, scale)) in self.discs().into_iter().enumerate() {
            out.push(disc.mesh(
                object_key("spine.disc", &i.to_string()),
                MeshShape::Cylinder {
                    radius_top: 0.12,
                    radius_bottom: 0.12,
                    height: 0.035,
                    segments: 8,
                },
                spin * Vec3::new(0.0, y, 0.0),
                rotation,
                scale,
            ));
        }
        let cord = Self::CORD.with_opacity(Self::CORD.opacity * pose.visibility);
        out.push(cord.mesh(
            object_key("spine", "cord"),
            MeshShape::Cylinder {
                radius_top: 0.028,
                radius_bottom: 0.024,
                height: 6.0,
                segments: 8,
            },
            spin * Vec3::new(0.0, 0.0, -0.10),
            rotation,
            1.0,
        ));
    }
}

// ---------------------------------------------------------------------------
// Camera rig and stack

/// Nudge `base` by the pointer and keep it aimed at the origin.
pub fn camera_rig(base: &CameraState, pointer: Pointer) -> CameraState {
    CameraState {
        position: [(pointer.x - 0.5) * 0.3, (pointer.y - 0.5) * 0.2, base.position[2]],
        target: [0.0, 0.0, 0.0],
        ..*base
    }
}

/// Ordered decorators for one canvas.
#[derive(Default)]
pub struct DecoratorStack {
    decorators: Vec<Box<dyn Decorator>>,
}

impl std::fmt::Debug for DecoratorStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.decorators.iter().map(|d| d.name())).finish()
    }
}

impl DecoratorStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decorator; draw order follows registration order.
    pub fn push(&mut self, decorator: Box<dyn Decorator>) {
        self.decorators.push(decorator);
    }

    /// Hero scene: globe, ring, particles and, on the high tier, shapes.
    pub fn hero(profile: &DeviceProfile, seed: u64) -> Self {
        let mut stack = Self::new();
        stack.push(Box::new(CentralGlobe::new(profile.tier)));
        stack.push(Box::new(MetallicRing::new(profile.tier)));
        stack.push(Box::new(ParticleField::new(profile.particle_budget, seed)));
        if profile.tier == PerformanceTier::High {
            stack.push(Box::new(FloatingShapes::new()));
        }
        stack
    }

    /// Pinned gallery scene: the spine.
    pub fn pinned() -> Self {
        let mut stack = Self::new();
        stack.push(Box::new(SpineSkeleton::new()));
        stack
    }

    /// Registered decorator names in draw order.
    pub fn names(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    /// Run every decorator for one frame, appending ops to `out`.
    pub fn frame(&mut self, input: &MotionInput, out: &mut Vec<SceneOp>) {
        for decorator in &mut self.decorators {
            let pose = decorator.compute_pose(input);
            decorator.render(&pose, out);
        }
    }
}

// ---------------------------------------------------------------------------
// Lightweight 2D particles

/// One CSS particle for the low tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightweightParticle {
    /// Horizontal position in percent.
    pub left_pct: f32,
    /// Vertical position in percent.
    pub top_pct: f32,
    /// Pulse delay in seconds.
    pub delay_s: f32,
    /// Pulse duration in seconds.
    pub duration_s: f32,
}

/// Number of CSS particles shown on the low tier.
pub const LIGHTWEIGHT_PARTICLES: u32 = 15;

/// Seeded layout of the low-tier CSS particle layer.
pub fn lightweight_particles(seed: u64) -> Vec<LightweightParticle> {
    let rng = SeededUnit::new(seed);
    (0..LIGHTWEIGHT_PARTICLES)
        .map(|i| LightweightParticle {
            left_pct: rng.unit("dot.left", i) * 100.0,
            top_pct: rng.unit("dot.top", i) * 100.0,
            delay_s: rng.unit("dot.delay", i) * 2.0,
            duration_s: rng.range("dot.duration", i, 2.0, 5.0),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input(t: f32, p: f32) -> MotionInput {
        MotionInput { time_s: t, progress: p, pointer: Pointer::CENTER }
    }

    #[test]
    fn ring_follows_progress() {
        let mut ring = MetallicRing::new(PerformanceTier::Medium);
        let DecoratorPose::Ring(pose) = ring.compute_pose(&input(0.0, 0.5)) else {
            unreachable!("ring always yields a ring pose");
        };
        assert_relative_eq!(pose.outer_rotation.z, PI, epsilon = 1e-6);
        assert_relative_eq!(pose.outer_scale, 1.15, epsilon = 1e-6);
        assert!(pose.inner_rotation.is_none());
        let mut ops = Vec::new();
        ring.render(&DecoratorPose::Ring(pose), &mut ops);
        assert!(matches!(ops[1], SceneOp::Remove { .. }));
    }

    #[test]
    fn hero_stack_respects_tier() {
        let profile = DeviceProfile {
            tier: PerformanceTier::High,
            particle_budget: 80,
            enable_glow: true,
            ..DeviceProfile::default()
        };
        let stack = DecoratorStack::hero(&profile, 1);
        assert_eq!(stack.names(), ["globe", "ring", "particles", "shapes"]);
        let medium = DecoratorStack::hero(&DeviceProfile::default(), 1);
        assert_eq!(medium.names(), ["globe", "ring", "particles"]);
    }

    #[test]
    fn particle_shell_is_bounded_and_seeded() {
        let a = ParticleField::new(40, 9);
        let b = ParticleField::new(40, 9);
        assert_eq!(a.positions().len(), 40);
        assert_eq!(a.positions(), b.positions());
        for p in a.positions() {
            let r = Vec3::from_array(*p).length();
            assert!(r >= ParticleField::MIN_RADIUS - 1e-3 && r <= ParticleField::MAX_RADIUS + 1e-3);
        }
    }

    #[test]
    fn spine_layout_matches_anatomy() {
        let spine = SpineSkeleton::new();
        assert_eq!(spine.vertebrae().len(), 15);
        assert_eq!(spine.vertebrae()[0].kind, VertebraKind::Cervical);
        assert_eq!(spine.vertebrae()[14].kind, VertebraKind::Lumbar);
        assert_relative_eq!(spine.vertebrae()[14].y, 3.0 - 14.0 * 0.45, epsilon = 1e-5);
        assert_eq!(spine.discs().len(), 7);
    }

    #[test]
    fn spine_hides_at_edges_and_eases() {
        let mut spine = SpineSkeleton::new();
        assert_eq!(spine.compute_pose(&input(0.0, 0.0)), DecoratorPose::Hidden);
        let DecoratorPose::Spine(pose) = spine.compute_pose(&input(0.0, 0.5)) else {
            unreachable!("visible at mid progress");
        };
        assert_eq!(pose.visibility, 1.0);
        assert!(pose.rotation_y > 0.0 && pose.rotation_y < FRAC_PI_2 * 0.5 * 0.1);
        let mut ops = Vec::new();
        spine.render(&DecoratorPose::Hidden, &mut ops);
        assert_eq!(ops.len(), 15 + 7 + 1);
    }

    #[test]
    fn camera_rig_offsets_from_pointer() {
        let base = CameraState::looking_at_origin(5.5, 55.0);
        let cam = camera_rig(&base, Pointer { x: 1.0, y: 0.0 });
        assert_relative_eq!(cam.position[0], 0.15, epsilon = 1e-6);
        assert_relative_eq!(cam.position[1], -0.1, epsilon = 1e-6);
        assert_eq!(cam.position[2], 5.5);
        assert_eq!(cam.fov_y_degrees, 55.0);
    }

    #[test]
    fn lightweight_layout_is_reproducible() {
        let a = lightweight_particles(3);
        assert_eq!(a.len(), 15);
        assert_eq!(a, lightweight_particles(3));
        assert!(a.iter().all(|p| (2.0..5.0).contains(&p.duration_s)));
    }
}
