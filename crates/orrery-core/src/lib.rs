// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Orrery core: the pure model behind the showcase gallery.
//!
//! A session starts with [`detect`] producing an immutable [`DeviceProfile`].
//! Every frame the host samples scroll and pointer once, hands them to a
//! [`SceneComposer`] (pinned gallery) and a [`DecoratorStack`] (hero scene),
//! and forwards the resulting [`orrery_scene_port::SceneDelta`] to a
//! renderer. Nothing in this crate reads a clock or touches the DOM.
//!
//! # Modules
//!
//! - [`device`]: capability probing and tiering.
//! - [`scroll`]: page-level and pinned-section trackers.
//! - [`orbit`]: the pure pose function.
//! - [`composition`]: render-mode decision and per-frame composition.
//! - [`media`]: video gating, image load state, marquee.
//! - [`ambient`]: decorators (ring, globe, particles, shapes, spine).
//! - [`typing`]: hero typewriter.

pub mod ambient;
pub mod composition;
pub mod config;
pub mod device;
pub mod gallery;
pub mod media;
pub mod orbit;
pub mod scroll;
pub mod seed;
pub mod typing;

pub use ambient::{camera_rig, Decorator, DecoratorPose, DecoratorStack, MotionInput};
pub use composition::{decide_render_mode, ComposedFrame, RenderMode, SceneComposer, ViewportGate};
pub use config::{LayoutVariant, ShowcaseConfig, ShowcaseConfigError};
pub use device::{detect, CapabilityProbe, DeviceProfile, PerformanceTier, ProbeError};
pub use gallery::{default_gallery, GalleryItem};
pub use media::{LoadState, Marquee, PlaybackCommand, VideoGate};
pub use orbit::{OrbitalLayout, OrbitalPose};
pub use scroll::{PageScrollTracker, PinnedScrollTracker, Pointer, SamplePolicy};
pub use typing::{TypingConfig, TypingScript};
