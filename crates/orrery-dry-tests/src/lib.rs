// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Orrery crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`probe`] - Fixed capability probes and device presets
//! - [`scene`] - Recording scene port (headless renderer)
//! - `transport` - Mail/chat upstream fakes (feature `gateway`)

pub mod config;
pub mod probe;
pub mod scene;
#[cfg(feature = "gateway")]
pub mod transport;

pub use config::InMemoryConfigStore;
pub use probe::{profile_for, DevicePreset, FailingProbe, FixedProbe};
pub use scene::RecordingScenePort;
#[cfg(feature = "gateway")]
pub use transport::{RecordingMailer, ScriptedChat};
