// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stable object keys and seeded pseudo-random values.
//!
//! Everything that looks random on screen (particle shells, jitter in the
//! typing script, drifting dots) is derived from BLAKE3 over a seed, a stream
//! label and an index, so two runs with the same seed draw the same frame.

use orrery_scene_port::ObjectKey;

/// Stable scene key for `label` within `domain`.
pub fn object_key(domain: &str, label: &str) -> ObjectKey {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"orrery:");
    hasher.update(domain.as_bytes());
    hasher.update(b":");
    hasher.update(label.as_bytes());
    ObjectKey(hasher.finalize().into())
}

/// Deterministic source of unit-interval values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeededUnit {
    seed: u64,
}

impl SeededUnit {
    /// Source for `seed`.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Value in `[0, 1)` for (`stream`, `index`).
    pub fn unit(&self, stream: &str, index: u32) -> f32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(stream.as_bytes());
        hasher.update(&index.to_le_bytes());
        let h = hasher.finalize();
        let b = h.as_bytes();
        f32::from(u16::from_le_bytes([b[0], b[1]])) / 65536.0
    }

    /// Value in `[lo, hi)` for (`stream`, `index`).
    pub fn range(&self, stream: &str, index: u32, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit(stream, index)
    }
}
