// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Float canonicalization for change detection.
//!
//! Adapters compare canonical values to decide whether an upsert actually
//! changes anything on screen. Never use these to mutate stored poses.

/// Canonicalize a float to micro-unit precision.
///
/// Returns `None` for NaN or infinities; scene data must be finite.
pub fn canonicalize_f32(x: f32) -> Option<f32> {
    if !x.is_finite() {
        return None;
    }
    let scaled = x * 1_000_000.0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let truncated = (scaled as i64) as f32 / 1_000_000.0;
    if truncated == 0.0 {
        Some(0.0)
    } else {
        Some(truncated)
    }
}

/// Canonicalize a vector; `None` if any component is non-finite.
pub fn canonicalize_vec3(p: [f32; 3]) -> Option<[f32; 3]> {
    Some([
        canonicalize_f32(p[0])?,
        canonicalize_f32(p[1])?,
        canonicalize_f32(p[2])?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_collapses() {
        assert_eq!(canonicalize_f32(-0.0), Some(0.0));
        assert!(canonicalize_f32(-0.0).is_some_and(|v| v.is_sign_positive()));
    }

    #[test]
    fn truncates_below_micro_units() {
        assert_eq!(canonicalize_f32(1.234_567_9), Some(1.234567));
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(canonicalize_f32(f32::NAN), None);
        assert_eq!(canonicalize_f32(f32::INFINITY), None);
        assert_eq!(canonicalize_vec3([0.0, f32::NEG_INFINITY, 1.0]), None);
    }
}
