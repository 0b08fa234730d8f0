// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One-shot device capability scoring.
//!
//! The host probes a handful of static capability signals once per session
//! and the result is frozen into a [`DeviceProfile`]. Every consumer receives
//! the profile by value; nothing re-detects on resize or throttling.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Coarse capability tier. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    /// Constrained device: no 3D, no glow, no parallax.
    Low,
    /// Mid-range device: 3D allowed, glow disabled.
    Medium,
    /// Capable device: every effect enabled.
    High,
}

impl PerformanceTier {
    /// Tier for a capability score.
    pub fn from_score(score: i32) -> Self {
        if score >= HIGH_TIER_MIN_SCORE {
            Self::High
        } else if score >= MEDIUM_TIER_MIN_SCORE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Particle budget granted to this tier.
    pub fn particle_budget(self) -> u32 {
        match self {
            Self::High => 80,
            Self::Medium => 40,
            Self::Low => 20,
        }
    }
}

const BASELINE_SCORE: i32 = 50;
const HIGH_TIER_MIN_SCORE: i32 = 60;
const MEDIUM_TIER_MIN_SCORE: i32 = 30;
const MIN_SCORE_FOR_3D: i32 = 10;
const NO_WEBGL_PENALTY: i32 = 50;
const DEFAULT_MEMORY_GB: f64 = 4.0;
const DEFAULT_CORES: u32 = 4;

const MOBILE_SIGNATURES: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Failure raised by a single capability probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The host does not expose this signal.
    #[error("signal unavailable: {0}")]
    Unavailable(&'static str),
    /// The probe itself threw (e.g. canvas creation failed).
    #[error("probe failed: {0}")]
    Failed(String),
}

/// Source of raw capability signals (browser navigator, test fixture, ...).
///
/// Each method may fail independently; failures are treated as "capability
/// absent" and never reach the caller of [`detect`].
pub trait CapabilityProbe {
    /// Reported device memory in GiB.
    fn device_memory_gb(&self) -> Result<f64, ProbeError>;
    /// Logical core count.
    fn logical_cores(&self) -> Result<u32, ProbeError>;
    /// User-agent string.
    fn user_agent(&self) -> Result<String, ProbeError>;
    /// Network `effectiveType` (`"4g"`, `"2g"`, `"slow-2g"`, ...).
    fn effective_connection_type(&self) -> Result<String, ProbeError>;
    /// Whether a WebGL rendering context could be created.
    fn webgl_context_available(&self) -> Result<bool, ProbeError>;
}

/// Normalized capability signals after probe failures were folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySignals {
    /// Device memory estimate in GiB (4 when unknown).
    pub device_memory_gb: f64,
    /// Logical core count (4 when unknown).
    pub logical_cores: u32,
    /// User agent carries a mobile signature.
    pub mobile: bool,
    /// Network reports `2g` or `slow-2g`.
    pub slow_network: bool,
    /// WebGL context creation succeeded.
    pub webgl: bool,
}

impl CapabilitySignals {
    /// Query every signal from `probe`, failing closed on errors.
    pub fn collect<P: CapabilityProbe + ?Sized>(probe: &P) -> Self {
        let device_memory_gb = probe.device_memory_gb().unwrap_or_else(|err| {
            debug!(%err, "device memory probe failed; assuming default");
            DEFAULT_MEMORY_GB
        });
        let logical_cores = probe.logical_cores().unwrap_or_else(|err| {
            debug!(%err, "core count probe failed; assuming default");
            DEFAULT_CORES
        });
        let mobile = probe
            .user_agent()
            .map(|ua| is_mobile_user_agent(&ua))
            .unwrap_or(false);
        let slow_network = probe
            .effective_connection_type()
            .map(|kind| kind == "2g" || kind == "slow-2g")
            .unwrap_or(false);
        let webgl = probe.webgl_context_available().unwrap_or_else(|err| {
            debug!(%err, "webgl probe failed; treating as unavailable");
            false
        });
        Self {
            device_memory_gb,
            logical_cores,
            mobile,
            slow_network,
            webgl,
        }
    }

    /// Capability score (baseline 50, weighted adjustments).
    pub fn score(&self) -> i32 {
        let mut score = BASELINE_SCORE;

        score += if self.device_memory_gb >= 8.0 {
            20
        } else if self.device_memory_gb >= 4.0 {
            10
        } else if self.device_memory_gb < 2.0 {
            -20
        } else {
            0
        };

        score += if self.logical_cores >= 8 {
            15
        } else if self.logical_cores >= 4 {
            5
        } else if self.logical_cores < 2 {
            -15
        } else {
            0
        };

        if self.mobile {
            score -= 20;
        }
        if self.slow_network {
            score -= 15;
        }
        if !self.webgl {
            score -= NO_WEBGL_PENALTY;
        }
        score
    }
}

/// Returns true when `user_agent` matches a known mobile signature.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_SIGNATURES.iter().any(|sig| ua.contains(sig))
}

/// Immutable per-session device profile.
///
/// Invariants: `can_render_3d` implies WebGL was available, and a `Low` tier
/// never enables glow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    /// Capability tier.
    pub tier: PerformanceTier,
    /// Whether the 3D scene may be mounted at all.
    pub can_render_3d: bool,
    /// Particle budget for ambient particle layers.
    pub particle_budget: u32,
    /// Pointer parallax enabled.
    pub enable_parallax: bool,
    /// Glow effects enabled.
    pub enable_glow: bool,
    /// Raw score the tier was derived from.
    pub score: i32,
}

impl DeviceProfile {
    /// Derive a profile from normalized signals.
    pub fn from_signals(signals: &CapabilitySignals) -> Self {
        let score = signals.score();
        let tier = PerformanceTier::from_score(score);
        Self::with_tier(tier, signals.webgl && score > MIN_SCORE_FOR_3D, score)
    }

    fn with_tier(tier: PerformanceTier, can_render_3d: bool, score: i32) -> Self {
        Self {
            tier,
            can_render_3d,
            particle_budget: tier.particle_budget(),
            enable_parallax: tier != PerformanceTier::Low,
            enable_glow: tier == PerformanceTier::High,
            score,
        }
    }

    /// Lower the tier to at most `cap`, recomputing the tier-derived flags.
    ///
    /// Used to honour a user quality preference at detection time; it never
    /// raises a tier and never grants 3D.
    #[must_use]
    pub fn capped(self, cap: PerformanceTier) -> Self {
        if self.tier <= cap {
            return self;
        }
        Self::with_tier(cap, self.can_render_3d, self.score)
    }
}

impl Default for DeviceProfile {
    /// Profile assumed before detection runs: medium tier, 3D allowed.
    fn default() -> Self {
        Self::with_tier(PerformanceTier::Medium, true, BASELINE_SCORE)
    }
}

/// Run detection once against `probe`.
///
/// Never fails: any probe error degrades the corresponding capability.
pub fn detect<P: CapabilityProbe + ?Sized>(probe: &P) -> DeviceProfile {
    let signals = CapabilitySignals::collect(probe);
    let profile = DeviceProfile::from_signals(&signals);
    debug!(
        score = profile.score,
        tier = ?profile.tier,
        can_render_3d = profile.can_render_3d,
        "device profile detected"
    );
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(
        memory: f64,
        cores: u32,
        mobile: bool,
        slow: bool,
        webgl: bool,
    ) -> CapabilitySignals {
        CapabilitySignals {
            device_memory_gb: memory,
            logical_cores: cores,
            mobile,
            slow_network: slow,
            webgl,
        }
    }

    #[test]
    fn desktop_workstation_is_high() {
        let p = DeviceProfile::from_signals(&signals(16.0, 12, false, false, true));
        assert_eq!(p.score, 85);
        assert_eq!(p.tier, PerformanceTier::High);
        assert!(p.can_render_3d && p.enable_glow && p.enable_parallax);
        assert_eq!(p.particle_budget, 80);
    }

    #[test]
    fn default_signals_are_high_on_desktop() {
        // 50 + 10 (4 GiB) + 5 (4 cores)
        let p = DeviceProfile::from_signals(&signals(4.0, 4, false, false, true));
        assert_eq!(p.score, 65);
        assert_eq!(p.tier, PerformanceTier::High);
    }

    #[test]
    fn mid_range_phone_is_medium() {
        let p = DeviceProfile::from_signals(&signals(4.0, 8, true, false, true));
        assert_eq!(p.score, 50 + 10 + 15 - 20);
        assert_eq!(p.tier, PerformanceTier::Medium);
        assert!(!p.enable_glow);
        assert!(p.enable_parallax);
        assert_eq!(p.particle_budget, 40);
    }

    #[test]
    fn missing_webgl_forces_low_and_no_3d() {
        let p = DeviceProfile::from_signals(&signals(16.0, 16, false, false, false));
        assert_eq!(p.score, 85 - 50);
        assert!(!p.can_render_3d);
        let weak = DeviceProfile::from_signals(&signals(1.0, 1, true, true, false));
        assert_eq!(weak.tier, PerformanceTier::Low);
        assert!(!weak.enable_glow && !weak.enable_parallax);
    }

    #[test]
    fn score_at_ten_blocks_3d() {
        // 1.5 GiB (-20), 2 cores (+0), mobile (-20)
        let s = signals(1.5, 2, true, false, true);
        assert_eq!(s.score(), 50 - 20 - 20);
        let p = DeviceProfile::from_signals(&s);
        assert!(!p.can_render_3d);
        assert_eq!(p.tier, PerformanceTier::Low);
    }

    #[test]
    fn mobile_signatures_are_case_insensitive() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
        ));
        assert!(is_mobile_user_agent("Opera Mini/8.0"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0"
        ));
    }

    #[test]
    fn cap_lowers_but_never_raises() {
        let high = DeviceProfile::from_signals(&signals(16.0, 12, false, false, true));
        let capped = high.capped(PerformanceTier::Medium);
        assert_eq!(capped.tier, PerformanceTier::Medium);
        assert!(!capped.enable_glow);
        let medium = DeviceProfile::default();
        assert_eq!(medium.capped(PerformanceTier::High), medium);
    }
}
