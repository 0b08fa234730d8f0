// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic capability probes.

use orrery_core::device::{detect, CapabilityProbe, DeviceProfile, ProbeError};

/// Probe that reports fixed values.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedProbe {
    /// Device memory in GiB.
    pub memory_gb: f64,
    /// Logical cores.
    pub cores: u32,
    /// User agent.
    pub user_agent: String,
    /// Connection `effectiveType`.
    pub connection: String,
    /// WebGL availability.
    pub webgl: bool,
}

const DESKTOP_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36";
const PHONE_UA: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/126.0 Mobile";

/// Named device presets used across test suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreset {
    /// 16 GiB, 12 cores, desktop, WebGL: scores 85 (`High`).
    Workstation,
    /// 4 GiB, 8 cores, Android, WebGL: scores 55 (`Medium`).
    MidPhone,
    /// 1 GiB, 2 cores, Android on 2g, WebGL: scores -5 (`Low`, no 3D).
    BudgetPhone,
    /// Workstation without WebGL: scores 35, no 3D.
    NoWebgl,
}

impl FixedProbe {
    /// Probe for a preset.
    pub fn preset(preset: DevicePreset) -> Self {
        let (memory_gb, cores, user_agent, connection, webgl) = match preset {
            DevicePreset::Workstation => (16.0, 12, DESKTOP_UA, "4g", true),
            DevicePreset::MidPhone => (4.0, 8, PHONE_UA, "4g", true),
            DevicePreset::BudgetPhone => (1.0, 2, PHONE_UA, "2g", true),
            DevicePreset::NoWebgl => (16.0, 12, DESKTOP_UA, "4g", false),
        };
        Self {
            memory_gb,
            cores,
            user_agent: user_agent.to_owned(),
            connection: connection.to_owned(),
            webgl,
        }
    }
}

impl CapabilityProbe for FixedProbe {
    fn device_memory_gb(&self) -> Result<f64, ProbeError> {
        Ok(self.memory_gb)
    }

    fn logical_cores(&self) -> Result<u32, ProbeError> {
        Ok(self.cores)
    }

    fn user_agent(&self) -> Result<String, ProbeError> {
        Ok(self.user_agent.clone())
    }

    fn effective_connection_type(&self) -> Result<String, ProbeError> {
        Ok(self.connection.clone())
    }

    fn webgl_context_available(&self) -> Result<bool, ProbeError> {
        Ok(self.webgl)
    }
}

/// Probe where every signal fails (locked-down browser, canvas blocked).
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingProbe;

impl CapabilityProbe for FailingProbe {
    fn device_memory_gb(&self) -> Result<f64, ProbeError> {
        Err(ProbeError::Unavailable("deviceMemory"))
    }

    fn logical_cores(&self) -> Result<u32, ProbeError> {
        Err(ProbeError::Unavailable("hardwareConcurrency"))
    }

    fn user_agent(&self) -> Result<String, ProbeError> {
        Err(ProbeError::Unavailable("userAgent"))
    }

    fn effective_connection_type(&self) -> Result<String, ProbeError> {
        Err(ProbeError::Unavailable("connection"))
    }

    fn webgl_context_available(&self) -> Result<bool, ProbeError> {
        Err(ProbeError::Failed("canvas.getContext threw".into()))
    }
}

/// Detected profile for a preset.
pub fn profile_for(preset: DevicePreset) -> DeviceProfile {
    detect(&FixedProbe::preset(preset))
}
