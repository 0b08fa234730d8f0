// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capability probe over `navigator` and a throwaway WebGL canvas.

use js_sys::Reflect;
use orrery_core::device::{CapabilityProbe, ProbeError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, Navigator, Window};

/// Browser-backed [`CapabilityProbe`].
///
/// Non-standard signals (`deviceMemory`, `connection.effectiveType`) are read
/// reflectively; browsers that lack them report the signal unavailable.
#[derive(Debug, Clone)]
pub struct BrowserProbe {
    window: Option<Window>,
}

impl Default for BrowserProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserProbe {
    /// Probe the current global window.
    pub fn new() -> Self {
        Self {
            window: web_sys::window(),
        }
    }

    fn navigator(&self) -> Result<Navigator, ProbeError> {
        self.window
            .as_ref()
            .map(Window::navigator)
            .ok_or(ProbeError::Unavailable("window"))
    }

    fn context_available(canvas: &HtmlCanvasElement, kind: &str) -> bool {
        matches!(canvas.get_context(kind), Ok(Some(_)))
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn property(target: &JsValue, name: &'static str) -> Result<JsValue, ProbeError> {
    let value = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| ProbeError::Failed(describe(&e)))?;
    if value.is_undefined() || value.is_null() {
        return Err(ProbeError::Unavailable(name));
    }
    Ok(value)
}

impl CapabilityProbe for BrowserProbe {
    fn device_memory_gb(&self) -> Result<f64, ProbeError> {
        let navigator = self.navigator()?;
        property(&navigator, "deviceMemory")?
            .as_f64()
            .ok_or(ProbeError::Unavailable("deviceMemory"))
    }

    // hardwareConcurrency is a small positive integer reported as a double.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn logical_cores(&self) -> Result<u32, ProbeError> {
        let cores = self.navigator()?.hardware_concurrency();
        if cores.is_finite() && cores >= 1.0 {
            Ok(cores as u32)
        } else {
            Err(ProbeError::Unavailable("hardwareConcurrency"))
        }
    }

    fn user_agent(&self) -> Result<String, ProbeError> {
        self.navigator()?
            .user_agent()
            .map_err(|e| ProbeError::Failed(describe(&e)))
    }

    fn effective_connection_type(&self) -> Result<String, ProbeError> {
        let navigator = self.navigator()?;
        let connection = property(&navigator, "connection")?;
        property(&connection, "effectiveType")?
            .as_string()
            .ok_or(ProbeError::Unavailable("effectiveType"))
    }

    fn webgl_context_available(&self) -> Result<bool, ProbeError> {
        let document = self
            .window
            .as_ref()
            .and_then(Window::document)
            .ok_or(ProbeError::Unavailable("document"))?;
        let canvas = document
            .create_element("canvas")
            .map_err(|e| ProbeError::Failed(describe(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ProbeError::Failed("canvas element has unexpected type".into()))?;
        Ok(Self::context_available(&canvas, "webgl")
            || Self::context_available(&canvas, "experimental-webgl"))
    }
}
