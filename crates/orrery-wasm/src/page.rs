// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Page-level scroll tracker JS class (progress bar, nav highlight).

use orrery_core::scroll::{PageMetrics, PageScrollTracker};
use orrery_core::{Pointer, SamplePolicy, ShowcaseConfig};
use wasm_bindgen::prelude::*;

use crate::to_js;

/// Global scroll progress, current section and pointer.
///
/// Listeners feed raw values; [`PageController::sample`] recomputes at most
/// once per sample interval and keeps the latest pending input otherwise.
#[wasm_bindgen]
pub struct PageController {
    tracker: PageScrollTracker,
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl PageController {
    /// Tracker with the default 50 ms sample interval.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let interval = ShowcaseConfig::default().scroll.page_sample_interval_ms;
        Self {
            tracker: PageScrollTracker::new(SamplePolicy::new(interval)),
        }
    }

    /// `scroll` listener with `{ scrollY, scrollHeight, viewportHeight,
    /// sections: [{ id, top, bottom }] }`.
    ///
    /// # Errors
    ///
    /// Returns an error when the metrics do not deserialize.
    pub fn on_scroll(&mut self, metrics: JsValue) -> Result<(), JsError> {
        let metrics: PageMetrics = serde_wasm_bindgen::from_value(metrics)?;
        self.tracker.on_scroll(metrics);
        Ok(())
    }

    /// `pointermove` listener.
    pub fn on_pointer_move(
        &mut self,
        client_x: f32,
        client_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) {
        self.tracker
            .on_pointer(Pointer::from_client(client_x, client_y, viewport_width, viewport_height));
    }

    /// Recompute if allowed; returns the snapshot when it changed, else `null`.
    pub fn sample(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        if self.tracker.sample(now_ms) {
            to_js(self.tracker.snapshot())
        } else {
            Ok(JsValue::NULL)
        }
    }
}
