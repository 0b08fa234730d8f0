// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `ShowcaseController` JS class.

use orrery_core::detect;
use wasm_bindgen::prelude::*;

use crate::probe::BrowserProbe;
use crate::session::{SessionOptions, ShowcaseSession};
use crate::{install_panic_hook, to_js};

/// Pinned gallery section driven from `requestAnimationFrame`.
///
/// Detection runs once in the constructor. Event handlers only record input;
/// all derived state is computed in [`ShowcaseController::frame`].
#[wasm_bindgen]
pub struct ShowcaseController {
    session: ShowcaseSession,
}

#[wasm_bindgen]
impl ShowcaseController {
    /// Create the controller from a `{ viewportWidth, viewportHeight,
    /// sectionTop, config?, prefs? }` options object.
    ///
    /// # Errors
    ///
    /// Returns an error when the options do not deserialize or the config
    /// override is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<ShowcaseController, JsError> {
        install_panic_hook();
        let options: SessionOptions = serde_wasm_bindgen::from_value(options)?;
        let detected = detect(&BrowserProbe::new());
        Ok(Self {
            session: ShowcaseSession::new(&options, detected)?,
        })
    }

    /// Effective device profile as a plain object.
    pub fn profile(&self) -> Result<JsValue, JsError> {
        to_js(self.session.profile())
    }

    /// Gallery items (for the fallback grid markup).
    pub fn items(&self) -> Result<JsValue, JsError> {
        to_js(self.session.items())
    }

    /// `scroll` listener.
    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.session.on_scroll(scroll_y);
    }

    /// `pointermove` listener.
    pub fn on_pointer_move(
        &mut self,
        client_x: f32,
        client_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) {
        self.session.on_pointer(client_x, client_y, viewport_width, viewport_height);
    }

    /// Intersection observer callback; returns the render mode name.
    pub fn on_intersection(&mut self, intersecting: bool) -> Result<JsValue, JsError> {
        to_js(&self.session.on_intersection(intersecting))
    }

    /// `resize` listener.
    pub fn on_resize(&mut self, width: u32, height: u32, dpr: f32, section_top: f32) {
        self.session.on_resize(width, height, dpr, section_top);
    }

    /// `webglcontextlost` listener, or renderer creation failure.
    pub fn on_context_lost(&mut self, reason: &str) {
        self.session.on_context_lost(reason);
    }

    /// Pointer entered the orbit card for `item` (or left every card when
    /// `undefined`). Returns `"play"`, `"pause"` or `null`.
    pub fn set_hovered_item(&mut self, item: Option<usize>) -> Result<JsValue, JsError> {
        to_js(&self.session.set_hovered_item(item))
    }

    /// The orbit video's `play()` promise rejected.
    pub fn on_play_rejected(&mut self) {
        self.session.on_play_rejected();
    }

    /// Advance one frame: `{ frame, scene, playback, pinned }`.
    ///
    /// # Errors
    ///
    /// Returns an error when a scene delta violates the port contract.
    pub fn frame(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        let out = self.session.frame(now_ms)?;
        to_js(&out)
    }
}
