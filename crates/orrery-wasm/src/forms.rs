// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Contact form and chat widget JS classes.
//!
//! The page performs the `fetch`; these classes decide what to send and
//! what to show for whatever came back.

use orrery_app_core::chat::{ChatResponse, ChatSession};
use orrery_app_core::contact::{ContactForm, ContactResponse, SubmitOutcome};
use orrery_app_core::toast::ToastService;
use wasm_bindgen::prelude::*;

use crate::{install_panic_hook, millis, to_js};

/// Toasts kept on screen at once.
pub const MAX_TOASTS: usize = 3;

/// Contact form with its toast queue.
#[wasm_bindgen]
pub struct ContactController {
    form: ContactForm,
    toasts: ToastService,
}

impl Default for ContactController {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ContactController {
    /// Empty form.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self {
            form: ContactForm::new(),
            toasts: ToastService::new(MAX_TOASTS),
        }
    }

    /// Mirror the input fields.
    pub fn set_fields(&mut self, name: &str, email: &str, message: &str) {
        name.clone_into(&mut self.form.name);
        email.clone_into(&mut self.form.email);
        message.clone_into(&mut self.form.message);
    }

    /// Whether the submit button should show the spinner.
    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    /// Validate and return the JSON body to POST, or `null` when the form
    /// was rejected locally (an error toast explains why).
    pub fn begin_submit(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        match self.form.begin_submit(&mut self.toasts, millis(now_ms)) {
            Ok(payload) => to_js(&payload),
            Err(_) => Ok(JsValue::NULL),
        }
    }

    /// Record the response body; pass `undefined` for a transport failure.
    /// Returns true when the message was sent.
    pub fn finish_submit(&mut self, body: JsValue, now_ms: f64) -> bool {
        let response = if body.is_undefined() || body.is_null() {
            Err("no response".to_owned())
        } else {
            serde_wasm_bindgen::from_value::<ContactResponse>(body).map_err(|e| e.to_string())
        };
        self.form.finish_submit(response, &mut self.toasts, millis(now_ms)) == SubmitOutcome::Sent
    }

    /// Current field values (cleared after a successful send).
    pub fn fields(&self) -> Result<JsValue, JsError> {
        to_js(&[&self.form.name, &self.form.email, &self.form.message])
    }

    /// Visible toasts with their remaining-life progress.
    pub fn toasts(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        let now = millis(now_ms);
        self.toasts.retain_visible(now);
        to_js(&self.toasts.visible(now))
    }

    /// Close button on a toast.
    pub fn dismiss_toast(&mut self, id: u64) -> bool {
        self.toasts.dismiss(id)
    }
}

/// Floating chat widget.
#[wasm_bindgen]
pub struct ChatController {
    session: ChatSession,
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ChatController {
    /// Widget holding the greeting.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self {
            session: ChatSession::new(),
        }
    }

    /// Transcript to render, greeting first.
    pub fn transcript(&self) -> Result<JsValue, JsError> {
        to_js(self.session.transcript())
    }

    /// Whether the typing dots are visible.
    pub fn is_awaiting_reply(&self) -> bool {
        self.session.is_awaiting_reply()
    }

    /// Append `input` and return the JSON body to POST, or `null` when
    /// sending is blocked (blank input or a reply pending).
    pub fn send(&mut self, input: &str) -> Result<JsValue, JsError> {
        match self.session.send(input) {
            Ok(request) => to_js(&request),
            Err(_) => Ok(JsValue::NULL),
        }
    }

    /// Record the response body; pass `undefined` for a transport failure.
    /// Returns the assistant text that was appended.
    pub fn receive(&mut self, body: JsValue) -> String {
        let outcome = if body.is_undefined() || body.is_null() {
            Err("no response".to_owned())
        } else {
            serde_wasm_bindgen::from_value::<ChatResponse>(body).map_err(|e| e.to_string())
        };
        self.session.receive(outcome).content.clone()
    }
}
