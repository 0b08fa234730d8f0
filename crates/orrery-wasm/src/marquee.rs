// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Engagement card marquee JS class.

use orrery_core::config::MarqueeTuning;
use orrery_core::media::{EngagementCard, ImageHints, VideoModal, IMAGE_HINTS};
use orrery_core::Marquee;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::{install_panic_hook, to_js};

/// Construction options passed by the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarqueeOptions {
    /// Card content.
    pub card: EngagementCard,
    /// Touch layout (touch pauses instead of hover).
    #[serde(default)]
    pub mobile: bool,
    /// Start the modal muted.
    #[serde(default)]
    pub muted: bool,
    /// Speed and size override.
    #[serde(default)]
    pub tuning: MarqueeTuning,
}

/// One rendered strip slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slot {
    /// Media index.
    pub index: usize,
    /// Left edge in CSS pixels.
    pub x: f32,
}

/// Everything the card renders this frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarqueeView {
    /// Strip translation.
    pub offset_px: f32,
    /// Slots, the media list rendered twice.
    pub slots: Vec<Slot>,
    /// Scrolling is held.
    pub paused: bool,
    /// Open video modal.
    pub modal: Option<VideoModal>,
    /// Description as shown (preview or full).
    pub description: String,
    /// `loading` / `decoding` attributes for image slots.
    pub image_hints: ImageHints,
}

/// Build the view of `marquee` over `card`.
pub fn view(marquee: &Marquee, card: &EngagementCard) -> MarqueeView {
    MarqueeView {
        offset_px: marquee.offset_px(),
        slots: marquee.slots().map(|(index, x)| Slot { index, x }).collect(),
        paused: marquee.is_paused(),
        modal: marquee.modal().cloned(),
        description: marquee.description(&card.description).into_owned(),
        image_hints: IMAGE_HINTS,
    }
}

/// Marquee strip for one engagement card.
#[wasm_bindgen]
pub struct MarqueeController {
    marquee: Marquee,
    card: EngagementCard,
}

#[wasm_bindgen]
impl MarqueeController {
    /// Create from `{ card, mobile?, muted?, tuning? }`.
    ///
    /// # Errors
    ///
    /// Returns an error when the options do not deserialize.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<MarqueeController, JsError> {
        install_panic_hook();
        let MarqueeOptions {
            card,
            mobile,
            muted,
            tuning,
        } = serde_wasm_bindgen::from_value(options)?;
        Ok(Self {
            marquee: Marquee::new(tuning, card.media.clone(), mobile, muted),
            card,
        })
    }

    /// Advance to `now_ms` and return the view.
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsError> {
        self.marquee.tick(now_ms);
        to_js(&view(&self.marquee, &self.card))
    }

    /// `pointerenter` on the strip.
    pub fn on_pointer_enter(&mut self) {
        self.marquee.on_pointer_enter();
    }

    /// `pointerleave` on the strip.
    pub fn on_pointer_leave(&mut self) {
        self.marquee.on_pointer_leave();
    }

    /// `touchstart` on the strip.
    pub fn on_touch_start(&mut self) {
        self.marquee.on_touch_start();
    }

    /// `touchend` on the strip.
    pub fn on_touch_end(&mut self) {
        self.marquee.on_touch_end();
    }

    /// Click on media `index`; true when the video modal opened.
    pub fn on_item_click(&mut self, index: usize) -> bool {
        self.marquee.on_item_click(index)
    }

    /// Mute button in the modal.
    pub fn toggle_muted(&mut self) -> bool {
        self.marquee.toggle_muted()
    }

    /// Close button or backdrop click.
    pub fn close_modal(&mut self) {
        self.marquee.close_modal();
    }

    /// `keydown` while mounted; true when handled.
    pub fn on_key(&mut self, key: &str) -> bool {
        self.marquee.on_key(key)
    }

    /// "Read more" / "Show less".
    pub fn toggle_expanded(&mut self) -> bool {
        self.marquee.toggle_expanded()
    }
}
