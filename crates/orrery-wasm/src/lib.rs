// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Orrery browser host bridge.
//!
//! Exposes the showcase as a handful of JavaScript classes. The page owns
//! the DOM, the WebGL scene graph and `fetch`; this crate owns every number
//! that ends up on screen.
//!
//! # Key Types
//!
//! - [`ShowcaseController`]: pinned gallery section (scroll, pointer, render
//!   mode, per-frame scene deltas, orbit video gate).
//! - [`HeroController`]: hero canvas decorators and the typing headline.
//! - [`MarqueeController`]: one engagement card strip and its video modal.
//! - [`PageController`]: page-level scroll progress and current section.
//! - [`ContactController`] / [`ChatController`]: form and widget state.
//!
//! # Usage (from JavaScript)
//!
//! ```js
//! import init, { ShowcaseController } from 'orrery-wasm';
//!
//! await init();
//! const showcase = new ShowcaseController({
//!   viewportWidth: innerWidth,
//!   viewportHeight: innerHeight,
//!   sectionTop: section.offsetTop,
//! });
//! observer.observe(section); // -> showcase.on_intersection(entry.isIntersecting)
//! requestAnimationFrame(function tick(now) {
//!   const { frame, scene } = showcase.frame(now);
//!   renderer.apply(scene);
//!   requestAnimationFrame(tick);
//! });
//! ```
//!
//! Each controller splits into a plain Rust session type (tested natively)
//! and a `#[wasm_bindgen]` wrapper that only converts values.

pub mod forms;
pub mod hero;
pub mod marquee;
pub mod page;
pub mod port;
pub mod probe;
pub mod session;

mod controller;

pub use controller::ShowcaseController;
pub use forms::{ChatController, ContactController};
pub use hero::{HeroController, HeroSession};
pub use marquee::MarqueeController;
pub use page::PageController;
pub use port::{BufferingPort, PendingScene};
pub use probe::BrowserProbe;
pub use session::{SessionError, SessionOptions, ShowcaseSession};

use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Route Rust panics to `console.error` when the `console-panic` feature is on.
pub(crate) fn install_panic_hook() {
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();
}

/// Serialize `value` into a plain JS object (maps become objects).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// Host milliseconds as a session offset; negative or NaN clamps to zero.
pub(crate) fn millis(now_ms: f64) -> std::time::Duration {
    if now_ms.is_finite() && now_ms > 0.0 {
        std::time::Duration::from_secs_f64(now_ms / 1000.0)
    } else {
        std::time::Duration::ZERO
    }
}
