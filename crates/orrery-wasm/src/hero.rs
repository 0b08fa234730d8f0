// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hero canvas: ambient decorators plus the typing headline.

use orrery_core::ambient::{camera_rig, DecoratorStack, MotionInput};
use orrery_core::typing::{TypingConfig, TypingFrame, TypingScript};
use orrery_core::{detect, DeviceProfile, PerformanceTier, Pointer};
use orrery_scene_port::{CameraState, SceneDelta, ScenePort};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::port::{BufferingPort, PendingScene};
use crate::probe::BrowserProbe;
use crate::{install_panic_hook, to_js};

/// Hero camera distance.
pub const HERO_CAMERA_Z: f32 = 5.0;
/// Hero vertical field of view in degrees.
pub const HERO_CAMERA_FOV: f32 = 75.0;

/// Construction options passed by the page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroOptions {
    /// Particle layout seed.
    pub seed: u64,
    /// Headline script; omitted for no typewriter.
    pub typing: Option<TypingConfig>,
}

/// Output of one hero frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroFrame {
    /// Renderer work.
    pub scene: PendingScene,
    /// Headline state.
    pub typing: Option<TypingFrame>,
}

/// Hero state without any JS types.
#[derive(Debug)]
pub struct HeroSession {
    stack: DecoratorStack,
    typing: Option<TypingScript>,
    port: BufferingPort,
    camera: CameraState,
    pointer: Pointer,
    epoch: u64,
    started_ms: Option<f64>,
}

impl HeroSession {
    /// Hero for `profile`, with the typing script starting at `now_ms`.
    pub fn new(profile: &DeviceProfile, options: HeroOptions, now_ms: f64) -> Self {
        let camera = CameraState {
            antialias: profile.tier == PerformanceTier::High,
            ..CameraState::looking_at_origin(HERO_CAMERA_Z, HERO_CAMERA_FOV)
        };
        Self {
            stack: DecoratorStack::hero(profile, options.seed),
            typing: options.typing.map(|config| TypingScript::new(config, now_ms)),
            port: BufferingPort::new(),
            camera,
            pointer: Pointer::CENTER,
            epoch: 0,
            started_ms: None,
        }
    }

    /// Decorators in draw order.
    pub fn decorators(&self) -> Vec<&'static str> {
        self.stack.names()
    }

    /// Record a normalized pointer.
    pub fn on_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// The hero scrolled back into view: restart the headline.
    pub fn on_enter_view(&mut self, now_ms: f64) {
        if let Some(script) = &mut self.typing {
            script.reset(now_ms);
        }
    }

    /// Advance one frame.
    pub fn frame(&mut self, now_ms: f64, progress: f32) -> HeroFrame {
        let started = *self.started_ms.get_or_insert(now_ms);
        #[allow(clippy::cast_possible_truncation)]
        let time_s = ((now_ms - started).max(0.0) / 1000.0) as f32;
        let input = MotionInput {
            time_s,
            progress: progress.clamp(0.0, 1.0),
            pointer: self.pointer,
        };
        self.epoch += 1;
        let mut ops = Vec::new();
        self.stack.frame(&input, &mut ops);
        let delta = SceneDelta { epoch: self.epoch, ops };
        if self.port.apply_scene_delta(&delta).is_ok() {
            self.port.set_camera(&camera_rig(&self.camera, self.pointer));
            self.port.render();
        }
        let typing = self.typing.as_mut().map(|script| {
            script.tick(now_ms);
            script.frame(now_ms)
        });
        HeroFrame {
            scene: self.port.take(),
            typing,
        }
    }

    /// The page lost the hero's WebGL context; later frames draw nothing.
    pub fn on_context_lost(&mut self, reason: &str) {
        self.port.mark_lost(reason);
    }

    /// Hero unmounted: stop the headline and release the scene.
    pub fn dispose(&mut self) -> PendingScene {
        if let Some(script) = &mut self.typing {
            script.cancel();
        }
        self.port.dispose();
        self.port.take()
    }
}

/// Hero section JS class.
#[wasm_bindgen]
pub struct HeroController {
    session: HeroSession,
}

#[wasm_bindgen]
impl HeroController {
    /// Create from `{ seed?, typing? }`; `now_ms` is the page clock.
    ///
    /// # Errors
    ///
    /// Returns an error when the options do not deserialize.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue, now_ms: f64) -> Result<HeroController, JsError> {
        install_panic_hook();
        let options: HeroOptions = serde_wasm_bindgen::from_value(options)?;
        let profile = detect(&BrowserProbe::new());
        Ok(Self {
            session: HeroSession::new(&profile, options, now_ms),
        })
    }

    /// `pointermove` listener with viewport-normalized coordinates.
    pub fn on_pointer_move(
        &mut self,
        client_x: f32,
        client_y: f32,
        viewport_width: f32,
        viewport_height: f32,
    ) {
        self.session
            .on_pointer(Pointer::from_client(client_x, client_y, viewport_width, viewport_height));
    }

    /// Hero came back into view.
    pub fn on_enter_view(&mut self, now_ms: f64) {
        self.session.on_enter_view(now_ms);
    }

    /// `webglcontextlost` listener.
    pub fn on_context_lost(&mut self, reason: &str) {
        self.session.on_context_lost(reason);
    }

    /// Advance one frame: `{ scene, typing }`.
    pub fn frame(&mut self, now_ms: f64, progress: f32) -> Result<JsValue, JsError> {
        to_js(&self.session.frame(now_ms, progress))
    }

    /// Unmount; returns the final `{ dispose: true }` scene batch.
    pub fn dispose(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.session.dispose())
    }
}
