// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hero typewriter with one scripted typo.
//!
//! The host calls [`TypingScript::tick`] from its frame callback; every step
//! whose deadline has passed is applied in order, so a stalled tab catches
//! up instead of skipping characters. Jitter comes from a seed, which makes
//! the whole script reproducible.

use serde::{Deserialize, Serialize};

use crate::seed::SeededUnit;

/// Typewriter timings and script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypingConfig {
    /// Final text.
    pub text: String,
    /// Character index at which the typo happens; out of range disables it.
    pub typo_index: usize,
    /// Wrong character typed at `typo_index`.
    pub typo_char: char,
    /// Base delay between characters.
    pub typing_speed_ms: f64,
    /// Delay before the wrong character is deleted.
    pub delete_speed_ms: f64,
    /// How long "oops" and the shake stay up.
    pub oops_ms: f64,
    /// Pause after the wrong character before "oops".
    pub pause_after_typo_ms: f64,
    /// Extra delay before a space or the end of text.
    pub word_pause_ms: f64,
    /// Symmetric jitter around the base speed.
    pub jitter_ms: f64,
    /// Lower bound for a jittered delay.
    pub min_delay_ms: f64,
    /// Delay before the first character.
    pub initial_delay_ms: f64,
    /// Cursor blink half-period.
    pub cursor_blink_ms: f64,
    /// Jitter seed.
    pub seed: u64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            typo_index: usize::MAX,
            typo_char: ' ',
            typing_speed_ms: 120.0,
            delete_speed_ms: 80.0,
            oops_ms: 800.0,
            pause_after_typo_ms: 600.0,
            word_pause_ms: 200.0,
            jitter_ms: 20.0,
            min_delay_ms: 60.0,
            initial_delay_ms: 800.0,
            cursor_blink_ms: 530.0,
            seed: 0,
        }
    }
}

/// Script phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypingPhase {
    /// Typing normally.
    Typing,
    /// Wrong character on screen, not yet noticed.
    TypoPause,
    /// "oops" shown, text shaking.
    Oops,
    /// About to delete.
    Deleting,
    /// Wrong character deleted; about to type the right one.
    Correcting,
    /// Done.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    TypeNext,
    ShowOops,
    StopShake,
    Delete,
    Correct,
}

/// Visible typewriter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingFrame {
    /// Text on screen.
    pub text: String,
    /// Phase.
    pub phase: TypingPhase,
    /// Cursor visible this frame.
    pub cursor_visible: bool,
    /// "oops" bubble visible.
    pub show_oops: bool,
    /// Shake animation active.
    pub shaking: bool,
}

/// Running typewriter.
#[derive(Debug, Clone)]
pub struct TypingScript {
    config: TypingConfig,
    chars: Vec<char>,
    rng: SeededUnit,
    draws: u32,
    started_ms: f64,
    pending: Option<(f64, Step)>,
    index: usize,
    typo_done: bool,
    display: String,
    phase: TypingPhase,
    show_oops: bool,
    shaking: bool,
}

impl TypingScript {
    /// Script starting at `now_ms`.
    pub fn new(config: TypingConfig, now_ms: f64) -> Self {
        let chars = config.text.chars().collect();
        let rng = SeededUnit::new(config.seed);
        let mut script = Self {
            config,
            chars,
            rng,
            draws: 0,
            started_ms: now_ms,
            pending: None,
            index: 0,
            typo_done: false,
            display: String::new(),
            phase: TypingPhase::Typing,
            show_oops: false,
            shaking: false,
        };
        script.reset(now_ms);
        script
    }

    /// Restart from an empty line.
    pub fn reset(&mut self, now_ms: f64) {
        self.draws = 0;
        self.started_ms = now_ms;
        self.pending = Some((now_ms + self.config.initial_delay_ms, Step::TypeNext));
        self.index = 0;
        self.typo_done = false;
        self.display.clear();
        self.phase = TypingPhase::Typing;
        self.show_oops = false;
        self.shaking = false;
    }

    /// Cancel pending steps (unmount). The frame stays as it is.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether the script has finished.
    pub fn is_complete(&self) -> bool {
        self.phase == TypingPhase::Complete
    }

    /// Apply every step due at `now_ms`; returns whether anything changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        while let Some((due, step)) = self.pending {
            if now_ms < due {
                break;
            }
            self.pending = None;
            self.apply(step, due);
            changed = true;
        }
        changed
    }

    /// Visible state at `now_ms`.
    pub fn frame(&self, now_ms: f64) -> TypingFrame {
        TypingFrame {
            text: self.display.clone(),
            phase: self.phase,
            cursor_visible: self.cursor_visible(now_ms),
            show_oops: self.show_oops,
            shaking: self.shaking,
        }
    }

    /// Cursor blink: visible on even half-periods since start.
    pub fn cursor_visible(&self, now_ms: f64) -> bool {
        if self.config.cursor_blink_ms <= 0.0 {
            return true;
        }
        let periods = ((now_ms - self.started_ms).max(0.0) / self.config.cursor_blink_ms).floor();
        periods % 2.0 < 1.0
    }

    fn jittered(&mut self, word_end: bool) -> f64 {
        let c = &self.config;
        let u = f64::from(self.rng.unit("typing.jitter", self.draws));
        self.draws = self.draws.wrapping_add(1);
        let delay = (c.typing_speed_ms + (u * 2.0 - 1.0) * c.jitter_ms).max(c.min_delay_ms);
        if word_end {
            delay + c.word_pause_ms
        } else {
            delay
        }
    }

    fn schedule(&mut self, at: f64, step: Step) {
        self.pending = Some((at, step));
    }

    fn apply(&mut self, step: Step, at: f64) {
        match step {
            Step::TypeNext => {
                if self.index >= self.chars.len() {
                    self.phase = TypingPhase::Complete;
                    return;
                }
                if self.index == self.config.typo_index && !self.typo_done {
                    self.typo_done = true;
                    self.display.push(self.config.typo_char);
                    self.phase = TypingPhase::TypoPause;
                    self.schedule(at + self.config.pause_after_typo_ms, Step::ShowOops);
                    return;
                }
                self.display.push(self.chars[self.index]);
                self.phase = TypingPhase::Typing;
                self.index += 1;
                let word_end = self.index == self.chars.len() || self.chars[self.index] == ' ';
                let delay = self.jittered(word_end);
                self.schedule(at + delay, Step::TypeNext);
            }
            Step::ShowOops => {
                self.shaking = true;
                self.show_oops = true;
                self.phase = TypingPhase::Oops;
                self.schedule(at + self.config.oops_ms, Step::StopShake);
            }
            Step::StopShake => {
                self.shaking = false;
                self.phase = TypingPhase::Deleting;
                self.schedule(at + self.config.delete_speed_ms, Step::Delete);
            }
            Step::Delete => {
                self.display.pop();
                self.show_oops = false;
                self.phase = TypingPhase::Correcting;
                let delay = self.jittered(false);
                self.schedule(at + delay, Step::Correct);
            }
            Step::Correct => {
                if let Some(&c) = self.chars.get(self.index) {
                    self.display.push(c);
                }
                self.phase = TypingPhase::Typing;
                self.index += 1;
                let word_end = self.chars.get(self.index) == Some(&' ');
                let delay = self.jittered(word_end);
                self.schedule(at + delay, Step::TypeNext);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(text: &str, typo_index: usize, typo_char: char, seed: u64) -> TypingScript {
        TypingScript::new(
            TypingConfig {
                text: text.into(),
                typo_index,
                typo_char,
                seed,
                ..TypingConfig::default()
            },
            0.0,
        )
    }

    #[test]
    fn nothing_before_initial_delay() {
        let mut s = script("hi", usize::MAX, ' ', 1);
        assert!(!s.tick(799.0));
        assert_eq!(s.frame(799.0).text, "");
        assert!(s.tick(800.0));
        assert_eq!(s.frame(800.0).text, "h");
    }

    #[test]
    fn typo_is_shown_then_corrected() {
        let mut s = script("cat", 1, 'x', 3);
        s.tick(800.0);
        // First char plus at most 140 ms jitter reaches the typo.
        s.tick(800.0 + 140.0);
        assert_eq!(s.frame(0.0).text, "cx");
        assert_eq!(s.frame(0.0).phase, TypingPhase::TypoPause);
        s.tick(940.0 + 600.0);
        let f = s.frame(0.0);
        assert!(f.show_oops && f.shaking);
        s.tick(1540.0 + 800.0 + 80.0);
        assert_eq!(s.frame(0.0).text, "c");
        assert_eq!(s.frame(0.0).phase, TypingPhase::Correcting);
        assert!(s.tick(100_000.0));
        assert_eq!(s.frame(0.0).text, "cat");
        assert!(s.is_complete());
    }

    #[test]
    fn same_seed_same_schedule() {
        let mut a = script("hello world", 4, 'p', 42);
        let mut b = script("hello world", 4, 'p', 42);
        for t in (0..8000).step_by(16) {
            let now = f64::from(t);
            a.tick(now);
            b.tick(now);
            assert_eq!(a.frame(now), b.frame(now));
        }
        assert!(a.is_complete());
    }

    #[test]
    fn cursor_blinks() {
        let s = script("x", usize::MAX, ' ', 0);
        assert!(s.cursor_visible(0.0));
        assert!(!s.cursor_visible(530.0));
        assert!(s.cursor_visible(1060.0));
    }

    #[test]
    fn cancel_stops_progress() {
        let mut s = script("abc", usize::MAX, ' ', 0);
        s.tick(800.0);
        s.cancel();
        assert!(!s.tick(10_000.0));
        assert_eq!(s.frame(0.0).text, "a");
    }
}
