//! GPIO button input with debouncing.
//!
//! Buttons are active-low with internal pull-up and are polled, not
//! interrupt driven. Two sampling policies exist because the gamepad has
//! been built both ways:
//!
//! - [`LevelDebounce`]: one-shot command sends. `is_pressed` fires at most
//!   once per debounce window while the button is held.
//! - [`EdgeDebounce`]: press/release notifications. `state_changed` reports
//!   each physical transition exactly once.
//!
//! Both implement [`ButtonSampler`], so the panel and the codec don't care
//! which one a build uses.

use crate::config::BUTTON_DEBOUNCE_MS;
use crate::ui::{ButtonId, Edge, LogicalState};
use embedded_hal::digital::InputPin;

/// Which wire encoding a sampling policy pairs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplingPolicy {
    /// Repeated presses while held, bare button name on the wire.
    Level,
    /// One down + one up per physical press, `<Name>_down` / `<Name>_up`.
    Edge,
}

/// A debounce state machine fed with raw level observations.
pub trait ButtonSampler {
    /// Encoding used for events from this sampler.
    const POLICY: SamplingPolicy;

    /// Feed one observation (`pressed` = raw line is low) taken at
    /// `now_ms`. Returns the transition accepted by this sample, if any.
    fn sample(&mut self, pressed: bool, now_ms: u64) -> Option<Edge>;

    /// Current debounced state.
    fn logical_state(&self) -> LogicalState;
}

fn window_elapsed(last_ms: Option<u64>, now_ms: u64, window_ms: u32) -> bool {
    match last_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= u64::from(window_ms),
    }
}

/// Level policy: every accepted read is gated by the debounce window.
#[derive(Clone, Debug)]
pub struct LevelDebounce {
    window_ms: u32,
    last_accepted_ms: Option<u64>,
    state: LogicalState,
}

impl LevelDebounce {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_accepted_ms: None,
            state: LogicalState::Released,
        }
    }

    /// True when a press is accepted by this sample.
    ///
    /// While the button stays held this keeps returning true once per
    /// window, never twice within `window_ms`.
    pub fn is_pressed(&mut self, pressed: bool, now_ms: u64) -> bool {
        let open = window_elapsed(self.last_accepted_ms, now_ms, self.window_ms);
        if pressed {
            if open {
                self.last_accepted_ms = Some(now_ms);
                self.state = LogicalState::Pressed;
                return true;
            }
        } else if open && self.state == LogicalState::Pressed {
            self.last_accepted_ms = Some(now_ms);
            self.state = LogicalState::Released;
        }
        false
    }
}

impl Default for LevelDebounce {
    fn default() -> Self {
        Self::new(BUTTON_DEBOUNCE_MS)
    }
}

impl ButtonSampler for LevelDebounce {
    const POLICY: SamplingPolicy = SamplingPolicy::Level;

    fn sample(&mut self, pressed: bool, now_ms: u64) -> Option<Edge> {
        let before = self.state;
        if self.is_pressed(pressed, now_ms) {
            return Some(Edge::Down);
        }
        (before == LogicalState::Pressed && self.state == LogicalState::Released)
            .then_some(Edge::Up)
    }

    fn logical_state(&self) -> LogicalState {
        self.state
    }
}

/// Edge policy: tracks `was_pressed` against the raw level. Releases are
/// taken immediately; a press needs the window since the last accepted
/// transition to have passed.
///
/// A press that starts inside the window is latched and reported once the
/// window opens, followed by its release if the line already went high.
#[derive(Clone, Debug)]
pub struct EdgeDebounce {
    window_ms: u32,
    last_transition_ms: Option<u64>,
    was_pressed: bool,
    press_pending: bool,
    release_pending: bool,
}

impl EdgeDebounce {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_transition_ms: None,
            was_pressed: false,
            press_pending: false,
            release_pending: false,
        }
    }

    /// Returns `(went_down, went_up)`; at most one of them is true.
    pub fn state_changed(&mut self, pressed: bool, now_ms: u64) -> (bool, bool) {
        if self.was_pressed {
            if self.release_pending || !pressed {
                self.release_pending = false;
                self.was_pressed = false;
                self.last_transition_ms = Some(now_ms);
                return (false, true);
            }
            return (false, false);
        }

        if pressed || self.press_pending {
            if window_elapsed(self.last_transition_ms, now_ms, self.window_ms) {
                self.press_pending = false;
                self.release_pending = !pressed;
                self.was_pressed = true;
                self.last_transition_ms = Some(now_ms);
                return (true, false);
            }
            self.press_pending = true;
        }
        (false, false)
    }
}

impl Default for EdgeDebounce {
    fn default() -> Self {
        Self::new(BUTTON_DEBOUNCE_MS)
    }
}

impl ButtonSampler for EdgeDebounce {
    const POLICY: SamplingPolicy = SamplingPolicy::Edge;

    fn sample(&mut self, pressed: bool, now_ms: u64) -> Option<Edge> {
        match self.state_changed(pressed, now_ms) {
            (true, _) => Some(Edge::Down),
            (_, true) => Some(Edge::Up),
            _ => None,
        }
    }

    fn logical_state(&self) -> LogicalState {
        if self.was_pressed {
            LogicalState::Pressed
        } else {
            LogicalState::Released
        }
    }
}

/// A button bound to its input line and sampling policy.
pub struct DebouncedButton<P, S> {
    id: ButtonId,
    pin: P,
    sampler: S,
}

impl<P: InputPin, S: ButtonSampler> DebouncedButton<P, S> {
    pub fn new(id: ButtonId, pin: P, sampler: S) -> Self {
        Self { id, pin, sampler }
    }

    pub fn id(&self) -> ButtonId {
        self.id
    }

    pub fn logical_state(&self) -> LogicalState {
        self.sampler.logical_state()
    }

    /// Read the line once and run it through the sampler.
    pub fn sample(&mut self, now_ms: u64) -> Result<Option<Edge>, P::Error> {
        let pressed = self.pin.is_low()?;
        Ok(self.sampler.sample(pressed, now_ms))
    }
}

impl<P: InputPin> DebouncedButton<P, LevelDebounce> {
    pub fn is_pressed(&mut self, now_ms: u64) -> Result<bool, P::Error> {
        let pressed = self.pin.is_low()?;
        Ok(self.sampler.is_pressed(pressed, now_ms))
    }
}

impl<P: InputPin> DebouncedButton<P, EdgeDebounce> {
    pub fn state_changed(&mut self, now_ms: u64) -> Result<(bool, bool), P::Error> {
        let pressed = self.pin.is_low()?;
        Ok(self.sampler.state_changed(pressed, now_ms))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
