//! The full set of gamepad buttons, polled together.
//!
//! Every button is sampled from its own line on every poll; one button's
//! state never gates another's.

use crate::ui::buttons::{ButtonSampler, DebouncedButton, SamplingPolicy};
use crate::ui::{ButtonId, LogicalState, TransitionEvent};
use core::slice;
use embedded_hal::digital::InputPin;

pub struct ButtonPanel<P, S, const N: usize> {
    buttons: [DebouncedButton<P, S>; N],
}

impl<P: InputPin, S: ButtonSampler, const N: usize> ButtonPanel<P, S, N> {
    pub fn new(buttons: [DebouncedButton<P, S>; N]) -> Self {
        Self { buttons }
    }

    pub const fn policy(&self) -> SamplingPolicy {
        S::POLICY
    }

    /// Sample every button once at `now_ms`.
    ///
    /// The returned iterator is lazy: each `next()` reads pins until the
    /// next accepted transition, so the caller can forward each event
    /// before the remaining buttons are read. Dropping it early leaves
    /// the rest unsampled until the next poll.
    pub fn poll(&mut self, now_ms: u64) -> PanelEvents<'_, P, S> {
        PanelEvents {
            buttons: self.buttons.iter_mut(),
            now_ms,
        }
    }

    /// Debounced state of one button; `false` if it isn't on this panel.
    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons
            .iter()
            .find(|b| b.id() == id)
            .is_some_and(|b| b.logical_state() == LogicalState::Pressed)
    }
}

/// Transitions accepted during one [`ButtonPanel::poll`], in scan order.
pub struct PanelEvents<'a, P, S> {
    buttons: slice::IterMut<'a, DebouncedButton<P, S>>,
    now_ms: u64,
}

impl<P: InputPin, S: ButtonSampler> Iterator for PanelEvents<'_, P, S> {
    type Item = Result<TransitionEvent, P::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        for button in self.buttons.by_ref() {
            match button.sample(self.now_ms) {
                Ok(Some(edge)) => return Some(Ok(TransitionEvent::new(button.id(), edge))),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
