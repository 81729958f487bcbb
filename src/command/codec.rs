//! Button event <-> wire token mapping.
//!
//! Edge-debounce gamepads send `<Name>_down` / `<Name>_up`. Level-debounce
//! gamepads send the bare button name on every accepted press and the idle
//! sentinel once the button is released. The robot accepts both.

use super::token::Token;
use crate::ui::buttons::SamplingPolicy;
use crate::ui::{ButtonId, Edge, TransitionEvent};

const SEPARATOR: char = '_';

/// What a characteristic value means to the robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Transition(TransitionEvent),
    Press(ButtonId),
    Idle,
    Unknown,
}

/// Token for a transition, e.g. `Left_up`.
pub fn encode(button: ButtonId, edge: Edge) -> Token {
    let mut text: heapless::String<{ crate::config::TOKEN_MAX_LEN }> = heapless::String::new();
    // Longest is "Select_down" (11 bytes).
    let _ = text.push_str(button.name());
    let _ = text.push(SEPARATOR);
    let _ = text.push_str(edge.suffix());
    Token::new(&text).unwrap_or_default()
}

/// Token for a level-policy press: the bare button name.
pub fn encode_press(button: ButtonId) -> Token {
    Token::new(button.name()).unwrap_or_default()
}

/// Token the gamepad publishes for `event` under the given sampling policy.
pub fn encode_event(policy: SamplingPolicy, event: TransitionEvent) -> Token {
    match (policy, event.edge) {
        (SamplingPolicy::Edge, edge) => encode(event.button, edge),
        (SamplingPolicy::Level, Edge::Down) => encode_press(event.button),
        (SamplingPolicy::Level, Edge::Up) => Token::idle(),
    }
}

/// Inverse of [`encode`]. Case-insensitive; anything that isn't a
/// `<Name>_<down|up>` pair is `None`.
pub fn decode(token: &Token) -> Option<TransitionEvent> {
    let (name, suffix) = token.as_str().trim().rsplit_once(SEPARATOR)?;
    let button = ButtonId::from_name(name)?;
    let edge = [Edge::Down, Edge::Up]
        .into_iter()
        .find(|e| e.suffix().eq_ignore_ascii_case(suffix))?;
    Some(TransitionEvent::new(button, edge))
}

/// Classify an already-validated token.
pub fn classify_token(token: &Token) -> Command {
    if token.is_idle() {
        return Command::Idle;
    }
    if let Some(event) = decode(token) {
        return Command::Transition(event);
    }
    match ButtonId::from_name(token.as_str()) {
        Some(button) => Command::Press(button),
        None => Command::Unknown,
    }
}

/// Classify raw bytes read from the characteristic. Never panics.
pub fn classify(raw: &[u8]) -> Command {
    match Token::from_bytes(raw) {
        Ok(token) => classify_token(&token),
        Err(_) => Command::Unknown,
    }
}
