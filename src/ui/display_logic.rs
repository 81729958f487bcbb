//! Text shown on the gamepad's OLED, kept free of driver types so it can
//! be tested on the host.

use crate::command::Token;
use crate::config::TOKEN_MAX_LEN;
use heapless::String;

/// First line: link state.
pub fn status_caption(connected: bool) -> &'static str {
    if connected {
        "Connected"
    } else {
        "Advertising"
    }
}

/// Second line: the last token sent, with `_` shown as a space.
/// The idle sentinel renders as an empty line.
pub fn event_caption(token: &Token) -> String<TOKEN_MAX_LEN> {
    let mut out = String::new();
    if token.is_idle() {
        return out;
    }
    for c in token.as_str().chars() {
        // Token length is bounded by TOKEN_MAX_LEN, so this never overflows.
        let _ = out.push(if c == '_' { ' ' } else { c });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captions() {
        assert_eq!(status_caption(true), "Connected");
        assert_eq!(status_caption(false), "Advertising");
    }

    #[test]
    fn event_caption_replaces_separator() {
        let t = Token::new("A_down").unwrap();
        assert_eq!(event_caption(&t).as_str(), "A down");
        let t = Token::new("Select_up").unwrap();
        assert_eq!(event_caption(&t).as_str(), "Select up");
    }

    #[test]
    fn idle_token_has_empty_caption() {
        assert!(event_caption(&Token::idle()).is_empty());
    }
}
