//! Command transport protocol.
//!
//! - `token`: the bounded ASCII value carried on the button characteristic
//! - `codec`: button event ⇄ token, and classification of raw reads
//! - `interpreter`: robot-side mapping from command to drive action

pub mod codec;
pub mod interpreter;
pub mod token;

pub use codec::{classify, decode, encode, encode_event, encode_press, Command};
pub use interpreter::{interpret, Action, Actuator, Interpreter};
pub use token::{Token, IDLE_TOKEN};
