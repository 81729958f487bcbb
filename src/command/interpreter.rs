//! Robot side: turn the last received command into a drive action.

use super::codec::{classify_token, Command};
use super::token::Token;
use crate::ui::{ButtonId, Edge};

/// What the robot should be doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    PenUp,
    PenDown,
    Stop,
    Noop,
}

/// Drive and pen outputs. Implemented by the robot binary on GPIO and by
/// recording mocks in tests.
pub trait Actuator {
    type Error;

    fn forward(&mut self) -> Result<(), Self::Error>;
    fn backward(&mut self) -> Result<(), Self::Error>;
    fn turn_left(&mut self) -> Result<(), Self::Error>;
    fn turn_right(&mut self) -> Result<(), Self::Error>;
    fn pen_up(&mut self) -> Result<(), Self::Error>;
    fn pen_down(&mut self) -> Result<(), Self::Error>;
    fn stop(&mut self) -> Result<(), Self::Error>;
}

impl Action {
    fn for_press(button: ButtonId) -> Self {
        match button {
            ButtonId::Up => Action::Forward,
            ButtonId::Down => Action::Backward,
            ButtonId::Left => Action::TurnLeft,
            ButtonId::Right => Action::TurnRight,
            ButtonId::A => Action::PenDown,
            ButtonId::B => Action::PenUp,
            _ => Action::Noop,
        }
    }

    /// Drive the actuator. `Noop` touches nothing.
    pub fn dispatch<A: Actuator>(self, actuator: &mut A) -> Result<(), A::Error> {
        match self {
            Action::Forward => actuator.forward(),
            Action::Backward => actuator.backward(),
            Action::TurnLeft => actuator.turn_left(),
            Action::TurnRight => actuator.turn_right(),
            Action::PenUp => actuator.pen_up(),
            Action::PenDown => actuator.pen_down(),
            Action::Stop => actuator.stop(),
            Action::Noop => Ok(()),
        }
    }
}

pub fn interpret(command: Option<&Token>) -> Action {
    let Some(token) = command else {
        return Action::Stop;
    };
    match classify_token(token) {
        Command::Idle => Action::Stop,
        Command::Press(button) => Action::for_press(button),
        Command::Transition(event) => match event.edge {
            Edge::Down => Action::for_press(event.button),
            Edge::Up => Action::Stop,
        },
        Command::Unknown => {
            warn!("interpreter: unknown command {}", token);
            Action::Noop
        }
    }
}

/// Polled interpreter. Re-dispatches on every poll so the drive keeps
/// running while a direction is held.
#[derive(Debug, Default)]
pub struct Interpreter {
    last: Option<Action>,
}

impl Interpreter {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Last action actually dispatched.
    pub fn last_action(&self) -> Option<Action> {
        self.last
    }

    pub fn poll<A: Actuator>(&mut self, command: Option<&Token>, actuator: &mut A) -> Result<Action, A::Error> {
        let action = interpret(command);
        if action == Action::Noop {
            return Ok(action);
        }
        if self.last != Some(action) {
            debug!("interpreter: {} -> {}", self.last, action);
        }
        action.dispatch(actuator)?;
        self.last = Some(action);
        Ok(action)
    }
}
