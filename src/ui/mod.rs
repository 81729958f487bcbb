//! User interface subsystem - physical buttons, status LED and OLED.
//!
//! ## Components
//!
//! - **Buttons**: 11 tactile switches, active-low, debounced by one of two
//!   sampling policies (`buttons`), grouped into a polled panel (`panel`)
//! - **Status LED**: blink rate reflects the link state (`status_led`)
//! - **Display**: SSD1306 128×64 OLED via I²C (`display`, embedded only)

pub mod buttons;
#[cfg(feature = "embedded")]
pub mod display;
pub mod display_logic;
pub mod panel;
pub mod status_led;

/// Physical gamepad buttons, in panel scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    A,
    B,
    X,
    Y,
    Up,
    Down,
    Left,
    Right,
    Start,
    Select,
    Menu,
}

impl ButtonId {
    /// Every button, in the fixed order the panel scans them.
    pub const ALL: [ButtonId; 11] = [
        ButtonId::A,
        ButtonId::B,
        ButtonId::X,
        ButtonId::Y,
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::Start,
        ButtonId::Select,
        ButtonId::Menu,
    ];

    /// Canonical wire name.
    pub const fn name(self) -> &'static str {
        match self {
            ButtonId::A => "A",
            ButtonId::B => "B",
            ButtonId::X => "X",
            ButtonId::Y => "Y",
            ButtonId::Up => "Up",
            ButtonId::Down => "Down",
            ButtonId::Left => "Left",
            ButtonId::Right => "Right",
            ButtonId::Start => "Start",
            ButtonId::Select => "Select",
            ButtonId::Menu => "Menu",
        }
    }

    /// Look a button up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(name))
    }
}

/// Direction of an accepted transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Button went down (pressed).
    Down,
    /// Button came back up (released).
    Up,
}

impl Edge {
    /// Wire suffix used after the `_` separator.
    pub const fn suffix(self) -> &'static str {
        match self {
            Edge::Down => "down",
            Edge::Up => "up",
        }
    }
}

/// Debounced state of a single button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicalState {
    Pressed,
    #[default]
    Released,
}

/// One accepted button transition, produced by the panel and consumed
/// immediately by the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransitionEvent {
    pub button: ButtonId,
    pub edge: Edge,
}

impl TransitionEvent {
    pub const fn new(button: ButtonId, edge: Edge) -> Self {
        Self { button, edge }
    }
}
