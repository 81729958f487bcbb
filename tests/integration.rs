//! Integration tests for the host-testable gamepad → robot pipeline.
//!
//! Pins, radios and the actuator are mocks; everything between them is the
//! real library code.

use ble_gamepad::ble::central::{CentralConfig, CentralLink, CentralRunner};
use ble_gamepad::ble::peripheral::{PeripheralConfig, PeripheralLink, PeripheralRunner};
use ble_gamepad::ble::scanner::ScanFilter;
use ble_gamepad::ble::transport::{CentralTransport, Payload, PeripheralTransport};
use ble_gamepad::ble::ConnectionPhase;
use ble_gamepad::command::{Action, Actuator, Interpreter, Token};
use ble_gamepad::error::RadioError;
use ble_gamepad::tasks::{interpreter_tick, panel_tick};
use ble_gamepad::ui::buttons::{ButtonSampler, DebouncedButton, EdgeDebounce, LevelDebounce};
use ble_gamepad::ui::panel::ButtonPanel;
use ble_gamepad::ui::ButtonId;
use core::convert::Infallible;
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

// ═══════════════════════════════════════════════════════════════════════════
// Mocks
// ═══════════════════════════════════════════════════════════════════════════

struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// `true` = held (line low).
#[derive(Clone)]
struct FakePin(Rc<Cell<bool>>);

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }
}

/// Characteristic value shared by the fake gamepad radio and the fake robot
/// radio, standing in for the air link.
type Air = Rc<RefCell<Vec<u8>>>;

struct GamepadRadio {
    air: Air,
    notified: RefCell<Vec<String>>,
}

impl GamepadRadio {
    fn new(air: Air) -> Self {
        Self {
            air,
            notified: RefCell::new(Vec::new()),
        }
    }
}

impl PeripheralTransport for GamepadRadio {
    type Peer = u8;

    async fn advertise(&self) -> Result<u8, RadioError> {
        Ok(1)
    }

    async fn disconnected(&self, _peer: &u8) {}

    fn set_value(&self, token: &Token) -> Result<(), RadioError> {
        *self.air.borrow_mut() = token.as_bytes().to_vec();
        Ok(())
    }

    fn notify(&self, _peer: &u8, token: &Token) -> Result<(), RadioError> {
        self.notified.borrow_mut().push(token.as_str().to_string());
        Ok(())
    }

    fn disconnect(&self, _peer: &u8) {}
}

struct RobotRadio {
    air: Air,
    scans: VecDeque<Option<u8>>,
    connect_calls: usize,
}

impl RobotRadio {
    fn new(air: Air) -> Self {
        Self {
            air,
            scans: VecDeque::new(),
            connect_calls: 0,
        }
    }
}

impl CentralTransport for RobotRadio {
    type Target = u8;
    type Connection = u8;
    type Characteristic = ();

    async fn scan(&mut self, _filter: &ScanFilter, _window_ms: u32) -> Result<Option<u8>, RadioError> {
        Ok(self.scans.pop_front().unwrap_or(Some(1)))
    }

    async fn connect(&mut self, target: &u8, _timeout_ms: u32) -> Result<u8, RadioError> {
        self.connect_calls += 1;
        Ok(*target)
    }

    async fn discover(&mut self, _conn: &u8) -> Result<(), RadioError> {
        Ok(())
    }

    async fn read(&mut self, _conn: &u8, _c: &(), _timeout_ms: u32) -> Result<Payload, RadioError> {
        Payload::from_slice(&self.air.borrow()).map_err(|_| RadioError::ReadFailed)
    }

    fn disconnect(&mut self, _conn: u8) {}
}

#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl Actuator for Recorder {
    type Error = Infallible;

    fn forward(&mut self) -> Result<(), Infallible> {
        self.calls.push("forward");
        Ok(())
    }
    fn backward(&mut self) -> Result<(), Infallible> {
        self.calls.push("backward");
        Ok(())
    }
    fn turn_left(&mut self) -> Result<(), Infallible> {
        self.calls.push("turn_left");
        Ok(())
    }
    fn turn_right(&mut self) -> Result<(), Infallible> {
        self.calls.push("turn_right");
        Ok(())
    }
    fn pen_up(&mut self) -> Result<(), Infallible> {
        self.calls.push("pen_up");
        Ok(())
    }
    fn pen_down(&mut self) -> Result<(), Infallible> {
        self.calls.push("pen_down");
        Ok(())
    }
    fn stop(&mut self) -> Result<(), Infallible> {
        self.calls.push("stop");
        Ok(())
    }
}

fn panel<S: ButtonSampler>(make: impl Fn() -> S) -> (ButtonPanel<FakePin, S, 11>, Vec<Rc<Cell<bool>>>) {
    let lines: Vec<Rc<Cell<bool>>> = (0..11).map(|_| Rc::new(Cell::new(false))).collect();
    let buttons = std::array::from_fn(|i| DebouncedButton::new(ButtonId::ALL[i], FakePin(lines[i].clone()), make()));
    (ButtonPanel::new(buttons), lines)
}

fn line(lines: &[Rc<Cell<bool>>], id: ButtonId) -> &Rc<Cell<bool>> {
    let idx = ButtonId::ALL.iter().position(|b| *b == id).unwrap();
    &lines[idx]
}

/// Gamepad link already connected to a central.
fn connected_gamepad(radio: &GamepadRadio) -> PeripheralLink<NoopRawMutex, u8> {
    let link = PeripheralLink::new();
    let mut runner = PeripheralRunner::new(&link, radio, NoDelay, || 0, PeripheralConfig::default());
    assert_eq!(block_on(runner.step()), ConnectionPhase::Connected);
    link
}

// ═══════════════════════════════════════════════════════════════════════════
// Gamepad side
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn a_held_for_200ms_sends_down_then_up() {
    let radio = GamepadRadio::new(Air::default());
    let link = connected_gamepad(&radio);
    let (mut panel, lines) = panel(EdgeDebounce::default);

    for t in (0..=300).step_by(10) {
        line(&lines, ButtonId::A).set(t < 200);
        panel_tick(&mut panel, &link, &radio, t).unwrap();
    }

    assert_eq!(*radio.notified.borrow(), ["A_down", "A_up"]);
    assert_eq!(*radio.air.borrow(), b"A_up");
}

#[test]
fn level_policy_repeats_press_then_sends_idle() {
    let radio = GamepadRadio::new(Air::default());
    let link = connected_gamepad(&radio);
    let (mut panel, lines) = panel(LevelDebounce::default);

    for t in (0..=200).step_by(10) {
        line(&lines, ButtonId::Up).set(t < 120);
        panel_tick(&mut panel, &link, &radio, t).unwrap();
    }

    // Presses at 0, 50, 100; release accepted once the window since 100 passes.
    assert_eq!(*radio.notified.borrow(), ["Up", "Up", "Up", "!"]);
}

#[test]
fn presses_before_connection_are_dropped() {
    let radio = GamepadRadio::new(Air::default());
    let link: PeripheralLink<NoopRawMutex, u8> = PeripheralLink::new();
    let (mut panel, lines) = panel(EdgeDebounce::default);

    line(&lines, ButtonId::B).set(true);
    assert_eq!(panel_tick(&mut panel, &link, &radio, 0).unwrap(), 0);
    assert!(radio.notified.borrow().is_empty());
}

#[test]
fn simultaneous_presses_each_get_a_token() {
    let radio = GamepadRadio::new(Air::default());
    let link = connected_gamepad(&radio);
    let (mut panel, lines) = panel(EdgeDebounce::default);

    line(&lines, ButtonId::Left).set(true);
    line(&lines, ButtonId::A).set(true);
    assert_eq!(panel_tick(&mut panel, &link, &radio, 0).unwrap(), 2);
    assert_eq!(*radio.notified.borrow(), ["A_down", "Left_down"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Robot side
// ═══════════════════════════════════════════════════════════════════════════

fn streaming_robot<'a>(
    link: &'a CentralLink<NoopRawMutex, u8>,
    radio: RobotRadio,
) -> CentralRunner<'a, NoopRawMutex, RobotRadio, NoDelay, fn() -> u64> {
    let mut runner = CentralRunner::new(link, radio, NoDelay, (|| 0) as fn() -> u64, CentralConfig::default());
    for expected in [ConnectionPhase::Connecting, ConnectionPhase::Discovering, ConnectionPhase::Streaming] {
        assert_eq!(block_on(runner.step()), expected);
    }
    runner
}

#[test]
fn five_reads_of_up_drive_forward_five_times() {
    let air: Air = Rc::new(RefCell::new(b"up".to_vec()));
    let link = CentralLink::new();
    let mut robot = streaming_robot(&link, RobotRadio::new(air));
    let mut interpreter = Interpreter::new();
    let mut drive = Recorder::default();

    for _ in 0..5 {
        assert_eq!(block_on(robot.step()), ConnectionPhase::Streaming);
        interpreter_tick(&mut interpreter, link.state(), &mut drive).unwrap();
    }

    assert_eq!(drive.calls, ["forward"; 5]);
}

#[test]
fn robot_without_gamepad_keeps_scanning() {
    let link: CentralLink<NoopRawMutex, u8> = CentralLink::new();
    let mut radio = RobotRadio::new(Air::default());
    radio.scans.extend([None; 20]);
    let mut robot = CentralRunner::new(&link, radio, NoDelay, || 0, CentralConfig::default());

    for _ in 0..20 {
        assert_eq!(block_on(robot.step()), ConnectionPhase::Scanning);
    }
    assert_eq!(robot.transport().connect_calls, 0);

    let mut drive = Recorder::default();
    let action = interpreter_tick(&mut Interpreter::new(), link.state(), &mut drive).unwrap();
    assert_eq!(action, Action::Stop);
}

// ═══════════════════════════════════════════════════════════════════════════
// End to end
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn gamepad_press_drives_robot_until_release() {
    let air = Air::default();
    let gamepad_radio = GamepadRadio::new(air.clone());
    let gamepad = connected_gamepad(&gamepad_radio);
    let (mut panel, lines) = panel(EdgeDebounce::default);

    let robot_link = CentralLink::new();
    let mut robot = streaming_robot(&robot_link, RobotRadio::new(air));
    let mut interpreter = Interpreter::new();
    let mut drive = Recorder::default();

    let mut actions = Vec::new();
    for t in (0..=400).step_by(100) {
        // Up held from 100 ms to 300 ms, A tapped at 400 ms.
        line(&lines, ButtonId::Up).set((100..300).contains(&t));
        line(&lines, ButtonId::A).set(t == 400);
        panel_tick(&mut panel, &gamepad, &gamepad_radio, t).unwrap();
        block_on(robot.step());
        actions.push(interpreter_tick(&mut interpreter, robot_link.state(), &mut drive).unwrap());
    }

    assert_eq!(
        actions,
        [
            // Connect resets the value to the idle sentinel.
            Action::Stop,
            Action::Forward,
            Action::Forward,
            Action::Stop,
            Action::PenDown,
        ]
    );
    assert_eq!(drive.calls, ["stop", "forward", "forward", "stop", "pen_down"]);
}
