//! Task bodies shared by the two firmware images.
//!
//! The `#[embassy_executor::task]` wrappers in the binaries only pick
//! concrete pins and call into these, so the loops run on the host too.

use crate::ble::peripheral::{PeripheralLink, Publish};
use crate::ble::transport::PeripheralTransport;
use crate::ble::LinkStatus;
use crate::command::{Actuator, Interpreter};
use crate::error::Error;
use crate::ui::buttons::ButtonSampler;
use crate::ui::panel::ButtonPanel;
use core::convert::Infallible;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;

/// Poll the panel once and publish every accepted transition, in scan
/// order. Returns how many tokens went out.
pub fn panel_tick<P, S, const N: usize, M, T>(
    panel: &mut ButtonPanel<P, S, N>,
    link: &PeripheralLink<M, T::Peer>,
    transport: &T,
    now_ms: u64,
) -> Result<usize, Error>
where
    P: InputPin,
    S: ButtonSampler,
    M: RawMutex,
    T: PeripheralTransport,
{
    let policy = panel.policy();
    let mut sent = 0;
    for event in panel.poll(now_ms) {
        let event = event.map_err(|_| Error::InputRead)?;
        trace!("panel: {}", event);
        if let Publish::Sent(_) = link.publish(transport, policy, event) {
            sent += 1;
        }
    }
    Ok(sent)
}

/// Panel task body: poll every `period_ms` forever. Only a pin read error
/// ends it.
pub async fn run_panel<P, S, const N: usize, M, T, D, C>(
    mut panel: ButtonPanel<P, S, N>,
    link: &PeripheralLink<M, T::Peer>,
    transport: &T,
    mut delay: D,
    clock: C,
    period_ms: u32,
) -> Result<Infallible, Error>
where
    P: InputPin,
    S: ButtonSampler,
    M: RawMutex,
    T: PeripheralTransport,
    D: DelayNs,
    C: Fn() -> u64,
{
    loop {
        panel_tick(&mut panel, link, transport, clock())?;
        delay.delay_ms(period_ms).await;
    }
}

/// One interpreter poll. A disconnected link counts as "no command".
pub fn interpreter_tick<L, A>(
    interpreter: &mut Interpreter,
    link: &L,
    actuator: &mut A,
) -> Result<crate::command::Action, Error>
where
    L: LinkStatus,
    A: Actuator,
{
    let command = if link.is_connected() {
        link.last_command()
    } else {
        None
    };
    interpreter
        .poll(command.as_ref(), actuator)
        .map_err(|_| Error::OutputWrite)
}

/// Interpreter task body: poll every `period_ms` forever.
pub async fn run_interpreter<L, A, D>(
    link: &L,
    actuator: &mut A,
    mut delay: D,
    period_ms: u32,
) -> Result<Infallible, Error>
where
    L: LinkStatus,
    A: Actuator,
    D: DelayNs,
{
    let mut interpreter = Interpreter::new();
    loop {
        interpreter_tick(&mut interpreter, link, actuator)?;
        delay.delay_ms(period_ms).await;
    }
}
