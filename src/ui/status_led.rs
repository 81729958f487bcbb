//! Status LED: fast blink while there is no link, slow blink once connected.

use crate::ble::LinkStatus;
use crate::config::{BLINK_CONNECTED_MS, BLINK_DISCONNECTED_MS};
use crate::error::Error;
use core::convert::Infallible;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

/// Half-period of the blink for the given link state.
pub const fn blink_period_ms(connected: bool) -> u32 {
    if connected {
        BLINK_CONNECTED_MS
    } else {
        BLINK_DISCONNECTED_MS
    }
}

/// Toggle `led` forever, re-reading the link state before every toggle so
/// a connect or disconnect changes the rate within one half-period.
pub async fn run_status_led<L, O, D>(link: &L, led: &mut O, delay: &mut D) -> Result<Infallible, Error>
where
    L: LinkStatus,
    O: OutputPin,
    D: DelayNs,
{
    let mut on = false;
    loop {
        on = !on;
        led.set_state(PinState::from(on)).map_err(|_| Error::OutputWrite)?;
        delay.delay_ms(blink_period_ms(link.is_connected())).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_blinks_faster() {
        assert_eq!(blink_period_ms(false), 250);
        assert_eq!(blink_period_ms(true), 1_000);
        assert!(blink_period_ms(false) < blink_period_ms(true));
    }
}
