//! Robot firmware - nRF52840 BLE central.
//!
//! Finds the gamepad, polls its button characteristic and drives two DC
//! motors (H-bridge direction lines) and a pen solenoid from the last
//! command.

#![no_std]
#![no_main]

use ble_gamepad::ble::central::{CentralConfig, CentralLink, CentralRunner};
use ble_gamepad::ble::remote_client::ClientRadio;
use ble_gamepad::ble::{stack, Role};
use ble_gamepad::command::Actuator;
use ble_gamepad::config::INTERPRETER_PERIOD_MS;
use ble_gamepad::tasks::run_interpreter;
use ble_gamepad::ui::status_led::run_status_led;
use core::convert::Infallible;
use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use nrf_softdevice::ble::Connection;
use nrf_softdevice::Softdevice;
use panic_probe as _;
use static_cell::StaticCell;

type Link = CentralLink<CriticalSectionRawMutex, Connection>;

/// One motor on an H-bridge: two direction lines, both low = coast.
struct Motor {
    fwd: Output<'static>,
    rev: Output<'static>,
}

impl Motor {
    fn drive(&mut self, direction: i8) {
        match direction {
            d if d > 0 => {
                self.rev.set_low();
                self.fwd.set_high();
            }
            d if d < 0 => {
                self.fwd.set_low();
                self.rev.set_high();
            }
            _ => {
                self.fwd.set_low();
                self.rev.set_low();
            }
        }
    }
}

/// Differential drive plus pen solenoid (high = pen down).
struct Drive {
    left: Motor,
    right: Motor,
    pen: Output<'static>,
}

impl Drive {
    fn tracks(&mut self, left: i8, right: i8) -> Result<(), Infallible> {
        self.left.drive(left);
        self.right.drive(right);
        Ok(())
    }
}

impl Actuator for Drive {
    type Error = Infallible;

    fn forward(&mut self) -> Result<(), Infallible> {
        self.tracks(1, 1)
    }

    fn backward(&mut self) -> Result<(), Infallible> {
        self.tracks(-1, -1)
    }

    fn turn_left(&mut self) -> Result<(), Infallible> {
        self.tracks(-1, 1)
    }

    fn turn_right(&mut self) -> Result<(), Infallible> {
        self.tracks(1, -1)
    }

    fn pen_up(&mut self) -> Result<(), Infallible> {
        self.pen.set_low();
        Ok(())
    }

    fn pen_down(&mut self) -> Result<(), Infallible> {
        self.pen.set_high();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        self.tracks(0, 0)
    }
}

fn output(pin: impl embassy_nrf::Peripheral<P = impl embassy_nrf::gpio::Pin> + 'static) -> Output<'static> {
    Output::new(pin, Level::Low, OutputDrive::Standard)
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ble-gamepad robot {} starting", env!("CARGO_PKG_VERSION"));

    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);

    let sd: &'static Softdevice = stack::enable(Role::Central);

    static LINK: StaticCell<Link> = StaticCell::new();
    let link: &'static Link = LINK.init(CentralLink::new());

    let drive = Drive {
        left: Motor {
            fwd: output(p.P0_28),
            rev: output(p.P0_29),
        },
        right: Motor {
            fwd: output(p.P0_30),
            rev: output(p.P0_31),
        },
        pen: output(p.P0_15),
    };
    let led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);

    spawner.must_spawn(softdevice_task(sd));
    spawner.must_spawn(link_task(link, ClientRadio::new(sd)));
    spawner.must_spawn(interpreter_task(link, drive));
    spawner.must_spawn(blink_task(link, led));
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn link_task(link: &'static Link, radio: ClientRadio) -> ! {
    let mut runner = CentralRunner::new(link, radio, Delay, stack::uptime_ms, CentralConfig::default());
    runner.run().await
}

#[embassy_executor::task]
async fn interpreter_task(link: &'static Link, mut drive: Drive) {
    match run_interpreter(link.state(), &mut drive, Delay, INTERPRETER_PERIOD_MS).await {
        Ok(never) => match never {},
        Err(e) => defmt::panic!("interpreter failed: {}", e),
    }
}

#[embassy_executor::task]
async fn blink_task(link: &'static Link, mut led: Output<'static>) {
    let result: Result<Infallible, _> = run_status_led(link.state(), &mut led, &mut Delay).await;
    if let Err(e) = result {
        warn!("status LED stopped: {}", e);
    }
}
