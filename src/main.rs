//! Gamepad firmware - nRF52840 BLE peripheral.
//!
//! Polls 11 buttons, publishes each press/release as a token on the
//! remote-control characteristic, blinks the status LED and shows the link
//! state on the OLED.

#![no_std]
#![no_main]

use ble_gamepad::ble::peripheral::{PeripheralConfig, PeripheralLink, PeripheralRunner};
use ble_gamepad::ble::remote_server::{RemoteRadio, Server};
use ble_gamepad::ble::{stack, Role};
use ble_gamepad::config::{BUTTON_POLL_MS, DISPLAY_REFRESH_MS};
use ble_gamepad::tasks::run_panel;
use ble_gamepad::ui::buttons::{DebouncedButton, EdgeDebounce};
use ble_gamepad::ui::panel::ButtonPanel;
use ble_gamepad::ui::status_led::run_status_led;
use ble_gamepad::ui::{display, ButtonId};
use core::convert::Infallible;
use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::{bind_interrupts, twim};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Timer};
use nrf_softdevice::ble::Connection;
use nrf_softdevice::Softdevice;
use panic_probe as _;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<TWISPI0>;
});

type Link = PeripheralLink<CriticalSectionRawMutex, Connection>;
type Panel = ButtonPanel<Input<'static>, EdgeDebounce, 11>;

fn button(id: ButtonId, pin: Input<'static>) -> DebouncedButton<Input<'static>, EdgeDebounce> {
    DebouncedButton::new(id, pin, EdgeDebounce::default())
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("ble-gamepad {} starting", env!("CARGO_PKG_VERSION"));

    // Keep Embassy interrupts below the SoftDevice's reserved levels.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::TWISPI0.set_priority(Priority::P2);

    let sd = stack::enable(Role::Peripheral);
    static SERVER: StaticCell<Server> = StaticCell::new();
    let server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;

    static RADIO: StaticCell<RemoteRadio> = StaticCell::new();
    let radio = RADIO.init(unwrap!(RemoteRadio::new(sd, server)));

    static LINK: StaticCell<Link> = StaticCell::new();
    let link: &'static Link = LINK.init(PeripheralLink::new());

    let panel: Panel = ButtonPanel::new([
        button(ButtonId::A, Input::new(p.P0_06, Pull::Up)),
        button(ButtonId::B, Input::new(p.P0_07, Pull::Up)),
        button(ButtonId::X, Input::new(p.P0_04, Pull::Up)),
        button(ButtonId::Y, Input::new(p.P0_05, Pull::Up)),
        button(ButtonId::Up, Input::new(p.P0_08, Pull::Up)),
        button(ButtonId::Down, Input::new(p.P0_09, Pull::Up)),
        button(ButtonId::Left, Input::new(p.P0_02, Pull::Up)),
        button(ButtonId::Right, Input::new(p.P0_03, Pull::Up)),
        button(ButtonId::Start, Input::new(p.P0_12, Pull::Up)),
        button(ButtonId::Select, Input::new(p.P0_11, Pull::Up)),
        button(ButtonId::Menu, Input::new(p.P0_10, Pull::Up)),
    ]);

    let led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());

    spawner.must_spawn(softdevice_task(sd));
    spawner.must_spawn(link_task(link, radio));
    spawner.must_spawn(panel_task(panel, link, radio));
    spawner.must_spawn(blink_task(link, led));
    spawner.must_spawn(display_task(i2c, link));
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn link_task(link: &'static Link, radio: &'static RemoteRadio) -> ! {
    let mut runner = PeripheralRunner::new(link, radio, Delay, stack::uptime_ms, PeripheralConfig::default());
    runner.run().await
}

#[embassy_executor::task]
async fn panel_task(panel: Panel, link: &'static Link, radio: &'static RemoteRadio) {
    match run_panel(panel, link, radio, Delay, stack::uptime_ms, BUTTON_POLL_MS).await {
        Ok(never) => match never {},
        Err(e) => defmt::panic!("button panel failed: {}", e),
    }
}

#[embassy_executor::task]
async fn blink_task(link: &'static Link, mut led: Output<'static>) {
    let result: Result<Infallible, _> = run_status_led(link.state(), &mut led, &mut Delay).await;
    if let Err(e) = result {
        warn!("status LED stopped: {}", e);
    }
}

#[embassy_executor::task]
async fn display_task(i2c: twim::Twim<'static, TWISPI0>, link: &'static Link) {
    let mut oled = match display::init(i2c) {
        Ok(d) => d,
        Err(e) => {
            warn!("no display: {}", e);
            return;
        }
    };
    loop {
        let snapshot = link.state().snapshot();
        if let Err(e) = display::draw_status(&mut oled, snapshot.connected, snapshot.last_command.as_ref()) {
            warn!("display refresh failed: {}", e);
        }
        Timer::after_millis(DISPLAY_REFRESH_MS.into()).await;
    }
}
