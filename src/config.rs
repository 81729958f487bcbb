//! Application-wide constants and compile-time configuration.
//!
//! All radio identifiers, timing parameters, and pin assignments live
//! here so they can be tuned in one place. The runtime config structs
//! (`PeripheralConfig`, `CentralConfig`) take their defaults from these.

// BLE - shared by both roles

/// Advertised (and scanned-for) complete local name.
pub const DEVICE_NAME: &str = "KevsRobots";

/// Remote-control GATT service (16-bit UUID).
pub const REMOTE_SERVICE_UUID: u16 = 0x1848;

/// Button command characteristic (Read + Notify) inside the remote service.
pub const BUTTON_CHARACTERISTIC_UUID: u16 = 0x2A6E;

/// GAP appearance: generic remote control.
pub const APPEARANCE_GENERIC_REMOTE_CONTROL: u16 = 384;

/// Longest token carried on the button characteristic (bytes).
pub const TOKEN_MAX_LEN: usize = 16;

/// Characteristic payload capacity: ATT default MTU (23) minus 3 header bytes.
pub const PAYLOAD_CAPACITY: usize = 20;

// BLE - peripheral (gamepad)

/// Advertising interval (ms).
pub const ADV_INTERVAL_MS: u32 = 250;

/// Back-off before retrying after advertising failed to start (ms).
pub const ADVERTISE_RETRY_MS: u32 = 500;

// BLE - central (robot)

/// Duration of one scan window before giving up and rescanning (ms).
pub const SCAN_WINDOW_MS: u32 = 5_000;

/// Scan interval and window inside a scan (µs). Equal values = continuous.
pub const SCAN_INTERVAL_US: u32 = 30_000;
pub const SCAN_ACTIVE_WINDOW_US: u32 = 30_000;

/// Pause between an empty scan window and the next one (ms).
pub const RESCAN_DELAY_MS: u32 = 100;

/// Connection attempt timeout (ms).
pub const CONNECT_TIMEOUT_MS: u32 = 5_000;

/// Single characteristic read timeout (ms).
pub const READ_TIMEOUT_MS: u32 = 1_000;

/// Period between characteristic reads while streaming (ms).
pub const READ_PERIOD_MS: u32 = 100;

// Device Information service (gamepad)

pub const DEVICE_INFO_SERVICE_UUID: u16 = 0x180A;
pub const MANUFACTURER_NAME: &str = "KevsRobotsRemote";
pub const MODEL_NUMBER: &str = "1.0";
pub const HARDWARE_REVISION: &str = "nRF52840";
pub const SOFTWARE_REVISION: &str = env!("CARGO_PKG_VERSION");

// Tasks

/// Button panel polling period (ms).
pub const BUTTON_POLL_MS: u32 = 10;

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

/// Command interpreter polling period on the robot (ms).
pub const INTERPRETER_PERIOD_MS: u32 = 100;

/// Status LED half-period while disconnected / connected (ms).
pub const BLINK_DISCONNECTED_MS: u32 = 250;
pub const BLINK_CONNECTED_MS: u32 = 1_000;

/// OLED status refresh period (ms).
pub const DISPLAY_REFRESH_MS: u32 = 100;

// GPIO pin assignments
//
// These are logical names; the actual `embassy_nrf::peripherals::*` pins
// are picked in the binaries. Adjust for your custom PCB.
//
// Gamepad (all buttons active-low, internal pull-up):
//   A      → P0.06     Up     → P0.08     Start  → P0.12
//   B      → P0.07     Down   → P0.09     Select → P0.11
//   X      → P0.04     Left   → P0.02     Menu   → P0.10
//   Y      → P0.05     Right  → P0.03
//   I²C SDA → P0.26    I²C SCL → P0.27    Status LED → P0.13
//
// Robot:
//   Left motor  fwd/rev → P0.28 / P0.29
//   Right motor fwd/rev → P0.30 / P0.31
//   Pen solenoid        → P0.15
//   Status LED          → P0.13
