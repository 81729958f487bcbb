//! Device Information service (0x180A) contents for the gamepad.

use core::fmt::Write;
use heapless::String;

/// Serial number string: the 6-byte BLE address as upper-case hex, most
/// significant byte first.
pub fn format_serial(address: &[u8]) -> String<16> {
    let mut s = String::new();
    for b in address.iter().rev().take(8) {
        let _ = write!(s, "{:02X}", b);
    }
    s
}
