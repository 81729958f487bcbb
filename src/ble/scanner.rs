//! Advertisement filtering for the robot's scanner.
//!
//! A report matches when every configured criterion matches: the local
//! name (exact, case-sensitive) and/or the 16-bit service UUID. A filter
//! with neither criterion matches nothing, so the robot never connects to
//! an arbitrary device.

use crate::ble::adv_parser::{contains_service_uuid, extract_device_name};
use crate::config::{DEVICE_NAME, REMOTE_SERVICE_UUID};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanFilter {
    pub name: Option<&'static str>,
    pub service: Option<u16>,
}

impl ScanFilter {
    pub const fn by_name(name: &'static str) -> Self {
        Self {
            name: Some(name),
            service: None,
        }
    }

    pub const fn by_service(uuid: u16) -> Self {
        Self {
            name: None,
            service: Some(uuid),
        }
    }

    /// Test one advertising or scan-response payload.
    pub fn matches(&self, data: &[u8]) -> bool {
        if self.name.is_none() && self.service.is_none() {
            return false;
        }
        let name_ok = self
            .name
            .map_or(true, |want| extract_device_name(data).is_some_and(|n| n == want));
        let service_ok = self
            .service
            .map_or(true, |uuid| contains_service_uuid(data, uuid));
        name_ok && service_ok
    }
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            name: Some(DEVICE_NAME),
            service: Some(REMOTE_SERVICE_UUID),
        }
    }
}
