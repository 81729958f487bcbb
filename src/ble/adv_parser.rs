//! Advertising-data (AD structure) helpers: parsing on the robot, building
//! on the gamepad.

use heapless::{String, Vec};

/// Legacy advertising payload limit.
pub const ADV_DATA_MAX: usize = 31;

const AD_FLAGS: u8 = 0x01;
const AD_INCOMPLETE_UUID16: u8 = 0x02;
const AD_COMPLETE_UUID16: u8 = 0x03;
const AD_SHORT_NAME: u8 = 0x08;
const AD_COMPLETE_NAME: u8 = 0x09;
const AD_APPEARANCE: u8 = 0x19;

/// LE General Discoverable, BR/EDR not supported.
const FLAGS_GENERAL_DISC_NO_BREDR: u8 = 0x06;

/// Iterate `(ad_type, payload)` over well-formed AD structures, stopping at
/// the first zero length or truncated entry.
fn ad_structures(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut i = 0;
    core::iter::from_fn(move || {
        let len = *data.get(i)? as usize;
        if len == 0 || i + len >= data.len() {
            return None;
        }
        let ad_type = data[i + 1];
        let payload = &data[i + 2..i + 1 + len];
        i += len + 1;
        Some((ad_type, payload))
    })
}

/// Check if raw advertisement data lists the given 16-bit service UUID.
pub fn contains_service_uuid(data: &[u8], uuid: u16) -> bool {
    let uuid_le = uuid.to_le_bytes();
    ad_structures(data)
        .filter(|(t, _)| *t == AD_INCOMPLETE_UUID16 || *t == AD_COMPLETE_UUID16)
        .any(|(_, uuids)| uuids.chunks_exact(2).any(|c| c == uuid_le))
}

/// Extract complete/shortened local name from advertisement data.
pub fn extract_device_name(data: &[u8]) -> Option<String<32>> {
    let (_, name_bytes) =
        ad_structures(data).find(|(t, _)| *t == AD_SHORT_NAME || *t == AD_COMPLETE_NAME)?;
    let mut name = String::new();
    for &b in name_bytes {
        if name.push(b as char).is_err() {
            break;
        }
    }
    Some(name)
}

/// Build the gamepad advertisement: flags, complete 16-bit service list,
/// appearance, complete local name. A name that doesn't fit is cut short
/// and sent as a shortened name.
pub fn encode_advertisement(name: &str, service: u16, appearance: u16) -> Vec<u8, ADV_DATA_MAX> {
    let mut adv = Vec::new();
    let _ = adv.extend_from_slice(&[2, AD_FLAGS, FLAGS_GENERAL_DISC_NO_BREDR]);
    let _ = adv.extend_from_slice(&[3, AD_COMPLETE_UUID16]);
    let _ = adv.extend_from_slice(&service.to_le_bytes());
    let _ = adv.extend_from_slice(&[3, AD_APPEARANCE]);
    let _ = adv.extend_from_slice(&appearance.to_le_bytes());

    let room = ADV_DATA_MAX - adv.len() - 2;
    let (ad_type, name) = if name.len() <= room {
        (AD_COMPLETE_NAME, name.as_bytes())
    } else {
        (AD_SHORT_NAME, &name.as_bytes()[..room])
    };
    let _ = adv.push(name.len() as u8 + 1);
    let _ = adv.push(ad_type);
    let _ = adv.extend_from_slice(name);
    adv
}

/// Scan response: just the complete 16-bit service list.
pub fn encode_scan_response(service: u16) -> Vec<u8, ADV_DATA_MAX> {
    let mut rsp = Vec::new();
    let _ = rsp.extend_from_slice(&[3, AD_COMPLETE_UUID16]);
    let _ = rsp.extend_from_slice(&service.to_le_bytes());
    rsp
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests (run on host, not embedded)
// ═══════════════════════════════════════════════════════════════════════════
