//! SoftDevice bring-up shared by both firmware images.

use crate::ble::Role;
use crate::config::DEVICE_NAME;
use nrf_softdevice::{self as sd, Softdevice};

/// SoftDevice configuration for one link in the given role.
pub fn softdevice_config(role: Role) -> sd::Config {
    let (periph_role_count, central_role_count) = match role {
        Role::Peripheral => (1, 0),
        Role::Central => (0, 1),
    };
    sd::Config {
        clock: Some(sd::raw::nrf_clock_lf_cfg_t {
            source: sd::raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: sd::raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(sd::raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(sd::raw::ble_gatt_conn_cfg_t { att_mtu: 23 }),
        gatts_attr_tab_size: Some(sd::raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: sd::raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(sd::raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count,
            central_role_count,
            central_sec_count: 0,
            _bitfield_1: sd::raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(sd::raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as *const u8 as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: sd::raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                sd::raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Enable the SoftDevice for `role`. Must run before any radio task starts.
pub fn enable(role: Role) -> &'static mut Softdevice {
    let config = softdevice_config(role);
    Softdevice::enable(&config)
}

/// Milliseconds since boot, for `connected_since`.
pub fn uptime_ms() -> u64 {
    embassy_time::Instant::now().as_millis()
}

/// Own BLE address, little-endian as the SoftDevice reports it.
pub fn own_address(sd: &Softdevice) -> [u8; 6] {
    nrf_softdevice::ble::get_address(sd).bytes()
}
