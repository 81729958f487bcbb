//! GATT server for the gamepad: the remote-control service carrying the
//! button token, plus Device Information.

use crate::ble::adv_parser::{encode_advertisement, encode_scan_response, ADV_DATA_MAX};
use crate::ble::device_info::format_serial;
use crate::ble::stack::own_address;
use crate::ble::transport::PeripheralTransport;
use crate::command::Token;
use crate::config::{
    ADV_INTERVAL_MS, APPEARANCE_GENERIC_REMOTE_CONTROL, DEVICE_NAME, HARDWARE_REVISION,
    MANUFACTURER_NAME, MODEL_NUMBER, PAYLOAD_CAPACITY, REMOTE_SERVICE_UUID, SOFTWARE_REVISION,
};
use crate::error::RadioError;
use core::sync::atomic::{AtomicBool, Ordering};
use heapless::Vec;
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::Softdevice;

type Text = Vec<u8, 32>;

#[nrf_softdevice::gatt_service(uuid = "1848")]
pub struct RemoteService {
    /// Last button token, e.g. `A_down`. Initial value `!`.
    #[characteristic(uuid = "2a6e", read, notify)]
    pub button: Vec<u8, PAYLOAD_CAPACITY>,
}

#[nrf_softdevice::gatt_service(uuid = "180a")]
pub struct DeviceInfoService {
    #[characteristic(uuid = "2a29", read)]
    pub manufacturer: Text,
    #[characteristic(uuid = "2a24", read)]
    pub model: Text,
    #[characteristic(uuid = "2a25", read)]
    pub serial: Text,
    #[characteristic(uuid = "2a26", read)]
    pub hardware_revision: Text,
    #[characteristic(uuid = "2a28", read)]
    pub software_revision: Text,
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub remote: RemoteService,
    pub device_info: DeviceInfoService,
}

fn text(s: &str) -> Text {
    let mut v = Vec::new();
    let _ = v.extend_from_slice(&s.as_bytes()[..s.len().min(32)]);
    v
}

/// [`PeripheralTransport`] over the SoftDevice.
pub struct RemoteRadio {
    sd: &'static Softdevice,
    server: &'static Server,
    adv_data: Vec<u8, ADV_DATA_MAX>,
    scan_data: Vec<u8, ADV_DATA_MAX>,
    subscribed: AtomicBool,
}

impl RemoteRadio {
    /// Fill in the static characteristic values and build the advertisement.
    pub fn new(sd: &'static Softdevice, server: &'static Server) -> Result<Self, RadioError> {
        let info = &server.device_info;
        let serial = format_serial(&own_address(sd));
        info.manufacturer_set(&text(MANUFACTURER_NAME))
            .and_then(|_| info.model_set(&text(MODEL_NUMBER)))
            .and_then(|_| info.serial_set(&text(serial.as_str())))
            .and_then(|_| info.hardware_revision_set(&text(HARDWARE_REVISION)))
            .and_then(|_| info.software_revision_set(&text(SOFTWARE_REVISION)))
            .map_err(|_| RadioError::WriteFailed)?;
        server
            .remote
            .button_set(&Token::idle().to_payload())
            .map_err(|_| RadioError::WriteFailed)?;

        Ok(Self {
            sd,
            server,
            adv_data: encode_advertisement(DEVICE_NAME, REMOTE_SERVICE_UUID, APPEARANCE_GENERIC_REMOTE_CONTROL),
            scan_data: encode_scan_response(REMOTE_SERVICE_UUID),
            subscribed: AtomicBool::new(false),
        })
    }
}

impl PeripheralTransport for RemoteRadio {
    type Peer = Connection;

    async fn advertise(&self) -> Result<Connection, RadioError> {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &self.adv_data,
            scan_data: &self.scan_data,
        };
        let config = peripheral::Config {
            // 0.625 ms units
            interval: ADV_INTERVAL_MS * 1000 / 625,
            ..Default::default()
        };
        let conn = peripheral::advertise_connectable(self.sd, adv, &config)
            .await
            .map_err(|e| {
                warn!("advertise error: {:?}", e);
                RadioError::AdvertiseFailed
            })?;
        self.subscribed.store(false, Ordering::Relaxed);
        Ok(conn)
    }

    async fn disconnected(&self, peer: &Connection) {
        let reason = gatt_server::run(peer, self.server, |e| match e {
            ServerEvent::Remote(RemoteServiceEvent::ButtonCccdWrite { notifications }) => {
                info!("button notifications: {}", notifications);
                self.subscribed.store(notifications, Ordering::Relaxed);
            }
            ServerEvent::DeviceInfo(_) => {}
        })
        .await;
        info!("gatt server stopped: {:?}", reason);
        self.subscribed.store(false, Ordering::Relaxed);
    }

    fn set_value(&self, token: &Token) -> Result<(), RadioError> {
        self.server
            .remote
            .button_set(&token.to_payload())
            .map_err(|_| RadioError::WriteFailed)
    }

    fn notify(&self, peer: &Connection, token: &Token) -> Result<(), RadioError> {
        // A central that polls instead of subscribing still sees set_value.
        if !self.subscribed.load(Ordering::Relaxed) {
            return Ok(());
        }
        self.server
            .remote
            .button_notify(peer, &token.to_payload())
            .map_err(|_| RadioError::NotifyFailed)
    }

    fn disconnect(&self, peer: &Connection) {
        let _ = peer.disconnect();
    }
}
