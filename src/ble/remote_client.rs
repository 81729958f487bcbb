//! GATT client for the robot: finds the gamepad and reads its button
//! characteristic.

use crate::ble::scanner::ScanFilter;
use crate::ble::transport::{CentralTransport, Payload};
use crate::config::{PAYLOAD_CAPACITY, SCAN_ACTIVE_WINDOW_US, SCAN_INTERVAL_US};
use crate::error::RadioError;
use embassy_time::{with_timeout, Duration};
use heapless::Vec;
use nrf_softdevice::ble::central::{self, ConnectError, ScanError};
use nrf_softdevice::ble::gatt_client::{self, DiscoverError};
use nrf_softdevice::ble::{Address, Connection};
use nrf_softdevice::Softdevice;

/// Client side of the remote-control service.
#[nrf_softdevice::gatt_client(uuid = "1848")]
pub struct RemoteServiceClient {
    #[characteristic(uuid = "2a6e", read, notify)]
    pub button: Vec<u8, PAYLOAD_CAPACITY>,
}

/// [`CentralTransport`] over the SoftDevice.
pub struct ClientRadio {
    sd: &'static Softdevice,
}

impl ClientRadio {
    pub fn new(sd: &'static Softdevice) -> Self {
        Self { sd }
    }
}

/// µs → 0.625 ms radio units.
const fn radio_units(us: u32) -> u32 {
    us / 625
}

impl CentralTransport for ClientRadio {
    type Target = Address;
    type Connection = Connection;
    type Characteristic = RemoteServiceClient;

    async fn scan(&mut self, filter: &ScanFilter, window_ms: u32) -> Result<Option<Address>, RadioError> {
        let config = central::ScanConfig {
            // Active scan to retrieve scan-response data.
            active: true,
            interval: radio_units(SCAN_INTERVAL_US),
            window: radio_units(SCAN_ACTIVE_WINDOW_US),
            // 10 ms units
            timeout: (window_ms / 10).min(u32::from(u16::MAX)) as u16,
            ..Default::default()
        };

        let result = central::scan(self.sd, &config, |params| {
            let data =
                unsafe { core::slice::from_raw_parts(params.data.p_data, params.data.len as usize) };
            filter
                .matches(data)
                .then(|| Address::from_raw(params.peer_addr))
        })
        .await;

        match result {
            Ok(addr) => {
                info!("matched advertiser {:?}", addr);
                Ok(Some(addr))
            }
            Err(ScanError::Timeout) => Ok(None),
            Err(e) => {
                warn!("BLE scan ended with error: {:?}", e);
                Err(RadioError::ScanFailed)
            }
        }
    }

    async fn connect(&mut self, target: &Address, timeout_ms: u32) -> Result<Connection, RadioError> {
        let whitelist = [target];
        let config = central::ConnectConfig {
            scan_config: central::ScanConfig {
                whitelist: Some(&whitelist),
                ..Default::default()
            },
            ..Default::default()
        };

        match with_timeout(Duration::from_millis(timeout_ms.into()), central::connect(self.sd, &config)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(ConnectError::Timeout)) | Err(_) => Err(RadioError::Timeout),
            Ok(Err(e)) => {
                warn!("connect error: {:?}", e);
                Err(RadioError::ConnectFailed)
            }
        }
    }

    async fn discover(&mut self, conn: &Connection) -> Result<RemoteServiceClient, RadioError> {
        gatt_client::discover::<RemoteServiceClient>(conn)
            .await
            .map_err(|e| match e {
                DiscoverError::ServiceNotFound => RadioError::ServiceNotFound,
                DiscoverError::ServiceIncomplete => RadioError::CharacteristicNotFound,
                _ => RadioError::DiscoveryFailed,
            })
    }

    async fn read(
        &mut self,
        _conn: &Connection,
        client: &RemoteServiceClient,
        timeout_ms: u32,
    ) -> Result<Payload, RadioError> {
        match with_timeout(Duration::from_millis(timeout_ms.into()), client.button_read()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(RadioError::ReadFailed),
            Err(_) => Err(RadioError::Timeout),
        }
    }

    fn disconnect(&mut self, conn: Connection) {
        let _ = conn.disconnect();
    }
}
