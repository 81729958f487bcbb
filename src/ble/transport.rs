//! Radio I/O seams used by the link state machines.
//!
//! The SoftDevice implementations live in `remote_server` (peripheral) and
//! `remote_client` (central); tests use scripted mocks.

use crate::ble::scanner::ScanFilter;
use crate::command::Token;
use crate::config::PAYLOAD_CAPACITY;
use crate::error::RadioError;
use core::future::Future;

/// One characteristic value as read off the air.
pub type Payload = heapless::Vec<u8, PAYLOAD_CAPACITY>;

/// Gamepad side: a GATT server that advertises and notifies.
pub trait PeripheralTransport {
    /// Connection handle. Cloned into the session so `publish` can notify.
    type Peer: Clone;

    /// Advertise until a central connects.
    fn advertise(&self) -> impl Future<Output = Result<Self::Peer, RadioError>>;

    /// Serve the connection until the peer goes away.
    fn disconnected(&self, peer: &Self::Peer) -> impl Future<Output = ()>;

    /// Overwrite the characteristic value read by the central.
    fn set_value(&self, token: &Token) -> Result<(), RadioError>;

    /// Push the value to the peer (no-op if it hasn't subscribed).
    fn notify(&self, peer: &Self::Peer, token: &Token) -> Result<(), RadioError>;

    /// Drop the link from our side.
    fn disconnect(&self, peer: &Self::Peer);
}

/// Robot side: a GATT client that scans, connects and reads.
pub trait CentralTransport {
    /// Address of a matching advertiser.
    type Target: Clone;
    type Connection: Clone;
    /// Resolved button characteristic handle.
    type Characteristic;

    /// Scan for up to `window_ms`. `Ok(None)` when nothing matched.
    fn scan(
        &mut self,
        filter: &ScanFilter,
        window_ms: u32,
    ) -> impl Future<Output = Result<Option<Self::Target>, RadioError>>;

    fn connect(
        &mut self,
        target: &Self::Target,
        timeout_ms: u32,
    ) -> impl Future<Output = Result<Self::Connection, RadioError>>;

    fn discover(
        &mut self,
        conn: &Self::Connection,
    ) -> impl Future<Output = Result<Self::Characteristic, RadioError>>;

    fn read(
        &mut self,
        conn: &Self::Connection,
        characteristic: &Self::Characteristic,
        timeout_ms: u32,
    ) -> impl Future<Output = Result<Payload, RadioError>>;

    fn disconnect(&mut self, conn: Self::Connection);
}
