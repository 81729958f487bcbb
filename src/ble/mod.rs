//! Bluetooth Low Energy subsystem.
//!
//! The same crate drives the Nordic SoftDevice S140 in both roles:
//!
//! 1. **Peripheral** (gamepad) - advertises the remote-control service,
//!    accepts one connection and notifies button tokens (`peripheral`).
//! 2. **Central** (robot) - scans for that service, connects, discovers the
//!    button characteristic and polls it (`central`).
//!
//! Both state machines own a [`LinkSession`] behind a [`LinkState`]. Other
//! tasks (LED, display, interpreter) only ever see it through
//! [`LinkStatus`]. Radio I/O sits behind the traits in `transport`, so the
//! state machines run unchanged on the host against mocks.

pub mod adv_parser;
pub mod central;
pub mod device_info;
pub mod peripheral;
#[cfg(feature = "embedded")]
pub mod remote_client;
#[cfg(feature = "embedded")]
pub mod remote_server;
pub mod scanner;
#[cfg(feature = "embedded")]
pub mod stack;
pub mod transport;

use crate::command::Token;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Which side of the link this firmware plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Peripheral,
    Central,
}

/// Lifecycle phase of a link session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionPhase {
    // Peripheral
    Idle,
    Advertising,
    Connected,
    // Central
    Scanning,
    Connecting,
    Discovering,
    Streaming,
}

/// Connection state owned by one link state machine.
#[derive(Clone, Debug)]
pub struct LinkSession<P> {
    pub role: Role,
    pub phase: ConnectionPhase,
    pub peer: Option<P>,
    pub last_command: Option<Token>,
    pub connected_since: Option<u64>,
}

impl<P> LinkSession<P> {
    pub const fn new(role: Role, phase: ConnectionPhase) -> Self {
        Self {
            role,
            phase,
            peer: None,
            last_command: None,
            connected_since: None,
        }
    }

    /// True exactly when a peer handle is held.
    pub fn is_connected(&self) -> bool {
        self.peer.is_some()
    }

    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            role: self.role,
            phase: self.phase,
            connected: self.is_connected(),
            last_command: self.last_command.clone(),
            connected_since: self.connected_since,
        }
    }
}

/// Copy of a session without the peer handle, for other tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkSnapshot {
    pub role: Role,
    pub phase: ConnectionPhase,
    pub connected: bool,
    pub last_command: Option<Token>,
    pub connected_since: Option<u64>,
}

/// A [`LinkSession`] shared between tasks.
///
/// Every access runs inside the mutex's critical section, so readers never
/// see half an update. Only the owning state machine calls [`update`].
///
/// [`update`]: LinkState::update
pub struct LinkState<M: RawMutex, P> {
    inner: Mutex<M, RefCell<LinkSession<P>>>,
}

impl<M: RawMutex, P: Clone> LinkState<M, P> {
    pub const fn new(role: Role, phase: ConnectionPhase) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(LinkSession::new(role, phase))),
        }
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut LinkSession<P>) -> R) -> R {
        self.inner.lock(|s| f(&mut s.borrow_mut()))
    }

    fn read<R>(&self, f: impl FnOnce(&LinkSession<P>) -> R) -> R {
        self.inner.lock(|s| f(&s.borrow()))
    }

    pub fn snapshot(&self) -> LinkSnapshot {
        self.read(LinkSession::snapshot)
    }

    pub fn is_connected(&self) -> bool {
        self.read(LinkSession::is_connected)
    }

    pub fn last_command(&self) -> Option<Token> {
        self.read(|s| s.last_command.clone())
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.read(|s| s.phase)
    }

    pub fn peer(&self) -> Option<P> {
        self.read(|s| s.peer.clone())
    }
}

/// Read-only view of a link for the LED, display and interpreter tasks.
pub trait LinkStatus {
    fn is_connected(&self) -> bool;
    fn last_command(&self) -> Option<Token>;
    fn snapshot(&self) -> LinkSnapshot;
}

impl<M: RawMutex, P: Clone> LinkStatus for LinkState<M, P> {
    fn is_connected(&self) -> bool {
        LinkState::is_connected(self)
    }

    fn last_command(&self) -> Option<Token> {
        LinkState::last_command(self)
    }

    fn snapshot(&self) -> LinkSnapshot {
        LinkState::snapshot(self)
    }
}
