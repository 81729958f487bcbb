//! Robot link: scan for the gamepad, connect, discover the button
//! characteristic and poll it.
//!
//! ```text
//!   Scanning ──match──► Connecting ──ok──► Discovering ──ok──► Streaming
//!      ▲  ▲                 │                  │                  │
//!      │  └─no match        │ timeout/fail     │ not found        │ read error/timeout
//!      └────────────────────┴──────────────────┴──────────────────┘
//! ```

use crate::ble::scanner::ScanFilter;
use crate::ble::transport::CentralTransport;
use crate::ble::{ConnectionPhase, LinkState, Role};
use crate::command::Token;
use crate::config::{CONNECT_TIMEOUT_MS, READ_PERIOD_MS, READ_TIMEOUT_MS, RESCAN_DELAY_MS, SCAN_WINDOW_MS};
use crate::error::TokenError;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

#[derive(Clone, Copy, Debug)]
pub struct CentralConfig {
    pub filter: ScanFilter,
    pub scan_window_ms: u32,
    pub connect_timeout_ms: u32,
    pub read_timeout_ms: u32,
    pub read_period_ms: u32,
    pub rescan_delay_ms: u32,
}

impl Default for CentralConfig {
    fn default() -> Self {
        Self {
            filter: ScanFilter::default(),
            scan_window_ms: SCAN_WINDOW_MS,
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
            read_timeout_ms: READ_TIMEOUT_MS,
            read_period_ms: READ_PERIOD_MS,
            rescan_delay_ms: RESCAN_DELAY_MS,
        }
    }
}

/// What a single characteristic read did to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Updated(Token),
    /// Nothing (or only whitespace) was read.
    Empty,
    /// Not a token; `last_command` left as it was.
    Malformed(TokenError),
}

/// Central session plus the transitions that mutate it.
pub struct CentralLink<M: RawMutex, P> {
    state: LinkState<M, P>,
}

impl<M: RawMutex, P: Clone> CentralLink<M, P> {
    pub const fn new() -> Self {
        Self {
            state: LinkState::new(Role::Central, ConnectionPhase::Scanning),
        }
    }

    pub fn state(&self) -> &LinkState<M, P> {
        &self.state
    }

    pub fn begin_connect(&self) {
        self.state.update(|s| s.phase = ConnectionPhase::Connecting);
    }

    pub fn on_connected(&self, conn: P, now_ms: u64) {
        self.state.update(|s| {
            s.phase = ConnectionPhase::Discovering;
            s.peer = Some(conn);
            s.last_command = None;
            s.connected_since = Some(now_ms);
        });
        info!("central: connected, discovering");
    }

    pub fn on_discovered(&self) {
        self.state.update(|s| s.phase = ConnectionPhase::Streaming);
        info!("central: streaming");
    }

    pub fn on_read(&self, raw: &[u8]) -> ReadOutcome {
        match Token::from_bytes(raw) {
            Ok(token) => {
                trace!("central: read {}", token);
                self.state.update(|s| s.last_command = Some(token.clone()));
                ReadOutcome::Updated(token)
            }
            Err(TokenError::Empty) => ReadOutcome::Empty,
            Err(e) => {
                warn!("central: malformed payload ({} bytes): {}", raw.len(), e);
                ReadOutcome::Malformed(e)
            }
        }
    }

    /// Connection closed or failed at any stage: back to scanning.
    pub fn on_link_lost(&self) {
        self.state.update(|s| {
            s.phase = ConnectionPhase::Scanning;
            s.peer = None;
            s.last_command = None;
            s.connected_since = None;
        });
    }
}

impl<M: RawMutex, P: Clone> Default for CentralLink<M, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a [`CentralLink`] through its lifecycle, forever.
pub struct CentralRunner<'a, M: RawMutex, T: CentralTransport, D, C> {
    link: &'a CentralLink<M, T::Connection>,
    transport: T,
    delay: D,
    clock: C,
    config: CentralConfig,
    target: Option<T::Target>,
    characteristic: Option<T::Characteristic>,
}

impl<'a, M, T, D, C> CentralRunner<'a, M, T, D, C>
where
    M: RawMutex,
    T: CentralTransport,
    D: DelayNs,
    C: Fn() -> u64,
{
    pub fn new(link: &'a CentralLink<M, T::Connection>, transport: T, delay: D, clock: C, config: CentralConfig) -> Self {
        Self {
            link,
            transport,
            delay,
            clock,
            config,
            target: None,
            characteristic: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one lifecycle transition and return the phase reached.
    pub async fn step(&mut self) -> ConnectionPhase {
        match self.link.state.phase() {
            ConnectionPhase::Scanning => self.scan().await,
            ConnectionPhase::Connecting => self.connect().await,
            ConnectionPhase::Discovering => self.discover().await,
            ConnectionPhase::Streaming => self.stream().await,
            other => {
                error!("central: unexpected phase {}", other);
                self.link.on_link_lost();
            }
        }
        self.link.state.phase()
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }

    async fn scan(&mut self) {
        match self.transport.scan(&self.config.filter, self.config.scan_window_ms).await {
            Ok(Some(target)) => {
                info!("central: found gamepad");
                self.target = Some(target);
                self.link.begin_connect();
                return;
            }
            Ok(None) => debug!("central: no gamepad in this scan window"),
            Err(e) => warn!("central: scan failed: {}", e),
        }
        self.delay.delay_ms(self.config.rescan_delay_ms).await;
    }

    async fn connect(&mut self) {
        let Some(target) = self.target.take() else {
            self.link.on_link_lost();
            return;
        };
        match self.transport.connect(&target, self.config.connect_timeout_ms).await {
            Ok(conn) => self.link.on_connected(conn, (self.clock)()),
            Err(e) => {
                warn!("central: connect failed: {}", e);
                self.link.on_link_lost();
            }
        }
    }

    async fn discover(&mut self) {
        let Some(conn) = self.link.state.peer() else {
            self.link.on_link_lost();
            return;
        };
        match self.transport.discover(&conn).await {
            Ok(characteristic) => {
                self.characteristic = Some(characteristic);
                self.link.on_discovered();
            }
            Err(e) => {
                warn!("central: discovery failed: {}", e);
                self.drop_link(conn);
            }
        }
    }

    async fn stream(&mut self) {
        let (Some(conn), Some(characteristic)) = (self.link.state.peer(), self.characteristic.as_ref()) else {
            self.link.on_link_lost();
            return;
        };
        match self.transport.read(&conn, characteristic, self.config.read_timeout_ms).await {
            Ok(payload) => {
                self.link.on_read(&payload);
                self.delay.delay_ms(self.config.read_period_ms).await;
            }
            Err(e) => {
                warn!("central: read failed: {}", e);
                self.drop_link(conn);
            }
        }
    }

    fn drop_link(&mut self, conn: T::Connection) {
        self.characteristic = None;
        self.transport.disconnect(conn);
        self.link.on_link_lost();
    }
}
