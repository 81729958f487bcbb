//! Gamepad link: advertise, accept one central, notify button tokens,
//! go back to advertising when it leaves.
//!
//! ```text
//!   Idle ──retry──► Advertising ──connect──► Connected
//!    ▲                   │  ▲                    │
//!    └──adv failed───────┘  └────disconnect──────┘
//! ```

use crate::ble::transport::PeripheralTransport;
use crate::ble::{ConnectionPhase, LinkState, Role};
use crate::command::{encode_event, Token};
use crate::config::ADVERTISE_RETRY_MS;
use crate::ui::buttons::SamplingPolicy;
use crate::ui::TransitionEvent;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

#[derive(Clone, Copy, Debug)]
pub struct PeripheralConfig {
    /// Back-off after advertising failed to start.
    pub advertise_retry_ms: u32,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            advertise_retry_ms: ADVERTISE_RETRY_MS,
        }
    }
}

/// Outcome of [`PeripheralLink::publish`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Publish {
    /// Written and notified.
    Sent(Token),
    /// No central connected, or the local value could not be written.
    Dropped,
    /// Notify failed; the link was torn down and advertising resumes.
    PeerLost,
}

/// Peripheral session plus the transitions that mutate it.
pub struct PeripheralLink<M: RawMutex, P> {
    state: LinkState<M, P>,
}

impl<M: RawMutex, P: Clone> PeripheralLink<M, P> {
    pub const fn new() -> Self {
        Self {
            state: LinkState::new(Role::Peripheral, ConnectionPhase::Advertising),
        }
    }

    pub fn state(&self) -> &LinkState<M, P> {
        &self.state
    }

    pub fn on_connected(&self, peer: P, now_ms: u64) {
        self.state.update(|s| {
            s.phase = ConnectionPhase::Connected;
            s.peer = Some(peer);
            s.last_command = None;
            s.connected_since = Some(now_ms);
        });
        info!("peripheral: central connected");
    }

    pub fn on_disconnected(&self) {
        self.state.update(|s| {
            s.phase = ConnectionPhase::Advertising;
            s.peer = None;
            s.last_command = None;
            s.connected_since = None;
        });
        info!("peripheral: central disconnected, advertising again");
    }

    pub fn on_advertise_failed(&self) {
        self.state.update(|s| {
            s.phase = ConnectionPhase::Idle;
            s.peer = None;
        });
    }

    /// Encode `event`, store it as the characteristic value and notify the
    /// connected central. Called from the panel task.
    pub fn publish<T>(&self, transport: &T, policy: SamplingPolicy, event: TransitionEvent) -> Publish
    where
        T: PeripheralTransport<Peer = P>,
    {
        let Some(peer) = self.state.peer() else {
            debug!("peripheral: not connected, dropping {}", event);
            return Publish::Dropped;
        };

        let token = encode_event(policy, event);
        if let Err(e) = transport.set_value(&token) {
            warn!("peripheral: set_value failed: {}", e);
            return Publish::Dropped;
        }

        match transport.notify(&peer, &token) {
            Ok(()) => {
                self.state.update(|s| s.last_command = Some(token.clone()));
                Publish::Sent(token)
            }
            Err(e) => {
                warn!("peripheral: notify failed ({}), dropping link", e);
                self.on_disconnected();
                transport.disconnect(&peer);
                Publish::PeerLost
            }
        }
    }
}

impl<M: RawMutex, P: Clone> Default for PeripheralLink<M, P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a [`PeripheralLink`] through its lifecycle, forever.
pub struct PeripheralRunner<'a, M: RawMutex, T: PeripheralTransport, D, C> {
    link: &'a PeripheralLink<M, T::Peer>,
    transport: &'a T,
    delay: D,
    clock: C,
    config: PeripheralConfig,
}

impl<'a, M, T, D, C> PeripheralRunner<'a, M, T, D, C>
where
    M: RawMutex,
    T: PeripheralTransport,
    D: DelayNs,
    C: Fn() -> u64,
{
    pub fn new(
        link: &'a PeripheralLink<M, T::Peer>,
        transport: &'a T,
        delay: D,
        clock: C,
        config: PeripheralConfig,
    ) -> Self {
        Self {
            link,
            transport,
            delay,
            clock,
            config,
        }
    }

    /// Perform one lifecycle transition and return the phase reached.
    pub async fn step(&mut self) -> ConnectionPhase {
        match self.link.state.phase() {
            ConnectionPhase::Advertising => {
                debug!("peripheral: advertising");
                match self.transport.advertise().await {
                    Ok(peer) => {
                        self.link.on_connected(peer, (self.clock)());
                        if let Err(e) = self.transport.set_value(&Token::idle()) {
                            warn!("peripheral: could not reset value: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("peripheral: advertising failed: {}", e);
                        self.link.on_advertise_failed();
                    }
                }
            }
            ConnectionPhase::Connected => {
                if let Some(peer) = self.link.state.peer() {
                    self.transport.disconnected(&peer).await;
                }
                self.link.on_disconnected();
            }
            ConnectionPhase::Idle => {
                self.delay.delay_ms(self.config.advertise_retry_ms).await;
                self.link.state.update(|s| s.phase = ConnectionPhase::Advertising);
            }
            other => {
                error!("peripheral: unexpected phase {}", other);
                self.link.state.update(|s| s.phase = ConnectionPhase::Advertising);
            }
        }
        self.link.state.phase()
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RadioError;
    use crate::ui::{ButtonId, Edge};
    use core::cell::{Cell, RefCell};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use std::collections::VecDeque;
    use std::string::{String, ToString};
    use std::vec::Vec;

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    #[derive(Default)]
    struct MockRadio {
        adverts: RefCell<VecDeque<Result<u8, RadioError>>>,
        values: RefCell<Vec<String>>,
        notified: RefCell<Vec<(u8, String)>>,
        dropped: RefCell<Vec<u8>>,
        fail_notify: Cell<bool>,
    }

    impl PeripheralTransport for MockRadio {
        type Peer = u8;

        async fn advertise(&self) -> Result<u8, RadioError> {
            self.adverts
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(RadioError::AdvertiseFailed))
        }

        async fn disconnected(&self, _peer: &u8) {}

        fn set_value(&self, token: &Token) -> Result<(), RadioError> {
            self.values.borrow_mut().push(token.as_str().to_string());
            Ok(())
        }

        fn notify(&self, peer: &u8, token: &Token) -> Result<(), RadioError> {
            if self.fail_notify.get() {
                return Err(RadioError::NotifyFailed);
            }
            self.notified.borrow_mut().push((*peer, token.as_str().to_string()));
            Ok(())
        }

        fn disconnect(&self, peer: &u8) {
            self.dropped.borrow_mut().push(*peer);
        }
    }

    fn press(b: ButtonId) -> TransitionEvent {
        TransitionEvent::new(b, Edge::Down)
    }

    #[test]
    fn starts_advertising_and_disconnected() {
        let link: PeripheralLink<NoopRawMutex, u8> = PeripheralLink::new();
        assert_eq!(link.state().phase(), ConnectionPhase::Advertising);
        assert!(!link.state().is_connected());
    }

    #[test]
    fn connect_disconnect_cycle() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        radio.adverts.borrow_mut().push_back(Ok(7));
        let mut runner = PeripheralRunner::new(&link, &radio, NoDelay, || 1234, PeripheralConfig::default());

        assert_eq!(block_on(runner.step()), ConnectionPhase::Connected);
        assert!(link.state().is_connected());
        assert_eq!(link.state().snapshot().connected_since, Some(1234));
        assert_eq!(*radio.values.borrow(), ["!"]);

        assert_eq!(block_on(runner.step()), ConnectionPhase::Advertising);
        assert!(!link.state().is_connected());
        assert_eq!(link.state().peer(), None);
    }

    #[test]
    fn never_connected_without_peer() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        {
            let mut q = radio.adverts.borrow_mut();
            q.push_back(Ok(1));
            q.push_back(Err(RadioError::AdvertiseFailed));
            q.push_back(Ok(2));
        }
        let mut runner = PeripheralRunner::new(&link, &radio, NoDelay, || 0, PeripheralConfig::default());
        for _ in 0..8 {
            block_on(runner.step());
            let snap = link.state().snapshot();
            assert_eq!(snap.phase == ConnectionPhase::Connected, snap.connected);
            assert_eq!(snap.connected, link.state().peer().is_some());
        }
    }

    #[test]
    fn advertise_failure_goes_idle_then_retries() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        radio.adverts.borrow_mut().push_back(Err(RadioError::Raw(3)));
        radio.adverts.borrow_mut().push_back(Ok(9));
        let mut runner = PeripheralRunner::new(&link, &radio, NoDelay, || 0, PeripheralConfig::default());
        assert_eq!(block_on(runner.step()), ConnectionPhase::Idle);
        assert_eq!(block_on(runner.step()), ConnectionPhase::Advertising);
        assert_eq!(block_on(runner.step()), ConnectionPhase::Connected);
    }

    #[test]
    fn publish_while_disconnected_is_dropped() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        let out = link.publish(&radio, SamplingPolicy::Edge, press(ButtonId::A));
        assert_eq!(out, Publish::Dropped);
        assert!(radio.values.borrow().is_empty());
        assert!(radio.notified.borrow().is_empty());
    }

    #[test]
    fn publish_writes_and_notifies() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        link.on_connected(4, 0);
        let out = link.publish(&radio, SamplingPolicy::Edge, press(ButtonId::Left));
        assert_eq!(out, Publish::Sent(Token::new("Left_down").unwrap()));
        assert_eq!(*radio.values.borrow(), ["Left_down"]);
        assert_eq!(*radio.notified.borrow(), [(4, "Left_down".to_string())]);
        assert_eq!(link.state().last_command().unwrap().as_str(), "Left_down");
    }

    #[test]
    fn notify_failure_is_implicit_disconnect() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        link.on_connected(5, 0);
        radio.fail_notify.set(true);
        let out = link.publish(&radio, SamplingPolicy::Edge, press(ButtonId::B));
        assert_eq!(out, Publish::PeerLost);
        assert!(!link.state().is_connected());
        assert_eq!(link.state().phase(), ConnectionPhase::Advertising);
        assert_eq!(*radio.dropped.borrow(), [5]);
    }

    #[test]
    fn disconnect_clears_last_command() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        link.on_connected(3, 0);
        link.publish(&radio, SamplingPolicy::Edge, press(ButtonId::Up));
        assert!(link.state().last_command().is_some());
        link.on_disconnected();
        let snap = link.state().snapshot();
        assert_eq!(snap.last_command, None);
        assert!(!snap.connected);
    }

    #[test]
    fn reconnect_clears_last_command() {
        let link = PeripheralLink::<NoopRawMutex, u8>::new();
        let radio = MockRadio::default();
        link.on_connected(1, 0);
        link.publish(&radio, SamplingPolicy::Edge, press(ButtonId::X));
        link.on_disconnected();
        link.on_connected(2, 10);
        assert_eq!(link.state().last_command(), None);
    }
}
