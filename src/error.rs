//! Unified error types for ble-gamepad.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Radio
    /// A radio operation failed.
    Radio(RadioError),

    /// The SoftDevice could not be enabled or the GATT table registered.
    RadioNotAvailable,

    // Protocol
    /// A token could not be built from the given text or payload.
    Token(TokenError),

    // Hardware
    /// Reading a button input line failed.
    InputRead,

    /// Driving an output line (LED, motor, pen) failed.
    OutputWrite,

    /// I²C transaction to the display failed.
    Display,
}

/// Radio-level failures. All of these are transient: the link state
/// machines recover from them by going back to Advertising / Scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    /// GAP / GATT raw error code from the SoftDevice.
    Raw(u32),
    /// Advertising could not start.
    AdvertiseFailed,
    /// Scan was cancelled or could not start.
    ScanFailed,
    /// Connection attempt failed.
    ConnectFailed,
    /// Connect or read did not finish in time.
    Timeout,
    /// The peer does not expose the remote-control service.
    ServiceNotFound,
    /// The service exists but lacks the button characteristic.
    CharacteristicNotFound,
    /// GATT discovery failed for another reason.
    DiscoveryFailed,
    /// Characteristic read failed.
    ReadFailed,
    /// Local characteristic value could not be updated.
    WriteFailed,
    /// Notification could not be pushed to the peer.
    NotifyFailed,
}

/// Why a string or payload is not a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenError {
    /// Longer than `TOKEN_MAX_LEN` bytes.
    TooLong,
    /// Contains non-ASCII or control bytes.
    NotAscii,
    /// Nothing left after trimming whitespace.
    Empty,
}

// Convenience conversions

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Error::Radio(e)
    }
}

impl From<TokenError> for Error {
    fn from(e: TokenError) -> Self {
        Error::Token(e)
    }
}
