//! Error types for the TX scheduler
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`EventError`]: Stream backpressure and range faults at the host seams
//! - [`TdmaError`]: Timeslot plan arming failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.
//!
//! Dataplane faults (empty or failed dequeues, stale completions) are never
//! errors at the API: they are absorbed by the scheduler and surface only as
//! register status bits.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
///
/// These errors occur during scheduler setup or channel reconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Scheduler already initialized
    AlreadyInitialized,
    /// Operation requires an initialized scheduler
    NotInitialized,
    /// Port count is zero or above the supported maximum
    InvalidPortCount,
    /// Traffic class count is zero or above the supported maximum
    InvalidTcCount,
    /// Port count times TC count does not match the channel count
    ChannelMismatch,
    /// Flow-control scale exponent out of range
    InvalidFcScale,
    /// Channel index out of range
    InvalidChannel,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::AlreadyInitialized => "already initialized",
            ConfigError::NotInitialized => "not initialized",
            ConfigError::InvalidPortCount => "invalid port count",
            ConfigError::InvalidTcCount => "invalid traffic class count",
            ConfigError::ChannelMismatch => "port/TC product does not match channel count",
            ConfigError::InvalidFcScale => "invalid flow-control scale",
            ConfigError::InvalidChannel => "channel index out of range",
        }
    }
}

// =============================================================================
// Event Stream Errors
// =============================================================================

/// Faults at the event stream seams
///
/// These errors occur when pushing doorbells, completions, or host commands
/// into the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventError {
    /// Queue index beyond the configured queue count
    QueueOutOfRange,
    /// Input FIFO full; retry after a few cycles
    Backpressure,
    /// A host read did not complete within its cycle bound
    ReadStalled,
}

impl core::fmt::Display for EventError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EventError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventError::QueueOutOfRange => "queue index out of range",
            EventError::Backpressure => "input stream full",
            EventError::ReadStalled => "register read stalled",
        }
    }
}

// =============================================================================
// TDMA Errors
// =============================================================================

/// Timeslot plan arming errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TdmaError {
    /// A period parameter is zero
    InvalidPeriod,
    /// The plan needs more timeslots than the hardware reports
    TooManyTimeslots,
    /// Per-queue timeslot masks only cover 64 slots
    MaskTooNarrow,
}

impl core::fmt::Display for TdmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TdmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TdmaError::InvalidPeriod => "invalid period",
            TdmaError::TooManyTimeslots => "too many timeslots",
            TdmaError::MaskTooNarrow => "schedule exceeds mask width",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::ChannelMismatch)) => { /* ... */ }
///     Err(Error::Event(EventError::Backpressure)) => { /* ... */ }
///     Err(Error::Tdma(TdmaError::TooManyTimeslots)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Event stream error
    Event(EventError),
    /// TDMA error
    Tdma(TdmaError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Event(e) => write!(f, "event: {}", e.as_str()),
            Error::Tdma(e) => write!(f, "tdma: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<EventError> for Error {
    fn from(e: EventError) -> Self {
        Error::Event(e)
    }
}

impl From<TdmaError> for Error {
    fn from(e: TdmaError) -> Self {
        Error::Tdma(e)
    }
}

/// Result type alias for scheduler operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for event stream operations
pub type EventResult<T> = core::result::Result<T, EventError>;

/// Result type alias for TDMA operations
pub type TdmaResult<T> = core::result::Result<T, TdmaError>;

// =============================================================================
// Unit Tests
// =============================================================================
