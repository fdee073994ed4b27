//! Error types for glasshouse-reader.

use embedded_hal::spi::ErrorKind;
use thiserror::Error;

use glasshouse_core::ConfigError;

/// Failure of a [`ByteSource`](crate::source::ByteSource) to produce a block.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Fetch attempted before the source was opened.
    #[error("transport not open")]
    NotOpen,

    /// Acquiring the transport failed.
    #[error("cannot open transport: {0}")]
    Open(String),

    /// SPI bus reported an error during the exchange.
    #[error("SPI bus error: {0:?}")]
    Bus(ErrorKind),

    /// Replay source has no more scripted blocks.
    #[error("replay exhausted")]
    Exhausted,
}

/// Errors returned by [`PollingReader`](crate::PollingReader) lifecycle calls.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The byte source could not be acquired.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A previous poll thread missed its stop deadline and is still running.
    #[error("previous poll thread has not exited yet")]
    StillStopping,

    /// The OS refused to spawn the poll thread.
    #[error("failed to spawn poll thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Errors while loading a TOML configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or type error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsed values violate a cross-field constraint.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Result type alias using ReaderError.
pub type Result<T> = std::result::Result<T, ReaderError>;
