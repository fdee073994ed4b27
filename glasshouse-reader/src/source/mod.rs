//! Byte sources - where frame-sized blocks come from.
//!
//! Provides:
//! - [`SpiSource`] for the real SPI link (any `embedded-hal` SPI device)
//! - [`SyntheticSource`] for running without hardware
//! - [`ReplaySource`] for scripted or captured traffic

mod replay;
mod spi;
mod synthetic;

pub use replay::ReplaySource;
pub use spi::SpiSource;
pub use synthetic::SyntheticSource;

use crate::error::TransportError;

/// Supplier of one frame-sized block per poll
///
/// The reader calls [`open`](Self::open) on start, [`fetch`](Self::fetch)
/// once per poll from its own thread, and [`close`](Self::close) when the
/// poll loop exits.
pub trait ByteSource: Send {
    /// Acquire the underlying transport.
    fn open(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Exchange one block with the device.
    ///
    /// The returned block may have any length; validation is the codec's job.
    fn fetch(&mut self) -> Result<Vec<u8>, TransportError>;

    /// Release the underlying transport.
    fn close(&mut self) {}
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn open(&mut self) -> Result<(), TransportError> {
        (**self).open()
    }

    fn fetch(&mut self) -> Result<Vec<u8>, TransportError> {
        (**self).fetch()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
