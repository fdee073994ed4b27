//! SPI byte source
//!
//! The board is an SPI slave that shifts out its latest frame while the host
//! clocks in zeros. Any `embedded_hal::spi::SpiDevice` works, e.g. a Linux
//! spidev wrapper on the Raspberry Pi.

use std::fmt;

use embedded_hal::spi::{Error as _, SpiDevice};
use glasshouse_protocol::FRAME_LEN;
use log::{debug, info};

use super::ByteSource;
use crate::error::TransportError;

/// Byte source backed by an SPI device opened on demand
///
/// `opener` is called on every [`open`](ByteSource::open); the device is
/// dropped on [`close`](ByteSource::close).
pub struct SpiSource<D, F> {
    opener: F,
    device: Option<D>,
}

impl<D, F, E> SpiSource<D, F>
where
    D: SpiDevice<u8>,
    F: FnMut() -> Result<D, E>,
    E: fmt::Display,
{
    /// Create a closed source
    pub fn new(opener: F) -> Self {
        Self {
            opener,
            device: None,
        }
    }

    /// Returns true while the device is held
    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }
}

impl<D, F, E> ByteSource for SpiSource<D, F>
where
    D: SpiDevice<u8> + Send,
    F: FnMut() -> Result<D, E> + Send,
    E: fmt::Display,
{
    fn open(&mut self) -> Result<(), TransportError> {
        if self.device.is_some() {
            return Ok(());
        }
        let device = (self.opener)().map_err(|e| TransportError::Open(e.to_string()))?;
        self.device = Some(device);
        info!("SPI device opened");
        Ok(())
    }

    fn fetch(&mut self) -> Result<Vec<u8>, TransportError> {
        let device = self.device.as_mut().ok_or(TransportError::NotOpen)?;

        let mut block = vec![0u8; FRAME_LEN];
        device
            .transfer_in_place(&mut block)
            .map_err(|e| TransportError::Bus(e.kind()))?;
        Ok(block)
    }

    fn close(&mut self) {
        if self.device.take().is_some() {
            debug!("SPI device released");
        }
    }
}
