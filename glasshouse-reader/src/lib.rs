//! Host-side reader for the Glasshouse sensor board
//!
//! Polls the board over SPI (or a synthetic / replay source), validates
//! every block with the frame codec and publishes:
//!
//! - the latest decoded frame
//! - link statistics for the current session
//! - bounded temperature and gas history
//!
//! ```no_run
//! use glasshouse_reader::{config, PollingReader, SyntheticSource};
//!
//! let config = config::load("glasshouse.toml")?;
//! let mut reader = PollingReader::new(config, SyntheticSource::new(&config));
//! reader.start()?;
//! let snapshot = reader.snapshot();
//! println!("{:?}", snapshot.connection());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod reader;
pub mod session;
pub mod source;

pub use error::{LoadError, ReaderError, Result, TransportError};
pub use history::{History, HistoryBuffer, Sample};
pub use reader::{PollingReader, ReaderHandle, ReaderState};
pub use session::{Connection, Snapshot};
pub use source::{ByteSource, ReplaySource, SpiSource, SyntheticSource};

pub use glasshouse_core::{AlarmLevel, AlarmThresholds, Assessment, MonitorConfig};
pub use glasshouse_protocol::{Frame, FrameCodec, FrameError, StatusFlags};
