//! Per-session shared state
//!
//! Everything a consumer can observe (latest frame, statistics, history)
//! lives in one [`Session`] so a single lock covers one poll's updates.

use std::sync::{Mutex, MutexGuard, PoisonError};

use glasshouse_core::LinkStatistics;
use glasshouse_protocol::{Frame, FrameError};
use log::debug;
use serde::Serialize;

use crate::history::{History, HistoryBuffer};

/// Whether the current session has seen a valid frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Connection {
    /// No frame accepted since start
    WaitingForData,
    /// At least one frame accepted
    Connected,
}

/// Latest frame and statistics from the same poll
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    pub frame: Option<Frame>,
    pub stats: LinkStatistics,
}

impl Snapshot {
    pub fn connection(&self) -> Connection {
        match self.frame {
            Some(_) => Connection::Connected,
            None => Connection::WaitingForData,
        }
    }
}

/// What one poll produced
#[derive(Debug)]
pub(crate) enum PollOutcome {
    Accepted(Frame),
    Rejected(FrameError),
    TransportFailed,
}

pub(crate) struct Session {
    latest: Option<Frame>,
    stats: LinkStatistics,
    temperature: HistoryBuffer<f32>,
    gas: HistoryBuffer<u16>,
}

impl Session {
    pub(crate) fn new(history_capacity: usize) -> Self {
        Self {
            latest: None,
            stats: LinkStatistics::new(),
            temperature: HistoryBuffer::new(history_capacity),
            gas: HistoryBuffer::new(history_capacity),
        }
    }

    /// Apply one poll's outcome
    pub(crate) fn apply(&mut self, outcome: PollOutcome) {
        match outcome {
            PollOutcome::Accepted(frame) => {
                let previous = self.stats.last_sequence();
                if self.stats.record_frame(frame.sequence()) {
                    debug!(
                        "Sequence gap: {:?} -> {}",
                        previous,
                        frame.sequence()
                    );
                }
                self.temperature
                    .push(frame.captured_at(), frame.temperature_celsius());
                self.gas.push(frame.captured_at(), frame.gas_raw());
                self.latest = Some(frame);
            }
            PollOutcome::Rejected(error) => self.stats.record_rejection(&error),
            PollOutcome::TransportFailed => self.stats.record_transport_failure(),
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            frame: self.latest,
            stats: self.stats,
        }
    }

    pub(crate) fn history(&self) -> History {
        History {
            temperature: self.temperature.snapshot(),
            gas: self.gas.snapshot(),
        }
    }
}

/// Lock a mutex, recovering the data if a panicking thread poisoned it
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
