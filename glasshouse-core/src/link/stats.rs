//! Link health counters
//!
//! Tracks how many polls produced a valid frame, why the others were
//! rejected, and whether the board's sequence counter skipped.

use glasshouse_protocol::FrameError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Transport health counters for one reader session
///
/// Every poll lands in exactly one of `valid_frames`, `magic_errors`,
/// `checksum_errors` or `length_errors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkStatistics {
    total_polls: u64,
    valid_frames: u64,
    magic_errors: u64,
    checksum_errors: u64,
    length_errors: u64,
    /// Length failures where the transport produced no block at all
    transport_errors: u64,
    last_sequence: Option<u8>,
    sequence_gaps: u64,
}

impl LinkStatistics {
    /// Create zeroed statistics with no sequence history
    pub const fn new() -> Self {
        Self {
            total_polls: 0,
            valid_frames: 0,
            magic_errors: 0,
            checksum_errors: 0,
            length_errors: 0,
            transport_errors: 0,
            last_sequence: None,
            sequence_gaps: 0,
        }
    }

    /// Record an accepted frame
    ///
    /// Returns true if `sequence` does not follow the previously accepted
    /// one. The first frame of a session has no predecessor and never
    /// counts as a gap.
    pub fn record_frame(&mut self, sequence: u8) -> bool {
        self.total_polls += 1;
        self.valid_frames += 1;

        let gap = match self.last_sequence {
            Some(last) => sequence != last.wrapping_add(1),
            None => false,
        };
        if gap {
            self.sequence_gaps += 1;
        }
        self.last_sequence = Some(sequence);
        gap
    }

    /// Record a block the codec rejected
    pub fn record_rejection(&mut self, error: &FrameError) {
        self.total_polls += 1;
        match error {
            FrameError::Length { .. } => self.length_errors += 1,
            FrameError::Framing => self.magic_errors += 1,
            FrameError::Checksum { .. } => self.checksum_errors += 1,
        }
    }

    /// Record a poll where the transport returned nothing
    ///
    /// Counted as a length failure on an empty block.
    pub fn record_transport_failure(&mut self) {
        self.total_polls += 1;
        self.length_errors += 1;
        self.transport_errors += 1;
    }

    pub fn total_polls(&self) -> u64 {
        self.total_polls
    }

    pub fn valid_frames(&self) -> u64 {
        self.valid_frames
    }

    pub fn magic_errors(&self) -> u64 {
        self.magic_errors
    }

    pub fn checksum_errors(&self) -> u64 {
        self.checksum_errors
    }

    pub fn length_errors(&self) -> u64 {
        self.length_errors
    }

    /// Subset of [`length_errors`](Self::length_errors) caused by transport failures
    pub fn transport_errors(&self) -> u64 {
        self.transport_errors
    }

    /// Sequence number of the last accepted frame
    pub fn last_sequence(&self) -> Option<u8> {
        self.last_sequence
    }

    pub fn sequence_gaps(&self) -> u64 {
        self.sequence_gaps
    }

    /// Sum of all rejection counters
    pub fn error_total(&self) -> u64 {
        self.magic_errors + self.checksum_errors + self.length_errors
    }

    /// Rejected polls as a percentage of all polls (0 before the first poll)
    pub fn error_rate_percent(&self) -> f32 {
        if self.total_polls == 0 {
            return 0.0;
        }
        (self.error_total() as f64 / self.total_polls as f64 * 100.0) as f32
    }
}
