//! Replay byte source
//!
//! Hands out queued fetch results in order. Clones share the queue, so one
//! clone can be given to the reader while another keeps feeding it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::ByteSource;
use crate::error::TransportError;

#[derive(Default)]
struct Script {
    steps: VecDeque<Result<Vec<u8>, TransportError>>,
    open_failure: Option<TransportError>,
}

/// Byte source that replays scripted blocks and failures
///
/// Once the queue is empty every fetch fails with
/// [`TransportError::Exhausted`] until more steps are pushed.
#[derive(Clone, Default)]
pub struct ReplaySource {
    script: Arc<Mutex<Script>>,
}

impl ReplaySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source preloaded with `blocks`
    pub fn from_blocks<I, B>(blocks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        let source = Self::new();
        for block in blocks {
            source.push_block(block);
        }
        source
    }

    /// Make the next `open` fail with `error`
    pub fn fail_next_open(&self, error: TransportError) {
        self.script().open_failure = Some(error);
    }

    /// Queue a block
    pub fn push_block(&self, block: impl Into<Vec<u8>>) {
        self.script().steps.push_back(Ok(block.into()));
    }

    /// Queue a transport failure
    pub fn push_failure(&self, error: TransportError) {
        self.script().steps.push_back(Err(error));
    }

    /// Number of queued steps not yet fetched
    pub fn pending(&self) -> usize {
        self.script().steps.len()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ByteSource for ReplaySource {
    fn open(&mut self) -> Result<(), TransportError> {
        match self.script().open_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fetch(&mut self) -> Result<Vec<u8>, TransportError> {
        self.script()
            .steps
            .pop_front()
            .unwrap_or(Err(TransportError::Exhausted))
    }
}
