//! Polling reader
//!
//! Drives a [`ByteSource`] from a dedicated thread: fetch one block, decode
//! it, publish the outcome, wait the poll interval, repeat. Consumers read
//! copies of the shared [`Session`] through [`PollingReader::snapshot`] or a
//! cloned [`ReaderHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glasshouse_core::MonitorConfig;
use glasshouse_protocol::FrameCodec;
use log::{debug, error, info, trace, warn};

use crate::error::{ReaderError, Result};
use crate::history::History;
use crate::session::{lock, PollOutcome, Session, Snapshot};
use crate::source::ByteSource;

/// How often `stop` checks whether the poll thread has exited
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(1);

const THREAD_NAME: &str = "glasshouse-poll";

/// Reader lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Stopped,
    Running,
}

/// Read-only view of a reader for other threads
#[derive(Clone)]
pub struct ReaderHandle {
    session: Arc<Mutex<Session>>,
}

impl ReaderHandle {
    /// Latest frame and statistics, taken under one lock
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.session).snapshot()
    }

    /// Copies of both history channels
    pub fn history(&self) -> History {
        lock(&self.session).history()
    }
}

/// Threaded poller publishing decoded frames, link statistics and history
///
/// Dropping the reader stops it.
pub struct PollingReader {
    config: MonitorConfig,
    codec: FrameCodec,
    source: Arc<Mutex<Box<dyn ByteSource>>>,
    session: Arc<Mutex<Session>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    /// Poll thread that missed its stop deadline
    lingering: Option<JoinHandle<()>>,
}

impl PollingReader {
    /// Create a stopped reader
    ///
    /// `config` is expected to be validated already.
    pub fn new(config: MonitorConfig, source: impl ByteSource + 'static) -> Self {
        let source: Box<dyn ByteSource> = Box::new(source);
        Self {
            codec: FrameCodec::new(config.protocol),
            source: Arc::new(Mutex::new(source)),
            session: Arc::new(Mutex::new(Session::new(config.history.capacity()))),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            lingering: None,
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn state(&self) -> ReaderState {
        if self.worker.is_some() {
            ReaderState::Running
        } else {
            ReaderState::Stopped
        }
    }

    /// Open the source and start polling
    ///
    /// Every start begins a fresh session: statistics, latest frame and
    /// history are cleared and timestamps restart from zero. Starting a
    /// running reader does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        if let Some(handle) = self.lingering.take() {
            if !handle.is_finished() {
                self.lingering = Some(handle);
                return Err(ReaderError::StillStopping);
            }
            Self::reap(handle);
        }

        if let Err(e) = lock(&self.source).open() {
            error!("Failed to open byte source: {}", e);
            return Err(e.into());
        }

        *lock(&self.session) = Session::new(self.config.history.capacity());
        self.running.store(true, Ordering::Release);

        let context = PollContext {
            codec: self.codec,
            source: Arc::clone(&self.source),
            session: Arc::clone(&self.session),
            running: Arc::clone(&self.running),
            interval: self.config.poll.interval(),
            epoch: Instant::now(),
        };

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || context.run());

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                info!(
                    "Reader started (poll every {} ms)",
                    self.config.poll.interval_ms
                );
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                lock(&self.source).close();
                error!("Failed to spawn poll thread: {}", e);
                Err(ReaderError::Spawn(e))
            }
        }
    }

    /// Stop polling and release the source
    ///
    /// Waits at most the configured stop timeout. A thread still busy after
    /// that is kept aside and the reader reports Stopped regardless.
    pub fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };

        self.running.store(false, Ordering::Release);
        handle.thread().unpark();

        let timeout = self.config.poll.stop_timeout();
        let deadline = Instant::now() + timeout;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(STOP_CHECK_INTERVAL);
        }

        if handle.is_finished() {
            Self::reap(handle);
            info!("Reader stopped");
        } else {
            warn!("Poll thread did not exit within {:?}", timeout);
            self.lingering = Some(handle);
        }
    }

    /// Latest frame and statistics, taken under one lock
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.session).snapshot()
    }

    /// Copies of both history channels
    pub fn history(&self) -> History {
        lock(&self.session).history()
    }

    /// Cloneable read-only handle sharing this reader's session
    pub fn handle(&self) -> ReaderHandle {
        ReaderHandle {
            session: Arc::clone(&self.session),
        }
    }

    fn reap(handle: JoinHandle<()>) {
        if handle.join().is_err() {
            error!("Poll thread panicked");
        }
    }
}

impl Drop for PollingReader {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Everything the poll thread needs, moved into it on start
struct PollContext {
    codec: FrameCodec,
    source: Arc<Mutex<Box<dyn ByteSource>>>,
    session: Arc<Mutex<Session>>,
    running: Arc<AtomicBool>,
    interval: Duration,
    epoch: Instant,
}

impl PollContext {
    fn run(self) {
        debug!("Poll loop running");
        let mut source = lock(&self.source);

        while self.running.load(Ordering::Acquire) {
            let outcome = self.poll_once(&mut **source);
            lock(&self.session).apply(outcome);
            self.wait(Instant::now() + self.interval);
        }

        source.close();
        debug!("Poll loop exited");
    }

    /// Fetch and decode one block without touching the session
    fn poll_once(&self, source: &mut dyn ByteSource) -> PollOutcome {
        let block = match source.fetch() {
            Ok(block) => block,
            Err(e) => {
                warn!("Poll failed: {}", e);
                return PollOutcome::TransportFailed;
            }
        };

        match self.codec.decode(&block, self.epoch.elapsed()) {
            Ok(frame) => {
                trace!(
                    "Frame seq={} status={:#04x}",
                    frame.sequence(),
                    frame.status().bits()
                );
                PollOutcome::Accepted(frame)
            }
            Err(e) => {
                debug!("Rejected block: {}", e);
                PollOutcome::Rejected(e)
            }
        }
    }

    /// Sleep until `deadline` unless stop is requested first
    fn wait(&self, deadline: Instant) {
        while self.running.load(Ordering::Acquire) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::park_timeout(deadline - now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::session::Connection;
    use crate::source::{ReplaySource, SyntheticSource};
    use glasshouse_protocol::{xor_checksum, Frame, StatusFlags, FRAME_LEN};

    const REFERENCE: [u8; FRAME_LEN] = [
        0xAA, 0x55, 0x00, 0x00, 0x34, 0x04, 0xD0, 0x07, 0x00, 0x00, 0x00, 0x00, 0xC8, 0x00, 0xD0,
        0x0D,
    ];

    fn config() -> MonitorConfig {
        let mut config = MonitorConfig::default();
        config.poll.interval_ms = 1;
        config.poll.stop_timeout_ms = 2000;
        config
    }

    fn block(sequence: u8) -> [u8; FRAME_LEN] {
        FrameCodec::default().encode(&Frame::new(
            sequence,
            StatusFlags::empty(),
            [248, 1800, 0, 0],
            200,
            Duration::ZERO,
        ))
    }

    fn wait_for(reader: &PollingReader, done: impl Fn(&Snapshot) -> bool) -> Snapshot {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let snapshot = reader.snapshot();
            if done(&snapshot) {
                return snapshot;
            }
            assert!(Instant::now() < deadline, "timed out: {:?}", snapshot);
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn context(source: ReplaySource) -> PollContext {
        let source: Box<dyn ByteSource> = Box::new(source);
        PollContext {
            codec: FrameCodec::default(),
            source: Arc::new(Mutex::new(source)),
            session: Arc::new(Mutex::new(Session::new(10))),
            running: Arc::new(AtomicBool::new(true)),
            interval: Duration::ZERO,
            epoch: Instant::now(),
        }
    }

    #[test]
    fn test_reference_block_checksum() {
        assert_eq!(xor_checksum(&REFERENCE), REFERENCE[14]);
    }

    #[test]
    fn test_reference_block_leaves_no_errors() {
        let source = ReplaySource::from_blocks([REFERENCE]);
        let ctx = context(source.clone());
        let mut replay = source;

        let outcome = ctx.poll_once(&mut replay);
        lock(&ctx.session).apply(outcome);

        let snapshot = lock(&ctx.session).snapshot();
        assert_eq!(snapshot.stats.total_polls(), 1);
        assert_eq!(snapshot.stats.valid_frames(), 1);
        assert_eq!(snapshot.stats.error_total(), 0);
        assert_eq!(snapshot.stats.sequence_gaps(), 0);
        assert_eq!(snapshot.frame.map(|f| f.temperature_celsius()), Some(20.0));
        assert_eq!(lock(&ctx.session).history().gas.len(), 1);
    }

    #[test]
    fn test_poll_once_outcomes() {
        let source = ReplaySource::from_blocks([REFERENCE.to_vec(), vec![0xAA, 0x55]]);
        source.push_failure(TransportError::NotOpen);
        let ctx = context(source.clone());
        let mut replay = source;

        for _ in 0..3 {
            let outcome = ctx.poll_once(&mut replay);
            lock(&ctx.session).apply(outcome);
        }

        let snapshot = lock(&ctx.session).snapshot();
        let frame = snapshot.frame.unwrap();
        assert_eq!(frame.temperature_celsius(), 20.0);
        assert_eq!(frame.gas_raw(), 2000);
        assert_eq!(frame.status(), StatusFlags::empty());
        assert_eq!(snapshot.stats.total_polls(), 3);
        assert_eq!(snapshot.stats.valid_frames(), 1);
        assert_eq!(snapshot.stats.length_errors(), 2);
        assert_eq!(snapshot.stats.transport_errors(), 1);
        assert_eq!(snapshot.stats.magic_errors(), 0);
        assert_eq!(snapshot.stats.checksum_errors(), 0);
    }

    #[test]
    fn test_run_exits_and_closes_when_not_running() {
        let ctx = context(ReplaySource::from_blocks([REFERENCE]));
        let session = Arc::clone(&ctx.session);
        ctx.running.store(false, Ordering::Release);
        ctx.run();
        assert_eq!(lock(&session).snapshot().stats.total_polls(), 0);
    }

    #[test]
    fn test_end_to_end_reference_frame() {
        let mut reader = PollingReader::new(config(), ReplaySource::from_blocks([REFERENCE]));
        assert_eq!(reader.snapshot().connection(), Connection::WaitingForData);

        reader.start().unwrap();
        let snapshot = wait_for(&reader, |s| s.stats.valid_frames() == 1);
        reader.stop();

        let frame = snapshot.frame.unwrap();
        assert_eq!(snapshot.connection(), Connection::Connected);
        assert_eq!(frame.temperature_celsius(), 20.0);
        assert_eq!(frame.adc()[1], 2000);
        assert!(!frame.status().any_alarm());
        assert!(!frame.status().buzzer());
        assert!(!frame.status().motor());
        // Only the exhausted replay counts against the link
        let stats = reader.snapshot().stats;
        assert_eq!(stats.error_total(), stats.transport_errors());
        assert_eq!(reader.history().temperature[0].value, 20.0);
    }

    #[test]
    fn test_sequence_gap_counted() {
        let source = ReplaySource::from_blocks([block(5), block(6), block(8)]);
        let mut reader = PollingReader::new(config(), source);
        reader.start().unwrap();

        let snapshot = wait_for(&reader, |s| s.stats.valid_frames() == 3);
        assert_eq!(snapshot.stats.sequence_gaps(), 1);
        assert_eq!(snapshot.stats.last_sequence(), Some(8));
    }

    #[test]
    fn test_restart_gives_gap_grace() {
        let feed = ReplaySource::from_blocks([block(10)]);
        let mut reader = PollingReader::new(config(), feed.clone());
        reader.start().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() == 1);
        reader.stop();

        feed.push_block(block(200));
        reader.start().unwrap();
        let snapshot = wait_for(&reader, |s| s.stats.valid_frames() == 1);
        assert_eq!(snapshot.stats.last_sequence(), Some(200));
        assert_eq!(snapshot.stats.sequence_gaps(), 0);
        assert_eq!(reader.history().gas.len(), 1);
    }

    #[test]
    fn test_transport_failures_keep_polling() {
        let feed = ReplaySource::new();
        feed.push_failure(TransportError::NotOpen);
        feed.push_failure(TransportError::Open("gone".into()));
        feed.push_block(block(1));

        let mut reader = PollingReader::new(config(), feed);
        reader.start().unwrap();
        let snapshot = wait_for(&reader, |s| s.stats.valid_frames() == 1);

        assert_eq!(reader.state(), ReaderState::Running);
        assert!(snapshot.stats.transport_errors() >= 2);
        assert!(snapshot.stats.length_errors() >= 2);
    }

    #[test]
    fn test_start_failure_leaves_stopped() {
        let feed = ReplaySource::new();
        feed.fail_next_open(TransportError::Open("no device".into()));

        let mut reader = PollingReader::new(config(), feed);
        assert!(matches!(
            reader.start(),
            Err(ReaderError::Transport(TransportError::Open(_)))
        ));
        assert_eq!(reader.state(), ReaderState::Stopped);

        reader.start().unwrap();
        assert_eq!(reader.state(), ReaderState::Running);
    }

    #[test]
    fn test_start_and_stop_idempotent() {
        let mut reader = PollingReader::new(config(), ReplaySource::new());
        reader.stop();
        assert_eq!(reader.state(), ReaderState::Stopped);

        reader.start().unwrap();
        reader.start().unwrap();
        assert_eq!(reader.state(), ReaderState::Running);

        reader.stop();
        reader.stop();
        assert_eq!(reader.state(), ReaderState::Stopped);
    }

    #[test]
    fn test_snapshot_idempotent_without_polls() {
        let mut reader = PollingReader::new(config(), ReplaySource::from_blocks([block(1)]));
        reader.start().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() == 1);
        reader.stop();

        assert_eq!(reader.snapshot(), reader.snapshot());
        assert_eq!(reader.history(), reader.history());
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut config = config();
        config.history.window_s = 1;
        config.history.period_ms = 500;

        let source = ReplaySource::from_blocks([block(0), block(1), block(2)]);
        let mut reader = PollingReader::new(config, source);
        reader.start().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() == 3);

        let history = reader.history();
        assert_eq!(history.gas.len(), 2);
        assert_eq!(history.temperature.len(), 2);
        assert!(history.gas[0].at <= history.gas[1].at);
    }

    #[test]
    fn test_handle_reads_from_other_thread() {
        let mut reader = PollingReader::new(config(), ReplaySource::from_blocks([REFERENCE]));
        let handle = reader.handle();
        reader.start().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() == 1);

        let seen = thread::spawn(move || handle.snapshot().frame.map(|f| f.gas_raw()))
            .join()
            .unwrap();
        assert_eq!(seen, Some(2000));
    }

    #[test]
    fn test_synthetic_source_end_to_end() {
        let config = config();
        let mut reader = PollingReader::new(config, SyntheticSource::new(&config));
        reader.start().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() >= 20);
        reader.stop();

        let snapshot = reader.snapshot();
        let stats = snapshot.stats;
        assert_eq!(snapshot.connection(), Connection::Connected);
        assert_eq!(stats.error_total(), 0);
        assert_eq!(stats.sequence_gaps(), 0);
        assert_eq!(stats.total_polls(), stats.valid_frames());

        let expected = usize::try_from(stats.valid_frames())
            .unwrap()
            .min(config.history.capacity());
        let history = reader.history();
        assert_eq!(history.gas.len(), expected);
        assert_eq!(history.temperature.len(), expected);
        assert!(history.gas.windows(2).all(|w| w[0].at <= w[1].at));
    }

    #[test]
    fn test_concurrent_snapshots_are_consistent() {
        let config = config();
        let mut reader = PollingReader::new(config, SyntheticSource::new(&config));
        let handle = reader.handle();
        reader.start().unwrap();

        let observer = thread::spawn(move || {
            for _ in 0..2000 {
                let snapshot = handle.snapshot();
                match snapshot.frame {
                    Some(frame) => {
                        assert_eq!(Some(frame.sequence()), snapshot.stats.last_sequence());
                        assert!(snapshot.stats.valid_frames() > 0);
                    }
                    None => assert_eq!(snapshot.stats.last_sequence(), None),
                }
            }
        });

        observer.join().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() >= 5);
        reader.stop();

        let stats = reader.snapshot().stats;
        assert_eq!(stats.error_total(), 0);
        assert_eq!(stats.sequence_gaps(), 0);
    }

    #[test]
    fn test_oversized_history_does_not_preallocate() {
        let mut config = config();
        config.history.window_s = u32::MAX;
        config.history.period_ms = 1;

        let mut reader = PollingReader::new(config, ReplaySource::from_blocks([REFERENCE]));
        reader.start().unwrap();
        wait_for(&reader, |s| s.stats.valid_frames() == 1);
        reader.stop();
        assert_eq!(reader.history().gas.len(), 1);
    }

    struct SlowSource {
        delay: Duration,
    }

    impl ByteSource for SlowSource {
        fn fetch(&mut self) -> std::result::Result<Vec<u8>, TransportError> {
            thread::sleep(self.delay);
            Err(TransportError::Exhausted)
        }
    }

    #[test]
    fn test_stop_timeout_then_reclaim() {
        let mut config = config();
        config.poll.stop_timeout_ms = 5;
        let mut reader = PollingReader::new(
            config,
            SlowSource {
                delay: Duration::from_millis(300),
            },
        );

        reader.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        reader.stop();
        assert_eq!(reader.state(), ReaderState::Stopped);
        assert!(matches!(reader.start(), Err(ReaderError::StillStopping)));

        let deadline = Instant::now() + Duration::from_secs(5);
        while reader.start().is_err() {
            assert!(Instant::now() < deadline, "poll thread never exited");
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(reader.state(), ReaderState::Running);
    }
}
