//! Take recorder
//!
//! Drives the Idle -> Recording -> Idle lifecycle: copies incoming frames
//! into pooled buffers, assembles them into a take on stop, and hands the
//! buffers back to the pool.

use super::assembler::assemble;
use super::buffer_pool::BufferPool;
use super::error::{RecordingError, RecordingResult};
use super::refill::RefillWorker;
use super::state::{PoolConfig, RecordingSession, RecordingState};
use crate::capture::StreamSettings;
use crate::project::TakeStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events emitted during recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingEvent {
    /// A take started
    Started { name: String },
    /// A take was assembled and stored at `index`
    Saved {
        name: String,
        index: usize,
        frames: usize,
    },
    /// A take ended with nothing to save
    Discarded { name: String },
}

/// Records frames from a capture stream into takes
pub struct TakeRecorder {
    pool: BufferPool,
    pool_config: PoolConfig,
    refill: Option<RefillWorker>,
    session: Option<RecordingSession>,
    store: TakeStore,
    event_tx: broadcast::Sender<RecordingEvent>,
}

impl TakeRecorder {
    /// Create a recorder with an empty take store
    pub fn new(pool_config: PoolConfig) -> Self {
        Self::with_store(pool_config, TakeStore::new())
    }

    /// Create a recorder appending to previously loaded takes
    pub fn with_store(pool_config: PoolConfig, store: TakeStore) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            pool: BufferPool::new(),
            pool_config,
            refill: None,
            session: None,
            store,
            event_tx,
        }
    }

    pub fn state(&self) -> RecordingState {
        if self.session.is_some() {
            RecordingState::Recording
        } else {
            RecordingState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Subscribe to recording events
    pub fn subscribe(&self) -> broadcast::Receiver<RecordingEvent> {
        self.event_tx.subscribe()
    }

    /// Name of the take in progress
    pub fn active_take(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.name.as_str())
    }

    /// Frames collected so far in the take in progress
    pub fn frame_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.frame_count())
    }

    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    pub fn store(&self) -> &TakeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TakeStore {
        &mut self.store
    }

    /// Start a take named from the current time and `take_number`
    pub fn start_recording(
        &mut self,
        settings: &dyn StreamSettings,
        take_number: u32,
    ) -> RecordingResult<String> {
        if self.session.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }
        self.begin(RecordingSession::new(settings, take_number))
    }

    /// Start a take with an explicit name
    pub fn start_recording_as(
        &mut self,
        name: impl Into<String>,
        settings: &dyn StreamSettings,
    ) -> RecordingResult<String> {
        if self.session.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }
        self.begin(RecordingSession::named(name.into(), settings))
    }

    fn begin(&mut self, session: RecordingSession) -> RecordingResult<String> {
        if session.buffer_size == 0 {
            return Err(RecordingError::InvalidBufferSize);
        }

        tracing::info!("Starting take: {}", session.name);

        if self.pool.configure(session.buffer_size) {
            tracing::debug!("Buffer pool rebuilt for {} byte frames", session.buffer_size);
        }

        self.refill = Some(RefillWorker::spawn(
            self.pool.clone(),
            self.pool_config.clone(),
        )?);

        let name = session.name.clone();
        self.session = Some(session);
        let _ = self.event_tx.send(RecordingEvent::Started { name: name.clone() });

        Ok(name)
    }

    /// Copy one frame of `buffer_size` bytes starting at `offset` into the take.
    pub fn add_frame(&mut self, bytes: &[u8], offset: usize) -> RecordingResult<()> {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("Frame delivered while not recording, ignoring");
            return Err(RecordingError::NotRecording);
        };

        let size = session.buffer_size;
        let end = offset
            .checked_add(size)
            .filter(|&end| end <= bytes.len())
            .ok_or(RecordingError::FrameOutOfBounds {
                offset,
                needed: size,
                available: bytes.len().saturating_sub(offset),
            })?;

        let mut buffer = self.pool.acquire();
        buffer.resize(size, 0);
        buffer.copy_from_slice(&bytes[offset..end]);
        session.frames.push(buffer);

        Ok(())
    }

    /// Finish the take in progress.
    ///
    /// Returns the store index of the new take, or `None` when nothing was
    /// saved (not recording, unnamed take, or no frames). Safe to call in
    /// any state.
    pub fn stop_recording(&mut self) -> Option<usize> {
        if let Some(mut worker) = self.refill.take() {
            worker.stop();
        }

        let mut session = self.session.take()?;

        if !session.is_saveable() {
            tracing::info!(
                "Discarding take '{}' ({} frames)",
                session.name,
                session.frame_count()
            );
            self.pool.release_all(session.frames.drain(..));
            let _ = self.event_tx.send(RecordingEvent::Discarded { name: session.name });
            return None;
        }

        let take = assemble(&session);
        let frames = session.frame_count();
        self.pool.release_all(session.frames.drain(..));

        let name = take.name.clone();
        let bytes = take.record_stream.len();
        let index = self.store.add(take);

        tracing::info!("Saved take '{}': {} frames, {} bytes", name, frames, bytes);
        let _ = self.event_tx.send(RecordingEvent::Saved {
            name,
            index,
            frames,
        });

        Some(index)
    }

    /// Host teardown: finishes any take in progress and stops the refill
    /// worker.
    pub fn shutdown(&mut self) -> Option<usize> {
        tracing::debug!("Take recorder shutting down");
        self.stop_recording()
    }
}

impl Default for TakeRecorder {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

/// Recorder shared between the thread delivering frames and the host
#[derive(Clone, Default)]
pub struct RecorderState {
    pub recorder: Arc<Mutex<TakeRecorder>>,
}

impl RecorderState {
    pub fn new(recorder: TakeRecorder) -> Self {
        Self {
            recorder: Arc::new(Mutex::new(recorder)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::StreamConfig;
    use std::thread;

    /// Recorder whose refill worker never adds buffers
    fn recorder_without_refill() -> TakeRecorder {
        TakeRecorder::new(PoolConfig {
            low_water_mark: 0,
            ..PoolConfig::default()
        })
    }

    fn payload(index: u8, size: usize) -> Vec<u8> {
        (0..size).map(|i| index.wrapping_mul(31).wrapping_add(i as u8)).collect()
    }

    #[test]
    fn test_record_ten_frames() {
        let mut recorder = TakeRecorder::default();
        let settings = StreamConfig::new(64);

        recorder.start_recording(&settings, 1).unwrap();
        assert_eq!(recorder.state(), RecordingState::Recording);

        let payloads: Vec<Vec<u8>> = (0..10).map(|i| payload(i, 64)).collect();
        for p in &payloads {
            recorder.add_frame(p, 0).unwrap();
        }
        assert_eq!(recorder.frame_count(), 10);

        let index = recorder.stop_recording().unwrap();
        assert_eq!(recorder.state(), RecordingState::Idle);
        assert_eq!(recorder.store().len(), 1);

        let take = recorder.store().get(index).unwrap();
        assert_eq!(take.record_stream.len(), 640);
        assert_eq!(take.record_stream, payloads.concat());
        assert_eq!(take.locations, settings.locations);
        assert!(recorder.store().is_dirty());
    }

    #[test]
    fn test_saved_event_reports_index_and_frames() {
        let mut recorder = TakeRecorder::default();
        let mut events = recorder.subscribe();

        recorder.start_recording_as("evented", &StreamConfig::new(8)).unwrap();
        for i in 0..7u8 {
            recorder.add_frame(&[i; 8], 0).unwrap();
        }
        assert_eq!(recorder.stop_recording(), Some(0));

        assert_eq!(
            events.try_recv().unwrap(),
            RecordingEvent::Started {
                name: "evented".to_string()
            }
        );
        assert_eq!(
            events.try_recv().unwrap(),
            RecordingEvent::Saved {
                name: "evented".to_string(),
                index: 0,
                frames: 7,
            }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_frame_copied_from_offset() {
        let mut recorder = TakeRecorder::default();
        recorder.start_recording_as("offset", &StreamConfig::new(4)).unwrap();

        let packet = [0xAA, 0xBB, 1, 2, 3, 4, 0xCC];
        recorder.add_frame(&packet, 2).unwrap();
        recorder.stop_recording();

        assert_eq!(recorder.store().list()[0].record_stream, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_frame_out_of_bounds() {
        let mut recorder = TakeRecorder::default();
        recorder.start_recording_as("short", &StreamConfig::new(8)).unwrap();

        let err = recorder.add_frame(&[0u8; 10], 4).unwrap_err();
        assert!(matches!(
            err,
            RecordingError::FrameOutOfBounds {
                offset: 4,
                needed: 8,
                available: 6
            }
        ));
        assert_eq!(recorder.frame_count(), 0);
        recorder.stop_recording();
    }

    #[test]
    fn test_stop_without_frames_leaves_store_unchanged() {
        let mut recorder = TakeRecorder::default();
        let mut events = recorder.subscribe();

        let name = recorder.start_recording(&StreamConfig::new(16), 2).unwrap();
        assert_eq!(recorder.stop_recording(), None);

        assert!(recorder.store().is_empty());
        assert!(!recorder.store().is_dirty());
        assert_eq!(events.try_recv().unwrap(), RecordingEvent::Started { name: name.clone() });
        assert_eq!(events.try_recv().unwrap(), RecordingEvent::Discarded { name });
    }

    #[test]
    fn test_unnamed_take_recycles_buffers() {
        let mut recorder = recorder_without_refill();
        recorder.start_recording_as("", &StreamConfig::new(8)).unwrap();
        recorder.add_frame(&[1u8; 8], 0).unwrap();
        recorder.add_frame(&[2u8; 8], 0).unwrap();
        assert!(recorder.pool().is_empty());

        assert_eq!(recorder.stop_recording(), None);

        assert!(recorder.store().is_empty());
        assert_eq!(recorder.pool().len(), 2);
    }

    #[test]
    fn test_buffers_return_to_pool_after_save() {
        let mut recorder = recorder_without_refill();
        recorder.start_recording_as("recycle", &StreamConfig::new(8)).unwrap();
        for i in 0..5u8 {
            recorder.add_frame(&[i; 8], 0).unwrap();
        }

        recorder.stop_recording().unwrap();
        assert_eq!(recorder.pool().len(), 5);
        assert_eq!(recorder.pool().stats().fallback_allocations, 5);

        // Recycled buffers are reused by the next take
        recorder.start_recording_as("reuse", &StreamConfig::new(8)).unwrap();
        recorder.add_frame(&[7u8; 8], 0).unwrap();
        recorder.stop_recording().unwrap();
        assert_eq!(recorder.pool().stats().fallback_allocations, 5);
        assert_eq!(recorder.store().list()[1].record_stream, vec![7u8; 8]);
    }

    #[test]
    fn test_double_start_rejected() {
        let mut recorder = TakeRecorder::default();
        let name = recorder.start_recording_as("first", &StreamConfig::new(8)).unwrap();
        recorder.add_frame(&[1u8; 8], 0).unwrap();

        let err = recorder.start_recording(&StreamConfig::new(16), 2).unwrap_err();
        assert!(matches!(err, RecordingError::AlreadyRecording));
        assert_eq!(recorder.active_take(), Some(name.as_str()));
        assert_eq!(recorder.frame_count(), 1);

        recorder.stop_recording().unwrap();
        assert_eq!(recorder.store().list()[0].buffer_size, 8);
    }

    #[test]
    fn test_add_frame_while_idle() {
        let mut recorder = TakeRecorder::default();
        let err = recorder.add_frame(&[0u8; 8], 0).unwrap_err();
        assert!(matches!(err, RecordingError::NotRecording));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut recorder = TakeRecorder::default();
        assert_eq!(recorder.stop_recording(), None);

        recorder.start_recording_as("once", &StreamConfig::new(2)).unwrap();
        recorder.add_frame(&[1, 2], 0).unwrap();
        assert_eq!(recorder.stop_recording(), Some(0));
        assert_eq!(recorder.stop_recording(), None);
        assert_eq!(recorder.shutdown(), None);
        assert_eq!(recorder.store().len(), 1);
    }

    #[test]
    fn test_zero_buffer_size_rejected() {
        let mut recorder = TakeRecorder::default();
        let err = recorder.start_recording(&StreamConfig::new(0), 1).unwrap_err();
        assert!(matches!(err, RecordingError::InvalidBufferSize));
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_new_buffer_size_rebuilds_pool() {
        let mut recorder = TakeRecorder::default();

        recorder.start_recording_as("small", &StreamConfig::new(8)).unwrap();
        recorder.add_frame(&[1u8; 8], 0).unwrap();
        recorder.stop_recording().unwrap();
        assert!(!recorder.pool().is_empty());

        recorder.start_recording_as("large", &StreamConfig::new(32)).unwrap();
        for _ in 0..40 {
            recorder.add_frame(&[3u8; 32], 0).unwrap();
        }
        recorder.stop_recording().unwrap();

        assert_eq!(recorder.pool().buffer_size(), 32);
        let take = recorder.store().find_by_name("large").unwrap();
        assert_eq!(take.frame_count(), 40);
        assert!(take.frames().all(|f| f == &[3u8; 32][..]));
    }

    #[test]
    fn test_appends_after_loaded_takes() {
        let mut first = TakeRecorder::default();
        first.start_recording_as("earlier", &StreamConfig::new(2)).unwrap();
        first.add_frame(&[1, 1], 0).unwrap();
        first.stop_recording().unwrap();

        let loaded = TakeStore::load(first.store().list().to_vec());
        let mut recorder = TakeRecorder::with_store(PoolConfig::default(), loaded);
        recorder.start_recording_as("later", &StreamConfig::new(2)).unwrap();
        recorder.add_frame(&[2, 2], 0).unwrap();

        assert_eq!(recorder.stop_recording(), Some(1));
        let names: Vec<&str> = recorder.store().list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["earlier", "later"]);
    }

    #[test]
    fn test_shutdown_saves_take_in_progress() {
        let mut recorder = TakeRecorder::default();
        recorder.start_recording_as("interrupted", &StreamConfig::new(4)).unwrap();
        recorder.add_frame(&[9u8; 4], 0).unwrap();

        assert_eq!(recorder.shutdown(), Some(0));
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_frames_from_another_thread() {
        let state = RecorderState::default();
        state
            .recorder
            .lock()
            .start_recording_as("threaded", &StreamConfig::new(16))
            .unwrap();

        let producer = {
            let state = state.clone();
            thread::spawn(move || {
                for i in 0..100u8 {
                    state.recorder.lock().add_frame(&[i; 16], 0).unwrap();
                }
            })
        };
        producer.join().unwrap();

        let mut recorder = state.recorder.lock();
        let index = recorder.stop_recording().unwrap();
        let take = recorder.store().get(index).unwrap();
        assert_eq!(take.frame_count(), 100);
        for (i, frame) in take.frames().enumerate() {
            assert!(frame.iter().all(|&b| b == i as u8));
        }
    }
}
