//! Background pool refill
//!
//! Keeps the buffer pool above its low-water mark while a take is being
//! recorded, so frame delivery rarely has to allocate.

use super::buffer_pool::BufferPool;
use super::state::PoolConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to a running refill thread
pub struct RefillWorker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RefillWorker {
    /// Start polling `pool` every `config.refill_interval()`
    pub fn spawn(pool: BufferPool, config: PoolConfig) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let should_stop = stop.clone();

        let handle = thread::Builder::new()
            .name("buffer-refill".to_string())
            .spawn(move || {
                tracing::debug!("Buffer refill worker started");
                let interval = config.refill_interval();

                while !should_stop.load(Ordering::SeqCst) {
                    pool.refill_once(&config);
                    thread::park_timeout(interval);
                }

                tracing::debug!("Buffer refill worker stopped");
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the thread and wait for it to exit.
    ///
    /// No refill happens after this returns.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::error!("Buffer refill worker panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for RefillWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
