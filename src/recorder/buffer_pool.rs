//! Reusable frame buffers
//!
//! A queue of fixed-size byte buffers shared between the thread delivering
//! frames and the background refill worker. Every queued buffer has exactly
//! the pool's current buffer size.

use super::state::PoolConfig;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Snapshot of pool bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Size in bytes of every queued buffer
    pub buffer_size: usize,
    /// Buffers currently idle in the queue
    pub queued: usize,
    /// Buffers allocated on demand because the queue was empty
    pub fallback_allocations: u64,
    /// Released buffers dropped for having a stale size
    pub dropped_releases: u64,
}

struct PoolInner {
    buffer_size: usize,
    queue: VecDeque<Vec<u8>>,
    fallback_allocations: u64,
    dropped_releases: u64,
}

/// Shared pool of uniformly sized byte buffers.
///
/// Cloning yields another handle to the same queue.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<Mutex<PoolInner>>,
}

impl BufferPool {
    /// Create an empty, unconfigured pool
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PoolInner {
                buffer_size: 0,
                queue: VecDeque::new(),
                fallback_allocations: 0,
                dropped_releases: 0,
            })),
        }
    }

    /// Set the buffer size. A different size discards every queued buffer.
    ///
    /// Returns true when the pool was rebuilt.
    pub fn configure(&self, buffer_size: usize) -> bool {
        let mut inner = self.inner.lock();
        if inner.buffer_size == buffer_size {
            return false;
        }

        tracing::debug!(
            "Reconfiguring buffer pool: {} -> {} bytes, discarding {} buffers",
            inner.buffer_size,
            buffer_size,
            inner.queue.len()
        );
        inner.queue.clear();
        inner.buffer_size = buffer_size;
        true
    }

    /// Take a buffer from the queue, allocating a zeroed one if it is empty.
    ///
    /// Never blocks on the refill worker.
    pub fn acquire(&self) -> Vec<u8> {
        let mut inner = self.inner.lock();
        if let Some(buffer) = inner.queue.pop_front() {
            return buffer;
        }

        inner.fallback_allocations += 1;
        let size = inner.buffer_size;
        drop(inner);

        tracing::warn!("Buffer queue empty, allocating a {} byte buffer", size);
        vec![0u8; size]
    }

    /// Return a buffer to the tail of the queue.
    ///
    /// Buffers sized for another configuration are dropped.
    pub fn release(&self, buffer: Vec<u8>) {
        let mut inner = self.inner.lock();
        if buffer.len() != inner.buffer_size {
            inner.dropped_releases += 1;
            return;
        }
        inner.queue.push_back(buffer);
    }

    /// Return several buffers, in order
    pub fn release_all(&self, buffers: impl IntoIterator<Item = Vec<u8>>) {
        for buffer in buffers {
            self.release(buffer);
        }
    }

    /// Run one refill cycle: if the queue is below the low-water mark, add a
    /// batch of zeroed buffers. Returns the number of buffers added.
    pub fn refill_once(&self, config: &PoolConfig) -> usize {
        let (size, depth) = {
            let inner = self.inner.lock();
            (inner.buffer_size, inner.queue.len())
        };

        if size == 0 || depth >= config.low_water_mark {
            return 0;
        }

        // Allocate outside the lock so acquire() is never held up by it.
        let fresh: Vec<Vec<u8>> = (0..config.refill_batch).map(|_| vec![0u8; size]).collect();

        let mut inner = self.inner.lock();
        if inner.buffer_size != size {
            return 0;
        }
        inner.queue.extend(fresh);
        config.refill_batch
    }

    /// Current buffer size
    pub fn buffer_size(&self) -> usize {
        self.inner.lock().buffer_size
    }

    /// Number of idle buffers
    pub fn len(&self) -> usize {
        self.inner.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock();
        PoolStats {
            buffer_size: inner.buffer_size,
            queued: inner.queue.len(),
            fallback_allocations: inner.fallback_allocations,
            dropped_releases: inner.dropped_releases,
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
