//! Reusable text buffers for event rendering
//!
//! Every event is rendered into a buffer borrowed from a pool and returned
//! when the borrow guard drops, so steady-state logging does not allocate.
//! The guard returns its buffer on every exit path, including early returns
//! and errors.

use parking_lot::{const_mutex, Mutex};
use std::ops::{Deref, DerefMut};

/// Capacity of freshly allocated buffers
const INITIAL_CAPACITY: usize = 1024;

/// Buffers kept for reuse at most
const DEFAULT_MAX_POOLED: usize = 64;

/// Buffers that grew beyond this are dropped instead of pooled
const DEFAULT_MAX_CAPACITY: usize = 64 * 1024;

static GLOBAL_POOL: BufferPool = BufferPool::new();

/// Thread-safe pool of growable buffers
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<String>>,
    max_pooled: usize,
    max_capacity: usize,
}

impl BufferPool {
    pub const fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_POOLED, DEFAULT_MAX_CAPACITY)
    }

    /// Create a pool keeping at most `max_pooled` buffers, each no larger
    /// than `max_capacity` bytes
    pub const fn with_limits(max_pooled: usize, max_capacity: usize) -> Self {
        Self {
            buffers: const_mutex(Vec::new()),
            max_pooled,
            max_capacity,
        }
    }

    /// The process-wide pool used by handlers
    pub fn global() -> &'static BufferPool {
        &GLOBAL_POOL
    }

    /// Borrow an empty buffer
    pub fn take(&self) -> PooledBuffer<'_> {
        let mut buf = self
            .buffers
            .lock()
            .pop()
            .unwrap_or_else(|| String::with_capacity(INITIAL_CAPACITY));
        buf.clear();
        PooledBuffer { buf, pool: self }
    }

    fn release(&self, mut buf: String) {
        if buf.capacity() > self.max_capacity {
            return;
        }
        buf.clear();

        let mut buffers = self.buffers.lock();
        if buffers.len() < self.max_pooled {
            buffers.push(buf);
        }
    }

    /// Number of idle buffers currently held
    pub fn idle_count(&self) -> usize {
        self.buffers.lock().len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffer borrowed from a [`BufferPool`], returned on drop
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    buf: String,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
