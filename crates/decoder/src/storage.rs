//! Growable byte storage for decoded payloads.
//!
//! A [`ByteStorage`] owns one contiguous memory region split into three
//! logical parts:
//!
//! ```text
//! [ skipped prefix | valid data | free tail ]
//!   offset bytes     length       capacity - offset - length
//! ```
//!
//! The access pattern is strictly "append at tail, consume from head":
//! a pull step writes freshly decoded bytes into the free tail and
//! commits them with [`append`](ByteStorage::append); consumers discard
//! bytes from the front with [`trim`](ByteStorage::trim), which advances
//! the offset without copying. Growth only ever extends capacity at the
//! tail, so per-frame reallocation is amortised away for steady-state
//! streaming.
//!
//! Precondition violations (`append` past the tail, `trim` past the
//! valid length) are programmer errors between the pull step and the
//! buffer, and panic rather than return an error.

use std::fmt;

/// Offset/length/capacity bookkeeping for the three buffer regions.
///
/// Invariant: `offset + length <= capacity`, checked on every mutation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Bytes logically consumed from the front (still allocated).
    pub offset: usize,
    /// Bytes of valid data starting at `offset`.
    pub length: usize,
    /// Total allocated bytes.
    pub capacity: usize,
}

impl Region {
    /// Free bytes after the valid data.
    pub fn tail(self) -> usize {
        self.check();
        self.capacity - self.offset - self.length
    }

    fn check(self) {
        assert!(
            self.offset + self.length <= self.capacity,
            "byte storage region corrupt: offset {} + length {} > capacity {}",
            self.offset,
            self.length,
            self.capacity
        );
    }
}

/// Capability interface for decode payload buffers.
///
/// The default owning implementation is [`VectorByteStorage`]; pooled
/// or recycled backends can satisfy the same interface.
pub trait ByteStorage {
    /// Guarantee at least `n` bytes of free tail capacity.
    ///
    /// May reallocate and copy the existing valid region, but never
    /// loses or reorders previously valid bytes.
    fn ensure(&mut self, n: usize);

    /// The free tail, starting at the first byte after the valid data.
    ///
    /// Callers write decoded bytes here and commit them with
    /// [`append`](Self::append).
    fn writable_tail(&mut self) -> &mut [u8];

    /// Commit `n` bytes just written into the tail as valid data.
    ///
    /// # Panics
    ///
    /// Panics if `n > tail()`.
    fn append(&mut self, n: usize);

    /// Logically discard `n` bytes from the front of the valid data
    /// by advancing the offset. No bytes are copied.
    ///
    /// # Panics
    ///
    /// Panics if `n > len()`.
    fn trim(&mut self, n: usize);

    /// The valid data region.
    fn data(&self) -> &[u8];

    /// Valid byte count.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining free tail capacity.
    fn tail(&self) -> usize;

    /// Total allocated bytes.
    fn capacity(&self) -> usize;

    /// Reset offset and length to zero without releasing capacity.
    fn clear(&mut self);

    /// Convenience: ensure capacity, copy `bytes` into the tail, and
    /// commit them.
    fn put(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.writable_tail()[..bytes.len()].copy_from_slice(bytes);
        self.append(bytes.len());
    }
}

/// Default owning [`ByteStorage`] backed by a `Vec<u8>`.
///
/// The vector's length always equals the region capacity; growth
/// resizes the vector to `offset + length + n`, matching the
/// append-at-tail growth policy (no extra headroom beyond the request).
pub struct VectorByteStorage {
    buf: Vec<u8>,
    region: Region,
}

impl VectorByteStorage {
    /// Empty storage with no allocation.
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            region: Region::default(),
        }
    }

    /// Storage pre-sized so the first `n` appended bytes need no
    /// reallocation.
    pub fn with_capacity(n: usize) -> Self {
        let mut storage = Self::new();
        storage.ensure(n);
        storage
    }

    /// Boxed storage for use as a message payload.
    pub fn boxed(n: usize) -> Box<dyn ByteStorage> {
        Box::new(Self::with_capacity(n))
    }
}

impl Default for VectorByteStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStorage for VectorByteStorage {
    fn ensure(&mut self, n: usize) {
        if self.region.tail() < n {
            let capacity = self.region.offset + self.region.length + n;
            self.buf.resize(capacity, 0);
            self.region.capacity = capacity;
        }
    }

    fn writable_tail(&mut self) -> &mut [u8] {
        let start = self.region.offset + self.region.length;
        assert!(
            start <= self.region.capacity,
            "byte storage region corrupt: offset {} + length {} > capacity {}",
            self.region.offset,
            self.region.length,
            self.region.capacity
        );
        &mut self.buf[start..]
    }

    fn append(&mut self, n: usize) {
        assert!(
            n <= self.region.tail(),
            "append of {n} bytes exceeds tail capacity {}",
            self.region.tail()
        );
        self.region.length += n;
    }

    fn trim(&mut self, n: usize) {
        assert!(
            n <= self.region.length,
            "trim of {n} bytes exceeds valid length {}",
            self.region.length
        );
        self.region.offset += n;
        self.region.length -= n;
    }

    fn data(&self) -> &[u8] {
        &self.buf[self.region.offset..self.region.offset + self.region.length]
    }

    fn len(&self) -> usize {
        self.region.length
    }

    fn tail(&self) -> usize {
        self.region.tail()
    }

    fn capacity(&self) -> usize {
        self.region.capacity
    }

    fn clear(&mut self) {
        self.region.offset = 0;
        self.region.length = 0;
    }
}

impl fmt::Debug for VectorByteStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorByteStorage")
            .field("offset", &self.region.offset)
            .field("length", &self.region.length)
            .field("capacity", &self.region.capacity)
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
