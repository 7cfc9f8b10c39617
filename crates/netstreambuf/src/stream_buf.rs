//! Bounded, growable in-memory stream buffer.
//!
//! Overview
//! - `NetworkStreamBuf<S>` owns a contiguous container `S` (see [`Storage`])
//!   and exposes it as a byte stream with two cursors:
//!   - the **put** cursor, which is always the end of stored data. Writes only
//!     append; the put cursor can be queried but never moved.
//!   - the **get** cursor, which may be positioned anywhere in `[0, size]` and
//!     advances as bytes are read.
//! - Nothing is allocated at construction. The first write reserves
//!   `desired_size` bytes (or more, if the write is larger), later writes grow
//!   the allocation by a fixed increment or a multiplicative factor.
//! - `max_size` is a hard ceiling on the stored data. A write that does not
//!   fit below it is refused as a whole and leaves the buffer untouched.
//!
//! Invariants
//! - `get_position <= size <= max_size` after every successful call.
//! - `size <= capacity`; capacity may exceed `max_size` only when the storage
//!   over-allocates on its own.
//! - At most one of `size_increment` and `grow_factor` is in effect; setting
//!   one clears the other.
//!
//! The buffer is not synchronized. It is meant to be driven by one request or
//! response at a time; sharing it across threads requires outside locking.

use core::mem;

use bstr::BString;

use crate::{
    MAX_INCR, MAX_SIZE, Storage, StreamBufError,
    growth::{GrowthState, Reservation},
    options::{Growth, StreamBufOptions},
};

/// Reference point of a seek offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekOrigin {
    /// Offset counts from the start of the stored data.
    Begin,
    /// Offset counts from the cursor being moved.
    Current,
    /// Offset counts from the end of the stored data.
    End,
}

/// A growable byte stream buffer with a hard size ceiling.
///
/// `S` selects the backing container: [`NetworkStringBuf`] stores into a
/// [`BString`], [`NetworkVectorBuf`] into a `Vec<u8>`. Both share every rule
/// below; they differ only in how generously the container allocates.
///
/// # Examples
///
/// ```rust
/// use netstreambuf::{NetworkVectorBuf, SeekOrigin};
///
/// // start at 64 bytes, double on overflow, never exceed 128 bytes
/// let mut buf = NetworkVectorBuf::with_grow_factor(64, 2.0, 128);
/// assert_eq!(buf.put_slice(b"hello world"), Ok(11));
/// assert_eq!(buf.capacity(), 64);
///
/// buf.seek_get(6, SeekOrigin::Begin).unwrap();
/// let mut word = [0u8; 5];
/// assert_eq!(buf.get_slice(&mut word), 5);
/// assert_eq!(&word, b"world");
///
/// let body: Vec<u8> = buf.take_storage();
/// assert_eq!(body, b"hello world");
/// ```
#[derive(Debug)]
pub struct NetworkStreamBuf<S: Storage> {
    storage: S,
    desired_size: usize,
    size_increment: usize,
    grow_factor: f64,
    max_size: usize,
    get_pos: usize,
}

/// [`NetworkStreamBuf`] backed by a byte string.
pub type NetworkStringBuf = NetworkStreamBuf<BString>;

/// [`NetworkStreamBuf`] backed by a byte vector.
pub type NetworkVectorBuf = NetworkStreamBuf<alloc::vec::Vec<u8>>;

// ------------------------------------------------------------------------------------------------
// Construction
// ------------------------------------------------------------------------------------------------

impl<S: Storage> NetworkStreamBuf<S> {
    /// Build a buffer that grows in steps of `size_increment` bytes.
    ///
    /// `max_size` is clamped to [`MAX_SIZE`], `size_increment` to [`MAX_INCR`]
    /// and `desired_size` to the resulting `max_size`.
    #[must_use]
    pub fn with_increment(desired_size: usize, size_increment: usize, max_size: usize) -> Self {
        Self::build(desired_size, size_increment.min(MAX_INCR), 0.0, max_size)
    }

    /// Build a buffer that multiplies its capacity by `grow_factor`.
    ///
    /// `max_size` is clamped to [`MAX_SIZE`] and `desired_size` to the
    /// resulting `max_size`. A factor of `1.0` or less is kept as given but
    /// makes every growth step exactly as large as the pending write.
    #[must_use]
    pub fn with_grow_factor(desired_size: usize, grow_factor: f64, max_size: usize) -> Self {
        Self::build(desired_size, 0, grow_factor, max_size)
    }

    /// Build a buffer from an options struct.
    #[must_use]
    pub fn from_options(options: &StreamBufOptions) -> Self {
        match options.growth {
            Growth::Increment(incr) => {
                Self::with_increment(options.desired_size, incr, options.max_size)
            }
            Growth::Factor(factor) => {
                Self::with_grow_factor(options.desired_size, factor, options.max_size)
            }
        }
    }

    fn build(
        desired_size: usize,
        size_increment: usize,
        grow_factor: f64,
        max_size: usize,
    ) -> Self {
        let max_size = max_size.min(MAX_SIZE);
        Self {
            storage: S::default(),
            desired_size: desired_size.min(max_size),
            size_increment,
            grow_factor,
            max_size,
            get_pos: 0,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Policy accessors and setters
// ------------------------------------------------------------------------------------------------

impl<S: Storage> NetworkStreamBuf<S> {
    /// Capacity reserved by the first write.
    #[must_use]
    pub fn desired_size(&self) -> usize {
        self.desired_size
    }

    /// Fixed growth step, `0` when factor growth is active.
    #[must_use]
    pub fn size_increment(&self) -> usize {
        self.size_increment
    }

    /// Growth ratio, `0.0` when increment growth is active.
    #[must_use]
    pub fn grow_factor(&self) -> f64 {
        self.grow_factor
    }

    /// Ceiling on the stored data.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// The active growth policy.
    ///
    /// A buffer built or set with a zero increment, and no factor, reports
    /// `Growth::Increment(0)`: every growth step is exactly as large as the
    /// pending write.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn growth(&self) -> Growth {
        if self.size_increment > 0 || self.grow_factor == 0.0 {
            Growth::Increment(self.size_increment)
        } else {
            Growth::Factor(self.grow_factor)
        }
    }

    /// Set the capacity the first write reserves.
    ///
    /// Fails without changes if `desired_size` exceeds the current `max_size`.
    pub fn set_desired_size(&mut self, desired_size: usize) -> Result<(), StreamBufError> {
        if desired_size > self.max_size {
            tracing::debug!(desired_size, max_size = self.max_size, "rejected desired size");
            return Err(StreamBufError::SizeOutOfRange {
                value: desired_size,
                limit: self.max_size,
            });
        }
        self.desired_size = desired_size;
        Ok(())
    }

    /// Switch to increment growth with the given step; clears the grow factor.
    ///
    /// Fails without changes if `size_increment` exceeds [`MAX_INCR`].
    pub fn set_size_increment(&mut self, size_increment: usize) -> Result<(), StreamBufError> {
        if size_increment > MAX_INCR {
            tracing::debug!(size_increment, "rejected size increment");
            return Err(StreamBufError::IncrementOutOfRange {
                value: size_increment,
                limit: MAX_INCR,
            });
        }
        self.size_increment = size_increment;
        self.grow_factor = 0.0;
        Ok(())
    }

    /// Switch to factor growth with the given ratio; clears the size increment.
    ///
    /// Fails without changes unless `grow_factor > 1.0`.
    pub fn set_grow_factor(&mut self, grow_factor: f64) -> Result<(), StreamBufError> {
        if grow_factor.is_nan() || grow_factor <= 1.0 {
            tracing::debug!(grow_factor, "rejected grow factor");
            return Err(StreamBufError::GrowFactorOutOfRange(grow_factor));
        }
        self.grow_factor = grow_factor;
        self.size_increment = 0;
        Ok(())
    }

    /// Set the ceiling on stored data.
    ///
    /// Fails without changes if `max_size` exceeds [`MAX_SIZE`] or is smaller
    /// than the current size. A desired size above the new ceiling is lowered
    /// to it.
    pub fn set_max_size(&mut self, max_size: usize) -> Result<(), StreamBufError> {
        if max_size > MAX_SIZE {
            tracing::debug!(max_size, "rejected max size");
            return Err(StreamBufError::SizeOutOfRange {
                value: max_size,
                limit: MAX_SIZE,
            });
        }
        if max_size < self.storage.len() {
            tracing::debug!(max_size, size = self.storage.len(), "rejected max size");
            return Err(StreamBufError::MaxSizeBelowContent {
                max_size,
                size: self.storage.len(),
            });
        }
        self.desired_size = self.desired_size.min(max_size);
        self.max_size = max_size;
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// Storage introspection
// ------------------------------------------------------------------------------------------------

impl<S: Storage> NetworkStreamBuf<S> {
    /// Number of bytes written so far.
    #[must_use]
    pub fn size(&self) -> usize {
        self.storage.len()
    }

    /// Alias of [`size`](Self::size).
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Bytes the backing storage can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// The backing container.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// All bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.as_bytes()
    }

    /// Address of the backing allocation.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.storage.as_bytes().as_ptr()
    }

    /// Position of the write cursor; always equal to [`size`](Self::size).
    #[must_use]
    pub fn put_position(&self) -> usize {
        self.storage.len()
    }

    /// Position of the read cursor.
    #[must_use]
    pub fn get_position(&self) -> usize {
        self.get_pos
    }

    /// Bytes readable from the get cursor before end of data.
    #[must_use]
    pub fn available(&self) -> usize {
        self.storage.len() - self.get_pos
    }

    /// Whether cursor and size bounds hold: `get <= size <= max_size` and
    /// `size <= capacity`.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.get_pos <= self.storage.len()
            && self.storage.len() <= self.max_size
            && self.storage.len() <= self.storage.capacity()
            && self.max_size <= crate::MAX_SIZE
    }

    fn growth_state(&self) -> GrowthState {
        GrowthState {
            size: self.storage.len(),
            capacity: self.storage.capacity(),
            desired_size: self.desired_size,
            size_increment: self.size_increment,
            grow_factor: self.grow_factor,
            max_size: self.max_size,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Put area
// ------------------------------------------------------------------------------------------------

impl<S: Storage> NetworkStreamBuf<S> {
    /// Make room for `additional` more bytes according to the growth policy.
    ///
    /// Writes call this implicitly; calling it up front lets a caller size the
    /// buffer once, e.g. after learning a payload length.
    pub fn reserve(&mut self, additional: usize) -> Result<(), StreamBufError> {
        match self.growth_state().plan(additional) {
            Ok(Reservation::Fits) => Ok(()),
            Ok(Reservation::Grow(target)) => {
                tracing::trace!(
                    size = self.storage.len(),
                    capacity = self.storage.capacity(),
                    target,
                    "growing stream buffer"
                );
                self.storage.reserve_total(target);
                Ok(())
            }
            Err(err) => {
                tracing::trace!(
                    size = self.storage.len(),
                    additional,
                    max_size = self.max_size,
                    "stream buffer is full"
                );
                Err(err)
            }
        }
    }

    /// Append one byte.
    pub fn put_byte(&mut self, byte: u8) -> Result<(), StreamBufError> {
        self.put_slice(&[byte]).map(drop)
    }

    /// Append `bytes` as a whole.
    ///
    /// Either every byte is written and `Ok(bytes.len())` returned, or the
    /// buffer is left unchanged and [`StreamBufError::CapacityExceeded`]
    /// returned. There are no partial writes.
    pub fn put_slice(&mut self, bytes: &[u8]) -> Result<usize, StreamBufError> {
        if bytes.is_empty() {
            return Ok(0);
        }
        self.reserve(bytes.len())?;
        self.storage.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Query the put cursor.
    ///
    /// The put area cannot be repositioned. A request that resolves to the
    /// current position (e.g. `(0, Current)`, `(0, End)` or `(size, Begin)`)
    /// returns it; anything else fails.
    pub fn seek_put(&self, offset: i64, origin: SeekOrigin) -> Result<usize, StreamBufError> {
        let position = self.storage.len();
        let requested = resolve(offset, origin, position, position);
        match requested.and_then(|p| usize::try_from(p).ok()) {
            Some(p) if p == position => Ok(position),
            _ => {
                tracing::trace!(offset, ?origin, position, "rejected put seek");
                Err(StreamBufError::PutSeekUnsupported {
                    requested,
                    position,
                })
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// Get area
// ------------------------------------------------------------------------------------------------

impl<S: Storage> NetworkStreamBuf<S> {
    /// Read the byte under the get cursor and advance it.
    ///
    /// Returns `None` at end of data. Bytes written later become readable
    /// without re-seeking.
    pub fn get_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.get_pos += 1;
        Some(byte)
    }

    /// Read the byte under the get cursor without advancing it.
    #[must_use]
    pub fn peek_byte(&self) -> Option<u8> {
        self.storage.as_bytes().get(self.get_pos).copied()
    }

    /// Step the get cursor back one byte and return the byte now under it.
    ///
    /// Returns `None` when the cursor is already at the start. Only the read
    /// cursor moves; stored data is never removed.
    pub fn unget_byte(&mut self) -> Option<u8> {
        self.get_pos = self.get_pos.checked_sub(1)?;
        self.peek_byte()
    }

    /// Copy up to `dst.len()` bytes from the get cursor into `dst`.
    ///
    /// Returns the number of bytes copied, `0` at end of data.
    pub fn get_slice(&mut self, dst: &mut [u8]) -> usize {
        let src = &self.storage.as_bytes()[self.get_pos..];
        let count = dst.len().min(src.len());
        dst[..count].copy_from_slice(&src[..count]);
        self.get_pos += count;
        count
    }

    /// The bytes between the get cursor and end of data.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.storage.as_bytes()[self.get_pos..]
    }

    /// Advance the get cursor by up to `count` bytes; returns how far it moved.
    pub fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.available());
        self.get_pos += count;
        count
    }

    /// Move the get cursor.
    ///
    /// The target must lie in `[0, size]`: seeking to exactly end of data is
    /// allowed, past it is not. On failure the cursor stays where it was.
    pub fn seek_get(&mut self, offset: i64, origin: SeekOrigin) -> Result<usize, StreamBufError> {
        let size = self.storage.len();
        match resolve(offset, origin, self.get_pos, size)
            .and_then(|p| usize::try_from(p).ok())
            .filter(|p| *p <= size)
        {
            Some(position) => {
                self.get_pos = position;
                Ok(position)
            }
            None => {
                tracing::trace!(offset, ?origin, size, "rejected get seek");
                Err(StreamBufError::InvalidSeek {
                    offset,
                    origin,
                    size,
                })
            }
        }
    }

    /// Move the get cursor to an absolute position.
    pub fn seek_to_absolute_position(&mut self, position: i64) -> Result<usize, StreamBufError> {
        self.seek_get(position, SeekOrigin::Begin)
    }
}

/// Resolve `offset` against `origin`; `None` if the sum is not representable.
fn resolve(offset: i64, origin: SeekOrigin, current: usize, end: usize) -> Option<i64> {
    let base = match origin {
        SeekOrigin::Begin => 0,
        SeekOrigin::Current => i64::try_from(current).ok()?,
        SeekOrigin::End => i64::try_from(end).ok()?,
    };
    base.checked_add(offset)
}

// ------------------------------------------------------------------------------------------------
// Ownership transfer
// ------------------------------------------------------------------------------------------------

impl<S: Storage> NetworkStreamBuf<S> {
    /// Move the storage, cursors and policy into a new buffer.
    ///
    /// `self` keeps its policy but is left empty with a fresh, unallocated
    /// container. The allocation itself is handed over, not copied.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            storage: mem::take(&mut self.storage),
            desired_size: self.desired_size,
            size_increment: self.size_increment,
            grow_factor: self.grow_factor,
            max_size: self.max_size,
            get_pos: mem::take(&mut self.get_pos),
        }
    }

    /// Exchange the complete state of two buffers.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Hand the backing container to the caller.
    ///
    /// The buffer is reset to an empty container with both cursors at `0`; its
    /// policy is unchanged, so it can be reused.
    #[must_use]
    pub fn take_storage(&mut self) -> S {
        self.get_pos = 0;
        mem::take(&mut self.storage)
    }

    /// Consume the buffer and return its backing container.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }
}
