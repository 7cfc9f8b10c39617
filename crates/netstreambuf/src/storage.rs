use alloc::vec::Vec;

use bstr::BString;

/// Contiguous, owned byte container backing a
/// [`NetworkStreamBuf`](crate::NetworkStreamBuf).
///
/// The buffer only ever appends to its storage and asks it to reserve room
/// ahead of time, so the capability set is small. `Default` must produce an
/// empty container; it is what remains behind after storage extraction.
pub trait Storage: Default {
    /// Number of bytes stored.
    fn len(&self) -> usize;

    /// Whether no bytes are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes the current allocation can hold without reallocating.
    fn capacity(&self) -> usize;

    /// Make sure the allocation can hold at least `capacity` bytes in total.
    ///
    /// Implementations may over-allocate, never under-allocate.
    fn reserve_total(&mut self, capacity: usize);

    /// Append `bytes` after the stored data.
    fn extend_from_slice(&mut self, bytes: &[u8]);

    /// View of the stored bytes.
    fn as_bytes(&self) -> &[u8];
}

/// Plain byte vector. Reservations are exact, so capacity starts at zero and
/// only changes when the buffer grows it.
impl Storage for Vec<u8> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn reserve_total(&mut self, capacity: usize) {
        if let Some(additional) = capacity.checked_sub(Vec::len(self)) {
            self.reserve_exact(additional);
        }
    }

    #[inline]
    fn extend_from_slice(&mut self, bytes: &[u8]) {
        Vec::extend_from_slice(self, bytes);
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

/// Byte string. Reservations are rounded up by the amortized growth of the
/// allocator, so capacity may exceed what the buffer asked for.
impl Storage for BString {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        Vec::capacity(self)
    }

    fn reserve_total(&mut self, capacity: usize) {
        if let Some(additional) = capacity.checked_sub(Vec::len(self)) {
            Vec::reserve(self, additional);
        }
    }

    #[inline]
    fn extend_from_slice(&mut self, bytes: &[u8]) {
        Vec::extend_from_slice(self, bytes);
    }

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        self
    }
}
