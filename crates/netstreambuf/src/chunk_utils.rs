//! Helpers for feeding payloads in pieces, shared by tests and benchmarks.

use alloc::vec::Vec;

/// Split `payload` into `parts` approximately equal-sized chunks, the way a
/// network layer hands over a body packet by packet.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    if payload.is_empty() {
        return Vec::new();
    }
    payload.chunks(payload.len().div_ceil(parts)).collect()
}

/// Split `payload` at the given cut points, in the style of a quickcheck
/// shrinkable partition. Every split value selects the length of the next
/// chunk modulo what is left, plus one.
#[must_use]
pub fn partition<'a>(payload: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(splits.len() + 1);
    let mut rest = payload;
    for s in splits {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(1 + s % rest.len());
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// A repeating run of ASCII digits of length `len`.
#[must_use]
pub fn digits(len: usize) -> Vec<u8> {
    (b'0'..=b'9').cycle().take(len).collect()
}
