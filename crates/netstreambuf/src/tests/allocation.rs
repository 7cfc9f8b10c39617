use alloc::vec::Vec;

use bstr::BString;

use super::S32;
use crate::{NetworkStreamBuf, NetworkStringBuf, NetworkVectorBuf, Storage, StreamBufError};

/// Write `S32` until the buffer refuses, checking sizes along the way.
/// Returns the capacity reached before the refusal.
fn fill_until_full<S: Storage>(buf: &mut NetworkStreamBuf<S>) -> usize {
    for round in 1..=4 {
        assert_eq!(buf.put_slice(S32), Ok(32));
        assert_eq!(buf.size(), 32 * round);
        assert!(buf.capacity() >= buf.size());
        assert_eq!(buf.storage().capacity(), buf.capacity());
    }
    let capacity = buf.capacity();
    assert_eq!(
        buf.put_slice(S32),
        Err(StreamBufError::CapacityExceeded {
            requested: 160,
            max_size: 128
        })
    );
    assert_eq!(buf.size(), 128);
    assert_eq!(buf.capacity(), capacity);
    capacity
}

#[test]
fn string_buf_allocation_increment() {
    let mut sbuf = NetworkStringBuf::with_increment(64, 32, 128);
    assert_eq!(sbuf.put_slice(S32), Ok(32));
    // byte strings may allocate more than requested
    assert!(sbuf.capacity() >= 64);
    let mut sbuf = NetworkStringBuf::with_increment(64, 32, 128);
    assert!(fill_until_full(&mut sbuf) >= 128);
}

#[test]
fn string_buf_allocation_factor() {
    let mut sbuf = NetworkStringBuf::with_grow_factor(64, 2.0, 128);
    assert!(fill_until_full(&mut sbuf) >= 128);
    assert_eq!(sbuf.as_bytes()[96..], S32[..]);
}

#[test]
fn vector_buf_allocation_increment() {
    let mut vbuf = NetworkVectorBuf::with_increment(64, 32, 128);
    let mut capacities = [0; 4];
    for slot in &mut capacities {
        assert_eq!(vbuf.put_slice(S32), Ok(32));
        *slot = vbuf.capacity();
    }
    assert_eq!(capacities, [64, 64, 96, 128]);
    assert!(vbuf.put_slice(S32).is_err());
    assert_eq!(vbuf.size(), 128);
    assert_eq!(vbuf.capacity(), 128);
}

#[test]
fn vector_buf_allocation_factor() {
    let mut vbuf = NetworkVectorBuf::with_grow_factor(64, 2.0, 128);
    let mut capacities = [0; 4];
    for slot in &mut capacities {
        assert_eq!(vbuf.put_slice(S32), Ok(32));
        *slot = vbuf.capacity();
    }
    assert_eq!(capacities, [64, 64, 128, 128]);
    assert!(vbuf.put_slice(S32).is_err());
    assert_eq!(vbuf.size(), 128);
    assert_eq!(vbuf.capacity(), 128);
}

#[test]
fn vector_buf_fill_until_full() {
    let mut vbuf = NetworkVectorBuf::with_increment(64, 32, 128);
    assert_eq!(fill_until_full(&mut vbuf), 128);
}

#[test]
fn first_write_larger_than_desired_size() {
    let mut vbuf = NetworkVectorBuf::with_increment(16, 8, 128);
    assert_eq!(vbuf.put_slice(S32), Ok(32));
    assert_eq!(vbuf.capacity(), 32);
    vbuf.put_byte(b'x').unwrap();
    assert_eq!(vbuf.capacity(), 40);
}

#[test]
fn growth_never_exceeds_max_size() {
    let mut vbuf = NetworkVectorBuf::with_grow_factor(64, 2.0, 100);
    vbuf.put_slice(S32).unwrap();
    vbuf.put_slice(S32).unwrap();
    vbuf.put_byte(b'x').unwrap();
    assert_eq!(vbuf.capacity(), 100);
}

#[test]
fn bulk_write_is_all_or_nothing() {
    let mut vbuf = NetworkVectorBuf::with_increment(16, 16, 40);
    vbuf.put_slice(S32).unwrap();
    assert!(vbuf.put_slice(&S32[..9]).is_err());
    assert_eq!(vbuf.size(), 32);
    assert_eq!(vbuf.put_slice(&S32[..8]), Ok(8));
    assert_eq!(vbuf.size(), 40);
    assert!(vbuf.put_byte(b'0').is_err());
    assert_eq!(vbuf.as_bytes()[32..], S32[..8]);
}

#[test]
fn empty_write_is_a_no_op() {
    let mut vbuf = NetworkVectorBuf::with_increment(16, 16, 0);
    assert_eq!(vbuf.put_slice(&[]), Ok(0));
    assert_eq!(vbuf.capacity(), 0);
    assert!(vbuf.put_byte(b'0').is_err());
}

#[test]
fn reserve_presizes_storage() {
    let mut vbuf = NetworkVectorBuf::with_increment(0, 4096, 1 << 20);
    vbuf.reserve(1000).unwrap();
    assert_eq!(vbuf.capacity(), 1000);
    assert!(vbuf.is_empty());
    assert!(vbuf.reserve((1 << 20) + 1).is_err());
    assert_eq!(vbuf.capacity(), 1000);
}

#[test]
fn byte_string_storage_keeps_bytes_verbatim() {
    let mut sbuf = NetworkStringBuf::with_increment(4, 4, 16);
    sbuf.put_slice(&[0xff, 0x00, 0xfe]).unwrap();
    let stored: BString = sbuf.take_storage();
    let stored: Vec<u8> = stored.into();
    assert_eq!(stored, [0xffu8, 0x00, 0xfe]);
}

#[test]
fn factor_close_to_one_grows_just_past_the_write() {
    let mut vbuf = NetworkVectorBuf::with_grow_factor(64, 2.0, 1 << 20);
    assert_eq!(vbuf.set_grow_factor(1.0 + 1e-12), Ok(()));
    assert_eq!(vbuf.put_slice(&[0; 64]), Ok(64));
    assert_eq!(vbuf.capacity(), 64);
    assert_eq!(vbuf.put_slice(&[0; 1000]), Ok(1000));
    assert!(vbuf.capacity() >= 1064);
    assert!(vbuf.capacity() < 1100);
}
