//! Bounded, growable in-memory stream buffers for network clients.
//!
//! [`NetworkStreamBuf`] collects outgoing request bodies and incoming response
//! payloads into a higher level container (a byte string or a byte vector)
//! instead of raw memory, so the finished payload can be handed to its
//! consumer without a copy. Allocation is deferred until the first write and
//! bounded by a maximum size; growth follows a fixed increment or a
//! multiplicative factor.
//!
//! With the `std` feature (on by default), [`NetworkStream`] layers
//! `std::io::{Read, Write, BufRead, Seek}` over a buffer and sizes it from a
//! `Content-Length` response header.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod growth;
mod options;
mod storage;
mod stream_buf;

#[cfg(feature = "std")]
mod stream;

#[cfg(test)]
mod tests;

pub use error::StreamBufError;
pub use options::{Growth, StreamBufOptions};
pub use storage::Storage;
#[cfg(feature = "std")]
pub use stream::{NetworkStream, NetworkStringStream, NetworkVectorStream};
pub use stream_buf::{NetworkStreamBuf, NetworkStringBuf, NetworkVectorBuf, SeekOrigin};

/// Largest size any buffer may reach (`INT_MAX`, 2 GiB - 1).
pub const MAX_SIZE: usize = 0x7FFF_FFFF;

/// Largest fixed growth step.
pub const MAX_INCR: usize = 10 * 1024 * 1024;

/// Grow factor used by [`NetworkStream::new`] and [`StreamBufOptions::default`].
pub const DEFAULT_GROW_FACTOR: f64 = 1.5;

#[doc(hidden)]
pub mod chunk_utils;
