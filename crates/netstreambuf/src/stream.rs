//! `std::io` adapter over [`NetworkStreamBuf`].
//!
//! `NetworkStream` is meant as a drop-in sink/source for HTTP payloads. The
//! idea is to allocate nothing until the size of the resource is known: feed
//! response headers to [`NetworkStream::handle_header`] (or to the closure
//! from [`NetworkStream::header_callback`]) and a `Content-Length` header
//! becomes the desired size of the buffer, so a well-behaved server costs a
//! single allocation.
//!
//! Failure is sticky. Once a write is refused, or a `Content-Length` could not
//! be applied, the stream stays failed and rejects writes until
//! [`NetworkStream::clear_error`] is called. Reads and seeks are unaffected.

use alloc::vec::Vec;
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};

use bstr::BString;

use crate::{DEFAULT_GROW_FACTOR, NetworkStreamBuf, SeekOrigin, Storage, StreamBufError};

/// Readable, writable and seekable stream backed by a [`NetworkStreamBuf`].
///
/// `Write` appends to the put area, `Read`/`BufRead` consume the get area and
/// `Seek` moves the get cursor.
///
/// # Examples
///
/// ```rust
/// use std::io::{Read, Write};
///
/// use netstreambuf::NetworkVectorStream;
///
/// let mut stream = NetworkVectorStream::new(0, 4096);
/// stream.handle_header("Content-Length", "11");
/// stream.write_all(b"hello world").unwrap();
/// assert_eq!(stream.buf().capacity(), 11);
///
/// let mut body = String::new();
/// stream.read_to_string(&mut body).unwrap();
/// assert_eq!(body, "hello world");
/// ```
#[derive(Debug)]
pub struct NetworkStream<S: Storage> {
    buf: NetworkStreamBuf<S>,
    failure: Option<StreamBufError>,
}

/// [`NetworkStream`] backed by a byte string.
pub type NetworkStringStream = NetworkStream<BString>;

/// [`NetworkStream`] backed by a byte vector.
pub type NetworkVectorStream = NetworkStream<Vec<u8>>;

impl<S: Storage> NetworkStream<S> {
    /// Size increment installed together with a `Content-Length` size.
    ///
    /// With a correct header the buffer never needs to grow; the increment only
    /// matters for servers that send more than they announced.
    pub const SIZE_INCREMENT: usize = 4096;

    /// Create a stream whose buffer reserves `size_hint` bytes on first write,
    /// grows by [`DEFAULT_GROW_FACTOR`] and holds at most `max_length` bytes.
    ///
    /// Choose `max_length` close to the largest payload expected; it is the
    /// only protection against unbounded memory use.
    #[must_use]
    pub fn new(size_hint: usize, max_length: usize) -> Self {
        Self::from_buf(NetworkStreamBuf::with_grow_factor(
            size_hint,
            DEFAULT_GROW_FACTOR,
            max_length,
        ))
    }

    /// Wrap an already configured buffer.
    #[must_use]
    pub fn from_buf(buf: NetworkStreamBuf<S>) -> Self {
        Self { buf, failure: None }
    }

    /// The underlying buffer.
    #[must_use]
    pub fn buf(&self) -> &NetworkStreamBuf<S> {
        &self.buf
    }

    /// The underlying buffer, for changing its policy.
    pub fn buf_mut(&mut self) -> &mut NetworkStreamBuf<S> {
        &mut self.buf
    }

    /// The backing container of the buffer.
    #[must_use]
    pub fn storage(&self) -> &S {
        self.buf.storage()
    }

    /// Hand the backing container to the caller, leaving the buffer empty.
    #[must_use]
    pub fn take_storage(&mut self) -> S {
        self.buf.take_storage()
    }

    /// Consume the stream and return its buffer.
    #[must_use]
    pub fn into_inner(self) -> NetworkStreamBuf<S> {
        self.buf
    }

    /// Whether the stream is in its failed state.
    #[must_use]
    pub fn is_bad(&self) -> bool {
        self.failure.is_some()
    }

    /// The error that put the stream into its failed state.
    #[must_use]
    pub fn failure(&self) -> Option<&StreamBufError> {
        self.failure.as_ref()
    }

    /// Leave the failed state.
    pub fn clear_error(&mut self) {
        self.failure = None;
    }

    /// Position of the write cursor.
    #[must_use]
    pub fn tell_put(&self) -> u64 {
        self.buf.put_position() as u64
    }

    /// Confirm the write cursor; see [`NetworkStreamBuf::seek_put`].
    pub fn seek_put(&self, offset: i64, origin: SeekOrigin) -> io::Result<u64> {
        Ok(self.buf.seek_put(offset, origin)? as u64)
    }

    /// Move the storage, cursors and failure state into a new stream, leaving
    /// this one empty and healthy.
    ///
    /// The stream counterpart of [`NetworkStreamBuf::take`].
    #[must_use]
    pub fn take_stream(&mut self) -> Self {
        Self {
            buf: self.buf.take(),
            failure: self.failure.take(),
        }
    }

    /// Exchange the complete state of two streams.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Size the buffer from a response header.
    ///
    /// Only `Content-Length` (in any letter case) with a plain decimal value is
    /// acted on: it becomes the desired size and the size increment is set to
    /// [`SIZE_INCREMENT`](Self::SIZE_INCREMENT). If the buffer rejects the
    /// length, typically because it exceeds the maximum size, the stream
    /// enters its failed state. Other headers are ignored, and so is a
    /// `Content-Length` whose value is empty or not all ASCII digits; the
    /// buffer keeps its configured policy in that case.
    pub fn handle_header(&mut self, key: &str, value: &str) {
        if !is_content_length(key) {
            return;
        }
        let Some(length) = parse_decimal(value) else {
            tracing::debug!(value, "ignoring malformed content length");
            return;
        };
        let applied = self
            .buf
            .set_desired_size(length)
            .and_then(|()| self.buf.set_size_increment(Self::SIZE_INCREMENT));
        if let Err(err) = applied {
            tracing::debug!(length, %err, "content length does not fit the stream");
            self.failure = Some(err);
        }
    }

    /// Closure feeding headers into [`handle_header`](Self::handle_header).
    pub fn header_callback(&mut self) -> impl FnMut(&str, &str) + '_ {
        move |key, value| self.handle_header(key, value)
    }

    /// Like [`header_callback`](Self::header_callback), additionally passing
    /// every header on to `chain`.
    pub fn header_callback_chained<'a, F>(&'a mut self, mut chain: F) -> impl FnMut(&str, &str) + 'a
    where
        F: FnMut(&str, &str) + 'a,
    {
        move |key, value| {
            self.handle_header(key, value);
            chain(key, value);
        }
    }
}

impl<S: Storage> Write for NetworkStream<S> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.failure.is_some() {
            return Err(StreamBufError::StreamFailed.into());
        }
        match self.buf.put_slice(data) {
            Ok(written) => Ok(written),
            Err(err) => {
                tracing::debug!(%err, "stream write refused");
                self.failure = Some(err.clone());
                Err(err.into())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Storage> Read for NetworkStream<S> {
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        Ok(self.buf.get_slice(dst))
    }
}

impl<S: Storage> BufRead for NetworkStream<S> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.buf.remaining())
    }

    fn consume(&mut self, amt: usize) {
        self.buf.consume(amt);
    }
}

impl<S: Storage> Seek for NetworkStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (offset, origin) = match pos {
            SeekFrom::Start(offset) => (
                i64::try_from(offset).map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?,
                SeekOrigin::Begin,
            ),
            SeekFrom::Current(offset) => (offset, SeekOrigin::Current),
            SeekFrom::End(offset) => (offset, SeekOrigin::End),
        };
        Ok(self.buf.seek_get(offset, origin)? as u64)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.buf.get_position() as u64)
    }
}

fn is_content_length(key: &str) -> bool {
    key.eq_ignore_ascii_case("content-length")
}

/// Digits only: no sign, no whitespace, no overflow.
fn parse_decimal(value: &str) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    value.bytes().try_fold(0usize, |acc, b| {
        let digit = char::from(b).to_digit(10)?;
        acc.checked_mul(10)?.checked_add(digit as usize)
    })
}
