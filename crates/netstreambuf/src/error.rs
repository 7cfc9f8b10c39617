use thiserror::Error;

use crate::SeekOrigin;

/// Failure signals of [`NetworkStreamBuf`](crate::NetworkStreamBuf) and the
/// stream adapter built on it.
///
/// None of these are fatal. The buffer state is left exactly as it was before
/// the failing call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamBufError {
    /// A write would push the buffer size past `max_size`.
    #[error("no room for {requested} bytes: buffer is capped at {max_size} bytes")]
    CapacityExceeded {
        /// Total size the write would have produced.
        requested: usize,
        /// Effective ceiling at the time of the write.
        max_size: usize,
    },
    /// A get-area seek resolved outside `[0, size]`.
    #[error("cannot seek get area by {offset} from {origin:?}: data size is {size}")]
    InvalidSeek {
        /// Offset passed by the caller.
        offset: i64,
        /// Origin the offset was relative to.
        origin: SeekOrigin,
        /// Number of readable bytes at the time of the call.
        size: usize,
    },
    /// The put area is append-only; only its current position can be queried.
    #[error("put area cannot move from {position} to {requested:?}")]
    PutSeekUnsupported {
        /// Position the seek resolved to, if it was representable.
        requested: Option<i64>,
        /// Current put position.
        position: usize,
    },
    /// A size setting exceeded its ceiling.
    #[error("size {value} exceeds the limit of {limit}")]
    SizeOutOfRange {
        /// Rejected value.
        value: usize,
        /// Ceiling it was checked against.
        limit: usize,
    },
    /// A new `max_size` would not hold the data already stored.
    #[error("max size {max_size} is below the {size} bytes already stored")]
    MaxSizeBelowContent {
        /// Rejected ceiling.
        max_size: usize,
        /// Current buffer size.
        size: usize,
    },
    /// A size increment exceeded `MAX_INCR`.
    #[error("size increment {value} exceeds the limit of {limit}")]
    IncrementOutOfRange {
        /// Rejected value.
        value: usize,
        /// Ceiling it was checked against.
        limit: usize,
    },
    /// Grow factors must be strictly greater than one.
    #[error("grow factor {0} must be greater than 1.0")]
    GrowFactorOutOfRange(f64),
    /// A stream is in its failed state and refuses further writes.
    #[error("stream is in a failed state")]
    StreamFailed,
}

#[cfg(feature = "std")]
impl From<StreamBufError> for std::io::Error {
    fn from(err: StreamBufError) -> Self {
        use std::io::ErrorKind;

        let kind = match err {
            StreamBufError::CapacityExceeded { .. } => ErrorKind::OutOfMemory,
            StreamBufError::InvalidSeek { .. }
            | StreamBufError::PutSeekUnsupported { .. }
            | StreamBufError::SizeOutOfRange { .. }
            | StreamBufError::MaxSizeBelowContent { .. }
            | StreamBufError::IncrementOutOfRange { .. }
            | StreamBufError::GrowFactorOutOfRange(_) => ErrorKind::InvalidInput,
            StreamBufError::StreamFailed => ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
