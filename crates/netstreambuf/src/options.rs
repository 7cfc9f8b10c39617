/// How a buffer expands once a write no longer fits its capacity.
///
/// The two policies are mutually exclusive; a buffer always carries exactly
/// one of them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(rename_all = "snake_case"))]
pub enum Growth {
    /// Grow capacity in fixed steps of this many bytes.
    ///
    /// Values above [`MAX_INCR`](crate::MAX_INCR) are clamped when a buffer is
    /// built from them. `0` grows exactly to the size a write needs.
    Increment(usize),

    /// Multiply capacity by this ratio until the pending write fits.
    ///
    /// Must be greater than `1.0` to make progress. Smaller ratios fall back to
    /// growing exactly to the size a write needs.
    Factor(f64),
}

impl Default for Growth {
    fn default() -> Self {
        Growth::Factor(crate::DEFAULT_GROW_FACTOR)
    }
}

/// Buffering policy for a [`NetworkStreamBuf`](crate::NetworkStreamBuf).
///
/// Callers configuring network buffering usually derive these from expected
/// payload sizes, e.g. "start at 1 KiB, double on overflow, cap at 10 MiB".
///
/// # Examples
///
/// ```rust
/// use netstreambuf::{Growth, NetworkVectorBuf, StreamBufOptions};
///
/// let options = StreamBufOptions {
///     desired_size: 64 * 1024,
///     growth: Growth::Increment(4096),
///     ..Default::default()
/// };
/// let buf = NetworkVectorBuf::from_options(&options);
/// assert_eq!(buf.size_increment(), 4096);
/// ```
///
/// # Default
///
/// 1 KiB desired size, grow factor `1.5`, 10 MiB maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(default))]
pub struct StreamBufOptions {
    /// Capacity reserved by the first write.
    ///
    /// Nothing is allocated before data arrives. Clamped to `max_size`.
    ///
    /// # Default
    ///
    /// `1024`
    pub desired_size: usize,

    /// Expansion policy once the first allocation is exhausted.
    ///
    /// # Default
    ///
    /// `Growth::Factor(1.5)`
    pub growth: Growth,

    /// Hard ceiling on the amount of buffered data.
    ///
    /// Pick something close to the largest payload you expect; the buffer
    /// refuses writes past it. Clamped to [`MAX_SIZE`](crate::MAX_SIZE).
    ///
    /// # Default
    ///
    /// `10 * 1024 * 1024`
    pub max_size: usize,
}

impl Default for StreamBufOptions {
    fn default() -> Self {
        Self {
            desired_size: 1024,
            growth: Growth::default(),
            max_size: 10 * 1024 * 1024,
        }
    }
}
