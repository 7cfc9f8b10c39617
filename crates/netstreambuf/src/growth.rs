//! Capacity policy engine.
//!
//! Decides, for a write of `additional` bytes, which total capacity the
//! backing storage should be grown to. The decision is a pure function of the
//! buffer's policy fields and its current size and capacity, so it is kept
//! apart from the buffer type and tested on its own.
//!
//! Rules, applied in order:
//! 1. `size + additional` must not exceed `max_size`, otherwise the write is
//!    refused and nothing is reserved.
//! 2. If the data fits the current capacity, no growth is needed.
//! 3. On the first write (`size == 0`) the target is
//!    `max(desired_size, size + additional)`.
//! 4. Otherwise capacity grows by whole increments, or is multiplied by the
//!    grow factor, until the write fits.
//! 5. The target is clamped to `max_size`; rule 1 guarantees the clamped
//!    target still holds the write.
//!
//! Arithmetic never wraps: increments use checked integer math and factors
//! saturate in floating point before being clamped. The number of factor steps
//! is found by binary lifting over squared powers, so the work per write is
//! bounded no matter how close the factor is to `1.0`.

use crate::StreamBufError;

/// Snapshot of everything the policy looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GrowthState {
    pub(crate) size: usize,
    pub(crate) capacity: usize,
    pub(crate) desired_size: usize,
    pub(crate) size_increment: usize,
    pub(crate) grow_factor: f64,
    pub(crate) max_size: usize,
}

/// Outcome of a capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reservation {
    /// Current capacity already holds the write.
    Fits,
    /// Storage must be grown to this total capacity.
    Grow(usize),
}

impl GrowthState {
    /// Plan room for `additional` more bytes.
    pub(crate) fn plan(&self, additional: usize) -> Result<Reservation, StreamBufError> {
        let needed = self
            .size
            .checked_add(additional)
            .filter(|needed| *needed <= self.max_size)
            .ok_or(StreamBufError::CapacityExceeded {
                requested: self.size.saturating_add(additional),
                max_size: self.max_size,
            })?;

        if needed <= self.capacity {
            return Ok(Reservation::Fits);
        }

        let target = if self.size == 0 {
            self.desired_size.max(needed)
        } else if self.size_increment > 0 {
            self.grow_by_increment(needed)
        } else {
            self.grow_by_factor(needed)
        };

        Ok(Reservation::Grow(target.min(self.max_size).max(needed)))
    }

    fn grow_by_increment(&self, needed: usize) -> usize {
        let shortfall = needed - self.capacity;
        let steps = shortfall.div_ceil(self.size_increment);
        steps
            .checked_mul(self.size_increment)
            .and_then(|grow| self.capacity.checked_add(grow))
            .unwrap_or(usize::MAX)
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn grow_by_factor(&self, needed: usize) -> usize {
        // A factor that cannot grow anything degrades to an exact fit.
        if self.grow_factor.is_nan() || self.grow_factor <= 1.0 || self.capacity == 0 {
            return needed;
        }

        let capacity = self.capacity as f64;
        let needed_f = needed as f64;

        // `squares[i]` is `grow_factor^(2^i)`; stop at the first power that fits.
        let mut squares = [0.0_f64; SQUARINGS];
        let mut power = self.grow_factor;
        let mut count = 0;
        while capacity * power < needed_f {
            if count == SQUARINGS {
                return needed;
            }
            squares[count] = power;
            power *= power;
            count += 1;
        }

        // Largest `k` with `capacity * grow_factor^k < needed`, by binary lifting.
        let mut below = 1.0;
        for square in squares[..count].iter().rev() {
            if capacity * below * square < needed_f {
                below *= square;
            }
        }
        // `as` saturates on out-of-range floats.
        (capacity * below * self.grow_factor).min(self.max_size as f64) as usize
    }
}

/// Bound on repeated squaring of the grow factor. Any factor above `1.0` has
/// overflowed to infinity well before this many squarings.
const SQUARINGS: usize = 64;
