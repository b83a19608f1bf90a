//! Saturating sum of squares over signed 16-bit vectors.

/// Upper bound of a result (2^15 - 1).
pub const RESULT_MAX: i16 = i16::MAX;

/// Lower bound of a result (-2^15).
pub const RESULT_MIN: i16 = i16::MIN;

/// Compute the sum of squares of `values`, saturated to the `i16` range.
///
/// The running sum is kept in 64 bits. After each term the sum is checked
/// against both bounds and the function returns the bound as soon as one is
/// crossed, without looking at the remaining elements. Every term is a
/// square, so only the upper bound is reachable; the lower check stays so
/// the contract is symmetric.
pub fn sum_of_squares(values: &[i16]) -> i16 {
    let mut acc = SquareSum::new();
    acc.extend_from_slice(values);
    acc.finish()
}

/// Running form of [`sum_of_squares`] for elements that arrive in pieces.
///
/// Once a bound is crossed the result is fixed and later elements are
/// ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquareSum {
    sum: i64,
    saturated: Option<i16>,
}

impl SquareSum {
    /// Start from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one element.
    pub fn push(&mut self, value: i16) {
        if self.saturated.is_some() {
            return;
        }

        let value = i64::from(value);
        self.sum += value * value;

        if self.sum > i64::from(RESULT_MAX) {
            self.saturated = Some(RESULT_MAX);
        } else if self.sum < i64::from(RESULT_MIN) {
            self.saturated = Some(RESULT_MIN);
        }
    }

    /// Add a run of elements.
    pub fn extend_from_slice(&mut self, values: &[i16]) {
        for &value in values {
            if self.saturated.is_some() {
                break;
            }
            self.push(value);
        }
    }

    /// Whether a bound has been crossed.
    pub fn is_saturated(&self) -> bool {
        self.saturated.is_some()
    }

    /// The saturated result.
    pub fn finish(self) -> i16 {
        // In range unless saturated: both bounds were checked after every term.
        self.saturated.unwrap_or(self.sum as i16)
    }
}
