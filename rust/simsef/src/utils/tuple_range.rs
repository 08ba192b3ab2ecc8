use serde::{
    Deserialize,
    Serialize,
};
use std::ops::Sub;
use thiserror::Error;

/// Closed-closed [a, b] range stored as a tuple.
///
/// Construction guarantees that `a <= b`, so every range that makes it into
/// the scheduler (mobility windows, isolation windows, instrument bounds)
/// is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(T, T)", into = "(T, T)")]
pub struct TupleRange<T: Copy + PartialOrd + std::fmt::Debug>(T, T);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TupleRangeError<T: Copy + PartialOrd + std::fmt::Debug> {
    #[error(
        "Expected the first element to be less than or equal to the second, got ({0:?}, {1:?})"
    )]
    ExpectedOrderedRange(T, T),
}

impl<T: Copy + PartialOrd + std::fmt::Debug> TupleRange<T> {
    pub fn try_new(left: T, right: T) -> Result<Self, TupleRangeError<T>> {
        // `!(left <= right)` also rejects NaN endpoints.
        if !(left <= right) {
            Err(TupleRangeError::ExpectedOrderedRange(left, right))
        } else {
            Ok(Self(left, right))
        }
    }

    pub fn start(&self) -> T {
        self.0
    }

    pub fn end(&self) -> T {
        self.1
    }

    pub fn as_tuple(&self) -> (T, T) {
        (self.0, self.1)
    }

    pub fn contains(&self, x: T) -> bool {
        self.0 <= x && x <= self.1
    }

    pub fn intersects(&self, other: Self) -> bool {
        !(self.end() < other.start() || other.end() < self.start())
    }
}

impl<T> TupleRange<T>
where
    T: Copy + PartialOrd + std::fmt::Debug + Sub<Output = T>,
{
    pub fn width(&self) -> T {
        self.1 - self.0
    }

    /// Signed distance between the two ranges.
    ///
    /// Positive when there is a gap between them, zero when they touch and
    /// negative when they overlap.
    pub fn gap_to(&self, other: Self) -> T {
        let left_end = if self.end() < other.end() {
            self.end()
        } else {
            other.end()
        };
        let right_start = if self.start() > other.start() {
            self.start()
        } else {
            other.start()
        };
        right_start - left_end
    }

    /// True if the ranges intersect or are separated by less than `min_distance`.
    pub fn overlaps_within(&self, other: Self, min_distance: T) -> bool {
        self.intersects(other) || self.gap_to(other) < min_distance
    }
}

impl TupleRange<f32> {
    pub fn center(&self) -> f32 {
        (self.0 + self.1) / 2.0
    }

    /// Clamps both ends into `bounds`.
    ///
    /// A range that lies completely outside of the bounds collapses onto
    /// the closest bound.
    pub fn clamp_to(&self, bounds: Self) -> Self {
        let start = self.0.clamp(bounds.start(), bounds.end());
        let end = self.1.clamp(bounds.start(), bounds.end());
        Self(start, end)
    }
}

impl<T: Copy + PartialOrd + std::fmt::Debug> TryFrom<(T, T)> for TupleRange<T> {
    type Error = TupleRangeError<T>;

    fn try_from(value: (T, T)) -> Result<Self, Self::Error> {
        TupleRange::try_new(value.0, value.1)
    }
}

impl<T: Copy + PartialOrd + std::fmt::Debug> From<TupleRange<T>> for (T, T) {
    fn from(value: TupleRange<T>) -> Self {
        value.as_tuple()
    }
}
