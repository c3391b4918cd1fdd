// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Closed-open integer intervals.
//!
//! Rows on the global seat line, stability runs over sessions, and the
//! compulsory parts of the no-overlap propagator are all `[start, end)`
//! ranges of integers.

use num_traits::PrimInt;
use std::iter::FusedIterator;

/// A half-open interval `[start, end)` with `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start: T,
    end: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new interval.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    ///
    /// ```rust
    /// # use tribune_core::math::interval::ClosedOpenInterval;
    /// let row = ClosedOpenInterval::new(0, 22);
    /// assert_eq!(row.len(), 22);
    /// ```
    #[inline]
    pub fn new(start: T, end: T) -> Self {
        assert!(
            start <= end,
            "called `ClosedOpenInterval::new` with start after end"
        );
        Self { start, end }
    }

    /// Creates a new interval, or `None` if `start > end`.
    #[inline]
    pub fn try_new(start: T, end: T) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates the interval of `len` points beginning at `start`.
    ///
    /// ```rust
    /// # use tribune_core::math::interval::ClosedOpenInterval;
    /// let block = ClosedOpenInterval::with_len(5i64, 3);
    /// assert_eq!(block, ClosedOpenInterval::new(5, 8));
    /// ```
    #[inline]
    pub fn with_len(start: T, len: T) -> Self {
        Self::new(start, start + len)
    }

    #[inline]
    pub const fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> T {
        self.end
    }

    #[inline]
    pub fn len(&self) -> T {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if the intervals share a point. Touching intervals do
    /// not intersect.
    ///
    /// ```rust
    /// # use tribune_core::math::interval::ClosedOpenInterval;
    /// let a = ClosedOpenInterval::new(0, 4);
    /// assert!(a.intersects(ClosedOpenInterval::new(3, 6)));
    /// assert!(!a.intersects(ClosedOpenInterval::new(4, 6)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Iterates over the points in ascending order.
    ///
    /// ```rust
    /// # use tribune_core::math::interval::ClosedOpenInterval;
    /// let seats: Vec<usize> = ClosedOpenInterval::new(4usize, 7).iter().collect();
    /// assert_eq!(seats, vec![4, 5, 6]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Points<T> {
        Points {
            next: self.start,
            end: self.end,
        }
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The points of a `ClosedOpenInterval`.
#[derive(Clone, Debug)]
pub struct Points<T>
where
    T: PrimInt,
{
    next: T,
    end: T,
}

impl<T> Iterator for Points<T>
where
    T: PrimInt,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next >= self.end {
            return None;
        }
        let point = self.next;
        self.next = point + T::one();
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for Points<T>
where
    T: PrimInt,
{
    fn len(&self) -> usize {
        if self.next >= self.end {
            0
        } else {
            (self.end - self.next).to_usize().unwrap_or(usize::MAX)
        }
    }
}

impl<T> FusedIterator for Points<T> where T: PrimInt {}
