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

//! Explicit finite integer domains.
//!
//! A `Domain` stores its values as bits of a `FixedBitSet` relative to the
//! smallest value it was created with. The bit set never grows: domains only
//! ever shrink during search, and the cached `min`, `max`, and `size` move
//! inward accordingly.

use crate::error::EngineError;
use fixedbitset::FixedBitSet;

/// The widest domain the engine stores explicitly.
pub const MAX_DOMAIN_WIDTH: u64 = 1 << 22;

#[inline(always)]
fn checked_width(lo: i64, hi: i64) -> Result<usize, EngineError> {
    let width = (hi as i128) - (lo as i128) + 1;
    if width > MAX_DOMAIN_WIDTH as i128 {
        return Err(EngineError::DomainTooLarge {
            lo,
            hi,
            limit: MAX_DOMAIN_WIDTH,
        });
    }
    Ok(width as usize)
}

/// A finite set of `i64` values.
#[derive(Clone, PartialEq, Eq)]
pub struct Domain {
    offset: i64,
    bits: FixedBitSet,
    size: usize,
    min: i64,
    max: i64,
}

impl Domain {
    /// Creates the empty domain.
    #[inline]
    pub fn empty() -> Self {
        Self {
            offset: 0,
            bits: FixedBitSet::new(),
            size: 0,
            min: 0,
            max: 0,
        }
    }

    /// Creates the domain `{lo, ..., hi}`. If `hi < lo` the domain is empty.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DomainTooLarge` if the range holds more than
    /// `MAX_DOMAIN_WIDTH` values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tribune_cp::domain::Domain;
    /// let domain = Domain::interval(3, 7).unwrap();
    /// assert_eq!(domain.size(), 5);
    /// assert_eq!((domain.min(), domain.max()), (3, 7));
    /// ```
    pub fn interval(lo: i64, hi: i64) -> Result<Self, EngineError> {
        if hi < lo {
            return Ok(Self::empty());
        }
        let width = checked_width(lo, hi)?;
        let mut bits = FixedBitSet::with_capacity(width);
        bits.insert_range(..);
        Ok(Self {
            offset: lo,
            bits,
            size: width,
            min: lo,
            max: hi,
        })
    }

    /// Creates the domain holding exactly `values`. Duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DomainTooLarge` if the values span more than
    /// `MAX_DOMAIN_WIDTH` integers.
    pub fn from_values(values: &[i64]) -> Result<Self, EngineError> {
        let (Some(&lo), Some(&hi)) = (values.iter().min(), values.iter().max()) else {
            return Ok(Self::empty());
        };
        let width = checked_width(lo, hi)?;
        let mut bits = FixedBitSet::with_capacity(width);
        for &value in values {
            bits.insert((value - lo) as usize);
        }
        let size = bits.count_ones(..);
        Ok(Self {
            offset: lo,
            bits,
            size,
            min: lo,
            max: hi,
        })
    }

    #[inline(always)]
    fn bit(&self, value: i64) -> Option<usize> {
        if self.size == 0 || value < self.min || value > self.max {
            None
        } else {
            Some((value - self.offset) as usize)
        }
    }

    /// Returns the number of values in the domain.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if exactly one value is left.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.size == 1
    }

    /// Returns the single remaining value, if the domain is fixed.
    #[inline]
    pub fn value(&self) -> Option<i64> {
        self.is_fixed().then_some(self.min)
    }

    /// Returns the smallest value.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the domain is empty.
    #[inline]
    pub fn min(&self) -> i64 {
        debug_assert!(!self.is_empty(), "called `Domain::min` on an empty domain");
        self.min
    }

    /// Returns the largest value.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the domain is empty.
    #[inline]
    pub fn max(&self) -> i64 {
        debug_assert!(!self.is_empty(), "called `Domain::max` on an empty domain");
        self.max
    }

    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.bit(value).is_some_and(|bit| self.bits.contains(bit))
    }

    /// Iterates over the values in ascending order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        let offset = self.offset;
        self.bits.ones().map(move |bit| offset + bit as i64)
    }

    /// Recomputes `size` and walks `min` and `max` inward after a removal.
    fn refresh(&mut self) {
        self.size = self.bits.count_ones(..);
        if self.size == 0 {
            return;
        }
        let mut low = (self.min - self.offset) as usize;
        while !self.bits.contains(low) {
            low += 1;
        }
        let mut high = (self.max - self.offset) as usize;
        while !self.bits.contains(high) {
            high -= 1;
        }
        self.min = self.offset + low as i64;
        self.max = self.offset + high as i64;
    }

    /// Removes every value. Returns `true` if the domain changed.
    #[inline]
    pub fn clear(&mut self) -> bool {
        if self.size == 0 {
            return false;
        }
        self.bits.clear();
        self.size = 0;
        true
    }

    /// Removes `value`. Returns `true` if the domain changed.
    pub fn remove(&mut self, value: i64) -> bool {
        match self.bit(value) {
            Some(bit) if self.bits.contains(bit) => {
                self.bits.set(bit, false);
                self.refresh();
                true
            }
            _ => false,
        }
    }

    /// Removes every value in `lo..=hi`. Returns `true` if the domain changed.
    pub fn remove_range(&mut self, lo: i64, hi: i64) -> bool {
        if self.size == 0 || hi < self.min || lo > self.max || hi < lo {
            return false;
        }
        let from = (lo.max(self.min) - self.offset) as usize;
        let to = (hi.min(self.max) - self.offset) as usize + 1;
        if self.bits.count_ones(from..to) == 0 {
            return false;
        }
        self.bits.set_range(from..to, false);
        self.refresh();
        true
    }

    /// Removes every value below `lo`. Returns `true` if the domain changed.
    #[inline]
    pub fn set_min(&mut self, lo: i64) -> bool {
        if self.size == 0 || lo <= self.min {
            return false;
        }
        self.remove_range(self.min, lo - 1)
    }

    /// Removes every value above `hi`. Returns `true` if the domain changed.
    #[inline]
    pub fn set_max(&mut self, hi: i64) -> bool {
        if self.size == 0 || hi >= self.max {
            return false;
        }
        self.remove_range(hi + 1, self.max)
    }

    /// Reduces the domain to `{value}`, or to the empty set if `value` is not
    /// in it. Returns `true` if the domain changed.
    pub fn assign(&mut self, value: i64) -> bool {
        match self.bit(value) {
            Some(bit) if self.bits.contains(bit) => {
                if self.size == 1 {
                    return false;
                }
                self.bits.clear();
                self.bits.insert(bit);
                self.size = 1;
                self.min = value;
                self.max = value;
                true
            }
            _ => self.clear(),
        }
    }

    /// Keeps only the values for which `keep` returns `true`. Returns `true`
    /// if the domain changed.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(i64) -> bool,
    {
        let offset = self.offset;
        let doomed: Vec<usize> = self
            .bits
            .ones()
            .filter(|&bit| !keep(offset + bit as i64))
            .collect();
        if doomed.is_empty() {
            return false;
        }
        for bit in doomed {
            self.bits.set(bit, false);
        }
        self.refresh();
        true
    }

    /// Keeps only the values also contained in `other`. Returns `true` if the
    /// domain changed.
    #[inline]
    pub fn intersect(&mut self, other: &Domain) -> bool {
        self.retain(|value| other.contains(value))
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "[{}..{}]#{}", self.min, self.max, self.size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(domain: &Domain) -> Vec<i64> {
        domain.iter().collect()
    }

    #[test]
    fn test_interval_and_empty() {
        let domain = Domain::interval(-2, 2).unwrap();
        assert_eq!(values(&domain), vec![-2, -1, 0, 1, 2]);
        assert!(Domain::interval(5, 4).unwrap().is_empty());
        assert!(Domain::empty().is_empty());
        assert!(!Domain::empty().contains(0));
    }

    #[test]
    fn test_interval_rejects_huge_width() {
        assert!(matches!(
            Domain::interval(0, MAX_DOMAIN_WIDTH as i64),
            Err(EngineError::DomainTooLarge { .. })
        ));
        assert!(Domain::interval(i64::MIN, i64::MAX).is_err());
        assert!(Domain::interval(1, MAX_DOMAIN_WIDTH as i64).is_ok());
    }

    #[test]
    fn test_from_values_deduplicates() {
        let domain = Domain::from_values(&[7, 3, 7, 10]).unwrap();
        assert_eq!(values(&domain), vec![3, 7, 10]);
        assert_eq!(domain.size(), 3);
        assert_eq!((domain.min(), domain.max()), (3, 10));
        assert!(Domain::from_values(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_remove_updates_bounds() {
        let mut domain = Domain::interval(0, 4).unwrap();
        assert!(domain.remove(0));
        assert!(!domain.remove(0));
        assert!(domain.remove(4));
        assert_eq!((domain.min(), domain.max(), domain.size()), (1, 3, 3));
        assert!(!domain.remove(99));
    }

    #[test]
    fn test_bounds_and_ranges() {
        let mut domain = Domain::interval(0, 9).unwrap();
        assert!(domain.set_min(3));
        assert!(!domain.set_min(2));
        assert!(domain.set_max(7));
        assert_eq!(values(&domain), vec![3, 4, 5, 6, 7]);
        assert!(domain.remove_range(4, 5));
        assert!(!domain.remove_range(4, 5));
        assert_eq!(values(&domain), vec![3, 6, 7]);
        assert!(domain.set_min(4));
        assert_eq!(domain.min(), 6);
        assert!(domain.set_max(0));
        assert!(domain.is_empty());
    }

    #[test]
    fn test_assign() {
        let mut domain = Domain::interval(1, 5).unwrap();
        assert!(domain.assign(3));
        assert_eq!(domain.value(), Some(3));
        assert!(!domain.assign(3));
        assert!(domain.assign(4));
        assert!(domain.is_empty());
    }

    #[test]
    fn test_retain_and_intersect() {
        let mut domain = Domain::interval(0, 9).unwrap();
        assert!(domain.retain(|v| v % 3 == 0));
        assert_eq!(values(&domain), vec![0, 3, 6, 9]);
        assert!(!domain.retain(|_| true));

        let other = Domain::from_values(&[3, 4, 9, 12]).unwrap();
        assert!(domain.intersect(&other));
        assert_eq!(values(&domain), vec![3, 9]);
    }

    #[test]
    fn test_display() {
        let domain = Domain::from_values(&[2, 5]).unwrap();
        assert_eq!(domain.to_string(), "[2..5]#2");
        assert_eq!(format!("{:?}", domain), "{2, 5}");
        assert_eq!(Domain::empty().to_string(), "{}");
    }
}
