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

//! Non-overlap of fixed-length intervals on one line.
//!
//! Filtering works on compulsory parts rather than on pairs of values. An
//! interval whose latest start `lst` lies before its earliest end `ect` is
//! known to cover `[lst, ect)` in every solution. The propagator
//!
//! 1. fails if two compulsory parts overlap,
//! 2. removes from every other interval the starts that would hit a
//!    compulsory part, and
//! 3. fails if the points still coverable by some interval are fewer than the
//!    total length to place (energy check).

use crate::{
    domain::MAX_DOMAIN_WIDTH,
    index::VarId,
    propagators::Propagator,
    result::Valuation,
    store::{Conflict, DomainStore},
};
use fixedbitset::FixedBitSet;
use tribune_core::math::interval::ClosedOpenInterval;

/// Pairwise disjoint intervals `[startᵢ, startᵢ + lengthᵢ)`.
#[derive(Debug, Clone)]
pub struct NoOverlap {
    starts: Vec<VarId>,
    lengths: Vec<i64>,
}

impl NoOverlap {
    /// Creates the constraint over `(start variable, length)` pairs.
    pub fn new(intervals: Vec<(VarId, i64)>) -> Self {
        let (starts, lengths) = intervals.into_iter().unzip();
        Self { starts, lengths }
    }

    fn compulsory_parts(&self, store: &DomainStore) -> Vec<(ClosedOpenInterval<i64>, usize)> {
        self.starts
            .iter()
            .zip(&self.lengths)
            .enumerate()
            .filter(|&(_, (_, &length))| length > 0)
            .filter_map(|(owner, (&start, &length))| {
                let domain = store.domain(start);
                ClosedOpenInterval::try_new(domain.max(), domain.min() + length)
                    .filter(|part| !part.is_empty())
                    .map(|part| (part, owner))
            })
            .collect()
    }

    fn check_energy(&self, store: &DomainStore) -> Result<(), Conflict> {
        let mut lo = i64::MAX;
        let mut hi = i64::MIN;
        let mut demand: i128 = 0;
        for (&start, &length) in self.starts.iter().zip(&self.lengths) {
            if length <= 0 {
                continue;
            }
            let domain = store.domain(start);
            lo = lo.min(domain.min());
            hi = hi.max(domain.max() + length);
            demand += length as i128;
        }
        if demand == 0 {
            return Ok(());
        }
        let width = hi as i128 - lo as i128;
        if width > MAX_DOMAIN_WIDTH as i128 {
            return Ok(());
        }
        if demand > width {
            return Err(Conflict);
        }

        let mut coverable = FixedBitSet::with_capacity(width as usize);
        for (&start, &length) in self.starts.iter().zip(&self.lengths) {
            if length <= 0 {
                continue;
            }
            for value in store.domain(start).iter() {
                let from = (value - lo) as usize;
                coverable.insert_range(from..from + length as usize);
            }
        }
        if (coverable.count_ones(..) as i128) < demand {
            return Err(Conflict);
        }
        Ok(())
    }
}

impl Propagator for NoOverlap {
    fn name(&self) -> &'static str {
        "NoOverlap"
    }

    fn variables(&self) -> &[VarId] {
        &self.starts
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let mut parts = self.compulsory_parts(store);
        parts.sort_unstable_by_key(|(part, _)| part.start());
        if parts
            .windows(2)
            .any(|pair| pair[0].0.intersects(pair[1].0))
        {
            return Err(Conflict);
        }

        for (index, (&start, &length)) in self.starts.iter().zip(&self.lengths).enumerate() {
            if length <= 0 {
                continue;
            }
            for &(part, owner) in &parts {
                if owner != index {
                    store.remove_range(start, part.start() - length + 1, part.end() - 1)?;
                }
            }
        }

        self.check_energy(store)
    }

    fn is_satisfied(&self, valuation: &Valuation) -> bool {
        let mut placed: Vec<(i64, i64)> = self
            .starts
            .iter()
            .zip(&self.lengths)
            .filter(|&(_, &length)| length > 0)
            .map(|(&start, &length)| {
                let value = valuation.value(start);
                (value, value + length)
            })
            .collect();
        placed.sort_unstable();
        placed.windows(2).all(|pair| pair[0].1 <= pair[1].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn v(index: usize) -> VarId {
        VarId::new(index)
    }

    fn values(store: &DomainStore, variable: VarId) -> Vec<i64> {
        store.domain(variable).iter().collect()
    }

    #[test]
    fn test_compulsory_part_blocks_other_starts() {
        // Block of 3 with start in {1, 2} always covers [2, 4).
        let mut store = DomainStore::new(vec![
            Domain::interval(1, 2).unwrap(),
            Domain::interval(0, 8).unwrap(),
        ]);
        let no_overlap = NoOverlap::new(vec![(v(0), 3), (v(1), 2)]);
        no_overlap.propagate(&mut store).unwrap();
        assert_eq!(values(&store, v(1)), vec![0, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_overlapping_compulsory_parts_conflict() {
        let mut store = DomainStore::new(vec![
            Domain::interval(2, 2).unwrap(),
            Domain::interval(3, 3).unwrap(),
        ]);
        let no_overlap = NoOverlap::new(vec![(v(0), 2), (v(1), 2)]);
        assert_eq!(no_overlap.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_adjacent_blocks_are_fine() {
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 0).unwrap(),
            Domain::interval(2, 2).unwrap(),
        ]);
        let no_overlap = NoOverlap::new(vec![(v(0), 2), (v(1), 3)]);
        assert_eq!(no_overlap.propagate(&mut store), Ok(()));
    }

    #[test]
    fn test_energy_check_sees_unreachable_points() {
        // Every start is 0 or 5, so only {0, 1, 5, 6} can ever be covered
        // while five points are needed.
        let mut store = DomainStore::new(vec![
            Domain::from_values(&[0, 5]).unwrap(),
            Domain::from_values(&[0, 5]).unwrap(),
            Domain::from_values(&[0, 5]).unwrap(),
        ]);
        let no_overlap = NoOverlap::new(vec![(v(0), 2), (v(1), 2), (v(2), 1)]);
        assert_eq!(no_overlap.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_demand_larger_than_line_conflicts() {
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 2).unwrap(),
            Domain::interval(0, 2).unwrap(),
        ]);
        let no_overlap = NoOverlap::new(vec![(v(0), 3), (v(1), 3)]);
        assert_eq!(no_overlap.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_is_satisfied() {
        let no_overlap = NoOverlap::new(vec![(v(0), 2), (v(1), 3), (v(2), 0)]);
        assert!(no_overlap.is_satisfied(&Valuation::new(vec![3, 0, 1], Vec::new())));
        assert!(!no_overlap.is_satisfied(&Valuation::new(vec![2, 0, 1], Vec::new())));
    }
}
