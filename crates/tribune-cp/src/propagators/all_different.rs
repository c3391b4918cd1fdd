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

use crate::{
    domain::MAX_DOMAIN_WIDTH,
    index::VarId,
    propagators::Propagator,
    result::Valuation,
    store::{Conflict, DomainStore},
};
use fixedbitset::FixedBitSet;

/// Pairwise distinct values.
///
/// Filtering removes the value of every fixed variable from the others until
/// nothing changes, then checks that the union of all domains still holds at
/// least one value per variable.
#[derive(Debug, Clone)]
pub struct AllDifferent {
    variables: Vec<VarId>,
}

impl AllDifferent {
    #[inline]
    pub fn new(variables: Vec<VarId>) -> Self {
        Self { variables }
    }

    fn remove_fixed_values(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let mut done = vec![false; self.variables.len()];
        loop {
            let mut progressed = false;
            for (position, &variable) in self.variables.iter().enumerate() {
                if done[position] {
                    continue;
                }
                let Some(value) = store.domain(variable).value() else {
                    continue;
                };
                done[position] = true;
                progressed = true;
                for (other_position, &other) in self.variables.iter().enumerate() {
                    if other_position != position {
                        store.remove(other, value)?;
                    }
                }
            }
            if !progressed {
                return Ok(());
            }
        }
    }

    fn check_union(&self, store: &DomainStore) -> Result<(), Conflict> {
        let (lo, hi) = self
            .variables
            .iter()
            .map(|&variable| store.domain(variable))
            .fold((i64::MAX, i64::MIN), |(lo, hi), domain| {
                (lo.min(domain.min()), hi.max(domain.max()))
            });
        let width = (hi as i128) - (lo as i128) + 1;
        if width > MAX_DOMAIN_WIDTH as i128 {
            return Ok(());
        }
        let width = width as usize;

        let mut union = FixedBitSet::with_capacity(width);
        for &variable in &self.variables {
            for value in store.domain(variable).iter() {
                union.insert((value - lo) as usize);
            }
        }
        if union.count_ones(..) < self.variables.len() {
            return Err(Conflict);
        }
        Ok(())
    }
}

impl Propagator for AllDifferent {
    fn name(&self) -> &'static str {
        "AllDifferent"
    }

    fn variables(&self) -> &[VarId] {
        &self.variables
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        if self.variables.len() < 2 {
            return Ok(());
        }
        self.remove_fixed_values(store)?;
        self.check_union(store)
    }

    fn is_satisfied(&self, valuation: &Valuation) -> bool {
        let mut values: Vec<i64> = self
            .variables
            .iter()
            .map(|&variable| valuation.value(variable))
            .collect();
        values.sort_unstable();
        values.windows(2).all(|pair| pair[0] != pair[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    fn v(index: usize) -> VarId {
        VarId::new(index)
    }

    #[test]
    fn test_fixed_values_are_removed_transitively() {
        let mut store = DomainStore::new(vec![
            Domain::interval(1, 1).unwrap(),
            Domain::interval(1, 2).unwrap(),
            Domain::interval(1, 3).unwrap(),
        ]);
        let all_different = AllDifferent::new(vec![v(0), v(1), v(2)]);
        assert_eq!(all_different.propagate(&mut store), Ok(()));
        assert_eq!(store.domain(v(1)).value(), Some(2));
        assert_eq!(store.domain(v(2)).value(), Some(3));
    }

    #[test]
    fn test_pigeonhole_conflict() {
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 1).unwrap(),
            Domain::interval(0, 1).unwrap(),
            Domain::interval(0, 1).unwrap(),
        ]);
        let all_different = AllDifferent::new(vec![v(0), v(1), v(2)]);
        assert_eq!(all_different.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_equal_fixed_values_conflict() {
        let mut store = DomainStore::new(vec![
            Domain::interval(4, 4).unwrap(),
            Domain::interval(4, 4).unwrap(),
        ]);
        let all_different = AllDifferent::new(vec![v(0), v(1)]);
        assert_eq!(all_different.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_is_satisfied() {
        let all_different = AllDifferent::new(vec![v(0), v(1), v(2)]);
        assert!(all_different.is_satisfied(&Valuation::new(vec![3, 1, 2], Vec::new())));
        assert!(!all_different.is_satisfied(&Valuation::new(vec![3, 1, 3], Vec::new())));
    }
}
