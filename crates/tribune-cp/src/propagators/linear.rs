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

//! Bounds propagation for `Σ cᵢ·xᵢ ⋈ rhs`.
//!
//! `CpModel::add_linear` rejects expressions whose bounds over the declared
//! domains overflow `i64`, so the `i128` arithmetic below is exact.

use crate::{
    domain::Domain,
    index::VarId,
    propagators::Propagator,
    result::Valuation,
    store::{Conflict, DomainStore},
};

/// The relation between the linear expression and the right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::LessOrEqual => write!(f, "<="),
            Comparison::GreaterOrEqual => write!(f, ">="),
            Comparison::Equal => write!(f, "=="),
        }
    }
}

#[inline(always)]
fn min_term(coefficient: i128, domain: &Domain) -> i128 {
    if coefficient >= 0 {
        coefficient * domain.min() as i128
    } else {
        coefficient * domain.max() as i128
    }
}

#[inline(always)]
fn clamp_to_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// A linear constraint over integer variables.
#[derive(Debug, Clone)]
pub struct Linear {
    coefficients: Vec<i64>,
    variables: Vec<VarId>,
    comparison: Comparison,
    rhs: i64,
}

impl Linear {
    /// Creates the constraint `Σ coefficient·variable ⋈ rhs`.
    pub fn new(terms: &[(i64, VarId)], comparison: Comparison, rhs: i64) -> Self {
        Self {
            coefficients: terms.iter().map(|&(c, _)| c).collect(),
            variables: terms.iter().map(|&(_, v)| v).collect(),
            comparison,
            rhs,
        }
    }

    /// Filters `Σ sign·cᵢ·xᵢ ≤ sign·rhs`.
    fn filter_upper(&self, store: &mut DomainStore, sign: i128) -> Result<(), Conflict> {
        let rhs = sign * self.rhs as i128;
        let min_sum: i128 = self
            .coefficients
            .iter()
            .zip(&self.variables)
            .map(|(&c, &x)| min_term(sign * c as i128, store.domain(x)))
            .sum();
        if min_sum > rhs {
            return Err(Conflict);
        }

        for (&c, &x) in self.coefficients.iter().zip(&self.variables) {
            let a = sign * c as i128;
            if a == 0 {
                continue;
            }
            // Stale `min_sum` only loosens the bound, never cuts a solution.
            let slack = rhs - (min_sum - min_term(a, store.domain(x)));
            if a > 0 {
                store.set_max(x, clamp_to_i64(slack.div_euclid(a)))?;
            } else {
                store.set_min(x, clamp_to_i64(-slack.div_euclid(-a)))?;
            }
        }
        Ok(())
    }
}

impl Propagator for Linear {
    fn name(&self) -> &'static str {
        "Linear"
    }

    fn variables(&self) -> &[VarId] {
        &self.variables
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        match self.comparison {
            Comparison::LessOrEqual => self.filter_upper(store, 1),
            Comparison::GreaterOrEqual => self.filter_upper(store, -1),
            Comparison::Equal => {
                self.filter_upper(store, 1)?;
                self.filter_upper(store, -1)
            }
        }
    }

    fn is_satisfied(&self, valuation: &Valuation) -> bool {
        let lhs: i128 = self
            .coefficients
            .iter()
            .zip(&self.variables)
            .map(|(&c, &x)| c as i128 * valuation.value(x) as i128)
            .sum();
        let rhs = self.rhs as i128;
        match self.comparison {
            Comparison::LessOrEqual => lhs <= rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
            Comparison::Equal => lhs == rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(index: usize) -> VarId {
        VarId::new(index)
    }

    fn bounds(store: &DomainStore, variable: VarId) -> (i64, i64) {
        let domain = store.domain(variable);
        (domain.min(), domain.max())
    }

    #[test]
    fn test_window_constraint_narrows_both_sides() {
        // anchor <= seat <= anchor + 2
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 10).unwrap(),
            Domain::interval(5, 6).unwrap(),
        ]);
        let lower = Linear::new(&[(1, v(0)), (-1, v(1))], Comparison::LessOrEqual, 0);
        let upper = Linear::new(&[(1, v(1)), (-1, v(0))], Comparison::LessOrEqual, 2);
        lower.propagate(&mut store).unwrap();
        upper.propagate(&mut store).unwrap();
        assert_eq!(bounds(&store, v(0)), (3, 6));
    }

    #[test]
    fn test_greater_or_equal_and_negative_coefficients() {
        // 2x - 3y >= 4, x in [0, 5], y in [0, 5]
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 5).unwrap(),
            Domain::interval(0, 5).unwrap(),
        ]);
        let linear = Linear::new(&[(2, v(0)), (-3, v(1))], Comparison::GreaterOrEqual, 4);
        linear.propagate(&mut store).unwrap();
        // x >= 2 (y = 0), y <= 2 (x = 5: 10 - 3y >= 4)
        assert_eq!(bounds(&store, v(0)), (2, 5));
        assert_eq!(bounds(&store, v(1)), (0, 2));
    }

    #[test]
    fn test_equal_fixes_remaining_variable() {
        let mut store = DomainStore::new(vec![
            Domain::interval(3, 3).unwrap(),
            Domain::interval(0, 10).unwrap(),
        ]);
        let linear = Linear::new(&[(1, v(0)), (1, v(1))], Comparison::Equal, 7);
        linear.propagate(&mut store).unwrap();
        assert_eq!(store.domain(v(1)).value(), Some(4));
    }

    #[test]
    fn test_infeasible_bound_conflicts() {
        let mut store = DomainStore::new(vec![Domain::interval(5, 9).unwrap()]);
        let linear = Linear::new(&[(1, v(0))], Comparison::LessOrEqual, 4);
        assert_eq!(linear.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_is_satisfied() {
        let linear = Linear::new(&[(1, v(0)), (-1, v(1))], Comparison::LessOrEqual, 0);
        assert!(linear.is_satisfied(&Valuation::new(vec![2, 2], Vec::new())));
        assert!(!linear.is_satisfied(&Valuation::new(vec![3, 2], Vec::new())));
    }
}
