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

//! The declarative model: variables, intervals, and posted constraints.
//!
//! ```rust
//! use tribune_cp::{config::SearchConfig, model::CpModel};
//!
//! let mut model = CpModel::new();
//! let x = model.declare_variable(0, 2).unwrap();
//! let y = model.declare_variable(0, 2).unwrap();
//! model.add_all_different(&[x, y]).unwrap();
//! model.add_equality(x, y).unwrap();
//!
//! assert!(model.solve(&SearchConfig::default()).is_infeasible());
//! ```

use crate::{
    config::SearchConfig,
    domain::Domain,
    error::EngineError,
    index::{IntervalId, PropagatorIndex, VarId},
    monitor::{
        composite::CompositeMonitor, log::LogMonitor, search_monitor::SearchMonitor,
        time_limit::TimeLimitMonitor,
    },
    propagators::{
        Propagator,
        all_different::AllDifferent,
        element::Element,
        equality::Equality,
        linear::{Comparison, Linear},
        no_overlap::NoOverlap,
    },
    result::SolveOutcome,
    search::SearchSession,
};
use smallvec::SmallVec;

/// A constraint satisfaction problem over finite integer domains.
///
/// Variables and constraints can only be added. `solve` borrows the model
/// immutably and builds its own search state, so one model may be solved many
/// times with different configurations.
#[derive(Debug, Default)]
pub struct CpModel {
    domains: Vec<Domain>,
    intervals: Vec<(VarId, i64)>,
    propagators: Vec<Box<dyn Propagator>>,
    watches: Vec<SmallVec<[PropagatorIndex; 4]>>,
}

impl CpModel {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    #[inline]
    pub fn num_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Returns the number of posted constraints.
    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.propagators.len()
    }

    /// Declares a variable with domain `lo..=hi`.
    ///
    /// `lo > hi` yields a variable with an empty domain, which makes the
    /// model infeasible.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DomainTooLarge` if the range is wider than the
    /// engine stores.
    pub fn declare_variable(&mut self, lo: i64, hi: i64) -> Result<VarId, EngineError> {
        let domain = Domain::interval(lo, hi)?;
        Ok(self.push_variable(domain))
    }

    /// Declares a variable whose domain is exactly `values`.
    pub fn declare_variable_with_values(&mut self, values: &[i64]) -> Result<VarId, EngineError> {
        let domain = Domain::from_values(values)?;
        Ok(self.push_variable(domain))
    }

    /// Declares an interval of fixed `length` that must lie within
    /// `[lower, upper)`. Its start variable ranges over `lower..=upper - length`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::NegativeLength` for a negative length and
    /// `EngineError::Overflow` if `upper - length` does not fit into `i64`.
    pub fn declare_interval_variable(
        &mut self,
        lower: i64,
        upper: i64,
        length: i64,
    ) -> Result<IntervalId, EngineError> {
        if length < 0 {
            return Err(EngineError::NegativeLength(length));
        }
        let latest_start = upper.checked_sub(length).ok_or(EngineError::Overflow)?;
        let start = self.declare_variable(lower, latest_start)?;
        let interval = IntervalId::new(self.intervals.len());
        self.intervals.push((start, length));
        Ok(interval)
    }

    /// Removes from the domain of `variable` every value not in `values`.
    pub fn restrict_domain(&mut self, variable: VarId, values: &[i64]) -> Result<(), EngineError> {
        self.check_variable(variable)?;
        let allowed = Domain::from_values(values)?;
        self.domains[variable.get()].intersect(&allowed);
        Ok(())
    }

    /// Returns the declared domain of `variable`.
    ///
    /// # Panics
    ///
    /// Panics if `variable` was not issued by this model.
    #[inline]
    pub fn domain(&self, variable: VarId) -> &Domain {
        &self.domains[variable.get()]
    }

    /// Returns the start variable of `interval`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` was not issued by this model.
    #[inline]
    pub fn interval_start(&self, interval: IntervalId) -> VarId {
        self.intervals[interval.get()].0
    }

    /// Returns the length of `interval`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` was not issued by this model.
    #[inline]
    pub fn interval_length(&self, interval: IntervalId) -> i64 {
        self.intervals[interval.get()].1
    }

    /// Requires pairwise distinct values.
    pub fn add_all_different(&mut self, variables: &[VarId]) -> Result<(), EngineError> {
        self.check_variables(variables)?;
        self.post(AllDifferent::new(variables.to_vec()));
        Ok(())
    }

    /// Requires the given intervals to be pairwise disjoint.
    pub fn add_no_overlap(&mut self, intervals: &[IntervalId]) -> Result<(), EngineError> {
        let mut members = Vec::with_capacity(intervals.len());
        for &interval in intervals {
            let &(start, length) = self
                .intervals
                .get(interval.get())
                .ok_or(EngineError::UnknownInterval(interval))?;
            members.push((start, length));
        }
        self.post(NoOverlap::new(members));
        Ok(())
    }

    /// Requires `left == right`.
    pub fn add_equality(&mut self, left: VarId, right: VarId) -> Result<(), EngineError> {
        self.check_variables(&[left, right])?;
        self.post(Equality::new(left, right));
        Ok(())
    }

    /// Requires `Σ coefficient·variable ⋈ rhs`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Overflow` if a partial sum of the expression can
    /// leave the `i64` range on the declared domains.
    pub fn add_linear(
        &mut self,
        terms: &[(i64, VarId)],
        comparison: Comparison,
        rhs: i64,
    ) -> Result<(), EngineError> {
        let mut bound: i64 = rhs.checked_abs().ok_or(EngineError::Overflow)?;
        for &(coefficient, variable) in terms {
            self.check_variable(variable)?;
            let domain = &self.domains[variable.get()];
            if domain.is_empty() {
                continue;
            }
            let magnitude = domain
                .min()
                .checked_abs()
                .zip(domain.max().checked_abs())
                .map(|(lo, hi)| lo.max(hi))
                .ok_or(EngineError::Overflow)?;
            let term = coefficient
                .checked_abs()
                .and_then(|c| c.checked_mul(magnitude))
                .ok_or(EngineError::Overflow)?;
            bound = bound.checked_add(term).ok_or(EngineError::Overflow)?;
        }
        self.post(Linear::new(terms, comparison, rhs));
        Ok(())
    }

    /// Requires `value == table[index]`. Positions outside the table are
    /// never valid indices.
    pub fn add_element(
        &mut self,
        index: VarId,
        table: Vec<i64>,
        value: VarId,
    ) -> Result<(), EngineError> {
        self.check_variables(&[index, value])?;
        self.post(Element::new(index, table, value));
        Ok(())
    }

    /// Searches for one valuation satisfying every constraint.
    ///
    /// The time limit and progress logging of `config` are installed as
    /// monitors.
    pub fn solve(&self, config: &SearchConfig) -> SolveOutcome {
        let mut monitor = Self::config_monitors(config);
        SearchSession::new(self, config, &mut monitor).run()
    }

    /// Like `solve`, with `monitor` consulted alongside the monitors derived
    /// from `config`.
    pub fn solve_with_monitor(
        &self,
        config: &SearchConfig,
        monitor: &mut dyn SearchMonitor,
    ) -> SolveOutcome {
        let mut composite = Self::config_monitors(config);
        composite.add_monitor(monitor);
        SearchSession::new(self, config, &mut composite).run()
    }

    fn config_monitors<'a>(config: &SearchConfig) -> CompositeMonitor<'a> {
        let mut composite = CompositeMonitor::with_capacity(3);
        if let Some(limit) = config.time_limit() {
            composite.add_monitor(TimeLimitMonitor::with_clock_check_mask(
                limit,
                config.clock_check_mask(),
            ));
        }
        if let Some(interval) = config.log_interval() {
            composite.add_monitor(LogMonitor::new(interval, config.clock_check_mask()));
        }
        composite
    }

    #[inline]
    pub(crate) fn domains(&self) -> &[Domain] {
        &self.domains
    }

    #[inline]
    pub(crate) fn propagator(&self, index: PropagatorIndex) -> &dyn Propagator {
        self.propagators[index.get()].as_ref()
    }

    #[inline]
    pub(crate) fn propagator_indices(&self) -> impl Iterator<Item = PropagatorIndex> + use<> {
        (0..self.propagators.len()).map(PropagatorIndex::new)
    }

    #[inline]
    pub(crate) fn propagators(&self) -> &[Box<dyn Propagator>] {
        &self.propagators
    }

    /// Returns the constraints watching `variable`.
    #[inline]
    pub(crate) fn watches(&self, variable: VarId) -> &[PropagatorIndex] {
        &self.watches[variable.get()]
    }

    pub(crate) fn interval_starts(&self) -> Vec<VarId> {
        self.intervals.iter().map(|&(start, _)| start).collect()
    }

    fn push_variable(&mut self, domain: Domain) -> VarId {
        let variable = VarId::new(self.domains.len());
        self.domains.push(domain);
        self.watches.push(SmallVec::new());
        variable
    }

    fn post<P>(&mut self, propagator: P)
    where
        P: Propagator + 'static,
    {
        let index = PropagatorIndex::new(self.propagators.len());
        for &variable in propagator.variables() {
            let watchers = &mut self.watches[variable.get()];
            if watchers.last() != Some(&index) {
                watchers.push(index);
            }
        }
        self.propagators.push(Box::new(propagator));
    }

    #[inline]
    fn check_variable(&self, variable: VarId) -> Result<(), EngineError> {
        if variable.get() < self.domains.len() {
            Ok(())
        } else {
            Err(EngineError::UnknownVariable(variable))
        }
    }

    fn check_variables(&self, variables: &[VarId]) -> Result<(), EngineError> {
        variables
            .iter()
            .try_for_each(|&variable| self.check_variable(variable))
    }
}

impl std::fmt::Display for CpModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CpModel(variables: {}, intervals: {}, constraints: {})",
            self.num_variables(),
            self.num_intervals(),
            self.num_constraints()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::SolveStatus;
    use std::time::Duration;

    #[test]
    fn test_interval_declaration_sets_start_range() {
        let mut model = CpModel::new();
        let interval = model.declare_interval_variable(2, 10, 3).unwrap();
        let start = model.interval_start(interval);
        assert_eq!(model.interval_length(interval), 3);
        assert_eq!(model.domain(start).min(), 2);
        assert_eq!(model.domain(start).max(), 7);
        assert_eq!(model.num_intervals(), 1);
        assert_eq!(model.num_variables(), 1);
    }

    #[test]
    fn test_negative_length_is_rejected() {
        let mut model = CpModel::new();
        assert_eq!(
            model.declare_interval_variable(0, 10, -1),
            Err(EngineError::NegativeLength(-1))
        );
    }

    #[test]
    fn test_foreign_handles_are_rejected() {
        let mut model = CpModel::new();
        let x = model.declare_variable(0, 1).unwrap();
        let foreign = VarId::new(5);
        assert_eq!(
            model.add_equality(x, foreign),
            Err(EngineError::UnknownVariable(foreign))
        );
        assert_eq!(
            model.add_no_overlap(&[IntervalId::new(0)]),
            Err(EngineError::UnknownInterval(IntervalId::new(0)))
        );
        assert_eq!(model.num_constraints(), 0);
    }

    #[test]
    fn test_linear_overflow_is_rejected() {
        let mut model = CpModel::new();
        let x = model.declare_variable(i64::MAX - 10, i64::MAX).unwrap();
        assert_eq!(
            model.add_linear(&[(2, x)], Comparison::LessOrEqual, 0),
            Err(EngineError::Overflow)
        );
    }

    #[test]
    fn test_restrict_domain() {
        let mut model = CpModel::new();
        let x = model.declare_variable(0, 9).unwrap();
        model.restrict_domain(x, &[1, 4, 20]).unwrap();
        assert_eq!(model.domain(x).iter().collect::<Vec<_>>(), vec![1, 4]);
    }

    #[test]
    fn test_solve_all_different_with_element() {
        // Three seats in rows [0, 0, 1]; two delegates must share row 0.
        let mut model = CpModel::new();
        let seats: Vec<VarId> = (0..2).map(|_| model.declare_variable(0, 2).unwrap()).collect();
        let rows: Vec<VarId> = (0..2).map(|_| model.declare_variable(0, 1).unwrap()).collect();
        for (&seat, &row) in seats.iter().zip(&rows) {
            model.add_element(seat, vec![0, 0, 1], row).unwrap();
            model.restrict_domain(row, &[0]).unwrap();
        }
        model.add_all_different(&seats).unwrap();

        let outcome = model.solve(&SearchConfig::default());
        let valuation = outcome.valuation().expect("expected a solution");
        let mut chosen = vec![valuation.value(seats[0]), valuation.value(seats[1])];
        chosen.sort_unstable();
        assert_eq!(chosen, vec![0, 1]);
    }

    #[test]
    fn test_solve_no_overlap_packs_line() {
        let mut model = CpModel::new();
        let a = model.declare_interval_variable(0, 5, 3).unwrap();
        let b = model.declare_interval_variable(0, 5, 2).unwrap();
        model.add_no_overlap(&[a, b]).unwrap();

        let outcome = model.solve(&SearchConfig::default());
        let valuation = outcome.valuation().expect("expected a solution");
        let (sa, sb) = (valuation.start(a), valuation.start(b));
        assert!(sa + 3 <= sb || sb + 2 <= sa);
    }

    #[test]
    fn test_pigeonhole_is_infeasible() {
        let mut model = CpModel::new();
        let vars: Vec<VarId> = (0..4).map(|_| model.declare_variable(0, 2).unwrap()).collect();
        model.add_all_different(&vars).unwrap();
        let outcome = model.solve(&SearchConfig::default());
        assert!(outcome.is_infeasible());
    }

    #[test]
    fn test_zero_time_limit_is_unknown() {
        let mut model = CpModel::new();
        let vars: Vec<VarId> = (0..6).map(|_| model.declare_variable(0, 5).unwrap()).collect();
        model.add_all_different(&vars).unwrap();
        let config = SearchConfig::builder()
            .with_time_limit(Duration::ZERO)
            .with_clock_check_mask(0)
            .build();
        let outcome = model.solve(&config);
        assert!(matches!(outcome.status, SolveStatus::Unknown(_)));
    }

    #[test]
    fn test_solving_twice_gives_the_same_answer() {
        let mut model = CpModel::new();
        let x = model.declare_variable(0, 4).unwrap();
        let y = model.declare_variable(0, 4).unwrap();
        model
            .add_linear(&[(1, x), (1, y)], Comparison::Equal, 7)
            .unwrap();
        let first = model.solve(&SearchConfig::default());
        let second = model.solve(&SearchConfig::default());
        assert_eq!(first.valuation(), second.valuation());
        let valuation = first.valuation().expect("expected a solution");
        assert_eq!(valuation.value(x) + valuation.value(y), 7);
    }

    #[test]
    fn test_display() {
        let mut model = CpModel::new();
        model.declare_interval_variable(0, 4, 2).unwrap();
        assert_eq!(
            model.to_string(),
            "CpModel(variables: 1, intervals: 1, constraints: 0)"
        );
    }
}
