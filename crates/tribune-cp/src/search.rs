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

//! Depth-first search with propagation at every node.
//!
//! A `SearchSession` owns all mutable state of one call to `CpModel::solve`:
//! the domain store, the propagation queue, and a stack of decision frames.
//! Each frame records the branching variable, the values still to try, and
//! whether one of them is currently applied. The store holds one trail frame
//! per applied decision, so backtracking a decision is one `pop_frame`.

use crate::{
    config::{SearchConfig, ValueOrder},
    index::{PropagatorIndex, VarId},
    model::CpModel,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::{SolveOutcome, SolveStatus, Valuation},
    stats::SearchStatistics,
    store::{Conflict, DomainStore},
};
use fixedbitset::FixedBitSet;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::{collections::VecDeque, time::Instant};
use tracing::{debug, trace};

/// A decision level: `variable` is tried with `values[..next]` so far.
#[derive(Debug, Clone)]
struct Frame {
    variable: VarId,
    values: Vec<i64>,
    next: usize,
    applied: bool,
}

/// The state of one search over a `CpModel`.
pub(crate) struct SearchSession<'a, M>
where
    M: SearchMonitor + ?Sized,
{
    model: &'a CpModel,
    monitor: &'a mut M,
    value_order: ValueOrder,
    rng: StdRng,
    store: DomainStore,
    frames: Vec<Frame>,
    queue: VecDeque<PropagatorIndex>,
    queued: FixedBitSet,
    changed: Vec<VarId>,
    stats: SearchStatistics,
    start_time: Instant,
}

impl<'a, M> SearchSession<'a, M>
where
    M: SearchMonitor + ?Sized,
{
    pub(crate) fn new(model: &'a CpModel, config: &SearchConfig, monitor: &'a mut M) -> Self {
        Self {
            model,
            monitor,
            value_order: config.value_order(),
            rng: StdRng::seed_from_u64(config.seed()),
            store: DomainStore::new(model.domains().to_vec()),
            frames: Vec::with_capacity(model.num_variables()),
            queue: VecDeque::with_capacity(model.num_constraints()),
            queued: FixedBitSet::with_capacity(model.num_constraints()),
            changed: Vec::new(),
            stats: SearchStatistics::default(),
            start_time: Instant::now(),
        }
    }

    pub(crate) fn run(mut self) -> SolveOutcome {
        self.monitor.on_enter_search(self.model);

        let status = if self.initialize().is_err() {
            trace!("root propagation failed");
            SolveStatus::Infeasible
        } else {
            self.explore()
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        debug!(
            status = status_name(&status),
            nodes = self.stats.nodes_explored,
            failures = self.stats.failures,
            propagations = self.stats.propagations,
            elapsed = ?self.stats.time_total,
            "search finished"
        );
        SolveOutcome::new(status, self.stats)
    }

    /// Rejects empty declared domains and propagates every constraint once.
    fn initialize(&mut self) -> Result<(), Conflict> {
        if self.store.domains().iter().any(|domain| domain.is_empty()) {
            return Err(Conflict);
        }
        for index in self.model.propagator_indices() {
            self.enqueue(index);
        }
        self.propagate()
    }

    fn explore(&mut self) -> SolveStatus {
        // `true` when the current node is consistent and needs a new decision.
        let mut descend = true;
        loop {
            self.stats.on_step();
            self.monitor.on_step(&self.stats);
            if let SearchCommand::Terminate(reason) = self.monitor.search_command() {
                return SolveStatus::Unknown(reason);
            }

            if descend {
                match self.select_variable() {
                    Some(variable) => {
                        self.open_frame(variable);
                        descend = false;
                    }
                    None => {
                        let valuation = self.valuation();
                        if self.verify(&valuation) {
                            self.stats.on_solution_found();
                            self.monitor.on_solution_found(&valuation, &self.stats);
                            return SolveStatus::Satisfied(valuation);
                        }
                        self.stats.on_solution_rejected();
                        debug!(
                            depth = self.frames.len(),
                            "complete valuation rejected by final check"
                        );
                        if self.frames.is_empty() {
                            return SolveStatus::Infeasible;
                        }
                        descend = false;
                    }
                }
                continue;
            }

            match self.try_next_value() {
                Some(consistent) => descend = consistent,
                None => {
                    if self.frames.is_empty() {
                        return SolveStatus::Infeasible;
                    }
                }
            }
        }
    }

    /// Retracts the applied value of the top frame and applies the next one.
    ///
    /// Returns `Some(true)` if the new node is consistent, `Some(false)` if
    /// propagation failed, and `None` if the frame was exhausted and popped.
    fn try_next_value(&mut self) -> Option<bool> {
        let frame = self.frames.last_mut()?;
        if frame.applied {
            self.store.pop_frame();
            frame.applied = false;
        }
        if frame.next == frame.values.len() {
            self.frames.pop();
            self.stats.on_backtrack();
            self.monitor.on_backtrack(&self.stats);
            return None;
        }

        let variable = frame.variable;
        let value = frame.values[frame.next];
        frame.next += 1;
        frame.applied = true;
        self.store.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.frames.len() as u64);

        let consistent = self.store.assign(variable, value).is_ok() && self.propagate().is_ok();
        if !consistent {
            self.stats.on_failure();
        }
        Some(consistent)
    }

    fn open_frame(&mut self, variable: VarId) {
        let mut values: Vec<i64> = self.store.domain(variable).iter().collect();
        if self.value_order == ValueOrder::Shuffled {
            values.shuffle(&mut self.rng);
        }
        self.frames.push(Frame {
            variable,
            values,
            next: 0,
            applied: false,
        });
    }

    /// Smallest domain first, then most watched, then lowest index.
    fn select_variable(&self) -> Option<VarId> {
        self.store
            .domains()
            .iter()
            .enumerate()
            .filter(|(_, domain)| !domain.is_fixed())
            .map(|(index, domain)| {
                let variable = VarId::new(index);
                (variable, domain.size(), self.model.watches(variable).len())
            })
            .min_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)).then(a.0.cmp(&b.0)))
            .map(|(variable, _, _)| variable)
    }

    #[inline]
    fn enqueue(&mut self, index: PropagatorIndex) {
        if !self.queued.contains(index.get()) {
            self.queued.insert(index.get());
            self.queue.push_back(index);
        }
    }

    fn enqueue_watchers_of_changed(&mut self) {
        let model = self.model;
        self.store.drain_changed(&mut self.changed);
        for variable in std::mem::take(&mut self.changed) {
            for &index in model.watches(variable) {
                self.enqueue(index);
            }
        }
    }

    /// Runs queued propagators until no domain changes.
    fn propagate(&mut self) -> Result<(), Conflict> {
        let model = self.model;
        loop {
            self.enqueue_watchers_of_changed();
            let Some(index) = self.queue.pop_front() else {
                return Ok(());
            };
            self.queued.set(index.get(), false);
            self.stats.on_propagation();
            if let Err(conflict) = model.propagator(index).propagate(&mut self.store) {
                trace!(
                    propagator = model.propagator(index).name(),
                    "propagation conflict"
                );
                self.clear_queue();
                return Err(conflict);
            }
        }
    }

    fn clear_queue(&mut self) {
        for index in self.queue.drain(..) {
            self.queued.set(index.get(), false);
        }
        self.store.drain_changed(&mut self.changed);
        self.changed.clear();
    }

    fn valuation(&self) -> Valuation {
        let values = self
            .store
            .domains()
            .iter()
            .map(|domain| domain.min())
            .collect();
        Valuation::new(values, self.model.interval_starts())
    }

    /// Checks `valuation` against every declared domain and constraint.
    fn verify(&self, valuation: &Valuation) -> bool {
        let within_domains = self
            .model
            .domains()
            .iter()
            .zip(valuation.values())
            .all(|(domain, &value)| domain.contains(value));
        within_domains
            && self
                .model
                .propagators()
                .iter()
                .all(|propagator| propagator.is_satisfied(valuation))
    }
}

fn status_name(status: &SolveStatus) -> &'static str {
    match status {
        SolveStatus::Satisfied(_) => "satisfied",
        SolveStatus::Infeasible => "infeasible",
        SolveStatus::Unknown(_) => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monitor::search_monitor::SearchMonitor, propagators::linear::Comparison,
        result::SolveStatus,
    };

    #[derive(Debug, Default)]
    struct CountingMonitor {
        entered: usize,
        exited: usize,
        solutions: usize,
        backtracks: usize,
        stop_after: Option<u64>,
        steps: u64,
    }

    impl SearchMonitor for CountingMonitor {
        fn name(&self) -> &str {
            "CountingMonitor"
        }

        fn on_enter_search(&mut self, _model: &CpModel) {
            self.entered += 1;
        }

        fn on_step(&mut self, stats: &SearchStatistics) {
            self.steps = stats.steps;
        }

        fn on_solution_found(&mut self, _valuation: &Valuation, _stats: &SearchStatistics) {
            self.solutions += 1;
        }

        fn on_backtrack(&mut self, _stats: &SearchStatistics) {
            self.backtracks += 1;
        }

        fn on_exit_search(&mut self, _stats: &SearchStatistics) {
            self.exited += 1;
        }

        fn search_command(&self) -> SearchCommand {
            match self.stop_after {
                Some(limit) if self.steps >= limit => SearchCommand::Terminate("stop".into()),
                _ => SearchCommand::Continue,
            }
        }
    }

    fn pigeonhole(holes: i64, pigeons: usize) -> CpModel {
        let mut model = CpModel::new();
        let vars: Vec<VarId> = (0..pigeons)
            .map(|_| model.declare_variable(0, holes - 1).unwrap())
            .collect();
        model.add_all_different(&vars).unwrap();
        model
    }

    #[test]
    fn test_empty_model_is_satisfied() {
        let model = CpModel::new();
        let outcome = model.solve(&SearchConfig::default());
        assert_eq!(outcome.valuation().map(|v| v.num_variables()), Some(0));
    }

    #[test]
    fn test_empty_declared_domain_is_infeasible() {
        let mut model = CpModel::new();
        model.declare_variable(3, 1).unwrap();
        assert!(model.solve(&SearchConfig::default()).is_infeasible());
    }

    #[test]
    fn test_ascending_order_finds_lexicographic_first() {
        let model = pigeonhole(3, 3);
        let outcome = model.solve(&SearchConfig::default());
        assert_eq!(outcome.valuation().unwrap().values(), &[0, 1, 2]);
    }

    #[test]
    fn test_shuffled_order_is_deterministic_per_seed() {
        let model = pigeonhole(6, 6);
        let config = SearchConfig::builder()
            .with_value_order(ValueOrder::Shuffled)
            .with_seed(42)
            .build();
        let first = model.solve(&config);
        let second = model.solve(&config);
        assert!(first.is_satisfied());
        assert_eq!(first.valuation(), second.valuation());
    }

    #[test]
    fn test_monitor_lifecycle_and_backtracks() {
        // Root propagation cannot see that `a == b` contradicts `a != b`.
        let mut model = pigeonhole(4, 3);
        model.add_equality(VarId::new(0), VarId::new(1)).unwrap();
        let mut monitor = CountingMonitor::default();
        let outcome = model.solve_with_monitor(&SearchConfig::default(), &mut monitor);
        assert!(outcome.is_infeasible());
        assert_eq!(monitor.entered, 1);
        assert_eq!(monitor.exited, 1);
        assert_eq!(monitor.solutions, 0);
        assert!(monitor.backtracks > 0);
        assert_eq!(outcome.statistics.solutions_found, 0);
    }

    #[test]
    fn test_monitor_can_stop_search() {
        let model = pigeonhole(8, 8);
        let mut monitor = CountingMonitor {
            stop_after: Some(1),
            ..CountingMonitor::default()
        };
        let outcome = model.solve_with_monitor(&SearchConfig::default(), &mut monitor);
        assert_eq!(outcome.status, SolveStatus::Unknown("stop".into()));
        assert_eq!(monitor.exited, 1);
    }

    #[test]
    fn test_statistics_are_coherent() {
        let mut model = CpModel::new();
        let x = model.declare_variable(0, 9).unwrap();
        let y = model.declare_variable(0, 9).unwrap();
        model
            .add_linear(&[(1, x), (-1, y)], Comparison::Equal, 5)
            .unwrap();
        model.add_all_different(&[x, y]).unwrap();
        let outcome = model.solve(&SearchConfig::default());
        let stats = &outcome.statistics;
        let valuation = outcome.valuation().unwrap();
        assert_eq!(valuation.value(x) - valuation.value(y), 5);
        assert_eq!(stats.solutions_found, 1);
        assert!(stats.nodes_explored >= stats.failures);
        assert!(stats.max_depth <= 2);
        assert!(stats.propagations > 0);
    }
}
