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

//! # Seating Solver
//!
//! The entry point for callers: configure a `SeatingSolver` once, then
//! solve any number of models with it.
//!
//! ## Strategies
//!
//! - `Naive`: one seat variable per attendance. Small and direct, but its
//!   size grows with the number of delegates.
//! - `Block`: one interval per (organization, session). Its size depends on
//!   organizations and sessions only.
//! - `Auto`: `Naive` up to `naive_limit` delegates, `Block` beyond.
//! - `Portfolio`: runs both encodings in scoped threads. A seating from the
//!   block worker or a proof of infeasibility from either worker raises a
//!   shared stop flag, which the other worker's `InterruptMonitor` picks up.
//!   A naive seating never stops the block worker, so the reported seating
//!   is the block encoding's whenever it finds one within the time limit,
//!   and the same seed gives the same seating.
//!
//! With a `TranchePlanner` configured, halls larger than one tranche are
//! split and each tranche is solved on its own with the chosen strategy.

use crate::{
    error::SeatingError,
    outcome::{SeatingOutcome, SeatingReport},
    run::SeatingRun,
    tranche::TranchePlanner,
};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};
use tribune_cp::{
    config::{SearchConfig, ValueOrder},
    monitor::interrupt::InterruptMonitor,
    stats::SearchStatistics,
};
use tribune_model::{
    assignment::Assignment,
    model::{SeatingModel, SeatingModelBuilder},
};
use tribune_seating::{block::BlockEncoder, encoder::SeatingEncoder, naive::NaiveEncoder};

/// Delegate count up to which `Strategy::default()` uses the naive encoding.
pub const DEFAULT_NAIVE_LIMIT: usize = 200;

/// Which encoding a `SeatingSolver` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Naive,
    Block,
    Auto { naive_limit: usize },
    Portfolio,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Auto {
            naive_limit: DEFAULT_NAIVE_LIMIT,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Naive => write!(f, "Naive"),
            Strategy::Block => write!(f, "Block"),
            Strategy::Auto { naive_limit } => write!(f, "Auto(naive_limit: {})", naive_limit),
            Strategy::Portfolio => write!(f, "Portfolio"),
        }
    }
}

/// Solves seating models with a fixed configuration.
#[derive(Debug, Clone)]
pub struct SeatingSolver {
    strategy: Strategy,
    time_limit: Option<Duration>,
    seed: u64,
    value_order: ValueOrder,
    log_interval: Option<Duration>,
    tranche_planner: Option<TranchePlanner>,
}

impl Default for SeatingSolver {
    fn default() -> Self {
        SeatingSolverBuilder::new().build()
    }
}

impl SeatingSolver {
    #[inline]
    pub fn builder() -> SeatingSolverBuilder {
        SeatingSolverBuilder::new()
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the time limit of one search. Every tranche and every
    /// portfolio worker gets the full limit.
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn value_order(&self) -> ValueOrder {
        self.value_order
    }

    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval
    }

    #[inline]
    pub fn tranche_planner(&self) -> Option<&TranchePlanner> {
        self.tranche_planner.as_ref()
    }

    /// Returns the engine configuration every search of this solver uses.
    pub fn search_config(&self) -> SearchConfig {
        let builder = SearchConfig::builder()
            .with_optional_time_limit(self.time_limit)
            .with_seed(self.seed)
            .with_value_order(self.value_order);
        match self.log_interval {
            Some(interval) => builder.with_log_interval(interval).build(),
            None => builder.build(),
        }
    }

    /// Validates the builder's input and solves the resulting model.
    ///
    /// # Errors
    ///
    /// `SeatingError::InvalidInput` for a malformed model, otherwise as
    /// `solve`.
    pub fn solve_input(&self, builder: SeatingModelBuilder) -> Result<SeatingReport, SeatingError> {
        let model = builder.build()?;
        self.solve(&model)
    }

    /// Solves `model`.
    ///
    /// Infeasibility and running out of time are outcomes, not errors.
    ///
    /// # Errors
    ///
    /// `SeatingError::Solver` if the engine rejects an encoding, and
    /// `SeatingError::WorkerPanicked` if a portfolio worker panicked.
    pub fn solve(&self, model: &SeatingModel) -> Result<SeatingReport, SeatingError> {
        let start = Instant::now();
        info!(
            delegates = model.num_delegates(),
            organizations = model.num_organizations(),
            seats = model.num_seats(),
            rows = model.num_rows(),
            sessions = model.num_sessions(),
            strategy = %self.strategy,
            "solving seating model"
        );

        if let Some(shortfall) = model.capacity_shortfall() {
            info!(%shortfall, "demand exceeds capacity");
            let report = SeatingReport::new(
                SeatingOutcome::Infeasible,
                None,
                SearchStatistics::default(),
                start.elapsed(),
            );
            info!(outcome = %report.outcome(), "seating finished");
            return Ok(report);
        }

        let report = match &self.tranche_planner {
            Some(planner) if model.num_seats() > planner.seats_per_tranche() => {
                self.solve_tranches(model, planner, start)?
            }
            _ => self.solve_direct(model)?,
        };
        info!(
            outcome = %report.outcome(),
            encoder = report.encoder().unwrap_or("none"),
            nodes = report.statistics().nodes_explored,
            duration = ?report.duration(),
            "seating finished"
        );
        Ok(report)
    }

    fn solve_direct(&self, model: &SeatingModel) -> Result<SeatingReport, SeatingError> {
        match self.strategy {
            Strategy::Naive => self.run_single(model, &NaiveEncoder, None),
            Strategy::Block => self.run_single(model, &BlockEncoder, None),
            Strategy::Auto { naive_limit } if model.num_delegates() <= naive_limit => {
                self.run_single(model, &NaiveEncoder, None)
            }
            Strategy::Auto { .. } => self.run_single(model, &BlockEncoder, None),
            Strategy::Portfolio => self.run_portfolio(model),
        }
    }

    fn run_single(
        &self,
        model: &SeatingModel,
        encoder: &dyn SeatingEncoder,
        stop_flag: Option<&AtomicBool>,
    ) -> Result<SeatingReport, SeatingError> {
        let start = Instant::now();
        let config = self.search_config();
        let mut run = SeatingRun::new(model, encoder);
        run.encode()?;
        let outcome = match stop_flag {
            Some(flag) => run.solve_with_monitor(&config, &mut InterruptMonitor::new(flag))?,
            None => run.solve(&config)?,
        };
        debug!(encoder = encoder.name(), state = %run.state(), "run finished");
        Ok(SeatingReport::new(
            outcome,
            Some(encoder.name()),
            run.statistics().cloned().unwrap_or_default(),
            start.elapsed(),
        ))
    }

    fn run_portfolio(&self, model: &SeatingModel) -> Result<SeatingReport, SeatingError> {
        let start = Instant::now();
        let stop_flag = AtomicBool::new(false);
        // The first encoder is the primary one. Its seating is preferred.
        let encoders: [&dyn SeatingEncoder; 2] = [&BlockEncoder, &NaiveEncoder];

        let results: Vec<Result<SeatingReport, SeatingError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = encoders
                .iter()
                .enumerate()
                .map(|(index, &encoder)| {
                    let stop_flag = &stop_flag;
                    scope.spawn(move || {
                        let result = self.run_single(model, encoder, Some(stop_flag));
                        if matches!(&result, Ok(report) if stops_portfolio(report, index == 0)) {
                            debug!(
                                encoder = encoder.name(),
                                "portfolio worker decided, stopping the others"
                            );
                            stop_flag.store(true, Ordering::Relaxed);
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|payload| {
                        Err(SeatingError::WorkerPanicked(panic_message(&*payload)))
                    })
                })
                .collect()
        });

        let winner = select_winner(results)?;
        Ok(SeatingReport::new(
            winner.outcome().clone(),
            winner.encoder(),
            winner.statistics().clone(),
            start.elapsed(),
        ))
    }

    fn solve_tranches(
        &self,
        model: &SeatingModel,
        planner: &TranchePlanner,
        start: Instant,
    ) -> Result<SeatingReport, SeatingError> {
        let plan = match planner.plan(model) {
            Ok(plan) => plan,
            Err(error) => {
                warn!(%error, "tranche planning failed");
                return Ok(SeatingReport::new(
                    SeatingOutcome::Unresolved(error.to_string()),
                    None,
                    SearchStatistics::default(),
                    start.elapsed(),
                ));
            }
        };
        debug!(tranches = plan.len(), "model split into tranches");

        let mut assignment = Assignment::for_model(model);
        let mut statistics = SearchStatistics::default();
        let mut encoder = None;
        for (index, tranche) in plan.tranches().iter().enumerate() {
            let restricted = model.restrict(tranche.rows(), tranche.organizations());
            let report = self.solve_direct(restricted.model())?;
            statistics.accumulate(report.statistics());
            encoder = encoder.or(report.encoder());
            debug!(
                tranche = index,
                seats = tranche.seats(),
                organizations = tranche.organizations().len(),
                outcome = %report.outcome(),
                "tranche solved"
            );

            match report.into_outcome() {
                SeatingOutcome::Solved(part) => {
                    assignment.absorb(&part, restricted.row_map(), restricted.delegate_map());
                }
                outcome => {
                    return Ok(SeatingReport::new(
                        SeatingOutcome::Unresolved(format!("tranche {} ended {}", index, outcome)),
                        encoder,
                        statistics,
                        start.elapsed(),
                    ));
                }
            }
        }

        debug_assert!(assignment.verify(model).is_ok());
        Ok(SeatingReport::new(
            SeatingOutcome::Solved(assignment),
            encoder,
            statistics,
            start.elapsed(),
        ))
    }
}

impl std::fmt::Display for SeatingSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeatingSolver(strategy: {}, time_limit: {:?}, seed: {}, tranches: {})",
            self.strategy,
            self.time_limit,
            self.seed,
            self.tranche_planner.is_some()
        )
    }
}

/// Returns `true` if `report` ends the portfolio. Only the primary worker
/// stops the others with a seating.
fn stops_portfolio(report: &SeatingReport, primary: bool) -> bool {
    match report.outcome() {
        SeatingOutcome::Solved(_) => primary,
        SeatingOutcome::Infeasible => true,
        SeatingOutcome::Unresolved(_) => false,
    }
}

/// Picks the portfolio result to report: a seating over a proof of
/// infeasibility, over an error, over an undecided run. Among equals the
/// earlier result wins.
fn select_winner(
    results: Vec<Result<SeatingReport, SeatingError>>,
) -> Result<SeatingReport, SeatingError> {
    fn rank(result: &Result<SeatingReport, SeatingError>) -> u8 {
        match result {
            Ok(report) if report.outcome().is_solved() => 3,
            Ok(report) if report.outcome().is_infeasible() => 2,
            Err(_) => 1,
            Ok(_) => 0,
        }
    }

    let mut best: Option<Result<SeatingReport, SeatingError>> = None;
    for result in results {
        let better = best
            .as_ref()
            .is_none_or(|current| rank(&result) > rank(current));
        if better {
            best = Some(result);
        }
    }
    best.unwrap_or_else(|| {
        Err(SeatingError::WorkerPanicked(
            "portfolio ran without workers".to_string(),
        ))
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Builder for `SeatingSolver`.
#[derive(Debug, Clone, Default)]
pub struct SeatingSolverBuilder {
    strategy: Strategy,
    time_limit: Option<Duration>,
    seed: u64,
    value_order: ValueOrder,
    log_interval: Option<Duration>,
    tranche_planner: Option<TranchePlanner>,
}

impl SeatingSolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the seed of the value ordering. A seed other than the default
    /// only changes the result together with `ValueOrder::Shuffled`.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    pub fn with_value_order(mut self, order: ValueOrder) -> Self {
        self.value_order = order;
        self
    }

    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    /// Splits models with more seats than one tranche before solving.
    #[inline]
    pub fn with_tranche_planner(mut self, planner: TranchePlanner) -> Self {
        self.tranche_planner = Some(planner);
        self
    }

    #[inline]
    pub fn build(self) -> SeatingSolver {
        SeatingSolver {
            strategy: self.strategy,
            time_limit: self.time_limit,
            seed: self.seed,
            value_order: self.value_order,
            log_interval: self.log_interval,
            tranche_planner: self.tranche_planner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribune_model::{
        error::ModelError,
        index::{DelegateIndex, SessionIndex},
    };

    fn pairs_model(rows: &[usize], organizations: usize) -> SeatingModel {
        let mut builder = SeatingModelBuilder::new(["s0"]);
        for (index, &seats) in rows.iter().enumerate() {
            builder.add_row(format!("R{index}"), seats);
        }
        for organization in 0..organizations {
            let name = format!("O{organization}");
            builder
                .add_organization(name.clone())
                .add_delegate(name.clone(), "a", [true])
                .add_delegate(name, "b", [true]);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_strategy_display_and_default() {
        assert_eq!(
            Strategy::default(),
            Strategy::Auto {
                naive_limit: DEFAULT_NAIVE_LIMIT
            }
        );
        assert_eq!(Strategy::Portfolio.to_string(), "Portfolio");
        assert_eq!(
            Strategy::Auto { naive_limit: 3 }.to_string(),
            "Auto(naive_limit: 3)"
        );
    }

    #[test]
    fn test_search_config_carries_settings() {
        let solver = SeatingSolver::builder()
            .with_time_limit(Duration::from_secs(2))
            .with_seed(7)
            .with_value_order(ValueOrder::Shuffled)
            .build();
        let config = solver.search_config();
        assert_eq!(config.time_limit(), Some(Duration::from_secs(2)));
        assert_eq!(config.seed(), 7);
        assert_eq!(config.value_order(), ValueOrder::Shuffled);
        assert_eq!(config.log_interval(), None);
    }

    #[test]
    fn test_auto_picks_encoder_by_size() {
        let model = pairs_model(&[4, 4], 3);
        let small = SeatingSolver::builder()
            .with_strategy(Strategy::Auto { naive_limit: 6 })
            .build();
        assert_eq!(small.solve(&model).unwrap().encoder(), Some("naive"));

        let large = SeatingSolver::builder()
            .with_strategy(Strategy::Auto { naive_limit: 5 })
            .build();
        assert_eq!(large.solve(&model).unwrap().encoder(), Some("block"));
    }

    #[test]
    fn test_every_strategy_solves() {
        let model = pairs_model(&[4, 4], 3);
        for strategy in [
            Strategy::Naive,
            Strategy::Block,
            Strategy::default(),
            Strategy::Portfolio,
        ] {
            let report = SeatingSolver::builder()
                .with_strategy(strategy)
                .build()
                .solve(&model)
                .unwrap();
            let assignment = report.outcome().assignment().unwrap();
            assert_eq!(assignment.verify(&model), Ok(()), "{strategy}");
        }
    }

    #[test]
    fn test_shortfall_skips_encoding() {
        let model = pairs_model(&[4], 3);
        let report = SeatingSolver::default().solve(&model).unwrap();
        assert!(report.outcome().is_infeasible());
        assert_eq!(report.encoder(), None);
    }

    #[test]
    fn test_portfolio_proves_infeasibility() {
        // Six seats for six delegates, but no row of three holds two pairs.
        let model = pairs_model(&[3, 3], 3);
        let report = SeatingSolver::builder()
            .with_strategy(Strategy::Portfolio)
            .build()
            .solve(&model)
            .unwrap();
        assert_eq!(report.outcome(), &SeatingOutcome::Infeasible);
        assert!(report.encoder().is_some());
    }

    #[test]
    fn test_solve_input_reports_invalid_input() {
        let builder = SeatingModelBuilder::new(Vec::<String>::new());
        assert_eq!(
            SeatingSolver::default().solve_input(builder).err(),
            Some(SeatingError::InvalidInput(ModelError::NoSessions))
        );
    }

    #[test]
    fn test_tranches_merge_into_one_assignment() {
        let model = pairs_model(&[10, 10, 10, 10], 6);
        let solver = SeatingSolver::builder()
            .with_strategy(Strategy::Block)
            .with_tranche_planner(
                TranchePlanner::new()
                    .with_seats_per_tranche(20)
                    .with_row_slack(0)
                    .with_row_force(1),
            )
            .build();
        let report = solver.solve(&model).unwrap();
        let assignment = report.outcome().assignment().unwrap();
        assert_eq!(assignment.verify(&model), Ok(()));
        assert_eq!(assignment.num_placements(), 12);
    }

    #[test]
    fn test_unplaceable_tranche_is_unresolved() {
        // The organization fits the hall, but no tranche of four seats once
        // the forced free seats are kept.
        let mut builder = SeatingModelBuilder::new(["s0"]);
        builder.add_row("A", 4).add_row("B", 4).add_organization("X");
        for delegate in 0..4 {
            builder.add_delegate("X", format!("x{delegate}"), [true]);
        }
        let model = builder.build().unwrap();
        let solver = SeatingSolver::builder()
            .with_tranche_planner(TranchePlanner::new().with_seats_per_tranche(4).with_row_slack(0))
            .build();
        let report = solver.solve(&model).unwrap();
        assert!(report.outcome().is_unresolved());
    }

    #[test]
    fn test_select_winner_prefers_solutions() {
        let unresolved = SeatingReport::new(
            SeatingOutcome::Unresolved("stopped".to_string()),
            Some("block"),
            SearchStatistics::default(),
            Duration::ZERO,
        );
        let infeasible = SeatingReport::new(
            SeatingOutcome::Infeasible,
            Some("naive"),
            SearchStatistics::default(),
            Duration::ZERO,
        );
        let winner = select_winner(vec![
            Ok(unresolved.clone()),
            Err(SeatingError::WorkerPanicked("boom".to_string())),
            Ok(infeasible),
        ])
        .unwrap();
        assert_eq!(winner.encoder(), Some("naive"));

        let winner = select_winner(vec![
            Ok(unresolved),
            Err(SeatingError::WorkerPanicked("boom".to_string())),
        ]);
        assert!(winner.is_err());
    }

    #[test]
    fn test_select_winner_keeps_the_primary_seating() {
        let seating = |encoder: &'static str| {
            let model = pairs_model(&[4], 1);
            let mut assignment = Assignment::for_model(&model);
            assignment.place(
                DelegateIndex::new(0),
                SessionIndex::new(0),
                model.seat_at(0),
            );
            SeatingReport::new(
                SeatingOutcome::Solved(assignment),
                Some(encoder),
                SearchStatistics::default(),
                Duration::ZERO,
            )
        };
        let winner = select_winner(vec![Ok(seating("block")), Ok(seating("naive"))]).unwrap();
        assert_eq!(winner.encoder(), Some("block"));
    }

    #[test]
    fn test_only_the_primary_seating_stops_the_portfolio() {
        let solved = SeatingReport::new(
            SeatingOutcome::Solved(Assignment::for_model(&pairs_model(&[4], 1))),
            Some("naive"),
            SearchStatistics::default(),
            Duration::ZERO,
        );
        assert!(stops_portfolio(&solved, true));
        assert!(!stops_portfolio(&solved, false));

        let infeasible = SeatingReport::new(
            SeatingOutcome::Infeasible,
            Some("naive"),
            SearchStatistics::default(),
            Duration::ZERO,
        );
        assert!(stops_portfolio(&infeasible, false));
    }

    #[test]
    fn test_portfolio_repeats_the_block_seating() {
        let mut builder = SeatingModelBuilder::new(["s0", "s1", "s2"]);
        builder.add_row("A", 10);
        for organization in ["X", "Y"] {
            builder.add_organization(organization);
            for member in 0..3 {
                let attendance = [true, member != 1, member != 2];
                builder.add_delegate(organization, format!("m{member}"), attendance);
            }
        }
        let model = builder.build().unwrap();

        let block = SeatingSolver::builder()
            .with_strategy(Strategy::Block)
            .with_seed(1)
            .build()
            .solve(&model)
            .unwrap();
        let expected = block.outcome().assignment().unwrap();

        let portfolio = SeatingSolver::builder()
            .with_strategy(Strategy::Portfolio)
            .with_seed(1)
            .build();
        for _ in 0..50 {
            let report = portfolio.solve(&model).unwrap();
            assert_eq!(report.encoder(), Some("block"));
            assert_eq!(report.outcome().assignment(), Some(expected));
        }
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(3_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
