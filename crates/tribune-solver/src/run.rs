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

//! The lifecycle of one seating encoding.
//!
//! ```text
//! Built ──encode──▶ Encoded ──solve──▶ Solving ──▶ Solved
//!   │                  ▲                    ├────▶ Infeasible
//!   │                  └──── solve again ───┼────▶ Cancelled
//!   └─────────────────▶ SolverError ◀───────┘
//! ```
//!
//! Solving never changes the encoded engine model, so a run that ended
//! `Solved`, `Infeasible`, or `Cancelled` may be solved again, for example
//! with a larger time limit or another seed. `SolverError` is final.

use crate::{error::SeatingError, outcome::SeatingOutcome};
use tracing::debug;
use tribune_cp::{
    config::SearchConfig,
    monitor::search_monitor::SearchMonitor,
    result::{SolveOutcome, SolveStatus},
    stats::SearchStatistics,
};
use tribune_model::model::SeatingModel;
use tribune_seating::encoder::{EncodedSeating, EncodingStats, SeatingEncoder};

/// The state of a `SeatingRun`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RunState {
    Built,
    Encoded,
    Solving,
    Solved,
    Infeasible,
    Cancelled,
    SolverError,
}

impl RunState {
    /// Returns `true` for states a solve ends in.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Solved | RunState::Infeasible | RunState::Cancelled | RunState::SolverError
        )
    }

    /// Returns `true` if the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Built, Encoded)
                | (Built, SolverError)
                | (Encoded, Solving)
                | (Solving, Solved)
                | (Solving, Infeasible)
                | (Solving, Cancelled)
                | (Solving, SolverError)
                | (Solved, Encoded)
                | (Infeasible, Encoded)
                | (Cancelled, Encoded)
        )
    }

    fn advance(&mut self, next: RunState) -> Result<(), SeatingError> {
        if !self.can_transition_to(next) {
            return Err(SeatingError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Built => "Built",
            RunState::Encoded => "Encoded",
            RunState::Solving => "Solving",
            RunState::Solved => "Solved",
            RunState::Infeasible => "Infeasible",
            RunState::Cancelled => "Cancelled",
            RunState::SolverError => "SolverError",
        };
        f.write_str(name)
    }
}

/// One encoding of a model, solved one or more times.
pub struct SeatingRun<'a> {
    model: &'a SeatingModel,
    encoder: &'a dyn SeatingEncoder,
    state: RunState,
    encoded: Option<EncodedSeating>,
    statistics: Option<SearchStatistics>,
}

impl<'a> SeatingRun<'a> {
    /// Creates a run in state `Built`.
    #[inline]
    pub fn new(model: &'a SeatingModel, encoder: &'a dyn SeatingEncoder) -> Self {
        Self {
            model,
            encoder,
            state: RunState::Built,
            encoded: None,
            statistics: None,
        }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn encoder_name(&self) -> &'static str {
        self.encoder.name()
    }

    /// Returns the encoding once `encode` succeeded.
    #[inline]
    pub fn encoded(&self) -> Option<&EncodedSeating> {
        self.encoded.as_ref()
    }

    /// Returns the statistics of the most recent search.
    #[inline]
    pub fn statistics(&self) -> Option<&SearchStatistics> {
        self.statistics.as_ref()
    }

    /// Encodes the model: `Built → Encoded`.
    ///
    /// # Errors
    ///
    /// `SeatingError::InvalidTransition` unless the run is `Built`, and
    /// `SeatingError::Solver` if the engine rejects the encoding, which moves
    /// the run to `SolverError`.
    pub fn encode(&mut self) -> Result<&EncodingStats, SeatingError> {
        if self.state != RunState::Built {
            return Err(SeatingError::InvalidTransition {
                from: self.state,
                to: RunState::Encoded,
            });
        }
        match self.encoder.encode(self.model) {
            Ok(encoded) => {
                self.state.advance(RunState::Encoded)?;
                debug!(encoder = self.encoder.name(), stats = %encoded.stats(), "model encoded");
                Ok(self.encoded.insert(encoded).stats())
            }
            Err(error) => {
                self.state.advance(RunState::SolverError)?;
                Err(SeatingError::Solver(error))
            }
        }
    }

    /// Solves the encoding: `Encoded → Solving → terminal`.
    pub fn solve(&mut self, config: &SearchConfig) -> Result<SeatingOutcome, SeatingError> {
        self.solve_inner(config, None)
    }

    /// Like `solve`, with `monitor` consulted by the search.
    pub fn solve_with_monitor(
        &mut self,
        config: &SearchConfig,
        monitor: &mut dyn SearchMonitor,
    ) -> Result<SeatingOutcome, SeatingError> {
        self.solve_inner(config, Some(monitor))
    }

    fn solve_inner(
        &mut self,
        config: &SearchConfig,
        monitor: Option<&mut dyn SearchMonitor>,
    ) -> Result<SeatingOutcome, SeatingError> {
        let Some(encoded) = self.encoded.as_ref() else {
            return Err(SeatingError::InvalidTransition {
                from: self.state,
                to: RunState::Solving,
            });
        };
        if matches!(
            self.state,
            RunState::Solved | RunState::Infeasible | RunState::Cancelled
        ) {
            self.state.advance(RunState::Encoded)?;
        }
        self.state.advance(RunState::Solving)?;

        if let Some(shortfall) = encoded.shortfall() {
            debug!(
                session = self.model.session_name(shortfall.session),
                demand = shortfall.demand,
                seats = shortfall.seats,
                "demand exceeds capacity, skipping search"
            );
            self.statistics = Some(SearchStatistics::default());
            self.state.advance(RunState::Infeasible)?;
            return Ok(SeatingOutcome::Infeasible);
        }

        let SolveOutcome { status, statistics } = match monitor {
            Some(monitor) => encoded.cp_model().solve_with_monitor(config, monitor),
            None => encoded.cp_model().solve(config),
        };
        self.statistics = Some(statistics);

        match status {
            SolveStatus::Satisfied(valuation) => {
                let assignment = encoded.decode(self.model, &valuation);
                self.state.advance(RunState::Solved)?;
                Ok(SeatingOutcome::Solved(assignment))
            }
            SolveStatus::Infeasible => {
                self.state.advance(RunState::Infeasible)?;
                Ok(SeatingOutcome::Infeasible)
            }
            SolveStatus::Unknown(reason) => {
                self.state.advance(RunState::Cancelled)?;
                Ok(SeatingOutcome::Unresolved(reason))
            }
        }
    }
}

impl std::fmt::Debug for SeatingRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatingRun")
            .field("encoder", &self.encoder.name())
            .field("state", &self.state)
            .finish()
    }
}

impl std::fmt::Display for SeatingRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeatingRun(encoder: {}, state: {})",
            self.encoder.name(),
            self.state
        )
    }
}
