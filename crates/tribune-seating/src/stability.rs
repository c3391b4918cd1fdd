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

//! Stability runs and the constraints that keep a delegate's seat.
//!
//! A delegate attending sessions `s` and `s + 1` must sit on the same seat in
//! both. After a skipped session the seat is free again, so a delegate's
//! attendance splits into *stability runs*: maximal ranges of consecutive
//! attended sessions. Only runs of two or more sessions carry constraints.

use crate::decoder::{BlockLayout, NaiveLayout};
use tribune_core::math::interval::ClosedOpenInterval;
use tribune_cp::{
    error::EngineError, index::VarId, model::CpModel, propagators::linear::Comparison,
};
use tribune_model::{
    index::{DelegateIndex, SessionIndex},
    model::SeatingModel,
};

/// A maximal range of consecutive sessions attended by one delegate.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StabilityRun {
    delegate: DelegateIndex,
    sessions: ClosedOpenInterval<usize>,
}

impl StabilityRun {
    #[inline]
    pub fn delegate(&self) -> DelegateIndex {
        self.delegate
    }

    #[inline]
    pub fn first_session(&self) -> SessionIndex {
        SessionIndex::new(self.sessions.start())
    }

    /// Returns the number of sessions in the run.
    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns `true` if the run spans at least two sessions and therefore
    /// pins a seat.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.len() >= 2
    }

    /// Iterates over the sessions of the run in order.
    #[inline]
    pub fn sessions(&self) -> impl Iterator<Item = SessionIndex> + use<> {
        self.sessions.iter().map(SessionIndex::new)
    }

    /// Iterates over the pairs `(s, s + 1)` inside the run.
    pub fn consecutive_pairs(&self) -> impl Iterator<Item = (SessionIndex, SessionIndex)> + use<> {
        let start = self.sessions.start();
        let end = self.sessions.end();
        (start..end.saturating_sub(1))
            .map(SessionIndex::new)
            .map(|session| (session, session.next()))
    }
}

impl std::fmt::Display for StabilityRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StabilityRun(delegate: {}, sessions: {})",
            self.delegate.get(),
            self.sessions
        )
    }
}

/// Returns the stability runs of `delegate_index` in session order,
/// including single-session runs.
pub fn stability_runs(model: &SeatingModel, delegate_index: DelegateIndex) -> Vec<StabilityRun> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for session in model.sessions() {
        match (model.attends(delegate_index, session), open) {
            (true, None) => open = Some(session.get()),
            (false, Some(start)) => {
                runs.push(StabilityRun {
                    delegate: delegate_index,
                    sessions: ClosedOpenInterval::new(start, session.get()),
                });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(StabilityRun {
            delegate: delegate_index,
            sessions: ClosedOpenInterval::new(start, model.num_sessions()),
        });
    }
    runs
}

/// Returns every run of two or more sessions, by delegate then session.
pub fn linked_runs(model: &SeatingModel) -> Vec<StabilityRun> {
    model
        .delegates()
        .flat_map(|delegate| stability_runs(model, delegate))
        .filter(StabilityRun::is_linked)
        .collect()
}

/// Posts the stability constraints of an encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct StabilityLinker;

impl StabilityLinker {
    /// Equates the seat variables of every consecutive pair inside a run.
    ///
    /// Returns the number of posted equalities.
    pub fn link_seats(
        model: &SeatingModel,
        cp_model: &mut CpModel,
        layout: &NaiveLayout,
    ) -> Result<usize, EngineError> {
        let mut posted = 0;
        for run in linked_runs(model) {
            let delegate = run.delegate();
            for (before, after) in run.consecutive_pairs() {
                if let (Some(left), Some(right)) = (
                    layout.seat_variable(delegate, before),
                    layout.seat_variable(delegate, after),
                ) {
                    cp_model.add_equality(left, right)?;
                    posted += 1;
                }
            }
        }
        Ok(posted)
    }

    /// Declares one seat variable per linked run and ties it into the block
    /// of every session of the run with `start ≤ seat ≤ start + k - 1`.
    /// Within one block the pinned seats are pairwise distinct.
    ///
    /// Returns the number of declared seat variables.
    pub fn pin_seats(
        model: &SeatingModel,
        cp_model: &mut CpModel,
        layout: &mut BlockLayout,
    ) -> Result<usize, EngineError> {
        let last_seat = model.num_seats() as i64 - 1;
        let runs = linked_runs(model);
        for run in &runs {
            let delegate = run.delegate();
            let organization = model.delegate_organization(delegate);
            let seat = cp_model.declare_variable(0, last_seat)?;
            for session in run.sessions() {
                let Some(block) = layout.block(organization, session) else {
                    continue;
                };
                let start = cp_model.interval_start(block);
                let length = cp_model.interval_length(block);
                cp_model.add_linear(&[(1, start), (-1, seat)], Comparison::LessOrEqual, 0)?;
                cp_model.add_linear(
                    &[(1, seat), (-1, start)],
                    Comparison::LessOrEqual,
                    length - 1,
                )?;
                layout.pin(delegate, session, seat);
            }
        }

        for organization in model.organizations() {
            for session in model.sessions() {
                let pinned: Vec<VarId> = model
                    .attendees(organization, session)
                    .filter_map(|delegate| layout.pinned_seat(delegate, session))
                    .collect();
                if pinned.len() >= 2 {
                    cp_model.add_all_different(&pinned)?;
                }
            }
        }
        Ok(runs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribune_model::model::SeatingModelBuilder;

    fn model() -> SeatingModel {
        let mut builder = SeatingModelBuilder::new(["s0", "s1", "s2", "s3", "s4"]);
        builder
            .add_row("A", 4)
            .add_organization("X")
            .add_delegate("X", "full", [true, true, true, true, true])
            .add_delegate("X", "gap", [true, true, false, true, true])
            .add_delegate("X", "single", [false, false, true, false, false]);
        builder.build().unwrap()
    }

    fn spans(runs: &[StabilityRun]) -> Vec<(usize, usize)> {
        runs.iter()
            .map(|run| (run.first_session().get(), run.len()))
            .collect()
    }

    #[test]
    fn test_runs_split_at_skipped_sessions() {
        let model = model();
        assert_eq!(spans(&stability_runs(&model, DelegateIndex::new(0))), vec![(0, 5)]);
        assert_eq!(
            spans(&stability_runs(&model, DelegateIndex::new(1))),
            vec![(0, 2), (3, 2)]
        );
        assert_eq!(spans(&stability_runs(&model, DelegateIndex::new(2))), vec![(2, 1)]);
    }

    #[test]
    fn test_linked_runs_skip_single_sessions() {
        let model = model();
        let runs = linked_runs(&model);
        assert_eq!(runs.len(), 3);
        assert!(runs.iter().all(StabilityRun::is_linked));
        assert!(runs.iter().all(|run| run.delegate() != DelegateIndex::new(2)));
    }

    #[test]
    fn test_consecutive_pairs() {
        let model = model();
        let run = stability_runs(&model, DelegateIndex::new(0))[0];
        let pairs: Vec<(usize, usize)> = run
            .consecutive_pairs()
            .map(|(a, b)| (a.get(), b.get()))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);

        let single = stability_runs(&model, DelegateIndex::new(2))[0];
        assert_eq!(single.consecutive_pairs().count(), 0);
    }

    #[test]
    fn test_display() {
        let model = model();
        let run = stability_runs(&model, DelegateIndex::new(1))[1];
        assert_eq!(run.to_string(), "StabilityRun(delegate: 1, sessions: [3, 5))");
    }
}
