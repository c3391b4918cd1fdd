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

use std::time::Duration;
use tribune_cp::stats::SearchStatistics;
use tribune_model::assignment::Assignment;

/// The terminal result of a seating solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatingOutcome {
    /// A complete seating satisfying every rule.
    Solved(Assignment),
    /// Proven: no seating exists.
    Infeasible,
    /// The search stopped without a conclusion, e.g. on its time limit.
    Unresolved(String),
}

impl SeatingOutcome {
    #[inline]
    pub fn is_solved(&self) -> bool {
        matches!(self, SeatingOutcome::Solved(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SeatingOutcome::Infeasible)
    }

    #[inline]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, SeatingOutcome::Unresolved(_))
    }

    /// Returns `true` for outcomes that settle the question: solved or
    /// proven infeasible.
    #[inline]
    pub fn is_decisive(&self) -> bool {
        !self.is_unresolved()
    }

    #[inline]
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SeatingOutcome::Solved(assignment) => Some(assignment),
            _ => None,
        }
    }

    #[inline]
    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            SeatingOutcome::Solved(assignment) => Some(assignment),
            _ => None,
        }
    }
}

impl std::fmt::Display for SeatingOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatingOutcome::Solved(assignment) => {
                write!(f, "Solved({} placements)", assignment.num_placements())
            }
            SeatingOutcome::Infeasible => write!(f, "Infeasible"),
            SeatingOutcome::Unresolved(reason) => write!(f, "Unresolved({})", reason),
        }
    }
}

/// A `SeatingOutcome` together with how it was obtained.
#[derive(Debug, Clone)]
pub struct SeatingReport {
    outcome: SeatingOutcome,
    encoder: Option<&'static str>,
    statistics: SearchStatistics,
    duration: Duration,
}

impl SeatingReport {
    #[inline]
    pub fn new(
        outcome: SeatingOutcome,
        encoder: Option<&'static str>,
        statistics: SearchStatistics,
        duration: Duration,
    ) -> Self {
        Self {
            outcome,
            encoder,
            statistics,
            duration,
        }
    }

    #[inline]
    pub fn outcome(&self) -> &SeatingOutcome {
        &self.outcome
    }

    #[inline]
    pub fn into_outcome(self) -> SeatingOutcome {
        self.outcome
    }

    /// Returns the encoder whose search produced the outcome, or `None` if
    /// no search ran (e.g. a capacity shortfall).
    #[inline]
    pub fn encoder(&self) -> Option<&'static str> {
        self.encoder
    }

    /// Returns the search statistics, summed over tranches if the model was
    /// decomposed.
    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns the wall-clock time of the whole solve.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl std::fmt::Display for SeatingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeatingReport(outcome: {}, encoder: {}, nodes: {}, duration: {:.2?})",
            self.outcome,
            self.encoder.unwrap_or("none"),
            self.statistics.nodes_explored,
            self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let solved = SeatingOutcome::Solved(Assignment::new(2, 1));
        assert!(solved.is_solved() && solved.is_decisive());
        assert!(solved.assignment().is_some());
        assert!(SeatingOutcome::Infeasible.is_decisive());
        let unresolved = SeatingOutcome::Unresolved("time limit".into());
        assert!(unresolved.is_unresolved() && !unresolved.is_decisive());
        assert!(unresolved.into_assignment().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(SeatingOutcome::Infeasible.to_string(), "Infeasible");
        assert_eq!(
            SeatingOutcome::Unresolved("stop".into()).to_string(),
            "Unresolved(stop)"
        );
        let report = SeatingReport::new(
            SeatingOutcome::Infeasible,
            None,
            SearchStatistics::default(),
            Duration::ZERO,
        );
        assert!(
            report
                .to_string()
                .starts_with("SeatingReport(outcome: Infeasible, encoder: none, nodes: 0")
        );
    }
}
