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
    index::{IntervalId, VarId},
    stats::SearchStatistics,
};

/// One value per variable of a `CpModel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valuation {
    values: Vec<i64>,
    interval_starts: Vec<VarId>,
}

impl Valuation {
    /// Creates a valuation from per-variable values and the start variable of
    /// every interval.
    #[inline]
    pub fn new(values: Vec<i64>, interval_starts: Vec<VarId>) -> Self {
        Self {
            values,
            interval_starts,
        }
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Returns the value of `variable`.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is not a variable of the solved model.
    #[inline]
    pub fn value(&self, variable: VarId) -> i64 {
        let index = variable.get();
        debug_assert!(
            index < self.values.len(),
            "called `Valuation::value` with variable out of bounds: the len is {} but the index is {}",
            self.values.len(),
            index
        );

        self.values[index]
    }

    /// Returns the start of `interval`.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is not an interval of the solved model.
    #[inline]
    pub fn start(&self, interval: IntervalId) -> i64 {
        let index = interval.get();
        debug_assert!(
            index < self.interval_starts.len(),
            "called `Valuation::start` with interval out of bounds: the len is {} but the index is {}",
            self.interval_starts.len(),
            index
        );

        self.value(self.interval_starts[index])
    }

    #[inline]
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// The result of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// A valuation satisfying every constraint.
    Satisfied(Valuation),
    /// The search tree was exhausted without a solution.
    Infeasible,
    /// The search was stopped before it could decide. The string is the
    /// reason reported by the monitor that stopped it.
    Unknown(String),
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Satisfied(valuation) => {
                write!(f, "Satisfied({} variables)", valuation.num_variables())
            }
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unknown(reason) => write!(f, "Unknown: {}", reason),
        }
    }
}

/// The status of a search together with its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub statistics: SearchStatistics,
}

impl SolveOutcome {
    #[inline]
    pub fn new(status: SolveStatus, statistics: SearchStatistics) -> Self {
        Self { status, statistics }
    }

    #[inline]
    pub fn is_satisfied(&self) -> bool {
        matches!(self.status, SolveStatus::Satisfied(_))
    }

    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.status, SolveStatus::Infeasible)
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self.status, SolveStatus::Unknown(_))
    }

    /// Returns the valuation, if one was found.
    #[inline]
    pub fn valuation(&self) -> Option<&Valuation> {
        match &self.status {
            SolveStatus::Satisfied(valuation) => Some(valuation),
            _ => None,
        }
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolveOutcome(status: {}, nodes: {}, time: {:.2?})",
            self.status, self.statistics.nodes_explored, self.statistics.time_total
        )
    }
}
