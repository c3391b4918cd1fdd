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

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Iterations of the search loop.
    pub steps: u64,
    /// Decisions tried, successful or not.
    pub nodes_explored: u64,
    /// Decisions whose propagation failed.
    pub failures: u64,
    /// Exhausted decision levels that were left again.
    pub backtracks: u64,
    /// Propagator invocations.
    pub propagations: u64,
    /// The deepest decision level reached.
    pub max_depth: u64,
    /// Complete valuations that passed the final check.
    pub solutions_found: u64,
    /// Complete valuations that failed the final check.
    pub rejected_solutions: u64,
    /// Total time spent in the search.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add(1);
    }

    #[inline]
    pub fn on_propagation(&mut self) {
        self.propagations = self.propagations.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_rejected(&mut self) {
        self.rejected_solutions = self.rejected_solutions.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Adds the counters of `other`. The depth is the larger of the two.
    pub fn accumulate(&mut self, other: &SearchStatistics) {
        self.steps = self.steps.saturating_add(other.steps);
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.failures = self.failures.saturating_add(other.failures);
        self.backtracks = self.backtracks.saturating_add(other.backtracks);
        self.propagations = self.propagations.saturating_add(other.propagations);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        self.rejected_solutions = self
            .rejected_solutions
            .saturating_add(other.rejected_solutions);
        self.time_total += other.time_total;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Steps:                {}", self.steps)?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Failures:             {}", self.failures)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Propagations:         {}", self.propagations)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Solutions rejected:   {}", self.rejected_solutions)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_depth() {
        let mut stats = SearchStatistics::default();
        stats.on_node_explored();
        stats.on_node_explored();
        stats.on_failure();
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        assert_eq!(stats.nodes_explored, 2);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.max_depth, 4);
    }

    #[test]
    fn test_accumulate() {
        let mut total = SearchStatistics {
            nodes_explored: 3,
            max_depth: 5,
            time_total: Duration::from_millis(10),
            ..SearchStatistics::default()
        };
        let part = SearchStatistics {
            nodes_explored: 4,
            max_depth: 2,
            time_total: Duration::from_millis(5),
            ..SearchStatistics::default()
        };
        total.accumulate(&part);
        assert_eq!(total.nodes_explored, 7);
        assert_eq!(total.max_depth, 5);
        assert_eq!(total.time_total, Duration::from_millis(15));
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = SearchStatistics {
            steps: u64::MAX,
            ..SearchStatistics::default()
        };
        stats.on_step();
        assert_eq!(stats.steps, u64::MAX);
    }
}
