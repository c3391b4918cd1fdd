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
    config::DEFAULT_CLOCK_CHECK_MASK,
    model::CpModel,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::Valuation,
    stats::SearchStatistics,
};
use std::time::{Duration, Instant};
use tracing::debug;

/// Emits a progress line at `debug` level every `log_interval`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
        }
    }

    fn log_line(&mut self, stats: &SearchStatistics) {
        let now = Instant::now();
        debug!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            failures = stats.failures,
            backtracks = stats.backtracks,
            max_depth = stats.max_depth,
            "search progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), DEFAULT_CLOCK_CHECK_MASK)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {:.2?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, model: &CpModel) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        debug!(
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "search started"
        );
    }

    fn on_step(&mut self, stats: &SearchStatistics) {
        if (stats.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(stats);
        }
    }

    fn on_solution_found(&mut self, _valuation: &Valuation, stats: &SearchStatistics) {
        debug!(nodes = stats.nodes_explored, "solution found");
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        debug!(
            elapsed = ?self.start_time.elapsed(),
            nodes = stats.nodes_explored,
            failures = stats.failures,
            "search finished"
        );
    }

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
