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

use crate::{model::CpModel, result::Valuation, stats::SearchStatistics};

/// Command returned by a monitor to control the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Keep searching.
    Continue,
    /// Stop the search; the string is reported as the reason.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate({})", reason),
        }
    }
}

/// Hooks into the lifecycle of one search.
pub trait SearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;

    /// Called once before the root propagation.
    fn on_enter_search(&mut self, model: &CpModel);

    /// Called at the beginning of every iteration of the search loop.
    fn on_step(&mut self, stats: &SearchStatistics);

    /// Called when a complete valuation passed the final check.
    fn on_solution_found(&mut self, _valuation: &Valuation, _stats: &SearchStatistics) {}

    /// Called when an exhausted decision level is left.
    fn on_backtrack(&mut self, _stats: &SearchStatistics) {}

    /// Called once when the search returns, whatever the outcome.
    fn on_exit_search(&mut self, stats: &SearchStatistics);

    /// Asked after every `on_step` whether the search may go on.
    fn search_command(&self) -> SearchCommand;
}

impl std::fmt::Debug for dyn SearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn SearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

impl<M> SearchMonitor for &mut M
where
    M: SearchMonitor + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_enter_search(&mut self, model: &CpModel) {
        (**self).on_enter_search(model);
    }

    fn on_step(&mut self, stats: &SearchStatistics) {
        (**self).on_step(stats);
    }

    fn on_solution_found(&mut self, valuation: &Valuation, stats: &SearchStatistics) {
        (**self).on_solution_found(valuation, stats);
    }

    fn on_backtrack(&mut self, stats: &SearchStatistics) {
        (**self).on_backtrack(stats);
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        (**self).on_exit_search(stats);
    }

    fn search_command(&self) -> SearchCommand {
        (**self).search_command()
    }
}
