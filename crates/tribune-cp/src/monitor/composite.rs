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
    index::MonitorIndex,
    model::CpModel,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::Valuation,
    stats::SearchStatistics,
};

/// A monitor that forwards every event to a list of monitors.
///
/// `search_command` returns the first `Terminate` in insertion order.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ");

        f.debug_struct("CompositeMonitor")
            .field("monitors", &names)
            .finish()
    }
}

impl std::fmt::Display for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .monitors
            .iter()
            .map(|m| m.name())
            .collect::<Vec<&str>>()
            .join(", ");

        write!(f, "CompositeMonitor([{}])", names)
    }
}

impl<'a> CompositeMonitor<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SearchMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Returns the monitor at `monitor_index`.
    ///
    /// # Panics
    ///
    /// Panics if `monitor_index` is out of bounds.
    #[inline]
    pub fn monitor(&self, monitor_index: MonitorIndex) -> &dyn SearchMonitor {
        let index = monitor_index.get();
        debug_assert!(
            index < self.monitors.len(),
            "called `CompositeMonitor::monitor` with monitor index out of bounds: the len is {} but the index is {}",
            self.monitors.len(),
            index
        );

        self.monitors[index].as_ref()
    }
}

impl<'a> FromIterator<Box<dyn SearchMonitor + 'a>> for CompositeMonitor<'a> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl SearchMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, model: &CpModel) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(model);
        }
    }

    fn on_step(&mut self, stats: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(stats);
        }
    }

    fn on_solution_found(&mut self, valuation: &Valuation, stats: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(valuation, stats);
        }
    }

    fn on_backtrack(&mut self, stats: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_backtrack(stats);
        }
    }

    fn on_exit_search(&mut self, stats: &SearchStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(stats);
        }
    }

    fn search_command(&self) -> SearchCommand {
        // Called on every step; a plain loop avoids building an iterator chain.
        for monitor in &self.monitors {
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                return SearchCommand::Terminate(reason);
            }
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::interrupt::InterruptMonitor;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct CountingMonitor<'a> {
        steps: &'a std::cell::Cell<u64>,
    }

    impl SearchMonitor for CountingMonitor<'_> {
        fn name(&self) -> &str {
            "CountingMonitor"
        }
        fn on_enter_search(&mut self, _model: &CpModel) {}
        fn on_step(&mut self, _stats: &SearchStatistics) {
            self.steps.set(self.steps.get() + 1);
        }
        fn on_exit_search(&mut self, _stats: &SearchStatistics) {}
        fn search_command(&self) -> SearchCommand {
            SearchCommand::Continue
        }
    }

    #[test]
    fn test_forwards_events_and_reports_first_terminate() {
        let steps = std::cell::Cell::new(0);
        let flag = AtomicBool::new(false);

        let mut composite = CompositeMonitor::new();
        composite.add_monitor(CountingMonitor { steps: &steps });
        composite.add_monitor(InterruptMonitor::new(&flag));
        assert_eq!(composite.len(), 2);

        composite.on_step(&SearchStatistics::default());
        composite.on_step(&SearchStatistics::default());
        assert_eq!(steps.get(), 2);
        assert_eq!(composite.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert!(matches!(
            composite.search_command(),
            SearchCommand::Terminate(_)
        ));
        assert_eq!(
            composite.monitor(MonitorIndex::new(1)).name(),
            "InterruptMonitor"
        );
    }

    #[test]
    fn test_display_lists_monitor_names() {
        let flag = AtomicBool::new(false);
        let composite: CompositeMonitor = vec![
            Box::new(InterruptMonitor::new(&flag)) as Box<dyn SearchMonitor>,
        ]
        .into_iter()
        .collect();
        assert_eq!(composite.to_string(), "CompositeMonitor([InterruptMonitor])");
    }
}
