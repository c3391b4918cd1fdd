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

use crate::run::RunState;
use thiserror::Error;
use tribune_cp::error::EngineError;
use tribune_model::error::ModelError;

/// A failure that aborts a seating solve.
///
/// Infeasibility and exhausted time budgets are not errors; they are
/// reported as a `SeatingOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    /// The input does not describe a valid seating model.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ModelError),
    /// The constraint engine failed.
    #[error("solver error: {0}")]
    Solver(#[from] EngineError),
    /// A run was driven through a transition its lifecycle does not allow.
    #[error("invalid run transition from {from} to {to}")]
    InvalidTransition { from: RunState, to: RunState },
    /// A portfolio worker thread panicked.
    #[error("portfolio worker panicked: {0}")]
    WorkerPanicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = SeatingError::InvalidTransition {
            from: RunState::Built,
            to: RunState::Solving,
        };
        assert_eq!(
            error.to_string(),
            "invalid run transition from Built to Solving"
        );
        let error = SeatingError::from(EngineError::NegativeLength(-2));
        assert_eq!(error.to_string(), "solver error: interval length -2 is negative");
        let error = SeatingError::from(ModelError::NoSessions);
        assert!(error.to_string().starts_with("invalid input: "));
    }
}
