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

//! Input validation failures.
//!
//! `SeatingModelBuilder::build` checks its input in a fixed order (sessions,
//! rows, organizations, then delegates in insertion order) and reports the
//! first violation it finds, so the same malformed input always produces the
//! same error.

use thiserror::Error;

/// A malformed seating model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The model declares no sessions.
    #[error("the model declares no sessions")]
    NoSessions,
    /// A row was declared with zero seats.
    #[error("row '{row}' has no seats")]
    EmptyRow { row: String },
    /// Two rows share the same name.
    #[error("row '{row}' is declared more than once")]
    DuplicateRow { row: String },
    /// Two organizations share the same name.
    #[error("organization '{organization}' is declared more than once")]
    DuplicateOrganization { organization: String },
    /// A delegate references an organization that was never declared.
    #[error("delegate '{delegate}' references unknown organization '{organization}'")]
    UnknownOrganization {
        delegate: String,
        organization: String,
    },
    /// A delegate's attendance vector does not have one entry per session.
    #[error(
        "delegate '{delegate}' of '{organization}' has {actual} attendance entries, expected {expected}"
    )]
    AttendanceLengthMismatch {
        delegate: String,
        organization: String,
        expected: usize,
        actual: usize,
    },
    /// A delegate attends no session at all.
    #[error("delegate '{delegate}' of '{organization}' attends no session")]
    NoAttendance {
        delegate: String,
        organization: String,
    },
    /// Two delegates of the same organization share the same name.
    #[error("delegate '{delegate}' is declared more than once in '{organization}'")]
    DuplicateDelegate {
        delegate: String,
        organization: String,
    },
}
