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

//! # Tribune Solver
//!
//! **Solving delegate seating end to end.**
//!
//! `SeatingSolver` takes a validated `SeatingModel`, picks an encoding, runs
//! the constraint engine, and reports a `SeatingOutcome`.
//!
//! ## Architecture
//!
//! * **`run`**: `SeatingRun`, the lifecycle of one encoding
//!   (`Built → Encoded → Solving → Solved | Infeasible | Cancelled |
//!   SolverError`). A finished run can be solved again with other search
//!   parameters.
//! * **`solver`**: `SeatingSolverBuilder` and `SeatingSolver`. Strategies
//!   choose the naive or block encoding, or race both in scoped threads.
//! * **`tranche`**: `TranchePlanner`, which splits very large halls into
//!   independently solved groups of rows and organizations.
//! * **`outcome`** / **`error`**: what a solve reports. Infeasibility and
//!   time-outs are outcomes; only malformed input, engine faults, and
//!   misuse of a run are errors.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use tribune_model::model::SeatingModelBuilder;
//! use tribune_solver::solver::{SeatingSolver, Strategy};
//!
//! let mut builder = SeatingModelBuilder::new(["Plenary"]);
//! builder
//!     .add_row("Front", 4)
//!     .add_organization("Acme")
//!     .add_delegate("Acme", "Ada", [true])
//!     .add_delegate("Acme", "Alan", [true]);
//! let model = builder.build().unwrap();
//!
//! let solver = SeatingSolver::builder()
//!     .with_strategy(Strategy::Block)
//!     .with_time_limit(Duration::from_secs(5))
//!     .build();
//! let report = solver.solve(&model).unwrap();
//! assert!(report.outcome().is_solved());
//! ```

pub mod error;
pub mod outcome;
pub mod run;
pub mod solver;
pub mod tranche;
