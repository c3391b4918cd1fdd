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

//! # Tribune CP
//!
//! **A finite-domain constraint engine sized for seating problems.**
//!
//! The engine stores integer variables with explicit bit-set domains,
//! interval variables (a start variable plus a fixed length), and a small set
//! of global constraints. A depth-first search with propagation to fixpoint
//! at every node looks for one valuation that satisfies every constraint.
//!
//! ## Architecture
//!
//! * **`model`**: `CpModel`, the declarative API. Declaring variables and
//!   posting constraints never mutates a running search; `solve` takes `&self`
//!   so the same model can be solved repeatedly.
//! * **`domain`** / **`store`** / **`trail`**: the mutable search state.
//!   Domains changed at a decision level are saved once per level on the
//!   trail and restored in reverse on backtrack.
//! * **`propagators`**: `AllDifferent`, `NoOverlap`, `Equality`, `Linear`,
//!   and `Element`, all behind the `Propagator` trait.
//! * **`search`**: most-constrained-variable branching with ascending or
//!   seeded random value order.
//! * **`monitor`**: `SearchMonitor` hooks for time limits, interrupts, and
//!   progress logging.
//!
//! ## Guarantees
//!
//! Every `SolveStatus::Satisfied` valuation has been checked against every
//! posted constraint and every variable's declared domain before it is
//! returned. `SolveStatus::Infeasible` is only reported once the search tree
//! has been exhausted. A monitor stop yields `SolveStatus::Unknown`.

pub mod config;
pub mod domain;
pub mod error;
pub mod index;
pub mod model;
pub mod monitor;
pub mod propagators;
pub mod result;
pub mod search;
pub mod stats;
pub mod store;
pub mod trail;
