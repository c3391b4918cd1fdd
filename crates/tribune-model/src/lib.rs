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

//! # Tribune Model
//!
//! **The domain model of the delegate seating problem.**
//!
//! An event runs an ordered sequence of sessions in a hall whose seats are
//! arranged in rows of independent lengths. Delegates belong to
//! organizations and state which sessions they attend. This crate describes
//! that input and the seating that a solver produces for it.
//!
//! ## Architecture
//!
//! * **`index`**: typed indices (`RowIndex`, `SessionIndex`,
//!   `OrganizationIndex`, `DelegateIndex`) so index spaces cannot be mixed.
//! * **`model`**: `SeatingModelBuilder` (mutable, validating) and
//!   `SeatingModel` (immutable, query-oriented).
//! * **`assignment`**: the per-session seating produced by a solve, and its
//!   invariant checker.
//! * **`error`**: `ModelError`, the input validation failures.
//!
//! ## Design Philosophy
//!
//! 1.  **Fail-Fast**: `SeatingModelBuilder::build` validates eagerly, so no
//!     encoder or solver ever sees malformed input.
//! 2.  **Flat Layout**: attendance and demand are stored as flattened
//!     `delegate × session` and `organization × session` arrays.
//! 3.  **No Back-Pointers**: delegates reference their organization by index;
//!     organizations list their delegates by index.

pub mod assignment;
pub mod error;
pub mod index;
pub mod model;
