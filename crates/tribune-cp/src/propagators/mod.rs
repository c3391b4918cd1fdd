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

//! # Propagators
//!
//! Each constraint posted on a `CpModel` becomes one `Propagator`. A
//! propagator removes values that cannot be part of any solution given the
//! current domains of its variables, and reports a `Conflict` once it proves
//! that no solution is left below the current node.
//!
//! Propagators are stateless: all search state lives in the `DomainStore`, so
//! a model can be solved any number of times.

pub mod all_different;
pub mod element;
pub mod equality;
pub mod linear;
pub mod no_overlap;

use crate::{
    index::VarId,
    result::Valuation,
    store::{Conflict, DomainStore},
};

/// A constraint with its filtering algorithm.
pub trait Propagator: std::fmt::Debug + Send + Sync {
    /// Returns the name of the constraint.
    fn name(&self) -> &'static str;

    /// Returns every variable whose changes may enable new filtering.
    fn variables(&self) -> &[VarId];

    /// Filters the domains in `store`.
    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict>;

    /// Checks the constraint on a complete valuation.
    fn is_satisfied(&self, valuation: &Valuation) -> bool;
}
