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

use crate::index::{IntervalId, VarId};
use thiserror::Error;

/// A fault of the engine itself, as opposed to an unsatisfiable model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A domain would span more values than the engine stores explicitly.
    #[error("domain [{lo}, {hi}] spans more than {limit} values")]
    DomainTooLarge { lo: i64, hi: i64, limit: u64 },
    /// Bounds of a linear expression do not fit into 64-bit integers.
    #[error("linear expression overflows i64 on its declared domains")]
    Overflow,
    /// An interval was declared with a negative length.
    #[error("interval length {0} is negative")]
    NegativeLength(i64),
    /// A variable handle that this model never issued.
    #[error("{0} does not belong to this model")]
    UnknownVariable(VarId),
    /// An interval handle that this model never issued.
    #[error("{0} does not belong to this model")]
    UnknownInterval(IntervalId),
}
