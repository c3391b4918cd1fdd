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

//! # Tribune Seating
//!
//! **Constraint encodings of the delegate seating problem.**
//!
//! A `SeatingModel` is turned into a `CpModel` by one of two encoders, the
//! engine searches for a valuation, and the decoder maps that valuation back
//! into an `Assignment`.
//!
//! ## Architecture
//!
//! * **`encoder`**: the `SeatingEncoder` trait and `EncodedSeating`, the
//!   product of an encoding (engine model, variable layout, statistics).
//! * **`naive`**: one seat variable per attending delegate and session.
//!   Readable, and fine for a few hundred delegates.
//! * **`block`**: one interval per organization and session. Contiguity holds
//!   by construction and the variable count does not depend on the number of
//!   delegates.
//! * **`stability`**: stability runs, and the constraints that keep a
//!   delegate on one seat across consecutive sessions, for both encoders.
//! * **`decoder`**: valuation to `Assignment`.
//!
//! All encodings share the global seat line of `SeatingModel`: row `r`
//! covers `[row_base(r), row_base(r) + row_len(r))`.

pub mod block;
pub mod decoder;
pub mod encoder;
pub mod naive;
pub mod stability;
