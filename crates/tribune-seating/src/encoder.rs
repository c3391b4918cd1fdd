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

use crate::decoder::{self, SeatingLayout};
use tribune_cp::{error::EngineError, model::CpModel, result::Valuation};
use tribune_model::{
    assignment::Assignment,
    model::{CapacityShortfall, SeatingModel},
};

/// Sizes of an encoding.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EncodingStats {
    /// Variables that decide where a group or delegate sits: one block per
    /// organization and session, or one seat per attending delegate and
    /// session.
    pub placement_variables: usize,
    /// Per-delegate seat variables.
    pub seat_variables: usize,
    /// Every variable of the engine model.
    pub variables: usize,
    /// Every posted constraint.
    pub constraints: usize,
}

impl std::fmt::Display for EncodingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EncodingStats(placement_variables: {}, seat_variables: {}, variables: {}, constraints: {})",
            self.placement_variables, self.seat_variables, self.variables, self.constraints
        )
    }
}

/// A seating model translated into an engine model.
///
/// The engine model is never changed after encoding; it can be solved any
/// number of times.
#[derive(Debug)]
pub struct EncodedSeating {
    encoder: &'static str,
    cp_model: CpModel,
    layout: SeatingLayout,
    stats: EncodingStats,
    shortfall: Option<CapacityShortfall>,
}

impl EncodedSeating {
    pub fn new(
        encoder: &'static str,
        model: &SeatingModel,
        cp_model: CpModel,
        layout: SeatingLayout,
        seat_variables: usize,
    ) -> Self {
        let placement_variables = match &layout {
            SeatingLayout::Naive(_) => model.num_attendances(),
            SeatingLayout::Block(layout) => layout.num_blocks(),
        };
        let stats = EncodingStats {
            placement_variables,
            seat_variables,
            variables: cp_model.num_variables(),
            constraints: cp_model.num_constraints(),
        };
        Self {
            encoder,
            cp_model,
            layout,
            stats,
            shortfall: model.capacity_shortfall(),
        }
    }

    /// Returns the name of the encoder that produced this encoding.
    #[inline]
    pub fn encoder(&self) -> &'static str {
        self.encoder
    }

    #[inline]
    pub fn cp_model(&self) -> &CpModel {
        &self.cp_model
    }

    #[inline]
    pub fn layout(&self) -> &SeatingLayout {
        &self.layout
    }

    #[inline]
    pub fn stats(&self) -> &EncodingStats {
        &self.stats
    }

    /// Returns the session whose demand exceeds the hall, if any. Such an
    /// encoding is infeasible without search.
    #[inline]
    pub fn shortfall(&self) -> Option<CapacityShortfall> {
        self.shortfall
    }

    /// Decodes a valuation of `cp_model` into an assignment.
    #[inline]
    pub fn decode(&self, model: &SeatingModel, valuation: &Valuation) -> Assignment {
        decoder::decode(model, &self.layout, valuation)
    }
}

impl std::fmt::Display for EncodedSeating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncodedSeating(encoder: {}, {})", self.encoder, self.stats)
    }
}

/// Translates a `SeatingModel` into an engine model.
pub trait SeatingEncoder: Send + Sync {
    /// Returns the name of the encoder.
    fn name(&self) -> &'static str;

    /// Encodes `model`.
    ///
    /// An infeasible model is not an error: it encodes into an engine model
    /// without solutions.
    fn encode(&self, model: &SeatingModel) -> Result<EncodedSeating, EngineError>;
}

impl std::fmt::Debug for dyn SeatingEncoder + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeatingEncoder({})", self.name())
    }
}

impl std::fmt::Display for dyn SeatingEncoder + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SeatingEncoder({})", self.name())
    }
}
