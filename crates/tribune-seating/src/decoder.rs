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

//! Valuation to `Assignment`.
//!
//! Each encoder records where its variables live in a layout. Decoding reads
//! the valuation through that layout and is a pure function of it: the same
//! valuation always yields the same assignment.
//!
//! For block encodings the member order inside a block is fixed as follows:
//! delegates with a pinned seat sit on it, the others fill the remaining
//! seats of the block in ascending position, in delegate order.

use fixedbitset::FixedBitSet;
use tribune_cp::{
    index::{IntervalId, VarId},
    result::Valuation,
};
use tribune_model::{
    assignment::Assignment,
    index::{DelegateIndex, OrganizationIndex, SessionIndex},
    model::SeatingModel,
};

#[inline(always)]
fn flat(num_sessions: usize, major: usize, session_index: SessionIndex) -> usize {
    major * num_sessions + session_index.get()
}

/// Seat variables of a naive encoding, by delegate and session.
#[derive(Clone, Debug)]
pub struct NaiveLayout {
    num_sessions: usize,
    seats: Vec<Option<VarId>>,
}

impl NaiveLayout {
    pub fn new(model: &SeatingModel) -> Self {
        Self {
            num_sessions: model.num_sessions(),
            seats: vec![None; model.num_delegates() * model.num_sessions()],
        }
    }

    /// Returns the seat variable of `delegate_index` in `session_index`, or
    /// `None` if the delegate does not attend.
    #[inline]
    pub fn seat_variable(
        &self,
        delegate_index: DelegateIndex,
        session_index: SessionIndex,
    ) -> Option<VarId> {
        self.seats[flat(self.num_sessions, delegate_index.get(), session_index)]
    }

    #[inline]
    pub(crate) fn set_seat_variable(
        &mut self,
        delegate_index: DelegateIndex,
        session_index: SessionIndex,
        variable: VarId,
    ) {
        self.seats[flat(self.num_sessions, delegate_index.get(), session_index)] = Some(variable);
    }
}

/// Block intervals by organization and session, and pinned seat variables
/// by delegate and session.
#[derive(Clone, Debug)]
pub struct BlockLayout {
    num_sessions: usize,
    blocks: Vec<Option<IntervalId>>,
    pins: Vec<Option<VarId>>,
}

impl BlockLayout {
    pub fn new(model: &SeatingModel) -> Self {
        let num_sessions = model.num_sessions();
        Self {
            num_sessions,
            blocks: vec![None; model.num_organizations() * num_sessions],
            pins: vec![None; model.num_delegates() * num_sessions],
        }
    }

    /// Returns the block of `organization_index` in `session_index`, or
    /// `None` if nobody of the organization attends.
    #[inline]
    pub fn block(
        &self,
        organization_index: OrganizationIndex,
        session_index: SessionIndex,
    ) -> Option<IntervalId> {
        self.blocks[flat(self.num_sessions, organization_index.get(), session_index)]
    }

    /// Returns the pinned seat variable of `delegate_index` in
    /// `session_index`, if the session belongs to a linked stability run.
    #[inline]
    pub fn pinned_seat(
        &self,
        delegate_index: DelegateIndex,
        session_index: SessionIndex,
    ) -> Option<VarId> {
        self.pins[flat(self.num_sessions, delegate_index.get(), session_index)]
    }

    /// Returns the number of declared blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_some()).count()
    }

    #[inline]
    pub(crate) fn set_block(
        &mut self,
        organization_index: OrganizationIndex,
        session_index: SessionIndex,
        interval: IntervalId,
    ) {
        self.blocks[flat(self.num_sessions, organization_index.get(), session_index)] =
            Some(interval);
    }

    #[inline]
    pub(crate) fn pin(
        &mut self,
        delegate_index: DelegateIndex,
        session_index: SessionIndex,
        seat: VarId,
    ) {
        self.pins[flat(self.num_sessions, delegate_index.get(), session_index)] = Some(seat);
    }
}

/// The variable layout of one encoding.
#[derive(Clone, Debug)]
pub enum SeatingLayout {
    Naive(NaiveLayout),
    Block(BlockLayout),
}

/// Decodes `valuation` into an assignment of `model`.
///
/// `valuation` must come from solving the encoding that produced `layout`.
pub fn decode(model: &SeatingModel, layout: &SeatingLayout, valuation: &Valuation) -> Assignment {
    let assignment = match layout {
        SeatingLayout::Naive(layout) => decode_naive(model, layout, valuation),
        SeatingLayout::Block(layout) => decode_block(model, layout, valuation),
    };
    debug_assert!(
        assignment.verify(model).is_ok(),
        "decoded assignment violates a seating rule: {:?}",
        assignment.verify(model)
    );
    assignment
}

fn decode_naive(model: &SeatingModel, layout: &NaiveLayout, valuation: &Valuation) -> Assignment {
    let mut assignment = Assignment::for_model(model);
    for delegate in model.delegates() {
        for session in model.sessions() {
            if let Some(variable) = layout.seat_variable(delegate, session) {
                let global = valuation.value(variable) as usize;
                assignment.place(delegate, session, model.seat_at(global));
            }
        }
    }
    assignment
}

fn decode_block(model: &SeatingModel, layout: &BlockLayout, valuation: &Valuation) -> Assignment {
    let mut assignment = Assignment::for_model(model);
    let mut taken = FixedBitSet::with_capacity(model.max_row_len());
    let mut unpinned: Vec<DelegateIndex> = Vec::new();

    for organization in model.organizations() {
        for session in model.sessions() {
            let Some(block) = layout.block(organization, session) else {
                continue;
            };
            let start = valuation.start(block) as usize;
            let length = model.demand(organization, session);

            taken.clear();
            taken.grow(length);
            unpinned.clear();
            for delegate in model.attendees(organization, session) {
                match layout.pinned_seat(delegate, session) {
                    Some(variable) => {
                        let global = valuation.value(variable) as usize;
                        taken.insert(global - start);
                        assignment.place(delegate, session, model.seat_at(global));
                    }
                    None => unpinned.push(delegate),
                }
            }

            for (&delegate, offset) in unpinned.iter().zip(taken.zeroes()) {
                assignment.place(delegate, session, model.seat_at(start + offset));
            }
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribune_model::{index::RowIndex, model::SeatingModelBuilder, model::Seat};

    fn model() -> SeatingModel {
        let mut builder = SeatingModelBuilder::new(["s0", "s1"]);
        builder
            .add_row("A", 3)
            .add_row("B", 3)
            .add_organization("X")
            .add_delegate("X", "x0", [true, true])
            .add_delegate("X", "x1", [true, false])
            .add_delegate("X", "x2", [true, true]);
        builder.build().unwrap()
    }

    fn s(index: usize) -> SessionIndex {
        SessionIndex::new(index)
    }

    fn d(index: usize) -> DelegateIndex {
        DelegateIndex::new(index)
    }

    #[test]
    fn test_naive_decoding_reads_global_seats() {
        let model = model();
        let mut layout = NaiveLayout::new(&model);
        layout.set_seat_variable(d(0), s(0), VarId::new(0));
        layout.set_seat_variable(d(1), s(0), VarId::new(1));
        layout.set_seat_variable(d(2), s(0), VarId::new(2));
        layout.set_seat_variable(d(0), s(1), VarId::new(3));
        layout.set_seat_variable(d(2), s(1), VarId::new(4));
        let valuation = Valuation::new(vec![3, 5, 4, 3, 4], Vec::new());

        let assignment = decode(&model, &SeatingLayout::Naive(layout), &valuation);
        assert_eq!(assignment.seat_of(d(0), s(0)), Some(Seat::new(RowIndex::new(1), 0)));
        assert_eq!(assignment.seat_of(d(2), s(1)), Some(Seat::new(RowIndex::new(1), 1)));
        assert_eq!(assignment.seat_of(d(1), s(1)), None);
        assert_eq!(assignment.num_placements(), 5);
    }

    #[test]
    fn test_block_decoding_fills_around_pins() {
        let model = model();
        let x = OrganizationIndex::new(0);
        let mut layout = BlockLayout::new(&model);
        // Variables: 0 = start of block s0, 1 = start of block s1, 2 and 3 =
        // pinned seats of x0 and x2.
        layout.set_block(x, s(0), IntervalId::new(0));
        layout.set_block(x, s(1), IntervalId::new(1));
        for session in [s(0), s(1)] {
            layout.pin(d(0), session, VarId::new(2));
            layout.pin(d(2), session, VarId::new(3));
        }
        let valuation = Valuation::new(
            vec![0, 1, 2, 1],
            vec![VarId::new(0), VarId::new(1)],
        );

        let assignment = decode(&model, &SeatingLayout::Block(layout.clone()), &valuation);
        let row_a = RowIndex::new(0);
        assert_eq!(assignment.seat_of(d(0), s(0)), Some(Seat::new(row_a, 2)));
        assert_eq!(assignment.seat_of(d(2), s(0)), Some(Seat::new(row_a, 1)));
        assert_eq!(assignment.seat_of(d(1), s(0)), Some(Seat::new(row_a, 0)));
        assert_eq!(assignment.seat_of(d(0), s(1)), Some(Seat::new(row_a, 2)));
        assert_eq!(assignment.seat_of(d(2), s(1)), Some(Seat::new(row_a, 1)));
        assert_eq!(layout.num_blocks(), 2);

        let again = decode(&model, &SeatingLayout::Block(layout), &valuation);
        assert_eq!(assignment, again);
    }
}
