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

//! The block encoding: one interval per organization and session.
//!
//! An organization with `k ≥ 1` attendees in a session gets an interval of
//! length `k` on the global seat line whose start ranges over
//! `SeatingModel::block_starts(k)`, the starts at which `k` seats fit inside
//! a single row. Contiguity therefore holds by construction. Per session all
//! blocks are posted into one `no_overlap`; rows are disjoint ranges of the
//! line, so this is exactly per-row non-overlap.
//!
//! Individual seats are not variables. They are derived by the decoder,
//! except for delegates in linked stability runs, whose seat is pinned by the
//! `StabilityLinker`. The number of block variables is bounded by
//! `organizations × sessions`, whatever the number of delegates.

use crate::{
    decoder::{BlockLayout, SeatingLayout},
    encoder::{EncodedSeating, SeatingEncoder},
    stability::StabilityLinker,
};
use tracing::debug;
use tribune_cp::{error::EngineError, index::IntervalId, model::CpModel};
use tribune_model::model::SeatingModel;

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockEncoder;

impl BlockEncoder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl SeatingEncoder for BlockEncoder {
    fn name(&self) -> &'static str {
        "block"
    }

    fn encode(&self, model: &SeatingModel) -> Result<EncodedSeating, EngineError> {
        if let Some(shortfall) = model.capacity_shortfall() {
            debug!(
                session = model.session_name(shortfall.session),
                demand = shortfall.demand,
                seats = shortfall.seats,
                "session demand exceeds capacity"
            );
        }

        let mut cp_model = CpModel::new();
        let mut layout = BlockLayout::new(model);
        let line_end = model.num_seats() as i64;

        let mut session_blocks: Vec<IntervalId> = Vec::with_capacity(model.num_organizations());
        for session in model.sessions() {
            session_blocks.clear();
            for organization in model.organizations() {
                let length = model.demand(organization, session);
                if length == 0 {
                    continue;
                }
                let block = cp_model.declare_interval_variable(0, line_end, length as i64)?;
                let starts: Vec<i64> = model
                    .block_starts(length)
                    .into_iter()
                    .map(|start| start as i64)
                    .collect();
                cp_model.restrict_domain(cp_model.interval_start(block), &starts)?;
                layout.set_block(organization, session, block);
                session_blocks.push(block);
            }
            if session_blocks.len() >= 2 {
                cp_model.add_no_overlap(&session_blocks)?;
            }
        }

        let pinned = StabilityLinker::pin_seats(model, &mut cp_model, &mut layout)?;
        debug!(
            blocks = layout.num_blocks(),
            pinned_seats = pinned,
            variables = cp_model.num_variables(),
            constraints = cp_model.num_constraints(),
            "block encoding built"
        );

        Ok(EncodedSeating::new(
            self.name(),
            model,
            cp_model,
            SeatingLayout::Block(layout),
            pinned,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribune_cp::config::SearchConfig;
    use tribune_model::{
        index::{DelegateIndex, OrganizationIndex, SessionIndex},
        model::SeatingModelBuilder,
    };

    #[test]
    fn test_block_count_does_not_depend_on_delegates() {
        let build = |per_org: usize| {
            let mut builder = SeatingModelBuilder::new(["s0", "s1", "s2"]);
            builder.add_row("A", 200).add_row("B", 200);
            for org in 0..4 {
                let name = format!("O{org}");
                builder.add_organization(name.clone());
                for delegate in 0..per_org {
                    let attendance = [delegate % 2 == 0, true, delegate % 3 == 0];
                    builder.add_delegate(name.clone(), format!("d{delegate}"), attendance);
                }
            }
            builder.build().unwrap()
        };

        let small = BlockEncoder::new().encode(&build(3)).unwrap();
        let large = BlockEncoder::new().encode(&build(40)).unwrap();
        assert_eq!(small.stats().placement_variables, 12);
        assert_eq!(large.stats().placement_variables, 12);
    }

    #[test]
    fn test_blocks_skip_empty_groups() {
        let mut builder = SeatingModelBuilder::new(["s0", "s1"]);
        builder
            .add_row("A", 4)
            .add_organization("X")
            .add_organization("Y")
            .add_delegate("X", "x0", [true, false])
            .add_delegate("Y", "y0", [true, true]);
        let model = builder.build().unwrap();
        let encoded = BlockEncoder::new().encode(&model).unwrap();
        assert_eq!(encoded.stats().placement_variables, 3);
        assert_eq!(encoded.stats().seat_variables, 1);

        let crate::decoder::SeatingLayout::Block(layout) = encoded.layout() else {
            panic!("expected a block layout");
        };
        assert!(layout.block(OrganizationIndex::new(0), SessionIndex::new(1)).is_none());
        assert!(
            layout
                .pinned_seat(DelegateIndex::new(1), SessionIndex::new(0))
                .is_some()
        );
    }

    #[test]
    fn test_solution_respects_rows_and_stability() {
        let mut builder = SeatingModelBuilder::new(["s0", "s1", "s2"]);
        builder
            .add_row("A", 3)
            .add_row("B", 4)
            .add_organization("X")
            .add_organization("Y")
            .add_delegate("X", "x0", [true, true, true])
            .add_delegate("X", "x1", [true, false, true])
            .add_delegate("X", "x2", [true, true, false])
            .add_delegate("Y", "y0", [true, true, true])
            .add_delegate("Y", "y1", [false, true, true])
            .add_delegate("Y", "y2", [true, true, true]);
        let model = builder.build().unwrap();
        let encoded = BlockEncoder::new().encode(&model).unwrap();
        let outcome = encoded.cp_model().solve(&SearchConfig::default());
        let valuation = outcome.valuation().expect("expected a seating");
        let assignment = encoded.decode(&model, valuation);
        assert_eq!(assignment.verify(&model), Ok(()));
    }

    #[test]
    fn test_group_longer_than_every_row_is_infeasible() {
        let mut builder = SeatingModelBuilder::new(["s0"]);
        builder
            .add_row("A", 2)
            .add_row("B", 2)
            .add_organization("X")
            .add_delegate("X", "x0", [true])
            .add_delegate("X", "x1", [true])
            .add_delegate("X", "x2", [true]);
        let model = builder.build().unwrap();
        let encoded = BlockEncoder::new().encode(&model).unwrap();
        assert!(encoded.cp_model().solve(&SearchConfig::default()).is_infeasible());
    }

    #[test]
    fn test_shortfall_is_recorded() {
        let mut builder = SeatingModelBuilder::new(["s0"]);
        builder
            .add_row("A", 1)
            .add_organization("X")
            .add_delegate("X", "x0", [true])
            .add_delegate("X", "x1", [true]);
        let model = builder.build().unwrap();
        let encoded = BlockEncoder::new().encode(&model).unwrap();
        let shortfall = encoded.shortfall().expect("expected a shortfall");
        assert_eq!((shortfall.demand, shortfall.seats), (2, 1));
    }
}
