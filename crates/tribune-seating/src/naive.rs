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

//! The naive encoding: one seat variable per attending delegate and session.
//!
//! Every seat variable ranges over the global seat line and is channelled to
//! a row variable through `row = seat_rows[seat]`. Per session the seat
//! variables are all different. For an organization with `k ≥ 2` attendees in
//! a session, the row variables are chained equal and an anchor `a` ranging
//! over the valid block starts of length `k` bounds every member by
//! `a ≤ seat ≤ a + k - 1`. With distinct seats this leaves exactly the block
//! `[a, a + k)`.

use crate::{
    decoder::{NaiveLayout, SeatingLayout},
    encoder::{EncodedSeating, SeatingEncoder},
    stability::StabilityLinker,
};
use tracing::debug;
use tribune_cp::{
    error::EngineError, index::VarId, model::CpModel, propagators::linear::Comparison,
};
use tribune_model::model::SeatingModel;

#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveEncoder;

impl NaiveEncoder {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl SeatingEncoder for NaiveEncoder {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn encode(&self, model: &SeatingModel) -> Result<EncodedSeating, EngineError> {
        let mut cp_model = CpModel::new();
        let mut layout = NaiveLayout::new(model);
        let seat_rows: Vec<i64> = model.seat_rows().iter().map(|row| row.get() as i64).collect();
        let last_seat = model.num_seats() as i64 - 1;
        let last_row = model.num_rows() as i64 - 1;

        let num_sessions = model.num_sessions();
        let mut row_variables: Vec<Option<VarId>> =
            vec![None; model.num_delegates() * num_sessions];
        for delegate in model.delegates() {
            for session in model.sessions() {
                if !model.attends(delegate, session) {
                    continue;
                }
                let seat = cp_model.declare_variable(0, last_seat)?;
                let row = cp_model.declare_variable(0, last_row)?;
                cp_model.add_element(seat, seat_rows.clone(), row)?;
                layout.set_seat_variable(delegate, session, seat);
                row_variables[delegate.get() * num_sessions + session.get()] = Some(row);
            }
        }

        for session in model.sessions() {
            let seats: Vec<VarId> = model
                .delegates()
                .filter_map(|delegate| layout.seat_variable(delegate, session))
                .collect();
            if seats.len() >= 2 {
                cp_model.add_all_different(&seats)?;
            }
        }

        for organization in model.organizations() {
            for session in model.sessions() {
                let length = model.demand(organization, session);
                if length < 2 {
                    continue;
                }
                let members: Vec<(VarId, VarId)> = model
                    .attendees(organization, session)
                    .filter_map(|delegate| {
                        let seat = layout.seat_variable(delegate, session)?;
                        let row = row_variables[delegate.get() * num_sessions + session.get()]?;
                        Some((seat, row))
                    })
                    .collect();

                let Some(&(_, first_row)) = members.first() else {
                    continue;
                };
                for pair in members.windows(2) {
                    cp_model.add_equality(pair[0].1, pair[1].1)?;
                }

                let starts: Vec<i64> = model
                    .block_starts(length)
                    .into_iter()
                    .map(|start| start as i64)
                    .collect();
                let anchor = cp_model.declare_variable_with_values(&starts)?;
                cp_model.add_element(anchor, seat_rows.clone(), first_row)?;
                for &(seat, _) in &members {
                    cp_model.add_linear(&[(1, anchor), (-1, seat)], Comparison::LessOrEqual, 0)?;
                    cp_model.add_linear(
                        &[(1, seat), (-1, anchor)],
                        Comparison::LessOrEqual,
                        length as i64 - 1,
                    )?;
                }
            }
        }

        let links = StabilityLinker::link_seats(model, &mut cp_model, &layout)?;
        debug!(
            variables = cp_model.num_variables(),
            constraints = cp_model.num_constraints(),
            stability_links = links,
            "naive encoding built"
        );

        let seat_variables = model.num_attendances();
        Ok(EncodedSeating::new(
            self.name(),
            model,
            cp_model,
            SeatingLayout::Naive(layout),
            seat_variables,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribune_cp::config::SearchConfig;
    use tribune_model::{
        index::{DelegateIndex, SessionIndex},
        model::SeatingModelBuilder,
    };

    fn two_rows() -> SeatingModel {
        let mut builder = SeatingModelBuilder::new(["s0", "s1"]);
        builder
            .add_row("A", 3)
            .add_row("B", 2)
            .add_organization("X")
            .add_organization("Y")
            .add_delegate("X", "x0", [true, true])
            .add_delegate("X", "x1", [true, true])
            .add_delegate("X", "x2", [false, true])
            .add_delegate("Y", "y0", [true, false])
            .add_delegate("Y", "y1", [true, true]);
        builder.build().unwrap()
    }

    #[test]
    fn test_counts() {
        let model = two_rows();
        let encoded = NaiveEncoder::new().encode(&model).unwrap();
        let stats = encoded.stats();
        assert_eq!(encoded.encoder(), "naive");
        assert_eq!(stats.placement_variables, 8);
        assert_eq!(stats.seat_variables, 8);
        // Seat and row per attendance, plus one anchor per group of two or more:
        // X in s0 and s1, Y in s0.
        assert_eq!(stats.variables, 8 * 2 + 3);
    }

    #[test]
    fn test_solution_is_valid_and_stable() {
        let model = two_rows();
        let encoded = NaiveEncoder::new().encode(&model).unwrap();
        let outcome = encoded.cp_model().solve(&SearchConfig::default());
        let valuation = outcome.valuation().expect("expected a seating");
        let assignment = encoded.decode(&model, valuation);
        assert_eq!(assignment.verify(&model), Ok(()));

        let x0 = DelegateIndex::new(0);
        assert_eq!(
            assignment.seat_of(x0, SessionIndex::new(0)),
            assignment.seat_of(x0, SessionIndex::new(1))
        );
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
        let encoded = NaiveEncoder::new().encode(&model).unwrap();
        assert!(encoded.shortfall().is_none());
        assert!(encoded.cp_model().solve(&SearchConfig::default()).is_infeasible());
    }
}
