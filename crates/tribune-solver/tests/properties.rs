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

//! Seating invariants checked on random small halls.

use proptest::prelude::*;
use std::{collections::HashSet, time::Duration};
use tribune_cp::config::{SearchConfig, ValueOrder};
use tribune_model::{
    assignment::Assignment,
    model::{SeatingModel, SeatingModelBuilder},
};
use tribune_seating::{block::BlockEncoder, encoder::SeatingEncoder, naive::NaiveEncoder};
use tribune_solver::{
    outcome::SeatingOutcome,
    solver::{SeatingSolver, Strategy as SeatingStrategy},
};

const TIME_LIMIT: Duration = Duration::from_secs(5);

fn hall() -> impl Strategy<Value = SeatingModel> {
    (
        1usize..=3,
        prop::collection::vec(2usize..=6, 1..=3),
        prop::collection::vec(prop::collection::vec(any::<u8>(), 1..=3), 1..=3),
    )
        .prop_map(|(num_sessions, rows, organizations)| {
            let sessions: Vec<String> = (0..num_sessions).map(|s| format!("s{s}")).collect();
            let mut builder = SeatingModelBuilder::new(sessions);
            for (index, &seats) in rows.iter().enumerate() {
                builder.add_row(format!("R{index}"), seats);
            }
            let full_mask = (1u8 << num_sessions) - 1;
            for (index, members) in organizations.iter().enumerate() {
                let name = format!("O{index}");
                builder.add_organization(name.clone());
                for (member, &bits) in members.iter().enumerate() {
                    let mask = match bits & full_mask {
                        0 => 1,
                        mask => mask,
                    };
                    let attendance: Vec<bool> =
                        (0..num_sessions).map(|s| mask & (1 << s) != 0).collect();
                    builder.add_delegate(name.clone(), format!("m{member}"), attendance);
                }
            }
            builder.build().unwrap()
        })
}

fn solve(model: &SeatingModel, strategy: SeatingStrategy) -> SeatingOutcome {
    SeatingSolver::builder()
        .with_strategy(strategy)
        .with_time_limit(TIME_LIMIT)
        .build()
        .solve(model)
        .unwrap()
        .into_outcome()
}

fn check_seating(model: &SeatingModel, assignment: &Assignment) -> Result<(), TestCaseError> {
    prop_assert_eq!(assignment.verify(model), Ok(()));

    for session in model.sessions() {
        let mut taken = HashSet::new();
        for (_, seat) in assignment.seated(session) {
            prop_assert!(taken.insert(seat), "{} is shared", seat);
        }

        for delegate in model.delegates() {
            let seat = assignment.seat_of(delegate, session);
            prop_assert_eq!(seat.is_some(), model.attends(delegate, session));
        }

        for organization in model.organizations() {
            let seats: Vec<_> = model
                .attendees(organization, session)
                .filter_map(|delegate| assignment.seat_of(delegate, session))
                .collect();
            let Some(first) = seats.first() else {
                continue;
            };
            prop_assert!(seats.iter().all(|seat| seat.row() == first.row()));
            let mut positions: Vec<usize> = seats.iter().map(|seat| seat.position()).collect();
            positions.sort_unstable();
            prop_assert!(positions.windows(2).all(|pair| pair[1] == pair[0] + 1));
        }
    }

    for delegate in model.delegates() {
        for session in model.sessions().skip(1) {
            let Some(previous) = session.prev() else {
                continue;
            };
            if model.attends(delegate, previous) && model.attends(delegate, session) {
                prop_assert_eq!(
                    assignment.seat_of(delegate, previous),
                    assignment.seat_of(delegate, session)
                );
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_solved_seatings_hold_every_invariant(model in hall()) {
        for strategy in [SeatingStrategy::Naive, SeatingStrategy::Block] {
            if let SeatingOutcome::Solved(assignment) = solve(&model, strategy) {
                check_seating(&model, &assignment)?;
            }
        }
    }

    #[test]
    fn prop_encodings_agree_on_feasibility(model in hall()) {
        let naive = solve(&model, SeatingStrategy::Naive);
        let block = solve(&model, SeatingStrategy::Block);
        if naive.is_decisive() && block.is_decisive() {
            prop_assert_eq!(naive.is_solved(), block.is_solved());
        }
    }

    #[test]
    fn prop_same_seed_gives_same_seating(model in hall(), seed in any::<u64>()) {
        let solver = SeatingSolver::builder()
            .with_strategy(SeatingStrategy::Block)
            .with_value_order(ValueOrder::Shuffled)
            .with_seed(seed)
            .with_time_limit(TIME_LIMIT)
            .build();
        let first = solver.solve(&model).unwrap().into_outcome();
        let second = solver.solve(&model).unwrap().into_outcome();
        if first.is_decisive() && second.is_decisive() {
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_decoding_is_idempotent(model in hall()) {
        prop_assume!(model.capacity_shortfall().is_none());
        let config = SearchConfig::builder().with_time_limit(TIME_LIMIT).build();
        for encoder in [&NaiveEncoder as &dyn SeatingEncoder, &BlockEncoder] {
            let encoded = encoder.encode(&model).unwrap();
            let outcome = encoded.cp_model().solve(&config);
            if let Some(valuation) = outcome.valuation() {
                let first = encoded.decode(&model, valuation);
                let second = encoded.decode(&model, valuation);
                prop_assert_eq!(&first, &second);
                check_seating(&model, &first)?;
            }
        }
    }
}
