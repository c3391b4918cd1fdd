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

//! The output of a successful solve.
//!
//! An `Assignment` maps every `(delegate, session)` pair to at most one seat.
//! `Assignment::verify` re-checks the seating rules against the model:
//! no shared seats, one contiguous single-row block per organization and
//! session, stable seats over consecutive attended sessions, and seats only
//! for attended sessions.

use crate::{
    index::{DelegateIndex, OrganizationIndex, RowIndex, SessionIndex},
    model::{Seat, SeatingModel},
};
use thiserror::Error;

/// A seating rule broken by an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentViolation {
    /// The assignment was built for a different number of delegates or sessions.
    #[error(
        "assignment covers {delegates} delegates and {sessions} sessions, the model has {expected_delegates} and {expected_sessions}"
    )]
    ShapeMismatch {
        delegates: usize,
        sessions: usize,
        expected_delegates: usize,
        expected_sessions: usize,
    },
    /// A seat that does not exist in the hall.
    #[error("{delegate} is placed on nonexistent {seat} in {session}")]
    SeatOutOfBounds {
        delegate: DelegateIndex,
        session: SessionIndex,
        seat: Seat,
    },
    /// An attending delegate has no seat.
    #[error("{delegate} attends {session} but has no seat")]
    Unseated {
        delegate: DelegateIndex,
        session: SessionIndex,
    },
    /// A delegate has a seat in a session they do not attend.
    #[error("{delegate} has a seat in {session} without attending it")]
    SeatedWithoutAttendance {
        delegate: DelegateIndex,
        session: SessionIndex,
    },
    /// Two delegates occupy the same seat in the same session.
    #[error("{first} and {second} share {seat} in {session}")]
    SeatShared {
        session: SessionIndex,
        seat: Seat,
        first: DelegateIndex,
        second: DelegateIndex,
    },
    /// An organization's attendees are split across rows or leave a gap.
    #[error("{organization} is not seated as one contiguous block in {session}")]
    NotContiguous {
        organization: OrganizationIndex,
        session: SessionIndex,
    },
    /// A delegate moved between two consecutive attended sessions.
    #[error("{delegate} changed seat between {previous} and {session}")]
    SeatChanged {
        delegate: DelegateIndex,
        previous: SessionIndex,
        session: SessionIndex,
    },
}

/// The seat of every delegate in every session.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assignment {
    num_delegates: usize,
    num_sessions: usize,
    seats: Vec<Option<Seat>>,
}

impl Assignment {
    /// Creates an assignment in which nobody is seated.
    #[inline]
    pub fn new(num_delegates: usize, num_sessions: usize) -> Self {
        Self {
            num_delegates,
            num_sessions,
            seats: vec![None; num_delegates * num_sessions],
        }
    }

    /// Creates an empty assignment shaped after `model`.
    #[inline]
    pub fn for_model(model: &SeatingModel) -> Self {
        Self::new(model.num_delegates(), model.num_sessions())
    }

    #[inline]
    pub fn num_delegates(&self) -> usize {
        self.num_delegates
    }

    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.num_sessions
    }

    #[inline(always)]
    fn flat(&self, delegate_index: DelegateIndex, session_index: SessionIndex) -> usize {
        debug_assert!(
            delegate_index.get() < self.num_delegates,
            "called `Assignment::flat` with delegate index out of bounds: the len is {} but the index is {}",
            self.num_delegates,
            delegate_index.get()
        );
        debug_assert!(
            session_index.get() < self.num_sessions,
            "called `Assignment::flat` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions,
            session_index.get()
        );

        delegate_index.get() * self.num_sessions + session_index.get()
    }

    /// Seats `delegate_index` on `seat` for `session_index`, replacing any
    /// previous seat.
    #[inline]
    pub fn place(
        &mut self,
        delegate_index: DelegateIndex,
        session_index: SessionIndex,
        seat: Seat,
    ) {
        let index = self.flat(delegate_index, session_index);
        self.seats[index] = Some(seat);
    }

    /// Returns the seat of `delegate_index` in `session_index`, if any.
    #[inline]
    pub fn seat_of(
        &self,
        delegate_index: DelegateIndex,
        session_index: SessionIndex,
    ) -> Option<Seat> {
        self.seats[self.flat(delegate_index, session_index)]
    }

    /// Returns the delegate sitting on `seat` in `session_index`, if any.
    pub fn occupant(&self, session_index: SessionIndex, seat: Seat) -> Option<DelegateIndex> {
        DelegateIndex::range(self.num_delegates)
            .find(|&delegate| self.seat_of(delegate, session_index) == Some(seat))
    }

    /// Iterates over the seated delegates of `session_index` in delegate order.
    pub fn seated(
        &self,
        session_index: SessionIndex,
    ) -> impl Iterator<Item = (DelegateIndex, Seat)> + '_ {
        DelegateIndex::range(self.num_delegates).filter_map(move |delegate| {
            self.seat_of(delegate, session_index)
                .map(|seat| (delegate, seat))
        })
    }

    /// Returns the number of `(delegate, session)` pairs that have a seat.
    #[inline]
    pub fn num_placements(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_some()).count()
    }

    /// Copies every placement of `part` into this assignment.
    ///
    /// `part` uses the local indices of a restricted sub-model. `rows` and
    /// `delegates` map those local indices to this assignment's indices.
    pub fn absorb(&mut self, part: &Assignment, rows: &[RowIndex], delegates: &[DelegateIndex]) {
        debug_assert_eq!(
            part.num_sessions, self.num_sessions,
            "called `Assignment::absorb` with a part covering {} sessions but this assignment covers {}",
            part.num_sessions, self.num_sessions
        );
        debug_assert_eq!(part.num_delegates, delegates.len());

        for (local, &delegate) in delegates.iter().enumerate() {
            for session in SessionIndex::range(self.num_sessions) {
                if let Some(seat) = part.seat_of(DelegateIndex::new(local), session) {
                    self.place(
                        delegate,
                        session,
                        Seat::new(rows[seat.row().get()], seat.position()),
                    );
                }
            }
        }
    }

    /// Checks every seating rule against `model` and returns the first
    /// violation found.
    ///
    /// Violations are reported in a fixed order: shape, per-delegate seats,
    /// shared seats, contiguity, then stability.
    pub fn verify(&self, model: &SeatingModel) -> Result<(), AssignmentViolation> {
        if self.num_delegates != model.num_delegates() || self.num_sessions != model.num_sessions()
        {
            return Err(AssignmentViolation::ShapeMismatch {
                delegates: self.num_delegates,
                sessions: self.num_sessions,
                expected_delegates: model.num_delegates(),
                expected_sessions: model.num_sessions(),
            });
        }

        for delegate in model.delegates() {
            for session in model.sessions() {
                match (model.attends(delegate, session), self.seat_of(delegate, session)) {
                    (true, None) => {
                        return Err(AssignmentViolation::Unseated { delegate, session });
                    }
                    (false, Some(_)) => {
                        return Err(AssignmentViolation::SeatedWithoutAttendance {
                            delegate,
                            session,
                        });
                    }
                    (true, Some(seat)) if !model.contains_seat(seat) => {
                        return Err(AssignmentViolation::SeatOutOfBounds {
                            delegate,
                            session,
                            seat,
                        });
                    }
                    _ => {}
                }
            }
        }

        let mut occupancy: Vec<Option<DelegateIndex>> = vec![None; model.num_seats()];
        for session in model.sessions() {
            occupancy.fill(None);
            for (delegate, seat) in self.seated(session) {
                let slot = &mut occupancy[model.global_seat(seat)];
                if let Some(first) = *slot {
                    return Err(AssignmentViolation::SeatShared {
                        session,
                        seat,
                        first,
                        second: delegate,
                    });
                }
                *slot = Some(delegate);
            }
        }

        for organization in model.organizations() {
            for session in model.sessions() {
                let mut row: Option<RowIndex> = None;
                let mut lowest = usize::MAX;
                let mut highest = 0usize;
                let mut count = 0usize;
                let mut split = false;
                for delegate in model.attendees(organization, session) {
                    if let Some(seat) = self.seat_of(delegate, session) {
                        split |= *row.get_or_insert(seat.row()) != seat.row();
                        lowest = lowest.min(seat.position());
                        highest = highest.max(seat.position());
                        count += 1;
                    }
                }
                if count > 0 && (split || highest - lowest + 1 != count) {
                    return Err(AssignmentViolation::NotContiguous {
                        organization,
                        session,
                    });
                }
            }
        }

        for delegate in model.delegates() {
            for (previous, session) in model.sessions().zip(model.sessions().skip(1)) {
                let before = self.seat_of(delegate, previous);
                let after = self.seat_of(delegate, session);
                if before.is_some() && after.is_some() && before != after {
                    return Err(AssignmentViolation::SeatChanged {
                        delegate,
                        previous,
                        session,
                    });
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Assignment(delegates: {}, sessions: {}, placements: {})",
            self.num_delegates,
            self.num_sessions,
            self.num_placements()
        )
    }
}
