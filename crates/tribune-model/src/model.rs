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

use crate::{
    error::ModelError,
    index::{DelegateIndex, OrganizationIndex, RowIndex, SessionIndex},
};
use fixedbitset::FixedBitSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tribune_core::math::interval::ClosedOpenInterval;

#[inline(always)]
fn flatten_index(num_sessions: usize, major: usize, session_index: SessionIndex) -> usize {
    major * num_sessions + session_index.get()
}

/// A physical seat: a row and a 0-indexed position inside that row.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Seat {
    row: RowIndex,
    position: usize,
}

impl Seat {
    /// Creates a new seat.
    #[inline]
    pub const fn new(row: RowIndex, position: usize) -> Self {
        Self { row, position }
    }

    /// Returns the row of this seat.
    #[inline]
    pub const fn row(&self) -> RowIndex {
        self.row
    }

    /// Returns the position of this seat inside its row.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat(row: {}, position: {})", self.row.get(), self.position)
    }
}

/// A session whose total demand exceeds the number of seats in the hall.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CapacityShortfall {
    pub session: SessionIndex,
    pub demand: usize,
    pub seats: usize,
}

impl std::fmt::Display for CapacityShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} needs {} seats but the hall has {}",
            self.session, self.demand, self.seats
        )
    }
}

/// The immutable seating problem.
///
/// Rows are laid out one after another on a single integer line: row `r`
/// occupies `[row_base(r), row_base(r) + row_len(r))`. Encoders work on that
/// *global seat line*, `seat_at` and `global_seat` convert between the two
/// coordinate systems.
///
/// Attendance is stored as a flattened `delegate × session` bit set and demand
/// as a flattened `organization × session` array, both computed once on build.
#[derive(Clone, Debug)]
pub struct SeatingModel {
    session_names: Vec<String>,
    row_names: Vec<String>,
    row_spans: Vec<ClosedOpenInterval<usize>>,
    seat_rows: Vec<RowIndex>,
    organization_names: Vec<String>,
    organization_delegates: Vec<Vec<DelegateIndex>>,
    organization_lookup: FxHashMap<String, OrganizationIndex>,
    delegate_names: Vec<String>,
    delegate_organizations: Vec<OrganizationIndex>,
    attendance: FixedBitSet,
    demand: Vec<usize>,
    session_demand: Vec<usize>,
}

/// The raw parts of a model whose consistency has already been established.
struct ModelParts {
    session_names: Vec<String>,
    rows: Vec<(String, usize)>,
    organization_names: Vec<String>,
    delegates: Vec<(OrganizationIndex, String, Vec<bool>)>,
}

impl SeatingModel {
    fn assemble(parts: ModelParts) -> Self {
        let ModelParts {
            session_names,
            rows,
            organization_names,
            delegates,
        } = parts;

        let num_sessions = session_names.len();
        let num_organizations = organization_names.len();

        let mut row_names = Vec::with_capacity(rows.len());
        let mut row_spans = Vec::with_capacity(rows.len());
        let mut seat_rows = Vec::new();
        let mut base = 0usize;
        for (index, (name, len)) in rows.into_iter().enumerate() {
            row_names.push(name);
            row_spans.push(ClosedOpenInterval::with_len(base, len));
            seat_rows.extend(std::iter::repeat_n(RowIndex::new(index), len));
            base += len;
        }

        let organization_lookup = organization_names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), OrganizationIndex::new(index)))
            .collect();

        let mut organization_delegates = vec![Vec::new(); num_organizations];
        let mut delegate_names = Vec::with_capacity(delegates.len());
        let mut delegate_organizations = Vec::with_capacity(delegates.len());
        let mut attendance = FixedBitSet::with_capacity(delegates.len() * num_sessions);
        let mut demand = vec![0usize; num_organizations * num_sessions];
        let mut session_demand = vec![0usize; num_sessions];

        for (index, (organization, name, attends)) in delegates.into_iter().enumerate() {
            let delegate = DelegateIndex::new(index);
            organization_delegates[organization.get()].push(delegate);
            delegate_names.push(name);
            delegate_organizations.push(organization);
            for (session, &present) in attends.iter().enumerate() {
                if present {
                    let session = SessionIndex::new(session);
                    attendance.insert(flatten_index(num_sessions, index, session));
                    demand[flatten_index(num_sessions, organization.get(), session)] += 1;
                    session_demand[session.get()] += 1;
                }
            }
        }

        Self {
            session_names,
            row_names,
            row_spans,
            seat_rows,
            organization_names,
            organization_delegates,
            organization_lookup,
            delegate_names,
            delegate_organizations,
            attendance,
            demand,
            session_demand,
        }
    }

    /// Returns the number of rows in the hall.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.row_spans.len()
    }

    /// Returns the total number of seats over all rows.
    #[inline]
    pub fn num_seats(&self) -> usize {
        self.seat_rows.len()
    }

    /// Returns the number of sessions.
    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.session_names.len()
    }

    /// Returns the number of organizations.
    #[inline]
    pub fn num_organizations(&self) -> usize {
        self.organization_names.len()
    }

    /// Returns the number of delegates over all organizations.
    #[inline]
    pub fn num_delegates(&self) -> usize {
        self.delegate_names.len()
    }

    /// Iterates over all row indices in order.
    #[inline]
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = RowIndex> + ExactSizeIterator {
        RowIndex::range(self.num_rows())
    }

    /// Iterates over all session indices in schedule order.
    #[inline]
    pub fn sessions(&self) -> impl DoubleEndedIterator<Item = SessionIndex> + ExactSizeIterator {
        SessionIndex::range(self.num_sessions())
    }

    /// Iterates over all organization indices in declaration order.
    #[inline]
    pub fn organizations(
        &self,
    ) -> impl DoubleEndedIterator<Item = OrganizationIndex> + ExactSizeIterator {
        OrganizationIndex::range(self.num_organizations())
    }

    /// Iterates over all delegate indices in declaration order.
    #[inline]
    pub fn delegates(&self) -> impl DoubleEndedIterator<Item = DelegateIndex> + ExactSizeIterator {
        DelegateIndex::range(self.num_delegates())
    }

    /// Returns the number of seats in `row_index`.
    ///
    /// # Panics
    ///
    /// Panics if `row_index` is not in `0..num_rows()`.
    #[inline]
    pub fn row_len(&self, row_index: RowIndex) -> usize {
        self.row_span(row_index).len()
    }

    /// Returns the first global seat of `row_index`.
    ///
    /// # Panics
    ///
    /// Panics if `row_index` is not in `0..num_rows()`.
    #[inline]
    pub fn row_base(&self, row_index: RowIndex) -> usize {
        self.row_span(row_index).start()
    }

    /// Returns the closed-open range of global seats covered by `row_index`.
    ///
    /// # Panics
    ///
    /// Panics if `row_index` is not in `0..num_rows()`.
    #[inline]
    pub fn row_span(&self, row_index: RowIndex) -> ClosedOpenInterval<usize> {
        let index = row_index.get();
        debug_assert!(
            index < self.num_rows(),
            "called `SeatingModel::row_span` with row index out of bounds: the len is {} but the index is {}",
            self.num_rows(),
            index
        );

        self.row_spans[index]
    }

    /// Returns the name of `row_index`.
    #[inline]
    pub fn row_name(&self, row_index: RowIndex) -> &str {
        let index = row_index.get();
        debug_assert!(
            index < self.num_rows(),
            "called `SeatingModel::row_name` with row index out of bounds: the len is {} but the index is {}",
            self.num_rows(),
            index
        );

        &self.row_names[index]
    }

    /// Iterates over the seats of `row_index` from position 0 upwards.
    #[inline]
    pub fn row_seats(&self, row_index: RowIndex) -> impl Iterator<Item = Seat> + use<> {
        (0..self.row_len(row_index)).map(move |position| Seat::new(row_index, position))
    }

    /// Returns the length of the longest row, or 0 if the hall has no rows.
    #[inline]
    pub fn max_row_len(&self) -> usize {
        self.row_spans.iter().map(|span| span.len()).max().unwrap_or(0)
    }

    /// Returns, for every global seat, the row it belongs to.
    #[inline]
    pub fn seat_rows(&self) -> &[RowIndex] {
        &self.seat_rows
    }

    /// Converts a global seat into a row-local `Seat`.
    ///
    /// # Panics
    ///
    /// Panics if `global` is not in `0..num_seats()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tribune_model::model::SeatingModelBuilder;
    /// # use tribune_model::index::RowIndex;
    /// let mut builder = SeatingModelBuilder::new(["Opening"]);
    /// builder.add_row("A", 3).add_row("B", 4);
    /// let model = builder.build().unwrap();
    ///
    /// let seat = model.seat_at(4);
    /// assert_eq!(seat.row(), RowIndex::new(1));
    /// assert_eq!(seat.position(), 1);
    /// assert_eq!(model.global_seat(seat), 4);
    /// ```
    #[inline]
    pub fn seat_at(&self, global: usize) -> Seat {
        debug_assert!(
            global < self.num_seats(),
            "called `SeatingModel::seat_at` with global seat out of bounds: the len is {} but the index is {}",
            self.num_seats(),
            global
        );

        let row = self.seat_rows[global];
        Seat::new(row, global - self.row_base(row))
    }

    /// Converts a row-local `Seat` into its global seat.
    ///
    /// # Panics
    ///
    /// Panics if the seat's row does not exist. In debug builds, also panics if
    /// the position lies outside the row.
    #[inline]
    pub fn global_seat(&self, seat: Seat) -> usize {
        debug_assert!(
            seat.position() < self.row_len(seat.row()),
            "called `SeatingModel::global_seat` with position out of bounds: the len is {} but the index is {}",
            self.row_len(seat.row()),
            seat.position()
        );

        self.row_base(seat.row()) + seat.position()
    }

    /// Returns `true` if `seat` names an existing row and a position inside it.
    #[inline]
    pub fn contains_seat(&self, seat: Seat) -> bool {
        seat.row().get() < self.num_rows() && seat.position() < self.row_len(seat.row())
    }

    /// Returns every global start `p` such that `[p, p + length)` lies inside a
    /// single row, in ascending order. A block of length 0 has no placement.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use tribune_model::model::SeatingModelBuilder;
    /// let mut builder = SeatingModelBuilder::new(["Opening"]);
    /// builder.add_row("A", 3).add_row("B", 2);
    /// let model = builder.build().unwrap();
    ///
    /// assert_eq!(model.block_starts(2), vec![0, 1, 3]);
    /// assert_eq!(model.block_starts(3), vec![0]);
    /// assert!(model.block_starts(4).is_empty());
    /// ```
    pub fn block_starts(&self, length: usize) -> Vec<usize> {
        if length == 0 {
            return Vec::new();
        }

        self.row_spans
            .iter()
            .filter(|span| span.len() >= length)
            .flat_map(|span| span.start()..=span.end() - length)
            .collect()
    }

    /// Returns the name of `session_index`.
    #[inline]
    pub fn session_name(&self, session_index: SessionIndex) -> &str {
        let index = session_index.get();
        debug_assert!(
            index < self.num_sessions(),
            "called `SeatingModel::session_name` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            index
        );

        &self.session_names[index]
    }

    /// Returns the name of `organization_index`.
    #[inline]
    pub fn organization_name(&self, organization_index: OrganizationIndex) -> &str {
        let index = organization_index.get();
        debug_assert!(
            index < self.num_organizations(),
            "called `SeatingModel::organization_name` with organization index out of bounds: the len is {} but the index is {}",
            self.num_organizations(),
            index
        );

        &self.organization_names[index]
    }

    /// Looks up an organization by its name.
    #[inline]
    pub fn organization_by_name(&self, name: &str) -> Option<OrganizationIndex> {
        self.organization_lookup.get(name).copied()
    }

    /// Returns the delegates of `organization_index` in declaration order.
    #[inline]
    pub fn organization_delegates(
        &self,
        organization_index: OrganizationIndex,
    ) -> &[DelegateIndex] {
        let index = organization_index.get();
        debug_assert!(
            index < self.num_organizations(),
            "called `SeatingModel::organization_delegates` with organization index out of bounds: the len is {} but the index is {}",
            self.num_organizations(),
            index
        );

        &self.organization_delegates[index]
    }

    /// Returns the name of `delegate_index`.
    #[inline]
    pub fn delegate_name(&self, delegate_index: DelegateIndex) -> &str {
        let index = delegate_index.get();
        debug_assert!(
            index < self.num_delegates(),
            "called `SeatingModel::delegate_name` with delegate index out of bounds: the len is {} but the index is {}",
            self.num_delegates(),
            index
        );

        &self.delegate_names[index]
    }

    /// Returns the organization `delegate_index` belongs to.
    #[inline]
    pub fn delegate_organization(&self, delegate_index: DelegateIndex) -> OrganizationIndex {
        let index = delegate_index.get();
        debug_assert!(
            index < self.num_delegates(),
            "called `SeatingModel::delegate_organization` with delegate index out of bounds: the len is {} but the index is {}",
            self.num_delegates(),
            index
        );

        self.delegate_organizations[index]
    }

    /// Returns `true` if `delegate_index` attends `session_index`.
    #[inline]
    pub fn attends(&self, delegate_index: DelegateIndex, session_index: SessionIndex) -> bool {
        debug_assert!(
            delegate_index.get() < self.num_delegates(),
            "called `SeatingModel::attends` with delegate index out of bounds: the len is {} but the index is {}",
            self.num_delegates(),
            delegate_index.get()
        );
        debug_assert!(
            session_index.get() < self.num_sessions(),
            "called `SeatingModel::attends` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            session_index.get()
        );

        self.attendance.contains(flatten_index(
            self.num_sessions(),
            delegate_index.get(),
            session_index,
        ))
    }

    /// Iterates over the delegates of `organization_index` attending
    /// `session_index`, in ascending delegate order.
    #[inline]
    pub fn attendees(
        &self,
        organization_index: OrganizationIndex,
        session_index: SessionIndex,
    ) -> impl Iterator<Item = DelegateIndex> + '_ {
        self.organization_delegates(organization_index)
            .iter()
            .copied()
            .filter(move |&delegate| self.attends(delegate, session_index))
    }

    /// Returns the number of delegates of `organization_index` attending
    /// `session_index`. This is the length of the organization's block.
    #[inline]
    pub fn demand(
        &self,
        organization_index: OrganizationIndex,
        session_index: SessionIndex,
    ) -> usize {
        debug_assert!(
            organization_index.get() < self.num_organizations(),
            "called `SeatingModel::demand` with organization index out of bounds: the len is {} but the index is {}",
            self.num_organizations(),
            organization_index.get()
        );
        debug_assert!(
            session_index.get() < self.num_sessions(),
            "called `SeatingModel::demand` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            session_index.get()
        );

        self.demand[flatten_index(
            self.num_sessions(),
            organization_index.get(),
            session_index,
        )]
    }

    /// Returns the largest demand of `organization_index` over all sessions.
    #[inline]
    pub fn peak_demand(&self, organization_index: OrganizationIndex) -> usize {
        self.sessions()
            .map(|session| self.demand(organization_index, session))
            .max()
            .unwrap_or(0)
    }

    /// Returns the number of delegates attending `session_index`.
    #[inline]
    pub fn session_demand(&self, session_index: SessionIndex) -> usize {
        let index = session_index.get();
        debug_assert!(
            index < self.num_sessions(),
            "called `SeatingModel::session_demand` with session index out of bounds: the len is {} but the index is {}",
            self.num_sessions(),
            index
        );

        self.session_demand[index]
    }

    /// Returns the number of `(delegate, session)` attendances in the model.
    #[inline]
    pub fn num_attendances(&self) -> usize {
        self.attendance.count_ones(..)
    }

    /// Returns the first session whose demand exceeds the number of seats.
    ///
    /// Such a model has no seating at all, whatever the encoding.
    pub fn capacity_shortfall(&self) -> Option<CapacityShortfall> {
        let seats = self.num_seats();
        self.sessions().find_map(|session| {
            let demand = self.session_demand(session);
            (demand > seats).then_some(CapacityShortfall {
                session,
                demand,
                seats,
            })
        })
    }

    /// Builds the sub-model over the given rows and organizations.
    ///
    /// Sessions are kept as they are. The delegates of the selected
    /// organizations are carried over in their original relative order. The
    /// returned maps translate the sub-model's indices back into this model.
    ///
    /// # Panics
    ///
    /// Panics if a row or organization index is out of bounds.
    pub fn restrict(
        &self,
        rows: &[RowIndex],
        organizations: &[OrganizationIndex],
    ) -> RestrictedModel {
        let rows_parts: Vec<(String, usize)> = rows
            .iter()
            .map(|&row| (self.row_name(row).to_string(), self.row_len(row)))
            .collect();

        let mut delegate_map = Vec::new();
        let mut delegates = Vec::new();
        for (local, &organization) in organizations.iter().enumerate() {
            for &delegate in self.organization_delegates(organization) {
                let attends: Vec<bool> = self
                    .sessions()
                    .map(|session| self.attends(delegate, session))
                    .collect();
                delegates.push((
                    OrganizationIndex::new(local),
                    self.delegate_name(delegate).to_string(),
                    attends,
                ));
                delegate_map.push(delegate);
            }
        }

        let model = SeatingModel::assemble(ModelParts {
            session_names: self.session_names.clone(),
            rows: rows_parts,
            organization_names: organizations
                .iter()
                .map(|&organization| self.organization_name(organization).to_string())
                .collect(),
            delegates,
        });

        RestrictedModel {
            model,
            rows: rows.to_vec(),
            organizations: organizations.to_vec(),
            delegates: delegate_map,
        }
    }
}

impl std::fmt::Display for SeatingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeatingModel(delegates: {}, organizations: {}, seats: {}, rows: {}, sessions: {})",
            self.num_delegates(),
            self.num_organizations(),
            self.num_seats(),
            self.num_rows(),
            self.num_sessions()
        )
    }
}

/// A sub-model together with the maps from its indices to the parent's.
#[derive(Clone, Debug)]
pub struct RestrictedModel {
    model: SeatingModel,
    rows: Vec<RowIndex>,
    organizations: Vec<OrganizationIndex>,
    delegates: Vec<DelegateIndex>,
}

impl RestrictedModel {
    /// Returns the sub-model.
    #[inline]
    pub fn model(&self) -> &SeatingModel {
        &self.model
    }

    /// Maps each local row to its row in the parent model.
    #[inline]
    pub fn row_map(&self) -> &[RowIndex] {
        &self.rows
    }

    /// Maps each local organization to its organization in the parent model.
    #[inline]
    pub fn organization_map(&self) -> &[OrganizationIndex] {
        &self.organizations
    }

    /// Maps each local delegate to its delegate in the parent model.
    #[inline]
    pub fn delegate_map(&self) -> &[DelegateIndex] {
        &self.delegates
    }
}

/// Collects rows, organizations and delegates, then validates them into a
/// `SeatingModel`.
///
/// Nothing is checked while adding. `build` checks sessions first, then rows
/// and organizations in insertion order, then every delegate in insertion
/// order, and returns the first violation it meets.
///
/// # Examples
///
/// ```rust
/// # use tribune_model::model::SeatingModelBuilder;
/// let mut builder = SeatingModelBuilder::new(["Plenary", "Workshop"]);
/// builder
///     .add_row("Front", 4)
///     .add_organization("Acme")
///     .add_delegate("Acme", "Ada", [true, true])
///     .add_delegate("Acme", "Alan", [true, false]);
/// let model = builder.build().unwrap();
///
/// assert_eq!(model.num_delegates(), 2);
/// let acme = model.organization_by_name("Acme").unwrap();
/// assert_eq!(model.demand(acme, model.sessions().next().unwrap()), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SeatingModelBuilder {
    session_names: Vec<String>,
    rows: Vec<(String, usize)>,
    organization_names: Vec<String>,
    delegates: Vec<(String, String, Vec<bool>)>,
}

impl SeatingModelBuilder {
    /// Creates a builder for the given ordered sessions.
    pub fn new<I, S>(session_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            session_names: session_names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Returns the number of sessions.
    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.session_names.len()
    }

    /// Appends a row with `seats` seats. Rows are laid out in call order.
    #[inline]
    pub fn add_row(&mut self, name: impl Into<String>, seats: usize) -> &mut Self {
        self.rows.push((name.into(), seats));
        self
    }

    /// Declares an organization.
    #[inline]
    pub fn add_organization(&mut self, name: impl Into<String>) -> &mut Self {
        self.organization_names.push(name.into());
        self
    }

    /// Adds a delegate of `organization` with one attendance flag per session.
    #[inline]
    pub fn add_delegate<A>(
        &mut self,
        organization: impl Into<String>,
        name: impl Into<String>,
        attendance: A,
    ) -> &mut Self
    where
        A: IntoIterator<Item = bool>,
    {
        self.delegates.push((
            organization.into(),
            name.into(),
            attendance.into_iter().collect(),
        ));
        self
    }

    /// Validates the collected input and builds the model.
    ///
    /// # Errors
    ///
    /// Returns the first `ModelError` found in the order documented on the type.
    pub fn build(self) -> Result<SeatingModel, ModelError> {
        if self.session_names.is_empty() {
            return Err(ModelError::NoSessions);
        }

        let mut row_names: FxHashSet<&str> = FxHashSet::default();
        for (name, seats) in &self.rows {
            if *seats == 0 {
                return Err(ModelError::EmptyRow { row: name.clone() });
            }
            if !row_names.insert(name.as_str()) {
                return Err(ModelError::DuplicateRow { row: name.clone() });
            }
        }

        let mut organizations: FxHashMap<&str, OrganizationIndex> = FxHashMap::default();
        for (index, name) in self.organization_names.iter().enumerate() {
            if organizations
                .insert(name.as_str(), OrganizationIndex::new(index))
                .is_some()
            {
                return Err(ModelError::DuplicateOrganization {
                    organization: name.clone(),
                });
            }
        }

        let num_sessions = self.session_names.len();
        let mut seen: FxHashSet<(OrganizationIndex, &str)> = FxHashSet::default();
        let mut delegates = Vec::with_capacity(self.delegates.len());
        for (organization_name, name, attendance) in &self.delegates {
            let Some(&organization) = organizations.get(organization_name.as_str()) else {
                return Err(ModelError::UnknownOrganization {
                    delegate: name.clone(),
                    organization: organization_name.clone(),
                });
            };
            if attendance.len() != num_sessions {
                return Err(ModelError::AttendanceLengthMismatch {
                    delegate: name.clone(),
                    organization: organization_name.clone(),
                    expected: num_sessions,
                    actual: attendance.len(),
                });
            }
            if !attendance.iter().any(|&present| present) {
                return Err(ModelError::NoAttendance {
                    delegate: name.clone(),
                    organization: organization_name.clone(),
                });
            }
            if !seen.insert((organization, name.as_str())) {
                return Err(ModelError::DuplicateDelegate {
                    delegate: name.clone(),
                    organization: organization_name.clone(),
                });
            }
            delegates.push((organization, name.clone(), attendance.clone()));
        }

        Ok(SeatingModel::assemble(ModelParts {
            session_names: self.session_names,
            rows: self.rows,
            organization_names: self.organization_names,
            delegates,
        }))
    }
}

impl std::fmt::Display for SeatingModelBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SeatingModelBuilder(sessions: {}, rows: {}, organizations: {}, delegates: {})",
            self.session_names.len(),
            self.rows.len(),
            self.organization_names.len(),
            self.delegates.len()
        )
    }
}
