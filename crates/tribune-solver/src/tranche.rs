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

//! Splitting very large halls into independently solved tranches.
//!
//! A tranche is a set of rows plus the organizations seated in them. Rows
//! are packed first-fit decreasing into tranches of at most
//! `seats_per_tranche - row_slack` seats. A row longer than that may still
//! join a tranche up to `seats_per_tranche` seats, otherwise it opens its
//! own. Organizations, by descending peak demand, then go to the
//! tranche with the most headroom that keeps `row_force` seats free in every
//! session and has a row long enough for the organization's largest block.
//!
//! The split is a heuristic: a tranche without a seating says nothing about
//! the whole hall.

use thiserror::Error;
use tribune_model::{
    index::{OrganizationIndex, RowIndex},
    model::SeatingModel,
};

pub const DEFAULT_SEATS_PER_TRANCHE: usize = 60;
pub const DEFAULT_ROW_SLACK: usize = 15;
pub const DEFAULT_ROW_FORCE: usize = 5;

/// A planning failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    #[error("organization `{organization}` fits into no tranche")]
    OrganizationDoesNotFit { organization: String },
}

/// Rows and organizations solved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tranche {
    rows: Vec<RowIndex>,
    organizations: Vec<OrganizationIndex>,
    seats: usize,
}

impl Tranche {
    /// Returns the rows in ascending order.
    #[inline]
    pub fn rows(&self) -> &[RowIndex] {
        &self.rows
    }

    /// Returns the organizations in ascending order.
    #[inline]
    pub fn organizations(&self) -> &[OrganizationIndex] {
        &self.organizations
    }

    #[inline]
    pub fn seats(&self) -> usize {
        self.seats
    }
}

/// The tranches of one model. Every row belongs to exactly one tranche and
/// every organization with delegates to exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranchePlan {
    tranches: Vec<Tranche>,
}

impl TranchePlan {
    #[inline]
    pub fn tranches(&self) -> &[Tranche] {
        &self.tranches
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tranches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tranches.is_empty()
    }
}

/// Configures and computes a `TranchePlan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranchePlanner {
    seats_per_tranche: usize,
    row_slack: usize,
    row_force: usize,
}

impl Default for TranchePlanner {
    fn default() -> Self {
        Self {
            seats_per_tranche: DEFAULT_SEATS_PER_TRANCHE,
            row_slack: DEFAULT_ROW_SLACK,
            row_force: DEFAULT_ROW_FORCE,
        }
    }
}

impl TranchePlanner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_seats_per_tranche(mut self, seats: usize) -> Self {
        self.seats_per_tranche = seats;
        self
    }

    /// Seats each tranche should leave below `seats_per_tranche` if the rows
    /// allow it.
    #[inline]
    pub fn with_row_slack(mut self, slack: usize) -> Self {
        self.row_slack = slack;
        self
    }

    /// Seats every tranche keeps free in every session.
    #[inline]
    pub fn with_row_force(mut self, force: usize) -> Self {
        self.row_force = force;
        self
    }

    #[inline]
    pub fn seats_per_tranche(&self) -> usize {
        self.seats_per_tranche
    }

    #[inline]
    pub fn row_slack(&self) -> usize {
        self.row_slack
    }

    #[inline]
    pub fn row_force(&self) -> usize {
        self.row_force
    }

    /// Splits `model` into tranches.
    ///
    /// # Errors
    ///
    /// `PlanningError::OrganizationDoesNotFit` if some organization cannot
    /// be placed in any tranche.
    pub fn plan(&self, model: &SeatingModel) -> Result<TranchePlan, PlanningError> {
        let mut tranches = self.pack_rows(model);
        self.assign_organizations(model, &mut tranches)?;
        for tranche in &mut tranches {
            tranche.rows.sort_unstable();
            tranche.organizations.sort_unstable();
        }
        Ok(TranchePlan { tranches })
    }

    fn pack_rows(&self, model: &SeatingModel) -> Vec<Tranche> {
        let optimum = self.seats_per_tranche.saturating_sub(self.row_slack);
        let mut rows: Vec<RowIndex> = model.rows().collect();
        rows.sort_by_key(|&row| std::cmp::Reverse(model.row_len(row)));

        let mut tranches: Vec<Tranche> = Vec::new();
        for row in rows {
            let len = model.row_len(row);
            let limit = if len > optimum {
                self.seats_per_tranche
            } else {
                optimum
            };
            let target = tranches
                .iter()
                .position(|tranche| tranche.seats + len <= limit);
            match target {
                Some(index) => {
                    tranches[index].rows.push(row);
                    tranches[index].seats += len;
                }
                None => tranches.push(Tranche {
                    rows: vec![row],
                    organizations: Vec::new(),
                    seats: len,
                }),
            }
        }
        tranches
    }

    fn assign_organizations(
        &self,
        model: &SeatingModel,
        tranches: &mut [Tranche],
    ) -> Result<(), PlanningError> {
        let num_sessions = model.num_sessions();
        let mut load = vec![0usize; tranches.len() * num_sessions];
        let longest_row: Vec<usize> = tranches
            .iter()
            .map(|tranche| {
                tranche
                    .rows
                    .iter()
                    .map(|&row| model.row_len(row))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut organizations: Vec<OrganizationIndex> = model
            .organizations()
            .filter(|&organization| model.peak_demand(organization) > 0)
            .collect();
        organizations
            .sort_by_key(|&organization| std::cmp::Reverse(model.peak_demand(organization)));

        for organization in organizations {
            let peak = model.peak_demand(organization);
            let fits = |index: usize| {
                longest_row[index] >= peak
                    && model.sessions().all(|session| {
                        self.row_force
                            + load[index * num_sessions + session.get()]
                            + model.demand(organization, session)
                            <= tranches[index].seats
                    })
            };
            let headroom = |index: usize| {
                let busiest = (0..num_sessions)
                    .map(|session| load[index * num_sessions + session])
                    .max()
                    .unwrap_or(0);
                tranches[index].seats.saturating_sub(busiest)
            };

            let best = (0..tranches.len())
                .filter(|&index| fits(index))
                .max_by(|&a, &b| headroom(a).cmp(&headroom(b)).then(b.cmp(&a)));
            let Some(index) = best else {
                return Err(PlanningError::OrganizationDoesNotFit {
                    organization: model.organization_name(organization).to_string(),
                });
            };

            for session in model.sessions() {
                load[index * num_sessions + session.get()] += model.demand(organization, session);
            }
            tranches[index].organizations.push(organization);
        }
        Ok(())
    }
}

impl std::fmt::Display for TranchePlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TranchePlanner(seats_per_tranche: {}, row_slack: {}, row_force: {})",
            self.seats_per_tranche, self.row_slack, self.row_force
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tribune_model::model::SeatingModelBuilder;

    fn hall(rows: &[usize], organizations: &[usize]) -> SeatingModel {
        let mut builder = SeatingModelBuilder::new(["s0", "s1"]);
        for (index, &seats) in rows.iter().enumerate() {
            builder.add_row(format!("R{index}"), seats);
        }
        for (index, &size) in organizations.iter().enumerate() {
            let name = format!("O{index}");
            builder.add_organization(name.clone());
            for delegate in 0..size {
                builder.add_delegate(
                    name.clone(),
                    format!("d{delegate}"),
                    [true, delegate % 2 == 0],
                );
            }
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_rows_are_packed_below_the_optimum_first() {
        let model = hall(&[20, 20, 20, 20, 5], &[]);
        let plan = TranchePlanner::new().plan(&model).unwrap();
        // Two rows of 20 per tranche of at most 45, the row of 5 joins the first.
        let seats: Vec<usize> = plan.tranches().iter().map(Tranche::seats).collect();
        assert_eq!(seats, vec![45, 40]);
        let total_rows: usize = plan.tranches().iter().map(|t| t.rows().len()).sum();
        assert_eq!(total_rows, 5);
    }

    #[test]
    fn test_long_rows_get_their_own_tranche() {
        let model = hall(&[80, 10], &[]);
        let plan = TranchePlanner::new().plan(&model).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.tranches()[0].rows(), &[RowIndex::new(0)]);
    }

    #[test]
    fn test_organizations_go_to_the_roomiest_tranche() {
        let model = hall(&[20, 20, 20, 20], &[12, 10, 8, 3]);
        let plan = TranchePlanner::new().plan(&model).unwrap();
        assert_eq!(plan.len(), 2);
        let placed: usize = plan.tranches().iter().map(|t| t.organizations().len()).sum();
        assert_eq!(placed, 4);
        // The two largest organizations end up apart.
        let tranche_of = |organization: usize| {
            plan.tranches()
                .iter()
                .position(|t| t.organizations().contains(&OrganizationIndex::new(organization)))
                .unwrap()
        };
        assert_ne!(tranche_of(0), tranche_of(1));
    }

    #[test]
    fn test_organization_longer_than_every_row_does_not_fit() {
        let model = hall(&[10, 10, 10], &[12]);
        assert_eq!(
            TranchePlanner::new().plan(&model),
            Err(PlanningError::OrganizationDoesNotFit {
                organization: "O0".to_string()
            })
        );
    }

    #[test]
    fn test_row_force_keeps_seats_free() {
        let model = hall(&[10], &[6]);
        assert!(TranchePlanner::new().plan(&model).is_err());
        assert!(
            TranchePlanner::new()
                .with_row_force(4)
                .plan(&model)
                .is_ok()
        );
    }
}
