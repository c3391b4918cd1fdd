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

//! The mutable domains of a running search.

use crate::{domain::Domain, index::VarId, trail::DomainTrail};
use fixedbitset::FixedBitSet;

/// Raised by a propagator when some domain became empty or a constraint
/// cannot be satisfied by the current domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Conflict;

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Conflict")
    }
}

/// The current domains together with their trail and the set of variables
/// changed since the last call to `drain_changed`.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<Domain>,
    trail: DomainTrail,
    changed: Vec<VarId>,
    changed_flags: FixedBitSet,
}

impl DomainStore {
    /// Creates a store over the given root domains.
    pub fn new(domains: Vec<Domain>) -> Self {
        let num_variables = domains.len();
        Self {
            domains,
            trail: DomainTrail::new(num_variables),
            changed: Vec::new(),
            changed_flags: FixedBitSet::with_capacity(num_variables),
        }
    }

    #[inline]
    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    /// Returns the current domain of `variable`.
    #[inline]
    pub fn domain(&self, variable: VarId) -> &Domain {
        let index = variable.get();
        debug_assert!(
            index < self.domains.len(),
            "called `DomainStore::domain` with variable out of bounds: the len is {} but the index is {}",
            self.domains.len(),
            index
        );

        &self.domains[index]
    }

    /// Returns all current domains, indexed by variable.
    #[inline]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    #[inline]
    pub fn is_fixed(&self, variable: VarId) -> bool {
        self.domain(variable).is_fixed()
    }

    /// Returns the number of open decision levels.
    #[inline]
    pub fn depth(&self) -> usize {
        self.trail.depth()
    }

    /// Opens a decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.trail.push_frame();
    }

    /// Undoes every change made since the matching `push_frame`.
    #[inline]
    pub fn pop_frame(&mut self) {
        self.trail.pop_frame(&mut self.domains);
        self.clear_changed();
    }

    /// Applies `change` to the domain of `variable`, saving the old domain on
    /// the trail first if needed. The public mutators screen out no-op
    /// changes before calling this, since saving clones the domain.
    ///
    /// Returns `Ok(true)` if the domain shrank and `Err(Conflict)` if it
    /// became empty.
    fn update<F>(&mut self, variable: VarId, change: F) -> Result<bool, Conflict>
    where
        F: FnOnce(&mut Domain) -> bool,
    {
        let index = variable.get();
        if self.trail.needs_save(variable) {
            let mut next = self.domains[index].clone();
            if !change(&mut next) {
                return Ok(false);
            }
            let previous = std::mem::replace(&mut self.domains[index], next);
            self.trail.save(variable, previous);
        } else if !change(&mut self.domains[index]) {
            return Ok(false);
        }

        if self.domains[index].is_empty() {
            return Err(Conflict);
        }
        if !self.changed_flags.contains(index) {
            self.changed_flags.insert(index);
            self.changed.push(variable);
        }
        Ok(true)
    }

    #[inline]
    pub fn assign(&mut self, variable: VarId, value: i64) -> Result<bool, Conflict> {
        if self.domain(variable).value() == Some(value) {
            return Ok(false);
        }
        self.update(variable, |domain| domain.assign(value))
    }

    #[inline]
    pub fn remove(&mut self, variable: VarId, value: i64) -> Result<bool, Conflict> {
        if !self.domain(variable).contains(value) {
            return Ok(false);
        }
        self.update(variable, |domain| domain.remove(value))
    }

    #[inline]
    pub fn remove_range(&mut self, variable: VarId, lo: i64, hi: i64) -> Result<bool, Conflict> {
        let domain = self.domain(variable);
        if hi < lo || hi < domain.min() || lo > domain.max() {
            return Ok(false);
        }
        self.update(variable, |domain| domain.remove_range(lo, hi))
    }

    #[inline]
    pub fn set_min(&mut self, variable: VarId, lo: i64) -> Result<bool, Conflict> {
        if lo <= self.domain(variable).min() {
            return Ok(false);
        }
        self.update(variable, |domain| domain.set_min(lo))
    }

    #[inline]
    pub fn set_max(&mut self, variable: VarId, hi: i64) -> Result<bool, Conflict> {
        if hi >= self.domain(variable).max() {
            return Ok(false);
        }
        self.update(variable, |domain| domain.set_max(hi))
    }

    #[inline]
    pub fn retain<F>(&mut self, variable: VarId, keep: F) -> Result<bool, Conflict>
    where
        F: FnMut(i64) -> bool,
    {
        self.update(variable, |domain| domain.retain(keep))
    }

    /// Intersects the domain of `variable` with `other`.
    #[inline]
    pub fn intersect(&mut self, variable: VarId, other: &Domain) -> Result<bool, Conflict> {
        self.update(variable, |domain| domain.intersect(other))
    }

    /// Moves the variables changed since the last drain into `out`.
    #[inline]
    pub fn drain_changed(&mut self, out: &mut Vec<VarId>) {
        for &variable in &self.changed {
            self.changed_flags.set(variable.get(), false);
        }
        out.append(&mut self.changed);
    }

    #[inline]
    fn clear_changed(&mut self) {
        for &variable in &self.changed {
            self.changed_flags.set(variable.get(), false);
        }
        self.changed.clear();
    }
}

impl std::fmt::Display for DomainStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fixed = self.domains.iter().filter(|d| d.is_fixed()).count();
        write!(
            f,
            "DomainStore(variables: {}, fixed: {}, depth: {})",
            self.domains.len(),
            fixed,
            self.trail.depth()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DomainStore {
        DomainStore::new(vec![
            Domain::interval(0, 5).unwrap(),
            Domain::interval(0, 5).unwrap(),
        ])
    }

    #[test]
    fn test_changes_are_reported_once() {
        let mut store = store();
        let x = VarId::new(0);
        assert_eq!(store.set_min(x, 2), Ok(true));
        assert_eq!(store.set_max(x, 4), Ok(true));
        assert_eq!(store.set_max(x, 4), Ok(false));

        let mut changed = Vec::new();
        store.drain_changed(&mut changed);
        assert_eq!(changed, vec![x]);

        changed.clear();
        store.drain_changed(&mut changed);
        assert!(changed.is_empty());
    }

    #[test]
    fn test_emptied_domain_is_a_conflict() {
        let mut store = store();
        let x = VarId::new(1);
        assert_eq!(store.set_min(x, 6), Err(Conflict));
    }

    #[test]
    fn test_frames_restore_domains() {
        let mut store = store();
        let x = VarId::new(0);
        store.set_max(x, 4).unwrap();

        store.push_frame();
        store.assign(x, 3).unwrap();
        store.remove(VarId::new(1), 0).unwrap();
        assert_eq!(store.domain(x).value(), Some(3));
        store.pop_frame();

        assert_eq!(store.domain(x).size(), 5);
        assert_eq!(store.domain(VarId::new(1)).size(), 6);
        assert_eq!(store.depth(), 0);
    }
}
