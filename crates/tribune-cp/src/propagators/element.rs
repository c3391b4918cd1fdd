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
    index::VarId,
    propagators::Propagator,
    result::Valuation,
    store::{Conflict, DomainStore},
};

/// `value == table[index]`.
///
/// Keeps the index domain to positions whose entry is still a possible value,
/// and the value domain to entries reachable from a possible index.
#[derive(Debug, Clone)]
pub struct Element {
    variables: [VarId; 2],
    table: Vec<i64>,
}

impl Element {
    #[inline]
    pub fn new(index: VarId, table: Vec<i64>, value: VarId) -> Self {
        Self {
            variables: [index, value],
            table,
        }
    }

    #[inline]
    fn entry(&self, position: i64) -> Option<i64> {
        usize::try_from(position)
            .ok()
            .and_then(|position| self.table.get(position).copied())
    }
}

impl Propagator for Element {
    fn name(&self) -> &'static str {
        "Element"
    }

    fn variables(&self) -> &[VarId] {
        &self.variables
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let [index, value] = self.variables;

        let values = store.domain(value).clone();
        store.retain(index, |position| {
            self.entry(position)
                .is_some_and(|entry| values.contains(entry))
        })?;

        let mut supported: Vec<i64> = store
            .domain(index)
            .iter()
            .filter_map(|position| self.entry(position))
            .collect();
        supported.sort_unstable();
        supported.dedup();
        store.retain(value, |candidate| supported.binary_search(&candidate).is_ok())?;
        Ok(())
    }

    fn is_satisfied(&self, valuation: &Valuation) -> bool {
        let [index, value] = self.variables;
        self.entry(valuation.value(index)) == Some(valuation.value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;

    // Seats 0..5 in rows [0, 0, 0, 1, 1].
    fn row_table() -> Vec<i64> {
        vec![0, 0, 0, 1, 1]
    }

    #[test]
    fn test_fixed_value_restricts_index() {
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 4).unwrap(),
            Domain::interval(1, 1).unwrap(),
        ]);
        let element = Element::new(VarId::new(0), row_table(), VarId::new(1));
        element.propagate(&mut store).unwrap();
        assert_eq!(
            store.domain(VarId::new(0)).iter().collect::<Vec<_>>(),
            vec![3, 4]
        );
    }

    #[test]
    fn test_index_restricts_value_and_drops_out_of_table_positions() {
        let mut store = DomainStore::new(vec![
            Domain::interval(-2, 2).unwrap(),
            Domain::interval(0, 1).unwrap(),
        ]);
        let element = Element::new(VarId::new(0), row_table(), VarId::new(1));
        element.propagate(&mut store).unwrap();
        assert_eq!(store.domain(VarId::new(0)).iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(store.domain(VarId::new(1)).value(), Some(0));
    }

    #[test]
    fn test_unsupported_value_conflicts() {
        let mut store = DomainStore::new(vec![
            Domain::interval(0, 4).unwrap(),
            Domain::interval(2, 3).unwrap(),
        ]);
        let element = Element::new(VarId::new(0), row_table(), VarId::new(1));
        assert_eq!(element.propagate(&mut store), Err(Conflict));
    }

    #[test]
    fn test_is_satisfied() {
        let element = Element::new(VarId::new(0), row_table(), VarId::new(1));
        assert!(element.is_satisfied(&Valuation::new(vec![3, 1], Vec::new())));
        assert!(!element.is_satisfied(&Valuation::new(vec![3, 0], Vec::new())));
        assert!(!element.is_satisfied(&Valuation::new(vec![7, 0], Vec::new())));
    }
}
