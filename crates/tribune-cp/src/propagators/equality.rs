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

/// `left == right`, enforced by intersecting both domains.
#[derive(Debug, Clone)]
pub struct Equality {
    variables: [VarId; 2],
}

impl Equality {
    #[inline]
    pub fn new(left: VarId, right: VarId) -> Self {
        Self {
            variables: [left, right],
        }
    }
}

impl Propagator for Equality {
    fn name(&self) -> &'static str {
        "Equality"
    }

    fn variables(&self) -> &[VarId] {
        &self.variables
    }

    fn propagate(&self, store: &mut DomainStore) -> Result<(), Conflict> {
        let [left, right] = self.variables;
        if left == right {
            return Ok(());
        }
        let right_domain = store.domain(right).clone();
        store.intersect(left, &right_domain)?;
        // left is now a subset of right.
        if store.domain(left).size() < right_domain.size() {
            let left_domain = store.domain(left).clone();
            store.intersect(right, &left_domain)?;
        }
        Ok(())
    }

    fn is_satisfied(&self, valuation: &Valuation) -> bool {
        valuation.value(self.variables[0]) == valuation.value(self.variables[1])
    }
}
