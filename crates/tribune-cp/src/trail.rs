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

//! Undo log for domain changes.
//!
//! Every decision opens a frame. The first time a variable's domain changes
//! inside a frame, its previous domain is pushed onto the trail; later changes
//! in the same frame need no further entry. Popping a frame restores the saved
//! domains in reverse order. Frames carry a never-reused stamp so a variable
//! saved in a discarded frame is saved again when its parent changes it.

use crate::{domain::Domain, index::VarId};

/// A saved domain of one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailEntry {
    variable: VarId,
    previous: Domain,
}

impl TrailEntry {
    /// Returns the variable whose domain was saved.
    #[inline]
    pub fn variable(&self) -> VarId {
        self.variable
    }

    /// Returns the saved domain.
    #[inline]
    pub fn previous(&self) -> &Domain {
        &self.previous
    }
}

impl std::fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(variable: {}, previous: {})",
            self.variable, self.previous
        )
    }
}

/// The boundaries of one decision level on the trail.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameEntry {
    entry_start_index: usize,
    stamp: u64,
}

impl FrameEntry {
    #[inline(always)]
    pub fn new(entry_start_index: usize, stamp: u64) -> Self {
        Self {
            entry_start_index,
            stamp,
        }
    }

    /// Returns the index of the first trail entry recorded in this frame.
    #[inline]
    pub fn entry_start_index(&self) -> usize {
        self.entry_start_index
    }

    /// Returns the unique stamp of this frame.
    #[inline]
    pub fn stamp(&self) -> u64 {
        self.stamp
    }
}

impl std::fmt::Display for FrameEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FrameEntry(entry_start_index: {}, stamp: {})",
            self.entry_start_index, self.stamp
        )
    }
}

/// A linear undo log of domains with frame markers.
#[derive(Debug, Clone, Default)]
pub struct DomainTrail {
    entries: Vec<TrailEntry>,
    frames: Vec<FrameEntry>,
    saved_in: Vec<u64>,
    next_stamp: u64,
}

impl DomainTrail {
    /// Creates an empty trail for `num_variables` variables.
    #[inline]
    pub fn new(num_variables: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_variables),
            frames: Vec::new(),
            saved_in: vec![0; num_variables],
            next_stamp: 1,
        }
    }

    /// Returns the number of saved domains.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of open frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is open.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new frame.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames
            .push(FrameEntry::new(self.entries.len(), self.next_stamp));
        self.next_stamp += 1;
    }

    /// Returns `true` if a change to `variable` must first save its domain.
    ///
    /// Changes made while no frame is open are permanent.
    #[inline]
    pub fn needs_save(&self, variable: VarId) -> bool {
        match self.frames.last() {
            Some(frame) => self.saved_in[variable.get()] != frame.stamp(),
            None => false,
        }
    }

    /// Records the domain `variable` had before its first change in the
    /// current frame.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if no frame is open.
    #[inline]
    pub fn save(&mut self, variable: VarId, previous: Domain) {
        debug_assert!(
            !self.frames.is_empty(),
            "called `DomainTrail::save` without an open frame"
        );

        if let Some(frame) = self.frames.last() {
            self.saved_in[variable.get()] = frame.stamp();
            self.entries.push(TrailEntry { variable, previous });
        }
    }

    /// Closes the current frame and writes every saved domain back into
    /// `domains`, newest first. Does nothing if no frame is open.
    pub fn pop_frame(&mut self, domains: &mut [Domain]) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        while self.entries.len() > frame.entry_start_index() {
            if let Some(entry) = self.entries.pop() {
                domains[entry.variable.get()] = entry.previous;
            }
        }
    }

    /// Closes every open frame, restoring the root domains.
    pub fn reset(&mut self, domains: &mut [Domain]) {
        while !self.frames.is_empty() {
            self.pop_frame(domains);
        }
    }
}

impl std::fmt::Display for DomainTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DomainTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
