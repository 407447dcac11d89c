// Copyright 2025 the Lattice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generation-stamped visit marks for deduplicating query results.

/// Per-slot "already reported" marks, reset in O(1) per query.
///
/// Each query bumps a generation counter; a slot counts as visited when its
/// stamp equals the current generation. Clearing only happens when the
/// counter wraps. Reuse one `VisitMarks` across queries to avoid allocating.
#[derive(Clone, Debug, Default)]
pub struct VisitMarks {
    stamps: Vec<u32>,
    generation: u32,
}

impl VisitMarks {
    /// Create empty marks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query over `slots` slots. Every slot becomes unvisited.
    pub fn begin(&mut self, slots: usize) {
        if self.stamps.len() < slots {
            self.stamps.resize(slots, 0);
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }
    }

    /// Mark `slot` visited. Returns `true` on the first visit in this query.
    pub fn mark(&mut self, slot: usize) -> bool {
        if slot >= self.stamps.len() {
            self.stamps.resize(slot + 1, 0);
        }
        let stamp = &mut self.stamps[slot];
        if *stamp == self.generation {
            false
        } else {
            *stamp = self.generation;
            true
        }
    }

    /// Whether `slot` was marked in this query.
    pub fn is_marked(&self, slot: usize) -> bool {
        self.stamps.get(slot) == Some(&self.generation)
    }
}
