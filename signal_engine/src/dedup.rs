//! Per-instrument memory of the last announced direction.
//!
//! The stored direction only ever advances through [`DedupState::confirm`],
//! which the caller invokes after a successful dispatch. A failed dispatch
//! therefore leaves the instrument armed for the next round.

use indexmap::IndexMap;

use crate::classifier::Direction;

/// What the caller should do with a freshly classified direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupVerdict {
    /// Direction was NONE; any stored direction has been dropped.
    /// `rearmed` is true when something was actually removed.
    Cleared { rearmed: bool },
    /// Same as the last announcement, stay quiet.
    Unchanged,
    /// New or flipped direction, try to dispatch it.
    Announce,
}

#[derive(Debug, Clone, Default)]
pub struct DedupState {
    announced: IndexMap<String, Direction>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&mut self, symbol: &str, direction: Direction) -> DedupVerdict {
        if !direction.is_actionable() {
            let rearmed = self.announced.shift_remove(symbol).is_some();
            return DedupVerdict::Cleared { rearmed };
        }
        match self.announced.get(symbol) {
            Some(&stored) if stored == direction => DedupVerdict::Unchanged,
            _ => DedupVerdict::Announce,
        }
    }

    /// Records a successfully dispatched direction. NONE is ignored.
    pub fn confirm(&mut self, symbol: &str, direction: Direction) {
        if direction.is_actionable() {
            self.announced.insert(symbol.to_string(), direction);
        }
    }

    pub fn last_announced(&self, symbol: &str) -> Option<Direction> {
        self.announced.get(symbol).copied()
    }

    /// Forgets every instrument.
    pub fn reset(&mut self) {
        self.announced.clear();
    }

    pub fn len(&self) -> usize {
        self.announced.len()
    }

    pub fn is_empty(&self) -> bool {
        self.announced.is_empty()
    }
}
