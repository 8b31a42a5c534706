//! Move history tracking
//!
//! Append-only record of confirmed moves for the history panel. Entries are
//! only ever added after the authority confirmed a move; a rejected move
//! leaves no trace. Undo removes exactly the newest entry.

use crate::game::components::MoveLogEntry;

/// Chronological list of confirmed moves
///
/// Index 0 is the first move of the game. Nothing here is persisted; a new
/// game (reset or mode switch) starts from an empty history.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<MoveLogEntry>,
}

impl MoveHistory {
    /// Append a confirmed move
    pub fn add_move(&mut self, entry: MoveLogEntry) {
        self.moves.push(entry);
    }

    /// Remove and return the newest entry, if any
    pub fn pop_last(&mut self) -> Option<MoveLogEntry> {
        self.moves.pop()
    }

    pub fn last_move(&self) -> Option<&MoveLogEntry> {
        self.moves.last()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn moves(&self) -> &[MoveLogEntry] {
        &self.moves
    }
}
