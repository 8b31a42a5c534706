//! Selection resource for the piece currently in hand

use crate::game::square::Coordinate;

/// The grabbed piece and its legal targets (AvailableMoves)
///
/// Purely ephemeral: cleared on every drop, never written to history.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    held_piece: Option<String>,
    possible_moves: Vec<Coordinate>,
}

impl Selection {
    pub fn hold(&mut self, piece_id: impl Into<String>) {
        self.held_piece = Some(piece_id.into());
        self.possible_moves.clear();
    }

    pub fn take_held(&mut self) -> Option<String> {
        self.held_piece.take()
    }

    pub fn held_piece(&self) -> Option<&str> {
        self.held_piece.as_deref()
    }

    pub fn set_possible_moves(&mut self, moves: Vec<Coordinate>) {
        self.possible_moves = moves;
    }

    pub fn possible_moves(&self) -> &[Coordinate] {
        &self.possible_moves
    }

    pub fn clear_moves(&mut self) {
        self.possible_moves.clear();
    }

    pub fn clear(&mut self) {
        self.held_piece = None;
        self.possible_moves.clear();
    }
}
