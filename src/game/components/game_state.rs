//! Game state components
//!
//! [`BoardSnapshot`] is the authority-confirmed part of the session: piece
//! placement, whose turn it is and the outcome flags. The client never builds
//! one from local prediction; snapshots come from a round trip or from the
//! fixed initial setup used on reset.

use crate::game::components::piece::{Piece, PieceKind, Player};
use crate::game::error::{GameError, GameResult};
use crate::game::square::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Game outcome as reported by the authority
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl Outcome {
    /// Collapses the wire flags; checkmate beats stalemate beats check
    pub fn from_flags(is_check: bool, is_checkmate: bool, is_stalemate: bool) -> Self {
        if is_checkmate {
            Outcome::Checkmate
        } else if is_stalemate {
            Outcome::Stalemate
        } else if is_check {
            Outcome::Check
        } else {
            Outcome::Ongoing
        }
    }

    pub fn is_game_over(self) -> bool {
        matches!(self, Outcome::Checkmate | Outcome::Stalemate)
    }
}

/// Who plays the second side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    #[serde(rename = "pvp")]
    PlayerVsPlayer,
    #[serde(rename = "ai")]
    PlayerVsAi,
}

impl GameMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::PlayerVsPlayer => "pvp",
            GameMode::PlayerVsAi => "ai",
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" => Ok(GameMode::PlayerVsPlayer),
            "ai" => Ok(GameMode::PlayerVsAi),
            other => Err(format!("unknown game mode {other:?} (expected pvp or ai)")),
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authority-confirmed board: pieces keyed by identity, turn owner, outcome
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    pieces: BTreeMap<String, Piece>,
    turn: Player,
    outcome: Outcome,
}

impl BoardSnapshot {
    /// Builds a snapshot, rejecting duplicate identities and shared squares
    pub fn new(pieces: Vec<Piece>, turn: Player, outcome: Outcome) -> GameResult<Self> {
        let mut occupied = HashSet::with_capacity(pieces.len());
        let mut by_id = BTreeMap::new();
        for piece in pieces {
            if !occupied.insert(piece.coordinate) {
                return Err(GameError::InvalidSnapshot {
                    message: format!("two pieces on {}", piece.coordinate.to_name()),
                });
            }
            if by_id.contains_key(&piece.id) {
                return Err(GameError::InvalidSnapshot {
                    message: format!("duplicate piece id {:?}", piece.id),
                });
            }
            by_id.insert(piece.id.clone(), piece);
        }
        Ok(Self {
            pieces: by_id,
            turn,
            outcome,
        })
    }

    /// Standard starting position, white to move
    ///
    /// Piece ids are the starting square names (`e2`, `g8`, ...).
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let rows = [
            (0, Player::Black, None),
            (1, Player::Black, Some(PieceKind::Pawn)),
            (6, Player::White, Some(PieceKind::Pawn)),
            (7, Player::White, None),
        ];

        let mut pieces = BTreeMap::new();
        for (rank, owner, fill) in rows {
            for file in 0..8u8 {
                let Some(coordinate) = Coordinate::new(file, rank) else {
                    continue;
                };
                let kind = fill.unwrap_or(BACK_RANK[file as usize]);
                let id = coordinate.to_name().to_string();
                pieces.insert(id.clone(), Piece::new(id, coordinate, kind, owner));
            }
        }

        Self {
            pieces,
            turn: Player::White,
            outcome: Outcome::Ongoing,
        }
    }

    pub fn piece(&self, id: &str) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn piece_at(&self, coordinate: Coordinate) -> Option<&Piece> {
        self.pieces.values().find(|p| p.coordinate == coordinate)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_game_over()
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

/// Everything presentation needs about the current game
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Last authority-confirmed board
    pub board: BoardSnapshot,
    /// Locally selected mode; the authority is told about changes
    pub mode: GameMode,
}

impl SessionState {
    pub fn new(mode: GameMode) -> Self {
        Self {
            board: BoardSnapshot::initial(),
            mode,
        }
    }
}

/// One confirmed move in the history panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveLogEntry {
    pub mover: Player,
    pub piece_kind: PieceKind,
    pub source: Coordinate,
    pub target: Coordinate,
    pub captured: Option<PieceKind>,
}

impl MoveLogEntry {
    pub fn piece_label(&self) -> &'static str {
        self.piece_kind.label()
    }

    pub fn captured_label(&self) -> Option<&'static str> {
        self.captured.map(PieceKind::label)
    }

    /// Reconstructs the move that turned `before` into `after`
    ///
    /// Used for moves the client did not submit itself (the AI reply). The
    /// mover is the side to move in `before`; the moved piece is the mover's
    /// piece whose coordinate changed, preferring the king so castling is
    /// logged as a king move. Returns `None` when nothing of the mover moved.
    pub fn infer(before: &BoardSnapshot, after: &BoardSnapshot) -> Option<Self> {
        let mover = before.turn();
        let moved: Vec<(&Piece, &Piece)> = before
            .pieces()
            .filter(|p| p.owner == mover)
            .filter_map(|old| {
                after
                    .piece(&old.id)
                    .filter(|new| new.coordinate != old.coordinate)
                    .map(|new| (old, new))
            })
            .collect();

        let (old, new) = moved
            .iter()
            .find(|(old, _)| old.kind == PieceKind::King)
            .or_else(|| moved.first())
            .copied()?;

        let captured = before
            .piece_at(new.coordinate)
            .filter(|p| p.owner != mover)
            .map(|p| p.kind);

        Some(Self {
            mover,
            piece_kind: old.kind,
            source: old.coordinate,
            target: new.coordinate,
            captured,
        })
    }
}

impl fmt::Display for MoveLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} → {}",
            self.mover,
            self.piece_label(),
            self.source.to_name(),
            self.target.to_name()
        )?;
        if let Some(captured) = self.captured_label() {
            write!(f, " (captures {captured})")?;
        }
        Ok(())
    }
}
