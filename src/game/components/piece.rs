//! Piece data as reported by the authority
//!
//! Pieces are plain values here: the authority owns every rule, so the client
//! only needs identity, placement, kind and owner to drive the submission flow
//! and to label history entries.

use crate::game::error::GameError;
use crate::game::square::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chess piece kinds, spelled lowercase on the wire (`"pawn"`, `"queen"`, ...)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Capitalized name used in move history ("Pawn", "Knight", ...)
    pub fn label(self) -> &'static str {
        match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        }
    }

    /// Single letter used by text boards, uppercase for white
    pub fn symbol(self, owner: Player) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match owner {
            Player::White => c.to_ascii_uppercase(),
            Player::Black => c,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two sides. White is the first player and moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
}

impl Player {
    pub fn label(self) -> &'static str {
        match self {
            Player::White => "White",
            Player::Black => "Black",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A piece in an authority-confirmed snapshot
///
/// `id` is stable for the lifetime of a game: a piece keeps it when it moves
/// and when a pawn is promoted in place. It is the only field used to
/// correlate a grab gesture with a piece.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: String,
    pub coordinate: Coordinate,
    pub kind: PieceKind,
    pub owner: Player,
}

impl Piece {
    pub fn new(id: impl Into<String>, coordinate: Coordinate, kind: PieceKind, owner: Player) -> Self {
        Self {
            id: id.into(),
            coordinate,
            kind,
            owner,
        }
    }
}

/// Piece kinds a pawn may promote to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionKind {
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

impl PromotionKind {
    pub const ALL: [PromotionKind; 4] = [
        PromotionKind::Queen,
        PromotionKind::Rook,
        PromotionKind::Bishop,
        PromotionKind::Knight,
    ];

    /// Letter understood by the authority and by the promotion prompt
    pub fn letter(self) -> char {
        match self {
            PromotionKind::Queen => 'q',
            PromotionKind::Rook => 'r',
            PromotionKind::Bishop => 'b',
            PromotionKind::Knight => 'n',
        }
    }

    pub fn piece_kind(self) -> PieceKind {
        match self {
            PromotionKind::Queen => PieceKind::Queen,
            PromotionKind::Rook => PieceKind::Rook,
            PromotionKind::Bishop => PieceKind::Bishop,
            PromotionKind::Knight => PieceKind::Knight,
        }
    }
}

impl FromStr for PromotionKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "queen" => Ok(PromotionKind::Queen),
            "r" | "rook" => Ok(PromotionKind::Rook),
            "b" | "bishop" => Ok(PromotionKind::Bishop),
            "n" | "knight" => Ok(PromotionKind::Knight),
            other => Err(GameError::InvalidPromotion {
                choice: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.piece_kind().label())
    }
}
