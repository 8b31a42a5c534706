//! Wire types for the authority's JSON contract
//!
//! ```text
//! GET  legal_moves/{square}  -> [[x, y], ...]
//! POST move                  {"move": "e2e4", "promotion": "q" | null}
//!                            -> snapshot | {"promotionNeeded": true}
//! POST undo                  -> snapshot
//! POST reset                 -> ack
//! POST set_game_mode         {"mode": "pvp" | "ai"} -> ack
//! POST ai_move               -> snapshot
//! ```
//!
//! Snapshots look like
//! `{"pieces": [{"id", "x", "y", "type", "player"}], "playerTurn", "isCheckmate", "isStalemate", "isCheck"}`.

use crate::game::components::{
    BoardSnapshot, GameMode, Outcome, Piece, PieceKind, Player, PromotionKind,
};
use crate::game::square::{Coordinate, SquareName};
use crate::networking::error::{AuthorityError, AuthorityResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source/target pair plus optional promotion kind sent to the authority
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveDescriptor {
    pub source: SquareName,
    pub target: SquareName,
    pub promotion: Option<PromotionKind>,
}

impl MoveDescriptor {
    pub fn new(source: Coordinate, target: Coordinate) -> Self {
        Self {
            source: source.to_name(),
            target: target.to_name(),
            promotion: None,
        }
    }

    pub fn with_promotion(self, kind: PromotionKind) -> Self {
        Self {
            promotion: Some(kind),
            ..self
        }
    }

    /// Concatenated square names, e.g. `e7e8`
    pub fn move_text(&self) -> String {
        format!("{}{}", self.source, self.target)
    }

    pub fn to_request(&self) -> MoveRequest {
        MoveRequest {
            move_text: self.move_text(),
            promotion: self.promotion,
        }
    }
}

impl fmt::Display for MoveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.target)?;
        if let Some(kind) = self.promotion {
            write!(f, "={}", kind.letter())?;
        }
        Ok(())
    }
}

/// Body of `POST move`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub move_text: String,
    pub promotion: Option<PromotionKind>,
}

/// Body of `POST set_game_mode`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRequest {
    pub mode: GameMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDto {
    pub id: String,
    pub x: u8,
    pub y: u8,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub player: Player,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDto {
    pub pieces: Vec<PieceDto>,
    pub player_turn: Player,
    #[serde(default)]
    pub is_checkmate: bool,
    #[serde(default)]
    pub is_stalemate: bool,
    #[serde(default)]
    pub is_check: bool,
}

impl SnapshotDto {
    /// Validate and convert into a confirmed board
    pub fn into_snapshot(self) -> AuthorityResult<BoardSnapshot> {
        let pieces = self
            .pieces
            .into_iter()
            .map(|p| {
                let coordinate = Coordinate::new(p.x, p.y).ok_or_else(|| {
                    AuthorityError::protocol(format!(
                        "piece {:?} is off the board at ({}, {})",
                        p.id, p.x, p.y
                    ))
                })?;
                Ok(Piece::new(p.id, coordinate, p.kind, p.player))
            })
            .collect::<AuthorityResult<Vec<_>>>()?;

        let outcome = Outcome::from_flags(self.is_check, self.is_checkmate, self.is_stalemate);
        BoardSnapshot::new(pieces, self.player_turn, outcome)
            .map_err(|e| AuthorityError::protocol(e.to_string()))
    }
}

impl From<&BoardSnapshot> for SnapshotDto {
    fn from(board: &BoardSnapshot) -> Self {
        let outcome = board.outcome();
        Self {
            pieces: board
                .pieces()
                .map(|p| PieceDto {
                    id: p.id.clone(),
                    x: p.coordinate.file(),
                    y: p.coordinate.rank(),
                    kind: p.kind,
                    player: p.owner,
                })
                .collect(),
            player_turn: board.turn(),
            is_checkmate: outcome == Outcome::Checkmate,
            is_stalemate: outcome == Outcome::Stalemate,
            is_check: matches!(outcome, Outcome::Check | Outcome::Checkmate),
        }
    }
}

/// `{"promotionNeeded": true}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionNeededDto {
    pub promotion_needed: bool,
}

/// Either answer to `POST move`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveResponseDto {
    Snapshot(SnapshotDto),
    PromotionNeeded(PromotionNeededDto),
}
