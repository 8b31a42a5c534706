//! Error types for game module
//!
//! Provides custom error types for the submission flow, promotion handling,
//! snapshot validation and input parsing at the presentation boundary.

use crate::networking::AuthorityError;

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A round trip with the authority failed
    #[error("Authority round trip failed: {0}")]
    Authority(#[from] AuthorityError),

    /// A promotion request was created while another one was outstanding
    #[error("A promotion choice is already pending for {source_square}{target_square}")]
    PromotionAlreadyPending {
        source_square: String,
        target_square: String,
    },

    /// The promotion resolver went away before a choice was made
    #[error("Promotion choice was abandoned before it was resolved")]
    PromotionAbandoned,

    /// The authority sent a snapshot that breaks board invariants
    #[error("Invalid snapshot from authority: {message}")]
    InvalidSnapshot { message: String },

    /// Text that is not a square name
    #[error("Invalid square name: {name:?}")]
    InvalidSquare { name: String },

    /// Text that is not a promotion choice
    #[error("Invalid promotion choice: {choice:?} (expected q, r, b or n)")]
    InvalidPromotion { choice: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
