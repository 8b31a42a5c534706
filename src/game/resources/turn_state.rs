//! Submission phase tracking
//!
//! Tracks where the move-submission flow currently is so presentation can
//! tell an idle board from one waiting on the authority or on a promotion
//! choice.

use std::fmt;

/// Phase of the move-submission state machine
///
/// Valid transitions:
/// - `Idle` → `AwaitingLegalMoves` (grab of a piece owned by the side to move)
/// - `AwaitingLegalMoves` → `Idle` (legal-target query finished either way)
/// - `Idle` → `MoveInFlight` (drop)
/// - `MoveInFlight` → `AwaitingPromotionChoice` (authority asked for a kind)
/// - `AwaitingPromotionChoice` → `MoveInFlight` (choice made, move resubmitted)
/// - `MoveInFlight` → `ApplyingResult` → `Idle` (definitive response)
/// - `MoveInFlight` → `Idle` (failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionPhase {
    /// Waiting for a gesture
    #[default]
    Idle,

    /// Legal targets for the grabbed piece are being fetched
    AwaitingLegalMoves,

    /// A move (or the AI reply) is with the authority
    MoveInFlight,

    /// The authority needs a promotion kind before it applies the move
    AwaitingPromotionChoice,

    /// A confirmed snapshot is being written to the session store
    ApplyingResult,
}

impl fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionPhase::Idle => "idle",
            SubmissionPhase::AwaitingLegalMoves => "awaiting legal moves",
            SubmissionPhase::MoveInFlight => "move in flight",
            SubmissionPhase::AwaitingPromotionChoice => "awaiting promotion choice",
            SubmissionPhase::ApplyingResult => "applying result",
        };
        f.write_str(name)
    }
}
