//! Chess game module - client-side coordination with a remote authority
//!
//! The authority owns the rules. This module holds what the client needs to
//! drive it: the board as last confirmed, the move history, the pending
//! promotion, and the state machine that turns gestures into submissions.
//!
//! # Module Organization
//!
//! - `components` - Plain data (pieces, snapshots, log entries)
//! - `resources` - State owned by the flow (session store, selection, promotion slot)
//! - `systems` - The move-submission state machine
//! - `square` - Coordinate and square-name codec
//! - `error` - Game error types

pub mod components;
pub mod error;
pub mod resources;
pub mod square;
pub mod systems;

pub use error::{GameError, GameResult};
pub use systems::{MoveOutcome, MoveSubmission};
