//! Client-side coordinator for chess against a remote authority
//!
//! The authority owns legality, outcome detection and the AI. This crate
//! turns grab/drop gestures into authority round trips, handles the extra
//! promotion round trip, and keeps the confirmed board and move history for
//! presentation to render.

pub mod core;
pub mod game;
pub mod networking;

pub use crate::core::ClientSettings;
pub use game::{MoveOutcome, MoveSubmission};
pub use networking::{Authority, HttpAuthority};
