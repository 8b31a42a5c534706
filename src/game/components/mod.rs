//! Chess game components module
//!
//! Components are plain data with no I/O.
//! Organized by domain: pieces and game state.

pub mod game_state;
pub mod piece;


// Re-export all components for convenience
pub use game_state::*;
pub use piece::*;
