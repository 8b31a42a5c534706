//! Game resources - state owned by the submission flow
//!
//! # Resource Categories
//!
//! ## Session
//! - [`SessionStore`] - Confirmed board, mode, selection and history
//! - [`SessionFrame`] - Read-only copy published to presentation
//!
//! ## Player Interaction
//! - [`Selection`] - Piece in hand and its legal targets
//! - [`PromotionCoordinator`] - Pending promotion choice
//!
//! ## Game History
//! - [`MoveHistory`] - Confirmed moves in order
//!
//! ## Flow
//! - [`SubmissionPhase`] - Where the submission state machine currently is

pub mod history;
pub mod promotion;
pub mod selection;
pub mod session;
pub mod turn_state;

pub use history::*;
pub use promotion::*;
pub use selection::*;
pub use session::*;
pub use turn_state::*;
