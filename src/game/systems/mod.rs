//! Game systems - the flows that change session state
//!
//! - [`submission`] - Grab/drop handling, authority round trips, promotion
//!   suspension and the AI reply

pub mod submission;

pub use submission::{MoveOutcome, MoveSubmission};
