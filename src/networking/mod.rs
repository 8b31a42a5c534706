//! Networking module - Remote authority client
//!
//! - [`client`] - The [`Authority`] trait and its HTTP implementation
//! - [`protocol`] - JSON wire types and move descriptors
//! - [`error`] - Transport and protocol errors

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{Authority, HttpAuthority, MoveReply};
pub use error::{AuthorityError, AuthorityResult};
pub use protocol::MoveDescriptor;
