//! Core module - configuration and ambient infrastructure
//!
//! - [`ClientSettings`] - Authority URL, timeout, starting mode
//! - [`settings_persistence`] - Load/save settings as JSON
//! - [`CoreError`] - Settings and configuration errors

pub mod error;
pub mod resources;
pub mod settings_persistence;

pub use error::{CoreError, CoreResult};
pub use resources::*;
pub use settings_persistence::{load_or_default, load_settings, save_settings, settings_path};
