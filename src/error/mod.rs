//! Error types shared across the crate.
//!
//! Missing containers and identity mismatches are normal reconciliation
//! states and never surface here. Only collaborator failures and host setup
//! problems do.

mod types;

pub use types::{RenderError, Result, SlotError};
