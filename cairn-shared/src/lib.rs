//! Cairn Shared - code used by every cairn crate
//!
//! Holds the error taxonomy and the well-known boot constants so the
//! orchestrator and any future helpers agree on both.

pub mod constants;
pub mod errors;

pub use errors::{CairnError, CairnResult};
