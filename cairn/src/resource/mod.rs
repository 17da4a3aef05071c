//! Resource resolution for configuration layers and service definitions.
//!
//! A location identifier is resolved in priority order:
//!
//! ```text
//! http://… | https://…   GET (requires networking)
//! /absolute/path         local file
//! bare-name              {base}/{first char}/{bare-name}.yml for each base URL
//! ```

mod index;
mod loader;

pub use loader::{ResourceLoader, candidate_url, is_remote};

#[cfg(test)]
pub(crate) use loader::test_server;
