//! Deep merge over semi-structured data.
//!
//! Configuration layers, service indexes and resource documents are all
//! represented as [`Value`] trees and combined with two recursive operations:
//!
//! ```text
//! union(left, right, resolver)         keys of both; right overlays conflicts
//! intersection(left, right, resolver)  keys of both only; resolver decides scalars
//! ```
//!
//! Mapping/mapping recurses, sequence/sequence performs a set operation using
//! structural equality, and every other pairing (scalar/scalar or a kind
//! mismatch such as mapping/scalar) is handed to the [`ConflictResolver`].
//!
//! ## Example
//!
//! ```ignore
//! use cairn::merge::{self, Value};
//!
//! let base = Value::from_yaml_str("system: {debug: false, args: [a]}")?;
//! let user = Value::from_yaml_str("system: {debug: true, args: [b]}")?;
//! let merged = merge::union(&base, &user, &merge::replace);
//! // system: {debug: true, args: [a, b]}
//! ```

#[allow(clippy::module_inception)]
mod merge;
mod value;

pub use merge::{
    ConflictResolver, equal, exists_in, intersection, maps_intersection, maps_union, merge_bytes,
    replace, sequences_intersection, sequences_union, union,
};
pub use value::{Mapping, Scalar, Value};

pub(crate) use merge::document_mapping;
