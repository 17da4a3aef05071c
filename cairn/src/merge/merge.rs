//! Recursive union and intersection over [`Value`] trees.

use super::value::{Mapping, Value};
use cairn_shared::errors::{CairnError, CairnResult};

/// Decides the outcome when both sides hold a value for the same key and
/// they are not both mappings or both sequences.
///
/// Returning `None` means "no value": union keeps the left value, intersection
/// drops the key.
pub trait ConflictResolver {
    fn resolve(&self, left: &Value, right: &Value) -> Option<Value>;
}

impl<F> ConflictResolver for F
where
    F: Fn(&Value, &Value) -> Option<Value>,
{
    fn resolve(&self, left: &Value, right: &Value) -> Option<Value> {
        self(left, right)
    }
}

/// Right side wins.
pub fn replace(_left: &Value, right: &Value) -> Option<Value> {
    Some(right.clone())
}

/// Keep the value only when both sides are structurally equal.
pub fn equal(left: &Value, right: &Value) -> Option<Value> {
    (left == right).then(|| left.clone())
}

/// Structural membership test.
pub fn exists_in(needle: &Value, haystack: &[Value]) -> bool {
    haystack.iter().any(|candidate| candidate == needle)
}

/// Union of two values.
///
/// Mapping/mapping and sequence/sequence pairs merge recursively; any other
/// pairing, kind mismatches included, goes through `resolver`.
pub fn union<R>(left: &Value, right: &Value, resolver: &R) -> Value
where
    R: ConflictResolver + ?Sized,
{
    match (left, right) {
        (Value::Mapping(l), Value::Mapping(r)) => Value::Mapping(maps_union(l, r, resolver)),
        (Value::Sequence(l), Value::Sequence(r)) => Value::Sequence(sequences_union(l, r)),
        (Value::Scalar(_), _) | (Value::Mapping(_), _) | (Value::Sequence(_), _) => resolver
            .resolve(left, right)
            .unwrap_or_else(|| left.clone()),
    }
}

/// Intersection of two values. `None` when the resolver yields nothing.
pub fn intersection<R>(left: &Value, right: &Value, resolver: &R) -> Option<Value>
where
    R: ConflictResolver + ?Sized,
{
    match (left, right) {
        (Value::Mapping(l), Value::Mapping(r)) => {
            Some(Value::Mapping(maps_intersection(l, r, resolver)))
        }
        (Value::Sequence(l), Value::Sequence(r)) => {
            Some(Value::Sequence(sequences_intersection(l, r)))
        }
        (Value::Scalar(_), _) | (Value::Mapping(_), _) | (Value::Sequence(_), _) => {
            resolver.resolve(left, right)
        }
    }
}

/// Every key of `left` and `right`; shared keys merge via [`union`].
pub fn maps_union<R>(left: &Mapping, right: &Mapping, resolver: &R) -> Mapping
where
    R: ConflictResolver + ?Sized,
{
    let mut result = left.clone();

    for (key, r) in right {
        let merged = match left.get(key) {
            Some(l) => union(l, r, resolver),
            None => r.clone(),
        };
        result.insert(key.clone(), merged);
    }

    result
}

/// Keys present on both sides; values merge via [`intersection`].
pub fn maps_intersection<R>(left: &Mapping, right: &Mapping, resolver: &R) -> Mapping
where
    R: ConflictResolver + ?Sized,
{
    left.iter()
        .filter_map(|(key, l)| {
            let r = right.get(key)?;
            intersection(l, r, resolver).map(|v| (key.clone(), v))
        })
        .collect()
}

/// `left` in order, followed by the elements of `right` not already present.
pub fn sequences_union(left: &[Value], right: &[Value]) -> Vec<Value> {
    let mut result = left.to_vec();
    for r in right {
        if !exists_in(r, &result) {
            result.push(r.clone());
        }
    }
    result
}

/// Elements of `right`, in `right`'s order, that also appear in `left`.
pub fn sequences_intersection(left: &[Value], right: &[Value]) -> Vec<Value> {
    right
        .iter()
        .filter(|r| exists_in(r, left))
        .cloned()
        .collect()
}

/// Merge two YAML mapping documents with union/replace and re-encode.
///
/// An empty document counts as an empty mapping.
pub fn merge_bytes(left: &[u8], right: &[u8]) -> CairnResult<Vec<u8>> {
    let left = document_mapping(left)?;
    let right = document_mapping(right)?;

    let merged = Value::Mapping(maps_union(&left, &right, &replace));
    Ok(merged.to_yaml_string()?.into_bytes())
}

pub(crate) fn document_mapping(bytes: &[u8]) -> CairnResult<Mapping> {
    match Value::from_yaml_slice(bytes)? {
        Value::Mapping(map) => Ok(map),
        v if v.is_null() => Ok(Mapping::new()),
        other => Err(CairnError::Config(format!(
            "expected a mapping document, found {}",
            other.kind()
        ))),
    }
}
