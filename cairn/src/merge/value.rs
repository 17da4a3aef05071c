//! Semi-structured value model used as the merge operand.

use cairn_shared::errors::{CairnError, CairnResult};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered mapping. Equality ignores order.
pub type Mapping = IndexMap<String, Value>;

/// Leaf value. `Null` is an ordinary scalar for comparison purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A scalar, an ordered mapping or an ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(Scalar::Null)
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    pub fn empty_mapping() -> Self {
        Value::Mapping(Mapping::new())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Scalar(Scalar::Null))
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Short kind name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(Scalar::Null) => "null",
            Value::Scalar(_) => "scalar",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }

    pub fn from_yaml_slice(bytes: &[u8]) -> CairnResult<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_slice(bytes)
            .map_err(|e| CairnError::Config(format!("invalid YAML document: {e}")))?;
        Ok(Value::from(raw))
    }

    pub fn from_yaml_str(text: &str) -> CairnResult<Self> {
        Self::from_yaml_slice(text.as_bytes())
    }

    pub fn to_yaml_string(&self) -> CairnResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CairnError::Config(format!("failed to serialize YAML: {e}")))
    }

    /// Deserialize this tree into a typed view.
    pub fn decode<T: DeserializeOwned>(&self) -> CairnResult<T> {
        serde_yaml::from_value(serde_yaml::Value::from(self.clone()))
            .map_err(|e| CairnError::Config(format!("failed to decode configuration: {e}")))
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<serde_yaml::Value> for Value {
    fn from(raw: serde_yaml::Value) -> Self {
        match raw {
            serde_yaml::Value::Null => Value::null(),
            serde_yaml::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i))
                } else {
                    // u64 beyond i64 range and real floats
                    Value::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_yaml::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_yaml::Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Value::from).collect())
            }
            serde_yaml::Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (key_string(k), Value::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Value::from(tagged.value),
        }
    }
}

impl From<Value> for serde_yaml::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Scalar(Scalar::Null) => serde_yaml::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_yaml::Value::Bool(b),
            Value::Scalar(Scalar::Int(i)) => serde_yaml::Value::Number(i.into()),
            Value::Scalar(Scalar::Float(f)) => serde_yaml::Value::Number(f.into()),
            Value::Scalar(Scalar::String(s)) => serde_yaml::Value::String(s),
            Value::Sequence(seq) => {
                serde_yaml::Value::Sequence(seq.into_iter().map(Into::into).collect())
            }
            Value::Mapping(map) => serde_yaml::Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (serde_yaml::Value::String(k), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Mapping keys are strings in this model; YAML allows any node as a key.
fn key_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => key_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<Vec<Value>> for Value {
    fn from(seq: Vec<Value>) -> Self {
        Value::Sequence(seq)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

// ============================================================================
// SERDE
// ============================================================================

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(scalar) => scalar.serialize(serializer),
            Value::Mapping(map) => map.serialize(serializer),
            Value::Sequence(seq) => seq.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_yaml::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_document() {
        let value = Value::from_yaml_str(
            "system:\n  debug: true\n  args: [a, 1]\n  ratio: 0.5\n  missing: ~\n",
        )
        .unwrap();

        let system = value.get("system").unwrap();
        assert_eq!(system.get("debug"), Some(&Value::from(true)));
        assert_eq!(
            system.get("args"),
            Some(&Value::Sequence(vec![Value::from("a"), Value::from(1i64)]))
        );
        assert_eq!(
            system.get("ratio"),
            Some(&Value::Scalar(Scalar::Float(0.5)))
        );
        assert!(system.get("missing").unwrap().is_null());
    }

    #[test]
    fn test_non_string_keys_are_stringified() {
        let value = Value::from_yaml_str("1: one\ntrue: yes-key\n").unwrap();
        assert_eq!(value.get("1"), Some(&Value::from("one")));
        assert_eq!(value.get("true"), Some(&Value::from("yes-key")));
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let a = Value::from_yaml_str("{x: 1, y: 2}").unwrap();
        let b = Value::from_yaml_str("{y: 2, x: 1}").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_yaml_output_preserves_insertion_order() {
        let value = Value::from_yaml_str("zeta: 1\nalpha: 2\n").unwrap();
        let text = value.to_yaml_string().unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
    }

    #[test]
    fn test_decode_typed_view() {
        #[derive(Deserialize)]
        struct View {
            name: String,
            count: u32,
        }

        let value = Value::from_yaml_str("name: cairn\ncount: 3\n").unwrap();
        let view: View = value.decode().unwrap();
        assert_eq!(view.name, "cairn");
        assert_eq!(view.count, 3);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = Value::from_yaml_str("key: [unterminated").unwrap_err();
        assert!(matches!(err, CairnError::Config(_)));
    }
}
