//! The parsed configuration document.
//!
//! A [`Value`] is produced once by a serde deserializer (YAML or JSON) and is not
//! mutated afterwards. Mapping keys are always strings; a document with a
//! non-string or repeated key is rejected while deserializing.

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::collections::BTreeMap;
use std::fmt;

/// Directive name to value. Iteration order carries no meaning for dispatch.
pub type Mapping = BTreeMap<String, Value>;

/// A node of the configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Sequence(Vec<Value>),
    Mapping(Mapping),
}

/// A leaf of the configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// An explicitly empty value (`key:` or `key: ~` in YAML).
    Null,
    Bool(bool),
    String(String),
    Number(Number),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

/// The dynamic kind of a [`Value`], used when reporting type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    String,
    Integer,
    Float,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Sequence => "sequence",
            Self::Mapping => "mapping",
        })
    }
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(Scalar::Null) => ValueKind::Null,
            Self::Scalar(Scalar::Bool(_)) => ValueKind::Bool,
            Self::Scalar(Scalar::String(_)) => ValueKind::String,
            Self::Scalar(Scalar::Number(Number::Integer(_))) => ValueKind::Integer,
            Self::Scalar(Scalar::Number(Number::Float(_))) => ValueKind::Float,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// An empty mapping, the value of an empty document.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Number(Number::Integer(n))) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Number(Number::Float(n))) => Some(*n),
            #[allow(clippy::cast_precision_loss)]
            Self::Scalar(Scalar::Number(Number::Integer(n))) => Some(*n as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Number(Number::Integer(n)))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Scalar(Scalar::Number(Number::Float(n)))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl<K: Into<String>, V: Into<Self>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// --- Deserialize ---

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, a sequence or a mapping with string keys")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::from)
            .map_err(|_| E::custom(format!("integer {v} does not fit in 64 signed bits")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Scalar(Scalar::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut out = Mapping::new();
        while let Some(DirectiveKey(key)) = map.next_key()? {
            let value = map.next_value()?;
            if out.contains_key(&key) {
                return Err(de::Error::custom(format!("duplicate directive `{key}`")));
            }
            out.insert(key, value);
        }
        Ok(Value::Mapping(out))
    }
}

/// A mapping key; only strings name directives. Keys are read self-described,
/// so a YAML `1:` or `true:` arrives as a number or bool and is refused.
struct DirectiveKey(String);

impl<'de> Deserialize<'de> for DirectiveKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = DirectiveKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string directive name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DirectiveKey, E> {
                Ok(DirectiveKey(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<DirectiveKey, E> {
                Ok(DirectiveKey(v))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_reported() {
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from("x").kind(), ValueKind::String);
        assert_eq!(Value::from(3_i64).kind(), ValueKind::Integer);
        assert_eq!(Value::from(1.5_f64).kind(), ValueKind::Float);
        assert_eq!(Value::Sequence(vec![]).kind(), ValueKind::Sequence);
        assert_eq!(Value::empty().kind(), ValueKind::Mapping);
        assert_eq!(Value::Scalar(Scalar::Null).kind(), ValueKind::Null);
    }

    #[test]
    fn accessors_do_not_coerce() {
        let v = Value::from("true");
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_str(), Some("true"));
        assert_eq!(Value::from(7_i64).as_str(), None);
        assert_eq!(Value::from(7_i64).as_f64(), Some(7.0));
    }

    #[test]
    fn mapping_from_pairs() {
        let v: Value = [("enabled", Value::from(true)), ("name", Value::from("x"))]
            .into_iter()
            .collect();
        let map = v.as_mapping().expect("mapping");
        assert_eq!(map.len(), 2);
        assert_eq!(map["enabled"], Value::from(true));
    }

    #[test]
    fn kind_display_is_lowercase() {
        assert_eq!(ValueKind::Bool.to_string(), "boolean");
        assert_eq!(ValueKind::Mapping.to_string(), "mapping");
    }
}
