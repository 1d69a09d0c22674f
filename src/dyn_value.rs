use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

use crate::types::ValueKind;

/// The untyped map handed across the boundary.
pub type DynMap = BTreeMap<SmolStr, DynValue>;

// ─── DynNumber ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq)]
pub enum DynNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl fmt::Debug for DynNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynNumber::I64(i) => write!(f, "I64({})", i),
            DynNumber::U64(u) => write!(f, "U64({})", u),
            DynNumber::F64(v) => write!(f, "F64({})", v),
        }
    }
}

// ─── DynValue ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DynValue {
    #[default]
    Null,
    Bool(bool),
    Number(DynNumber),
    Str(SmolStr),
    Array(Vec<DynValue>),
    Object(DynMap),
}

impl DynValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            DynValue::Null => ValueKind::Null,
            DynValue::Bool(_) => ValueKind::Bool,
            DynValue::Number(DynNumber::I64(_)) => ValueKind::I64,
            DynValue::Number(DynNumber::U64(_)) => ValueKind::U64,
            DynValue::Number(DynNumber::F64(_)) => ValueKind::F64,
            DynValue::Str(_) => ValueKind::Str,
            DynValue::Array(_) => ValueKind::Array,
            DynValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Exact-variant accessors: an `I64` is not an `f64` and a `U64` is not
    /// an `i64`, whatever its magnitude.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DynValue::Number(DynNumber::I64(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DynValue::Number(DynNumber::U64(u)) => Some(*u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DynValue::Number(DynNumber::F64(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DynMap> {
        match self {
            DynValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<DynValue>> {
        match self {
            DynValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&DynValue> {
        self.as_object()?.get(key)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DynValue::Null)
    }
}

// ─── Serialize ──────────────────────────────────────────────────────────────

impl Serialize for DynValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DynValue::Null => serializer.serialize_none(),
            DynValue::Bool(b) => serializer.serialize_bool(*b),
            DynValue::Number(n) => match n {
                DynNumber::I64(i) => serializer.serialize_i64(*i),
                DynNumber::U64(u) => serializer.serialize_u64(*u),
                DynNumber::F64(f) => serializer.serialize_f64(*f),
            },
            DynValue::Str(s) => serializer.serialize_str(s.as_str()),
            DynValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            DynValue::Object(map) => {
                let mut m = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
        }
    }
}

// ─── Deserialize ────────────────────────────────────────────────────────────

struct DynValueVisitor;

impl<'de> Visitor<'de> for DynValueVisitor {
    type Value = DynValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any self-describing value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<DynValue, E> {
        Ok(DynValue::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<DynValue, E> {
        Ok(DynValue::Number(DynNumber::I64(i)))
    }

    // Same preference as the serde_json conversion: signed when it fits.
    fn visit_u64<E: de::Error>(self, u: u64) -> Result<DynValue, E> {
        Ok(match i64::try_from(u) {
            Ok(i) => DynValue::Number(DynNumber::I64(i)),
            Err(_) => DynValue::Number(DynNumber::U64(u)),
        })
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<DynValue, E> {
        Ok(DynValue::Number(DynNumber::F64(f)))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<DynValue, E> {
        Ok(DynValue::Str(SmolStr::from(s)))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<DynValue, E> {
        Ok(DynValue::Str(SmolStr::from(s)))
    }

    fn visit_none<E: de::Error>(self) -> Result<DynValue, E> {
        Ok(DynValue::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<DynValue, E> {
        Ok(DynValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<DynValue, D::Error> {
        DynValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DynValue, A::Error> {
        let mut arr = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(v) = seq.next_element()? {
            arr.push(v);
        }
        Ok(DynValue::Array(arr))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DynValue, A::Error> {
        let mut map = DynMap::new();
        while let Some((k, v)) = access.next_entry::<SmolStr, DynValue>()? {
            map.insert(k, v);
        }
        Ok(DynValue::Object(map))
    }
}

impl<'de> Deserialize<'de> for DynValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DynValueVisitor)
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for DynValue {
    fn from(n: f64) -> Self {
        DynValue::Number(DynNumber::F64(n))
    }
}

impl From<i64> for DynValue {
    fn from(n: i64) -> Self {
        DynValue::Number(DynNumber::I64(n))
    }
}

/// Untyped integer literals land here, so `dyn_map!` accepts `"n" => 3`.
impl From<i32> for DynValue {
    fn from(n: i32) -> Self {
        DynValue::Number(DynNumber::I64(n.into()))
    }
}

impl From<u64> for DynValue {
    fn from(n: u64) -> Self {
        DynValue::Number(DynNumber::U64(n))
    }
}

impl From<bool> for DynValue {
    fn from(b: bool) -> Self {
        DynValue::Bool(b)
    }
}

impl From<&str> for DynValue {
    fn from(s: &str) -> Self {
        DynValue::Str(SmolStr::from(s))
    }
}

impl From<String> for DynValue {
    fn from(s: String) -> Self {
        DynValue::Str(SmolStr::from(s))
    }
}

impl From<SmolStr> for DynValue {
    fn from(s: SmolStr) -> Self {
        DynValue::Str(s)
    }
}

impl From<DynMap> for DynValue {
    fn from(map: DynMap) -> Self {
        DynValue::Object(map)
    }
}

impl From<Vec<DynValue>> for DynValue {
    fn from(arr: Vec<DynValue>) -> Self {
        DynValue::Array(arr)
    }
}

// ─── From<cbor4ii::core::Value> ─────────────────────────────────────────────

impl From<cbor4ii::core::Value> for DynValue {
    fn from(v: cbor4ii::core::Value) -> Self {
        use cbor4ii::core::Value;
        match v {
            Value::Null => DynValue::Null,
            Value::Bool(b) => DynValue::Bool(b),
            Value::Integer(i) => {
                if let Ok(val) = i64::try_from(i) {
                    DynValue::Number(DynNumber::I64(val))
                } else if let Ok(val) = u64::try_from(i) {
                    DynValue::Number(DynNumber::U64(val))
                } else {
                    DynValue::Number(DynNumber::F64(i as f64))
                }
            }
            Value::Float(f) => DynValue::Number(DynNumber::F64(f)),
            Value::Text(s) => DynValue::Str(SmolStr::from(s)),
            Value::Bytes(bytes) => DynValue::Array(
                bytes
                    .into_iter()
                    .map(|b| DynValue::Number(DynNumber::I64(b.into())))
                    .collect(),
            ),
            Value::Array(arr) => DynValue::Array(arr.into_iter().map(DynValue::from).collect()),
            Value::Map(entries) => DynValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| {
                        let key = match k {
                            Value::Text(s) => SmolStr::from(s),
                            Value::Integer(i) => SmolStr::from(i.to_string()),
                            other => SmolStr::from(format!("{:?}", other)),
                        };
                        (key, DynValue::from(v))
                    })
                    .collect(),
            ),
            Value::Tag(_, inner) => DynValue::from(*inner),
            _ => DynValue::Null,
        }
    }
}

// ─── Into<cbor4ii::core::Value> ─────────────────────────────────────────────

impl From<DynValue> for cbor4ii::core::Value {
    fn from(val: DynValue) -> Self {
        use cbor4ii::core::Value;
        match val {
            DynValue::Null => Value::Null,
            DynValue::Bool(b) => Value::Bool(b),
            DynValue::Number(n) => match n {
                DynNumber::I64(i) => Value::Integer(i.into()),
                DynNumber::U64(u) => Value::Integer(u.into()),
                DynNumber::F64(f) => Value::Float(f),
            },
            DynValue::Str(s) => Value::Text(s.to_string()),
            DynValue::Array(arr) => Value::Array(arr.into_iter().map(Into::into).collect()),
            DynValue::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Text(k.to_string()), v.into()))
                    .collect(),
            ),
        }
    }
}

// ─── From/Into serde_json::Value ────────────────────────────────────────────

impl From<serde_json::Value> for DynValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => DynValue::Null,
            serde_json::Value::Bool(b) => DynValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DynValue::Number(DynNumber::I64(i))
                } else if let Some(u) = n.as_u64() {
                    DynValue::Number(DynNumber::U64(u))
                } else {
                    DynValue::Number(DynNumber::F64(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_json::Value::String(s) => DynValue::Str(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                DynValue::Array(arr.into_iter().map(DynValue::from).collect())
            }
            serde_json::Value::Object(obj) => DynValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), DynValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<DynValue> for serde_json::Value {
    fn from(val: DynValue) -> Self {
        match val {
            DynValue::Null => serde_json::Value::Null,
            DynValue::Bool(b) => serde_json::Value::Bool(b),
            DynValue::Number(n) => match n {
                DynNumber::I64(i) => serde_json::json!(i),
                DynNumber::U64(u) => serde_json::json!(u),
                // Non-finite floats have no JSON form and become null.
                DynNumber::F64(f) => serde_json::json!(f),
            },
            DynValue::Str(s) => serde_json::Value::String(s.to_string()),
            DynValue::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(Into::into).collect())
            }
            DynValue::Object(obj) => serde_json::Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k.to_string(), v.into()))
                    .collect(),
            ),
        }
    }
}

/// Builds a [`DynMap`]. Nested braces become nested objects; anything else
/// goes through `DynValue::from`.
///
/// ```
/// use record_bind::dyn_map;
///
/// let map = dyn_map!({ "name" => "test-app", "theme" => { "dark" => true } });
/// assert_eq!(map["name"].as_str(), Some("test-app"));
/// ```
#[macro_export]
macro_rules! dyn_map {
    ({ $($key:expr => $val:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::dyn_value::DynMap::new();
        $(
            map.insert(
                $crate::smol_str::SmolStr::new($key),
                $crate::dyn_value::DynValue::from($crate::dyn_map!(@value $val)),
            );
        )*
        map
    }};

    (@value { $($inner:tt)* }) => {
        $crate::dyn_value::DynValue::Object($crate::dyn_map!({ $($inner)* }))
    };

    (@value ($val:expr)) => {
        $val
    };

    (@value $val:expr) => {
        $val
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_json_numbers_keep_their_variant() {
        let json = serde_json::json!({ "signed": -3, "big": u64::MAX, "ratio": 0.5, "whole": 2.0 });
        let value = DynValue::from(json);

        assert_eq!(value.get("signed").and_then(DynValue::as_i64), Some(-3));
        assert_eq!(value.get("big").and_then(DynValue::as_u64), Some(u64::MAX));
        assert_eq!(value.get("ratio").and_then(DynValue::as_f64), Some(0.5));
        // 2.0 stays a float, it is not narrowed to an integer.
        assert_eq!(value.get("whole").map(DynValue::kind), Some(ValueKind::F64));
    }

    #[test]
    fn test_exact_variant_accessors() {
        let small_unsigned = DynValue::from(7u64);
        assert_eq!(small_unsigned.as_u64(), Some(7));
        assert_eq!(small_unsigned.as_i64(), None);
        assert_eq!(small_unsigned.as_f64(), None);

        let int = DynValue::from(7i64);
        assert_eq!(int.as_f64(), None);
        assert_eq!(int.as_u64(), None);
    }

    #[test]
    fn test_json_back_and_forth() {
        let map = dyn_map!({
            "name" => "Alice",
            "age" => 30,
            "tags" => (vec![DynValue::from("a"), DynValue::from("b")]),
            "profile" => { "bio" => "Developer", "public" => false },
            "missing" => (DynValue::Null),
        });
        let json: serde_json::Value = DynValue::Object(map.clone()).into();

        assert_eq!(json["profile"]["bio"], "Developer");
        assert_eq!(json["missing"], serde_json::Value::Null);
        assert_eq!(DynValue::from(json), DynValue::Object(map));
    }

    #[test]
    fn test_cbor_conversion() {
        use cbor4ii::core::Value;
        let cbor = Value::Map(vec![
            (Value::Text("id".into()), Value::Text("user:1".into())),
            (Value::Integer(7), Value::Bool(true)),
            (Value::Text("n".into()), Value::Integer(u64::MAX as i128)),
        ]);
        let value = DynValue::from(cbor);

        assert_eq!(value.get("id").and_then(DynValue::as_str), Some("user:1"));
        assert_eq!(value.get("7").and_then(DynValue::as_bool), Some(true));
        assert_eq!(value.get("n").and_then(DynValue::as_u64), Some(u64::MAX));

        let back: Value = value.into();
        assert!(matches!(back, Value::Map(ref entries) if entries.len() == 3));
    }

    #[test]
    fn test_cbor_null_tag_and_bytes() {
        use cbor4ii::core::Value;
        assert_eq!(DynValue::from(Value::Null), DynValue::Null);
        assert_eq!(
            DynValue::from(Value::Tag(1, Box::new(Value::Text("t".into())))),
            DynValue::from("t")
        );
        assert_eq!(
            DynValue::from(Value::Bytes(vec![0, 255])),
            DynValue::Array(vec![DynValue::from(0i64), DynValue::from(255i64)])
        );
    }

    #[test]
    fn test_serde_deserialize_from_json_text() {
        let value: DynValue =
            serde_json::from_str(r#"{"a": [1, -2, 3.5], "b": null, "c": "x"}"#).unwrap();

        let arr = value.get("a").and_then(DynValue::as_array).unwrap();
        assert_eq!(arr[0], DynValue::from(1i64));
        assert_eq!(arr[1], DynValue::from(-2i64));
        assert_eq!(arr[2], DynValue::from(3.5f64));
        assert!(value.get("b").unwrap().is_null());
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":[1,-2,3.5],"b":null,"c":"x"}"#);
    }

    #[test]
    fn test_empty_dyn_map_macro() {
        let map = dyn_map!({});
        assert!(map.is_empty());
    }

    #[test]
    fn test_dyn_map_typed_literals() {
        let map = dyn_map!({ "age" => (28i64), "rev" => (7u64), "nested" => { "ratio" => (0.5f64) } });
        assert_eq!(map["age"].as_i64(), Some(28));
        assert_eq!(map["rev"].as_u64(), Some(7));
        assert_eq!(map["nested"].get("ratio").and_then(DynValue::as_f64), Some(0.5));
    }

    proptest! {
        #[test]
        fn prop_string_values_survive_json(s in ".*") {
            let value = DynValue::from(s.as_str());
            let json: serde_json::Value = value.clone().into();
            prop_assert_eq!(DynValue::from(json), value);
        }

        #[test]
        fn prop_signed_integers_survive_json(i in any::<i64>()) {
            let json: serde_json::Value = DynValue::from(i).into();
            prop_assert_eq!(DynValue::from(json).as_i64(), Some(i));
        }
    }
}
