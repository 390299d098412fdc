//! The nested value model exchanged with the registrar.
//!
//! A [`Value`] is a scalar, an ordered list, or an insertion-ordered map.
//! Requests are built from values and responses decode back into them.

use indexmap::IndexMap;

use crate::scalar::{render_scalar, Scalar};

/// Insertion-ordered map used for `dt_assoc` data.
pub type Map = IndexMap<String, Value>;

/// A dynamically-typed nested value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A primitive leaf.
    Scalar(Scalar),
    /// An ordered list, encoded as `dt_array`.
    List(Vec<Value>),
    /// A keyed map, encoded as `dt_assoc`.
    Map(Map),
}

impl Value {
    /// Shorthand for an empty map.
    pub fn map() -> Self {
        Self::Map(Map::new())
    }

    /// Shorthand for [`Scalar::Absent`].
    pub fn absent() -> Self {
        Self::Scalar(Scalar::Absent)
    }

    /// Looks up `key` if this is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(key)
    }

    /// Looks up position `index` if this is a list.
    pub fn index(&self, index: usize) -> Option<&Value> {
        self.as_list()?.get(index)
    }

    /// Returns the text of a [`Scalar::Text`] leaf.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar()?.as_str()
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns `true` for [`Scalar::Absent`] leaves.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Absent))
    }

    /// Converts a JSON document into a value.
    ///
    /// `null` becomes [`Scalar::Absent`]; integers that fit in `i64` become
    /// [`Scalar::Integer`], every other number [`Scalar::Float`]. Object key
    /// order is kept.
    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::absent(),
            Json::Bool(b) => Self::Scalar(Scalar::Boolean(b)),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Self::Scalar(Scalar::Integer(i)),
                None => match n.as_f64() {
                    Some(f) => Self::Scalar(Scalar::Float(f)),
                    None => Self::Scalar(Scalar::Text(n.to_string())),
                },
            },
            Json::String(s) => Self::Scalar(Scalar::Text(s)),
            Json::Array(items) => Self::List(items.into_iter().map(Self::from_json).collect()),
            Json::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts the value into JSON for display.
    ///
    /// Dates, datetimes, symbols and unsupported values become strings in
    /// their wire rendering. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Scalar(scalar) => match scalar {
                Scalar::Absent => Json::Null,
                Scalar::Boolean(b) => Json::Bool(*b),
                Scalar::Integer(i) => Json::from(*i),
                Scalar::Float(f) => serde_json::Number::from_f64(*f)
                    .map(Json::Number)
                    .unwrap_or(Json::Null),
                Scalar::Text(s) => Json::String(s.clone()),
                other => Json::String(render_scalar(other)),
            },
            Self::List(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

macro_rules! value_from_scalar {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

value_from_scalar!(
    Scalar,
    &str,
    String,
    &String,
    i64,
    i32,
    u32,
    u64,
    usize,
    f64,
    bool,
    chrono::NaiveDate,
    chrono::NaiveDateTime,
);

impl<T: Into<Scalar>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        Self::Map(entries)
    }
}

/// Collects key/value pairs into a [`Value::Map`].
///
/// Keys of any scalar type are coerced to their wire text, so `(1, v)` and
/// `("1", v)` address the same entry. A repeated key keeps its first position
/// and takes the last value.
impl<K, V> FromIterator<(K, V)> for Value
where
    K: Into<Scalar>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(
            iter.into_iter()
                .map(|(k, v)| (render_scalar(&k.into()), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_string_keys_use_their_wire_text() {
        let value: Value = [(1, "one"), (2, "two")].into_iter().collect();

        assert_eq!(value.get("1").and_then(Value::as_str), Some("one"));
        assert_eq!(value.get("2").and_then(Value::as_str), Some("two"));
    }

    #[test]
    fn repeated_keys_keep_first_position() {
        let value: Value = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        let map = value.as_map().expect("map");

        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map["a"], Value::from(3));
    }

    #[test]
    fn json_bridge_keeps_object_order_and_types() {
        let json = json!({
            "zeta": "last-alphabetically",
            "alpha": [1, 2.5, true, null],
        });

        let value = Value::from_json(json.clone());
        let map = value.as_map().expect("map");
        assert_eq!(map.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);

        let list = value.get("alpha").and_then(Value::as_list).expect("list");
        assert_eq!(list[0], Value::from(1));
        assert_eq!(list[1], Value::from(2.5));
        assert_eq!(list[2], Value::from(true));
        assert!(list[3].is_absent());

        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn temporal_values_render_as_json_strings() {
        let date = chrono::NaiveDate::from_ymd_opt(2010, 2, 12).expect("valid date");
        assert_eq!(Value::from(date).to_json(), json!("2010-02-12"));
        assert_eq!(Value::from(Scalar::symbol("renew")).to_json(), json!("renew"));
    }
}
