//! Lenient list decoding for values recovered from the realtime store.
//!
//! The store has no native list type: an array written with holes, or one
//! edited by removing an earlier element, comes back as an object keyed by
//! index. Every list field of the content model decodes through [`seq`] so
//! both shapes produce the same ordered `Vec`.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a stored value into an ordered list of elements.
///
/// - arrays keep their order, `null` holes are dropped
/// - index-keyed objects are ordered numerically; non-numeric keys follow in
///   key order
/// - `null` is an empty list
///
/// Returns `None` for scalars, which cannot stand in for a list.
pub fn coerce_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => Some(items.into_iter().filter(|v| !v.is_null()).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(Option<u64>, String, Value)> = map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.parse::<u64>().ok(), k, v))
                .collect();
            entries.sort_by(|a, b| match (a.0, b.0) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.1.cmp(&b.1),
            });
            Some(entries.into_iter().map(|(_, _, v)| v).collect())
        }
        _ => None,
    }
}

/// `deserialize_with` helper for `Vec<T>` fields.
pub fn seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = coerce_list(value).ok_or_else(|| D::Error::custom("expected a list"))?;
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "seq")]
        items: Vec<String>,
    }

    #[test]
    fn test_array_and_index_map_agree() {
        let from_array: Holder = serde_json::from_value(json!({"items": ["a", "b", "c"]})).unwrap();
        let from_map: Holder =
            serde_json::from_value(json!({"items": {"0": "a", "1": "b", "2": "c"}})).unwrap();
        assert_eq!(from_array.items, from_map.items);
    }

    #[test]
    fn test_index_map_orders_numerically() {
        // "10" sorts before "2" as a string
        let holder: Holder =
            serde_json::from_value(json!({"items": {"10": "k", "2": "c", "0": "a"}})).unwrap();
        assert_eq!(holder.items, vec!["a", "c", "k"]);
    }

    #[test]
    fn test_sparse_map_and_holes() {
        let holder: Holder =
            serde_json::from_value(json!({"items": {"1": "b", "3": null, "4": "e"}})).unwrap();
        assert_eq!(holder.items, vec!["b", "e"]);

        let holder: Holder = serde_json::from_value(json!({"items": ["a", null, "c"]})).unwrap();
        assert_eq!(holder.items, vec!["a", "c"]);
    }

    #[test]
    fn test_null_and_missing_are_empty() {
        let holder: Holder = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(holder.items.is_empty());
        let holder: Holder = serde_json::from_value(json!({})).unwrap();
        assert!(holder.items.is_empty());
    }

    #[test]
    fn test_scalar_is_rejected() {
        let result: Result<Holder, _> = serde_json::from_value(json!({"items": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_keys_follow_numeric() {
        let list = coerce_list(json!({"b": 2, "1": 1, "a": 3})).unwrap();
        assert_eq!(list, vec![json!(1), json!(3), json!(2)]);
    }
}
