//! Merging store snapshots over the baked-in defaults.
//!
//! A snapshot replaces top-level keys of the default tree one for one. Keys
//! the snapshot does not carry keep their default, keys the tree does not
//! have are dropped, list fields are decoded
//! leniently (see [`crate::models::lenient`]) and a key whose value cannot be
//! interpreted falls back to its default on its own. The result is always a
//! fully populated value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Result of merging one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub value: T,
    /// Top-level keys that were present but unusable: unknown to the
    /// schema, or malformed and kept at their default.
    pub rejected_keys: Vec<String>,
}

impl<T> Merged<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            rejected_keys: Vec::new(),
        }
    }
}

/// Merges `snapshot` over `defaults`.
///
/// `None` and `null` both mean "nothing stored yet" and yield the defaults.
pub fn merge_snapshot<T>(defaults: &T, snapshot: Option<&Value>) -> Merged<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    let incoming = match snapshot {
        None | Some(Value::Null) => return Merged::clean(defaults.clone()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            tracing::warn!("Ignoring snapshot that is not an object: {}", kind_of(other));
            return Merged {
                value: defaults.clone(),
                rejected_keys: vec![String::new()],
            };
        }
    };

    let base = match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => map,
        _ => return Merged::clean(defaults.clone()),
    };

    let (known, unknown): (Vec<_>, Vec<_>) = incoming
        .iter()
        .filter(|(_, v)| !v.is_null())
        .partition(|(key, _)| base.contains_key(key.as_str()));
    let mut rejected_keys: Vec<String> = unknown.into_iter().map(|(key, _)| key.clone()).collect();
    if !rejected_keys.is_empty() {
        tracing::warn!("Dropping unknown keys: {:?}", rejected_keys);
    }

    let mut merged = base.clone();
    overlay(&mut merged, known.iter().copied());
    if let Ok(value) = serde_json::from_value::<T>(Value::Object(merged)) {
        return Merged {
            value,
            rejected_keys,
        };
    }

    // Something in the snapshot does not fit the schema. Apply keys one at a
    // time and keep the default for each key that breaks decoding.
    let mut current = base;
    for (key, value) in known {
        let mut candidate = current.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<T>(Value::Object(candidate.clone())) {
            Ok(_) => current = candidate,
            Err(e) => {
                tracing::warn!("Keeping default for malformed key '{}': {}", key, e);
                rejected_keys.push(key.clone());
            }
        }
    }

    rejected_keys.sort();
    match serde_json::from_value::<T>(Value::Object(current)) {
        Ok(value) => Merged {
            value,
            rejected_keys,
        },
        Err(e) => {
            tracing::warn!("Snapshot unusable, falling back to defaults: {}", e);
            Merged {
                value: defaults.clone(),
                rejected_keys: incoming.keys().cloned().collect(),
            }
        }
    }
}

fn overlay<'a>(target: &mut Map<String, Value>, incoming: impl Iterator<Item = (&'a String, &'a Value)>) {
    for (key, value) in incoming {
        // The store drops null keys; treat them as absent.
        if !value.is_null() {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
