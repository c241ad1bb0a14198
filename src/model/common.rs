use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Backend-assigned primary key.
pub type Key = i64;

/// Identity of an entity: either not yet persisted, or persisted under a key.
///
/// On the wire `Unsaved` is `null` and `Saved(k)` is the bare number. Keys are
/// always positive; zero or negative keys are rejected on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    Unsaved,
    Saved(Key),
}

impl Default for Identity {
    fn default() -> Self {
        Identity::Unsaved
    }
}

impl Identity {
    pub fn key(&self) -> Option<Key> {
        match self {
            Identity::Saved(key) => Some(*key),
            Identity::Unsaved => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Identity::Saved(_))
    }
}

impl From<Option<Key>> for Identity {
    fn from(key: Option<Key>) -> Self {
        key.map_or(Identity::Unsaved, Identity::Saved)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Saved(key) => write!(f, "{}", key),
            Identity::Unsaved => write!(f, "<unsaved>"),
        }
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Identity::Saved(key) => serializer.serialize_i64(*key),
            Identity::Unsaved => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<Key>::deserialize(deserializer)? {
            Some(key) if key > 0 => Ok(Identity::Saved(key)),
            Some(key) => Err(serde::de::Error::custom(format!(
                "invalid key {}: keys are positive",
                key
            ))),
            None => Ok(Identity::Unsaved),
        }
    }
}

/// An optional field that distinguishes "not sent" from "sent as null".
///
/// Use with `#[serde(default, skip_serializing_if = "Field::is_absent")]` so
/// that `Absent` is omitted from the body while `Null` is written as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(value) => Some(value),
            Field::Absent | Field::Null => None,
        }
    }

    /// Merge-patch semantics: absent keeps `target`, null clears it, a value replaces it.
    pub fn apply_to(self, target: &mut Field<T>) {
        match self {
            Field::Absent => {}
            Field::Null => *target = Field::Null,
            Field::Value(value) => *target = Field::Value(value),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Null, Field::Value)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(value) => value.serialize(serializer),
            Field::Absent | Field::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

/// Key-only reference to a related entity, `{"id": <key>}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: Key,
}

impl EntityRef {
    pub fn new(id: Key) -> Self {
        Self { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        #[serde(default)]
        id: Identity,
        #[serde(default, skip_serializing_if = "Field::is_absent")]
        note: Field<String>,
    }

    #[test]
    fn test_field_three_states_survive_the_wire() {
        let absent: Probe = serde_json::from_value(json!({ "id": 4 })).unwrap();
        assert_eq!(absent.note, Field::Absent);
        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({ "id": 4 }));

        let null: Probe = serde_json::from_value(json!({ "id": 4, "note": null })).unwrap();
        assert_eq!(null.note, Field::Null);
        assert_eq!(
            serde_json::to_value(&null).unwrap(),
            json!({ "id": 4, "note": null })
        );

        let value: Probe = serde_json::from_value(json!({ "id": 4, "note": "x" })).unwrap();
        assert_eq!(value.note, Field::Value("x".to_string()));
    }

    #[test]
    fn test_identity_unsaved_is_null() {
        let probe: Probe = serde_json::from_value(json!({ "id": null })).unwrap();
        assert_eq!(probe.id, Identity::Unsaved);
        assert_eq!(serde_json::to_value(&probe).unwrap(), json!({ "id": null }));

        let missing: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.id, Identity::Unsaved);
    }

    #[test]
    fn test_identity_rejects_non_positive_keys() {
        assert!(serde_json::from_value::<Probe>(json!({ "id": 0 })).is_err());
        assert!(serde_json::from_value::<Probe>(json!({ "id": -3 })).is_err());
    }

    #[test]
    fn test_field_apply_to_follows_merge_patch() {
        let mut target = Field::Value(1);
        Field::Absent.apply_to(&mut target);
        assert_eq!(target, Field::Value(1));
        Field::Value(2).apply_to(&mut target);
        assert_eq!(target, Field::Value(2));
        Field::Null.apply_to(&mut target);
        assert_eq!(target, Field::Null);
    }
}
