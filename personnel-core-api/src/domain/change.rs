use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Map of field name to value, as carried on one side of a change set.
pub type ChangeMap = BTreeMap<String, FieldValue>;

/// Semi-structured value captured in an audit diff.
///
/// The ledger stores `changes` as JSON and does not accept native identifier
/// types, so `Id` leaves are rewritten to their canonical string form when the
/// change set is normalized for storage. The rewrite is recursive over `Seq`
/// and `Map` and total over the variant structure.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    /// Opaque identifier; serialized as its canonical hyphenated string.
    Id(Uuid),
    Seq(Vec<FieldValue>),
    Map(ChangeMap),
}

impl FieldValue {
    /// Normalize into the ledger's serialization format, rewriting every
    /// `Id` leaf to a string at any nesting depth.
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(b),
            FieldValue::Integer(i) => Value::Number(i.into()),
            FieldValue::Number(n) => Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s),
            FieldValue::Id(id) => Value::String(id.to_string()),
            FieldValue::Seq(items) => {
                Value::Array(items.into_iter().map(FieldValue::into_json).collect())
            }
            FieldValue::Map(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value.into_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Id(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FieldValue::Null,
        }
    }
}

/// Before/after payload for one audit entry.
///
/// For an update, `old` holds only the fields named in the request mapped to
/// their pre-mutation values and `new` holds the values actually applied.
/// For a create only `new` is populated. For a delete both sides are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub old: Option<ChangeMap>,
    pub new: Option<ChangeMap>,
}

impl ChangeSet {
    pub fn created(new: ChangeMap) -> Self {
        Self {
            old: None,
            new: Some(new),
        }
    }

    pub fn updated(old: ChangeMap, new: ChangeMap) -> Self {
        Self {
            old: Some(old),
            new: Some(new),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.old.as_ref().map_or(true, ChangeMap::is_empty)
            && self.new.as_ref().map_or(true, ChangeMap::is_empty)
    }

    /// Normalize into the `{"old": {...}, "new": {...}}` JSON shape stored on
    /// the ledger. Absent sides are omitted from the object.
    pub fn into_json(self) -> Value {
        let mut root = Map::new();
        if let Some(old) = self.old {
            root.insert("old".to_string(), FieldValue::Map(old).into_json());
        }
        if let Some(new) = self.new {
            root.insert("new".to_string(), FieldValue::Map(new).into_json());
        }
        Value::Object(root)
    }
}
