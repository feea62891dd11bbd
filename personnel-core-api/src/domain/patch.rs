use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Partial-update wrapper distinguishing "field absent" from "explicit null".
///
/// An absent field deserializes to `Keep` (via `#[serde(default)]` on the
/// containing struct field), a JSON `null` to `Clear`, and a value to `Set`.
/// `Clear` is only meaningful for nullable fields; services reject it on
/// required ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Keep,
    Clear,
    Set(T),
}

// Manual impl so `Patch<T>` is Default for any T, not only T: Default.
impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Keep
    }
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Keep => Patch::Keep,
            Patch::Clear => Patch::Clear,
            Patch::Set(v) => Patch::Set(v),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Clear,
        })
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Keep has no JSON representation of its own; callers pair this
            // with `skip_serializing_if = "Patch::is_keep"`.
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
            Patch::Set(value) => serializer.serialize_some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        #[serde(default)]
        phone: Patch<String>,
        #[serde(default)]
        position: Patch<String>,
    }

    #[test]
    fn absent_field_is_keep() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(probe.phone, Patch::Keep);
        assert_eq!(probe.position, Patch::Keep);
    }

    #[test]
    fn explicit_null_is_clear() {
        let probe: Probe = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert_eq!(probe.phone, Patch::Clear);
        assert_eq!(probe.position, Patch::Keep);
    }

    #[test]
    fn value_is_set() {
        let probe: Probe = serde_json::from_str(r#"{"phone": "555-0100"}"#).unwrap();
        assert_eq!(probe.phone, Patch::Set("555-0100".to_string()));
    }
}
