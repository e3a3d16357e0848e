//! Serde helpers for identifiers the backend sends either as strings or numbers.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Identifier that may arrive as `"42"`, `42` or a UUID string; always kept as a string.
pub mod string_or_number {
    use super::{Deserializer, Serializer, Visitor, de, fmt};

    /// Serializes the identifier as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    #[allow(clippy::ptr_arg)]
    pub fn serialize<S>(value: &String, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    /// Deserializes an identifier from a string or an integer.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor a number.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer identifier")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.to_string())
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value.trim().to_string())
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }

    /// Optional variant; `null` and missing become `None`.
    pub mod option {
        use super::{Deserializer, Serializer, Visitor, de, fmt};

        /// Serializes an optional identifier.
        ///
        /// # Errors
        ///
        /// Returns an error if the serializer fails.
        pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional identifier; empty strings become `None`.
        ///
        /// # Errors
        ///
        /// Returns an error if deserialization fails.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct OptionVisitor;

            impl<'de> Visitor<'de> for OptionVisitor {
                type Value = Option<String>;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("an optional identifier")
                }

                fn visit_none<E>(self) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(None)
                }

                fn visit_unit<E>(self) -> Result<Self::Value, E>
                where
                    E: de::Error,
                {
                    Ok(None)
                }

                fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    super::deserialize(deserializer).map(|id| Some(id).filter(|s| !s.is_empty()))
                }
            }

            deserializer.deserialize_option(OptionVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Record {
        #[serde(with = "super::string_or_number")]
        id: String,
        #[serde(default, with = "super::string_or_number::option")]
        parent: Option<String>,
    }

    #[test]
    fn test_numeric_and_string_ids() {
        let numeric: Record = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(numeric.id, "42");
        assert_eq!(numeric.parent, None);

        let text: Record = serde_json::from_str(r#"{"id": " abc-1 ", "parent": 7}"#).unwrap();
        assert_eq!(text.id, "abc-1");
        assert_eq!(text.parent.as_deref(), Some("7"));
    }

    #[test]
    fn test_null_and_empty_parent() {
        let null: Record = serde_json::from_str(r#"{"id": 1, "parent": null}"#).unwrap();
        assert_eq!(null.parent, None);

        let empty: Record = serde_json::from_str(r#"{"id": 1, "parent": ""}"#).unwrap();
        assert_eq!(empty.parent, None);
    }

    #[test]
    fn test_rejects_objects() {
        assert!(serde_json::from_str::<Record>(r#"{"id": {}}"#).is_err());
    }
}
