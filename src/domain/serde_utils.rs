//! Serde helpers for records written by older builds.

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Message ids. Anything that is not a UUID gets a fresh one.
pub mod lenient_uuid {
    use super::{Deserializer, Serializer, Visitor, de, fmt};
    use uuid::Uuid;

    /// Serializes the id in hyphenated form.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &Uuid, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    /// Deserializes a UUID from a string, replacing foreign ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string, integer or null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = Uuid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a message id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uuid::parse_str(value).unwrap_or_else(|_| Uuid::new_v4()))
            }

            fn visit_u64<E>(self, _value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uuid::new_v4())
            }

            fn visit_i64<E>(self, _value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uuid::new_v4())
            }

            fn visit_f64<E>(self, _value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uuid::new_v4())
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uuid::new_v4())
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Timestamps as epoch milliseconds or RFC 3339 strings. Always written as milliseconds.
pub mod flexible_timestamp {
    use super::{Deserializer, Serializer, Visitor, de, fmt};
    use chrono::{DateTime, TimeZone, Utc};

    /// Serializes as epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer fails.
    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.timestamp_millis())
    }

    /// Deserializes epoch milliseconds or an RFC 3339 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is out of range or not a date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimestampVisitor;

        impl TimestampVisitor {
            fn from_millis<E: de::Error>(millis: i64) -> Result<DateTime<Utc>, E> {
                Utc.timestamp_millis_opt(millis)
                    .single()
                    .ok_or_else(|| E::custom(format!("timestamp out of range: {millis}")))
            }
        }

        impl Visitor<'_> for TimestampVisitor {
            type Value = DateTime<Utc>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("epoch milliseconds or an RFC 3339 date")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Self::from_millis(value)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let millis = i64::try_from(value).map_err(de::Error::custom)?;
                Self::from_millis(millis)
            }

            #[allow(clippy::cast_possible_truncation)]
            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Self::from_millis(value as i64)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                DateTime::parse_from_rfc3339(value)
                    .map(|at| at.with_timezone(&Utc))
                    .map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super::lenient_uuid")]
        id: Uuid,
        #[serde(with = "super::flexible_timestamp")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_uuid_id_is_kept() {
        let json = r#"{"id":"6f2c1f1e-8a3a-4a52-9a0e-3c1f6f0b1a11","at":0}"#;

        let parsed: Stamped = serde_json::from_str(json).unwrap();

        assert_eq!(
            parsed.id,
            Uuid::parse_str("6f2c1f1e-8a3a-4a52-9a0e-3c1f6f0b1a11").unwrap()
        );
    }

    #[test]
    fn test_foreign_ids_are_replaced() {
        for json in [
            r#"{"id":"1700000000000","at":0}"#,
            r#"{"id":1700000000000,"at":0}"#,
            r#"{"id":null,"at":0}"#,
        ] {
            let parsed: Stamped = serde_json::from_str(json).unwrap();
            assert!(!parsed.id.is_nil(), "{json}");
        }
    }

    #[test]
    fn test_iso_and_millis_timestamps_agree() {
        let millis: Stamped = serde_json::from_str(r#"{"id":"x","at":1700000000000}"#).unwrap();
        let iso: Stamped =
            serde_json::from_str(r#"{"id":"x","at":"2023-11-14T22:13:20.000Z"}"#).unwrap();

        assert_eq!(millis.at, Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
        assert_eq!(iso.at, millis.at);
    }

    #[test]
    fn test_timestamp_written_as_millis() {
        let stamped = Stamped {
            id: Uuid::new_v4(),
            at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
        };

        let json = serde_json::to_value(&stamped).unwrap();

        assert_eq!(json["at"], 1_700_000_000_123_i64);
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        assert!(serde_json::from_str::<Stamped>(r#"{"id":"x","at":"yesterday"}"#).is_err());
    }
}
