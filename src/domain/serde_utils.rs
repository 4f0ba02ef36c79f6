//! Serde utilities for wanderpin.

use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// Module to handle fields the search API serves as either a string or a
/// number across revisions (e.g. the `total` count).
pub mod string_or_u64 {
    use super::{de, fmt, Deserializer, Visitor};

    /// Deserializes a u64 from a string or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a string or integer, or if
    /// parsing fails.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrIntVisitor;

        impl Visitor<'_> for StringOrIntVisitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer count")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(value)
            }

            #[allow(clippy::cast_sign_loss)]
            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value < 0 {
                    return Err(de::Error::custom("negative count"));
                }
                Ok(value as u64)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse::<u64>().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(StringOrIntVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Wrapper {
        #[serde(with = "super::string_or_u64")]
        total: u64,
    }

    #[test]
    fn test_accepts_string() {
        let parsed: Wrapper = serde_json::from_str(r#"{"total": "272"}"#).unwrap();
        assert_eq!(parsed.total, 272);
    }

    #[test]
    fn test_accepts_number() {
        let parsed: Wrapper = serde_json::from_str(r#"{"total": 272}"#).unwrap();
        assert_eq!(parsed.total, 272);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"total": "many"}"#).is_err());
    }
}
