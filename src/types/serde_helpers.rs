//! Custom serde helpers for Korbit's inconsistent encodings.
//!
//! The same logical field is sometimes a JSON number and sometimes a quoted
//! string depending on the endpoint and currency pair.

use std::fmt;

use serde::{Deserializer, de};

/// Deserialize a `u64` that may arrive as `42` or `"42"`.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use korbit_api_client::types::serde_helpers::int_or_string;
///
/// #[derive(Deserialize, Debug)]
/// struct Record {
///     #[serde(deserialize_with = "int_or_string::deserialize")]
///     id: u64,
/// }
///
/// let quoted: Record = serde_json::from_str(r#"{"id":"42"}"#).unwrap();
/// let bare: Record = serde_json::from_str(r#"{"id":42}"#).unwrap();
/// assert_eq!(quoted.id, 42);
/// assert_eq!(bare.id, 42);
/// ```
pub mod int_or_string {
    use super::*;

    /// Deserialize an integer from a number or a decimal string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IntOrStringVisitor;

        impl<'de> de::Visitor<'de> for IntOrStringVisitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a non-negative integer or a quoted integer")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v)
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v).map_err(|_| de::Error::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.trim()
                    .parse()
                    .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(v), &self))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_str(&v)
            }
        }

        deserializer.deserialize_any(IntOrStringVisitor)
    }
}

/// Like [`int_or_string`] but also accepts `null` or a missing field.
pub mod optional_int_or_string {
    use super::*;
    use serde::Deserialize;

    /// Deserialize an optional integer from a number, a decimal string or null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(deserialize_with = "int_or_string::deserialize")] u64);

        let value = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(value.map(|Wrapper(id)| id))
    }
}
