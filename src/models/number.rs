//! Lenient decoding of numeric fields.
//!
//! The REST backend returns DECIMAL columns and SUM aggregates either as
//! JSON numbers or as numeric strings (`"15000.50"`). Both decode to `f64`.

use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    fn into_f64<E: Error>(self) -> Result<f64, E> {
        match self {
            Number::Float(value) => Ok(value),
            Number::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, found \"{}\"", text))),
        }
    }
}

pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Number::deserialize(deserializer)?.into_f64()
}

/// As [`number_or_string`], with `null` decoding to `None`.
pub(crate) fn optional_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(Number::into_f64)
        .transpose()
}
