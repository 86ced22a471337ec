//! Numeric coercion
//!
//! Order documents have drifted in shape over time: amounts arrive as numbers,
//! numeric strings, booleans or `null`, and nested values are sometimes
//! unpopulated references. Everything here degrades to "absent" rather than
//! failing, so a single malformed field never prevents an order from being
//! reconciled.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{
    Deserialize, Deserializer,
    de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor},
};
use serde_json::Value;

/// Returns `value` when it is a valid, non-negative number, otherwise `fallback`.
pub fn coerce_non_negative_number(value: Option<Decimal>, fallback: Decimal) -> Decimal {
    match value {
        Some(value) if value >= Decimal::ZERO => value,
        _ => fallback,
    }
}

/// Shorthand for [`coerce_non_negative_number`] with a zero fallback.
pub fn amount_or_zero(value: Option<Decimal>) -> Decimal {
    coerce_non_negative_number(value, Decimal::ZERO)
}

/// Parse a textual number the way a browser's `Number()` would.
///
/// Surrounding whitespace is ignored and the empty string is zero.
/// Anything that is not a plain or scientific decimal is rejected,
/// including digit separators.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }

    if trimmed.contains('_') {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_err| Decimal::from_scientific(trimmed))
        .ok()
}

/// Deserialize any value into an optional number.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself reports an error; every
/// value shape is accepted.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientNumberVisitor)
}

/// Deserialize any value into optional text.
///
/// Strings are kept as-is, numbers are rendered, and `MongoDB` extended JSON
/// object ids (`{"$oid": "..."}`) are unwrapped. Everything else is absent.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself reports an error.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(text_from_value(value))
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(mut map) => match map.remove("$oid") {
            Some(Value::String(oid)) => Some(oid),
            _ => None,
        },
        Value::Null | Value::Bool(_) | Value::Array(_) => None,
    }
}

/// Deserialize a sequence leniently.
///
/// Anything that isn't a sequence becomes an empty vector, and elements that
/// fail to deserialize are replaced with their default.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself reports an error.
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;

    let Value::Array(elements) = value else {
        return Ok(Vec::new());
    };

    Ok(elements
        .into_iter()
        .map(|element| T::deserialize(element).unwrap_or_default())
        .collect())
}

/// Deserialize a nested object leniently.
///
/// Non-object values (such as an unpopulated reference id) become `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer itself reports an error.
pub fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;

    if !value.is_object() {
        return Ok(None);
    }

    Ok(T::deserialize(value).ok())
}

struct LenientNumberVisitor;

impl<'de> Visitor<'de> for LenientNumberVisitor {
    type Value = Option<Decimal>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(if v { Decimal::ONE } else { Decimal::ZERO }))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(Decimal::from(v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        // NaN and infinities have no decimal representation.
        Ok(Decimal::from_f64(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(parse_number(v))
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
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}

        Ok(None)
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}

        Ok(None)
    }
}
