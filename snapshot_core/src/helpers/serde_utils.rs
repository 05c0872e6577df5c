//! Serializers that keep base-unit amounts exact in JSON output.

use alloy_primitives::U256;
use serde::Serializer;

/// Serialize a U256 as a base-10 string.
pub fn serialize_decimal<S>(val: &U256, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&val.to_string())
}

/// Serialize an optional U256 as a base-10 string or `null`.
pub fn serialize_decimal_opt<S>(val: &Option<U256>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match val {
        Some(val) => s.serialize_str(&val.to_string()),
        None => s.serialize_none(),
    }
}
