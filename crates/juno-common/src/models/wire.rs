//! Coercion of backend identifiers into plain integers.
//!
//! The backend is not consistent about how it encodes numeric ids: depending
//! on the endpoint they arrive as JSON numbers, numeric strings, or 64-bit
//! "long" objects split into `low`/`high` 32-bit halves. Everything is
//! normalized to `i64` at the deserialization boundary.

use serde::{de, Deserialize, Deserializer};
use std::collections::BTreeSet;

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Int(i64),
    Float(f64),
    Text(String),
    Long { low: i64, high: i64 },
}

impl WireId {
    fn into_i64(self) -> Result<i64, String> {
        match self {
            WireId::Int(v) => Ok(v),
            WireId::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 {
                    Ok(v as i64)
                } else {
                    Err(format!("id {} is not an integer", v))
                }
            }
            WireId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("id '{}' is not numeric", s)),
            // Two's complement halves: `low` may arrive signed or unsigned.
            WireId::Long { low, high } => {
                if !(i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&low) {
                    return Err(format!("long id low half {} is out of range", low));
                }
                let high = i32::try_from(high)
                    .map_err(|_| format!("long id high half {} is out of range", high))?;
                Ok((i64::from(high) << 32) | i64::from(low as u32))
            }
        }
    }
}

/// Deserialize a single wire id.
pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    WireId::deserialize(deserializer)?
        .into_i64()
        .map_err(de::Error::custom)
}

/// Deserialize an optional wire id (`null` and missing both map to `None`).
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<WireId>::deserialize(deserializer)? {
        Some(raw) => raw.into_i64().map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

/// Deserialize a list of wire ids into a set. `null` yields an empty set.
pub fn id_set<'de, D>(deserializer: D) -> Result<BTreeSet<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<WireId>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|v| v.into_i64().map_err(de::Error::custom))
        .collect()
}
