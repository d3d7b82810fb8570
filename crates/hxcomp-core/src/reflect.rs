//! Serde-backed props codec for types without a generated implementation.
//!
//! Field names, `rename`, `skip` and `skip_serializing_if` follow the
//! usual serde attributes, so a type can switch between this fallback and
//! `hxcomp generate` without changing its tokens. The props type must be
//! `#[serde(default)]` so that absent keys keep their defaults.
//!
//! Decoding is per key: a value that does not fit its field (wrong type,
//! out of range) is dropped and the field keeps its current value, which
//! is what the generated readers do.

use crate::codec::{Number, PropsMap, Value};
use crate::error::TokenError;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub fn encode<T: Serialize + ?Sized>(props: &T) -> Result<PropsMap, TokenError> {
    match serde_json::to_value(props).map_err(|e| TokenError::Encode(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(TokenError::Encode(format!(
            "props must serialize to a map, got {}",
            kind(&other)
        ))),
    }
}

pub fn decode<T: DeserializeOwned>(map: &PropsMap) -> Result<T, TokenError> {
    serde_json::from_value(Value::Object(map.clone()))
        .map_err(|e| TokenError::invalid(format!("props shape: {e}")))
}

/// Applies `map` onto `target`, one key at a time.
pub fn merge_into<T>(target: &mut T, map: &PropsMap) -> Result<(), TokenError>
where
    T: Serialize + DeserializeOwned,
{
    let mut merged = encode(target)?;
    for (key, value) in map {
        let candidates = [Some(value.clone()), integral(value)];
        let accepted = candidates.into_iter().flatten().find_map(|candidate| {
            let mut trial = merged.clone();
            trial.insert(key.clone(), candidate);
            decode::<T>(&trial).is_ok().then_some(trial)
        });
        match accepted {
            Some(trial) => merged = trial,
            None => tracing::debug!(key = %key, "ignoring props value that does not fit its field"),
        }
    }
    *target = decode(&merged)?;
    Ok(())
}

/// `3.0` as the integer `3`, so whole floats land in integer fields.
fn integral(value: &Value) -> Option<Value> {
    let f = value.as_f64().filter(|_| value.is_f64())?;
    if f.fract() != 0.0 || f < i64::MIN as f64 || f > i64::MAX as f64 {
        return None;
    }
    Some(Value::Number(Number::from(f as i64)))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Implements `PropsCodec` through serde for one or more types.
///
/// ```ignore
/// #[derive(Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct FilterProps { query: String, page: u32 }
///
/// hxcomp_core::reflect_props!(FilterProps);
/// ```
#[macro_export]
macro_rules! reflect_props {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::codec::PropsCodec for $ty {
                fn encode_props(
                    &self,
                ) -> ::std::result::Result<$crate::codec::PropsMap, $crate::TokenError> {
                    $crate::reflect::encode(self)
                }

                fn decode_props(
                    &mut self,
                    map: &$crate::codec::PropsMap,
                ) -> ::std::result::Result<(), $crate::TokenError> {
                    $crate::reflect::merge_into(self, map)
                }
            }
        )+
    };
}
