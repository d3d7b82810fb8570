use crate::error::TokenError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub use serde_json::{Map, Number, Value};

/// Flat string-keyed representation of a component's props.
pub type PropsMap = Map<String, Value>;

/// Conversion between typed props and the flat `PropsMap`.
///
/// Implementations are normally emitted by `hxcomp generate`; the
/// `reflect_props!` macro provides a serde-backed fallback with the same
/// observable contract.
pub trait PropsCodec {
    fn encode_props(&self) -> Result<PropsMap, TokenError>;

    /// Applies recognized keys onto `self`. Unknown keys are ignored and
    /// keys that are absent leave the corresponding field untouched.
    fn decode_props(&mut self, map: &PropsMap) -> Result<(), TokenError>;
}

pub fn pack(map: &PropsMap) -> Result<Vec<u8>, TokenError> {
    rmp_serde::to_vec(map).map_err(|e| TokenError::Encode(format!("pack props: {e}")))
}

pub fn unpack(bytes: &[u8]) -> Result<PropsMap, TokenError> {
    rmp_serde::from_slice(bytes).map_err(|e| TokenError::invalid(format!("unpack props: {e}")))
}

/// Reads an integer of any width, accepting signed, unsigned and
/// integral floating values that fit the target type.
pub fn int<T>(value: &Value) -> Option<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return T::try_from(i).ok();
    }
    if let Some(u) = n.as_u64() {
        return T::try_from(u).ok();
    }
    let f = n.as_f64()?;
    if f.fract() != 0.0 || f < i64::MIN as f64 || f > i64::MAX as f64 {
        return None;
    }
    T::try_from(f as i64).ok()
}

pub fn float(value: &Value) -> Option<f64> {
    value.as_f64()
}

pub fn float32(value: &Value) -> Option<f32> {
    value.as_f64().map(|f| f as f32)
}

pub fn string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

pub fn boolean(value: &Value) -> Option<bool> {
    value.as_bool()
}

pub fn timestamp(value: &Value) -> Option<OffsetDateTime> {
    value
        .as_str()
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
}

pub fn callback(value: &Value) -> Option<crate::Callback> {
    crate::Callback::from_value(value)
}

/// Wraps a reader for `Option<T>` fields: an explicit null clears the
/// field, a readable value sets it, anything else is ignored.
pub fn optional<T>(value: &Value, read: impl Fn(&Value) -> Option<T>) -> Option<Option<T>> {
    if value.is_null() {
        return Some(None);
    }
    read(value).map(Some)
}

pub fn timestamp_value(at: &OffsetDateTime) -> Result<Value, TokenError> {
    at.format(&Rfc3339)
        .map(Value::String)
        .map_err(|e| TokenError::Encode(format!("format timestamp: {e}")))
}

pub fn optional_timestamp_value(at: Option<&OffsetDateTime>) -> Result<Value, TokenError> {
    match at {
        Some(at) => timestamp_value(at),
        None => Ok(Value::Null),
    }
}

pub fn is_epoch(at: &OffsetDateTime) -> bool {
    *at == OffsetDateTime::UNIX_EPOCH
}

/// Zero-value test for `skip_serializing_if` on fields the generator
/// omits when empty.
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
