use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Client event carrying a [`Callback`] payload.
pub const CALLBACK_EVENT: &str = "hxcmp:callback";

/// Stored request for a parent component to refresh itself after a child
/// action.
///
/// Superseded by plain broadcast events (`Outcome::trigger`); kept so
/// older components keep working. Props store it as `{"u","t","s","v"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Callback {
    pub url: String,
    pub target: String,
    pub swap: String,
    pub vals: Map<String, Value>,
}

impl Callback {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn swap(mut self, swap: impl Into<String>) -> Self {
        self.swap = swap.into();
        self
    }

    pub fn vals(mut self, vals: Map<String, Value>) -> Self {
        self.vals = vals;
        self
    }

    pub fn is_zero(&self) -> bool {
        self.url.is_empty()
    }

    /// Compact props form.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("u".to_string(), Value::String(self.url.clone()));
        if !self.target.is_empty() {
            map.insert("t".to_string(), Value::String(self.target.clone()));
        }
        if !self.swap.is_empty() {
            map.insert("s".to_string(), Value::String(self.swap.clone()));
        }
        if !self.vals.is_empty() {
            map.insert("v".to_string(), Value::Object(self.vals.clone()));
        }
        Value::Object(map)
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            url: text("u"),
            target: text("t"),
            swap: text("s"),
            vals: obj
                .get("v")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Event detail sent to the client under [`CALLBACK_EVENT`].
    pub fn trigger_detail(&self) -> Value {
        let mut map = Map::new();
        map.insert("url".to_string(), Value::String(self.url.clone()));
        if !self.target.is_empty() {
            map.insert("target".to_string(), Value::String(self.target.clone()));
        }
        if !self.swap.is_empty() {
            map.insert("swap".to_string(), Value::String(self.swap.clone()));
        }
        if !self.vals.is_empty() {
            map.insert("vals".to_string(), Value::Object(self.vals.clone()));
        }
        Value::Object(map)
    }
}

/// Serde uses the compact props form, so a `Callback` field behaves the
/// same under `reflect_props!` and generated codecs.
impl Serialize for Callback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Callback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Callback::from_value(&value).ok_or_else(|| D::Error::custom("callback must be a map"))
    }
}
