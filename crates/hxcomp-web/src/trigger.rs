use serde_json::{Map, Value};

/// Event carrying queued flashes when a response skips rendering.
pub const FLASH_EVENT: &str = "hxcmp:flash";
/// After-settle event asking the client to re-sync its URL.
pub const URL_SYNC_EVENT: &str = "url:sync";

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub data: Option<Map<String, Value>>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
        }
    }

    pub fn with_data(name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            data: Some(data),
        }
    }
}

/// `HX-Trigger` value for a single event: the bare name when there is no
/// data, otherwise `{"name": data}`.
pub fn build_trigger_header(event: &str, data: Option<&Map<String, Value>>) -> String {
    let mut set = TriggerSet::default();
    set.push(event, data.cloned().map(Value::Object));
    set.header_value().unwrap_or_default()
}

/// Ordered set of client events folded into one `HX-Trigger` header.
#[derive(Debug, Default, Clone)]
pub struct TriggerSet {
    events: Vec<(String, Option<Value>)>,
}

impl TriggerSet {
    pub fn push(&mut self, name: impl Into<String>, detail: Option<Value>) {
        let name = name.into();
        self.events.retain(|(existing, _)| *existing != name);
        self.events.push((name, detail));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn header_value(&self) -> Option<String> {
        match self.events.as_slice() {
            [] => None,
            [(name, None)] => Some(name.clone()),
            events => {
                let mut obj = Map::new();
                for (name, detail) in events {
                    obj.insert(name.clone(), detail.clone().unwrap_or(Value::Null));
                }
                Some(Value::Object(obj).to_string())
            }
        }
    }
}

/// Event names in an `HX-Trigger` value, in either the bare
/// comma-separated or JSON form.
pub fn parse_trigger_header(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('{') {
        return serde_json::from_str::<Map<String, Value>>(trimmed)
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
