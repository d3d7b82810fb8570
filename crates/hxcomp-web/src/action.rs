use crate::request::TOKEN_PARAM;
use html_escape::encode_double_quoted_attribute;
use http::Method;
use hxcomp_core::Callback;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// `hx-swap` strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Swap {
    #[default]
    OuterHtml,
    InnerHtml,
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
    Delete,
    None,
}

impl Swap {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OuterHtml => "outerHTML",
            Self::InnerHtml => "innerHTML",
            Self::BeforeBegin => "beforebegin",
            Self::AfterBegin => "afterbegin",
            Self::BeforeEnd => "beforeend",
            Self::AfterEnd => "afterend",
            Self::Delete => "delete",
            Self::None => "none",
        }
    }
}

/// Attribute builder for one component action.
///
/// GET links carry the token in the query string; every other method
/// carries it in `hx-vals` next to any caller-supplied values.
#[derive(Debug, Clone)]
pub struct ActionLink {
    path: String,
    method: Method,
    token: String,
    target: Option<String>,
    swap: Swap,
    trigger: Option<String>,
    confirm: Option<String>,
    indicator: Option<String>,
    push_url: bool,
    vals: Map<String, Value>,
}

impl ActionLink {
    pub fn new(path: impl Into<String>, method: Method, token: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            token: token.into(),
            target: None,
            swap: Swap::default(),
            trigger: None,
            confirm: None,
            indicator: None,
            push_url: false,
            vals: Map::new(),
        }
    }

    pub fn target(mut self, selector: impl Into<String>) -> Self {
        self.target = Some(selector.into());
        self
    }

    pub fn target_this(self) -> Self {
        self.target("this")
    }

    pub fn target_closest(self, selector: &str) -> Self {
        self.target(format!("closest {selector}"))
    }

    pub fn target_find(self, selector: &str) -> Self {
        self.target(format!("find {selector}"))
    }

    pub fn target_next(self, selector: &str) -> Self {
        self.target(format!("next {selector}"))
    }

    pub fn target_previous(self, selector: &str) -> Self {
        self.target(format!("previous {selector}"))
    }

    pub fn swap(mut self, swap: Swap) -> Self {
        self.swap = swap;
        self
    }

    /// Raw `hx-trigger` value; replaces any earlier trigger.
    pub fn trigger(mut self, spec: impl Into<String>) -> Self {
        self.trigger = Some(spec.into());
        self
    }

    pub fn every(self, interval: Duration) -> Self {
        self.trigger(format!("every {}", format_interval(interval)))
    }

    /// Fire on a body-level event; repeated calls add more events.
    pub fn on_event(mut self, event: &str) -> Self {
        let entry = format!("{event} from:body");
        self.trigger = Some(match self.trigger.take() {
            Some(existing) => format!("{existing}, {entry}"),
            None => entry,
        });
        self
    }

    pub fn on_load(self) -> Self {
        self.trigger("load")
    }

    pub fn on_intersect(self) -> Self {
        self.trigger("intersect once")
    }

    pub fn on_revealed(self) -> Self {
        self.trigger("revealed")
    }

    pub fn confirm(mut self, message: impl Into<String>) -> Self {
        self.confirm = Some(message.into());
        self
    }

    pub fn indicator(mut self, selector: impl Into<String>) -> Self {
        self.indicator = Some(selector.into());
        self
    }

    pub fn push_url(mut self) -> Self {
        self.push_url = true;
        self
    }

    pub fn val(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vals.insert(key.into(), value.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Path with the token appended as a query parameter.
    pub fn url(&self) -> String {
        if self.token.is_empty() {
            return self.path.clone();
        }
        let query = serde_urlencoded::to_string(&[(TOKEN_PARAM, self.token.as_str())])
            .unwrap_or_default();
        let sep = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{sep}{query}", self.path)
    }

    pub fn attrs(&self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        let verb = format!("hx-{}", self.method.as_str().to_ascii_lowercase());
        let mut vals = self.vals.clone();
        if self.method == Method::GET {
            attrs.insert(verb, self.url());
        } else {
            attrs.insert(verb, self.path.clone());
            if !self.token.is_empty() {
                vals.insert(TOKEN_PARAM.to_string(), Value::String(self.token.clone()));
            }
        }
        if !vals.is_empty() {
            attrs.insert("hx-vals".to_string(), Value::Object(vals).to_string());
        }
        if let Some(target) = &self.target {
            attrs.insert("hx-target".to_string(), target.clone());
        }
        attrs.insert("hx-swap".to_string(), self.swap.as_str().to_string());
        if let Some(trigger) = &self.trigger {
            attrs.insert("hx-trigger".to_string(), trigger.clone());
        }
        if let Some(confirm) = &self.confirm {
            attrs.insert("hx-confirm".to_string(), confirm.clone());
        }
        if let Some(indicator) = &self.indicator {
            attrs.insert("hx-indicator".to_string(), indicator.clone());
        }
        if self.push_url {
            attrs.insert("hx-push-url".to_string(), "true".to_string());
        }
        attrs
    }

    /// Anchor attributes: `href` plus the htmx attributes, so the link
    /// still works without JavaScript for GET actions.
    pub fn as_link(&self) -> BTreeMap<String, String> {
        let mut attrs = self.attrs();
        attrs.insert("href".to_string(), self.url());
        attrs
    }

    pub fn as_callback(&self) -> Callback {
        let mut callback = Callback::new(self.url()).swap(self.swap.as_str());
        if let Some(target) = &self.target {
            callback = callback.target(target.clone());
        }
        if !self.vals.is_empty() {
            callback = callback.vals(self.vals.clone());
        }
        callback
    }
}

/// Renders ` name="value"` pairs, escaped, in key order.
impl fmt::Display for ActionLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_attrs(f, &self.attrs())
    }
}

pub fn render_attrs(out: &mut impl fmt::Write, attrs: &BTreeMap<String, String>) -> fmt::Result {
    for (name, value) in attrs {
        write!(out, r#" {name}="{}""#, encode_double_quoted_attribute(value))?;
    }
    Ok(())
}

/// Placeholder that replaces itself with the component once `trigger`
/// fires.
pub fn lazy_placeholder(url: &str, trigger: &str, placeholder: &str) -> String {
    format!(
        r#"<div hx-get="{}" hx-trigger="{}" hx-swap="outerHTML">{placeholder}</div>"#,
        encode_double_quoted_attribute(url),
        encode_double_quoted_attribute(trigger)
    )
}

fn format_interval(interval: Duration) -> String {
    let ms = interval.as_millis();
    if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{ms}ms")
    }
}
