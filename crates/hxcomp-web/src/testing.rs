//! Helpers for exercising components in unit tests without a server.

use crate::component::Component;
use crate::flash::{self, Flash};
use crate::registry::Registry;
use crate::request::{ComponentRequest, ComponentResponse, Context, HX_REDIRECT, HX_TRIGGER};
use crate::trigger::parse_trigger_header;
use http::{HeaderMap, Method, StatusCode};

#[derive(Debug, Clone)]
pub struct TestResult {
    pub html: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub triggered_events: Vec<String>,
    pub flashes: Vec<Flash>,
    pub redirect_url: Option<String>,
}

impl TestResult {
    pub fn from_response(response: &ComponentResponse) -> Self {
        let html = response.body_text().into_owned();
        Self {
            flashes: flash::parse_rendered(&html),
            triggered_events: response
                .header(HX_TRIGGER)
                .map(parse_trigger_header)
                .unwrap_or_default(),
            redirect_url: response.header(HX_REDIRECT).map(str::to_string),
            status: response.status,
            headers: response.headers.clone(),
            html,
        }
    }

    pub fn html_contains(&self, needle: &str) -> bool {
        self.html.contains(needle)
    }

    pub fn html_contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.html.contains(n))
    }

    pub fn html_contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.html.contains(n))
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.triggered_events.iter().any(|e| e == name)
    }

    pub fn has_flash(&self, level: &str) -> bool {
        self.flashes.iter().any(|f| f.level == level)
    }

    pub fn has_flash_message(&self, level: &str, message: &str) -> bool {
        self.flashes
            .iter()
            .any(|f| f.level == level && f.message == message)
    }

    pub fn was_redirected(&self) -> bool {
        self.redirect_url.is_some()
    }

    pub fn redirected_to(&self, url: &str) -> bool {
        self.redirect_url.as_deref() == Some(url)
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn has_status(&self, status: StatusCode) -> bool {
        self.status == status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn has_header(&self, name: &str, value: &str) -> bool {
        self.header(name) == Some(value)
    }
}

/// Hydrates and renders `props` directly, bypassing tokens and routing.
pub fn render<C: Component>(component: &C, props: C::Props) -> anyhow::Result<TestResult> {
    render_with_context(&Context::new(), component, props)
}

pub fn render_with_context<C: Component>(
    ctx: &Context,
    component: &C,
    mut props: C::Props,
) -> anyhow::Result<TestResult> {
    component.hydrate(ctx, &mut props)?;
    let html = component.render(ctx, &props)?;
    Ok(TestResult::from_response(&ComponentResponse::html(html)))
}

/// Sends an htmx request through `registry`. `form` pairs become the
/// urlencoded body.
pub fn request(
    registry: &Registry,
    method: Method,
    target: &str,
    form: &[(&str, &str)],
) -> TestResult {
    request_with_context(&Context::new(), registry, method, target, form)
}

pub fn request_with_context(
    ctx: &Context,
    registry: &Registry,
    method: Method,
    target: &str,
    form: &[(&str, &str)],
) -> TestResult {
    let mut req = ComponentRequest::new(method, target).htmx();
    if !form.is_empty() {
        req = req.with_form(form);
    }
    TestResult::from_response(&registry.handle(ctx, &req))
}

/// Encodes `props` for `component` and posts to `action`.
pub fn action<C: Component>(
    registry: &Registry,
    component: &C,
    action: &str,
    props: &C::Props,
    form: &[(&str, &str)],
) -> anyhow::Result<TestResult> {
    let descriptor = component.descriptor();
    let token = descriptor.encode(props)?;
    let mut pairs = vec![(crate::request::TOKEN_PARAM, token.as_str())];
    pairs.extend_from_slice(form);
    Ok(request(
        registry,
        Method::POST,
        &descriptor.action_path(action),
        &pairs,
    ))
}
