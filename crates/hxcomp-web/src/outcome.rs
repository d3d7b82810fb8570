use crate::flash::Flash;
use crate::request::HX_PUSH_URL;
use crate::trigger::{Event, URL_SYNC_EVENT};
use http::StatusCode;
use hxcomp_core::Callback;
use serde_json::{Map, Value};

/// Everything an action asks the registry to do with its response.
///
/// Built fluently from one of the constructors:
///
/// ```ignore
/// Outcome::ok(props).flash(flash::SUCCESS, "Saved").trigger("cart:updated")
/// ```
#[derive(Debug)]
pub struct Outcome<P> {
    props: P,
    error: Option<anyhow::Error>,
    redirect: Option<String>,
    flashes: Vec<Flash>,
    trigger: Option<Event>,
    after_settle: Option<String>,
    callback: Option<Callback>,
    headers: Vec<(String, String)>,
    status: Option<StatusCode>,
    skip: bool,
}

pub(crate) struct OutcomeParts<P> {
    pub props: P,
    pub error: Option<anyhow::Error>,
    pub redirect: Option<String>,
    pub flashes: Vec<Flash>,
    pub trigger: Option<Event>,
    pub after_settle: Option<String>,
    pub callback: Option<Callback>,
    pub headers: Vec<(String, String)>,
    pub status: Option<StatusCode>,
    pub skip: bool,
}

impl<P> Outcome<P> {
    /// Re-render with `props`.
    pub fn ok(props: P) -> Self {
        Self {
            props,
            error: None,
            redirect: None,
            flashes: Vec::new(),
            trigger: None,
            after_settle: None,
            callback: None,
            headers: Vec::new(),
            status: None,
            skip: false,
        }
    }

    /// Hand `error` to the registry's error callback.
    pub fn err(props: P, error: impl Into<anyhow::Error>) -> Self {
        let mut outcome = Self::ok(props);
        outcome.error = Some(error.into());
        outcome
    }

    /// Respond without rendering; headers and triggers still apply.
    pub fn skip() -> Self
    where
        P: Default,
    {
        let mut outcome = Self::ok(P::default());
        outcome.skip = true;
        outcome
    }

    /// Client-side navigation through `HX-Redirect`.
    pub fn redirect(url: impl Into<String>) -> Self
    where
        P: Default,
    {
        let mut outcome = Self::ok(P::default());
        outcome.redirect = Some(url.into());
        outcome
    }

    pub fn flash(mut self, level: impl Into<String>, message: impl Into<String>) -> Self {
        self.flashes.push(Flash::new(level, message));
        self
    }

    /// Broadcast a client event. A later call replaces the earlier one.
    pub fn trigger(mut self, event: impl Into<String>) -> Self {
        self.trigger = Some(Event::new(event));
        self
    }

    pub fn trigger_with(mut self, event: impl Into<String>, data: Map<String, Value>) -> Self {
        self.trigger = Some(Event::with_data(event, data));
        self
    }

    pub fn push_url(self, url: impl Into<String>) -> Self {
        self.header(HX_PUSH_URL, url)
    }

    /// Ask the client to re-sync its URL after the swap settles.
    pub fn trigger_url_sync(mut self) -> Self {
        self.after_settle = Some(URL_SYNC_EVENT.to_string());
        self
    }

    /// Set a response header; setting the same name twice keeps the last
    /// value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    #[deprecated(note = "broadcast an event with `trigger_with` instead")]
    pub fn callback(mut self, callback: Callback) -> Self {
        if !callback.is_zero() {
            self.callback = Some(callback);
        }
        self
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn into_props(self) -> P {
        self.props
    }

    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn flashes(&self) -> &[Flash] {
        &self.flashes
    }

    pub fn triggered(&self) -> Option<&Event> {
        self.trigger.as_ref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn status_override(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn skips_render(&self) -> bool {
        self.skip
    }

    pub(crate) fn into_parts(self) -> OutcomeParts<P> {
        OutcomeParts {
            props: self.props,
            error: self.error,
            redirect: self.redirect,
            flashes: self.flashes,
            trigger: self.trigger,
            after_settle: self.after_settle,
            callback: self.callback,
            headers: self.headers,
            status: self.status,
            skip: self.skip,
        }
    }
}
