use crate::component::Component;
use crate::error::ComponentError;
use crate::flash::{self, Flash};
use crate::outcome::{Outcome, OutcomeParts};
use crate::request::{
    ComponentRequest, ComponentResponse, Context, HTML_CONTENT_TYPE, HX_REDIRECT, HX_TRIGGER,
    HX_TRIGGER_AFTER_SETTLE, TOKEN_PARAM,
};
use crate::trigger::{FLASH_EVENT, TriggerSet};
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use hxcomp_core::CALLBACK_EVENT;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Maps a failure to the response sent to the client.
pub type ErrorHandler =
    Arc<dyn Fn(&Context, &ComponentRequest, &ComponentError) -> ComponentResponse + Send + Sync>;

/// One action dispatch: the verb and action name from the request, the
/// hydrated props, and the request/response pair for handlers that want
/// them.
pub struct Invocation<'a, P> {
    pub method: &'a Method,
    pub action: &'a str,
    pub props: P,
    pub request: &'a ComponentRequest,
    pub response: &'a mut ComponentResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRoute {
    pub method: Method,
    pub name: String,
}

impl ActionRoute {
    pub fn new(method: Method, name: &str) -> Self {
        Self {
            method,
            name: name.to_string(),
        }
    }
}

/// Resolves an action by name and method and runs it.
///
/// Implemented by the runtime [`ActionTable`](crate::ActionTable) and by
/// the `<Type>Routes` structs that `hxcomp generate` emits. Returning
/// `None` means no action matched and the request ends in a 404.
pub trait ActionRouter<C: Component>: Send + Sync + 'static {
    fn dispatch(
        &self,
        component: &C,
        ctx: &Context,
        call: Invocation<'_, C::Props>,
    ) -> Option<Outcome<C::Props>>;

    fn routes(&self) -> Vec<ActionRoute>;

    fn duplicates(&self) -> &[String] {
        &[]
    }
}

/// How a request left the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Forbidden,
    NotFound,
    Failed,
    Redirected,
    Skipped,
    Rendered,
}

#[derive(Debug)]
pub struct Served {
    pub response: ComponentResponse,
    pub terminal: Terminal,
}

pub(crate) trait Endpoint: Send + Sync {
    fn name(&self) -> &str;
    fn prefix(&self) -> &str;
    fn routes(&self) -> Vec<ActionRoute>;
    fn serve(&self, ctx: &Context, req: &ComponentRequest, on_error: &ErrorHandler) -> Served;
}

pub(crate) struct Mounted<C, R> {
    pub component: C,
    pub router: R,
}

impl<C: Component, R: ActionRouter<C>> Endpoint for Mounted<C, R> {
    fn name(&self) -> &str {
        self.component.descriptor().name()
    }

    fn prefix(&self) -> &str {
        self.component.descriptor().prefix()
    }

    fn routes(&self) -> Vec<ActionRoute> {
        self.router.routes()
    }

    fn serve(&self, ctx: &Context, req: &ComponentRequest, on_error: &ErrorHandler) -> Served {
        serve(&self.component, &self.router, ctx, req, on_error)
    }
}

pub fn not_found_response() -> ComponentResponse {
    ComponentResponse::text(StatusCode::NOT_FOUND, "Not found")
}

/// 404 for not-found errors, 400 for untrusted tokens, 500 otherwise.
/// Bodies are fixed strings so internal details never reach the client.
pub fn default_error_response(
    _ctx: &Context,
    req: &ComponentRequest,
    err: &ComponentError,
) -> ComponentResponse {
    let status = err.status();
    match status {
        StatusCode::NOT_FOUND => {
            debug!(path = %req.path, error = %err, "component target not found");
            not_found_response()
        }
        StatusCode::BAD_REQUEST => {
            warn!(path = %req.path, error = %err, "rejected component token");
            ComponentResponse::text(status, "Bad request")
        }
        _ => {
            error!(path = %req.path, error = %err, "component request failed");
            ComponentResponse::text(status, "Internal error")
        }
    }
}

fn carried_token(req: &ComponentRequest) -> Option<&str> {
    req.query_value(TOKEN_PARAM)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            req.is_mutating()
                .then(|| req.form_value(TOKEN_PARAM))
                .flatten()
                .filter(|t| !t.is_empty())
        })
}

fn action_name<'a>(prefix: &str, path: &'a str) -> &'a str {
    let rest = path.strip_prefix(prefix).unwrap_or_default();
    rest.strip_prefix('/').unwrap_or(rest)
}

/// Full lifecycle for one mounted component: decode, hydrate, route, then
/// render or fold the action outcome.
pub(crate) fn serve<C, R>(
    component: &C,
    router: &R,
    ctx: &Context,
    req: &ComponentRequest,
    on_error: &ErrorHandler,
) -> Served
where
    C: Component,
    R: ActionRouter<C> + ?Sized,
{
    let descriptor = component.descriptor();
    let action = action_name(descriptor.prefix(), &req.path);

    let mut props = C::Props::default();
    if let Some(token) = carried_token(req) {
        if let Err(err) = descriptor.decode_into(token, &mut props) {
            return fail(ctx, req, &err.into(), on_error, None);
        }
    }
    if let Err(err) = component.hydrate(ctx, &mut props) {
        return fail(ctx, req, &ComponentError::Hydration(err), on_error, None);
    }

    if req.method == Method::GET && action.is_empty() {
        return render(component, ctx, req, &props, &[], ComponentResponse::default(), on_error);
    }

    let mut response = ComponentResponse::default();
    let call = Invocation {
        method: &req.method,
        action,
        props,
        request: req,
        response: &mut response,
    };
    match router.dispatch(component, ctx, call) {
        Some(outcome) => fold(component, ctx, req, outcome, response, on_error),
        None => {
            debug!(component = descriptor.name(), action, method = %req.method, "no matching action");
            Served {
                response: not_found_response(),
                terminal: Terminal::NotFound,
            }
        }
    }
}

fn fold<C: Component>(
    component: &C,
    ctx: &Context,
    req: &ComponentRequest,
    outcome: Outcome<C::Props>,
    mut response: ComponentResponse,
    on_error: &ErrorHandler,
) -> Served {
    let OutcomeParts {
        props,
        error,
        redirect,
        flashes,
        trigger,
        after_settle,
        callback,
        headers,
        status,
        skip,
    } = outcome.into_parts();

    if let Some(status) = status {
        response.status = status;
    }
    for (name, value) in &headers {
        response.set_header(name, value);
    }

    if let Some(err) = error {
        return fail(ctx, req, &ComponentError::Action(err), on_error, Some(response));
    }

    if let Some(target) = redirect {
        response.set_header(HX_REDIRECT, &target);
        response.body.clear();
        return Served {
            response,
            terminal: Terminal::Redirected,
        };
    }

    let mut triggers = TriggerSet::default();
    if let Some(callback) = callback {
        triggers.push(CALLBACK_EVENT, Some(callback.trigger_detail()));
    }
    if let Some(event) = trigger {
        triggers.push(event.name, event.data.map(Value::Object));
    }
    if skip && !flashes.is_empty() {
        triggers.push(FLASH_EVENT, serde_json::to_value(&flashes).ok());
    }
    if let Some(value) = triggers.header_value() {
        response.set_header(HX_TRIGGER, &value);
    }
    if let Some(event) = after_settle {
        response.set_header(HX_TRIGGER_AFTER_SETTLE, &event);
    }

    if skip {
        return Served {
            response,
            terminal: Terminal::Skipped,
        };
    }
    render(component, ctx, req, &props, &flashes, response, on_error)
}

fn render<C: Component>(
    component: &C,
    ctx: &Context,
    req: &ComponentRequest,
    props: &C::Props,
    flashes: &[Flash],
    mut response: ComponentResponse,
    on_error: &ErrorHandler,
) -> Served {
    match component.render(ctx, props) {
        Ok(mut html) => {
            html.push_str(&flash::render_oob(flashes));
            response.set_header(CONTENT_TYPE.as_str(), HTML_CONTENT_TYPE);
            response.body = html.into_bytes();
            Served {
                response,
                terminal: Terminal::Rendered,
            }
        }
        Err(err) => fail(ctx, req, &ComponentError::Render(err), on_error, Some(response)),
    }
}

/// Routes `err` to the error callback. Headers already applied by the
/// outcome survive unless the callback sets the same name.
fn fail(
    ctx: &Context,
    req: &ComponentRequest,
    err: &ComponentError,
    on_error: &ErrorHandler,
    partial: Option<ComponentResponse>,
) -> Served {
    let mut response = on_error(ctx, req, err);
    if let Some(partial) = partial {
        for (name, value) in partial.headers.iter() {
            if !response.headers.contains_key(name) {
                response.headers.insert(name.clone(), value.clone());
            }
        }
    }
    Served {
        response,
        terminal: Terminal::Failed,
    }
}
