use crate::component::Component;
use crate::dispatch::{ActionRoute, ActionRouter, Invocation};
use crate::outcome::Outcome;
use crate::request::{ComponentRequest, ComponentResponse, Context};
use http::Method;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Marker types selecting the handler signature in [`IntoHandler`].
pub mod shape {
    /// `fn(&self, &Context, P) -> Outcome<P>`
    pub struct Plain;
    /// `fn(&self, &Context, P, &ComponentRequest) -> Outcome<P>`
    pub struct WithRequest;
    /// `fn(&self, &Context, P, &mut ComponentResponse) -> Outcome<P>`
    pub struct WithResponse;
}

type PlainFn<C> =
    dyn Fn(&C, &Context, <C as Component>::Props) -> Outcome<<C as Component>::Props> + Send + Sync;
type RequestFn<C> = dyn Fn(&C, &Context, <C as Component>::Props, &ComponentRequest) -> Outcome<<C as Component>::Props>
    + Send
    + Sync;
type ResponseFn<C> = dyn Fn(
        &C,
        &Context,
        <C as Component>::Props,
        &mut ComponentResponse,
    ) -> Outcome<<C as Component>::Props>
    + Send
    + Sync;

pub enum Handler<C: Component> {
    Plain(Box<PlainFn<C>>),
    WithRequest(Box<RequestFn<C>>),
    WithResponse(Box<ResponseFn<C>>),
}

impl<C: Component> Handler<C> {
    pub fn call(
        &self,
        component: &C,
        ctx: &Context,
        props: C::Props,
        request: &ComponentRequest,
        response: &mut ComponentResponse,
    ) -> Outcome<C::Props> {
        match self {
            Self::Plain(f) => f(component, ctx, props),
            Self::WithRequest(f) => f(component, ctx, props, request),
            Self::WithResponse(f) => f(component, ctx, props, response),
        }
    }
}

pub trait IntoHandler<C: Component, S> {
    fn into_handler(self) -> Handler<C>;
}

impl<C, F> IntoHandler<C, shape::Plain> for F
where
    C: Component,
    F: Fn(&C, &Context, C::Props) -> Outcome<C::Props> + Send + Sync + 'static,
{
    fn into_handler(self) -> Handler<C> {
        Handler::Plain(Box::new(self))
    }
}

impl<C, F> IntoHandler<C, shape::WithRequest> for F
where
    C: Component,
    F: Fn(&C, &Context, C::Props, &ComponentRequest) -> Outcome<C::Props> + Send + Sync + 'static,
{
    fn into_handler(self) -> Handler<C> {
        Handler::WithRequest(Box::new(self))
    }
}

impl<C, F> IntoHandler<C, shape::WithResponse> for F
where
    C: Component,
    F: Fn(&C, &Context, C::Props, &mut ComponentResponse) -> Outcome<C::Props>
        + Send
        + Sync
        + 'static,
{
    fn into_handler(self) -> Handler<C> {
        Handler::WithResponse(Box::new(self))
    }
}

pub struct ActionDef<C: Component> {
    pub name: String,
    pub method: Method,
    pub handler: Handler<C>,
}

/// Runtime action table built from `Component::register`.
pub struct ActionTable<C: Component> {
    actions: HashMap<String, ActionDef<C>>,
    duplicates: Vec<String>,
}

impl<C: Component> Default for ActionTable<C> {
    fn default() -> Self {
        Self {
            actions: HashMap::new(),
            duplicates: Vec::new(),
        }
    }
}

impl<C: Component> ActionTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table populated by the component's `register` hook.
    pub fn collect() -> Self {
        let mut table = Self::new();
        C::register(&mut table);
        table
    }

    /// Registers a POST action. Chain `.method(..)` to change the verb.
    pub fn action<S, H>(&mut self, name: &str, handler: H) -> MethodOverride<'_, C>
    where
        H: IntoHandler<C, S>,
    {
        let def = ActionDef {
            name: name.to_string(),
            method: Method::POST,
            handler: handler.into_handler(),
        };
        let slot = match self.actions.entry(name.to_string()) {
            Entry::Occupied(mut e) => {
                self.duplicates.push(name.to_string());
                e.insert(def);
                e.into_mut()
            }
            Entry::Vacant(e) => e.insert(def),
        };
        MethodOverride { def: slot }
    }

    pub fn get(&self, name: &str) -> Option<&ActionDef<C>> {
        self.actions.get(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

pub struct MethodOverride<'a, C: Component> {
    def: &'a mut ActionDef<C>,
}

impl<C: Component> MethodOverride<'_, C> {
    pub fn method(self, method: Method) {
        self.def.method = method;
    }
}

impl<C: Component> ActionRouter<C> for ActionTable<C> {
    fn dispatch(
        &self,
        component: &C,
        ctx: &Context,
        call: Invocation<'_, C::Props>,
    ) -> Option<Outcome<C::Props>> {
        let def = self.actions.get(call.action)?;
        if def.method != *call.method {
            return None;
        }
        Some(
            def.handler
                .call(component, ctx, call.props, call.request, call.response),
        )
    }

    fn routes(&self) -> Vec<ActionRoute> {
        let mut routes: Vec<ActionRoute> = self
            .actions
            .values()
            .map(|def| ActionRoute::new(def.method.clone(), &def.name))
            .collect();
        routes.sort_by(|a, b| a.name.cmp(&b.name));
        routes
    }

    fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}
