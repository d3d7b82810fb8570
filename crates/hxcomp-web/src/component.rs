use crate::action::{ActionLink, lazy_placeholder};
use crate::handler::ActionTable;
use crate::request::Context;
use http::Method;
use hxcomp_core::{PropsCodec, RouteIdentity, SecurityMode, TokenCodec, TokenError};
use std::sync::Arc;

/// A server-rendered fragment with token-carried props and named actions.
///
/// ```ignore
/// struct Counter { descriptor: ComponentDescriptor }
///
/// impl Component for Counter {
///     type Props = CounterProps;
///     fn descriptor(&self) -> &ComponentDescriptor { &self.descriptor }
///     fn register(actions: &mut ActionTable<Self>) {
///         actions.action("increment", Self::increment);
///     }
///     fn render(&self, _ctx: &Context, props: &CounterProps) -> anyhow::Result<String> {
///         Ok(format!("<div>{}</div>", props.count))
///     }
/// }
/// ```
pub trait Component: Send + Sync + Sized + 'static {
    type Props: PropsCodec + Default + Send + 'static;

    fn descriptor(&self) -> &ComponentDescriptor;

    /// Declares actions for the runtime table. Ignored when the component
    /// is added with a generated router.
    fn register(_actions: &mut ActionTable<Self>) {}

    /// Fills server-side fields after the token is decoded and before any
    /// action or render. Runs exactly once per request.
    fn hydrate(&self, _ctx: &Context, _props: &mut Self::Props) -> anyhow::Result<()> {
        Ok(())
    }

    fn render(&self, ctx: &Context, props: &Self::Props) -> anyhow::Result<String>;
}

/// Name, route prefix, security mode and key handle of one component
/// instance. Obtained from `Registry::describe`.
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    identity: RouteIdentity,
    mode: SecurityMode,
    codec: Arc<TokenCodec>,
}

impl ComponentDescriptor {
    pub(crate) fn new(identity: RouteIdentity, codec: Arc<TokenCodec>) -> Self {
        Self {
            identity,
            mode: SecurityMode::Signed,
            codec,
        }
    }

    /// Encrypt props instead of only signing them.
    pub fn sensitive(mut self) -> Self {
        self.mode = SecurityMode::Encrypted;
        self
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn prefix(&self) -> &str {
        self.identity.prefix()
    }

    pub fn identity(&self) -> &RouteIdentity {
        &self.identity
    }

    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    pub fn is_sensitive(&self) -> bool {
        self.mode == SecurityMode::Encrypted
    }

    pub(crate) fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    pub fn encode<P: PropsCodec + ?Sized>(&self, props: &P) -> Result<String, TokenError> {
        self.codec.encode(props, self.mode)
    }

    pub fn decode_into<P: PropsCodec + ?Sized>(
        &self,
        token: &str,
        props: &mut P,
    ) -> Result<(), TokenError> {
        self.codec.decode_into(token, self.mode, props)
    }

    /// `<prefix>/` for the render route, `<prefix>/<action>` otherwise.
    pub fn action_path(&self, action: &str) -> String {
        format!("{}/{}", self.prefix(), action)
    }

    pub fn link<P: PropsCodec + ?Sized>(
        &self,
        action: &str,
        method: Method,
        props: &P,
    ) -> Result<ActionLink, TokenError> {
        Ok(ActionLink::new(
            self.action_path(action),
            method,
            self.encode(props)?,
        ))
    }

    /// GET link to the render route.
    pub fn refresh<P: PropsCodec + ?Sized>(&self, props: &P) -> Result<ActionLink, TokenError> {
        self.link("", Method::GET, props)
    }

    pub fn render_url<P: PropsCodec + ?Sized>(&self, props: &P) -> Result<String, TokenError> {
        Ok(self.refresh(props)?.url())
    }

    /// Placeholder that loads the component once it scrolls into view.
    pub fn lazy<P: PropsCodec + ?Sized>(
        &self,
        props: &P,
        placeholder: &str,
    ) -> Result<String, TokenError> {
        Ok(lazy_placeholder(&self.render_url(props)?, "intersect once", placeholder))
    }

    /// Placeholder that loads the component right after page load.
    pub fn deferred<P: PropsCodec + ?Sized>(
        &self,
        props: &P,
        placeholder: &str,
    ) -> Result<String, TokenError> {
        Ok(lazy_placeholder(&self.render_url(props)?, "load", placeholder))
    }
}
