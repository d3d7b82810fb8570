use crate::component::{Component, ComponentDescriptor};
use crate::config::RegistryConfig;
use crate::dispatch::{
    ActionRouter, Endpoint, ErrorHandler, Mounted, Served, Terminal, default_error_response,
    not_found_response,
};
use crate::error::{ComponentError, RegistryError};
use crate::handler::ActionTable;
use crate::request::{ComponentRequest, ComponentResponse, Context, is_htmx};
use http::StatusCode;
use hxcomp_core::{RouteIdentity, TokenCodec};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

pub const FORBIDDEN_BODY: &str = "Forbidden: HTMX request required";

/// Owns the token key and every mounted component, and serves requests
/// under the base path.
pub struct Registry {
    base_path: String,
    require_htmx_header: bool,
    max_body_bytes: usize,
    codec: Arc<TokenCodec>,
    endpoints: RwLock<HashMap<String, Arc<dyn Endpoint>>>,
    on_error: ErrorHandler,
}

impl Registry {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let secret = match config.secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => {
                warn!("no component secret configured; using a random key, tokens will not survive a restart");
                TokenCodec::generate_secret()
            }
        };
        Ok(Self {
            base_path: config.normalized_base_path(),
            require_htmx_header: config.require_htmx_header,
            max_body_bytes: config.max_body_bytes,
            codec: Arc::new(TokenCodec::new(secret.as_bytes())?),
            endpoints: RwLock::new(HashMap::new()),
            on_error: Arc::new(default_error_response),
        })
    }

    pub fn with_secret(secret: &str) -> Result<Self, RegistryError> {
        Self::new(&RegistryConfig::minimal(secret))
    }

    /// Replaces the default error policy.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Context, &ComponentRequest, &ComponentError) -> ComponentResponse
            + Send
            + Sync
            + 'static,
    {
        self.on_error = Arc::new(handler);
        self
    }

    /// Normalized mount point; empty when mounted at the root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// Descriptor whose route prefix is derived from `name` and the
    /// caller's source location.
    #[track_caller]
    pub fn describe(&self, name: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(RouteIdentity::here(&self.base_path, name), self.codec.clone())
    }

    /// Descriptor for an explicit construction site, for components built
    /// in loops or factories.
    pub fn describe_at(&self, name: &str, site: &str) -> ComponentDescriptor {
        ComponentDescriptor::new(
            RouteIdentity::with_site(&self.base_path, name, site),
            self.codec.clone(),
        )
    }

    /// Mounts a component using the actions from its `register` hook.
    pub fn add<C: Component>(&self, component: C) -> Result<(), RegistryError> {
        self.add_routed(component, ActionTable::<C>::collect())
    }

    /// Mounts a component with an explicit router, normally the
    /// `<Type>Routes` emitted by `hxcomp generate`.
    pub fn add_routed<C, R>(&self, component: C, router: R) -> Result<(), RegistryError>
    where
        C: Component,
        R: ActionRouter<C>,
    {
        let descriptor = component.descriptor();
        let name = descriptor.name().to_string();
        let prefix = descriptor.prefix().to_string();
        let sensitive = descriptor.is_sensitive();
        if !Arc::ptr_eq(descriptor.codec(), &self.codec) {
            return Err(RegistryError::ForeignDescriptor(name));
        }
        if let Some(action) = router.duplicates().first() {
            return Err(RegistryError::DuplicateAction {
                component: name,
                action: action.clone(),
            });
        }
        let routes = router.routes();

        let mut endpoints = self.endpoints.write().map_err(|_| RegistryError::Poisoned)?;
        if endpoints.contains_key(&prefix) {
            return Err(RegistryError::PrefixCollision { prefix, name });
        }
        endpoints.insert(prefix.clone(), Arc::new(Mounted { component, router }));
        info!(
            component = %name,
            prefix = %prefix,
            actions = routes.len(),
            sensitive,
            "registered component"
        );
        Ok(())
    }

    pub fn prefixes(&self) -> Vec<String> {
        let mut out: Vec<String> = match self.endpoints.read() {
            Ok(endpoints) => endpoints.keys().cloned().collect(),
            Err(_) => {
                error!("component table lock poisoned");
                Vec::new()
            }
        };
        out.sort();
        out
    }

    /// `(prefix, "METHOD action")` pairs for every mounted component.
    pub fn routes(&self) -> Vec<(String, String)> {
        let Ok(endpoints) = self.endpoints.read() else {
            error!("component table lock poisoned");
            return Vec::new();
        };
        let mut out: Vec<(String, String)> = endpoints
            .values()
            .flat_map(|endpoint| {
                let prefix = endpoint.prefix().to_string();
                endpoint
                    .routes()
                    .into_iter()
                    .map(move |r| (prefix.clone(), format!("{} {}", r.method, r.name)))
            })
            .collect();
        out.sort();
        out
    }

    fn lookup(&self, path: &str) -> Option<Arc<dyn Endpoint>> {
        let rest = path.strip_prefix(&self.base_path)?.strip_prefix('/')?;
        let segment = rest.split('/').next()?;
        let prefix = format!("{}/{}", self.base_path, segment);
        match self.endpoints.read() {
            Ok(endpoints) => endpoints.get(&prefix).cloned(),
            Err(_) => {
                error!("component table lock poisoned");
                None
            }
        }
    }

    /// Serves one request and reports how it ended.
    pub fn dispatch(&self, ctx: &Context, req: &ComponentRequest) -> Served {
        if self.require_htmx_header && req.is_mutating() && !is_htmx(req) {
            warn!(method = %req.method, path = %req.path, "rejected non-htmx mutating request");
            return Served {
                response: ComponentResponse::text(StatusCode::FORBIDDEN, FORBIDDEN_BODY),
                terminal: Terminal::Forbidden,
            };
        }
        let Some(endpoint) = self.lookup(&req.path) else {
            return Served {
                response: not_found_response(),
                terminal: Terminal::NotFound,
            };
        };
        let _span = tracing::debug_span!("component", name = endpoint.name()).entered();
        let served = endpoint.serve(ctx, req, &self.on_error);
        tracing::debug!(
            status = served.response.status.as_u16(),
            terminal = ?served.terminal,
            "component request served"
        );
        served
    }

    pub fn handle(&self, ctx: &Context, req: &ComponentRequest) -> ComponentResponse {
        self.dispatch(ctx, req).response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{ActionRoute, Invocation};
    use crate::error::not_found;
    use crate::flash;
    use crate::outcome::Outcome;
    use crate::request::{HX_REDIRECT, HX_TRIGGER, HX_TRIGGER_AFTER_SETTLE};
    use http::Method;
    use hxcomp_core::codec::{self, PropsMap, Value};
    use hxcomp_core::{PropsCodec, TokenError};
    use std::io::Write as _;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default, Clone, PartialEq)]
    struct CounterProps {
        count: i64,
        label: String,
    }

    impl PropsCodec for CounterProps {
        fn encode_props(&self) -> Result<PropsMap, TokenError> {
            let mut map = PropsMap::new();
            map.insert("count".to_owned(), Value::from(self.count));
            if !self.label.is_empty() {
                map.insert("label".to_owned(), Value::from(self.label.clone()));
            }
            Ok(map)
        }

        fn decode_props(&mut self, map: &PropsMap) -> Result<(), TokenError> {
            if let Some(v) = map.get("count").and_then(codec::int::<i64>) {
                self.count = v;
            }
            if let Some(v) = map.get("label").and_then(codec::string) {
                self.label = v;
            }
            Ok(())
        }
    }

    struct Counter {
        descriptor: ComponentDescriptor,
        hydrations: Arc<AtomicUsize>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Counter {
        fn new(registry: &Registry) -> Self {
            Self::with_descriptor(registry.describe("counter"))
        }

        fn with_descriptor(descriptor: ComponentDescriptor) -> Self {
            Self {
                descriptor,
                hydrations: Arc::new(AtomicUsize::new(0)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn note(&self, step: &'static str) {
            self.calls.lock().unwrap().push(step);
        }

        fn increment(&self, _ctx: &Context, mut props: CounterProps) -> Outcome<CounterProps> {
            self.note("increment");
            props.count += 1;
            Outcome::ok(props)
        }

        fn reset(
            &self,
            _ctx: &Context,
            mut props: CounterProps,
            req: &ComponentRequest,
        ) -> Outcome<CounterProps> {
            props.count = req
                .form_value("to")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            Outcome::ok(props)
        }

        fn export(
            &self,
            _ctx: &Context,
            props: CounterProps,
            res: &mut ComponentResponse,
        ) -> Outcome<CounterProps> {
            write!(res, "count\n{}\n", props.count).unwrap();
            Outcome::skip().header("Content-Type", "text/csv")
        }

        fn explode(&self, _ctx: &Context, props: CounterProps) -> Outcome<CounterProps> {
            Outcome::err(props, anyhow::anyhow!("db password=hunter2 rejected"))
                .header("X-Attempt", "1")
        }

        fn vanish(&self, _ctx: &Context, props: CounterProps) -> Outcome<CounterProps> {
            Outcome::err(props, not_found())
        }

        fn save(&self, _ctx: &Context, props: CounterProps) -> Outcome<CounterProps> {
            Outcome::ok(props)
                .flash(flash::SUCCESS, "<b>saved</b>")
                .trigger("counter:saved")
                .trigger_url_sync()
                .status(StatusCode::CREATED)
        }

        fn leave(&self, _ctx: &Context, _props: CounterProps) -> Outcome<CounterProps> {
            Outcome::redirect("/bye")
        }

        fn queue(&self, _ctx: &Context, _props: CounterProps) -> Outcome<CounterProps> {
            Outcome::skip().flash(flash::INFO, "queued")
        }
    }

    impl Component for Counter {
        type Props = CounterProps;

        fn descriptor(&self) -> &ComponentDescriptor {
            &self.descriptor
        }

        fn register(actions: &mut ActionTable<Self>) {
            actions.action("increment", Self::increment);
            actions.action("reset", Self::reset);
            actions.action("export", Self::export).method(Method::GET);
            actions.action("explode", Self::explode);
            actions.action("vanish", Self::vanish);
            actions.action("save", Self::save);
            actions.action("leave", Self::leave);
            actions.action("queue", Self::queue);
        }

        fn hydrate(&self, _ctx: &Context, props: &mut CounterProps) -> anyhow::Result<()> {
            self.hydrations.fetch_add(1, Ordering::SeqCst);
            self.note("hydrate");
            if props.count < 0 {
                return Err(not_found());
            }
            Ok(())
        }

        fn render(&self, _ctx: &Context, props: &CounterProps) -> anyhow::Result<String> {
            self.note("render");
            if props.label == "broken" {
                anyhow::bail!("template missing");
            }
            Ok(format!(r#"<div id="counter">Count: {}</div>"#, props.count))
        }
    }

    struct Fixture {
        registry: Registry,
        prefix: String,
        token5: String,
        hydrations: Arc<AtomicUsize>,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    fn fixture() -> Fixture {
        let registry = Registry::with_secret("test-secret").unwrap();
        let counter = Counter::new(&registry);
        let prefix = counter.descriptor().prefix().to_string();
        let token5 = counter
            .descriptor()
            .encode(&CounterProps {
                count: 5,
                label: String::new(),
            })
            .unwrap();
        let hydrations = counter.hydrations.clone();
        let calls = counter.calls.clone();
        registry.add(counter).unwrap();
        Fixture {
            registry,
            prefix,
            token5,
            hydrations,
            calls,
        }
    }

    fn post(fx: &Fixture, action: &str, token: &str) -> ComponentRequest {
        ComponentRequest::new(Method::POST, &format!("{}/{action}", fx.prefix))
            .htmx()
            .with_form(&[("p", token)])
    }

    fn token_for(fx: &Fixture, props: &CounterProps) -> String {
        fx.registry
            .codec()
            .encode(props, hxcomp_core::SecurityMode::Signed)
            .unwrap()
    }

    #[test]
    fn increment_renders_next_count() {
        let fx = fixture();
        let served = fx.registry.dispatch(&Context::new(), &post(&fx, "increment", &fx.token5));
        assert_eq!(served.terminal, Terminal::Rendered);
        assert_eq!(served.response.status, StatusCode::OK);
        assert!(served.response.body_text().contains("Count: 6"));
        assert_eq!(
            served.response.header("content-type"),
            Some("text/html; charset=utf-8")
        );
        assert!(served.response.header(HX_TRIGGER).is_none());
    }

    #[test]
    fn hydrate_runs_once_before_the_action() {
        let fx = fixture();
        fx.registry.handle(&Context::new(), &post(&fx, "increment", &fx.token5));
        assert_eq!(fx.hydrations.load(Ordering::SeqCst), 1);
        assert_eq!(*fx.calls.lock().unwrap(), vec!["hydrate", "increment", "render"]);

        let get = ComponentRequest::new(Method::GET, &format!("{}/?p={}", fx.prefix, fx.token5));
        let res = fx.registry.handle(&Context::new(), &get);
        assert!(res.body_text().contains("Count: 5"));
        assert_eq!(fx.hydrations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn mutating_request_without_htmx_header_is_forbidden() {
        let fx = fixture();
        let req = ComponentRequest::new(Method::POST, &format!("{}/increment", fx.prefix))
            .with_form(&[("p", fx.token5.as_str())]);
        let served = fx.registry.dispatch(&Context::new(), &req);
        assert_eq!(served.terminal, Terminal::Forbidden);
        assert_eq!(served.response.status, StatusCode::FORBIDDEN);
        assert_eq!(served.response.body_text(), FORBIDDEN_BODY);
        assert_eq!(fx.hydrations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn htmx_guard_can_be_disabled() {
        let cfg = RegistryConfig {
            require_htmx_header: false,
            ..RegistryConfig::minimal("k")
        };
        let registry = Registry::new(&cfg).unwrap();
        let counter = Counter::new(&registry);
        let prefix = counter.descriptor().prefix().to_string();
        registry.add(counter).unwrap();
        let req = ComponentRequest::new(Method::POST, &format!("{prefix}/increment"));
        let res = registry.handle(&Context::new(), &req);
        assert_eq!(res.status, StatusCode::OK);
        assert!(res.body_text().contains("Count: 1"));
    }

    #[test]
    fn missing_token_starts_from_default_props() {
        let fx = fixture();
        let req = ComponentRequest::new(Method::GET, &format!("{}/", fx.prefix));
        let res = fx.registry.handle(&Context::new(), &req);
        assert!(res.body_text().contains("Count: 0"));
    }

    #[test]
    fn tampered_token_is_a_bad_request_and_skips_hydration() {
        let fx = fixture();
        let mut forged = fx.token5.clone();
        forged.pop();
        forged.push(if fx.token5.ends_with('A') { 'B' } else { 'A' });
        let served = fx.registry.dispatch(&Context::new(), &post(&fx, "increment", &forged));
        assert_eq!(served.terminal, Terminal::Failed);
        assert_eq!(served.response.status, StatusCode::BAD_REQUEST);
        assert_eq!(served.response.body_text(), "Bad request");
        assert_eq!(fx.hydrations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_action_and_wrong_method_are_not_found() {
        let fx = fixture();
        let served = fx.registry.dispatch(&Context::new(), &post(&fx, "nope", &fx.token5));
        assert_eq!(served.terminal, Terminal::NotFound);
        assert_eq!(served.response.status, StatusCode::NOT_FOUND);

        let served = fx.registry.dispatch(&Context::new(), &post(&fx, "export", &fx.token5));
        assert_eq!(served.terminal, Terminal::NotFound);

        let get = ComponentRequest::new(Method::GET, "/_c/missing-00000000/");
        assert_eq!(
            fx.registry.dispatch(&Context::new(), &get).terminal,
            Terminal::NotFound
        );
    }

    #[test]
    fn hydration_not_found_maps_to_404() {
        let fx = fixture();
        let token = token_for(
            &fx,
            &CounterProps {
                count: -1,
                label: String::new(),
            },
        );
        let res = fx.registry.handle(&Context::new(), &post(&fx, "increment", &token));
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert!(!fx.calls.lock().unwrap().contains(&"increment"));
    }

    #[test]
    fn action_errors_are_generic_500s_and_keep_outcome_headers() {
        let fx = fixture();
        let res = fx.registry.handle(&Context::new(), &post(&fx, "explode", &fx.token5));
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(res.body_text(), "Internal error");
        assert!(!res.body_text().contains("hunter2"));
        assert_eq!(res.header("x-attempt"), Some("1"));

        let res = fx.registry.handle(&Context::new(), &post(&fx, "vanish", &fx.token5));
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn render_errors_go_to_the_error_callback() {
        let fx = fixture();
        let token = token_for(
            &fx,
            &CounterProps {
                count: 1,
                label: "broken".to_string(),
            },
        );
        let get = ComponentRequest::new(Method::GET, &format!("{}/?p={token}", fx.prefix));
        let served = fx.registry.dispatch(&Context::new(), &get);
        assert_eq!(served.terminal, Terminal::Failed);
        assert_eq!(served.response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn custom_error_handler_sees_classified_errors() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let registry = Registry::with_secret("k")
            .unwrap()
            .with_error_handler(move |_ctx, _req, err| {
                sink.lock().unwrap().push(err.status());
                ComponentResponse::text(StatusCode::IM_A_TEAPOT, "custom")
            });
        let counter = Counter::new(&registry);
        let prefix = counter.descriptor().prefix().to_string();
        registry.add(counter).unwrap();

        let req = ComponentRequest::new(Method::POST, &format!("{prefix}/explode")).htmx();
        let res = registry.handle(&Context::new(), &req);
        assert_eq!(res.status, StatusCode::IM_A_TEAPOT);

        let req = ComponentRequest::new(Method::POST, &format!("{prefix}/nope")).htmx();
        registry.handle(&Context::new(), &req);
        assert_eq!(*seen.lock().unwrap(), vec![StatusCode::INTERNAL_SERVER_ERROR]);
    }

    #[test]
    fn outcome_headers_flashes_and_triggers_are_folded() {
        let fx = fixture();
        let res = fx.registry.handle(&Context::new(), &post(&fx, "save", &fx.token5));
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.header(HX_TRIGGER), Some("counter:saved"));
        assert_eq!(res.header(HX_TRIGGER_AFTER_SETTLE), Some("url:sync"));
        let body = res.body_text();
        assert!(body.starts_with(r#"<div id="counter">Count: 5</div>"#));
        assert!(body.contains(r#"hx-swap-oob="beforeend""#));
        assert!(body.contains("&lt;b&gt;saved&lt;/b&gt;"));
    }

    #[test]
    fn redirect_sets_header_without_body() {
        let fx = fixture();
        let served = fx.registry.dispatch(&Context::new(), &post(&fx, "leave", &fx.token5));
        assert_eq!(served.terminal, Terminal::Redirected);
        assert_eq!(served.response.header(HX_REDIRECT), Some("/bye"));
        assert!(served.response.body.is_empty());
        assert!(!fx.calls.lock().unwrap().contains(&"render"));
    }

    #[test]
    fn skipped_render_keeps_handler_output_and_sends_flashes_as_event() {
        let fx = fixture();
        let req = ComponentRequest::new(
            Method::GET,
            &format!("{}/export?p={}", fx.prefix, fx.token5),
        );
        let served = fx.registry.dispatch(&Context::new(), &req);
        assert_eq!(served.terminal, Terminal::Skipped);
        assert_eq!(served.response.body_text(), "count\n5\n");
        assert_eq!(served.response.header("content-type"), Some("text/csv"));

        let res = fx.registry.handle(&Context::new(), &post(&fx, "queue", &fx.token5));
        assert!(res.body.is_empty());
        let trigger: serde_json::Value =
            serde_json::from_str(res.header(HX_TRIGGER).unwrap()).unwrap();
        assert_eq!(
            trigger,
            serde_json::json!({"hxcmp:flash": [{"level": "info", "message": "queued"}]})
        );
    }

    #[test]
    fn request_shaped_handler_reads_form_fields() {
        let fx = fixture();
        let req = ComponentRequest::new(Method::POST, &format!("{}/reset", fx.prefix))
            .htmx()
            .with_form(&[("p", fx.token5.as_str()), ("to", "42")]);
        let res = fx.registry.handle(&Context::new(), &req);
        assert!(res.body_text().contains("Count: 42"));
    }

    #[test]
    fn same_call_site_twice_is_a_collision() {
        let registry = Registry::with_secret("k").unwrap();
        registry.add(Counter::new(&registry)).unwrap();
        let err = registry.add(Counter::new(&registry)).unwrap_err();
        assert!(matches!(err, RegistryError::PrefixCollision { .. }));
        assert_eq!(registry.prefixes().len(), 1);
    }

    #[test]
    fn distinct_sites_coexist() {
        let registry = Registry::with_secret("k").unwrap();
        let a = Counter::with_descriptor(registry.describe("counter"));
        let b = Counter::with_descriptor(registry.describe("counter"));
        assert_ne!(a.descriptor().prefix(), b.descriptor().prefix());
        registry.add(a).unwrap();
        registry.add(b).unwrap();
        assert_eq!(registry.prefixes().len(), 2);
    }

    #[test]
    fn descriptor_from_another_registry_is_rejected() {
        let ours = Registry::with_secret("k").unwrap();
        let theirs = Registry::with_secret("k").unwrap();
        let err = ours.add(Counter::new(&theirs)).unwrap_err();
        assert!(matches!(err, RegistryError::ForeignDescriptor(_)));
    }

    struct Doubled {
        descriptor: ComponentDescriptor,
    }

    impl Doubled {
        fn one(&self, _ctx: &Context, props: CounterProps) -> Outcome<CounterProps> {
            Outcome::ok(props)
        }
    }

    impl Component for Doubled {
        type Props = CounterProps;

        fn descriptor(&self) -> &ComponentDescriptor {
            &self.descriptor
        }

        fn register(actions: &mut ActionTable<Self>) {
            actions.action("go", Self::one);
            actions.action("go", Self::one).method(Method::PUT);
        }

        fn render(&self, _ctx: &Context, _props: &CounterProps) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    #[test]
    fn duplicate_action_names_are_rejected() {
        let registry = Registry::with_secret("k").unwrap();
        let err = registry
            .add(Doubled {
                descriptor: registry.describe("doubled"),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateAction { ref action, .. } if action == "go"
        ));
    }

    struct CounterRoutes;

    impl ActionRouter<Counter> for CounterRoutes {
        fn dispatch(
            &self,
            component: &Counter,
            ctx: &Context,
            call: Invocation<'_, CounterProps>,
        ) -> Option<Outcome<CounterProps>> {
            let Invocation {
                method,
                action,
                props,
                request: _,
                response: _,
            } = call;
            match (method.as_str(), action) {
                ("POST", "increment") => Some(component.increment(ctx, props)),
                _ => None,
            }
        }

        fn routes(&self) -> Vec<ActionRoute> {
            vec![ActionRoute::new(Method::POST, "increment")]
        }
    }

    #[test]
    fn static_router_matches_runtime_table() {
        let registry = Registry::with_secret("test-secret").unwrap();
        let counter = Counter::new(&registry);
        let prefix = counter.descriptor().prefix().to_string();
        let token = counter
            .descriptor()
            .encode(&CounterProps {
                count: 5,
                label: String::new(),
            })
            .unwrap();
        registry.add_routed(counter, CounterRoutes).unwrap();
        let req = ComponentRequest::new(Method::POST, &format!("{prefix}/increment"))
            .htmx()
            .with_form(&[("p", token.as_str())]);
        let res = registry.handle(&Context::new(), &req);
        assert!(res.body_text().contains("Count: 6"));
        assert_eq!(
            registry.routes(),
            vec![(prefix.clone(), "POST increment".to_string())]
        );

        let req = ComponentRequest::new(Method::POST, &format!("{prefix}/reset")).htmx();
        assert_eq!(registry.handle(&Context::new(), &req).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn poisoned_table_fails_closed() {
        let fx = fixture();
        let registry = Arc::new(fx.registry);
        let writer = registry.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.endpoints.write().unwrap();
            panic!("writer died holding the table");
        })
        .join();

        assert!(registry.prefixes().is_empty());
        assert!(registry.routes().is_empty());
        let get = ComponentRequest::new(Method::GET, &format!("{}/", fx.prefix));
        assert_eq!(registry.dispatch(&Context::new(), &get).terminal, Terminal::NotFound);
        let late = Counter::with_descriptor(registry.describe("late"));
        assert!(matches!(registry.add(late), Err(RegistryError::Poisoned)));
    }

    #[test]
    fn root_base_path_serves_components() {
        let cfg = RegistryConfig {
            base_path: "/".to_string(),
            ..RegistryConfig::minimal("k")
        };
        let registry = Registry::new(&cfg).unwrap();
        assert_eq!(registry.base_path(), "");
        let counter = Counter::new(&registry);
        let prefix = counter.descriptor().prefix().to_string();
        assert!(prefix.starts_with("/counter-"));
        registry.add(counter).unwrap();

        let served = registry.dispatch(&Context::new(), &ComponentRequest::new(Method::GET, &format!("{prefix}/")));
        assert_eq!(served.terminal, Terminal::Rendered);
        assert!(served.response.body_text().contains("Count: 0"));

        let req = ComponentRequest::new(Method::POST, &format!("{prefix}/increment")).htmx();
        assert!(registry.handle(&Context::new(), &req).body_text().contains("Count: 1"));

        let miss = ComponentRequest::new(Method::GET, "/elsewhere");
        assert_eq!(registry.dispatch(&Context::new(), &miss).terminal, Terminal::NotFound);
    }

    #[test]
    fn sensitive_component_round_trips_encrypted_tokens() {
        let registry = Registry::with_secret("k").unwrap();
        let counter = Counter::with_descriptor(registry.describe("vault").sensitive());
        let props = CounterProps {
            count: 9,
            label: "secret-label".to_string(),
        };
        let token = counter.descriptor().encode(&props).unwrap();
        assert!(!token.contains('.'));
        let prefix = counter.descriptor().prefix().to_string();
        registry.add(counter).unwrap();

        let res = registry.handle(&Context::new(), &ComponentRequest::new(Method::GET, &format!("{prefix}/?p={token}")));
        assert!(res.body_text().contains("Count: 9"));

        let signed = registry
            .codec()
            .encode(&props, hxcomp_core::SecurityMode::Signed)
            .unwrap();
        let res = registry.handle(&Context::new(), &ComponentRequest::new(Method::GET, &format!("{prefix}/?p={signed}")));
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }
}
