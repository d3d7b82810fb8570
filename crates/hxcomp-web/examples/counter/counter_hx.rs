// Code generated by hxcomp. DO NOT EDIT.
// Source: counter.rs

impl ::hxcomp_web::codec::PropsCodec for CounterProps {
    fn encode_props(&self) -> ::std::result::Result<::hxcomp_web::codec::PropsMap, ::hxcomp_web::TokenError> {
        let mut map = ::hxcomp_web::codec::PropsMap::new();
        map.insert("n".to_owned(), ::hxcomp_web::codec::Value::from(self.count));
        if !self.label.is_empty() {
            map.insert("label".to_owned(), ::hxcomp_web::codec::Value::from(self.label.clone()));
        }
        Ok(map)
    }

    fn decode_props(&mut self, map: &::hxcomp_web::codec::PropsMap) -> ::std::result::Result<(), ::hxcomp_web::TokenError> {
        if let Some(v) = map.get("n").and_then(::hxcomp_web::codec::int::<i64>) {
            self.count = v;
        }
        if let Some(v) = map.get("label").and_then(::hxcomp_web::codec::string) {
            self.label = v;
        }
        Ok(())
    }
}

/// Compiled action routes for [`Counter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterRoutes;

impl ::hxcomp_web::ActionRouter<Counter> for CounterRoutes {
    fn dispatch(
        &self,
        component: &Counter,
        ctx: &::hxcomp_web::Context,
        call: ::hxcomp_web::Invocation<'_, CounterProps>,
    ) -> ::std::option::Option<::hxcomp_web::Outcome<CounterProps>> {
        let ::hxcomp_web::Invocation {
            method,
            action,
            props,
            request,
            response,
        } = call;
        match (method.as_str(), action) {
            ("POST", "increment") => Some(component.increment(ctx, props)),
            ("POST", "decrement") => Some(component.decrement(ctx, props)),
            ("PUT", "reset") => Some(component.reset(ctx, props, request)),
            ("GET", "export") => Some(component.export(ctx, props, response)),
            _ => None,
        }
    }

    fn routes(&self) -> ::std::vec::Vec<::hxcomp_web::ActionRoute> {
        ::std::vec![
            ::hxcomp_web::ActionRoute::new(::hxcomp_web::http::Method::POST, "increment"),
            ::hxcomp_web::ActionRoute::new(::hxcomp_web::http::Method::POST, "decrement"),
            ::hxcomp_web::ActionRoute::new(::hxcomp_web::http::Method::PUT, "reset"),
            ::hxcomp_web::ActionRoute::new(::hxcomp_web::http::Method::GET, "export"),
        ]
    }
}

#[allow(dead_code)]
impl Counter {
    /// `POST increment` link carrying `props`.
    pub fn increment_action(&self, props: &CounterProps) -> ::std::result::Result<::hxcomp_web::ActionLink, ::hxcomp_web::TokenError> {
        ::hxcomp_web::Component::descriptor(self).link("increment", ::hxcomp_web::http::Method::POST, props)
    }

    /// `POST decrement` link carrying `props`.
    pub fn decrement_action(&self, props: &CounterProps) -> ::std::result::Result<::hxcomp_web::ActionLink, ::hxcomp_web::TokenError> {
        ::hxcomp_web::Component::descriptor(self).link("decrement", ::hxcomp_web::http::Method::POST, props)
    }

    /// `PUT reset` link carrying `props`.
    pub fn reset_action(&self, props: &CounterProps) -> ::std::result::Result<::hxcomp_web::ActionLink, ::hxcomp_web::TokenError> {
        ::hxcomp_web::Component::descriptor(self).link("reset", ::hxcomp_web::http::Method::PUT, props)
    }

    /// `GET export` link carrying `props`.
    pub fn export_action(&self, props: &CounterProps) -> ::std::result::Result<::hxcomp_web::ActionLink, ::hxcomp_web::TokenError> {
        ::hxcomp_web::Component::descriptor(self).link("export", ::hxcomp_web::http::Method::GET, props)
    }
}
