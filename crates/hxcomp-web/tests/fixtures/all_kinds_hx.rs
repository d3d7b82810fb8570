// Code generated by hxcomp. DO NOT EDIT.
// Source: all_kinds.rs

impl ::hxcomp_web::codec::PropsCodec for KitchenProps {
    fn encode_props(&self) -> ::std::result::Result<::hxcomp_web::codec::PropsMap, ::hxcomp_web::TokenError> {
        let mut map = ::hxcomp_web::codec::PropsMap::new();
        map.insert("flag".to_owned(), ::hxcomp_web::codec::Value::from(self.flag));
        if self.flag_omit {
            map.insert("flag_omit".to_owned(), ::hxcomp_web::codec::Value::from(self.flag_omit));
        }
        map.insert(
            "maybe_flag".to_owned(),
            match &self.maybe_flag {
                Some(v) => ::hxcomp_web::codec::Value::from(*v),
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_flag_omit {
            map.insert("maybe_flag_omit".to_owned(), ::hxcomp_web::codec::Value::from(*v));
        }
        map.insert("n".to_owned(), ::hxcomp_web::codec::Value::from(self.count));
        if self.small != 0 {
            map.insert("small".to_owned(), ::hxcomp_web::codec::Value::from(self.small));
        }
        map.insert(
            "maybe_count".to_owned(),
            match &self.maybe_count {
                Some(v) => ::hxcomp_web::codec::Value::from(*v),
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_big {
            map.insert("maybe_big".to_owned(), ::hxcomp_web::codec::Value::from(*v));
        }
        map.insert("ratio".to_owned(), ::hxcomp_web::codec::Value::from(self.ratio));
        if self.ratio_omit != 0.0 {
            map.insert("ratio_omit".to_owned(), ::hxcomp_web::codec::Value::from(self.ratio_omit));
        }
        map.insert(
            "maybe_ratio".to_owned(),
            match &self.maybe_ratio {
                Some(v) => ::hxcomp_web::codec::Value::from(*v),
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_ratio_omit {
            map.insert("maybe_ratio_omit".to_owned(), ::hxcomp_web::codec::Value::from(*v));
        }
        map.insert("score".to_owned(), ::hxcomp_web::codec::Value::from(self.score));
        if self.score_omit != 0.0 {
            map.insert("score_omit".to_owned(), ::hxcomp_web::codec::Value::from(self.score_omit));
        }
        map.insert(
            "maybe_score".to_owned(),
            match &self.maybe_score {
                Some(v) => ::hxcomp_web::codec::Value::from(*v),
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_score_omit {
            map.insert("maybe_score_omit".to_owned(), ::hxcomp_web::codec::Value::from(*v));
        }
        map.insert("title".to_owned(), ::hxcomp_web::codec::Value::from(self.title.clone()));
        if !self.note.is_empty() {
            map.insert("nt".to_owned(), ::hxcomp_web::codec::Value::from(self.note.clone()));
        }
        map.insert(
            "maybe_title".to_owned(),
            match &self.maybe_title {
                Some(v) => ::hxcomp_web::codec::Value::from(v.clone()),
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_note {
            map.insert("maybe_note".to_owned(), ::hxcomp_web::codec::Value::from(v.clone()));
        }
        map.insert("at".to_owned(), ::hxcomp_web::codec::timestamp_value(&self.at)?);
        if !::hxcomp_web::codec::is_epoch(&self.at_omit) {
            map.insert("at_omit".to_owned(), ::hxcomp_web::codec::timestamp_value(&self.at_omit)?);
        }
        map.insert(
            "maybe_at".to_owned(),
            match &self.maybe_at {
                Some(v) => ::hxcomp_web::codec::timestamp_value(v)?,
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_at_omit {
            map.insert("maybe_at_omit".to_owned(), ::hxcomp_web::codec::timestamp_value(v)?);
        }
        map.insert("on_done".to_owned(), self.on_done.to_value());
        if !self.on_done_omit.is_zero() {
            map.insert("on_done_omit".to_owned(), self.on_done_omit.to_value());
        }
        map.insert(
            "maybe_cb".to_owned(),
            match &self.maybe_cb {
                Some(v) => v.to_value(),
                None => ::hxcomp_web::codec::Value::Null,
            },
        );
        if let Some(v) = &self.maybe_cb_omit {
            map.insert("maybe_cb_omit".to_owned(), v.to_value());
        }
        Ok(map)
    }

    fn decode_props(&mut self, map: &::hxcomp_web::codec::PropsMap) -> ::std::result::Result<(), ::hxcomp_web::TokenError> {
        if let Some(v) = map.get("flag").and_then(::hxcomp_web::codec::boolean) {
            self.flag = v;
        }
        if let Some(v) = map.get("flag_omit").and_then(::hxcomp_web::codec::boolean) {
            self.flag_omit = v;
        }
        if let Some(v) = map.get("maybe_flag").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::boolean)) {
            self.maybe_flag = v;
        }
        if let Some(v) = map.get("maybe_flag_omit").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::boolean)) {
            self.maybe_flag_omit = v;
        }
        if let Some(v) = map.get("n").and_then(::hxcomp_web::codec::int::<i64>) {
            self.count = v;
        }
        if let Some(v) = map.get("small").and_then(::hxcomp_web::codec::int::<u8>) {
            self.small = v;
        }
        if let Some(v) = map.get("maybe_count").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::int::<i32>)) {
            self.maybe_count = v;
        }
        if let Some(v) = map.get("maybe_big").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::int::<u64>)) {
            self.maybe_big = v;
        }
        if let Some(v) = map.get("ratio").and_then(::hxcomp_web::codec::float32) {
            self.ratio = v;
        }
        if let Some(v) = map.get("ratio_omit").and_then(::hxcomp_web::codec::float32) {
            self.ratio_omit = v;
        }
        if let Some(v) = map.get("maybe_ratio").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::float32)) {
            self.maybe_ratio = v;
        }
        if let Some(v) = map.get("maybe_ratio_omit").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::float32)) {
            self.maybe_ratio_omit = v;
        }
        if let Some(v) = map.get("score").and_then(::hxcomp_web::codec::float) {
            self.score = v;
        }
        if let Some(v) = map.get("score_omit").and_then(::hxcomp_web::codec::float) {
            self.score_omit = v;
        }
        if let Some(v) = map.get("maybe_score").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::float)) {
            self.maybe_score = v;
        }
        if let Some(v) = map.get("maybe_score_omit").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::float)) {
            self.maybe_score_omit = v;
        }
        if let Some(v) = map.get("title").and_then(::hxcomp_web::codec::string) {
            self.title = v;
        }
        if let Some(v) = map.get("nt").and_then(::hxcomp_web::codec::string) {
            self.note = v;
        }
        if let Some(v) = map.get("maybe_title").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::string)) {
            self.maybe_title = v;
        }
        if let Some(v) = map.get("maybe_note").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::string)) {
            self.maybe_note = v;
        }
        if let Some(v) = map.get("at").and_then(::hxcomp_web::codec::timestamp) {
            self.at = v;
        }
        if let Some(v) = map.get("at_omit").and_then(::hxcomp_web::codec::timestamp) {
            self.at_omit = v;
        }
        if let Some(v) = map.get("maybe_at").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::timestamp)) {
            self.maybe_at = v;
        }
        if let Some(v) = map.get("maybe_at_omit").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::timestamp)) {
            self.maybe_at_omit = v;
        }
        if let Some(v) = map.get("on_done").and_then(::hxcomp_web::codec::callback) {
            self.on_done = v;
        }
        if let Some(v) = map.get("on_done_omit").and_then(::hxcomp_web::codec::callback) {
            self.on_done_omit = v;
        }
        if let Some(v) = map.get("maybe_cb").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::callback)) {
            self.maybe_cb = v;
        }
        if let Some(v) = map.get("maybe_cb_omit").and_then(|v| ::hxcomp_web::codec::optional(v, ::hxcomp_web::codec::callback)) {
            self.maybe_cb_omit = v;
        }
        Ok(())
    }
}

/// Compiled action routes for [`Kitchen`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KitchenRoutes;

impl ::hxcomp_web::ActionRouter<Kitchen> for KitchenRoutes {
    fn dispatch(
        &self,
        component: &Kitchen,
        ctx: &::hxcomp_web::Context,
        call: ::hxcomp_web::Invocation<'_, KitchenProps>,
    ) -> ::std::option::Option<::hxcomp_web::Outcome<KitchenProps>> {
        let ::hxcomp_web::Invocation {
            method,
            action,
            props,
            request: _,
            response: _,
        } = call;
        match (method.as_str(), action) {
            ("POST", "toggle") => Some(component.toggle(ctx, props)),
            _ => None,
        }
    }

    fn routes(&self) -> ::std::vec::Vec<::hxcomp_web::ActionRoute> {
        ::std::vec![
            ::hxcomp_web::ActionRoute::new(::hxcomp_web::http::Method::POST, "toggle"),
        ]
    }
}

#[allow(dead_code)]
impl Kitchen {
    /// `POST toggle` link carrying `props`.
    pub fn toggle_action(&self, props: &KitchenProps) -> ::std::result::Result<::hxcomp_web::ActionLink, ::hxcomp_web::TokenError> {
        ::hxcomp_web::Component::descriptor(self).link("toggle", ::hxcomp_web::http::Method::POST, props)
    }
}
