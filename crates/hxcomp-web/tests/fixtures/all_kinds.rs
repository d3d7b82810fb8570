//! Props carrying every field type the generator supports, each as a plain
//! field, an `Option`, and with and without omit-empty.
//!
//! `all_kinds_hx.rs` is produced by `hxcomp generate` from this file.

use hxcomp_web::{ActionTable, Callback, Component, ComponentDescriptor, Context, Outcome};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenProps {
    pub flag: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub flag_omit: bool,
    pub maybe_flag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maybe_flag_omit: Option<bool>,

    #[serde(rename = "n")]
    pub count: i64,
    #[serde(skip_serializing_if = "hxcomp_web::codec::is_zero")]
    pub small: u8,
    pub maybe_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maybe_big: Option<u64>,

    pub ratio: f32,
    #[serde(skip_serializing_if = "hxcomp_web::codec::is_zero")]
    pub ratio_omit: f32,
    pub maybe_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maybe_ratio_omit: Option<f32>,

    pub score: f64,
    #[serde(skip_serializing_if = "hxcomp_web::codec::is_zero")]
    pub score_omit: f64,
    pub maybe_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maybe_score_omit: Option<f64>,

    pub title: String,
    #[serde(rename = "nt", skip_serializing_if = "String::is_empty")]
    pub note: String,
    pub maybe_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maybe_note: Option<String>,

    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339", skip_serializing_if = "hxcomp_web::codec::is_epoch")]
    pub at_omit: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub maybe_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub maybe_at_omit: Option<OffsetDateTime>,

    pub on_done: Callback,
    #[serde(skip_serializing_if = "Callback::is_zero")]
    pub on_done_omit: Callback,
    pub maybe_cb: Option<Callback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maybe_cb_omit: Option<Callback>,

    /// Server-side only.
    #[serde(skip)]
    pub renders: u32,
}

impl Default for KitchenProps {
    fn default() -> Self {
        Self {
            flag: false,
            flag_omit: false,
            maybe_flag: None,
            maybe_flag_omit: None,
            count: 0,
            small: 0,
            maybe_count: None,
            maybe_big: None,
            ratio: 0.0,
            ratio_omit: 0.0,
            maybe_ratio: None,
            maybe_ratio_omit: None,
            score: 0.0,
            score_omit: 0.0,
            maybe_score: None,
            maybe_score_omit: None,
            title: String::new(),
            note: String::new(),
            maybe_title: None,
            maybe_note: None,
            at: OffsetDateTime::UNIX_EPOCH,
            at_omit: OffsetDateTime::UNIX_EPOCH,
            maybe_at: None,
            maybe_at_omit: None,
            on_done: Callback::default(),
            on_done_omit: Callback::default(),
            maybe_cb: None,
            maybe_cb_omit: None,
            renders: 0,
        }
    }
}

pub struct Kitchen {
    descriptor: ComponentDescriptor,
}

impl Kitchen {
    pub fn new(descriptor: ComponentDescriptor) -> Self {
        Self { descriptor }
    }

    fn toggle(&self, _ctx: &Context, mut props: KitchenProps) -> Outcome<KitchenProps> {
        props.flag = !props.flag;
        Outcome::ok(props)
    }
}

impl Component for Kitchen {
    type Props = KitchenProps;

    fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    fn register(actions: &mut ActionTable<Self>) {
        actions.action("toggle", Self::toggle);
    }

    fn render(&self, _ctx: &Context, props: &KitchenProps) -> anyhow::Result<String> {
        let toggle = self.toggle_action(props)?;
        Ok(format!(
            "<div><button{toggle}>flag={}</button> n={} title={}</div>",
            props.flag, props.count, props.title
        ))
    }
}

include!("all_kinds_hx.rs");
