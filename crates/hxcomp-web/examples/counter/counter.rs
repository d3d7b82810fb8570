use hxcomp_web::flash;
use hxcomp_web::http::Method;
use hxcomp_web::{
    ActionTable, Component, ComponentDescriptor, ComponentRequest, ComponentResponse, Context,
    Outcome, Registry,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CounterProps {
    #[serde(rename = "n")]
    pub count: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Clicks across every visitor, filled in by `hydrate`.
    #[serde(skip)]
    pub clicks: u64,
}

#[derive(Clone)]
pub struct Counter {
    descriptor: ComponentDescriptor,
    clicks: Arc<AtomicU64>,
}

impl Counter {
    pub fn new(registry: &Registry) -> Self {
        Self {
            descriptor: registry.describe("counter"),
            clicks: Arc::new(AtomicU64::new(0)),
        }
    }

    fn increment(&self, _ctx: &Context, mut props: CounterProps) -> Outcome<CounterProps> {
        props.count += 1;
        props.clicks = self.clicks.fetch_add(1, Ordering::Relaxed) + 1;
        Outcome::ok(props)
    }

    fn decrement(&self, _ctx: &Context, mut props: CounterProps) -> Outcome<CounterProps> {
        if props.count == 0 {
            return Outcome::ok(props).flash(flash::WARNING, "Already at zero");
        }
        props.count -= 1;
        props.clicks = self.clicks.fetch_add(1, Ordering::Relaxed) + 1;
        Outcome::ok(props)
    }

    fn reset(
        &self,
        _ctx: &Context,
        mut props: CounterProps,
        req: &ComponentRequest,
    ) -> Outcome<CounterProps> {
        let to = req.form_value("to").unwrap_or("0").trim();
        match to.parse::<i64>() {
            Ok(value) => {
                props.count = value;
                props.label = req.form_value("label").unwrap_or_default().to_string();
                Outcome::ok(props)
                    .flash(flash::SUCCESS, format!("Counter reset to {value}"))
                    .trigger("counter:reset")
            }
            Err(_) => Outcome::ok(props).flash(flash::ERROR, format!("{to:?} is not a number")),
        }
    }

    fn export(
        &self,
        _ctx: &Context,
        props: CounterProps,
        res: &mut ComponentResponse,
    ) -> Outcome<CounterProps> {
        res.set_header("content-type", "text/csv; charset=utf-8");
        res.set_header("content-disposition", r#"attachment; filename="counter.csv""#);
        res.write_str("label,count\n");
        res.write_str(&format!("{},{}\n", props.label, props.count));
        Outcome::skip()
    }
}

impl Component for Counter {
    type Props = CounterProps;

    fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }

    fn register(actions: &mut ActionTable<Self>) {
        actions.action("increment", Self::increment);
        actions.action("decrement", Self::decrement);
        actions.action("reset", Self::reset).method(Method::PUT);
        actions.action("export", Self::export).method(Method::GET);
    }

    fn hydrate(&self, _ctx: &Context, props: &mut CounterProps) -> anyhow::Result<()> {
        props.clicks = self.clicks.load(Ordering::Relaxed);
        Ok(())
    }

    fn render(&self, _ctx: &Context, props: &CounterProps) -> anyhow::Result<String> {
        let target = "#counter";
        let dec = self.decrement_action(props)?.target(target);
        let inc = self.increment_action(props)?.target(target);
        let reset = self.reset_action(props)?.target(target);
        let export = self.export_action(props)?;

        let label = html_escape::encode_text(if props.label.is_empty() {
            "Count"
        } else {
            &props.label
        });

        let mut html = String::new();
        writeln!(html, r#"<div id="counter" class="counter">"#)?;
        writeln!(html, r#"  <p>{label}: <strong>{}</strong></p>"#, props.count)?;
        writeln!(html, r#"  <button{dec}>-</button>"#)?;
        writeln!(html, r#"  <button{inc}>+</button>"#)?;
        writeln!(html, r#"  <form{reset}>"#)?;
        writeln!(html, r#"    <input name="to" type="number" value="0">"#)?;
        writeln!(html, r#"    <input name="label" placeholder="label">"#)?;
        writeln!(html, r#"    <button type="submit">Reset</button>"#)?;
        writeln!(html, r#"  </form>"#)?;
        writeln!(html, r#"  <a href="{}" download>Export CSV</a>"#, html_escape::encode_double_quoted_attribute(&export.url()))?;
        writeln!(html, r#"  <small>{} clicks so far</small>"#, props.clicks)?;
        html.push_str("</div>");
        Ok(html)
    }
}

include!("counter_hx.rs");
