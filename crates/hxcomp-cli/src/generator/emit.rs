use super::model::{ComponentSpec, FieldKind, FieldSpec, HandlerShape, PropsSpec, Scalar};
use std::collections::BTreeSet;
use std::fmt::Write as _;

pub const GENERATED_HEADER: &str = "// Code generated by hxcomp. DO NOT EDIT.";

const WEB: &str = "::hxcomp_web";
const CODEC: &str = "::hxcomp_web::codec";
const RESULT: &str = "::std::result::Result";

/// Renders the companion file for one source unit. Output depends only on
/// `source_name` and `components`, so regenerating is idempotent.
pub fn render_unit(source_name: &str, components: &[ComponentSpec]) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_HEADER);
    out.push('\n');
    let _ = writeln!(out, "// Source: {source_name}");

    let mut seen_props = BTreeSet::new();
    for component in components {
        if seen_props.insert(component.props.name.clone()) {
            out.push('\n');
            render_props_codec(&mut out, &component.props);
        }
        out.push('\n');
        render_router(&mut out, component);
        if !component.actions.is_empty() {
            out.push('\n');
            render_link_builders(&mut out, component);
        }
    }
    out
}

fn render_props_codec(out: &mut String, props: &PropsSpec) {
    let name = &props.name;
    let _ = writeln!(out, "impl {CODEC}::PropsCodec for {name} {{");
    let _ = writeln!(
        out,
        "    fn encode_props(&self) -> {RESULT}<{CODEC}::PropsMap, {WEB}::TokenError> {{"
    );
    if props.fields.is_empty() {
        let _ = writeln!(out, "        Ok({CODEC}::PropsMap::new())");
    } else {
        let _ = writeln!(out, "        let mut map = {CODEC}::PropsMap::new();");
        for field in &props.fields {
            render_encode_field(out, field);
        }
        out.push_str("        Ok(map)\n");
    }
    out.push_str("    }\n\n");

    let map_arg = if props.fields.is_empty() { "_map" } else { "map" };
    let _ = writeln!(
        out,
        "    fn decode_props(&mut self, {map_arg}: &{CODEC}::PropsMap) -> {RESULT}<(), {WEB}::TokenError> {{"
    );
    for field in &props.fields {
        render_decode_field(out, field);
    }
    out.push_str("        Ok(())\n");
    out.push_str("    }\n");
    out.push_str("}\n");
}

fn encode_expr(scalar: &Scalar, place: &str, by_ref: bool) -> String {
    match scalar {
        Scalar::Bool | Scalar::Int(_) | Scalar::F32 | Scalar::F64 => {
            let deref = if by_ref { "*" } else { "" };
            format!("{CODEC}::Value::from({deref}{place})")
        }
        Scalar::String => format!("{CODEC}::Value::from({place}.clone())"),
        Scalar::Timestamp => {
            let borrow = if by_ref { "" } else { "&" };
            format!("{CODEC}::timestamp_value({borrow}{place})?")
        }
        Scalar::Callback => format!("{place}.to_value()"),
    }
}

fn empty_check(scalar: &Scalar, place: &str) -> String {
    match scalar {
        Scalar::Bool => place.to_string(),
        Scalar::Int(_) => format!("{place} != 0"),
        Scalar::F32 | Scalar::F64 => format!("{place} != 0.0"),
        Scalar::String => format!("!{place}.is_empty()"),
        Scalar::Timestamp => format!("!{CODEC}::is_epoch(&{place})"),
        Scalar::Callback => format!("!{place}.is_zero()"),
    }
}

fn reader(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Bool => format!("{CODEC}::boolean"),
        Scalar::Int(ty) => format!("{CODEC}::int::<{ty}>"),
        Scalar::F32 => format!("{CODEC}::float32"),
        Scalar::F64 => format!("{CODEC}::float"),
        Scalar::String => format!("{CODEC}::string"),
        Scalar::Timestamp => format!("{CODEC}::timestamp"),
        Scalar::Callback => format!("{CODEC}::callback"),
    }
}

fn render_encode_field(out: &mut String, field: &FieldSpec) {
    let place = format!("self.{}", field.ident);
    let key = &field.key;
    match (&field.kind, field.omit_empty) {
        (FieldKind::Required(scalar), false) => {
            let _ = writeln!(
                out,
                "        map.insert({key:?}.to_owned(), {});",
                encode_expr(scalar, &place, false)
            );
        }
        (FieldKind::Required(scalar), true) => {
            let _ = writeln!(out, "        if {} {{", empty_check(scalar, &place));
            let _ = writeln!(
                out,
                "            map.insert({key:?}.to_owned(), {});",
                encode_expr(scalar, &place, false)
            );
            out.push_str("        }\n");
        }
        (FieldKind::Optional(scalar), false) => {
            let _ = writeln!(out, "        map.insert(");
            let _ = writeln!(out, "            {key:?}.to_owned(),");
            let _ = writeln!(out, "            match &{place} {{");
            let _ = writeln!(out, "                Some(v) => {},", encode_expr(scalar, "v", true));
            let _ = writeln!(out, "                None => {CODEC}::Value::Null,");
            out.push_str("            },\n");
            out.push_str("        );\n");
        }
        (FieldKind::Optional(scalar), true) => {
            let _ = writeln!(out, "        if let Some(v) = &{place} {{");
            let _ = writeln!(
                out,
                "            map.insert({key:?}.to_owned(), {});",
                encode_expr(scalar, "v", true)
            );
            out.push_str("        }\n");
        }
    }
}

fn render_decode_field(out: &mut String, field: &FieldSpec) {
    let key = &field.key;
    let read = match &field.kind {
        FieldKind::Required(scalar) => reader(scalar),
        FieldKind::Optional(scalar) => format!("|v| {CODEC}::optional(v, {})", reader(scalar)),
    };
    let _ = writeln!(out, "        if let Some(v) = map.get({key:?}).and_then({read}) {{");
    let _ = writeln!(out, "            self.{} = v;", field.ident);
    out.push_str("        }\n");
}

fn method_path(method: &str) -> String {
    format!("{WEB}::http::Method::{method}")
}

fn render_router(out: &mut String, component: &ComponentSpec) {
    let name = &component.name;
    let props = &component.props.name;
    let routes = component.routes_name();

    let _ = writeln!(out, "/// Compiled action routes for [`{name}`].");
    out.push_str("#[derive(Debug, Clone, Copy, Default)]\n");
    let _ = writeln!(out, "pub struct {routes};\n");
    let _ = writeln!(out, "impl {WEB}::ActionRouter<{name}> for {routes} {{");
    out.push_str("    fn dispatch(\n");
    out.push_str("        &self,\n");
    let _ = writeln!(out, "        component: &{name},");
    let _ = writeln!(out, "        ctx: &{WEB}::Context,");
    let _ = writeln!(out, "        call: {WEB}::Invocation<'_, {props}>,");
    let _ = writeln!(out, "    ) -> ::std::option::Option<{WEB}::Outcome<{props}>> {{");

    if component.actions.is_empty() {
        out.push_str("        let _ = (component, ctx, call);\n");
        out.push_str("        None\n");
    } else {
        let uses = |shape| component.actions.iter().any(|a| a.shape == shape);
        let request = if uses(HandlerShape::WithRequest) { "request" } else { "request: _" };
        let response = if uses(HandlerShape::WithResponse) { "response" } else { "response: _" };
        let _ = writeln!(out, "        let {WEB}::Invocation {{");
        out.push_str("            method,\n");
        out.push_str("            action,\n");
        out.push_str("            props,\n");
        let _ = writeln!(out, "            {request},");
        let _ = writeln!(out, "            {response},");
        out.push_str("        } = call;\n");
        out.push_str("        match (method.as_str(), action) {\n");
        for action in &component.actions {
            let extra = match action.shape {
                HandlerShape::Plain => "",
                HandlerShape::WithRequest => ", request",
                HandlerShape::WithResponse => ", response",
            };
            let _ = writeln!(
                out,
                "            ({:?}, {:?}) => Some(component.{}(ctx, props{extra})),",
                action.method, action.name, action.handler
            );
        }
        out.push_str("            _ => None,\n");
        out.push_str("        }\n");
    }
    out.push_str("    }\n\n");

    let _ = writeln!(out, "    fn routes(&self) -> ::std::vec::Vec<{WEB}::ActionRoute> {{");
    if component.actions.is_empty() {
        out.push_str("        ::std::vec::Vec::new()\n");
    } else {
        out.push_str("        ::std::vec![\n");
        for action in &component.actions {
            let _ = writeln!(
                out,
                "            {WEB}::ActionRoute::new({}, {:?}),",
                method_path(&action.method),
                action.name
            );
        }
        out.push_str("        ]\n");
    }
    out.push_str("    }\n");
    out.push_str("}\n");
}

fn builder_name(action: &str) -> String {
    let mut ident: String = action
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    format!("{ident}_action")
}

fn render_link_builders(out: &mut String, component: &ComponentSpec) {
    let props = &component.props.name;
    out.push_str("#[allow(dead_code)]\n");
    let _ = writeln!(out, "impl {} {{", component.name);
    for (i, action) in component.actions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "    /// `{} {}` link carrying `props`.",
            action.method, action.name
        );
        let _ = writeln!(
            out,
            "    pub fn {}(&self, props: &{props}) -> {RESULT}<{WEB}::ActionLink, {WEB}::TokenError> {{",
            builder_name(&action.name)
        );
        let _ = writeln!(
            out,
            "        {WEB}::Component::descriptor(self).link({:?}, {}, props)",
            action.name,
            method_path(&action.method)
        );
        out.push_str("    }\n");
    }
    out.push_str("}\n");
}
