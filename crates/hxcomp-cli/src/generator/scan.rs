use super::GenerateError;
use super::model::{ActionSpec, ComponentSpec, FieldKind, FieldSpec, HandlerShape, PropsSpec, Scalar};
use quote::ToTokens;
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::visit::{self, Visit};
use syn::{
    Attribute, Expr, ExprMethodCall, Fields, FnArg, GenericArgument, ImplItem, Item, ItemImpl,
    ItemStruct, Lit, LitStr, PathArguments, Signature, Token, Type,
};

const METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Finds every `impl Component for T` in `source` and resolves its props
/// struct, registered actions and handler signatures.
pub fn scan_source(source: &str, file: &str) -> Result<Vec<ComponentSpec>, GenerateError> {
    let parsed = syn::parse_file(source).map_err(|e| GenerateError::Parse {
        file: file.to_string(),
        message: e.to_string(),
    })?;

    let mut structs: HashMap<String, &ItemStruct> = HashMap::new();
    let mut methods: HashMap<(String, String), &Signature> = HashMap::new();
    let mut component_impls: Vec<(String, &ItemImpl)> = Vec::new();

    for item in &parsed.items {
        match item {
            Item::Struct(s) => {
                structs.insert(s.ident.to_string(), s);
            }
            Item::Impl(imp) => {
                let Some(self_name) = type_name(&imp.self_ty) else {
                    continue;
                };
                match &imp.trait_ {
                    Some((_, path, _))
                        if path.segments.last().is_some_and(|s| s.ident == "Component") =>
                    {
                        component_impls.push((self_name, imp));
                    }
                    Some(_) => {}
                    None => {
                        for member in &imp.items {
                            if let ImplItem::Fn(f) = member {
                                methods.insert((self_name.clone(), f.sig.ident.to_string()), &f.sig);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let mut out = Vec::new();
    for (name, imp) in component_impls {
        let props_ty = imp
            .items
            .iter()
            .find_map(|member| match member {
                ImplItem::Type(t) if t.ident == "Props" => Some(&t.ty),
                _ => None,
            })
            .ok_or_else(|| GenerateError::MissingProps {
                component: name.clone(),
            })?;
        let props_name = type_name(props_ty).ok_or_else(|| GenerateError::MissingProps {
            component: name.clone(),
        })?;
        let props_struct = structs
            .get(&props_name)
            .ok_or_else(|| GenerateError::PropsNotFound {
                component: name.clone(),
                props: props_name.clone(),
                file: file.to_string(),
            })?;
        let props = props_spec(props_struct)?;

        let mut visitor = ActionVisitor::default();
        for member in &imp.items {
            if let ImplItem::Fn(f) = member {
                if f.sig.ident == "register" {
                    visitor.visit_block(&f.block);
                }
            }
        }
        if let Some(reason) = visitor.errors.into_iter().next() {
            return Err(GenerateError::UnsupportedAction {
                component: name,
                reason,
            });
        }

        let mut actions: Vec<ActionSpec> = Vec::new();
        for found in visitor.actions {
            if actions.iter().any(|a| a.name == found.name) {
                return Err(GenerateError::DuplicateAction {
                    component: name,
                    action: found.name,
                });
            }
            let sig = methods
                .get(&(name.clone(), found.handler.clone()))
                .ok_or_else(|| GenerateError::HandlerNotFound {
                    component: name.clone(),
                    handler: found.handler.clone(),
                })?;
            let shape = handler_shape(sig).map_err(|reason| GenerateError::UnsupportedHandler {
                component: name.clone(),
                handler: found.handler.clone(),
                reason,
            })?;
            actions.push(ActionSpec {
                name: found.name,
                method: found.method,
                handler: found.handler,
                shape,
            });
        }

        out.push(ComponentSpec {
            name,
            props,
            actions,
        });
    }
    Ok(out)
}

fn type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(p) if p.qself.is_none() => p.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

fn handler_shape(sig: &Signature) -> Result<HandlerShape, String> {
    if !matches!(sig.inputs.first(), Some(FnArg::Receiver(r)) if r.reference.is_some() && r.mutability.is_none())
    {
        return Err("handler must take &self".to_string());
    }
    let params: Vec<&Type> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(t) => Some(&*t.ty),
            FnArg::Receiver(_) => None,
        })
        .collect();
    match params.as_slice() {
        [_, _] => Ok(HandlerShape::Plain),
        [_, _, Type::Reference(r)] if r.mutability.is_some() => Ok(HandlerShape::WithResponse),
        [_, _, Type::Reference(_)] => Ok(HandlerShape::WithRequest),
        [_, _, other] => Err(format!(
            "third parameter must be &ComponentRequest or &mut ComponentResponse, found `{}`",
            other.to_token_stream()
        )),
        other => Err(format!(
            "expected (ctx, props) with an optional request or response, found {} parameters",
            other.len()
        )),
    }
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    /// `skip_serializing_if` predicate path.
    omit_if: Option<String>,
}

fn serde_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.rename = Some(lit.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        let lit: LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("serialize") {
                            out.rename = Some(lit.value());
                        }
                        Ok(())
                    })?;
                }
            } else if meta.path.is_ident("skip")
                || meta.path.is_ident("skip_serializing")
                || meta.path.is_ident("skip_deserializing")
            {
                out.skip = true;
            } else if meta.path.is_ident("skip_serializing_if") {
                let lit: LitStr = meta.value()?.parse()?;
                out.omit_if = Some(lit.value());
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rule = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                rule = Some(lit.value());
            } else {
                skip_meta_value(&meta)?;
            }
            Ok(())
        })?;
    }
    Ok(rule)
}

fn skip_meta_value(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}

/// Applies a serde `rename_all` rule to a snake_case field name.
fn rename_field(name: &str, rule: &str) -> Option<String> {
    let words: Vec<&str> = name.split('_').filter(|w| !w.is_empty()).collect();
    let capitalize = |w: &str| {
        let mut chars = w.chars();
        chars
            .next()
            .map(|c| c.to_uppercase().chain(chars).collect::<String>())
            .unwrap_or_default()
    };
    Some(match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "snake_case" => name.to_string(),
        "SCREAMING_SNAKE_CASE" => name.to_uppercase(),
        "kebab-case" => name.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => name.replace('_', "-").to_uppercase(),
        "PascalCase" => words.iter().map(|w| capitalize(w)).collect(),
        "camelCase" => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.to_string() } else { capitalize(w) })
            .collect(),
        _ => return None,
    })
}

fn props_spec(item: &ItemStruct) -> Result<PropsSpec, GenerateError> {
    let props = item.ident.to_string();
    let attr_err = |field: &str, e: syn::Error| GenerateError::Attribute {
        props: props.clone(),
        field: field.to_string(),
        message: e.to_string(),
    };
    let rename_all = serde_rename_all(&item.attrs).map_err(|e| attr_err("", e))?;
    let Fields::Named(named) = &item.fields else {
        return Err(GenerateError::UnsupportedProps {
            props: props.clone(),
            reason: "props must be a struct with named fields".to_string(),
        });
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let plain = ident.unraw().to_string();
        let attrs = serde_field_attrs(&field.attrs).map_err(|e| attr_err(&plain, e))?;
        if attrs.skip {
            continue;
        }
        let kind = classify(&field.ty).ok_or_else(|| GenerateError::UnsupportedField {
            props: props.clone(),
            field: plain.clone(),
            ty: field.ty.to_token_stream().to_string(),
        })?;
        let key = match (attrs.rename, &rename_all) {
            (Some(key), _) => key,
            (None, Some(rule)) => rename_field(&plain, rule).ok_or_else(|| {
                GenerateError::UnsupportedProps {
                    props: props.clone(),
                    reason: format!("unknown rename_all rule {rule:?}"),
                }
            })?,
            (None, None) => plain.clone(),
        };
        if let Some(predicate) = &attrs.omit_if {
            check_zero_predicate(predicate, &kind).map_err(|message| GenerateError::Attribute {
                props: props.clone(),
                field: plain.clone(),
                message,
            })?;
        }
        fields.push(FieldSpec {
            ident: ident.to_string(),
            key,
            kind,
            omit_empty: attrs.omit_if.is_some(),
        });
    }
    Ok(PropsSpec {
        name: props,
        fields,
    })
}

/// Generated codecs omit a key when the field holds its zero value, so a
/// `skip_serializing_if` predicate is only accepted when it tests exactly
/// that. The last path segment decides:
///
/// - `is_zero`: any field except `OffsetDateTime` (`hxcomp_web::codec::is_zero`)
/// - `is_none`: `Option<_>`
/// - `is_empty`: `String`
/// - `not`: `bool` (`std::ops::Not::not`)
/// - `is_epoch`: `OffsetDateTime` (`hxcomp_web::codec::is_epoch`)
fn check_zero_predicate(predicate: &str, kind: &FieldKind) -> Result<(), String> {
    let name = predicate.rsplit("::").next().unwrap_or(predicate).trim();
    let fits = match (kind, name) {
        (FieldKind::Required(Scalar::Timestamp), "is_epoch") => true,
        (FieldKind::Required(Scalar::Timestamp), _) => false,
        (_, "is_zero") => true,
        (FieldKind::Optional(_), "is_none") => true,
        (FieldKind::Required(Scalar::String), "is_empty") => true,
        (FieldKind::Required(Scalar::Bool), "not") => true,
        _ => false,
    };
    if fits {
        return Ok(());
    }
    let expected = match kind {
        FieldKind::Optional(_) => "Option::is_none",
        FieldKind::Required(Scalar::Bool) => "std::ops::Not::not",
        FieldKind::Required(Scalar::String) => "String::is_empty",
        FieldKind::Required(Scalar::Timestamp) => "hxcomp_web::codec::is_epoch",
        FieldKind::Required(_) => "hxcomp_web::codec::is_zero",
    };
    Err(format!(
        "skip_serializing_if = {predicate:?} is not a zero-value test; use {expected:?}"
    ))
}

fn classify(ty: &Type) -> Option<FieldKind> {
    let Type::Path(p) = ty else {
        return None;
    };
    let last = p.path.segments.last()?;
    if last.ident == "Option" {
        let PathArguments::AngleBracketed(args) = &last.arguments else {
            return None;
        };
        let inner = args.args.iter().find_map(|a| match a {
            GenericArgument::Type(t) => Some(t),
            _ => None,
        })?;
        return scalar(inner).map(FieldKind::Optional);
    }
    scalar(ty).map(FieldKind::Required)
}

fn scalar(ty: &Type) -> Option<Scalar> {
    let Type::Path(p) = ty else {
        return None;
    };
    if p.qself.is_some() {
        return None;
    }
    let last = p.path.segments.last()?;
    if !last.arguments.is_none() {
        return None;
    }
    let name = last.ident.to_string();
    Some(match name.as_str() {
        "bool" => Scalar::Bool,
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            Scalar::Int(name)
        }
        "f32" => Scalar::F32,
        "f64" => Scalar::F64,
        "String" => Scalar::String,
        "OffsetDateTime" => Scalar::Timestamp,
        "Callback" => Scalar::Callback,
        _ => return None,
    })
}

struct FoundAction {
    name: String,
    method: String,
    handler: String,
}

#[derive(Default)]
struct ActionVisitor {
    actions: Vec<FoundAction>,
    errors: Vec<String>,
}

impl ActionVisitor {
    fn action_call(&mut self, call: &ExprMethodCall) -> Option<FoundAction> {
        let mut args = call.args.iter();
        let (Some(name), Some(handler), None) = (args.next(), args.next(), args.next()) else {
            self.errors
                .push("`action` takes a name and a handler".to_string());
            return None;
        };
        let Expr::Lit(lit) = name else {
            self.errors
                .push("action names must be string literals".to_string());
            return None;
        };
        let Lit::Str(name) = &lit.lit else {
            self.errors
                .push("action names must be string literals".to_string());
            return None;
        };
        let Expr::Path(handler) = handler else {
            self.errors.push(format!(
                "handler for action {:?} must be a method path like Self::{}",
                name.value(),
                name.value()
            ));
            return None;
        };
        let handler = handler.path.segments.last()?.ident.to_string();
        Some(FoundAction {
            name: name.value(),
            method: "POST".to_string(),
            handler,
        })
    }

    fn method_arg(&mut self, call: &ExprMethodCall) -> Option<String> {
        let method = match call.args.first() {
            Some(Expr::Path(p)) if call.args.len() == 1 => {
                p.path.segments.last().map(|s| s.ident.to_string())
            }
            _ => None,
        };
        match method {
            Some(m) if METHODS.contains(&m.as_str()) => Some(m),
            other => {
                self.errors.push(format!(
                    "unsupported action method {}",
                    other.unwrap_or_else(|| call.args.to_token_stream().to_string())
                ));
                None
            }
        }
    }
}

impl<'ast> Visit<'ast> for ActionVisitor {
    fn visit_expr_method_call(&mut self, call: &'ast ExprMethodCall) {
        if call.method == "method" {
            if let Expr::MethodCall(inner) = &*call.receiver {
                if inner.method == "action" {
                    if let (Some(mut found), Some(method)) =
                        (self.action_call(inner), self.method_arg(call))
                    {
                        found.method = method;
                        self.actions.push(found);
                    }
                    return;
                }
            }
        }
        if call.method == "action" {
            if let Some(found) = self.action_call(call) {
                self.actions.push(found);
            }
            return;
        }
        visit::visit_expr_method_call(self, call);
    }
}
