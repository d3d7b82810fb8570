/// Field types the generated codec knows how to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Bool,
    /// Any fixed-width integer, by its Rust name (`i32`, `u64`, ...).
    Int(String),
    F32,
    F64,
    String,
    Timestamp,
    Callback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Required(Scalar),
    Optional(Scalar),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name as written, including any `r#` prefix.
    pub ident: String,
    /// Map key in the token.
    pub key: String,
    pub kind: FieldKind,
    pub omit_empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropsSpec {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerShape {
    Plain,
    WithRequest,
    WithResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub name: String,
    /// Upper-case HTTP method.
    pub method: String,
    pub handler: String,
    pub shape: HandlerShape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: String,
    pub props: PropsSpec,
    pub actions: Vec<ActionSpec>,
}

impl ComponentSpec {
    pub fn routes_name(&self) -> String {
        format!("{}Routes", self.name)
    }
}
