//! Typed view of the C declarations handed over by the parser front-end.
//!
//! The tree is deliberately small: it models exactly what the resolver and the
//! rewrite passes need to look at (names, member lists, type references) plus
//! enough declarator structure to print the declaration back as C.

use serde::{Deserialize, Serialize};

/// `struct` or `union`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AggregateKind {
    Struct,
    Union,
}

impl std::fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateKind::Struct => write!(f, "struct"),
            AggregateKind::Union => write!(f, "union"),
        }
    }
}

/// Keyword used when a type is referenced by its tag (`struct foo`, `enum bar`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Struct,
    Union,
    Enum,
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagKind::Struct => write!(f, "struct"),
            TagKind::Union => write!(f, "union"),
            TagKind::Enum => write!(f, "enum"),
        }
    }
}

impl From<AggregateKind> for TagKind {
    fn from(kind: AggregateKind) -> Self {
        match kind {
            AggregateKind::Struct => TagKind::Struct,
            AggregateKind::Union => TagKind::Union,
        }
    }
}

/// A C type as it appears in a declarator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CType {
    /// Builtin or typedef name, e.g. `unsigned int`, `pj_str_t`
    Named(String),
    /// Reference to a struct, union or enum by its tag
    Tagged { kind: TagKind, name: String },
    /// Inline struct/union definition
    Aggregate(Aggregate),
    /// Inline enum definition
    Enum(EnumDef),
    Pointer(Box<CType>),
    Const(Box<CType>),
    /// Array with an optional dimension expression
    Array(Box<CType>, Option<String>),
    Function(FnSig),
}

impl CType {
    pub fn named<S: Into<String>>(name: S) -> Self {
        CType::Named(name.into())
    }

    pub fn tagged<S: Into<String>>(kind: TagKind, name: S) -> Self {
        CType::Tagged {
            kind,
            name: name.into(),
        }
    }

    pub fn pointer(inner: CType) -> Self {
        CType::Pointer(Box::new(inner))
    }

    pub fn constant(inner: CType) -> Self {
        CType::Const(Box::new(inner))
    }

    pub fn array(inner: CType, dim: Option<&str>) -> Self {
        CType::Array(Box::new(inner), dim.map(str::to_string))
    }

    /// Pointer to a function with the given signature
    pub fn fn_pointer(sig: FnSig) -> Self {
        CType::pointer(CType::Function(sig))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, CType::Named(name) if name == "void")
    }

    /// Push every referenced type name into `out`, in traversal order.
    ///
    /// Typedef names and tag references both count; definitions of inline
    /// aggregates are descended into instead.
    pub(crate) fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            CType::Named(name) => out.push(name),
            CType::Tagged { name, .. } => out.push(name),
            CType::Aggregate(aggregate) => aggregate.collect_references(out),
            CType::Enum(_) => {}
            CType::Pointer(inner) | CType::Const(inner) | CType::Array(inner, _) => {
                inner.collect_references(out)
            }
            CType::Function(sig) => sig.collect_references(out),
        }
    }
}

/// Struct or union definition; `fields: None` is a forward declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Aggregate {
    pub keyword: AggregateKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
}

impl Aggregate {
    pub fn new(keyword: AggregateKind, name: Option<&str>, fields: Option<Vec<Field>>) -> Self {
        Self {
            keyword,
            name: name.map(str::to_string),
            fields,
        }
    }

    pub fn is_forward(&self) -> bool {
        self.fields.is_none()
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        for field in self.fields.iter().flatten() {
            field.ty.collect_references(out);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    /// Absent for C11 anonymous members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ty: CType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<String>,
}

impl Field {
    pub fn new<S: Into<String>>(name: S, ty: CType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            bit_width: None,
        }
    }

    pub fn anonymous(ty: CType) -> Self {
        Self {
            name: None,
            ty,
            bit_width: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnumDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<Enumerator>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FnSig {
    pub ret: Box<CType>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub variadic: bool,
}

impl FnSig {
    pub fn new(ret: CType, params: Vec<Param>) -> Self {
        Self {
            ret: Box::new(ret),
            params,
            variadic: false,
        }
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        self.ret.collect_references(out);
        for param in &self.params {
            param.ty.collect_references(out);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Param {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ty: CType,
}

impl Param {
    pub fn new<S: Into<String>>(name: S, ty: CType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn unnamed(ty: CType) -> Self {
        Self { name: None, ty }
    }
}

/// Top-level item of the declaration tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "decl", rename_all = "lowercase")]
pub enum Declaration {
    Aggregate(Aggregate),
    Enum(EnumDef),
    Typedef {
        name: String,
        ty: CType,
    },
    Function {
        name: String,
        sig: FnSig,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        storage: Vec<String>,
    },
    Variable {
        name: String,
        ty: CType,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        storage: Vec<String>,
    },
}

/// Kind of a top-level declaration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Struct,
    Union,
    Enum,
    Typedef,
    Function,
    Variable,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclKind::Struct => write!(f, "struct"),
            DeclKind::Union => write!(f, "union"),
            DeclKind::Enum => write!(f, "enum"),
            DeclKind::Typedef => write!(f, "typedef"),
            DeclKind::Function => write!(f, "function"),
            DeclKind::Variable => write!(f, "variable"),
        }
    }
}

impl Declaration {
    pub fn aggregate(keyword: AggregateKind, name: &str, fields: Option<Vec<Field>>) -> Self {
        Declaration::Aggregate(Aggregate::new(keyword, Some(name), fields))
    }

    pub fn typedef<S: Into<String>>(name: S, ty: CType) -> Self {
        Declaration::Typedef {
            name: name.into(),
            ty,
        }
    }

    pub fn function<S: Into<String>>(name: S, sig: FnSig) -> Self {
        Declaration::Function {
            name: name.into(),
            sig,
            storage: Vec::new(),
        }
    }

    /// Name under which the declaration is indexed.
    ///
    /// Tag definitions use their tag, anonymous ones yield an empty string;
    /// `typedef struct { .. } foo` is named after the typedef.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Aggregate(aggregate) => aggregate.name.as_deref().unwrap_or(""),
            Declaration::Enum(def) => def.name.as_deref().unwrap_or(""),
            Declaration::Typedef { name, .. }
            | Declaration::Function { name, .. }
            | Declaration::Variable { name, .. } => name,
        }
    }

    pub fn kind(&self) -> DeclKind {
        match self {
            Declaration::Aggregate(Aggregate {
                keyword: AggregateKind::Struct,
                ..
            }) => DeclKind::Struct,
            Declaration::Aggregate(Aggregate {
                keyword: AggregateKind::Union,
                ..
            }) => DeclKind::Union,
            Declaration::Enum(_) => DeclKind::Enum,
            Declaration::Typedef { .. } => DeclKind::Typedef,
            Declaration::Function { .. } => DeclKind::Function,
            Declaration::Variable { .. } => DeclKind::Variable,
        }
    }

    /// Member list of a struct/union, looking through a typedef of an inline definition
    pub fn members(&self) -> Option<&[Field]> {
        self.as_aggregate()
            .and_then(|aggregate| aggregate.fields.as_deref())
    }

    pub(crate) fn as_aggregate(&self) -> Option<&Aggregate> {
        match self {
            Declaration::Aggregate(aggregate) => Some(aggregate),
            Declaration::Typedef {
                ty: CType::Aggregate(aggregate),
                ..
            } => Some(aggregate),
            _ => None,
        }
    }

    /// True for `struct foo;` and `typedef struct foo foo;`-like items that carry no layout
    pub fn is_forward_aggregate(&self) -> bool {
        match self {
            Declaration::Aggregate(aggregate) => aggregate.is_forward(),
            Declaration::Typedef { ty, .. } => match ty {
                CType::Tagged {
                    kind: TagKind::Struct | TagKind::Union,
                    ..
                } => true,
                CType::Aggregate(aggregate) => aggregate.is_forward(),
                _ => false,
            },
            _ => false,
        }
    }

    /// Names of all types referenced by this declaration, in traversal order
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        match self {
            Declaration::Aggregate(aggregate) => aggregate.collect_references(&mut out),
            Declaration::Enum(_) => {}
            Declaration::Typedef { ty, .. } | Declaration::Variable { ty, .. } => {
                ty.collect_references(&mut out)
            }
            Declaration::Function { sig, .. } => sig.collect_references(&mut out),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_typedef_and_tag() {
        let tagged = Declaration::aggregate(AggregateKind::Struct, "pj_str_t", None);
        assert_eq!(tagged.name(), "pj_str_t");
        assert_eq!(tagged.kind(), DeclKind::Struct);

        let anonymous = Declaration::Enum(EnumDef {
            name: None,
            variants: Some(vec![Enumerator {
                name: "PJ_TRUE".into(),
                value: Some("1".into()),
            }]),
        });
        assert_eq!(anonymous.name(), "");

        let typedef = Declaration::typedef(
            "pj_sockaddr",
            CType::Aggregate(Aggregate::new(AggregateKind::Union, None, Some(vec![]))),
        );
        assert_eq!(typedef.name(), "pj_sockaddr");
        assert_eq!(typedef.kind(), DeclKind::Typedef);
        assert_eq!(typedef.members().map(<[Field]>::len), Some(0));
    }

    #[test]
    fn test_references_in_traversal_order() {
        let decl = Declaration::function(
            "pjsua_call_make_call",
            FnSig::new(
                CType::named("pj_status_t"),
                vec![
                    Param::new("acc_id", CType::named("pjsua_acc_id")),
                    Param::new(
                        "dst_uri",
                        CType::pointer(CType::constant(CType::named("pj_str_t"))),
                    ),
                    Param::new(
                        "msg",
                        CType::pointer(CType::tagged(TagKind::Struct, "pjsua_msg_data")),
                    ),
                ],
            ),
        );
        assert_eq!(
            decl.references(),
            vec!["pj_status_t", "pjsua_acc_id", "pj_str_t", "pjsua_msg_data"]
        );
    }

    #[test]
    fn test_forward_detection() {
        assert!(Declaration::aggregate(AggregateKind::Struct, "pj_pool_t", None).is_forward_aggregate());
        assert!(Declaration::typedef(
            "pj_pool_t",
            CType::tagged(TagKind::Struct, "pj_pool_t")
        )
        .is_forward_aggregate());
        assert!(!Declaration::typedef("pj_bool_t", CType::named("int")).is_forward_aggregate());
        assert!(!Declaration::aggregate(AggregateKind::Struct, "pj_str_t", Some(vec![]))
            .is_forward_aggregate());
    }

    #[test]
    fn test_declaration_json_shape() {
        let line = r#"{"decl":"typedef","name":"pj_status_t","ty":{"named":"int"}}"#;
        let decl: Declaration = serde_json::from_str(line).unwrap();
        assert_eq!(decl, Declaration::typedef("pj_status_t", CType::named("int")));

        let line = r#"{"decl":"aggregate","keyword":"struct","name":"pj_pool_t"}"#;
        let decl: Declaration = serde_json::from_str(line).unwrap();
        assert!(decl.is_forward_aggregate());
    }
}
