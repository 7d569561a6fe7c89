//! Print declarations back as C.
//!
//! Declarators are built inside-out: pointers prepend `*`, arrays and
//! function types append their suffix, and a pointer to an array or function
//! gets parenthesized (`void (*cb)(int)`). Member lists are indented by two
//! spaces per nesting level.

use itertools::Itertools;

use crate::api::model::{Aggregate, CType, Declaration, EnumDef, FnSig};

const INDENT: &str = "  ";

/// Render a top-level declaration, terminated by `;` and a newline
pub(crate) fn declaration(decl: &Declaration) -> String {
    let body = match decl {
        Declaration::Aggregate(aggregate) => aggregate_body(aggregate, 0),
        Declaration::Enum(def) => enum_body(def, 0),
        Declaration::Typedef { name, ty } => format!("typedef {}", declare(ty, name, 0)),
        Declaration::Function { name, sig, storage } => {
            with_storage(storage, function_head(name, sig))
        }
        Declaration::Variable { name, ty, storage } => with_storage(storage, declare(ty, name, 0)),
    };
    format!("{body};\n")
}

/// `ret name(params)` for a function signature
pub(crate) fn function_head(name: &str, sig: &FnSig) -> String {
    let (base, declarator) = split(&sig.ret, format!("{name}({})", params(sig)), 0);
    join(base, declarator)
}

/// Parameter list without the surrounding parentheses
pub(crate) fn params(sig: &FnSig) -> String {
    if sig.params.is_empty() {
        return if sig.variadic { "...".into() } else { "void".into() };
    }
    let mut list = sig
        .params
        .iter()
        .map(|param| declare(&param.ty, param.name.as_deref().unwrap_or(""), 0))
        .join(", ");
    if sig.variadic {
        list.push_str(", ...");
    }
    list
}

/// Declare `name` with type `ty`; an empty name gives an abstract declarator
pub(crate) fn declare(ty: &CType, name: &str, indent: usize) -> String {
    let (base, declarator) = split(ty, name.to_string(), indent);
    join(base, declarator)
}

fn join(base: String, declarator: String) -> String {
    if declarator.is_empty() {
        base
    } else {
        format!("{base} {declarator}")
    }
}

fn with_storage(storage: &[String], text: String) -> String {
    if storage.is_empty() {
        text
    } else {
        format!("{} {text}", storage.join(" "))
    }
}

/// Split a type into its specifier part and the declarator wrapped around `declarator`
fn split(ty: &CType, declarator: String, indent: usize) -> (String, String) {
    match ty {
        CType::Named(name) => (name.clone(), declarator),
        CType::Tagged { kind, name } => (format!("{kind} {name}"), declarator),
        CType::Aggregate(aggregate) => (aggregate_body(aggregate, indent), declarator),
        CType::Enum(def) => (enum_body(def, indent), declarator),
        CType::Const(inner) => match inner.as_ref() {
            CType::Pointer(_) => {
                let declarator = if declarator.is_empty() {
                    "const".to_string()
                } else {
                    format!("const {declarator}")
                };
                split(inner, declarator, indent)
            }
            _ => {
                let (base, declarator) = split(inner, declarator, indent);
                (format!("const {base}"), declarator)
            }
        },
        CType::Pointer(inner) => {
            let declarator = format!("*{declarator}");
            match inner.as_ref() {
                CType::Array(..) | CType::Function(_) => {
                    split(inner, format!("({declarator})"), indent)
                }
                _ => split(inner, declarator, indent),
            }
        }
        CType::Array(inner, dim) => split(
            inner,
            format!("{declarator}[{}]", dim.as_deref().unwrap_or("")),
            indent,
        ),
        CType::Function(sig) => split(&sig.ret, format!("{declarator}({})", params(sig)), indent),
    }
}

fn aggregate_body(aggregate: &Aggregate, indent: usize) -> String {
    let mut out = aggregate.keyword.to_string();
    if let Some(name) = &aggregate.name {
        out.push(' ');
        out.push_str(name);
    }
    if let Some(fields) = &aggregate.fields {
        out.push_str(" {\n");
        for field in fields {
            out.push_str(&INDENT.repeat(indent + 1));
            out.push_str(&declare(
                &field.ty,
                field.name.as_deref().unwrap_or(""),
                indent + 1,
            ));
            if let Some(width) = &field.bit_width {
                out.push_str(" : ");
                out.push_str(width);
            }
            out.push_str(";\n");
        }
        out.push_str(&INDENT.repeat(indent));
        out.push('}');
    }
    out
}

fn enum_body(def: &EnumDef, indent: usize) -> String {
    let mut out = "enum".to_string();
    if let Some(name) = &def.name {
        out.push(' ');
        out.push_str(name);
    }
    if let Some(variants) = &def.variants {
        out.push_str(" {\n");
        let pad = INDENT.repeat(indent + 1);
        let body = variants
            .iter()
            .map(|variant| match &variant.value {
                Some(value) => format!("{pad}{} = {value}", variant.name),
                None => format!("{pad}{}", variant.name),
            })
            .join(",\n");
        out.push_str(&body);
        if !variants.is_empty() {
            out.push('\n');
        }
        out.push_str(&INDENT.repeat(indent));
        out.push('}');
    }
    out
}
