//! Turn a native struct of function pointers into an overridable interface.
//!
//! For every field three artifacts are produced: a virtual method with a
//! default body, a static proxy forwarding to the current interface instance,
//! and an entry of the initializer table that points the native slot at the
//! proxy. Fields without a usable signature only get a `NULL` table entry.

use itertools::Itertools;

use crate::api::{
    index::Index,
    model::{CType, Declaration, Field, FnSig, Param},
    rules::CallbackRules,
};

use super::render;

/// One field of the callback struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackSlot {
    /// Field with a function-pointer signature; parameters are all named
    Resolved { field: String, sig: FnSig },
    /// Field that could not be resolved to a callable signature
    Unresolved { field: String },
}

impl CallbackSlot {
    pub fn field(&self) -> &str {
        match self {
            CallbackSlot::Resolved { field, .. } | CallbackSlot::Unresolved { field } => field,
        }
    }
}

/// Generated adapter for the callback struct
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallbackArtifacts {
    /// Name of the native struct
    pub struct_name: String,
    /// Fields in declaration order
    pub slots: Vec<CallbackSlot>,
    /// Virtual methods of the interface class
    pub class_body: String,
    /// Static proxy functions
    pub proxies: String,
    /// Initializer list of proxy addresses, one entry per field
    pub table: String,
}

impl CallbackArtifacts {
    pub fn resolved(&self) -> impl Iterator<Item = (&str, &FnSig)> {
        self.slots.iter().filter_map(|slot| match slot {
            CallbackSlot::Resolved { field, sig } => Some((field.as_str(), sig)),
            CallbackSlot::Unresolved { .. } => None,
        })
    }
}

/// Build the adapter for `struct_name` from its member list
pub(crate) fn generate(
    struct_name: &str,
    fields: &[Field],
    index: &Index<'_>,
    rules: &CallbackRules,
) -> CallbackArtifacts {
    let slots = fields
        .iter()
        .map(|field| {
            let name = field.name.clone().unwrap_or_default();
            match signature(&field.ty, index) {
                Some(sig) if !name.is_empty() => CallbackSlot::Resolved {
                    field: name,
                    sig: name_params(sig),
                },
                _ => {
                    tracing::warn!(
                        "Field `{name}` of `{struct_name}` is not a callable function pointer, using NULL"
                    );
                    CallbackSlot::Unresolved { field: name }
                }
            }
        })
        .collect::<Vec<_>>();

    let mut class_body = String::new();
    let mut proxies = String::new();
    for slot in &slots {
        if let CallbackSlot::Resolved { field, sig } = slot {
            class_body.push_str(&method(field, sig, rules));
            proxies.push_str(&proxy(field, sig, rules));
        }
    }
    let table = slots
        .iter()
        .map(|slot| match slot {
            CallbackSlot::Resolved { field, .. } => format!("  &{field}"),
            CallbackSlot::Unresolved { .. } => "  NULL".to_string(),
        })
        .join(",\n")
        + "\n";

    CallbackArtifacts {
        struct_name: struct_name.to_string(),
        slots,
        class_body,
        proxies,
        table,
    }
}

/// Function signature of a field, inline or through a function-pointer typedef
fn signature(ty: &CType, index: &Index<'_>) -> Option<FnSig> {
    let sig = match ty {
        CType::Pointer(inner) => match inner.as_ref() {
            CType::Function(sig) => sig.clone(),
            _ => return None,
        },
        CType::Named(alias) => match index.declarations(alias).next()? {
            Declaration::Typedef {
                ty: CType::Pointer(inner),
                ..
            } => match inner.as_ref() {
                CType::Function(sig) => sig.clone(),
                _ => return None,
            },
            _ => return None,
        },
        _ => return None,
    };
    // varargs cannot be forwarded
    (!sig.variadic).then_some(sig)
}

/// Give unnamed parameters synthetic names and drop a lone `void` parameter
fn name_params(mut sig: FnSig) -> FnSig {
    if let [Param { name: None, ty }] = sig.params.as_slice() {
        if ty.is_void() {
            sig.params.clear();
        }
    }
    for (position, param) in sig.params.iter_mut().enumerate() {
        if param.name.is_none() {
            param.name = Some(format!("p{position}"));
        }
    }
    sig
}

fn method(field: &str, sig: &FnSig, rules: &CallbackRules) -> String {
    let body = if sig.ret.is_void() {
        "{}".to_string()
    } else {
        let value = rules
            .default_returns
            .get(field)
            .map(String::as_str)
            .unwrap_or("0");
        format!("{{ return {value}; }}")
    };
    format!("  virtual {} {body}\n", render::function_head(field, sig))
}

fn proxy(field: &str, sig: &FnSig, rules: &CallbackRules) -> String {
    let args = sig
        .params
        .iter()
        .filter_map(|param| param.name.as_deref())
        .join(", ");
    let call = format!("{}->{field}({args});", rules.instance);
    let body = if sig.ret.is_void() {
        call
    } else {
        format!("return {call}")
    };
    format!("static {} {{ {body} }}\n", render::function_head(field, sig))
}
