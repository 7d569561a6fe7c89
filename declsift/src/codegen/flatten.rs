//! Lift nested struct/union definitions out of their parents.
//!
//! `struct Outer { struct { int x; } inner; };` becomes a standalone
//! `struct Outer_inner { int x; };` plus `struct Outer { Outer_inner inner; };`.
//! Lifting is bottom-up, so a doubly nested member is named after both of its
//! ancestors' members (`Outer_inner_deep`) and is emitted before them. A tag on
//! the nested definition is dropped in favour of the member path.

use crate::api::model::{CType, Declaration, Field};

/// A nested aggregate moved to the top level
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lifted {
    /// The standalone aggregate definition
    pub decl: Declaration,
    /// Name of the member that now refers to it
    pub member: String,
}

/// Lift every nested aggregate of `decl`.
///
/// Returns the lifted definitions in emission order together with the
/// rewritten declaration, or `None` when the declaration has nothing to lift.
pub(crate) fn flatten(decl: &Declaration) -> Option<(Vec<Lifted>, Declaration)> {
    let aggregate = decl.as_aggregate()?;
    let parent = aggregate
        .name
        .clone()
        .unwrap_or_else(|| decl.name().to_string());

    let mut root = decl.clone();
    let fields = match &mut root {
        Declaration::Aggregate(aggregate) => aggregate.fields.as_mut(),
        Declaration::Typedef {
            ty: CType::Aggregate(aggregate),
            ..
        } => aggregate.fields.as_mut(),
        _ => None,
    }?;

    let mut lifted = Vec::new();
    lift_fields(&parent, fields, &mut lifted);
    if lifted.is_empty() {
        None
    } else {
        Some((lifted, root))
    }
}

fn lift_fields(parent: &str, fields: &mut [Field], out: &mut Vec<Lifted>) {
    for field in fields.iter_mut() {
        let member = field.name.clone();
        let Some(slot) = nested_definition(&mut field.ty) else {
            continue;
        };
        let Some(member) = member else {
            tracing::warn!("Nested aggregate without a member name in `{parent}` left in place");
            continue;
        };
        // the member path replaces any tag
        if !matches!(&*slot, CType::Aggregate(_)) {
            continue;
        }
        let name = format!("{parent}_{member}");
        match std::mem::replace(slot, CType::Named(name.clone())) {
            CType::Aggregate(mut aggregate) => {
                aggregate.name = Some(name.clone());
                if let Some(inner) = aggregate.fields.as_mut() {
                    lift_fields(&name, inner, out);
                }
                out.push(Lifted {
                    decl: Declaration::Aggregate(aggregate),
                    member,
                });
            }
            other => *slot = other,
        }
    }
}

/// Inline aggregate definition inside a member type, looking through pointers and arrays
fn nested_definition(ty: &mut CType) -> Option<&mut CType> {
    if matches!(ty, CType::Aggregate(aggregate) if aggregate.fields.is_some()) {
        return Some(ty);
    }
    match ty {
        CType::Pointer(inner) | CType::Const(inner) | CType::Array(inner, _) => {
            nested_definition(inner)
        }
        _ => None,
    }
}
