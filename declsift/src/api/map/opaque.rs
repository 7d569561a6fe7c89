//! Decide which names are emitted as opaque stubs.

use crate::api::{
    index::Index,
    model::{CType, Declaration, TagKind},
    rules::Rules,
    unit::{Fragment, Unit},
};

/// Outcome of [`OpaqueClassifier::classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opacity {
    /// Only a zero-member stub is emitted
    Opaque,
    /// The declarations are emitted as they are
    Transparent,
}

/// Replace types without a visible layout by stubs and drop redundant
/// `typedef struct foo foo;` lines from the others.
pub struct OpaqueClassifier<'a> {
    index: &'a Index<'a>,
    rules: &'a Rules,
}

impl<'a> OpaqueClassifier<'a> {
    pub fn new(index: &'a Index<'a>, rules: &'a Rules) -> Self {
        Self { index, rules }
    }

    /// A name is opaque when forced by the rules or when every declaration
    /// of it is a struct/union without a member list. Anonymous items have
    /// no name to declare a stub under and stay transparent.
    pub fn classify(&self, name: &str) -> Opacity {
        if name.is_empty() {
            return Opacity::Transparent;
        }
        if self.rules.is_always_opaque(name)
            || self
                .index
                .declarations(name)
                .all(Declaration::is_forward_aggregate)
        {
            Opacity::Opaque
        } else {
            Opacity::Transparent
        }
    }

    // Call method to use with `map` function
    pub fn call(&self, unit: Unit<'a>) -> Unit<'a> {
        let Unit {
            name,
            mut fragments,
        } = unit;
        match self.classify(&name) {
            Opacity::Opaque => Unit {
                fragments: vec![Fragment::Opaque(name.clone())],
                name,
            },
            Opacity::Transparent => {
                strip_tag_typedefs(&name, &mut fragments);
                Unit { name, fragments }
            }
        }
    }

    /// Convert to closure
    pub fn into_closure(self) -> impl FnMut(Unit<'a>) -> Unit<'a> {
        move |unit| self.call(unit)
    }
}

/// Remove the first `typedef <kind> name name;` of each tag kind
fn strip_tag_typedefs(name: &str, fragments: &mut Vec<Fragment<'_>>) {
    let mut stripped: Vec<TagKind> = Vec::new();
    fragments.retain(|fragment| {
        let Some(Declaration::Typedef {
            name: alias,
            ty: CType::Tagged { kind, name: tag },
        }) = fragment.as_declaration()
        else {
            return true;
        };
        if alias != name || tag != name || stripped.contains(kind) {
            return true;
        }
        stripped.push(*kind);
        false
    });
}
