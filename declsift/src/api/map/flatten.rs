//! Lift nested aggregate definitions to the top level.

use crate::{
    api::unit::{Fragment, Unit},
    codegen::flatten::{flatten, Lifted},
};

/// Rewrites every struct/union declaration of a unit so that no member is
/// typed by an inline aggregate definition.
///
/// Each lifted definition becomes a [`Fragment::Nested`] placed before the
/// rewritten parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flattener;

impl Flattener {
    pub fn new() -> Self {
        Self
    }

    // Call method to use with `map` function
    pub fn call<'a>(&self, unit: Unit<'a>) -> Unit<'a> {
        let Unit { name, fragments } = unit;
        let mut out = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let rewritten = match &fragment {
                Fragment::Decl(decl) => flatten(decl),
                _ => None,
            };
            match rewritten {
                Some((lifted, root)) => {
                    tracing::debug!("Lifted {} nested aggregates out of `{name}`", lifted.len());
                    out.extend(
                        lifted
                            .into_iter()
                            .map(|Lifted { decl, member }| Fragment::Nested { decl, member }),
                    );
                    out.push(Fragment::owned(root));
                }
                None => out.push(fragment),
            }
        }
        Unit {
            name,
            fragments: out,
        }
    }

    /// Convert to closure
    pub fn into_closure<'a>(self) -> impl FnMut(Unit<'a>) -> Unit<'a> {
        move |unit| self.call(unit)
    }
}
