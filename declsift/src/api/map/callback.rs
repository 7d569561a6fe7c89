//! Replace the configured callback struct with its generated adapter.

use crate::{
    api::{
        index::Index,
        rules::CallbackRules,
        unit::{Fragment, Unit},
    },
    codegen::callback,
};

/// Turns the struct named by [`CallbackRules`] into [`Fragment::Callbacks`].
///
/// Every other unit passes through untouched. Without callback rules the
/// adapter is a no-op.
pub struct CallbackAdapter<'a> {
    index: &'a Index<'a>,
    rules: Option<&'a CallbackRules>,
}

impl<'a> CallbackAdapter<'a> {
    pub fn new(index: &'a Index<'a>, rules: Option<&'a CallbackRules>) -> Self {
        Self { index, rules }
    }

    // Call method to use with `map` function
    pub fn call(&self, unit: Unit<'a>) -> Unit<'a> {
        let Some(rules) = self.rules else {
            return unit;
        };
        if unit.name != rules.struct_name {
            return unit;
        }
        let Some(fields) = unit
            .fragments
            .iter()
            .filter_map(Fragment::as_declaration)
            .find_map(|decl| decl.members())
        else {
            tracing::warn!(
                "Callback struct `{}` has no member list, no adapter generated",
                unit.name
            );
            return unit;
        };
        let artifacts = callback::generate(&unit.name, fields, self.index, rules);
        tracing::debug!(
            "Adapted {} of {} callback fields of `{}`",
            artifacts.resolved().count(),
            artifacts.slots.len(),
            unit.name
        );
        let Unit {
            name,
            mut fragments,
        } = unit;
        if rules.emit_struct {
            fragments.push(Fragment::Callbacks(artifacts));
        } else {
            fragments = vec![Fragment::Callbacks(artifacts)];
        }
        Unit { name, fragments }
    }

    /// Convert to closure
    pub fn into_closure(self) -> impl FnMut(Unit<'a>) -> Unit<'a> {
        move |unit| self.call(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{AggregateKind, CType, Declaration, Field, FnSig, Param};
    use crate::{Rules, Source};

    fn callback_struct() -> Declaration {
        Declaration::aggregate(
            AggregateKind::Struct,
            "pjsua_callback",
            Some(vec![
                Field::new(
                    "on_reg_state",
                    CType::fn_pointer(FnSig::new(
                        CType::named("void"),
                        vec![Param::new("acc_id", CType::named("int"))],
                    )),
                ),
                Field::new("on_nat_detect", CType::named("int")),
            ]),
        )
    }

    fn unit<'a>(index: &'a Index<'a>, name: &str) -> Unit<'a> {
        Unit {
            name: name.to_string(),
            fragments: index.declarations(name).map(Fragment::borrowed).collect(),
        }
    }

    #[test]
    fn test_struct_replaced_by_artifacts() {
        let rules = Rules::builder()
            .base_prefix("pj")
            .callback(CallbackRules::new("pjsua_callback"))
            .build()
            .unwrap();
        let source = Source::from_declarations(vec![callback_struct()]);
        let index = source.index(&rules);
        let adapter = CallbackAdapter::new(&index, rules.callback());

        let adapted = adapter.call(unit(&index, "pjsua_callback"));
        let [Fragment::Callbacks(artifacts)] = adapted.fragments.as_slice() else {
            panic!("unexpected fragments: {:?}", adapted.fragments);
        };
        assert_eq!(artifacts.slots.len(), 2);
        assert_eq!(artifacts.resolved().count(), 1);
        assert_eq!(artifacts.table, "  &on_reg_state,\n  NULL\n");
        assert_eq!(adapted.render(), "");
    }

    #[test]
    fn test_emit_struct_keeps_declaration() {
        let rules = Rules::builder()
            .base_prefix("pj")
            .callback(CallbackRules::new("pjsua_callback").emit_struct(true))
            .build()
            .unwrap();
        let source = Source::from_declarations(vec![callback_struct()]);
        let index = source.index(&rules);
        let adapter = CallbackAdapter::new(&index, rules.callback());

        let adapted = adapter.call(unit(&index, "pjsua_callback"));
        assert_eq!(adapted.fragments.len(), 2);
        assert!(adapted.render().starts_with("struct pjsua_callback {\n"));
    }

    #[test]
    fn test_other_units_untouched() {
        let rules = Rules::builder().base_prefix("pj").build().unwrap();
        let source = Source::from_declarations(vec![callback_struct()]);
        let index = source.index(&rules);
        let adapter = CallbackAdapter::new(&index, None);

        let before = unit(&index, "pjsua_callback");
        assert_eq!(adapter.call(before.clone()), before);
    }
}
