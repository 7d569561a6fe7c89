use std::collections::HashMap;

use crate::{
    api::{
        model::{AggregateKind, CType, Declaration, TagKind},
        rules::Rules,
    },
    SourceLocation,
};

/// All library declarations grouped by name.
///
/// A name can carry several declarations (`struct pj_foo { .. };` followed by
/// `typedef struct pj_foo pj_foo;`). Inside a group, tag definitions always
/// precede the typedefs that alias them, so the bare tag is known by the time
/// the alias is printed. Names keep the order of their first appearance.
///
/// The index only borrows the declarations of its [`Source`](crate::Source).
#[derive(Debug, Clone, Default)]
pub struct Index<'a> {
    order: Vec<&'a str>,
    groups: HashMap<&'a str, Vec<(&'a Declaration, &'a SourceLocation)>>,
}

impl<'a> Index<'a> {
    /// Group declarations by name, skipping named items outside the base prefix
    pub fn build<I>(items: I, rules: &Rules) -> Self
    where
        I: IntoIterator<Item = (&'a Declaration, &'a SourceLocation)>,
    {
        let mut index = Self::default();
        let mut skipped = 0usize;
        for (decl, source_location) in items {
            let name = decl.name();
            if rules.is_primitive(name) {
                skipped += 1;
                continue;
            }
            if !index.groups.contains_key(name) {
                index.order.push(name);
            }
            let group = index.groups.entry(name).or_default();
            insert_ordered(group, decl, source_location);
        }
        tracing::debug!(
            "Indexed {} names, skipped {} foreign declarations",
            index.order.len(),
            skipped
        );
        index
    }

    pub fn get(&self, name: &str) -> Option<&[(&'a Declaration, &'a SourceLocation)]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Declarations of `name`, without locations
    pub fn declarations(&self, name: &str) -> impl Iterator<Item = &'a Declaration> + '_ {
        self.groups
            .get(name)
            .into_iter()
            .flatten()
            .map(|&(decl, _)| decl)
    }

    /// Names in order of first appearance
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Append to the group, keeping tag definitions ahead of typedefs of the same tag
fn insert_ordered<'a>(
    group: &mut Vec<(&'a Declaration, &'a SourceLocation)>,
    decl: &'a Declaration,
    source_location: &'a SourceLocation,
) {
    let position = match decl {
        Declaration::Aggregate(aggregate) => group
            .iter()
            .position(|(other, _)| aliases_tag(other, aggregate.keyword, decl.name())),
        _ => None,
    };
    match position {
        Some(position) => group.insert(position, (decl, source_location)),
        None => group.push((decl, source_location)),
    }
}

fn aliases_tag(decl: &Declaration, keyword: AggregateKind, tag: &str) -> bool {
    match decl {
        Declaration::Typedef {
            ty: CType::Tagged { kind, name },
            ..
        } => *kind == TagKind::from(keyword) && name == tag,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{EnumDef, Field};

    fn rules() -> Rules {
        Rules::builder()
            .base_prefix("pj")
            .module_prefix("pjsua_")
            .build()
            .unwrap()
    }

    fn located(decl: Declaration) -> (Declaration, SourceLocation) {
        (decl, SourceLocation::default())
    }

    fn build<'a>(items: &'a [(Declaration, SourceLocation)], rules: &Rules) -> Index<'a> {
        Index::build(items.iter().map(|(decl, location)| (decl, location)), rules)
    }

    #[test]
    fn test_skips_foreign_names_keeps_anonymous() {
        let items = vec![
            located(Declaration::typedef("size_t", CType::named("unsigned long"))),
            located(Declaration::Enum(EnumDef {
                name: None,
                variants: Some(vec![]),
            })),
            located(Declaration::typedef("pj_size_t", CType::named("size_t"))),
        ];
        let index = build(&items, &rules());
        assert!(!index.contains("size_t"));
        assert!(index.contains(""));
        assert!(index.contains("pj_size_t"));
        assert_eq!(index.names().collect::<Vec<_>>(), vec!["", "pj_size_t"]);
    }

    #[test]
    fn test_typedef_ordered_after_tag() {
        let items = vec![
            located(Declaration::typedef(
                "pj_str_t",
                CType::tagged(TagKind::Struct, "pj_str_t"),
            )),
            located(Declaration::aggregate(
                AggregateKind::Struct,
                "pj_str_t",
                Some(vec![
                    Field::new("ptr", CType::pointer(CType::named("char"))),
                    Field::new("slen", CType::named("pj_ssize_t")),
                ]),
            )),
        ];
        let index = build(&items, &rules());
        let kinds: Vec<_> = index
            .declarations("pj_str_t")
            .map(Declaration::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                crate::api::model::DeclKind::Struct,
                crate::api::model::DeclKind::Typedef
            ]
        );
    }

    #[test]
    fn test_source_order_kept_otherwise() {
        let items = vec![
            located(Declaration::aggregate(AggregateKind::Struct, "pj_timer_entry", None)),
            located(Declaration::typedef(
                "pj_timer_entry",
                CType::tagged(TagKind::Struct, "pj_timer_entry"),
            )),
            located(Declaration::aggregate(
                AggregateKind::Struct,
                "pj_timer_entry",
                Some(vec![Field::new("id", CType::named("int"))]),
            )),
        ];
        let index = build(&items, &rules());
        let decls: Vec<_> = index.declarations("pj_timer_entry").collect();
        assert_eq!(decls.len(), 3);
        assert!(decls[0].is_forward_aggregate());
        assert!(decls[1].members().is_some());
        assert_eq!(decls[2].kind(), crate::api::model::DeclKind::Typedef);
    }

    #[test]
    fn test_groups_borrow_source_declarations() {
        let source = crate::Source::from_declarations(vec![Declaration::typedef(
            "pj_bool_t",
            CType::named("int"),
        )]);
        let index = source.index(&rules());
        let (owned, _) = source.items().next().unwrap();
        let indexed = index.declarations("pj_bool_t").next().unwrap();
        assert!(std::ptr::eq(owned, indexed));
    }
}
