use std::path::Path;

use roxygen::roxygen;

use crate::{
    api::{index::Index, model::Declaration, record::Record, rules::Rules},
    utils::jsonl::read_jsonl_file,
    Result, SourceLocation,
};

/// The parsed declaration tree, in original order.
///
/// Produced by the external C parser front-end as a JSON-lines file (see
/// [`Record`]) or assembled in memory from records.
#[derive(Debug, Clone, Default)]
pub struct Source {
    items: Vec<(Declaration, SourceLocation)>,
}

impl Source {
    /// Read a JSON-lines declaration dump
    #[roxygen]
    pub fn from_jsonl<P: AsRef<Path>>(
        /// Path to the file written by the parser front-end
        input: P,
    ) -> Result<Self> {
        let records = read_jsonl_file(&input)?;
        let source = Self::from_records(records)?;
        tracing::debug!(
            "Loaded {} declarations from {}",
            source.items.len(),
            input.as_ref().display()
        );
        Ok(source)
    }

    /// Build a source from records, validating each one
    pub fn from_records<I: IntoIterator<Item = Record>>(records: I) -> Result<Self> {
        let items = records
            .into_iter()
            .map(Record::parse)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// Build a source from bare declarations, without location information
    pub fn from_declarations<I: IntoIterator<Item = Declaration>>(declarations: I) -> Self {
        Self {
            items: declarations
                .into_iter()
                .map(|decl| (decl, SourceLocation::default()))
                .collect(),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &(Declaration, SourceLocation)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Group the declarations by name according to `rules`, borrowing them
    pub fn index(&self, rules: &Rules) -> Index<'_> {
        Index::build(
            self.items
                .iter()
                .map(|(decl, source_location)| (decl, source_location)),
            rules,
        )
    }
}
