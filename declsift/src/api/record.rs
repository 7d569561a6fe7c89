use serde::{Deserialize, Serialize};

use crate::{api::model::Declaration, Error, Result};

/// One top-level item of the declaration tree as written by the parser front-end.
///
/// Records are stored one per line in JSON-lines files; the file order is the
/// order of the items in the parsed translation unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Name of the item, empty for anonymous enums and aggregates
    #[serde(default)]
    pub name: String,
    /// The typed declaration node
    pub declaration: Declaration,
    /// Where the front-end found the item
    #[serde(default)]
    pub source_location: SourceLocation,
}

/// Source location information for tracking where a declaration originated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// The source file path
    pub file: String,
    /// The line number where the item starts (1-based)
    pub line: usize,
    /// The column number where the item starts (1-based)
    pub column: usize,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl SourceLocation {
    pub fn new<S: Into<String>>(file: S, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl Record {
    /// Create a record whose name is taken from the declaration itself
    pub fn new(declaration: Declaration, source_location: SourceLocation) -> Self {
        Self {
            name: declaration.name().to_string(),
            declaration,
            source_location,
        }
    }

    pub fn to_jsonl_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Check the record and split it into the declaration and its location.
    ///
    /// The stored name must agree with the name computed from the declaration,
    /// otherwise the index would file the item under the wrong key.
    pub(crate) fn parse(self) -> Result<(Declaration, SourceLocation)> {
        let computed = self.declaration.name();
        if computed != self.name {
            return Err(Error::RecordMismatch {
                computed: computed.to_string(),
                recorded: self.name,
                location: self.source_location,
            });
        }
        Ok((self.declaration, self.source_location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::CType;

    #[test]
    fn test_parse_accepts_matching_name() {
        let record = Record::new(
            Declaration::typedef("pj_bool_t", CType::named("int")),
            SourceLocation::new("pj/types.h", 74, 1),
        );
        let (decl, location) = record.parse().unwrap();
        assert_eq!(decl.name(), "pj_bool_t");
        assert_eq!(location.to_string(), "pj/types.h:74:1");
    }

    #[test]
    fn test_parse_rejects_mismatched_name() {
        let line = r#"{"name":"pj_int32_t","declaration":{"decl":"typedef","name":"pj_uint32_t","ty":{"named":"unsigned int"}}}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        match record.parse() {
            Err(Error::RecordMismatch {
                recorded, computed, ..
            }) => {
                assert_eq!(recorded, "pj_int32_t");
                assert_eq!(computed, "pj_uint32_t");
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }
}
