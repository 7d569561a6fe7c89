//! Error types shared by the loader, the rule parser and the resolver.

use std::path::PathBuf;

use thiserror::Error;

use crate::SourceLocation;

/// Everything that can stop a generation run.
///
/// Problems local to a single declaration (unknown references, nested
/// aggregates that cannot be lifted, callback fields without a usable
/// signature) are not errors: they are logged and the run continues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{location}: malformed declaration record: {source}")]
    Json {
        location: SourceLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("{location}: record is named `{recorded}` but its declaration is named `{computed}`")]
    RecordMismatch {
        location: SourceLocation,
        recorded: String,
        computed: String,
    },

    #[error("invalid rules file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid exclusion pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A name was closed while it was not being expanded. This is a defect in
    /// the resolver, not in the input.
    #[error("resolver invariant violated while closing `{name}`")]
    ResolverInvariant { name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
