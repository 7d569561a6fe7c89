//! # declsift
//!
//! Selects, orders and rewrites C declarations into an interface file that a
//! binding generator (SWIG and the like) can consume.
//!
//! ## Problem
//!
//! A large native library exposes thousands of declarations, but a binding
//! usually needs only the API of a few modules plus every type those modules
//! reach. Feeding whole headers to the binding generator drags in internals it
//! cannot represent: types whose layout must stay hidden, members typed by
//! anonymous nested structs, and structs of function pointers that the target
//! language can only implement through virtual dispatch.
//!
//! ## Solution
//!
//! `declsift` reads a declaration dump produced by a C parser front-end (one
//! JSON record per top-level declaration, see [`Record`]) and:
//!
//! 1. groups the declarations by name into an [`Index`];
//! 2. computes the dependency [`Closure`] of the entry points selected by the
//!    [`Rules`], in topological order, tolerating reference cycles;
//! 3. maps every name of the closure through the rewrite passes in
//!    [`map`]: opaque stubs, the callback adapter and nested aggregate lifting;
//! 4. collects the result into an [`collect::Interface`].
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use declsift::{
//!     collect::Interface,
//!     map::{CallbackAdapter, Flattener, OpaqueClassifier},
//!     Resolver, Rules, Source,
//! };
//!
//! # fn main() -> declsift::Result<()> {
//! let rules = Rules::from_file("pjsua.toml")?;
//! let source = Source::from_jsonl("pjsua.jsonl")?;
//! let index = source.index(&rules);
//! let closure = Resolver::new(&index, &rules).resolve()?;
//!
//! let interface = closure
//!     .units(&index)
//!     .map(OpaqueClassifier::new(&index, &rules).into_closure())
//!     .map(CallbackAdapter::new(&index, rules.callback()).into_closure())
//!     .map(Flattener::new().into_closure())
//!     .collect::<Interface>();
//!
//! interface.write("pjsua.i")?;
//! # Ok(())
//! # }
//! ```
//!
//! [`generate`] runs exactly this chain.

pub(crate) mod api;
pub(crate) mod codegen;
pub(crate) mod utils;

mod error;

pub use crate::api::index::Index;
pub use crate::api::model::{
    Aggregate, AggregateKind, CType, DeclKind, Declaration, EnumDef, Enumerator, Field, FnSig,
    Param, TagKind,
};
pub use crate::api::record::{Record, SourceLocation};
pub use crate::api::resolve::{Closure, Resolver, VisitState};
pub use crate::api::rules::{CallbackRules, Rules};
pub use crate::api::source::Source;
pub use crate::api::unit::{Fragment, Unit, NESTED_INNER_TYPEMAP};
pub use crate::codegen::callback::{CallbackArtifacts, CallbackSlot};
pub use crate::error::{Error, Result};
pub use crate::utils::jsonl::{parse_jsonl, read_jsonl_file, write_jsonl_file};

/// Builder of [`Rules`]
pub mod rules {
    pub use crate::api::rules::{Builder, DEFAULT_CALLBACK_INSTANCE};
}

/// Passes over [`Unit`]s called by `map`
pub mod map {
    pub use crate::api::map::callback::CallbackAdapter;
    pub use crate::api::map::flatten::Flattener;
    pub use crate::api::map::opaque::{OpaqueClassifier, Opacity};
}

/// Collectors for sequences of [`Unit`]s produced by `collect`
pub mod collect {
    pub use crate::api::collect::interface::Interface;
}

/// Callback adapter source templates
pub mod template {
    pub use crate::api::template::{
        substitute, CLASS_PLACEHOLDER, DEFAULT_HEADER_TEMPLATE, DEFAULT_SOURCE_TEMPLATE,
        DEF_PLACEHOLDER, PROXY_PLACEHOLDER, STRUCT_PLACEHOLDER,
    };
}

/// Run the whole pipeline: index, resolve, rewrite and assemble.
///
/// Fails only on input/configuration problems already reported by the
/// constructors and on a resolver invariant violation; everything else is
/// logged and degraded locally.
pub fn generate(source: &Source, rules: &Rules) -> Result<collect::Interface> {
    let index = source.index(rules);
    let closure = Resolver::new(&index, rules).resolve()?;
    for name in closure.unresolved() {
        tracing::debug!("`{name}` is referenced but never declared");
    }
    let interface = closure
        .units(&index)
        .map(map::OpaqueClassifier::new(&index, rules).into_closure())
        .map(map::CallbackAdapter::new(&index, rules.callback()).into_closure())
        .map(map::Flattener::new().into_closure())
        .collect::<collect::Interface>();
    tracing::info!(
        "Generated interface with {} of {} indexed names",
        interface.names().len(),
        index.len()
    );
    Ok(interface)
}
