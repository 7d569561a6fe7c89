//! Placeholder substitution for the callback adapter source files.
//!
//! A template line containing a block placeholder is replaced as a whole by
//! the generated block; every other line is copied verbatim. The struct
//! placeholder is replaced in place wherever it occurs.

use crate::codegen::callback::CallbackArtifacts;

/// Replaced by the virtual methods of the interface class
pub const CLASS_PLACEHOLDER: &str = "$CALLBACK_CLASS$";
/// Replaced by the static proxy functions
pub const PROXY_PLACEHOLDER: &str = "$CALLBACK_PROXY$";
/// Replaced by the initializer list of proxy addresses
pub const DEF_PLACEHOLDER: &str = "$CALLBACK_DEF$";
/// Replaced by the name of the native callback struct
pub const STRUCT_PLACEHOLDER: &str = "$CALLBACK_STRUCT$";

pub const DEFAULT_HEADER_TEMPLATE: &str = include_str!("../../templates/callbacks.h.template");
pub const DEFAULT_SOURCE_TEMPLATE: &str = include_str!("../../templates/callbacks.cpp.template");

/// Replace every line that mentions one of the placeholders by its block
pub fn substitute(template: &str, blocks: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    for line in template.split_inclusive('\n') {
        match blocks
            .iter()
            .find(|(placeholder, _)| line.contains(placeholder))
        {
            Some((_, block)) => out.push_str(block),
            None => out.push_str(line),
        }
    }
    out
}

impl CallbackArtifacts {
    /// Interface header: the class body goes where `$CALLBACK_CLASS$` is
    pub fn render_header(&self, template: &str) -> String {
        substitute(template, &[(CLASS_PLACEHOLDER, &self.class_body)])
            .replace(STRUCT_PLACEHOLDER, &self.struct_name)
    }

    /// Proxy source: proxies at `$CALLBACK_PROXY$`, the table at `$CALLBACK_DEF$`
    pub fn render_source(&self, template: &str) -> String {
        substitute(
            template,
            &[
                (PROXY_PLACEHOLDER, &self.proxies),
                (DEF_PLACEHOLDER, &self.table),
            ],
        )
        .replace(STRUCT_PLACEHOLDER, &self.struct_name)
    }
}
