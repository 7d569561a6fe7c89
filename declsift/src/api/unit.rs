use std::borrow::Cow;

use crate::{
    api::model::Declaration,
    codegen::{callback::CallbackArtifacts, render},
};

/// Annotation that marks members whose type was lifted out of their parent
pub const NESTED_INNER_TYPEMAP: &str = "NESTED_INNER";

/// A piece of output produced for one name
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment<'a> {
    /// Declaration printed as C, either straight from the index or rewritten
    Decl(Cow<'a, Declaration>),
    /// Zero-member stub of a type whose layout is not exposed
    Opaque(String),
    /// Nested aggregate lifted to the top level, referenced by `member` in its parent
    Nested { decl: Declaration, member: String },
    /// Adapter for the callback struct; collected aside, not printed inline
    Callbacks(CallbackArtifacts),
}

impl<'a> Fragment<'a> {
    pub fn borrowed(decl: &'a Declaration) -> Self {
        Fragment::Decl(Cow::Borrowed(decl))
    }

    pub fn owned(decl: Declaration) -> Self {
        Fragment::Decl(Cow::Owned(decl))
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Fragment::Decl(decl) => Some(decl),
            Fragment::Nested { decl, .. } => Some(decl),
            _ => None,
        }
    }
}

impl std::fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fragment::Decl(decl) => f.write_str(&render::declaration(decl)),
            Fragment::Opaque(name) => {
                writeln!(f, "%nodefaultctor {name}; %nodefaultdtor {name};")?;
                writeln!(f, "struct {name} {{}};")
            }
            Fragment::Nested { decl, member } => {
                writeln!(f, "%inline %{{")?;
                f.write_str(&render::declaration(decl))?;
                writeln!(f, "%}}")?;
                writeln!(
                    f,
                    "%apply {NESTED_INNER_TYPEMAP} {{ {} {member} }};",
                    decl.name()
                )
            }
            Fragment::Callbacks(_) => Ok(()),
        }
    }
}

/// All fragments emitted for one resolved name
#[derive(Debug, Clone, PartialEq)]
pub struct Unit<'a> {
    pub name: String,
    pub fragments: Vec<Fragment<'a>>,
}

impl Unit<'_> {
    /// Interface text of the unit
    pub fn render(&self) -> String {
        self.fragments.iter().map(ToString::to_string).collect()
    }
}
