//! Selection and rewrite rules.
//!
//! Rules are fixed for the whole run. They can be assembled with [`Builder`]
//! or read from a TOML file:
//!
//! ```toml
//! base_prefix = "pj"
//! module_prefix = "pjsua_"
//! exclude = ["_vid_", "_video_"]
//! always_opaque = ["pj_pool_t", "pjsip_module"]
//! always_exported = ["pj_pool_release"]
//!
//! [callback]
//! struct_name = "pjsua_callback"
//! instance = "cb"
//!
//! [callback.default_returns]
//! on_call_redirected = "PJSIP_REDIRECT_STOP"
//! ```

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::Path,
};

use regex::Regex;
use roxygen::roxygen;
use serde::Deserialize;

use crate::{Error, Result};

/// Expression used by generated proxies to reach the current callback object
pub const DEFAULT_CALLBACK_INSTANCE: &str = "cb";

/// Builder for configuring [`Rules`]
///
/// # Example
///
/// ```
/// let rules = declsift::Rules::builder()
///     .base_prefix("pj")
///     .module_prefix("pjsua_")
///     .exclude("_vid_")
///     .always_opaque("pj_pool_t")
///     .always_exported("pj_pool_release")
///     .build()
///     .unwrap();
/// assert!(rules.is_entry_point("pjsua_create"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    base_prefix: String,
    module_prefix: String,
    exclude: Vec<String>,
    always_opaque: HashSet<String>,
    always_exported: HashSet<String>,
    callback: Option<CallbackRules>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names without this prefix are primitives and never resolved
    #[roxygen]
    pub fn base_prefix<S: Into<String>>(
        mut self,
        /// Prefix shared by every declaration of the library, e.g. `pj`
        prefix: S,
    ) -> Self {
        self.base_prefix = prefix.into();
        self
    }

    /// Names with this prefix are entry points of the generated interface
    #[roxygen]
    pub fn module_prefix<S: Into<String>>(
        mut self,
        /// Prefix of the exported module API, e.g. `pjsua_`
        prefix: S,
    ) -> Self {
        self.module_prefix = prefix.into();
        self
    }

    /// Skip entry points matching a pattern.
    ///
    /// The pattern is a regular expression; it only counts when it matches
    /// past the first character of the name. Excluded names can still be
    /// pulled in as dependencies of other entry points.
    #[roxygen]
    pub fn exclude<S: Into<String>>(
        mut self,
        /// Regular expression, e.g. `_vid_`
        pattern: S,
    ) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Always emit the type as an opaque stub and never look at its members
    #[roxygen]
    pub fn always_opaque<S: Into<String>>(
        mut self,
        /// Type name
        name: S,
    ) -> Self {
        self.always_opaque.insert(name.into());
        self
    }

    /// Always use the name as an entry point, regardless of prefix and exclusions
    #[roxygen]
    pub fn always_exported<S: Into<String>>(
        mut self,
        /// Declaration name
        name: S,
    ) -> Self {
        self.always_exported.insert(name.into());
        self
    }

    /// Adapt the given struct of function pointers into an overridable interface
    #[roxygen]
    pub fn callback(
        mut self,
        /// Callback struct configuration
        callback: CallbackRules,
    ) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn build(self) -> Result<Rules> {
        let exclude = self
            .exclude
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| Error::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Rules {
            base_prefix: self.base_prefix,
            module_prefix: self.module_prefix,
            exclude,
            always_opaque: self.always_opaque,
            always_exported: self.always_exported,
            callback: self.callback,
        })
    }
}

/// Configuration of the callback adapter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallbackRules {
    /// Name of the native struct of function pointers
    pub struct_name: String,
    /// Expression naming the current interface instance inside proxies
    #[serde(default = "default_instance")]
    pub instance: String,
    /// Default return expressions of interface methods, by field name
    #[serde(default)]
    pub default_returns: BTreeMap<String, String>,
    /// Keep the native struct in the interface next to the adapter
    #[serde(default)]
    pub emit_struct: bool,
}

fn default_instance() -> String {
    DEFAULT_CALLBACK_INSTANCE.to_string()
}

impl CallbackRules {
    pub fn new<S: Into<String>>(struct_name: S) -> Self {
        Self {
            struct_name: struct_name.into(),
            instance: default_instance(),
            default_returns: BTreeMap::new(),
            emit_struct: false,
        }
    }

    /// Override the default return expression of one field's interface method
    #[roxygen]
    pub fn default_return<S1: Into<String>, S2: Into<String>>(
        mut self,
        /// Field name, e.g. `on_call_redirected`
        field: S1,
        /// C expression returned by the default implementation
        expr: S2,
    ) -> Self {
        self.default_returns.insert(field.into(), expr.into());
        self
    }

    #[roxygen]
    pub fn instance<S: Into<String>>(
        mut self,
        /// Expression such as `cb` or `Callback::current()`
        instance: S,
    ) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn emit_struct(mut self, value: bool) -> Self {
        self.emit_struct = value;
        self
    }
}

/// On-disk shape of the rules
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    base_prefix: String,
    #[serde(default)]
    module_prefix: String,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    always_opaque: Vec<String>,
    #[serde(default)]
    always_exported: Vec<String>,
    #[serde(default)]
    callback: Option<CallbackRules>,
}

/// Static configuration of a generation run
#[derive(Debug, Clone)]
pub struct Rules {
    base_prefix: String,
    module_prefix: String,
    exclude: Vec<Regex>,
    always_opaque: HashSet<String>,
    always_exported: HashSet<String>,
    callback: Option<CallbackRules>,
}

impl Rules {
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(text)?;
        let mut builder = Builder::new()
            .base_prefix(file.base_prefix)
            .module_prefix(file.module_prefix);
        for pattern in file.exclude {
            builder = builder.exclude(pattern);
        }
        for name in file.always_opaque {
            builder = builder.always_opaque(name);
        }
        for name in file.always_exported {
            builder = builder.always_exported(name);
        }
        if let Some(callback) = file.callback {
            builder = builder.callback(callback);
        }
        builder.build()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    pub fn module_prefix(&self) -> &str {
        &self.module_prefix
    }

    pub fn callback(&self) -> Option<&CallbackRules> {
        self.callback.as_ref()
    }

    /// Names outside the library namespace need no binding declaration.
    /// The empty name (anonymous items) is never primitive.
    pub fn is_primitive(&self, name: &str) -> bool {
        !name.is_empty() && !name.starts_with(&self.base_prefix)
    }

    pub fn is_always_opaque(&self, name: &str) -> bool {
        self.always_opaque.contains(name)
    }

    pub fn is_always_exported(&self, name: &str) -> bool {
        self.always_exported.contains(name)
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude
            .iter()
            .any(|pattern| pattern.find(name).is_some_and(|found| found.start() > 0))
    }

    /// Seed rule of the resolver
    pub fn is_entry_point(&self, name: &str) -> bool {
        name.is_empty()
            || self.is_always_exported(name)
            || (name.starts_with(&self.module_prefix) && !self.is_excluded(name))
    }
}
