use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    api::unit::{Fragment, Unit},
    codegen::callback::CallbackArtifacts,
    Error, Result,
};

/// The assembled binding interface.
///
/// `Interface` is the collector at the end of the pipeline: units are
/// concatenated in the order they arrive, which is the resolver's
/// dependency order, so no declaration refers to a name printed after it.
/// The callback adapter, if one was generated, is kept aside for the
/// template renderer instead of being printed inline.
///
/// ```rust,ignore
/// let interface: Interface = closure
///     .units(&index)
///     .map(OpaqueClassifier::new(&index, &rules).into_closure())
///     .map(Flattener::new().into_closure())
///     .collect();
/// interface.write("pjsua.i")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interface {
    names: Vec<String>,
    text: String,
    callbacks: Option<CallbackArtifacts>,
}

impl<'a> FromIterator<Unit<'a>> for Interface {
    fn from_iter<T: IntoIterator<Item = Unit<'a>>>(iter: T) -> Self {
        let mut interface = Self::default();
        for unit in iter {
            interface.text.push_str(&unit.render());
            for fragment in unit.fragments {
                if let Fragment::Callbacks(artifacts) = fragment {
                    if interface.callbacks.is_some() {
                        tracing::warn!("More than one callback adapter, keeping `{}`", artifacts.struct_name);
                    }
                    interface.callbacks = Some(artifacts);
                }
            }
            interface.names.push(unit.name);
        }
        interface
    }
}

impl Interface {
    /// Interface text in dependency order
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Names of the collected units, in output order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Adapter generated for the callback struct, if it was part of the closure
    pub fn callbacks(&self) -> Option<&CallbackArtifacts> {
        self.callbacks.as_ref()
    }

    /// Write the interface text to `path`, creating missing parent directories.
    ///
    /// Returns the path written to.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &self.text).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!("Wrote {} declarations to {}", self.names.len(), path.display());
        Ok(path)
    }
}

impl std::fmt::Display for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{AggregateKind, CType, Declaration, Field};

    #[test]
    fn test_concatenates_in_arrival_order() {
        let a = Declaration::typedef("pj_status_t", CType::named("int"));
        let b = Declaration::aggregate(
            AggregateKind::Struct,
            "pjsua_acc_info",
            Some(vec![Field::new("status", CType::named("pj_status_t"))]),
        );
        let interface: Interface = vec![
            Unit {
                name: "pj_status_t".into(),
                fragments: vec![Fragment::borrowed(&a)],
            },
            Unit {
                name: "pjsua_acc_info".into(),
                fragments: vec![Fragment::borrowed(&b)],
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(interface.names(), ["pj_status_t", "pjsua_acc_info"]);
        assert_eq!(
            interface.as_str(),
            "typedef int pj_status_t;\nstruct pjsua_acc_info {\n  pj_status_t status;\n};\n"
        );
        assert!(interface.callbacks().is_none());
    }

    #[test]
    fn test_callbacks_kept_aside() {
        let artifacts = CallbackArtifacts {
            struct_name: "pjsua_callback".into(),
            table: "  NULL\n".into(),
            ..Default::default()
        };
        let interface: Interface = std::iter::once(Unit {
            name: "pjsua_callback".into(),
            fragments: vec![Fragment::Callbacks(artifacts.clone())],
        })
        .collect();

        assert_eq!(interface.as_str(), "");
        assert_eq!(interface.callbacks(), Some(&artifacts));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let interface: Interface = std::iter::once(Unit {
            name: String::new(),
            fragments: vec![Fragment::Opaque("pj_pool_t".into())],
        })
        .collect();

        let path = interface.write(dir.path().join("out/pjsua.i")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), interface.to_string());
    }
}
