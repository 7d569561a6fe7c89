//! Command implementations.

use std::path::Path;

use anyhow::{Context, Result};
use declsift::Rules;

pub mod closure;
pub mod generate;

/// Rules used when no `--config` is given
const PJSUA_PRESET: &str = include_str!("../../presets/pjsua.toml");

/// Load the rules file, or the pjsua preset when none is given
pub fn load_rules(config: Option<&Path>) -> Result<Rules> {
    match config {
        Some(path) => Rules::from_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display())),
        None => Rules::from_toml_str(PJSUA_PRESET).context("built-in pjsua rules are invalid"),
    }
}
