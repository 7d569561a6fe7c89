//! `declsift generate` command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use declsift::{template, CallbackArtifacts, Source};

use crate::cli::GenerateArgs;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let rules = super::load_rules(args.config.as_deref())?;
    let source = Source::from_jsonl(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let interface = declsift::generate(&source, &rules)?;

    match &args.output {
        Some(path) => {
            interface
                .write(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{interface}"),
    }

    match interface.callbacks() {
        Some(callbacks) => write_callbacks(callbacks, &args)?,
        None => {
            if let Some(callback) = rules.callback() {
                tracing::warn!(
                    "Callback struct `{}` is not part of the interface, no adapter written",
                    callback.struct_name
                );
            }
        }
    }
    Ok(())
}

fn write_callbacks(callbacks: &CallbackArtifacts, args: &GenerateArgs) -> Result<()> {
    let header_template = read_template(
        args.header_template.as_deref(),
        template::DEFAULT_HEADER_TEMPLATE,
    )?;
    let source_template = read_template(
        args.source_template.as_deref(),
        template::DEFAULT_SOURCE_TEMPLATE,
    )?;

    fs::create_dir_all(&args.callbacks_dir)
        .with_context(|| format!("failed to create {}", args.callbacks_dir.display()))?;
    let header = args.callbacks_dir.join("callbacks.h");
    fs::write(&header, callbacks.render_header(&header_template))
        .with_context(|| format!("failed to write {}", header.display()))?;
    let source = args.callbacks_dir.join("callbacks.cpp");
    fs::write(&source, callbacks.render_source(&source_template))
        .with_context(|| format!("failed to write {}", source.display()))?;

    tracing::info!(
        "Wrote callback adapter for `{}` to {}",
        callbacks.struct_name,
        args.callbacks_dir.display()
    );
    Ok(())
}

fn read_template(path: Option<&Path>, default: &str) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display())),
        None => Ok(default.to_string()),
    }
}
