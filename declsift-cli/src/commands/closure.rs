//! `declsift closure` command

use anyhow::{Context, Result};
use declsift::{Resolver, Source};

use crate::cli::ClosureArgs;

pub fn execute(args: ClosureArgs) -> Result<()> {
    let rules = super::load_rules(args.config.as_deref())?;
    let source = Source::from_jsonl(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let index = source.index(&rules);
    let closure = Resolver::new(&index, &rules).resolve()?;

    for name in closure.names() {
        if name.is_empty() {
            println!("<anonymous>");
        } else {
            println!("{name}");
        }
    }
    eprintln!("{} names", closure.len());
    for name in closure.unresolved() {
        tracing::debug!("unresolved: {name}");
    }
    Ok(())
}
