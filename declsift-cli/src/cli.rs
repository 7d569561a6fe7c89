//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// declsift - Reduce C headers to a binding interface
#[derive(Parser)]
#[command(name = "declsift")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the interface file and the callback adapter
    Generate(GenerateArgs),

    /// Print the resolved names in dependency order
    Closure(ClosureArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Declaration dump in JSON-lines format
    #[arg(short, long)]
    pub input: PathBuf,

    /// Rules file (defaults to the built-in pjsua rules)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interface file to write (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory receiving callbacks.h and callbacks.cpp
    #[arg(long, default_value = ".")]
    pub callbacks_dir: PathBuf,

    /// Template for callbacks.h
    #[arg(long)]
    pub header_template: Option<PathBuf>,

    /// Template for callbacks.cpp
    #[arg(long)]
    pub source_template: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClosureArgs {
    /// Declaration dump in JSON-lines format
    #[arg(short, long)]
    pub input: PathBuf,

    /// Rules file (defaults to the built-in pjsua rules)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
