//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Version of the command line parser.
pub const CLI_VERSION: &str = "0.00.01";

/// sigbuild - build C targets described by a JSON manifest
#[derive(Parser)]
#[command(name = "sigbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level: 0 = errors only, 1 = normal, 2 = debug
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub log: Option<u8>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a target from a manifest
    Build(BuildArgs),

    /// List the targets of a manifest
    List(ListArgs),

    /// Show version information (`-v` adds component versions)
    About,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Manifest to build, optionally followed by `:TARGET`
    #[arg(value_name = "MANIFEST[:TARGET]")]
    pub spec: Option<String>,

    /// Target to build (overrides `:TARGET` and `default_target`)
    #[arg(short, long)]
    pub target: Option<String>,
}

impl BuildArgs {
    /// Split `MANIFEST[:TARGET]` into its parts.
    ///
    /// Only a colon after the last path separator counts, so Windows drive
    /// letters are left alone.
    pub fn manifest_and_target(&self) -> (Option<PathBuf>, Option<String>) {
        let Some(ref spec) = self.spec else {
            return (None, None);
        };

        let file_start = spec.rfind(['/', '\\']).map_or(0, |i| i + 1);
        match spec[file_start..].rfind(':') {
            Some(i) => {
                let split = file_start + i;
                let target = &spec[split + 1..];
                let manifest = &spec[..split];
                (
                    (!manifest.is_empty()).then(|| PathBuf::from(manifest)),
                    (!target.is_empty()).then(|| target.to_string()),
                )
            }
            None => (Some(PathBuf::from(spec)), None),
        }
    }
}

#[derive(Args)]
pub struct ListArgs {
    /// Manifest to list (defaults to the configured manifest)
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
