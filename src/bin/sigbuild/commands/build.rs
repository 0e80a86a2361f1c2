//! `sigbuild build` command

use std::io::IsTerminal;

use anyhow::Result;

use crate::cli::BuildArgs;
use sigbuild::ops::sigbuild_build::{build, BuildOptions};
use sigbuild::util::diagnostic::{self, suggestions, Diagnostic};
use sigbuild::util::{Config, GlobalContext, SystemRunner};

pub fn execute(args: BuildArgs, ctx: &GlobalContext, config: &Config) -> Result<()> {
    let (manifest, spec_target) = args.manifest_and_target();
    let manifest = manifest.unwrap_or_else(|| config.manifest_path());

    // --target > MANIFEST:TARGET
    let opts = BuildOptions {
        manifest: ctx.manifest_path(&manifest),
        target: args.target.or(spec_target),
        fallback_target: config.build.target.clone(),
    };

    let outcome = build(&opts, &SystemRunner)?;

    if !outcome.warnings.is_empty() {
        let summary = Diagnostic::warning(format!(
            "{} unresolved variable reference(s) left as written",
            outcome.warnings.len()
        ))
        .with_location(&opts.manifest)
        .with_suggestion(suggestions::UNDEFINED_VARIABLE);
        diagnostic::emit(&summary, std::io::stderr().is_terminal());
    }

    let report = &outcome.report;
    match report.artifact {
        Some(ref artifact) => eprintln!(
            "    Finished `{}` -> {}",
            report.target,
            artifact.display()
        ),
        None => eprintln!(
            "    Finished `{}` ({} command(s))",
            report.target,
            report.commands.len()
        ),
    }

    Ok(())
}
