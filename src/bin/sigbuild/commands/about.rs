//! `sigbuild about` command

use anyhow::Result;

use crate::cli::CLI_VERSION;
use sigbuild::util::GlobalContext;

pub fn execute(ctx: &GlobalContext) -> Result<()> {
    if !ctx.is_verbose() {
        println!("Sigma.Build v.{}", sigbuild::short_release());
        return Ok(());
    }

    println!("Sigma.Build v.{}", sigbuild::RELEASE);
    println!("  sigbuild   {}", env!("CARGO_PKG_VERSION"));
    println!("  loader     {}", sigbuild::LOADER_VERSION);
    println!("  builder    {}", sigbuild::BUILDER_VERSION);
    println!("  cli        {}", CLI_VERSION);

    Ok(())
}
