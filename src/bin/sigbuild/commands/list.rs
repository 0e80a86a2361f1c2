//! `sigbuild list` command

use anyhow::Result;

use crate::cli::ListArgs;
use sigbuild::ops::list;
use sigbuild::util::{Config, GlobalContext};

pub fn execute(args: ListArgs, ctx: &GlobalContext, config: &Config) -> Result<()> {
    let manifest = args.manifest.unwrap_or_else(|| config.manifest_path());
    let listing = list(&ctx.manifest_path(&manifest))?;

    print!("{}", listing.format());

    Ok(())
}
