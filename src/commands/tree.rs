//! `foreman tree` implementation.

use crate::cli::TreeArgs;
use crate::error::Result;
use crate::project::tree;

pub fn cmd_tree(args: TreeArgs) -> Result<()> {
    let workdir = super::require_workdir(&args.workdir)?;
    let config = super::load_config(&workdir, args.config, false)?;

    let summary = tree::summarize(&workdir, &config.tree_excludes)?;
    print!("{}", summary);
    Ok(())
}
