//! `foreman run` implementation.

use crate::agent::CommandGenerator;
use crate::cli::RunArgs;
use crate::error::Result;
use crate::events::RunLog;
use crate::project::ProjectState;
use crate::team::Coordinator;
use std::time::Duration;

pub fn cmd_run(args: RunArgs) -> Result<()> {
    let workdir = super::require_workdir(&args.workdir)?;
    let config = super::load_config(&workdir, args.config, true)?;

    let generator = CommandGenerator::new(
        config.generator.command.as_str(),
        Duration::from_secs(config.generator.timeout_seconds),
    );
    let log = RunLog::for_workdir(&workdir);
    let mut state = ProjectState::new(&workdir, &args.objective)
        .with_tree_excludes(config.tree_excludes.clone());

    let coordinator = Coordinator::new(&generator, &config, log);
    let result = coordinator.run(&mut state)?;

    println!("{}", result);
    Ok(())
}
