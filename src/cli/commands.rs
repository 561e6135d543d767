//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{Topology, WeightingService};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::BucketTreeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Weights { topology }) => weights(cli, topology),
        Some(Commands::Rank { topology, limit }) => rank(cli, topology, *limit),
        Some(Commands::Config { command }) => config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

fn load_service(cli: &Cli) -> CliResult<WeightingService> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");
    Ok(WeightingService::new(settings.weighting))
}

#[instrument(skip(cli))]
fn weights(cli: &Cli, topology: &Path) -> CliResult<()> {
    let service = load_service(cli)?;
    let mut tree = Topology::load(topology)?.build_tree()?;
    let report = service.apply(&mut tree)?;

    output::header(&format!("Weights ({})", service.config().rollup));
    output::info(&tree.to_tree_string());
    output::action(
        "capacity reference",
        &format!("{} = {:.4}", service.config().capacity_norm, report.capacity_reference),
    );
    output::action(
        "price reference",
        &format!("{} = {:.4}", service.config().price_norm, report.price_reference),
    );
    Ok(())
}

#[instrument(skip(cli))]
fn rank(cli: &Cli, topology: &Path, limit: Option<usize>) -> CliResult<()> {
    let service = load_service(cli)?;
    let mut tree = Topology::load(topology)?.build_tree()?;
    let weight_fn = service.build_weight_fn(&tree);
    let ranked = service.rank(&mut tree)?;

    output::header("Nodes by composite score");
    for (position, node) in ranked.iter().take(limit.unwrap_or(usize::MAX)).enumerate() {
        output::info(&format!("{:>3}. {} score={:.4}", position + 1, node, weight_fn(node)));
    }
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.config.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
