mod cli;
mod commands;
mod installers;
mod libs;
mod logger;
mod schemas;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands};
use commands::{now, plan, version};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let code = match cli.command {
        Commands::Version => version::run(),
        Commands::Now { install, dry_run } => now::run(&install, dry_run),
        Commands::Plan { install } => plan::run(&install),
    };
    std::process::exit(code);
}
