use anyhow::Result;
use clap::Parser;

mod cli;
mod client;
mod commands;
mod config;
mod fees;
mod msg;
mod registry;
mod wallet;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	match &cli.command {
		Command::Deploy { command } => commands::deploy::run(&cli, command).await,
		Command::Wire { command } => commands::wire::run(&cli, command).await,
		Command::Stake { command } => commands::stake::run(&cli, command).await,
		Command::Bond { command } => commands::bond::run(&cli, command).await,
		Command::Treasury { command } => commands::treasury::run(&cli, command).await,
		Command::Token { command } => commands::token::run(&cli, command).await,
		Command::Swap { command } => commands::swap::run(&cli, command).await,
		Command::Chain { command } => commands::chain::run(&cli, command).await,
		Command::Registry { command } => commands::registry::run(&cli, command).await,
	}
}
