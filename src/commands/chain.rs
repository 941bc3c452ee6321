use anyhow::Result;

use crate::cli::{ChainCommand, Cli};
use crate::commands::build_client;
use crate::config::Config;
use crate::fees::Coin;

pub async fn run(cli: &Cli, cmd: &ChainCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;

	match cmd {
		ChainCommand::Status => {
			let chain_id = client.node_chain_id().await?;
			let height = client.latest_block_height().await?;
			println!("Chain id: {chain_id}");
			println!("Height:   {height}");
			println!("Account:  {}", client.address());
			Ok(())
		}

		ChainCommand::Transfer { to, amount } => {
			let resp = client.send_native(to, Coin::uscrt(amount)).await?;
			println!("Sent {amount} uscrt to {to}");
			println!("TX: {}", resp.txhash);
			Ok(())
		}
	}
}
