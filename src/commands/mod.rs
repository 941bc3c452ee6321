pub mod bond;
pub mod chain;
pub mod deploy;
pub mod registry;
pub mod stake;
pub mod swap;
pub mod token;
pub mod treasury;
pub mod wire;

use anyhow::Result;

use crate::cli::Cli;
use crate::client::LcdClient;
use crate::config::Config;
use crate::fees::FeeTable;
use crate::registry::Registry;
use crate::wallet::Wallet;

/// Resolve the LCD URL from CLI flag or config.
pub fn resolve_url(cli: &Cli, config: &Config) -> String {
	cli.url
		.clone()
		.unwrap_or_else(|| config.lcd_url(cli.network.as_str()).to_owned())
}

/// Resolve the signing chain id from CLI flag or config.
pub fn resolve_chain_id(cli: &Cli, config: &Config) -> String {
	cli.chain_id
		.clone()
		.unwrap_or_else(|| config.chain_id(cli.network.as_str()).to_owned())
}

/// Build a signing client: mnemonic from the environment, fee table
/// from config plus any stored gas overrides.
pub fn build_client(cli: &Cli, config: &Config) -> Result<LcdClient> {
	let mnemonic_env = cli
		.mnemonic_env
		.as_deref()
		.unwrap_or(&config.wallet.mnemonic_env);
	let wallet = Wallet::from_env(mnemonic_env)?;

	let fees = FeeTable::new(config.gas.gas_price, config.gas.gas_multiplier)
		.with_overrides_file(&Config::dir().join("gas_overrides.json"))?;

	Ok(LcdClient::new(
		&resolve_url(cli, config),
		&resolve_chain_id(cli, config),
		wallet,
		fees,
	))
}

/// Open the registry for the selected network.
pub fn open_registry(cli: &Cli) -> Result<Registry> {
	Registry::open(Registry::network_path(cli.network.as_str()))
}
