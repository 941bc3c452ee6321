use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
	pub network: NetworkConfig,
	pub wallet: WalletConfig,
	pub gas: GasConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
	pub default: String,
	pub local_url: String,
	pub testnet_url: String,
	pub local_chain_id: String,
	pub testnet_chain_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
	/// Environment variable holding the BIP-39 mnemonic.
	pub mnemonic_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
	/// Price per gas unit in uscrt, applied to gas overrides.
	pub gas_price: f64,
	/// Safety multiplier applied to stored gas overrides.
	pub gas_multiplier: f64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			network: NetworkConfig {
				default: "local".into(),
				local_url: "http://localhost:1317".into(),
				testnet_url: "https://bootstrap.secrettestnet.io".into(),
				local_chain_id: "enigma-pub-testnet-3".into(),
				testnet_chain_id: "holodeck-2".into(),
			},
			wallet: WalletConfig {
				mnemonic_env: "MNEMONIC".into(),
			},
			gas: GasConfig {
				gas_price: 0.3,
				gas_multiplier: 1.1,
			},
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.fond/).
	pub fn dir() -> PathBuf {
		dirs::home_dir()
			.expect("could not determine home directory")
			.join(".fond")
	}

	/// Path to the config file.
	pub fn path() -> PathBuf {
		Self::dir().join("config.toml")
	}

	/// Load config from disk, falling back to defaults if no file exists.
	pub fn load() -> anyhow::Result<Self> {
		let path = Self::path();
		if path.exists() {
			let content = std::fs::read_to_string(&path)?;
			Ok(toml::from_str(&content)?)
		} else {
			Ok(Self::default())
		}
	}

	/// Persist the current config to disk, creating the directory if needed.
	pub fn save(&self) -> anyhow::Result<()> {
		let path = Self::path();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&path, toml::to_string_pretty(self)?)?;
		Ok(())
	}

	/// Return the LCD URL for the given network name.
	pub fn lcd_url(&self, network: &str) -> &str {
		match network {
			"testnet" => &self.network.testnet_url,
			_ => &self.network.local_url,
		}
	}

	/// Return the chain id for the given network name.
	pub fn chain_id(&self, network: &str) -> &str {
		match network {
			"testnet" => &self.network.testnet_chain_id,
			_ => &self.network.local_chain_id,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sensible() {
		let c = Config::default();
		assert_eq!(c.network.default, "local");
		assert_eq!(c.network.local_url, "http://localhost:1317");
		assert_eq!(c.wallet.mnemonic_env, "MNEMONIC");
		assert!(c.gas.gas_multiplier >= 1.0);
	}

	#[test]
	fn toml_roundtrip() {
		let mut c = Config::default();
		c.network.default = "testnet".into();
		c.wallet.mnemonic_env = "MNEMONIC_TESTNET".into();

		let serialized = toml::to_string_pretty(&c).unwrap();
		let parsed: Config = toml::from_str(&serialized).unwrap();

		assert_eq!(parsed.network.default, "testnet");
		assert_eq!(parsed.wallet.mnemonic_env, "MNEMONIC_TESTNET");
	}

	#[test]
	fn url_and_chain_id_selection() {
		let c = Config::default();
		assert_eq!(c.lcd_url("local"), "http://localhost:1317");
		assert_eq!(c.lcd_url("testnet"), "https://bootstrap.secrettestnet.io");
		assert_eq!(c.chain_id("testnet"), "holodeck-2");
		// Unknown network falls back to local.
		assert_eq!(c.lcd_url("devnet"), "http://localhost:1317");
		assert_eq!(c.chain_id("devnet"), "enigma-pub-testnet-3");
	}
}
