use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Well-known registry names used by the deploy and wiring flows.
pub mod names {
	pub const OHM: &str = "OHM";
	pub const SUST: &str = "sUST";
	pub const SSCRT: &str = "sSCRT";
	pub const SOHM: &str = "sOHM";
	pub const TREASURY: &str = "treasury";
	pub const CALCULATOR: &str = "bond_calculator";
	pub const DISTRIBUTOR: &str = "staking_distributor";
	pub const STAKING: &str = "staking";
	pub const WARMUP: &str = "staking-warmup";
	pub const SUST_BOND: &str = "sUST-bond";
	pub const SSCRT_BOND: &str = "sSCRT-bond";
	pub const PAIR_FACTORY: &str = "pair-factory";

	/// Registry suffix marking an LP token created by `swap create-pair`.
	pub const LP_SUFFIX: &str = "-LP";
	/// Registry suffix for the pair contract behind an LP token.
	pub const PAIR_SUFFIX: &str = "-pair";
}

/// One deployed contract instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractEntry {
	pub code_id: u64,
	pub code_hash: String,
	pub address: String,
	/// For bond depositories: registry name of the principle token.
	#[serde(skip_serializing_if = "Option::is_none")]
	#[serde(default)]
	pub principle: Option<String>,
}

/// Persistent name -> contract registry.
///
/// Read once, mutated in memory, and rewritten wholesale after every
/// deployment step so an interrupted flow can be resumed contract by
/// contract.
#[derive(Debug)]
pub struct Registry {
	path: PathBuf,
	entries: BTreeMap<String, ContractEntry>,
}

impl Registry {
	/// Registry file for a network (~/.fond/contracts.<network>.json).
	pub fn network_path(network: &str) -> PathBuf {
		Config::dir().join(format!("contracts.{network}.json"))
	}

	/// Open the registry at `path`, starting empty if the file is missing.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let entries = if path.exists() {
			let content = std::fs::read_to_string(&path)
				.with_context(|| format!("reading registry {}", path.display()))?;
			serde_json::from_str(&content)
				.with_context(|| format!("parsing registry {}", path.display()))?
		} else {
			BTreeMap::new()
		};
		Ok(Self { path, entries })
	}

	/// Rewrite the registry file from the in-memory map.
	pub fn save(&self) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let content = serde_json::to_string_pretty(&self.entries)?;
		std::fs::write(&self.path, content)
			.with_context(|| format!("writing registry {}", self.path.display()))?;
		Ok(())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn get(&self, name: &str) -> Option<&ContractEntry> {
		self.entries.get(name)
	}

	/// Look up a contract that must already be deployed.
	pub fn require(&self, name: &str) -> Result<&ContractEntry> {
		match self.entries.get(name) {
			Some(entry) => Ok(entry),
			None => {
				let known: Vec<&str> = self.entries.keys().map(String::as_str).collect();
				bail!(
					"contract not found in registry: {name} (known: {})",
					if known.is_empty() { "none".to_string() } else { known.join(", ") }
				)
			}
		}
	}

	/// Record (or replace) a deployed contract.
	pub fn insert(&mut self, name: impl Into<String>, entry: ContractEntry) {
		self.entries.insert(name.into(), entry);
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &ContractEntry)> {
		self.entries.iter()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(address: &str) -> ContractEntry {
		ContractEntry {
			code_id: 7,
			code_hash: "3c7518fdbd1775ed0e20eddf3209772dca456f84d3bd5fa5dafc531f5c88f720".into(),
			address: address.into(),
			principle: None,
		}
	}

	fn scratch_path(tag: &str) -> PathBuf {
		std::env::temp_dir().join(format!("fond-registry-{tag}-{}.json", std::process::id()))
	}

	#[test]
	fn missing_file_opens_empty() {
		let reg = Registry::open(scratch_path("missing")).unwrap();
		assert!(reg.is_empty());
		assert!(reg.get(names::TREASURY).is_none());
	}

	#[test]
	fn save_and_reopen_roundtrip() {
		let path = scratch_path("roundtrip");
		let mut reg = Registry::open(&path).unwrap();
		let mut bond = entry("secret1s5l0d77e7g07mpfs9p2sxd2ex309jhvjteevmy");
		bond.principle = Some(names::SUST.into());
		reg.insert(names::SUST_BOND, bond);
		reg.save().unwrap();

		let reopened = Registry::open(&path).unwrap();
		let e = reopened.require(names::SUST_BOND).unwrap();
		assert_eq!(e.code_id, 7);
		assert_eq!(e.principle.as_deref(), Some(names::SUST));

		std::fs::remove_file(&path).ok();
	}

	#[test]
	fn require_reports_known_names() {
		let mut reg = Registry::open(scratch_path("require")).unwrap();
		reg.insert(names::OHM, entry("secret1n40ttddgk6slx86uppyz59wdnp4v026ye3xk05"));

		let err = reg.require("bogus").unwrap_err().to_string();
		assert!(err.contains("bogus"));
		assert!(err.contains(names::OHM));
	}

	#[test]
	fn principle_is_omitted_when_absent() {
		let json = serde_json::to_value(entry("secret1addr")).unwrap();
		assert!(json.get("principle").is_none());
	}
}
