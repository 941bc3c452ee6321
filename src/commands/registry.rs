use anyhow::Result;

use crate::cli::{Cli, RegistryCommand};
use crate::commands::open_registry;

pub async fn run(cli: &Cli, cmd: &RegistryCommand) -> Result<()> {
	let reg = open_registry(cli)?;

	match cmd {
		RegistryCommand::List => {
			if reg.is_empty() {
				println!("No contracts registered for this network.");
				return Ok(());
			}
			for (name, entry) in reg.iter() {
				println!("{name:24} {} (code {})", entry.address, entry.code_id);
			}
			Ok(())
		}

		RegistryCommand::Show { name } => {
			let entry = reg.require(name)?;
			println!("Name:      {name}");
			println!("Address:   {}", entry.address);
			println!("Code id:   {}", entry.code_id);
			println!("Code hash: {}", entry.code_hash);
			if let Some(principle) = &entry.principle {
				println!("Principle: {principle}");
			}
			Ok(())
		}

		RegistryCommand::Path => {
			println!("{}", reg.path().display());
			Ok(())
		}
	}
}
