use anyhow::Result;

use crate::cli::{Cli, TreasuryCommand};
use crate::client::LcdClient;
use crate::commands::wire::report;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::msg::{ContractRef, ManagingRole, TreasuryHandle, TreasuryQuery};
use crate::registry::names;

pub async fn run(cli: &Cli, cmd: &TreasuryCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let reg = open_registry(cli)?;
	let treasury = reg.require(names::TREASURY)?.address.clone();

	match cmd {
		TreasuryCommand::Grant { address, role } => {
			grant(&client, &treasury, address, (*role).into()).await
		}

		TreasuryCommand::GrantToken {
			token,
			role,
			with_calculator,
		} => {
			let token_ref: ContractRef = reg.require(token)?.into();
			let calculator = if *with_calculator {
				Some(reg.require(names::CALCULATOR)?.into())
			} else {
				None
			};

			let role: ManagingRole = (*role).into();
			let resp = client
				.execute(
					&treasury,
					&TreasuryHandle::Queue {
						address: token_ref.address.clone(),
						role,
					},
				)
				.await?;
			report("Queued", &resp);

			let resp = client
				.execute(
					&treasury,
					&TreasuryHandle::ToggleTokenQueue {
						token: token_ref,
						role,
						calculator,
					},
				)
				.await?;
			report("Toggled", &resp);
			Ok(())
		}

		TreasuryCommand::Queue { address, role } => {
			let resp = client
				.execute(
					&treasury,
					&TreasuryHandle::Queue {
						address: address.clone(),
						role: (*role).into(),
					},
				)
				.await?;
			report("Queued", &resp);
			Ok(())
		}

		TreasuryCommand::Toggle { address, role } => {
			let resp = client
				.execute(
					&treasury,
					&TreasuryHandle::ToggleQueue {
						address: address.clone(),
						role: (*role).into(),
					},
				)
				.await?;
			report("Toggled", &resp);
			Ok(())
		}

		TreasuryCommand::Manage { token, amount } => {
			let token = reg.require(token)?.address.clone();
			let resp = client
				.execute(&treasury, &TreasuryHandle::Manage { token, amount: amount.clone() })
				.await?;
			report("Managed", &resp);
			Ok(())
		}

		TreasuryCommand::Withdraw { token, amount } => {
			let token = reg.require(token)?.address.clone();
			let resp = client
				.execute(&treasury, &TreasuryHandle::Withdraw { token, amount: amount.clone() })
				.await?;
			report("Withdrawn", &resp);
			Ok(())
		}

		TreasuryCommand::IncurDebt { token, amount } => {
			let token = reg.require(token)?.address.clone();
			let resp = client
				.execute(&treasury, &TreasuryHandle::IncurDebt { token, amount: amount.clone() })
				.await?;
			report("Debt incurred", &resp);
			Ok(())
		}

		TreasuryCommand::MintRewards { token, amount } => {
			let token = reg.require(token)?.address.clone();
			let resp = client
				.execute(
					&treasury,
					&TreasuryHandle::MintRewards { token, amount: amount.clone() },
				)
				.await?;
			report("Minted", &resp);
			Ok(())
		}

		TreasuryCommand::Audit => {
			let resp = client.execute(&treasury, &TreasuryHandle::AuditReserves {}).await?;
			report("Audited", &resp);
			Ok(())
		}

		TreasuryCommand::Info => {
			let info: serde_json::Value =
				client.query_smart(&treasury, &TreasuryQuery::ContractInfo {}).await?;
			println!("{}", serde_json::to_string_pretty(&info)?);
			Ok(())
		}

		TreasuryCommand::Managers { role } => {
			let resp: serde_json::Value = client
				.query_smart(&treasury, &TreasuryQuery::ManagingAddresses { role: (*role).into() })
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		TreasuryCommand::Contracts { role } => {
			let resp: serde_json::Value = client
				.query_smart(&treasury, &TreasuryQuery::Contracts { role: (*role).into() })
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		TreasuryCommand::ValueOf { token, amount } => {
			let token = reg.require(token)?.address.clone();
			let resp: serde_json::Value = client
				.query_smart(&treasury, &TreasuryQuery::ValueOf { token, amount: amount.clone() })
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}
	}
}

/// Queue a role for an address and toggle it live in one step.
pub(crate) async fn grant(
	client: &LcdClient,
	treasury: &str,
	address: &str,
	role: ManagingRole,
) -> Result<()> {
	let resp = client
		.execute(
			treasury,
			&TreasuryHandle::Queue {
				address: address.to_owned(),
				role,
			},
		)
		.await?;
	report("Queued", &resp);

	let resp = client
		.execute(
			treasury,
			&TreasuryHandle::ToggleQueue {
				address: address.to_owned(),
				role,
			},
		)
		.await?;
	report("Toggled", &resp);
	Ok(())
}
