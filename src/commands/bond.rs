use anyhow::{anyhow, Result};

use crate::cli::{BondCommand, Cli};
use crate::client::LcdClient;
use crate::commands::token::create_viewing_key;
use crate::commands::wire::report;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::msg::{
	self, BondHandle, BondHook, BondQuery, ContractRef, TokenHandle, TokenInfoResponse, TokenQuery,
	TreasuryQuery,
};
use crate::registry::{names, ContractEntry, Registry};

pub async fn run(cli: &Cli, cmd: &BondCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let reg = open_registry(cli)?;

	match cmd {
		BondCommand::Deposit {
			name,
			amount,
			max_price,
		} => deposit(&client, &reg, name, amount, max_price).await,

		BondCommand::Redeem { name, stake } => {
			let bond = reg.require(name)?;
			let resp = client
				.execute(
					&bond.address,
					&BondHandle::Redeem {
						recipient: client.address().to_owned(),
						stake: *stake,
					},
				)
				.await?;
			report("Redeemed", &resp);
			Ok(())
		}

		BondCommand::Info { name } => {
			let bond = reg.require(name)?;
			let info: serde_json::Value =
				client.query_smart(&bond.address, &BondQuery::ContractInfo {}).await?;
			println!("{}", serde_json::to_string_pretty(&info)?);
			Ok(())
		}

		BondCommand::Terms { name } => {
			let bond = reg.require(name)?;
			let terms: serde_json::Value =
				client.query_smart(&bond.address, &BondQuery::BondTerms {}).await?;
			println!("{}", serde_json::to_string_pretty(&terms)?);
			Ok(())
		}

		BondCommand::SetTerm {
			name,
			parameter,
			value,
		} => {
			let bond = reg.require(name)?;
			let resp = client
				.execute(
					&bond.address,
					&BondHandle::SetBondTerm {
						parameter: (*parameter).into(),
						input: value.clone(),
					},
				)
				.await?;
			report("Term set", &resp);
			Ok(())
		}

		BondCommand::SetAdjustment {
			name,
			addition,
			increment,
			target,
			buffer,
		} => {
			let bond = reg.require(name)?;
			let resp = client
				.execute(
					&bond.address,
					&BondHandle::SetAdjustment {
						addition: *addition,
						increment: increment.clone(),
						target: target.clone(),
						buffer: *buffer,
					},
				)
				.await?;
			report("Adjustment set", &resp);
			Ok(())
		}

		BondCommand::SetStaking { name } => {
			let bond = reg.require(name)?;
			let staking: ContractRef = reg.require(names::STAKING)?.into();
			let resp = client
				.execute(&bond.address, &BondHandle::SetStaking { staking })
				.await?;
			report("Set staking", &resp);
			Ok(())
		}

		BondCommand::Price { name } => {
			let bond = reg.require(name)?;
			let height = client.latest_block_height().await?;
			let resp: serde_json::Value = client
				.query_smart(&bond.address, &BondQuery::BondPrice { block_height: height + 1 })
				.await?;
			let raw = string_at(&resp, "/bond_price/price")?;
			let decimals = principle_decimals(&client, &reg, bond).await?;
			println!("Bond price: {} ({raw} raw)", scaled(&raw, decimals));
			Ok(())
		}

		BondCommand::PriceUsd { name } => {
			let bond = reg.require(name)?;
			let height = client.latest_block_height().await?;
			let resp: serde_json::Value = client
				.query_smart(
					&bond.address,
					&BondQuery::BondPriceInUsd { block_height: height + 1 },
				)
				.await?;
			let raw = string_at(&resp, "/bond_price_in_usd/price")?;
			let decimals = principle_decimals(&client, &reg, bond).await?;
			println!("Bond price: {} USD ({raw} raw)", scaled(&raw, decimals));
			Ok(())
		}

		BondCommand::DebtRatio { name } => {
			let bond = reg.require(name)?;
			let height = client.latest_block_height().await?;
			let resp: serde_json::Value = client
				.query_smart(
					&bond.address,
					&BondQuery::StandardizedDebtRatio { block_height: height + 1 },
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		BondCommand::MaxPayout { name } => {
			let bond = reg.require(name)?;
			let resp: serde_json::Value =
				client.query_smart(&bond.address, &BondQuery::MaxPayout {}).await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		BondCommand::Purchased { name } => {
			let bond = reg.require(name)?;
			let treasury = reg.require(names::TREASURY)?;
			let resp: serde_json::Value = client
				.query_smart(
					&treasury.address,
					&TreasuryQuery::TotalBondDeposited { token: bond.address.clone() },
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		BondCommand::Position { name, key } => {
			let bond = reg.require(name)?;
			let key = match key {
				Some(k) => k.clone(),
				None => {
					let k = create_viewing_key(&client, &bond.address).await?;
					println!("Viewing key: {k}");
					k
				}
			};
			let resp: serde_json::Value = client
				.query_smart(
					&bond.address,
					&BondQuery::BondInfo {
						address: client.address().to_owned(),
						key,
					},
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}
	}
}

/// Send principle to the bond with a deposit hook.
async fn deposit(
	client: &LcdClient,
	reg: &Registry,
	name: &str,
	amount: &str,
	max_price: &str,
) -> Result<()> {
	let bond = reg.require(name)?;
	let principle_name = bond
		.principle
		.as_deref()
		.ok_or_else(|| anyhow!("{name} has no principle recorded; is it a bond?"))?;
	let principle = reg.require(principle_name)?;

	let hook = BondHook::Deposit {
		max_price: max_price.to_owned(),
		depositor: Some(client.address().to_owned()),
	};
	let send = TokenHandle::Send {
		recipient: bond.address.clone(),
		recipient_code_hash: bond.code_hash.clone(),
		amount: amount.to_owned(),
		msg: Some(msg::to_base64(&hook)),
	};
	let resp = client.execute(&principle.address, &send).await?;
	report("Bonded", &resp);
	println!("Vested payout is collected with: fond bond redeem {name}");
	Ok(())
}

/// Decimals of the bond's principle token, for price display.
async fn principle_decimals(
	client: &LcdClient,
	reg: &Registry,
	bond: &ContractEntry,
) -> Result<u8> {
	let principle_name = bond
		.principle
		.as_deref()
		.ok_or_else(|| anyhow!("bond has no principle recorded"))?;
	let principle = reg.require(principle_name)?;
	let info: TokenInfoResponse = client
		.query_smart(&principle.address, &TokenQuery::TokenInfo {})
		.await?;
	Ok(info.token_info.decimals)
}

fn string_at(value: &serde_json::Value, pointer: &str) -> Result<String> {
	value
		.pointer(pointer)
		.and_then(serde_json::Value::as_str)
		.map(str::to_owned)
		.ok_or_else(|| anyhow!("query response missing {pointer}"))
}

/// Display a raw Uint128 amount at the given decimals.
fn scaled(raw: &str, decimals: u8) -> String {
	match raw.parse::<f64>() {
		Ok(v) => format!("{:.4}", v / 10f64.powi(decimals as i32)),
		Err(_) => raw.to_owned(),
	}
}
