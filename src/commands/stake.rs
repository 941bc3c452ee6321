use anyhow::Result;

use crate::cli::{Cli, StakeCommand};
use crate::commands::deploy::INITIAL_INDEX;
use crate::commands::wire::report;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::msg::{self, StakedTokenQuery, StakingHandle, StakingHook, StakingQuery, TokenHandle};
use crate::registry::names;

pub async fn run(cli: &Cli, cmd: &StakeCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let reg = open_registry(cli)?;

	match cmd {
		StakeCommand::Deposit { amount, recipient } => {
			let staking = reg.require(names::STAKING)?;
			let ohm = reg.require(names::OHM)?;
			let recipient = recipient.clone().unwrap_or_else(|| client.address().to_owned());

			let hook = StakingHook::Stake { recipient };
			let send = TokenHandle::Send {
				recipient: staking.address.clone(),
				recipient_code_hash: staking.code_hash.clone(),
				amount: amount.clone(),
				msg: Some(msg::to_base64(&hook)),
			};
			let resp = client.execute(&ohm.address, &send).await?;
			report("Staked", &resp);
			println!("Warmed-up stake is released with: fond stake claim");
			Ok(())
		}

		StakeCommand::Unstake { amount, trigger } => {
			let staking = reg.require(names::STAKING)?;
			let sohm = reg.require(names::SOHM)?;

			let hook = StakingHook::Unstake { trigger: *trigger };
			let send = TokenHandle::Send {
				recipient: staking.address.clone(),
				recipient_code_hash: staking.code_hash.clone(),
				amount: amount.clone(),
				msg: Some(msg::to_base64(&hook)),
			};
			let resp = client.execute(&sohm.address, &send).await?;
			report("Unstaked", &resp);
			Ok(())
		}

		StakeCommand::Claim { recipient } => {
			let staking = reg.require(names::STAKING)?;
			let recipient = recipient.clone().unwrap_or_else(|| client.address().to_owned());
			let resp = client
				.execute(&staking.address, &StakingHandle::Claim { recipient })
				.await?;
			report("Claimed", &resp);
			Ok(())
		}

		StakeCommand::Rebase => {
			let staking = reg.require(names::STAKING)?;
			let resp = client.execute(&staking.address, &StakingHandle::Rebase {}).await?;
			report("Rebased", &resp);
			Ok(())
		}

		StakeCommand::SetWarmupPeriod { period } => {
			let staking = reg.require(names::STAKING)?;
			let resp = client
				.execute(
					&staking.address,
					&StakingHandle::SetWarmupPeriod { warmup_period: *period },
				)
				.await?;
			report("Warmup period set", &resp);
			Ok(())
		}

		StakeCommand::Info => {
			let staking = reg.require(names::STAKING)?;
			let info: serde_json::Value = client
				.query_smart(&staking.address, &StakingQuery::ContractInfo {})
				.await?;
			println!("{}", serde_json::to_string_pretty(&info)?);
			Ok(())
		}

		StakeCommand::Epoch => {
			let staking = reg.require(names::STAKING)?;
			let epoch: serde_json::Value =
				client.query_smart(&staking.address, &StakingQuery::Epoch {}).await?;
			println!("{}", serde_json::to_string_pretty(&epoch)?);
			Ok(())
		}

		StakeCommand::Index => {
			let staking = reg.require(names::STAKING)?;
			let resp: serde_json::Value =
				client.query_smart(&staking.address, &StakingQuery::Index {}).await?;
			let index = resp
				.pointer("/index/index")
				.and_then(serde_json::Value::as_str)
				.unwrap_or("?");
			println!("Index: {index}");
			if let (Ok(raw), Ok(initial)) = (index.parse::<f64>(), INITIAL_INDEX.parse::<f64>()) {
				println!("Growth since genesis: {:.6}", raw / initial);
			}
			Ok(())
		}

		StakeCommand::ContractBalance => {
			let staking = reg.require(names::STAKING)?;
			let resp: serde_json::Value = client
				.query_smart(&staking.address, &StakingQuery::ContractBalance {})
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		StakeCommand::CirculatingSupply => {
			let sohm = reg.require(names::SOHM)?;
			let resp: serde_json::Value = client
				.query_smart(&sohm.address, &StakedTokenQuery::CirculatingSupply {})
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		StakeCommand::Gons { amount } => {
			let sohm = reg.require(names::SOHM)?;
			let resp: serde_json::Value = client
				.query_smart(
					&sohm.address,
					&StakedTokenQuery::GonsForBalance { amount: amount.clone() },
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		StakeCommand::BalanceForGons { gons } => {
			let sohm = reg.require(names::SOHM)?;
			let resp: serde_json::Value = client
				.query_smart(
					&sohm.address,
					&StakedTokenQuery::BalanceForGons { gons: gons.clone() },
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}

		StakeCommand::RebaseHistory { page_size, page } => {
			let sohm = reg.require(names::SOHM)?;
			let resp: serde_json::Value = client
				.query_smart(
					&sohm.address,
					&StakedTokenQuery::RebaseHistory {
						page_size: *page_size,
						page: *page,
					},
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}
	}
}
