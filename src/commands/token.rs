use anyhow::{bail, Result};

use crate::cli::{Cli, TokenCommand};
use crate::client::LcdClient;
use crate::commands::wire::report;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::msg::{
	BalanceResponse, TokenHandle, TokenInfoResponse, TokenQuery, ViewingKeyResponse,
};

pub async fn run(cli: &Cli, cmd: &TokenCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let reg = open_registry(cli)?;

	match cmd {
		TokenCommand::Info { token } => {
			let token = reg.require(token)?;
			let info: TokenInfoResponse =
				client.query_smart(&token.address, &TokenQuery::TokenInfo {}).await?;
			let info = info.token_info;
			println!("Name:         {}", info.name);
			println!("Symbol:       {}", info.symbol);
			println!("Decimals:     {}", info.decimals);
			println!(
				"Total supply: {}",
				info.total_supply.as_deref().unwrap_or("hidden")
			);
			Ok(())
		}

		TokenCommand::Balance {
			token,
			address,
			key,
		} => {
			let token = reg.require(token)?;
			let target = address.clone().unwrap_or_else(|| client.address().to_owned());

			let key = match key {
				Some(k) => k.clone(),
				None if address.is_none() => {
					let k = create_viewing_key(&client, &token.address).await?;
					println!("Viewing key: {k}");
					k
				}
				None => bail!("a viewing key is required to query another account's balance"),
			};

			let resp: BalanceResponse = client
				.query_smart(
					&token.address,
					&TokenQuery::Balance {
						address: target.clone(),
						key,
					},
				)
				.await?;
			println!("Balance of {target}: {}", resp.balance.amount);
			Ok(())
		}

		TokenCommand::CreateKey { token } => {
			let token = reg.require(token)?;
			let key = create_viewing_key(&client, &token.address).await?;
			println!("Viewing key: {key}");
			Ok(())
		}

		TokenCommand::Transfer {
			token,
			recipient,
			amount,
		} => {
			let token = reg.require(token)?;
			let resp = client
				.execute(
					&token.address,
					&TokenHandle::Transfer {
						recipient: recipient.clone(),
						amount: amount.clone(),
					},
				)
				.await?;
			report("Transferred", &resp);
			Ok(())
		}

		TokenCommand::Send {
			token,
			recipient,
			amount,
		} => {
			let token = reg.require(token)?;
			let target = reg.require(recipient)?;
			let resp = client
				.execute(
					&token.address,
					&TokenHandle::Send {
						recipient: target.address.clone(),
						recipient_code_hash: target.code_hash.clone(),
						amount: amount.clone(),
						msg: None,
					},
				)
				.await?;
			report("Sent", &resp);
			Ok(())
		}

		TokenCommand::IncreaseAllowance {
			token,
			spender,
			amount,
		} => {
			let token = reg.require(token)?;
			let resp = client
				.execute(
					&token.address,
					&TokenHandle::IncreaseAllowance {
						spender: spender.clone(),
						amount: amount.clone(),
					},
				)
				.await?;
			report("Allowance increased", &resp);
			Ok(())
		}

		TokenCommand::History {
			token,
			page_size,
			page,
			key,
		} => {
			let token = reg.require(token)?;
			let key = match key {
				Some(k) => k.clone(),
				None => {
					let k = create_viewing_key(&client, &token.address).await?;
					println!("Viewing key: {k}");
					k
				}
			};
			let resp: serde_json::Value = client
				.query_smart(
					&token.address,
					&TokenQuery::TransactionHistory {
						address: client.address().to_owned(),
						key,
						page: *page,
						page_size: *page_size,
					},
				)
				.await?;
			println!("{}", serde_json::to_string_pretty(&resp)?);
			Ok(())
		}
	}
}

/// Create a viewing key on a contract and return it.  Works for any
/// contract exposing the snip-20 `create_viewing_key` interface (tokens
/// and bond depositories alike).
pub(crate) async fn create_viewing_key(client: &LcdClient, contract: &str) -> Result<String> {
	let entropy = hex::encode(rand::random::<[u8; 16]>());
	let resp = client
		.execute(contract, &TokenHandle::CreateViewingKey { entropy })
		.await?;
	let answer: ViewingKeyResponse = resp.data_json()?;
	Ok(answer.create_viewing_key.key)
}
