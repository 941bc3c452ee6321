use anyhow::{anyhow, Context, Result};

use crate::cli::{Cli, SwapCommand};
use crate::client::LcdClient;
use crate::commands::wire::report;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::msg::{
	self, Asset, AssetInfo, ContractRef, FactoryHandle, FactoryInit, PairHandle, TokenHandle,
};
use crate::registry::{names, ContractEntry, Registry};

pub async fn run(cli: &Cli, cmd: &SwapCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let mut reg = open_registry(cli)?;

	match cmd {
		SwapCommand::DeployFactory {
			pair_wasm,
			token_wasm,
			factory_wasm,
		} => deploy_factory(&client, &mut reg, pair_wasm, token_wasm, factory_wasm).await,

		SwapCommand::CreatePair { token_a, token_b } => {
			create_pair(&client, &mut reg, token_a, token_b).await
		}

		SwapCommand::ProvideLiquidity {
			token_a,
			amount_a,
			token_b,
			amount_b,
		} => provide_liquidity(&client, &reg, token_a, amount_a, token_b, amount_b).await,
	}
}

/// Upload the pair and LP token code, then instantiate the factory
/// that will stamp out pairs from them.
async fn deploy_factory(
	client: &LcdClient,
	reg: &mut Registry,
	pair_wasm: &str,
	token_wasm: &str,
	factory_wasm: &str,
) -> Result<()> {
	let pair = std::fs::read(pair_wasm).with_context(|| format!("reading wasm {pair_wasm}"))?;
	println!("Uploading pair code...");
	let (pair_code_id, pair_code_hash) = client.store_code(&pair, "pair").await?;
	println!("Code id: {pair_code_id}");

	let token = std::fs::read(token_wasm).with_context(|| format!("reading wasm {token_wasm}"))?;
	println!("Uploading LP token code...");
	let (token_code_id, token_code_hash) = client.store_code(&token, "lp-token").await?;
	println!("Code id: {token_code_id}");

	let init = FactoryInit {
		pair_code_id,
		token_code_id,
		pair_code_hash,
		token_code_hash,
		prng_seed: msg::random_seed(),
	};
	let entry = crate::commands::deploy::upload_and_instantiate(
		client,
		factory_wasm,
		&init,
		names::PAIR_FACTORY,
	)
	.await?;
	reg.insert(names::PAIR_FACTORY, entry);
	reg.save()?;
	println!("Recorded {} in {}", names::PAIR_FACTORY, reg.path().display());
	Ok(())
}

/// Ask the factory for a new pair and record the pair contract and its
/// LP token in the registry.
async fn create_pair(
	client: &LcdClient,
	reg: &mut Registry,
	token_a: &str,
	token_b: &str,
) -> Result<()> {
	let factory = reg.require(names::PAIR_FACTORY)?.address.clone();
	let a = reg.require(token_a)?;
	let b = reg.require(token_b)?;

	let create = FactoryHandle::CreatePair {
		asset_infos: vec![
			AssetInfo::token(&ContractRef::from(a)),
			AssetInfo::token(&ContractRef::from(b)),
		],
	};
	let resp = client.execute(&factory, &create).await?;
	report("Pair created", &resp);

	let pair_address = resp
		.log_attribute("pair_contract_addr")
		.ok_or_else(|| anyhow!("create_pair logs missing pair_contract_addr"))?;
	let lp_address = resp
		.log_attribute("liquidity_token_addr")
		.ok_or_else(|| anyhow!("create_pair logs missing liquidity_token_addr"))?;

	let (pair_code_id, pair_code_hash) = client.contract_code_hash(&pair_address).await?;
	let (lp_code_id, lp_code_hash) = client.contract_code_hash(&lp_address).await?;

	let pair_name = format!("{token_a}-{token_b}{}", names::PAIR_SUFFIX);
	let lp_name = format!("{token_a}-{token_b}{}", names::LP_SUFFIX);

	reg.insert(
		&pair_name,
		ContractEntry {
			code_id: pair_code_id,
			code_hash: pair_code_hash,
			address: pair_address,
			principle: None,
		},
	);
	reg.insert(
		&lp_name,
		ContractEntry {
			code_id: lp_code_id,
			code_hash: lp_code_hash,
			address: lp_address,
			principle: None,
		},
	);
	reg.save()?;
	println!("Recorded {pair_name} and {lp_name} in {}", reg.path().display());
	Ok(())
}

/// Allow the pair to pull both sides, then deposit them as liquidity.
async fn provide_liquidity(
	client: &LcdClient,
	reg: &Registry,
	token_a: &str,
	amount_a: &str,
	token_b: &str,
	amount_b: &str,
) -> Result<()> {
	let pair = find_pair(reg, token_a, token_b)?;
	let a = reg.require(token_a)?;
	let b = reg.require(token_b)?;

	for (token, amount) in [(a, amount_a), (b, amount_b)] {
		let resp = client
			.execute(
				&token.address,
				&TokenHandle::IncreaseAllowance {
					spender: pair.address.clone(),
					amount: amount.to_owned(),
				},
			)
			.await?;
		report("Allowance", &resp);
	}

	let provide = PairHandle::ProvideLiquidity {
		assets: vec![
			Asset {
				info: AssetInfo::token(&ContractRef::from(a)),
				amount: amount_a.to_owned(),
			},
			Asset {
				info: AssetInfo::token(&ContractRef::from(b)),
				amount: amount_b.to_owned(),
			},
		],
	};
	let resp = client.execute(&pair.address, &provide).await?;
	report("Liquidity provided", &resp);
	Ok(())
}

/// Pair entry for two tokens, in either order.
fn find_pair<'a>(reg: &'a Registry, token_a: &str, token_b: &str) -> Result<&'a ContractEntry> {
	let forward = format!("{token_a}-{token_b}{}", names::PAIR_SUFFIX);
	let reverse = format!("{token_b}-{token_a}{}", names::PAIR_SUFFIX);
	reg.get(&forward)
		.or_else(|| reg.get(&reverse))
		.ok_or_else(|| anyhow!("no pair registered for {token_a}/{token_b}; run swap create-pair"))
}
