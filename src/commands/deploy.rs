use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::{Cli, DeployCommand};
use crate::client::LcdClient;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::fees::{Coin, FeeOp};
use crate::msg::{
	self, BondInit, ContractRef, DistributorInit, InitialBalance, Principle, StakedTokenInit,
	StakingInit, TokenHandle, TokenInit, TokenInitConfig, TreasuryInit, WarmupInit,
};
use crate::registry::{names, ContractEntry, Registry};

// Initial staking index.
pub(crate) const INITIAL_INDEX: &str = "7675210820";

// First block epoch occurs.
const FIRST_EPOCH_BLOCK: u64 = 8_961_000;

// What epoch will be first epoch.
const FIRST_EPOCH_NUMBER: u64 = 338;

// How many blocks are in each epoch.
const EPOCH_LENGTH: u64 = 2_200;

// Genesis balance minted to the deployer for each reserve stablecoin.
const INITIAL_RESERVE_MINT: &str = "1000000000";

// Native coin wrapped into the sSCRT token right after deployment.
const INITIAL_WRAP_DEPOSIT: u64 = 100;

pub async fn run(cli: &Cli, cmd: &DeployCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let mut reg = open_registry(cli)?;

	match cmd {
		DeployCommand::Token {
			wasm,
			symbol,
			name,
			decimals,
			initial_balance,
			native,
			id,
		} => {
			let init = token_init(
				&client,
				name,
				symbol,
				*decimals,
				initial_balance.as_deref(),
				*native,
			);
			let id = id.clone().unwrap_or_else(|| symbol.clone());
			let entry = upload_and_instantiate(&client, wasm, &init, &id).await?;
			record(&mut reg, &id, entry)
		}

		DeployCommand::StakedToken {
			wasm,
			name,
			symbol,
			index,
		} => {
			let init = StakedTokenInit {
				name: name.clone(),
				symbol: symbol.clone(),
				decimals: 9,
				index: index.clone().unwrap_or_else(|| INITIAL_INDEX.into()),
				config: TokenInitConfig {
					public_total_supply: Some(true),
					..TokenInitConfig::default()
				},
				prng_seed: msg::random_seed(),
			};
			let entry = upload_and_instantiate(&client, wasm, &init, names::SOHM).await?;
			record(&mut reg, names::SOHM, entry)
		}

		DeployCommand::Treasury {
			wasm,
			name,
			reserves,
			blocks_needed_for_queue,
		} => {
			let reserve_tokens = reserves
				.iter()
				.map(|r| reg.require(r).map(ContractRef::from))
				.collect::<Result<Vec<_>>>()?;
			let init = TreasuryInit {
				name: name.clone(),
				ohm: reg.require(names::OHM)?.into(),
				sohm: reg.require(names::SOHM)?.into(),
				reserve_tokens: Some(reserve_tokens),
				blocks_needed_for_queue: *blocks_needed_for_queue,
				prng_seed: msg::random_seed(),
			};
			let entry = upload_and_instantiate(&client, wasm, &init, names::TREASURY).await?;
			record(&mut reg, names::TREASURY, entry)
		}

		DeployCommand::Calculator { wasm } => {
			let init = msg::CalculatorInit {
				ohm: reg.require(names::OHM)?.into(),
			};
			let entry = upload_and_instantiate(&client, wasm, &init, names::CALCULATOR).await?;
			record(&mut reg, names::CALCULATOR, entry)
		}

		DeployCommand::Distributor {
			wasm,
			epoch_length,
			next_epoch_block,
		} => {
			let init = DistributorInit {
				treasury: reg.require(names::TREASURY)?.into(),
				ohm: reg.require(names::OHM)?.into(),
				epoch_length: epoch_length.unwrap_or(EPOCH_LENGTH),
				next_epoch_block: next_epoch_block.unwrap_or(FIRST_EPOCH_BLOCK),
				prng_seed: msg::random_seed(),
			};
			let entry = upload_and_instantiate(&client, wasm, &init, names::DISTRIBUTOR).await?;
			record(&mut reg, names::DISTRIBUTOR, entry)
		}

		DeployCommand::Staking {
			wasm,
			epoch_length,
			first_epoch_block,
			first_epoch_number,
		} => {
			let init = StakingInit {
				ohm: reg.require(names::OHM)?.into(),
				sohm: reg.require(names::SOHM)?.into(),
				epoch_length: epoch_length.unwrap_or(EPOCH_LENGTH),
				first_epoch_number: first_epoch_number.unwrap_or(FIRST_EPOCH_NUMBER),
				first_epoch_block: first_epoch_block.unwrap_or(FIRST_EPOCH_BLOCK),
				prng_seed: msg::random_seed(),
			};
			let entry = upload_and_instantiate(&client, wasm, &init, names::STAKING).await?;
			record(&mut reg, names::STAKING, entry)
		}

		DeployCommand::Warmup { wasm } => {
			let init = WarmupInit {
				sohm: reg.require(names::SOHM)?.into(),
				staking: reg.require(names::STAKING)?.into(),
			};
			let entry = upload_and_instantiate(&client, wasm, &init, names::WARMUP).await?;
			record(&mut reg, names::WARMUP, entry)
		}

		DeployCommand::Bond {
			wasm,
			principle,
			pair,
			with_calculator,
			dao,
			name,
			symbol,
			id,
		} => {
			let id = id.clone().unwrap_or_else(|| format!("{principle}-bond"));
			let init = bond_init(
				&client,
				&reg,
				principle,
				pair.as_deref(),
				*with_calculator,
				dao.as_deref(),
				name.as_deref(),
				symbol.as_deref(),
			)?;
			let mut entry = upload_and_instantiate(&client, wasm, &init, &id).await?;
			entry.principle = Some(principle.clone());
			record(&mut reg, &id, entry)
		}

		DeployCommand::All { wasm_dir, dao } => deploy_all(&client, &mut reg, wasm_dir, dao.as_deref()).await,
	}
}

/// The whole protocol in one run, writing the registry after every step
/// so a failed run can be continued contract by contract.
async fn deploy_all(
	client: &LcdClient,
	reg: &mut Registry,
	wasm_dir: &str,
	dao: Option<&str>,
) -> Result<()> {
	let dir = Path::new(wasm_dir);
	let snip20 = dir.join("snip20.wasm");
	let snip20 = snip20.to_string_lossy();

	// The reserve token.
	let init = token_init(client, "FondCommun", "FCT", 9, None, false);
	let entry = upload_and_instantiate(client, &snip20, &init, names::OHM).await?;
	record(reg, names::OHM, entry)?;

	// Reserve stablecoin, pre-minted to the deployer.
	let init = token_init(client, "FondCommun", "SUST", 12, Some(INITIAL_RESERVE_MINT), false);
	let entry = upload_and_instantiate(client, &snip20, &init, names::SUST).await?;
	record(reg, names::SUST, entry)?;

	// Wrapped native coin.
	let init = token_init(client, "FondCommun", "SSCRT", 9, None, true);
	let entry = upload_and_instantiate(client, &snip20, &init, names::SSCRT).await?;
	let sscrt_address = entry.address.clone();
	record(reg, names::SSCRT, entry)?;

	// Wrap a little native coin so the treasury has something to audit.
	println!("Wrapping {INITIAL_WRAP_DEPOSIT} uscrt into {}...", names::SSCRT);
	client
		.execute_with(
			&sscrt_address,
			&TokenHandle::Deposit {},
			vec![Coin::uscrt(INITIAL_WRAP_DEPOSIT)],
			client.fees().default_fee(FeeOp::Exec).clone(),
		)
		.await?;

	// The rebasing staked token.
	let init = StakedTokenInit {
		name: "Staked Fund".into(),
		symbol: "SOHM".into(),
		decimals: 9,
		index: INITIAL_INDEX.into(),
		config: TokenInitConfig {
			public_total_supply: Some(true),
			..TokenInitConfig::default()
		},
		prng_seed: msg::random_seed(),
	};
	let entry = upload_and_instantiate(client, &dir.join("s-ohm.wasm").to_string_lossy(), &init, names::SOHM).await?;
	record(reg, names::SOHM, entry)?;

	// Treasury over both reserve tokens.
	let init = TreasuryInit {
		name: "Fund treasury".into(),
		ohm: reg.require(names::OHM)?.into(),
		sohm: reg.require(names::SOHM)?.into(),
		reserve_tokens: Some(vec![
			reg.require(names::SUST)?.into(),
			reg.require(names::SSCRT)?.into(),
		]),
		blocks_needed_for_queue: 0,
		prng_seed: msg::random_seed(),
	};
	let entry = upload_and_instantiate(
		client,
		&dir.join("treasury.wasm").to_string_lossy(),
		&init,
		names::TREASURY,
	)
	.await?;
	record(reg, names::TREASURY, entry)?;

	let init = msg::CalculatorInit {
		ohm: reg.require(names::OHM)?.into(),
	};
	let entry = upload_and_instantiate(
		client,
		&dir.join("bond-calculator.wasm").to_string_lossy(),
		&init,
		names::CALCULATOR,
	)
	.await?;
	record(reg, names::CALCULATOR, entry)?;

	let init = DistributorInit {
		treasury: reg.require(names::TREASURY)?.into(),
		ohm: reg.require(names::OHM)?.into(),
		epoch_length: EPOCH_LENGTH,
		next_epoch_block: FIRST_EPOCH_BLOCK,
		prng_seed: msg::random_seed(),
	};
	let entry = upload_and_instantiate(
		client,
		&dir.join("staking-distributor.wasm").to_string_lossy(),
		&init,
		names::DISTRIBUTOR,
	)
	.await?;
	record(reg, names::DISTRIBUTOR, entry)?;

	let init = StakingInit {
		ohm: reg.require(names::OHM)?.into(),
		sohm: reg.require(names::SOHM)?.into(),
		epoch_length: EPOCH_LENGTH,
		first_epoch_number: FIRST_EPOCH_NUMBER,
		first_epoch_block: FIRST_EPOCH_BLOCK,
		prng_seed: msg::random_seed(),
	};
	let entry = upload_and_instantiate(
		client,
		&dir.join("staking.wasm").to_string_lossy(),
		&init,
		names::STAKING,
	)
	.await?;
	record(reg, names::STAKING, entry)?;

	let init = WarmupInit {
		sohm: reg.require(names::SOHM)?.into(),
		staking: reg.require(names::STAKING)?.into(),
	};
	let entry = upload_and_instantiate(
		client,
		&dir.join("staking-warmup.wasm").to_string_lossy(),
		&init,
		names::WARMUP,
	)
	.await?;
	record(reg, names::WARMUP, entry)?;

	// Reserve bonds for both stablecoins.
	let bond_wasm = dir.join("bond-depository.wasm");
	let bond_wasm = bond_wasm.to_string_lossy();
	for (principle, id) in [(names::SUST, names::SUST_BOND), (names::SSCRT, names::SSCRT_BOND)] {
		let init = bond_init(client, reg, principle, None, false, dao, None, None)?;
		let mut entry = upload_and_instantiate(client, &bond_wasm, &init, id).await?;
		entry.principle = Some(principle.into());
		record(reg, id, entry)?;
	}

	println!();
	println!("Protocol deployed. Next: fond wire roles && fond wire staking.");
	Ok(())
}

// -- Init builders --

fn token_init(
	client: &LcdClient,
	name: &str,
	symbol: &str,
	decimals: u8,
	initial_balance: Option<&str>,
	native: bool,
) -> TokenInit {
	let initial_balances = match initial_balance {
		Some(amount) => vec![InitialBalance {
			address: client.address().to_owned(),
			amount: amount.to_owned(),
		}],
		None => vec![],
	};
	TokenInit {
		name: name.to_owned(),
		symbol: symbol.to_owned(),
		decimals,
		initial_balances,
		config: TokenInitConfig {
			public_total_supply: Some(true),
			enable_mint: Some(true),
			enable_burn: Some(true),
			enable_deposit: native.then_some(true),
			enable_redeem: native.then_some(true),
		},
		prng_seed: msg::random_seed(),
	}
}

#[allow(clippy::too_many_arguments)]
fn bond_init(
	client: &LcdClient,
	reg: &Registry,
	principle: &str,
	pair: Option<&str>,
	with_calculator: bool,
	dao: Option<&str>,
	name: Option<&str>,
	symbol: Option<&str>,
) -> Result<BondInit> {
	let principle_ref: ContractRef = reg.require(principle)?.into();
	let pair_ref = match pair {
		Some(p) => Some(reg.require(p)?.into()),
		None => None,
	};
	let calculator = if with_calculator {
		Some(reg.require(names::CALCULATOR)?.into())
	} else {
		None
	};

	Ok(BondInit {
		name: name
			.map(str::to_owned)
			.unwrap_or_else(|| format!("{principle} bond")),
		symbol: symbol.map(str::to_owned).unwrap_or_else(|| "BOND".into()),
		ohm: reg.require(names::OHM)?.into(),
		principle: Principle {
			token: principle_ref,
			pair: pair_ref,
		},
		treasury: reg.require(names::TREASURY)?.into(),
		dao: dao.unwrap_or(client.address()).to_owned(),
		bond_calculator: calculator,
		prng_seed: msg::random_seed(),
	})
}

// -- Shared plumbing --

/// Upload a wasm file and instantiate it, reporting each step.
pub async fn upload_and_instantiate(
	client: &LcdClient,
	wasm_path: &str,
	init_msg: &impl serde::Serialize,
	label: &str,
) -> Result<ContractEntry> {
	let wasm = std::fs::read(wasm_path).with_context(|| format!("reading wasm {wasm_path}"))?;

	println!("Uploading {label}...");
	let (code_id, code_hash) = client.store_code(&wasm, label).await?;
	println!("Code id:   {code_id}");
	println!("Code hash: {code_hash}");

	let address = client.instantiate(code_id, init_msg, label).await?;
	println!("Address:   {address}");
	println!();

	Ok(ContractEntry {
		code_id,
		code_hash,
		address,
		principle: None,
	})
}

/// Insert into the registry and rewrite it immediately.
fn record(reg: &mut Registry, name: &str, entry: ContractEntry) -> Result<()> {
	reg.insert(name, entry);
	reg.save()?;
	println!("Recorded {name} in {}", reg.path().display());
	Ok(())
}
