use anyhow::Result;

use crate::cli::{Cli, WireCommand};
use crate::client::{LcdClient, TxResponse};
use crate::commands::treasury::grant;
use crate::commands::{build_client, open_registry};
use crate::config::Config;
use crate::msg::{
	BondHandle, ContractRef, DistributorHandle, ManagingRole, StakedTokenHandle, StakingContractType,
	StakingHandle,
};
use crate::registry::{names, Registry};

pub async fn run(cli: &Cli, cmd: &WireCommand) -> Result<()> {
	let config = Config::load()?;
	let client = build_client(cli, &config)?;
	let reg = open_registry(cli)?;

	match cmd {
		WireCommand::Roles => wire_roles(&client, &reg).await,
		WireCommand::Staking { reward_rate } => wire_staking(&client, &reg, reward_rate).await,
		WireCommand::Bond {
			name,
			control_variable,
			vesting_term,
			minimum_price,
			maximum_price,
			max_payout,
			fee,
			max_debt,
			initial_debt,
		} => {
			wire_bond(
				&client,
				&reg,
				name,
				BondHandle::InitializeBondTerms {
					control_variable: control_variable.clone(),
					vesting_term: *vesting_term,
					minimum_price: minimum_price.clone(),
					maximum_price: maximum_price.clone(),
					max_payout: max_payout.clone(),
					fee: fee.clone(),
					max_debt: max_debt.clone(),
					initial_debt: initial_debt.clone(),
				},
			)
			.await
		}
	}
}

/// Grant treasury roles to every deployed bond, the distributor, and
/// the deployer.
async fn wire_roles(client: &LcdClient, reg: &Registry) -> Result<()> {
	let treasury = reg.require(names::TREASURY)?.address.clone();

	for (name, entry) in reg.iter() {
		let Some(principle) = &entry.principle else { continue };
		let role = if principle.ends_with(names::LP_SUFFIX) {
			ManagingRole::LiquidityDepositor
		} else {
			ManagingRole::ReserveDepositor
		};
		println!("Granting {role:?} to {name}...");
		grant(client, &treasury, &entry.address, role).await?;
	}

	let distributor = reg.require(names::DISTRIBUTOR)?.address.clone();
	println!("Granting RewardManager to {}...", names::DISTRIBUTOR);
	grant(client, &treasury, &distributor, ManagingRole::RewardManager).await?;

	// The deployer deposits both reserves and liquidity by hand.
	let deployer = client.address().to_owned();
	println!("Granting depositor roles to the deployer...");
	grant(client, &treasury, &deployer, ManagingRole::ReserveDepositor).await?;
	grant(client, &treasury, &deployer, ManagingRole::LiquidityDepositor).await?;

	Ok(())
}

/// Point every bond at the staking contract, hand the staked token over
/// to staking, and register the distributor and warmup contracts.
async fn wire_staking(client: &LcdClient, reg: &Registry, reward_rate: &str) -> Result<()> {
	let staking: ContractRef = reg.require(names::STAKING)?.into();

	for (name, entry) in reg.iter() {
		if entry.principle.is_none() {
			continue;
		}
		println!("Pointing {name} at staking...");
		let resp = client
			.execute(&entry.address, &BondHandle::SetStaking { staking: staking.clone() })
			.await?;
		report("Set staking", &resp);
	}

	println!("Initializing the staked token...");
	let sohm = reg.require(names::SOHM)?.address.clone();
	let resp = client
		.execute(
			&sohm,
			&StakedTokenHandle::Initialize {
				staking_contract: staking.address.clone(),
			},
		)
		.await?;
	report("Initialized", &resp);

	println!("Registering distributor and warmup with staking...");
	let resp = client
		.execute(
			&staking.address,
			&StakingHandle::SetContract {
				contract_type: StakingContractType::Distributor,
				contract: reg.require(names::DISTRIBUTOR)?.into(),
			},
		)
		.await?;
	report("Distributor", &resp);

	let resp = client
		.execute(
			&staking.address,
			&StakingHandle::SetContract {
				contract_type: StakingContractType::WarmupContract,
				contract: reg.require(names::WARMUP)?.into(),
			},
		)
		.await?;
	report("Warmup", &resp);

	println!("Adding staking as a distributor recipient...");
	let distributor = reg.require(names::DISTRIBUTOR)?.address.clone();
	let resp = client
		.execute(
			&distributor,
			&DistributorHandle::AddRecipient {
				recipient: staking.address.clone(),
				reward_rate: reward_rate.to_owned(),
			},
		)
		.await?;
	report("Recipient", &resp);

	Ok(())
}

/// Initialize a bond's terms, then point it at the staking contract.
async fn wire_bond(client: &LcdClient, reg: &Registry, name: &str, terms: BondHandle) -> Result<()> {
	let bond = reg.require(name)?.address.clone();

	println!("Initializing bond terms for {name}...");
	let resp = client.execute(&bond, &terms).await?;
	report("Terms", &resp);

	let staking: ContractRef = reg.require(names::STAKING)?.into();
	let resp = client
		.execute(&bond, &BondHandle::SetStaking { staking })
		.await?;
	report("Set staking", &resp);

	Ok(())
}

/// One line per transaction, plus the contract's response when it
/// returned JSON data.
pub fn report(label: &str, resp: &TxResponse) {
	println!("{label}: {}", resp.txhash);
	if let Ok(data) = resp.data_json::<serde_json::Value>() {
		println!("{data}");
	}
}
