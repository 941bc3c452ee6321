use clap::{Parser, Subcommand, ValueEnum};

use crate::msg::{BondParameter, ManagingRole};

#[derive(Parser)]
#[command(
	name = "fond",
	about = "Deploy and operate the FondCommun staking/bonding protocol.",
	version
)]
pub struct Cli {
	/// Network to connect to.
	#[arg(long, default_value = "local", global = true)]
	pub network: Network,

	/// Override LCD endpoint URL.
	#[arg(long, global = true)]
	pub url: Option<String>,

	/// Override chain id used for signing.
	#[arg(long, global = true)]
	pub chain_id: Option<String>,

	/// Environment variable holding the signing mnemonic.
	#[arg(long, global = true)]
	pub mnemonic_env: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Clone, ValueEnum)]
pub enum Network {
	Local,
	Testnet,
}

impl Network {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Local => "local",
			Self::Testnet => "testnet",
		}
	}
}

/// Treasury role names as CLI values.
#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
	ReserveDepositor,
	ReserveSpender,
	ReserveToken,
	ReserveManager,
	LiquidityDepositor,
	LiquidityToken,
	LiquidityManager,
	Debtor,
	RewardManager,
	Sohm,
}

impl From<RoleArg> for ManagingRole {
	fn from(arg: RoleArg) -> Self {
		match arg {
			RoleArg::ReserveDepositor => Self::ReserveDepositor,
			RoleArg::ReserveSpender => Self::ReserveSpender,
			RoleArg::ReserveToken => Self::ReserveToken,
			RoleArg::ReserveManager => Self::ReserveManager,
			RoleArg::LiquidityDepositor => Self::LiquidityDepositor,
			RoleArg::LiquidityToken => Self::LiquidityToken,
			RoleArg::LiquidityManager => Self::LiquidityManager,
			RoleArg::Debtor => Self::Debtor,
			RoleArg::RewardManager => Self::RewardManager,
			RoleArg::Sohm => Self::SOHM,
		}
	}
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BondParamArg {
	Vesting,
	Payout,
	Fee,
	Debt,
}

impl From<BondParamArg> for BondParameter {
	fn from(arg: BondParamArg) -> Self {
		match arg {
			BondParamArg::Vesting => Self::Vesting,
			BondParamArg::Payout => Self::Payout,
			BondParamArg::Fee => Self::Fee,
			BondParamArg::Debt => Self::Debt,
		}
	}
}

#[derive(Subcommand)]
pub enum Command {
	/// Upload and instantiate protocol contracts.
	Deploy {
		#[command(subcommand)]
		command: DeployCommand,
	},

	/// Post-deployment wiring: roles, staking hookup, bond terms.
	Wire {
		#[command(subcommand)]
		command: WireCommand,
	},

	/// Stake, unstake, and query the staking contract.
	Stake {
		#[command(subcommand)]
		command: StakeCommand,
	},

	/// Bond principle tokens and manage bond depositories.
	Bond {
		#[command(subcommand)]
		command: BondCommand,
	},

	/// Treasury roles, reserve management, and queries.
	Treasury {
		#[command(subcommand)]
		command: TreasuryCommand,
	},

	/// Token balances, transfers, and viewing keys.
	Token {
		#[command(subcommand)]
		command: TokenCommand,
	},

	/// Swap factory and liquidity operations.
	Swap {
		#[command(subcommand)]
		command: SwapCommand,
	},

	/// Chain-level status and native transfers.
	Chain {
		#[command(subcommand)]
		command: ChainCommand,
	},

	/// Inspect the deployed-contract registry.
	Registry {
		#[command(subcommand)]
		command: RegistryCommand,
	},
}

// -- Deploy subcommands --

#[derive(Subcommand)]
pub enum DeployCommand {
	/// Deploy a snip-20 token.
	Token {
		/// Path to the compiled snip-20 wasm.
		#[arg(long)]
		wasm: String,

		/// Token symbol.
		#[arg(long)]
		symbol: String,

		/// Token name.
		#[arg(long, default_value = "FondCommun")]
		name: String,

		#[arg(long, default_value = "9")]
		decimals: u8,

		/// Mint this amount to the deployer at genesis.
		#[arg(long)]
		initial_balance: Option<String>,

		/// Enable native deposit/redeem (wrapped-coin token).
		#[arg(long)]
		native: bool,

		/// Registry name (defaults to the symbol).
		#[arg(long)]
		id: Option<String>,
	},

	/// Deploy the rebasing staked token.
	StakedToken {
		#[arg(long)]
		wasm: String,

		#[arg(long, default_value = "Staked Fund")]
		name: String,

		#[arg(long, default_value = "SOHM")]
		symbol: String,

		/// Initial rebase index.
		#[arg(long)]
		index: Option<String>,
	},

	/// Deploy the treasury, registering reserve tokens from the registry.
	Treasury {
		#[arg(long)]
		wasm: String,

		#[arg(long, default_value = "Fund treasury")]
		name: String,

		/// Registry names of the initial reserve tokens.
		#[arg(long, value_delimiter = ',', default_values_t = vec!["sUST".to_string(), "sSCRT".to_string()])]
		reserves: Vec<String>,

		#[arg(long, default_value = "0")]
		blocks_needed_for_queue: u64,
	},

	/// Deploy the LP bond calculator.
	Calculator {
		#[arg(long)]
		wasm: String,
	},

	/// Deploy the staking distributor.
	Distributor {
		#[arg(long)]
		wasm: String,

		/// Blocks per reward epoch.
		#[arg(long)]
		epoch_length: Option<u64>,

		#[arg(long)]
		next_epoch_block: Option<u64>,
	},

	/// Deploy the staking contract.
	Staking {
		#[arg(long)]
		wasm: String,

		#[arg(long)]
		epoch_length: Option<u64>,

		#[arg(long)]
		first_epoch_block: Option<u64>,

		#[arg(long)]
		first_epoch_number: Option<u64>,
	},

	/// Deploy the staking warmup holder.
	Warmup {
		#[arg(long)]
		wasm: String,
	},

	/// Deploy a bond depository for a principle token.
	Bond {
		#[arg(long)]
		wasm: String,

		/// Registry name of the principle token.
		#[arg(long)]
		principle: String,

		/// Registry name of the principle's swap pair (LP bonds only).
		#[arg(long)]
		pair: Option<String>,

		/// Attach the bond calculator (LP bonds only).
		#[arg(long)]
		with_calculator: bool,

		/// DAO address receiving bond fees (defaults to the deployer).
		#[arg(long)]
		dao: Option<String>,

		#[arg(long)]
		name: Option<String>,

		#[arg(long)]
		symbol: Option<String>,

		/// Registry name (defaults to "<principle>-bond").
		#[arg(long)]
		id: Option<String>,
	},

	/// Deploy the full protocol: tokens, staked token, treasury,
	/// calculator, distributor, staking, warmup, and reserve bonds.
	All {
		/// Directory containing the compiled contract wasm files.
		#[arg(long)]
		wasm_dir: String,

		/// DAO address receiving bond fees (defaults to the deployer).
		#[arg(long)]
		dao: Option<String>,
	},
}

// -- Wire subcommands --

#[derive(Subcommand)]
pub enum WireCommand {
	/// Grant treasury roles to the deployed bonds, the distributor,
	/// and the deployer.
	Roles,

	/// Hook up staking: point bonds at the staking contract,
	/// initialize the staked token, and register the distributor
	/// and warmup contracts.
	Staking {
		/// Reward rate for the staking recipient, in ten-thousandths.
		#[arg(long, default_value = "3000")]
		reward_rate: String,
	},

	/// Initialize a bond's terms and staking hookup.
	Bond {
		/// Registry name of the bond.
		name: String,

		/// Bond control variable (BCV).
		#[arg(long, default_value = "369")]
		control_variable: String,

		/// Vesting length in blocks.
		#[arg(long, default_value = "33110")]
		vesting_term: u64,

		#[arg(long, default_value = "0")]
		minimum_price: String,

		#[arg(long, default_value = "1000")]
		maximum_price: String,

		/// Max payout as a fraction of supply.
		#[arg(long, default_value = "50")]
		max_payout: String,

		/// DAO fee on bond payouts.
		#[arg(long, default_value = "10000")]
		fee: String,

		#[arg(long, default_value = "1000000000000000")]
		max_debt: String,

		#[arg(long, default_value = "0")]
		initial_debt: String,
	},
}

// -- Stake subcommands --

#[derive(Subcommand)]
pub enum StakeCommand {
	/// Send reserve tokens to the staking contract with a stake hook.
	Deposit {
		/// Amount in raw token units.
		amount: String,

		/// Recipient of the staked balance (defaults to the sender).
		#[arg(long)]
		recipient: Option<String>,
	},

	/// Send staked tokens back with an unstake hook.
	Unstake {
		amount: String,

		/// Trigger a rebase while unstaking.
		#[arg(long)]
		trigger: bool,
	},

	/// Claim warmed-up stake.
	Claim {
		#[arg(long)]
		recipient: Option<String>,
	},

	/// Trigger a rebase if the epoch is over.
	Rebase,

	/// Set the warmup period (admin).
	SetWarmupPeriod { period: u64 },

	/// Show the staking contract's configuration.
	Info,

	/// Show the current epoch.
	Epoch,

	/// Show the current rebase index.
	Index,

	/// Show the staking contract's token balance.
	ContractBalance,

	/// Circulating supply of the staked token.
	CirculatingSupply,

	/// Gons backing a staked-token amount.
	Gons { amount: String },

	/// Staked-token balance for an amount of gons.
	BalanceForGons { gons: String },

	/// Page through past rebases.
	RebaseHistory {
		#[arg(long, default_value = "10")]
		page_size: u32,

		#[arg(long)]
		page: Option<u32>,
	},
}

// -- Bond subcommands --

#[derive(Subcommand)]
pub enum BondCommand {
	/// Send principle to a bond depository with a deposit hook.
	Deposit {
		/// Registry name of the bond.
		name: String,

		/// Amount of principle in raw token units.
		amount: String,

		/// Highest acceptable bond price.
		#[arg(long, default_value = "60000000")]
		max_price: String,
	},

	/// Redeem vested bond payout.
	Redeem {
		name: String,

		/// Stake the payout instead of receiving it.
		#[arg(long)]
		stake: bool,
	},

	/// Show the bond's configuration.
	Info { name: String },

	/// Show the bond's terms.
	Terms { name: String },

	/// Change one bond term (admin).
	SetTerm {
		name: String,

		#[arg(long)]
		parameter: BondParamArg,

		#[arg(long)]
		value: String,
	},

	/// Schedule a BCV adjustment (admin).
	SetAdjustment {
		name: String,

		/// Increase the control variable (decrease when absent).
		#[arg(long)]
		addition: bool,

		#[arg(long)]
		increment: String,

		#[arg(long)]
		target: String,

		/// Blocks between adjustment steps.
		#[arg(long, default_value = "1")]
		buffer: u64,
	},

	/// Point the bond at the staking contract (admin).
	SetStaking { name: String },

	/// Bond price in principle units at the next block.
	Price { name: String },

	/// Bond price in USD at the next block.
	PriceUsd { name: String },

	/// Standardized debt ratio at the next block.
	DebtRatio { name: String },

	/// Largest payout a single deposit can take.
	MaxPayout { name: String },

	/// Total principle the treasury has taken in for this bond.
	Purchased { name: String },

	/// Show the caller's bond position (viewing-key query).
	Position {
		name: String,

		/// Reuse an existing viewing key instead of creating one.
		#[arg(long)]
		key: Option<String>,
	},
}

// -- Treasury subcommands --

#[derive(Subcommand)]
pub enum TreasuryCommand {
	/// Queue and toggle a role for an address.
	Grant {
		address: String,

		#[arg(long)]
		role: RoleArg,
	},

	/// Queue and toggle a token role (reserve/liquidity token).
	GrantToken {
		/// Registry name of the token.
		token: String,

		#[arg(long)]
		role: RoleArg,

		/// Attach the bond calculator (liquidity tokens).
		#[arg(long)]
		with_calculator: bool,
	},

	/// Queue a role change without toggling it.
	Queue {
		address: String,

		#[arg(long)]
		role: RoleArg,
	},

	/// Toggle a previously queued role change.
	Toggle {
		address: String,

		#[arg(long)]
		role: RoleArg,
	},

	/// Withdraw excess reserves for management (ReserveManager).
	Manage {
		/// Registry name of the reserve token.
		token: String,

		amount: String,
	},

	/// Withdraw reserves against burned supply (ReserveSpender).
	Withdraw {
		token: String,
		amount: String,
	},

	/// Borrow reserves against staked collateral (Debtor).
	IncurDebt {
		token: String,
		amount: String,
	},

	/// Mint rewards against excess reserves (RewardManager).
	MintRewards {
		/// Registry name of the token to mint.
		token: String,

		amount: String,
	},

	/// Recompute tracked reserves from token balances.
	Audit,

	/// Show treasury configuration and totals.
	Info,

	/// List addresses holding a role.
	Managers {
		#[arg(long)]
		role: RoleArg,
	},

	/// List tokens registered under a role.
	Contracts {
		#[arg(long)]
		role: RoleArg,
	},

	/// Treasury valuation of a token amount.
	ValueOf {
		/// Registry name of the token.
		token: String,

		amount: String,
	},
}

// -- Token subcommands --

#[derive(Subcommand)]
pub enum TokenCommand {
	/// Show name, symbol, decimals, and total supply.
	Info { token: String },

	/// Query a balance, creating a viewing key if none is given.
	Balance {
		/// Registry name of the token.
		token: String,

		/// Address to query (defaults to the caller).
		#[arg(long)]
		address: Option<String>,

		/// Existing viewing key.
		#[arg(long)]
		key: Option<String>,
	},

	/// Create a viewing key for the caller.
	CreateKey { token: String },

	/// Plain snip-20 transfer to an address.
	Transfer {
		token: String,
		recipient: String,
		amount: String,
	},

	/// Send to a registered contract (receive hook without payload).
	Send {
		token: String,

		/// Registry name of the receiving contract.
		recipient: String,

		amount: String,
	},

	/// Allow a spender to move the caller's tokens.
	IncreaseAllowance {
		token: String,
		spender: String,
		amount: String,
	},

	/// Show the caller's transfer history (viewing-key query).
	History {
		token: String,

		#[arg(long, default_value = "10")]
		page_size: u32,

		#[arg(long)]
		page: Option<u32>,

		#[arg(long)]
		key: Option<String>,
	},
}

// -- Swap subcommands --

#[derive(Subcommand)]
pub enum SwapCommand {
	/// Upload pair + LP token code and instantiate the swap factory.
	DeployFactory {
		#[arg(long)]
		pair_wasm: String,

		#[arg(long)]
		token_wasm: String,

		#[arg(long)]
		factory_wasm: String,
	},

	/// Create a swap pair for two registered tokens.
	CreatePair {
		/// Registry names of the two tokens.
		token_a: String,
		token_b: String,
	},

	/// Provide liquidity to an existing pair.
	ProvideLiquidity {
		token_a: String,

		#[arg(long)]
		amount_a: String,

		token_b: String,

		#[arg(long)]
		amount_b: String,
	},
}

// -- Chain subcommands --

#[derive(Subcommand)]
pub enum ChainCommand {
	/// Show chain id and latest block height.
	Status,

	/// Send native uscrt to an address.
	Transfer {
		to: String,

		/// Amount in uscrt.
		amount: String,
	},
}

// -- Registry subcommands --

#[derive(Subcommand)]
pub enum RegistryCommand {
	/// List registered contracts.
	List,

	/// Show one registry entry.
	Show { name: String },

	/// Print the registry file path.
	Path,
}
