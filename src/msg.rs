//! Wire types for the protocol contracts.
//!
//! Every message here mirrors a schema owned by an on-chain contract;
//! field names and casing are fixed by those contracts and must not be
//! "improved".  `Uint128` fields travel as decimal strings so amounts
//! larger than u64 (gons, raw token units) pass through untouched.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

// -- Shared types --

/// Address + code hash pair, the unit of contract composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRef {
	pub address: String,
	pub code_hash: String,
}

impl ContractRef {
	pub fn new(address: impl Into<String>, code_hash: impl Into<String>) -> Self {
		Self {
			address: address.into(),
			code_hash: code_hash.into(),
		}
	}
}

impl From<&crate::registry::ContractEntry> for ContractRef {
	fn from(entry: &crate::registry::ContractEntry) -> Self {
		Self::new(&entry.address, &entry.code_hash)
	}
}

/// Base64-encode a message for embedding (snip-20 `send.msg` hooks,
/// instantiate/execute payloads).
pub fn to_base64(msg: &impl Serialize) -> String {
	BASE64.encode(serde_json::to_vec(msg).unwrap())
}

/// Fresh random 32-byte prng seed, base64-encoded, for init messages.
pub fn random_seed() -> String {
	BASE64.encode(rand::random::<[u8; 32]>())
}

/// Treasury access roles.  Serialized exactly as the treasury contract
/// declares them (no case conversion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManagingRole {
	ReserveDepositor,
	ReserveSpender,
	ReserveToken,
	ReserveManager,
	LiquidityDepositor,
	LiquidityToken,
	LiquidityManager,
	Debtor,
	RewardManager,
	SOHM,
}

// -- SNIP-20 token --

#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenInitConfig {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub public_total_supply: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable_deposit: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable_redeem: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable_mint: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable_burn: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitialBalance {
	pub address: String,
	pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenInit {
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	pub initial_balances: Vec<InitialBalance>,
	pub config: TokenInitConfig,
	pub prng_seed: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenHandle {
	/// Transfer to a contract and invoke its receive hook with the
	/// base64 payload in `msg`.
	Send {
		recipient: String,
		recipient_code_hash: String,
		amount: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		msg: Option<String>,
	},
	Transfer {
		recipient: String,
		amount: String,
	},
	IncreaseAllowance {
		spender: String,
		amount: String,
	},
	CreateViewingKey {
		entropy: String,
	},
	/// Wrap sent native coin into the token (sSCRT-style).
	Deposit {},
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenQuery {
	TokenInfo {},
	Balance {
		address: String,
		key: String,
	},
	TransactionHistory {
		address: String,
		key: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		page: Option<u32>,
		page_size: u32,
	},
}

// -- Receive hooks --

/// Hooks embedded in a snip-20 `send` to the staking contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingHook {
	Stake { recipient: String },
	Unstake { trigger: bool },
}

/// Hook embedded in a snip-20 `send` of principle to a bond depository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondHook {
	Deposit {
		max_price: String,
		depositor: Option<String>,
	},
}

// -- Staked token (rebasing) --

#[derive(Debug, Clone, Serialize)]
pub struct StakedTokenInit {
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	/// Initial rebase index, a Uint128 decimal string.
	pub index: String,
	pub config: TokenInitConfig,
	pub prng_seed: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakedTokenHandle {
	/// One-shot handover to the staking contract after deployment.
	Initialize { staking_contract: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakedTokenQuery {
	CirculatingSupply {},
	GonsForBalance {
		amount: String,
	},
	BalanceForGons {
		gons: String,
	},
	RebaseHistory {
		page_size: u32,
		#[serde(skip_serializing_if = "Option::is_none")]
		page: Option<u32>,
	},
}

// -- Staking --

#[derive(Debug, Clone, Serialize)]
pub struct StakingInit {
	pub ohm: ContractRef,
	pub sohm: ContractRef,
	pub epoch_length: u64,
	pub first_epoch_number: u64,
	pub first_epoch_block: u64,
	pub prng_seed: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingContractType {
	Distributor,
	WarmupContract,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingHandle {
	/// Release warmed-up stake to its owner.
	Claim {
		recipient: String,
	},
	Rebase {},
	SetContract {
		contract_type: StakingContractType,
		contract: ContractRef,
	},
	SetWarmupPeriod {
		warmup_period: u64,
	},
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingQuery {
	ContractInfo {},
	Epoch {},
	Index {},
	ContractBalance {},
}

// -- Staking warmup --

#[derive(Debug, Clone, Serialize)]
pub struct WarmupInit {
	pub sohm: ContractRef,
	pub staking: ContractRef,
}

// -- Bond calculator --

#[derive(Debug, Clone, Serialize)]
pub struct CalculatorInit {
	pub ohm: ContractRef,
}

// -- Staking distributor --

#[derive(Debug, Clone, Serialize)]
pub struct DistributorInit {
	pub treasury: ContractRef,
	pub ohm: ContractRef,
	pub epoch_length: u64,
	pub next_epoch_block: u64,
	pub prng_seed: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributorHandle {
	AddRecipient {
		recipient: String,
		/// Reward rate in ten-thousandths of total supply per epoch.
		reward_rate: String,
	},
}

// -- Treasury --

#[derive(Debug, Clone, Serialize)]
pub struct TreasuryInit {
	pub name: String,
	pub ohm: ContractRef,
	pub sohm: ContractRef,
	pub reserve_tokens: Option<Vec<ContractRef>>,
	pub blocks_needed_for_queue: u64,
	pub prng_seed: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasuryHandle {
	Queue {
		address: String,
		role: ManagingRole,
	},
	ToggleQueue {
		address: String,
		role: ManagingRole,
	},
	ToggleTokenQueue {
		token: ContractRef,
		role: ManagingRole,
		calculator: Option<ContractRef>,
	},
	Manage {
		token: String,
		amount: String,
	},
	Withdraw {
		token: String,
		amount: String,
	},
	IncurDebt {
		token: String,
		amount: String,
	},
	MintRewards {
		token: String,
		amount: String,
	},
	AuditReserves {},
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasuryQuery {
	ContractInfo {},
	Contracts { role: ManagingRole },
	ManagingAddresses { role: ManagingRole },
	ValueOf { token: String, amount: String },
	TotalBondDeposited { token: String },
}

// -- Bond depository --

/// Bond principle: a reserve token, or an LP token with its pair.
#[derive(Debug, Clone, Serialize)]
pub struct Principle {
	pub token: ContractRef,
	pub pair: Option<ContractRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BondInit {
	pub name: String,
	pub symbol: String,
	pub ohm: ContractRef,
	pub principle: Principle,
	pub treasury: ContractRef,
	pub dao: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub bond_calculator: Option<ContractRef>,
	pub prng_seed: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BondParameter {
	Vesting,
	Payout,
	Fee,
	Debt,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BondHandle {
	InitializeBondTerms {
		control_variable: String,
		vesting_term: u64,
		minimum_price: String,
		maximum_price: String,
		max_payout: String,
		fee: String,
		max_debt: String,
		initial_debt: String,
	},
	SetBondTerm {
		parameter: BondParameter,
		input: String,
	},
	SetAdjustment {
		addition: bool,
		increment: String,
		target: String,
		buffer: u64,
	},
	SetStaking {
		staking: ContractRef,
	},
	Redeem {
		recipient: String,
		/// Route the payout straight into staking instead of paying out.
		stake: bool,
	},
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BondQuery {
	ContractInfo {},
	BondTerms {},
	MaxPayout {},
	BondPrice { block_height: u64 },
	BondPriceInUsd { block_height: u64 },
	StandardizedDebtRatio { block_height: u64 },
	BondInfo { address: String, key: String },
}

// -- Swap factory and pair --

#[derive(Debug, Clone, Serialize)]
pub struct FactoryInit {
	pub pair_code_id: u64,
	pub token_code_id: u64,
	pub pair_code_hash: String,
	pub token_code_hash: String,
	pub prng_seed: String,
}

/// Asset description used by the swap factory and pairs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
	Token {
		contract_addr: String,
		token_code_hash: String,
		/// Required by the schema, ignored by the factory.
		viewing_key: String,
	},
}

impl AssetInfo {
	pub fn token(contract: &ContractRef) -> Self {
		Self::Token {
			contract_addr: contract.address.clone(),
			token_code_hash: contract.code_hash.clone(),
			viewing_key: String::new(),
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct Asset {
	pub info: AssetInfo,
	pub amount: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryHandle {
	CreatePair { asset_infos: Vec<AssetInfo> },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairHandle {
	ProvideLiquidity { assets: Vec<Asset> },
}

// -- Response shapes the commands destructure --

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
	pub name: String,
	pub symbol: String,
	pub decimals: u8,
	pub total_supply: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfoResponse {
	pub token_info: TokenInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
	pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
	pub balance: Balance,
}

/// Contract response to `create_viewing_key`, carried in tx result data.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewingKey {
	pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewingKeyResponse {
	pub create_viewing_key: ViewingKey,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn roles_serialize_without_case_conversion() {
		assert_eq!(
			serde_json::to_value(ManagingRole::ReserveDepositor).unwrap(),
			json!("ReserveDepositor")
		);
		assert_eq!(serde_json::to_value(ManagingRole::SOHM).unwrap(), json!("SOHM"));
	}

	#[test]
	fn treasury_queue_wire_shape() {
		let msg = TreasuryHandle::Queue {
			address: "secret1878ru0hfgdk0atdvj9kvcl0gfzkfjr25m4pd94".into(),
			role: ManagingRole::RewardManager,
		};
		assert_eq!(
			serde_json::to_value(&msg).unwrap(),
			json!({
				"queue": {
					"address": "secret1878ru0hfgdk0atdvj9kvcl0gfzkfjr25m4pd94",
					"role": "RewardManager"
				}
			})
		);
	}

	#[test]
	fn stake_hook_embeds_as_base64() {
		let hook = StakingHook::Stake {
			recipient: "secret1s5l0d77e7g07mpfs9p2sxd2ex309jhvjteevmy".into(),
		};
		let send = TokenHandle::Send {
			recipient: "secret1staking".into(),
			recipient_code_hash: "deadbeef".into(),
			amount: "1000000000".into(),
			msg: Some(to_base64(&hook)),
		};

		let v = serde_json::to_value(&send).unwrap();
		let embedded = v.pointer("/send/msg").and_then(|m| m.as_str()).unwrap();
		let decoded: serde_json::Value =
			serde_json::from_slice(&BASE64.decode(embedded).unwrap()).unwrap();
		assert_eq!(
			decoded,
			json!({"stake": {"recipient": "secret1s5l0d77e7g07mpfs9p2sxd2ex309jhvjteevmy"}})
		);
	}

	#[test]
	fn unstake_hook_wire_shape() {
		assert_eq!(
			serde_json::to_value(StakingHook::Unstake { trigger: false }).unwrap(),
			json!({"unstake": {"trigger": false}})
		);
	}

	#[test]
	fn bond_deposit_hook_wire_shape() {
		let hook = BondHook::Deposit {
			max_price: "60000000".into(),
			depositor: Some("secret1depositor".into()),
		};
		assert_eq!(
			serde_json::to_value(&hook).unwrap(),
			json!({"deposit": {"max_price": "60000000", "depositor": "secret1depositor"}})
		);
	}

	#[test]
	fn bond_terms_mix_string_and_integer_fields() {
		let msg = BondHandle::InitializeBondTerms {
			control_variable: "369".into(),
			vesting_term: 33110,
			minimum_price: "50000".into(),
			maximum_price: "1000".into(),
			max_payout: "50".into(),
			fee: "10000".into(),
			max_debt: "1000000000000000".into(),
			initial_debt: "0".into(),
		};
		let v = serde_json::to_value(&msg).unwrap();
		assert_eq!(v.pointer("/initialize_bond_terms/vesting_term"), Some(&json!(33110)));
		assert_eq!(
			v.pointer("/initialize_bond_terms/control_variable"),
			Some(&json!("369"))
		);
	}

	#[test]
	fn set_contract_types_are_snake_case() {
		let msg = StakingHandle::SetContract {
			contract_type: StakingContractType::WarmupContract,
			contract: ContractRef::new("secret1warmup", "beef"),
		};
		let v = serde_json::to_value(&msg).unwrap();
		assert_eq!(
			v.pointer("/set_contract/contract_type"),
			Some(&json!("warmup_contract"))
		);
	}

	#[test]
	fn send_without_hook_omits_msg() {
		let send = TokenHandle::Send {
			recipient: "secret1r".into(),
			recipient_code_hash: "cafe".into(),
			amount: "1".into(),
			msg: None,
		};
		assert!(serde_json::to_value(&send).unwrap().pointer("/send/msg").is_none());
	}

	#[test]
	fn lp_principle_carries_pair() {
		let p = Principle {
			token: ContractRef::new("secret1lp", "aa"),
			pair: Some(ContractRef::new("secret1pair", "bb")),
		};
		let v = serde_json::to_value(&p).unwrap();
		assert_eq!(v.pointer("/pair/address"), Some(&json!("secret1pair")));

		let reserve = Principle {
			token: ContractRef::new("secret1sust", "cc"),
			pair: None,
		};
		let v = serde_json::to_value(&reserve).unwrap();
		assert_eq!(v.pointer("/pair"), Some(&json!(null)));
	}

	#[test]
	fn price_queries_take_a_block_height() {
		assert_eq!(
			serde_json::to_value(BondQuery::BondPriceInUsd { block_height: 1_219_201 }).unwrap(),
			json!({"bond_price_in_usd": {"block_height": 1219201}})
		);
	}

	#[test]
	fn asset_info_matches_swap_schema() {
		let info = AssetInfo::token(&ContractRef::new("secret1sust", "hash"));
		assert_eq!(
			serde_json::to_value(&info).unwrap(),
			json!({
				"token": {
					"contract_addr": "secret1sust",
					"token_code_hash": "hash",
					"viewing_key": ""
				}
			})
		);
	}

	#[test]
	fn random_seed_is_base64_of_32_bytes() {
		let seed = random_seed();
		let raw = BASE64.decode(seed).unwrap();
		assert_eq!(raw.len(), 32);
		assert_ne!(random_seed(), random_seed());
	}
}
