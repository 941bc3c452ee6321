//! Integration tests that hit a local Secret-style LCD node.
//!
//! These are marked `#[ignore]` by default because they require a node
//! listening on localhost:1317 and the MNEMONIC environment variable.
//! Run them explicitly with:
//!
//!   MNEMONIC="..." cargo test --test integration -- --ignored

use fond_cli::client::LcdClient;
use fond_cli::fees::FeeTable;
use fond_cli::msg::TokenQuery;
use fond_cli::wallet::Wallet;

const LOCAL_LCD: &str = "http://localhost:1317";
const LOCAL_CHAIN_ID: &str = "enigma-pub-testnet-3";

fn client() -> LcdClient {
	let wallet = Wallet::from_env("MNEMONIC").expect("MNEMONIC must be set for these tests");
	LcdClient::new(LOCAL_LCD, LOCAL_CHAIN_ID, wallet, FeeTable::default())
}

#[tokio::test]
#[ignore]
async fn node_reports_a_chain_id() {
	let chain_id = client().node_chain_id().await.expect("node_info failed");
	assert!(!chain_id.is_empty());
}

#[tokio::test]
#[ignore]
async fn tip_height_is_positive() {
	let height = client()
		.latest_block_height()
		.await
		.expect("failed to fetch latest block");
	assert!(height > 0, "height should be positive, got {height}");
}

#[tokio::test]
#[ignore]
async fn derived_account_exists_on_chain() {
	// The local dev node seeds the faucet accounts, so the derived
	// account should resolve to a number and sequence.
	let (account_number, _sequence) = client().account().await.expect("account query failed");
	assert!(account_number > 0);
}

#[tokio::test]
#[ignore]
async fn smart_query_reports_contract_errors() {
	// Querying token_info on a non-contract address must surface an
	// LCD error, not a decode panic.
	let result: anyhow::Result<serde_json::Value> = client()
		.query_smart(
			"secret1kwzfms3rhhpm4vyazvfpylqnvwdql4jtl56f7s",
			&TokenQuery::TokenInfo {},
		)
		.await;
	assert!(result.is_err());
}
