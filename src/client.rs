use std::io::Write as _;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::fees::{Coin, FeeOp, FeeTable, StdFee};
use crate::wallet::Wallet;

/// Failures from the LCD endpoint or from an executed transaction.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
	#[error("LCD request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("LCD error ({status}): {body}")]
	Lcd { status: u16, body: String },

	#[error("transaction {txhash} failed with code {code}: {raw_log}")]
	TxFailed {
		txhash: String,
		code: u32,
		raw_log: String,
	},

	#[error("missing `{0}` attribute in transaction logs")]
	MissingLogAttribute(&'static str),
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone)]
pub struct TxResponse {
	pub txhash: String,
	pub height: u64,
	pub raw_log: String,
	pub logs: Value,
	/// Contract response data, hex-decoded.
	pub data: Option<Vec<u8>>,
}

impl TxResponse {
	/// Find an attribute emitted in the tx events (e.g. `contract_address`).
	pub fn log_attribute(&self, key: &str) -> Option<String> {
		let logs = self.logs.as_array()?;
		for log in logs {
			let events = log.get("events").and_then(Value::as_array)?;
			for event in events {
				let attrs = event.get("attributes").and_then(Value::as_array);
				for attr in attrs.into_iter().flatten() {
					if attr.get("key").and_then(Value::as_str) == Some(key) {
						return attr
							.get("value")
							.and_then(Value::as_str)
							.map(str::to_owned);
					}
				}
			}
		}
		None
	}

	/// Parse the contract response data as JSON.
	pub fn data_json<T: DeserializeOwned>(&self) -> Result<T> {
		let data = self
			.data
			.as_deref()
			.ok_or_else(|| anyhow!("transaction returned no data"))?;
		serde_json::from_slice(data).context("decoding transaction response data")
	}
}

/// Signing client for the chain's LCD REST endpoint.
///
/// Each call is build message -> amino sign -> broadcast (mode `block`)
/// -> decode; there is no connection state beyond the reqwest pool.
pub struct LcdClient {
	http: reqwest::Client,
	url: String,
	chain_id: String,
	wallet: Wallet,
	fees: FeeTable,
}

impl LcdClient {
	pub fn new(url: &str, chain_id: &str, wallet: Wallet, fees: FeeTable) -> Self {
		Self {
			http: reqwest::Client::new(),
			url: url.trim_end_matches('/').to_owned(),
			chain_id: chain_id.to_owned(),
			wallet,
			fees,
		}
	}

	/// Address of the signing account.
	pub fn address(&self) -> &str {
		self.wallet.address()
	}

	pub fn fees(&self) -> &FeeTable {
		&self.fees
	}

	// -- Chain queries --

	/// Chain id reported by the node (may differ from the configured one).
	pub async fn node_chain_id(&self) -> Result<String> {
		let info: Value = self.get_json("/node_info").await?;
		info.pointer("/node_info/network")
			.or_else(|| info.pointer("/network"))
			.and_then(Value::as_str)
			.map(str::to_owned)
			.ok_or_else(|| anyhow!("node_info response missing network field"))
	}

	/// Height of the latest committed block.
	pub async fn latest_block_height(&self) -> Result<u64> {
		let block: Value = self.get_json("/blocks/latest").await?;
		let height = block
			.pointer("/block/header/height")
			.and_then(Value::as_str)
			.ok_or_else(|| anyhow!("latest block response missing height"))?;
		height.parse().context("parsing block height")
	}

	/// Account number and sequence for the signing account.
	pub async fn account(&self) -> Result<(u64, u64)> {
		let path = format!("/auth/accounts/{}", self.wallet.address());
		let account: Value = self.get_json(&path).await?;
		// Legacy LCD wraps the account in result.value; newer gateways don't.
		let value = account
			.pointer("/result/value")
			.or_else(|| account.pointer("/value"))
			.unwrap_or(&account);

		let number = uint_field(value, "account_number")?;
		let sequence = uint_field(value, "sequence")?;
		Ok((number, sequence))
	}

	/// Run a smart query against a contract and decode the response.
	pub async fn query_smart<T: DeserializeOwned>(
		&self,
		contract: &str,
		query: &impl Serialize,
	) -> Result<T> {
		let encoded = hex::encode(serde_json::to_vec(query)?);
		let path = format!("/wasm/contract/{contract}/smart/{encoded}?encoding=hex");
		let resp: Value = self.get_json(&path).await?;

		let smart = resp
			.pointer("/result/smart")
			.or_else(|| resp.pointer("/smart"))
			.and_then(Value::as_str)
			.ok_or_else(|| anyhow!("smart query response missing result"))?;
		let raw = BASE64.decode(smart).context("decoding smart query payload")?;
		serde_json::from_slice(&raw).context("decoding smart query response")
	}

	// -- Transactions --

	/// Upload a wasm binary; returns (code id, code hash).
	pub async fn store_code(&self, wasm: &[u8], fee_name: &str) -> Result<(u64, String)> {
		let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
		encoder.write_all(wasm)?;
		let gzipped = encoder.finish()?;

		let msg = amino_msg(
			"wasm/MsgStoreCode",
			json!({
				"sender": self.wallet.address(),
				"wasm_byte_code": BASE64.encode(gzipped),
			}),
		);
		let fee = self.fees.fee_for(fee_name, FeeOp::Store);
		let resp = self.broadcast(vec![msg], &fee, "").await?;

		let code_id: u64 = resp
			.log_attribute("code_id")
			.ok_or(ClientError::MissingLogAttribute("code_id"))?
			.parse()
			.context("parsing code_id")?;
		let code_hash = self.code_hash(code_id).await?;
		Ok((code_id, code_hash))
	}

	/// Code hash for an uploaded code id.
	pub async fn code_hash(&self, code_id: u64) -> Result<String> {
		let resp: Value = self.get_json(&format!("/wasm/code/{code_id}")).await?;
		resp.pointer("/result/data_hash")
			.or_else(|| resp.pointer("/data_hash"))
			.and_then(Value::as_str)
			.map(str::to_lowercase)
			.ok_or_else(|| anyhow!("code info response missing data_hash"))
	}

	/// Code id and hash for an already-deployed contract address.
	pub async fn contract_code_hash(&self, address: &str) -> Result<(u64, String)> {
		let resp: Value = self.get_json(&format!("/wasm/contract/{address}")).await?;
		let info = resp.get("result").unwrap_or(&resp);
		let code_id = uint_field(info, "code_id")?;
		let code_hash = self.code_hash(code_id).await?;
		Ok((code_id, code_hash))
	}

	/// Instantiate an uploaded code; returns the new contract address.
	/// The label gets a random suffix so repeated runs don't collide.
	pub async fn instantiate(
		&self,
		code_id: u64,
		init_msg: &impl Serialize,
		label: &str,
	) -> Result<String> {
		let suffixed = format!("{label} {}", rand::random::<u32>() % 10_000);
		let msg = amino_msg(
			"wasm/MsgInstantiateContract",
			json!({
				"sender": self.wallet.address(),
				"code_id": code_id.to_string(),
				"label": suffixed,
				"init_msg": BASE64.encode(serde_json::to_vec(init_msg)?),
				"init_funds": [],
			}),
		);
		let fee = self.fees.fee_for(label, FeeOp::Init);
		let resp = self.broadcast(vec![msg], &fee, "").await?;

		resp.log_attribute("contract_address")
			.ok_or_else(|| ClientError::MissingLogAttribute("contract_address").into())
	}

	/// Execute a contract call with no attached funds and the default fee.
	pub async fn execute(&self, contract: &str, handle_msg: &impl Serialize) -> Result<TxResponse> {
		let fee = self.fees.default_fee(FeeOp::Exec).clone();
		self.execute_with(contract, handle_msg, vec![], fee).await
	}

	/// Execute a contract call with explicit funds and fee.
	pub async fn execute_with(
		&self,
		contract: &str,
		handle_msg: &impl Serialize,
		sent_funds: Vec<Coin>,
		fee: StdFee,
	) -> Result<TxResponse> {
		let msg = amino_msg(
			"wasm/MsgExecuteContract",
			json!({
				"sender": self.wallet.address(),
				"contract": contract,
				"msg": BASE64.encode(serde_json::to_vec(handle_msg)?),
				"sent_funds": sent_funds,
			}),
		);
		self.broadcast(vec![msg], &fee, "").await
	}

	/// Native bank transfer.
	pub async fn send_native(&self, to: &str, amount: Coin) -> Result<TxResponse> {
		let msg = amino_msg(
			"cosmos-sdk/MsgSend",
			json!({
				"from_address": self.wallet.address(),
				"to_address": to,
				"amount": [amount],
			}),
		);
		let fee = self.fees.default_fee(FeeOp::Send).clone();
		self.broadcast(vec![msg], &fee, "").await
	}

	/// Sign a message set and POST it to /txs, waiting for commit.
	pub async fn broadcast(&self, msgs: Vec<Value>, fee: &StdFee, memo: &str) -> Result<TxResponse> {
		let (account_number, sequence) = self.account().await?;

		let sign_doc = build_sign_doc(
			&self.chain_id,
			account_number,
			sequence,
			fee,
			memo,
			&msgs,
		)?;
		let signature = self.wallet.sign(&sign_doc);

		let tx = json!({
			"msg": msgs,
			"fee": fee,
			"memo": memo,
			"signatures": [{
				"pub_key": {
					"type": "tendermint/PubKeySecp256k1",
					"value": BASE64.encode(self.wallet.pubkey()),
				},
				"signature": BASE64.encode(signature),
			}],
		});

		let body = json!({"tx": tx, "mode": "block"});
		let resp = self
			.http
			.post(format!("{}/txs", self.url))
			.json(&body)
			.send()
			.await
			.map_err(ClientError::Http)?;
		let status = resp.status();
		let text = resp.text().await.map_err(ClientError::Http)?;
		if !status.is_success() {
			return Err(ClientError::Lcd {
				status: status.as_u16(),
				body: text,
			}
			.into());
		}

		parse_broadcast_response(&text)
	}

	// -- Private helpers --

	async fn get_json(&self, path: &str) -> Result<Value> {
		let resp = self
			.http
			.get(format!("{}{path}", self.url))
			.send()
			.await
			.map_err(ClientError::Http)?;
		let status = resp.status();
		let text = resp.text().await.map_err(ClientError::Http)?;
		if !status.is_success() {
			return Err(ClientError::Lcd {
				status: status.as_u16(),
				body: text,
			}
			.into());
		}
		serde_json::from_str(&text).with_context(|| format!("decoding LCD response from {path}"))
	}
}

/// Wrap a message value in its amino type envelope.
fn amino_msg(type_name: &str, value: Value) -> Value {
	json!({"type": type_name, "value": value})
}

/// Canonical amino sign doc: object keys sorted, no whitespace.
/// serde_json's default map is ordered, so serializing the composed
/// document yields the canonical byte string directly.
fn build_sign_doc(
	chain_id: &str,
	account_number: u64,
	sequence: u64,
	fee: &StdFee,
	memo: &str,
	msgs: &[Value],
) -> Result<Vec<u8>> {
	let doc = json!({
		"account_number": account_number.to_string(),
		"chain_id": chain_id,
		"fee": fee,
		"memo": memo,
		"msgs": msgs,
		"sequence": sequence.to_string(),
	});
	Ok(serde_json::to_vec(&doc)?)
}

/// Decode a /txs broadcast response, failing on a non-zero tx code.
fn parse_broadcast_response(body: &str) -> Result<TxResponse> {
	let resp: Value = serde_json::from_str(body).context("decoding broadcast response")?;

	let txhash = resp
		.get("txhash")
		.and_then(Value::as_str)
		.unwrap_or_default()
		.to_owned();
	let raw_log = resp
		.get("raw_log")
		.and_then(Value::as_str)
		.unwrap_or_default()
		.to_owned();

	if let Some(code) = resp.get("code").and_then(Value::as_u64) {
		if code != 0 {
			return Err(ClientError::TxFailed {
				txhash,
				code: code as u32,
				raw_log,
			}
			.into());
		}
	}

	let height = resp
		.get("height")
		.and_then(Value::as_str)
		.and_then(|h| h.parse().ok())
		.unwrap_or_default();
	let data = match resp.get("data").and_then(Value::as_str) {
		Some(hex_data) => Some(hex::decode(hex_data).context("decoding tx data")?),
		None => None,
	};

	Ok(TxResponse {
		txhash,
		height,
		raw_log,
		logs: resp.get("logs").cloned().unwrap_or(Value::Null),
		data,
	})
}

fn uint_field(value: &Value, field: &str) -> Result<u64> {
	match value.get(field) {
		Some(Value::String(s)) => s.parse().with_context(|| format!("parsing {field}")),
		Some(Value::Number(n)) => n
			.as_u64()
			.ok_or_else(|| anyhow!("{field} is not an unsigned integer")),
		_ => Err(anyhow!("account response missing {field}")),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fees::FeeTable;

	#[test]
	fn sign_doc_is_canonical() {
		let fee = FeeTable::default().send.clone();
		let msgs = vec![amino_msg(
			"cosmos-sdk/MsgSend",
			json!({
				"to_address": "secret1destination",
				"from_address": "secret1source",
				"amount": [{"denom": "uscrt", "amount": "100"}],
			}),
		)];
		let doc = build_sign_doc("enigma-pub-testnet-3", 5, 3, &fee, "", &msgs).unwrap();
		let doc = String::from_utf8(doc).unwrap();

		let expected = concat!(
			r#"{"account_number":"5","chain_id":"enigma-pub-testnet-3","#,
			r#""fee":{"amount":[{"amount":"80000","denom":"uscrt"}],"gas":"80000"},"#,
			r#""memo":"","msgs":[{"type":"cosmos-sdk/MsgSend","value":{"#,
			r#""amount":[{"amount":"100","denom":"uscrt"}],"#,
			r#""from_address":"secret1source","to_address":"secret1destination"}}],"#,
			r#""sequence":"3"}"#,
		);
		assert_eq!(doc, expected);
	}

	#[test]
	fn sign_doc_sorts_message_keys() {
		// Keys deliberately supplied out of order.
		let msgs = vec![amino_msg("wasm/MsgExecuteContract", json!({
			"sent_funds": [],
			"contract": "secret1contract",
			"sender": "secret1sender",
			"msg": "e30=",
		}))];
		let fee = FeeTable::default().exec.clone();
		let doc = build_sign_doc("holodeck-2", 1, 0, &fee, "", &msgs).unwrap();
		let doc = String::from_utf8(doc).unwrap();

		let contract = doc.find("\"contract\"").unwrap();
		let msg = doc.find("\"msg\"").unwrap();
		let sender = doc.find("\"sender\"").unwrap();
		let funds = doc.find("\"sent_funds\"").unwrap();
		assert!(contract < msg && msg < sender && sender < funds);
		assert!(!doc.contains(' '), "canonical doc has no whitespace");
	}

	#[test]
	fn amino_envelope_shape() {
		let msg = amino_msg("wasm/MsgStoreCode", json!({"sender": "secret1s"}));
		assert_eq!(msg["type"], "wasm/MsgStoreCode");
		assert_eq!(msg["value"]["sender"], "secret1s");
	}

	#[test]
	fn failed_tx_becomes_error() {
		let body = r#"{"height":"100","txhash":"ABC123","code":5,"raw_log":"out of gas"}"#;
		let err = parse_broadcast_response(body).unwrap_err();
		let client_err = err.downcast::<ClientError>().unwrap();
		match client_err {
			ClientError::TxFailed { code, raw_log, .. } => {
				assert_eq!(code, 5);
				assert_eq!(raw_log, "out of gas");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn successful_tx_parses_logs_and_data() {
		let body = r#"{
			"height": "42",
			"txhash": "DEF456",
			"raw_log": "[]",
			"logs": [{"msg_index": 0, "events": [{"type": "message", "attributes": [
				{"key": "contract_address", "value": "secret1newcontract"},
				{"key": "code_id", "value": "12"}
			]}]}],
			"data": "7b226f6b223a747275657d"
		}"#;
		let resp = parse_broadcast_response(body).unwrap();
		assert_eq!(resp.height, 42);
		assert_eq!(
			resp.log_attribute("contract_address").as_deref(),
			Some("secret1newcontract")
		);
		assert_eq!(resp.log_attribute("code_id").as_deref(), Some("12"));
		assert!(resp.log_attribute("missing").is_none());

		let data: Value = resp.data_json().unwrap();
		assert_eq!(data, json!({"ok": true}));
	}

	#[test]
	fn account_fields_accept_strings_and_numbers() {
		let v = json!({"account_number": "5", "sequence": 3});
		assert_eq!(uint_field(&v, "account_number").unwrap(), 5);
		assert_eq!(uint_field(&v, "sequence").unwrap(), 3);
		assert!(uint_field(&v, "missing").is_err());
	}
}
