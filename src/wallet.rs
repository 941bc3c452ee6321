use anyhow::{anyhow, Context, Result};
use bech32::{ToBase32, Variant};
use bip32::secp256k1::ecdsa::{signature::Signer, Signature, SigningKey};
use bip32::{Language, Mnemonic, PublicKey as _, XPrv};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Bech32 human-readable prefix for account addresses.
const ADDRESS_HRP: &str = "secret";

/// BIP-44 derivation path. 529 is the Secret Network coin type.
const DERIVATION_PATH: &str = "m/44'/529'/0'/0/0";

/// A local signing account derived from a BIP-39 mnemonic.
///
/// Every transaction the CLI submits is signed by one of these; there is
/// no keystore, the mnemonic comes from the environment on each run.
pub struct Wallet {
	signing_key: SigningKey,
	pubkey: [u8; 33],
	address: String,
}

impl Wallet {
	/// Derive the account at `m/44'/529'/0'/0/0` from a mnemonic phrase.
	pub fn from_mnemonic(phrase: &str) -> Result<Self> {
		let mnemonic = Mnemonic::new(phrase.trim(), Language::English)
			.map_err(|e| anyhow!("invalid mnemonic: {e}"))?;
		let seed = mnemonic.to_seed("");

		let path = DERIVATION_PATH
			.parse()
			.map_err(|e| anyhow!("invalid derivation path: {e}"))?;
		let xprv = XPrv::derive_from_path(seed.as_bytes(), &path)
			.map_err(|e| anyhow!("key derivation failed: {e}"))?;

		let pubkey = xprv.public_key().public_key().to_bytes();
		let address = pubkey_to_address(&pubkey)?;

		Ok(Self {
			signing_key: xprv.private_key().clone(),
			pubkey,
			address,
		})
	}

	/// Derive the account from the mnemonic in the given environment variable.
	pub fn from_env(var: &str) -> Result<Self> {
		let phrase = std::env::var(var)
			.with_context(|| format!("mnemonic environment variable {var} is not set"))?;
		Self::from_mnemonic(&phrase)
	}

	/// The bech32 account address (secret1...).
	pub fn address(&self) -> &str {
		&self.address
	}

	/// The compressed secp256k1 public key.
	pub fn pubkey(&self) -> &[u8; 33] {
		&self.pubkey
	}

	/// Sign a byte string (deterministic ECDSA over its SHA-256 digest)
	/// and return the fixed 64-byte r||s signature.
	pub fn sign(&self, bytes: &[u8]) -> Vec<u8> {
		let sig: Signature = self.signing_key.sign(bytes);
		let sig = sig.normalize_s().unwrap_or(sig);
		sig.to_bytes().to_vec()
	}
}

/// Account address derivation: bech32(ripemd160(sha256(pubkey))).
fn pubkey_to_address(pubkey: &[u8; 33]) -> Result<String> {
	let hash = Ripemd160::digest(Sha256::digest(pubkey));
	bech32::encode(ADDRESS_HRP, hash.to_base32(), Variant::Bech32)
		.map_err(|e| anyhow!("bech32 encoding failed: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	const PHRASE: &str =
		"abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

	#[test]
	fn derivation_is_deterministic() {
		let a = Wallet::from_mnemonic(PHRASE).unwrap();
		let b = Wallet::from_mnemonic(PHRASE).unwrap();
		assert_eq!(a.address(), b.address());
		assert_eq!(a.pubkey(), b.pubkey());
	}

	#[test]
	fn address_is_bech32_secret() {
		let w = Wallet::from_mnemonic(PHRASE).unwrap();
		assert!(w.address().starts_with("secret1"), "got {}", w.address());

		let (hrp, data, _) = bech32::decode(w.address()).unwrap();
		assert_eq!(hrp, "secret");
		let bytes: Vec<u8> = bech32::FromBase32::from_base32(&data).unwrap();
		assert_eq!(bytes.len(), 20, "ripemd160 digest is 20 bytes");
	}

	#[test]
	fn pubkey_is_compressed_sec1() {
		let w = Wallet::from_mnemonic(PHRASE).unwrap();
		assert!(matches!(w.pubkey()[0], 0x02 | 0x03));
	}

	#[test]
	fn distinct_mnemonics_give_distinct_accounts() {
		let a = Wallet::from_mnemonic(PHRASE).unwrap();
		let b = Wallet::from_mnemonic(
			"quality isolate target melody flame adjust actress funny wear art sister \
			 capital banana orient duty settle until wire profit evidence violin side muscle obey",
		)
		.unwrap();
		assert_ne!(a.address(), b.address());
	}

	#[test]
	fn signing_is_deterministic_and_fixed_width() {
		let w = Wallet::from_mnemonic(PHRASE).unwrap();
		let sig1 = w.sign(b"sign doc bytes");
		let sig2 = w.sign(b"sign doc bytes");
		assert_eq!(sig1, sig2);
		assert_eq!(sig1.len(), 64);
		assert_ne!(sig1, w.sign(b"other bytes"));
	}

	#[test]
	fn rejects_garbage_mnemonic() {
		assert!(Wallet::from_mnemonic("definitely not a mnemonic").is_err());
		assert!(Wallet::from_mnemonic("").is_err());
	}
}
