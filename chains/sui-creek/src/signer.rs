//! Sui Ed25519 keypair: secret parsing, address derivation, transaction signing.

use crate::chain::ChainError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use core_logic::WalletError;
use ed25519_dalek::{Signer, SigningKey};
use std::fmt;
use zeroize::Zeroizing;

type Blake2b256 = Blake2b<U32>;

const ED25519_FLAG: u8 = 0x00;
const SUI_PRIVKEY_HRP: &str = "suiprivkey";
/// TransactionData intent: scope, version, app id
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

/// Signing capability owned by an account.
pub trait TransactionSigner: Send + Sync {
    /// 0x-prefixed account address
    fn address(&self) -> &str;

    /// Signs BCS transaction bytes, returning the serialized base64 signature.
    fn sign_transaction(&self, tx_bytes: &[u8]) -> Result<String, ChainError>;
}

pub struct SuiKeypair {
    signing_key: SigningKey,
    address: String,
}

impl SuiKeypair {
    /// Accepts `suiprivkey1...` (bech32), base64 (flag-prefixed or bare) and hex secrets.
    pub fn from_secret(secret: &str) -> Result<Self, WalletError> {
        let secret = secret.trim();
        let bytes = Zeroizing::new(decode_secret(secret)?);

        let key_bytes: &[u8] = match bytes.len() {
            33 if bytes[0] == ED25519_FLAG => &bytes[1..],
            33 => return Err(WalletError::UnsupportedScheme { flag: bytes[0] }),
            32 => &bytes[..],
            length => return Err(WalletError::InvalidKeyLength { length }),
        };

        let mut seed = Zeroizing::new([0u8; 32]);
        seed.copy_from_slice(key_bytes);
        let signing_key = SigningKey::from_bytes(&seed);
        let address = derive_address(&signing_key.verifying_key().to_bytes());

        Ok(Self {
            signing_key,
            address,
        })
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl TransactionSigner for SuiKeypair {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign_transaction(&self, tx_bytes: &[u8]) -> Result<String, ChainError> {
        let digest = intent_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key());
        Ok(STANDARD.encode(serialized))
    }
}

impl fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address)
            .field("signing_key", &"***REDACTED***")
            .finish()
    }
}

fn decode_secret(secret: &str) -> Result<Vec<u8>, WalletError> {
    if secret.starts_with(SUI_PRIVKEY_HRP) {
        let (hrp, data) =
            bech32::decode(secret).map_err(|e| WalletError::InvalidKeyFormat {
                reason: e.to_string(),
            })?;
        if hrp.as_str() != SUI_PRIVKEY_HRP {
            return Err(WalletError::InvalidKeyFormat {
                reason: format!("unexpected prefix '{}'", hrp.as_str()),
            });
        }
        return Ok(data);
    }

    let hex_body = secret.strip_prefix("0x").unwrap_or(secret);
    if hex_body.len() == 64 && hex_body.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(hex_body).map_err(|e| WalletError::InvalidKeyFormat {
            reason: e.to_string(),
        });
    }

    STANDARD
        .decode(secret)
        .map_err(|_| WalletError::InvalidKeyFormat {
            reason: "expected suiprivkey, base64 or hex".to_string(),
        })
}

fn derive_address(public_key: &[u8; 32]) -> String {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    format!("0x{}", hex::encode(hasher.finalize()))
}

fn intent_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use bech32::{Bech32, Hrp};
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    const SEED: [u8; 32] = [7u8; 32];

    fn flagged_seed() -> Vec<u8> {
        let mut data = vec![ED25519_FLAG];
        data.extend_from_slice(&SEED);
        data
    }

    #[test]
    fn test_all_encodings_yield_same_address() {
        let from_hex = SuiKeypair::from_secret(&hex::encode(SEED)).unwrap();
        let from_b64 = SuiKeypair::from_secret(&STANDARD.encode(flagged_seed())).unwrap();
        let bech = bech32::encode::<Bech32>(Hrp::parse(SUI_PRIVKEY_HRP).unwrap(), &flagged_seed())
            .unwrap();
        let from_bech = SuiKeypair::from_secret(&bech).unwrap();

        assert_eq!(from_hex.address(), from_b64.address());
        assert_eq!(from_hex.address(), from_bech.address());
        assert!(from_hex.address().starts_with("0x"));
        assert_eq!(from_hex.address().len(), 66);
    }

    #[test]
    fn test_rejects_other_schemes_and_lengths() {
        let mut secp = vec![0x01];
        secp.extend_from_slice(&SEED);
        assert_eq!(
            SuiKeypair::from_secret(&STANDARD.encode(secp)).unwrap_err(),
            WalletError::UnsupportedScheme { flag: 0x01 }
        );
        assert_eq!(
            SuiKeypair::from_secret(&STANDARD.encode([1u8; 20])).unwrap_err(),
            WalletError::InvalidKeyLength { length: 20 }
        );
        assert!(matches!(
            SuiKeypair::from_secret("not a key!"),
            Err(WalletError::InvalidKeyFormat { .. })
        ));
    }

    #[test]
    fn test_signature_layout_and_validity() {
        let keypair = SuiKeypair::from_secret(&hex::encode(SEED)).unwrap();
        let tx_bytes = b"transaction-bytes";
        let encoded = keypair.sign_transaction(tx_bytes).unwrap();
        let raw = STANDARD.decode(encoded).unwrap();

        assert_eq!(raw.len(), 97);
        assert_eq!(raw[0], ED25519_FLAG);
        assert_eq!(&raw[65..], &keypair.public_key());

        let signature = Signature::from_slice(&raw[1..65]).unwrap();
        let verifying = VerifyingKey::from_bytes(&keypair.public_key()).unwrap();
        assert!(verifying
            .verify(&intent_digest(tx_bytes), &signature)
            .is_ok());
    }

    #[test]
    fn test_debug_hides_key() {
        let keypair = SuiKeypair::from_secret(&hex::encode(SEED)).unwrap();
        assert!(format!("{:?}", keypair).contains("REDACTED"));
    }
}
