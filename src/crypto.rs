//! Password hashing and sealed JSON envelopes.
//!
//! Keys are PBKDF2-HMAC-SHA256 derived, envelopes are AES-256-GCM with the
//! tag stored apart from the ciphertext. Every binary field is standard
//! base64 so envelopes survive a round trip through JSON.

use aes_gcm::aead::{rand_core::RngCore, Aead, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::CryptoError;

pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 200_000;
const ENVELOPE_VERSION: u8 = 1;
const TAG_LEN: usize = 16;
const IV_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoEnvelope {
    pub v: u8,
    pub salt: String,
    pub iv: String,
    pub tag: String,
    pub data: String,
}

/// Salted password hash as persisted in the accounts file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash {
    pub salt: String,
    pub hash: String,
    #[serde(default = "default_pbkdf2_iterations")]
    pub iterations: u32,
}

fn default_pbkdf2_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations.max(1), &mut key);
    key
}

pub fn random_salt() -> [u8; 16] {
    let mut salt = [0u8; 16];
    OsRng.fill_bytes(&mut salt);
    salt
}

pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0_u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn hash_password(password: &str, iterations: u32) -> PasswordHash {
    let iterations = iterations.max(1);
    let salt = random_salt();
    let key = derive_key(password, &salt, iterations);
    PasswordHash {
        salt: encode_b64(&salt),
        hash: encode_b64(key.as_slice()),
        iterations,
    }
}

/// Returns false for malformed records instead of failing; a corrupt hash
/// simply never verifies.
pub fn verify_password(password: &str, record: &PasswordHash) -> bool {
    if password.is_empty() || record.hash.is_empty() {
        return false;
    }
    let Ok(salt) = decode_b64(record.salt.as_str()) else {
        return false;
    };
    let key = derive_key(password, salt.as_slice(), record.iterations);
    encode_b64(key.as_slice()) == record.hash
}

pub fn encrypt_text_with_key(
    text: &str,
    salt: &[u8],
    key: &[u8; 32],
) -> Result<CryptoEnvelope, CryptoError> {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|err| CryptoError::Cipher(err.to_string()))?;
    let nonce = Nonce::from_slice(&iv);
    let encrypted = cipher
        .encrypt(nonce, text.as_bytes())
        .map_err(|err| CryptoError::Cipher(err.to_string()))?;

    if encrypted.len() < TAG_LEN {
        return Err(CryptoError::Cipher("encryption output too short".to_string()));
    }
    let (data, tag) = encrypted.split_at(encrypted.len() - TAG_LEN);

    Ok(CryptoEnvelope {
        v: ENVELOPE_VERSION,
        salt: encode_b64(salt),
        iv: encode_b64(&iv),
        tag: encode_b64(tag),
        data: encode_b64(data),
    })
}

/// `None` means the envelope is damaged or the key is wrong; the two are
/// indistinguishable under GCM.
pub fn decrypt_envelope_with_key(payload: &CryptoEnvelope, key: &[u8; 32]) -> Option<String> {
    let iv = decode_b64(payload.iv.as_str()).ok()?;
    let tag = decode_b64(payload.tag.as_str()).ok()?;
    let data = decode_b64(payload.data.as_str()).ok()?;
    if iv.len() != IV_LEN || tag.is_empty() {
        return None;
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_slice()).ok()?;
    let nonce = Nonce::from_slice(iv.as_slice());
    let mut combined = Vec::with_capacity(data.len() + tag.len());
    combined.extend_from_slice(data.as_slice());
    combined.extend_from_slice(tag.as_slice());

    let decrypted = cipher.decrypt(nonce, combined.as_slice()).ok()?;
    String::from_utf8(decrypted).ok()
}

pub fn envelope_salt(payload: &CryptoEnvelope) -> Option<Vec<u8>> {
    decode_b64(payload.salt.as_str())
        .ok()
        .filter(|salt| !salt.is_empty())
}

pub fn decode_b64(value: &str) -> Result<Vec<u8>, CryptoError> {
    B64.decode(value)
        .map_err(|err| CryptoError::Encoding(err.to_string()))
}

pub fn encode_b64(bytes: &[u8]) -> String {
    B64.encode(bytes)
}
