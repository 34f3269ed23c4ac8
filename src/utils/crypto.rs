//! Field-level encryption for the employee date of birth.
//!
//! AES-CBC with PKCS#7 padding, using one key and one IV loaded at startup.
//! The IV never changes, so equal plaintexts encrypt to equal ciphertexts.
//! Rows already in the database were written this way, so the scheme must
//! stay as-is until a migration re-encrypts them (random IV stored next to
//! the ciphertext, authenticated mode).
//!
//! Format: raw ciphertext bytes, length a multiple of 16.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chrono::NaiveDate;
use thiserror::Error;

const BLOCK_LEN: usize = 16;
pub const IV_LEN: usize = BLOCK_LEN;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encryption key must be 16, 24 or 32 bytes (got {0})")]
    InvalidKeyLength(usize),
    #[error("encryption IV must be 16 bytes (got {0})")]
    InvalidIvLength(usize),
    #[error("ciphertext length {0} is not a positive multiple of 16")]
    InvalidCiphertextLength(usize),
    #[error("decryption failed (wrong key/IV or corrupted data)")]
    Decrypt,
    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,
    #[error("decrypted value {0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),
}

#[derive(Clone)]
enum AesKey {
    Aes128([u8; 16]),
    Aes192([u8; 24]),
    Aes256([u8; 32]),
}

/// Deterministic encryptor for a single string column.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct FieldCipher {
    key: AesKey,
    iv: [u8; IV_LEN],
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = match self.key {
            AesKey::Aes128(_) => 128,
            AesKey::Aes192(_) => 192,
            AesKey::Aes256(_) => 256,
        };
        f.debug_struct("FieldCipher").field("aes_bits", &bits).finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Builds a cipher from raw key and IV bytes. The key length picks AES-128/192/256.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        let key = match key.len() {
            16 => AesKey::Aes128(copy_array(key)),
            24 => AesKey::Aes192(copy_array(key)),
            32 => AesKey::Aes256(copy_array(key)),
            other => return Err(CryptoError::InvalidKeyLength(other)),
        };
        if iv.len() != IV_LEN {
            return Err(CryptoError::InvalidIvLength(iv.len()));
        }
        Ok(Self {
            key,
            iv: copy_array(iv),
        })
    }

    pub fn encrypt(&self, plaintext: &str) -> Vec<u8> {
        let msg = plaintext.as_bytes();
        match &self.key {
            AesKey::Aes128(k) => cbc::Encryptor::<Aes128>::new(&(*k).into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(msg),
            AesKey::Aes192(k) => cbc::Encryptor::<Aes192>::new(&(*k).into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(msg),
            AesKey::Aes256(k) => cbc::Encryptor::<Aes256>::new(&(*k).into(), &self.iv.into())
                .encrypt_padded_vec_mut::<Pkcs7>(msg),
        }
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<String, CryptoError> {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::InvalidCiphertextLength(ciphertext.len()));
        }

        let plain = match &self.key {
            AesKey::Aes128(k) => cbc::Decryptor::<Aes128>::new(&(*k).into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            AesKey::Aes192(k) => cbc::Decryptor::<Aes192>::new(&(*k).into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
            AesKey::Aes256(k) => cbc::Decryptor::<Aes256>::new(&(*k).into(), &self.iv.into())
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        }
        .map_err(|_| CryptoError::Decrypt)?;

        String::from_utf8(plain).map_err(|_| CryptoError::InvalidUtf8)
    }

    /// Encrypts a date in its `YYYY-MM-DD` form.
    pub fn encrypt_date(&self, date: NaiveDate) -> Vec<u8> {
        self.encrypt(&date.format(DATE_FORMAT).to_string())
    }

    pub fn decrypt_date(&self, ciphertext: &[u8]) -> Result<NaiveDate, CryptoError> {
        let text = self.decrypt(ciphertext)?;
        NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|_| CryptoError::InvalidDate(text))
    }
}

fn copy_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
