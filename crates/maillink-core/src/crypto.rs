//! Password encryption for stored account credentials.
//!
//! Passwords are sealed with AES-256-CBC and PKCS#7 padding under the
//! configured `ENCRYPTION_KEY`. The sealed form is `ivHex:cipherHex` with a
//! fresh random 16-byte IV per encryption.

use std::fmt;

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::RngCore;

use crate::config::Settings;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of the AES-256 key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Length of the CBC initialization vector in bytes.
pub const IV_LENGTH: usize = 16;

/// Errors from sealing or opening a password.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// `ENCRYPTION_KEY` is not configured.
    #[error("Encryption key is not configured")]
    MissingKey,

    /// Key is not exactly [`KEY_LENGTH`] bytes.
    #[error("Encryption key must be 32 bytes, got {0}")]
    InvalidKey(usize),

    /// Sealed value has no `:` between IV and ciphertext.
    #[error("Encrypted value is missing the iv separator")]
    MissingSeparator,

    /// IV or ciphertext is not valid hex.
    #[error("Encrypted value is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// IV is not [`IV_LENGTH`] bytes.
    #[error("IV must be 16 bytes, got {0}")]
    InvalidIv(usize),

    /// Ciphertext did not decrypt under this key.
    #[error("Decryption failed")]
    Decrypt,

    /// Decrypted bytes are not UTF-8.
    #[error("Decrypted value is not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// AES-256-CBC cipher for account passwords.
#[derive(Clone)]
pub struct PasswordCipher {
    key: [u8; KEY_LENGTH],
}

impl PasswordCipher {
    /// Creates a cipher from the raw bytes of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] unless `key` is exactly 32 bytes.
    pub fn new(key: &str) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LENGTH] = key
            .as_bytes()
            .try_into()
            .map_err(|_| CryptoError::InvalidKey(key.len()))?;
        Ok(Self { key })
    }

    /// Creates a cipher from the configured `ENCRYPTION_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unset or has the wrong length.
    pub fn from_settings(settings: &Settings) -> Result<Self, CryptoError> {
        let key = settings
            .encryption_key
            .as_deref()
            .ok_or(CryptoError::MissingKey)?;
        Self::new(key)
    }

    /// Encrypts `password` under a fresh random IV.
    #[must_use]
    pub fn encrypt(&self, password: &str) -> String {
        let mut iv = [0u8; IV_LENGTH];
        rand::thread_rng().fill_bytes(&mut iv);
        self.encrypt_with_iv(password, &iv)
    }

    fn encrypt_with_iv(&self, password: &str, iv: &[u8; IV_LENGTH]) -> String {
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &(*iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(password.as_bytes());
        format!("{}:{}", hex::encode(iv), hex::encode(ciphertext))
    }

    /// Decrypts an `ivHex:cipherHex` value.
    ///
    /// Only the first `:` separates the IV.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is malformed or was sealed under a
    /// different key.
    pub fn decrypt(&self, encrypted: &str) -> Result<String, CryptoError> {
        let (iv_hex, cipher_hex) = encrypted
            .split_once(':')
            .ok_or(CryptoError::MissingSeparator)?;

        let iv_bytes = hex::decode(iv_hex)?;
        let iv: [u8; IV_LENGTH] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidIv(iv_bytes.len()))?;
        let ciphertext = hex::decode(cipher_hex)?;

        let plaintext = Aes256CbcDec::new(&self.key.into(), &iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;

        Ok(String::from_utf8(plaintext)?)
    }
}

impl fmt::Debug for PasswordCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCipher").finish_non_exhaustive()
    }
}

/// Encrypts `password` with the configured key.
///
/// # Errors
///
/// Returns an error if `ENCRYPTION_KEY` is unset or not 32 bytes.
pub fn encrypt_password(settings: &Settings, password: &str) -> Result<String, CryptoError> {
    Ok(PasswordCipher::from_settings(settings)?.encrypt(password))
}

/// Decrypts a value produced by [`encrypt_password`].
///
/// # Errors
///
/// Returns an error if the key is unusable or the value is malformed.
pub fn decrypt_password(settings: &Settings, encrypted: &str) -> Result<String, CryptoError> {
    PasswordCipher::from_settings(settings)?.decrypt(encrypted)
}
