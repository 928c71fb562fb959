//! AES encryption provider implementation
//!
//! Output layout is the 16-byte IV followed by the CBC ciphertext with
//! PKCS#7 padding, as the AESV2 crypt filter expects.

use aes::Aes128;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{thread_rng, RngCore};

use super::CryptoProvider;
use crate::error::{PDFError, PDFResult};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

pub const AES_BLOCK_SIZE: usize = 16;

/// AES-128-CBC encryption provider
#[derive(Debug, Default)]
pub struct AESProvider;

impl AESProvider {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt with a caller-chosen IV
    pub fn encrypt_with_iv(&self, data: &[u8], key: &[u8], iv: &[u8; AES_BLOCK_SIZE]) -> PDFResult<Vec<u8>> {
        if key.len() != 16 {
            return Err(PDFError::InvalidEncryptKeyLength(key.len()));
        }
        let encryptor = Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(|e| PDFError::crypto(e.to_string()))?;

        let mut output = Vec::with_capacity(AES_BLOCK_SIZE + data.len() + AES_BLOCK_SIZE);
        output.extend_from_slice(iv);
        output.extend_from_slice(&encryptor.encrypt_padded_vec_mut::<Pkcs7>(data));
        Ok(output)
    }
}

impl CryptoProvider for AESProvider {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> PDFResult<Vec<u8>> {
        let mut iv = [0u8; AES_BLOCK_SIZE];
        thread_rng().fill_bytes(&mut iv);
        self.encrypt_with_iv(data, key, &iv)
    }

    fn decrypt(&self, data: &[u8], key: &[u8]) -> PDFResult<Vec<u8>> {
        if key.len() != 16 {
            return Err(PDFError::InvalidEncryptKeyLength(key.len()));
        }
        if data.len() < 2 * AES_BLOCK_SIZE || data.len() % AES_BLOCK_SIZE != 0 {
            return Err(PDFError::crypto(format!(
                "AES payload of {} bytes is not IV plus whole blocks",
                data.len()
            )));
        }

        let (iv, body) = data.split_at(AES_BLOCK_SIZE);
        Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|e| PDFError::crypto(e.to_string()))?
            .decrypt_padded_vec_mut::<Pkcs7>(body)
            .map_err(|e| PDFError::crypto(e.to_string()))
    }
}
