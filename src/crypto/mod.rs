//! Cipher providers used by the standard security handler

mod aes;
mod rc4;

pub use self::aes::AESProvider;
pub use self::rc4::{rc4_apply, RC4Provider};
use crate::error::PDFResult;

/// Byte-level cipher applied to PDF strings and streams
pub trait CryptoProvider: Send + Sync {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> PDFResult<Vec<u8>>;
    fn decrypt(&self, data: &[u8], key: &[u8]) -> PDFResult<Vec<u8>>;
}
