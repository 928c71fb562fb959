//! RC4 encryption provider implementation

use rc4::consts::{U1, U10, U11, U12, U13, U14, U15, U16, U2, U3, U4, U5, U6, U7, U8, U9};
use rc4::{KeyInit, Rc4, StreamCipher};

use super::CryptoProvider;
use crate::error::{PDFError, PDFResult};

macro_rules! apply_rc4 {
    ($key:expr, $data:expr, $($len:literal => $size:ty),+ $(,)?) => {
        match $key.len() {
            $(
                $len => {
                    let mut cipher = Rc4::<$size>::new_from_slice($key)
                        .map_err(|e| PDFError::crypto(e.to_string()))?;
                    cipher.apply_keystream($data);
                }
            )+
            other => return Err(PDFError::InvalidEncryptKeyLength(other)),
        }
    };
}

/// Apply the RC4 keystream for `key` to `data` in place
///
/// Keys of 1 to 16 bytes are accepted, which covers every key the
/// standard security handler derives.
pub fn rc4_apply(key: &[u8], data: &mut [u8]) -> PDFResult<()> {
    apply_rc4!(key, data,
        1 => U1, 2 => U2, 3 => U3, 4 => U4, 5 => U5, 6 => U6, 7 => U7, 8 => U8,
        9 => U9, 10 => U10, 11 => U11, 12 => U12, 13 => U13, 14 => U14, 15 => U15, 16 => U16,
    );
    Ok(())
}

/// RC4 encryption provider
#[derive(Debug, Default)]
pub struct RC4Provider;

impl RC4Provider {
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for RC4Provider {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> PDFResult<Vec<u8>> {
        let mut output = data.to_vec();
        rc4_apply(key, &mut output)?;
        Ok(output)
    }

    fn decrypt(&self, data: &[u8], key: &[u8]) -> PDFResult<Vec<u8>> {
        self.encrypt(data, key)
    }
}
