use log::debug;
use zeroize::Zeroizing;

use super::{pad_password, MD5_KEY_LEN, PASSWORD_PADDING};
use crate::crypto::rc4_apply;
use crate::error::PDFResult;
use crate::handlers::StandardSecurityHandler;
use crate::EncryptMode;

/// RC4 key protecting the owner entry (Algorithm 3.3, steps 1-4)
pub(crate) fn owner_rc4_key(mode: EncryptMode, key_len: usize, owner_padded: &[u8; 32]) -> Zeroizing<Vec<u8>> {
    let mut digest = md5::compute(owner_padded).0;
    if mode.revision() >= 3 {
        for _ in 0..50 {
            digest = md5::compute(&digest[..key_len]).0;
        }
    }
    Zeroizing::new(digest[..key_len].to_vec())
}

/// Apply the 19 extra RC4 passes of revision 3 and later, keyed by `key ^ i`
pub(crate) fn rc4_rounds(key: &[u8], data: &mut [u8], rounds: impl Iterator<Item = u8>) -> PDFResult<()> {
    let mut round_key = Zeroizing::new(vec![0u8; key.len()]);
    for i in rounds {
        for (dst, src) in round_key.iter_mut().zip(key) {
            *dst = src ^ i;
        }
        rc4_apply(&round_key, data)?;
    }
    Ok(())
}

/// Algorithm 3.3: the `/O` value
pub(crate) fn compute_owner_key(
    mode: EncryptMode,
    key_len: usize,
    owner_padded: &[u8; 32],
    user_padded: &[u8; 32],
) -> PDFResult<[u8; 32]> {
    let key = owner_rc4_key(mode, key_len, owner_padded);

    let mut owner_key = *user_padded;
    rc4_apply(&key, &mut owner_key)?;
    if mode.revision() >= 3 {
        rc4_rounds(&key, &mut owner_key, 1..=19)?;
    }
    Ok(owner_key)
}

/// Algorithm 3.2: the file encryption key
pub(crate) fn compute_encryption_key(
    mode: EncryptMode,
    key_len: usize,
    user_padded: &[u8; 32],
    owner_key: &[u8; 32],
    permission: u32,
    encrypt_id: &[u8],
) -> Zeroizing<Vec<u8>> {
    let mut context = md5::Context::new();
    context.consume(user_padded);
    context.consume(owner_key);
    context.consume(permission.to_le_bytes());
    context.consume(encrypt_id);
    let mut digest = context.finalize().0;

    if mode.revision() >= 3 {
        for _ in 0..50 {
            digest = md5::compute(&digest[..key_len]).0;
        }
    }
    Zeroizing::new(digest[..key_len].to_vec())
}

/// Algorithms 3.4 and 3.5: the `/U` value
pub(crate) fn compute_user_key(
    mode: EncryptMode,
    encryption_key: &[u8],
    encrypt_id: &[u8],
) -> PDFResult<[u8; 32]> {
    let mut user_key = [0u8; 32];
    if mode.revision() == 2 {
        user_key = PASSWORD_PADDING;
        rc4_apply(encryption_key, &mut user_key)?;
        return Ok(user_key);
    }

    let mut context = md5::Context::new();
    context.consume(PASSWORD_PADDING);
    context.consume(encrypt_id);
    let mut digest = context.finalize().0;

    rc4_apply(encryption_key, &mut digest)?;
    rc4_rounds(encryption_key, &mut digest, 1..=19)?;

    user_key[..MD5_KEY_LEN].copy_from_slice(&digest);
    Ok(user_key)
}

impl StandardSecurityHandler {
    /// Derive `/O` from the owner and user passwords
    pub fn create_owner_key(&mut self) -> PDFResult<()> {
        self.owner_key = compute_owner_key(
            self.mode,
            self.key_length,
            &self.owner_password,
            &self.user_password,
        )?;
        debug!("Owner key derived for {}", self.mode);
        Ok(())
    }

    /// Derive the file key from `/O`, `/P` and the document ID
    pub fn create_encryption_key(&mut self) -> PDFResult<()> {
        let key = compute_encryption_key(
            self.mode,
            self.key_length,
            &self.user_password,
            &self.owner_key,
            self.permission,
            &self.encrypt_id,
        );
        self.encryption_key.clear();
        self.encryption_key.extend_from_slice(&key);
        debug!("Encryption key derived, {} bytes", self.key_length);
        Ok(())
    }

    /// Derive `/U` from the file key
    pub fn create_user_key(&mut self) -> PDFResult<()> {
        self.user_key = compute_user_key(self.mode, &self.encryption_key, &self.encrypt_id)?;
        Ok(())
    }

    /// Padded form of a candidate password
    pub(crate) fn padded(password: &[u8]) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(pad_password(password))
    }
}
