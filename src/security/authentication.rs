use zeroize::Zeroizing;

use super::key_derivation::{owner_rc4_key, rc4_rounds};
use super::{compute_encryption_key, compute_user_key, MD5_KEY_LEN};
use crate::crypto::rc4_apply;
use crate::error::{PDFError, PDFResult};
use crate::handlers::StandardSecurityHandler;

impl StandardSecurityHandler {
    /// Algorithm 3.6: check a user password, returning the file key
    pub fn authenticate_user_password(&self, password: &[u8]) -> PDFResult<Zeroizing<Vec<u8>>> {
        let padded = Self::padded(password);
        self.authenticate_padded_user(&padded)
    }

    /// Algorithm 3.7: check an owner password, returning the file key
    pub fn authenticate_owner_password(&self, password: &[u8]) -> PDFResult<Zeroizing<Vec<u8>>> {
        let padded = Self::padded(password);
        let key = owner_rc4_key(self.mode, self.key_length, &padded);

        let mut user_padded = Zeroizing::new(self.owner_key);
        if self.mode.revision() >= 3 {
            rc4_rounds(&key, &mut user_padded[..], (1..=19).rev())?;
        }
        rc4_apply(&key, &mut user_padded[..])?;

        self.authenticate_padded_user(&user_padded)
    }

    fn authenticate_padded_user(&self, padded: &[u8; 32]) -> PDFResult<Zeroizing<Vec<u8>>> {
        let key = compute_encryption_key(
            self.mode,
            self.key_length,
            padded,
            &self.owner_key,
            self.permission,
            &self.encrypt_id,
        );
        let user_key = compute_user_key(self.mode, &key, &self.encrypt_id)?;

        let compared = if self.mode.revision() == 2 { 32 } else { MD5_KEY_LEN };
        if constant_time_eq(&user_key[..compared], &self.user_key[..compared]) {
            Ok(key)
        } else {
            Err(PDFError::AuthenticationFailed)
        }
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
