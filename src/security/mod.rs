//! Standard security handler algorithms
//!
//! Key derivation for revisions 2 to 4, password authentication and the
//! per-object cipher used while the cross-reference table is written.

mod authentication;
mod key_derivation;
mod object_encryption;

pub use object_encryption::{object_key, ObjectCipher};
pub(crate) use key_derivation::{compute_encryption_key, compute_user_key};

/// Password padding string
pub const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41,
    0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80,
    0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Length of an MD5 digest and of the document ID
pub const MD5_KEY_LEN: usize = 16;

/// Truncate or pad a password to exactly 32 bytes
pub fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = [0u8; 32];
    let len = password.len().min(32);
    padded[..len].copy_from_slice(&password[..len]);
    padded[len..].copy_from_slice(&PASSWORD_PADDING[..32 - len]);
    padded
}
