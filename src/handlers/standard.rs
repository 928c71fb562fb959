//! Standard Security Handler implementation according to PDF specification

use log::debug;
use rand::{thread_rng, RngCore};
use zeroize::ZeroizeOnDrop;

use crate::doc::generate_document_id;
use crate::error::{PDFError, PDFResult};
use crate::pdf::{Dictionary, ObjectType};
use crate::security::{pad_password, ObjectCipher, MD5_KEY_LEN, PASSWORD_PADDING};
use crate::{EncryptMode, PDFPermissions};

/// Standard security handler for password-based encryption
#[derive(Clone, ZeroizeOnDrop)]
pub struct StandardSecurityHandler {
    #[zeroize(skip)]
    pub(crate) mode: EncryptMode,
    /// Key length in bytes
    #[zeroize(skip)]
    pub(crate) key_length: usize,
    /// `/P` value including the reserved bits
    #[zeroize(skip)]
    pub(crate) permission: u32,
    #[zeroize(skip)]
    owner_password_set: bool,
    pub(crate) owner_password: [u8; 32],
    pub(crate) user_password: [u8; 32],
    pub(crate) owner_key: [u8; 32],
    pub(crate) user_key: [u8; 32],
    pub(crate) encryption_key: Vec<u8>,
    #[zeroize(skip)]
    pub(crate) encrypt_id: [u8; MD5_KEY_LEN],
}

impl StandardSecurityHandler {
    /// Create a handler for `mode`
    ///
    /// `key_length` is in bytes and only matters for R3, which accepts 5
    /// to 16. R2 always uses 5 and R4 always uses 16.
    pub fn new(mode: EncryptMode, key_length: usize) -> PDFResult<Self> {
        let key_length = resolve_key_length(mode, key_length)?;

        Ok(Self {
            mode,
            key_length,
            permission: PDFPermissions::default().padded_bits(),
            owner_password_set: false,
            owner_password: PASSWORD_PADDING,
            user_password: PASSWORD_PADDING,
            owner_key: [0u8; 32],
            user_key: [0u8; 32],
            encryption_key: Vec::new(),
            encrypt_id: [0u8; MD5_KEY_LEN],
        })
    }

    /// Switch revision, keeping passwords and permissions
    ///
    /// Derived keys are discarded until the next prepare.
    pub fn set_mode(&mut self, mode: EncryptMode, key_length: usize) -> PDFResult<()> {
        self.key_length = resolve_key_length(mode, key_length)?;
        self.mode = mode;
        self.encryption_key.clear();
        Ok(())
    }

    /// Set both passwords
    ///
    /// An empty owner password is replaced by random bytes at prepare
    /// time. The owner password may not equal a non-empty user password.
    pub fn set_password(&mut self, owner: &[u8], user: &[u8]) -> PDFResult<()> {
        if !user.is_empty() && owner == user {
            return Err(PDFError::InvalidPassword(
                "owner password must differ from the user password".to_string(),
            ));
        }
        self.set_owner_password(owner);
        self.set_user_password(user);
        Ok(())
    }

    pub fn set_owner_password(&mut self, password: &[u8]) {
        self.owner_password = pad_password(password);
        self.owner_password_set = !password.is_empty();
    }

    pub fn set_user_password(&mut self, password: &[u8]) {
        self.user_password = pad_password(password);
    }

    /// Store permissions, always with the reserved bits set
    pub fn set_permission(&mut self, permissions: PDFPermissions) {
        self.permission = permissions.padded_bits();
    }

    /// Fix the document ID and derive `/O`, the file key and `/U`
    ///
    /// Without an ID one is generated from the Info dictionary. Returns the
    /// ID in use so the caller can place it in the trailer.
    pub fn prepare(
        &mut self,
        encrypt_id: Option<[u8; MD5_KEY_LEN]>,
        info: &Dictionary,
    ) -> PDFResult<[u8; MD5_KEY_LEN]> {
        self.encrypt_id = encrypt_id.unwrap_or_else(|| generate_document_id(info));

        if !self.owner_password_set {
            let mut random = [0u8; 32];
            thread_rng().fill_bytes(&mut random);
            self.owner_password = random;
            self.owner_password_set = true;
        }

        self.create_owner_key()?;
        self.create_encryption_key()?;
        self.create_user_key()?;

        debug!(
            "Security handler prepared: {} with {}-bit key, P = {}",
            self.mode,
            self.key_length * 8,
            self.permission as i32
        );
        Ok(self.encrypt_id)
    }

    /// Build the `/Encrypt` dictionary
    pub fn encrypt_dict(&self) -> PDFResult<Dictionary> {
        if self.encryption_key.is_empty() {
            return Err(PDFError::invalid_document(
                "security handler used before prepare",
            ));
        }

        let mut dict = Dictionary::new();
        dict.set_known_name("Filter", "Standard");
        dict.set("O", ObjectType::Binary(self.owner_key.to_vec()));
        dict.set("U", ObjectType::Binary(self.user_key.to_vec()));
        dict.set("P", self.permission as i32);
        dict.set("V", self.mode.version());
        dict.set("R", self.mode.revision());

        match self.mode {
            EncryptMode::R2 => {}
            EncryptMode::R3 => {
                dict.set("Length", (self.key_length * 8) as i32);
            }
            EncryptMode::R4 => {
                dict.set("Length", 128);
                dict.set_known_name("StmF", "StdCF");
                dict.set_known_name("StrF", "StdCF");

                let mut std_cf = Dictionary::new();
                std_cf.set_known_name("CFM", "AESV2");
                std_cf.set_known_name("AuthEvent", "DocOpen");
                std_cf.set("Length", 16);

                let mut cf = Dictionary::new();
                cf.set("StdCF", std_cf);
                dict.set("CF", cf);
            }
        }
        Ok(dict)
    }

    /// Cipher for the strings and streams of one object
    pub fn object_cipher(&self, number: u32, generation: u16) -> ObjectCipher {
        ObjectCipher::new(&self.encryption_key, number, generation, self.mode)
    }

    pub fn mode(&self) -> EncryptMode {
        self.mode
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn permission(&self) -> u32 {
        self.permission
    }

    pub fn owner_key(&self) -> &[u8; 32] {
        &self.owner_key
    }

    pub fn user_key(&self) -> &[u8; 32] {
        &self.user_key
    }

    pub fn encryption_key(&self) -> &[u8] {
        &self.encryption_key
    }

    pub fn encrypt_id(&self) -> &[u8; MD5_KEY_LEN] {
        &self.encrypt_id
    }
}

fn resolve_key_length(mode: EncryptMode, key_length: usize) -> PDFResult<usize> {
    match mode {
        EncryptMode::R2 => Ok(5),
        EncryptMode::R3 if (5..=16).contains(&key_length) => Ok(key_length),
        EncryptMode::R3 => Err(PDFError::InvalidEncryptKeyLength(key_length)),
        EncryptMode::R4 => Ok(16),
    }
}
