//! Error types for PDF document construction and serialization

use std::io;
use thiserror::Error;

/// Main error type for PDF writing operations
#[derive(Error, Debug)]
pub enum PDFError {
    /// Name object constructed from an empty string
    #[error("Invalid name value: names must not be empty")]
    NameInvalidValue,

    /// Name longer than the PDF implementation limit
    #[error("Name length {0} exceeds the limit of 127 bytes")]
    NameOutOfRange(usize),

    /// Real value that cannot be represented in PDF syntax
    #[error("Real value out of range: {0}")]
    RealOutOfRange(f32),

    /// Missing or malformed caller argument
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Handle resolved to an object of the wrong kind
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObject {
        expected: &'static str,
        found: &'static str,
    },

    /// Handle does not belong to this cross-reference table
    #[error("Object not found: {0}")]
    ObjectNotFound(u32),

    /// Page or pages node already attached elsewhere in the tree
    #[error("Page tree node already has a different parent")]
    PageCannotSetParent,

    /// Cross-reference table overflow
    #[error("Cross reference table count error: {0} entries")]
    XRefCountError(usize),

    /// Page label style outside the known set
    #[error("Page number style out of range")]
    PageNumStyleOutOfRange,

    /// Page label starting value out of range
    #[error("Page label value out of range: {0}")]
    PageLabelOutOfRange(i64),

    /// Document in a state that cannot be saved
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Key length not allowed for the selected encryption mode
    #[error("Invalid encryption key length: {0}")]
    InvalidEncryptKeyLength(usize),

    /// Password combination rejected by the security handler
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Password does not match the security handler values
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Compression error
    #[error("Compression error: {0}")]
    CompressionError(String),

    /// Cryptographic operation failed
    #[error("Cryptographic operation failed: {0}")]
    CryptoError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type for PDF writing operations
pub type PDFResult<T> = Result<T, PDFError>;

impl PDFError {
    /// Create a new invalid parameter error
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new invalid document error
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create a new crypto error
    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::CryptoError(msg.into())
    }

    /// Check if error was caused by a bad caller argument
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::NameInvalidValue
                | Self::NameOutOfRange(_)
                | Self::RealOutOfRange(_)
                | Self::InvalidParameter(_)
                | Self::PageNumStyleOutOfRange
                | Self::PageLabelOutOfRange(_)
        )
    }

    /// Check if error is encryption related
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::CryptoError(_)
                | Self::InvalidEncryptKeyLength(_)
                | Self::InvalidPassword(_)
                | Self::AuthenticationFailed
        )
    }

    /// Check if error comes from the object graph structure
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidObject { .. }
                | Self::ObjectNotFound(_)
                | Self::PageCannotSetParent
                | Self::XRefCountError(_)
                | Self::InvalidDocument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PDFError::NameOutOfRange(200).to_string(),
            "Name length 200 exceeds the limit of 127 bytes"
        );
        assert_eq!(
            PDFError::invalid_parameter("offset past end").to_string(),
            "Invalid parameter: offset past end"
        );
        assert_eq!(
            PDFError::InvalidObject {
                expected: "Dictionary",
                found: "Array"
            }
            .to_string(),
            "Invalid object type: expected Dictionary, found Array"
        );
    }

    #[test]
    fn test_error_categories() {
        assert!(PDFError::NameInvalidValue.is_parameter_error());
        assert!(PDFError::RealOutOfRange(f32::NAN).is_parameter_error());
        assert!(PDFError::crypto("bad iv").is_crypto_error());
        assert!(PDFError::PageCannotSetParent.is_structure_error());
        assert!(!PDFError::PageCannotSetParent.is_crypto_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let err: PDFError = io::Error::new(io::ErrorKind::WriteZero, "disk full").into();
        assert!(matches!(err, PDFError::IoError(_)));
    }
}
