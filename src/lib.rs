//! PDF Forge
//!
//! A library for building PDF documents in memory and serializing them:
//! the object graph and cross-reference table, stream filters, the
//! standard security handler (RC4 40/128 and AES-128) and PDF/A-1
//! metadata.
//!
//! ```no_run
//! use pdf_forge::{CompressionMode, Document};
//!
//! # fn main() -> pdf_forge::PDFResult<()> {
//! let mut doc = Document::new()?;
//! doc.set_compression_mode(CompressionMode::ALL);
//! let page = doc.add_page()?;
//! doc.page_contents(page)?.write_to_stream(b"1 w\n50 50 495 731 re\nS\n");
//! doc.save_to_file("out.pdf")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;

pub mod crypto;
pub mod doc;
mod error;
pub mod handlers;
pub mod pdf;
pub mod security;

pub use doc::{
    Destination, DestinationKind, Document, InfoAttr, InfoDate, Outline, Page, PageLabelStyle,
    PageLayout, PageMode, PagesNode, PdfAConformance, ResourceClass, Trapped,
};
pub use error::{PDFError, PDFResult};
pub use handlers::StandardSecurityHandler;

/// Standard security handler revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptMode {
    /// RC4 with a 40-bit key (PDF 1.1)
    R2,
    /// RC4 with a 40 to 128-bit key (PDF 1.4)
    R3,
    /// AES-128 through the AESV2 crypt filter (PDF 1.6)
    R4,
}

impl EncryptMode {
    /// `/V` entry
    pub fn version(&self) -> i32 {
        match self {
            EncryptMode::R2 => 1,
            EncryptMode::R3 => 2,
            EncryptMode::R4 => 4,
        }
    }

    /// `/R` entry
    pub fn revision(&self) -> i32 {
        match self {
            EncryptMode::R2 => 2,
            EncryptMode::R3 => 3,
            EncryptMode::R4 => 4,
        }
    }

    pub fn uses_aes(&self) -> bool {
        matches!(self, EncryptMode::R4)
    }

    /// Lowest file version able to carry this handler
    pub fn min_pdf_version(&self) -> PDFVersion {
        match self {
            EncryptMode::R2 => PDFVersion::V1_2,
            EncryptMode::R3 => PDFVersion::V1_4,
            EncryptMode::R4 => PDFVersion::V1_6,
        }
    }
}

impl fmt::Display for EncryptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptMode::R2 => write!(f, "RC4-40 (R2)"),
            EncryptMode::R3 => write!(f, "RC4-128 (R3)"),
            EncryptMode::R4 => write!(f, "AES-128 (R4)"),
        }
    }
}

/// PDF permissions flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PDFPermissions(u32);

impl PDFPermissions {
    /// No permissions
    pub const NONE: u32 = 0;
    /// Print the document
    pub const PRINT: u32 = 1 << 2;
    /// Modify the document
    pub const MODIFY: u32 = 1 << 3;
    /// Copy text and graphics
    pub const COPY: u32 = 1 << 4;
    /// Add or modify annotations
    pub const ANNOTATE: u32 = 1 << 5;
    /// Fill form fields
    pub const FILL_FORMS: u32 = 1 << 8;
    /// Extract text and graphics for accessibility
    pub const EXTRACT: u32 = 1 << 9;
    /// Assemble the document
    pub const ASSEMBLE: u32 = 1 << 10;
    /// Print in high quality
    pub const PRINT_HIGH: u32 = 1 << 11;
    /// All permissions
    pub const ALL: u32 = Self::PRINT
        | Self::MODIFY
        | Self::COPY
        | Self::ANNOTATE
        | Self::FILL_FORMS
        | Self::EXTRACT
        | Self::ASSEMBLE
        | Self::PRINT_HIGH;
    /// Bits that must always be set in `/P`
    pub const RESERVED: u32 = 0xFFFF_F0C0;

    /// Create new permissions from raw bits
    pub fn new(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    /// Get raw permission bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Bits as stored in `/P`
    pub fn padded_bits(&self) -> u32 {
        self.0 | Self::RESERVED
    }

    /// Check if specific permission is granted
    pub fn has_permission(&self, permission: u32) -> bool {
        (self.0 & permission) == permission
    }
}

impl Default for PDFPermissions {
    fn default() -> Self {
        Self(Self::ALL)
    }
}

/// File format version written in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PDFVersion {
    V1_2,
    #[default]
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
}

impl PDFVersion {
    /// Header line without the trailing newline
    pub fn header(&self) -> &'static str {
        match self {
            PDFVersion::V1_2 => "%PDF-1.2",
            PDFVersion::V1_3 => "%PDF-1.3",
            PDFVersion::V1_4 => "%PDF-1.4",
            PDFVersion::V1_5 => "%PDF-1.5",
            PDFVersion::V1_6 => "%PDF-1.6",
            PDFVersion::V1_7 => "%PDF-1.7",
        }
    }
}

impl fmt::Display for PDFVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header()[5..])
    }
}

/// Which stream categories are Flate compressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionMode(u32);

impl CompressionMode {
    pub const NONE: CompressionMode = CompressionMode(0);
    /// Page content streams
    pub const TEXT: CompressionMode = CompressionMode(0x01);
    pub const IMAGE: CompressionMode = CompressionMode(0x02);
    /// Font and other metadata streams
    pub const METADATA: CompressionMode = CompressionMode(0x04);
    pub const ALL: CompressionMode = CompressionMode(0x0F);

    pub fn from_bits(bits: u32) -> PDFResult<Self> {
        if bits & !Self::ALL.0 != 0 {
            return Err(PDFError::invalid_parameter(format!(
                "invalid compression mode: {:#x}",
                bits
            )));
        }
        Ok(Self(bits))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: CompressionMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CompressionMode {
    type Output = CompressionMode;

    fn bitor(self, rhs: CompressionMode) -> CompressionMode {
        CompressionMode(self.0 | rhs.0)
    }
}
