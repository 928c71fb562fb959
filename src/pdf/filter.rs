//! Stream filter encoders
//!
//! Streams are encoded in a fixed order: Flate compression, then ASCII
//! armoring. DCT payloads arrive already encoded, pass through unchanged and
//! are listed last.

use std::fmt;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::trace;

use crate::error::{PDFError, PDFResult};

/// Filters that can be applied to a stream on output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// JPEG data supplied already encoded
    DCTDecode,
    FlateDecode,
    ASCIIHexDecode,
    ASCII85Decode,
}

/// Bit set of filters requested for a stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FilterSet(u32);

impl FilterSet {
    pub const NONE: FilterSet = FilterSet(0);
    pub const ASCIIHEX_DECODE: FilterSet = FilterSet(0x0100);
    pub const ASCII85_DECODE: FilterSet = FilterSet(0x0200);
    pub const FLATE_DECODE: FilterSet = FilterSet(0x0400);
    pub const DCT_DECODE: FilterSet = FilterSet(0x0800);

    /// Create a filter set from raw bits
    pub fn from_bits(bits: u32) -> Self {
        Self(bits & 0x0F00)
    }

    /// Get raw bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Check if every filter in `other` is present
    pub fn contains(&self, other: FilterSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: FilterSet) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: FilterSet) {
        self.0 &= !other.0;
    }

    /// Filters in application order
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::with_capacity(4);
        if self.contains(Self::FLATE_DECODE) {
            filters.push(Filter::FlateDecode);
        }
        if self.contains(Self::ASCIIHEX_DECODE) {
            filters.push(Filter::ASCIIHexDecode);
        }
        if self.contains(Self::ASCII85_DECODE) {
            filters.push(Filter::ASCII85Decode);
        }
        if self.contains(Self::DCT_DECODE) {
            filters.push(Filter::DCTDecode);
        }
        filters
    }
}

impl std::ops::BitOr for FilterSet {
    type Output = FilterSet;

    fn bitor(self, rhs: FilterSet) -> FilterSet {
        FilterSet(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for FilterSet {
    fn bitor_assign(&mut self, rhs: FilterSet) {
        self.0 |= rhs.0;
    }
}

/// Filter processing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterContext {
    /// zlib level, 0..=9
    pub compression_level: u32,
}

impl Default for FilterContext {
    fn default() -> Self {
        Self {
            compression_level: 6,
        }
    }
}

impl Filter {
    /// PDF name of the filter
    pub fn name(&self) -> &'static str {
        match self {
            Filter::DCTDecode => "DCTDecode",
            Filter::FlateDecode => "FlateDecode",
            Filter::ASCIIHexDecode => "ASCIIHexDecode",
            Filter::ASCII85Decode => "ASCII85Decode",
        }
    }

    /// Create filter from its PDF name
    pub fn from_name(name: &str) -> PDFResult<Self> {
        match name {
            "DCTDecode" => Ok(Filter::DCTDecode),
            "FlateDecode" => Ok(Filter::FlateDecode),
            "ASCIIHexDecode" => Ok(Filter::ASCIIHexDecode),
            "ASCII85Decode" => Ok(Filter::ASCII85Decode),
            _ => Err(PDFError::invalid_parameter(format!(
                "unsupported filter: {}",
                name
            ))),
        }
    }

    /// Encode data with this filter
    pub fn encode(&self, data: &[u8], ctx: &FilterContext) -> PDFResult<Vec<u8>> {
        trace!("Applying filter {} to {} bytes", self, data.len());
        match self {
            Filter::DCTDecode => Ok(data.to_vec()),
            Filter::FlateDecode => encode_flate(data, ctx),
            Filter::ASCIIHexDecode => Ok(encode_ascii_hex(data)),
            Filter::ASCII85Decode => Ok(encode_ascii85(data)),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `data` through every filter of `set`, in application order
pub fn apply_filters(data: &[u8], set: FilterSet, ctx: &FilterContext) -> PDFResult<Vec<u8>> {
    let mut encoded = data.to_vec();
    for filter in set.filters() {
        encoded = filter.encode(&encoded, ctx)?;
    }
    Ok(encoded)
}

// zlib-wrapped deflate, which is what FlateDecode expects
fn encode_flate(data: &[u8], ctx: &FilterContext) -> PDFResult<Vec<u8>> {
    let level = Compression::new(ctx.compression_level.min(9));
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), level);
    encoder
        .write_all(data)
        .map_err(|e| PDFError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PDFError::CompressionError(e.to_string()))
}

fn encode_ascii_hex(data: &[u8]) -> Vec<u8> {
    let mut output = hex::encode_upper(data).into_bytes();
    output.push(b'>');
    output
}

fn encode_ascii85(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() * 5 / 4 + 2);
    let mut buffer = [0u8; 4];

    for chunk in data.chunks(4) {
        buffer.fill(0);
        buffer[..chunk.len()].copy_from_slice(chunk);

        let value = u32::from_be_bytes(buffer);
        if value == 0 && chunk.len() == 4 {
            output.push(b'z');
            continue;
        }

        let mut digits = [0u8; 5];
        let mut temp = value;
        for digit in digits.iter_mut().rev() {
            *digit = (temp % 85) as u8 + b'!';
            temp /= 85;
        }

        output.extend_from_slice(&digits[..chunk.len() + 1]);
    }

    output.extend_from_slice(b"~>");
    output
}
