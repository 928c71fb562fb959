//! PDF stream object implementation

use std::io::Write;

use log::{debug, trace};

use super::filter::{apply_filters, FilterContext, FilterSet};
use super::{Dictionary, ObjectType, PDFWriter};
use crate::error::{PDFError, PDFResult};
use crate::security::ObjectCipher;

/// PDF stream object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stream {
    /// Stream dictionary
    dictionary: Dictionary,
    /// Unfiltered stream data
    data: Vec<u8>,
    /// Filters applied on output
    filters: FilterSet,
    context: FilterContext,
}

impl Stream {
    /// Create new empty stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Create stream with an existing dictionary
    pub fn with_dictionary(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            ..Self::default()
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    pub fn filters(&self) -> FilterSet {
        self.filters
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
    }

    pub fn add_filter(&mut self, filter: FilterSet) {
        self.filters.insert(filter);
    }

    pub fn set_compression_level(&mut self, level: u32) {
        self.context.compression_level = level.min(9);
    }

    /// Append bytes to the raw buffer
    pub fn write_to_stream(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }

    /// Append `count` bytes of `data` starting at `offset`
    pub fn write_range(&mut self, data: &[u8], offset: usize, count: usize) -> PDFResult<()> {
        let end = offset
            .checked_add(count)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                PDFError::invalid_parameter(format!(
                    "range {}+{} outside buffer of {} bytes",
                    offset,
                    count,
                    data.len()
                ))
            })?;
        self.data.extend_from_slice(&data[offset..end]);
        Ok(())
    }

    /// Reset the raw buffer
    pub fn clear_stream(&mut self) {
        self.data.clear();
    }

    /// Unfiltered bytes
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Apply filters to the raw buffer and update `/Filter`
    pub fn encode(&mut self) -> PDFResult<Vec<u8>> {
        let encoded = apply_filters(&self.data, self.filters, &self.context)?;

        let names: Vec<ObjectType> = self
            .filters
            .filters()
            .iter()
            .map(|f| ObjectType::name(f.name()))
            .collect::<PDFResult<_>>()?;
        if names.is_empty() {
            self.dictionary.remove("Filter");
        } else {
            self.dictionary.set("Filter", ObjectType::Array(names));
        }

        trace!("Stream encoded: {} -> {} bytes", self.data.len(), encoded.len());
        Ok(encoded)
    }

    /// Write dictionary, `stream`, payload and `endstream`
    pub fn write_value<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        cipher: Option<&ObjectCipher>,
    ) -> PDFResult<()> {
        let mut payload = self.encode()?;
        if let Some(cipher) = cipher {
            payload = cipher.encrypt(&payload)?;
        }

        let length = i32::try_from(payload.len()).map_err(|_| {
            PDFError::invalid_parameter(format!("stream of {} bytes is too large", payload.len()))
        })?;
        self.dictionary.set("Length", length);
        debug!("Writing stream with /Length {}", length);

        self.dictionary.write_value(writer, cipher)?;
        writer.write_bytes(b"\nstream\n")?;
        writer.write_bytes(&payload)?;
        writer.write_bytes(b"\nendstream")
    }
}
