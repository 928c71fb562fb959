//! Document information dictionary

use chrono::{DateTime, FixedOffset, Offset};

use crate::error::{PDFError, PDFResult};
use crate::pdf::{Dictionary, ObjectType, PDFString};

/// Producer written into every new document
pub const DEFAULT_PRODUCER: &str = concat!("pdf-forge ", env!("CARGO_PKG_VERSION"));

/// Text entries of the Info dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoAttr {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Producer,
}

impl InfoAttr {
    pub fn key(&self) -> &'static str {
        match self {
            InfoAttr::Title => "Title",
            InfoAttr::Author => "Author",
            InfoAttr::Subject => "Subject",
            InfoAttr::Keywords => "Keywords",
            InfoAttr::Creator => "Creator",
            InfoAttr::Producer => "Producer",
        }
    }
}

/// Date entries of the Info dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoDate {
    CreationDate,
    ModDate,
}

impl InfoDate {
    pub fn key(&self) -> &'static str {
        match self {
            InfoDate::CreationDate => "CreationDate",
            InfoDate::ModDate => "ModDate",
        }
    }
}

/// `/Trapped` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trapped {
    True,
    False,
    Unknown,
}

impl Trapped {
    pub fn name(&self) -> &'static str {
        match self {
            Trapped::True => "True",
            Trapped::False => "False",
            Trapped::Unknown => "Unknown",
        }
    }
}

/// Keys managed through typed setters
const RESERVED_KEYS: [&str; 9] = [
    "Title",
    "Author",
    "Subject",
    "Keywords",
    "Creator",
    "Producer",
    "CreationDate",
    "ModDate",
    "Trapped",
];

/// Fresh Info dictionary carrying the default producer
pub fn new_info_dict() -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set(InfoAttr::Producer.key(), PDFString::from(DEFAULT_PRODUCER));
    dict
}

pub fn set_text(dict: &mut Dictionary, attr: InfoAttr, value: &str) {
    dict.set(attr.key(), PDFString::from(value));
}

pub fn get_text(dict: &Dictionary, attr: InfoAttr) -> Option<String> {
    dict.get_string(attr.key())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

pub fn set_date(dict: &mut Dictionary, attr: InfoDate, date: &DateTime<FixedOffset>) {
    dict.set(attr.key(), PDFString::from(format_pdf_date(date).as_str()));
}

pub fn set_trapped(dict: &mut Dictionary, trapped: Trapped) {
    dict.set_known_name("Trapped", trapped.name());
}

/// Add a non-standard text entry
pub fn set_custom(dict: &mut Dictionary, key: &str, value: &str) -> PDFResult<()> {
    if key.is_empty() {
        return Err(PDFError::NameInvalidValue);
    }
    if RESERVED_KEYS.contains(&key) {
        return Err(PDFError::invalid_parameter(format!(
            "/{} has a dedicated setter",
            key
        )));
    }
    dict.set(key, ObjectType::String(PDFString::from(value)));
    Ok(())
}

/// `D:YYYYMMDDHHmmSS` followed by `Z` or `+HH'mm'`
pub fn format_pdf_date(date: &DateTime<FixedOffset>) -> String {
    let mut text = date.format("D:%Y%m%d%H%M%S").to_string();
    let offset = date.offset().fix().local_minus_utc();
    if offset == 0 {
        text.push('Z');
    } else {
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.abs() / 60;
        text.push_str(&format!("{}{:02}'{:02}'", sign, minutes / 60, minutes % 60));
    }
    text
}
