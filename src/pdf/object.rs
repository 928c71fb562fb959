//! PDF object types and their serialization

use std::fmt;
use std::io::Write;

use log::trace;

use super::{Dictionary, PDFWriter, Stream};
use crate::error::{PDFError, PDFResult};
use crate::security::ObjectCipher;

/// Longest name accepted by common PDF consumers
pub const MAX_NAME_LEN: usize = 127;
/// Largest real magnitude accepted by common PDF consumers
pub const MAX_REAL: f32 = 3.4e38;

/// Handle of an indirect object, resolved to `num gen R` on output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    pub num: u32,
    pub gen: u16,
}

impl ObjectRef {
    pub fn new(num: u32, gen: u16) -> Self {
        Self { num, gen }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.num, self.gen)
    }
}

/// Validated PDF name, compared by content
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// Create a name, rejecting empty and over-long values
    pub fn new(value: impl Into<String>) -> PDFResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(PDFError::NameInvalidValue);
        }
        if value.len() > MAX_NAME_LEN {
            return Err(PDFError::NameOutOfRange(value.len()));
        }
        Ok(Self(value))
    }

    /// Name from a literal known to be valid
    pub(crate) fn known(value: &'static str) -> Self {
        debug_assert!(!value.is_empty() && value.len() <= MAX_NAME_LEN);
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

/// Finite single precision real
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Real(f32);

impl Real {
    pub fn new(value: f32) -> PDFResult<Self> {
        if !value.is_finite() || value.abs() > MAX_REAL {
            return Err(PDFError::RealOutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

/// Text string, written as a literal or in hex form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PDFString {
    value: Vec<u8>,
    hex: bool,
}

impl PDFString {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            hex: false,
        }
    }

    /// String written as `<...>`
    pub fn hex(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            hex: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    pub fn is_hex(&self) -> bool {
        self.hex
    }
}

impl From<&str> for PDFString {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

/// PDF object types
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectType {
    Null,
    Boolean(bool),
    Number(i32),
    Real(Real),
    Name(Name),
    String(PDFString),
    /// Binary data, always written in hex form
    Binary(Vec<u8>),
    Array(Vec<ObjectType>),
    Dictionary(Dictionary),
    Stream(Stream),
    /// Indirect reference
    Reference(ObjectRef),
}

impl ObjectType {
    pub const NULL: ObjectType = ObjectType::Null;
    pub const TRUE: ObjectType = ObjectType::Boolean(true);
    pub const FALSE: ObjectType = ObjectType::Boolean(false);

    /// Create a name object
    pub fn name(value: impl Into<String>) -> PDFResult<Self> {
        Ok(ObjectType::Name(Name::new(value)?))
    }

    /// Create a real object
    pub fn real(value: f32) -> PDFResult<Self> {
        Ok(ObjectType::Real(Real::new(value)?))
    }

    /// Create a literal string object
    pub fn string(value: impl Into<Vec<u8>>) -> Self {
        ObjectType::String(PDFString::new(value))
    }

    /// Array of reals, e.g. a rectangle
    pub fn real_array(values: &[f32]) -> PDFResult<Self> {
        let items = values
            .iter()
            .map(|v| ObjectType::real(*v))
            .collect::<PDFResult<Vec<_>>>()?;
        Ok(ObjectType::Array(items))
    }

    pub(crate) fn known_name(value: &'static str) -> Self {
        ObjectType::Name(Name::known(value))
    }

    /// Kind name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectType::Null => "Null",
            ObjectType::Boolean(_) => "Boolean",
            ObjectType::Number(_) => "Number",
            ObjectType::Real(_) => "Real",
            ObjectType::Name(_) => "Name",
            ObjectType::String(_) => "String",
            ObjectType::Binary(_) => "Binary",
            ObjectType::Array(_) => "Array",
            ObjectType::Dictionary(_) => "Dictionary",
            ObjectType::Stream(_) => "Stream",
            ObjectType::Reference(_) => "Reference",
        }
    }

    pub fn as_reference(&self) -> Option<ObjectRef> {
        match self {
            ObjectType::Reference(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            ObjectType::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            ObjectType::Name(n) => Some(n.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<ObjectType>> {
        match self {
            ObjectType::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<ObjectType>> {
        match self {
            ObjectType::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Dictionary of a dictionary or stream object
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            ObjectType::Dictionary(d) => Some(d),
            ObjectType::Stream(s) => Some(s.dictionary()),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            ObjectType::Dictionary(d) => Some(d),
            ObjectType::Stream(s) => Some(s.dictionary_mut()),
            _ => None,
        }
    }

    pub fn as_stream_mut(&mut self) -> Option<&mut Stream> {
        match self {
            ObjectType::Stream(s) => Some(s),
            _ => None,
        }
    }

    /// Write the value without an `obj`/`endobj` wrapper
    ///
    /// Strings, binaries and stream payloads pass through `cipher` when one
    /// is given. Streams re-run their filters and refresh `/Length` and
    /// `/Filter` on every call.
    pub fn write_value<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        cipher: Option<&ObjectCipher>,
    ) -> PDFResult<()> {
        match self {
            ObjectType::Null => writer.write_str("null"),
            ObjectType::Boolean(b) => writer.write_str(if *b { "true" } else { "false" }),
            ObjectType::Number(n) => writer.write_int(i64::from(*n)),
            ObjectType::Real(r) => writer.write_real(r.value()),
            ObjectType::Name(n) => writer.write_escaped_name(n.as_str().as_bytes()),
            ObjectType::String(s) => match cipher {
                Some(cipher) => writer.write_hex(&cipher.encrypt(s.as_bytes())?),
                None if s.is_hex() => writer.write_hex(s.as_bytes()),
                None => writer.write_escaped_text(s.as_bytes()),
            },
            ObjectType::Binary(data) => match cipher {
                Some(cipher) => writer.write_hex(&cipher.encrypt(data)?),
                None => writer.write_hex(data),
            },
            ObjectType::Array(items) => {
                writer.write_bytes(b"[")?;
                for (i, item) in items.iter_mut().enumerate() {
                    if i > 0 {
                        writer.write_bytes(b" ")?;
                    }
                    item.write_value(writer, cipher)?;
                }
                writer.write_bytes(b"]")
            }
            ObjectType::Dictionary(dict) => dict.write_value(writer, cipher),
            ObjectType::Stream(stream) => stream.write_value(writer, cipher),
            ObjectType::Reference(r) => writer.write_str(&r.to_string()),
        }
    }
}

impl From<bool> for ObjectType {
    fn from(value: bool) -> Self {
        ObjectType::Boolean(value)
    }
}

impl From<i32> for ObjectType {
    fn from(value: i32) -> Self {
        ObjectType::Number(value)
    }
}

impl From<Real> for ObjectType {
    fn from(value: Real) -> Self {
        ObjectType::Real(value)
    }
}

impl From<Name> for ObjectType {
    fn from(value: Name) -> Self {
        ObjectType::Name(value)
    }
}

impl From<PDFString> for ObjectType {
    fn from(value: PDFString) -> Self {
        ObjectType::String(value)
    }
}

impl From<Vec<ObjectType>> for ObjectType {
    fn from(value: Vec<ObjectType>) -> Self {
        ObjectType::Array(value)
    }
}

impl From<Dictionary> for ObjectType {
    fn from(value: Dictionary) -> Self {
        ObjectType::Dictionary(value)
    }
}

impl From<Stream> for ObjectType {
    fn from(value: Stream) -> Self {
        ObjectType::Stream(value)
    }
}

impl From<ObjectRef> for ObjectType {
    fn from(value: ObjectRef) -> Self {
        ObjectType::Reference(value)
    }
}

/// Indirect object as registered in the cross-reference table
#[derive(Debug, Clone)]
pub struct PDFObject {
    /// Object number
    pub number: u32,
    /// Generation number
    pub generation: u16,
    /// Object value
    pub object_type: ObjectType,
    /// Hidden objects hold a number but are never written
    pub hidden: bool,
}

impl PDFObject {
    pub fn new(number: u32, generation: u16, object_type: ObjectType) -> Self {
        Self {
            number,
            generation,
            object_type,
            hidden: false,
        }
    }

    pub fn reference(&self) -> ObjectRef {
        ObjectRef::new(self.number, self.generation)
    }

    /// Write `n g obj ... endobj`
    pub fn write<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        cipher: Option<&ObjectCipher>,
    ) -> PDFResult<()> {
        trace!(
            "Writing object {} {} ({})",
            self.number,
            self.generation,
            self.object_type.type_name()
        );
        writer.write_str(&format!("{} {} obj\n", self.number, self.generation))?;
        self.object_type.write_value(writer, cipher)?;
        writer.write_bytes(b"\nendobj\n")
    }
}
