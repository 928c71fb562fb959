//! PDF dictionary implementation

use std::io::Write;

use indexmap::IndexMap;

use super::{Name, ObjectRef, ObjectType, PDFWriter};
use crate::error::{PDFError, PDFResult};
use crate::security::ObjectCipher;

/// Insertion-ordered PDF dictionary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: IndexMap<String, ObjectType>,
}

impl Dictionary {
    /// Create new dictionary
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Dictionary with a `/Type` entry
    pub fn with_type(type_name: &'static str) -> Self {
        let mut dict = Self::new();
        dict.set("Type", ObjectType::known_name(type_name));
        dict
    }

    /// Set an entry; replacing an existing key keeps its position
    pub fn set(&mut self, key: &str, value: impl Into<ObjectType>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Set a name entry
    pub fn set_name(&mut self, key: &str, value: &str) -> PDFResult<()> {
        self.set(key, Name::new(value)?);
        Ok(())
    }

    pub(crate) fn set_known_name(&mut self, key: &str, value: &'static str) {
        self.set(key, ObjectType::known_name(value));
    }

    pub fn get(&self, key: &str) -> Option<&ObjectType> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ObjectType> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ObjectType> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectType)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get_integer(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(ObjectType::as_integer)
    }

    pub fn get_name(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ObjectType::as_name)
    }

    pub fn get_reference(&self, key: &str) -> Option<ObjectRef> {
        self.get(key).and_then(ObjectType::as_reference)
    }

    pub fn get_string(&self, key: &str) -> Option<&[u8]> {
        match self.get(key) {
            Some(ObjectType::String(s)) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<ObjectType>> {
        self.get(key).and_then(ObjectType::as_array)
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        match self.get(key) {
            Some(ObjectType::Dictionary(d)) => Some(d),
            _ => None,
        }
    }

    /// Nested dictionary for `key`, created empty if missing
    pub fn dict_entry_mut(&mut self, key: &str) -> PDFResult<&mut Dictionary> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| ObjectType::Dictionary(Dictionary::new()));
        match entry {
            ObjectType::Dictionary(d) => Ok(d),
            other => Err(PDFError::InvalidObject {
                expected: "Dictionary",
                found: other.type_name(),
            }),
        }
    }

    /// Array for `key`, created empty if missing
    pub fn array_entry_mut(&mut self, key: &str) -> PDFResult<&mut Vec<ObjectType>> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| ObjectType::Array(Vec::new()));
        match entry {
            ObjectType::Array(a) => Ok(a),
            other => Err(PDFError::InvalidObject {
                expected: "Array",
                found: other.type_name(),
            }),
        }
    }

    /// Write `<< /Key value ... >>`, one entry per line
    pub fn write_value<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        cipher: Option<&ObjectCipher>,
    ) -> PDFResult<()> {
        writer.write_bytes(b"<<\n")?;
        for (key, value) in self.entries.iter_mut() {
            writer.write_escaped_name(key.as_bytes())?;
            writer.write_bytes(b" ")?;
            value.write_value(writer, cipher)?;
            writer.write_bytes(b"\n")?;
        }
        writer.write_bytes(b">>")
    }
}
