//! PDF cross-reference table implementation
//!
//! The table owns every indirect object of a document. Objects are
//! numbered from 1 in registration order and referenced through
//! [`ObjectRef`] handles, so back-references such as page to parent never
//! form ownership cycles.

use std::io::Write;

use log::{debug, trace, warn};

use super::{Dictionary, ObjectRef, ObjectType, PDFObject, PDFWriter, Stream};
use crate::error::{PDFError, PDFResult};
use crate::handlers::StandardSecurityHandler;

/// Upper bound on indirect objects per table
pub const MAX_XREF_ENTRIES: usize = 8_388_607;
/// Generation of the free-list head entry
pub const MAX_GENERATION: u16 = 65535;

/// One registered indirect object and its file offset
#[derive(Debug, Clone)]
pub struct XRefEntry {
    object: PDFObject,
    offset: u64,
}

impl XRefEntry {
    pub fn object(&self) -> &PDFObject {
        &self.object
    }

    /// Byte offset, meaningful once the object was written
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// PDF cross-reference table
#[derive(Default)]
pub struct XRefTable {
    entries: Vec<XRefEntry>,
    trailer: Dictionary,
    encryption: Option<StandardSecurityHandler>,
}

impl XRefTable {
    /// Create new xref table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object as indirect and return its handle
    ///
    /// Adding a reference to an object already in this table is a no-op
    /// that returns the same handle.
    pub fn add(&mut self, object: impl Into<ObjectType>) -> PDFResult<ObjectRef> {
        self.push(object.into(), false)
    }

    /// Register an object that keeps its number but is never written
    pub fn add_hidden(&mut self, object: impl Into<ObjectType>) -> PDFResult<ObjectRef> {
        self.push(object.into(), true)
    }

    fn push(&mut self, object: ObjectType, hidden: bool) -> PDFResult<ObjectRef> {
        if let ObjectType::Reference(existing) = object {
            self.entry(existing)?;
            return Ok(existing);
        }

        if self.entries.len() >= MAX_XREF_ENTRIES {
            return Err(PDFError::XRefCountError(self.entries.len() + 1));
        }

        let number = self.entries.len() as u32 + 1;
        let mut object = PDFObject::new(number, 0, object);
        object.hidden = hidden;
        trace!("Registered object {} 0 ({})", number, object.object_type.type_name());

        self.entries.push(XRefEntry { object, offset: 0 });
        Ok(ObjectRef::new(number, 0))
    }

    fn entry(&self, r: ObjectRef) -> PDFResult<&XRefEntry> {
        r.num
            .checked_sub(1)
            .and_then(|i| self.entries.get(i as usize))
            .filter(|e| e.object.generation == r.gen)
            .ok_or(PDFError::ObjectNotFound(r.num))
    }

    fn entry_mut(&mut self, r: ObjectRef) -> PDFResult<&mut XRefEntry> {
        r.num
            .checked_sub(1)
            .and_then(|i| self.entries.get_mut(i as usize))
            .filter(|e| e.object.generation == r.gen)
            .ok_or(PDFError::ObjectNotFound(r.num))
    }

    pub fn contains(&self, r: ObjectRef) -> bool {
        self.entry(r).is_ok()
    }

    pub fn get(&self, r: ObjectRef) -> PDFResult<&ObjectType> {
        Ok(&self.entry(r)?.object.object_type)
    }

    pub fn get_mut(&mut self, r: ObjectRef) -> PDFResult<&mut ObjectType> {
        Ok(&mut self.entry_mut(r)?.object.object_type)
    }

    /// Dictionary of a dictionary or stream object
    pub fn dict(&self, r: ObjectRef) -> PDFResult<&Dictionary> {
        let object = self.get(r)?;
        object.as_dict().ok_or(PDFError::InvalidObject {
            expected: "Dictionary",
            found: object.type_name(),
        })
    }

    pub fn dict_mut(&mut self, r: ObjectRef) -> PDFResult<&mut Dictionary> {
        let object = self.get_mut(r)?;
        let found = object.type_name();
        object.as_dict_mut().ok_or(PDFError::InvalidObject {
            expected: "Dictionary",
            found,
        })
    }

    pub fn stream_mut(&mut self, r: ObjectRef) -> PDFResult<&mut Stream> {
        let object = self.get_mut(r)?;
        let found = object.type_name();
        object.as_stream_mut().ok_or(PDFError::InvalidObject {
            expected: "Stream",
            found,
        })
    }

    pub fn is_hidden(&self, r: ObjectRef) -> PDFResult<bool> {
        Ok(self.entry(r)?.object.hidden)
    }

    /// Number of registered objects, excluding the free-list head
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[XRefEntry] {
        &self.entries
    }

    pub fn trailer(&self) -> &Dictionary {
        &self.trailer
    }

    pub fn trailer_mut(&mut self) -> &mut Dictionary {
        &mut self.trailer
    }

    /// Install the handler used to encrypt strings and streams on write
    pub fn set_encryption(&mut self, handler: StandardSecurityHandler) {
        self.encryption = Some(handler);
    }

    pub fn clear_encryption(&mut self) {
        self.encryption = None;
    }

    pub fn encryption(&self) -> Option<&StandardSecurityHandler> {
        self.encryption.as_ref()
    }

    /// References in the trailer or any object that this table cannot resolve
    pub fn dangling_references(&self) -> Vec<ObjectRef> {
        let mut missing = Vec::new();
        let mut check = |r: ObjectRef| {
            if !self.contains(r) && !missing.contains(&r) {
                missing.push(r);
            }
        };
        for (_, value) in self.trailer.iter() {
            visit_references(value, &mut check);
        }
        for entry in &self.entries {
            visit_references(&entry.object.object_type, &mut check);
        }
        missing
    }

    /// Write every live object, the xref section and the trailer
    pub fn write_to_stream<W: Write>(&mut self, writer: &mut PDFWriter<W>) -> PDFResult<()> {
        let encrypt_dict = self.trailer.get_reference("Encrypt");
        if !self.trailer.contains_key("Root") {
            warn!("Trailer has no /Root entry");
        }
        for missing in self.dangling_references() {
            warn!("Reference to unregistered object {}", missing);
        }

        for entry in self.entries.iter_mut() {
            if entry.object.hidden {
                continue;
            }
            entry.offset = writer.offset();

            let reference = entry.object.reference();
            let cipher = match &self.encryption {
                Some(handler) if Some(reference) != encrypt_dict => {
                    Some(handler.object_cipher(reference.num, reference.gen))
                }
                _ => None,
            };
            entry.object.write(writer, cipher.as_ref())?;
        }

        let xref_offset = writer.offset();
        let size = self.entries.len() + 1;
        debug!("Writing xref section with {} entries at {}", size, xref_offset);

        writer.write_str(&format!("xref\n0 {}\n", size))?;
        writer.write_str(&format!("{:010} {:05} f\r\n", 0, MAX_GENERATION))?;
        for entry in &self.entries {
            let line = if entry.object.hidden {
                format!("{:010} {:05} f\r\n", 0, entry.object.generation)
            } else {
                format!("{:010} {:05} n\r\n", entry.offset, entry.object.generation)
            };
            writer.write_str(&line)?;
        }

        self.trailer.set("Size", size as i32);
        writer.write_str("trailer\n")?;
        self.trailer.write_value(writer, None)?;
        writer.write_str(&format!("\nstartxref\n{}\n%%EOF\n", xref_offset))
    }
}

fn visit_references(object: &ObjectType, visit: &mut impl FnMut(ObjectRef)) {
    match object {
        ObjectType::Reference(r) => visit(*r),
        ObjectType::Array(items) => items.iter().for_each(|i| visit_references(i, visit)),
        ObjectType::Dictionary(dict) => dict.iter().for_each(|(_, v)| visit_references(v, visit)),
        ObjectType::Stream(stream) => stream
            .dictionary()
            .iter()
            .for_each(|(_, v)| visit_references(v, visit)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PDFString;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn write(xref: &mut XRefTable) -> PDFResult<Vec<u8>> {
        let mut writer = PDFWriter::new(Vec::new());
        xref.write_to_stream(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn xref_lines(output: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(output);
        let start = text.find("xref\n").unwrap() + 5;
        let end = text.find("trailer\n").unwrap();
        text[start..end].split_inclusive("\r\n").map(str::to_string).collect()
    }

    #[test]
    fn test_sequential_numbering() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let first = xref.add(ObjectType::Number(1))?;
        let second = xref.add(Dictionary::new())?;
        assert_eq!(first, ObjectRef::new(1, 0));
        assert_eq!(second, ObjectRef::new(2, 0));
        assert_eq!(xref.len(), 2);
        Ok(())
    }

    #[test]
    fn test_add_is_idempotent() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let r = xref.add(Dictionary::new())?;
        assert_eq!(xref.add(r)?, r);
        assert_eq!(xref.add(ObjectType::Reference(r))?, r);
        assert_eq!(xref.len(), 1);

        assert!(matches!(
            xref.add(ObjectRef::new(9, 0)),
            Err(PDFError::ObjectNotFound(9))
        ));
        Ok(())
    }

    #[test]
    fn test_typed_access() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let dict = xref.add(Dictionary::with_type("Catalog"))?;
        let number = xref.add(ObjectType::Number(3))?;
        let stream = xref.add(Stream::new())?;

        xref.dict_mut(dict)?.set("Count", 0);
        assert_eq!(xref.dict(dict)?.get_integer("Count"), Some(0));
        xref.stream_mut(stream)?.write_to_stream(b"q Q");
        xref.dict_mut(stream)?.set("Subtype", ObjectType::name("Form")?);

        assert!(matches!(
            xref.dict_mut(number),
            Err(PDFError::InvalidObject { expected: "Dictionary", found: "Number" })
        ));
        assert!(matches!(xref.get(ObjectRef::new(0, 0)), Err(PDFError::ObjectNotFound(0))));
        assert!(matches!(xref.get(ObjectRef::new(1, 3)), Err(PDFError::ObjectNotFound(1))));
        Ok(())
    }

    #[test]
    fn test_write_layout() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let catalog = xref.add(Dictionary::with_type("Catalog"))?;
        xref.add(PDFString::from("hello"))?;
        xref.trailer_mut().set("Root", catalog);

        let output = write(&mut xref)?;
        let text = String::from_utf8_lossy(&output).into_owned();

        let lines = xref_lines(&output);
        assert_eq!(lines[0], "0 3\n0000000000 65535 f\r\n");
        for line in &lines[1..] {
            assert_eq!(line.len(), 20);
        }

        for entry in xref.entries() {
            let at = &text[entry.offset() as usize..];
            let header = format!("{} 0 obj\n", entry.object().number);
            assert!(at.starts_with(&header), "object {} not at its offset", entry.object().number);
        }

        let xref_at = text.find("xref\n").unwrap();
        assert!(text.ends_with(&format!("startxref\n{}\n%%EOF\n", xref_at)));
        assert!(text.contains("trailer\n<<\n/Root 1 0 R\n/Size 3\n>>"));
        Ok(())
    }

    #[test]
    fn test_dangling_references() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let mut dict = Dictionary::new();
        dict.set("Kids", ObjectType::Array(vec![ObjectRef::new(7, 0).into()]));
        let catalog = xref.add(dict)?;
        xref.trailer_mut().set("Root", catalog);
        xref.trailer_mut().set("Info", ObjectRef::new(9, 0));

        assert_eq!(
            xref.dangling_references(),
            vec![ObjectRef::new(9, 0), ObjectRef::new(7, 0)]
        );
        assert!(write(&mut xref).is_ok());
        Ok(())
    }

    #[test]
    fn test_hidden_objects_skipped() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        xref.add(ObjectType::Number(1))?;
        let hidden = xref.add_hidden(PDFString::from("secret"))?;
        xref.add(ObjectType::Number(3))?;
        assert!(xref.is_hidden(hidden)?);

        let output = write(&mut xref)?;
        let text = String::from_utf8_lossy(&output);
        assert!(!text.contains("2 0 obj"));
        assert!(text.contains("3 0 obj"));

        let lines = xref_lines(&output);
        assert_eq!(lines[2], "0000000000 00000 f\r\n");
        assert!(lines[3].ends_with(" n\r\n"));
        Ok(())
    }
}
