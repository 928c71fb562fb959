//! Byte sink for PDF serialization
//!
//! Tracks the number of bytes written so the cross-reference table can
//! record object offsets in a single forward pass.

use std::io::Write;

use crate::error::PDFResult;

/// Counting writer wrapping any `io::Write`
pub struct PDFWriter<W: Write> {
    inner: W,
    offset: u64,
}

impl<W: Write> PDFWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes written so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn flush(&mut self) -> PDFResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> PDFResult<()> {
        self.inner.write_all(data)?;
        self.offset += data.len() as u64;
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> PDFResult<()> {
        self.write_bytes(s.as_bytes())
    }

    pub fn write_int(&mut self, value: i64) -> PDFResult<()> {
        self.write_str(&value.to_string())
    }

    pub fn write_real(&mut self, value: f32) -> PDFResult<()> {
        self.write_str(&format_real(value))
    }

    /// Write `/name` with reserved bytes escaped
    pub fn write_escaped_name(&mut self, name: &[u8]) -> PDFResult<()> {
        self.write_bytes(b"/")?;
        self.write_bytes(&escape_name(name))
    }

    /// Write a parenthesised literal string
    pub fn write_escaped_text(&mut self, text: &[u8]) -> PDFResult<()> {
        self.write_bytes(b"(")?;
        self.write_bytes(&escape_text(text))?;
        self.write_bytes(b")")
    }

    /// Write `<...>` with uppercase hex digits
    pub fn write_hex(&mut self, data: &[u8]) -> PDFResult<()> {
        self.write_bytes(b"<")?;
        self.write_str(&hex::encode_upper(data))?;
        self.write_bytes(b">")
    }
}

fn is_name_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'#' | b'/' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%'
    )
}

/// Escape a name body (without the leading slash)
pub fn escape_name(name: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len());
    for &byte in name {
        if !(0x21..=0x7E).contains(&byte) || is_name_delimiter(byte) {
            out.extend_from_slice(format!("#{:02X}", byte).as_bytes());
        } else {
            out.push(byte);
        }
    }
    out
}

/// Escape a literal string body (without the parentheses)
pub fn escape_text(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 8);
    for &byte in text {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            0x20..=0x7E => out.push(byte),
            _ => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
        }
    }
    out
}

/// Format a real with at most six decimals and no trailing zeros
pub fn format_real(value: f32) -> String {
    let shortest = value.to_string();
    let mut text = match shortest.find('.') {
        Some(dot) if shortest.len() - dot - 1 > 6 => format!("{:.6}", f64::from(value)),
        _ => shortest,
    };

    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }

    if text == "-0" {
        text = "0".to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(5.0, "5")]
    #[case(0.5, "0.5")]
    #[case(595.276, "595.276")]
    #[case(841.89, "841.89")]
    #[case(-12.25, "-12.25")]
    #[case(0.0, "0")]
    #[case(-0.0, "0")]
    #[case(1.0 / 3.0, "0.333333")]
    #[case(0.000_000_1, "0")]
    fn test_format_real(#[case] value: f32, #[case] expected: &str) {
        assert_eq!(format_real(value), expected);
    }

    #[rstest]
    #[case(b"Type".as_slice(), "Type")]
    #[case(b"My Font".as_slice(), "My#20Font")]
    #[case(b"A#B".as_slice(), "A#23B")]
    #[case(b"a/b(c)".as_slice(), "a#2Fb#28c#29")]
    #[case(b"\xE9t\xE9".as_slice(), "#E9t#E9")]
    fn test_escape_name(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(String::from_utf8(escape_name(input)).unwrap(), expected);
    }

    #[test_log::test]
    fn test_escape_text() {
        assert_eq!(escape_text(b"Test (value)"), b"Test \\(value\\)");
        assert_eq!(escape_text(b"back\\slash"), b"back\\\\slash");
        assert_eq!(escape_text(b"line\r\nbreak"), b"line\\r\\nbreak");
        assert_eq!(escape_text(b"\x01\xFF"), b"\\001\\377");
    }

    #[test_log::test]
    fn test_offset_tracking() -> PDFResult<()> {
        let mut writer = PDFWriter::new(Vec::new());
        writer.write_str("%PDF-1.4\n")?;
        assert_eq!(writer.offset(), 9);
        writer.write_escaped_text(b"()")?;
        writer.write_hex(&[0xDE, 0xAD])?;
        assert_eq!(writer.offset(), 9 + 6 + 6);
        assert_eq!(writer.into_inner(), b"%PDF-1.4\n(\\(\\))<DEAD>".to_vec());
        Ok(())
    }
}
