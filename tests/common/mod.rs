//! Helpers for inspecting saved files

#![allow(dead_code)]

use std::io::Read;

use flate2::read::ZlibDecoder;

pub fn text(output: &[u8]) -> String {
    String::from_utf8_lossy(output).into_owned()
}

/// Bytes of `num 0 obj ... endobj`
pub fn object_body(output: &[u8], num: u32) -> &[u8] {
    let header = format!("\n{} 0 obj\n", num);
    let start = find(output, header.as_bytes(), 0)
        .unwrap_or_else(|| panic!("object {} not found", num))
        + header.len();
    let end = find(output, b"\nendobj\n", start).expect("endobj");
    &output[start..end]
}

/// Raw stream payload of object `num`
pub fn stream_payload(output: &[u8], num: u32) -> &[u8] {
    let body = object_body(output, num);
    let start = find(body, b"\nstream\n", 0).expect("stream keyword") + 8;
    let end = body.len() - b"\nendstream".len();
    assert!(body[end..].starts_with(b"\nendstream"));
    &body[start..end]
}

pub fn inflate(data: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut decoded)
        .expect("valid zlib data");
    decoded
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
