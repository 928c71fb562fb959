//! Trailer `/ID` generation

use chrono::Utc;
use rand::{thread_rng, RngCore};

use crate::pdf::{Dictionary, ObjectType};
use crate::security::MD5_KEY_LEN;

const ID_SOURCE_KEYS: [&str; 6] = ["Title", "Author", "Subject", "Keywords", "Creator", "Producer"];

/// Opaque 16-byte file identifier
///
/// MD5 over the current time, the Info text entries and random bytes.
pub fn generate_document_id(info: &Dictionary) -> [u8; MD5_KEY_LEN] {
    let mut context = md5::Context::new();

    let now = Utc::now();
    context.consume(now.timestamp().to_le_bytes());
    context.consume(now.timestamp_subsec_nanos().to_le_bytes());

    for key in ID_SOURCE_KEYS {
        if let Some(value) = info.get_string(key) {
            context.consume(value);
        }
    }

    let mut salt = [0u8; 16];
    thread_rng().fill_bytes(&mut salt);
    context.consume(salt);

    context.finalize().0
}

/// `[<id> <id>]` for the trailer
pub fn id_array(id: &[u8; MD5_KEY_LEN]) -> ObjectType {
    ObjectType::Array(vec![
        ObjectType::Binary(id.to_vec()),
        ObjectType::Binary(id.to_vec()),
    ])
}

/// First element of an existing trailer `/ID`
pub fn trailer_id(trailer: &Dictionary) -> Option<[u8; MD5_KEY_LEN]> {
    match trailer.get_array("ID")?.first()? {
        ObjectType::Binary(bytes) => bytes.as_slice().try_into().ok(),
        ObjectType::String(s) => s.as_bytes().try_into().ok(),
        _ => None,
    }
}
