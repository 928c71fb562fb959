mod common;

use common::{object_body, stream_payload, text};
use pdf_forge::security::ObjectCipher;
use pdf_forge::{Document, EncryptMode, PDFPermissions, PDFResult, PDFVersion};
use pretty_assertions::assert_eq;
use rstest::rstest;

const CONTENT: &[u8] = b"BT /F1 12 Tf 72 720 Td (Secret) Tj ET\n";

fn encrypted_document(mode: EncryptMode, key_length: usize) -> PDFResult<(Document, Vec<u8>)> {
    let mut doc = Document::new()?;
    let page = doc.add_page()?;
    doc.page_contents(page)?.write_to_stream(CONTENT);
    doc.set_password("owner", "user")?;
    doc.set_encryption_mode(mode, key_length)?;
    doc.set_permission(PDFPermissions::new(PDFPermissions::PRINT))?;
    let output = doc.save_to_memory()?;
    Ok((doc, output))
}

#[test_log::test]
fn r3_raises_version_and_adds_trailer_entries() -> PDFResult<()> {
    let (doc, output) = encrypted_document(EncryptMode::R3, 16)?;
    let out_text = text(&output);
    assert!(out_text.starts_with("%PDF-1.4\n"));
    assert!(doc.version() >= PDFVersion::V1_4);

    let trailer = doc.xref().trailer();
    let encrypt = trailer.get_reference("Encrypt").expect("/Encrypt");
    assert_eq!(trailer.get_array("ID").map(Vec::len), Some(2));

    let encrypt_body = text(object_body(&output, encrypt.num));
    assert!(encrypt_body.contains("/Filter /Standard"));
    assert!(encrypt_body.contains("/V 2\n/R 3\n/Length 128"));
    assert!(encrypt_body.contains(&format!("/P {}", 0xFFFF_F0C4u32 as i32)));
    Ok(())
}

#[rstest]
#[case(EncryptMode::R2, 5, "%PDF-1.3")]
#[case(EncryptMode::R3, 7, "%PDF-1.4")]
#[case(EncryptMode::R4, 16, "%PDF-1.6")]
fn contents_decrypt_with_user_password(
    #[case] mode: EncryptMode,
    #[case] key_length: usize,
    #[case] header: &str,
) -> PDFResult<()> {
    let (doc, output) = encrypted_document(mode, key_length)?;
    assert!(text(&output).starts_with(header));

    let handler = doc.security_handler().expect("handler");
    let file_key = handler.authenticate_user_password(b"user")?;
    assert!(handler.authenticate_user_password(b"wrong").is_err());
    assert_eq!(&handler.authenticate_owner_password(b"owner")?[..], &file_key[..]);

    let contents = doc.pages()[0].contents_ref();
    let payload = stream_payload(&output, contents.num);
    assert_ne!(payload, CONTENT);

    let cipher = ObjectCipher::new(&file_key, contents.num, contents.gen, mode);
    assert_eq!(cipher.decrypt(payload)?, CONTENT);
    Ok(())
}

#[test_log::test]
fn info_strings_are_encrypted() -> PDFResult<()> {
    let mut doc = Document::new()?;
    doc.set_info_attr(pdf_forge::InfoAttr::Title, "Confidential")?;
    doc.set_password("owner", "")?;
    let output = text(&doc.save_to_memory()?);

    let info = text(object_body(output.as_bytes(), doc.info().num));
    assert!(!info.contains("Confidential"));
    assert!(info.contains("/Title <"));
    Ok(())
}

#[test_log::test]
fn trailer_id_not_encrypted() -> PDFResult<()> {
    let (doc, output) = encrypted_document(EncryptMode::R2, 5)?;
    let id = hex::encode_upper(doc.security_handler().expect("handler").encrypt_id());
    let out_text = text(&output);
    let trailer = &out_text[out_text.rfind("trailer\n").expect("trailer")..];
    assert!(trailer.contains(&format!("/ID [<{0}> <{0}>]", id)));
    Ok(())
}

#[test_log::test]
fn same_passwords_rejected() -> PDFResult<()> {
    let mut doc = Document::new()?;
    assert!(doc.set_password("same", "same").is_err());
    assert!(!doc.is_encrypted());

    doc.set_password("owner", "")?;
    assert!(matches!(
        doc.set_encryption_mode(EncryptMode::R3, 32),
        Err(pdf_forge::PDFError::InvalidEncryptKeyLength(32))
    ));
    Ok(())
}
