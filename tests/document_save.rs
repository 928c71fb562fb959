mod common;

use common::{inflate, object_body, stream_payload, text};
use pdf_forge::pdf::FilterSet;
use pdf_forge::{
    CompressionMode, Destination, Document, InfoAttr, PDFResult, PageLabelStyle, PageMode,
    PdfAConformance, Trapped,
};
use pretty_assertions::assert_eq;
use test_log::test;

const CONTENT: &[u8] = b"1 w\n50 50 495 731 re\nS\n";

#[test]
fn empty_document_has_zero_pages() -> PDFResult<()> {
    let mut doc = Document::new()?;
    let output = text(&doc.save_to_memory()?);

    let pages = doc.root_pages().reference().num;
    assert_eq!(
        text(object_body(output.as_bytes(), pages)),
        "<<\n/Type /Pages\n/Kids []\n/Count 0\n>>"
    );
    assert!(output.starts_with("%PDF-1.3\n"));
    assert!(output.contains("xref\n0 4\n0000000000 65535 f\r\n"));
    assert!(output.contains("/Root 2 0 R"));
    assert!(output.contains("/Size 4"));
    Ok(())
}

#[test]
fn compressed_page_contents() -> PDFResult<()> {
    let mut doc = Document::new()?;
    doc.set_compression_mode(CompressionMode::ALL);
    let page = doc.add_page()?;
    doc.page_contents(page)?.write_to_stream(CONTENT);

    let output = doc.save_to_memory()?;
    let contents = page.contents_ref().num;
    let body = text(object_body(&output, contents));
    assert!(body.contains("/Filter [/FlateDecode]"));

    let payload = stream_payload(&output, contents);
    assert!(body.contains(&format!("/Length {}", payload.len())));
    assert_eq!(inflate(payload), CONTENT);
    Ok(())
}

#[test]
fn page_tree_counts() -> PDFResult<()> {
    let mut doc = Document::new()?;
    let first = doc.add_page()?;
    doc.add_page()?;
    let chapter = doc.add_pages_node(doc.root_pages())?;
    doc.set_current_pages(chapter)?;
    doc.add_page()?;
    doc.insert_page(first)?;

    assert_eq!(doc.page_count()?, 4);
    let output = doc.save_to_memory()?;
    let root = text(object_body(&output, doc.root_pages().reference().num));
    assert!(root.contains("/Count 4"));
    let chapter_body = text(object_body(&output, chapter.reference().num));
    assert!(chapter_body.contains("/Count 1"));
    assert!(chapter_body.contains(&format!("/Parent {} 0 R", doc.root_pages().reference().num)));
    Ok(())
}

#[test]
fn outline_counts() -> PDFResult<()> {
    let mut doc = Document::new()?;
    let page = doc.add_page()?;
    let intro = doc.create_outline(None, "Intro")?;
    doc.create_outline(None, "Body")?;
    doc.create_outline(None, "End")?;
    doc.set_outline_destination(intro, &Destination::fit(page))?;
    doc.set_page_mode(PageMode::UseOutlines)?;

    let output = doc.save_to_memory()?;
    let root = doc.outline_root()?;
    let root_body = text(object_body(&output, root.reference().num));
    assert!(root_body.starts_with("<<\n/Type /Outlines\n"));
    assert!(root_body.contains("/Count 3"));

    let intro_body = text(object_body(&output, intro.reference().num));
    assert!(intro_body.contains(&format!("/Dest [{} 0 R /Fit]", page.reference().num)));
    assert!(!intro_body.contains("/Count"));
    Ok(())
}

#[test]
fn closed_outline_counts_negative() -> PDFResult<()> {
    let mut doc = Document::new()?;
    let parent = doc.create_outline(None, "Parent")?;
    doc.create_outline(Some(parent), "A")?;
    doc.create_outline(Some(parent), "B")?;
    doc.set_outline_opened(parent, false)?;

    let output = doc.save_to_memory()?;
    assert!(text(object_body(&output, parent.reference().num)).contains("/Count -2"));
    let root = doc.outline_root()?;
    assert!(text(object_body(&output, root.reference().num)).contains("/Count 1"));
    Ok(())
}

#[test]
fn page_labels_number_tree() -> PDFResult<()> {
    let mut doc = Document::new()?;
    for _ in 0..5 {
        doc.add_page()?;
    }
    doc.add_page_label(3, PageLabelStyle::Decimal, 1, "")?;
    doc.add_page_label(0, PageLabelStyle::UpperRoman, 1, "")?;
    doc.add_page_label(0, PageLabelStyle::LowerRoman, 1, "")?;

    let output = doc.save_to_memory()?;
    let catalog = text(object_body(&output, doc.catalog().num));
    assert!(catalog.contains("/PageLabels <<\n/Nums [0 <<\n/S /r\n>> 3 <<\n/S /D\n>>]\n>>"));

    assert!(doc.add_page_label(1, PageLabelStyle::Decimal, 0, "").is_err());
    Ok(())
}

#[test]
fn info_dictionary() -> PDFResult<()> {
    let mut doc = Document::new()?;
    doc.set_info_attr(InfoAttr::Title, "Annual (2023)")?;
    doc.set_info_attr(InfoAttr::Author, "Finance")?;
    doc.set_trapped(Trapped::False)?;
    doc.set_info_custom("Department", "Accounting")?;

    let output = doc.save_to_memory()?;
    let info = text(object_body(&output, doc.info().num));
    assert!(info.contains("/Title (Annual \\(2023\\))"));
    assert!(info.contains("/Author (Finance)"));
    assert!(info.contains("/Trapped /False"));
    assert!(info.contains("/Department (Accounting)"));
    assert!(info.contains("/Producer (pdf-forge"));
    assert_eq!(doc.info_attr(InfoAttr::Author)?.as_deref(), Some("Finance"));
    Ok(())
}

#[test]
fn pdfa_metadata_and_output_intent() -> PDFResult<()> {
    let mut doc = Document::new()?;
    doc.set_info_attr(InfoAttr::Title, "Archive")?;
    doc.set_version(pdf_forge::PDFVersion::V1_7);
    doc.set_pdfa_conformance(PdfAConformance::PdfA1B);
    doc.add_page()?;

    let output = doc.save_to_memory()?;
    let out_text = text(&output);
    assert!(out_text.starts_with("%PDF-1.4\n"));

    let catalog = doc.xref().dict(doc.catalog())?;
    let metadata = catalog.get_reference("Metadata").expect("metadata");
    let intents = catalog.get_array("OutputIntents").expect("output intents");
    assert_eq!(intents.len(), 1);

    let metadata_body = text(object_body(&output, metadata.num));
    assert!(metadata_body.contains("/Type /Metadata\n/Subtype /XML"));
    assert!(!metadata_body.contains("/Filter"));
    let xmp = text(stream_payload(&output, metadata.num));
    assert!(xmp.contains("<pdfaid:part>1</pdfaid:part>"));
    assert!(xmp.contains("<pdfaid:conformance>B</pdfaid:conformance>"));
    assert!(xmp.contains(">Archive</rdf:li>"));

    let intent = intents[0].as_reference().expect("reference");
    assert!(text(object_body(&output, intent.num)).contains("/S /GTS_PDFA1"));

    let trailer = &out_text[out_text.rfind("trailer\n").expect("trailer")..];
    assert!(trailer.contains("/ID [<"));
    Ok(())
}

#[test]
fn save_to_file_writes_same_bytes() -> PDFResult<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.pdf");

    let mut doc = Document::new()?;
    let page = doc.add_page()?;
    doc.page_contents(page)?.write_to_stream(CONTENT);
    doc.save_to_file(&path)?;

    let written = std::fs::read(&path)?;
    assert_eq!(written, doc.save_to_memory()?);
    Ok(())
}

#[test]
fn save_to_missing_directory_fails() -> PDFResult<()> {
    let dir = tempfile::tempdir()?;
    let mut doc = Document::new()?;
    let result = doc.save_to_file(dir.path().join("missing").join("out.pdf"));
    assert!(matches!(result, Err(pdf_forge::PDFError::IoError(_))));
    Ok(())
}

#[test]
fn compressed_image_lists_dct_last() -> PDFResult<()> {
    let jpeg = [0xFFu8, 0xD8, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0xFF, 0xD9];
    let mut doc = Document::new()?;
    doc.set_compression_mode(CompressionMode::IMAGE);
    let image = doc.create_stream(CompressionMode::IMAGE)?;
    let stream = doc.xref_mut().stream_mut(image)?;
    stream.add_filter(FilterSet::DCT_DECODE);
    stream.write_to_stream(&jpeg);

    let output = doc.save_to_memory()?;
    let body = text(object_body(&output, image.num));
    assert!(body.contains("/Filter [/FlateDecode /DCTDecode]"));
    assert_eq!(inflate(stream_payload(&output, image.num)), jpeg);
    Ok(())
}
