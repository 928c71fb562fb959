//! Document assembly and saving

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use log::{debug, info};

use super::catalog::Catalog;
use super::document_id::{generate_document_id, id_array, trailer_id};
use super::info::{self, InfoAttr, InfoDate, Trapped};
use super::outline::OutlineTree;
use super::output_intent::create_srgb_output_intent;
use super::page_label::{build_page_labels, PageLabel, PageLabelStyle};
use super::xmp::{build_xmp, PdfAConformance};
use super::{Destination, Outline, Page, PageLayout, PageMode, PagesNode};
use crate::error::{PDFError, PDFResult};
use crate::handlers::StandardSecurityHandler;
use crate::pdf::{Dictionary, FilterSet, ObjectRef, PDFWriter, Stream, XRefTable};
use crate::{CompressionMode, EncryptMode, PDFPermissions, PDFVersion};

/// Bytes after `%` on the second header line, marking the file as binary
const BINARY_MARKER: [u8; 4] = [0xB7, 0xBE, 0xAD, 0xAA];

/// Default Flate level for new streams
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// A PDF document under construction
pub struct Document {
    xref: XRefTable,
    catalog: Catalog,
    root_pages: PagesNode,
    current_pages: PagesNode,
    info: ObjectRef,
    pages: Vec<Page>,
    version: PDFVersion,
    compression: CompressionMode,
    compression_level: u32,
    outlines: Option<OutlineTree>,
    page_labels: BTreeMap<u32, PageLabel>,
    pdfa: Option<PdfAConformance>,
    icc_profile: Option<Vec<u8>>,
    security: Option<StandardSecurityHandler>,
    metadata: Option<ObjectRef>,
    output_intent: Option<ObjectRef>,
    encrypt_dict: Option<ObjectRef>,
}

impl Document {
    /// Empty document with a catalog, a root pages node and an Info dictionary
    pub fn new() -> PDFResult<Self> {
        let mut xref = XRefTable::new();
        let root_pages = PagesNode::create(&mut xref)?;
        let catalog = Catalog::create(&mut xref, root_pages)?;
        let info = xref.add(info::new_info_dict())?;

        xref.trailer_mut().set("Root", catalog.reference());
        xref.trailer_mut().set("Info", info);

        Ok(Self {
            xref,
            catalog,
            root_pages,
            current_pages: root_pages,
            info,
            pages: Vec::new(),
            version: PDFVersion::default(),
            compression: CompressionMode::NONE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            outlines: None,
            page_labels: BTreeMap::new(),
            pdfa: None,
            icc_profile: None,
            security: None,
            metadata: None,
            output_intent: None,
            encrypt_dict: None,
        })
    }

    pub fn xref(&self) -> &XRefTable {
        &self.xref
    }

    /// Direct access to the object table, e.g. to register fonts or images
    pub fn xref_mut(&mut self) -> &mut XRefTable {
        &mut self.xref
    }

    pub fn catalog(&self) -> ObjectRef {
        self.catalog.reference()
    }

    pub fn info(&self) -> ObjectRef {
        self.info
    }

    pub fn version(&self) -> PDFVersion {
        self.version
    }

    /// Requested header version; encryption and PDF/A may raise it on save
    pub fn set_version(&mut self, version: PDFVersion) {
        self.version = version;
    }

    pub fn compression_mode(&self) -> CompressionMode {
        self.compression
    }

    pub fn set_compression_mode(&mut self, mode: CompressionMode) {
        self.compression = mode;
    }

    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = level.min(9);
    }

    fn filters_for(&self, category: CompressionMode) -> FilterSet {
        if self.compression.contains(category) {
            FilterSet::FLATE_DECODE
        } else {
            FilterSet::NONE
        }
    }

    /// New indirect stream, Flate compressed if `category` is enabled
    pub fn create_stream(&mut self, category: CompressionMode) -> PDFResult<ObjectRef> {
        let mut stream = Stream::new();
        stream.set_filters(self.filters_for(category));
        stream.set_compression_level(self.compression_level);
        self.xref.add(stream)
    }

    // Page tree

    pub fn root_pages(&self) -> PagesNode {
        self.root_pages
    }

    pub fn current_pages(&self) -> PagesNode {
        self.current_pages
    }

    /// Node that receives pages from [`Document::add_page`]
    pub fn set_current_pages(&mut self, pages: PagesNode) -> PDFResult<()> {
        if self.xref.dict(pages.reference())?.get_name("Type") != Some("Pages") {
            return Err(PDFError::invalid_parameter("not a pages node"));
        }
        self.current_pages = pages;
        Ok(())
    }

    /// New intermediate node appended under `parent`
    pub fn add_pages_node(&mut self, parent: PagesNode) -> PDFResult<PagesNode> {
        let node = PagesNode::create(&mut self.xref)?;
        parent.add_kid(&mut self.xref, node.reference())?;
        Ok(node)
    }

    /// Append a page to the current pages node
    pub fn add_page(&mut self) -> PDFResult<Page> {
        let filters = self.filters_for(CompressionMode::TEXT);
        let page = Page::create(&mut self.xref, filters, self.compression_level)?;
        self.current_pages.add_kid(&mut self.xref, page.reference())?;
        self.pages.push(page);
        debug!("Added page {} ({} total)", page.reference(), self.pages.len());
        Ok(page)
    }

    /// New page placed before `target` in the tree
    pub fn insert_page(&mut self, target: Page) -> PDFResult<Page> {
        let index = self
            .pages
            .iter()
            .position(|p| *p == target)
            .ok_or(PDFError::ObjectNotFound(target.reference().num))?;

        let filters = self.filters_for(CompressionMode::TEXT);
        let page = Page::create(&mut self.xref, filters, self.compression_level)?;
        PagesNode::insert_before(&mut self.xref, target.reference(), page.reference())?;
        self.pages.insert(index, page);
        Ok(page)
    }

    /// Pages in the order they were added or inserted
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Leaf count of the root pages node
    pub fn page_count(&self) -> PDFResult<i32> {
        self.root_pages.count(&self.xref)
    }

    pub fn page_contents(&mut self, page: Page) -> PDFResult<&mut Stream> {
        page.contents(&mut self.xref)
    }

    pub fn set_page_size(&mut self, page: Page, width: f32, height: f32) -> PDFResult<()> {
        page.set_size(&mut self.xref, width, height)
    }

    // Catalog

    pub fn set_page_layout(&mut self, layout: PageLayout) -> PDFResult<()> {
        self.catalog.set_page_layout(&mut self.xref, layout)
    }

    pub fn set_page_mode(&mut self, mode: PageMode) -> PDFResult<()> {
        self.catalog.set_page_mode(&mut self.xref, mode)
    }

    pub fn set_open_action(&mut self, dest: &Destination) -> PDFResult<()> {
        self.check_page(dest.page())?;
        self.catalog.set_open_action(&mut self.xref, dest)
    }

    fn check_page(&self, page: ObjectRef) -> PDFResult<()> {
        if self.pages.iter().any(|p| p.reference() == page) {
            Ok(())
        } else {
            Err(PDFError::invalid_parameter(format!(
                "{} is not a page of this document",
                page
            )))
        }
    }

    // Info dictionary

    pub fn set_info_attr(&mut self, attr: InfoAttr, value: &str) -> PDFResult<()> {
        info::set_text(self.xref.dict_mut(self.info)?, attr, value);
        Ok(())
    }

    pub fn info_attr(&self, attr: InfoAttr) -> PDFResult<Option<String>> {
        Ok(info::get_text(self.xref.dict(self.info)?, attr))
    }

    pub fn set_info_date(&mut self, attr: InfoDate, date: &DateTime<FixedOffset>) -> PDFResult<()> {
        info::set_date(self.xref.dict_mut(self.info)?, attr, date);
        Ok(())
    }

    pub fn set_trapped(&mut self, trapped: Trapped) -> PDFResult<()> {
        info::set_trapped(self.xref.dict_mut(self.info)?, trapped);
        Ok(())
    }

    pub fn set_info_custom(&mut self, key: &str, value: &str) -> PDFResult<()> {
        info::set_custom(self.xref.dict_mut(self.info)?, key, value)
    }

    // Outlines

    /// Outline root, created and linked from the catalog on first use
    pub fn outline_root(&mut self) -> PDFResult<Outline> {
        if let Some(tree) = &self.outlines {
            return Ok(tree.root());
        }
        let tree = OutlineTree::new(&mut self.xref)?;
        let root = tree.root();
        self.catalog
            .set_entry(&mut self.xref, "Outlines", root.reference())?;
        self.outlines = Some(tree);
        Ok(root)
    }

    /// New item appended under `parent`, or under the root when `None`
    pub fn create_outline(&mut self, parent: Option<Outline>, title: &str) -> PDFResult<Outline> {
        let root = self.outline_root()?;
        let tree = self
            .outlines
            .as_mut()
            .ok_or_else(|| PDFError::invalid_parameter("document has no outlines"))?;
        tree.create(&mut self.xref, parent.unwrap_or(root), title)
    }

    pub fn set_outline_opened(&mut self, outline: Outline, opened: bool) -> PDFResult<()> {
        self.outline_tree_mut()?.set_opened(outline, opened)
    }

    pub fn set_outline_destination(&mut self, outline: Outline, dest: &Destination) -> PDFResult<()> {
        self.check_page(dest.page())?;
        let tree = self
            .outlines
            .as_ref()
            .ok_or_else(|| PDFError::invalid_parameter("document has no outlines"))?;
        tree.set_destination(&mut self.xref, outline, dest)
    }

    fn outline_tree_mut(&mut self) -> PDFResult<&mut OutlineTree> {
        self.outlines
            .as_mut()
            .ok_or_else(|| PDFError::invalid_parameter("document has no outlines"))
    }

    // Page labels

    /// Label pages from `page_num` (0-based) on; a second call for the same
    /// index replaces the first
    pub fn add_page_label(
        &mut self,
        page_num: u32,
        style: PageLabelStyle,
        first_page: i32,
        prefix: &str,
    ) -> PDFResult<()> {
        let label = PageLabel::new(style, first_page, prefix)?;
        self.page_labels.insert(page_num, label);
        Ok(())
    }

    // PDF/A

    pub fn set_pdfa_conformance(&mut self, conformance: PdfAConformance) {
        self.pdfa = Some(conformance);
    }

    pub fn pdfa_conformance(&self) -> Option<PdfAConformance> {
        self.pdfa
    }

    /// ICC profile embedded as `/DestOutputProfile` of the PDF/A output intent
    pub fn set_icc_profile(&mut self, profile: Vec<u8>) {
        self.icc_profile = Some(profile);
    }

    // Encryption

    /// Enable encryption with owner and user passwords
    ///
    /// Uses RC4-40 unless [`Document::set_encryption_mode`] picks another
    /// revision.
    pub fn set_password(&mut self, owner: &str, user: &str) -> PDFResult<()> {
        if owner.is_empty() {
            return Err(PDFError::InvalidPassword(
                "owner password must not be empty".to_string(),
            ));
        }
        if let Some(handler) = self.security.as_mut() {
            return handler.set_password(owner.as_bytes(), user.as_bytes());
        }
        let mut handler = StandardSecurityHandler::new(EncryptMode::R2, 5)?;
        handler.set_password(owner.as_bytes(), user.as_bytes())?;
        self.security = Some(handler);
        Ok(())
    }

    /// Key length in bytes, used by R3 only
    pub fn set_encryption_mode(&mut self, mode: EncryptMode, key_length: usize) -> PDFResult<()> {
        let handler = self.security.as_mut().ok_or_else(|| {
            PDFError::invalid_document("set a password before choosing an encryption mode")
        })?;
        handler.set_mode(mode, key_length)
    }

    pub fn set_permission(&mut self, permissions: PDFPermissions) -> PDFResult<()> {
        let handler = self.security.as_mut().ok_or_else(|| {
            PDFError::invalid_document("set a password before restricting permissions")
        })?;
        handler.set_permission(permissions);
        Ok(())
    }

    pub fn is_encrypted(&self) -> bool {
        self.security.is_some()
    }

    pub fn security_handler(&self) -> Option<&StandardSecurityHandler> {
        self.security.as_ref()
    }

    // Saving

    /// Write the complete file to `writer`
    ///
    /// Saving twice produces the same object numbering; objects created
    /// for PDF/A and encryption are reused.
    pub fn save_to_stream<W: Write>(&mut self, writer: W) -> PDFResult<()> {
        self.prepare_for_save()?;

        let mut writer = PDFWriter::new(writer);
        writer.write_str(self.version.header())?;
        writer.write_bytes(b"\n%")?;
        writer.write_bytes(&BINARY_MARKER)?;
        writer.write_bytes(b"\n")?;

        self.xref.write_to_stream(&mut writer)?;
        writer.flush()?;

        info!(
            "Saved PDF {} with {} objects, {} pages, {} bytes",
            self.version,
            self.xref.len(),
            self.pages.len(),
            writer.offset()
        );
        Ok(())
    }

    pub fn save_to_memory(&mut self) -> PDFResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.save_to_stream(&mut buffer)?;
        Ok(buffer)
    }

    /// The file is only created once the whole document serialized
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> PDFResult<()> {
        let bytes = self.save_to_memory()?;
        fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    fn prepare_for_save(&mut self) -> PDFResult<()> {
        if let Some(conformance) = self.pdfa {
            self.prepare_pdfa(conformance)?;
        }

        if self.security.is_some() {
            self.prepare_encryption()?;
        }

        if self.compression.contains(CompressionMode::TEXT) {
            for page in &self.pages {
                page.contents(&mut self.xref)?
                    .add_filter(FilterSet::FLATE_DECODE);
            }
        }

        if let Some(tree) = &self.outlines {
            tree.update_counts(&mut self.xref)?;
        }

        if self.page_labels.is_empty() {
            self.catalog.remove_entry(&mut self.xref, "PageLabels")?;
        } else {
            let labels = build_page_labels(&self.page_labels)?;
            self.catalog.set_entry(&mut self.xref, "PageLabels", labels)?;
        }
        Ok(())
    }

    fn prepare_pdfa(&mut self, conformance: PdfAConformance) -> PDFResult<()> {
        self.version = PDFVersion::V1_4;

        let xmp = build_xmp(self.xref.dict(self.info)?, conformance);
        let metadata = match self.metadata {
            Some(metadata) => metadata,
            None => {
                let mut dict = Dictionary::with_type("Metadata");
                dict.set_known_name("Subtype", "XML");
                let metadata = self.xref.add(Stream::with_dictionary(dict))?;
                self.catalog.set_entry(&mut self.xref, "Metadata", metadata)?;
                *self.metadata.insert(metadata)
            }
        };
        let stream = self.xref.stream_mut(metadata)?;
        stream.clear_stream();
        stream.write_to_stream(xmp.as_bytes());

        if self.output_intent.is_none() {
            let intent = create_srgb_output_intent(&mut self.xref, self.icc_profile.as_deref())?;
            self.catalog.add_output_intent(&mut self.xref, intent)?;
            self.output_intent = Some(intent);
        }

        if trailer_id(self.xref.trailer()).is_none() {
            let id = generate_document_id(self.xref.dict(self.info)?);
            self.xref.trailer_mut().set("ID", id_array(&id));
        }
        debug!("PDF/A-1{} metadata prepared", conformance.level());
        Ok(())
    }

    fn prepare_encryption(&mut self) -> PDFResult<()> {
        let existing_id = trailer_id(self.xref.trailer());
        let info = self.xref.dict(self.info)?.clone();

        let handler = self
            .security
            .as_mut()
            .ok_or_else(|| PDFError::invalid_document("no security handler"))?;
        let id = handler.prepare(existing_id, &info)?;
        let encrypt = handler.encrypt_dict()?;
        let mode = handler.mode();
        let handler = handler.clone();

        let encrypt_ref = match self.encrypt_dict {
            Some(r) => {
                *self.xref.get_mut(r)? = encrypt.into();
                r
            }
            None => *self.encrypt_dict.insert(self.xref.add(encrypt)?),
        };

        let trailer = self.xref.trailer_mut();
        trailer.set("Encrypt", encrypt_ref);
        if existing_id.is_none() {
            trailer.set("ID", id_array(&id));
        }
        self.xref.set_encryption(handler);

        if self.version < mode.min_pdf_version() {
            debug!("Raising version {} to {} for {}", self.version, mode.min_pdf_version(), mode);
            self.version = mode.min_pdf_version();
        }
        Ok(())
    }
}
