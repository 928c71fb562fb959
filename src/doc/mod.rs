//! Document layer: catalog, page tree, Info, outlines, page labels and
//! PDF/A metadata on top of the object table

mod catalog;
mod destination;
mod document;
mod document_id;
mod info;
mod outline;
mod output_intent;
mod page;
mod page_label;
mod pages;
mod xmp;

pub use catalog::{PageLayout, PageMode};
pub use destination::{Destination, DestinationKind};
pub use document::{Document, DEFAULT_COMPRESSION_LEVEL};
pub use document_id::generate_document_id;
pub use info::{format_pdf_date, InfoAttr, InfoDate, Trapped, DEFAULT_PRODUCER};
pub use outline::Outline;
pub use page::{Page, ResourceClass, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH};
pub use page_label::{PageLabel, PageLabelStyle};
pub use pages::PagesNode;
pub use xmp::{pdf_date_to_xmp, PdfAConformance};
