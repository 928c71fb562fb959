//! PDF object model and serialization

mod dict;
pub mod filter;
mod object;
mod stream;
mod writer;
mod xref;

pub use dict::Dictionary;
pub use filter::{Filter, FilterContext, FilterSet};
pub use object::{Name, ObjectRef, ObjectType, PDFObject, PDFString, Real, MAX_NAME_LEN, MAX_REAL};
pub use stream::Stream;
pub use writer::{escape_name, escape_text, format_real, PDFWriter};
pub use xref::{XRefEntry, XRefTable, MAX_XREF_ENTRIES};
