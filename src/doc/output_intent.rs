//! sRGB output intent required by PDF/A-1

use crate::error::PDFResult;
use crate::pdf::{Dictionary, ObjectRef, PDFString, Stream, XRefTable};

pub const SRGB_CONDITION: &str = "sRGB IEC61966-2.1";

/// Register an `/OutputIntent`, embedding `icc_profile` when given
pub fn create_srgb_output_intent(
    xref: &mut XRefTable,
    icc_profile: Option<&[u8]>,
) -> PDFResult<ObjectRef> {
    let mut intent = Dictionary::with_type("OutputIntent");
    intent.set_known_name("S", "GTS_PDFA1");
    intent.set("OutputCondition", PDFString::from(SRGB_CONDITION));
    intent.set("OutputConditionIdentifier", PDFString::from("sRGB"));
    intent.set("RegistryName", PDFString::from("http://www.color.org"));
    intent.set("Info", PDFString::from(SRGB_CONDITION));

    if let Some(profile) = icc_profile {
        let mut stream = Stream::new();
        stream.dictionary_mut().set("N", 3);
        stream.write_to_stream(profile);
        intent.set("DestOutputProfile", xref.add(stream)?);
    }

    xref.add(intent)
}
