//! Page objects and their resources

use log::trace;

use crate::error::{PDFError, PDFResult};
use crate::pdf::{Dictionary, FilterSet, ObjectRef, ObjectType, Stream, XRefTable};

/// A4 in points
pub const DEFAULT_PAGE_WIDTH: f32 = 595.276;
pub const DEFAULT_PAGE_HEIGHT: f32 = 841.89;

/// Resource categories of a page `/Resources` dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Font,
    ExtGState,
    XObject,
    ColorSpace,
    Pattern,
    Shading,
}

impl ResourceClass {
    pub fn key(&self) -> &'static str {
        match self {
            ResourceClass::Font => "Font",
            ResourceClass::ExtGState => "ExtGState",
            ResourceClass::XObject => "XObject",
            ResourceClass::ColorSpace => "ColorSpace",
            ResourceClass::Pattern => "Pattern",
            ResourceClass::Shading => "Shading",
        }
    }
}

/// Handle to a page dictionary and its content stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    dict: ObjectRef,
    contents: ObjectRef,
}

impl Page {
    #[cfg(test)]
    pub(crate) fn from_refs(dict: ObjectRef, contents: ObjectRef) -> Self {
        Self { dict, contents }
    }

    /// Register a new page with a default MediaBox and an empty content stream
    pub(crate) fn create(xref: &mut XRefTable, filters: FilterSet, level: u32) -> PDFResult<Self> {
        let mut contents = Stream::new();
        contents.set_filters(filters);
        contents.set_compression_level(level);
        let contents = xref.add(contents)?;

        let mut dict = Dictionary::with_type("Page");
        dict.set(
            "MediaBox",
            ObjectType::real_array(&[0.0, 0.0, DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT])?,
        );
        dict.set("Contents", contents);
        dict.set("Resources", Dictionary::new());
        let dict = xref.add(dict)?;

        trace!("Created page {} with contents {}", dict, contents);
        Ok(Self { dict, contents })
    }

    /// Indirect reference of the page dictionary
    pub fn reference(&self) -> ObjectRef {
        self.dict
    }

    pub fn contents_ref(&self) -> ObjectRef {
        self.contents
    }

    pub fn contents<'a>(&self, xref: &'a mut XRefTable) -> PDFResult<&'a mut Stream> {
        xref.stream_mut(self.contents)
    }

    pub fn set_media_box(
        &self,
        xref: &mut XRefTable,
        left: f32,
        bottom: f32,
        right: f32,
        top: f32,
    ) -> PDFResult<()> {
        if right <= left || top <= bottom {
            return Err(PDFError::invalid_parameter(format!(
                "empty media box [{} {} {} {}]",
                left, bottom, right, top
            )));
        }
        let media_box = ObjectType::real_array(&[left, bottom, right, top])?;
        xref.dict_mut(self.dict)?.set("MediaBox", media_box);
        Ok(())
    }

    pub fn set_size(&self, xref: &mut XRefTable, width: f32, height: f32) -> PDFResult<()> {
        self.set_media_box(xref, 0.0, 0.0, width, height)
    }

    /// `/Rotate`, which must be a multiple of 90
    pub fn set_rotate(&self, xref: &mut XRefTable, angle: i32) -> PDFResult<()> {
        if angle % 90 != 0 {
            return Err(PDFError::invalid_parameter(format!(
                "rotation {} is not a multiple of 90",
                angle
            )));
        }
        xref.dict_mut(self.dict)?.set("Rotate", angle.rem_euclid(360));
        Ok(())
    }

    /// Register `object` under `/Resources/<class>/<name>`
    pub fn add_resource(
        &self,
        xref: &mut XRefTable,
        class: ResourceClass,
        name: &str,
        object: ObjectRef,
    ) -> PDFResult<()> {
        if !xref.contains(object) {
            return Err(PDFError::ObjectNotFound(object.num));
        }
        if name.is_empty() {
            return Err(PDFError::NameInvalidValue);
        }

        let page = xref.dict_mut(self.dict)?;
        page.dict_entry_mut("Resources")?
            .dict_entry_mut(class.key())?
            .set(name, object);
        Ok(())
    }

    /// Size from the MediaBox
    pub fn size(&self, xref: &XRefTable) -> PDFResult<(f32, f32)> {
        let media_box = xref
            .dict(self.dict)?
            .get_array("MediaBox")
            .ok_or_else(|| PDFError::invalid_document("page without /MediaBox"))?;

        let values: Vec<f32> = media_box
            .iter()
            .filter_map(|v| match v {
                ObjectType::Real(r) => Some(r.value()),
                ObjectType::Number(n) => Some(*n as f32),
                _ => None,
            })
            .collect();
        match values.as_slice() {
            [left, bottom, right, top] => Ok((right - left, top - bottom)),
            _ => Err(PDFError::invalid_document("malformed /MediaBox")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn new_page(xref: &mut XRefTable) -> Page {
        Page::create(xref, FilterSet::NONE, 6).unwrap()
    }

    #[test]
    fn test_default_page() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let page = new_page(&mut xref);

        let dict = xref.dict(page.reference())?;
        assert_eq!(dict.get_name("Type"), Some("Page"));
        assert_eq!(dict.get_reference("Contents"), Some(page.contents_ref()));
        assert_eq!(page.size(&xref)?, (DEFAULT_PAGE_WIDTH, DEFAULT_PAGE_HEIGHT));
        Ok(())
    }

    #[test]
    fn test_size_and_rotation() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let page = new_page(&mut xref);

        page.set_size(&mut xref, 612.0, 792.0)?;
        assert_eq!(page.size(&xref)?, (612.0, 792.0));
        assert!(page.set_size(&mut xref, 0.0, 792.0).is_err());

        page.set_rotate(&mut xref, -90)?;
        assert_eq!(xref.dict(page.reference())?.get_integer("Rotate"), Some(270));
        assert!(page.set_rotate(&mut xref, 45).is_err());
        Ok(())
    }

    #[test]
    fn test_resources() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let page = new_page(&mut xref);
        let font = xref.add(Dictionary::with_type("Font"))?;
        let gstate = xref.add(Dictionary::with_type("ExtGState"))?;

        page.add_resource(&mut xref, ResourceClass::Font, "F1", font)?;
        page.add_resource(&mut xref, ResourceClass::ExtGState, "GS1", gstate)?;

        let resources = xref.dict(page.reference())?.get_dict("Resources").unwrap();
        assert_eq!(resources.get_dict("Font").and_then(|d| d.get_reference("F1")), Some(font));
        assert_eq!(
            resources.get_dict("ExtGState").and_then(|d| d.get_reference("GS1")),
            Some(gstate)
        );

        assert!(matches!(
            page.add_resource(&mut xref, ResourceClass::XObject, "Im1", ObjectRef::new(99, 0)),
            Err(PDFError::ObjectNotFound(99))
        ));
        Ok(())
    }

    #[test]
    fn test_contents_filters() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let page = Page::create(&mut xref, FilterSet::FLATE_DECODE, 9)?;
        let contents = page.contents(&mut xref)?;
        assert!(contents.filters().contains(FilterSet::FLATE_DECODE));
        contents.write_to_stream(b"q Q\n");
        assert_eq!(page.contents(&mut xref)?.raw_data(), b"q Q\n");
        Ok(())
    }
}
