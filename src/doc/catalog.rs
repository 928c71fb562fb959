//! Document catalog

use crate::error::PDFResult;
use crate::pdf::{Dictionary, ObjectRef, ObjectType, XRefTable};

use super::{Destination, PagesNode};

/// `/PageLayout` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLayout {
    #[default]
    SinglePage,
    OneColumn,
    TwoColumnLeft,
    TwoColumnRight,
    TwoPageLeft,
    TwoPageRight,
}

impl PageLayout {
    pub fn name(&self) -> &'static str {
        match self {
            PageLayout::SinglePage => "SinglePage",
            PageLayout::OneColumn => "OneColumn",
            PageLayout::TwoColumnLeft => "TwoColumnLeft",
            PageLayout::TwoColumnRight => "TwoColumnRight",
            PageLayout::TwoPageLeft => "TwoPageLeft",
            PageLayout::TwoPageRight => "TwoPageRight",
        }
    }
}

/// `/PageMode` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageMode {
    #[default]
    UseNone,
    UseOutlines,
    UseThumbs,
    FullScreen,
    UseOC,
    UseAttachments,
}

impl PageMode {
    pub fn name(&self) -> &'static str {
        match self {
            PageMode::UseNone => "UseNone",
            PageMode::UseOutlines => "UseOutlines",
            PageMode::UseThumbs => "UseThumbs",
            PageMode::FullScreen => "FullScreen",
            PageMode::UseOC => "UseOC",
            PageMode::UseAttachments => "UseAttachments",
        }
    }
}

/// Handle to the `/Catalog` dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Catalog(ObjectRef);

impl Catalog {
    pub(crate) fn create(xref: &mut XRefTable, pages: PagesNode) -> PDFResult<Self> {
        let mut dict = Dictionary::with_type("Catalog");
        dict.set("Pages", pages.reference());
        Ok(Self(xref.add(dict)?))
    }

    pub(crate) fn reference(&self) -> ObjectRef {
        self.0
    }

    pub(crate) fn set_page_layout(&self, xref: &mut XRefTable, layout: PageLayout) -> PDFResult<()> {
        xref.dict_mut(self.0)?.set_known_name("PageLayout", layout.name());
        Ok(())
    }

    pub(crate) fn set_page_mode(&self, xref: &mut XRefTable, mode: PageMode) -> PDFResult<()> {
        xref.dict_mut(self.0)?.set_known_name("PageMode", mode.name());
        Ok(())
    }

    pub(crate) fn set_open_action(&self, xref: &mut XRefTable, dest: &Destination) -> PDFResult<()> {
        let action = dest.to_object()?;
        xref.dict_mut(self.0)?.set("OpenAction", action);
        Ok(())
    }

    pub(crate) fn set_entry(
        &self,
        xref: &mut XRefTable,
        key: &str,
        value: impl Into<ObjectType>,
    ) -> PDFResult<()> {
        xref.dict_mut(self.0)?.set(key, value);
        Ok(())
    }

    pub(crate) fn remove_entry(&self, xref: &mut XRefTable, key: &str) -> PDFResult<()> {
        xref.dict_mut(self.0)?.remove(key);
        Ok(())
    }

    /// Append to `/OutputIntents` unless already listed
    pub(crate) fn add_output_intent(&self, xref: &mut XRefTable, intent: ObjectRef) -> PDFResult<()> {
        let intents = xref.dict_mut(self.0)?.array_entry_mut("OutputIntents")?;
        if !intents.iter().any(|i| i.as_reference() == Some(intent)) {
            intents.push(intent.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_catalog_entries() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let pages = PagesNode::create(&mut xref)?;
        let catalog = Catalog::create(&mut xref, pages)?;

        catalog.set_page_layout(&mut xref, PageLayout::TwoColumnLeft)?;
        catalog.set_page_mode(&mut xref, PageMode::UseOutlines)?;

        let dict = xref.dict(catalog.reference())?;
        assert_eq!(dict.get_name("Type"), Some("Catalog"));
        assert_eq!(dict.get_reference("Pages"), Some(pages.reference()));
        assert_eq!(dict.get_name("PageLayout"), Some("TwoColumnLeft"));
        assert_eq!(dict.get_name("PageMode"), Some("UseOutlines"));
        Ok(())
    }

    #[test]
    fn test_output_intents_not_duplicated() -> PDFResult<()> {
        let mut xref = XRefTable::new();
        let pages = PagesNode::create(&mut xref)?;
        let catalog = Catalog::create(&mut xref, pages)?;
        let intent = xref.add(Dictionary::with_type("OutputIntent"))?;

        catalog.add_output_intent(&mut xref, intent)?;
        catalog.add_output_intent(&mut xref, intent)?;
        assert_eq!(
            xref.dict(catalog.reference())?.get_array("OutputIntents").map(Vec::len),
            Some(1)
        );
        Ok(())
    }
}
