//! Page label number tree

use std::collections::BTreeMap;

use crate::error::{PDFError, PDFResult};
use crate::pdf::{Dictionary, ObjectType, PDFString};

/// Numbering style of a label range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabelStyle {
    Decimal,
    UpperRoman,
    LowerRoman,
    UpperLetters,
    LowerLetters,
}

impl PageLabelStyle {
    /// `/S` value
    pub fn code(&self) -> &'static str {
        match self {
            PageLabelStyle::Decimal => "D",
            PageLabelStyle::UpperRoman => "R",
            PageLabelStyle::LowerRoman => "r",
            PageLabelStyle::UpperLetters => "A",
            PageLabelStyle::LowerLetters => "a",
        }
    }

    pub fn from_code(code: &str) -> PDFResult<Self> {
        match code {
            "D" => Ok(PageLabelStyle::Decimal),
            "R" => Ok(PageLabelStyle::UpperRoman),
            "r" => Ok(PageLabelStyle::LowerRoman),
            "A" => Ok(PageLabelStyle::UpperLetters),
            "a" => Ok(PageLabelStyle::LowerLetters),
            _ => Err(PDFError::PageNumStyleOutOfRange),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLabel {
    style: PageLabelStyle,
    first_page: i32,
    prefix: String,
}

impl PageLabel {
    pub fn new(style: PageLabelStyle, first_page: i32, prefix: &str) -> PDFResult<Self> {
        if first_page < 1 {
            return Err(PDFError::PageLabelOutOfRange(i64::from(first_page)));
        }
        Ok(Self {
            style,
            first_page,
            prefix: prefix.to_string(),
        })
    }

    /// `<< /S ... /P ... /St ... >>`, omitting defaults
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set_known_name("S", self.style.code());
        if !self.prefix.is_empty() {
            dict.set("P", PDFString::from(self.prefix.as_str()));
        }
        if self.first_page != 1 {
            dict.set("St", self.first_page);
        }
        dict
    }
}

/// `/PageLabels` dictionary with a flat `/Nums` array sorted by page index
pub fn build_page_labels(labels: &BTreeMap<u32, PageLabel>) -> PDFResult<Dictionary> {
    let mut nums = Vec::with_capacity(labels.len() * 2);
    for (page_num, label) in labels {
        let index = i32::try_from(*page_num)
            .map_err(|_| PDFError::PageLabelOutOfRange(i64::from(*page_num)))?;
        nums.push(ObjectType::Number(index));
        nums.push(ObjectType::Dictionary(label.to_dict()));
    }

    let mut dict = Dictionary::new();
    dict.set("Nums", ObjectType::Array(nums));
    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PDFWriter;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn render(dict: &mut Dictionary) -> String {
        let mut writer = PDFWriter::new(Vec::new());
        dict.write_value(&mut writer, None).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_labels_sorted_with_defaults_omitted() -> PDFResult<()> {
        let mut labels = BTreeMap::new();
        labels.insert(3, PageLabel::new(PageLabelStyle::Decimal, 1, "")?);
        labels.insert(0, PageLabel::new(PageLabelStyle::LowerRoman, 1, "")?);

        let mut dict = build_page_labels(&labels)?;
        assert_eq!(
            render(&mut dict),
            "<<\n/Nums [0 <<\n/S /r\n>> 3 <<\n/S /D\n>>]\n>>"
        );
        Ok(())
    }

    #[test]
    fn test_prefix_and_start() -> PDFResult<()> {
        let mut dict = PageLabel::new(PageLabelStyle::UpperLetters, 5, "App-")?.to_dict();
        assert_eq!(render(&mut dict), "<<\n/S /A\n/P (App-)\n/St 5\n>>");
        Ok(())
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            PageLabel::new(PageLabelStyle::Decimal, 0, ""),
            Err(PDFError::PageLabelOutOfRange(0))
        ));
        assert!(matches!(
            PageLabelStyle::from_code("x"),
            Err(PDFError::PageNumStyleOutOfRange)
        ));
        assert_eq!(PageLabelStyle::from_code("r").unwrap(), PageLabelStyle::LowerRoman);
    }
}
