//! Document outline (bookmarks)
//!
//! Items form a doubly linked list under each parent through `/First`,
//! `/Last`, `/Prev` and `/Next`. The open/closed state lives outside the
//! dictionaries and is folded into `/Count` before the file is written.

use std::collections::HashMap;

use log::debug;

use super::Destination;
use crate::error::{PDFError, PDFResult};
use crate::pdf::{Dictionary, ObjectRef, PDFString, XRefTable};

/// Handle to an outline item or the outline root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outline(ObjectRef);

impl Outline {
    pub fn reference(&self) -> ObjectRef {
        self.0
    }
}

#[derive(Debug)]
pub(crate) struct OutlineTree {
    root: Outline,
    opened: HashMap<ObjectRef, bool>,
}

impl OutlineTree {
    pub(crate) fn new(xref: &mut XRefTable) -> PDFResult<Self> {
        let root = Outline(xref.add(Dictionary::with_type("Outlines"))?);
        let mut opened = HashMap::new();
        opened.insert(root.0, true);
        Ok(Self { root, opened })
    }

    pub(crate) fn root(&self) -> Outline {
        self.root
    }

    /// Append a new item as the last child of `parent`
    pub(crate) fn create(
        &mut self,
        xref: &mut XRefTable,
        parent: Outline,
        title: &str,
    ) -> PDFResult<Outline> {
        self.check(parent)?;

        let mut dict = Dictionary::new();
        dict.set("Title", PDFString::from(title));
        dict.set("Parent", parent.0);
        let item = xref.add(dict)?;

        let parent_dict = xref.dict_mut(parent.0)?;
        match parent_dict.get_reference("Last") {
            Some(last) => {
                parent_dict.set("Last", item);
                xref.dict_mut(last)?.set("Next", item);
                xref.dict_mut(item)?.set("Prev", last);
            }
            None => {
                parent_dict.set("First", item);
                parent_dict.set("Last", item);
            }
        }

        self.opened.insert(item, true);
        debug!("Outline item {} added under {}", item, parent.0);
        Ok(Outline(item))
    }

    pub(crate) fn set_opened(&mut self, outline: Outline, opened: bool) -> PDFResult<()> {
        self.check(outline)?;
        self.opened.insert(outline.0, opened);
        Ok(())
    }

    pub(crate) fn is_opened(&self, outline: Outline) -> bool {
        self.opened.get(&outline.0).copied().unwrap_or(true)
    }

    pub(crate) fn set_destination(
        &self,
        xref: &mut XRefTable,
        outline: Outline,
        destination: &Destination,
    ) -> PDFResult<()> {
        self.check(outline)?;
        if outline == self.root {
            return Err(PDFError::invalid_parameter("the outline root has no destination"));
        }
        let dest = destination.to_object()?;
        xref.dict_mut(outline.0)?.set("Dest", dest);
        Ok(())
    }

    /// Set `/Count` on every node: visible descendants, negated when closed
    pub(crate) fn update_counts(&self, xref: &mut XRefTable) -> PDFResult<()> {
        self.update_node(xref, self.root.0)
    }

    fn update_node(&self, xref: &mut XRefTable, node: ObjectRef) -> PDFResult<()> {
        let count = self.visible_descendants(xref, node)?;
        let signed = if self.is_opened(Outline(node)) {
            count
        } else {
            -count
        };

        let dict = xref.dict_mut(node)?;
        if count == 0 {
            dict.remove("Count");
        } else {
            dict.set("Count", signed);
        }

        for child in children(xref, node)? {
            self.update_node(xref, child)?;
        }
        Ok(())
    }

    fn visible_descendants(&self, xref: &XRefTable, node: ObjectRef) -> PDFResult<i32> {
        let mut count = 0;
        for child in children(xref, node)? {
            count += 1;
            if self.is_opened(Outline(child)) {
                count += self.visible_descendants(xref, child)?;
            }
        }
        Ok(count)
    }

    fn check(&self, outline: Outline) -> PDFResult<()> {
        if self.opened.contains_key(&outline.0) {
            Ok(())
        } else {
            Err(PDFError::invalid_parameter(format!(
                "{} is not an outline of this document",
                outline.0
            )))
        }
    }
}

fn children(xref: &XRefTable, node: ObjectRef) -> PDFResult<Vec<ObjectRef>> {
    let mut result = Vec::new();
    let mut next = xref.dict(node)?.get_reference("First");
    while let Some(child) = next {
        result.push(child);
        next = xref.dict(child)?.get_reference("Next");
    }
    Ok(result)
}
