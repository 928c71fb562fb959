//! Page tree nodes
//!
//! Every `/Pages` node keeps `/Count` equal to the number of leaf pages
//! below it. Adding a kid updates the counts of all ancestors.

use log::debug;

use crate::error::{PDFError, PDFResult};
use crate::pdf::{Dictionary, ObjectRef, ObjectType, XRefTable};

/// Handle to a `/Pages` node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PagesNode(ObjectRef);

impl PagesNode {
    pub(crate) fn create(xref: &mut XRefTable) -> PDFResult<Self> {
        let mut dict = Dictionary::with_type("Pages");
        dict.set("Kids", ObjectType::Array(Vec::new()));
        dict.set("Count", 0);
        Ok(Self(xref.add(dict)?))
    }

    pub fn reference(&self) -> ObjectRef {
        self.0
    }

    /// Leaf pages below this node
    pub fn count(&self, xref: &XRefTable) -> PDFResult<i32> {
        Ok(xref.dict(self.0)?.get_integer("Count").unwrap_or(0))
    }

    pub fn kids(&self, xref: &XRefTable) -> PDFResult<Vec<ObjectRef>> {
        Ok(xref
            .dict(self.0)?
            .get_array("Kids")
            .map(|kids| kids.iter().filter_map(ObjectType::as_reference).collect())
            .unwrap_or_default())
    }

    /// Append a page or pages node and set its `/Parent`
    pub fn add_kid(&self, xref: &mut XRefTable, kid: ObjectRef) -> PDFResult<()> {
        self.attach(xref, kid)?;
        xref.dict_mut(self.0)?.array_entry_mut("Kids")?.push(kid.into());
        propagate_count(xref, self.0, leaf_count(xref, kid)?)
    }

    /// Place `kid` right before `target` under the parent of `target`
    pub(crate) fn insert_before(
        xref: &mut XRefTable,
        target: ObjectRef,
        kid: ObjectRef,
    ) -> PDFResult<()> {
        let parent = xref
            .dict(target)?
            .get_reference("Parent")
            .ok_or_else(|| PDFError::invalid_document(format!("{} is not in a page tree", target)))?;
        let parent = PagesNode(parent);
        let position = xref
            .dict(parent.0)?
            .get_array("Kids")
            .and_then(|kids| kids.iter().position(|k| k.as_reference() == Some(target)))
            .ok_or(PDFError::ObjectNotFound(target.num))?;
        parent.attach(xref, kid)?;

        xref.dict_mut(parent.0)?
            .array_entry_mut("Kids")?
            .insert(position, kid.into());

        propagate_count(xref, parent.0, leaf_count(xref, kid)?)
    }

    fn attach(&self, xref: &mut XRefTable, kid: ObjectRef) -> PDFResult<()> {
        let kid_dict = xref.dict(kid)?;
        match kid_dict.get_name("Type") {
            Some("Page") | Some("Pages") => {}
            other => {
                return Err(PDFError::invalid_parameter(format!(
                    "page tree kid has /Type {:?}",
                    other
                )))
            }
        }
        if kid_dict.contains_key("Parent") {
            return Err(PDFError::PageCannotSetParent);
        }

        let mut node = Some(self.0);
        while let Some(current) = node {
            if current == kid {
                return Err(PDFError::PageCannotSetParent);
            }
            node = xref.dict(current)?.get_reference("Parent");
        }

        xref.dict_mut(kid)?.set("Parent", self.0);
        debug!("Attached {} under {}", kid, self.0);
        Ok(())
    }
}

fn leaf_count(xref: &XRefTable, node: ObjectRef) -> PDFResult<i32> {
    let dict = xref.dict(node)?;
    Ok(match dict.get_name("Type") {
        Some("Pages") => dict.get_integer("Count").unwrap_or(0),
        _ => 1,
    })
}

/// Add `delta` to `/Count` of `start` and every ancestor
fn propagate_count(xref: &mut XRefTable, start: ObjectRef, delta: i32) -> PDFResult<()> {
    let mut node = Some(start);
    while let Some(current) = node {
        let dict = xref.dict_mut(current)?;
        let count = dict.get_integer("Count").unwrap_or(0);
        dict.set("Count", count + delta);
        node = dict.get_reference("Parent");
    }
    Ok(())
}
