//! Explicit destinations: a page plus a view

use crate::error::{PDFError, PDFResult};
use crate::pdf::{ObjectRef, ObjectType};

use super::Page;

/// How the target page is displayed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestinationKind {
    XYZ { left: f32, top: f32, zoom: f32 },
    Fit,
    FitH { top: f32 },
    FitV { left: f32 },
    FitR { left: f32, bottom: f32, right: f32, top: f32 },
    FitB,
    FitBH { top: f32 },
    FitBV { left: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    page: ObjectRef,
    kind: DestinationKind,
}

impl Destination {
    /// Whole page fitted to the window
    pub fn fit(page: Page) -> Self {
        Self {
            page: page.reference(),
            kind: DestinationKind::Fit,
        }
    }

    /// Position at (left, top) with a zoom factor; a zoom of 0 keeps the current one
    pub fn xyz(page: Page, left: f32, top: f32, zoom: f32) -> PDFResult<Self> {
        if !(0.0..=32.0).contains(&zoom) || (zoom > 0.0 && zoom < 0.08) {
            return Err(PDFError::invalid_parameter(format!("zoom {} out of range", zoom)));
        }
        Ok(Self::with_kind(page, DestinationKind::XYZ { left, top, zoom }))
    }

    pub fn with_kind(page: Page, kind: DestinationKind) -> Self {
        Self {
            page: page.reference(),
            kind,
        }
    }

    pub fn page(&self) -> ObjectRef {
        self.page
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// `[page /Kind args...]`
    pub fn to_object(&self) -> PDFResult<ObjectType> {
        let (name, args): (&'static str, Vec<f32>) = match self.kind {
            DestinationKind::XYZ { left, top, zoom } => ("XYZ", vec![left, top, zoom]),
            DestinationKind::Fit => ("Fit", vec![]),
            DestinationKind::FitH { top } => ("FitH", vec![top]),
            DestinationKind::FitV { left } => ("FitV", vec![left]),
            DestinationKind::FitR { left, bottom, right, top } => ("FitR", vec![left, bottom, right, top]),
            DestinationKind::FitB => ("FitB", vec![]),
            DestinationKind::FitBH { top } => ("FitBH", vec![top]),
            DestinationKind::FitBV { left } => ("FitBV", vec![left]),
        };

        let mut items = Vec::with_capacity(args.len() + 2);
        items.push(ObjectType::Reference(self.page));
        items.push(ObjectType::known_name(name));
        for value in args {
            items.push(ObjectType::real(value)?);
        }
        Ok(ObjectType::Array(items))
    }
}
