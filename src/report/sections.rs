//! Declarative section model for the output document.
//!
//! The composer produces a flat, ordered list of sections; the document
//! writer renders each one independently. Section order and content stay
//! testable without touching PDF bytes, and the writer never needs to know
//! where a number came from.

use std::path::PathBuf;

/// One self-contained block of the output document.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Main document title, centered, largest type.
    Title(String),
    /// Embedded raster image (the chart artifact), scaled to content width.
    Image(PathBuf),
    /// Section heading, centered.
    Heading(String),
    /// Left-aligned body lines, one per row.
    TextBlock(Vec<String>),
    /// Small bordered table: a header row followed by value rows.
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}
