// Rendering module for the plugin list page.
// Produces the reStructuredText table, the PDF definition list and the full page.

pub mod definitions;
pub mod document;
pub mod table;

pub use document::{render_document, write_document};
