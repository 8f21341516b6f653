//! Common types and utilities shared by the package, presentation and deck layers.

pub mod color;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use color::RGBColor;
pub use unit::{EMUS_PER_INCH, EMUS_PER_PT, inches, points};
pub use xml::{escape_xml, unescape_xml};
