//! SlideCraft - assemble PowerPoint decks from structured content
//!
//! A deck is described by a [`deck::PresentationRequest`]: a title slide,
//! then sections of content slides with text, pictures, charts and speaker
//! notes. The request is assembled into a `.pptx` package written natively
//! on top of an OPC (Open Packaging Conventions) layer.
//!
//! # Layers
//!
//! - [`opc`]: ZIP package, parts, relationships and content types
//! - [`pptx`]: PresentationML writer (layouts, slides, shapes, charts, notes)
//! - [`deck`]: request model, manifest loading and the deck assembler
//! - [`augment`]: optional AI rewrite, auto-generation and improvement tips
//!
//! # Example
//!
//! ```no_run
//! use slidecraft::deck::{assemble, load_manifest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = load_manifest("deck.yaml")?;
//! let bytes = assemble(&request)?;
//! std::fs::write("deck.pptx", bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod augment;
pub mod common;
pub mod deck;
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{DeckError, Result};

/// MIME type of the generated `.pptx` files.
pub const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
