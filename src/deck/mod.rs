//! Deck generation from a structured request.
//!
//! A [`PresentationRequest`] is built in memory or loaded from a manifest
//! file, optionally run through [`crate::augment`], and then assembled into
//! `.pptx` bytes.
//!
//! # Example
//!
//! ```rust
//! use slidecraft::deck::{LayoutKind, PresentationRequest, Section, SlideSpec, assemble};
//!
//! let request = PresentationRequest {
//!     title: "Launch".to_string(),
//!     author: "Ada".to_string(),
//!     sections: vec![Section {
//!         title: "Plan".to_string(),
//!         slides: vec![SlideSpec {
//!             content: "Ship it".to_string(),
//!             ..SlideSpec::with_layout(LayoutKind::TitleAndContent)
//!         }],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let bytes = assemble(&request)?;
//! assert_eq!(&bytes[0..2], b"PK");
//! # Ok::<(), slidecraft::DeckError>(())
//! ```

pub mod assembler;
pub mod manifest;
pub mod request;
pub mod theme;

pub use assembler::{assemble, build_presentation};
pub use manifest::{load_manifest, parse_manifest};
pub use request::{AutoGenerate, LayoutKind, PresentationRequest, Section, SlideImage, SlideSpec};
pub use theme::{ThemeColors, theme_colors};
