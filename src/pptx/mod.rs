//! PowerPoint (.pptx) presentation writing.
//!
//! A presentation is opened from the built-in blank deck or from template
//! bytes, slides are appended from the master's layouts, and the result is
//! serialized back to a `.pptx` package.
//!
//! # Example
//!
//! ```rust
//! use slidecraft::common::inches;
//! use slidecraft::pptx::{ChartData, ChartKind, MutablePresentation};
//!
//! let mut pres = MutablePresentation::new()?;
//! let slide = pres.add_slide(5)?;
//! slide.set_title("Quarterly numbers");
//! slide.add_chart(
//!     ChartKind::ColumnClustered,
//!     ChartData::sample(),
//!     inches(2.0),
//!     inches(2.0),
//!     inches(6.0),
//!     inches(4.5),
//! );
//! slide.set_notes("Walk through the trend first.");
//!
//! let bytes = pres.to_bytes()?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), slidecraft::DeckError>(())
//! ```

pub mod background;
pub mod chart;
pub mod excel_embed;
pub mod format;
pub mod layout;
pub mod notes;
pub mod parts;
pub mod props;
pub mod template;
pub mod text;
pub mod writer;

pub use background::SlideBackground;
pub use chart::{ChartData, ChartKind, ChartSeries};
pub use format::{ImageFormat, TextFormat};
pub use layout::{LayoutCatalog, Placeholder, PlaceholderType, SlideLayout};
pub use props::CoreProperties;
pub use text::TextFrame;
pub use writer::{MutablePresentation, MutableShape, MutableSlide};
