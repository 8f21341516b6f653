//! In-memory description of a deck to generate.

use crate::error::{DeckError, Result};
use crate::pptx::ChartKind;
use bytes::Bytes;
use phf::phf_map;
use std::fmt;
use std::str::FromStr;

/// Default font size for slide content, in points.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;
pub const DEFAULT_FONT_NAME: &str = "Calibri";
/// Font sizes PresentationML accepts (`ST_TextFontSize`, 100..=400000 centipoints).
pub const MIN_FONT_SIZE: f64 = 1.0;
pub const MAX_FONT_SIZE: f64 = 4000.0;

/// The eleven standard slide layouts, by position in the slide master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    TitleSlide,
    TitleAndContent,
    SectionHeader,
    TwoContent,
    Comparison,
    TitleOnly,
    Blank,
    ContentWithCaption,
    PictureWithCaption,
    TitleAndVerticalText,
    VerticalTitleAndText,
}

static LAYOUT_NAMES: phf::Map<&'static str, LayoutKind> = phf_map! {
    "Title Slide" => LayoutKind::TitleSlide,
    "Title and Content" => LayoutKind::TitleAndContent,
    "Section Header" => LayoutKind::SectionHeader,
    "Two Content" => LayoutKind::TwoContent,
    "Comparison" => LayoutKind::Comparison,
    "Title Only" => LayoutKind::TitleOnly,
    "Blank" => LayoutKind::Blank,
    "Content with Caption" => LayoutKind::ContentWithCaption,
    "Picture with Caption" => LayoutKind::PictureWithCaption,
    "Title and Vertical Text" => LayoutKind::TitleAndVerticalText,
    "Vertical Title and Text" => LayoutKind::VerticalTitleAndText,
};

impl LayoutKind {
    pub const ALL: [LayoutKind; 11] = [
        LayoutKind::TitleSlide,
        LayoutKind::TitleAndContent,
        LayoutKind::SectionHeader,
        LayoutKind::TwoContent,
        LayoutKind::Comparison,
        LayoutKind::TitleOnly,
        LayoutKind::Blank,
        LayoutKind::ContentWithCaption,
        LayoutKind::PictureWithCaption,
        LayoutKind::TitleAndVerticalText,
        LayoutKind::VerticalTitleAndText,
    ];

    /// Position of the layout in a standard slide master.
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TitleSlide => "Title Slide",
            Self::TitleAndContent => "Title and Content",
            Self::SectionHeader => "Section Header",
            Self::TwoContent => "Two Content",
            Self::Comparison => "Comparison",
            Self::TitleOnly => "Title Only",
            Self::Blank => "Blank",
            Self::ContentWithCaption => "Content with Caption",
            Self::PictureWithCaption => "Picture with Caption",
            Self::TitleAndVerticalText => "Title and Vertical Text",
            Self::VerticalTitleAndText => "Vertical Title and Text",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        LAYOUT_NAMES
            .get(s.trim())
            .copied()
            .ok_or_else(|| DeckError::InvalidFormat(format!("Unknown layout: {}", s)))
    }
}

/// Images attached to a content slide.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideImage {
    /// One picture stretched over the whole slide, behind everything else
    Background(Bytes),
    /// Pictures fanned out from the bottom-right corner
    Foreground(Vec<Bytes>),
}

/// One content slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSpec {
    /// Requested layout index; out-of-range values fall back to Blank
    pub layout: usize,
    pub content: String,
    pub image: Option<SlideImage>,
    pub chart: Option<ChartKind>,
    /// Points
    pub font_size: f64,
    pub font_name: String,
    /// Speaker notes; filled with improvement tips by the augmentation step
    pub notes: String,
    /// Rewrite instructions for the augmentation step
    pub instructions: Option<String>,
}

impl Default for SlideSpec {
    fn default() -> Self {
        Self {
            layout: LayoutKind::Blank.index(),
            content: String::new(),
            image: None,
            chart: None,
            font_size: DEFAULT_FONT_SIZE,
            font_name: DEFAULT_FONT_NAME.to_string(),
            notes: String::new(),
            instructions: None,
        }
    }
}

impl SlideSpec {
    pub fn with_layout(layout: LayoutKind) -> Self {
        Self {
            layout: layout.index(),
            ..Default::default()
        }
    }
}

/// A titled group of slides, introduced by a section header slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub title: String,
    pub header_image: Option<Bytes>,
    pub slides: Vec<SlideSpec>,
}

/// Replace every section with AI-written slides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoGenerate {
    /// Background material for the generator
    pub context: String,
    pub instructions: String,
    /// Number of slides to generate
    pub count: usize,
}

/// Everything needed to generate one deck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationRequest {
    pub title: String,
    pub description: String,
    pub author: String,
    /// `.pptx` bytes to start from instead of the built-in blank deck
    pub template: Option<Bytes>,
    /// Theme name, see [`crate::deck::theme`]
    pub theme: Option<String>,
    pub title_background: Option<Bytes>,
    /// Background shared by all content slides; suppresses the theme color
    pub common_background: Option<Bytes>,
    pub sections: Vec<Section>,
    /// Consumed by the augmentation step; ignored by the assembler
    pub auto_generate: Option<AutoGenerate>,
}

impl PresentationRequest {
    pub fn slide_count(&self) -> usize {
        self.sections.iter().map(|s| s.slides.len()).sum()
    }

    pub fn slides_mut(&mut self) -> impl Iterator<Item = &mut SlideSpec> {
        self.sections.iter_mut().flat_map(|s| s.slides.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_kind_indices() {
        for (i, kind) in LayoutKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(LayoutKind::from_index(i), Some(*kind));
            assert_eq!(kind.name().parse::<LayoutKind>().unwrap(), *kind);
        }
        assert_eq!(LayoutKind::from_index(11), None);
        assert!("Title And Content".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn test_slide_defaults() {
        let slide = SlideSpec::default();
        assert_eq!(slide.layout, 6);
        assert_eq!(slide.font_size, 24.0);
        assert_eq!(slide.font_name, "Calibri");
        assert_eq!(SlideSpec::with_layout(LayoutKind::Comparison).layout, 4);
    }
}
