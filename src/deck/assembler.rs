//! Builds a deck from a [`PresentationRequest`].
//!
//! The deck is one title slide, then for every section a section header
//! slide followed by the section's content slides.

use crate::common::inches;
use crate::error::{DeckError, Result};
use crate::pptx::{
    ChartData, MutablePresentation, MutableSlide, SlideBackground, TextFormat,
};
use bytes::Bytes;

use super::request::{LayoutKind, PresentationRequest, Section, SlideImage, SlideSpec};
use super::theme::{ThemeColors, theme_colors};

/// Width of each picture in a foreground fan.
const FAN_PICTURE_WIDTH: f64 = 3.0;
/// Distance between the fan and the slide's right and bottom edges.
const FAN_MARGIN: f64 = 0.5;
/// Horizontal shift between neighbouring fan pictures.
const FAN_STEP: f64 = 3.2;

/// Generate `.pptx` bytes for a request.
pub fn assemble(request: &PresentationRequest) -> Result<Vec<u8>> {
    build_presentation(request)?.to_bytes()
}

/// Build the presentation without serializing it.
pub fn build_presentation(request: &PresentationRequest) -> Result<MutablePresentation> {
    let mut pres = match &request.template {
        Some(template) => MutablePresentation::from_template(template)?,
        None => MutablePresentation::new()?,
    };

    if pres.layouts().is_empty() {
        return Err(DeckError::Template("slide master has no layouts".to_string()));
    }
    for (index, layout) in pres.layouts().iter().enumerate() {
        log::debug!("Layout {}: {}", index, layout.name);
    }

    let style = DeckStyle::new(request);
    pres.set_core_properties(&request.title, &request.author, &request.description);

    add_title_slide(&mut pres, request, &style)?;
    for section in &request.sections {
        add_section_header(&mut pres, section, &style)?;
        for (position, spec) in section.slides.iter().enumerate() {
            add_content_slide(&mut pres, section, position + 1, spec, &style)?;
        }
    }

    log::info!(
        "Assembled '{}': {} sections, {} slides",
        request.title,
        request.sections.len(),
        pres.slide_count()
    );
    Ok(pres)
}

/// Colors derived from the request's theme.
struct DeckStyle {
    colors: ThemeColors,
    /// Theme colors only apply to the built-in blank deck
    has_template: bool,
    has_common_background: bool,
}

impl DeckStyle {
    fn new(request: &PresentationRequest) -> Self {
        let colors = match (&request.template, request.theme.as_deref()) {
            (None, Some(name)) => theme_colors(name),
            _ => ThemeColors::default(),
        };
        Self {
            colors,
            has_template: request.template.is_some(),
            has_common_background: request.common_background.is_some(),
        }
    }

    /// Solid background for slides without a picture background.
    fn background(&self) -> Option<SlideBackground> {
        if self.has_template || self.has_common_background {
            return None;
        }
        self.colors.background.map(SlideBackground::solid)
    }

    fn text_format(&self, spec: &SlideSpec) -> TextFormat {
        TextFormat {
            font: Some(spec.font_name.clone()),
            size: Some(spec.font_size),
            color: if self.has_template {
                None
            } else {
                self.colors.font
            },
        }
    }
}

/// Add a slide from `requested`, falling back to `fallback` and then to the
/// first layout.
fn add_slide_with_fallback(
    pres: &mut MutablePresentation,
    requested: usize,
    fallback: usize,
) -> Result<&mut MutableSlide> {
    let index = pres
        .layouts()
        .resolve(requested, fallback)
        .ok_or_else(|| DeckError::Template("slide master has no layouts".to_string()))?;
    pres.add_slide(index)
}

/// Put `text` into placeholder idx 1 when the slide has a text-capable one
/// besides the title, else into a text box at (1in, `y`). Returns the index
/// of the shape holding the text.
fn place_body_text(slide: &mut MutableSlide, text: &str, slide_width: i64, y: f64, height: f64) -> usize {
    if slide.placeholder_count() > 1 {
        let index = slide.shapes().iter().position(|s| {
            s.accepts_text() && s.placeholder().is_some_and(|p| p.idx == 1)
        });
        if let Some(index) = index
            && let Some(shape) = slide.shape_mut(index)
            && shape.set_text(text)
        {
            return index;
        }
    }
    slide.add_text_box(
        text,
        inches(1.0),
        inches(y),
        slide_width - inches(2.0),
        inches(height),
    )
}

/// Place a picture over the whole slide, behind every other shape.
fn add_background_picture(slide: &mut MutableSlide, data: &Bytes, width: i64, height: i64) -> Result<()> {
    let index = slide.add_picture(data.clone(), 0, 0, width, Some(height))?;
    slide.send_to_back(index);
    Ok(())
}

fn apply_background(
    slide: &mut MutableSlide,
    picture: Option<&Bytes>,
    style: &DeckStyle,
    width: i64,
    height: i64,
) -> Result<()> {
    match picture {
        Some(data) => add_background_picture(slide, data, width, height)?,
        None => {
            if let Some(background) = style.background() {
                slide.set_background(background);
            }
        },
    }
    Ok(())
}

fn add_title_slide(pres: &mut MutablePresentation, request: &PresentationRequest, style: &DeckStyle) -> Result<()> {
    let (width, height) = (pres.slide_width(), pres.slide_height());
    let slide = add_slide_with_fallback(pres, LayoutKind::TitleSlide.index(), 0)?;

    slide.set_title(&request.title);
    let body = format!("{}\n\nAuthor: {}", request.description, request.author);
    place_body_text(slide, &body, width, 2.0, 1.0);

    apply_background(slide, request.title_background.as_ref(), style, width, height)?;
    log::debug!("Title slide on layout '{}'", slide.layout_name());
    Ok(())
}

fn add_section_header(pres: &mut MutablePresentation, section: &Section, style: &DeckStyle) -> Result<()> {
    let (width, height) = (pres.slide_width(), pres.slide_height());
    let slide = add_slide_with_fallback(pres, LayoutKind::SectionHeader.index(), 0)?;

    if !slide.set_title(&section.title) {
        slide.add_text_box(
            &section.title,
            inches(1.0),
            inches(1.0),
            width - inches(2.0),
            inches(1.0),
        );
    }

    apply_background(slide, section.header_image.as_ref(), style, width, height)?;
    log::debug!("Section header '{}'", section.title);
    Ok(())
}

/// Top-left corners of `count` fanned pictures, right to left.
pub(crate) fn fan_positions(count: usize, slide_width: i64, slide_height: i64) -> Vec<(i64, i64)> {
    let first_x = slide_width - inches(FAN_PICTURE_WIDTH + FAN_MARGIN);
    let y = slide_height - inches(FAN_PICTURE_WIDTH + FAN_MARGIN);
    (0..count)
        .map(|i| (first_x - inches(FAN_STEP) * i as i64, y))
        .collect()
}

fn add_content_slide(
    pres: &mut MutablePresentation,
    section: &Section,
    position: usize,
    spec: &SlideSpec,
    style: &DeckStyle,
) -> Result<()> {
    let (width, height) = (pres.slide_width(), pres.slide_height());
    let slide = add_slide_with_fallback(pres, spec.layout, LayoutKind::Blank.index())?;

    if slide.has_title() {
        slide.set_title(&format!("{} - Slide {}", section.title, position));
    }

    if !spec.content.is_empty() {
        let index = place_body_text(slide, &spec.content, width, 2.0, 2.0);
        if let Some(shape) = slide.shape_mut(index) {
            shape.apply_text_format(&style.text_format(spec));
        }
    }

    match &spec.image {
        Some(SlideImage::Foreground(pictures)) if !pictures.is_empty() => {
            for (data, (x, y)) in pictures.iter().zip(fan_positions(pictures.len(), width, height)) {
                slide.add_picture(data.clone(), x, y, inches(FAN_PICTURE_WIDTH), None)?;
            }
        },
        Some(SlideImage::Background(data)) => add_background_picture(slide, data, width, height)?,
        _ => apply_background(slide, None, style, width, height)?,
    }

    if let Some(kind) = spec.chart {
        slide.add_chart(
            kind,
            ChartData::sample(),
            inches(2.0),
            inches(2.0),
            inches(6.0),
            inches(4.5),
        );
    }

    slide.set_notes(&spec.notes);

    log::debug!(
        "Slide {} of '{}' on layout '{}' ({} shapes)",
        position,
        section.title,
        slide.layout_name(),
        slide.shape_count()
    );
    Ok(())
}
