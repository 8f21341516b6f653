/// Slide types and implementation for PPTX presentations.
use crate::common::unit::scaled_height;
use crate::error::{DeckError, Result};
use crate::opc::PackURI;
use crate::pptx::background::SlideBackground;
use crate::pptx::chart::{ChartData, ChartKind};
use crate::pptx::format::ImageFormat;
use crate::pptx::layout::SlideLayout;
use bytes::Bytes;
use image::ImageReader;
use std::io::Cursor;

use super::relmap::RelationshipMapper;
use super::shape::MutableShape;

/// A new slide being built on top of a layout.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID written to `p:sldIdLst`
    pub(crate) slide_id: u32,
    /// Layout the slide is based on
    pub(crate) layout_partname: PackURI,
    pub(crate) layout_name: String,
    /// Shapes in z-order, back to front
    pub(crate) shapes: Vec<MutableShape>,
    pub(crate) background: Option<SlideBackground>,
    pub(crate) notes: Option<String>,
}

impl MutableSlide {
    /// Create a slide with the layout's content placeholders cloned onto it.
    pub(crate) fn new(slide_id: u32, layout: &SlideLayout) -> Self {
        let shapes = layout
            .slide_placeholders()
            .cloned()
            .map(MutableShape::new_placeholder)
            .collect();

        Self {
            slide_id,
            layout_partname: layout.partname.clone(),
            layout_name: layout.name.clone(),
            shapes,
            background: None,
            notes: None,
        }
    }

    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    /// Put `title` into the title placeholder. Returns `false` when the
    /// layout has none.
    pub fn set_title(&mut self, title: &str) -> bool {
        match self
            .shapes
            .iter_mut()
            .find(|s| s.placeholder().is_some_and(|p| p.ph_type.is_title()))
        {
            Some(shape) => shape.set_text(title),
            None => false,
        }
    }

    pub fn has_title(&self) -> bool {
        self.shapes
            .iter()
            .any(|s| s.placeholder().is_some_and(|p| p.ph_type.is_title()))
    }

    /// Number of placeholders on the slide (the title included).
    pub fn placeholder_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| s.placeholder().is_some())
            .count()
    }

    /// Add a text box; returns its shape index.
    pub fn add_text_box(&mut self, text: &str, x: i64, y: i64, width: i64, height: i64) -> usize {
        self.shapes
            .push(MutableShape::new_text_box(text, x, y, width, height));
        self.shapes.len() - 1
    }

    /// Add a picture from encoded image bytes; returns its shape index.
    ///
    /// Without an explicit `height` the picture keeps its aspect ratio at
    /// `width`.
    pub fn add_picture(
        &mut self,
        data: Bytes,
        x: i64,
        y: i64,
        width: i64,
        height: Option<i64>,
    ) -> Result<usize> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| DeckError::InvalidFormat("Unknown image format".to_string()))?;

        let height = match height {
            Some(height) => height,
            None => {
                let (px_w, px_h) = ImageReader::new(Cursor::new(&data[..]))
                    .with_guessed_format()?
                    .into_dimensions()?;
                scaled_height(px_w, px_h, width)
            },
        };

        self.shapes
            .push(MutableShape::new_picture(data, format, x, y, width, height));
        Ok(self.shapes.len() - 1)
    }

    /// Add a chart graphic frame; returns its shape index.
    pub fn add_chart(
        &mut self,
        kind: ChartKind,
        data: ChartData,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> usize {
        self.shapes
            .push(MutableShape::new_chart(kind, data, x, y, width, height));
        self.shapes.len() - 1
    }

    /// Move a shape behind every other shape.
    pub fn send_to_back(&mut self, index: usize) {
        if index < self.shapes.len() {
            let shape = self.shapes.remove(index);
            self.shapes.insert(0, shape);
        }
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut MutableShape> {
        self.shapes.get_mut(index)
    }

    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    #[inline]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn set_background(&mut self, background: SlideBackground) {
        self.background = Some(background);
    }

    pub fn background(&self) -> Option<&SlideBackground> {
        self.background.as_ref()
    }

    /// Set speaker notes for the slide.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Generate slide XML content with relationship IDs from the mapper.
    pub(crate) fn to_xml(&self, slide_index: usize, rel_mapper: &RelationshipMapper) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        xml.push_str("<p:cSld>");

        if let Some(ref background) = self.background {
            xml.push_str(&background.to_xml());
        }

        xml.push_str("<p:spTree>");

        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        // IDs: 1 = group, shapes from 2 in z-order
        for (shape_index, shape) in self.shapes.iter().enumerate() {
            let rel_id = rel_mapper
                .get_image_id(slide_index, shape_index)
                .or_else(|| rel_mapper.get_chart_id(slide_index, shape_index));
            shape.to_xml(&mut xml, shape_index as u32 + 2, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::pptx::layout::{Placeholder, PlaceholderType};

    fn layout(types: &[(PlaceholderType, u32)]) -> SlideLayout {
        SlideLayout {
            partname: PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap(),
            name: "Test".to_string(),
            placeholders: types
                .iter()
                .map(|&(ph_type, idx)| Placeholder {
                    ph_type,
                    idx,
                    vertical: false,
                    size: None,
                    name: format!("Placeholder {}", idx),
                })
                .collect(),
        }
    }

    fn png(width: u32, height: u32) -> Bytes {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[test]
    fn test_footers_not_cloned() {
        let slide = MutableSlide::new(
            256,
            &layout(&[
                (PlaceholderType::Title, 0),
                (PlaceholderType::Object, 1),
                (PlaceholderType::Date, 10),
                (PlaceholderType::SlideNumber, 12),
            ]),
        );
        assert_eq!(slide.placeholder_count(), 2);
        assert!(slide.has_title());
    }

    #[test]
    fn test_set_title_without_title_placeholder() {
        let mut slide = MutableSlide::new(256, &layout(&[]));
        assert!(!slide.set_title("Nothing"));
        assert_eq!(slide.placeholder_count(), 0);
    }

    #[test]
    fn test_picture_height_from_aspect_ratio() {
        let mut slide = MutableSlide::new(256, &layout(&[]));
        let index = slide.add_picture(png(40, 20), 0, 0, 2_743_200, None).unwrap();
        let xml = slide.to_xml(0, &RelationshipMapper::new()).unwrap();
        assert_eq!(index, 0);
        assert!(xml.contains(r#"<a:ext cx="2743200" cy="1371600"/>"#));
    }

    #[test]
    fn test_rejects_unknown_image() {
        let mut slide = MutableSlide::new(256, &layout(&[]));
        let result = slide.add_picture(Bytes::from_static(b"not an image"), 0, 0, 10, None);
        assert!(matches!(result, Err(DeckError::InvalidFormat(_))));
    }

    #[test]
    fn test_send_to_back_and_ids() {
        let mut slide = MutableSlide::new(256, &layout(&[(PlaceholderType::Title, 0)]));
        slide.set_title("Hello");
        let pic = slide.add_picture(png(4, 3), 0, 0, 100, Some(75)).unwrap();
        slide.send_to_back(pic);
        slide.set_background(SlideBackground::solid(RGBColor::new(0x32, 0x32, 0x32)));

        let mut mapper = RelationshipMapper::new();
        mapper.add_image(0, 0, "rId2".to_string());
        let xml = slide.to_xml(0, &mapper).unwrap();

        let pic_pos = xml.find("<p:pic>").unwrap();
        let title_pos = xml.find("<a:t>Hello</a:t>").unwrap();
        assert!(pic_pos < title_pos);
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Picture 1"/>"#));
        assert!(xml.find("<p:bg>").unwrap() < xml.find("<p:spTree>").unwrap());
    }
}
