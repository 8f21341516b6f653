/// Shape types and implementation for PPTX slides.
use crate::common::escape_xml;
use crate::error::Result;
use crate::pptx::chart::{ChartData, ChartKind};
use crate::pptx::format::{ImageFormat, TextFormat};
use crate::pptx::layout::Placeholder;
use crate::pptx::text::TextFrame;
use bytes::Bytes;
use std::fmt::Write as FmtWrite;

/// A shape on a slide (placeholder, text box, picture or chart).
#[derive(Debug, Clone)]
pub struct MutableShape {
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    /// Placeholder inherited from the slide layout; position comes from the layout
    Placeholder {
        placeholder: Placeholder,
        text: Option<TextFrame>,
    },
    TextBox {
        text: TextFrame,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },
    Picture {
        data: Bytes,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },
    Chart {
        kind: ChartKind,
        data: ChartData,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },
}

impl MutableShape {
    pub(crate) fn new_placeholder(placeholder: Placeholder) -> Self {
        Self {
            shape_type: ShapeType::Placeholder {
                placeholder,
                text: None,
            },
        }
    }

    pub(crate) fn new_text_box(text: &str, x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            shape_type: ShapeType::TextBox {
                text: TextFrame::new(text),
                x,
                y,
                width,
                height,
            },
        }
    }

    pub(crate) fn new_picture(
        data: Bytes,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Self {
        Self {
            shape_type: ShapeType::Picture {
                data,
                format,
                x,
                y,
                width,
                height,
            },
        }
    }

    pub(crate) fn new_chart(
        kind: ChartKind,
        data: ChartData,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Self {
        Self {
            shape_type: ShapeType::Chart {
                kind,
                data,
                x,
                y,
                width,
                height,
            },
        }
    }

    /// The layout placeholder this shape fills, if any.
    pub fn placeholder(&self) -> Option<&Placeholder> {
        match &self.shape_type {
            ShapeType::Placeholder { placeholder, .. } => Some(placeholder),
            _ => None,
        }
    }

    /// Whether the shape can hold text.
    pub fn accepts_text(&self) -> bool {
        match &self.shape_type {
            ShapeType::Placeholder { placeholder, .. } => placeholder.ph_type.accepts_text(),
            ShapeType::TextBox { .. } => true,
            _ => false,
        }
    }

    /// Replace the shape's text. Returns `false` when the shape takes no text.
    pub fn set_text(&mut self, value: &str) -> bool {
        match &mut self.shape_type {
            ShapeType::Placeholder { placeholder, text } if placeholder.ph_type.accepts_text() => {
                *text = Some(TextFrame::new(value));
                true
            },
            ShapeType::TextBox { text, .. } => {
                text.set_text(value);
                true
            },
            _ => false,
        }
    }

    pub fn text_frame(&self) -> Option<&TextFrame> {
        match &self.shape_type {
            ShapeType::Placeholder { text, .. } => text.as_ref(),
            ShapeType::TextBox { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Apply character formatting to every run currently in the shape.
    pub fn apply_text_format(&mut self, format: &TextFormat) {
        match &mut self.shape_type {
            ShapeType::Placeholder {
                text: Some(text), ..
            }
            | ShapeType::TextBox { text, .. } => text.apply_format(format),
            _ => {},
        }
    }

    pub(crate) fn image_data(&self) -> Option<(&Bytes, ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data, *format)),
            _ => None,
        }
    }

    pub(crate) fn chart(&self) -> Option<(ChartKind, &ChartData)> {
        match &self.shape_type {
            ShapeType::Chart { kind, data, .. } => Some((*kind, data)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// `rel_id` is the image or chart relationship of pictures and graphic frames.
    pub(crate) fn to_xml(&self, xml: &mut String, shape_id: u32, rel_id: Option<&str>) -> Result<()> {
        match &self.shape_type {
            ShapeType::Placeholder { placeholder, text } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="{}"/>"#,
                    shape_id,
                    escape_xml(&placeholder.name)
                )?;
                xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
                write!(xml, "<p:nvPr>{}</p:nvPr>", placeholder.ph_xml())?;
                xml.push_str("</p:nvSpPr>");
                xml.push_str("<p:spPr/>");

                if placeholder.ph_type.accepts_text() {
                    xml.push_str("<p:txBody>");
                    xml.push_str("<a:bodyPr/>");
                    xml.push_str("<a:lstStyle/>");
                    match text {
                        Some(text) => text.write_paragraphs(xml)?,
                        None => xml.push_str("<a:p/>"),
                    }
                    xml.push_str("</p:txBody>");
                }

                xml.push_str("</p:sp>");
            },
            ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    shape_id,
                    shape_id - 1
                )?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0">"#);
                xml.push_str("<a:spAutoFit/>");
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                text.write_paragraphs(xml)?;
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                x,
                y,
                width,
                height,
                ..
            } => {
                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}"/>"#,
                    shape_id,
                    shape_id - 1
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rel_id.unwrap_or_default())?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
            ShapeType::Chart {
                x,
                y,
                width,
                height,
                ..
            } => {
                xml.push_str("<p:graphicFrame>");
                xml.push_str("<p:nvGraphicFramePr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Chart {}"/>"#,
                    shape_id,
                    shape_id - 1
                )?;
                xml.push_str(
                    r#"<p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr>"#,
                );
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvGraphicFramePr>");

                write!(
                    xml,
                    r#"<p:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></p:xfrm>"#,
                    x, y, width, height
                )?;

                xml.push_str("<a:graphic>");
                xml.push_str(
                    r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart">"#,
                );
                write!(
                    xml,
                    r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" r:id="{}"/>"#,
                    rel_id.unwrap_or_default()
                )?;
                xml.push_str("</a:graphicData>");
                xml.push_str("</a:graphic>");
                xml.push_str("</p:graphicFrame>");
            },
        }

        Ok(())
    }
}

fn write_xfrm(xml: &mut String, x: i64, y: i64, width: i64, height: i64) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
    xml.push_str("</a:xfrm>");
    Ok(())
}
