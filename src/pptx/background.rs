//! Slide background fills.
//!
//! Only solid fills are written; picture backgrounds are placed as full-slide
//! pictures at the back of the shape tree instead.

use crate::common::RGBColor;

/// Slide background configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideBackground {
    /// Solid color background
    Solid(RGBColor),
}

impl SlideBackground {
    /// Create a solid color background.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidecraft::common::RGBColor;
    /// use slidecraft::pptx::SlideBackground;
    ///
    /// let bg = SlideBackground::solid(RGBColor::new(0x32, 0x32, 0x32));
    /// assert!(bg.to_xml().contains(r#"<a:srgbClr val="323232"/>"#));
    /// ```
    pub fn solid(color: RGBColor) -> Self {
        SlideBackground::Solid(color)
    }

    /// The `<p:bg>` element, which must precede `<p:spTree>` inside `<p:cSld>`.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(128);

        match self {
            SlideBackground::Solid(color) => {
                xml.push_str("<p:bg>");
                xml.push_str("<p:bgPr>");
                xml.push_str("<a:solidFill>");
                xml.push_str("<a:srgbClr val=\"");
                xml.push_str(&color.to_hex());
                xml.push_str("\"/>");
                xml.push_str("</a:solidFill>");
                xml.push_str("<a:effectLst/>");
                xml.push_str("</p:bgPr>");
                xml.push_str("</p:bg>");
            },
        }

        xml
    }
}
