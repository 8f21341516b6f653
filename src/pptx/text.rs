/// Text frames written into shapes and placeholders.
use crate::common::escape_xml;
use crate::common::unit::pt_to_centipoints;
use crate::error::Result;
use crate::pptx::format::TextFormat;
use std::fmt::Write as FmtWrite;

/// A run of uniformly formatted text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub format: TextFormat,
}

/// A paragraph; an empty paragraph keeps a blank line in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

/// The paragraphs of a `p:txBody`.
///
/// # Examples
///
/// ```rust
/// use slidecraft::pptx::{TextFormat, TextFrame};
///
/// let mut frame = TextFrame::default();
/// frame.set_text("Intro\n\nAuthor: Ada");
/// assert_eq!(frame.paragraphs().len(), 3);
/// assert!(frame.paragraphs()[1].runs.is_empty());
///
/// frame.apply_format(&TextFormat { size: Some(24.0), ..Default::default() });
/// assert_eq!(frame.text(), "Intro\n\nAuthor: Ada");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    pub fn new(text: &str) -> Self {
        let mut frame = Self::default();
        frame.set_text(text);
        frame
    }

    /// Replace the content, one paragraph per line.
    pub fn set_text(&mut self, text: &str) {
        self.paragraphs = text
            .split('\n')
            .map(|line| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                let runs = if line.is_empty() {
                    Vec::new()
                } else {
                    vec![TextRun {
                        text: line.to_string(),
                        format: TextFormat::default(),
                    }]
                };
                Paragraph { runs }
            })
            .collect();
    }

    pub fn text(&self) -> String {
        let lines: Vec<String> = self
            .paragraphs
            .iter()
            .map(|p| p.runs.iter().map(|r| r.text.as_str()).collect())
            .collect();
        lines.join("\n")
    }

    #[inline]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.runs.is_empty())
    }

    /// Merge `format` into every run; unset fields leave the run as is.
    pub fn apply_format(&mut self, format: &TextFormat) {
        for run in self.paragraphs.iter_mut().flat_map(|p| p.runs.iter_mut()) {
            if let Some(ref font) = format.font {
                run.format.font = Some(font.clone());
            }
            if let Some(size) = format.size {
                run.format.size = Some(size);
            }
            if let Some(color) = format.color {
                run.format.color = Some(color);
            }
        }
    }

    /// Write the paragraphs (the part of `p:txBody` after `a:lstStyle`).
    pub(crate) fn write_paragraphs(&self, xml: &mut String) -> Result<()> {
        if self.paragraphs.is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
            return Ok(());
        }

        for paragraph in &self.paragraphs {
            xml.push_str("<a:p>");
            if paragraph.runs.is_empty() {
                xml.push_str(r#"<a:endParaRPr lang="en-US" dirty="0"/>"#);
            }
            for run in &paragraph.runs {
                // A vertical tab is a line break inside the paragraph
                for (i, segment) in run.text.split(VERTICAL_TAB).enumerate() {
                    if i > 0 {
                        xml.push_str("<a:br>");
                        write_run_properties(xml, &run.format)?;
                        xml.push_str("</a:br>");
                    }
                    if segment.is_empty() {
                        continue;
                    }
                    xml.push_str("<a:r>");
                    write_run_properties(xml, &run.format)?;
                    write!(xml, "<a:t>{}</a:t>", escape_text(segment))?;
                    xml.push_str("</a:r>");
                }
            }
            xml.push_str("</a:p>");
        }

        Ok(())
    }
}

const VERTICAL_TAB: char = '\u{b}';

/// Escape run text. Characters XML 1.0 cannot carry are written as
/// `_xHHHH_`, the escape Office uses for them.
fn escape_text(text: &str) -> String {
    let escaped = escape_xml(text);
    if !escaped.chars().any(is_restricted_char) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 16);
    for c in escaped.chars() {
        if is_restricted_char(c) {
            // Writing to a String cannot fail
            let _ = write!(out, "_x{:04X}_", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

#[inline]
fn is_restricted_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}')
}

/// `a:rPr`: size attribute, then fill, then the latin font (schema order).
fn write_run_properties(xml: &mut String, format: &TextFormat) -> Result<()> {
    xml.push_str(r#"<a:rPr lang="en-US""#);
    if let Some(size) = format.size {
        write!(xml, r#" sz="{}""#, pt_to_centipoints(size))?;
    }
    xml.push_str(r#" dirty="0""#);

    if format.color.is_none() && format.font.is_none() {
        xml.push_str("/>");
        return Ok(());
    }

    xml.push('>');
    if let Some(color) = format.color {
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            color.to_hex()
        )?;
    }
    if let Some(ref font) = format.font {
        write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(font))?;
    }
    xml.push_str("</a:rPr>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;

    fn render(frame: &TextFrame) -> String {
        let mut xml = String::new();
        frame.write_paragraphs(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_lines_become_paragraphs() {
        let frame = TextFrame::new("one\r\ntwo\n\nfour");
        assert_eq!(frame.paragraphs().len(), 4);
        assert_eq!(frame.text(), "one\ntwo\n\nfour");
        assert!(!frame.is_empty());
        assert!(TextFrame::new("").is_empty());
    }

    #[test]
    fn test_run_property_order() {
        let mut frame = TextFrame::new("Hi & bye");
        frame.apply_format(&TextFormat {
            font: Some("Calibri".to_string()),
            size: Some(24.0),
            color: Some(RGBColor::new(0xFF, 0xFF, 0xFF)),
        });
        assert_eq!(
            render(&frame),
            r#"<a:p><a:r><a:rPr lang="en-US" sz="2400" dirty="0"><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill><a:latin typeface="Calibri"/></a:rPr><a:t>Hi &amp; bye</a:t></a:r></a:p>"#
        );
    }

    #[test]
    fn test_control_characters() {
        let xml = render(&TextFrame::new("one\u{b}two\u{1}end"));
        assert_eq!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>one</a:t></a:r><a:br><a:rPr lang="en-US" dirty="0"/></a:br><a:r><a:rPr lang="en-US" dirty="0"/><a:t>two_x0001_end</a:t></a:r></a:p>"#
        );

        let xml = render(&TextFrame::new("a\tb\u{0}\u{1f}"));
        assert!(xml.contains("<a:t>a\tb_x0000__x001F_</a:t>"));
    }

    #[test]
    fn test_partial_format_merge() {
        let mut frame = TextFrame::new("a\nb");
        frame.apply_format(&TextFormat {
            size: Some(18.0),
            ..Default::default()
        });
        frame.apply_format(&TextFormat {
            font: Some("Arial".to_string()),
            ..Default::default()
        });
        for run in frame.paragraphs().iter().flat_map(|p| p.runs.iter()) {
            assert_eq!(run.format.size, Some(18.0));
            assert_eq!(run.format.font.as_deref(), Some("Arial"));
            assert_eq!(run.format.color, None);
        }
    }

    #[test]
    fn test_blank_line_keeps_paragraph() {
        let xml = render(&TextFrame::new("x\n"));
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains("<a:endParaRPr"));
    }
}
