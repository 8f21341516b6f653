//! Slide layouts and their placeholders.
//!
//! Layouts are read from the slide master's `p:sldLayoutIdLst` in document
//! order, so index 0 is the master's first layout ("Title Slide" in the
//! standard set).

use crate::error::{DeckError, Result};
use crate::opc::{OpcPackage, PackURI};
use phf::phf_map;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Placeholder kinds as written in `p:ph/@type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderType {
    Title,
    CenterTitle,
    SubTitle,
    Body,
    Object,
    Chart,
    Table,
    ClipArt,
    Diagram,
    Media,
    Picture,
    SlideImage,
    Date,
    Footer,
    SlideNumber,
    Header,
}

static PLACEHOLDER_TYPES: phf::Map<&'static str, PlaceholderType> = phf_map! {
    "title" => PlaceholderType::Title,
    "ctrTitle" => PlaceholderType::CenterTitle,
    "subTitle" => PlaceholderType::SubTitle,
    "body" => PlaceholderType::Body,
    "obj" => PlaceholderType::Object,
    "chart" => PlaceholderType::Chart,
    "tbl" => PlaceholderType::Table,
    "clipArt" => PlaceholderType::ClipArt,
    "dgm" => PlaceholderType::Diagram,
    "media" => PlaceholderType::Media,
    "pic" => PlaceholderType::Picture,
    "sldImg" => PlaceholderType::SlideImage,
    "dt" => PlaceholderType::Date,
    "ftr" => PlaceholderType::Footer,
    "sldNum" => PlaceholderType::SlideNumber,
    "hdr" => PlaceholderType::Header,
};

impl PlaceholderType {
    /// Parse a `p:ph/@type` value. A missing attribute means `obj`.
    pub fn from_xml_value(value: &str) -> Option<Self> {
        PLACEHOLDER_TYPES.get(value).copied()
    }

    pub fn as_xml_value(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::CenterTitle => "ctrTitle",
            Self::SubTitle => "subTitle",
            Self::Body => "body",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::Diagram => "dgm",
            Self::Media => "media",
            Self::Picture => "pic",
            Self::SlideImage => "sldImg",
            Self::Date => "dt",
            Self::Footer => "ftr",
            Self::SlideNumber => "sldNum",
            Self::Header => "hdr",
        }
    }

    #[inline]
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    /// Whether a slide placeholder of this kind carries a text frame.
    #[inline]
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::SubTitle | Self::Body | Self::Object
        )
    }

    /// Date, footer and slide number placeholders stay on the layout.
    #[inline]
    pub fn is_layout_only(&self) -> bool {
        matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }
}

/// A placeholder declared on a slide layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub ph_type: PlaceholderType,
    pub idx: u32,
    /// `orient="vert"`
    pub vertical: bool,
    /// `sz` attribute (`half`, `quarter`), kept verbatim
    pub size: Option<String>,
    /// Shape name on the layout, e.g. "Title 1"
    pub name: String,
}

impl Placeholder {
    /// The `p:ph` element for a slide shape inheriting from this placeholder.
    ///
    /// Default attribute values are omitted the way PowerPoint writes them.
    pub fn ph_xml(&self) -> String {
        let mut xml = String::from("<p:ph");
        if self.ph_type != PlaceholderType::Object {
            xml.push_str(" type=\"");
            xml.push_str(self.ph_type.as_xml_value());
            xml.push('"');
        }
        if self.vertical {
            xml.push_str(" orient=\"vert\"");
        }
        if let Some(size) = &self.size {
            xml.push_str(" sz=\"");
            xml.push_str(size);
            xml.push('"');
        }
        if self.idx != 0 {
            xml.push_str(&format!(" idx=\"{}\"", self.idx));
        }
        xml.push_str("/>");
        xml
    }
}

/// A slide layout part.
#[derive(Debug, Clone)]
pub struct SlideLayout {
    pub partname: PackURI,
    /// `p:cSld/@name`
    pub name: String,
    pub placeholders: Vec<Placeholder>,
}

impl SlideLayout {
    /// Parse a `p:sldLayout` part.
    pub fn parse(partname: PackURI, xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut name = String::new();
        let mut placeholders = Vec::new();
        // Nesting depth inside a top-level sp/pic/graphicFrame
        let mut shape_depth = 0usize;
        let mut shape_name = String::new();
        let mut shape_ph: Option<Placeholder> = None;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                    b"cSld" => {
                        if let Some(value) = attr_value(e, b"name")? {
                            name = value;
                        }
                    },
                    b"sp" | b"pic" | b"graphicFrame" => {
                        if shape_depth == 0 {
                            shape_name.clear();
                            shape_ph = None;
                        }
                        shape_depth += 1;
                    },
                    b"cNvPr" if shape_depth == 1 => {
                        shape_name = attr_value(e, b"name")?.unwrap_or_default();
                    },
                    b"ph" if shape_depth > 0 => shape_ph = Some(parse_ph(e)?),
                    _ => {},
                },
                Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                    b"cNvPr" if shape_depth == 1 => {
                        shape_name = attr_value(e, b"name")?.unwrap_or_default();
                    },
                    b"ph" if shape_depth > 0 => shape_ph = Some(parse_ph(e)?),
                    _ => {},
                },
                Ok(Event::End(ref e)) => {
                    if matches!(e.local_name().as_ref(), b"sp" | b"pic" | b"graphicFrame")
                        && shape_depth > 0
                    {
                        shape_depth -= 1;
                        if shape_depth == 0
                            && let Some(mut ph) = shape_ph.take()
                        {
                            ph.name = std::mem::take(&mut shape_name);
                            placeholders.push(ph);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(DeckError::Xml(format!(
                        "Failed to parse layout {}: {}",
                        partname, e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(Self {
            partname,
            name,
            placeholders,
        })
    }

    /// The first title-like placeholder.
    pub fn title_placeholder(&self) -> Option<&Placeholder> {
        self.placeholders.iter().find(|ph| ph.ph_type.is_title())
    }

    /// Placeholders that are copied onto a new slide.
    pub fn slide_placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.placeholders
            .iter()
            .filter(|ph| !ph.ph_type.is_layout_only())
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn parse_ph(e: &BytesStart<'_>) -> Result<Placeholder> {
    let mut ph = Placeholder {
        ph_type: PlaceholderType::Object,
        idx: 0,
        vertical: false,
        size: None,
        name: String::new(),
    };
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"type" => {
                ph.ph_type = PlaceholderType::from_xml_value(&value).ok_or_else(|| {
                    DeckError::InvalidFormat(format!("Unknown placeholder type '{}'", value))
                })?;
            },
            b"idx" => {
                ph.idx = atoi_simd::parse::<u32, false, false>(value.as_bytes()).map_err(|_| {
                    DeckError::InvalidFormat(format!("Invalid placeholder idx '{}'", value))
                })?;
            },
            b"orient" => ph.vertical = value == "vert",
            b"sz" => ph.size = Some(value.into_owned()),
            _ => {},
        }
    }
    Ok(ph)
}

/// Relationship ids listed in a master's `p:sldLayoutIdLst`, in order.
fn layout_r_ids(master_xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(master_xml);
    reader.config_mut().trim_text(true);

    let mut r_ids = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldLayoutId" =>
            {
                for attr in e.attributes() {
                    let attr = attr?;
                    // r:id, as opposed to the numeric id attribute
                    if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
                        r_ids.push(attr.unescape_value()?.to_string());
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(DeckError::Xml(format!("Failed to parse slide master: {}", e))),
            _ => {},
        }
        buf.clear();
    }
    Ok(r_ids)
}

/// All layouts of one slide master, in master order.
#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    layouts: Vec<SlideLayout>,
}

impl LayoutCatalog {
    /// Load the layouts of the slide master at `master_partname`.
    pub fn from_package(package: &OpcPackage, master_partname: &PackURI) -> Result<Self> {
        let master = package.part(master_partname)?;
        let mut layouts = Vec::new();

        for r_id in layout_r_ids(master.blob())? {
            let partname = master.related_partname(&r_id)?;
            let part = package.part(&partname)?;
            layouts.push(SlideLayout::parse(partname, part.blob())?);
        }

        Ok(Self { layouts })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&SlideLayout> {
        self.layouts.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlideLayout> {
        self.layouts.iter()
    }

    /// Pick `requested`, else `fallback`, else the first layout.
    ///
    /// Returns `None` only when the master has no layouts at all.
    pub fn resolve(&self, requested: usize, fallback: usize) -> Option<usize> {
        if requested < self.layouts.len() {
            return Some(requested);
        }
        let resolved = if fallback < self.layouts.len() {
            fallback
        } else if !self.layouts.is_empty() {
            0
        } else {
            return None;
        };
        log::warn!(
            "Layout index {} out of range ({} layouts), using layout {}",
            requested,
            self.layouts.len(),
            resolved
        );
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="twoObj" preserve="1">
  <p:cSld name="Two Content">
    <p:spTree>
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph sz="half" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="4" name="Vertical 3"/><p:cNvSpPr/><p:nvPr><p:ph type="body" orient="vert" idx="2"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="5" name="Date Placeholder 4"/><p:cNvSpPr/><p:nvPr><p:ph type="dt" sz="half" idx="10"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="6" name="Decoration"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/></p:sp>
    </p:spTree>
  </p:cSld>
</p:sldLayout>"#;

    fn layout() -> SlideLayout {
        SlideLayout::parse(
            PackURI::new("/ppt/slideLayouts/slideLayout4.xml").unwrap(),
            TWO_CONTENT.as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_layout() {
        let layout = layout();
        assert_eq!(layout.name, "Two Content");
        assert_eq!(layout.placeholders.len(), 4);

        let content = &layout.placeholders[1];
        assert_eq!(content.ph_type, PlaceholderType::Object);
        assert_eq!(content.idx, 1);
        assert_eq!(content.size.as_deref(), Some("half"));
        assert_eq!(content.name, "Content Placeholder 2");

        let vertical = &layout.placeholders[2];
        assert!(vertical.vertical);
        assert_eq!(vertical.ph_type, PlaceholderType::Body);
        assert_eq!(vertical.idx, 2);
    }

    #[test]
    fn test_slide_placeholders_skip_footer_kinds() {
        let layout = layout();
        assert_eq!(layout.slide_placeholders().count(), 3);
        assert_eq!(layout.title_placeholder().unwrap().name, "Title 1");
    }

    #[test]
    fn test_ph_xml() {
        let layout = layout();
        assert_eq!(layout.placeholders[0].ph_xml(), r#"<p:ph type="title"/>"#);
        assert_eq!(layout.placeholders[1].ph_xml(), r#"<p:ph sz="half" idx="1"/>"#);
        assert_eq!(
            layout.placeholders[2].ph_xml(),
            r#"<p:ph type="body" orient="vert" idx="2"/>"#
        );
    }

    #[test]
    fn test_layout_r_ids_in_order() {
        let master = br#"<p:sldMaster xmlns:p="p" xmlns:r="r"><p:sldLayoutIdLst>
            <p:sldLayoutId id="2147483649" r:id="rId3"/>
            <p:sldLayoutId id="2147483650" r:id="rId1"/>
        </p:sldLayoutIdLst></p:sldMaster>"#;
        assert_eq!(layout_r_ids(master).unwrap(), vec!["rId3", "rId1"]);
    }

    #[test]
    fn test_resolve() {
        let catalog = LayoutCatalog {
            layouts: vec![layout(); 7],
        };
        assert_eq!(catalog.resolve(3, 6), Some(3));
        assert_eq!(catalog.resolve(8, 6), Some(6));
        assert_eq!(catalog.resolve(8, 9), Some(0));

        let empty = LayoutCatalog {
            layouts: Vec::new(),
        };
        assert_eq!(empty.resolve(0, 6), None);
    }
}
