/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml`. Reading collects the slide size,
/// the existing slide ids and the master/notes-master references; writing
/// splices new list entries into the original XML so everything else in a
/// template's presentation part survives untouched.
use crate::error::{DeckError, Result};
use crate::opc::Part;
use crate::opc::constants::{content_type as ct, namespace};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Write as FmtWrite;

/// Default slide size (10in x 7.5in) used when `p:sldSz` is absent.
pub const DEFAULT_SLIDE_WIDTH: i64 = 9_144_000;
pub const DEFAULT_SLIDE_HEIGHT: i64 = 6_858_000;

/// Lowest slide id PowerPoint accepts.
pub const MIN_SLIDE_ID: u32 = 256;

/// A `p:sldId` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideId {
    pub id: u32,
    pub r_id: String,
}

/// What the writer needs to know about an existing presentation part.
#[derive(Debug, Clone)]
pub struct PresentationPart {
    pub slide_width: i64,
    pub slide_height: i64,
    pub slide_ids: Vec<SlideId>,
    /// rIds of `p:sldMasterId` entries, in document order
    pub master_r_ids: Vec<String>,
    pub notes_master_r_id: Option<String>,
}

impl PresentationPart {
    /// Read a presentation part, checking its content type first.
    pub fn from_part(part: &Part) -> Result<Self> {
        let content_type = part.content_type();
        if content_type != ct::PML_PRESENTATION_MAIN && content_type != ct::PML_PRES_MACRO_MAIN {
            return Err(DeckError::InvalidContentType {
                expected: ct::PML_PRESENTATION_MAIN.to_string(),
                got: content_type.to_string(),
            });
        }
        Self::parse(part.blob())
    }

    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut pres = Self {
            slide_width: DEFAULT_SLIDE_WIDTH,
            slide_height: DEFAULT_SLIDE_HEIGHT,
            slide_ids: Vec::new(),
            master_r_ids: Vec::new(),
            notes_master_r_id: None,
        };

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    match e.local_name().as_ref() {
                        b"sldId" => {
                            let mut id = None;
                            let mut r_id = None;
                            for attr in e.attributes() {
                                let attr = attr?;
                                if attr.key.local_name().as_ref() != b"id" {
                                    continue;
                                }
                                let value = attr.unescape_value()?;
                                if attr.key.prefix().is_some() {
                                    r_id = Some(value.to_string());
                                } else {
                                    id = value.parse::<u32>().ok();
                                }
                            }
                            if let (Some(id), Some(r_id)) = (id, r_id) {
                                pres.slide_ids.push(SlideId { id, r_id });
                            }
                        },
                        b"sldMasterId" => {
                            if let Some(r_id) = prefixed_id(e)? {
                                pres.master_r_ids.push(r_id);
                            }
                        },
                        b"notesMasterId" => {
                            pres.notes_master_r_id = prefixed_id(e)?;
                        },
                        b"sldSz" => {
                            for attr in e.attributes() {
                                let attr = attr?;
                                let value = attr.unescape_value()?;
                                let parsed = value.parse::<i64>().map_err(|err| {
                                    DeckError::Xml(format!("Invalid slide size: {}", err))
                                });
                                match attr.key.as_ref() {
                                    b"cx" => pres.slide_width = parsed?,
                                    b"cy" => pres.slide_height = parsed?,
                                    _ => {},
                                }
                            }
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(DeckError::Xml(format!(
                        "Failed to parse presentation part: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(pres)
    }

    /// rId of the first slide master.
    pub fn first_master_r_id(&self) -> Result<&str> {
        self.master_r_ids
            .first()
            .map(String::as_str)
            .ok_or_else(|| DeckError::Template("presentation has no slide master".to_string()))
    }

    /// Next free slide id: one above the current maximum, never below 256.
    pub fn next_slide_id(&self) -> u32 {
        self.slide_ids
            .iter()
            .map(|s| s.id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID)
    }
}

fn prefixed_id(e: &quick_xml::events::BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

/// Byte offsets of the list elements new entries are spliced into, found by
/// local name so any namespace prefix binding works.
#[derive(Debug, Default)]
struct Landmarks {
    /// Prefix of the root element, `None` for a default namespace
    pml_prefix: Option<String>,
    /// Prefix bound to the office relationships namespace on the root
    rel_prefix: Option<String>,
    /// Just after the slide master list
    master_list_end: Option<usize>,
    /// Start of `</sldIdLst>`
    slide_list_close: Option<usize>,
    /// Span of an empty `<sldIdLst/>`
    slide_list_empty: Option<(usize, usize)>,
    /// Start of `sldSz`, else of `notesSz`
    slide_size: Option<usize>,
}

impl Landmarks {
    fn scan(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut marks = Self::default();
        let mut seen_root = false;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                DeckError::Xml(format!("Failed to parse presentation part: {}", e))
            })?;
            let after = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) | Event::Empty(ref e) if !seen_root => {
                    seen_root = true;
                    marks.pml_prefix = e
                        .name()
                        .prefix()
                        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
                    for attr in e.attributes() {
                        let attr = attr?;
                        if let Some(prefix) = attr.key.as_ref().strip_prefix(b"xmlns:")
                            && attr.value.as_ref() == namespace::OFC_RELATIONSHIPS.as_bytes()
                        {
                            marks.rel_prefix = Some(String::from_utf8_lossy(prefix).into_owned());
                        }
                    }
                },
                Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"sldMasterIdLst" => marks.master_list_end = Some(after),
                    b"sldIdLst" => marks.slide_list_empty = Some((before, after)),
                    b"sldSz" => marks.slide_size = Some(before),
                    b"notesSz" => {
                        marks.slide_size.get_or_insert(before);
                    },
                    _ => {},
                },
                Event::Start(ref e) if e.local_name().as_ref() == b"sldSz" => {
                    marks.slide_size = Some(before);
                },
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"sldMasterIdLst" => marks.master_list_end = Some(after),
                    b"sldIdLst" => marks.slide_list_close = Some(before),
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(marks)
    }

    /// Qualified PresentationML element name.
    fn pml(&self, local: &str) -> String {
        match &self.pml_prefix {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        }
    }

    /// Qualified `r:id` attribute, declaring the namespace inline when the
    /// root does not bind it.
    fn r_id_attr(&self, r_id: &str) -> String {
        match &self.rel_prefix {
            Some(prefix) => format!(r#"{}:id="{}""#, prefix, r_id),
            None => format!(
                r#"xmlns:r="{}" r:id="{}""#,
                namespace::OFC_RELATIONSHIPS,
                r_id
            ),
        }
    }
}

/// Append `p:sldId` entries to the slide id list, creating the list if needed.
pub fn append_slide_ids(xml: &str, entries: &[SlideId]) -> Result<String> {
    if entries.is_empty() {
        return Ok(xml.to_string());
    }

    let marks = Landmarks::scan(xml)?;
    let list = marks.pml("sldIdLst");
    let slide_id = marks.pml("sldId");

    let mut ids = String::with_capacity(entries.len() * 40);
    for entry in entries {
        write!(ids, r#"<{} id="{}" {}/>"#, slide_id, entry.id, marks.r_id_attr(&entry.r_id))?;
    }

    let mut out = String::with_capacity(xml.len() + ids.len() + 32);
    if let Some(pos) = marks.slide_list_close {
        out.push_str(&xml[..pos]);
        out.push_str(&ids);
        out.push_str(&xml[pos..]);
    } else if let Some((start, end)) = marks.slide_list_empty {
        out.push_str(&xml[..start]);
        write!(out, "<{list}>{ids}</{list}>")?;
        out.push_str(&xml[end..]);
    } else {
        // sldIdLst follows the master and notes master lists, before sldSz
        let pos = marks.slide_size.ok_or_else(|| {
            DeckError::Template("presentation part has no slide size".to_string())
        })?;
        out.push_str(&xml[..pos]);
        write!(out, "<{list}>{ids}</{list}>")?;
        out.push_str(&xml[pos..]);
    }

    Ok(out)
}

/// Insert a `p:notesMasterIdLst` right after the slide master list.
pub fn insert_notes_master_id(xml: &str, r_id: &str) -> Result<String> {
    let marks = Landmarks::scan(xml)?;
    let pos = marks.master_list_end.ok_or_else(|| {
        DeckError::Template("presentation part has no slide master list".to_string())
    })?;

    let list = marks.pml("notesMasterIdLst");
    let mut out = String::with_capacity(xml.len() + 96);
    out.push_str(&xml[..pos]);
    write!(
        out,
        "<{list}><{} {}/></{list}>",
        marks.pml("notesMasterId"),
        marks.r_id_attr(r_id)
    )?;
    out.push_str(&xml[pos..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::PackURI;
    use crate::pptx::template::PRESENTATION_XML;

    const WIDE: &str = r#"<p:presentation xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="rId4"/></p:notesMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="300" r:id="rId3"/></p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#;

    #[test]
    fn test_parse_blank() {
        let pres = PresentationPart::parse(PRESENTATION_XML.as_bytes()).unwrap();
        assert_eq!(pres.slide_width, 9_144_000);
        assert_eq!(pres.slide_height, 6_858_000);
        assert!(pres.slide_ids.is_empty());
        assert_eq!(pres.first_master_r_id().unwrap(), "rId1");
        assert_eq!(pres.notes_master_r_id, None);
        assert_eq!(pres.next_slide_id(), 256);
    }

    #[test]
    fn test_parse_existing_slides() {
        let pres = PresentationPart::parse(WIDE.as_bytes()).unwrap();
        assert_eq!(pres.slide_width, 12_192_000);
        assert_eq!(pres.slide_ids.len(), 2);
        assert_eq!(pres.slide_ids[1], SlideId { id: 300, r_id: "rId3".to_string() });
        assert_eq!(pres.notes_master_r_id.as_deref(), Some("rId4"));
        assert_eq!(pres.next_slide_id(), 301);
    }

    #[test]
    fn test_append_creates_list() {
        let xml = append_slide_ids(
            PRESENTATION_XML,
            &[SlideId { id: 256, r_id: "rId7".to_string() }],
        )
        .unwrap();
        assert!(xml.contains(
            r#"</p:sldMasterIdLst><p:sldIdLst><p:sldId id="256" r:id="rId7"/></p:sldIdLst><p:sldSz"#
        ));
        let reparsed = PresentationPart::parse(xml.as_bytes()).unwrap();
        assert_eq!(reparsed.slide_ids.len(), 1);
    }

    #[test]
    fn test_append_extends_list() {
        let xml = append_slide_ids(WIDE, &[SlideId { id: 301, r_id: "rId9".to_string() }]).unwrap();
        let pres = PresentationPart::parse(xml.as_bytes()).unwrap();
        let ids: Vec<u32> = pres.slide_ids.iter().map(|s| s.id).collect();
        assert_eq!(ids, [256, 300, 301]);
    }

    const OTHER_PREFIXES: &str = r#"<pml:presentation xmlns:rel="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:pml="http://schemas.openxmlformats.org/presentationml/2006/main"><pml:sldMasterIdLst><pml:sldMasterId id="2147483648" rel:id="rId1"/></pml:sldMasterIdLst><pml:sldIdLst><pml:sldId id="256" rel:id="rId2"/></pml:sldIdLst><pml:sldSz cx="9144000" cy="6858000"/></pml:presentation>"#;

    #[test]
    fn test_splice_with_other_prefixes() {
        let xml = append_slide_ids(
            OTHER_PREFIXES,
            &[SlideId { id: 257, r_id: "rId5".to_string() }],
        )
        .unwrap();
        assert!(xml.contains(r#"<pml:sldId id="257" rel:id="rId5"/></pml:sldIdLst>"#));

        let xml = insert_notes_master_id(&xml, "rId6").unwrap();
        assert!(xml.contains(
            r#"</pml:sldMasterIdLst><pml:notesMasterIdLst><pml:notesMasterId rel:id="rId6"/></pml:notesMasterIdLst>"#
        ));

        let pres = PresentationPart::parse(xml.as_bytes()).unwrap();
        let ids: Vec<u32> = pres.slide_ids.iter().map(|s| s.id).collect();
        assert_eq!(ids, [256, 257]);
        assert_eq!(pres.notes_master_r_id.as_deref(), Some("rId6"));
    }

    #[test]
    fn test_splice_default_namespace() {
        let xml = r#"<presentation xmlns="http://schemas.openxmlformats.org/presentationml/2006/main"><sldMasterIdLst/><sldIdLst/><sldSz cx="1" cy="1"/></presentation>"#;
        let xml = append_slide_ids(xml, &[SlideId { id: 256, r_id: "rId3".to_string() }]).unwrap();
        assert!(xml.contains(r#"<sldIdLst><sldId id="256" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId3"/></sldIdLst>"#));
        let pres = PresentationPart::parse(xml.as_bytes()).unwrap();
        assert_eq!(pres.slide_ids.len(), 1);
    }

    #[test]
    fn test_insert_notes_master() {
        let xml = insert_notes_master_id(PRESENTATION_XML, "rId9").unwrap();
        let pres = PresentationPart::parse(xml.as_bytes()).unwrap();
        assert_eq!(pres.notes_master_r_id.as_deref(), Some("rId9"));
    }

    #[test]
    fn test_rejects_non_presentation() {
        let part = Part::new(
            PackURI::new("/word/document.xml").unwrap(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            b"<w:document/>".to_vec(),
        );
        assert!(matches!(
            PresentationPart::from_part(&part),
            Err(DeckError::InvalidContentType { .. })
        ));
    }
}
