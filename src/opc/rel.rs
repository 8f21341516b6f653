use crate::common::escape_xml;
use crate::opc::constants::target_mode;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
/// Relationships between parts of an OPC package.
///
/// Every part (and the package itself) owns a `Relationships` collection that is
/// serialized to the matching `_rels/*.rels` member.
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    r_id: String,
    reltype: String,
    target_ref: String,
    base_uri: String,
    is_external: bool,
}

impl Relationship {
    pub fn new(
        r_id: String,
        reltype: String,
        target_ref: String,
        base_uri: String,
        is_external: bool,
    ) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            base_uri,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Target reference as written in the `.rels` file.
    ///
    /// Relative to the source part's directory for internal relationships,
    /// an absolute URL for external ones.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }

    /// Absolute target partname of an internal relationship.
    pub fn target_partname(&self) -> Result<PackURI> {
        if self.is_external {
            return Err(OpcError::InvalidRelationship(
                "Cannot get target_partname for external relationship".to_string(),
            ));
        }
        PackURI::from_rel_ref(&self.base_uri, &self.target_ref)
    }
}

/// Collection of relationships from a single source, kept in insertion order.
#[derive(Debug, Clone)]
pub struct Relationships {
    base_uri: String,
    rels: SmallVec<[Relationship; 8]>,
}

impl Relationships {
    /// Create an empty collection whose relative targets resolve against `base_uri`.
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: SmallVec::new(),
        }
    }

    /// Parse the XML of a `.rels` member.
    pub fn from_xml(xml: &[u8], base_uri: &str) -> Result<Self> {
        let mut rels = Self::new(base_uri.to_string());
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"Relationship" {
                        let mut r_id = None;
                        let mut reltype = None;
                        let mut target_ref = None;
                        let mut is_external = false;

                        for attr in e.attributes() {
                            let attr = attr?;
                            match attr.key.as_ref() {
                                b"Id" => r_id = Some(attr.unescape_value()?.to_string()),
                                b"Type" => reltype = Some(attr.unescape_value()?.to_string()),
                                b"Target" => target_ref = Some(attr.unescape_value()?.to_string()),
                                b"TargetMode" => {
                                    is_external =
                                        attr.unescape_value()?.as_ref() == target_mode::EXTERNAL
                                },
                                _ => {},
                            }
                        }

                        if let (Some(id), Some(rt), Some(tr)) = (r_id, reltype, target_ref) {
                            rels.add_relationship(rt, tr, id, is_external);
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OpcError::XmlError(format!("Rels parse error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Add a relationship with an explicit rId, replacing any existing one with that rId.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) -> &Relationship {
        self.rels.retain(|rel| rel.r_id != r_id);
        self.rels.push(Relationship::new(
            r_id,
            reltype,
            target_ref,
            self.base_uri.clone(),
            is_external,
        ));
        &self.rels[self.rels.len() - 1]
    }

    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// Get or add an internal relationship, returning its rId.
    ///
    /// An existing relationship of the same type and target is reused.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        if let Some(rel) = self
            .rels
            .iter()
            .find(|rel| rel.reltype == reltype && rel.target_ref == target_ref && !rel.is_external)
        {
            return rel.r_id.clone();
        }

        let r_id = self.next_r_id();
        self.add_relationship(
            reltype.to_string(),
            target_ref.to_string(),
            r_id.clone(),
            false,
        );
        r_id
    }

    /// Lowest unused `rIdN`, filling gaps first.
    pub fn next_r_id(&self) -> String {
        let mut used_numbers: Vec<u32> = self
            .rels
            .iter()
            .filter_map(|rel| r_id_number(&rel.r_id))
            .collect();
        used_numbers.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    /// The single relationship of `reltype`.
    ///
    /// Errors when there is none, or more than one.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        let mut matching = self.iter_by_reltype(reltype);
        match (matching.next(), matching.next()) {
            (Some(rel), None) => Ok(rel),
            (None, _) => Err(OpcError::RelationshipNotFound(format!(
                "No relationship of type '{}'",
                reltype
            ))),
            (Some(_), Some(_)) => Err(OpcError::InvalidRelationship(format!(
                "Multiple relationships of type '{}'",
                reltype
            ))),
        }
    }

    pub fn iter_by_reltype<'a, 'b>(
        &'a self,
        reltype: &'b str,
    ) -> impl Iterator<Item = &'a Relationship> + use<'a, 'b> {
        self.rels.iter().filter(move |rel| rel.reltype == reltype)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    pub fn remove(&mut self, r_id: &str) -> Option<Relationship> {
        let pos = self.rels.iter().position(|rel| rel.r_id == r_id)?;
        Some(self.rels.remove(pos))
    }

    /// Serialize to the XML of a `.rels` member, ordered by rId number.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let mut rels: Vec<&Relationship> = self.rels.iter().collect();
        rels.sort_by_key(|rel| (r_id_number(&rel.r_id).unwrap_or(u32::MAX), rel.r_id.clone()));

        for rel in rels {
            let target_mode = if rel.is_external {
                r#" TargetMode="External""#
            } else {
                ""
            };

            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"{}/>"#,
                escape_xml(&rel.r_id),
                escape_xml(&rel.reltype),
                escape_xml(&rel.target_ref),
                target_mode
            ));
        }

        xml.push_str("</Relationships>");

        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

/// Numeric part of an `rIdN` identifier.
pub(crate) fn r_id_number(r_id: &str) -> Option<u32> {
    let digits = r_id.strip_prefix("rId")?;
    atoi_simd::parse::<u32, false, false>(digits.as_bytes()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert_eq!(rels.next_r_id(), "rId1");

        rels.add_relationship("t".into(), "a.xml".into(), "rId1".into(), false);
        rels.add_relationship("t".into(), "c.xml".into(), "rId3".into(), false);
        assert_eq!(rels.next_r_id(), "rId2");
    }

    #[test]
    fn test_get_or_add_reuses() {
        let mut rels = Relationships::new("/ppt/slides".to_string());

        assert_eq!(rels.get_or_add("image", "../media/image1.png"), "rId1");
        assert_eq!(rels.get_or_add("image", "../media/image1.png"), "rId1");
        assert_eq!(rels.get_or_add("image", "../media/image2.png"), "rId2");
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_target_partname() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        let r_id = rels.get_or_add("layout", "../slideLayouts/slideLayout7.xml");
        let rel = rels.get(&r_id).unwrap();
        assert_eq!(
            rel.target_partname().unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout7.xml"
        );
    }

    #[test]
    fn test_xml_round_trip_orders_numerically() {
        let mut rels = Relationships::new("/ppt".to_string());
        for n in [10, 2, 1] {
            rels.add_relationship(
                "t".into(),
                format!("slides/slide{}.xml", n),
                format!("rId{}", n),
                false,
            );
        }
        rels.add_relationship("h".into(), "https://a.b/?x=1&y=2".into(), "rId3".into(), true);

        let xml = rels.to_xml();
        let first = xml.find(r#"Id="rId1""#).unwrap();
        let second = xml.find(r#"Id="rId2""#).unwrap();
        let tenth = xml.find(r#"Id="rId10""#).unwrap();
        assert!(first < second && second < tenth);
        assert!(xml.contains("x=1&amp;y=2"));

        let parsed = Relationships::from_xml(xml.as_bytes(), "/ppt").unwrap();
        assert_eq!(parsed.len(), 4);
        assert!(parsed.get("rId3").unwrap().is_external());
        assert_eq!(parsed.get("rId3").unwrap().target_ref(), "https://a.b/?x=1&y=2");
    }

    #[test]
    fn test_part_with_reltype() {
        let mut rels = Relationships::default();
        rels.get_or_add("doc", "ppt/presentation.xml");
        assert!(rels.part_with_reltype("doc").is_ok());
        assert!(rels.part_with_reltype("other").is_err());
        rels.get_or_add("doc", "ppt/other.xml");
        assert!(rels.part_with_reltype("doc").is_err());
    }
}
