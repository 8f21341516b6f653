use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use crate::opc::rel::Relationships;
/// Parts of an OPC package.
///
/// A part is a named blob with a content type and its own relationships.
/// XML parts are kept as raw UTF-8 bytes and edited in place by the
/// presentation writer.
use memchr::memmem;

#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }

    /// Create a part with already loaded relationships.
    pub fn with_rels(
        partname: PackURI,
        content_type: impl Into<String>,
        blob: Vec<u8>,
        rels: Relationships,
    ) -> Self {
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Replace the content of this part.
    pub fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }

    /// Part content as UTF-8 text, for XML parts.
    pub fn xml_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.blob)
            .map_err(|e| OpcError::XmlError(format!("Invalid UTF-8 in {}: {}", self.partname, e)))
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add or reuse a relationship from this part to `target`, returning the rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname.base_uri());
        self.rels.get_or_add(reltype, &target_ref)
    }

    /// Partname of the part reached through `r_id`.
    pub fn related_partname(&self, r_id: &str) -> Result<PackURI> {
        self.rels
            .get(r_id)
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))?
            .target_partname()
    }

    /// Partname of the single relationship target of `reltype`.
    pub fn part_related_by(&self, reltype: &str) -> Result<PackURI> {
        self.rels.part_with_reltype(reltype)?.target_partname()
    }

    /// Count `r:id`/`r:embed` references to `r_id` in the part content.
    pub fn rel_ref_count(&self, r_id: &str) -> usize {
        [format!(r#"r:id="{}""#, r_id), format!(r#"r:embed="{}""#, r_id)]
            .iter()
            .map(|pattern| memmem::find_iter(&self.blob, pattern.as_bytes()).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opc::constants::{content_type as ct, relationship_type as rt};

    #[test]
    fn test_relate_to_uses_relative_ref() {
        let mut slide = Part::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE,
            b"<p:sld/>".to_vec(),
        );
        let layout = PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap();
        let r_id = slide.relate_to(&layout, rt::SLIDE_LAYOUT);
        assert_eq!(r_id, "rId1");
        assert_eq!(
            slide.rels().get("rId1").unwrap().target_ref(),
            "../slideLayouts/slideLayout2.xml"
        );
        assert_eq!(slide.part_related_by(rt::SLIDE_LAYOUT).unwrap(), layout);
        assert_eq!(slide.related_partname("rId1").unwrap(), layout);
        assert!(slide.related_partname("rId9").is_err());
    }

    #[test]
    fn test_rel_ref_count() {
        let part = Part::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            ct::PML_SLIDE,
            br#"<a:blip r:embed="rId2"/><a:blip r:embed="rId2"/><c:chart r:id="rId3"/>"#.to_vec(),
        );
        assert_eq!(part.rel_ref_count("rId2"), 2);
        assert_eq!(part.rel_ref_count("rId3"), 1);
        assert_eq!(part.rel_ref_count("rId4"), 0);
    }
}
