//! Read-side of OPC packages.
//!
//! Parses `[Content_Types].xml`, then walks the relationship graph from the
//! package relationships and collects every reachable part with its content
//! type and relationships.

use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::opc::part::Part;
use crate::opc::phys_pkg::PhysPkgReader;
use crate::opc::rel::Relationships;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::{HashMap, HashSet};

/// Content type lookup built from `[Content_Types].xml`.
///
/// Overrides are keyed by partname, defaults by lowercase extension.
pub(crate) struct ContentTypeMap {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypeMap {
    fn new() -> Self {
        Self {
            defaults: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    pub(crate) fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut map = Self::new();
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let (key_attr, is_default): (&[u8], bool) = match e.local_name().as_ref() {
                        b"Default" => (&b"Extension"[..], true),
                        b"Override" => (&b"PartName"[..], false),
                        _ => (&b""[..], false),
                    };

                    let mut key = None;
                    let mut content_type = None;
                    if !key_attr.is_empty() {
                        for attr in e.attributes() {
                            let attr = attr?;
                            if attr.key.as_ref() == key_attr {
                                key = Some(attr.unescape_value()?.to_string());
                            } else if attr.key.as_ref() == b"ContentType" {
                                content_type = Some(attr.unescape_value()?.to_string());
                            }
                        }
                    }

                    match (key, content_type) {
                        (Some(ext), Some(ct)) if is_default => {
                            map.defaults.insert(ext.to_lowercase(), ct);
                        },
                        (Some(partname), Some(ct)) => {
                            map.overrides.insert(partname, ct);
                        },
                        _ => {},
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(OpcError::XmlError(format!(
                        "Content types parse error: {}",
                        e
                    )));
                },
                _ => {},
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Override first, then the default for the extension.
    pub(crate) fn get(&self, pack_uri: &PackURI) -> Result<&str> {
        if let Some(ct) = self.overrides.get(pack_uri.as_str()) {
            return Ok(ct);
        }
        self.defaults
            .get(&pack_uri.ext().to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| OpcError::ContentTypeNotFound(pack_uri.to_string()))
    }
}

/// Parts and package relationships loaded from a physical package.
pub struct PackageReader {
    pkg_rels: Relationships,
    parts: Vec<Part>,
}

impl PackageReader {
    pub fn from_phys_reader(phys_reader: PhysPkgReader) -> Result<Self> {
        let mut members = phys_reader.into_members();

        let content_types_xml = members
            .get(CONTENT_TYPES_URI.trim_start_matches('/'))
            .ok_or_else(|| OpcError::PartNotFound("[Content_Types].xml".to_string()))?;
        let content_types = ContentTypeMap::from_xml(content_types_xml)?;

        let package_uri = PackURI::new(PACKAGE_URI)?;
        let pkg_rels = Self::load_rels(&members, &package_uri)?;
        let parts = Self::load_parts(&mut members, &pkg_rels, &content_types)?;

        Ok(Self { pkg_rels, parts })
    }

    fn load_rels(members: &HashMap<String, Vec<u8>>, source_uri: &PackURI) -> Result<Relationships> {
        let rels_uri = source_uri.rels_uri();
        match members.get(rels_uri.membername()) {
            Some(xml) => Relationships::from_xml(xml, source_uri.base_uri()),
            None => Ok(Relationships::new(source_uri.base_uri().to_string())),
        }
    }

    /// Depth-first walk of internal relationships; each part is loaded once.
    fn load_parts(
        members: &mut HashMap<String, Vec<u8>>,
        pkg_rels: &Relationships,
        content_types: &ContentTypeMap,
    ) -> Result<Vec<Part>> {
        let mut parts = Vec::with_capacity(32);
        let mut visited = HashSet::with_capacity(32);
        let mut work_queue: Vec<PackURI> = Vec::with_capacity(pkg_rels.len());

        for rel in pkg_rels.iter().filter(|rel| !rel.is_external()) {
            let partname = rel.target_partname()?;
            if visited.insert(partname.clone()) {
                work_queue.push(partname);
            }
        }

        while let Some(partname) = work_queue.pop() {
            let rels = Self::load_rels(members, &partname)?;

            for rel in rels.iter().filter(|rel| !rel.is_external()) {
                let child = rel.target_partname()?;
                if visited.insert(child.clone()) {
                    work_queue.push(child);
                }
            }

            let Some(blob) = members.remove(partname.membername()) else {
                // Dangling targets are tolerated; the relationship is kept as is
                log::warn!("Relationship target {} missing from package", partname);
                continue;
            };
            let content_type = content_types.get(&partname)?.to_string();

            parts.push(Part::with_rels(partname, content_type, blob, rels));
        }

        Ok(parts)
    }

    pub fn into_parts(self) -> (Relationships, Vec<Part>) {
        (self.pkg_rels, self.parts)
    }
}
