/// In-memory OPC package.
///
/// `OpcPackage` owns every part by partname plus the package-level relationships.
/// Parts are kept in a sorted map so serialization is deterministic.
use crate::opc::constants::relationship_type;
use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::{PACKAGE_URI, PackURI};
use crate::opc::part::Part;
use crate::opc::phys_pkg::PhysPkgReader;
use crate::opc::pkgreader::PackageReader;
use crate::opc::pkgwriter::PackageWriter;
use crate::opc::rel::Relationships;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct OpcPackage {
    rels: Relationships,
    parts: BTreeMap<PackURI, Part>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: BTreeMap::new(),
        }
    }

    /// Open a package file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::open(path)?)
    }

    /// Load a package from zip bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_phys_reader(PhysPkgReader::from_bytes(data)?)
    }

    fn from_phys_reader(phys_reader: PhysPkgReader) -> Result<Self> {
        let (rels, parts) = PackageReader::from_phys_reader(phys_reader)?.into_parts();
        Ok(Self {
            rels,
            parts: parts
                .into_iter()
                .map(|part| (part.partname().clone(), part))
                .collect(),
        })
    }

    /// Partname of the main document part (`/ppt/presentation.xml` for decks).
    pub fn main_document_partname(&self) -> Result<PackURI> {
        self.rels
            .part_with_reltype(relationship_type::OFFICE_DOCUMENT)?
            .target_partname()
    }

    pub fn main_document_part(&self) -> Result<&Part> {
        let partname = self.main_document_partname()?;
        self.part(&partname)
    }

    pub fn part(&self, partname: &PackURI) -> Result<&Part> {
        self.parts
            .get(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    pub fn part_mut(&mut self, partname: &PackURI) -> Result<&mut Part> {
        self.parts
            .get_mut(partname)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Part targeted by the package-level relationship of `reltype`, if any.
    pub fn part_by_reltype(&self, reltype: &str) -> Option<&Part> {
        let rel = self.rels.part_with_reltype(reltype).ok()?;
        let partname = rel.target_partname().ok()?;
        self.parts.get(&partname)
    }

    /// Add a part, replacing any existing part with the same partname.
    pub fn add_part(&mut self, part: Part) {
        self.parts.insert(part.partname().clone(), part);
    }

    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }

    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Relate the package itself to a part, returning the rId.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        self.rels
            .get_or_add(reltype, &partname.relative_ref(PACKAGE_URI))
    }

    /// First free partname for a `%d` template, e.g. `/ppt/media/image%d.png`.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        for n in 1..=10_000u32 {
            let candidate = PackURI::new(template.replace("%d", &n.to_string()))?;
            if !self.parts.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(OpcError::InvalidPackUri(format!(
            "Too many parts, cannot find next partname for {}",
            template
        )))
    }

    /// Serialize to zip bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(self)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}
