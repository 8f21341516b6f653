//! Physical (zip) container of an OPC package.
//!
//! The reader loads every member up front so that the package reader can walk
//! the relationship graph without going back to the archive. The writer deflates
//! members into an in-memory buffer.

use crate::opc::error::{OpcError, Result};
use crate::opc::packuri::PackURI;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// All members of a zip archive, keyed by member name.
pub struct PhysPkgReader {
    members: HashMap<String, Vec<u8>>,
}

impl PhysPkgReader {
    /// Open a package file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OpcError::PackageNotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Read every file member of an in-memory zip archive.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut members = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut buf = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut buf)?;
            members.insert(name, buf);
        }

        Ok(Self { members })
    }

    #[inline]
    pub fn contains(&self, pack_uri: &PackURI) -> bool {
        self.members.contains_key(pack_uri.membername())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Hand the member map over to the package reader.
    pub fn into_members(self) -> HashMap<String, Vec<u8>> {
        self.members
    }
}

/// Writes package members into a deflated zip held in memory.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write one member at the zip path of `pack_uri`.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive
            .start_file(pack_uri.membername(), self.options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finalize the central directory and return the archive bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut writer = PhysPkgWriter::new();
        let uri = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        writer.write(&uri, b"<p:sld/>").unwrap();
        let bytes = writer.finish().unwrap();

        let reader = PhysPkgReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.len(), 1);
        assert!(reader.contains(&uri));
        let members = reader.into_members();
        assert_eq!(members["ppt/slides/slide1.xml"], b"<p:sld/>");
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            PhysPkgReader::from_bytes(b"definitely not a zip"),
            Err(OpcError::ZipError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PhysPkgReader::open("/nonexistent/deck.pptx"),
            Err(OpcError::PackageNotFound(_))
        ));
    }
}
