//! Open Packaging Convention (OPC) layer.
//!
//! A presentation file is a zip of parts tied together by relationships. This
//! module reads such a package into memory, lets callers add and edit parts,
//! and writes it back out.

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgreader;
pub mod pkgwriter;
pub mod rel;

pub use error::{OpcError, Result};
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use rel::{Relationship, Relationships};
