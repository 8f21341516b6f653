/// Error types for deck generation.
use thiserror::Error;

/// Result type for deck generation.
pub type Result<T> = std::result::Result<T, DeckError>;

/// Error types for deck generation.
#[derive(Error, Debug)]
pub enum DeckError {
    /// OPC package error
    #[error("OPC error: {0}")]
    Opc(#[from] crate::opc::OpcError),

    /// XML parsing or generation error
    #[error("XML error: {0}")]
    Xml(String),

    /// The template is not a usable presentation
    #[error("Template error: {0}")]
    Template(String),

    /// Invalid content type
    #[error("Invalid content type: expected {expected}, got {got}")]
    InvalidContentType { expected: String, got: String },

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Picture bytes could not be decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Request manifest could not be loaded
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for DeckError {
    fn from(err: quick_xml::Error) -> Self {
        DeckError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DeckError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DeckError::Xml(err.to_string())
    }
}

impl From<std::fmt::Error> for DeckError {
    fn from(err: std::fmt::Error) -> Self {
        DeckError::Xml(err.to_string())
    }
}
