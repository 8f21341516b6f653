//! Core document properties (`docProps/core.xml`).

use crate::common::escape_xml;
use chrono::{DateTime, SecondsFormat, Utc};

/// The subset of core properties a generated deck records.
#[derive(Debug, Clone, Default)]
pub struct CoreProperties {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub modified: Option<DateTime<Utc>>,
}

impl CoreProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn creator(mut self, creator: &str) -> Self {
        self.creator = Some(creator.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Generate core.xml content.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        if let Some(ref title) = self.title {
            xml.push_str("<dc:title>");
            xml.push_str(&escape_xml(title));
            xml.push_str("</dc:title>");
        }

        if let Some(ref creator) = self.creator {
            xml.push_str("<dc:creator>");
            xml.push_str(&escape_xml(creator));
            xml.push_str("</dc:creator>");
            xml.push_str("<cp:lastModifiedBy>");
            xml.push_str(&escape_xml(creator));
            xml.push_str("</cp:lastModifiedBy>");
        }

        if let Some(ref description) = self.description {
            xml.push_str("<dc:description>");
            xml.push_str(&escape_xml(description));
            xml.push_str("</dc:description>");
        }

        if let Some(ref modified) = self.modified {
            let stamp = modified.to_rfc3339_opts(SecondsFormat::Secs, true);
            xml.push_str(r#"<dcterms:created xsi:type="dcterms:W3CDTF">"#);
            xml.push_str(&stamp);
            xml.push_str("</dcterms:created>");
            xml.push_str(r#"<dcterms:modified xsi:type="dcterms:W3CDTF">"#);
            xml.push_str(&stamp);
            xml.push_str("</dcterms:modified>");
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_core_properties_xml() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let xml = CoreProperties::new()
            .title("Q3 <Review>")
            .creator("Ada")
            .description("Numbers & plans")
            .modified(stamp)
            .to_xml();

        assert!(xml.contains("<dc:title>Q3 &lt;Review&gt;</dc:title>"));
        assert!(xml.contains("<dc:creator>Ada</dc:creator>"));
        assert!(xml.contains("<dc:description>Numbers &amp; plans</dc:description>"));
        assert!(xml.contains(
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">2024-05-01T12:30:00Z</dcterms:modified>"#
        ));
    }

    #[test]
    fn test_empty_properties() {
        let xml = CoreProperties::new().to_xml();
        assert!(!xml.contains("<dc:title>"));
        assert!(xml.ends_with("</cp:coreProperties>"));
    }
}
