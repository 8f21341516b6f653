//! Request manifests.
//!
//! A manifest is a YAML document (JSON when the file ends in `.json`)
//! describing a [`PresentationRequest`]. Image and template paths are
//! resolved relative to the manifest file.
//!
//! ```yaml
//! title: Quarterly Review
//! author: Ada
//! theme: Dark
//! sections:
//!   - title: Results
//!     slides:
//!       - layout: Title and Content
//!         content: Revenue grew
//!         chart: Column Clustered
//!         image:
//!           placement: foreground
//!           paths: [chart.png, logo.png]
//! ```

use crate::error::{DeckError, Result};
use crate::pptx::ChartKind;
use bytes::Bytes;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::request::{
    AutoGenerate, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE, LayoutKind, MAX_FONT_SIZE, MIN_FONT_SIZE,
    PresentationRequest, Section, SlideImage, SlideSpec,
};

const DEFAULT_SECTION_TITLE: &str = "Default Section";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestDoc {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    author: String,
    template: Option<PathBuf>,
    theme: Option<String>,
    title_background: Option<PathBuf>,
    common_background: Option<PathBuf>,
    #[serde(default)]
    sections: Vec<ManifestSection>,
    auto_generate: Option<ManifestAutoGenerate>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestAutoGenerate {
    #[serde(default)]
    context: String,
    #[serde(default)]
    instructions: String,
    count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestSection {
    #[serde(default)]
    title: String,
    header_image: Option<PathBuf>,
    #[serde(default)]
    slides: Vec<ManifestSlide>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestSlide {
    layout: Option<LayoutRef>,
    #[serde(default)]
    content: String,
    image: Option<ManifestImage>,
    chart: Option<String>,
    font_size: Option<f64>,
    font_name: Option<String>,
    #[serde(default)]
    notes: String,
    instructions: Option<String>,
}

/// A layout given either by index or by name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayoutRef {
    Index(usize),
    Name(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Placement {
    Background,
    #[default]
    Foreground,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestImage {
    #[serde(default)]
    placement: Placement,
    paths: Vec<PathBuf>,
}

/// Load a manifest file and every file it references.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<PresentationRequest> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| DeckError::Manifest(format!("{}: {}", path.display(), e)))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    log::debug!("Loading manifest {}", path.display());
    parse_manifest(&text, is_json, base_dir)
}

/// Parse manifest text, resolving referenced files against `base_dir`.
pub fn parse_manifest(text: &str, is_json: bool, base_dir: &Path) -> Result<PresentationRequest> {
    let doc: ManifestDoc = if is_json {
        serde_json::from_str(text).map_err(|e| DeckError::Manifest(e.to_string()))?
    } else {
        serde_saphyr::from_str(text).map_err(|e| DeckError::Manifest(e.to_string()))?
    };
    Loader { base_dir }.request(doc)
}

struct Loader<'a> {
    base_dir: &'a Path,
}

impl Loader<'_> {
    fn read(&self, path: &Path) -> Result<Bytes> {
        let full = self.base_dir.join(path);
        std::fs::read(&full)
            .map(Bytes::from)
            .map_err(|e| DeckError::Manifest(format!("{}: {}", full.display(), e)))
    }

    fn read_opt(&self, path: Option<&PathBuf>) -> Result<Option<Bytes>> {
        path.map(|p| self.read(p)).transpose()
    }

    fn request(&self, doc: ManifestDoc) -> Result<PresentationRequest> {
        let mut sections = doc
            .sections
            .into_iter()
            .map(|s| self.section(s))
            .collect::<Result<Vec<_>>>()?;

        if sections.is_empty() {
            sections.push(Section {
                title: DEFAULT_SECTION_TITLE.to_string(),
                header_image: None,
                slides: vec![SlideSpec::with_layout(LayoutKind::TitleAndContent)],
            });
        }

        Ok(PresentationRequest {
            title: doc.title,
            description: doc.description,
            author: doc.author,
            template: self.read_opt(doc.template.as_ref())?,
            theme: doc.theme,
            title_background: self.read_opt(doc.title_background.as_ref())?,
            common_background: self.read_opt(doc.common_background.as_ref())?,
            sections,
            auto_generate: doc.auto_generate.map(|auto| AutoGenerate {
                context: auto.context,
                instructions: auto.instructions,
                count: auto.count,
            }),
        })
    }

    fn section(&self, section: ManifestSection) -> Result<Section> {
        Ok(Section {
            header_image: self.read_opt(section.header_image.as_ref())?,
            slides: section
                .slides
                .into_iter()
                .map(|s| self.slide(s))
                .collect::<Result<Vec<_>>>()?,
            title: section.title,
        })
    }

    fn slide(&self, slide: ManifestSlide) -> Result<SlideSpec> {
        let layout = match slide.layout {
            None => LayoutKind::Blank.index(),
            Some(LayoutRef::Index(index)) => index,
            Some(LayoutRef::Name(name)) => name
                .parse::<LayoutKind>()
                .map_err(|e| DeckError::Manifest(e.to_string()))?
                .index(),
        };

        let chart = slide
            .chart
            .as_deref()
            .map(|name| {
                ChartKind::from_name(name)
                    .ok_or_else(|| DeckError::Manifest(format!("Unknown chart kind: {}", name)))
            })
            .transpose()?;

        let image = match slide.image {
            None => None,
            Some(image) => {
                let mut pictures = image
                    .paths
                    .iter()
                    .map(|p| self.read(p))
                    .collect::<Result<Vec<_>>>()?;
                match image.placement {
                    Placement::Foreground if pictures.is_empty() => None,
                    Placement::Foreground => Some(SlideImage::Foreground(pictures)),
                    Placement::Background if pictures.is_empty() => None,
                    Placement::Background => Some(SlideImage::Background(pictures.swap_remove(0))),
                }
            },
        };

        let font_size = slide.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&font_size) {
            return Err(DeckError::Manifest(format!(
                "font_size must be between {} and {} points, got {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE, font_size
            )));
        }

        Ok(SlideSpec {
            layout,
            content: slide.content,
            image,
            chart,
            font_size,
            font_name: slide
                .font_name
                .unwrap_or_else(|| DEFAULT_FONT_NAME.to_string()),
            notes: slide.notes,
            instructions: slide.instructions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.png"), b"\x89PNG\r\n\x1a\nA").unwrap();
        std::fs::write(dir.path().join("b.png"), b"\x89PNG\r\n\x1a\nB").unwrap();
        let manifest = dir.path().join("deck.yaml");
        std::fs::write(
            &manifest,
            r#"
title: Quarterly Review
author: Ada
theme: Dark
sections:
  - title: Results
    slides:
      - layout: Title and Content
        content: Revenue grew
        chart: Pie
        font_size: 18
      - layout: 3
        image:
          placement: background
          paths: [b.png, a.png]
      - image:
          paths: [a.png, b.png]
"#,
        )
        .unwrap();

        let request = load_manifest(&manifest).unwrap();
        assert_eq!(request.title, "Quarterly Review");
        assert_eq!(request.theme.as_deref(), Some("Dark"));

        let slides = &request.sections[0].slides;
        assert_eq!(slides.len(), 3);
        assert_eq!(slides[0].layout, 1);
        assert_eq!(slides[0].chart, Some(ChartKind::Pie));
        assert_eq!(slides[0].font_size, 18.0);
        assert_eq!(slides[0].font_name, "Calibri");
        assert_eq!(slides[1].layout, 3);
        assert_eq!(
            slides[1].image,
            Some(SlideImage::Background(Bytes::from_static(b"\x89PNG\r\n\x1a\nB")))
        );
        assert_eq!(slides[2].layout, 6);
        assert!(matches!(&slides[2].image, Some(SlideImage::Foreground(v)) if v.len() == 2));
    }

    #[test]
    fn test_json_manifest_without_sections() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("deck.json");
        std::fs::write(
            &manifest,
            r#"{"title": "Empty", "description": "Nothing yet", "auto_generate": {"instructions": "Pitch", "count": 3}}"#,
        )
        .unwrap();

        let request = load_manifest(&manifest).unwrap();
        assert_eq!(request.auto_generate.as_ref().map(|a| a.count), Some(3));
        assert_eq!(request.sections.len(), 1);
        assert_eq!(request.sections[0].title, "Default Section");
        assert_eq!(request.sections[0].slides[0].layout, 1);
    }

    #[test]
    fn test_missing_image_is_manifest_error() {
        let dir = TempDir::new().unwrap();
        let result = parse_manifest("title_background: missing.png\n", false, dir.path());
        assert!(matches!(result, Err(DeckError::Manifest(_))));
    }

    #[test]
    fn test_empty_image_list_is_no_image() {
        let dir = TempDir::new().unwrap();
        for placement in ["foreground", "background"] {
            let manifest = format!(
                "sections:\n  - title: S\n    slides:\n      - image:\n          placement: {}\n          paths: []\n",
                placement
            );
            let request = parse_manifest(&manifest, false, dir.path()).unwrap();
            assert_eq!(request.sections[0].slides[0].image, None);
        }
    }

    #[test]
    fn test_font_size_bounds() {
        let dir = TempDir::new().unwrap();
        let slide = |size: &str| format!("sections:\n  - title: S\n    slides:\n      - font_size: {}\n", size);

        for size in ["0", "0.5", "5000", ".nan", ".inf"] {
            assert!(
                matches!(parse_manifest(&slide(size), false, dir.path()), Err(DeckError::Manifest(_))),
                "font_size {} accepted",
                size
            );
        }
        for (size, expected) in [("1", 1.0), ("72", 72.0), ("4000", 4000.0)] {
            let request = parse_manifest(&slide(size), false, dir.path()).unwrap();
            assert_eq!(request.sections[0].slides[0].font_size, expected);
        }
    }

    #[test]
    fn test_unknown_names_rejected() {
        let dir = TempDir::new().unwrap();
        let chart = "sections:\n  - title: S\n    slides:\n      - chart: Donut\n";
        assert!(matches!(
            parse_manifest(chart, false, dir.path()),
            Err(DeckError::Manifest(_))
        ));
        let layout = "sections:\n  - title: S\n    slides:\n      - layout: Hero\n";
        assert!(matches!(
            parse_manifest(layout, false, dir.path()),
            Err(DeckError::Manifest(_))
        ));
    }
}
