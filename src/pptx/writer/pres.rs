/// Presentation writer for PPTX.
use crate::common::unit::emu_to_inches;
use crate::error::{DeckError, Result};
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::{OpcPackage, PackURI, Part};
use crate::pptx::chart::chart_xml;
use crate::pptx::excel_embed::generate_chart_workbook;
use crate::pptx::layout::LayoutCatalog;
use crate::pptx::notes::{ensure_notes_master, notes_slide_xml};
use crate::pptx::parts::{PresentationPart, SlideId, append_slide_ids};
use crate::pptx::props::CoreProperties;
use crate::pptx::template::blank_package;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;

use super::relmap::RelationshipMapper;
use super::slide::MutableSlide;

/// A presentation opened for appending slides.
///
/// Starts from the built-in blank deck or from template bytes. Slides already
/// in a template are kept; new slides are appended after them.
///
/// # Examples
///
/// ```rust
/// use slidecraft::pptx::MutablePresentation;
///
/// let mut pres = MutablePresentation::new().unwrap();
/// let slide = pres.add_slide(0).unwrap();
/// assert!(slide.set_title("Hello"));
/// assert_eq!(pres.slide_count(), 1);
///
/// let bytes = pres.to_bytes().unwrap();
/// assert_eq!(&bytes[0..2], b"PK");
/// ```
#[derive(Debug)]
pub struct MutablePresentation {
    package: OpcPackage,
    pres_partname: PackURI,
    pres_part: PresentationPart,
    layouts: LayoutCatalog,
    /// Slides added in this session
    pub(crate) slides: Vec<MutableSlide>,
    core_properties: CoreProperties,
}

impl MutablePresentation {
    /// Open the built-in blank presentation (10in x 7.5in, 11 layouts).
    pub fn new() -> Result<Self> {
        Self::from_package(blank_package()?)
    }

    /// Open a presentation or template from `.pptx` bytes.
    pub fn from_template(data: &[u8]) -> Result<Self> {
        Self::from_package(OpcPackage::from_bytes(data)?)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(OpcPackage::open(path)?)
    }

    fn from_package(package: OpcPackage) -> Result<Self> {
        let pres_partname = package.main_document_partname()?;
        let part = package.part(&pres_partname)?;
        let pres_part = PresentationPart::from_part(part)?;

        let master_partname = part.related_partname(pres_part.first_master_r_id()?)?;
        let layouts = LayoutCatalog::from_package(&package, &master_partname)?;

        log::debug!(
            "Opened presentation {} ({}in x {}in, {} existing slides, {} layouts)",
            pres_partname,
            emu_to_inches(pres_part.slide_width),
            emu_to_inches(pres_part.slide_height),
            pres_part.slide_ids.len(),
            layouts.len()
        );

        Ok(Self {
            package,
            pres_partname,
            pres_part,
            layouts,
            slides: Vec::new(),
            core_properties: CoreProperties::new(),
        })
    }

    /// Layouts of the first slide master, in master order.
    pub fn layouts(&self) -> &LayoutCatalog {
        &self.layouts
    }

    /// Append a slide based on the layout at `layout_index`.
    pub fn add_slide(&mut self, layout_index: usize) -> Result<&mut MutableSlide> {
        let layout = self.layouts.get(layout_index).ok_or_else(|| {
            DeckError::Template(format!(
                "layout index {} out of range ({} layouts)",
                layout_index,
                self.layouts.len()
            ))
        })?;

        let slide_id = self.pres_part.next_slide_id() + self.slides.len() as u32;
        let slide = MutableSlide::new(slide_id, layout);
        log::debug!("Adding slide {} from layout '{}'", slide_id, layout.name);

        self.slides.push(slide);
        let index = self.slides.len() - 1;
        Ok(&mut self.slides[index])
    }

    /// Total number of slides, existing and new.
    pub fn slide_count(&self) -> usize {
        self.pres_part.slide_ids.len() + self.slides.len()
    }

    /// Get a new slide by index (0-based, among slides added in this session).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.pres_part.slide_width
    }

    /// Slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.pres_part.slide_height
    }

    pub fn set_core_properties(&mut self, title: &str, author: &str, description: &str) {
        self.core_properties = CoreProperties::new()
            .title(title)
            .creator(author)
            .description(description);
    }

    /// Serialize the presentation to `.pptx` bytes.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        self.write_slides()?;
        self.write_core_properties()?;
        Ok(self.package.to_bytes()?)
    }

    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Add every new slide, with its media, charts and notes, to the package.
    fn write_slides(&mut self) -> Result<()> {
        let slides = std::mem::take(&mut self.slides);
        let mut media: HashMap<Bytes, PackURI> = HashMap::new();
        let mut rel_mapper = RelationshipMapper::new();
        let mut slide_ids = Vec::with_capacity(slides.len());

        let notes_master = if slides.iter().any(|s| s.notes.is_some()) {
            Some(ensure_notes_master(&mut self.package, &self.pres_partname)?)
        } else {
            None
        };

        for (slide_index, slide) in slides.iter().enumerate() {
            let slide_partname = self.package.next_partname("/ppt/slides/slide%d.xml")?;
            let mut slide_part = Part::new(slide_partname.clone(), ct::PML_SLIDE, Vec::new());
            // rId1 is always the layout
            slide_part.relate_to(&slide.layout_partname, rt::SLIDE_LAYOUT);

            for (shape_index, shape) in slide.shapes.iter().enumerate() {
                if let Some((data, format)) = shape.image_data() {
                    let image_partname = match media.get(data) {
                        Some(partname) => partname.clone(),
                        None => {
                            let template = format!("/ppt/media/image%d.{}", format.extension());
                            let partname = self.package.next_partname(&template)?;
                            self.package.add_part(Part::new(
                                partname.clone(),
                                format.mime_type(),
                                data.to_vec(),
                            ));
                            media.insert(data.clone(), partname.clone());
                            partname
                        },
                    };
                    let r_id = slide_part.relate_to(&image_partname, rt::IMAGE);
                    rel_mapper.add_image(slide_index, shape_index, r_id);
                }

                if let Some((kind, data)) = shape.chart() {
                    let chart_partname = self.package.next_partname("/ppt/charts/chart%d.xml")?;
                    let workbook_partname = self
                        .package
                        .next_partname("/ppt/embeddings/Microsoft_Excel_Sheet%d.xlsx")?;

                    self.package.add_part(Part::new(
                        workbook_partname.clone(),
                        ct::SML_SHEET,
                        generate_chart_workbook(data)?,
                    ));

                    let mut chart_part = Part::new(chart_partname.clone(), ct::DML_CHART, Vec::new());
                    let workbook_r_id = chart_part.relate_to(&workbook_partname, rt::PACKAGE);
                    chart_part.set_blob(chart_xml(kind, data, &workbook_r_id)?);
                    self.package.add_part(chart_part);

                    let r_id = slide_part.relate_to(&chart_partname, rt::CHART);
                    rel_mapper.add_chart(slide_index, shape_index, r_id);
                }
            }

            if let (Some(notes), Some(master_partname)) = (&slide.notes, &notes_master) {
                let notes_partname = self
                    .package
                    .next_partname("/ppt/notesSlides/notesSlide%d.xml")?;
                let mut notes_part = Part::new(
                    notes_partname.clone(),
                    ct::PML_NOTES_SLIDE,
                    notes_slide_xml(notes)?.into_bytes(),
                );
                notes_part.relate_to(master_partname, rt::NOTES_MASTER);
                notes_part.relate_to(&slide_partname, rt::SLIDE);
                self.package.add_part(notes_part);

                slide_part.relate_to(&notes_partname, rt::NOTES_SLIDE);
            }

            slide_part.set_blob(slide.to_xml(slide_index, &rel_mapper)?.into_bytes());
            self.package.add_part(slide_part);

            let pres = self.package.part_mut(&self.pres_partname)?;
            let r_id = pres.relate_to(&slide_partname, rt::SLIDE);
            slide_ids.push(SlideId {
                id: slide.slide_id,
                r_id,
            });
        }

        let pres = self.package.part_mut(&self.pres_partname)?;
        let xml = append_slide_ids(pres.xml_str()?, &slide_ids)?;
        pres.set_blob(xml.into_bytes());

        log::debug!(
            "Wrote {} slides with {} media parts",
            slides.len(),
            media.len()
        );
        Ok(())
    }

    /// Replace `docProps/core.xml`, or add it when the package has none.
    fn write_core_properties(&mut self) -> Result<()> {
        let props = self.core_properties.clone().modified(Utc::now());
        let xml = props.to_xml().into_bytes();

        let existing = self
            .package
            .rels()
            .part_with_reltype(rt::CORE_PROPERTIES)
            .ok()
            .and_then(|rel| rel.target_partname().ok());

        match existing {
            Some(partname) if self.package.contains_part(&partname) => {
                self.package.part_mut(&partname)?.set_blob(xml);
            },
            _ => {
                let partname = PackURI::new("/docProps/core.xml")?;
                self.package
                    .add_part(Part::new(partname.clone(), ct::OPC_CORE_PROPERTIES, xml));
                self.package.relate_to(&partname, rt::CORE_PROPERTIES);
            },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::chart::{ChartData, ChartKind};
    use std::io::Cursor;

    fn png() -> Bytes {
        let img = image::RgbImage::new(8, 6);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new().unwrap();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 9_144_000);
        assert_eq!(pres.slide_height(), 6_858_000);
        assert_eq!(pres.layouts().len(), 11);
    }

    #[test]
    fn test_add_slide_out_of_range() {
        let mut pres = MutablePresentation::new().unwrap();
        assert!(matches!(pres.add_slide(11), Err(DeckError::Template(_))));
    }

    #[test]
    fn test_slide_ids_sequential() {
        let mut pres = MutablePresentation::new().unwrap();
        assert_eq!(pres.add_slide(0).unwrap().slide_id(), 256);
        assert_eq!(pres.add_slide(6).unwrap().slide_id(), 257);
    }

    #[test]
    fn test_round_trip_as_template() {
        let mut pres = MutablePresentation::new().unwrap();
        pres.add_slide(0).unwrap().set_title("First");
        pres.add_slide(1).unwrap().set_notes("Remember this");
        pres.set_core_properties("Deck", "Ada", "A test deck");
        let bytes = pres.to_bytes().unwrap();

        let mut reopened = MutablePresentation::from_template(&bytes).unwrap();
        assert_eq!(reopened.slide_count(), 2);
        assert_eq!(reopened.add_slide(5).unwrap().slide_id(), 258);

        let bytes = reopened.to_bytes().unwrap();
        let package = OpcPackage::from_bytes(&bytes).unwrap();
        let pres_part = PresentationPart::parse(package.main_document_part().unwrap().blob()).unwrap();
        assert_eq!(pres_part.slide_ids.len(), 3);
        assert!(pres_part.notes_master_r_id.is_some());

        let core = package.part_by_reltype(rt::CORE_PROPERTIES).unwrap();
        assert!(core.xml_str().unwrap().contains("<dc:creator>Ada</dc:creator>"));
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("deck.pptx");

        let mut pres = MutablePresentation::new().unwrap();
        pres.add_slide(0).unwrap().set_title("Saved");
        pres.save(&path).unwrap();

        let reopened = MutablePresentation::open(&path).unwrap();
        assert_eq!(reopened.slide_count(), 1);
        assert_eq!(emu_to_inches(reopened.slide_width()), 10.0);
        assert_eq!(emu_to_inches(reopened.slide_height()), 7.5);
    }

    #[test]
    fn test_identical_images_share_media_part() {
        let mut pres = MutablePresentation::new().unwrap();
        let image = png();
        for _ in 0..2 {
            let slide = pres.add_slide(6).unwrap();
            slide.add_picture(image.clone(), 0, 0, 914_400, None).unwrap();
        }
        let bytes = pres.to_bytes().unwrap();
        let package = OpcPackage::from_bytes(&bytes).unwrap();

        let media: Vec<_> = package
            .iter_parts()
            .filter(|p| p.partname().as_str().starts_with("/ppt/media/"))
            .collect();
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].partname().as_str(), "/ppt/media/image1.png");
    }

    #[test]
    fn test_chart_parts() {
        let mut pres = MutablePresentation::new().unwrap();
        pres.add_slide(6)
            .unwrap()
            .add_chart(ChartKind::Line, ChartData::sample(), 0, 0, 100, 100);
        let bytes = pres.to_bytes().unwrap();
        let package = OpcPackage::from_bytes(&bytes).unwrap();

        let chart = package
            .part(&PackURI::new("/ppt/charts/chart1.xml").unwrap())
            .unwrap();
        assert_eq!(chart.content_type(), ct::DML_CHART);
        assert_eq!(
            chart.part_related_by(rt::PACKAGE).unwrap().as_str(),
            "/ppt/embeddings/Microsoft_Excel_Sheet1.xlsx"
        );

        let slide = package
            .part(&PackURI::new("/ppt/slides/slide1.xml").unwrap())
            .unwrap();
        assert_eq!(
            slide.related_partname("rId1").unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout7.xml"
        );
        assert_eq!(slide.part_related_by(rt::CHART).unwrap(), *chart.partname());
    }
}
