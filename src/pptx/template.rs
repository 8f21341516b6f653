//! Built-in blank presentation.
//!
//! A 10in x 7.5in deck with one slide master, the Office theme and the eleven
//! standard layouts in their usual order. The layouts are generated from a
//! blueprint table; the remaining parts are static resources.

use crate::common::escape_xml;
use crate::error::Result;
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::{OpcPackage, PackURI, Part};
use crate::pptx::layout::{Placeholder, PlaceholderType};
use std::fmt::Write as FmtWrite;

pub(crate) const PRESENTATION_XML: &str = include_str!("../../resources/presentation.xml");
pub(crate) const SLIDE_MASTER_XML: &str = include_str!("../../resources/slideMaster.xml");
pub(crate) const THEME_XML: &str = include_str!("../../resources/theme.xml");
pub(crate) const NOTES_MASTER_XML: &str = include_str!("../../resources/notesMaster.xml");
const PRES_PROPS_XML: &str = include_str!("../../resources/presProps.xml");
const VIEW_PROPS_XML: &str = include_str!("../../resources/viewProps.xml");
const TABLE_STYLES_XML: &str = include_str!("../../resources/tableStyles.xml");
const APP_XML: &str = include_str!("../../resources/app.xml");

/// Placeholder on a generated layout; `xfrm` is `[x, y, cx, cy]` in EMU.
struct PhBlueprint {
    ph_type: PlaceholderType,
    idx: u32,
    vertical: bool,
    size: Option<&'static str>,
    name: &'static str,
    xfrm: [i64; 4],
}

struct LayoutBlueprint {
    name: &'static str,
    layout_type: &'static str,
    placeholders: &'static [PhBlueprint],
}

const fn ph(
    ph_type: PlaceholderType,
    idx: u32,
    name: &'static str,
    xfrm: [i64; 4],
) -> PhBlueprint {
    PhBlueprint {
        ph_type,
        idx,
        vertical: false,
        size: None,
        name,
        xfrm,
    }
}

const fn half(ph_type: PlaceholderType, idx: u32, name: &'static str, xfrm: [i64; 4]) -> PhBlueprint {
    PhBlueprint {
        ph_type,
        idx,
        vertical: false,
        size: Some("half"),
        name,
        xfrm,
    }
}

const fn vert(ph_type: PlaceholderType, idx: u32, name: &'static str, xfrm: [i64; 4]) -> PhBlueprint {
    PhBlueprint {
        ph_type,
        idx,
        vertical: true,
        size: None,
        name,
        xfrm,
    }
}

use PlaceholderType::{Body, CenterTitle, Object, Picture, SubTitle, Title};

const TITLE_XFRM: [i64; 4] = [457200, 274638, 8229600, 1143000];
const BODY_XFRM: [i64; 4] = [457200, 1600200, 8229600, 4525963];

// Standard layouts, in master order (index = position in sldLayoutIdLst)
static LAYOUTS: [LayoutBlueprint; 11] = [
    LayoutBlueprint {
        name: "Title Slide",
        layout_type: "title",
        placeholders: &[
            ph(CenterTitle, 0, "Title 1", [685800, 2130425, 7772400, 1470025]),
            ph(SubTitle, 1, "Subtitle 2", [1371600, 3886200, 6400800, 1752600]),
        ],
    },
    LayoutBlueprint {
        name: "Title and Content",
        layout_type: "obj",
        placeholders: &[
            ph(Title, 0, "Title 1", TITLE_XFRM),
            ph(Object, 1, "Content Placeholder 2", BODY_XFRM),
        ],
    },
    LayoutBlueprint {
        name: "Section Header",
        layout_type: "secHead",
        placeholders: &[
            ph(Title, 0, "Title 1", [722313, 4406900, 7772400, 1362075]),
            ph(Body, 1, "Text Placeholder 2", [722313, 2906713, 7772400, 1500187]),
        ],
    },
    LayoutBlueprint {
        name: "Two Content",
        layout_type: "twoObj",
        placeholders: &[
            ph(Title, 0, "Title 1", TITLE_XFRM),
            half(Object, 1, "Content Placeholder 2", [457200, 1600200, 4038600, 4525963]),
            half(Object, 2, "Content Placeholder 3", [4648200, 1600200, 4038600, 4525963]),
        ],
    },
    LayoutBlueprint {
        name: "Comparison",
        layout_type: "twoTxTwoObj",
        placeholders: &[
            ph(Title, 0, "Title 1", TITLE_XFRM),
            ph(Body, 1, "Text Placeholder 2", [457200, 1535113, 4040188, 639762]),
            half(Object, 2, "Content Placeholder 3", [457200, 2174875, 4040188, 3951288]),
            ph(Body, 3, "Text Placeholder 4", [4645025, 1535113, 4041775, 639762]),
            half(Object, 4, "Content Placeholder 5", [4645025, 2174875, 4041775, 3951288]),
        ],
    },
    LayoutBlueprint {
        name: "Title Only",
        layout_type: "titleOnly",
        placeholders: &[ph(Title, 0, "Title 1", TITLE_XFRM)],
    },
    LayoutBlueprint {
        name: "Blank",
        layout_type: "blank",
        placeholders: &[],
    },
    LayoutBlueprint {
        name: "Content with Caption",
        layout_type: "objTx",
        placeholders: &[
            ph(Title, 0, "Title 1", [457200, 273050, 3008313, 1162050]),
            ph(Object, 1, "Content Placeholder 2", [3575050, 273050, 5111750, 5853113]),
            ph(Body, 2, "Text Placeholder 3", [457200, 1435100, 3008313, 4691063]),
        ],
    },
    LayoutBlueprint {
        name: "Picture with Caption",
        layout_type: "picTx",
        placeholders: &[
            ph(Title, 0, "Title 1", [1792288, 4800600, 5486400, 566738]),
            ph(Picture, 1, "Picture Placeholder 2", [1792288, 612775, 5486400, 4114800]),
            ph(Body, 2, "Text Placeholder 3", [1792288, 5367338, 5486400, 804862]),
        ],
    },
    LayoutBlueprint {
        name: "Title and Vertical Text",
        layout_type: "vertTx",
        placeholders: &[
            ph(Title, 0, "Title 1", TITLE_XFRM),
            vert(Body, 1, "Vertical Text Placeholder 2", BODY_XFRM),
        ],
    },
    LayoutBlueprint {
        name: "Vertical Title and Text",
        layout_type: "vertTitleAndTx",
        placeholders: &[
            vert(Title, 0, "Vertical Title 1", [6629400, 274638, 2057400, 5851525]),
            vert(Body, 1, "Vertical Text Placeholder 2", [457200, 274638, 6019800, 5851525]),
        ],
    },
];

/// Date, footer and slide number, present on every standard layout.
static FOOTERS: [PhBlueprint; 3] = [
    half(PlaceholderType::Date, 10, "Date Placeholder", [457200, 6356350, 2133600, 365125]),
    PhBlueprint {
        ph_type: PlaceholderType::Footer,
        idx: 11,
        vertical: false,
        size: Some("quarter"),
        name: "Footer Placeholder",
        xfrm: [3124200, 6356350, 2895600, 365125],
    },
    PhBlueprint {
        ph_type: PlaceholderType::SlideNumber,
        idx: 12,
        vertical: false,
        size: Some("quarter"),
        name: "Slide Number Placeholder",
        xfrm: [6553200, 6356350, 2133600, 365125],
    },
];

fn layout_xml(blueprint: &LayoutBlueprint) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" type="{}" preserve="1">"#,
        blueprint.layout_type
    )?;
    write!(xml, r#"<p:cSld name="{}">"#, escape_xml(blueprint.name))?;
    xml.push_str("<p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    let mut shape_id = 2u32;
    for bp in blueprint.placeholders.iter().chain(FOOTERS.iter()) {
        // Footer shapes are numbered after the content placeholders
        let name = if bp.ph_type.is_layout_only() {
            format!("{} {}", bp.name, shape_id - 1)
        } else {
            bp.name.to_string()
        };
        let placeholder = Placeholder {
            ph_type: bp.ph_type,
            idx: bp.idx,
            vertical: bp.vertical,
            size: bp.size.map(str::to_string),
            name,
        };

        xml.push_str("<p:sp><p:nvSpPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}"/>"#,
            shape_id,
            escape_xml(&placeholder.name)
        )?;
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
        write!(xml, "<p:nvPr>{}</p:nvPr>", placeholder.ph_xml())?;
        xml.push_str("</p:nvSpPr>");

        let [x, y, cx, cy] = bp.xfrm;
        write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            x, y, cx, cy
        )?;

        xml.push_str("<p:txBody>");
        if bp.vertical {
            xml.push_str(r#"<a:bodyPr vert="eaVert"/>"#);
        } else {
            xml.push_str("<a:bodyPr/>");
        }
        xml.push_str(r#"<a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody>"#);
        xml.push_str("</p:sp>");

        shape_id += 1;
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");

    Ok(xml)
}

fn xml_part(partname: &str, content_type: &str, xml: &str) -> Result<Part> {
    Ok(Part::new(
        PackURI::new(partname)?,
        content_type,
        xml.as_bytes().to_vec(),
    ))
}

/// Assemble the built-in blank presentation package.
pub fn blank_package() -> Result<OpcPackage> {
    let mut package = OpcPackage::new();

    let mut pres = xml_part("/ppt/presentation.xml", ct::PML_PRESENTATION_MAIN, PRESENTATION_XML)?;
    let mut master = xml_part(
        "/ppt/slideMasters/slideMaster1.xml",
        ct::PML_SLIDE_MASTER,
        SLIDE_MASTER_XML,
    )?;
    let theme = xml_part("/ppt/theme/theme1.xml", ct::OFC_THEME, THEME_XML)?;

    // Master rIds 1..=11 are referenced by its sldLayoutIdLst
    for (n, blueprint) in LAYOUTS.iter().enumerate() {
        let mut layout = xml_part(
            &format!("/ppt/slideLayouts/slideLayout{}.xml", n + 1),
            ct::PML_SLIDE_LAYOUT,
            &layout_xml(blueprint)?,
        )?;
        layout.relate_to(master.partname(), rt::SLIDE_MASTER);
        master.relate_to(layout.partname(), rt::SLIDE_LAYOUT);
        package.add_part(layout);
    }
    master.relate_to(theme.partname(), rt::THEME);

    // presentation.xml references the master as rId1
    pres.relate_to(master.partname(), rt::SLIDE_MASTER);
    for (partname, content_type, reltype, xml) in [
        ("/ppt/presProps.xml", ct::PML_PRES_PROPS, rt::PRES_PROPS, PRES_PROPS_XML),
        ("/ppt/viewProps.xml", ct::PML_VIEW_PROPS, rt::VIEW_PROPS, VIEW_PROPS_XML),
        ("/ppt/tableStyles.xml", ct::PML_TABLE_STYLES, rt::TABLE_STYLES, TABLE_STYLES_XML),
    ] {
        let part = xml_part(partname, content_type, xml)?;
        pres.relate_to(part.partname(), reltype);
        package.add_part(part);
    }
    pres.relate_to(theme.partname(), rt::THEME);

    let app = xml_part("/docProps/app.xml", ct::OFC_EXTENDED_PROPERTIES, APP_XML)?;

    package.relate_to(pres.partname(), rt::OFFICE_DOCUMENT);
    package.relate_to(app.partname(), rt::EXTENDED_PROPERTIES);

    package.add_part(pres);
    package.add_part(master);
    package.add_part(theme);
    package.add_part(app);

    Ok(package)
}

/// Number of layouts in the built-in master.
pub const BLANK_LAYOUT_COUNT: usize = LAYOUTS.len();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::layout::{LayoutCatalog, SlideLayout};

    #[test]
    fn test_blank_package_layouts() {
        let package = blank_package().unwrap();
        let master = PackURI::new("/ppt/slideMasters/slideMaster1.xml").unwrap();
        let catalog = LayoutCatalog::from_package(&package, &master).unwrap();

        assert_eq!(catalog.len(), BLANK_LAYOUT_COUNT);
        let names: Vec<&str> = catalog.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Title Slide",
                "Title and Content",
                "Section Header",
                "Two Content",
                "Comparison",
                "Title Only",
                "Blank",
                "Content with Caption",
                "Picture with Caption",
                "Title and Vertical Text",
                "Vertical Title and Text",
            ]
        );
    }

    #[test]
    fn test_generated_layout_placeholders() {
        let xml = layout_xml(&LAYOUTS[8]).unwrap();
        let layout = SlideLayout::parse(
            PackURI::new("/ppt/slideLayouts/slideLayout9.xml").unwrap(),
            xml.as_bytes(),
        )
        .unwrap();

        // title, picture, caption + date/footer/number
        assert_eq!(layout.placeholders.len(), 6);
        assert_eq!(layout.placeholders[1].ph_type, PlaceholderType::Picture);
        assert_eq!(layout.slide_placeholders().count(), 3);
        assert_eq!(layout.placeholders[5].name, "Slide Number Placeholder 6");
    }

    #[test]
    fn test_blank_layout_has_no_slide_placeholders() {
        let xml = layout_xml(&LAYOUTS[6]).unwrap();
        let layout = SlideLayout::parse(
            PackURI::new("/ppt/slideLayouts/slideLayout7.xml").unwrap(),
            xml.as_bytes(),
        )
        .unwrap();
        assert_eq!(layout.name, "Blank");
        assert_eq!(layout.slide_placeholders().count(), 0);
        assert!(layout.title_placeholder().is_none());
    }

    #[test]
    fn test_package_relationships() {
        let package = blank_package().unwrap();
        let pres = package.main_document_part().unwrap();
        assert_eq!(pres.content_type(), ct::PML_PRESENTATION_MAIN);
        assert_eq!(
            pres.related_partname("rId1").unwrap().as_str(),
            "/ppt/slideMasters/slideMaster1.xml"
        );
    }
}
