/// Notes slides and the notes master they hang off.
use crate::error::Result;
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::{OpcPackage, PackURI, Part};
use crate::pptx::parts::{PresentationPart, insert_notes_master_id};
use crate::pptx::template::{NOTES_MASTER_XML, THEME_XML};
use crate::pptx::text::TextFrame;

/// Generate notes slide XML holding `text`, one paragraph per line.
pub fn notes_slide_xml(text: &str) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<p:notes xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    );
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    );
    xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

    xml.push_str("<p:cSld>");
    xml.push_str("<p:spTree>");

    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str(r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm>"#);
    xml.push_str("</p:grpSpPr>");

    // Slide thumbnail
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr>");
    xml.push_str("<p:spPr/>");
    xml.push_str("</p:sp>");

    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="3" name="Notes Placeholder 2"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr>");
    xml.push_str("<p:spPr/>");
    xml.push_str("<p:txBody>");
    xml.push_str("<a:bodyPr/>");
    xml.push_str("<a:lstStyle/>");
    TextFrame::new(text).write_paragraphs(&mut xml)?;
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
    xml.push_str("</p:notes>");

    Ok(xml)
}

/// Return the notes master of the presentation, adding the default one (with
/// its own theme) when the package has none.
pub fn ensure_notes_master(package: &mut OpcPackage, pres_partname: &PackURI) -> Result<PackURI> {
    let pres_part = package.part(pres_partname)?;
    if let Ok(partname) = pres_part.part_related_by(rt::NOTES_MASTER) {
        return Ok(partname);
    }

    let master_partname = package.next_partname("/ppt/notesMasters/notesMaster%d.xml")?;
    let theme_partname = package.next_partname("/ppt/theme/theme%d.xml")?;
    log::debug!(
        "Adding notes master {} with theme {}",
        master_partname,
        theme_partname
    );

    let mut master = Part::new(
        master_partname.clone(),
        ct::PML_NOTES_MASTER,
        NOTES_MASTER_XML.as_bytes().to_vec(),
    );
    master.relate_to(&theme_partname, rt::THEME);
    package.add_part(Part::new(
        theme_partname,
        ct::OFC_THEME,
        THEME_XML.as_bytes().to_vec(),
    ));
    package.add_part(master);

    let pres_part = package.part_mut(pres_partname)?;
    let r_id = pres_part.relate_to(&master_partname, rt::NOTES_MASTER);
    // A template may list a notes master whose part went missing
    if PresentationPart::parse(pres_part.blob())?.notes_master_r_id.is_none() {
        let xml = insert_notes_master_id(pres_part.xml_str()?, &r_id)?;
        pres_part.set_blob(xml.into_bytes());
    }

    Ok(master_partname)
}
