//! Excel workbook embedding for chart data.
//!
//! Generates a minimal XLSX package holding a chart's table so the chart
//! can be edited in PowerPoint. The workbook is itself an OPC package and is
//! assembled with the same package writer as the presentation.

use crate::common::escape_xml;
use crate::error::Result;
use crate::opc::constants::{content_type as ct, relationship_type as rt};
use crate::opc::{OpcPackage, PackURI, Part};
use crate::pptx::chart::{ChartData, column_letter, format_number};
use std::fmt::Write;

const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

/// Generate a minimal Excel workbook containing chart data.
///
/// # Example Layout
/// ```text
///     |    A     |    B     |
/// ----+----------+----------+
///   1 |          | Series 1 |
///   2 | A        |    10    |
///   3 | B        |    20    |
///   4 | C        |    30    |
/// ```
pub fn generate_chart_workbook(data: &ChartData) -> Result<Vec<u8>> {
    let mut package = OpcPackage::new();

    let mut workbook = Part::new(
        PackURI::new("/xl/workbook.xml")?,
        ct::SML_SHEET_MAIN,
        WORKBOOK_XML.as_bytes().to_vec(),
    );
    let sheet = Part::new(
        PackURI::new("/xl/worksheets/sheet1.xml")?,
        ct::SML_WORKSHEET,
        generate_worksheet_xml(data)?.into_bytes(),
    );
    let styles = Part::new(
        PackURI::new("/xl/styles.xml")?,
        ct::SML_STYLES,
        STYLES_XML.as_bytes().to_vec(),
    );

    // workbook.xml names the sheet by rId1
    workbook.relate_to(sheet.partname(), rt::WORKSHEET);
    workbook.relate_to(styles.partname(), rt::STYLES);
    package.relate_to(workbook.partname(), rt::OFFICE_DOCUMENT);

    package.add_part(workbook);
    package.add_part(sheet);
    package.add_part(styles);

    Ok(package.to_bytes()?)
}

/// Generate xl/worksheets/sheet1.xml with chart data.
fn generate_worksheet_xml(data: &ChartData) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    // Row 1: series names from column B; A1 stays empty
    xml.push_str(r#"<row r="1">"#);
    for (col_idx, series) in data.series.iter().enumerate() {
        write!(
            xml,
            r#"<c r="{}1" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letter(col_idx + 1),
            escape_xml(&series.name)
        )?;
    }
    xml.push_str("</row>");

    for row_idx in 0..data.row_count() {
        let row_num = row_idx + 2;
        write!(xml, r#"<row r="{}">"#, row_num)?;

        if let Some(category) = data.categories.get(row_idx) {
            write!(
                xml,
                r#"<c r="A{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                row_num,
                escape_xml(category)
            )?;
        }

        for (col_idx, series) in data.series.iter().enumerate() {
            if let Some(value) = series.values.get(row_idx) {
                write!(
                    xml,
                    r#"<c r="{}{}"><v>{}</v></c>"#,
                    column_letter(col_idx + 1),
                    row_num,
                    format_number(*value)
                )?;
            }
        }

        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");
    xml.push_str("</worksheet>");

    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::chart::ChartSeries;
    use proptest::prelude::*;

    #[test]
    fn test_sample_worksheet() {
        let xml = generate_worksheet_xml(&ChartData::sample()).unwrap();
        assert!(xml.contains(r#"<c r="B1" t="inlineStr"><is><t>Series 1</t></is></c>"#));
        assert!(xml.contains(r#"<c r="A3" t="inlineStr"><is><t>B</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B4"><v>30</v></c>"#));
        assert!(!xml.contains(r#"r="A1""#));
    }

    #[test]
    fn test_workbook_package() {
        let bytes = generate_chart_workbook(&ChartData::sample()).unwrap();
        assert_eq!(&bytes[0..4], &[0x50, 0x4B, 0x03, 0x04]);

        let package = OpcPackage::from_bytes(&bytes).unwrap();
        let workbook = package.main_document_part().unwrap();
        assert_eq!(workbook.content_type(), ct::SML_SHEET_MAIN);
        assert_eq!(
            workbook.related_partname("rId1").unwrap().as_str(),
            "/xl/worksheets/sheet1.xml"
        );
        assert_eq!(package.part_count(), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_every_value_has_a_cell(
            values in prop::collection::vec(-1000.0f64..1000.0f64, 1..12),
        ) {
            let categories = (0..values.len()).map(|i| format!("Cat {}", i)).collect();
            let data = ChartData::new(categories).add_series(ChartSeries::new("S", values.clone()));
            let xml = generate_worksheet_xml(&data).unwrap();

            prop_assert_eq!(xml.matches("<row ").count(), values.len() + 1);
            let last = format!(r#"<c r="B{}">"#, values.len() + 1);
            prop_assert!(xml.contains(&last));
        }
    }
}
