/// Chart parts for PowerPoint presentations.
///
/// Corresponds to `/ppt/charts/chartN.xml`. Each chart carries its data in a
/// number cache and points at an embedded workbook holding the same table,
/// laid out as categories in column A and one series per column from B.
use crate::common::escape_xml;
use crate::error::{DeckError, Result};
use phf::phf_map;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Chart kinds that can be placed on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    ColumnClustered,
    BarClustered,
    Line,
    Pie,
    XyScatter,
}

static CHART_KINDS: phf::Map<&'static str, ChartKind> = phf_map! {
    "Column Clustered" => ChartKind::ColumnClustered,
    "Bar Clustered" => ChartKind::BarClustered,
    "Line" => ChartKind::Line,
    "Pie" => ChartKind::Pie,
    "XY Scatter" => ChartKind::XyScatter,
    "Scatter" => ChartKind::XyScatter,
};

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::ColumnClustered,
        ChartKind::BarClustered,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::XyScatter,
    ];

    /// Look up a kind by its display name, e.g. `"Column Clustered"`.
    pub fn from_name(name: &str) -> Option<Self> {
        CHART_KINDS.get(name.trim()).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ColumnClustered => "Column Clustered",
            Self::BarClustered => "Bar Clustered",
            Self::Line => "Line",
            Self::Pie => "Pie",
            Self::XyScatter => "XY Scatter",
        }
    }

    #[inline]
    fn has_axes(&self) -> bool {
        !matches!(self, Self::Pie)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
            .ok_or_else(|| DeckError::InvalidFormat(format!("Unknown chart kind: {}", s)))
    }
}

/// One named series of values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// The category/series table behind a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            categories,
            series: Vec::new(),
        }
    }

    pub fn add_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Categories A, B, C with a single series "Series 1" = 10, 20, 30.
    pub fn sample() -> Self {
        Self::new(vec!["A".to_string(), "B".to_string(), "C".to_string()])
            .add_series(ChartSeries::new("Series 1", vec![10.0, 20.0, 30.0]))
    }

    /// Number of data rows below the header row.
    pub fn row_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len())
            .chain(std::iter::once(self.categories.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Format a value the way spreadsheet caches store it: integers without a
/// fraction, everything else in shortest round-trip form.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let mut buffer = ryu::Buffer::new();
        buffer.format(value).to_string()
    }
}

/// Convert a 0-based column index to a spreadsheet column letter (0=A, 26=AA).
pub(crate) fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;

    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }

    result
}

/// Generate the chart part XML.
///
/// `workbook_r_id` is the chart part's relationship to its embedded workbook.
pub fn chart_xml(kind: ChartKind, data: &ChartData, workbook_r_id: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4096);
    write_chart(&mut out, kind, data, workbook_r_id)?;
    Ok(out)
}

fn write_chart<W: Write>(
    writer: &mut W,
    kind: ChartKind,
    data: &ChartData,
    workbook_r_id: &str,
) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#
    )?;
    write!(
        writer,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#
    )?;
    write!(
        writer,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    )?;
    write!(writer, r#"<c:date1904 val="0"/>"#)?;
    write!(writer, r#"<c:lang val="en-US"/>"#)?;
    write!(writer, r#"<c:roundedCorners val="0"/>"#)?;

    write!(writer, "<c:chart>")?;
    write!(writer, r#"<c:autoTitleDeleted val="0"/>"#)?;
    write!(writer, "<c:plotArea><c:layout/>")?;

    match kind {
        ChartKind::ColumnClustered => write_bar_chart(writer, data, "col")?,
        ChartKind::BarClustered => write_bar_chart(writer, data, "bar")?,
        ChartKind::Line => write_line_chart(writer, data)?,
        ChartKind::Pie => write_pie_chart(writer, data)?,
        ChartKind::XyScatter => write_scatter_chart(writer, data)?,
    }

    if kind.has_axes() {
        write_axes(writer, kind)?;
    }

    write!(writer, "</c:plotArea>")?;

    write!(writer, "<c:legend>")?;
    let legend_pos = if kind == ChartKind::Pie { "b" } else { "r" };
    write!(writer, r#"<c:legendPos val="{}"/>"#, legend_pos)?;
    write!(writer, r#"<c:overlay val="0"/>"#)?;
    write!(writer, "</c:legend>")?;

    write!(writer, r#"<c:plotVisOnly val="1"/>"#)?;
    write!(writer, r#"<c:dispBlanksAs val="gap"/>"#)?;
    write!(writer, "</c:chart>")?;

    write!(writer, r#"<c:externalData r:id="{}">"#, workbook_r_id)?;
    write!(writer, r#"<c:autoUpdate val="0"/>"#)?;
    write!(writer, "</c:externalData>")?;

    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_bar_chart<W: Write>(writer: &mut W, data: &ChartData, direction: &str) -> std::io::Result<()> {
    write!(writer, "<c:barChart>")?;
    write!(writer, r#"<c:barDir val="{}"/>"#, direction)?;
    write!(writer, r#"<c:grouping val="clustered"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (index, series) in data.series.iter().enumerate() {
        write_series_start(writer, index, series)?;
        write!(writer, r#"<c:invertIfNegative val="0"/>"#)?;
        write_categories(writer, data)?;
        write_values(writer, "c:val", index, series)?;
        write!(writer, "</c:ser>")?;
    }

    write!(writer, r#"<c:gapWidth val="150"/>"#)?;
    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:barChart>")?;

    Ok(())
}

fn write_line_chart<W: Write>(writer: &mut W, data: &ChartData) -> std::io::Result<()> {
    write!(writer, "<c:lineChart>")?;
    write!(writer, r#"<c:grouping val="standard"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (index, series) in data.series.iter().enumerate() {
        write_series_start(writer, index, series)?;
        write!(writer, r#"<c:marker><c:symbol val="none"/></c:marker>"#)?;
        write_categories(writer, data)?;
        write_values(writer, "c:val", index, series)?;
        write!(writer, r#"<c:smooth val="0"/>"#)?;
        write!(writer, "</c:ser>")?;
    }

    write!(writer, r#"<c:marker val="1"/>"#)?;
    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:lineChart>")?;

    Ok(())
}

fn write_pie_chart<W: Write>(writer: &mut W, data: &ChartData) -> std::io::Result<()> {
    write!(writer, "<c:pieChart>")?;
    write!(writer, r#"<c:varyColors val="1"/>"#)?;

    for (index, series) in data.series.iter().enumerate() {
        write_series_start(writer, index, series)?;
        write_categories(writer, data)?;
        write_values(writer, "c:val", index, series)?;
        write!(writer, "</c:ser>")?;
    }

    write!(writer, r#"<c:firstSliceAng val="0"/>"#)?;
    write!(writer, "</c:pieChart>")?;

    Ok(())
}

/// Scatter series plot against the category positions 1..=n.
fn write_scatter_chart<W: Write>(writer: &mut W, data: &ChartData) -> std::io::Result<()> {
    write!(writer, "<c:scatterChart>")?;
    write!(writer, r#"<c:scatterStyle val="lineMarker"/>"#)?;
    write!(writer, r#"<c:varyColors val="0"/>"#)?;

    for (index, series) in data.series.iter().enumerate() {
        write_series_start(writer, index, series)?;
        write!(
            writer,
            r#"<c:spPr><a:ln w="19050"><a:noFill/></a:ln></c:spPr>"#
        )?;

        write!(writer, "<c:xVal><c:numLit>")?;
        write!(writer, "<c:formatCode>General</c:formatCode>")?;
        write!(writer, r#"<c:ptCount val="{}"/>"#, series.values.len())?;
        for i in 0..series.values.len() {
            write!(writer, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, i + 1)?;
        }
        write!(writer, "</c:numLit></c:xVal>")?;

        write_values(writer, "c:yVal", index, series)?;
        write!(writer, r#"<c:smooth val="0"/>"#)?;
        write!(writer, "</c:ser>")?;
    }

    write!(writer, r#"<c:axId val="1"/><c:axId val="2"/>"#)?;
    write!(writer, "</c:scatterChart>")?;

    Ok(())
}

/// `c:ser` up to and including the series name reference.
fn write_series_start<W: Write>(
    writer: &mut W,
    index: usize,
    series: &ChartSeries,
) -> std::io::Result<()> {
    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{}"/>"#, index)?;
    write!(writer, r#"<c:order val="{}"/>"#, index)?;

    write!(writer, "<c:tx><c:strRef>")?;
    write!(writer, "<c:f>Sheet1!${}$1</c:f>", column_letter(index + 1))?;
    write!(writer, "<c:strCache>")?;
    write!(writer, r#"<c:ptCount val="1"/>"#)?;
    write!(
        writer,
        r#"<c:pt idx="0"><c:v>{}</c:v></c:pt>"#,
        escape_xml(&series.name)
    )?;
    write!(writer, "</c:strCache>")?;
    write!(writer, "</c:strRef></c:tx>")?;

    Ok(())
}

fn write_categories<W: Write>(writer: &mut W, data: &ChartData) -> std::io::Result<()> {
    let count = data.categories.len();

    write!(writer, "<c:cat><c:strRef>")?;
    write!(writer, "<c:f>Sheet1!$A$2:$A${}</c:f>", count + 1)?;
    write!(writer, "<c:strCache>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, count)?;
    for (i, category) in data.categories.iter().enumerate() {
        write!(
            writer,
            r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
            i,
            escape_xml(category)
        )?;
    }
    write!(writer, "</c:strCache>")?;
    write!(writer, "</c:strRef></c:cat>")?;

    Ok(())
}

fn write_values<W: Write>(
    writer: &mut W,
    tag: &str,
    index: usize,
    series: &ChartSeries,
) -> std::io::Result<()> {
    let column = column_letter(index + 1);
    let count = series.values.len();

    write!(writer, "<{}><c:numRef>", tag)?;
    write!(
        writer,
        "<c:f>Sheet1!${}$2:${}${}</c:f>",
        column,
        column,
        count + 1
    )?;
    write!(writer, "<c:numCache>")?;
    write!(writer, "<c:formatCode>General</c:formatCode>")?;
    write!(writer, r#"<c:ptCount val="{}"/>"#, count)?;
    for (i, value) in series.values.iter().enumerate() {
        write!(
            writer,
            r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
            i,
            format_number(*value)
        )?;
    }
    write!(writer, "</c:numCache>")?;
    write!(writer, "</c:numRef></{}>", tag)?;

    Ok(())
}

fn write_axes<W: Write>(writer: &mut W, kind: ChartKind) -> std::io::Result<()> {
    // Horizontal bars put the categories on the left edge
    let (cat_pos, val_pos) = if kind == ChartKind::BarClustered {
        ("l", "b")
    } else {
        ("b", "l")
    };

    if kind == ChartKind::XyScatter {
        write_value_axis(writer, 1, 2, cat_pos, "midCat", false)?;
    } else {
        write!(writer, "<c:catAx>")?;
        write_axis_common(writer, 1, 2, cat_pos, false)?;
        write!(writer, r#"<c:auto val="1"/>"#)?;
        write!(writer, r#"<c:lblAlgn val="ctr"/>"#)?;
        write!(writer, r#"<c:lblOffset val="100"/>"#)?;
        write!(writer, r#"<c:noMultiLvlLbl val="0"/>"#)?;
        write!(writer, "</c:catAx>")?;
    }

    let cross_between = if kind == ChartKind::XyScatter {
        "midCat"
    } else {
        "between"
    };
    write_value_axis(writer, 2, 1, val_pos, cross_between, true)
}

fn write_value_axis<W: Write>(
    writer: &mut W,
    axis_id: u32,
    cross_axis_id: u32,
    position: &str,
    cross_between: &str,
    gridlines: bool,
) -> std::io::Result<()> {
    write!(writer, "<c:valAx>")?;
    write_axis_common(writer, axis_id, cross_axis_id, position, gridlines)?;
    write!(writer, r#"<c:crossBetween val="{}"/>"#, cross_between)?;
    write!(writer, "</c:valAx>")?;
    Ok(())
}

fn write_axis_common<W: Write>(
    writer: &mut W,
    axis_id: u32,
    cross_axis_id: u32,
    position: &str,
    gridlines: bool,
) -> std::io::Result<()> {
    write!(writer, r#"<c:axId val="{}"/>"#, axis_id)?;
    write!(writer, r#"<c:scaling><c:orientation val="minMax"/></c:scaling>"#)?;
    write!(writer, r#"<c:delete val="0"/>"#)?;
    write!(writer, r#"<c:axPos val="{}"/>"#, position)?;
    if gridlines {
        write!(writer, "<c:majorGridlines/>")?;
    }
    write!(writer, r#"<c:numFmt formatCode="General" sourceLinked="1"/>"#)?;
    write!(writer, r#"<c:majorTickMark val="out"/>"#)?;
    write!(writer, r#"<c:minorTickMark val="none"/>"#)?;
    write!(writer, r#"<c:tickLblPos val="nextTo"/>"#)?;
    write!(writer, r#"<c:crossAx val="{}"/>"#, cross_axis_id)?;
    write!(writer, r#"<c:crosses val="autoZero"/>"#)?;
    Ok(())
}
