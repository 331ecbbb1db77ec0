use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use zip::write::FileOptions;
use zip::ZipWriter;

use super::report::MetadataReport;
use crate::data::model::{CleanDataset, FilledData};
use crate::error::CleanError;

/// Sheet holding the cleaned dataset (header row + data rows, no index).
pub const DATA_SHEET: &str = "Cleaned Data";
/// Sheet holding the per-column audit summary.
pub const REPORT_SHEET: &str = "Metadata Report";

// ---------------------------------------------------------------------------
// Workbook writer
// ---------------------------------------------------------------------------

/// Persist the cleaned dataset and its metadata report as one `.xlsx`
/// workbook with two sheets, overwriting any artifact from a previous run.
/// The output directory is created if it does not exist.
///
/// The workbook is written as a direct ZIP/XML package with inline-string
/// cells, which keeps the artifact self-contained (no shared-strings part).
pub fn write_workbook(
    dataset: &CleanDataset,
    report: &MetadataReport,
    path: &Path,
) -> Result<PathBuf, CleanError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CleanError::write(path, e))?;
    }

    let file = File::create(path).map_err(|e| CleanError::write(path, e))?;
    write_parts(file, dataset, report).map_err(|e| CleanError::write(path, e))?;

    debug!(
        "wrote {} data rows and {} report rows to {}",
        dataset.row_count(),
        report.columns.len(),
        path.display()
    );
    Ok(path.to_path_buf())
}

fn write_parts(
    file: File,
    dataset: &CleanDataset,
    report: &MetadataReport,
) -> Result<(), zip::result::ZipError> {
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(RELS_XML.as_bytes())?;

    zip.start_file("docProps/core.xml", options)?;
    zip.write_all(CORE_PROPS_XML.as_bytes())?;

    zip.start_file("docProps/app.xml", options)?;
    zip.write_all(APP_PROPS_XML.as_bytes())?;

    zip.start_file("xl/workbook.xml", options)?;
    zip.write_all(workbook_xml().as_bytes())?;

    zip.start_file("xl/_rels/workbook.xml.rels", options)?;
    zip.write_all(WORKBOOK_RELS_XML.as_bytes())?;

    zip.start_file("xl/styles.xml", options)?;
    zip.write_all(STYLES_XML.as_bytes())?;

    zip.start_file("xl/worksheets/sheet1.xml", options)?;
    zip.write_all(sheet_xml(&data_rows(dataset)).as_bytes())?;

    zip.start_file("xl/worksheets/sheet2.xml", options)?;
    zip.write_all(sheet_xml(&report_rows(report)).as_bytes())?;

    zip.finish()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sheet content
// ---------------------------------------------------------------------------

enum SheetCell {
    Text(String),
    Number(f64),
}

/// Header row plus one row per dataset row, column order preserved.
fn data_rows(dataset: &CleanDataset) -> Vec<Vec<SheetCell>> {
    let mut rows = Vec::with_capacity(dataset.row_count() + 1);
    rows.push(
        dataset
            .columns
            .iter()
            .map(|c| SheetCell::Text(c.name.clone()))
            .collect(),
    );

    for row in 0..dataset.row_count() {
        rows.push(
            dataset
                .columns
                .iter()
                .map(|column| match &column.data {
                    FilledData::Numeric(v) => SheetCell::Number(v[row]),
                    FilledData::Date(v) => {
                        SheetCell::Text(v[row].format("%Y-%m-%d").to_string())
                    }
                    FilledData::Categorical(v) => SheetCell::Text(v[row].clone()),
                })
                .collect(),
        );
    }
    rows
}

/// One row per final column, indexed by column name.
fn report_rows(report: &MetadataReport) -> Vec<Vec<SheetCell>> {
    let mut rows = Vec::with_capacity(report.columns.len() + 1);
    rows.push(
        [
            "Column",
            "Original Header",
            "Mapped Header",
            "Column Type",
            "Missing Values",
            "Unique Values",
        ]
        .into_iter()
        .map(|s| SheetCell::Text(s.to_string()))
        .collect(),
    );

    for summary in &report.columns {
        rows.push(vec![
            SheetCell::Text(summary.name.clone()),
            SheetCell::Text(summary.original_name.clone()),
            SheetCell::Text(summary.name.clone()),
            SheetCell::Text(summary.column_type.to_string()),
            SheetCell::Number(summary.missing_values as f64),
            SheetCell::Number(summary.distinct_values as f64),
        ]);
    }
    rows
}

// ---------------------------------------------------------------------------
// XML parts
// ---------------------------------------------------------------------------

fn sheet_xml(rows: &[Vec<SheetCell>]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>
"#,
    );

    for (row_index, row) in rows.iter().enumerate() {
        let row_number = row_index + 1;
        xml.push_str(&format!(r#"<row r="{row_number}">"#));
        for (col_index, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{row_number}", column_letters(col_index));
            match cell {
                SheetCell::Text(text) => xml.push_str(&format!(
                    r#"<c r="{cell_ref}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape_xml(text)
                )),
                SheetCell::Number(value) => {
                    xml.push_str(&format!(r#"<c r="{cell_ref}"><v>{value}</v></c>"#))
                }
            }
        }
        xml.push_str("</row>\n");
    }

    xml.push_str("</sheetData>\n</worksheet>");
    xml
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="{DATA_SHEET}" sheetId="1" r:id="rId1"/>
<sheet name="{REPORT_SHEET}" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#
    )
}

/// Spreadsheet column letters: 0 → A, 25 → Z, 26 → AA.
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>
</styleSheet>"#;

const CORE_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>Cleaned dataset</dc:title>
<dc:creator>tidylab</dc:creator>
<cp:lastModifiedBy>tidylab</cp:lastModifiedBy>
<cp:revision>1</cp:revision>
</cp:coreProperties>"#;

const APP_PROPS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
<Application>tidylab</Application>
<DocSecurity>0</DocSecurity>
<ScaleCrop>false</ScaleCrop>
<SharedDoc>false</SharedDoc>
<HyperlinksChanged>false</HyperlinksChanged>
<AppVersion>1.0000</AppVersion>
</Properties>"#;
