use std::io::{Read, Write};
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::data::filter::FilteredView;
use crate::data::model::{Record, COLUMN_HEADERS};

pub const CSV_FILE_NAME: &str = "filtered_data.csv";
pub const XLSX_FILE_NAME: &str = "filtered_data.xlsx";
/// Worksheet holding the exported rows.
pub const SHEET_NAME: &str = "Filtered";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV encoding failed")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet encoding failed")]
    Xlsx(#[from] XlsxError),
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_FILE_NAME,
            ExportFormat::Xlsx => XLSX_FILE_NAME,
        }
    }

    /// Encode the view in this format.
    pub fn encode(self, view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
        match self {
            ExportFormat::Csv => csv_bytes(view),
            ExportFormat::Xlsx => xlsx_bytes(view),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Header row plus one row per visible record, in view order.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<(), ExportError> {
    // Headers are written explicitly so an empty view still gets a header row.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(COLUMN_HEADERS)?;
    for r in view.iter() {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn csv_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

/// Parse records written by [`write_csv`]. Compliance is recomputed from the
/// target and achieved columns.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Record>, ExportError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr.deserialize::<Record>().collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// Single worksheet named [`SHEET_NAME`] with a bold header row.
pub fn xlsx_bytes(view: &FilteredView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(COLUMN_HEADERS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }
    for (row, r) in (1u32..).zip(view.iter()) {
        sheet.write_string(row, 0, r.entity().label())?;
        sheet.write_string(row, 1, r.indicator().label())?;
        sheet.write_number(row, 2, r.target_pct())?;
        sheet.write_number(row, 3, r.achieved_pct())?;
        sheet.write_number(row, 4, r.compliance_pct())?;
    }

    Ok(workbook.save_to_buffer()?)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Encode the view and write it to `path`, replacing any existing file.
pub fn save(view: &FilteredView<'_>, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    let bytes = format.encode(view)?;
    std::fs::write(path, bytes)?;
    log::info!(
        "exported {} rows as {} to {}",
        view.len(),
        format.extension(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use crate::data::filter::{filter, Selection};
    use crate::data::generator::{generate, GeneratorConfig};
    use crate::data::model::{Dataset, Entity, Indicator};

    #[test]
    fn csv_round_trip() {
        let ds = generate(&GeneratorConfig::default());
        let sel = Selection::new(
            [Entity::Cdmx, Entity::Jalisco, Entity::Puebla],
            Indicator::ALL,
        );
        let view = filter(&ds, &sel);
        let bytes = csv_bytes(&view).unwrap();
        let parsed = read_csv(bytes.as_slice()).unwrap();

        let expected: Vec<Record> = view.iter().cloned().collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn csv_layout() {
        let ds = Dataset::from_records(vec![Record::new(
            Entity::NuevoLeon,
            Indicator::BasicSanitation,
            80.0,
            90.0,
        )]);
        let view = filter(&ds, &Selection::all());
        let text = String::from_utf8(csv_bytes(&view).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "Entity,Indicator,Target (%),Achieved (%),Compliance (%)",
                "Nuevo León,Basic Sanitation,80.0,90.0,112.5",
            ]
        );
    }

    #[test]
    fn empty_view_still_has_header() {
        let ds = generate(&GeneratorConfig::default());
        let view = filter(&ds, &Selection::none());
        let text = String::from_utf8(csv_bytes(&view).unwrap()).unwrap();
        assert_eq!(text.trim_end(), COLUMN_HEADERS.join(","));
        assert!(read_csv(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn read_recomputes_compliance() {
        let text = "Entity,Indicator,Target (%),Achieved (%),Compliance (%)\n\
                    CDMX,Internet Access,80.0,60.0,999.0\n";
        let parsed = read_csv(text.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].compliance_pct(), 75.0);
    }

    #[test]
    fn read_rejects_unknown_labels() {
        let text = "Entity,Indicator,Target (%),Achieved (%)\nAtlantis,Internet Access,80,60\n";
        assert!(matches!(read_csv(text.as_bytes()), Err(ExportError::Csv(_))));
    }

    fn xlsx_rows(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), [SHEET_NAME]);
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(<[Data]>::to_vec).collect()
    }

    fn zip_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut text = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn xlsx_rows_match_csv_rows() {
        let ds = generate(&GeneratorConfig::default());
        let sel = Selection::new(
            [Entity::Cdmx, Entity::Jalisco, Entity::Puebla],
            Indicator::ALL,
        );
        let view = filter(&ds, &sel);
        assert!(!view.is_empty());

        let rows = xlsx_rows(xlsx_bytes(&view).unwrap());
        let header: Vec<Data> = COLUMN_HEADERS
            .iter()
            .map(|h| Data::String(h.to_string()))
            .collect();
        assert_eq!(rows[0], header);

        let from_csv: Vec<Vec<Data>> = read_csv(csv_bytes(&view).unwrap().as_slice())
            .unwrap()
            .iter()
            .map(|r| {
                vec![
                    Data::String(r.entity().label().to_string()),
                    Data::String(r.indicator().label().to_string()),
                    Data::Float(r.target_pct()),
                    Data::Float(r.achieved_pct()),
                    Data::Float(r.compliance_pct()),
                ]
            })
            .collect();
        assert_eq!(rows.len(), view.len() + 1);
        assert_eq!(rows[1..], from_csv[..]);
    }

    #[test]
    fn xlsx_has_one_named_sheet_and_bold_header() {
        let ds = generate(&GeneratorConfig::default());
        let view = filter(&ds, &Selection::none());
        let bytes = xlsx_bytes(&view).unwrap();

        let workbook = zip_entry(&bytes, "xl/workbook.xml");
        assert!(workbook.contains(r#"name="Filtered""#), "{workbook}");
        assert_eq!(workbook.matches("<sheet ").count(), 1);
        assert!(zip_entry(&bytes, "xl/styles.xml").contains("<b/>"));

        assert_eq!(xlsx_rows(bytes).len(), 1);
    }

    #[test]
    fn save_writes_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let ds = generate(&GeneratorConfig::default());
        let view = filter(&ds, &Selection::all());

        for format in [ExportFormat::Csv, ExportFormat::Xlsx] {
            let path = dir.path().join(format.default_file_name());
            save(&view, &path, format).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }

        let csv_path = dir.path().join(CSV_FILE_NAME);
        let parsed = read_csv(std::fs::File::open(csv_path).unwrap()).unwrap();
        assert_eq!(parsed.len(), view.len());
    }
}
