use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};

use super::model::{Cell, DataError, HeaderMatch, RawSample, Series, TEMP_LABEL, TIME_LABEL};
use super::normalize;

/// Header row must appear within the first this-many rows of the table.
const HEADER_SCAN_ROWS: usize = 10;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a temperature series from a document.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first sheet, first table
/// * `.csv` – same layout, read as untyped text cells
pub fn load_document(path: &Path) -> Result<Series> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path)?,
        "csv" => read_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let header = find_header_row(&rows)?;
    let raw = extract_samples(&rows, &header)?;
    let series = normalize::normalize(raw)?;

    log::info!(
        "Loaded {} samples from {} (header at row {})",
        series.len(),
        path.display(),
        header.row_index
    );
    Ok(series)
}

// ---------------------------------------------------------------------------
// Spreadsheet reader (calamine)
// ---------------------------------------------------------------------------

fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("document has no sheets")?
        .context("reading first sheet")?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Ok(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(t) => Cell::DateTime(t),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV files are read headerless: the header row is located by the same
/// label scan as spreadsheets, so leading title/junk rows are tolerated.
fn read_csv(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Column Locator
// ---------------------------------------------------------------------------

/// Scan the first `min(10, row_count)` rows for the header row: one cell
/// exactly equal to [`TIME_LABEL`] (after trimming) and at least one cell
/// containing [`TEMP_LABEL`] as a substring.
pub fn find_header_row(rows: &[Vec<Cell>]) -> Result<HeaderMatch, DataError> {
    for (row_index, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let texts: Vec<Option<String>> = row
            .iter()
            .map(|c| match c {
                Cell::Text(s) => Some(s.trim().to_string()),
                other => other.text(),
            })
            .collect();

        let time_column = texts
            .iter()
            .position(|t| t.as_deref() == Some(TIME_LABEL));
        let temperature_column = texts
            .iter()
            .position(|t| t.as_deref().is_some_and(|s| s.contains(TEMP_LABEL)));

        if let (Some(time_column), Some(temperature_column)) = (time_column, temperature_column) {
            return Ok(HeaderMatch {
                row_index,
                time_column,
                temperature_column,
            });
        }
    }
    Err(DataError::HeaderNotFound)
}

// ---------------------------------------------------------------------------
// Series Builder
// ---------------------------------------------------------------------------

/// Collect (time, temperature) text pairs from every row below the header.
/// Rows missing either cell are skipped; an all-skipped table is an error.
pub fn extract_samples(
    rows: &[Vec<Cell>],
    header: &HeaderMatch,
) -> Result<Vec<RawSample>, DataError> {
    let mut samples = Vec::new();
    for row in rows.iter().skip(header.row_index + 1) {
        let time = row.get(header.time_column).and_then(Cell::text);
        let temperature = row.get(header.temperature_column).and_then(Cell::text);
        if let (Some(time_text), Some(temperature_text)) = (time, temperature) {
            samples.push(RawSample {
                time_text,
                temperature_text,
            });
        }
    }
    if samples.is_empty() {
        return Err(DataError::EmptyDataset);
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn header_found_with_exact_and_substring_labels() {
        let rows = vec![
            vec![text("房间温度记录")],
            vec![text("备注"), text(" 时间 "), text("室内温度(°C)")],
            vec![text("-"), text("2024-01-01 10:00"), text("21.5°C")],
        ];
        let header = find_header_row(&rows).unwrap();
        assert_eq!(
            header,
            HeaderMatch {
                row_index: 1,
                time_column: 1,
                temperature_column: 2,
            }
        );
    }

    #[test]
    fn header_requires_both_labels_in_one_row() {
        let rows = vec![
            vec![text("时间")],
            vec![text("温度")],
        ];
        assert_eq!(find_header_row(&rows), Err(DataError::HeaderNotFound));
    }

    #[test]
    fn header_beyond_scan_window_is_not_found() {
        let mut rows: Vec<Vec<Cell>> = (0..10).map(|_| vec![text("x")]).collect();
        rows.push(vec![text("时间"), text("温度")]);
        assert_eq!(find_header_row(&rows), Err(DataError::HeaderNotFound));
    }

    #[test]
    fn substring_match_is_not_used_for_time_label() {
        // "测量时间" contains but does not equal the time label.
        let rows = vec![vec![text("测量时间"), text("温度")]];
        assert_eq!(find_header_row(&rows), Err(DataError::HeaderNotFound));
    }

    #[test]
    fn rows_missing_either_cell_are_skipped() {
        let header = HeaderMatch {
            row_index: 0,
            time_column: 0,
            temperature_column: 1,
        };
        let rows = vec![
            vec![text("时间"), text("温度")],
            vec![text("2024-01-01 10:00"), text("21.5°C")],
            vec![text("2024-01-01 10:10"), Cell::Empty],
            vec![Cell::Empty, text("22.0°C")],
            vec![text("2024-01-01 10:30")], // short row
        ];
        let samples = extract_samples(&rows, &header).unwrap();
        assert_eq!(
            samples,
            vec![RawSample {
                time_text: "2024-01-01 10:00".into(),
                temperature_text: "21.5°C".into(),
            }]
        );
    }

    #[test]
    fn all_rows_invalid_is_an_empty_dataset() {
        let header = HeaderMatch {
            row_index: 0,
            time_column: 0,
            temperature_column: 1,
        };
        let rows = vec![
            vec![text("时间"), text("温度")],
            vec![text("2024-01-01 10:00"), Cell::Empty],
            vec![Cell::Empty, text("22.0°C")],
        ];
        assert_eq!(extract_samples(&rows, &header), Err(DataError::EmptyDataset));
    }

    #[test]
    fn no_data_rows_at_all_is_an_empty_dataset() {
        let header = HeaderMatch {
            row_index: 0,
            time_column: 0,
            temperature_column: 1,
        };
        let rows = vec![vec![text("时间"), text("温度")]];
        assert_eq!(extract_samples(&rows, &header), Err(DataError::EmptyDataset));
    }
}
