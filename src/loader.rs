use crate::columns::{ColumnMap, Field};
use crate::error::{ReportError, Result};
use crate::types::{Stratification, StoreRecord};
use crate::util::{clean_header, is_blank_text, parse_f64_safe};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::info;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub dropped_rows: usize,
}

/// Everything derived from one input file: records plus the column map they
/// were read with.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: ColumnMap,
    pub records: Vec<StoreRecord>,
    pub report: LoadReport,
}

impl Dataset {
    /// Town names in order of first appearance.
    pub fn towns(&self) -> Vec<String> {
        let mut towns: Vec<String> = Vec::new();
        for r in &self.records {
            if !towns.iter().any(|t| t == &r.town) {
                towns.push(r.town.clone());
            }
        }
        towns
    }

    /// Records of one town, in source order.
    pub fn town_records(&self, town: &str) -> Vec<StoreRecord> {
        self.records
            .iter()
            .filter(|r| r.town == town)
            .cloned()
            .collect()
    }
}

/// Read the file into rows of text cells; CSV unless the extension names a
/// workbook format.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        read_workbook_rows(path, sheet)
    } else {
        read_csv_rows(path)
    }
}

fn unreadable(path: &Path, reason: impl ToString) -> ReportError {
    ReportError::Unreadable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| unreadable(path, e))?;
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| unreadable(path, e))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(path, e))?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| unreadable(path, "workbook contains no sheets"))?,
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| unreadable(path, format!("sheet '{}': {}", sheet_name, e)))?;
    // The range begins at the first non-empty cell; pad back to A1 so row
    // indices match the sheet.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }
    Ok(rows)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integers without decimals, as they appear in the sheet
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{}", n),
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

/// Split raw rows at the stated header row and turn the data rows into
/// records. Rows without a town, or whose town is a "Total" line, are dropped.
pub fn build_dataset(rows: Vec<Vec<String>>, header_row: usize) -> Result<Dataset> {
    if header_row >= rows.len() {
        return Err(ReportError::HeaderRowOutOfRange {
            row: header_row,
            rows: rows.len(),
        });
    }
    let headers: Vec<String> = rows[header_row].iter().map(|h| clean_header(h)).collect();
    let columns = ColumnMap::resolve(&headers);
    let town_idx = columns.require(Field::Town)?;

    let mut total_rows = 0usize;
    let mut records = Vec::new();
    for row in rows.iter().skip(header_row + 1) {
        total_rows += 1;
        let town = cell(row, Some(town_idx));
        if is_blank_text(&town) || town.to_lowercase().contains("total") {
            continue;
        }
        records.push(to_record(row, &columns, town));
    }

    let kept_rows = records.len();
    let report = LoadReport {
        total_rows,
        kept_rows,
        dropped_rows: total_rows - kept_rows,
    };
    Ok(Dataset {
        columns,
        records,
        report,
    })
}

pub fn load(path: &Path, sheet: Option<&str>, header_row: usize) -> Result<Dataset> {
    let rows = read_rows(path, sheet)?;
    let dataset = build_dataset(rows, header_row)?;
    info!(
        path = %path.display(),
        rows = dataset.report.total_rows,
        kept = dataset.report.kept_rows,
        "loaded input"
    );
    Ok(dataset)
}

fn cell(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Text of a field, with "no value" markers folded to empty.
fn text(row: &[String], columns: &ColumnMap, field: Field) -> String {
    let value = cell(row, columns.get(field));
    if is_blank_text(&value) {
        String::new()
    } else {
        value
    }
}

fn number(row: &[String], columns: &ColumnMap, field: Field) -> Option<f64> {
    let value = cell(row, columns.get(field));
    parse_f64_safe(Some(&value))
}

fn to_record(row: &[String], columns: &ColumnMap, town: String) -> StoreRecord {
    let stratification_text = text(row, columns, Field::Stratification);
    let bal_store_type = text(row, columns, Field::BalStoreType);
    // Network Plan falls back to the current store type, then to the pre-network view.
    let pre_network = if columns.has(Field::PreNetwork) {
        text(row, columns, Field::PreNetwork)
    } else {
        bal_store_type.clone()
    };
    let post_network = if columns.has(Field::PostNetwork) {
        text(row, columns, Field::PostNetwork)
    } else {
        pre_network.clone()
    };
    StoreRecord {
        town,
        location: text(row, columns, Field::Location),
        stratification: Stratification::parse(&stratification_text),
        stratification_text,
        bal_store_type,
        tvs_store_type: text(row, columns, Field::TvsStoreType),
        industry_volume: number(row, columns, Field::IndustryVolume),
        bal_volume: number(row, columns, Field::BalVolume),
        tvs_volume: number(row, columns, Field::TvsVolume),
        conversion_ratio: number(row, columns, Field::ConversionRatio),
        intervention_nature: text(row, columns, Field::InterventionNature),
        network_intervention: text(row, columns, Field::NetworkIntervention),
        closed_status: text(row, columns, Field::Closed),
        pre_network,
        post_network,
        remarks: text(row, columns, Field::Remarks),
    }
}
