use crate::error::Result;
use crate::layout::{CellValue, Grid};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub const SCORECARD_SHEET: &str = "Scorecard";
pub const NETWORK_PLAN_SHEET: &str = "Network Plan";

/// Write each grid to its own worksheet, cells at their grid positions.
pub fn write_xlsx(path: &Path, sheets: &[(&str, &Grid)]) -> Result<()> {
    let mut workbook = Workbook::new();
    for (name, grid) in sheets {
        let worksheet = workbook.add_worksheet().set_name(*name)?;
        for (row, col, value) in grid.cells() {
            match value {
                CellValue::Text(s) => {
                    worksheet.write_string(*row, *col, s)?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(*row, *col, *n)?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto, Data, Reader};

    #[test]
    fn xlsx_sheets_keep_names_and_positions() {
        let mut scorecard = Grid::default();
        scorecard.text(0, 0, "Mau - Town Summary Scorecard");
        scorecard.number(4, 2, 3.0);
        let mut plan = Grid::default();
        plan.text(8, 0, "Network Interventions");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Mau.xlsx");
        write_xlsx(
            &path,
            &[(SCORECARD_SHEET, &scorecard), (NETWORK_PLAN_SHEET, &plan)],
        )
        .unwrap();

        let mut wb = open_workbook_auto(&path).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Scorecard", "Network Plan"]);
        let range = wb.worksheet_range("Scorecard").unwrap();
        assert_eq!(
            range.get_value((0, 0)),
            Some(&Data::String("Mau - Town Summary Scorecard".into()))
        );
        assert_eq!(range.get_value((4, 2)), Some(&Data::Float(3.0)));
        let range = wb.worksheet_range("Network Plan").unwrap();
        assert_eq!(
            range.get_value((8, 0)),
            Some(&Data::String("Network Interventions".into()))
        );
    }

    #[test]
    fn json_summary_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &serde_json::json!({"towns_written": 2})).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"towns_written\": 2"));
    }
}
