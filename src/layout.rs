// Report assembly: places aggregated rows at fixed row/column positions.
// The positions are part of the output contract.
use crate::types::{
    AggregateBucket, InterventionEntry, NetworkPlan, NetworkPlanLine, StratificationBlock,
    StratificationTotal,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// Sparse sheet: only written cells are stored.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    cells: Vec<(u32, u16, CellValue)>,
}

impl Grid {
    pub fn text(&mut self, row: u32, col: u16, value: impl Into<String>) {
        self.cells.push((row, col, CellValue::Text(value.into())));
    }

    pub fn number(&mut self, row: u32, col: u16, value: f64) {
        self.cells.push((row, col, CellValue::Number(value)));
    }

    pub fn cells(&self) -> &[(u32, u16, CellValue)] {
        &self.cells
    }

    /// Last written value at a position.
    #[cfg(test)]
    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells
            .iter()
            .rev()
            .find(|(r, c, _)| *r == row && *c == col)
            .map(|(_, _, v)| v)
    }

    #[cfg(test)]
    pub fn row_count(&self) -> u32 {
        self.cells.iter().map(|(r, _, _)| r + 1).max().unwrap_or(0)
    }
}

pub const SCORECARD_HEADER_ROW: u32 = 2;
pub const SCORECARD_SUBHEADER_ROW: u32 = 3;
pub const SCORECARD_FIRST_DATA_ROW: u32 = 4;
/// Primary, Secondary, Vacant, Total, spacer.
pub const ROWS_PER_STRATIFICATION: u32 = 5;

pub const SCORECARD_HEADERS: [(u16, &str); 16] = [
    (0, "Stratification"),
    (1, "Store Category"),
    (2, "BAL"),
    (3, "TVS"),
    (5, "Store Gap"),
    (6, "Unique Location Gap"),
    (7, "IND S1"),
    (8, "S1 BAL Vol"),
    (9, "BAL MS"),
    (10, "S1 TVS Vol"),
    (11, "Vol Gap (TVS-BAL)"),
    (12, "CR"),
    (13, "Addition"),
    (15, "Reduction"),
    (17, "BAL Network Count @ UP 2.0"),
    (18, "Unique Location Gap post appointment"),
];

pub const SCORECARD_SUBHEADERS: [(u16, &str); 6] = [
    (3, "Primary"),
    (4, "Secondary"),
    (13, "Primary"),
    (14, "Secondary"),
    (15, "Primary"),
    (16, "Secondary"),
];

fn bucket_row(grid: &mut Grid, row: u32, b: &AggregateBucket) {
    grid.text(row, 1, b.category.label());
    grid.number(row, 2, b.store_count as f64);
    grid.number(row, 3, b.tvs_primary_count as f64);
    grid.number(row, 4, b.tvs_secondary_count as f64);
    grid.number(row, 5, b.store_gap as f64);
    grid.number(row, 6, b.unique_location_gap as f64);
    grid.number(row, 7, b.industry_volume);
    grid.number(row, 8, b.bal_volume);
    grid.number(row, 9, b.market_share);
    grid.number(row, 10, b.tvs_volume);
    grid.number(row, 11, b.volume_gap);
    grid.number(row, 12, b.conversion_ratio);
    grid.number(row, 13, b.addition_primary as f64);
    grid.number(row, 14, b.addition_secondary as f64);
    grid.number(row, 15, b.reduction_primary as f64);
    grid.number(row, 16, b.reduction_secondary as f64);
    grid.number(row, 17, b.post_network_count as f64);
    grid.number(row, 18, b.post_unique_location_gap as f64);
}

// Ratio columns 9 (BAL MS) and 12 (CR) stay blank on totals.
fn total_row(grid: &mut Grid, row: u32, t: &StratificationTotal) {
    grid.text(row, 1, "Total");
    grid.number(row, 2, t.store_count as f64);
    grid.number(row, 3, t.tvs_primary_count as f64);
    grid.number(row, 4, t.tvs_secondary_count as f64);
    grid.number(row, 5, t.store_gap as f64);
    grid.number(row, 6, t.unique_location_gap as f64);
    grid.number(row, 7, t.industry_volume);
    grid.number(row, 8, t.bal_volume);
    grid.number(row, 10, t.tvs_volume);
    grid.number(row, 11, t.volume_gap);
    grid.number(row, 13, t.addition_primary as f64);
    grid.number(row, 14, t.addition_secondary as f64);
    grid.number(row, 15, t.reduction_primary as f64);
    grid.number(row, 16, t.reduction_secondary as f64);
    grid.number(row, 17, t.post_network_count as f64);
    grid.number(row, 18, t.post_unique_location_gap as f64);
}

pub fn assemble_scorecard(town: &str, blocks: &[StratificationBlock]) -> Grid {
    let mut grid = Grid::default();
    grid.text(0, 0, format!("{} - Town Summary Scorecard", town));
    for (col, title) in SCORECARD_HEADERS {
        grid.text(SCORECARD_HEADER_ROW, col, title);
    }
    for (col, title) in SCORECARD_SUBHEADERS {
        grid.text(SCORECARD_SUBHEADER_ROW, col, title);
    }

    for (i, block) in blocks.iter().enumerate() {
        let first = SCORECARD_FIRST_DATA_ROW + i as u32 * ROWS_PER_STRATIFICATION;
        grid.text(first, 0, block.stratification.label());
        for (offset, bucket) in block.buckets.iter().enumerate() {
            bucket_row(&mut grid, first + offset as u32, bucket);
        }
        total_row(&mut grid, first + 3, &block.total);
    }
    grid
}

pub const PLAN_HEADER_ROW: u32 = 2;
pub const PLAN_FIRST_LINE_ROW: u32 = 3;
pub const INTERVENTION_TITLE_ROW: u32 = 8;
pub const INTERVENTION_HEADER_ROW: u32 = 9;
pub const INTERVENTION_FIRST_ROW: u32 = 10;

pub const PLAN_HEADERS: [&str; 8] = [
    "Category",
    "Pre Count",
    "Pre IND S1",
    "Post Count",
    "Post IND S1",
    "Count Change",
    "IND S1 Change",
    "Vol Gain / Coverage Gain",
];

pub const INTERVENTION_HEADERS: [&str; 9] = [
    "Town",
    "Location",
    "Stratification",
    "BAL Store Type",
    "TVS Store Type",
    "IND S1",
    "Nature of Intervention",
    "Network Intervention",
    "Remarks",
];

fn plan_line(grid: &mut Grid, row: u32, l: &NetworkPlanLine) {
    grid.text(row, 0, l.label.as_str());
    grid.number(row, 1, l.pre_count as f64);
    grid.number(row, 2, l.pre_industry_volume);
    grid.number(row, 3, l.post_count as f64);
    grid.number(row, 4, l.post_industry_volume);
    grid.number(row, 5, l.count_change as f64);
    grid.number(row, 6, l.volume_change);
    grid.number(row, 7, l.volume_per_coverage_gain);
}

fn intervention_row(grid: &mut Grid, row: u32, e: &InterventionEntry) {
    let texts = [
        (0, &e.town),
        (1, &e.location),
        (2, &e.stratification),
        (3, &e.bal_store_type),
        (4, &e.tvs_store_type),
        (6, &e.intervention_nature),
        (7, &e.network_intervention),
        (8, &e.remarks),
    ];
    for (col, value) in texts {
        if !value.is_empty() {
            grid.text(row, col, value.as_str());
        }
    }
    if let Some(volume) = e.industry_volume {
        grid.number(row, 5, volume);
    }
}

pub fn assemble_network_plan(town: &str, plan: &NetworkPlan) -> Grid {
    let mut grid = Grid::default();
    grid.text(0, 0, format!("{} - Network Plan", town));
    for (col, title) in PLAN_HEADERS.iter().enumerate() {
        grid.text(PLAN_HEADER_ROW, col as u16, *title);
    }
    for (i, l) in plan.lines.iter().enumerate() {
        plan_line(&mut grid, PLAN_FIRST_LINE_ROW + i as u32, l);
    }

    grid.text(INTERVENTION_TITLE_ROW, 0, "Network Interventions");
    for (col, title) in INTERVENTION_HEADERS.iter().enumerate() {
        grid.text(INTERVENTION_HEADER_ROW, col as u16, *title);
    }
    for (i, e) in plan.interventions.iter().enumerate() {
        intervention_row(&mut grid, INTERVENTION_FIRST_ROW + i as u32, e);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_town;
    use crate::network_plan::build_network_plan;
    use crate::types::{StoreRecord, Stratification};

    fn text(grid: &Grid, row: u32, col: u16) -> Option<String> {
        match grid.get(row, col) {
            Some(CellValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn number(grid: &Grid, row: u32, col: u16) -> Option<f64> {
        match grid.get(row, col) {
            Some(CellValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    fn sample() -> Vec<StoreRecord> {
        vec![
            StoreRecord {
                town: "Azamgarh".into(),
                stratification: Some(Stratification::LargeTown),
                bal_store_type: "MD".into(),
                industry_volume: Some(100.0),
                bal_volume: Some(40.0),
                ..Default::default()
            },
            StoreRecord {
                town: "Azamgarh".into(),
                stratification: Some(Stratification::Rural),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn scorecard_positions() {
        let grid = assemble_scorecard("Azamgarh", &aggregate_town(&sample(), false));
        assert_eq!(
            text(&grid, 0, 0).as_deref(),
            Some("Azamgarh - Town Summary Scorecard")
        );
        assert_eq!(text(&grid, 2, 3).as_deref(), Some("TVS"));
        assert_eq!(text(&grid, 3, 4).as_deref(), Some("Secondary"));

        // Large Town block starts at row 4
        assert_eq!(text(&grid, 4, 0).as_deref(), Some("Large Town"));
        assert_eq!(text(&grid, 4, 1).as_deref(), Some("Primary"));
        assert_eq!(number(&grid, 4, 2), Some(1.0));
        assert_eq!(number(&grid, 4, 9), Some(0.4));
        assert_eq!(text(&grid, 5, 0), None);
        assert_eq!(text(&grid, 6, 1).as_deref(), Some("Vacant"));
        assert_eq!(text(&grid, 7, 1).as_deref(), Some("Total"));
        assert_eq!(grid.get(8, 1), None);

        // Rural is the third block: row 4 + 2 * 5
        assert_eq!(text(&grid, 14, 0).as_deref(), Some("Rural"));
        assert_eq!(number(&grid, 16, 6), Some(1.0));

        // Deep Rural present even without data
        assert_eq!(text(&grid, 19, 0).as_deref(), Some("Deep Rural"));
        assert_eq!(number(&grid, 22, 2), Some(0.0));
        assert_eq!(grid.row_count(), 23);
    }

    #[test]
    fn total_rows_leave_ratios_blank() {
        let grid = assemble_scorecard("Azamgarh", &aggregate_town(&sample(), false));
        assert_eq!(number(&grid, 7, 2), Some(1.0));
        assert_eq!(number(&grid, 7, 8), Some(40.0));
        assert_eq!(grid.get(7, 9), None);
        assert_eq!(grid.get(7, 12), None);
    }

    #[test]
    fn network_plan_positions() {
        let mut records = sample();
        records[0].pre_network = "MD".into();
        records[0].post_network = "MD".into();
        records[1].network_intervention = "New ASD".into();
        records[1].location = "Lalganj".into();
        let grid = assemble_network_plan("Azamgarh", &build_network_plan(&records));

        assert_eq!(text(&grid, 0, 0).as_deref(), Some("Azamgarh - Network Plan"));
        assert_eq!(text(&grid, 2, 7).as_deref(), Some("Vol Gain / Coverage Gain"));
        assert_eq!(text(&grid, 3, 0).as_deref(), Some("Primary"));
        assert_eq!(number(&grid, 3, 1), Some(1.0));
        assert_eq!(number(&grid, 3, 2), Some(100.0));
        assert_eq!(text(&grid, 6, 0).as_deref(), Some("Total"));
        assert_eq!(text(&grid, 8, 0).as_deref(), Some("Network Interventions"));
        assert_eq!(text(&grid, 9, 1).as_deref(), Some("Location"));
        assert_eq!(text(&grid, 10, 1).as_deref(), Some("Lalganj"));
        assert_eq!(text(&grid, 10, 7).as_deref(), Some("New ASD"));
        assert_eq!(grid.get(10, 5), None);
    }
}
