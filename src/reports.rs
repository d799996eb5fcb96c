// Per-town report generation and the batch loop over towns.
use crate::aggregate::aggregate_town;
use crate::columns::{ColumnMap, Field};
use crate::config::Config;
use crate::error::Result;
use crate::layout::{assemble_network_plan, assemble_scorecard, Grid};
use crate::loader::Dataset;
use crate::network_plan::build_network_plan;
use crate::output::{self, NETWORK_PLAN_SHEET, SCORECARD_SHEET};
use crate::types::{
    NetworkPlan, RunSummary, ScorecardPreviewRow, StoreRecord, StratificationBlock, TownFailure,
};
use crate::util::{format_int, format_number, sanitize_file_name};
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct TownReport {
    pub town: String,
    pub blocks: Vec<StratificationBlock>,
    pub plan: NetworkPlan,
    pub scorecard: Grid,
    pub network_plan: Grid,
}

/// Build both tabs for one town. `records` are the town's unfiltered rows;
/// closed stores are removed for the scorecard only.
pub fn generate_town(town: &str, records: &[StoreRecord], columns: &ColumnMap) -> Result<TownReport> {
    columns.require(Field::Stratification)?;
    let blocks = aggregate_town(records, columns.has(Field::ConversionRatio));
    let plan = build_network_plan(records);
    let scorecard = assemble_scorecard(town, &blocks);
    let network_plan = assemble_network_plan(town, &plan);
    Ok(TownReport {
        town: town.to_string(),
        blocks,
        plan,
        scorecard,
        network_plan,
    })
}

pub fn preview_rows(blocks: &[StratificationBlock]) -> Vec<ScorecardPreviewRow> {
    let mut rows = Vec::new();
    for block in blocks {
        for (i, b) in block.buckets.iter().enumerate() {
            rows.push(ScorecardPreviewRow {
                stratification: if i == 0 {
                    block.stratification.label().to_string()
                } else {
                    String::new()
                },
                category: b.category.label().to_string(),
                store_count: format_int(b.store_count),
                tvs_primary: format_int(b.tvs_primary_count),
                tvs_secondary: format_int(b.tvs_secondary_count),
                store_gap: format_int(b.store_gap),
                industry_volume: format_number(b.industry_volume, 0),
                market_share: format_number(b.market_share * 100.0, 1) + "%",
                volume_gap: format_number(b.volume_gap, 0),
                post_network_count: format_int(b.post_network_count),
            });
        }
        let t = &block.total;
        rows.push(ScorecardPreviewRow {
            stratification: String::new(),
            category: "Total".to_string(),
            store_count: format_int(t.store_count),
            tvs_primary: format_int(t.tvs_primary_count),
            tvs_secondary: format_int(t.tvs_secondary_count),
            store_gap: format_int(t.store_gap),
            industry_volume: format_number(t.industry_volume, 0),
            market_share: String::new(),
            volume_gap: format_number(t.volume_gap, 0),
            post_network_count: format_int(t.post_network_count),
        });
    }
    rows
}

/// Batch folder name for a run started at `now`.
pub fn batch_name(now: DateTime<Local>) -> String {
    format!("scorecards_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Directory for a batch under `output_dir`. An existing folder of the same
/// name is never reused; `_2`, `_3`, ... is appended instead.
fn fresh_batch_dir(output_dir: &Path, batch: &str) -> (PathBuf, String) {
    let mut name = batch.to_string();
    let mut n = 2;
    while output_dir.join(&name).exists() {
        name = format!("{}_{}", batch, n);
        n += 1;
    }
    (output_dir.join(&name), name)
}

/// File name for a town's workbook, unique within the batch.
fn workbook_path(dir: &Path, town: &str, taken: &mut HashSet<String>) -> PathBuf {
    let base = sanitize_file_name(town);
    let mut name = base.clone();
    let mut n = 2;
    while !taken.insert(name.to_lowercase()) {
        name = format!("{}_{}", base, n);
        n += 1;
    }
    dir.join(format!("{}.xlsx", name))
}

/// Generate every selected town of the dataset into `<output_dir>/<batch>/`.
/// The summary's `batch` carries the folder name actually used.
///
/// A town that cannot be generated (e.g. the stratification column is
/// missing) is reported and recorded in the summary; the other towns still
/// run. Write failures abort the run.
pub fn generate_all(dataset: &Dataset, config: &Config, batch: &str) -> Result<RunSummary> {
    let (batch_dir, batch) = fresh_batch_dir(&config.output_dir, batch);
    std::fs::create_dir_all(&batch_dir)?;
    info!(dir = %batch_dir.display(), "batch started");

    let mut summary = RunSummary {
        batch,
        input: config.input.display().to_string(),
        records_loaded: dataset.report.kept_rows,
        records_dropped: dataset.report.dropped_rows,
        ..Default::default()
    };
    let mut taken = HashSet::new();

    for town in dataset.towns() {
        if !config.wants_town(&town) {
            continue;
        }
        summary.towns_attempted += 1;
        let records = dataset.town_records(&town);
        info!(town = %town, records = records.len(), "generating town");

        let report = match generate_town(&town, &records, &dataset.columns) {
            Ok(r) => r,
            Err(e) => {
                error!(town = %town, error = %e, "town skipped");
                println!("Skipped {}: {}\n", town, e);
                summary.failures.push(TownFailure {
                    town: town.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let path = workbook_path(&batch_dir, &town, &mut taken);
        output::write_xlsx(
            &path,
            &[
                (SCORECARD_SHEET, &report.scorecard),
                (NETWORK_PLAN_SHEET, &report.network_plan),
            ],
        )?;
        info!(town = %town, path = %path.display(), "workbook written");

        println!("Town: {}", report.town);
        output::preview_table_rows(&preview_rows(&report.blocks), config.preview_rows);
        println!(
            "({} interventions; full report exported to {})\n",
            format_int(report.plan.interventions.len()),
            path.display()
        );

        summary.towns_written += 1;
        summary.files.push(path.display().to_string());
    }

    let summary_path = batch_dir.join("summary.json");
    output::write_json(&summary_path, &summary)?;
    info!(path = %summary_path.display(), "summary written");
    Ok(summary)
}
