use clap::Parser;
use std::path::PathBuf;

/// Builds per-town network scorecards from a dealership-coverage sheet.
#[derive(Debug, Clone, Parser)]
#[command(name = "network_scorecard", version, about)]
pub struct Config {
    /// Coverage file (CSV, or xlsx/xlsm/xlsb/xls/ods workbook)
    #[arg(short, long, default_value = "network_coverage.csv")]
    pub input: PathBuf,

    /// Worksheet to read from a workbook (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Zero-based index of the header row
    #[arg(long, default_value_t = 1)]
    pub header_row: usize,

    /// Directory that receives one batch folder per run
    #[arg(short, long, default_value = "reports")]
    pub output_dir: PathBuf,

    /// Load, generate and exit without the menu
    #[arg(long)]
    pub batch: bool,

    /// Scorecard rows printed per town
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Only generate these towns (case-insensitive; repeatable)
    #[arg(long = "town")]
    pub towns: Vec<String>,
}

impl Config {
    /// True when `town` passes the `--town` filter.
    pub fn wants_town(&self, town: &str) -> bool {
        self.towns.is_empty() || self.towns.iter().any(|t| t.trim().eq_ignore_ascii_case(town))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::parse_from(["network_scorecard"]);
        assert_eq!(cfg.input, PathBuf::from("network_coverage.csv"));
        assert_eq!(cfg.header_row, 1);
        assert_eq!(cfg.output_dir, PathBuf::from("reports"));
        assert!(!cfg.batch);
        assert!(cfg.wants_town("Anything"));
    }

    #[test]
    fn town_filter_is_case_insensitive() {
        let cfg = Config::parse_from([
            "network_scorecard",
            "--batch",
            "--town",
            "azamgarh",
            "--town",
            "Mau",
            "-i",
            "coverage.xlsx",
            "--header-row",
            "2",
        ]);
        assert!(cfg.batch);
        assert_eq!(cfg.header_row, 2);
        assert!(cfg.wants_town("Azamgarh"));
        assert!(cfg.wants_town("MAU"));
        assert!(!cfg.wants_town("Ballia"));
    }
}
