use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// Store-presence category of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Primary,
    Secondary,
    Vacant,
}

impl Category {
    /// Report order.
    pub const ALL: [Category; 3] = [Category::Primary, Category::Secondary, Category::Vacant];

    pub fn label(self) -> &'static str {
        match self {
            Category::Primary => "Primary",
            Category::Secondary => "Secondary",
            Category::Vacant => "Vacant",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Geographic / market-size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stratification {
    LargeTown,
    SmallTown,
    Rural,
    DeepRural,
}

impl Stratification {
    /// Report order. Every scorecard carries all four, with or without data.
    pub const ALL: [Stratification; 4] = [
        Stratification::LargeTown,
        Stratification::SmallTown,
        Stratification::Rural,
        Stratification::DeepRural,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stratification::LargeTown => "Large Town",
            Stratification::SmallTown => "Small Town",
            Stratification::Rural => "Rural",
            Stratification::DeepRural => "Deep Rural",
        }
    }

    /// Case-insensitive match on the label, ignoring surrounding and repeated whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for Stratification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One spreadsheet row after column resolution. Text fields keep the source
/// text (trimmed); numeric fields are `None` when the cell did not parse.
#[derive(Debug, Clone, Default)]
pub struct StoreRecord {
    pub town: String,
    pub location: String,
    pub stratification_text: String,
    pub stratification: Option<Stratification>,
    pub bal_store_type: String,
    pub tvs_store_type: String,
    pub industry_volume: Option<f64>,
    pub bal_volume: Option<f64>,
    pub tvs_volume: Option<f64>,
    pub conversion_ratio: Option<f64>,
    pub intervention_nature: String,
    pub network_intervention: String,
    pub closed_status: String,
    pub pre_network: String,
    pub post_network: String,
    pub remarks: String,
}

/// Metrics for one (town, stratification, category) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBucket {
    pub stratification: Stratification,
    pub category: Category,
    pub store_count: usize,
    pub tvs_primary_count: usize,
    pub tvs_secondary_count: usize,
    pub store_gap: i64,
    pub unique_location_gap: usize,
    pub industry_volume: f64,
    pub bal_volume: f64,
    pub market_share: f64,
    pub tvs_volume: f64,
    pub volume_gap: f64,
    pub conversion_ratio: f64,
    pub addition_primary: usize,
    pub addition_secondary: usize,
    pub reduction_primary: usize,
    pub reduction_secondary: usize,
    pub post_network_count: i64,
    pub post_unique_location_gap: usize,
}

impl AggregateBucket {
    #[cfg(test)]
    pub fn empty(stratification: Stratification, category: Category) -> Self {
        Self {
            stratification,
            category,
            store_count: 0,
            tvs_primary_count: 0,
            tvs_secondary_count: 0,
            store_gap: 0,
            unique_location_gap: 0,
            industry_volume: 0.0,
            bal_volume: 0.0,
            market_share: 0.0,
            tvs_volume: 0.0,
            volume_gap: 0.0,
            conversion_ratio: 0.0,
            addition_primary: 0,
            addition_secondary: 0,
            reduction_primary: 0,
            reduction_secondary: 0,
            post_network_count: 0,
            post_unique_location_gap: 0,
        }
    }
}

/// Roll-up of the three category buckets of one stratification. Ratio
/// fields are absent: they stay blank on the report.
#[derive(Debug, Clone, PartialEq)]
pub struct StratificationTotal {
    pub stratification: Stratification,
    pub store_count: usize,
    pub tvs_primary_count: usize,
    pub tvs_secondary_count: usize,
    pub store_gap: i64,
    pub unique_location_gap: usize,
    pub industry_volume: f64,
    pub bal_volume: f64,
    pub tvs_volume: f64,
    pub volume_gap: f64,
    pub addition_primary: usize,
    pub addition_secondary: usize,
    pub reduction_primary: usize,
    pub reduction_secondary: usize,
    pub post_network_count: i64,
    pub post_unique_location_gap: usize,
}

/// All buckets of one stratification, in category order, plus the total.
#[derive(Debug, Clone, PartialEq)]
pub struct StratificationBlock {
    pub stratification: Stratification,
    pub buckets: [AggregateBucket; 3],
    pub total: StratificationTotal,
}

/// Network Plan line for one category (or the total).
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPlanLine {
    pub label: String,
    pub pre_count: usize,
    pub pre_industry_volume: f64,
    pub post_count: usize,
    pub post_industry_volume: f64,
    pub count_change: i64,
    pub volume_change: f64,
    pub volume_per_coverage_gain: f64,
}

/// Record carrying a network intervention marker, projected to the
/// descriptive columns shown on the Network Plan tab.
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionEntry {
    pub town: String,
    pub location: String,
    pub stratification: String,
    pub bal_store_type: String,
    pub tvs_store_type: String,
    pub industry_volume: Option<f64>,
    pub intervention_nature: String,
    pub network_intervention: String,
    pub remarks: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPlan {
    pub lines: Vec<NetworkPlanLine>,
    pub interventions: Vec<InterventionEntry>,
}

/// Console preview of a scorecard line.
#[derive(Debug, Tabled, Clone)]
pub struct ScorecardPreviewRow {
    #[tabled(rename = "Stratification")]
    pub stratification: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "BAL")]
    pub store_count: String,
    #[tabled(rename = "TVS Pri")]
    pub tvs_primary: String,
    #[tabled(rename = "TVS Sec")]
    pub tvs_secondary: String,
    #[tabled(rename = "Store Gap")]
    pub store_gap: String,
    #[tabled(rename = "IND S1")]
    pub industry_volume: String,
    #[tabled(rename = "BAL MS")]
    pub market_share: String,
    #[tabled(rename = "Vol Gap")]
    pub volume_gap: String,
    #[tabled(rename = "Post Count")]
    pub post_network_count: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct TownFailure {
    pub town: String,
    pub error: String,
}

#[derive(Debug, Serialize, Default)]
pub struct RunSummary {
    pub batch: String,
    pub input: String,
    pub records_loaded: usize,
    pub records_dropped: usize,
    pub towns_attempted: usize,
    pub towns_written: usize,
    pub files: Vec<String>,
    pub failures: Vec<TownFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stratification_parse_is_forgiving() {
        assert_eq!(Stratification::parse(" large  town "), Some(Stratification::LargeTown));
        assert_eq!(Stratification::parse("DEEP RURAL"), Some(Stratification::DeepRural));
        assert_eq!(Stratification::parse("Metro"), None);
        assert_eq!(Stratification::parse(""), None);
    }

    #[test]
    fn report_orders_are_fixed() {
        let labels: Vec<_> = Stratification::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["Large Town", "Small Town", "Rural", "Deep Rural"]);
        let cats: Vec<_> = Category::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(cats, ["Primary", "Secondary", "Vacant"]);
    }
}
