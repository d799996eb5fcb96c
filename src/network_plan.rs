// Network Plan: pre- vs post-intervention coverage per category, read from
// the unfiltered town records (closed stores included).
use crate::classify::classify;
use crate::types::{Category, InterventionEntry, NetworkPlan, NetworkPlanLine, StoreRecord};

fn line(label: &str, pre: (usize, f64), post: (usize, f64)) -> NetworkPlanLine {
    let count_change = post.0 as i64 - pre.0 as i64;
    let volume_change = post.1 - pre.1;
    let volume_per_coverage_gain = if count_change != 0 {
        volume_change / count_change as f64
    } else {
        0.0
    };
    NetworkPlanLine {
        label: label.to_string(),
        pre_count: pre.0,
        pre_industry_volume: pre.1,
        post_count: post.0,
        post_industry_volume: post.1,
        count_change,
        volume_change,
        volume_per_coverage_gain,
    }
}

/// Count and industry volume of the records whose network text falls in `category`.
fn coverage<F>(records: &[StoreRecord], category: Category, network_text: F) -> (usize, f64)
where
    F: Fn(&StoreRecord) -> &str,
{
    records
        .iter()
        .filter(|r| classify(network_text(r)) == category)
        .fold((0, 0.0), |(n, vol), r| {
            (n + 1, vol + r.industry_volume.unwrap_or(0.0))
        })
}

pub fn coverage_lines(records: &[StoreRecord]) -> Vec<NetworkPlanLine> {
    let mut lines: Vec<NetworkPlanLine> = Category::ALL
        .iter()
        .map(|&c| {
            let pre = coverage(records, c, |r| r.pre_network.as_str());
            let post = coverage(records, c, |r| r.post_network.as_str());
            line(c.label(), pre, post)
        })
        .collect();

    let pre = lines
        .iter()
        .fold((0, 0.0), |(n, v), l| (n + l.pre_count, v + l.pre_industry_volume));
    let post = lines
        .iter()
        .fold((0, 0.0), |(n, v), l| (n + l.post_count, v + l.post_industry_volume));
    lines.push(line("Total", pre, post));
    lines
}

/// Records carrying a network intervention marker.
pub fn interventions(records: &[StoreRecord]) -> Vec<InterventionEntry> {
    records
        .iter()
        .filter(|r| !r.network_intervention.is_empty())
        .map(|r| InterventionEntry {
            town: r.town.clone(),
            location: r.location.clone(),
            stratification: r.stratification_text.clone(),
            bal_store_type: r.bal_store_type.clone(),
            tvs_store_type: r.tvs_store_type.clone(),
            industry_volume: r.industry_volume,
            intervention_nature: r.intervention_nature.clone(),
            network_intervention: r.network_intervention.clone(),
            remarks: r.remarks.clone(),
        })
        .collect()
}

pub fn build_network_plan(records: &[StoreRecord]) -> NetworkPlan {
    NetworkPlan {
        lines: coverage_lines(records),
        interventions: interventions(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_town;

    fn record(pre: &str, post: &str, volume: f64) -> StoreRecord {
        StoreRecord {
            town: "Mau".into(),
            pre_network: pre.into(),
            post_network: post.into(),
            industry_volume: Some(volume),
            ..Default::default()
        }
    }

    #[test]
    fn pre_and_post_coverage_per_category() {
        let records = vec![
            record("MD", "MD", 100.0),
            record("", "ASD", 40.0),
            record("", "Branch", 60.0),
            record("", "", 10.0),
        ];
        let lines = coverage_lines(&records);
        assert_eq!(lines.len(), 4);

        let primary = &lines[0];
        assert_eq!(primary.label, "Primary");
        assert_eq!((primary.pre_count, primary.post_count), (1, 2));
        assert_eq!(primary.volume_change, 60.0);
        assert_eq!(primary.volume_per_coverage_gain, 60.0);

        let secondary = &lines[1];
        assert_eq!((secondary.pre_count, secondary.post_count), (0, 1));
        assert_eq!(secondary.post_industry_volume, 40.0);

        let vacant = &lines[2];
        assert_eq!((vacant.pre_count, vacant.post_count), (3, 1));
        assert_eq!(vacant.count_change, -2);
        assert_eq!(vacant.volume_change, -100.0);
        assert_eq!(vacant.volume_per_coverage_gain, 50.0);

        let total = &lines[3];
        assert_eq!((total.pre_count, total.post_count), (4, 4));
        assert_eq!(total.volume_per_coverage_gain, 0.0);
    }

    #[test]
    fn intervention_list_keeps_marked_records_only() {
        let mut a = record("MD", "MD", 10.0);
        a.network_intervention = "Relocate".into();
        a.location = "Phulpur".into();
        let b = record("", "", 5.0);
        let list = interventions(&[a, b]);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].location, "Phulpur");
        assert_eq!(list[0].network_intervention, "Relocate");
        assert_eq!(list[0].industry_volume, Some(10.0));
    }

    #[test]
    fn closed_stores_appear_in_plan_but_not_in_scorecard() {
        let mut closed = record("MD", "MD", 80.0);
        closed.bal_store_type = "MD".into();
        closed.stratification = Some(crate::types::Stratification::LargeTown);
        closed.closed_status = "Closed".into();
        closed.network_intervention = "Reopen".into();
        let records = vec![closed];

        let plan = build_network_plan(&records);
        assert_eq!(plan.lines[0].pre_count, 1);
        assert_eq!(plan.lines[0].pre_industry_volume, 80.0);
        assert_eq!(plan.interventions.len(), 1);

        let blocks = aggregate_town(&records, false);
        assert_eq!(blocks[0].total.store_count, 0);
        assert_eq!(blocks[0].total.industry_volume, 0.0);
    }
}
