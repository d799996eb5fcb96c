// Stratification aggregation: buckets one town's active records by
// stratification and BAL category and derives the scorecard metrics.
use crate::classify::{adds_primary, adds_secondary, classify, is_closed};
use crate::types::{
    AggregateBucket, Category, StoreRecord, Stratification, StratificationBlock,
    StratificationTotal,
};
use crate::util::{average, ratio};

/// Drop closed stores. Applies to the scorecard only; the Network Plan reads
/// the unfiltered town records.
pub fn active_records(records: &[StoreRecord]) -> Vec<&StoreRecord> {
    records.iter().filter(|r| !is_closed(r)).collect()
}

fn sum(values: impl Iterator<Item = Option<f64>>) -> f64 {
    values.flatten().sum()
}

/// Location gap left after planned additions; never below zero.
pub fn residual_location_gap(gap: usize, additions: usize) -> usize {
    gap.saturating_sub(additions)
}

/// Metrics for one (stratification, category) bucket. `records` should
/// already be free of closed stores; records of other stratifications and
/// categories are ignored.
///
/// `has_cr_column` says whether the file carries a conversion-ratio column.
/// With it, CR is the mean of the bucket's numeric values (0 when none);
/// without it, CR is derived as TVS volume / BAL volume.
pub fn aggregate(
    records: &[&StoreRecord],
    stratification: Stratification,
    category: Category,
    has_cr_column: bool,
) -> AggregateBucket {
    let subset: Vec<&StoreRecord> = records
        .iter()
        .copied()
        .filter(|r| r.stratification == Some(stratification))
        .filter(|r| classify(&r.bal_store_type) == category)
        .collect();

    let store_count = subset.len();
    let tvs_primary_count = subset
        .iter()
        .filter(|r| classify(&r.tvs_store_type) == Category::Primary)
        .count();
    let tvs_secondary_count = subset
        .iter()
        .filter(|r| classify(&r.tvs_store_type) == Category::Secondary)
        .count();

    let industry_volume = sum(subset.iter().map(|r| r.industry_volume));
    let bal_volume = sum(subset.iter().map(|r| r.bal_volume));
    let tvs_volume = sum(subset.iter().map(|r| r.tvs_volume));

    let market_share = ratio(bal_volume, industry_volume);
    let volume_gap = tvs_volume - bal_volume;

    let conversion_ratio = if has_cr_column {
        let reported: Vec<f64> = subset.iter().filter_map(|r| r.conversion_ratio).collect();
        average(&reported)
    } else {
        ratio(tvs_volume, bal_volume)
    };

    let store_gap = store_count as i64 - (tvs_primary_count + tvs_secondary_count) as i64;
    let unique_location_gap = if category == Category::Vacant {
        store_count
    } else {
        0
    };

    let addition_primary = subset
        .iter()
        .filter(|r| adds_primary(&r.intervention_nature))
        .count();
    let addition_secondary = subset
        .iter()
        .filter(|r| adds_secondary(&r.intervention_nature))
        .count();
    // No source column carries reductions.
    let (reduction_primary, reduction_secondary) = (0usize, 0usize);

    let additions = addition_primary + addition_secondary;
    let post_network_count = (store_count + additions) as i64
        - (reduction_primary + reduction_secondary) as i64;
    let post_unique_location_gap = residual_location_gap(unique_location_gap, additions);

    AggregateBucket {
        stratification,
        category,
        store_count,
        tvs_primary_count,
        tvs_secondary_count,
        store_gap,
        unique_location_gap,
        industry_volume,
        bal_volume,
        market_share,
        tvs_volume,
        volume_gap,
        conversion_ratio,
        addition_primary,
        addition_secondary,
        reduction_primary,
        reduction_secondary,
        post_network_count,
        post_unique_location_gap,
    }
}

/// Sum counts and volumes of a stratification's buckets.
pub fn total(stratification: Stratification, buckets: &[AggregateBucket]) -> StratificationTotal {
    let mut t = StratificationTotal {
        stratification,
        store_count: 0,
        tvs_primary_count: 0,
        tvs_secondary_count: 0,
        store_gap: 0,
        unique_location_gap: 0,
        industry_volume: 0.0,
        bal_volume: 0.0,
        tvs_volume: 0.0,
        volume_gap: 0.0,
        addition_primary: 0,
        addition_secondary: 0,
        reduction_primary: 0,
        reduction_secondary: 0,
        post_network_count: 0,
        post_unique_location_gap: 0,
    };
    for b in buckets {
        t.store_count += b.store_count;
        t.tvs_primary_count += b.tvs_primary_count;
        t.tvs_secondary_count += b.tvs_secondary_count;
        t.store_gap += b.store_gap;
        t.unique_location_gap += b.unique_location_gap;
        t.industry_volume += b.industry_volume;
        t.bal_volume += b.bal_volume;
        t.tvs_volume += b.tvs_volume;
        t.volume_gap += b.volume_gap;
        t.addition_primary += b.addition_primary;
        t.addition_secondary += b.addition_secondary;
        t.reduction_primary += b.reduction_primary;
        t.reduction_secondary += b.reduction_secondary;
        t.post_network_count += b.post_network_count;
        t.post_unique_location_gap += b.post_unique_location_gap;
    }
    t
}

/// One block per stratification, always all four in report order.
pub fn aggregate_town(records: &[StoreRecord], has_cr_column: bool) -> Vec<StratificationBlock> {
    let active = active_records(records);
    Stratification::ALL
        .into_iter()
        .map(|stratification| {
            let buckets =
                Category::ALL.map(|c| aggregate(&active, stratification, c, has_cr_column));
            let total = total(stratification, &buckets);
            StratificationBlock {
                stratification,
                buckets,
                total,
            }
        })
        .collect()
}
