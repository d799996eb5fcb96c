// Keyword classification of store-type and intervention texts.
use crate::types::{Category, StoreRecord};
use crate::util::is_blank_text;

const PRIMARY_KEYWORDS: [&str; 4] = ["MD", "DEALER", "BRANCH", "BR"];
const SECONDARY_KEYWORDS: [&str; 4] = ["ASD", "AD", "SUB", "REP"];

const ADDITION_PRIMARY_KEYWORDS: [&str; 2] = ["BRANCH", "MD"];
const ADDITION_SECONDARY_KEYWORDS: [&str; 1] = ["ASD"];

fn contains_any(upper: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| upper.contains(k))
}

/// Classify a store-type text. Primary keywords are checked first, so a
/// text matching both sets is Primary; blank text is Vacant.
pub fn classify(store_type: &str) -> Category {
    if is_blank_text(store_type) {
        return Category::Vacant;
    }
    let upper = store_type.to_uppercase();
    if contains_any(&upper, &PRIMARY_KEYWORDS) {
        Category::Primary
    } else if contains_any(&upper, &SECONDARY_KEYWORDS) {
        Category::Secondary
    } else {
        Category::Vacant
    }
}

/// Closed stores are dropped from every scorecard aggregate.
pub fn is_closed(record: &StoreRecord) -> bool {
    record.closed_status.to_lowercase().contains("closed")
}

/// Intervention text proposing a Branch/MD outlet.
pub fn adds_primary(intervention_nature: &str) -> bool {
    contains_any(&intervention_nature.to_uppercase(), &ADDITION_PRIMARY_KEYWORDS)
}

/// Intervention text proposing an ASD outlet.
pub fn adds_secondary(intervention_nature: &str) -> bool {
    contains_any(&intervention_nature.to_uppercase(), &ADDITION_SECONDARY_KEYWORDS)
}
