// Column resolution: maps loosely-named spreadsheet headers onto the fields
// the report needs. Resolution happens once per input file and the resulting
// `ColumnMap` is threaded through loading and report generation.
use crate::error::{ReportError, Result};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Town,
    Location,
    Stratification,
    BalStoreType,
    TvsStoreType,
    IndustryVolume,
    BalVolume,
    TvsVolume,
    ConversionRatio,
    InterventionNature,
    NetworkIntervention,
    Closed,
    PreNetwork,
    PostNetwork,
    Remarks,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Town => "Town",
            Field::Location => "Location",
            Field::Stratification => "Stratification",
            Field::BalStoreType => "BAL Store Type",
            Field::TvsStoreType => "TVS Store Type",
            Field::IndustryVolume => "S1 Industry Volume",
            Field::BalVolume => "BAL S1 Volume",
            Field::TvsVolume => "TVS S1 Volume",
            Field::ConversionRatio => "Conversion Ratio",
            Field::InterventionNature => "Nature of Intervention",
            Field::NetworkIntervention => "Network Intervention",
            Field::Closed => "Closed Status",
            Field::PreNetwork => "Pre Network",
            Field::PostNetwork => "Post Network",
            Field::Remarks => "Remarks",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Variant {
    /// Case-insensitive substring of the header.
    Contains(&'static str),
    /// Case-insensitive equality with the whole header.
    Exact(&'static str),
}

impl Variant {
    fn matches(self, header: &str) -> bool {
        match self {
            Variant::Contains(key) => header.to_lowercase().contains(&key.to_lowercase()),
            Variant::Exact(key) => header.eq_ignore_ascii_case(key),
        }
    }
}

/// Field → acceptable header variants, most specific first.
pub const FIELD_VARIANTS: &[(Field, &[Variant])] = &[
    (Field::Town, &[Variant::Exact("Town"), Variant::Contains("Town Name")]),
    (
        Field::Location,
        &[
            Variant::Contains("Location Name"),
            Variant::Exact("Location"),
            Variant::Contains("Village"),
        ],
    ),
    (
        Field::Stratification,
        &[
            Variant::Contains("Updated Stratification"),
            Variant::Contains("Stratification"),
        ],
    ),
    (
        Field::BalStoreType,
        &[Variant::Contains("BAL Store Type"), Variant::Contains("BAL Type")],
    ),
    (
        Field::TvsStoreType,
        &[Variant::Contains("TVS Store Type"), Variant::Contains("TVS Type")],
    ),
    (
        Field::IndustryVolume,
        &[
            Variant::Contains("S1 Ind - F"),
            Variant::Contains("S1 Ind Vistaar"),
            Variant::Contains("S1 Ind"),
        ],
    ),
    (
        Field::BalVolume,
        &[Variant::Contains("BAL S1 Vol"), Variant::Contains("BAL S1")],
    ),
    (
        Field::TvsVolume,
        &[Variant::Contains("TVS S1 Vol"), Variant::Contains("TVS S1")],
    ),
    (
        Field::ConversionRatio,
        &[Variant::Contains("Conversion Ratio"), Variant::Exact("CR")],
    ),
    (
        Field::InterventionNature,
        &[
            Variant::Contains("Nature of Intervention"),
            Variant::Contains("Intervention Nature"),
        ],
    ),
    (Field::NetworkIntervention, &[Variant::Contains("Network Intervention")]),
    (
        Field::Closed,
        &[
            Variant::Contains("Closed"),
            Variant::Contains("Store Status"),
            Variant::Exact("Status"),
        ],
    ),
    (
        Field::PreNetwork,
        &[
            Variant::Contains("Pre Network"),
            Variant::Contains("Network Pre"),
            Variant::Contains("Current Network"),
        ],
    ),
    (
        Field::PostNetwork,
        &[
            Variant::Contains("Post Network"),
            Variant::Contains("Network Post"),
            Variant::Contains("UP 2.0"),
        ],
    ),
    (
        Field::Remarks,
        &[Variant::Contains("Remarks"), Variant::Contains("Remark"), Variant::Contains("Comments")],
    ),
];

/// Resolved header indices for one input file.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<Field, usize>,
}

impl ColumnMap {
    /// Resolve every field against cleaned headers. Variants are tried in
    /// order; for each variant the first matching header (left to right) wins.
    pub fn resolve(headers: &[String]) -> Self {
        let mut indices = HashMap::new();
        for (field, variants) in FIELD_VARIANTS {
            let found = variants
                .iter()
                .find_map(|v| headers.iter().position(|h| v.matches(h)));
            match found {
                Some(idx) => {
                    debug!(field = field.name(), header = %headers[idx], "column resolved");
                    indices.insert(*field, idx);
                }
                None => warn!(field = field.name(), "column not found"),
            }
        }
        Self { indices }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.indices.contains_key(&field)
    }

    /// Index of a field the caller cannot do without.
    pub fn require(&self, field: Field) -> Result<usize> {
        self.get(field)
            .ok_or_else(|| ReportError::MissingColumn(field.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn earlier_variant_beats_earlier_column() {
        let h = headers(&["Stratification", "Town", "Updated Stratification"]);
        let map = ColumnMap::resolve(&h);
        assert_eq!(map.get(Field::Stratification), Some(2));
        assert_eq!(map.get(Field::Town), Some(1));
    }

    #[test]
    fn first_column_wins_within_a_variant() {
        let h = headers(&["S1 Ind Vistaar", "S1 Ind - F Vistaar", "s1 ind - f old"]);
        let map = ColumnMap::resolve(&h);
        assert_eq!(map.get(Field::IndustryVolume), Some(1));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let h = headers(&["town", "bal store type", "TVS S1 VOL BASIS MS"]);
        let map = ColumnMap::resolve(&h);
        assert_eq!(map.get(Field::BalStoreType), Some(1));
        assert_eq!(map.get(Field::TvsVolume), Some(2));
    }

    #[test]
    fn short_cr_header_needs_exact_match() {
        let h = headers(&["Description", "CR"]);
        let map = ColumnMap::resolve(&h);
        assert_eq!(map.get(Field::ConversionRatio), Some(1));

        let h = headers(&["Description"]);
        assert!(!ColumnMap::resolve(&h).has(Field::ConversionRatio));
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let map = ColumnMap::resolve(&headers(&["Town", "BAL Store Type"]));
        match map.require(Field::Stratification) {
            Err(ReportError::MissingColumn(name)) => assert_eq!(name, "Stratification"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(map.require(Field::Town).unwrap(), 0);
    }
}
