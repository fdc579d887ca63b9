// Country code table audit
//
// Checks the 2-character tier for:
// - overlaps: a code claimed by more than one entity while building
// - gaps: a code that resolves to no entity (gap fill should leave none)

use serde::Serialize;

use crate::reference::alphabet::{all_codes, VIN_ALPHABET};
use crate::reference::{ClaimLedger, CodeTable, EntityKey, EntityRegistry};

/// A code claimed by several entities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    pub code: String,
    pub entities: Vec<String>,
}

/// A first symbol with only some of its codes missing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialRange {
    pub prefix: char,
    pub missing: usize,
}

/// Result of auditing the country tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub overlaps: Vec<Overlap>,
    pub gaps: Vec<String>,
    /// assigned / possible, 0.0 - 1.0
    pub coverage_ratio: f64,
    pub assigned: usize,
    pub possible: usize,
    /// First symbols whose codes are all missing
    pub empty_ranges: Vec<char>,
    pub partial_ranges: Vec<PartialRange>,
}

impl ValidationReport {
    pub fn coverage_percent(&self) -> f64 {
        self.coverage_ratio * 100.0
    }

    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty() && self.gaps.is_empty()
    }
}

/// Audit a country code table. Read-only.
///
/// Overlaps come from the claim ledger, since the table itself only keeps
/// the winning entity for each code. A code whose entity is missing from the
/// registry counts as a gap.
pub fn validate(
    countries: &CodeTable<EntityKey>,
    ledger: &ClaimLedger,
    registry: &EntityRegistry,
) -> ValidationReport {
    let possible_codes = all_codes(2);
    let possible = possible_codes.len();

    let overlaps: Vec<Overlap> = possible_codes
        .iter()
        .filter_map(|code| {
            let claimants = ledger.claimants(code);
            (claimants.len() > 1).then(|| Overlap {
                code: code.clone(),
                entities: claimants.to_vec(),
            })
        })
        .collect();

    let gaps: Vec<String> = possible_codes
        .into_iter()
        .filter(|code| {
            countries
                .get(code)
                .and_then(|key| registry.get(key))
                .is_none()
        })
        .collect();

    let mut empty_ranges = Vec::new();
    let mut partial_ranges = Vec::new();
    for first in VIN_ALPHABET {
        let missing = gaps.iter().filter(|code| code.starts_with(first)).count();
        if missing == VIN_ALPHABET.len() {
            empty_ranges.push(first);
        } else if missing > 0 {
            partial_ranges.push(PartialRange { prefix: first, missing });
        }
    }

    let assigned = possible - gaps.len();
    let report = ValidationReport {
        coverage_ratio: assigned as f64 / possible as f64,
        overlaps,
        gaps,
        assigned,
        possible,
        empty_ranges,
        partial_ranges,
    };

    log::info!(
        "Country code validation: {}/{} assigned ({:.1}% coverage), {} overlaps, {} gaps",
        report.assigned,
        report.possible,
        report.coverage_percent(),
        report.overlaps.len(),
        report.gaps.len()
    );
    for overlap in report.overlaps.iter().take(15) {
        log::debug!("  overlap {}: {}", overlap.code, overlap.entities.join(", "));
    }
    if !report.gaps.is_empty() {
        log::warn!(
            "{} country codes resolve to no entity (empty ranges: {:?})",
            report.gaps.len(),
            report.empty_ranges
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Entity, Tier};

    fn registry() -> EntityRegistry {
        let mut reg = EntityRegistry::default();
        reg.insert(Entity::new("ZA", "South Africa", "Africa", None));
        reg.insert(Entity::new("CI", "Ivory Coast", "Africa", None));
        reg
    }

    #[test]
    fn test_empty_table_is_all_gaps() {
        let report = validate(&CodeTable::new(Tier::Country), &ClaimLedger::new(), &registry());
        assert_eq!(report.gaps.len(), all_codes(2).len());
        assert_eq!(report.assigned, 0);
        assert_eq!(report.coverage_ratio, 0.0);
        assert_eq!(report.empty_ranges.len(), VIN_ALPHABET.len());
        assert!(report.partial_ranges.is_empty());
        assert!(!report.is_clean());
    }

    #[test]
    fn test_full_table_has_full_coverage() {
        let mut table = CodeTable::new(Tier::Country);
        for code in all_codes(2) {
            table.insert(code, EntityKey::unknown());
        }
        let report = validate(&table, &ClaimLedger::new(), &registry());
        assert!(report.gaps.is_empty());
        assert_eq!(report.coverage_percent(), 100.0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_partial_ranges_and_dangling_keys() {
        let mut table = CodeTable::new(Tier::Country);
        for code in all_codes(2).into_iter().filter(|c| !c.starts_with('D')) {
            table.insert(code, EntityKey::new("ZA"));
        }
        // Key not in the registry counts as a gap
        table.insert("AA".to_string(), EntityKey::new("QQ"));
        let report = validate(&table, &ClaimLedger::new(), &registry());

        assert_eq!(report.empty_ranges, vec!['D']);
        assert_eq!(report.partial_ranges, vec![PartialRange { prefix: 'A', missing: 1 }]);
        // every D code plus the dangling AA
        assert_eq!(report.gaps.len(), VIN_ALPHABET.len() + 1);
    }

    #[test]
    fn test_overlaps_from_ledger() {
        let mut table = CodeTable::new(Tier::Country);
        table.insert("AA".to_string(), EntityKey::new("ZA"));
        let mut ledger = ClaimLedger::new();
        ledger.record("AA", "South Africa");
        ledger.record("AA", "Ivory Coast");
        ledger.record("AB", "South Africa");

        let report = validate(&table, &ledger, &registry());
        assert_eq!(
            report.overlaps,
            vec![Overlap {
                code: "AA".to_string(),
                entities: vec!["South Africa".to_string(), "Ivory Coast".to_string()],
            }]
        );
    }
}
