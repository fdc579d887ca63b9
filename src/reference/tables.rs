// WMI code tables
//
// Three tiers, keyed by the leading characters of a VIN:
// - region:       1 char  -> country entity
// - country:      2 chars -> country entity (complete after gap fill)
// - manufacturer: 3 chars -> manufacturer name + factory country

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::entity::{EntityKey, EntityRegistry};

/// Which code table a code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Region,
    Country,
    Manufacturer,
}

impl Tier {
    /// Length of the codes in this tier
    pub fn code_length(self) -> usize {
        match self {
            Tier::Region => 1,
            Tier::Country => 2,
            Tier::Manufacturer => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Region => f.write_str("region"),
            Tier::Country => f.write_str("country"),
            Tier::Manufacturer => f.write_str("manufacturer"),
        }
    }
}

/// A manufacturer (WMI) table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerEntry {
    /// Merged manufacturer name ("A & B" when several sources share a WMI)
    pub name: String,
    /// Country the factory is located in
    pub country: EntityKey,
}

/// Fixed-length code -> value mapping for one tier
#[derive(Debug, Clone, PartialEq)]
pub struct CodeTable<V> {
    tier: Tier,
    entries: BTreeMap<String, V>,
}

impl<V> CodeTable<V> {
    pub fn new(tier: Tier) -> Self {
        Self { tier, entries: BTreeMap::new() }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn get(&self, code: &str) -> Option<&V> {
        self.entries.get(code)
    }

    pub(crate) fn get_mut(&mut self, code: &str) -> Option<&mut V> {
        self.entries.get_mut(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Set a code's value. Only the builder and the store write tables.
    pub(crate) fn insert(&mut self, code: String, value: V) {
        debug_assert_eq!(code.chars().count(), self.tier.code_length());
        self.entries.insert(code, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

/// Every distinct entity name that claimed each country code during a build,
/// in claim order. The final table keeps one winner per code; this keeps the
/// losers so overlaps can be audited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimLedger {
    claims: BTreeMap<String, Vec<String>>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` claimed `code` (ignored if already recorded)
    pub fn record(&mut self, code: &str, name: &str) {
        let names = self.claims.entry(code.to_string()).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    pub fn claimants(&self, code: &str) -> &[String] {
        self.claims.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.claims.iter()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// The complete, read-only lookup state consulted by the VIN codec
#[derive(Debug, Clone)]
pub struct TableSet {
    pub entities: EntityRegistry,
    pub regions: CodeTable<EntityKey>,
    pub countries: CodeTable<EntityKey>,
    pub manufacturers: CodeTable<ManufacturerEntry>,
    pub country_claims: ClaimLedger,
}

impl Default for TableSet {
    fn default() -> Self {
        Self::empty(EntityRegistry::default())
    }
}

impl TableSet {
    /// Table set with entities but no codes
    pub fn empty(entities: EntityRegistry) -> Self {
        Self {
            entities,
            regions: CodeTable::new(Tier::Region),
            countries: CodeTable::new(Tier::Country),
            manufacturers: CodeTable::new(Tier::Manufacturer),
            country_claims: ClaimLedger::new(),
        }
    }

    /// Entity owning a 1-char region code
    pub fn region(&self, code: &str) -> Option<&super::Entity> {
        self.regions.get(code).and_then(|key| self.entities.get(key))
    }

    /// Entity owning a 2-char country code
    pub fn country(&self, code: &str) -> Option<&super::Entity> {
        self.countries.get(code).and_then(|key| self.entities.get(key))
    }

    /// Manufacturer entry for a 3-char WMI
    pub fn manufacturer(&self, wmi: &str) -> Option<&ManufacturerEntry> {
        self.manufacturers.get(wmi)
    }

    /// Audit the country tier for overlaps and gaps
    pub fn validate(&self) -> crate::wmi::ValidationReport {
        crate::wmi::validate(&self.countries, &self.country_claims, &self.entities)
    }
}

/// Handle to the current table set, swapped atomically on rebuild
///
/// Readers take a snapshot and keep using it for the whole request; a
/// rebuild replaces the whole set in a single write, so no reader ever sees
/// a half-populated table.
#[derive(Debug, Default)]
pub struct SharedTables {
    current: RwLock<Arc<TableSet>>,
}

impl SharedTables {
    pub fn new(tables: TableSet) -> Self {
        Self { current: RwLock::new(Arc::new(tables)) }
    }

    /// The table set in effect right now
    pub fn snapshot(&self) -> Arc<TableSet> {
        // The lock only guards an Arc swap, so a poisoned lock still holds a
        // complete table set.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the table set, returning the previous one
    pub fn replace(&self, tables: TableSet) -> Arc<TableSet> {
        let next = Arc::new(tables);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Entity;

    #[test]
    fn test_tier_code_lengths() {
        assert_eq!(Tier::Region.code_length(), 1);
        assert_eq!(Tier::Country.code_length(), 2);
        assert_eq!(Tier::Manufacturer.code_length(), 3);
        assert_eq!(Tier::Manufacturer.to_string(), "manufacturer");
    }

    #[test]
    fn test_claim_ledger_keeps_distinct_names_in_order() {
        let mut ledger = ClaimLedger::new();
        ledger.record("AA", "South Africa");
        ledger.record("AA", "South Africa");
        ledger.record("AA", "Lesotho");
        assert_eq!(ledger.claimants("AA"), ["South Africa".to_string(), "Lesotho".to_string()]);
        assert!(ledger.claimants("AB").is_empty());
    }

    #[test]
    fn test_table_set_lookups() {
        let mut entities = EntityRegistry::default();
        entities.insert(Entity::new("JP", "Japan", "Asia", Some("🇯🇵")));
        let mut tables = TableSet::empty(entities);
        tables.regions.insert("J".to_string(), EntityKey::new("JP"));
        tables.countries.insert("JH".to_string(), EntityKey::new("JP"));
        tables.manufacturers.insert(
            "JHM".to_string(),
            ManufacturerEntry { name: "Honda".to_string(), country: EntityKey::new("JP") },
        );

        assert_eq!(tables.region("J").map(|e| e.name.as_str()), Some("Japan"));
        assert_eq!(tables.country("JH").map(|e| e.name.as_str()), Some("Japan"));
        assert_eq!(tables.manufacturer("JHM").map(|m| m.name.as_str()), Some("Honda"));
        assert!(tables.country("1H").is_none());
    }

    #[test]
    fn test_shared_tables_swap() {
        let shared = SharedTables::new(TableSet::default());
        let before = shared.snapshot();
        assert!(before.countries.is_empty());

        let mut next = TableSet::default();
        next.countries.insert("AA".to_string(), EntityKey::unknown());
        let previous = shared.replace(next);

        // Old snapshots stay intact; new snapshots see the replacement
        assert!(Arc::ptr_eq(&before, &previous));
        assert!(before.countries.is_empty());
        assert_eq!(shared.snapshot().countries.len(), 1);
    }
}
