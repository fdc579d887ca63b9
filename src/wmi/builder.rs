// Lookup table builder
//
// Builds a complete TableSet from raw source rows, in a fixed order:
// 1. entity registry (countries + Unknown sentinel + alias index)
// 2. region codes     (1 char, first writer wins)
// 3. country codes    (2 chars, first writer wins, claims recorded)
// 4. gap fill         (every unassigned country code -> Unknown)
// 5. validation       (needs the claim ledger, so it runs inside the build)
// 6. manufacturer codes (3 chars, names merged; factory country comes from
//    the gap-filled country tier, so it must run last)
//
// Nothing here aborts the build: unresolvable names, bad ranges and
// conflicts are collected into the BuildReport.

use serde::{Deserialize, Serialize};

use crate::error::BuildIssue;
use crate::reference::alphabet::all_codes;
use crate::reference::{AliasIndex, Entity, EntityKey, EntityRegistry, TableSet, Tier};

use super::policy::{assign_exclusive, merge_manufacturer, InsertOutcome};
use super::range::expand;
use super::validator::{validate, ValidationReport};

/// A (range spec, target name) row for the region or country tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeRow {
    pub range: String,
    pub target: String,
}

impl RangeRow {
    pub fn new(range: &str, target: &str) -> Self {
        Self { range: range.to_string(), target: target.to_string() }
    }
}

/// A manufacturer source row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerRow {
    /// Raw WMI spec, may hold comma/hyphen/slash sub-ranges
    pub wmi: String,
    pub manufacturer: String,
    /// Explicit factory country; when absent (or unresolvable) the country
    /// owning the WMI's first two characters is used
    pub country: Option<String>,
}

impl ManufacturerRow {
    pub fn new(wmi: &str, manufacturer: &str) -> Self {
        Self { wmi: wmi.to_string(), manufacturer: manufacturer.to_string(), country: None }
    }
}

/// Everything the builder consumes
#[derive(Debug, Clone, Default)]
pub struct RawData {
    pub countries: Vec<Entity>,
    pub regions: Vec<RangeRow>,
    pub country_codes: Vec<RangeRow>,
    pub manufacturers: Vec<ManufacturerRow>,
}

/// Per-tier counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub rows: usize,
    pub inserted: usize,
    pub merged: usize,
    pub skipped: usize,
    pub conflicts: usize,
    pub unresolved: usize,
    pub range_errors: usize,
}

impl TierStats {
    fn count(&mut self, outcome: &InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted => self.inserted += 1,
            InsertOutcome::Merged => self.merged += 1,
            InsertOutcome::SkippedDuplicate => self.skipped += 1,
            InsertOutcome::Conflict { .. } => self.conflicts += 1,
        }
    }
}

/// Summary of one build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildReport {
    pub entities: usize,
    pub regions: TierStats,
    pub countries: TierStats,
    pub manufacturers: TierStats,
    /// Country codes bound to Unknown by gap fill
    pub gap_filled: usize,
    pub issues: Vec<BuildIssue>,
    pub validation: ValidationReport,
}

/// Built tables plus the report describing how they were built
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub tables: TableSet,
    pub report: BuildReport,
}

/// Build a fresh table set from raw data using the default alias groups
pub fn build_tables(raw: RawData) -> BuildOutput {
    build_tables_with_aliases(raw, AliasIndex::with_defaults())
}

/// Build a fresh table set from raw data with a caller-supplied alias index
pub fn build_tables_with_aliases(raw: RawData, aliases: AliasIndex) -> BuildOutput {
    let RawData { countries, regions, country_codes, manufacturers } = raw;

    log::info!(
        "Building WMI tables: {} countries, {} region rows, {} country rows, {} manufacturer rows",
        countries.len(),
        regions.len(),
        country_codes.len(),
        manufacturers.len()
    );

    let mut builder = TableBuilder::new(EntityRegistry::from_records(countries, aliases));
    builder.seed_exclusive(Tier::Region, &regions);
    builder.seed_exclusive(Tier::Country, &country_codes);
    let gap_filled = builder.fill_country_gaps();
    let validation = builder.tables.validate();
    builder.seed_manufacturers(&manufacturers);

    let report = BuildReport {
        entities: builder.tables.entities.len(),
        regions: builder.region_stats,
        countries: builder.country_stats,
        manufacturers: builder.manufacturer_stats,
        gap_filled,
        issues: builder.issues,
        validation,
    };

    log::info!(
        "WMI tables built: {} region codes, {} country codes ({} gap-filled), {} WMIs, {} issues",
        builder.tables.regions.len(),
        builder.tables.countries.len(),
        report.gap_filled,
        builder.tables.manufacturers.len(),
        report.issues.len()
    );

    BuildOutput { tables: builder.tables, report }
}

struct TableBuilder {
    tables: TableSet,
    region_stats: TierStats,
    country_stats: TierStats,
    manufacturer_stats: TierStats,
    issues: Vec<BuildIssue>,
}

impl TableBuilder {
    fn new(entities: EntityRegistry) -> Self {
        Self {
            tables: TableSet::empty(entities),
            region_stats: TierStats::default(),
            country_stats: TierStats::default(),
            manufacturer_stats: TierStats::default(),
            issues: Vec::new(),
        }
    }

    fn stats_mut(&mut self, tier: Tier) -> &mut TierStats {
        match tier {
            Tier::Region => &mut self.region_stats,
            Tier::Country => &mut self.country_stats,
            Tier::Manufacturer => &mut self.manufacturer_stats,
        }
    }

    /// Seed the region or country tier
    fn seed_exclusive(&mut self, tier: Tier, rows: &[RangeRow]) {
        for row in rows {
            self.stats_mut(tier).rows += 1;

            let Some(key) = self.tables.entities.resolve(&row.target).cloned() else {
                log::warn!(
                    "{} tier: entity not found: {} (range: {})",
                    tier,
                    row.target,
                    row.range
                );
                self.stats_mut(tier).unresolved += 1;
                self.issues.push(BuildIssue::EntityResolution {
                    tier,
                    name: row.target.clone(),
                    range: row.range.clone(),
                });
                continue;
            };

            let codes = match expand(&row.range, tier.code_length()) {
                Ok(codes) => codes,
                Err(error) => {
                    log::warn!("{} tier: {}", tier, error);
                    self.stats_mut(tier).range_errors += 1;
                    self.issues.push(BuildIssue::Range { tier, error });
                    continue;
                }
            };

            let entity_name = self.entity_name(&key);
            log::debug!("{} -> {}: {} codes", row.range, entity_name, codes.len());

            for code in codes {
                if tier == Tier::Country {
                    self.tables.country_claims.record(&code, &entity_name);
                }

                let table = match tier {
                    Tier::Region => &mut self.tables.regions,
                    _ => &mut self.tables.countries,
                };
                let outcome = assign_exclusive(table, &code, &key);

                if let InsertOutcome::Conflict { existing } = &outcome {
                    let kept = self.entity_name(existing);
                    log::debug!(
                        "{} tier: {} already assigned to {}, rejecting {}",
                        tier,
                        code,
                        kept,
                        entity_name
                    );
                    self.issues.push(BuildIssue::CodeConflict {
                        tier,
                        code: code.clone(),
                        kept,
                        rejected: entity_name.clone(),
                    });
                }
                self.stats_mut(tier).count(&outcome);
            }
        }
    }

    /// Bind every unassigned country code to the Unknown sentinel
    fn fill_country_gaps(&mut self) -> usize {
        let unknown = EntityKey::unknown();
        let mut filled = 0;
        for code in all_codes(Tier::Country.code_length()) {
            let outcome = assign_exclusive(&mut self.tables.countries, &code, &unknown);
            if outcome == InsertOutcome::Inserted {
                filled += 1;
            }
        }
        if filled > 0 {
            log::info!("Filled {} unassigned country codes with Unknown", filled);
        }
        filled
    }

    fn seed_manufacturers(&mut self, rows: &[ManufacturerRow]) {
        for row in rows {
            self.manufacturer_stats.rows += 1;

            let name = row.manufacturer.trim();
            if name.is_empty() {
                log::warn!("No manufacturer name for WMI: {}", row.wmi);
                self.issues.push(BuildIssue::InvalidManufacturer { wmi: row.wmi.clone() });
                continue;
            }

            let codes = match expand(&row.wmi, Tier::Manufacturer.code_length()) {
                Ok(codes) => codes,
                Err(error) => {
                    log::warn!("manufacturer tier: {}", error);
                    self.manufacturer_stats.range_errors += 1;
                    self.issues.push(BuildIssue::Range { tier: Tier::Manufacturer, error });
                    continue;
                }
            };

            let explicit = row.country.as_deref().filter(|c| !c.trim().is_empty()).and_then(|c| {
                let key = self.tables.entities.resolve(c).cloned();
                if key.is_none() {
                    self.manufacturer_stats.unresolved += 1;
                    self.issues.push(BuildIssue::EntityResolution {
                        tier: Tier::Manufacturer,
                        name: c.to_string(),
                        range: row.wmi.clone(),
                    });
                }
                key
            });

            for wmi in codes {
                let country = explicit.clone().unwrap_or_else(|| {
                    self.tables
                        .countries
                        .get(&wmi[..2])
                        .cloned()
                        .unwrap_or_else(EntityKey::unknown)
                });
                let outcome =
                    merge_manufacturer(&mut self.tables.manufacturers, &wmi, name, &country);
                log::debug!("{} -> {} ({:?})", wmi, name, outcome);
                self.manufacturer_stats.count(&outcome);
            }
        }
    }

    fn entity_name(&self, key: &EntityKey) -> String {
        self.tables
            .entities
            .get(key)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| key.to_string())
    }
}
