// Insertion policies for the code tables
//
// Region and country codes belong to exactly one entity: the first writer
// keeps the code and later claims by other entities are conflicts.
// Manufacturer codes are shared: several source rows may name the same WMI,
// and their names are merged into one entry.

use serde::Serialize;

use crate::reference::{CodeTable, EntityKey, ManufacturerEntry};

/// Separator used when merging manufacturer names
pub const MERGE_SEPARATOR: &str = " & ";

/// Result of applying one code to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InsertOutcome {
    /// The code was new
    Inserted,
    /// The code existed and the new name was appended
    Merged,
    /// The code already held this value
    SkippedDuplicate,
    /// The code belongs to a different entity, which keeps it
    Conflict { existing: EntityKey },
}

/// Assign a region/country code to an entity, first writer wins
pub fn assign_exclusive(
    table: &mut CodeTable<EntityKey>,
    code: &str,
    entity: &EntityKey,
) -> InsertOutcome {
    match table.get(code) {
        Some(existing) if existing == entity => InsertOutcome::SkippedDuplicate,
        Some(existing) => InsertOutcome::Conflict { existing: existing.clone() },
        None => {
            table.insert(code.to_string(), entity.clone());
            InsertOutcome::Inserted
        }
    }
}

/// Add a manufacturer name to a WMI, merging with any existing entry
///
/// A name already contained in the merged name (as a substring) is skipped,
/// so reseeding the same manufacturer leaves the entry unchanged. The factory
/// country of an existing entry is not changed by a merge.
pub fn merge_manufacturer(
    table: &mut CodeTable<ManufacturerEntry>,
    wmi: &str,
    name: &str,
    country: &EntityKey,
) -> InsertOutcome {
    match table.get_mut(wmi) {
        Some(entry) if entry.name.contains(name) => InsertOutcome::SkippedDuplicate,
        Some(entry) => {
            entry.name.push_str(MERGE_SEPARATOR);
            entry.name.push_str(name);
            InsertOutcome::Merged
        }
        None => {
            table.insert(
                wmi.to_string(),
                ManufacturerEntry { name: name.to_string(), country: country.clone() },
            );
            InsertOutcome::Inserted
        }
    }
}
