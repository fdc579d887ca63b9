// Reference data module - VIN alphabet, country entities and WMI code tables
//
// Lookup strategy (per ISO 3780):
// - VIN[0]    -> region table       -> region + the country holding the code
// - VIN[0..2] -> country table      -> country (every code covered, Unknown fills gaps)
// - VIN[0..3] -> manufacturer table -> manufacturer name + factory country
//
// Tables are built by `crate::wmi::build_tables` and are read-only afterwards.

pub mod aliases;
pub mod alphabet;
pub mod entity;
pub mod tables;

pub use aliases::{AliasIndex, DEFAULT_ALIAS_GROUPS};
pub use alphabet::{all_codes, index_of, is_vin_char, VIN_ALPHABET};
pub use entity::{Entity, EntityKey, EntityRegistry};
pub use tables::{ClaimLedger, CodeTable, ManufacturerEntry, SharedTables, TableSet, Tier};
