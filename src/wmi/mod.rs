// WMI (World Manufacturer Identifier) table construction
//
// Turns the compact range notation used by WMI source tables into the three
// code tables consulted by the decoder, and audits the result.

pub mod builder;
pub mod policy;
pub mod range;
pub mod validator;

pub use builder::{
    build_tables, build_tables_with_aliases, BuildOutput, BuildReport, ManufacturerRow, RangeRow,
    RawData, TierStats,
};
pub use policy::{assign_exclusive, merge_manufacturer, InsertOutcome};
pub use range::expand;
pub use validator::{validate, Overlap, PartialRange, ValidationReport};
