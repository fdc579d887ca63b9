//! Command Handlers
//!
//! Entry points used by the CLI (and any other front end), grouped by domain.
//!
//! ## Module Organization
//! - `state` - Application state: current tables, database pool, config
//! - `vin` - VIN decoding and generation
//! - `tables` - Seeding, reloading and validating the lookup tables
//! - `diagnostics` - Database status and statistics

mod state;
pub mod vin;
pub mod tables;
pub mod diagnostics;

pub use state::AppState;
pub use diagnostics::{get_db_stats, is_db_ready};
pub use tables::{reload_tables, seed_database, table_summary, validate_tables, TableSummary};
pub use vin::{decode_vin, generate_vins};
