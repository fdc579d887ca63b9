//! Table management commands
//!
//! This module handles:
//! - seed_database: Load raw sources, build tables, store them and swap them in
//! - reload_tables: Rebuild the in-memory tables from the database
//! - validate_tables: Audit the current country tier

use serde::Serialize;

use super::state::AppState;
use crate::db;
use crate::error::CommandError;
use crate::sources;
use crate::wmi::{build_tables, BuildReport, ValidationReport};

// ============================================================================
// Data Types
// ============================================================================

/// Size of the table set currently in effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub entities: usize,
    pub region_codes: usize,
    pub country_codes: usize,
    pub manufacturer_codes: usize,
}

// ============================================================================
// Table Commands
// ============================================================================

/// Seed from the configured sources
///
/// Nothing is stored or swapped in unless every source loads; readers keep
/// the previous tables until the new set replaces them.
pub async fn seed_database(state: &AppState) -> Result<BuildReport, CommandError> {
    let pool = state.pool().await?;

    let raw = sources::load_raw_data(&state.config).await?;
    let output = build_tables(raw);

    db::save_tables(&pool, &output.tables).await?;
    state.tables.replace(output.tables);

    log::info!(
        "Seed complete: {} issues, coverage {:.1}%",
        output.report.issues.len(),
        output.report.validation.coverage_percent()
    );
    Ok(output.report)
}

/// Replace the in-memory tables with the stored ones
pub async fn reload_tables(state: &AppState) -> Result<TableSummary, CommandError> {
    let pool = state.pool().await?;
    let tables = db::load_tables(&pool).await?;
    state.tables.replace(tables);
    Ok(table_summary(state))
}

/// Validate the tables currently in effect
pub fn validate_tables(state: &AppState) -> ValidationReport {
    state.tables.snapshot().validate()
}

pub fn table_summary(state: &AppState) -> TableSummary {
    let tables = state.tables.snapshot();
    TableSummary {
        entities: tables.entities.len(),
        region_codes: tables.regions.len(),
        country_codes: tables.countries.len(),
        manufacturer_codes: tables.manufacturers.len(),
    }
}
