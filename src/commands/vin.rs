//! VIN commands
//!
//! This module handles:
//! - decode_vin: Decode a single VIN against the current tables
//! - generate_vins: Generate random VINs and return them decoded

use super::state::AppState;
use crate::error::CommandError;
use crate::vin::{DecodedVin, VinCodec};

/// Most VINs one generate call will produce
pub const MAX_GENERATE: usize = 1000;

// ============================================================================
// VIN Commands
// ============================================================================

/// Decode a VIN
pub fn decode_vin(state: &AppState, vin: &str) -> Result<DecodedVin, CommandError> {
    let tables = state.tables.snapshot();
    let decoded = VinCodec::new(&tables).decode(vin)?;
    log::debug!("Decoded {} -> {} / {}", decoded.vin, decoded.country, decoded.manufacturer);
    Ok(decoded)
}

/// Generate `count` random VINs (capped at MAX_GENERATE), decoded
pub fn generate_vins(state: &AppState, count: usize) -> Result<Vec<DecodedVin>, CommandError> {
    let tables = state.tables.snapshot();
    let codec = VinCodec::new(&tables);
    let count = count.min(MAX_GENERATE);

    let mut rng = rand::thread_rng();
    let vins = (0..count)
        .map(|_| codec.decode(&codec.generate_with(&mut rng)))
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("Generated {} VINs", vins.len());
    Ok(vins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::reference::Entity;
    use crate::wmi::{build_tables, ManufacturerRow, RangeRow, RawData};

    fn state() -> AppState {
        let state = AppState::new(Config::default());
        let out = build_tables(RawData {
            countries: vec![Entity::new("JP", "Japan", "Asia", Some("🇯🇵"))],
            regions: vec![RangeRow::new("J", "Japan")],
            country_codes: vec![RangeRow::new("J", "Japan")],
            manufacturers: vec![ManufacturerRow::new("JHM", "Honda")],
        });
        state.tables.replace(out.tables);
        state
    }

    #[test]
    fn test_decode_vin_command() {
        let state = state();
        let decoded = decode_vin(&state, "JHMCM82633A004352").unwrap();
        assert_eq!(decoded.country, "Japan");
        assert_eq!(decoded.manufacturer, "Honda");
        assert_eq!(decoded.region, "Asia");
    }

    #[test]
    fn test_decode_vin_rejects_bad_input() {
        let state = state();
        assert!(matches!(decode_vin(&state, "JHM"), Err(CommandError::Decode(_))));
    }

    #[test]
    fn test_generate_vins_command() {
        let state = state();
        let vins = generate_vins(&state, 25).unwrap();
        assert_eq!(vins.len(), 25);
        assert!(vins.iter().all(|v| v.check_digit_valid && v.wmi == "JHM"));
        assert_eq!(generate_vins(&state, MAX_GENERATE + 5).unwrap().len(), MAX_GENERATE);
    }
}
