// VIN decoding
//
// Layout of a 17-character VIN:
//   0..3   WMI  - world manufacturer identifier (region, country, maker)
//   3..9   VDS  - vehicle descriptor section (8 is the check digit)
//   9..17  VIS  - vehicle identifier section
//          9 model year, 10 plant code, 11..17 serial number

use serde::Serialize;

use crate::error::DecodeError;
use crate::reference::alphabet::is_vin_char;
use crate::reference::TableSet;

use super::checksum::{compute_check_digit, CHECK_DIGIT_POSITION, VIN_LENGTH};
use super::model_year::{current_year, resolve_model_year, ModelYear};

/// Placeholder for any lookup that found nothing
pub const UNKNOWN: &str = "Unknown";

/// Flag shown for factories with no known country
pub const FACTORY_FLAG: &str = "🏭";

/// A decoded VIN
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedVin {
    pub vin: String,
    pub wmi: String,
    pub vds: String,
    pub vis: String,
    pub check_digit: char,
    pub computed_check_digit: char,
    pub check_digit_valid: bool,
    pub model_year_char: char,
    pub plant_code: char,
    pub serial_number: String,

    pub region: String,
    pub region_country: Option<String>,
    pub region_flag: Option<String>,

    pub country: String,
    pub country_flag: Option<String>,
    pub country_region: Option<String>,

    pub manufacturer: String,
    pub factory_country: String,
    pub factory_flag: Option<String>,

    /// Approximate: see `model_year` module notes
    pub model_year: ModelYear,
}

/// Decoder/generator bound to one table set and one notion of "now"
#[derive(Debug, Clone, Copy)]
pub struct VinCodec<'a> {
    pub(crate) tables: &'a TableSet,
    pub(crate) current_year: i32,
}

impl<'a> VinCodec<'a> {
    /// Codec using the current UTC year for model year resolution
    pub fn new(tables: &'a TableSet) -> Self {
        Self::with_current_year(tables, current_year())
    }

    /// Codec with a pinned current year, for reproducible results
    pub fn with_current_year(tables: &'a TableSet, current_year: i32) -> Self {
        Self { tables, current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Decode a VIN
    ///
    /// Only malformed input fails. Missing region/country/manufacturer
    /// entries are reported as "Unknown" and an invalid check digit is
    /// reported through `check_digit_valid`.
    pub fn decode(&self, vin: &str) -> Result<DecodedVin, DecodeError> {
        let vin = normalize(vin)?;
        let chars: Vec<char> = vin.chars().collect();

        let wmi: String = chars[0..3].iter().collect();
        let country_code: String = chars[0..2].iter().collect();
        let region_code: String = chars[0..1].iter().collect();

        let check_digit = chars[CHECK_DIGIT_POSITION];
        let computed_check_digit = compute_check_digit(&vin);

        let region_entity = self.tables.region(&region_code);
        let country_entity = self.tables.country(&country_code);
        let factory = self.tables.manufacturer(&wmi);

        let region = region_entity
            .map(|e| e.region.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let (manufacturer, factory_country, factory_flag) = match factory {
            Some(entry) => {
                let entity = self
                    .tables
                    .entities
                    .get(&entry.country)
                    .filter(|e| !e.key.is_unknown());
                match entity {
                    Some(entity) => (entry.name.clone(), entity.name.clone(), entity.flag.clone()),
                    None => (entry.name.clone(), region.clone(), Some(FACTORY_FLAG.to_string())),
                }
            }
            None => (UNKNOWN.to_string(), UNKNOWN.to_string(), None),
        };

        Ok(DecodedVin {
            wmi,
            vds: chars[3..9].iter().collect(),
            vis: chars[9..17].iter().collect(),
            check_digit,
            computed_check_digit,
            check_digit_valid: check_digit == computed_check_digit,
            model_year_char: chars[9],
            plant_code: chars[10],
            serial_number: chars[11..17].iter().collect(),

            region_country: region_entity.map(|e| e.name.clone()),
            region_flag: region_entity.and_then(|e| e.flag.clone()),
            region,

            country: country_entity
                .map(|e| e.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            country_flag: country_entity.and_then(|e| e.flag.clone()),
            country_region: country_entity.map(|e| e.region.clone()),

            manufacturer,
            factory_country,
            factory_flag,

            model_year: resolve_model_year(chars[9], self.current_year),
            vin,
        })
    }
}

/// Trim, uppercase and check length and alphabet
pub fn normalize(vin: &str) -> Result<String, DecodeError> {
    let vin = vin.trim().to_uppercase();

    let length = vin.chars().count();
    if length != VIN_LENGTH {
        return Err(DecodeError::InvalidLength { length });
    }

    if let Some((position, character)) = vin.chars().enumerate().find(|(_, c)| !is_vin_char(*c)) {
        return Err(DecodeError::InvalidCharacter { character, position });
    }

    Ok(vin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vin::checksum::{transliterate, WEIGHTS};
    use crate::wmi::{build_tables, ManufacturerRow, RangeRow, RawData};
    use crate::reference::Entity;

    fn tables() -> TableSet {
        build_tables(RawData {
            countries: vec![
                Entity::new("US", "United States", "North America", Some("🇺🇸")),
                Entity::new("JP", "Japan", "Asia", Some("🇯🇵")),
            ],
            regions: vec![RangeRow::new("1-5", "United States"), RangeRow::new("J", "Japan")],
            country_codes: vec![
                RangeRow::new("1, 4, 5", "United States"),
                RangeRow::new("J", "Japan"),
            ],
            manufacturers: vec![
                ManufacturerRow::new("1HG", "Honda of America Mfg."),
                ManufacturerRow::new("JHM", "Honda"),
            ],
        })
        .tables
    }

    fn independent_check_digit(vin: &str) -> char {
        let sum: u32 = vin
            .chars()
            .enumerate()
            .map(|(i, c)| transliterate(c).unwrap() * WEIGHTS[i])
            .sum();
        if sum % 11 == 10 {
            'X'
        } else {
            char::from_digit(sum % 11, 10).unwrap()
        }
    }

    #[test]
    fn test_decode_known_vin() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        let decoded = codec.decode("1HGCM82633A004352").unwrap();

        assert_eq!(decoded.wmi, "1HG");
        assert_eq!(decoded.vds, "CM8263");
        assert_eq!(decoded.vis, "3A004352");
        assert_eq!(decoded.check_digit, '3');
        assert_eq!(
            decoded.check_digit_valid,
            decoded.check_digit == independent_check_digit(&decoded.vin)
        );
        assert!(decoded.check_digit_valid);
        assert_eq!(decoded.model_year_char, '3');
        assert_eq!(decoded.plant_code, 'A');
        assert_eq!(decoded.serial_number, "004352");

        assert_eq!(decoded.region, "North America");
        assert_eq!(decoded.region_country.as_deref(), Some("United States"));
        assert_eq!(decoded.country, "United States");
        assert_eq!(decoded.country_region.as_deref(), Some("North America"));
        assert_eq!(decoded.manufacturer, "Honda of America Mfg.");
        assert_eq!(decoded.factory_country, "United States");
        // 2033 is in the future for 2026
        assert_eq!(decoded.model_year, ModelYear::Unknown);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        assert_eq!(codec.decode("1HGCM82633A004352"), codec.decode("1HGCM82633A004352"));
    }

    #[test]
    fn test_decode_normalizes_input() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        let decoded = codec.decode("  1hgcm82633a004352 ").unwrap();
        assert_eq!(decoded.vin, "1HGCM82633A004352");
    }

    #[test]
    fn test_invalid_length() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        assert_eq!(
            codec.decode("1HGCM82633A00435"),
            Err(DecodeError::InvalidLength { length: 16 })
        );
        assert_eq!(
            codec.decode("1HGCM82633A0043521"),
            Err(DecodeError::InvalidLength { length: 18 })
        );
        assert_eq!(codec.decode(""), Err(DecodeError::InvalidLength { length: 0 }));
    }

    #[test]
    fn test_invalid_character_is_named() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        assert_eq!(
            codec.decode("1HGCI82633A004352"),
            Err(DecodeError::InvalidCharacter { character: 'I', position: 4 })
        );
        assert!(matches!(
            codec.decode("1HGCM82633A00435o"),
            Err(DecodeError::InvalidCharacter { character: 'O', .. })
        ));
        assert!(matches!(
            codec.decode("1HGCM8263-A004352"),
            Err(DecodeError::InvalidCharacter { character: '-', .. })
        ));
    }

    #[test]
    fn test_bad_check_digit_still_decodes() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        let decoded = codec.decode("1HGCM82643A004352").unwrap();
        assert!(!decoded.check_digit_valid);
        assert_eq!(decoded.computed_check_digit, '3');
    }

    #[test]
    fn test_unknown_lookups_are_partial_results() {
        let tables = tables();
        let codec = VinCodec::with_current_year(&tables, 2026);
        // W is not seeded: the country falls to the gap-filled Unknown entity
        let decoded = codec.decode("WVWZZZ1JZXW000001").unwrap();
        assert_eq!(decoded.region, "Unknown");
        assert_eq!(decoded.region_country, None);
        assert_eq!(decoded.country, "Unknown");
        assert_eq!(decoded.manufacturer, "Unknown");
        assert_eq!(decoded.factory_country, "Unknown");
        // 'X' is 2029
        assert_eq!(decoded.model_year, ModelYear::Unknown);
        assert_eq!(codec.current_year(), 2026);
    }

    #[test]
    fn test_factory_without_country_reports_region() {
        // X is a known region but XA has no country row, so gap fill owns it
        let tables = build_tables(RawData {
            countries: vec![Entity::new("DE", "Germany", "Europe", Some("🇩🇪"))],
            regions: vec![RangeRow::new("X", "Germany")],
            country_codes: vec![RangeRow::new("W", "Germany")],
            manufacturers: vec![ManufacturerRow::new("XAA", "Mystery Motors")],
        })
        .tables;
        let codec = VinCodec::with_current_year(&tables, 2026);
        let decoded = codec.decode("XAAAB12340A000001").unwrap();

        assert_eq!(decoded.region, "Europe");
        assert_eq!(decoded.country, "Unknown");
        assert_eq!(decoded.manufacturer, "Mystery Motors");
        assert_eq!(decoded.factory_country, "Europe");
        assert_eq!(decoded.factory_flag.as_deref(), Some("🏭"));
    }

    #[test]
    fn test_decode_with_empty_tables() {
        let tables = TableSet::default();
        let codec = VinCodec::with_current_year(&tables, 2026);
        let decoded = codec.decode("JHMCM82633A004352").unwrap();
        assert_eq!(decoded.country, "Unknown");
        assert_eq!(decoded.manufacturer, "Unknown");
    }
}
