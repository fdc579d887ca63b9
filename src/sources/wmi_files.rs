// WMI source files
//
// wmi_region_codes.json   {"<region label>": {"<code>": ["<country>", ...]}}
// wmi_country_codes.json  [{"range": "AA-AH", "country": "South Africa"}]
// wmi_factory_codes.json  [{"WMI": "JHM", "Manufacturer": "Honda", "Country": "Japan"}]
//
// Row order is preserved: earlier rows win code conflicts.

use std::path::Path;

use serde::Deserialize;

use crate::error::SourceError;
use crate::wmi::{ManufacturerRow, RangeRow};

use super::download::read_text;

pub const REGION_CODES_FILE: &str = "wmi_region_codes.json";
pub const COUNTRY_CODES_FILE: &str = "wmi_country_codes.json";
pub const FACTORY_CODES_FILE: &str = "wmi_factory_codes.json";

type RegionFile = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Deserialize)]
struct CountryCodeEntry {
    #[serde(default)]
    range: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct FactoryCodeEntry {
    #[serde(rename = "WMI", default)]
    wmi: String,
    #[serde(rename = "Manufacturer", default)]
    manufacturer: String,
    #[serde(rename = "Country", default)]
    country: Option<String>,
}

/// Parse region codes; each listed country becomes one row
pub fn parse_region_codes(json: &str) -> Result<Vec<RangeRow>, serde_json::Error> {
    let regions: RegionFile = serde_json::from_str(json)?;
    let mut rows = Vec::new();

    for (label, codes) in regions {
        let codes: serde_json::Map<String, serde_json::Value> = serde_json::from_value(codes)?;
        log::debug!("Region {}: {} codes", label, codes.len());

        for (code, countries) in codes {
            let countries: Vec<String> = serde_json::from_value(countries)?;
            rows.extend(countries.iter().map(|country| RangeRow::new(&code, country)));
        }
    }

    Ok(rows)
}

pub fn parse_country_codes(json: &str) -> Result<Vec<RangeRow>, serde_json::Error> {
    let entries: Vec<CountryCodeEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|e| RangeRow { range: e.range, target: e.country })
        .collect())
}

pub fn parse_factory_codes(json: &str) -> Result<Vec<ManufacturerRow>, serde_json::Error> {
    let entries: Vec<FactoryCodeEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|e| ManufacturerRow {
            wmi: e.wmi.trim().to_string(),
            manufacturer: e.manufacturer.trim().to_string(),
            country: e.country.filter(|c| !c.trim().is_empty()),
        })
        .collect())
}

/// Read and parse one file from the data directory
async fn load<T>(
    data_dir: &Path,
    file: &str,
    parse: fn(&str) -> Result<T, serde_json::Error>,
) -> Result<T, SourceError> {
    let path = data_dir.join(file);
    log::info!("Loading {}", path.display());
    let text = read_text(&path).await?;
    parse(&text).map_err(|source| SourceError::Json { path, source })
}

pub async fn load_region_codes(data_dir: &Path) -> Result<Vec<RangeRow>, SourceError> {
    load(data_dir, REGION_CODES_FILE, parse_region_codes).await
}

pub async fn load_country_codes(data_dir: &Path) -> Result<Vec<RangeRow>, SourceError> {
    load(data_dir, COUNTRY_CODES_FILE, parse_country_codes).await
}

pub async fn load_factory_codes(data_dir: &Path) -> Result<Vec<ManufacturerRow>, SourceError> {
    load(data_dir, FACTORY_CODES_FILE, parse_factory_codes).await
}
