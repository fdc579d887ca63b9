// Raw data sources for table building
//
// - countries: mledoze/countries dataset (downloaded once, cached)
// - wmi_files: region, country and factory code files from the data directory

pub mod countries;
pub mod download;
pub mod wmi_files;

use crate::config::Config;
use crate::error::SourceError;
use crate::wmi::RawData;

pub use countries::{map_region, parse_countries};
pub use wmi_files::{parse_country_codes, parse_factory_codes, parse_region_codes};

/// Load everything `build_tables` needs
pub async fn load_raw_data(config: &Config) -> Result<RawData, SourceError> {
    let cache_path = config.countries_cache_path();
    let countries_json = download::fetch_cached(&config.countries_url, &cache_path).await?;
    let countries = parse_countries(&countries_json)
        .map_err(|source| SourceError::Json { path: cache_path, source })?;

    let regions = wmi_files::load_region_codes(&config.data_dir).await?;
    let country_codes = wmi_files::load_country_codes(&config.data_dir).await?;
    let manufacturers = wmi_files::load_factory_codes(&config.data_dir).await?;

    log::info!(
        "Loaded raw data: {} countries, {} region rows, {} country rows, {} factory rows",
        countries.len(),
        regions.len(),
        country_codes.len(),
        manufacturers.len()
    );

    Ok(RawData { countries, regions, country_codes, manufacturers })
}
