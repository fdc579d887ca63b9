// Countries dataset (mledoze/countries)
//
// Only the fields the decoder and store use are deserialized. Records with
// no ISO alpha-2 code are skipped.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::reference::Entity;

#[derive(Debug, Deserialize)]
struct CountryRecord {
    cca2: Option<String>,
    cca3: Option<String>,
    ccn3: Option<String>,
    name: CountryName,
    #[serde(default, rename = "altSpellings")]
    alt_spellings: Vec<String>,
    #[serde(default)]
    region: String,
    subregion: Option<String>,
    #[serde(default)]
    currencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    idd: Idd,
    #[serde(default)]
    tld: Vec<String>,
    flag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CountryName {
    common: String,
    official: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Idd {
    root: Option<String>,
    #[serde(default)]
    suffixes: Vec<String>,
}

/// Map a dataset region to a VIN region label
///
/// "Americas" is split using the subregion; everything else passes through.
pub fn map_region(region: &str, subregion: Option<&str>) -> String {
    if region != "Americas" {
        return region.to_string();
    }
    match subregion {
        Some("South America") => "South America".to_string(),
        _ => "North America".to_string(),
    }
}

/// Calling code as root + first suffix ("+1" + "" = "+1", "+4" + "4" = "+44")
fn calling_code(idd: &Idd) -> Option<String> {
    let root = idd.root.as_deref().filter(|r| !r.is_empty())?;
    Some(match idd.suffixes.first() {
        Some(suffix) => format!("{}{}", root, suffix),
        None => root.to_string(),
    })
}

/// Parse the countries dataset into entities
pub fn parse_countries(json: &str) -> Result<Vec<Entity>, serde_json::Error> {
    let records: Vec<CountryRecord> = serde_json::from_str(json)?;
    let total = records.len();

    let entities: Vec<Entity> = records
        .into_iter()
        .filter_map(|record| {
            let Some(cca2) = record.cca2.filter(|c| !c.trim().is_empty()) else {
                log::warn!("Skipping country without ISO alpha-2 code: {}", record.name.common);
                return None;
            };

            let region = map_region(&record.region, record.subregion.as_deref());
            let mut entity =
                Entity::new(&cca2, &record.name.common, &region, record.flag.as_deref())
                    .with_aliases(record.alt_spellings);
            entity.official_name = record.name.official;
            entity.subregion = record.subregion;
            entity.iso_alpha3 = record.cca3;
            entity.iso_numeric = record.ccn3.filter(|n| !n.is_empty());
            entity.currency_code = record.currencies.into_keys().next();
            entity.calling_code = calling_code(&record.idd);
            entity.tld = record.tld.into_iter().next();
            Some(entity)
        })
        .collect();

    log::info!("Parsed {} of {} country records", entities.len(), total);
    Ok(entities)
}
