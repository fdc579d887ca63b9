// Table persistence
//
// A seed replaces the stored tables wholesale; the decoder only ever reads a
// TableSet rebuilt from these rows, never the rows themselves.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use sqlx::{Pool, Row, Sqlite};

use crate::error::StoreError;
use crate::reference::{AliasIndex, Entity, EntityKey, EntityRegistry, ManufacturerEntry, TableSet};

/// Source name recorded in reference_data_version
pub const TABLES_SOURCE: &str = "wmi_tables";

/// Replace everything stored with the given table set, in one transaction
pub async fn save_tables(pool: &Pool<Sqlite>, tables: &TableSet) -> Result<(), StoreError> {
    let mut tx = pool.begin().await.map_err(StoreError::query("begin transaction"))?;

    for table in [
        "wmi_factory_codes",
        "wmi_country_claims",
        "wmi_country_codes",
        "wmi_region_codes",
        "country_aliases",
        "countries",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query(format!("clear {}", table)))?;
    }

    for entity in tables.entities.iter() {
        sqlx::query(
            "INSERT INTO countries (iso_alpha2, name, official_name, region, subregion, flag,
                                    iso_alpha3, iso_numeric, currency_code, calling_code, tld)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entity.key.as_str())
        .bind(&entity.name)
        .bind(&entity.official_name)
        .bind(&entity.region)
        .bind(&entity.subregion)
        .bind(&entity.flag)
        .bind(&entity.iso_alpha3)
        .bind(&entity.iso_numeric)
        .bind(&entity.currency_code)
        .bind(&entity.calling_code)
        .bind(&entity.tld)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::query(format!("insert country {}", entity.key)))?;

        for (position, alias) in entity.aliases.iter().enumerate() {
            sqlx::query(
                "INSERT INTO country_aliases (iso_alpha2, position, alias) VALUES (?, ?, ?)",
            )
            .bind(entity.key.as_str())
            .bind(position as i64)
            .bind(alias)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query(format!("insert alias {}", alias)))?;
        }
    }

    for (code, key) in tables.regions.iter() {
        sqlx::query("INSERT INTO wmi_region_codes (code, iso_alpha2) VALUES (?, ?)")
            .bind(code)
            .bind(key.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query(format!("insert region code {}", code)))?;
    }

    for (code, key) in tables.countries.iter() {
        sqlx::query("INSERT INTO wmi_country_codes (code, iso_alpha2) VALUES (?, ?)")
            .bind(code)
            .bind(key.as_str())
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query(format!("insert country code {}", code)))?;
    }

    for (code, names) in tables.country_claims.iter() {
        for (position, name) in names.iter().enumerate() {
            sqlx::query(
                "INSERT INTO wmi_country_claims (code, position, entity_name) VALUES (?, ?, ?)",
            )
            .bind(code)
            .bind(position as i64)
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query(format!("insert claim {}", code)))?;
        }
    }

    for (wmi, entry) in tables.manufacturers.iter() {
        sqlx::query(
            "INSERT INTO wmi_factory_codes (wmi, manufacturer, iso_alpha2) VALUES (?, ?, ?)",
        )
        .bind(wmi)
        .bind(&entry.name)
        .bind(entry.country.as_str())
        .execute(&mut *tx)
        .await
        .map_err(StoreError::query(format!("insert factory code {}", wmi)))?;
    }

    let now = Utc::now();
    sqlx::query(
        "INSERT OR REPLACE INTO reference_data_version (source, version, updated_at)
         VALUES (?, ?, ?)",
    )
    .bind(TABLES_SOURCE)
    .bind(now.format("%Y.%m.%d").to_string())
    .bind(now.to_rfc3339())
    .execute(&mut *tx)
    .await
    .map_err(StoreError::query("update reference version"))?;

    tx.commit().await.map_err(StoreError::query("commit tables"))?;

    log::info!(
        "Saved tables: {} countries, {} region codes, {} country codes, {} WMIs",
        tables.entities.len(),
        tables.regions.len(),
        tables.countries.len(),
        tables.manufacturers.len()
    );
    Ok(())
}

/// Rebuild a table set from the stored rows
pub async fn load_tables(pool: &Pool<Sqlite>) -> Result<TableSet, StoreError> {
    let mut aliases: HashMap<String, Vec<String>> = HashMap::new();
    let alias_rows = sqlx::query(
        "SELECT iso_alpha2, alias FROM country_aliases ORDER BY iso_alpha2, position",
    )
    .fetch_all(pool)
    .await
    .map_err(StoreError::query("load country aliases"))?;
    for row in alias_rows {
        aliases
            .entry(row.get("iso_alpha2"))
            .or_default()
            .push(row.get("alias"));
    }

    let country_rows = sqlx::query("SELECT * FROM countries ORDER BY iso_alpha2")
        .fetch_all(pool)
        .await
        .map_err(StoreError::query("load countries"))?;

    let entities = country_rows.into_iter().map(|row| {
        let key: String = row.get("iso_alpha2");
        Entity {
            aliases: aliases.remove(&key).unwrap_or_default(),
            key: EntityKey::new(&key),
            name: row.get("name"),
            official_name: row.get("official_name"),
            region: row.get("region"),
            subregion: row.get("subregion"),
            flag: row.get("flag"),
            iso_alpha3: row.get("iso_alpha3"),
            iso_numeric: row.get("iso_numeric"),
            currency_code: row.get("currency_code"),
            calling_code: row.get("calling_code"),
            tld: row.get("tld"),
        }
    });
    // The stored sentinel row is skipped here; the registry supplies its own
    let registry = EntityRegistry::from_records(entities, AliasIndex::with_defaults());
    let mut tables = TableSet::empty(registry);

    let rows = sqlx::query("SELECT code, iso_alpha2 FROM wmi_region_codes")
        .fetch_all(pool)
        .await
        .map_err(StoreError::query("load region codes"))?;
    for row in rows {
        let key: String = row.get("iso_alpha2");
        tables.regions.insert(row.get("code"), EntityKey::new(&key));
    }

    let rows = sqlx::query("SELECT code, iso_alpha2 FROM wmi_country_codes")
        .fetch_all(pool)
        .await
        .map_err(StoreError::query("load country codes"))?;
    for row in rows {
        let key: String = row.get("iso_alpha2");
        tables.countries.insert(row.get("code"), EntityKey::new(&key));
    }

    let rows = sqlx::query(
        "SELECT code, entity_name FROM wmi_country_claims ORDER BY code, position",
    )
    .fetch_all(pool)
    .await
    .map_err(StoreError::query("load country claims"))?;
    for row in rows {
        let code: String = row.get("code");
        let name: String = row.get("entity_name");
        tables.country_claims.record(&code, &name);
    }

    let rows = sqlx::query("SELECT wmi, manufacturer, iso_alpha2 FROM wmi_factory_codes")
        .fetch_all(pool)
        .await
        .map_err(StoreError::query("load factory codes"))?;
    for row in rows {
        let key: String = row.get("iso_alpha2");
        tables.manufacturers.insert(
            row.get("wmi"),
            ManufacturerEntry { name: row.get("manufacturer"), country: EntityKey::new(&key) },
        );
    }

    log::info!(
        "Loaded tables: {} countries, {} country codes, {} WMIs",
        tables.entities.len(),
        tables.countries.len(),
        tables.manufacturers.len()
    );
    Ok(tables)
}

/// Whether a seed has been stored
pub async fn has_tables(pool: &Pool<Sqlite>) -> Result<bool, StoreError> {
    let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM wmi_country_codes")
        .fetch_one(pool)
        .await
        .map(|row| row.get("count"))
        .map_err(StoreError::query("count country codes"))?;
    Ok(count > 0)
}

/// Row counts and version of the stored reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub country_count: i64,
    pub alias_count: i64,
    pub region_code_count: i64,
    pub country_code_count: i64,
    pub claim_count: i64,
    pub factory_code_count: i64,
    pub version: Option<String>,
    pub updated_at: Option<String>,
}

pub async fn get_db_stats(pool: &Pool<Sqlite>) -> Result<DbStats, StoreError> {
    async fn count(pool: &Pool<Sqlite>, table: &str) -> Result<i64, StoreError> {
        sqlx::query(&format!("SELECT COUNT(*) as count FROM {}", table))
            .fetch_one(pool)
            .await
            .map(|row| row.get("count"))
            .map_err(StoreError::query(format!("count {}", table)))
    }

    let version = sqlx::query(
        "SELECT version, updated_at FROM reference_data_version WHERE source = ?",
    )
    .bind(TABLES_SOURCE)
    .fetch_optional(pool)
    .await
    .map_err(StoreError::query("read reference version"))?;

    Ok(DbStats {
        country_count: count(pool, "countries").await?,
        alias_count: count(pool, "country_aliases").await?,
        region_code_count: count(pool, "wmi_region_codes").await?,
        country_code_count: count(pool, "wmi_country_codes").await?,
        claim_count: count(pool, "wmi_country_claims").await?,
        factory_code_count: count(pool, "wmi_factory_codes").await?,
        version: version.as_ref().map(|row| row.get("version")),
        updated_at: version.as_ref().map(|row| row.get("updated_at")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::memory_db;
    use crate::reference::all_codes;
    use crate::wmi::{build_tables, ManufacturerRow, RangeRow, RawData};

    fn tables() -> TableSet {
        build_tables(RawData {
            countries: vec![
                Entity::new("ZA", "South Africa", "Africa", Some("🇿🇦")),
                Entity::new("CI", "Ivory Coast", "Africa", None),
                Entity::new("US", "United States", "North America", Some("🇺🇸"))
                    .with_aliases(["USA", "United States of America"]),
            ],
            regions: vec![RangeRow::new("A", "South Africa"), RangeRow::new("1", "USA")],
            country_codes: vec![
                RangeRow::new("AA-AH", "South Africa"),
                RangeRow::new("AF-AK", "Ivory Coast"),
                RangeRow::new("1", "United States"),
            ],
            manufacturers: vec![
                ManufacturerRow::new("1FA", "Ford"),
                ManufacturerRow::new("1FA", "Mercury"),
                ManufacturerRow::new("AAV", "Volkswagen SA"),
            ],
        })
        .tables
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let pool = memory_db().await;
        let original = tables();
        save_tables(&pool, &original).await.unwrap();

        let loaded = load_tables(&pool).await.unwrap();
        assert_eq!(loaded.regions, original.regions);
        assert_eq!(loaded.countries, original.countries);
        assert_eq!(loaded.manufacturers, original.manufacturers);
        assert_eq!(loaded.country_claims, original.country_claims);
        assert_eq!(
            loaded.entities.iter().collect::<Vec<_>>(),
            original.entities.iter().collect::<Vec<_>>()
        );
        assert_eq!(loaded.manufacturer("1FA").map(|m| m.name.as_str()), Some("Ford & Mercury"));
        assert_eq!(loaded.validate(), original.validate());
    }

    #[tokio::test]
    async fn test_loaded_registry_resolves_aliases() {
        let pool = memory_db().await;
        save_tables(&pool, &tables()).await.unwrap();
        let loaded = load_tables(&pool).await.unwrap();
        assert_eq!(loaded.entities.resolve("USA"), Some(&EntityKey::new("US")));
    }

    #[tokio::test]
    async fn test_reseed_replaces_rows() {
        let pool = memory_db().await;
        save_tables(&pool, &tables()).await.unwrap();
        save_tables(&pool, &tables()).await.unwrap();

        let stats = get_db_stats(&pool).await.unwrap();
        assert_eq!(stats.country_code_count, all_codes(2).len() as i64);
        // 3 countries + Unknown
        assert_eq!(stats.country_count, 4);
        assert_eq!(stats.region_code_count, 2);
        assert_eq!(stats.factory_code_count, 2);
        assert!(stats.version.is_some());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let pool = memory_db().await;
        assert!(!has_tables(&pool).await.unwrap());

        let stats = get_db_stats(&pool).await.unwrap();
        assert_eq!(stats.country_count, 0);
        assert_eq!(stats.version, None);

        let loaded = load_tables(&pool).await.unwrap();
        assert!(loaded.countries.is_empty());
        // Sentinel only
        assert_eq!(loaded.entities.len(), 1);
    }
}
