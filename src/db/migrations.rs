/// SQL migration for the reference data schema
///
/// Design principles:
/// - Country entities keyed by ISO alpha-2 ("XX" is the Unknown sentinel)
/// - One row per expanded code, so lookups are a primary key hit
/// - Claims keep every entity that asked for a country code, in claim order
/// - Ordered child rows carry a `position` column so a reload rebuilds the
///   same tables
pub const MIGRATION_001: &str = r#"
-- =============================================================================
-- Countries (mledoze/countries dataset + Unknown sentinel)
-- =============================================================================
CREATE TABLE IF NOT EXISTS countries (
    iso_alpha2      TEXT PRIMARY KEY,
    name            TEXT NOT NULL,          -- common name, used for lookups
    official_name   TEXT,
    region          TEXT NOT NULL,          -- VIN region label
    subregion       TEXT,
    flag            TEXT,
    iso_alpha3      TEXT,
    iso_numeric     TEXT,
    currency_code   TEXT,
    calling_code    TEXT,
    tld             TEXT
);

CREATE INDEX IF NOT EXISTS idx_countries_name ON countries(name);

CREATE TABLE IF NOT EXISTS country_aliases (
    iso_alpha2      TEXT NOT NULL REFERENCES countries(iso_alpha2),
    position        INTEGER NOT NULL,
    alias           TEXT NOT NULL,
    PRIMARY KEY (iso_alpha2, position)
);

-- =============================================================================
-- WMI code tiers
-- =============================================================================
CREATE TABLE IF NOT EXISTS wmi_region_codes (
    code            TEXT PRIMARY KEY,       -- 1 char
    iso_alpha2      TEXT NOT NULL REFERENCES countries(iso_alpha2)
);

CREATE TABLE IF NOT EXISTS wmi_country_codes (
    code            TEXT PRIMARY KEY,       -- 2 chars
    iso_alpha2      TEXT NOT NULL REFERENCES countries(iso_alpha2)
);

CREATE INDEX IF NOT EXISTS idx_wmi_country_codes_country ON wmi_country_codes(iso_alpha2);

CREATE TABLE IF NOT EXISTS wmi_country_claims (
    code            TEXT NOT NULL,
    position        INTEGER NOT NULL,
    entity_name     TEXT NOT NULL,
    PRIMARY KEY (code, position)
);

CREATE TABLE IF NOT EXISTS wmi_factory_codes (
    wmi             TEXT PRIMARY KEY,       -- 3 chars
    manufacturer    TEXT NOT NULL,          -- merged names joined with " & "
    iso_alpha2      TEXT NOT NULL REFERENCES countries(iso_alpha2)
);

-- =============================================================================
-- Reference data version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS reference_data_version (
    source          TEXT PRIMARY KEY,
    version         TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);
"#;
