// Runtime configuration
//
// Values come from the environment, falling back to defaults; the CLI
// overrides individual fields from its flags.

use std::path::PathBuf;

pub const ENV_DB: &str = "VINDECODER_DB";
pub const ENV_DATA_DIR: &str = "VINDECODER_DATA_DIR";
pub const ENV_COUNTRIES_URL: &str = "VINDECODER_COUNTRIES_URL";
pub const ENV_COUNTRIES_CACHE: &str = "VINDECODER_COUNTRIES_CACHE";

pub const DEFAULT_DB_PATH: &str = "instance/vin.db";
pub const DEFAULT_DATA_DIR: &str = "json";
pub const DEFAULT_COUNTRIES_URL: &str =
    "https://raw.githubusercontent.com/mledoze/countries/master/countries.json";
const COUNTRIES_CACHE_FILE: &str = "countries.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,
    /// Directory holding the wmi_*.json source files
    pub data_dir: PathBuf,
    /// Countries dataset download URL
    pub countries_url: String,
    /// Countries dataset cache; None means `<data_dir>/countries.json`
    pub countries_cache: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
            countries_cache: None,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: get(ENV_DB).map(PathBuf::from).unwrap_or(defaults.db_path),
            data_dir: get(ENV_DATA_DIR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            countries_url: get(ENV_COUNTRIES_URL).unwrap_or(defaults.countries_url),
            countries_cache: get(ENV_COUNTRIES_CACHE).map(PathBuf::from),
        }
    }

    /// Effective countries cache path
    pub fn countries_cache_path(&self) -> PathBuf {
        self.countries_cache
            .clone()
            .unwrap_or_else(|| self.data_dir.join(COUNTRIES_CACHE_FILE))
    }
}
