// Country entities
//
// Every region/country/WMI code resolves to one of these. Keys are ISO
// 3166-1 alpha-2 codes; the synthetic key "XX" is the Unknown sentinel that
// owns every code no source assigns.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::aliases::AliasIndex;

/// Stable entity identifier (ISO alpha-2, or "XX" for Unknown)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(key: &str) -> Self {
        EntityKey(key.trim().to_uppercase())
    }

    pub fn unknown() -> Self {
        EntityKey(UNKNOWN_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_KEY
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const UNKNOWN_KEY: &str = "XX";
pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_FLAG: &str = "🏳";

/// A country (or the Unknown placeholder) as loaded from the countries dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub key: EntityKey,
    /// Canonical display name (the dataset's common name)
    pub name: String,
    pub official_name: Option<String>,
    /// Alternative names used when resolving source tables
    pub aliases: Vec<String>,
    /// VIN region label, e.g. "Europe", "North America"
    pub region: String,
    pub subregion: Option<String>,
    pub flag: Option<String>,
    pub iso_alpha3: Option<String>,
    pub iso_numeric: Option<String>,
    pub currency_code: Option<String>,
    pub calling_code: Option<String>,
    pub tld: Option<String>,
}

impl Entity {
    /// Minimal entity with only the fields the decoder needs
    pub fn new(key: &str, name: &str, region: &str, flag: Option<&str>) -> Self {
        Self {
            key: EntityKey::new(key),
            name: name.to_string(),
            official_name: None,
            aliases: Vec::new(),
            region: region.to_string(),
            subregion: None,
            flag: flag.map(str::to_string),
            iso_alpha3: None,
            iso_numeric: None,
            currency_code: None,
            calling_code: None,
            tld: None,
        }
    }

    /// The catch-all entity for unassigned or unresolvable ranges
    pub fn unknown() -> Self {
        Self {
            key: EntityKey::unknown(),
            name: UNKNOWN_NAME.to_string(),
            official_name: Some(UNKNOWN_NAME.to_string()),
            aliases: Vec::new(),
            region: UNKNOWN_NAME.to_string(),
            subregion: Some(UNKNOWN_NAME.to_string()),
            flag: Some(UNKNOWN_FLAG.to_string()),
            iso_alpha3: Some("XXX".to_string()),
            iso_numeric: Some("999".to_string()),
            currency_code: None,
            calling_code: None,
            tld: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

/// All known entities plus the name/alias indexes used to resolve them
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: BTreeMap<EntityKey, Entity>,
    /// Lowercased canonical name -> key (first registration wins)
    by_name: HashMap<String, EntityKey>,
    aliases: AliasIndex,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(AliasIndex::with_defaults())
    }
}

impl EntityRegistry {
    /// Empty registry containing only the Unknown sentinel
    pub fn new(aliases: AliasIndex) -> Self {
        let mut registry = Self {
            entities: BTreeMap::new(),
            by_name: HashMap::new(),
            aliases,
        };
        registry.register(Entity::unknown());
        registry
    }

    pub fn from_records(records: impl IntoIterator<Item = Entity>, aliases: AliasIndex) -> Self {
        let mut registry = Self::new(aliases);
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Register an entity. Returns false if it was ignored (duplicate key, or
    /// an attempt to replace the Unknown sentinel).
    pub fn insert(&mut self, entity: Entity) -> bool {
        if entity.key.is_unknown() || entity.name.eq_ignore_ascii_case(UNKNOWN_NAME) {
            log::debug!("Ignoring record that would shadow the Unknown sentinel: {}", entity.key);
            return false;
        }
        if self.entities.contains_key(&entity.key) {
            log::debug!("Ignoring duplicate entity {}", entity.key);
            return false;
        }
        self.register(entity);
        true
    }

    fn register(&mut self, entity: Entity) {
        let group = entity.name.clone();
        self.aliases.add_group(
            &group,
            std::iter::once(entity.name.as_str())
                .chain(entity.official_name.as_deref())
                .chain(entity.aliases.iter().map(String::as_str)),
        );
        self.by_name
            .entry(entity.name.to_lowercase())
            .or_insert_with(|| entity.key.clone());
        self.entities.insert(entity.key.clone(), entity);
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// The Unknown sentinel (always present)
    pub fn unknown(&self) -> &Entity {
        static FALLBACK: std::sync::OnceLock<Entity> = std::sync::OnceLock::new();
        self.entities
            .get(&EntityKey::unknown())
            .unwrap_or_else(|| FALLBACK.get_or_init(Entity::unknown))
    }

    /// Look up an entity by exact canonical name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Option<&EntityKey> {
        self.by_name.get(&name.trim().to_lowercase())
    }

    /// Resolve a raw source name to an entity
    ///
    /// Tries the canonical names first, then every alias group the name is
    /// listed in, member by member, until one matches a canonical name.
    pub fn resolve(&self, name: &str) -> Option<&EntityKey> {
        if let Some(key) = self.find_by_name(name) {
            return Some(key);
        }
        self.aliases
            .candidates(name)
            .find_map(|candidate| self.find_by_name(candidate))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities, including the sentinel
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn aliases(&self) -> &AliasIndex {
        &self.aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EntityRegistry {
        EntityRegistry::from_records(
            vec![
                Entity::new("US", "United States", "North America", Some("🇺🇸")),
                Entity::new("CZ", "Czechia", "Europe", Some("🇨🇿")),
                Entity::new("DE", "Germany", "Europe", Some("🇩🇪"))
                    .with_aliases(["Deutschland", "Federal Republic of Germany"]),
            ],
            AliasIndex::with_defaults(),
        )
    }

    #[test]
    fn test_unknown_sentinel_always_present() {
        let reg = EntityRegistry::default();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.unknown().name, "Unknown");
        assert!(reg.unknown().key.is_unknown());
    }

    #[test]
    fn test_sentinel_cannot_be_replaced() {
        let mut reg = registry();
        assert!(!reg.insert(Entity::new("XX", "Somewhere", "Nowhere", None)));
        assert!(!reg.insert(Entity::new("ZZ", "unknown", "Nowhere", None)));
        assert_eq!(reg.unknown().region, "Unknown");
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn test_resolve_canonical_case_insensitive() {
        let reg = registry();
        assert_eq!(reg.resolve("united states"), Some(&EntityKey::new("US")));
        assert_eq!(reg.resolve("  GERMANY "), Some(&EntityKey::new("DE")));
    }

    #[test]
    fn test_resolve_through_default_alias_group() {
        let reg = registry();
        assert_eq!(reg.resolve("USA"), Some(&EntityKey::new("US")));
        // "Czech Republic" is in the same group as the canonical "Czechia"
        assert_eq!(reg.resolve("Czech Republic"), Some(&EntityKey::new("CZ")));
    }

    #[test]
    fn test_resolve_through_entity_aliases() {
        let reg = registry();
        assert_eq!(reg.resolve("deutschland"), Some(&EntityKey::new("DE")));
    }

    #[test]
    fn test_unresolved_name() {
        let reg = registry();
        assert_eq!(reg.resolve("Atlantis"), None);
        assert_eq!(reg.resolve("Viet Nam"), None); // alias known, country not loaded
    }
}
