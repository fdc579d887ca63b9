// Country name aliases
//
// WMI source tables name countries inconsistently ("USA", "Viet Nam",
// "Czechia", ...). Each alias group lists names that refer to the same
// country; resolving a name tries every member of every group it belongs to.

use std::collections::HashMap;

/// Known spelling variations, keyed by the preferred name
pub const DEFAULT_ALIAS_GROUPS: &[(&str, &[&str])] = &[
    ("United States", &["United States", "United States of America", "USA"]),
    ("United Kingdom", &["United Kingdom", "United Kingdom of Great Britain and Northern Ireland"]),
    ("South Korea", &["South Korea", "Korea (Republic of)", "Republic of Korea"]),
    ("Taiwan", &["Taiwan", "Taiwan, Province of China"]),
    ("Russia", &["Russia", "Russian Federation"]),
    ("Iran", &["Iran", "Iran (Islamic Republic of)"]),
    ("Turkey", &["Turkey", "Türkiye"]),
    ("Vietnam", &["Vietnam", "Viet Nam"]),
    ("Ivory Coast", &["Ivory Coast", "Côte d'Ivoire"]),
    ("Czech Republic", &["Czech Republic", "Czechia"]),
    ("Unknown", &["Unknown"]),
];

/// Bidirectional alias index: group -> members, member -> groups
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    groups: HashMap<String, Vec<String>>,
    /// Lowercased member name -> group keys it appears in
    reverse: HashMap<String, Vec<String>>,
}

impl AliasIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index pre-loaded with `DEFAULT_ALIAS_GROUPS`
    pub fn with_defaults() -> Self {
        let mut index = Self::new();
        for (group, members) in DEFAULT_ALIAS_GROUPS {
            index.add_group(group, members.iter().copied());
        }
        index
    }

    /// Add (or extend) a group. Members are deduplicated case-insensitively.
    pub fn add_group<'a>(&mut self, group: &str, members: impl IntoIterator<Item = &'a str>) {
        let entry = self.groups.entry(group.to_string()).or_default();
        for member in members {
            let member = member.trim();
            if member.is_empty() {
                continue;
            }
            let lower = member.to_lowercase();
            if entry.iter().any(|m| m.to_lowercase() == lower) {
                continue;
            }
            entry.push(member.to_string());

            let groups = self.reverse.entry(lower).or_default();
            if !groups.iter().any(|g| g == group) {
                groups.push(group.to_string());
            }
        }
    }

    /// Members of a group, in insertion order
    pub fn members(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Groups listing this name (case-insensitive)
    pub fn groups_containing(&self, name: &str) -> &[String] {
        self.reverse
            .get(&name.trim().to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every alternative spelling for a name, across all its groups
    pub fn candidates<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.groups_containing(name)
            .iter()
            .flat_map(move |g| self.members(g).iter().map(String::as_str))
    }
}
