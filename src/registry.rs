// Role registry: which lanes each hero is considered viable in.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::data::DataError;
use crate::draft::normalize_hero;
use crate::lanes::Lane;

/// Immutable hero → lanes mapping.
///
/// Entries keep the order in which they were declared in the source file.
/// That order decides which hero wins when the reconciler back-fills an open
/// lane, so it is part of the observable behaviour.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    entries: Vec<(String, Vec<Lane>)>,
    index: HashMap<String, usize>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(hero, lanes)` pairs in declaration order.
    /// Hero names are normalized; a repeated hero merges its lanes into the
    /// first declaration.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Lane>)>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for (hero, lanes) in entries {
            registry.insert(hero.as_ref(), lanes);
        }
        registry
    }

    fn insert(&mut self, hero: &str, lanes: Vec<Lane>) {
        let hero = normalize_hero(hero);
        if hero.is_empty() {
            return;
        }
        let slot = match self.index.get(&hero) {
            Some(&i) => i,
            None => {
                self.entries.push((hero.clone(), Vec::new()));
                self.index.insert(hero, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let existing = &mut self.entries[slot].1;
        for lane in lanes {
            if !existing.contains(&lane) {
                existing.push(lane);
            }
        }
    }

    /// Load the registry from a JSON object of `{"hero": ["Lane", ...]}`.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Lanes the hero can play, in declaration order. Unknown heroes have none.
    pub fn lanes_for(&self, hero: &str) -> &[Lane] {
        self.index
            .get(hero)
            .or_else(|| self.index.get(&normalize_hero(hero)))
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn plays(&self, hero: &str, lane: Lane) -> bool {
        self.lanes_for(hero).contains(&lane)
    }

    /// Heroes that list `lane`, in declaration order.
    pub fn heroes_for(&self, lane: Lane) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, lanes)| lanes.contains(&lane))
            .map(|(hero, _)| hero.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Lane])> {
        self.entries
            .iter()
            .map(|(hero, lanes)| (hero.as_str(), lanes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = RoleRegistry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of hero names to lists of lanes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut registry = RoleRegistry::new();
        while let Some((hero, lanes)) = map.next_entry::<String, Vec<String>>()? {
            let parsed: Vec<Lane> = lanes
                .iter()
                .filter_map(|name| {
                    let lane = Lane::parse(name);
                    if lane.is_none() {
                        tracing::debug!("Skipping unknown lane {name:?} for hero {hero:?}");
                    }
                    lane
                })
                .collect();
            registry.insert(&hero, parsed);
        }
        Ok(registry)
    }
}

impl<'de> Deserialize<'de> for RoleRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RegistryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_keeps_declaration_order() {
        let json = r#"{
            "zilong": ["EXP Lane", "Jungle"],
            "alucard": ["Jungle", "EXP Lane"],
            "balmond": ["Jungle"]
        }"#;
        let registry: RoleRegistry = serde_json::from_str(json).unwrap();
        let heroes: Vec<&str> = registry.iter().map(|(h, _)| h).collect();
        assert_eq!(heroes, ["zilong", "alucard", "balmond"]);
        let junglers: Vec<&str> = registry.heroes_for(Lane::Jungle).collect();
        assert_eq!(junglers, ["zilong", "alucard", "balmond"]);
        assert_eq!(registry.lanes_for("alucard"), &[Lane::Jungle, Lane::Exp]);
    }

    #[test]
    fn test_keys_are_normalized() {
        let json = r#"{ "Chang'e": ["Mid Lane"] }"#;
        let registry: RoleRegistry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.lanes_for("chang'e"), &[Lane::Mid]);
        assert_eq!(registry.lanes_for("  CHANG'E "), &[Lane::Mid]);
    }

    #[test]
    fn test_unknown_hero_has_no_lanes() {
        let registry = RoleRegistry::from_entries([("tigreal", vec![Lane::Roam])]);
        assert!(registry.lanes_for("nobody").is_empty());
        assert!(!registry.plays("nobody", Lane::Roam));
        assert!(registry.plays("tigreal", Lane::Roam));
    }

    #[test]
    fn test_unknown_lanes_are_skipped() {
        let json = r#"{ "eudora": ["Mid Lane", "Support", "mid lane"] }"#;
        let registry: RoleRegistry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.lanes_for("eudora"), &[Lane::Mid]);
    }

    #[test]
    fn test_repeated_hero_merges_into_first_position() {
        let registry = RoleRegistry::from_entries([
            ("bane", vec![Lane::Exp]),
            ("alice", vec![Lane::Mid]),
            ("Bane", vec![Lane::Jungle, Lane::Exp]),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lanes_for("bane"), &[Lane::Exp, Lane::Jungle]);
        assert_eq!(registry.iter().next().map(|(h, _)| h), Some("bane"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(serde_json::from_str::<RoleRegistry>("[1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RoleRegistry::load(Path::new("/nonexistent/hero_roles.json")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }
}
