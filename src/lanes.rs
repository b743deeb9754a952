// Lane enumeration shared by the registry, the draft model and the reconciler.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the five fixed team positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    Gold,
    Exp,
    Mid,
    Jungle,
    Roam,
}

/// Number of heroes on a complete team (one per lane).
pub const TEAM_SIZE: usize = 5;

impl Lane {
    /// Canonical order, used for open-lane listings and back-filling.
    pub const ALL: [Lane; TEAM_SIZE] = [Lane::Gold, Lane::Exp, Lane::Mid, Lane::Jungle, Lane::Roam];

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Gold => "Gold Lane",
            Lane::Exp => "EXP Lane",
            Lane::Mid => "Mid Lane",
            Lane::Jungle => "Jungle",
            Lane::Roam => "Roam",
        }
    }

    /// Parse a lane name, ignoring surrounding whitespace and ASCII case.
    /// Returns `None` for anything that does not name one of the five lanes.
    pub fn parse(s: &str) -> Option<Lane> {
        let s = s.trim();
        Lane::ALL
            .into_iter()
            .find(|lane| lane.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Lane {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Lane {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Lane::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown lane: {raw:?}")))
    }
}
