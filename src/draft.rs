// Draft state for one request, plus the values derived from it.

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::lanes::{Lane, TEAM_SIZE};

/// Canonical form of a hero identifier: trimmed and lowercased.
pub fn normalize_hero(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Raw `/api/analyze` request body. Only `my_hero` is mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub my_hero: String,
    #[serde(default)]
    pub team_heroes: Vec<String>,
    #[serde(default)]
    pub enemy_heroes: Vec<String>,
    #[serde(default)]
    pub assigned_lanes: BTreeMap<String, String>,
    #[serde(default)]
    pub banned_heroes: Vec<String>,
}

/// Normalized draft as seen by the prompt builder and the reconciler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftState {
    pub primary_hero: String,
    pub ally_heroes: Vec<String>,
    pub enemy_heroes: Vec<String>,
    /// Hero → lane name as sent by the client. Values that do not name a lane
    /// are kept for the prompt but occupy nothing.
    pub lane_assignments: BTreeMap<String, String>,
    pub banned_heroes: HashSet<String>,
}

impl DraftState {
    /// Normalize every hero identifier in the request.
    pub fn from_request(req: AnalyzeRequest) -> Self {
        Self {
            primary_hero: normalize_hero(&req.my_hero),
            ally_heroes: req.team_heroes.iter().map(|h| normalize_hero(h)).collect(),
            enemy_heroes: req.enemy_heroes.iter().map(|h| normalize_hero(h)).collect(),
            lane_assignments: req
                .assigned_lanes
                .into_iter()
                .map(|(hero, lane)| (normalize_hero(&hero), lane))
                .collect(),
            banned_heroes: req.banned_heroes.iter().map(|h| normalize_hero(h)).collect(),
        }
    }

    /// Teammate picks still needed for a full team. Never negative.
    pub fn slots_left(&self) -> usize {
        TEAM_SIZE.saturating_sub(self.ally_heroes.len() + 1)
    }

    /// Lanes already claimed through `lane_assignments`.
    pub fn occupied_lanes(&self) -> HashSet<Lane> {
        self.lane_assignments
            .values()
            .filter_map(|lane| Lane::parse(lane))
            .collect()
    }

    /// Unclaimed lanes in canonical order.
    pub fn open_lanes(&self) -> Vec<Lane> {
        let occupied = self.occupied_lanes();
        Lane::ALL
            .into_iter()
            .filter(|lane| !occupied.contains(lane))
            .collect()
    }

    /// The acting hero followed by the allies.
    pub fn team(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_hero.as_str()).chain(self.ally_heroes.iter().map(String::as_str))
    }

    /// Lane label for a team member, `Unassigned` when none was given.
    pub fn lane_label(&self, hero: &str) -> &str {
        self.lane_assignments
            .get(hero)
            .map(String::as_str)
            .unwrap_or("Unassigned")
    }

    pub fn is_banned(&self, hero: &str) -> bool {
        self.banned_heroes.contains(hero)
    }
}
