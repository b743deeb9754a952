// Draft reconciler: repairs an untrusted oracle proposal into a legal completion.
//
// The oracle is free to return duplicates, lanes the hero cannot play, lanes
// that are already taken, banned heroes or garbage. Nothing here fails; every
// entry that cannot be placed is dropped and the open lanes are back-filled
// from the role registry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::draft::{normalize_hero, DraftState};
use crate::lanes::Lane;
use crate::registry::RoleRegistry;

/// A validated teammate recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pick {
    pub name: String,
    pub role: Lane,
}

impl Pick {
    pub fn new(name: impl Into<String>, role: Lane) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// One entry of the oracle's `synergies` list, exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProposedEntry {
    /// `"gusion"`
    Bare(String),
    /// `{"name": "gusion", "role": "Mid Lane"}`, role optional.
    Pair {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, alias = "lane")]
        role: Option<String>,
    },
    /// Anything else. Always dropped.
    Malformed(serde_json::Value),
}

/// What the entry says about the lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LaneHint {
    Absent,
    Known(Lane),
    /// A lane string was given but names no lane; it can never be accepted.
    Unrecognized,
}

impl ProposedEntry {
    pub fn hero(name: &str) -> Self {
        ProposedEntry::Bare(name.to_string())
    }

    pub fn with_lane(name: &str, lane: &str) -> Self {
        ProposedEntry::Pair {
            name: Some(name.to_string()),
            role: Some(lane.to_string()),
        }
    }

    fn resolve(&self) -> Option<(String, LaneHint)> {
        let (name, role) = match self {
            ProposedEntry::Bare(name) => (name.as_str(), None),
            ProposedEntry::Pair { name, role } => (name.as_deref()?, role.as_deref()),
            ProposedEntry::Malformed(_) => return None,
        };
        let name = normalize_hero(name);
        if name.is_empty() {
            return None;
        }
        let hint = match role.map(str::trim) {
            None | Some("") => LaneHint::Absent,
            Some(role) => Lane::parse(role).map_or(LaneHint::Unrecognized, LaneHint::Known),
        };
        Some((name, hint))
    }
}

/// Counters describing how a proposal was repaired. Diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub proposed: usize,
    /// Accepted with the lane the oracle named.
    pub accepted: usize,
    /// Accepted with a lane picked from the registry.
    pub auto_assigned: usize,
    /// Added by the back-fill pass.
    pub backfilled: usize,
    pub dropped: usize,
    /// Picks cut by the final `slots_left` clip.
    pub truncated: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub picks: Vec<Pick>,
    pub report: ReconcileReport,
}

/// Bookkeeping shared by both passes.
struct Ledger<'a> {
    draft: &'a DraftState,
    used_lanes: HashSet<Lane>,
    picked: HashSet<String>,
    picks: Vec<Pick>,
}

impl<'a> Ledger<'a> {
    fn new(draft: &'a DraftState) -> Self {
        Self {
            draft,
            used_lanes: draft.occupied_lanes(),
            picked: draft.team().map(str::to_string).collect(),
            picks: Vec::new(),
        }
    }

    fn is_available(&self, hero: &str) -> bool {
        !self.draft.is_banned(hero) && !self.picked.contains(hero)
    }

    fn accept(&mut self, hero: String, lane: Lane) {
        self.used_lanes.insert(lane);
        self.picked.insert(hero.clone());
        self.picks.push(Pick::new(hero, lane));
    }
}

/// Reconcile and return only the picks.
pub fn reconcile(
    proposal: &[ProposedEntry],
    draft: &DraftState,
    registry: &RoleRegistry,
) -> Vec<Pick> {
    reconcile_with_report(proposal, draft, registry).picks
}

/// Turn the oracle proposal into at most `draft.slots_left()` picks such that
/// no hero repeats across the team, no lane repeats, no banned hero is
/// recommended and every lane is one the registry lists for that hero.
///
/// Pass 1 walks the proposal in order. An entry with a lane is accepted when
/// the hero plays that lane and it is still open; an entry without one takes
/// the hero's first open registry lane.
///
/// Pass 2 runs only if pass 1 came up short: each open lane, in canonical
/// order, gets the first registry hero (declaration order) that plays it and
/// is still available. Lanes without a candidate stay empty.
pub fn reconcile_with_report(
    proposal: &[ProposedEntry],
    draft: &DraftState,
    registry: &RoleRegistry,
) -> Reconciliation {
    let slots_left = draft.slots_left();
    let mut ledger = Ledger::new(draft);
    let mut report = ReconcileReport {
        proposed: proposal.len(),
        ..ReconcileReport::default()
    };

    for entry in proposal {
        let Some((hero, hint)) = entry.resolve() else {
            report.dropped += 1;
            continue;
        };
        if !ledger.is_available(&hero) {
            report.dropped += 1;
            continue;
        }
        let lanes = registry.lanes_for(&hero);
        match hint {
            LaneHint::Known(lane) if lanes.contains(&lane) && !ledger.used_lanes.contains(&lane) => {
                ledger.accept(hero, lane);
                report.accepted += 1;
            }
            LaneHint::Absent => match lanes.iter().copied().find(|l| !ledger.used_lanes.contains(l)) {
                Some(lane) => {
                    ledger.accept(hero, lane);
                    report.auto_assigned += 1;
                }
                None => report.dropped += 1,
            },
            _ => report.dropped += 1,
        }
    }

    if ledger.picks.len() < slots_left {
        for lane in Lane::ALL {
            if ledger.used_lanes.contains(&lane) {
                continue;
            }
            let candidate = registry
                .heroes_for(lane)
                .find(|hero| ledger.is_available(hero))
                .map(str::to_string);
            if let Some(hero) = candidate {
                ledger.accept(hero, lane);
                report.backfilled += 1;
            }
            if ledger.picks.len() >= slots_left {
                break;
            }
        }
    }

    let mut picks = ledger.picks;
    report.truncated = picks.len().saturating_sub(slots_left);
    picks.truncate(slots_left);

    Reconciliation { picks, report }
}
