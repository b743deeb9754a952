// Invariant checks for the reconciler over generated registries, drafts and proposals.

use std::collections::HashSet;

use proptest::prelude::*;

use draft_assistant_backend::draft::{AnalyzeRequest, DraftState};
use draft_assistant_backend::lanes::{Lane, TEAM_SIZE};
use draft_assistant_backend::reconcile::{reconcile, ProposedEntry};
use draft_assistant_backend::registry::RoleRegistry;

const HEROES: [&str; 12] = [
    "layla", "miya", "zilong", "eudora", "gusion", "balmond", "tigreal", "franco", "alice",
    "bane", "ghost", "Layla",
];
const LANE_NAMES: [&str; 8] = [
    "Gold Lane", "EXP Lane", "Mid Lane", "Jungle", "Roam", "Top", "", "roam",
];

fn arb_hero() -> impl Strategy<Value = &'static str> {
    prop::sample::select(HEROES.to_vec())
}

fn arb_lane_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(LANE_NAMES.to_vec())
}

/// The last entry of `HEROES` is a case variant and stays out of the registry.
fn arb_registry() -> impl Strategy<Value = RoleRegistry> {
    prop::collection::vec(prop::array::uniform5(prop::bool::weighted(0.35)), HEROES.len() - 1)
        .prop_map(|plays| {
            let entries: Vec<(&str, Vec<Lane>)> = HEROES
                .iter()
                .zip(plays)
                .map(|(hero, mask)| {
                    let lanes = Lane::ALL
                        .into_iter()
                        .zip(mask)
                        .filter_map(|(lane, on)| on.then_some(lane))
                        .collect();
                    (*hero, lanes)
                })
                .collect();
            RoleRegistry::from_entries(entries)
        })
}

fn arb_draft() -> impl Strategy<Value = DraftState> {
    (
        arb_hero(),
        prop::collection::vec(arb_hero(), 0..6),
        prop::collection::vec(arb_hero(), 0..4),
        prop::collection::vec(prop::option::of(arb_lane_name()), 6),
    )
        .prop_map(|(my_hero, team_heroes, banned_heroes, lanes)| {
            let mut req = AnalyzeRequest {
                my_hero: my_hero.to_string(),
                team_heroes: team_heroes.iter().map(|h| h.to_string()).collect(),
                banned_heroes: banned_heroes.iter().map(|h| h.to_string()).collect(),
                ..AnalyzeRequest::default()
            };
            let team = std::iter::once(my_hero).chain(team_heroes);
            for (hero, lane) in team.zip(lanes) {
                if let Some(lane) = lane {
                    req.assigned_lanes.insert(hero.to_string(), lane.to_string());
                }
            }
            DraftState::from_request(req)
        })
}

fn arb_entry() -> impl Strategy<Value = ProposedEntry> {
    prop_oneof![
        1 => arb_hero().prop_map(ProposedEntry::hero),
        2 => (arb_hero(), arb_lane_name())
            .prop_map(|(hero, lane)| ProposedEntry::with_lane(hero, lane)),
        1 => (0u32..100).prop_map(|n| ProposedEntry::Malformed(serde_json::json!(n))),
    ]
}

fn arb_proposal() -> impl Strategy<Value = Vec<ProposedEntry>> {
    prop::collection::vec(arb_entry(), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn test_reconciled_drafts_are_always_legal(
        registry in arb_registry(),
        draft in arb_draft(),
        proposal in arb_proposal(),
    ) {
        let picks = reconcile(&proposal, &draft, &registry);

        // Bound.
        prop_assert!(picks.len() <= draft.slots_left());

        // No duplicate heroes across the whole team.
        let team: HashSet<&str> = draft.team().collect();
        let mut seen = HashSet::new();
        for pick in &picks {
            prop_assert!(!team.contains(pick.name.as_str()), "{} already on the team", pick.name);
            prop_assert!(seen.insert(pick.name.as_str()), "{} picked twice", pick.name);
        }

        // No duplicate lanes, counting the pre-assigned ones.
        let mut lanes = draft.occupied_lanes();
        for pick in &picks {
            prop_assert!(lanes.insert(pick.role), "{} filled twice", pick.role);
        }

        for pick in &picks {
            prop_assert!(!draft.is_banned(&pick.name), "{} is banned", pick.name);
            prop_assert!(registry.plays(&pick.name, pick.role), "{} cannot play {}", pick.name, pick.role);
        }
    }

    #[test]
    fn test_reconcile_is_deterministic(
        registry in arb_registry(),
        draft in arb_draft(),
        proposal in arb_proposal(),
    ) {
        prop_assert_eq!(
            reconcile(&proposal, &draft, &registry),
            reconcile(&proposal, &draft, &registry)
        );
    }

    #[test]
    fn test_full_team_is_always_empty(
        registry in arb_registry(),
        draft in arb_draft(),
        proposal in arb_proposal(),
    ) {
        let mut draft = draft;
        while draft.ally_heroes.len() < TEAM_SIZE - 1 {
            draft.ally_heroes.push(format!("ally{}", draft.ally_heroes.len()));
        }
        prop_assert!(reconcile(&proposal, &draft, &registry).is_empty());
    }
}
