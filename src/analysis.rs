// Draft completion: oracle reply shapes and the `/api/analyze` response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::draft::DraftState;
use crate::metrics;
use crate::reconcile::{reconcile_with_report, Pick, ProposedEntry};
use crate::registry::RoleRegistry;

pub const DEFAULT_EMBLEM: &str = "Custom Assassin";
pub const DEFAULT_SPELL: &str = "Flicker";

// ── Oracle reply ──────────────────────────────────────────────────────

/// What the oracle is asked to return for a draft. Every field is optional;
/// the reconciler and the defaults below fill the gaps. Build fields of the
/// wrong type read as absent so they never cost the reconciled picks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisReply {
    #[serde(default)]
    pub synergies: Option<Vec<ProposedEntry>>,
    #[serde(default, deserialize_with = "lenient")]
    pub recommended_build: Option<BuildReply>,
    /// Some replies echo the response shape instead of `recommended_build`.
    #[serde(default, deserialize_with = "lenient")]
    pub build: Option<BuildReply>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildReply {
    #[serde(default, deserialize_with = "lenient")]
    pub items: Option<Vec<ItemReply>>,
    #[serde(default, deserialize_with = "lenient")]
    pub emblem: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub spell: Option<String>,
}

/// Decode `T` if the value has its shape, otherwise `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemReply {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
    Other(Value),
}

// ── Response ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResponse {
    pub synergies: Vec<Pick>,
    pub build: BuildResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildResponse {
    pub items: Vec<ItemResponse>,
    pub emblem: String,
    pub spell: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemResponse {
    pub name: String,
    pub description: String,
}

/// Reconcile the proposed teammates and reshape the build.
pub fn complete_draft(
    reply: AnalysisReply,
    draft: &DraftState,
    registry: &RoleRegistry,
) -> AnalyzeResponse {
    let proposal = reply.synergies.unwrap_or_default();
    let result = reconcile_with_report(&proposal, draft, registry);
    let report = result.report;
    tracing::debug!(?report, "Reconciled oracle proposal");

    metrics::RECONCILED_PICKS_TOTAL
        .with_label_values(&["accepted"])
        .inc_by(report.accepted as u64);
    metrics::RECONCILED_PICKS_TOTAL
        .with_label_values(&["auto_assigned"])
        .inc_by(report.auto_assigned as u64);
    metrics::RECONCILED_PICKS_TOTAL
        .with_label_values(&["backfilled"])
        .inc_by(report.backfilled as u64);
    metrics::RECONCILE_DROPPED_TOTAL.inc_by(report.dropped as u64);

    let build = reply.recommended_build.or(reply.build).unwrap_or_default();

    AnalyzeResponse {
        synergies: result.picks,
        build: shape_build(build, &draft.primary_hero),
    }
}

/// Turn the oracle's build into the response shape. Bare item names get a
/// generic description; a missing or blank emblem/spell gets the default.
pub fn shape_build(build: BuildReply, hero: &str) -> BuildResponse {
    let items = build
        .items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| {
            let (name, description) = match item {
                ItemReply::Name(name) => (name, None),
                ItemReply::Detailed { name, description } => (name, description),
                ItemReply::Other(_) => return None,
            };
            let name = name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let description = description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| format!("Recommended item for {hero}"));
            Some(ItemResponse { name, description })
        })
        .collect();

    BuildResponse {
        items,
        emblem: non_blank_or(build.emblem, DEFAULT_EMBLEM),
        spell: non_blank_or(build.spell, DEFAULT_SPELL),
    }
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::AnalyzeRequest;
    use crate::lanes::Lane;
    use serde_json::json;

    fn draft() -> DraftState {
        DraftState::from_request(AnalyzeRequest {
            my_hero: "Gusion".into(),
            team_heroes: vec!["Tigreal".into(), "Layla".into(), "Zilong".into()],
            ..AnalyzeRequest::default()
        })
    }

    #[test]
    fn test_string_items_get_generic_description() {
        let build: BuildReply = serde_json::from_value(json!({
            "items": ["Blade of Despair", {"name": "Hunter Strike", "description": "Burst"}],
            "emblem": "Assassin",
        }))
        .unwrap();
        let shaped = shape_build(build, "gusion");
        assert_eq!(
            shaped.items,
            vec![
                ItemResponse {
                    name: "Blade of Despair".into(),
                    description: "Recommended item for gusion".into(),
                },
                ItemResponse {
                    name: "Hunter Strike".into(),
                    description: "Burst".into(),
                },
            ]
        );
        assert_eq!(shaped.emblem, "Assassin");
        assert_eq!(shaped.spell, DEFAULT_SPELL);
    }

    #[test]
    fn test_defaults_when_build_missing() {
        let reply: AnalysisReply = serde_json::from_value(json!({"synergies": []})).unwrap();
        let response = complete_draft(reply, &draft(), &RoleRegistry::new());
        assert!(response.build.items.is_empty());
        assert_eq!(response.build.emblem, DEFAULT_EMBLEM);
        assert_eq!(response.build.spell, DEFAULT_SPELL);
        assert!(response.synergies.is_empty());
    }

    #[test]
    fn test_garbage_items_are_dropped() {
        let build: BuildReply =
            serde_json::from_value(json!({"items": [3, "", {"foo": 1}, "Wind of Nature"], "spell": " "}))
                .unwrap();
        let shaped = shape_build(build, "miya");
        assert_eq!(shaped.items.len(), 1);
        assert_eq!(shaped.items[0].name, "Wind of Nature");
        assert_eq!(shaped.spell, DEFAULT_SPELL);
    }

    #[test]
    fn test_recommended_build_preferred_over_build() {
        let reply: AnalysisReply = serde_json::from_value(json!({
            "recommended_build": {"emblem": "Mage"},
            "build": {"emblem": "Tank"},
        }))
        .unwrap();
        let response = complete_draft(reply, &draft(), &RoleRegistry::new());
        assert_eq!(response.build.emblem, "Mage");

        let reply: AnalysisReply =
            serde_json::from_value(json!({"build": {"emblem": "Tank"}})).unwrap();
        let response = complete_draft(reply, &draft(), &RoleRegistry::new());
        assert_eq!(response.build.emblem, "Tank");
    }

    #[test]
    fn test_synergies_are_reconciled() {
        let registry = RoleRegistry::from_entries([
            ("eudora", vec![Lane::Mid]),
            ("hanabi", vec![Lane::Gold]),
        ]);
        let reply: AnalysisReply = serde_json::from_value(json!({
            "synergies": [{"name": "Hanabi", "role": "Gold Lane"}, "eudora"],
        }))
        .unwrap();
        let response = complete_draft(reply, &draft(), &registry);
        assert_eq!(response.synergies, vec![Pick::new("hanabi", Lane::Gold)]);
    }

    #[test]
    fn test_off_shape_build_fields_read_as_absent() {
        let reply: AnalysisReply = serde_json::from_value(json!({
            "recommended_build": {"items": "Blade, Boots", "emblem": {"name": "Assassin"}, "spell": 7},
        }))
        .unwrap();
        let build = reply.recommended_build.clone().unwrap();
        assert!(build.items.is_none());
        assert!(build.emblem.is_none());
        assert!(build.spell.is_none());

        let response = complete_draft(reply, &draft(), &RoleRegistry::new());
        assert!(response.build.items.is_empty());
        assert_eq!(response.build.emblem, DEFAULT_EMBLEM);
        assert_eq!(response.build.spell, DEFAULT_SPELL);
    }

    #[test]
    fn test_non_object_recommended_build_falls_back_to_build() {
        let reply: AnalysisReply = serde_json::from_value(json!({
            "recommended_build": "Blade of Despair",
            "build": {"emblem": "Fighter"},
        }))
        .unwrap();
        assert!(reply.recommended_build.is_none());
        let response = complete_draft(reply, &draft(), &RoleRegistry::new());
        assert_eq!(response.build.emblem, "Fighter");
    }

    #[test]
    fn test_null_synergies_is_empty_proposal() {
        let reply: AnalysisReply = serde_json::from_value(json!({"synergies": null})).unwrap();
        assert!(reply.synergies.is_none());
    }
}
