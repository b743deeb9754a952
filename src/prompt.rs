// Prompt text sent to the oracle for both flows.

use crate::draft::DraftState;
use crate::lanes::Lane;

/// Instructions for completing the team. Names the acting hero, teammates
/// with their lanes, the enemies and the lanes still open, and pins the reply
/// to the JSON shape the reconciler understands.
pub fn draft_completion_prompt(draft: &DraftState) -> String {
    let team_with_lanes = draft
        .team()
        .map(|hero| format!("{hero} (Lane: {})", draft.lane_label(hero)))
        .collect::<Vec<_>>()
        .join(", ");
    let open_lanes = draft
        .open_lanes()
        .iter()
        .map(Lane::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let mut banned: Vec<&str> = draft.banned_heroes.iter().map(String::as_str).collect();
    banned.sort_unstable();
    let banned = if banned.is_empty() {
        "None".to_string()
    } else {
        banned.join(", ")
    };

    format!(
        r#"You are an expert Mobile Legends: Bang Bang draft assistant.

Here is the current draft:
- My Hero: {my_hero} (Lane: {my_lane})
- My Team: {team_with_lanes}
- Enemy Team: {enemies}
- Banned Heroes: {banned}

Your task:
- Recommend only the remaining teammates needed to complete my team (so that my team has 5 heroes in total). {slots_left} teammate(s) are still needed.
- The recommended heroes should be highly synergistic with the already picked allies (including my hero and any selected teammates), and also effective against the selected enemy heroes.
- Do NOT recommend a hero for a lane that is already filled by a selected hero. Only recommend heroes for unfilled lanes: {open_lanes}.
- Do NOT recommend banned heroes.
- Do NOT return direct counters for enemy heroes.
- Do NOT return generic best picks for only the main hero.
- Only return the best fit teammates based on both ally and enemy picks.
- For each recommended hero, specify the best lane/role for that hero (Gold Lane, EXP Lane, Mid Lane, Jungle, Roam).
- Recommend exactly one hero per unfilled lane. Do not recommend duplicate lanes/roles or duplicate heroes.
- Only recommend heroes in lanes/roles they actually play in the current meta.

Format the response as a JSON object:
{{
  "synergies": [
    {{"name": "hero1", "role": "Gold Lane"}},
    {{"name": "hero2", "role": "EXP Lane"}}
  ],
  "recommended_build": {{
    "items": ["item1", "item2"],
    "emblem": "emblem_name",
    "spell": "spell_name"
  }}
}}
"#,
        my_hero = draft.primary_hero,
        my_lane = draft.lane_label(&draft.primary_hero),
        enemies = draft.enemy_heroes.join(", "),
        slots_left = draft.slots_left(),
    )
}

/// Instructions for judging one hero/lane choice.
pub fn lane_validation_prompt(hero: &str, lane: &str) -> String {
    format!(
        r#"You are an expert Mobile Legends: Bang Bang analyst.

A user has selected the hero: {hero}
They want to assign this hero to the lane: {lane}

Your task:
1. List the most recommended lane(s) for this hero in the current meta (e.g. Mid Lane, Jungle, Gold Lane, EXP Lane, Roam).
2. Indicate if the user's chosen lane is optimal for this hero (true/false).
3. Give a short explanation (2-3 lines) of why this hero fits best in that lane.

Format your response as JSON:
{{
  "recommended_lanes": ["Mid Lane", "Jungle"],
  "is_optimal": true,
  "explanation": "Gusion excels in Mid Lane due to his burst damage and mobility."
}}
"#
    )
}
