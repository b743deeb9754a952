// LLM-friendly documentation endpoint content.

pub const LLMS_TXT: &str = r#"# MLBB Draft Assistant API
> Completes a partial Mobile Legends: Bang Bang draft with teammates and lanes, and suggests a build.

## API Base URL
/api/

## Authentication
None

## Key Endpoints
- POST /api/analyze - Complete a draft
  Body: {"my_hero": "Gusion", "team_heroes": [], "enemy_heroes": [], "assigned_lanes": {"Gusion": "Mid Lane"}, "banned_heroes": []}
  Returns: {"synergies": [{"name", "role"}], "build": {"items": [{"name", "description"}], "emblem", "spell"}}
- POST /api/validate-lane - Judge a hero/lane choice
  Body: {"hero": "Gusion", "lane": "Jungle"}
  Returns: {"recommended_lanes": [...], "is_optimal": bool, "explanation": "..."}
- GET /api/heroes - Hero catalog
- GET /api/heroes/{hero}/lanes - Lanes a hero can play
- GET /api/lanes - The five lanes in canonical order
- GET /health - Service status
- GET /metrics - Prometheus metrics

## Lanes
Gold Lane, EXP Lane, Mid Lane, Jungle, Roam

## Guarantees
Recommended teammates never repeat a picked hero, never reuse a filled lane,
never include a banned hero, and are always placed in a lane they play.
"#;
