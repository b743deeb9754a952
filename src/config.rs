// Application configuration, loaded from environment variables and CLI flags.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ORACLE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_ORACLE_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_PORT: u16 = 5000;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer credential for the oracle. `None` makes every oracle call fail.
    pub oracle_api_key: Option<String>,
    /// Chat-completion endpoint.
    pub oracle_url: String,
    /// Model identifier sent with every oracle request.
    pub oracle_model: String,
    /// Upper bound on a single oracle call.
    pub oracle_timeout: Duration,
    /// Hero → lanes mapping (role registry source).
    pub hero_roles_path: PathBuf,
    /// Hero catalog served at `/api/heroes`.
    pub heroes_path: PathBuf,
    /// Pre-baked analysis returned when the oracle is unreachable.
    pub fallback_path: PathBuf,
    /// Directory containing pre-built frontend files to serve.
    /// When set, the backend serves static files from this path.
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            oracle_api_key: None,
            oracle_url: DEFAULT_ORACLE_URL.to_string(),
            oracle_model: DEFAULT_ORACLE_MODEL.to_string(),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
            hero_roles_path: PathBuf::from("data/hero_roles.json"),
            heroes_path: PathBuf::from("data/heroes.json"),
            fallback_path: PathBuf::from("data/fallback.json"),
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables (a `.env` file is honoured if present):
    /// - `OPENROUTER_API_KEY` - oracle credential
    /// - `OPENROUTER_API_URL` - chat-completion endpoint
    /// - `ORACLE_MODEL` - model identifier (default: `openai/gpt-3.5-turbo`)
    /// - `ORACLE_TIMEOUT_SECS` - per-call timeout (default: 8)
    /// - `PORT` - HTTP server port (default: 5000)
    /// - `HERO_ROLES_PATH`, `HEROES_PATH`, `FALLBACK_PATH` - static data files
    /// - `STATIC_DIR` - Path to frontend dist directory for static file serving
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {e}");
        }
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    /// Build a config from CLI args and an environment lookup.
    pub fn from_sources<F>(args: &[String], env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(defaults.port);

        let oracle_api_key = env("OPENROUTER_API_KEY").filter(|k| !k.trim().is_empty());

        let oracle_timeout = env("ORACLE_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.oracle_timeout);

        Config {
            port,
            oracle_api_key,
            oracle_url: env("OPENROUTER_API_URL").unwrap_or(defaults.oracle_url),
            oracle_model: env("ORACLE_MODEL").unwrap_or(defaults.oracle_model),
            oracle_timeout,
            hero_roles_path: env("HERO_ROLES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.hero_roles_path),
            heroes_path: env("HEROES_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.heroes_path),
            fallback_path: env("FALLBACK_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.fallback_path),
            static_dir: env("STATIC_DIR").map(PathBuf::from),
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}
