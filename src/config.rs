//! Configuration for remixer.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ANTHROPIC_API_KEY, SUPABASE_URL, REMIXER_*)
//! 2. Config file (.remixer/config.yaml)
//! 3. Defaults (~/.remixer, Anthropic provider, local SQLite store)
//!
//! Config file discovery:
//! - Searches current directory and parents for .remixer/config.yaml
//! - `store.sqlite_path` is relative to the config file's project root

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::adapters::anthropic::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::adapters::relay::DEFAULT_API_URL;
use crate::adapters::{AnthropicAdapter, AnthropicConfig, CompletionAdapter, RelayAdapter};
use crate::store::{SavedStore, SqliteStore, SupabaseConfig, SupabaseStore};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub completion: CompletionSection,
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionSection {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
    /// Relay endpoint root
    pub api_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSection {
    pub backend: Option<StoreBackend>,
    pub url: Option<String>,
    pub table: Option<String>,
    pub sqlite_path: Option<String>,
}

/// Which completion endpoint to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Relay,
}

impl std::str::FromStr for Provider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Provider::Anthropic),
            "relay" | "chat" => Ok(Provider::Relay),
            _ => anyhow::bail!("Unknown completion provider: {}", s),
        }
    }
}

/// Where saved content lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Supabase,
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(StoreBackend::Supabase),
            "sqlite" | "local" => Ok(StoreBackend::Sqlite),
            _ => anyhow::bail!("Unknown store backend: {}", s),
        }
    }
}

/// Resolved completion settings
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub api_url: String,
    pub timeout: Duration,
}

/// Resolved store settings
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub table: String,
    pub sqlite_path: PathBuf,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to remixer home
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub completion: CompletionSettings,
    pub store: StoreSettings,
}

impl ResolvedConfig {
    /// Build the configured completion adapter
    pub fn completion_adapter(&self) -> Result<Arc<dyn CompletionAdapter>> {
        let c = &self.completion;
        match c.provider {
            Provider::Anthropic => {
                let config = AnthropicConfig {
                    api_key: c.api_key.clone().unwrap_or_default(),
                    base_url: c.base_url.clone(),
                    model: c.model.clone(),
                    max_tokens: c.max_tokens,
                };
                Ok(Arc::new(AnthropicAdapter::new(config)?))
            }
            Provider::Relay => Ok(Arc::new(RelayAdapter::new(c.api_url.clone()))),
        }
    }

    /// Open the configured store
    pub fn saved_store(&self) -> Result<Arc<dyn SavedStore>> {
        let s = &self.store;
        match s.backend {
            StoreBackend::Supabase => {
                let config = SupabaseConfig {
                    url: s.url.clone().unwrap_or_default(),
                    anon_key: s.anon_key.clone().unwrap_or_default(),
                    table: s.table.clone(),
                };
                Ok(Arc::new(SupabaseStore::new(config)?))
            }
            StoreBackend::Sqlite => {
                let store = SqliteStore::open(&s.sqlite_path).with_context(|| {
                    format!("Failed to open database: {}", s.sqlite_path.display())
                })?;
                Ok(Arc::new(store))
            }
        }
    }
}

/// Source of environment variables (swapped out in tests)
trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".remixer").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Merge env, file and defaults
fn resolve(
    env: &dyn Env,
    file: Option<(&Path, ConfigFile)>,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let home = env
        .var("REMIXER_HOME")
        .map(PathBuf::from)
        .unwrap_or(default_home);

    let (config_file, file) = match file {
        Some((path, file)) => (Some(path.to_path_buf()), file),
        None => (None, ConfigFile::default()),
    };

    // Project root is the parent of .remixer/
    let base_dir = config_file
        .as_deref()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let c = file.completion;
    let provider = match env.var("REMIXER_PROVIDER") {
        Some(p) => p.parse()?,
        None => c.provider.unwrap_or(Provider::Anthropic),
    };
    let completion = CompletionSettings {
        provider,
        api_key: env.var("ANTHROPIC_API_KEY").or_else(|| env.var("CLAUDE_API_KEY")),
        model: env
            .var("REMIXER_MODEL")
            .or(c.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        max_tokens: c.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        base_url: c.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        api_url: env
            .var("REMIXER_API_URL")
            .or(c.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        timeout: Duration::from_secs(c.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
    };

    let s = file.store;
    let url = env.var("SUPABASE_URL").or(s.url);
    let backend = match env.var("REMIXER_STORE") {
        Some(b) => b.parse()?,
        None => s.backend.unwrap_or(if url.is_some() {
            StoreBackend::Supabase
        } else {
            StoreBackend::Sqlite
        }),
    };
    let sqlite_path = match (s.sqlite_path, &base_dir) {
        (Some(p), Some(base)) => resolve_path(base, &p),
        (Some(p), None) => PathBuf::from(p),
        (None, _) => home.join("saved.db"),
    };
    let store = StoreSettings {
        backend,
        url,
        anon_key: env.var("SUPABASE_ANON_KEY"),
        table: s
            .table
            .unwrap_or_else(|| crate::store::supabase::DEFAULT_TABLE.to_string()),
        sqlite_path,
    };

    Ok(ResolvedConfig {
        home,
        config_file,
        completion,
        store,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".remixer");

    let config = match find_config_file() {
        Some(path) => {
            let file = load_config_file(&path)?;
            resolve(&ProcessEnv, Some((path.as_path(), file)), default_home)?
        }
        None => resolve(&ProcessEnv, None, default_home)?,
    };

    // Presence only, never values
    debug!(
        anthropic_key = config.completion.api_key.is_some(),
        supabase_url = config.store.url.is_some(),
        supabase_key = config.store.anon_key.is_some(),
        "Environment variables status"
    );

    Ok(config)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    struct MapEnv(HashMap<&'static str, &'static str>);

    impl Env for MapEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn env(pairs: &[(&'static str, &'static str)]) -> MapEnv {
        MapEnv(pairs.iter().copied().collect())
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(&env(&[]), None, PathBuf::from("/home/u/.remixer")).unwrap();

        assert_eq!(config.completion.provider, Provider::Anthropic);
        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert_eq!(config.completion.max_tokens, 1024);
        assert_eq!(config.completion.api_url, "http://localhost:3000");
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.sqlite_path, PathBuf::from("/home/u/.remixer/saved.db"));
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_supabase_url_selects_supabase() {
        let config = resolve(
            &env(&[
                ("SUPABASE_URL", "https://abc.supabase.co"),
                ("SUPABASE_ANON_KEY", "anon"),
                ("CLAUDE_API_KEY", "sk-legacy"),
            ]),
            None,
            PathBuf::from("/tmp/.remixer"),
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Supabase);
        assert_eq!(config.store.table, "saved_content");
        assert_eq!(config.completion.api_key.as_deref(), Some("sk-legacy"));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let remixer_dir = temp.path().join(".remixer");
        std::fs::create_dir_all(&remixer_dir).unwrap();

        let config_path = remixer_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
completion:
  provider: relay
  api_url: http://relay.local:8080
  timeout_seconds: 15
store:
  backend: sqlite
  sqlite_path: data/saved.db
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.completion.provider, Some(Provider::Relay));

        let config = resolve(
            &env(&[("REMIXER_MODEL", "claude-test")]),
            Some((config_path.as_path(), parsed)),
            PathBuf::from("/unused"),
        )
        .unwrap();

        assert_eq!(config.completion.provider, Provider::Relay);
        assert_eq!(config.completion.api_url, "http://relay.local:8080");
        assert_eq!(config.completion.timeout, Duration::from_secs(15));
        assert_eq!(config.completion.model, "claude-test");
        assert_eq!(config.store.sqlite_path, temp.path().join("data/saved.db"));
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            version: "1.0".to_string(),
            completion: CompletionSection {
                provider: Some(Provider::Relay),
                ..Default::default()
            },
            store: StoreSection {
                backend: Some(StoreBackend::Supabase),
                ..Default::default()
            },
        };

        let config = resolve(
            &env(&[("REMIXER_PROVIDER", "anthropic"), ("REMIXER_STORE", "local")]),
            Some((Path::new("/p/.remixer/config.yaml"), file)),
            PathBuf::from("/h"),
        )
        .unwrap();

        assert_eq!(config.completion.provider, Provider::Anthropic);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_bad_provider_is_an_error() {
        assert!(resolve(&env(&[("REMIXER_PROVIDER", "gpt")]), None, PathBuf::from("/h")).is_err());
    }

    #[test]
    fn test_missing_key_fails_at_adapter_build() {
        let config = resolve(&env(&[]), None, PathBuf::from("/h")).unwrap();
        assert!(config.completion_adapter().is_err());
    }
}
