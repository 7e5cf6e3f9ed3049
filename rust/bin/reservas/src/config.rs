//! Client-side context management.
//!
//! Reads/writes `~/.reservas/config.toml`. Each context is one server plus
//! the session issued by it.

use std::io::Write;
use std::path::{Path, PathBuf};

use reservas_client::{Session, SessionStore, StoreError};
use serde::{Deserialize, Serialize};

/// A single context: connection to one booking server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "prod").
    pub name: String,

    /// Server URL (e.g. "http://localhost:8000").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Set by `reservas login`, cleared by `reservas logout`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Context {
    pub fn session(&self) -> Session {
        Session {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    /// List of configured contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.reservas/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to disk. Written to a fresh temp file in the same
    /// directory and renamed over the old one, so both tokens change together
    /// and concurrent writers never share a temp file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let content = toml::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Get a mutable reference to a context by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn upsert_context(&mut self, ctx: Context) {
        if let Some(existing) = self.get_mut(&ctx.name) {
            *existing = ctx;
        } else {
            self.contexts.push(ctx);
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Return the reservas config directory (~/.reservas).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".reservas")
}

// ── Session store ───────────────────────────────────────────────────

/// Session store backed by one context of the config file.
///
/// Every operation re-reads the file, so concurrent invocations see each
/// other's logins (last write wins).
pub struct ContextStore {
    path: PathBuf,
    context: String,
}

impl ContextStore {
    pub fn new(path: impl Into<PathBuf>, context: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: context.into(),
        }
    }

    fn update(&self, session: Session) -> Result<(), StoreError> {
        let mut config = ClientConfig::load(&self.path).map_err(storage)?;
        let ctx = config
            .get_mut(&self.context)
            .ok_or_else(|| StoreError::Storage(format!("context \"{}\" not found", self.context)))?;
        ctx.access_token = session.access_token;
        ctx.refresh_token = session.refresh_token;
        config.save(&self.path).map_err(storage)
    }
}

fn storage(e: anyhow::Error) -> StoreError {
    StoreError::Storage(format!("{:#}", e))
}

impl SessionStore for ContextStore {
    fn get(&self) -> Result<Session, StoreError> {
        let config = ClientConfig::load(&self.path).map_err(storage)?;
        Ok(config.get(&self.context).map(Context::session).unwrap_or_default())
    }

    fn set(&self, session: &Session) -> Result<(), StoreError> {
        self.update(session.clone())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(Session::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(name: &str) -> ClientConfig {
        ClientConfig {
            current_context: name.to_string(),
            contexts: vec![Context {
                name: name.to_string(),
                server: "http://localhost:8000".to_string(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.current_context.is_empty());
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let mut config = config_with("test");
        config.contexts[0].access_token = Some("A".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("current-context"));
        assert!(!toml_str.contains("refresh_token"));
        let back: ClientConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.current_context, "test");
        assert_eq!(back.contexts[0].server, "http://localhost:8000");
        assert_eq!(back.contexts[0].access_token.as_deref(), Some("A"));
    }

    #[test]
    fn remove_current_context_unsets_it() {
        let mut config = config_with("a");
        assert!(config.remove_context("a"));
        assert!(config.current_context.is_empty());
        assert!(!config.remove_context("a"));
    }

    #[test]
    fn context_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        config_with("prod").save(&path).unwrap();

        let store = ContextStore::new(&path, "prod");
        assert_eq!(store.get().unwrap(), Session::default());

        store.set(&Session::new("a", "r")).unwrap();
        assert_eq!(store.get().unwrap(), Session::new("a", "r"));
        let on_disk = ClientConfig::load(&path).unwrap();
        assert_eq!(on_disk.contexts[0].refresh_token.as_deref(), Some("r"));
        assert_eq!(on_disk.contexts[0].server, "http://localhost:8000");

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), Session::default());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn concurrent_writers_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        config_with("prod").save(&path).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = ContextStore::new(path, "prod");
                    for i in 0..50 {
                        store.set(&Session::new(format!("a{}-{}", t, i), "r")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Last write wins; the file is always whole.
        let session = ContextStore::new(&path, "prod").get().unwrap();
        assert!(session.access_token.unwrap().ends_with("-49"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn context_store_for_missing_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        config_with("prod").save(&path).unwrap();

        let store = ContextStore::new(&path, "staging");
        assert_eq!(store.get().unwrap(), Session::default());
        assert!(matches!(store.set(&Session::new("a", "r")), Err(StoreError::Storage(_))));
    }
}
