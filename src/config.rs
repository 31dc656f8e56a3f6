// Export settings and their persistence

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "mongoframe";
const SETTINGS_FILE: &str = "settings.json";

/// Environment variable holding the full connection URL, credentials included.
pub const MONGODB_URL_KEY: &str = "MONGODB_URL";
pub const DEFAULT_DATABASE_NAME: &str = "Proj1";
pub const DEFAULT_COLLECTION_NAME: &str = "Proj1-Data";

/// How to reach the server. The URL itself is only read on first use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Name of the environment variable that holds the URL
    pub url_env: String,
    /// Explicit URL; wins over the environment variable when non-empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// CA bundle presented for TLS; falls back to the trust-store lookup
    pub tls_ca_file: Option<PathBuf>,
    pub connect_timeout_ms: Option<u64>,
    pub query_timeout_ms: Option<u64>,
    /// Ping the server right after the client is created
    pub verify_connection: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            url_env: MONGODB_URL_KEY.to_string(),
            url: None,
            tls_ca_file: None,
            connect_timeout_ms: None,
            query_timeout_ms: None,
            verify_connection: true,
        }
    }
}

impl ConnectionSettings {
    /// Settings that use `url` directly instead of the environment.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: Some(url.into()), ..Default::default() }
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}

/// Everything needed to run an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub connection: ConnectionSettings,
    pub database: String,
    pub collection: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            database: DEFAULT_DATABASE_NAME.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
        }
    }
}

/// Loads and saves `ExportSettings` as JSON in the platform config directory
#[derive(Clone)]
pub struct SettingsStore {
    config_dir: PathBuf,
}

impl SettingsStore {
    /// Store rooted at the platform config directory
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .context("Could not determine config directory")?;
        Ok(Self { config_dir })
    }

    /// Store rooted at an arbitrary directory
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Self { config_dir: config_dir.into() }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Load settings, returning defaults when no file has been written yet.
    pub fn load(&self) -> Result<ExportSettings> {
        let path = self.settings_path();
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(ExportSettings::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<ExportSettings> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = serde_json::from_str(&data)
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;
        Ok(settings)
    }

    /// Save settings (atomic via temp + rename).
    pub fn save(&self, settings: &ExportSettings) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir).context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(settings)
            .with_context(|| format!("Failed to serialize {SETTINGS_FILE}"))?;

        atomic_write(&self.settings_path(), json.as_bytes())
            .with_context(|| format!("Failed to write {SETTINGS_FILE}"))?;
        Ok(())
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(path);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
