//! Configuration for gallery-sync.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (GALLERY_SYNC_HOME, GALLERY_SYNC_ENDPOINT,
//!    GALLERY_SYNC_CONNECTION)
//! 2. Config file (.gallery-sync/config.yaml)
//! 3. Defaults (~/.gallery-sync, public gallery endpoints)
//!
//! Config file discovery:
//! - Searches current directory and parents for .gallery-sync/config.yaml
//! - A relative `paths.home` is resolved against the config file's directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Gallery search endpoint queried during remote extraction
const DEFAULT_ENDPOINT: &str = "https://m365-galleries.azurewebsites.net/Samples/searchSamples";

/// Destination API base the external connection lives under
const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// External connection the items are written to
const DEFAULT_CONNECTION_ID: &str = "m365cbe24grcov1";

/// Public URL prefix items resolve back to
const DEFAULT_ITEM_URL_BASE: &str =
    "https://adoption.microsoft.com/sample-solution-gallery/sample/";

const DEFAULT_PAGE_SIZE: u32 = 50;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub gallery: Option<GalleryConfig>,
    #[serde(default)]
    pub index: Option<IndexConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory holding the cache snapshot and watermark
    /// (relative to the config file)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryConfig {
    pub endpoint: Option<String>,
    pub page_size: Option<u32>,
    pub item_url_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    pub base_url: Option<String>,
    pub connection: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the state directory
    pub home: PathBuf,
    /// Gallery search endpoint
    pub endpoint: String,
    /// Records requested per page during remote extraction
    pub page_size: u32,
    /// Public URL prefix embedded into every item
    pub item_url_base: String,
    /// Destination API base URL
    pub graph_base_url: String,
    /// External connection id items are written to
    pub connection_id: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Cache snapshot file ($GALLERY_SYNC_HOME/cache.json)
    pub fn cache_path(&self) -> PathBuf {
        self.home.join("cache.json")
    }

    /// Watermark file ($GALLERY_SYNC_HOME/latest-change.txt)
    pub fn watermark_path(&self) -> PathBuf {
        self.home.join("latest-change.txt")
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".gallery-sync").join("config.yaml");
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

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".gallery-sync");

    let config_file = find_config_file();
    let parsed = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    // Home: env var beats config file beats default
    let home = if let Ok(env_home) = std::env::var("GALLERY_SYNC_HOME") {
        PathBuf::from(env_home)
    } else if let Some(home_path) = parsed.as_ref().and_then(|c| c.paths.home.as_deref()) {
        let base = config_file
            .as_ref()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."));
        resolve_path(base, home_path)
    } else {
        default_home
    };

    let gallery = parsed.as_ref().and_then(|c| c.gallery.as_ref());
    let index = parsed.as_ref().and_then(|c| c.index.as_ref());

    let endpoint = std::env::var("GALLERY_SYNC_ENDPOINT")
        .ok()
        .or_else(|| gallery.and_then(|g| g.endpoint.clone()))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let connection_id = std::env::var("GALLERY_SYNC_CONNECTION")
        .ok()
        .or_else(|| index.and_then(|i| i.connection.clone()))
        .unwrap_or_else(|| DEFAULT_CONNECTION_ID.to_string());

    Ok(ResolvedConfig {
        home,
        endpoint,
        page_size: gallery
            .and_then(|g| g.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE),
        item_url_base: gallery
            .and_then(|g| g.item_url_base.clone())
            .unwrap_or_else(|| DEFAULT_ITEM_URL_BASE.to_string()),
        graph_base_url: index
            .and_then(|i| i.base_url.clone())
            .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
        connection_id,
        config_file,
    })
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
