use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;
use url::Url;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

/// Backend API settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    /// Client-side request timeout; `None` means requests run to completion.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self { Self { path: default_storage_path() } }
}

/// Third-party public user directory used by the admin user list.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_directory_url")]
    pub base_url: String,
    #[serde(default = "default_first_name_prefixes")]
    pub first_name_prefixes: Vec<String>,
    #[serde(default = "default_last_name_prefixes")]
    pub last_name_prefixes: Vec<String>,
    /// Sent as `x-api-key` when the directory requires one.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_directory_url(),
            first_name_prefixes: default_first_name_prefixes(),
            last_name_prefixes: default_last_name_prefixes(),
            api_key: None,
        }
    }
}

fn default_storage_path() -> String { "data/storage.json".into() }
fn default_directory_url() -> String { "https://reqres.in/api".into() }
fn default_first_name_prefixes() -> Vec<String> { vec!["G".into()] }
fn default_last_name_prefixes() -> Vec<String> { vec!["W".into()] }

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::metadata(&path) {
        Ok(_) => load_from_file(&path),
        Err(_) => Ok(AppConfig::default()),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.api.normalize_from_env();
        self.api.validate()?;
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.directory.normalize_from_env();
        self.directory.validate()?;
        Ok(())
    }
}

impl ApiConfig {
    pub fn normalize_from_env(&mut self) {
        // API_URL wins over the TOML value, like a build-time env override
        if let Ok(url) = std::env::var("API_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.timeout_secs == Some(0) {
            self.timeout_secs = None;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(anyhow!("api.base_url is empty; set it in config.toml or the API_URL environment variable"));
        }
        validate_http_url("api.base_url", &self.base_url)
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(path) = std::env::var("STORAGE_PATH") {
            if !path.trim().is_empty() {
                self.path = path;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path must not be empty"));
        }
        Ok(())
    }
}

impl DirectoryConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("DIRECTORY_URL") {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if let Ok(key) = std::env::var("DIRECTORY_API_KEY") {
            self.api_key = Some(key);
        }
        self.api_key = self.api_key.take().filter(|k| !k.trim().is_empty());
    }

    pub fn validate(&self) -> Result<()> {
        validate_http_url("directory.base_url", &self.base_url)
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = Url::parse(value).map_err(|e| anyhow!("{field} is not a valid URL: {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(anyhow!("{field} must use http or https, got {other}")),
    }
}
