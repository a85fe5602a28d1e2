//! Configuration management for localaid.
//!
//! Configuration is assembled in layers, later layers winning:
//! - Built-in defaults
//! - A YAML config file (`--config` / `LOCALAID_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! The API credential is only ever read from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Model used when none is configured, and the target of the not-found retry.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default public endpoint of the generative-language API.
pub const DEFAULT_LLM_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// File name of the ingested directory inside `data_dir`.
pub const DATA_FILE_NAME: &str = "services.json";

/// File name of the placeholder search index inside `data_dir`.
pub const INDEX_FILE_NAME: &str = "index.json";

/// File name of the CSV input inside `data_dir` when no explicit path is set.
pub const CSV_FILE_NAME: &str = "services.csv";

const KNOWN_PROVIDERS: [&str; 1] = ["gemini"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the CSV input and the ingested JSON files
    pub data_dir: PathBuf,

    /// Explicit CSV input path (defaults to `data_dir/services.csv`)
    pub csv_path: Option<PathBuf>,

    /// Generative provider identifier
    pub provider: String,

    /// Configured model identifier
    pub model: String,

    /// API credential for the provider
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the generative API
    pub llm_endpoint: String,

    /// Upper bound on a single generation call, in seconds
    pub llm_timeout_secs: u64,

    /// HTTP bind host
    pub host: String,

    /// HTTP bind port
    pub port: u16,

    /// Optional YAML prompt definition overriding the built-in one
    pub prompt_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    pub log_json: bool,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    data: Option<DataSection>,
    llm: Option<LlmSection>,
    server: Option<ServerSection>,
    prompt: Option<PromptSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    dir: Option<PathBuf>,
    csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "timeoutSecs")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
struct PromptSection {
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    json: Option<bool>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            csv_path: None,
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            llm_endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            llm_timeout_secs: 20,
            host: "0.0.0.0".to_string(),
            port: 8080,
            prompt_file: None,
            log_level: None,
            log_json: false,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional YAML file and the process environment.
    ///
    /// Environment variables:
    /// - `LOCALAID_CONFIG`: Path to config file (when `config_file` is `None`)
    /// - `LOCALAID_DATA_DIR`: Data directory
    /// - `LOCALAID_CSV`: CSV input path
    /// - `LOCALAID_PROVIDER`: Generative provider
    /// - `GEMINI_MODEL`: Model identifier
    /// - `GEMINI_API_KEY`: API credential
    /// - `LOCALAID_LLM_ENDPOINT`: API base URL
    /// - `LOCALAID_LLM_TIMEOUT_SECS`: Generation timeout
    /// - `LOCALAID_HOST` / `PORT`: HTTP bind address
    /// - `LOCALAID_PROMPT`: Prompt definition file
    /// - `LOCALAID_LOG_FORMAT`: `json` for JSON logs
    /// - `RUST_LOG`, `NO_COLOR`
    ///
    /// # Example
    /// ```no_run
    /// use localaid_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None).expect("Failed to load config");
    /// println!("Data dir: {:?}", config.data_dir);
    /// ```
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        Self::load_with(config_file, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    pub fn load_with<F>(config_file: Option<&Path>, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let config_path = config_file
            .map(Path::to_path_buf)
            .or_else(|| lookup("LOCALAID_CONFIG").map(PathBuf::from));

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    path
                )));
            }
            config.merge_yaml(&path)?;
        }

        config.merge_env(&lookup)?;

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &Path) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(data) = file.data {
            if let Some(dir) = data.dir {
                self.data_dir = dir;
            }
            if let Some(csv) = data.csv {
                self.csv_path = Some(csv);
            }
        }

        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.provider = provider;
            }
            if let Some(model) = llm.model {
                self.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                self.llm_endpoint = endpoint;
            }
            if let Some(timeout) = llm.timeout_secs {
                self.llm_timeout_secs = timeout;
            }
        }

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                self.host = host;
            }
            if let Some(port) = server.port {
                self.port = port;
            }
        }

        if let Some(prompt) = file.prompt {
            self.prompt_file = prompt.file;
        }

        if let Some(logging) = file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(json) = logging.json {
                self.log_json = json;
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(())
    }

    /// Apply environment variables on top of file and defaults.
    fn merge_env<F>(&mut self, lookup: &F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("LOCALAID_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(csv) = lookup("LOCALAID_CSV") {
            self.csv_path = Some(PathBuf::from(csv));
        }

        if let Some(provider) = lookup("LOCALAID_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model.trim().to_string();
        }

        self.api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());

        if let Some(endpoint) = lookup("LOCALAID_LLM_ENDPOINT") {
            self.llm_endpoint = endpoint;
        }

        if let Some(timeout) = lookup("LOCALAID_LLM_TIMEOUT_SECS") {
            self.llm_timeout_secs = timeout.parse().map_err(|_| {
                AppError::Config(format!("Invalid LOCALAID_LLM_TIMEOUT_SECS: {}", timeout))
            })?;
        }

        if let Some(host) = lookup("LOCALAID_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.port = port
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid PORT: {}", port)))?;
        }

        if let Some(prompt) = lookup("LOCALAID_PROMPT") {
            self.prompt_file = Some(PathBuf::from(prompt));
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if let Some(format) = lookup("LOCALAID_LOG_FORMAT") {
            self.log_json = format.eq_ignore_ascii_case("json");
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and the file.
    pub fn with_overrides(
        mut self,
        data_dir: Option<PathBuf>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        log_json: bool,
    ) -> Self {
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if log_json {
            self.log_json = true;
        }

        self
    }

    /// Path of the CSV input.
    pub fn csv_path(&self) -> PathBuf {
        self.csv_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(CSV_FILE_NAME))
    }

    /// Path of the ingested directory file.
    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }

    /// Path of the placeholder index file.
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE_NAME)
    }

    /// HTTP bind address as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> AppResult<()> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.model.trim().is_empty() {
            return Err(AppError::Config("Model cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(AppError::Config("Port must be non-zero".to_string()));
        }

        if self.llm_timeout_secs == 0 {
            return Err(AppError::Config(
                "LLM timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.port, 8080);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_derived_paths() {
        let config = AppConfig::default();
        assert!(config.data_path().ends_with("services.json"));
        assert!(config.index_path().ends_with("index.json"));
        assert!(config.csv_path().ends_with("services.csv"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = AppConfig::load_with(
            None,
            env(&[
                ("GEMINI_API_KEY", "secret"),
                ("GEMINI_MODEL", "gemini-1.5-pro"),
                ("PORT", "9090"),
                ("LOCALAID_DATA_DIR", "/srv/data"),
                ("LOCALAID_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.port, 9090);
        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert!(config.log_json);
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = AppConfig::load_with(None, env(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = AppConfig::load_with(None, env(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_then_env_layering() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("localaid.yaml");
        std::fs::write(
            &path,
            r#"
data:
  dir: /var/lib/localaid
llm:
  model: gemini-1.5-flash
  timeoutSecs: 5
server:
  port: 3000
logging:
  color: false
"#,
        )
        .unwrap();

        let config = AppConfig::load_with(Some(&path), env(&[("PORT", "4000")])).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/localaid"));
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.llm_timeout_secs, 5);
        assert_eq!(config.port, 4000);
        assert!(config.no_color);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = AppConfig::load_with(Some(Path::new("/nonexistent/localaid.yaml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some(PathBuf::from("/tmp/data")),
            Some("gemini-1.5-pro".to_string()),
            None,
            true,
            false,
            false,
        );

        assert_eq!(config.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = AppConfig {
            llm_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
