mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::credentials::read_credentials;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use api::{ApiConfig, CredentialsConfig};
pub use defaults::{default_endpoint, default_keys_file, default_timeout_secs};
pub use validation::{expand_env_var_in_string, expand_home, expand_with};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Settings resolved for one run of the command-line tool.
#[derive(Debug, Clone)]
pub struct Config {
    pub user_id: Option<String>,
    pub user_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub verbose: bool,
}

/// On-disk configuration, YAML or JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::from_sources(args, file_config, |name| env::var(name).ok())
    }

    /// Merge settings with precedence CLI args > environment > config file > default.
    pub fn from_sources(
        args: &Args,
        file_config: FileConfig,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let expand = |value: String| expand_with(&value, &env_var);

        let endpoint = args
            .endpoint
            .clone()
            .or_else(|| env_var("ZOTERO_ENDPOINT"))
            .or(file_config.api.endpoint)
            .map(expand)
            .map(|endpoint| endpoint.trim_end_matches('/').to_string())
            .unwrap_or_else(default_endpoint);

        let timeout_secs = env_var("ZOTERO_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .or(file_config.api.timeout_secs)
            .unwrap_or_else(default_timeout_secs);

        let verbose = args.verbose
            || env_var("ZOT_VERBOSE")
                .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        // A keys file named on the command line supplies both values, so an
        // id and a key from different accounts are never paired.
        if let Some(path) = &args.keys_file {
            let credentials = read_credentials(path)
                .with_context(|| format!("Failed to read keys file: {}", path.display()))?;
            return Ok(Config {
                user_id: Some(credentials.user_id),
                user_key: Some(credentials.user_key),
                endpoint,
                timeout_secs,
                verbose,
            });
        }

        // The key is never taken from the command line.
        let mut user_id = args
            .user_id
            .clone()
            .or_else(|| env_var("ZOTERO_USER_ID"))
            .or(file_config.credentials.user_id)
            .map(expand);
        let mut user_key = env_var("ZOTERO_API_KEY")
            .or(file_config.credentials.user_key)
            .map(expand);

        if user_id.is_none() || user_key.is_none() {
            let explicit_file = env_var("ZOTERO_KEYS_FILE")
                .map(PathBuf::from)
                .or_else(|| {
                    file_config
                        .credentials
                        .keys_file
                        .map(|path| expand_home(&expand(path)))
                });

            let keys_file = match explicit_file {
                Some(path) => Some(path),
                None => default_keys_file().filter(|path| path.exists()),
            };

            if let Some(path) = keys_file {
                let credentials = read_credentials(&path)
                    .with_context(|| format!("Failed to read keys file: {}", path.display()))?;
                user_id = user_id.or(Some(credentials.user_id));
                user_key = user_key.or(Some(credentials.user_key));
            }
        }

        Ok(Config {
            user_id,
            user_key,
            endpoint,
            timeout_secs,
            verbose,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".zot.yaml"),
            PathBuf::from(".zot.yml"),
            PathBuf::from(".zot.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("zot");
            paths.push(config_dir.join("zot.yaml"));
            paths.push(config_dir.join("zot.yml"));
            paths.push(config_dir.join("zot.json"));
        }

        paths
    }
}
