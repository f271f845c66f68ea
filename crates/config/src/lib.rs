//! Configuration loading and validation.
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults;
//! 2. a config file (TOML, YAML or JSON, picked by extension), either given
//!    explicitly or found in the platform config directory;
//! 3. `TUBESNAP_`-prefixed environment variables, with `__` separating
//!    nested keys (`TUBESNAP_YOUTUBE__API_KEY` sets `youtube.api_key`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tubesnap_resolver::{DEFAULT_LIMIT, Limits, MAX_LIMIT};
use tubesnap_youtube::{ClientOptions, Credentials, DEFAULT_BASE_URL};

const ENV_PREFIX: &str = "TUBESNAP_";
const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];
const DATABASE_FILE_NAME: &str = "snapshots.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tubesnap")
}

/// The first existing config file in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = project_dirs()?;
    CONFIG_FILE_NAMES.iter().map(|name| dirs.config_dir().join(name)).find(|path| path.is_file())
}

fn default_database_path() -> PathBuf {
    match project_dirs() {
        Some(dirs) => dirs.data_dir().join(DATABASE_FILE_NAME),
        None => PathBuf::from(DATABASE_FILE_NAME),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owner used when none is given on the command line.
    pub owner: Option<String>,
    pub database: DatabaseConfig,
    pub youtube: YoutubeConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_database_path() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// OAuth access token; takes precedence over `api_key`.
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub include_replies: bool,
}
impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            access_token: None,
            timeout_secs: 30,
            include_replies: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}
impl Default for ResolverConfig {
    fn default() -> Self {
        Self { default_limit: DEFAULT_LIMIT, max_limit: MAX_LIMIT }
    }
}

impl Config {
    /// Load defaults, then `path` (or the default config file if there is
    /// one), then the environment, and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        let path = match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };
        if let Some(path) = path {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = merge_file(figment, &path)?;
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that doesn't depend on which command runs.
    ///
    /// Credentials are only required by commands that talk to YouTube and
    /// are checked by [`client_options`](Self::client_options).
    pub fn validate(&self) -> Result<()> {
        self.limits()?;
        if self.youtube.base_url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("youtube.base_url must not be empty".to_string()));
        }
        if self.youtube.timeout_secs == 0 {
            exn::bail!(ErrorKind::Invalid("youtube.timeout_secs must be greater than zero".to_string()));
        }
        if self.database.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("database.path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Limit policy for resolvers.
    pub fn limits(&self) -> Result<Limits> {
        Limits::new(self.resolver.default_limit, self.resolver.max_limit).or_raise(|| {
            ErrorKind::Invalid(format!(
                "resolver limits must satisfy 1 <= default_limit ({}) <= max_limit ({}) <= {MAX_LIMIT}",
                self.resolver.default_limit, self.resolver.max_limit
            ))
        })
    }

    /// Options for the YouTube client.
    pub fn client_options(&self) -> Result<ClientOptions> {
        let non_blank = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        let credentials = match (non_blank(&self.youtube.access_token), non_blank(&self.youtube.api_key)) {
            (Some(token), _) => Credentials::AccessToken(token),
            (None, Some(key)) => Credentials::ApiKey(key),
            (None, None) => exn::bail!(ErrorKind::Invalid(
                "no YouTube credentials: set youtube.api_key or youtube.access_token".to_string()
            )),
        };
        Ok(ClientOptions {
            base_url: self.youtube.base_url.clone(),
            credentials,
            timeout: Duration::from_secs(self.youtube.timeout_secs),
            include_replies: self.youtube.include_replies,
        })
    }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default().to_ascii_lowercase();
    Ok(match extension.as_str() {
        "toml" => figment.merge(Toml::file_exact(path)),
        "yaml" | "yml" => figment.merge(Yaml::file_exact(path)),
        "json" => figment.merge(Json::file_exact(path)),
        _ => exn::bail!(ErrorKind::UnsupportedFormat(extension)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.youtube.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.limits().unwrap(), Limits::default());
    }

    #[rstest]
    #[case("config.toml", "owner = \"U1\"\n[resolver]\ndefault_limit = 5\n")]
    #[case("config.yaml", "owner: U1\nresolver:\n  default_limit: 5\n")]
    #[case("config.yml", "owner: U1\nresolver:\n  default_limit: 5\n")]
    #[case("config.json", r#"{"owner": "U1", "resolver": {"default_limit": 5}}"#)]
    fn test_load_file_formats(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&write(&dir, name, contents))).unwrap();
        assert_eq!(config.owner.as_deref(), Some("U1"));
        assert_eq!(config.resolver.default_limit, 5);
        assert_eq!(config.resolver.max_limit, 100);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/tubesnap.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn test_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&write(&dir, "config.ini", "owner=U1"))).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat("ini".to_string()));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&write(&dir, "config.toml", "[resolver]\nmax_limit = \"lots\"\n"))).unwrap_err();
        assert_eq!(*err, ErrorKind::Parse);
    }

    #[rstest]
    #[case(20, 0)]
    #[case(20, 101)]
    #[case(0, 100)]
    #[case(50, 10)]
    fn test_invalid_limits(#[case] default_limit: u32, #[case] max_limit: u32) {
        let config = Config { resolver: ResolverConfig { default_limit, max_limit }, ..Config::default() };
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_invalid_youtube_settings() {
        let mut config = Config::default();
        config.youtube.timeout_secs = 0;
        assert!(config.validate().is_err());
        let mut config = Config::default();
        config.youtube.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_options_credentials() {
        let mut config = Config::default();
        let err = config.client_options().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));

        config.youtube.api_key = Some("key".to_string());
        assert_eq!(config.client_options().unwrap().credentials, Credentials::ApiKey("key".to_string()));

        config.youtube.access_token = Some("token".to_string());
        config.youtube.timeout_secs = 5;
        let options = config.client_options().unwrap();
        assert_eq!(options.credentials, Credentials::AccessToken("token".to_string()));
        assert_eq!(options.timeout, Duration::from_secs(5));

        config.youtube.access_token = Some(" ".to_string());
        assert_eq!(config.client_options().unwrap().credentials, Credentials::ApiKey("key".to_string()));
    }

    #[test]
    fn test_environment_wins_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[youtube]\napi_key = \"file-key\"\ntimeout_secs = 3\n")?;
            jail.set_env("TUBESNAP_YOUTUBE__API_KEY", "env-key");
            let config = Config::load(Some(&jail.directory().join("config.toml"))).unwrap();
            assert_eq!(config.youtube.api_key.as_deref(), Some("env-key"));
            assert_eq!(config.youtube.timeout_secs, 3);
            Ok(())
        });
    }
}
