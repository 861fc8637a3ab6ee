//! `ambienco.toml` loading.
//!
//! Every section is optional; a missing file means all defaults. Admin
//! secrets can come from the environment instead of the file.

use ambienco_assistant::{Assistant, Corpus, Pacing};
use ambienco_security::AdminCredentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Overrides `[admin].username`.
pub const ENV_ADMIN_USERNAME: &str = "AMBIENCO_ADMIN_USERNAME";
/// Overrides `[admin].password_sha256`.
pub const ENV_ADMIN_PASSWORD_SHA256: &str = "AMBIENCO_ADMIN_PASSWORD_SHA256";

#[derive(Debug, Deserialize)]
pub struct AmbiencoConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl Default for AmbiencoConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            admin: AdminConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_rps")]
    pub max_requests_per_second: f64,
    #[serde(default = "default_burst")]
    pub max_burst: f64,
    #[serde(default = "default_max_msg_len")]
    pub max_message_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: default_rps(),
            max_burst: default_burst(),
            max_message_length: default_max_msg_len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password_sha256: Option<String>,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: None,
            password_sha256: None,
            token_ttl_minutes: default_token_ttl(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssistantConfig {
    /// TOML or JSON corpus; the built-in lighting corpus when absent.
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
    #[serde(default)]
    pub default_response: Option<String>,
    #[serde(default = "default_response_delay")]
    pub response_delay_ms: u64,
    #[serde(default = "default_response_jitter")]
    pub response_jitter_ms: u64,
    #[serde(default = "default_follow_up_delay")]
    pub follow_up_delay_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            default_response: None,
            response_delay_ms: default_response_delay(),
            response_jitter_ms: default_response_jitter(),
            follow_up_delay_ms: default_follow_up_delay(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_rps() -> f64 {
    5.0
}
fn default_burst() -> f64 {
    30.0
}
fn default_max_msg_len() -> usize {
    10_000
}
fn default_token_ttl() -> i64 {
    8 * 60
}
fn default_response_delay() -> u64 {
    1000
}
fn default_response_jitter() -> u64 {
    1000
}
fn default_follow_up_delay() -> u64 {
    1500
}

impl AmbiencoConfig {
    /// Parse `path`, or return the defaults if it does not exist.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let config_str = match tokio::fs::read_to_string(path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        };
        Self::from_toml_str(&config_str)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Let environment variables replace the admin account fields.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup(ENV_ADMIN_USERNAME) {
            self.admin.username = Some(username);
        }
        if let Some(hash) = lookup(ENV_ADMIN_PASSWORD_SHA256) {
            self.admin.password_sha256 = Some(hash);
        }
    }

    /// The admin account, if both username and password hash are set.
    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        match (&self.admin.username, &self.admin.password_sha256) {
            (Some(username), Some(hash)) if !username.is_empty() && !hash.is_empty() => {
                Some(AdminCredentials {
                    username: username.clone(),
                    password_sha256: hash.clone(),
                })
            }
            _ => None,
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.admin.token_ttl_minutes)
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            response_delay: Duration::from_millis(self.assistant.response_delay_ms),
            response_jitter: Duration::from_millis(self.assistant.response_jitter_ms),
            follow_up_delay: Duration::from_millis(self.assistant.follow_up_delay_ms),
        }
    }

    /// Build the assistant. A relative corpus path is resolved against
    /// `config_dir`.
    pub fn assistant(&self, config_dir: &Path) -> anyhow::Result<Assistant> {
        let corpus = match &self.assistant.corpus_path {
            Some(path) => Corpus::load(&config_dir.join(path))?,
            None => Corpus::builtin(),
        };
        let assistant = Assistant::new(corpus);
        Ok(match &self.assistant.default_response {
            Some(response) => assistant.with_default_response(response.clone())?,
            None => assistant,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AmbiencoConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.security.max_message_length, 10_000);
        assert!(config.admin_credentials().is_none());
        assert_eq!(config.pacing().follow_up_delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_partial_sections() {
        let config = AmbiencoConfig::from_toml_str(
            r#"
            [server]
            port = 8080

            [admin]
            username = "admin"
            password_sha256 = "abc"
            token_ttl_minutes = 30

            [assistant]
            response_delay_ms = 0
            response_jitter_ms = 0
            follow_up_delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.admin_credentials().unwrap().username, "admin");
        assert_eq!(config.token_ttl(), chrono::Duration::minutes(30));
        assert_eq!(config.pacing(), Pacing::immediate());
    }

    #[test]
    fn test_env_overrides_admin() {
        let mut config = AmbiencoConfig::from_toml_str("[admin]\nusername = \"file-user\"").unwrap();
        assert!(config.admin_credentials().is_none());

        let env = HashMap::from([
            (ENV_ADMIN_USERNAME, "env-user".to_string()),
            (ENV_ADMIN_PASSWORD_SHA256, "deadbeef".to_string()),
        ]);
        config.apply_env(|key| env.get(key).cloned());
        let creds = config.admin_credentials().unwrap();
        assert_eq!(creds.username, "env-user");
        assert_eq!(creds.password_sha256, "deadbeef");
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert!(AmbiencoConfig::from_toml_str("[server]\nport = \"high\"").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_means_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AmbiencoConfig::load(&tmp.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_relative_corpus_path() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("corpus.toml"),
            r#"
            [[entries]]
            keywords = ["lamp"]
            category = "Lamps"
            response = "We stock lamps."
            "#,
        )
        .unwrap();
        let config = AmbiencoConfig::from_toml_str(
            "[assistant]\ncorpus_path = \"corpus.toml\"\ndefault_response = \"Ask us!\"",
        )
        .unwrap();

        let assistant = config.assistant(tmp.path()).unwrap();
        assert_eq!(assistant.corpus().len(), 1);
        assert_eq!(assistant.reply("table lamp?").category.as_deref(), Some("Lamps"));
        assert_eq!(assistant.reply("sofa").response, "Ask us!");
    }

    #[test]
    fn test_blank_default_response_rejected() {
        let config =
            AmbiencoConfig::from_toml_str("[assistant]\ndefault_response = \"  \"").unwrap();
        let err = config.assistant(Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("default response must not be blank"));
    }
}
