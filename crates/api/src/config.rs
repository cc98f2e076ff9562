use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// JWT session authentication configuration
    pub jwt: JwtAuthConfig,
    /// Email service configuration
    #[serde(default)]
    pub email: EmailConfig,
    /// Invitation policy knobs
    #[serde(default)]
    pub invitations: InvitationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Base URL of the frontend; invite links are built on top of it.
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format for signing session tokens
    pub private_key: String,

    /// RSA public key in PEM format for verifying session tokens
    pub public_key: String,

    /// Session token expiration in seconds (default: 28800 = 8 hours)
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: i64,

    /// Clock skew leeway in seconds (default: 30)
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether outbound email is enabled at all.
    #[serde(default)]
    pub enabled: bool,

    /// Provider: "console", "sendgrid" or "smtp".
    #[serde(default = "default_email_provider")]
    pub provider: String,

    #[serde(default)]
    pub sendgrid_api_key: String,

    #[serde(default)]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// "html" to include an HTML body, anything else for plain text only.
    #[serde(default = "default_template_style")]
    pub template_style: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            sendgrid_api_key: String::new(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
            template_style: default_template_style(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct InvitationConfig {
    /// When true, issuance rejects expiry timestamps that are not in the
    /// future. Off by default: only parseability is required.
    #[serde(default)]
    pub require_future_expiry: bool,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_app_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_session_expiry() -> i64 {
    28800
}
fn default_leeway() -> u64 {
    30
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_sender_email() -> String {
    "hello@projecthub.example".to_string()
}
fn default_sender_name() -> String {
    "Project Hub".to_string()
}
fn default_template_style() -> String {
    "html".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with HUB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("HUB").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Database configuration in the persistence layer's shape.
    pub fn database_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            [server]
            host = "127.0.0.1"
            port = 0

            [database]
            url = "postgres://localhost/project_hub_test"

            [logging]
            level = "debug"
            format = "pretty"

            [jwt]
            private_key = "test-private"
            public_key = "test-public"
        "#
    }

    fn parse(toml: &str) -> Config {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap();
        config.try_deserialize().unwrap()
    }

    #[test]
    fn test_minimal_config_applies_defaults() {
        let config = parse(minimal_toml());

        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(config.server.app_base_url, "http://localhost:3000");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.jwt.session_expiry_secs, 28800);
        assert!(!config.email.enabled);
        assert_eq!(config.email.provider, "console");
        assert!(!config.invitations.require_future_expiry);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let config = parse(minimal_toml());
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_invitation_policy_override() {
        let toml = format!(
            "{}\n[invitations]\nrequire_future_expiry = true\n",
            minimal_toml()
        );
        let config = parse(&toml);
        assert!(config.invitations.require_future_expiry);
    }

    #[test]
    fn test_database_config_conversion() {
        let config = parse(minimal_toml());
        let db = config.database_config();
        assert_eq!(db.url, "postgres://localhost/project_hub_test");
        assert_eq!(db.min_connections, 5);
    }
}
