use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Klinika";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address for the HTTP API.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

pub const ENV_BIND: &str = "KLINIKA_BIND";
pub const ENV_DB_PATH: &str = "KLINIKA_DB_PATH";
pub const ENV_ADMIN_EMAIL: &str = "KLINIKA_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "KLINIKA_ADMIN_PASSWORD";

/// Get the application data directory: ~/Klinika/.
/// Falls back to the working directory when no home is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite database file
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("klinika.db")
}

/// Tracing filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,klinika_lib=debug,tower_http=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBind { value: String, reason: String },
}

/// Startup configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    /// Seeded (or promoted) at startup when both are set.
    pub admin: Option<AdminSeed>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_value = get(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBind {
                value: bind_value.clone(),
                reason: e.to_string(),
            })?;

        let db_path = get(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let admin = match (get(ENV_ADMIN_EMAIL), get(ENV_ADMIN_PASSWORD)) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            bind,
            db_path,
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_named_after_app() {
        assert!(app_data_dir().ends_with("Klinika"));
        assert!(default_db_path().starts_with(app_data_dir()));
    }

    #[test]
    fn app_name_is_klinika() {
        assert_eq!(APP_NAME, "Klinika");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn defaults_when_env_empty() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.db_path, default_db_path());
        assert!(config.admin.is_none());
    }

    #[test]
    fn env_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ENV_BIND, "0.0.0.0:9000"),
            (ENV_DB_PATH, "/tmp/klinika-test.db"),
            (ENV_ADMIN_EMAIL, "admin@klinika.ua"),
            (ENV_ADMIN_PASSWORD, "AdminPass1"),
        ]))
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.db_path, PathBuf::from("/tmp/klinika-test.db"));
        assert_eq!(config.admin.unwrap().email, "admin@klinika.ua");
    }

    #[test]
    fn admin_needs_both_values() {
        let config =
            ServerConfig::from_lookup(lookup(&[(ENV_ADMIN_EMAIL, "admin@klinika.ua")])).unwrap();
        assert!(config.admin.is_none());
    }

    #[test]
    fn invalid_bind_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[(ENV_BIND, "not-an-address")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind { .. }));
    }

    #[test]
    fn admin_password_not_in_debug_output() {
        let seed = AdminSeed {
            email: "admin@klinika.ua".into(),
            password: "AdminPass1".into(),
        };
        assert!(!format!("{seed:?}").contains("AdminPass1"));
    }
}
