//! Process configuration, resolved once from the environment at startup.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::str::FromStr;
use std::time::Duration;

/// Variables consulted for the database URL, highest precedence first.
pub const DATABASE_URL_VARS: &[&str] = &["DATABASE_URL", "TODO_DATABASE_URL"];
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/todo";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_FILTER: &str = "todo_api=info,tower_http=info";

/// Where the database URL came from, for the startup log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlSource {
    Env(&'static str),
    Default,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub database_url_source: UrlSource,
    /// Bound on establishing or acquiring a connection.
    pub server_selection_timeout: Duration,
    /// Applied server-side as `statement_timeout`.
    pub socket_timeout: Duration,
    pub max_connections: u32,
    pub auto_create_database: bool,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (database_url, database_url_source) = DATABASE_URL_VARS
            .iter()
            .find_map(|&var| get(var).map(|url| (url, UrlSource::Env(var))))
            .unwrap_or_else(|| (DEFAULT_DATABASE_URL.to_string(), UrlSource::Default));

        Ok(Config {
            port: parse_var(&get, "PORT", "a port number", DEFAULT_PORT)?,
            database_url,
            database_url_source,
            server_selection_timeout: Duration::from_millis(parse_var(
                &get,
                "TODO_DB_SELECT_TIMEOUT_MS",
                "milliseconds",
                5_000,
            )?),
            socket_timeout: Duration::from_millis(parse_var(
                &get,
                "TODO_DB_SOCKET_TIMEOUT_MS",
                "milliseconds",
                45_000,
            )?),
            max_connections: parse_var::<u32, _>(&get, "TODO_DB_MAX_CONNECTIONS", "a positive integer", 5)?
                .max(1),
            auto_create_database: parse_flag(&get, "TODO_AUTO_CREATE_DB", true)?,
            log_filter: get("TODO_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Parsed database URL with the socket timeout applied as `statement_timeout`.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        Ok(PgConnectOptions::from_str(&self.database_url)?.options([(
            "statement_timeout",
            self.socket_timeout.as_millis().to_string(),
        )]))
    }

    pub fn log_summary(&self) {
        match &self.database_url_source {
            UrlSource::Env(var) => tracing::info!("database URL loaded from {}", var),
            UrlSource::Default => tracing::warn!(
                "none of {:?} is set; using default database URL",
                DATABASE_URL_VARS
            ),
        }
        let database = match self.connect_options() {
            Ok(options) => describe_target(&options),
            Err(e) => {
                tracing::warn!(error = %e, "database URL could not be parsed");
                "<unparseable>".to_string()
            }
        };
        tracing::info!(
            %database,
            port = self.port,
            select_timeout_ms = self.server_selection_timeout.as_millis() as u64,
            socket_timeout_ms = self.socket_timeout.as_millis() as u64,
            "configuration resolved"
        );
    }
}

fn parse_var<T, G>(get: &G, var: &'static str, expected: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value: raw,
        }),
    }
}

fn parse_flag<G>(get: &G, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                expected: "true or false",
                value: raw,
            }),
        },
    }
}

/// `user@host:port/database`; the password never appears.
pub fn describe_target(options: &PgConnectOptions) -> String {
    format!(
        "{}@{}:{}/{}",
        options.get_username(),
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, DEFAULT_PORT);
        assert_eq!(c.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(c.database_url_source, UrlSource::Default);
        assert_eq!(c.server_selection_timeout, Duration::from_millis(5_000));
        assert_eq!(c.socket_timeout, Duration::from_millis(45_000));
        assert_eq!(c.max_connections, 5);
        assert!(c.auto_create_database);
        assert_eq!(c.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn database_url_precedence() {
        let c = config(&[
            ("DATABASE_URL", "postgres://primary/todo"),
            ("TODO_DATABASE_URL", "postgres://fallback/todo"),
        ])
        .unwrap();
        assert_eq!(c.database_url, "postgres://primary/todo");
        assert_eq!(c.database_url_source, UrlSource::Env("DATABASE_URL"));

        let c = config(&[
            ("DATABASE_URL", "  "),
            ("TODO_DATABASE_URL", "postgres://fallback/todo"),
        ])
        .unwrap();
        assert_eq!(c.database_url, "postgres://fallback/todo");
        assert_eq!(c.database_url_source, UrlSource::Env("TODO_DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let c = config(&[
            ("PORT", "8080"),
            ("TODO_DB_SELECT_TIMEOUT_MS", "250"),
            ("TODO_DB_SOCKET_TIMEOUT_MS", "1000"),
            ("TODO_DB_MAX_CONNECTIONS", "0"),
            ("TODO_AUTO_CREATE_DB", "off"),
            ("TODO_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.server_selection_timeout, Duration::from_millis(250));
        assert_eq!(c.socket_timeout, Duration::from_millis(1000));
        assert_eq!(c.max_connections, 1);
        assert!(!c.auto_create_database);
        assert_eq!(c.log_filter, "debug");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config(&[("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
        assert!(config(&[("PORT", "70000")]).is_err());
        assert!(config(&[("TODO_AUTO_CREATE_DB", "maybe")]).is_err());
    }

    #[test]
    fn target_description_omits_password() {
        let c = config(&[("DATABASE_URL", "postgres://app:s3cr3t@db:6543/todo?sslmode=disable")]).unwrap();
        let described = describe_target(&c.connect_options().unwrap());
        assert_eq!(described, "app@db:6543/todo");
        assert!(!described.contains("s3cr3t"));
    }

    #[test]
    fn percent_encoded_credentials_are_decoded() {
        let c = config(&[("DATABASE_URL", "postgres://app%40corp:p%2Fw@db:5432/my%20db")]).unwrap();
        let options = c.connect_options().unwrap();
        assert_eq!(options.get_username(), "app@corp");
        assert_eq!(options.get_database(), Some("my db"));
    }

    #[test]
    fn unparseable_url_is_a_connect_error() {
        let c = config(&[("DATABASE_URL", "postgres://db:notaport/todo")]).unwrap();
        assert!(c.connect_options().is_err());
    }
}
