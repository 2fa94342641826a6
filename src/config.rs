use std::env;
use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub extra_origins: Vec<String>,

    /// Postgres store. Takes precedence over `journal_file`.
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    /// JSON file store, used when no database is configured.
    pub journal_file: Option<PathBuf>,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn parsed<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parsed("PORT", 5000)?,
            frontend_url: non_empty("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:8081".into()),
            extra_origins: non_empty("CORS_EXTRA_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),

            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parsed("DATABASE_MAX_CONNECTIONS", 5)?,

            journal_file: non_empty("JOURNAL_FILE").map(PathBuf::from),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins allowed by the CORS layer.
    pub fn allowed_origins(&self) -> Vec<&str> {
        std::iter::once(self.frontend_url.as_str())
            .chain(self.extra_origins.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 5000,
            frontend_url: "http://localhost:8081".into(),
            extra_origins: vec!["http://192.168.1.20:8081".into()],
            database_url: None,
            database_max_connections: 5,
            journal_file: None,
        }
    }

    #[test]
    fn test_listen_addr() {
        assert_eq!(config().listen_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_allowed_origins_puts_frontend_first() {
        assert_eq!(
            config().allowed_origins(),
            vec!["http://localhost:8081", "http://192.168.1.20:8081"]
        );
    }
}
