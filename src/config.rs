use std::net::SocketAddr;

use anyhow::Context;
use config::{Config, Environment, File, Source};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "trivia";

/// Runtime settings of the trivia server.
#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: SecretString,
    pub max_connections: u32,
}

#[derive(Deserialize)]
struct RawSettings {
    host: String,
    port: u16,
    database_url: String,
    max_connections: u32,
}

impl Settings {
    /// Defaults, then `trivia.toml` (or the file named by `TRIVIA_CONFIG`) if present,
    /// then `TRIVIA__*` environment variables. `.env` is loaded first.
    pub fn load() -> anyhow::Result<Settings> {
        dotenv::dotenv().ok();
        let file = dotenv::var("TRIVIA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        Self::from_sources(File::with_name(&file).required(false), Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("TRIVIA")
            .separator("__")
            .try_parsing(true)
    }

    fn from_sources(
        file: impl Source + Send + Sync + 'static,
        env: Environment,
    ) -> anyhow::Result<Settings> {
        let raw: RawSettings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("database_url", "sqlite:trivia.db")?
            .set_default("max_connections", 5)?
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        if raw.max_connections == 0 {
            anyhow::bail!("max_connections must be at least 1");
        }

        Ok(Settings {
            host: raw.host,
            port: raw.port,
            database_url: raw.database_url.into(),
            max_connections: raw.max_connections,
        })
    }

    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }

    pub fn database_url(&self) -> &str {
        self.database_url.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn no_file() -> impl Source + Send + Sync + 'static {
        File::with_name("this-file-does-not-exist").required(false)
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::environment().source(Some(map))
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_sources(no_file(), env(&[])).unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.database_url(), "sqlite:trivia.db");
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.address().unwrap().port(), 8080);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_sources(
            no_file(),
            env(&[
                ("TRIVIA__PORT", "3000"),
                ("TRIVIA__DATABASE_URL", "sqlite::memory:"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.database_url(), "sqlite::memory:");
    }

    #[test]
    fn database_url_is_not_printed() {
        let settings = Settings::from_sources(
            no_file(),
            env(&[("TRIVIA__DATABASE_URL", "sqlite:secret-place.db")]),
        )
        .unwrap();
        assert!(!format!("{settings:?}").contains("secret-place"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let result = Settings::from_sources(no_file(), env(&[("TRIVIA__PORT", "plus")]));
        assert!(result.is_err());
    }

    #[test]
    fn zero_connections_is_an_error() {
        let result = Settings::from_sources(no_file(), env(&[("TRIVIA__MAX_CONNECTIONS", "0")]));
        assert!(result.is_err());
    }
}
