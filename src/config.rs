use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File consulted for configuration, relative to the working directory.
pub const CONFIG_FILE: &str = "Election.toml";

/// Prefix of the environment variables that override the config file.
pub const ENV_PREFIX: &str = "ELECTION_";

/// Client configuration, derived from defaults, then `Election.toml`, then
/// `ELECTION_*` environment variables, later sources winning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    api_url: String,
    request_timeout: u64,
    session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            request_timeout: 30,
            session_file: PathBuf::from(".election-session.json"),
        }
    }
}

impl Config {
    /// The layered configuration sources.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    /// Defaults, but talking to `api_url`.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Base URL of the backend API, always ending in `/` so that relative
    /// endpoint paths join beneath it.
    /// Configured via `API_URL`.
    pub fn api_url(&self) -> Result<Url> {
        let mut raw = self.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| Error::invalid("api_url", e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(Error::invalid("api_url", format!("`{raw}` cannot be a base URL")));
        }
        Ok(url)
    }

    /// How long to wait for any one request.
    /// Configured via `REQUEST_TIMEOUT`, in seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Where the signed-in session is kept between runs.
    /// Configured via `SESSION_FILE`.
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use figment::Jail;

    #[test]
    fn defaults() {
        Jail::expect_with(|_| {
            let config: Config = Config::figment().extract()?;
            assert_eq!(config, Config::default());
            assert_eq!(config.api_url().unwrap().as_str(), "http://localhost:8080/api/");
            assert_eq!(config.request_timeout(), Duration::from_secs(30));
            assert_eq!(config.session_file(), Path::new(".election-session.json"));
            Ok(())
        });
    }

    #[test]
    fn file_then_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                    api_url = "https://elections.example.org/api/"
                    request_timeout = 10
                "#,
            )?;
            let config: Config = Config::figment().extract()?;
            assert_eq!(
                config.api_url().unwrap().as_str(),
                "https://elections.example.org/api/"
            );
            assert_eq!(config.request_timeout(), Duration::from_secs(10));

            jail.set_env("ELECTION_REQUEST_TIMEOUT", "5");
            jail.set_env("ELECTION_SESSION_FILE", "/tmp/session.json");
            let config: Config = Config::figment().extract()?;
            assert_eq!(config.request_timeout(), Duration::from_secs(5));
            assert_eq!(config.session_file(), Path::new("/tmp/session.json"));
            Ok(())
        });
    }

    #[test]
    fn malformed_values() {
        Jail::expect_with(|jail| {
            jail.set_env("ELECTION_REQUEST_TIMEOUT", "soon");
            assert!(matches!(Config::load(), Err(Error::Config(_))));
            Ok(())
        });

        let config = Config::with_api_url("not a url");
        assert!(matches!(
            config.api_url(),
            Err(Error::InvalidInput { field, .. }) if field == "api_url"
        ));
    }
}
