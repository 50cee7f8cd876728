use serde::Deserialize;

use std::time::Duration;

/// Runtime configuration read from the process environment.
///
/// Every key is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_host")]
    pub db_host: String,
    #[serde(default = "default_db_port")]
    pub db_port: u16,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_db_user")]
    pub db_user: String,
    #[serde(default = "default_db_password")]
    pub db_password: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_max_retries")]
    pub db_max_retries: u32,
    #[serde(default = "default_db_retry_delay_secs")]
    pub db_retry_delay_secs: u64,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

const fn default_db_port() -> u16 {
    5432
}

fn default_db_name() -> String {
    "appdb".to_string()
}

fn default_db_user() -> String {
    "appuser".to_string()
}

fn default_db_password() -> String {
    "apppass".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_db_max_retries() -> u32 {
    30
}

const fn default_db_retry_delay_secs() -> u64 {
    2
}

const fn default_db_connect_timeout_secs() -> u64 {
    5
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Builds a config from explicit key/value pairs, using the same keys as the environment.
    #[cfg(test)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        envy::from_iter(pairs.into_iter().map(|(k, v)| (k.into(), v.into())))
    }

    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.db_retry_delay_secs)
    }

    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
