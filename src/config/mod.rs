use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_UPSTREAM_BASE_URL: &str = "http://localhost:3001";
const DEFAULT_MOCK_UPSTREAM_PORT: u16 = 3001;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub data_dir: PathBuf,
    pub upstream_base_url: String,
    pub mock_upstream_port: u16,
    pub cache_ttl_secs: u64,
    pub upstream_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// 从任意变量来源构建配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        Ok(Config {
            server_host: text("SERVER_HOST", DEFAULT_SERVER_HOST),
            server_port: parse_var(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            data_dir: PathBuf::from(text("DATA_DIR", DEFAULT_DATA_DIR)),
            upstream_base_url: text("UPSTREAM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            mock_upstream_port: parse_var(&lookup, "MOCK_UPSTREAM_PORT", DEFAULT_MOCK_UPSTREAM_PORT)?,
            cache_ttl_secs: parse_var(&lookup, "CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            upstream_timeout_secs: parse_var(
                &lookup,
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.upstream_base_url, "http://localhost:3001");
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn upstream_base_url_is_overridable_and_trimmed() {
        let config = config_from(&[("UPSTREAM_BASE_URL", "http://upstream:8080/")]).unwrap();
        assert_eq!(config.upstream_base_url, "http://upstream:8080");
    }

    #[test]
    fn unparsable_port_is_rejected() {
        let err = config_from(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
    }
}
