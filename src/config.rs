/*
 * Responsibility
 * - 環境変数 (.env を含む) の読み込み: PORT, APP_ENV, JWT_SECRET, JWT_TTL_SECONDS
 * - 設定値のバリデーション (不足/短すぎる secret なら起動失敗)
 *
 * Notes
 * - env へのアクセスと parse を分離し、parse 側はテストから lookup 関数で駆動する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::services::auth::token_codec::{CodecConfigError, DEFAULT_TOKEN_TTL, SigningSecret};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    Codec(CodecConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::Codec(e) => write!(f, "invalid auth configuration: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecConfigError> for ConfigError {
    fn from(e: CodecConfigError) -> Self {
        ConfigError::Codec(e)
    }
}

/// Token signing settings. `Debug` is safe to log: the secret redacts itself.
#[derive(Debug)]
pub struct AuthConfig {
    pub secret: SigningSecret,
    pub token_ttl: TimeDelta,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let secret = SigningSecret::new(secret)?;

        let token_ttl = match lookup("JWT_TTL_SECONDS") {
            Some(raw) => {
                let seconds = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ConfigError::Invalid("JWT_TTL_SECONDS"))?;
                if seconds <= 0 {
                    return Err(CodecConfigError::NonPositiveTtl { seconds }.into());
                }
                TimeDelta::try_seconds(seconds).ok_or(ConfigError::Invalid("JWT_TTL_SECONDS"))?
            }
            None => DEFAULT_TOKEN_TTL,
        };

        Ok(Self { secret, token_ttl })
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());
        let auth = AuthConfig::from_lookup(&lookup)?;

        Ok(Self {
            addr,
            app_env,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth.token_ttl, DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn missing_secret_is_a_startup_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn short_secret_is_a_startup_error() {
        let err = AuthConfig::from_lookup(lookup(&[("JWT_SECRET", "too-short")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Codec(CodecConfigError::SecretTooShort { actual: 9, .. })
        ));
    }

    #[test]
    fn ttl_override_and_validation() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "3600"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl, TimeDelta::hours(1));

        let err = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "soon"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_TTL_SECONDS"));

        let err = AuthConfig::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Codec(CodecConfigError::NonPositiveTtl { seconds: 0 })
        ));
    }

    #[test]
    fn port_and_env_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", SECRET),
            ("PORT", "8081"),
            ("APP_ENV", "PROD"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8081);
        assert!(config.app_env.is_production());

        let err = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET), ("PORT", "http")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn debug_output_does_not_leak_secret() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", SECRET)])).unwrap();
        assert!(!format!("{config:?}").contains(SECRET));
    }
}
