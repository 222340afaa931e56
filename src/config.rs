// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root for acknowledgment records and audit logs | `/data` |
//! | `BACKEND_URL` | Platform REST API base URL | Required |
//! | `BACKEND_TIMEOUT_SECS` | Transport timeout for platform calls | None |
//! | `ACK_STORE` | `file`, `redb` or `memory` | `file` |
//! | `JWT_SECRET` | HS256 secret for JWT verification | Required unless built with `dev` |
//! | `JWT_ISSUER` | Expected JWT issuer claim | Optional |
//! | `JWT_AUDIENCE` | Expected JWT audience claim | Optional |
//! | `HISTORY_CACHE_TTL_SECS` | Transfer history cache TTL | `15` |
//! | `PENDING_STALE_AFTER_SECS` | Age after which a pending transfer is flagged | `86400` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; both set enables HTTPS | Plain HTTP |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::state::AuthConfig;
use crate::storage::paths::DATA_ROOT;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const BACKEND_TIMEOUT_ENV: &str = "BACKEND_TIMEOUT_SECS";
pub const ACK_STORE_ENV: &str = "ACK_STORE";
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";
pub const HISTORY_CACHE_TTL_ENV: &str = "HISTORY_CACHE_TTL_SECS";
pub const PENDING_STALE_AFTER_ENV: &str = "PENDING_STALE_AFTER_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HISTORY_CACHE_TTL_SECS: u64 = 15;
pub const DEFAULT_PENDING_STALE_AFTER_SECS: u64 = 86_400;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

impl ConfigError {
    fn invalid(name: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Where the acknowledgment flag is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckStoreKind {
    #[default]
    File,
    Redb,
    /// Process-local; every restart re-prompts.
    Memory,
}

impl FromStr for AckStoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(AckStoreKind::File),
            "redb" => Ok(AckStoreKind::Redb),
            "memory" => Ok(AckStoreKind::Memory),
            _ => Err("expected file, redb or memory".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err("expected json or pretty".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub backend_url: Url,
    pub backend_timeout: Option<Duration>,
    pub ack_store: AckStoreKind,
    pub jwt: AuthConfig,
    pub history_cache_ttl: Duration,
    pub pending_stale_after: Duration,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` for every variable. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let ip: IpAddr = host
            .parse()
            .map_err(|e| ConfigError::invalid(HOST_ENV, &host, e))?;
        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;

        let backend_raw = get(BACKEND_URL_ENV).ok_or(ConfigError::Missing(BACKEND_URL_ENV))?;
        let backend_url = Url::parse(&backend_raw)
            .map_err(|e| ConfigError::invalid(BACKEND_URL_ENV, &backend_raw, e))?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                BACKEND_URL_ENV,
                &backend_raw,
                "scheme must be http or https",
            ));
        }

        let backend_timeout = match get(BACKEND_TIMEOUT_ENV) {
            Some(raw) => Some(Duration::from_secs(parse_secs(&raw, BACKEND_TIMEOUT_ENV)?)),
            None => None,
        };

        let jwt = AuthConfig {
            secret: get(JWT_SECRET_ENV),
            issuer: get(JWT_ISSUER_ENV),
            audience: get(JWT_AUDIENCE_ENV),
        };
        if jwt.secret.is_none() && !cfg!(any(test, feature = "dev")) {
            return Err(ConfigError::Missing(JWT_SECRET_ENV));
        }

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DATA_ROOT.to_string())),
            backend_url,
            backend_timeout,
            ack_store: parse_or(get(ACK_STORE_ENV), ACK_STORE_ENV, AckStoreKind::default())?,
            jwt,
            history_cache_ttl: Duration::from_secs(parse_or(
                get(HISTORY_CACHE_TTL_ENV),
                HISTORY_CACHE_TTL_ENV,
                DEFAULT_HISTORY_CACHE_TTL_SECS,
            )?),
            pending_stale_after: Duration::from_secs(parse_or(
                get(PENDING_STALE_AFTER_ENV),
                PENDING_STALE_AFTER_ENV,
                DEFAULT_PENDING_STALE_AFTER_SECS,
            )?),
            tls,
            log_format: parse_or(get(LOG_FORMAT_ENV), LOG_FORMAT_ENV, LogFormat::default())?,
        })
    }
}

fn parse_or<T>(raw: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(name, &raw, e)),
        None => Ok(default),
    }
}

fn parse_secs(raw: &str, name: &'static str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::invalid(name, raw, "must be greater than zero")),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::invalid(name, raw, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[(BACKEND_URL_ENV, "https://platform.example")]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.ack_store, AckStoreKind::File);
        assert_eq!(config.history_cache_ttl, Duration::from_secs(15));
        assert_eq!(config.pending_stale_after, Duration::from_secs(86_400));
        assert_eq!(config.backend_timeout, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.tls.is_none());
        assert!(config.jwt.secret.is_none());
    }

    #[test]
    fn backend_url_is_required() {
        assert_eq!(load(&[]), Err(ConfigError::Missing(BACKEND_URL_ENV)));
        assert_eq!(
            load(&[(BACKEND_URL_ENV, "  ")]),
            Err(ConfigError::Missing(BACKEND_URL_ENV))
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            (BACKEND_URL_ENV, "http://platform:9000/api"),
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "3001"),
            (ACK_STORE_ENV, "REDB"),
            (BACKEND_TIMEOUT_ENV, "20"),
            (JWT_SECRET_ENV, "s3cret"),
            (JWT_ISSUER_ENV, "https://issuer.example"),
            (LOG_FORMAT_ENV, "json"),
            (TLS_CERT_PATH_ENV, "/certs/server.crt"),
            (TLS_KEY_PATH_ENV, "/certs/server.key"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3001".parse().unwrap());
        assert_eq!(config.ack_store, AckStoreKind::Redb);
        assert_eq!(config.backend_timeout, Some(Duration::from_secs(20)));
        assert_eq!(config.jwt.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: PathBuf::from("/certs/server.crt"),
                key: PathBuf::from("/certs/server.key"),
            })
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        let base = (BACKEND_URL_ENV, "https://platform.example");

        assert!(matches!(
            load(&[base, (PORT_ENV, "eighty")]),
            Err(ConfigError::Invalid { name: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[base, (ACK_STORE_ENV, "postgres")]),
            Err(ConfigError::Invalid { name: ACK_STORE_ENV, .. })
        ));
        assert!(matches!(
            load(&[base, (BACKEND_TIMEOUT_ENV, "0")]),
            Err(ConfigError::Invalid { name: BACKEND_TIMEOUT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(BACKEND_URL_ENV, "ftp://platform.example")]),
            Err(ConfigError::Invalid { name: BACKEND_URL_ENV, .. })
        ));
        assert_eq!(
            load(&[base, (TLS_CERT_PATH_ENV, "/certs/server.crt")]),
            Err(ConfigError::PartialTls)
        );
    }
}
