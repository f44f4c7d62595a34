// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup and is
//! immutable afterwards. A missing or invalid authentication secret is the
//! one startup error that must never be swallowed: the process refuses to
//! start rather than run with a gate it cannot trust.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_TOKEN_SECRET` | HS256 signing secret (min 32 bytes) | Required |
//! | `AUTH_TOKEN_TTL_SECS` | Token time-to-live in seconds | `3600` |
//! | `AUTH_HEADER` | Request header carrying the token | `authorization` |
//! | `AUTH_SCHEME` | Expected credential scheme prefix | `Bearer` |
//! | `AUTH_CLOCK_SKEW_SECS` | Expiry leeway for clock skew | `0` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderName;
use thiserror::Error;

/// Environment variable name for the token signing secret.
pub const AUTH_TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Minimum signing secret length in bytes.
///
/// HS256 security degrades with short keys; 32 bytes matches the digest
/// width.
pub const MIN_SECRET_BYTES: usize = 32;

/// Configuration error. Fatal: the service must not start with a partial or
/// invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Logging output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Token signing and lifetime settings, consumed by the codec.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// HS256 signing secret.
    pub secret: String,
    /// Token time-to-live in seconds.
    pub ttl_secs: u64,
    /// Expiry leeway in seconds for clock skew between services.
    pub leeway_secs: u64,
}

/// How the gate locates the credential on a request.
#[derive(Debug, Clone)]
pub struct GateSettings {
    /// Header carrying the credential.
    pub header: String,
    /// Expected scheme prefix, e.g. `Bearer`.
    pub scheme: String,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            header: "authorization".to_string(),
            scheme: "Bearer".to_string(),
        }
    }
}

/// Full startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub log_format: LogFormat,
    pub token: TokenSettings,
    pub gate: GateSettings,
}

impl Config {
    /// Load and validate configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;
        let addr = SocketAddr::from_str(&format!("{host}:{port}"))
            .map_err(|_| ConfigError::Invalid("HOST"))?;

        let log_format = match std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let secret = std::env::var(AUTH_TOKEN_SECRET_ENV)
            .map_err(|_| ConfigError::Missing(AUTH_TOKEN_SECRET_ENV))?;
        validate_secret(&secret)?;

        let ttl_secs = parse_u64_var("AUTH_TOKEN_TTL_SECS", 3600)?;
        let leeway_secs = parse_u64_var("AUTH_CLOCK_SKEW_SECS", 0)?;

        let header = std::env::var("AUTH_HEADER").unwrap_or_else(|_| "authorization".to_string());
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| ConfigError::Invalid("AUTH_HEADER"))?;

        let scheme = std::env::var("AUTH_SCHEME").unwrap_or_else(|_| "Bearer".to_string());
        if scheme.trim().is_empty() || scheme.contains(' ') {
            return Err(ConfigError::Invalid("AUTH_SCHEME"));
        }

        Ok(Self {
            addr,
            log_format,
            token: TokenSettings {
                secret,
                ttl_secs,
                leeway_secs,
            },
            gate: GateSettings { header, scheme },
        })
    }
}

/// Reject secrets too short to sign with.
fn validate_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_BYTES {
        return Err(ConfigError::Invalid(AUTH_TOKEN_SECRET_ENV));
    }
    Ok(())
}

fn parse_u64_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}
