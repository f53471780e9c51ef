//! Environment-driven application settings.
//!
//! Centralises configuration parsing so values are validated consistently
//! and testable in isolation via `mockable::Env`. Release builds require
//! explicit, valid settings; debug builds tolerate defaults and log what
//! they fell back to.

use std::net::SocketAddr;
use std::path::PathBuf;

use mockable::Env;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

use backend::outbound::sms::{AligoSettings, TwilioSettings};

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const TOKEN_SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
const TOKEN_ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const COOKIE_SECURE_ENV: &str = "COOKIE_SECURE";
const RUN_MIGRATIONS_ENV: &str = "RUN_MIGRATIONS";
const SMS_PROVIDER_ENV: &str = "SMS_PROVIDER";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_SECRET_PATH: &str = "/var/run/secrets/token_secret";
const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

const BOOL_EXPECTED: &str = "1|0|true|false";
const SMS_EXPECTED: &str = "console|twilio|aligo";

/// Minimal environment access used by settings parsing.
///
/// Implemented for every `mockable::Env` so production code passes
/// `DefaultEnv` while tests substitute a plain map.
pub trait SettingsEnv {
    /// Read a variable as a string.
    fn string(&self, name: &str) -> Option<String>;
}

impl<E: Env> SettingsEnv for E {
    fn string(&self, name: &str) -> Option<String> {
        Env::string(self, name)
    }
}

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Accepted forms.
        expected: &'static str,
    },
    /// Reading the token secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        /// Configured secret path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The token secret file exists but is too short.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        /// Configured secret path.
        path: PathBuf,
        /// Actual length.
        length: usize,
        /// Required minimum.
        min_len: usize,
    },
}

/// SMS provider selection with provider-specific credentials.
#[derive(Debug, Clone)]
pub enum SmsSettings {
    /// Log messages instead of sending (development).
    Console,
    /// Deliver via the Twilio REST API.
    Twilio(TwilioSettings),
    /// Deliver via the Aligo gateway.
    Aligo(AligoSettings),
}

/// Validated application settings.
#[derive(Debug)]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Raw secret bytes for the session token codec.
    pub token_secret: Zeroizing<Vec<u8>>,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// Whether to apply pending migrations on startup.
    pub run_migrations: bool,
    /// SMS provider selection.
    pub sms: SmsSettings,
}

fn require(env: &dyn SettingsEnv, name: &'static str) -> Result<String, ConfigError> {
    env.string(name).ok_or(ConfigError::MissingEnv { name })
}

fn parse_bool(
    env: &dyn SettingsEnv,
    mode: BuildMode,
    name: &'static str,
    default_value: bool,
) -> Result<bool, ConfigError> {
    match env.string(name) {
        None => Ok(default_value),
        Some(value) => match value.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ if mode.is_debug() => {
                warn!(name, value, "invalid boolean setting; using default");
                Ok(default_value)
            }
            _ => Err(ConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            }),
        },
    }
}

fn parse_bind_addr(env: &dyn SettingsEnv) -> Result<SocketAddr, ConfigError> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse().map_err(|_| ConfigError::InvalidEnv {
        name: BIND_ADDR_ENV,
        value: raw,
        expected: "host:port",
    })
}

fn load_token_secret(
    env: &dyn SettingsEnv,
    mode: BuildMode,
) -> Result<Zeroizing<Vec<u8>>, ConfigError> {
    let path = PathBuf::from(
        env.string(TOKEN_SECRET_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_TOKEN_SECRET_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(bytes) if bytes.len() >= TOKEN_SECRET_MIN_LEN => {
            info!(
                path = %path.display(),
                fingerprint = %secret_fingerprint(&bytes),
                "token secret loaded"
            );
            Ok(Zeroizing::new(bytes))
        }
        Ok(bytes) => Err(ConfigError::SecretTooShort {
            path,
            length: bytes.len(),
            min_len: TOKEN_SECRET_MIN_LEN,
        }),
        Err(source) => {
            let allow_ephemeral =
                parse_bool(env, mode, TOKEN_ALLOW_EPHEMERAL_ENV, mode.is_debug())?;
            if allow_ephemeral && mode.is_debug() {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "using ephemeral token secret (dev only); sessions will not survive restarts"
                );
                let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
                rand::thread_rng().fill_bytes(&mut bytes);
                Ok(Zeroizing::new(bytes))
            } else {
                Err(ConfigError::SecretRead { path, source })
            }
        }
    }
}

/// Log-safe fingerprint of the secret: a truncated SHA-256 digest.
fn secret_fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(&digest[..8])
}

fn load_sms(env: &dyn SettingsEnv, mode: BuildMode) -> Result<SmsSettings, ConfigError> {
    let provider = env
        .string(SMS_PROVIDER_ENV)
        .unwrap_or_else(|| "console".to_owned());
    match provider.as_str() {
        "console" => {
            if !mode.is_debug() {
                warn!("console sms provider selected in a release build");
            }
            Ok(SmsSettings::Console)
        }
        "twilio" => Ok(SmsSettings::Twilio(TwilioSettings {
            account_sid: require(env, "TWILIO_ACCOUNT_SID")?,
            auth_token: require(env, "TWILIO_AUTH_TOKEN")?,
            from_number: require(env, "TWILIO_FROM_NUMBER")?,
        })),
        "aligo" => Ok(SmsSettings::Aligo(AligoSettings {
            api_key: require(env, "ALIGO_API_KEY")?,
            user_id: require(env, "ALIGO_USER_ID")?,
            sender: require(env, "ALIGO_SENDER")?,
        })),
        _ => Err(ConfigError::InvalidEnv {
            name: SMS_PROVIDER_ENV,
            value: provider,
            expected: SMS_EXPECTED,
        }),
    }
}

/// Load and validate settings from the process environment.
pub fn load(env: &dyn SettingsEnv, mode: BuildMode) -> Result<AppSettings, ConfigError> {
    let bind_addr = parse_bind_addr(env)?;
    let database_url = require(env, DATABASE_URL_ENV)?;
    let token_secret = load_token_secret(env, mode)?;
    let cookie_secure = parse_bool(env, mode, COOKIE_SECURE_ENV, !mode.is_debug())?;
    let run_migrations = parse_bool(env, mode, RUN_MIGRATIONS_ENV, true)?;
    let sms = load_sms(env, mode)?;
    Ok(AppSettings {
        bind_addr,
        database_url,
        token_secret,
        cookie_secure,
        run_migrations,
        sms,
    })
}
