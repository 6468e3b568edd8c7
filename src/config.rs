use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Default token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
/// Default CORS origin (the frontend dev server).
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173";
/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// The HMAC secret used to sign access tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    /// Whether the todo routes require a bearer token.
    pub require_auth: bool,
    /// The address the server binds to.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .context("JWT_SECRET must be set")?;

        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let token_ttl_minutes: i64 = match env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(raw) => raw
                .parse()
                .context("Invalid ACCESS_TOKEN_EXPIRE_MINUTES")?,
            Err(_) => DEFAULT_TOKEN_TTL_MINUTES,
        };

        if token_ttl_minutes <= 0 {
            anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
        );

        let require_auth = match env::var("REQUIRE_AUTH") {
            Ok(raw) => parse_flag(&raw)
                .with_context(|| format!("Invalid REQUIRE_AUTH: {}", raw))?,
            Err(_) => false,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            jwt_secret: Zeroizing::new(jwt_secret.into_bytes()),
            token_ttl_minutes,
            allowed_origins,
            require_auth,
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
        })
    }

    /// A configuration for tests and embedding: in-memory store, default TTL.
    pub fn with_secret(secret: &[u8]) -> Self {
        Self {
            database_url: None,
            jwt_secret: Zeroizing::new(secret.to_vec()),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            require_auth: false,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
