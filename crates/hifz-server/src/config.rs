use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl: chrono::Duration,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = get("HIFZ_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("HIFZ_JWT_SECRET is unset or still a placeholder");
        }

        let db_path = get("HIFZ_DB_PATH").unwrap_or_else(|| "hifz.db".into()).into();
        let host = get("HIFZ_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("HIFZ_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("HIFZ_PORT must be a port number")?;
        let ttl_hours: i64 = get("HIFZ_TOKEN_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .context("HIFZ_TOKEN_TTL_HOURS must be a whole number of hours")?;
        if ttl_hours <= 0 {
            bail!("HIFZ_TOKEN_TTL_HOURS must be positive");
        }
        let token_ttl = chrono::Duration::try_hours(ttl_hours)
            .context("HIFZ_TOKEN_TTL_HOURS is out of range")?;
        let cors_origin =
            get("HIFZ_CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".into());

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            token_ttl,
            cors_origin,
        })
    }
}
