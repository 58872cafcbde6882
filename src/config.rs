use std::{env, path::PathBuf, str::FromStr};

use anyhow::Context;
use rust_decimal::Decimal;

use crate::pricing::DEFAULT_TAX_RATE;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub tax_rate: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let host = lookup("APP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));
        let tax_rate = match lookup("TAX_RATE") {
            Some(raw) => parse_tax_rate(&raw)?,
            None => DEFAULT_TAX_RATE,
        };
        Ok(Self {
            database_url,
            host,
            port,
            static_dir,
            tax_rate,
        })
    }
}

fn parse_tax_rate(raw: &str) -> anyhow::Result<Decimal> {
    let rate = Decimal::from_str(raw.trim())
        .with_context(|| format!("TAX_RATE must be a decimal, got {raw:?}"))?;
    if rate.is_sign_negative() || rate >= Decimal::ONE {
        anyhow::bail!("TAX_RATE must be in [0, 1), got {rate}");
    }
    Ok(rate)
}
