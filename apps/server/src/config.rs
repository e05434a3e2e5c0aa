use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;

use crate::auth::decode_secret_key;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub timezone: Tz,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("LL_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid LL_LISTEN_ADDR")?;
        let db_path = std::env::var("LL_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("LL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("LL_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let raw_secret = std::env::var("LL_JWT_SECRET").context("LL_JWT_SECRET is required")?;
        let jwt_secret = decode_secret_key(&raw_secret)?;
        let timezone = match std::env::var("LL_TIMEZONE") {
            Ok(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("Invalid LL_TIMEZONE '{}': {}", name, e))?,
            Err(_) => chrono_tz::UTC,
        };
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            timezone,
        })
    }
}
