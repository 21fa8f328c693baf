use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("CIVIC_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("CIVIC_JWT_SECRET is unset or still a placeholder");
        }

        let db_path: PathBuf = lookup("CIVIC_DB_PATH").unwrap_or_else(|| "civic.db".into()).into();
        let host = lookup("CIVIC_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("CIVIC_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("CIVIC_PORT must be a port number")?;

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            jwt_secret,
            db_path,
            addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = config(&[("CIVIC_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("civic.db"));
        assert_eq!(cfg.addr, "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn placeholder_secret_is_rejected() {
        assert!(config(&[]).is_err());
        assert!(config(&[("CIVIC_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(config(&[("CIVIC_JWT_SECRET", "s3cret"), ("CIVIC_PORT", "http")]).is_err());
    }
}
