//! Configuration for Curricula
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use uuid::Uuid;

use crate::types::CatalogError;

/// Curricula - course catalog backend
#[derive(Parser, Debug, Clone)]
#[command(name = "curricula")]
#[command(about = "Prerequisite-aware course registration and learner progress tracking")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "curricula")]
    pub mongodb_db: String,

    /// Enable development mode (in-memory store fallback, generated JWT secret)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// JWT secret for token signing (required in production)
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT token expiry in seconds
    #[arg(long, env = "JWT_EXPIRY_SECONDS", default_value = "3600")]
    pub jwt_expiry_seconds: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration before startup
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.dev_mode && self.jwt_secret.is_none() {
            return Err(CatalogError::Config(
                "JWT_SECRET is required in production mode".into(),
            ));
        }

        if let Some(secret) = &self.jwt_secret {
            if secret.len() < 32 {
                return Err(CatalogError::Config(
                    "JWT_SECRET must be at least 32 characters".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args::parse_from(["curricula"])
    }

    #[test]
    fn production_requires_jwt_secret() {
        let args = base_args();
        assert!(args.validate().is_err());
    }

    #[test]
    fn dev_mode_allows_missing_secret() {
        let mut args = base_args();
        args.dev_mode = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut args = base_args();
        args.jwt_secret = Some("short".into());
        assert!(args.validate().is_err());

        args.jwt_secret = Some("a-secret-that-is-at-least-32-characters".into());
        assert!(args.validate().is_ok());
    }
}
