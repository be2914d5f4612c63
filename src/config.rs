use anyhow::Context;
use once_cell::sync::OnceCell;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use crate::helper_model::RentalError;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";
const DEFAULT_UPLOAD_ROOT: &str = "public";

static SERVER_CONFIG: OnceCell<ServerConfig> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_root: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<ServerConfig> {
        dotenv::dotenv().ok();
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| String::from(DEFAULT_BIND_ADDR))
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 127.0.0.1:3030")?;
        let upload_root = PathBuf::from(
            env::var("UPLOAD_ROOT").unwrap_or_else(|_| String::from(DEFAULT_UPLOAD_ROOT)),
        );
        Ok(ServerConfig { database_url, bind_addr, upload_root })
    }

    /// Makes this configuration visible to request handlers. Only the first call wins.
    pub fn install(self) -> &'static ServerConfig {
        SERVER_CONFIG.get_or_init(|| self)
    }
}

pub fn upload_root() -> PathBuf {
    match SERVER_CONFIG.get() {
        Some(config) => config.upload_root.clone(),
        None => PathBuf::from(DEFAULT_UPLOAD_ROOT),
    }
}

/// Installed database URL, or `DATABASE_URL` when nothing was installed yet.
pub fn database_url() -> String {
    match SERVER_CONFIG.get() {
        Some(config) => config.database_url.clone(),
        None => {
            dotenv::dotenv().ok();
            env::var("DATABASE_URL").unwrap_or_default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    Test,
    Prod,
}

impl GatewayMode {
    fn env_prefix(&self) -> &'static str {
        match self {
            GatewayMode::Test => "PAYMENT_GATEWAY_TEST",
            GatewayMode::Prod => "PAYMENT_GATEWAY_PROD",
        }
    }
}

/// Payment gateway credentials. Always read at request time so a credential
/// rotation only needs an environment change.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub mode: GatewayMode,
    pub merchant_id: String,
    pub secret: String,
    pub base_url: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<GatewayConfig, RentalError> {
        let mode = match env::var("PAYMENT_GATEWAY_MODE").as_deref() {
            Ok("prod") => GatewayMode::Prod,
            _ => GatewayMode::Test,
        };
        let prefix = mode.env_prefix();
        let read = |name: &str| {
            env::var(format!("{}_{}", prefix, name)).map_err(|_| {
                RentalError::GatewayError(format!("{}_{} is not set", prefix, name))
            })
        };
        Ok(GatewayConfig {
            mode,
            merchant_id: read("MERCHANT_ID")?,
            secret: read("SECRET")?,
            base_url: read("BASE_URL")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_modes_read_separate_credentials() {
        assert_eq!(GatewayMode::Test.env_prefix(), "PAYMENT_GATEWAY_TEST");
        assert_eq!(GatewayMode::Prod.env_prefix(), "PAYMENT_GATEWAY_PROD");
    }

    #[test]
    fn upload_root_defaults_to_public() {
        if SERVER_CONFIG.get().is_none() {
            assert_eq!(upload_root(), PathBuf::from(DEFAULT_UPLOAD_ROOT));
        }
    }
}
