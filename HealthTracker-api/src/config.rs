//! Runtime configuration for the API server, read from the environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use tracing::warn;

use health_tracker_data::database::{parse_or, DatabaseConfig};

/// File name used inside `DATA_DIR` when `DB_SQLITE_PATH` is not set
pub const DEFAULT_DB_FILE: &str = "health_records.db";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind (`HOST`, default `0.0.0.0`)
    pub host: IpAddr,
    /// Port to bind (`PORT`, default `8000`)
    pub port: u16,
    /// Directory for the default database file (`DATA_DIR`, default `data`)
    pub data_dir: PathBuf,
    /// Storage settings
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("HOST") {
            Some(raw) => raw.trim().parse::<IpAddr>().unwrap_or_else(|_| {
                warn!("Invalid value for HOST: {:?}, using 0.0.0.0", raw);
                IpAddr::V4(Ipv4Addr::UNSPECIFIED)
            }),
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = parse_or(&lookup, "PORT", 8000u16);
        let data_dir = PathBuf::from(lookup("DATA_DIR").unwrap_or_else(|| "data".to_string()));

        let default_db = data_dir.join(DEFAULT_DB_FILE).to_string_lossy().into_owned();
        let database = DatabaseConfig::from_lookup(|key| match key {
            "DB_SQLITE_PATH" => lookup(key).or_else(|| Some(default_db.clone())),
            _ => lookup(key),
        });

        Self {
            host,
            port,
            data_dir,
            database,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
