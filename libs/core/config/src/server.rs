use crate::{env_parse, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8080;

/// Listen address of the HTTP server, read from `HOST` and `PORT`.
///
/// `HOST` must be an IP literal; it is validated at startup rather than when
/// the listener binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: env_parse("PORT", DEFAULT_PORT)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}
