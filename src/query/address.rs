use std::{
    fmt, io,
    net::{IpAddr, SocketAddr},
};

use tokio::net::lookup_host;

#[derive(thiserror::Error, Debug)]
pub enum AddressError {
    #[error("empty input")]
    Empty,
    #[error("missing closing ']' for IPv6 literal")]
    MissingClosingBracket,
    #[error("unexpected characters after IPv6 literal")]
    TrailingCharacters,
    #[error("invalid port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
    #[error("failed to resolve hostname: {0}")]
    ResolveError(#[source] io::Error),
    #[error("hostname resolved to no addresses")]
    NoAddresses,
}

/// A `host` or `host:port` target as typed by a user.
///
/// The host is kept verbatim: the handshake must carry the name the user
/// asked for, not the resolved IP, since proxies route on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses a target that MAY omit the port, using `default_port` if it does.
    ///
    /// Rules:
    /// - Bracketed IPv6 may include a port: `[::1]:25566` or just `[::1]`.
    /// - Exactly one `:` means `host:port`.
    /// - More than one `:` without brackets is an IPv6 literal with no port.
    pub fn parse_with_default(s: &str, default_port: u16) -> Result<Self, AddressError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AddressError::Empty);
        }

        if let Some(inner) = s.strip_prefix('[') {
            let close = inner
                .find(']')
                .ok_or(AddressError::MissingClosingBracket)?;
            let host = &inner[..close];
            let rest = &inner[close + 1..];
            let port = if rest.is_empty() {
                default_port
            } else {
                let port_str = rest
                    .strip_prefix(':')
                    .ok_or(AddressError::TrailingCharacters)?;
                port_str.parse::<u16>()?
            };
            return Self::with_host(host, port);
        }

        match s.matches(':').count() {
            0 => Self::with_host(s, default_port),
            1 => {
                let (host, port_str) = s.split_once(':').ok_or(AddressError::Empty)?;
                let port = port_str.parse::<u16>()?;
                Self::with_host(host, port)
            }
            _ => Self::with_host(s, default_port),
        }
    }

    fn with_host(host: &str, port: u16) -> Result<Self, AddressError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolves to a single socket address.
    ///
    /// IP literals skip DNS. For hostnames the first returned address is
    /// used; later ones are never tried.
    pub async fn resolve(&self) -> Result<SocketAddr, AddressError> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(AddressError::ResolveError)?;
        addrs.next().ok_or(AddressError::NoAddresses)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: u16 = net::DEFAULT_PORT;

    #[test]
    fn parse_host_without_port() {
        let a = ServerAddress::parse_with_default("example.com", DEFAULT).unwrap();
        assert_eq!(a.host(), "example.com");
        assert_eq!(a.port(), 25565);
    }

    #[test]
    fn parse_host_with_port() {
        let a = ServerAddress::parse_with_default("example.com:25566", DEFAULT).unwrap();
        assert_eq!(a.host(), "example.com");
        assert_eq!(a.port(), 25566);
    }

    #[test]
    fn parse_ipv4_with_port() {
        let a = ServerAddress::parse_with_default("1.2.3.4:8080", DEFAULT).unwrap();
        assert_eq!(a.host(), "1.2.3.4");
        assert_eq!(a.port(), 8080);
    }

    #[test]
    fn parse_ipv6_forms() {
        let a = ServerAddress::parse_with_default("[::1]:25570", DEFAULT).unwrap();
        assert_eq!(a.host(), "::1");
        assert_eq!(a.port(), 25570);

        let b = ServerAddress::parse_with_default("[2001:db8::1]", DEFAULT).unwrap();
        assert_eq!(b.host(), "2001:db8::1");
        assert_eq!(b.port(), DEFAULT);

        let c = ServerAddress::parse_with_default("2001:db8::1", DEFAULT).unwrap();
        assert_eq!(c.host(), "2001:db8::1");
        assert_eq!(c.port(), DEFAULT);
    }

    #[test]
    fn reject_bad_input() {
        assert!(matches!(
            ServerAddress::parse_with_default("   ", DEFAULT),
            Err(AddressError::Empty)
        ));
        assert!(matches!(
            ServerAddress::parse_with_default("example.com:http", DEFAULT),
            Err(AddressError::InvalidPort(_))
        ));
        assert!(matches!(
            ServerAddress::parse_with_default("example.com:70000", DEFAULT),
            Err(AddressError::InvalidPort(_))
        ));
        assert!(matches!(
            ServerAddress::parse_with_default(":25565", DEFAULT),
            Err(AddressError::Empty)
        ));
        assert!(matches!(
            ServerAddress::parse_with_default("[::1", DEFAULT),
            Err(AddressError::MissingClosingBracket)
        ));
        assert!(matches!(
            ServerAddress::parse_with_default("[::1]x", DEFAULT),
            Err(AddressError::TrailingCharacters)
        ));
    }

    #[test]
    fn display_formats() {
        assert_eq!(ServerAddress::new("example.com", 123).to_string(), "example.com:123");
        assert_eq!(ServerAddress::new("::1", 80).to_string(), "[::1]:80");
    }

    #[tokio::test]
    async fn resolve_ip_literal_skips_dns() {
        let a = ServerAddress::parse_with_default("127.0.0.1:25566", DEFAULT).unwrap();
        let addr = a.resolve().await.unwrap();
        assert_eq!(addr, "127.0.0.1:25566".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn resolve_localhost() {
        let a = ServerAddress::parse_with_default("localhost", DEFAULT).unwrap();
        let addr = a.resolve().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), DEFAULT);
    }
}
