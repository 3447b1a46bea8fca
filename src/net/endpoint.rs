//! Endpoint addressing and ownership.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::net::{ChannelError, ControlChannel};

/// A parsed `tcp://host:port` control endpoint address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAddress {
    url: Url,
    host: String,
    port: u16,
}

impl EndpointAddress {
    /// Host and port in `host:port` form, suitable for a socket connect.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for EndpointAddress {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ChannelError::InvalidAddress {
            address: s.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(s).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "tcp" {
            return Err(invalid("only tcp:// endpoints are supported"));
        }
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?
            .to_string();
        let port = url.port().ok_or_else(|| invalid("missing port"))?;

        Ok(Self { url, host, port })
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// A named control channel to one target process.
#[derive(Debug)]
pub struct ControlEndpoint<C> {
    name: String,
    channel: C,
}

impl<C: ControlChannel> ControlEndpoint<C> {
    pub fn new(name: impl Into<String>, channel: C) -> Self {
        Self {
            name: name.into(),
            channel,
        }
    }

    /// Target name, e.g. `receiver` or `processor`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tcp_endpoint() {
        let addr: EndpointAddress = "tcp://127.0.0.1:5000".parse().unwrap();
        assert_eq!(addr.authority(), "127.0.0.1:5000");
        assert_eq!(addr.port(), 5000);
        assert_eq!(addr.to_string(), "tcp://127.0.0.1:5000");
    }

    #[test]
    fn test_parse_hostname() {
        let addr: EndpointAddress = "tcp://localhost:5004".parse().unwrap();
        assert_eq!(addr.authority(), "localhost:5004");
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        for bad in ["127.0.0.1:5000", "ipc:///tmp/ctrl", "tcp://127.0.0.1", "http://host:80"] {
            let err = bad.parse::<EndpointAddress>().unwrap_err();
            assert!(matches!(err, ChannelError::InvalidAddress { .. }), "{}", bad);
        }
    }
}
