//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//
// Classless Static Route Option (121), RFC3442.
//
//   +---------+----------------------+------------------+
//   | pfx len | significant octets   | router (4 bytes) |
//   +---------+----------------------+------------------+
//
// Only ceil(pfx len / 8) destination octets are on the wire.
//

use std::fmt;
use std::net::Ipv4Addr;
use std::mem::size_of;

use ipnet::Ipv4Net;

use crate::*;
use crate::encode::*;

/// Maximum IPv4 prefix length.
const IPV4_PREFIX_MAX: u8 = 32;

/// A single classless static route.
///
/// An all-zero destination is held as None whatever its prefix length, so
/// the prefix length is kept alongside to encode it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasslessRoute {
    /// Destination network, None for an all-zero destination.
    pub destination: Option<Ipv4Net>,

    /// Next hop, None when the destination is directly connected.
    pub router: Option<Ipv4Addr>,

    prefix_len: u8,
}

impl ClasslessRoute {
    /// Route to `destination`, host bits cleared.  `0.0.0.0/n` is stored
    /// as an absent destination with prefix length n.
    pub fn new(destination: Option<Ipv4Net>, router: Option<Ipv4Addr>) -> ClasslessRoute {
        let destination = destination.map(|net| net.trunc());
        let prefix_len = destination.map_or(0, |net| net.prefix_len());
        let destination = destination.filter(|net| !net.addr().is_unspecified());
        ClasslessRoute { destination, router, prefix_len }
    }

    /// Default route through `router`.
    pub fn default_route(router: Ipv4Addr) -> ClasslessRoute {
        ClasslessRoute::new(None, Some(router))
    }

    pub fn prefix_len(&self) -> u8 {
        match self.destination {
            Some(net) => net.prefix_len(),
            None => self.prefix_len,
        }
    }

    /// True for 0.0.0.0/0.
    pub fn is_default(&self) -> bool {
        self.destination.is_none() && self.prefix_len == 0
    }

    fn encode(&self, buf: &mut Vec<u8>) -> usize {
        let prefix_len = self.prefix_len();
        let octets = self.destination.map_or([0; 4], |net| net.addr().octets());

        let mut len = encode_u8(buf, prefix_len);
        len += encode_data(buf, &octets[..significant_octets(prefix_len)]);
        len += encode_ipv4(buf, self.router.unwrap_or(Ipv4Addr::UNSPECIFIED));
        len
    }
}

impl fmt::Display for ClasslessRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.destination {
            Some(net) => write!(f, "{}", net)?,
            None if self.prefix_len == 0 => write!(f, "default")?,
            None => write!(f, "{}/{}", Ipv4Addr::UNSPECIFIED, self.prefix_len)?,
        }
        match self.router {
            Some(router) => write!(f, " via {}", router),
            None => write!(f, " direct"),
        }
    }
}

/// Number of destination octets on the wire for a prefix length.
fn significant_octets(prefix_len: u8) -> usize {
    (prefix_len as usize + 7) / 8
}

/// Ordered list of classless static routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasslessRoutes(pub Vec<ClasslessRoute>);

impl ClasslessRoutes {
    /// Decode option value.  The value must hold at least one route and no
    /// partial trailing route.
    pub fn from_bytes(data: &[u8]) -> Result<ClasslessRoutes, DhcpError> {
        let code = DhcpOptionCode::ClasslessStaticRoute as u8;
        if data.is_empty() {
            return Err(DhcpError::InvalidOptionLength(code, 0));
        }

        let mut routes = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let prefix_len = data[offset];
            if prefix_len > IPV4_PREFIX_MAX {
                return Err(DhcpError::InvalidValue(format!("classless route prefix length {}", prefix_len)));
            }

            let sig = significant_octets(prefix_len);
            let needed = 1 + sig + size_of::<Ipv4Addr>();
            let remaining = data.len() - offset;
            if needed > remaining {
                return Err(DhcpError::OptionTruncated { code, offset, len: needed, remaining });
            }

            let b = &data[offset + 1..offset + needed];
            let mut octets = [0u8; 4];
            octets[..sig].copy_from_slice(&b[..sig]);

            let destination = Ipv4Net::new(Ipv4Addr::from(octets), prefix_len)
                .map_err(|e| DhcpError::InvalidValue(e.to_string()))?;

            let router = decode_ipv4(&b[sig..])?;
            let router = if router.is_unspecified() { None } else { Some(router) };

            routes.push(ClasslessRoute::new(Some(destination), router));
            offset += needed;
        }

        Ok(ClasslessRoutes(routes))
    }

    /// Encode routes into option value.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for route in &self.0 {
            route.encode(&mut buf);
        }
        buf
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClasslessRoute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClasslessRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, route) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", route)?;
        }
        write!(f, "]")
    }
}
