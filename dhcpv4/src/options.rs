//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//

use std::mem::size_of;
use std::net::Ipv4Addr;

use crate::*;
use crate::encode::*;

/// DHCP Option header length.
const DHCP_OPTION_HLEN: usize = 2;

/// Maximum value length of a single option entry on the wire.
const DHCP_OPTION_MAX_LEN: usize = 255;

/// DHCP option, a code and its raw value.
///
/// Typed constructors below build the raw value, and the `option_*` utilities
/// decode it back.  The value is never validated on construction through
/// `generic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpOption {
    /// Option code.
    pub code: u8,

    /// Raw option value.
    pub value: Vec<u8>,
}

impl DhcpOption {
    /// Option with an arbitrary code and value.
    pub fn generic<C: Into<u8>>(code: C, value: Vec<u8>) -> DhcpOption {
        DhcpOption { code: code.into(), value }
    }

    /// 1. Subnet Mask.
    pub fn subnet_mask(mask: Ipv4Addr) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::SubnetMask, mask.octets().to_vec())
    }

    /// 3. Router Option.
    pub fn router(addrs: &[Ipv4Addr]) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::Router, ipv4_vec_to_bytes(addrs))
    }

    /// 6. Domain Name Server Option.
    pub fn dns(addrs: &[Ipv4Addr]) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::DomainServer, ipv4_vec_to_bytes(addrs))
    }

    /// 12. Host Name Option.
    pub fn host_name(name: &str) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::HostName, name.as_bytes().to_vec())
    }

    /// 15. Domain Name.
    pub fn domain_name(name: &str) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::DomainName, name.as_bytes().to_vec())
    }

    /// 50. Requested IP Address.
    pub fn requested_ip_address(addr: Ipv4Addr) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::AddressRequest, addr.octets().to_vec())
    }

    /// 51. IP Address Lease Time, in seconds.
    pub fn ip_address_lease_time(secs: u32) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::AddressTime, secs.to_be_bytes().to_vec())
    }

    /// 53. DHCP Message Type.
    pub fn message_type(t: DhcpMessageType) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::DHCPMsgType, vec![t as u8])
    }

    /// 54. Server Identifier.
    pub fn server_identifier(addr: Ipv4Addr) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::DHCPServerId, addr.octets().to_vec())
    }

    /// 55. Parameter Request List.
    pub fn parameter_request_list(codes: &[u8]) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::ParameterList, codes.to_vec())
    }

    /// 60. Vendor class identifier.
    pub fn vendor_class_identifier(id: &str) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::VendorClassId, id.as_bytes().to_vec())
    }

    /// 67. Bootfile name.
    pub fn bootfile_name(name: &str) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::BootfileName, name.as_bytes().to_vec())
    }

    /// 77. User Class option.
    ///
    /// With `rfc3004` the data is wrapped as a single length prefixed
    /// user class instance, at most 255 bytes, otherwise it is carried as is.
    pub fn user_class(data: &[u8], rfc3004: bool) -> Result<DhcpOption, DhcpError> {
        let mut value = Vec::with_capacity(data.len() + 1);
        if rfc3004 {
            let len = u8::try_from(data.len())
                .map_err(|_| DhcpError::FieldTooLong("user class", data.len(), u8::MAX as usize))?;
            encode_u8(&mut value, len);
        }
        encode_data(&mut value, data);
        Ok(DhcpOption::generic(DhcpOptionCode::UserClass, value))
    }

    /// 93. Client System Architecture Type Option.
    pub fn client_arch(archs: &[u16]) -> DhcpOption {
        let mut value = Vec::with_capacity(archs.len() * size_of::<u16>());
        for arch in archs {
            encode_u16(&mut value, *arch);
        }
        DhcpOption::generic(DhcpOptionCode::ClientSystem, value)
    }

    /// 121. Classless Route Option.
    pub fn classless_static_routes(routes: &ClasslessRoutes) -> DhcpOption {
        DhcpOption::generic(DhcpOptionCode::ClasslessStaticRoute, routes.to_bytes())
    }
}

fn ipv4_vec_to_bytes(addrs: &[Ipv4Addr]) -> Vec<u8> {
    let mut value = Vec::with_capacity(addrs.len() * size_of::<Ipv4Addr>());
    for addr in addrs {
        encode_ipv4(&mut value, *addr);
    }
    value
}

// Utility to decode u8 value of a DHCP option.
pub fn option_u8(code: u8, value: &[u8]) -> Result<u8, DhcpError> {
    if value.len() != size_of::<u8>() {
        Err(DhcpError::InvalidOptionLength(code, value.len()))
    } else {
        decode_u8(value)
    }
}

// Utility to decode u32 value of a DHCP option.
pub fn option_u32(code: u8, value: &[u8]) -> Result<u32, DhcpError> {
    if value.len() != size_of::<u32>() {
        Err(DhcpError::InvalidOptionLength(code, value.len()))
    } else {
        decode_u32(value)
    }
}

// Utility to decode a list of u16 values of a DHCP option.
pub fn option_u16_vec(code: u8, value: &[u8]) -> Result<Vec<u16>, DhcpError> {
    let size = size_of::<u16>();

    if value.len() % size != 0 {
        Err(DhcpError::InvalidOptionLength(code, value.len()))
    } else {
        value.chunks(size).map(decode_u16).collect()
    }
}

// Utility to decode string value of a DHCP option.
pub fn option_string(code: u8, value: &[u8]) -> Result<String, DhcpError> {
    match std::str::from_utf8(value) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => Err(DhcpError::InvalidValue(format!("option {} is not a valid UTF-8 string", code))),
    }
}

// Utility to decode an IPv4 address of a DHCP option.
pub fn option_ipv4(code: u8, value: &[u8]) -> Result<Ipv4Addr, DhcpError> {
    if value.len() != size_of::<Ipv4Addr>() {
        Err(DhcpError::InvalidOptionLength(code, value.len()))
    } else {
        decode_ipv4(value)
    }
}

// Utility to decode a list of IPv4 address of a DHCP option.
pub fn option_ipv4_vec(code: u8, value: &[u8]) -> Result<Vec<Ipv4Addr>, DhcpError> {
    let size = size_of::<Ipv4Addr>();

    if value.is_empty() || (value.len() % size) != 0 {
        Err(DhcpError::InvalidOptionLength(code, value.len()))
    } else {
        value.chunks(size).map(decode_ipv4).collect()
    }
}

// Utility to decode DHCP Message Type option.
pub fn option_message_type(value: &[u8]) -> Result<DhcpMessageType, DhcpError> {
    option_u8(DhcpOptionCode::DHCPMsgType.into(), value)?.try_into()
}

// Utility to decode User Class option.
//
// A value that does not parse as a list of RFC3004 user class instances is
// returned as a single opaque instance.
pub fn option_user_class(value: &[u8]) -> Vec<Vec<u8>> {
    let mut classes = Vec::new();
    let mut b = value;

    while let Some((&len, rest)) = b.split_first() {
        let len = len as usize;
        if len == 0 || rest.len() < len {
            return vec![value.to_vec()];
        }
        classes.push(rest[..len].to_vec());
        b = &rest[len..];
    }

    if classes.is_empty() {
        vec![value.to_vec()]
    } else {
        classes
    }
}

/// Ordered collection of DHCP options, at most one entry per code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DhcpOptions {
    options: Vec<DhcpOption>,
}

impl DhcpOptions {
    pub fn new() -> DhcpOptions {
        DhcpOptions { options: Vec::new() }
    }

    /// Return raw value of the option, if present.
    pub fn get<C: Into<u8>>(&self, code: C) -> Option<&[u8]> {
        let code = code.into();
        self.options.iter()
            .find(|opt| opt.code == code)
            .map(|opt| opt.value.as_slice())
    }

    /// Return raw value of the option, empty if not present.
    pub fn get_one<C: Into<u8>>(&self, code: C) -> &[u8] {
        self.get(code).unwrap_or(&[])
    }

    pub fn has<C: Into<u8>>(&self, code: C) -> bool {
        self.get(code).is_some()
    }

    /// Replace the value of an existing entry in place, or append a new one.
    /// Pad and End are framing, not options, and are never stored.
    pub fn update(&mut self, option: DhcpOption) {
        if option.code == DhcpOptionCode::Pad as u8 || option.code == DhcpOptionCode::End as u8 {
            tracing::debug!(code = option.code, "ignoring framing code as option");
            return;
        }
        match self.options.iter_mut().find(|opt| opt.code == option.code) {
            Some(opt) => opt.value = option.value,
            None => self.options.push(option),
        }
    }

    pub fn del<C: Into<u8>>(&mut self, code: C) {
        let code = code.into();
        self.options.retain(|opt| opt.code != code);
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DhcpOption> {
        self.options.iter()
    }

    /// Encode options followed by End marker, return encoded length.
    pub fn serialize(&self, buf: &mut Vec<u8>) -> usize {
        let start = buf.len();

        for opt in &self.options {
            // Not stored by update, but the container is public.
            if opt.code == DhcpOptionCode::Pad as u8 || opt.code == DhcpOptionCode::End as u8 {
                continue;
            }

            if opt.value.is_empty() {
                encode_u8(buf, opt.code);
                encode_u8(buf, 0);
                continue;
            }

            // RFC3396: long values are split into consecutive entries.
            for chunk in opt.value.chunks(DHCP_OPTION_MAX_LEN) {
                encode_u8(buf, opt.code);
                encode_u8(buf, chunk.len() as u8);
                encode_data(buf, chunk);
            }
        }

        encode_u8(buf, DhcpOptionCode::End as u8);
        buf.len() - start
    }

    /// Parse options area.  `base` is the offset of `buf` in the whole
    /// message, used for error reporting.
    pub fn parse(buf: &[u8], base: usize) -> Result<DhcpOptions, DhcpError> {
        let mut options = DhcpOptions::new();
        let mut offset = 0;

        while offset < buf.len() {
            let code = buf[offset];

            if code == DhcpOptionCode::Pad as u8 {
                offset += 1;
                continue;
            }
            if code == DhcpOptionCode::End as u8 {
                break;
            }

            let remaining = buf.len() - offset - 1;
            if remaining == 0 {
                return Err(DhcpError::OptionTruncated { code, offset: base + offset, len: 1, remaining });
            }

            let len = buf[offset + 1] as usize;
            let remaining = remaining - 1;
            if len > remaining {
                return Err(DhcpError::OptionTruncated { code, offset: base + offset, len, remaining });
            }

            let value = &buf[offset + DHCP_OPTION_HLEN..offset + DHCP_OPTION_HLEN + len];

            // RFC3396: repeated codes are concatenated into the first entry.
            match options.options.iter_mut().find(|opt| opt.code == code) {
                Some(opt) => opt.value.extend_from_slice(value),
                None => options.options.push(DhcpOption { code, value: value.to_vec() }),
            }

            offset += DHCP_OPTION_HLEN + len;
        }

        Ok(options)
    }
}
