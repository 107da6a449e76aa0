//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//

pub mod encode;
pub mod header;
pub mod options;
pub mod classless;
pub mod message;
pub mod modifiers;
pub mod builder;
pub mod config;

use std::fmt;

use thiserror::Error;

pub use classless::{ClasslessRoute, ClasslessRoutes};
pub use message::{DhcpMessage, TransactionId};
pub use modifiers::Modifier;
pub use options::{DhcpOption, DhcpOptions};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DhcpError {
    #[error("Insufficient buffer size {0}, message header needs 240 bytes")]
    TooShort(usize),
    #[error("Invalid magic cookie {0:02x?}")]
    InvalidMagicCookie([u8; 4]),
    #[error("Option {code} at offset {offset} truncated, length {len} > remaining {remaining}")]
    OptionTruncated {
        code: u8,
        offset: usize,
        len: usize,
        remaining: usize,
    },
    #[error("Field {0} too long, {1} > {2}")]
    FieldTooLong(&'static str, usize, usize),
    #[error("Missing Server Identifier")]
    MissingServerIdentifier,
    #[error("Modifier failed: {0}")]
    ModifierFailed(String),
    #[error("Invalid BOOTP Message Type {0}")]
    InvalidBootpMessageType(u8),
    #[error("Invalid DHCP Message Type {0}")]
    InvalidDhcpMessageType(u8),
    #[error("Invalid Option Length {1} for option {0}")]
    InvalidOptionLength(u8, usize),
    #[error("Invalid Value {0}")]
    InvalidValue(String),
    #[error("Config error {0}")]
    ConfigError(String),
}

/// Hardware type for Ethernet (ARP hardware type 1).
pub const HTYPE_ETHERNET: u8 = 1;

/// Canonical hardware address length for a hardware type, if it has one.
pub fn htype_addr_len(htype: u8) -> Option<usize> {
    match htype {
        HTYPE_ETHERNET => Some(6),
        _ => None,
    }
}

/// BOOTP Mesage type.
#[derive(PartialEq, Eq, Copy, Clone)]
pub enum BootpMessageType {
    BOOTREQUEST = 1,
    BOOTREPLY = 2,
}

impl fmt::Debug for BootpMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            BootpMessageType::BOOTREQUEST => write!(f, "BOOTREQUEST"),
            BootpMessageType::BOOTREPLY => write!(f, "BOOTREPLY"),
        }
    }
}

impl TryFrom<u8> for BootpMessageType {
    type Error = DhcpError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(BootpMessageType::BOOTREQUEST),
            2 => Ok(BootpMessageType::BOOTREPLY),
            _ => Err(DhcpError::InvalidBootpMessageType(v)),
        }
    }
}

/// DHCP Message Type.
#[derive(PartialEq, Eq, Copy, Clone)]
pub enum DhcpMessageType {
    DHCPDISCOVER = 1,
    DHCPOFFER = 2,
    DHCPREQUEST = 3,
    DHCPDECLINE = 4,
    DHCPACK = 5,
    DHCPNAK = 6,
    DHCPRELEASE = 7,
    DHCPINFORM = 8,
    DHCPFORCERENEW = 9,
    DHCPLEASEQUERY = 10,
    DHCPLEASEUNASSIGNED = 11,
    DHCPLEASEUNKNOWN = 12,
    DHCPLEASEACTIVE = 13,
    DHCPBULKLEASEQUERY = 14,
    DHCPLEASEQUERYDONE = 15,
    DHCPACTIVELEASEQUERY = 16,
    DHCPLEASEQUERYSTATUS = 17,
    DHCPTLS = 18,
}

impl fmt::Debug for DhcpMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match &self {
            DhcpMessageType::DHCPDISCOVER => "DHCPDISCOVER",
            DhcpMessageType::DHCPOFFER => "DHCPOFFER",
            DhcpMessageType::DHCPREQUEST => "DHCPREQUEST",
            DhcpMessageType::DHCPDECLINE => "DHCPDECLINE",
            DhcpMessageType::DHCPACK => "DHCPACK",
            DhcpMessageType::DHCPNAK => "DHCPNAK",
            DhcpMessageType::DHCPRELEASE => "DHCPRELEASE",
            DhcpMessageType::DHCPINFORM => "DHCPINFORM",
            DhcpMessageType::DHCPFORCERENEW => "DHCPFORCERENEW",
            DhcpMessageType::DHCPLEASEQUERY => "DHCPLEASEQUERY",
            DhcpMessageType::DHCPLEASEUNASSIGNED => "DHCPLEASEUNASSIGNED",
            DhcpMessageType::DHCPLEASEUNKNOWN => "DHCPLEASEUNKNOWN",
            DhcpMessageType::DHCPLEASEACTIVE => "DHCPLEASEACTIVE",
            DhcpMessageType::DHCPBULKLEASEQUERY => "DHCPBULKLEASEQUERY",
            DhcpMessageType::DHCPLEASEQUERYDONE => "DHCPLEASEQUERYDONE",
            DhcpMessageType::DHCPACTIVELEASEQUERY => "DHCPACTIVELEASEQUERY",
            DhcpMessageType::DHCPLEASEQUERYSTATUS => "DHCPLEASEQUERYSTATUS",
            DhcpMessageType::DHCPTLS => "DHCPTLS",
        };
        write!(f, "{}", s)
    }
}

impl TryFrom<u8> for DhcpMessageType {
    type Error = DhcpError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(DhcpMessageType::DHCPDISCOVER),
            2 => Ok(DhcpMessageType::DHCPOFFER),
            3 => Ok(DhcpMessageType::DHCPREQUEST),
            4 => Ok(DhcpMessageType::DHCPDECLINE),
            5 => Ok(DhcpMessageType::DHCPACK),
            6 => Ok(DhcpMessageType::DHCPNAK),
            7 => Ok(DhcpMessageType::DHCPRELEASE),
            8 => Ok(DhcpMessageType::DHCPINFORM),
            9 => Ok(DhcpMessageType::DHCPFORCERENEW),
            10 => Ok(DhcpMessageType::DHCPLEASEQUERY),
            11 => Ok(DhcpMessageType::DHCPLEASEUNASSIGNED),
            12 => Ok(DhcpMessageType::DHCPLEASEUNKNOWN),
            13 => Ok(DhcpMessageType::DHCPLEASEACTIVE),
            14 => Ok(DhcpMessageType::DHCPBULKLEASEQUERY),
            15 => Ok(DhcpMessageType::DHCPLEASEQUERYDONE),
            16 => Ok(DhcpMessageType::DHCPACTIVELEASEQUERY),
            17 => Ok(DhcpMessageType::DHCPLEASEQUERYSTATUS),
            18 => Ok(DhcpMessageType::DHCPTLS),
            _ => Err(DhcpError::InvalidDhcpMessageType(v)),
        }
    }
}

/// DHCP Option Code.
///   https://www.iana.org/assignments/bootp-dhcp-parameters/bootp-dhcp-parameters.xhtml
///
/// Only the codes this crate interprets are named; the options container
/// itself is keyed by the raw byte and accepts any code.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum DhcpOptionCode {
    Pad = 0,					// RFC2132
    SubnetMask = 1,				// RFC2132
    TimeOffset = 2,				// RFC2132
    Router = 3,					// RFC2132
    TimeServer = 4,				// RFC2132
    NameServer = 5,				// RFC2132
    DomainServer = 6,				// RFC2132
    LogServer = 7,				// RFC2132
    HostName = 12,				// RFC2132
    BootFileSize = 13,				// RFC2132
    DomainName = 15,				// RFC2132
    RootPath = 17,				// RFC2132
    BroadcastAddress = 28,			// RFC2132
    StaticRoute = 33,				// RFC2132
    NTPServers = 42,				// RFC2132
    VendorSpecific = 43,			// RFC2132
    AddressRequest = 50,			// RFC2132
    AddressTime = 51,				// RFC2132
    Overload = 52,				// RFC2132
    DHCPMsgType = 53,				// RFC2132
    DHCPServerId = 54,				// RFC2132
    ParameterList = 55,				// RFC2132
    Message = 56,				// RFC2132
    MaxMessageSize = 57,			// RFC2132
    RenewalTime = 58,				// RFC2132
    RebindingTime = 59,				// RFC2132
    VendorClassId = 60,				// RFC2132
    ClientId = 61,				// RFC2132, RFC4361
    TFTPServerName = 66,			// RFC2132
    BootfileName = 67,				// RFC2132
    UserClass = 77,				// RFC3004
    RelayAgentInformation = 82,			// RFC3046
    ClientSystem = 93,				// RFC4578
    ClientNDI = 94,				// RFC4578
    UuidGuid = 97,				// RFC4578
    DomainSearch = 119,				// RFC3397
    ClasslessStaticRoute = 121,			// RFC3442
    End = 255,					// RFC2132
}

impl From<DhcpOptionCode> for u8 {
    fn from(code: DhcpOptionCode) -> u8 {
        code as u8
    }
}
