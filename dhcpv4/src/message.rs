//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//

use std::fmt;
use std::net::Ipv4Addr;

use crate::*;
use crate::header::*;
use crate::options::*;

/// BOOTP broadcast flag, the only defined bit of flags.
pub const FLAG_BROADCAST: u16 = 0x8000;

/// Transaction ID, opaque 4 bytes correlating a request and its replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TransactionId(pub [u8; 4]);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/// DHCP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpMessage {
    /// Message type.
    pub op: BootpMessageType,

    /// Hardware type.
    pub htype: u8,

    /// Hops.
    pub hops: u8,

    /// Transaction ID.
    pub xid: TransactionId,

    /// Seconds elapsed.
    pub secs: u16,

    /// BOOTP flags.
    pub flags: u16,

    /// Client IP address.
    pub ciaddr: Ipv4Addr,

    /// Your (client) IP address.
    pub yiaddr: Ipv4Addr,

    /// Next Server IP address.
    pub siaddr: Ipv4Addr,

    /// Relay agent IP address.
    pub giaddr: Ipv4Addr,

    /// Client Hardware address, up to 16 bytes.
    pub chaddr: Vec<u8>,

    /// Server host name.
    pub sname: String,

    /// Boot file name.
    pub file: String,

    /// Options.
    pub options: DhcpOptions,
}

fn chaddr_str(chaddr: &[u8]) -> String {
    chaddr.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}

impl fmt::Display for DhcpMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DHCPv4 Message")?;
        writeln!(f, "  opcode: {:?}", self.op)?;
        writeln!(f, "  hwtype: {}", self.htype)?;
        writeln!(f, "  hopcount: {}", self.hops)?;
        writeln!(f, "  transaction ID: {}", self.xid)?;
        writeln!(f, "  num seconds: {}", self.secs)?;
        writeln!(f, "  flags: {} ({:#04x})", self.flags_to_string(), self.flags)?;
        writeln!(f, "  client IP: {}", self.ciaddr)?;
        writeln!(f, "  your IP: {}", self.yiaddr)?;
        writeln!(f, "  server IP: {}", self.siaddr)?;
        writeln!(f, "  gateway IP: {}", self.giaddr)?;
        writeln!(f, "  client MAC: {}", chaddr_str(&self.chaddr))?;
        writeln!(f, "  server hostname: {}", self.sname)?;
        writeln!(f, "  bootfile name: {}", self.file)?;
        writeln!(f, "  options:")?;
        for opt in self.options.iter() {
            if opt.code == DhcpOptionCode::DHCPMsgType as u8 {
                if let Some(t) = self.message_type() {
                    writeln!(f, "    DHCP Message Type: {:?}", t)?;
                    continue;
                }
            }
            writeln!(f, "    {}: {:02x?}", opt.code, opt.value)?;
        }
        Ok(())
    }
}

/// DhcpMessage implementation.
impl DhcpMessage {
    /// Parse DHCP message.
    pub fn decode(buf: &[u8]) -> Result<DhcpMessage, DhcpError> {
        let mut msg = decode_header(buf)?;
        msg.options = DhcpOptions::parse(&buf[DHCP_HEADER_LEN..], DHCP_HEADER_LEN)?;

        tracing::trace!(op = ?msg.op, xid = %msg.xid, options = msg.options.len(), "decoded DHCP message");
        Ok(msg)
    }

    /// Generate DHCP datagram from a message.
    pub fn encode(&self) -> Result<Vec<u8>, DhcpError> {
        let mut buf = Vec::with_capacity(DHCP_HEADER_LEN + 64);

        encode_header(self, &mut buf)?;
        self.options.serialize(&mut buf);

        Ok(buf)
    }

    pub fn is_broadcast(&self) -> bool {
        self.flags & FLAG_BROADCAST != 0
    }

    pub fn is_unicast(&self) -> bool {
        !self.is_broadcast()
    }

    pub fn set_broadcast(&mut self) {
        self.flags |= FLAG_BROADCAST;
    }

    pub fn set_unicast(&mut self) {
        self.flags &= !FLAG_BROADCAST;
    }

    pub fn flags_to_string(&self) -> String {
        let mut s = String::from(if self.is_broadcast() { "Broadcast" } else { "Unicast" });
        if self.flags & !FLAG_BROADCAST != 0 {
            s.push_str(" (reserved bits not zeroed)");
        }
        s
    }

    /// Return DHCP message type, None if absent or malformed.
    pub fn message_type(&self) -> Option<DhcpMessageType> {
        option_message_type(self.options.get(DhcpOptionCode::DHCPMsgType)?).ok()
    }

    /// Return true if the Parameter Request List contains the code.
    pub fn is_option_requested<C: Into<u8>>(&self, code: C) -> bool {
        let code = code.into();
        match self.options.get(DhcpOptionCode::ParameterList) {
            Some(list) => list.contains(&code),
            None => false,
        }
    }

    pub fn update_option(&mut self, option: DhcpOption) {
        self.options.update(option);
    }

    pub fn get_option<C: Into<u8>>(&self, code: C) -> Option<&[u8]> {
        self.options.get(code)
    }

    pub fn get_one_option<C: Into<u8>>(&self, code: C) -> &[u8] {
        self.options.get_one(code)
    }

    pub fn has_option<C: Into<u8>>(&self, code: C) -> bool {
        self.options.has(code)
    }

    // Decode option with given value codec, None if absent or malformed.
    fn typed_option<T, F>(&self, code: DhcpOptionCode, f: F) -> Option<T>
    where
        F: FnOnce(u8, &[u8]) -> Result<T, DhcpError>,
    {
        let value = self.options.get(code)?;
        f(code as u8, value).ok()
    }

    pub fn subnet_mask(&self) -> Option<Ipv4Addr> {
        self.typed_option(DhcpOptionCode::SubnetMask, option_ipv4)
    }

    pub fn router(&self) -> Option<Vec<Ipv4Addr>> {
        self.typed_option(DhcpOptionCode::Router, option_ipv4_vec)
    }

    pub fn dns(&self) -> Option<Vec<Ipv4Addr>> {
        self.typed_option(DhcpOptionCode::DomainServer, option_ipv4_vec)
    }

    pub fn host_name(&self) -> Option<String> {
        self.typed_option(DhcpOptionCode::HostName, option_string)
    }

    pub fn domain_name(&self) -> Option<String> {
        self.typed_option(DhcpOptionCode::DomainName, option_string)
    }

    pub fn requested_ip_address(&self) -> Option<Ipv4Addr> {
        self.typed_option(DhcpOptionCode::AddressRequest, option_ipv4)
    }

    pub fn ip_address_lease_time(&self) -> Option<u32> {
        self.typed_option(DhcpOptionCode::AddressTime, option_u32)
    }

    pub fn server_identifier(&self) -> Option<Ipv4Addr> {
        self.typed_option(DhcpOptionCode::DHCPServerId, option_ipv4)
    }

    pub fn parameter_request_list(&self) -> Option<Vec<u8>> {
        self.options.get(DhcpOptionCode::ParameterList).map(|v| v.to_vec())
    }

    /// Bootfile name carried in option 67, not the fixed `file` field.
    pub fn bootfile_name_option(&self) -> Option<String> {
        self.typed_option(DhcpOptionCode::BootfileName, option_string)
    }

    pub fn user_class(&self) -> Option<Vec<Vec<u8>>> {
        self.options.get(DhcpOptionCode::UserClass).map(option_user_class)
    }

    pub fn client_arch(&self) -> Option<Vec<u16>> {
        self.typed_option(DhcpOptionCode::ClientSystem, option_u16_vec)
    }

    pub fn classless_static_routes(&self) -> Option<ClasslessRoutes> {
        self.typed_option(DhcpOptionCode::ClasslessStaticRoute, |_, v| ClasslessRoutes::from_bytes(v))
    }
}
