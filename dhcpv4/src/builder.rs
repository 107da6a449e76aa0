//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//
// Builder:
//  Fresh client messages and messages derived from a received one,
//  following the RFC2131 client/server exchange.
//

use std::net::Ipv4Addr;

use rand::RngCore;

use crate::*;
use crate::config::BuilderConfig;
use crate::modifiers::*;

/// Parameters requested by a DISCOVER unless configured otherwise.
pub const DEFAULT_REQUESTED_OPTIONS: [u8; 4] = [
    DhcpOptionCode::SubnetMask as u8,
    DhcpOptionCode::Router as u8,
    DhcpOptionCode::DomainName as u8,
    DhcpOptionCode::DomainServer as u8,
];

impl DhcpMessage {
    // Empty BOOTREQUEST with given transaction ID.
    fn blank(xid: TransactionId) -> DhcpMessage {
        DhcpMessage {
            op: BootpMessageType::BOOTREQUEST,
            htype: HTYPE_ETHERNET,
            hops: 0,
            xid,
            secs: 0,
            flags: 0,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr: Vec::new(),
            sname: String::new(),
            file: String::new(),
            options: DhcpOptions::new(),
        }
    }

    /// New BOOTREQUEST with a random transaction ID from the thread local
    /// generator, then modifiers applied in order.
    pub fn new(modifiers: &[Modifier]) -> Result<DhcpMessage, DhcpError> {
        DhcpMessage::new_with_rng(&mut rand::rng(), modifiers)
    }

    /// Same as `new`, drawing the transaction ID from `rng`.
    pub fn new_with_rng<R: RngCore + ?Sized>(rng: &mut R, modifiers: &[Modifier]) -> Result<DhcpMessage, DhcpError> {
        let mut xid = [0u8; 4];
        rng.fill_bytes(&mut xid);

        let mut msg = DhcpMessage::blank(TransactionId(xid));
        apply_modifiers(&mut msg, modifiers)?;
        Ok(msg)
    }

    /// DHCPDISCOVER, broadcast, requesting the default parameter set.
    pub fn new_discovery(hw_addr: &[u8]) -> Result<DhcpMessage, DhcpError> {
        DhcpMessage::new(&[
            with_hw_addr(hw_addr),
            with_broadcast(true),
            with_message_type(DhcpMessageType::DHCPDISCOVER),
            with_requested_options(&DEFAULT_REQUESTED_OPTIONS),
        ])
    }

    /// DHCPDISCOVER shaped by a builder configuration.
    pub fn new_discovery_with_config(hw_addr: &[u8], config: &BuilderConfig) -> Result<DhcpMessage, DhcpError> {
        let mut modifiers = vec![
            with_hw_addr(hw_addr),
            with_broadcast(config.broadcast.unwrap_or(true)),
            with_message_type(DhcpMessageType::DHCPDISCOVER),
            with_requested_options(&config.requested_options()),
        ];
        modifiers.extend(config.modifiers());

        let msg = DhcpMessage::new(&modifiers)?;
        if config.is_debug_enabled() {
            tracing::debug!(xid = %msg.xid, "built DHCPDISCOVER from config");
        }
        Ok(msg)
    }

    /// DHCPINFORM from a client that already has an address.
    pub fn new_inform(hw_addr: &[u8], local_ip: Ipv4Addr) -> Result<DhcpMessage, DhcpError> {
        DhcpMessage::new(&[
            with_hw_addr(hw_addr),
            with_client_ip(local_ip),
            with_message_type(DhcpMessageType::DHCPINFORM),
        ])
    }

    /// DHCPREQUEST answering an OFFER.  The offer must carry a Server
    /// Identifier.
    pub fn request_from_offer(offer: &DhcpMessage, modifiers: &[Modifier]) -> Result<DhcpMessage, DhcpError> {
        let server_id = match offer.server_identifier() {
            Some(server_id) => server_id,
            None => return Err(DhcpError::MissingServerIdentifier),
        };

        let mut msg = DhcpMessage::blank(offer.xid);
        msg.htype = offer.htype;
        msg.chaddr = offer.chaddr.clone();
        if offer.is_broadcast() {
            msg.set_broadcast();
        }
        msg.update_option(DhcpOption::message_type(DhcpMessageType::DHCPREQUEST));
        msg.update_option(DhcpOption::requested_ip_address(offer.yiaddr));
        msg.update_option(DhcpOption::server_identifier(server_id));

        apply_modifiers(&mut msg, modifiers)?;

        tracing::debug!(xid = %msg.xid, server = %server_id, requested = %offer.yiaddr, "derived DHCPREQUEST from offer");
        Ok(msg)
    }

    /// BOOTREPLY answering a client message.  The relay agent address is
    /// kept so the reply can be sent back through the relay.
    pub fn reply_from_request(request: &DhcpMessage, modifiers: &[Modifier]) -> Result<DhcpMessage, DhcpError> {
        let mut msg = DhcpMessage::blank(request.xid);
        msg.op = BootpMessageType::BOOTREPLY;
        msg.htype = request.htype;
        msg.chaddr = request.chaddr.clone();
        msg.giaddr = request.giaddr;
        if request.is_broadcast() {
            msg.set_broadcast();
        }

        apply_modifiers(&mut msg, modifiers)?;

        tracing::debug!(xid = %msg.xid, giaddr = %msg.giaddr, "derived reply from request");
        Ok(msg)
    }
}

///
/// Unit tests.
///
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_offer() -> DhcpMessage {
        let mut rng = StdRng::seed_from_u64(42);
        DhcpMessage::new_with_rng(&mut rng, &[
            with_hw_addr(&[1, 2, 3, 4, 5, 6]),
            with_your_ip(Ipv4Addr::new(192, 168, 0, 100)),
            with_message_type(DhcpMessageType::DHCPOFFER),
        ]).unwrap()
    }

    #[test]
    pub fn test_new() {
        let msg = DhcpMessage::new(&[]).unwrap();
        assert_eq!(msg.op, BootpMessageType::BOOTREQUEST);
        assert_eq!(msg.htype, HTYPE_ETHERNET);
        assert_eq!(msg.flags, 0);
        assert_eq!(msg.ciaddr, Ipv4Addr::UNSPECIFIED);
        assert!(msg.chaddr.is_empty());
        assert!(msg.options.is_empty());
        assert_eq!(msg.message_type(), None);
    }

    #[test]
    pub fn test_new_with_rng_deterministic() {
        let a = DhcpMessage::new_with_rng(&mut StdRng::seed_from_u64(3), &[]).unwrap();
        let b = DhcpMessage::new_with_rng(&mut StdRng::seed_from_u64(3), &[]).unwrap();
        assert_eq!(a.xid, b.xid);
    }

    #[test]
    pub fn test_new_discovery() {
        let hw_addr = [1, 2, 3, 4, 5, 6];
        let msg = DhcpMessage::new_discovery(&hw_addr).unwrap();

        assert_eq!(msg.message_type(), Some(DhcpMessageType::DHCPDISCOVER));
        assert_eq!(msg.op, BootpMessageType::BOOTREQUEST);
        assert_eq!(msg.htype, HTYPE_ETHERNET);
        assert_eq!(msg.chaddr, hw_addr);
        assert!(msg.is_broadcast());
        assert!(msg.has_option(DhcpOptionCode::ParameterList));
        assert!(msg.is_option_requested(DhcpOptionCode::Router));
        assert!(msg.is_option_requested(DhcpOptionCode::DomainServer));
    }

    #[test]
    pub fn test_new_discovery_with_config() {
        let config = BuilderConfig::from_json(r#"{
            "broadcast": false,
            "requested_options": [1, 121],
            "vendor_class": "dhcp-rs"
        }"#).unwrap();
        let msg = DhcpMessage::new_discovery_with_config(&[1, 2, 3, 4, 5, 6], &config).unwrap();

        assert!(msg.is_unicast());
        assert_eq!(msg.parameter_request_list(), Some(vec![1, 121]));
        assert_eq!(msg.get_one_option(DhcpOptionCode::VendorClassId), b"dhcp-rs");
    }

    #[test]
    pub fn test_new_inform() {
        let hw_addr = [1, 2, 3, 4, 5, 6];
        let local_ip = Ipv4Addr::new(10, 10, 11, 11);
        let msg = DhcpMessage::new_inform(&hw_addr, local_ip).unwrap();

        assert_eq!(msg.op, BootpMessageType::BOOTREQUEST);
        assert_eq!(msg.htype, HTYPE_ETHERNET);
        assert_eq!(msg.chaddr, hw_addr);
        assert_eq!(msg.message_type(), Some(DhcpMessageType::DHCPINFORM));
        assert_eq!(msg.ciaddr, local_ip);
    }

    #[test]
    pub fn test_request_from_offer() {
        let mut offer = new_offer();
        offer.set_broadcast();
        let res = DhcpMessage::request_from_offer(&offer, &[]);
        assert_eq!(res, Err(DhcpError::MissingServerIdentifier));

        // Now add the option so it doesn't error out.
        offer.update_option(DhcpOption::server_identifier(Ipv4Addr::new(192, 168, 0, 1)));

        // Broadcast request.
        let req = DhcpMessage::request_from_offer(&offer, &[]).unwrap();
        assert_eq!(req.message_type(), Some(DhcpMessageType::DHCPREQUEST));
        assert_eq!(req.op, BootpMessageType::BOOTREQUEST);
        assert_eq!(req.xid, offer.xid);
        assert_eq!(req.chaddr, offer.chaddr);
        assert_eq!(req.requested_ip_address(), Some(Ipv4Addr::new(192, 168, 0, 100)));
        assert_eq!(req.server_identifier(), Some(Ipv4Addr::new(192, 168, 0, 1)));
        assert!(req.is_broadcast());
        assert!(!req.is_unicast());

        // Unicast request.
        offer.set_unicast();
        let req = DhcpMessage::request_from_offer(&offer, &[]).unwrap();
        assert!(req.is_unicast());
        assert!(!req.is_broadcast());

        // The offer itself is left alone.
        assert_eq!(offer.message_type(), Some(DhcpMessageType::DHCPOFFER));
    }

    #[test]
    pub fn test_request_from_offer_with_modifier() {
        let mut offer = new_offer();
        offer.update_option(DhcpOption::server_identifier(Ipv4Addr::new(192, 168, 0, 1)));

        let req = DhcpMessage::request_from_offer(&offer, &[with_user_class(b"linuxboot", false)]).unwrap();
        assert_eq!(req.message_type(), Some(DhcpMessageType::DHCPREQUEST));
        assert_eq!(req.get_one_option(DhcpOptionCode::UserClass), b"linuxboot");

        let res = DhcpMessage::request_from_offer(&offer, &[with_hw_addr(&[0; 20])]);
        assert!(matches!(res, Err(DhcpError::ModifierFailed(_))));
    }

    #[test]
    pub fn test_reply_from_request() {
        let discover = DhcpMessage::new(&[
            with_gateway_ip(Ipv4Addr::new(192, 168, 0, 1)),
            with_hw_addr(&[1, 2, 3, 4, 5, 6]),
        ]).unwrap();

        let reply = DhcpMessage::reply_from_request(&discover, &[]).unwrap();
        assert_eq!(reply.op, BootpMessageType::BOOTREPLY);
        assert_eq!(reply.xid, discover.xid);
        assert_eq!(reply.giaddr, discover.giaddr);
        assert_eq!(reply.chaddr, discover.chaddr);
    }

    #[test]
    pub fn test_reply_from_request_with_modifier() {
        let discover = DhcpMessage::new(&[with_gateway_ip(Ipv4Addr::new(192, 168, 0, 1))]).unwrap();

        let reply = DhcpMessage::reply_from_request(&discover, &[
            with_message_type(DhcpMessageType::DHCPOFFER),
            with_user_class(b"linuxboot", false),
        ]).unwrap();
        assert_eq!(reply.xid, discover.xid);
        assert_eq!(reply.giaddr, discover.giaddr);
        assert_eq!(reply.message_type(), Some(DhcpMessageType::DHCPOFFER));
    }

    #[test]
    pub fn test_exchange_on_the_wire() {
        let discover = DhcpMessage::new_discovery(&[0x00, 0x0c, 0x29, 0xa8, 0x92, 0xf4]).unwrap();
        let discover = DhcpMessage::decode(&discover.encode().unwrap()).unwrap();

        let offer = DhcpMessage::reply_from_request(&discover, &[
            with_message_type(DhcpMessageType::DHCPOFFER),
            with_your_ip(Ipv4Addr::new(10, 0, 0, 50)),
            with_server_identifier(Ipv4Addr::new(10, 0, 0, 1)),
            with_lease_time(3600),
        ]).unwrap();
        let offer = DhcpMessage::decode(&offer.encode().unwrap()).unwrap();

        let request = DhcpMessage::request_from_offer(&offer, &[]).unwrap();
        assert_eq!(request.xid, discover.xid);
        assert_eq!(request.chaddr, discover.chaddr);
        assert!(request.is_broadcast());
        assert_eq!(request.requested_ip_address(), Some(Ipv4Addr::new(10, 0, 0, 50)));
        assert_eq!(request.server_identifier(), Some(Ipv4Addr::new(10, 0, 0, 1)));
    }
}
