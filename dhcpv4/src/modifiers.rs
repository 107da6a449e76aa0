//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//
// Modifiers:
//  Configuration steps applied in order to a message under construction.
//  The first failing step aborts the whole build.
//

use std::net::Ipv4Addr;

use crate::*;
use crate::header::CHADDR_LEN;

/// A configuration step applied to an in-progress message.
pub type Modifier = Box<dyn Fn(&mut DhcpMessage) -> Result<(), DhcpError> + Send + Sync>;

/// Apply modifiers in order, stop at the first failure.
pub fn apply_modifiers(msg: &mut DhcpMessage, modifiers: &[Modifier]) -> Result<(), DhcpError> {
    for (index, modifier) in modifiers.iter().enumerate() {
        if let Err(err) = modifier(msg) {
            tracing::debug!(index, error = %err, "modifier rejected message");
            return Err(match err {
                DhcpError::ModifierFailed(_) => err,
                _ => DhcpError::ModifierFailed(err.to_string()),
            });
        }
    }
    Ok(())
}

pub fn with_transaction_id(xid: TransactionId) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        msg.xid = xid;
        Ok(())
    })
}

/// Set client hardware address, at most 16 bytes.
pub fn with_hw_addr(hw_addr: &[u8]) -> Modifier {
    let hw_addr = hw_addr.to_vec();
    Box::new(move |msg: &mut DhcpMessage| {
        if hw_addr.len() > CHADDR_LEN {
            return Err(DhcpError::FieldTooLong("chaddr", hw_addr.len(), CHADDR_LEN));
        }
        msg.chaddr = hw_addr.clone();
        Ok(())
    })
}

pub fn with_broadcast(broadcast: bool) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        if broadcast {
            msg.set_broadcast();
        } else {
            msg.set_unicast();
        }
        Ok(())
    })
}

pub fn with_client_ip(addr: Ipv4Addr) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        msg.ciaddr = addr;
        Ok(())
    })
}

pub fn with_your_ip(addr: Ipv4Addr) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        msg.yiaddr = addr;
        Ok(())
    })
}

pub fn with_server_ip(addr: Ipv4Addr) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        msg.siaddr = addr;
        Ok(())
    })
}

pub fn with_gateway_ip(addr: Ipv4Addr) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        msg.giaddr = addr;
        Ok(())
    })
}

pub fn with_option(option: DhcpOption) -> Modifier {
    Box::new(move |msg: &mut DhcpMessage| {
        msg.update_option(option.clone());
        Ok(())
    })
}

pub fn with_message_type(t: DhcpMessageType) -> Modifier {
    with_option(DhcpOption::message_type(t))
}

pub fn with_server_identifier(addr: Ipv4Addr) -> Modifier {
    with_option(DhcpOption::server_identifier(addr))
}

pub fn with_netmask(mask: Ipv4Addr) -> Modifier {
    with_option(DhcpOption::subnet_mask(mask))
}

pub fn with_router(routers: &[Ipv4Addr]) -> Modifier {
    with_option(DhcpOption::router(routers))
}

pub fn with_lease_time(secs: u32) -> Modifier {
    with_option(DhcpOption::ip_address_lease_time(secs))
}

pub fn with_classless_routes(routes: &ClasslessRoutes) -> Modifier {
    with_option(DhcpOption::classless_static_routes(routes))
}

pub fn with_client_arch(archs: &[u16]) -> Modifier {
    with_option(DhcpOption::client_arch(archs))
}

/// Set User Class option.  An RFC3004 instance carries at most 255 bytes.
pub fn with_user_class(data: &[u8], rfc3004: bool) -> Modifier {
    let data = data.to_vec();
    Box::new(move |msg: &mut DhcpMessage| {
        msg.update_option(DhcpOption::user_class(&data, rfc3004)?);
        Ok(())
    })
}

/// Add codes to the Parameter Request List, keeping existing order and
/// skipping codes already requested.
pub fn with_requested_options(codes: &[u8]) -> Modifier {
    let codes = codes.to_vec();
    Box::new(move |msg: &mut DhcpMessage| {
        let mut list = msg.parameter_request_list().unwrap_or_default();
        for code in &codes {
            if !list.contains(code) {
                list.push(*code);
            }
        }
        msg.update_option(DhcpOption::parameter_request_list(&list));
        Ok(())
    })
}
