//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//
// BOOTP fixed header, RFC2131 section 2.
//
//   0                   1                   2                   3
//   0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//   +---------------+---------------+---------------+---------------+
//   |     op (1)    |   htype (1)   |   hlen (1)    |   hops (1)    |
//   +---------------+---------------+---------------+---------------+
//   |                            xid (4)                            |
//   +-------------------------------+-------------------------------+
//   |           secs (2)            |           flags (2)           |
//   +-------------------------------+-------------------------------+
//   |                          ciaddr  (4)                          |
//   +---------------------------------------------------------------+
//   |                          yiaddr  (4)                          |
//   +---------------------------------------------------------------+
//   |                          siaddr  (4)                          |
//   +---------------------------------------------------------------+
//   |                          giaddr  (4)                          |
//   +---------------------------------------------------------------+
//   |                          chaddr  (16)                         |
//   +---------------------------------------------------------------+
//   |                          sname   (64)                         |
//   +---------------------------------------------------------------+
//   |                          file    (128)                        |
//   +---------------------------------------------------------------+
//   |                       magic cookie (4)                        |
//   +---------------------------------------------------------------+
//

use std::cmp::min;

use crate::*;
use crate::encode::*;

/// Length of BOOTP fixed header, without magic cookie.
pub const BOOTP_HEADER_LEN: usize = 236;

/// Length of fixed header including magic cookie, where options start.
pub const DHCP_HEADER_LEN: usize = 240;

/// DHCP magic cookie.
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

pub const CHADDR_LEN: usize = 16;
pub const SNAME_LEN: usize = 64;
pub const FILE_LEN: usize = 128;

/// Decode fixed header and magic cookie.  The returned message has no options.
pub fn decode_header(buf: &[u8]) -> Result<DhcpMessage, DhcpError> {
    if buf.len() < DHCP_HEADER_LEN {
        return Err(DhcpError::TooShort(buf.len()));
    }

    let mut cookie = [0u8; 4];
    cookie.copy_from_slice(&buf[BOOTP_HEADER_LEN..DHCP_HEADER_LEN]);
    if cookie != DHCP_MAGIC_COOKIE {
        return Err(DhcpError::InvalidMagicCookie(cookie))
    }

    let op: BootpMessageType = decode_u8(&buf[0..])?.try_into()?;
    let hlen = min(decode_u8(&buf[2..])? as usize, CHADDR_LEN);
    let mut xid = [0u8; 4];
    xid.copy_from_slice(&buf[4..8]);

    Ok(DhcpMessage {
        op,
        htype: decode_u8(&buf[1..])?,
        hops: decode_u8(&buf[3..])?,
        xid: TransactionId(xid),
        secs: decode_u16(&buf[8..])?,
        flags: decode_u16(&buf[10..])?,
        ciaddr: decode_ipv4(&buf[12..])?,
        yiaddr: decode_ipv4(&buf[16..])?,
        siaddr: decode_ipv4(&buf[20..])?,
        giaddr: decode_ipv4(&buf[24..])?,
        chaddr: buf[28..28 + hlen].to_vec(),
        sname: decode_fixed_string(&buf[44..108]),
        file: decode_fixed_string(&buf[108..236]),
        options: DhcpOptions::new(),
    })
}

/// Encode fixed header and magic cookie.
pub fn encode_header(msg: &DhcpMessage, buf: &mut Vec<u8>) -> Result<usize, DhcpError> {
    if msg.chaddr.len() > CHADDR_LEN {
        return Err(DhcpError::FieldTooLong("chaddr", msg.chaddr.len(), CHADDR_LEN));
    }
    let hlen = htype_addr_len(msg.htype).unwrap_or(msg.chaddr.len());

    let mut len = encode_u8(buf, msg.op as u8);
    len += encode_u8(buf, msg.htype);
    len += encode_u8(buf, hlen as u8);
    len += encode_u8(buf, msg.hops);
    len += encode_data(buf, &msg.xid.0);
    len += encode_u16(buf, msg.secs);
    len += encode_u16(buf, msg.flags);
    len += encode_ipv4(buf, msg.ciaddr);
    len += encode_ipv4(buf, msg.yiaddr);
    len += encode_ipv4(buf, msg.siaddr);
    len += encode_ipv4(buf, msg.giaddr);
    len += encode_fixed(buf, &msg.chaddr, CHADDR_LEN, "chaddr")?;
    len += encode_fixed(buf, msg.sname.as_bytes(), SNAME_LEN, "sname")?;
    len += encode_fixed(buf, msg.file.as_bytes(), FILE_LEN, "file")?;

    // Encode DHCP Magic Cookie.
    len += encode_data(buf, &DHCP_MAGIC_COOKIE);

    Ok(len)
}

///
/// Unit tests.
///
#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn header_bytes() -> Vec<u8> {
        let mut data = vec![
            1,                      // BOOTREQUEST
            1,                      // Ethernet
            6,                      // hlen
            3,                      // hops
            0xaa, 0xbb, 0xcc, 0xdd, // xid
            0, 3,                   // secs
            0, 1,                   // flags
            10, 0, 0, 1,            // ciaddr
            0, 0, 0, 0,             // yiaddr
            0, 0, 0, 0,             // siaddr
            192, 168, 0, 254,       // giaddr
            0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        data.resize(data.len() + SNAME_LEN + FILE_LEN, 0);
        data.extend_from_slice(&DHCP_MAGIC_COOKIE);
        data
    }

    #[test]
    pub fn test_decode_header() {
        let data = header_bytes();
        let res = decode_header(&data);
        match res {
            Err(e) => assert!(false, "Error: {:?}", e),
            Ok(msg) => {
                assert_eq!(msg.op, BootpMessageType::BOOTREQUEST);
                assert_eq!(msg.htype, HTYPE_ETHERNET);
                assert_eq!(msg.hops, 3);
                assert_eq!(msg.xid, TransactionId([0xaa, 0xbb, 0xcc, 0xdd]));
                assert_eq!(msg.secs, 3);
                assert_eq!(msg.flags, 1);
                assert_eq!(msg.ciaddr, Ipv4Addr::new(10, 0, 0, 1));
                assert_eq!(msg.yiaddr, Ipv4Addr::UNSPECIFIED);
                assert_eq!(msg.giaddr, Ipv4Addr::new(192, 168, 0, 254));
                assert_eq!(msg.chaddr, [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
                assert_eq!(msg.sname, "");
                assert_eq!(msg.file, "");
                assert!(msg.options.is_empty());
            }
        }
    }

    #[test]
    pub fn test_decode_header_too_short() {
        assert_eq!(decode_header(&[]), Err(DhcpError::TooShort(0)));
        assert_eq!(decode_header(&[1, 1, 6, 0]), Err(DhcpError::TooShort(4)));

        let data = header_bytes();
        assert_eq!(decode_header(&data[..BOOTP_HEADER_LEN]), Err(DhcpError::TooShort(236)));
    }

    #[test]
    pub fn test_decode_header_invalid_cookie() {
        let mut data = header_bytes();
        data[239] = 98;
        assert_eq!(decode_header(&data), Err(DhcpError::InvalidMagicCookie([99, 130, 83, 98])));
    }

    #[test]
    pub fn test_decode_header_strings() {
        let mut data = header_bytes();
        data[44..50].copy_from_slice(b"server");
        data[108..116].copy_from_slice(b"boot.img");
        // Anything after the first zero is padding.
        data[118] = b'x';

        let msg = decode_header(&data).unwrap();
        assert_eq!(msg.sname, "server");
        assert_eq!(msg.file, "boot.img");
    }

    #[test]
    pub fn test_encode_header() {
        let data = header_bytes();
        let msg = decode_header(&data).unwrap();

        let mut buf = Vec::new();
        assert_eq!(encode_header(&msg, &mut buf), Ok(DHCP_HEADER_LEN));
        assert_eq!(buf, data);
    }

    #[test]
    pub fn test_encode_header_too_long() {
        let mut msg = decode_header(&header_bytes()).unwrap();
        msg.file = "f".repeat(FILE_LEN + 1);

        let mut buf = Vec::new();
        assert_eq!(encode_header(&msg, &mut buf), Err(DhcpError::FieldTooLong("file", 129, 128)));

        msg.file = "f".repeat(FILE_LEN);
        let mut buf = Vec::new();
        assert!(encode_header(&msg, &mut buf).is_ok());

        msg.sname = "s".repeat(SNAME_LEN + 1);
        let mut buf = Vec::new();
        assert_eq!(encode_header(&msg, &mut buf), Err(DhcpError::FieldTooLong("sname", 65, 64)));
    }
}
