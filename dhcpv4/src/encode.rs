//
// DHCP-RS
//   Copyright (C) 2024-2025, Toshiaki Takada
//
// Encode:
//  Low level utility functions to put/get values into/from buffer.
//  All multi-byte integers are in network byte order on the wire.
//

use std::mem::size_of;
use std::net::Ipv4Addr;

use crate::DhcpError;

/// Append u8 value to buffer.
pub fn encode_u8(buf: &mut Vec<u8>, v: u8) -> usize {
    buf.push(v);
    size_of::<u8>()
}

/// Append u16 value to buffer.
pub fn encode_u16(buf: &mut Vec<u8>, v: u16) -> usize {
    buf.extend_from_slice(&v.to_be_bytes());
    size_of::<u16>()
}

/// Append u32 value to buffer.
pub fn encode_u32(buf: &mut Vec<u8>, v: u32) -> usize {
    buf.extend_from_slice(&v.to_be_bytes());
    size_of::<u32>()
}

/// Append IPv4 address to buffer.
pub fn encode_ipv4(buf: &mut Vec<u8>, v: Ipv4Addr) -> usize {
    buf.extend_from_slice(&v.octets());
    size_of::<Ipv4Addr>()
}

/// Append arbitrary bytes to buffer.
pub fn encode_data(buf: &mut Vec<u8>, data: &[u8]) -> usize {
    buf.extend_from_slice(data);
    data.len()
}

/// Append data into a fixed width field, zero padded up to size.
pub fn encode_fixed(buf: &mut Vec<u8>, data: &[u8], size: usize, field: &'static str) -> Result<usize, DhcpError> {
    if data.len() > size {
        Err(DhcpError::FieldTooLong(field, data.len(), size))
    } else {
        buf.extend_from_slice(data);
        buf.resize(buf.len() + size - data.len(), 0);
        Ok(size)
    }
}

/// Return u8 value.
pub fn decode_u8(data: &[u8]) -> Result<u8, DhcpError> {
    match data.first() {
        Some(v) => Ok(*v),
        None => Err(DhcpError::TooShort(data.len())),
    }
}

/// Return u16 value in host byte order.
pub fn decode_u16(data: &[u8]) -> Result<u16, DhcpError> {
    if data.len() < size_of::<u16>() {
        Err(DhcpError::TooShort(data.len()))
    } else {
        Ok((data[0] as u16) << 8 | data[1] as u16)
    }
}

/// Return u32 value in host byte order.
pub fn decode_u32(data: &[u8]) -> Result<u32, DhcpError> {
    if data.len() < size_of::<u32>() {
        Err(DhcpError::TooShort(data.len()))
    } else {
        Ok((data[0] as u32) << 24 | (data[1] as u32) << 16 | (data[2] as u32) << 8 | data[3] as u32)
    }
}

/// Return Ipv4Addr.
pub fn decode_ipv4(data: &[u8]) -> Result<Ipv4Addr, DhcpError> {
    if data.len() < size_of::<Ipv4Addr>() {
        Err(DhcpError::TooShort(data.len()))
    } else {
        Ok(Ipv4Addr::new(data[0], data[1], data[2], data[3]))
    }
}

/// Return a string from a fixed width field, trimmed at the first zero byte.
pub fn decode_fixed_string(data: &[u8]) -> String {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8_lossy(&data[..end]).into_owned()
}

///
/// Unit tests.
///
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_encode_integers() {
        let mut buf = Vec::new();
        assert_eq!(encode_u8(&mut buf, 0x01), 1);
        assert_eq!(encode_u16(&mut buf, 0x0203), 2);
        assert_eq!(encode_u32(&mut buf, 0x04050607), 4);
        assert_eq!(encode_ipv4(&mut buf, Ipv4Addr::new(10, 0, 0, 1)), 4);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 10, 0, 0, 1]);
    }

    #[test]
    pub fn test_encode_fixed() {
        let mut buf = Vec::new();
        assert_eq!(encode_fixed(&mut buf, b"abc", 8, "sname"), Ok(8));
        assert_eq!(buf, [b'a', b'b', b'c', 0, 0, 0, 0, 0]);

        let res = encode_fixed(&mut buf, b"too long", 4, "sname");
        assert_eq!(res, Err(DhcpError::FieldTooLong("sname", 8, 4)));
        assert_eq!(buf.len(), 8);
    }

    #[test]
    pub fn test_decode_integers() {
        let data = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(decode_u8(&data), Ok(0x12));
        assert_eq!(decode_u16(&data), Ok(0x1234));
        assert_eq!(decode_u32(&data), Ok(0x12345678));
        assert_eq!(decode_ipv4(&data), Ok(Ipv4Addr::new(0x12, 0x34, 0x56, 0x78)));
        assert_eq!(decode_u32(&data[1..]), Err(DhcpError::TooShort(3)));
        assert_eq!(decode_u8(&[]), Err(DhcpError::TooShort(0)));
    }

    #[test]
    pub fn test_decode_fixed_string() {
        assert_eq!(decode_fixed_string(&[0; 64]), "");
        assert_eq!(decode_fixed_string(b"boot.img\0\0\0"), "boot.img");
        // Bytes after the first zero are padding.
        assert_eq!(decode_fixed_string(b"abc\0def\0"), "abc");
        assert_eq!(decode_fixed_string(b"full"), "full");
    }
}
