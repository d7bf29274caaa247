//! 送信パケットのヘッダー読み取り
//!
//! ```text
//! IPv4 header (20 bytes 以上):
//!   byte 0       = version (上位 4bit) | IHL
//!   bytes 12..16 = source address
//!   bytes 16..20 = destination address
//! ```

use core::net::Ipv4Addr;

/// IPv4 ヘッダーの最小長
pub const IPV4_HEADER_LEN: usize = 20;

fn ipv4_header(packet: &[u8]) -> Option<&[u8]> {
    if packet.len() < IPV4_HEADER_LEN || packet[0] >> 4 != 4 {
        return None;
    }
    Some(&packet[..IPV4_HEADER_LEN])
}

/// 宛先アドレスを読む（IPv4 でなければ `None`）
pub fn destination(packet: &[u8]) -> Option<Ipv4Addr> {
    let header = ipv4_header(packet)?;
    Some(Ipv4Addr::new(header[16], header[17], header[18], header[19]))
}

/// 送信元アドレスを読む（IPv4 でなければ `None`）
pub fn source(packet: &[u8]) -> Option<Ipv4Addr> {
    let header = ipv4_header(packet)?;
    Some(Ipv4Addr::new(header[12], header[13], header[14], header[15]))
}
