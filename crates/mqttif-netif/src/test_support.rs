//! ユニットテスト用のトランスポート / スタック

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::net::Ipv4Addr;

use mqttif_transport::{PubSub, TransportError};

use crate::dns::DNS_MAX_SERVERS;
use crate::error::StackError;
use crate::flags::NetifFlags;
use crate::packet::IPV4_HEADER_LEN;
use crate::stack::{NetStack, NetifInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Publish(String, Vec<u8>),
    Subscribe(String),
    Unsubscribe(String),
}

/// 呼び出しを記録するだけのトランスポート
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub calls: Vec<TransportCall>,
    pub fail_publish: bool,
    pub fail_subscribe: bool,
}

impl PubSub for RecordingTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if self.fail_publish {
            return Err(TransportError::Disconnected);
        }
        self.calls.push(TransportCall::Publish(topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.calls.push(TransportCall::Subscribe(topic.to_string()));
        if self.fail_subscribe {
            return Err(TransportError::Rejected("subscribe queue full".to_string()));
        }
        Ok(())
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.calls.push(TransportCall::Unsubscribe(topic.to_string()));
        Ok(())
    }
}

/// 状態を記録するだけのスタック
#[derive(Debug, Default)]
pub struct MemoryStack {
    pub registered: Option<NetifInfo>,
    pub deregistered: bool,
    pub injected: Vec<Vec<u8>>,
    pub address: Option<Ipv4Addr>,
    pub netmask: Option<Ipv4Addr>,
    pub gateway: Option<Ipv4Addr>,
    pub mtu: Option<u16>,
    pub flags: Option<NetifFlags>,
    pub dns: [Option<Ipv4Addr>; DNS_MAX_SERVERS],
    pub fail_register: bool,
    pub fail_inject: bool,
}

impl NetStack for MemoryStack {
    fn register(&mut self, info: &NetifInfo) -> Result<(), StackError> {
        if self.fail_register {
            return Err(StackError::RegistrationFailed("no free netif".to_string()));
        }
        self.registered = Some(*info);
        Ok(())
    }

    fn deregister(&mut self) {
        self.deregistered = true;
    }

    fn inject(&mut self, packet: &[u8]) -> Result<(), StackError> {
        if self.fail_inject {
            return Err(StackError::Dropped);
        }
        self.injected.push(packet.to_vec());
        Ok(())
    }

    fn set_address(&mut self, addr: Ipv4Addr) {
        self.address = Some(addr);
    }

    fn set_netmask(&mut self, netmask: Ipv4Addr) {
        self.netmask = Some(netmask);
    }

    fn set_gateway(&mut self, gateway: Ipv4Addr) {
        self.gateway = Some(gateway);
    }

    fn set_mtu(&mut self, mtu: u16) {
        self.mtu = Some(mtu);
    }

    fn set_flags(&mut self, flags: NetifFlags) {
        self.flags = Some(flags);
    }

    fn set_dns_server(&mut self, slot: usize, addr: Option<Ipv4Addr>) {
        self.dns[slot] = addr;
    }
}

/// `len` バイトの IPv4 パケット（ヘッダー以外は連番）
pub fn ipv4_packet(src: [u8; 4], dst: [u8; 4], len: usize) -> Vec<u8> {
    let mut pkt: Vec<u8> = (0..len).map(|i| i as u8).collect();
    pkt[0] = 0x45;
    pkt[12..16].copy_from_slice(&src);
    pkt[16..IPV4_HEADER_LEN].copy_from_slice(&dst);
    pkt
}
