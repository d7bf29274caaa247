//! ローカルネットワークスタックのインターフェース
//!
//! パケットバッファ確保・ルーティング・インターフェース登録はスタック側が持つ。
//! コントローラーが使うのは登録/解除、パケット注入、属性の反映だけ。

use core::net::Ipv4Addr;

use crate::error::StackError;
use crate::flags::NetifFlags;

/// インターフェース名（lwIP の `netif->name` と同じ 2 文字）
pub const NETIF_NAME: &str = "mq";

/// デフォルト MTU
pub const DEFAULT_MTU: u16 = 1500;

/// 登録時にスタックへ渡す情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetifInfo {
    pub name: &'static str,
    pub mtu: u16,
    pub flags: NetifFlags,
}

/// ローカルネットワークスタック
///
/// 属性の反映はデフォルトで何もしない。必要なものだけ実装すればよい。
pub trait NetStack {
    /// インターフェースを登録する
    fn register(&mut self, info: &NetifInfo) -> Result<(), StackError>;

    /// インターフェースの登録を解除する
    fn deregister(&mut self);

    /// 受信パケットをスタックに渡す。拒否された場合パケットは破棄される
    fn inject(&mut self, packet: &[u8]) -> Result<(), StackError>;

    fn set_address(&mut self, _addr: Ipv4Addr) {}

    fn set_netmask(&mut self, _netmask: Ipv4Addr) {}

    fn set_gateway(&mut self, _gateway: Ipv4Addr) {}

    fn set_mtu(&mut self, _mtu: u16) {}

    fn set_flags(&mut self, _flags: NetifFlags) {}

    /// DNS サーバースロットを設定する（`None` は未設定）
    fn set_dns_server(&mut self, _slot: usize, _addr: Option<Ipv4Addr>) {}
}

impl<S: NetStack + ?Sized> NetStack for &mut S {
    fn register(&mut self, info: &NetifInfo) -> Result<(), StackError> {
        (**self).register(info)
    }

    fn deregister(&mut self) {
        (**self).deregister()
    }

    fn inject(&mut self, packet: &[u8]) -> Result<(), StackError> {
        (**self).inject(packet)
    }

    fn set_address(&mut self, addr: Ipv4Addr) {
        (**self).set_address(addr)
    }

    fn set_netmask(&mut self, netmask: Ipv4Addr) {
        (**self).set_netmask(netmask)
    }

    fn set_gateway(&mut self, gateway: Ipv4Addr) {
        (**self).set_gateway(gateway)
    }

    fn set_mtu(&mut self, mtu: u16) {
        (**self).set_mtu(mtu)
    }

    fn set_flags(&mut self, flags: NetifFlags) {
        (**self).set_flags(flags)
    }

    fn set_dns_server(&mut self, slot: usize, addr: Option<Ipv4Addr>) {
        (**self).set_dns_server(slot, addr)
    }
}
