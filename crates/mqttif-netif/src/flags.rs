//! インターフェースフラグ
//!
//! ビット値は lwIP の `NETIF_FLAG_*` と同じ。ホスト側スタックへそのまま渡せる。

use core::ops::{BitOr, BitOrAssign};

/// インターフェースのフラグワード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetifFlags(u8);

impl NetifFlags {
    pub const UP: Self = NetifFlags(0x01);
    pub const BROADCAST: Self = NetifFlags(0x02);
    pub const POINTTOPOINT: Self = NetifFlags(0x04);
    pub const DHCP: Self = NetifFlags(0x08);
    pub const LINK_UP: Self = NetifFlags(0x10);
    pub const ETHARP: Self = NetifFlags(0x20);
    pub const ETHERNET: Self = NetifFlags(0x40);
    pub const IGMP: Self = NetifFlags(0x80);

    pub const fn empty() -> Self {
        NetifFlags(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        NetifFlags(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for NetifFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        NetifFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for NetifFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
