//! DNS リゾルバーリスト
//!
//! トンネルのプロトコルとは無関係だが、同じ設定面から操作される。
//! 固定長のスロットに先頭から順に追加する。容量を超えた追加はエラー。

use core::net::Ipv4Addr;

use crate::error::ConfigError;
use crate::stack::NetStack;

/// DNS サーバースロット数（lwIP の `DNS_MAX_SERVERS` デフォルト値）
pub const DNS_MAX_SERVERS: usize = 2;

/// 順序付きの DNS サーバーリスト
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsServers {
    slots: [Option<Ipv4Addr>; DNS_MAX_SERVERS],
    count: usize,
}

impl DnsServers {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべてのスロットを未設定に戻す
    pub fn clear(&mut self) {
        self.slots = [None; DNS_MAX_SERVERS];
        self.count = 0;
    }

    /// 次の空きスロットにサーバーを追加する
    ///
    /// # 戻り値
    /// 使用したスロット番号
    ///
    /// # エラー
    /// - `ConfigError::DnsSlotsExhausted`: スロットが埋まっている
    pub fn add(&mut self, addr: Ipv4Addr) -> Result<usize, ConfigError> {
        if self.count >= DNS_MAX_SERVERS {
            return Err(ConfigError::DnsSlotsExhausted { max: DNS_MAX_SERVERS });
        }
        let slot = self.count;
        self.slots[slot] = Some(addr);
        self.count += 1;
        Ok(slot)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn get(&self, slot: usize) -> Option<Ipv4Addr> {
        self.slots.get(slot).copied().flatten()
    }

    /// 設定済みのサーバーを追加順に返す
    pub fn servers(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.slots[..self.count].iter().flatten().copied()
    }

    /// 全スロット（未設定を含む）をスタックに反映する
    pub fn apply<S: NetStack + ?Sized>(&self, stack: &mut S) {
        for (slot, addr) in self.slots.iter().enumerate() {
            stack.set_dns_server(slot, *addr);
        }
    }
}
