//! トピック名のマッピング
//!
//! ## トピック形式
//! ```text
//! <prefix>/<a.b.c.d>
//!
//! 受信トピック:       <prefix>/<自ノードのアドレス>
//! ブロードキャスト:   <prefix>/255.255.255.255
//! 送信先トピック:     <prefix>/<宛先アドレス>
//! ```
//!
//! 計算は純粋関数で I/O を伴わない。

use alloc::format;
use alloc::string::String;
use core::net::Ipv4Addr;

/// ブロードキャストトピックに使うアドレス
pub const BROADCAST_ADDR: Ipv4Addr = Ipv4Addr::BROADCAST;

/// `prefix/a.b.c.d` 形式のトピック名を返す
pub fn topic_for(prefix: &str, addr: Ipv4Addr) -> String {
    format!("{}/{}", prefix, addr)
}

/// ブロードキャストトピック名を返す
pub fn broadcast_topic(prefix: &str) -> String {
    topic_for(prefix, BROADCAST_ADDR)
}

/// 受信トピックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// 自ノードのアドレス宛て
    Receive,
    /// ブロードキャスト
    Broadcast,
}

/// インターフェースが購読する二つのトピック
///
/// 受信トピックはアドレス変更時に `readdress()` で再計算する。
/// ブロードキャストトピックは生成後変わらない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    prefix: String,
    address: Ipv4Addr,
    receive: String,
    broadcast: String,
}

impl TopicSet {
    /// アドレス未設定（0.0.0.0）の状態で生成する
    ///
    /// # 例
    /// ```
    /// use mqttif_transport::TopicSet;
    /// let topics = TopicSet::new("net");
    /// assert_eq!(topics.receive(), "net/0.0.0.0");
    /// assert_eq!(topics.broadcast(), "net/255.255.255.255");
    /// ```
    pub fn new(prefix: &str) -> Self {
        TopicSet {
            prefix: String::from(prefix),
            address: Ipv4Addr::UNSPECIFIED,
            receive: topic_for(prefix, Ipv4Addr::UNSPECIFIED),
            broadcast: broadcast_topic(prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn receive(&self) -> &str {
        &self.receive
    }

    pub fn broadcast(&self) -> &str {
        &self.broadcast
    }

    /// 購読対象のトピック（受信, ブロードキャストの順）
    ///
    /// アドレスが 255.255.255.255 のとき二つは同じトピックなので一つだけ返す。
    pub fn subscriptions(&self) -> impl Iterator<Item = &str> + '_ {
        let receive = (!self.receive_is_broadcast()).then_some(self.receive.as_str());
        receive.into_iter().chain(core::iter::once(self.broadcast.as_str()))
    }

    /// 受信トピックがブロードキャストトピックと同一か
    pub fn receive_is_broadcast(&self) -> bool {
        self.receive == self.broadcast
    }

    /// 宛先アドレスへの送信トピック
    pub fn destination(&self, addr: Ipv4Addr) -> String {
        topic_for(&self.prefix, addr)
    }

    /// 自ノードのアドレスを変更し、受信トピックを再計算する
    ///
    /// # 戻り値
    /// 変更前の受信トピック（購読解除に使う）
    pub fn readdress(&mut self, addr: Ipv4Addr) -> String {
        self.address = addr;
        core::mem::replace(&mut self.receive, topic_for(&self.prefix, addr))
    }

    /// 受信したトピックを分類する
    ///
    /// 完全一致のみ。前方一致やパターンマッチはしない。
    pub fn classify(&self, topic: &str) -> Option<TopicKind> {
        if topic == self.receive {
            Some(TopicKind::Receive)
        } else if topic == self.broadcast {
            Some(TopicKind::Broadcast)
        } else {
            None
        }
    }
}
