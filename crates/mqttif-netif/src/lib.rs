//! # mqttif-netif
//!
//! pub/sub チャンネルを物理媒体とする仮想ネットワークインターフェース。
//!
//! ## データフロー
//!
//! ```text
//! 送信:
//!   stack → Interface::send(packet)
//!     → 宛先アドレス → TopicSet::destination → FrameCodec::encode → PubSub::publish
//!
//! 受信:
//!   transport → Interface::on_message(topic, payload)
//!     → TopicSet::classify（受信/ブロードキャストに完全一致のみ）
//!     → FrameCodec::decode → NetStack::inject
//! ```
//!
//! ## 内部アーキテクチャ
//!
//! ```text
//! Interface
//!   ├── TopicSet     (mqttif-transport) - 受信/ブロードキャストトピック
//!   ├── FrameCodec   (mqttif-crypto)    - 平文 or XSalsa20-Poly1305
//!   ├── PubSub       (外部)             - MQTT クライアント
//!   └── NetStack     (外部)             - ローカル IP スタック
//! ```

#![no_std]
extern crate alloc;

pub mod config;
pub mod dns;
pub mod error;
pub mod flags;
pub mod interface;
pub mod packet;
pub mod stack;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use config::{AddressConfig, InterfaceConfig};
pub use dns::{DnsServers, DNS_MAX_SERVERS};
pub use error::{ConfigError, NetifError, StackError};
pub use flags::NetifFlags;
pub use interface::{Inbound, Interface};
pub use stack::{NetStack, NetifInfo, DEFAULT_MTU, NETIF_NAME};
pub use stats::InterfaceStats;
