//! # mqttif-transport
//!
//! MQTT トンネルのトピック名マッピングと pub/sub トランスポートの境界。
//!
//! ## データフロー
//!
//! ```text
//! 送信:
//!   packet → 宛先アドレス → topic_for(prefix, dst) → PubSub::publish
//!
//! 受信:
//!   MQTT on_message(topic, payload) → TopicSet::classify(topic)
//!     → Receive / Broadcast なら復号してスタックへ、それ以外は無視
//! ```

#![no_std]
extern crate alloc;

pub mod error;
pub mod pubsub;
pub mod topic;

pub use error::TransportError;
pub use pubsub::PubSub;
pub use topic::{broadcast_topic, topic_for, TopicKind, TopicSet, BROADCAST_ADDR};
