//! pub/sub クライアントのインターフェース
//!
//! 接続管理・QoS・keepalive は実装側（MQTT クライアント）が持つ。
//! インターフェースが必要とするのは publish / subscribe / unsubscribe だけ。
//! 受信は呼び出し側が `Interface::on_message(topic, payload)` に渡す。

use crate::error::TransportError;

/// pub/sub トランスポート
pub trait PubSub {
    /// `topic` に `payload` を送信する
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// `topic` を購読する
    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError>;

    /// `topic` の購読を解除する
    fn unsubscribe(&mut self, topic: &str) -> Result<(), TransportError>;
}

impl<T: PubSub + ?Sized> PubSub for &mut T {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        (**self).publish(topic, payload)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        (**self).subscribe(topic)
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        (**self).unsubscribe(topic)
    }
}
