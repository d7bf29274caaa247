//! mqttif-transport エラー型

use alloc::string::String;

use thiserror::Error;

/// pub/sub トランスポート層のエラー
///
/// 再接続や再送はトランスポート側の責任。ここでは結果を伝えるだけ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// ブローカーに接続していない
    #[error("Transport disconnected")]
    Disconnected,
    /// クライアントが要求を拒否した（キュー満杯など）
    #[error("Transport rejected request: {0}")]
    Rejected(String),
}
