//! mqttif-netif エラー型

use alloc::string::String;

use mqttif_crypto::CryptoError;
use mqttif_transport::TransportError;
use thiserror::Error;

/// ローカルネットワークスタック側のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackError {
    /// インターフェース登録に失敗
    #[error("Interface registration failed: {0}")]
    RegistrationFailed(String),
    /// スタックがパケットを受け取らなかった（バッファ不足など）
    #[error("Packet dropped by stack")]
    Dropped,
}

/// 設定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// DNS サーバーのスロットが埋まっている
    #[error("DNS server slots exhausted (max {max})")]
    DnsSlotsExhausted { max: usize },
    /// JSON のパースに失敗
    #[error("Invalid config JSON: {0}")]
    InvalidJson(String),
    /// トピックプレフィックスが空、またはワイルドカードを含む
    #[error("Invalid topic prefix: {0:?}")]
    InvalidTopicPrefix(String),
    /// MTU が範囲外
    #[error("Invalid MTU: {0}")]
    InvalidMtu(u16),
    /// IPv4 アドレスとして解釈できない
    #[error("Invalid IPv4 address: {0:?}")]
    InvalidAddress(String),
}

/// インターフェース操作のエラー
///
/// 生成時の `Registration` / `Config` 以外は、パケット 1 つを破棄するだけで
/// インターフェースの状態には影響しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetifError {
    /// エンコード/デコード失敗
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// publish 失敗
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// ローカルスタックへの登録失敗
    #[error("Registration failed: {0}")]
    Registration(StackError),
    /// 復号したパケットをスタックが受け取らなかった
    #[error("Injection rejected by stack")]
    InjectionRejected,
    /// IPv4 ヘッダーとして読めない送信パケット
    #[error("Malformed outbound packet: {len} bytes")]
    MalformedPacket { len: usize },
    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),
}
