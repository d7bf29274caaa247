//! インターフェース統計

use serde::Serialize;

/// 送受信カウンタ
///
/// ホストへは JSON で渡す（`serde_json::to_string`）。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceStats {
    /// publish したパケット数
    pub tx_packets: u64,
    /// publish したパケットのバイト数（カプセル化前）
    pub tx_bytes: u64,
    /// サイズ超過で送らなかったパケット数
    pub tx_dropped_oversized: u64,
    /// その他の送信エラー（不正パケット、publish 失敗）
    pub tx_errors: u64,
    /// スタックに渡したパケット数
    pub rx_packets: u64,
    /// スタックに渡したパケットのバイト数
    pub rx_bytes: u64,
    /// 無関係なトピック、またはダウン中に届いたメッセージ数
    pub rx_ignored: u64,
    /// 短すぎるメッセージ数
    pub rx_truncated: u64,
    /// 認証に失敗したメッセージ数
    pub rx_auth_failures: u64,
    /// スタックが受け取らなかったパケット数
    pub rx_injection_rejected: u64,
}
