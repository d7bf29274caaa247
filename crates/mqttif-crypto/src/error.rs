//! 暗号エラー型

use thiserror::Error;

/// フレームのエンコード/デコードのエラー
///
/// いずれもインスタンスにとって致命的ではなく、該当パケットを破棄するだけで済む。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// パケット + ゼロパディングが作業バッファに収まらない（送信しない）
    #[error("Oversized packet: {len} bytes (max {max})")]
    OversizedPacket { len: usize, max: usize },
    /// 受信ペイロードが nonce + ゼロパディングより短い
    #[error("Truncated message: {len} bytes")]
    TruncatedMessage { len: usize },
    /// 復号に失敗（認証タグ検証失敗を含む）
    #[error("Authentication failure (tag mismatch or corrupted frame)")]
    AuthenticationFailure,
    /// 暗号化に失敗
    #[error("Encryption failed")]
    EncryptionFailed,
    /// 乱数源から nonce を取得できない
    #[error("Entropy source unavailable")]
    EntropyUnavailable,
}
