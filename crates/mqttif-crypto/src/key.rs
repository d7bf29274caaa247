//! パスフレーズからの鍵導出
//!
//! ```text
//! key = SHA-512(passphrase)[0..32]
//! ```
//!
//! C 実装ノード（tweetnacl の crypto_hash + crypto_secretbox）と同じ導出方法。
//! 鍵素材はハッシュ出力であり、パスフレーズそのものではない。

use sha2::{Digest, Sha512};

use crate::KEY_SIZE;

/// トンネルの共有鍵（32バイト）
///
/// インスタンス生成時に一度だけ導出され、以後変更されない。
#[derive(Clone, PartialEq, Eq)]
pub struct TunnelKey([u8; KEY_SIZE]);

impl TunnelKey {
    /// パスフレーズから鍵を導出する
    ///
    /// 空文字列の場合は `None`（平文モード）。
    ///
    /// # 例
    /// ```
    /// use mqttif_crypto::TunnelKey;
    /// assert!(TunnelKey::derive("").is_none());
    /// assert!(TunnelKey::derive("secret").is_some());
    /// ```
    pub fn derive(passphrase: &str) -> Option<Self> {
        if passphrase.is_empty() {
            return None;
        }

        let digest = Sha512::digest(passphrase.as_bytes());
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest[..KEY_SIZE]);
        Some(TunnelKey(key))
    }

    /// 32 バイトの raw 鍵から構築する
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        TunnelKey(key)
    }

    /// 鍵バイト列への参照を返す
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

// 鍵素材をログに出さない
impl core::fmt::Debug for TunnelKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TunnelKey(..)")
    }
}
