//! フレーム Nonce 実装
//!
//! ## Nonce 構造（24バイト）
//! ```text
//! bytes[0..24] = 乱数（XSalsa20 の extended nonce）
//! ```
//!
//! 24 バイトの乱数 nonce なので、同じ鍵で衝突する確率は無視できる。
//! ペイロードの先頭にそのまま載せて送信する。

use crate::error::CryptoError;
use crate::NONCE_SIZE;

/// フレームごとの Nonce（24バイト）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameNonce([u8; NONCE_SIZE]);

impl FrameNonce {
    /// 暗号論的乱数から新しい Nonce を生成する
    ///
    /// # エラー
    /// - `CryptoError::EntropyUnavailable`: 乱数源が使えない
    pub fn generate() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; NONCE_SIZE];
        getrandom::getrandom(&mut bytes).map_err(|_| CryptoError::EntropyUnavailable)?;
        Ok(FrameNonce(bytes))
    }

    /// 受信ペイロードの先頭 24 バイトから Nonce を復元する
    pub fn from_payload_prefix(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < NONCE_SIZE {
            return None;
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&bytes[..NONCE_SIZE]);
        Some(FrameNonce(nonce))
    }

    /// 24 バイトの nonce データへの参照を返す
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}
