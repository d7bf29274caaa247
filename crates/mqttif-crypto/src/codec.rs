//! フレームコーデック（パケット ⇔ MQTT ペイロード）
//!
//! 平文モードと暗号化モードの二つ。どちらを使うかはインスタンス生成時に
//! 鍵の有無で一度だけ決まる。
//!
//! ## 暗号化モードのペイロード構造
//! ```text
//! [nonce: 24bytes][zero: 16bytes][tag: 16bytes][ciphertext: packet_len]
//!                 └──────── block: packet_len + 32 ────────┘
//! ```
//!
//! NaCl の `crypto_secretbox` 出力（先頭 16 バイトがゼロ）と同じ配置。

use alloc::vec::Vec;

use aead::generic_array::GenericArray;
use aead::{AeadInPlace, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;

use crate::error::CryptoError;
use crate::key::TunnelKey;
use crate::nonce::FrameNonce;
use crate::{BOX_ZERO_SIZE, BUFFER_CAPACITY, NONCE_SIZE, TAG_SIZE, ZERO_PAD_SIZE};

/// フレームコーデック
///
/// エンコード用・デコード用の作業バッファを一つずつ持ち、使い回す。
/// `encode`/`decode` は `&mut self` を取り、戻り値はバッファからの借用なので、
/// 同一インスタンスで同時に進行できるのはエンコード 1 件・デコード 1 件まで。
pub struct FrameCodec {
    /// `None` なら平文モード
    cipher: Option<XSalsa20Poly1305>,
    encode_buf: Vec<u8>,
    decode_buf: Vec<u8>,
}

impl FrameCodec {
    /// 鍵の有無でモードを決めてコーデックを生成する
    pub fn new(key: Option<&TunnelKey>) -> Self {
        let cipher = key.map(|k| XSalsa20Poly1305::new(GenericArray::from_slice(k.as_bytes())));
        FrameCodec {
            cipher,
            encode_buf: Vec::with_capacity(NONCE_SIZE + BUFFER_CAPACITY),
            decode_buf: Vec::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// パスフレーズから直接生成する（空文字列なら平文モード）
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self::new(TunnelKey::derive(passphrase).as_ref())
    }

    /// 暗号化モードか
    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// エンコードできるパケットの最大バイト数
    pub fn max_packet_size(&self) -> usize {
        if self.is_encrypted() {
            BUFFER_CAPACITY - ZERO_PAD_SIZE
        } else {
            BUFFER_CAPACITY
        }
    }

    /// パケットを MQTT ペイロードに変換する
    ///
    /// # エラー
    /// - `CryptoError::OversizedPacket`: `max_packet_size()` を超える
    /// - `CryptoError::EntropyUnavailable`: nonce を生成できない
    pub fn encode(&mut self, packet: &[u8]) -> Result<&[u8], CryptoError> {
        let max = self.max_packet_size();
        if packet.len() > max {
            return Err(CryptoError::OversizedPacket { len: packet.len(), max });
        }

        self.encode_buf.clear();
        let cipher = match &self.cipher {
            Some(cipher) => cipher,
            None => {
                self.encode_buf.extend_from_slice(packet);
                return Ok(&self.encode_buf);
            }
        };

        let nonce = FrameNonce::generate()?;
        self.encode_buf.extend_from_slice(nonce.as_bytes());
        // ゼロパディング（先頭 16 バイトはゼロのまま、後半 16 バイトにタグが入る）
        self.encode_buf.resize(NONCE_SIZE + ZERO_PAD_SIZE, 0);
        self.encode_buf.extend_from_slice(packet);

        let tag = cipher
            .encrypt_in_place_detached(
                GenericArray::from_slice(nonce.as_bytes()),
                b"",
                &mut self.encode_buf[NONCE_SIZE + ZERO_PAD_SIZE..],
            )
            .map_err(|_| CryptoError::EncryptionFailed)?;
        self.encode_buf[NONCE_SIZE + BOX_ZERO_SIZE..NONCE_SIZE + ZERO_PAD_SIZE]
            .copy_from_slice(&tag);

        Ok(&self.encode_buf)
    }

    /// MQTT ペイロードをパケットに戻す
    ///
    /// 認証に失敗した場合、部分的な平文は一切返さない。
    ///
    /// # エラー
    /// - `CryptoError::TruncatedMessage`: nonce + ゼロパディングに満たない
    /// - `CryptoError::AuthenticationFailure`: タグ不一致、またはゼロ領域の改ざん
    pub fn decode(&mut self, payload: &[u8]) -> Result<&[u8], CryptoError> {
        self.decode_buf.clear();
        let cipher = match &self.cipher {
            Some(cipher) => cipher,
            None => {
                self.decode_buf.extend_from_slice(payload);
                return Ok(&self.decode_buf);
            }
        };

        let nonce = FrameNonce::from_payload_prefix(payload)
            .ok_or(CryptoError::TruncatedMessage { len: payload.len() })?;
        let block = &payload[NONCE_SIZE..];
        if block.len() < ZERO_PAD_SIZE {
            return Err(CryptoError::TruncatedMessage { len: payload.len() });
        }

        let (zero, rest) = block.split_at(BOX_ZERO_SIZE);
        let (tag, ciphertext) = rest.split_at(TAG_SIZE);
        if zero.iter().any(|&b| b != 0) {
            return Err(CryptoError::AuthenticationFailure);
        }

        self.decode_buf.extend_from_slice(ciphertext);
        let opened = cipher.decrypt_in_place_detached(
            GenericArray::from_slice(nonce.as_bytes()),
            b"",
            &mut self.decode_buf,
            GenericArray::from_slice(tag),
        );
        if opened.is_err() {
            self.decode_buf.clear();
            return Err(CryptoError::AuthenticationFailure);
        }

        Ok(&self.decode_buf)
    }
}
