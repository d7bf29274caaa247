//! # mqttif-crypto
//!
//! MQTT トンネルインターフェースの鍵導出とフレームコーデック。
//! `no_std` + `alloc` 環境（WASM を含む）で動作する。
//!
//! ## 暗号化仕様（NaCl crypto_secretbox 互換）
//!
//! ```text
//! 鍵:
//!   key = SHA-512(passphrase)[0..32]   (passphrase が空なら暗号化なし)
//!
//! MQTT ペイロード:
//!   [nonce: 24bytes][block: packet_len + 32bytes]
//!
//! block:
//!   [zero: 16bytes][poly1305 tag: 16bytes][XSalsa20 ciphertext: packet_len]
//! ```
//!
//! 平文モードではペイロード = パケットそのもの。

#![no_std]
extern crate alloc;

mod codec;
mod error;
mod key;
mod nonce;

pub use codec::FrameCodec;
pub use error::CryptoError;
pub use key::TunnelKey;
pub use nonce::FrameNonce;

/// 鍵長（XSalsa20-Poly1305）
pub const KEY_SIZE: usize = 32;

/// Nonce 長（XSalsa20 extended nonce）
pub const NONCE_SIZE: usize = 24;

/// 平文 block 先頭のゼロパディング長（NaCl の crypto_secretbox_ZEROBYTES）
pub const ZERO_PAD_SIZE: usize = 32;

/// 暗号文 block 先頭のゼロ領域長（NaCl の crypto_secretbox_BOXZEROBYTES）
pub const BOX_ZERO_SIZE: usize = 16;

/// Poly1305 認証タグ長
pub const TAG_SIZE: usize = ZERO_PAD_SIZE - BOX_ZERO_SIZE;

/// 作業バッファ容量（パケット + ゼロパディングの上限）
///
/// トンネルの最大 MTU はここから決まる。
pub const BUFFER_CAPACITY: usize = 2048;

/// 暗号化モードでのペイロードのオーバーヘッド
pub const FRAME_OVERHEAD: usize = NONCE_SIZE + ZERO_PAD_SIZE;
