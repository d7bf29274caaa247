//! # mqttif-wasm
//!
//! wasm-bindgen エクスポート：JS ホスト（MQTT.js などの MQTT クライアントと
//! ユーザー空間 IP スタック）から呼び出す公開 API。
//!
//! ## 使用方法（TypeScript）
//!
//! ```typescript
//! import { MqttInterface, init_panic_hook, init_logger } from '../mqttif-wasm-pkg/mqttif_wasm';
//!
//! init_panic_hook();
//! init_logger("info");
//!
//! const iface = new MqttInterface(
//!     JSON.stringify({ topic_prefix: "net", passphrase: "secret", address: "10.0.0.5" }),
//!     (topic, payload) => mqtt.publish(topic, Buffer.from(payload)),
//!     (topic) => mqtt.subscribe(topic),
//!     (topic) => mqtt.unsubscribe(topic),
//!     (packet) => stack.input(packet),   // false を返すと破棄扱い
//!     (name, value, slot) => stack.configure(name, value, slot),  // 省略可
//! );
//!
//! mqtt.on('message', (topic, payload) => iface.onMessage(topic, payload));
//! stack.on('output', (packet) => iface.send(packet));
//!
//! iface.setUp();
//! iface.subscribe();
//! ```

use std::str::FromStr;

use log::LevelFilter;
use wasm_bindgen::prelude::*;

pub mod client;
mod logger;

pub use client::MqttInterface;

/// パニック時にブラウザコンソールにスタックトレースを出力する
///
/// 開発時に必ず呼び出すこと。本番ビルドでは feature flag で無効化可能。
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `log` の出力をコンソールに流す
///
/// # 引数
/// - `level`: `"error"` / `"warn"` / `"info"` / `"debug"` / `"trace"` / `"off"`
#[wasm_bindgen]
pub fn init_logger(level: &str) -> Result<(), JsError> {
    let level = LevelFilter::from_str(level)
        .map_err(|_| JsError::new(&format!("Unknown log level: {}", level)))?;
    if !logger::init(level) {
        log::debug!("console logger already installed, level set to {}", level);
    }
    Ok(())
}
