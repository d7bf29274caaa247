//! `log` の出力先をブラウザ / Node.js のコンソールにする

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}: {}", record.level(), record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// コンソールロガーを設定する
///
/// 2 回目以降の呼び出しはレベルの変更だけ行う。
///
/// # 戻り値
/// 今回ロガーを新たに登録したら `true`
pub fn init(level: LevelFilter) -> bool {
    let installed = match log::set_logger(&LOGGER) {
        Ok(()) => true,
        // `SetLoggerError` は登録済みの場合にしか返らない
        Err(_already_set) => false,
    };
    log::set_max_level(level);
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    // Off のままにしておく（ネイティブではコンソールに書けない）
    #[test]
    fn test_second_init_only_updates_level() {
        init(LevelFilter::Off);
        let second = init(LevelFilter::Off);

        assert!(!second);
        assert_eq!(log::max_level(), LevelFilter::Off);
    }
}
