//! MqttInterface wasm-bindgen エクスポート
//!
//! JS ホストから呼び出すトンネルインターフェースの主エントリポイント。
//! MQTT クライアントとローカル IP スタックは JS 側の関数として受け取る。

use std::net::Ipv4Addr;

use js_sys::{Function, Uint8Array};
use log::warn;
use wasm_bindgen::prelude::*;

use mqttif_netif::{DnsServers, Inbound, InterfaceConfig, Interface, NetStack, NetifFlags, NetifInfo, StackError};
use mqttif_transport::{PubSub, TransportError};

/// JS の MQTT クライアント関数を束ねた `PubSub` 実装
struct JsPubSub {
    publish: Function,
    subscribe: Function,
    unsubscribe: Function,
}

impl PubSub for JsPubSub {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        let data = Uint8Array::from(payload);
        self.publish
            .call2(&JsValue::NULL, &JsValue::from_str(topic), &data)
            .map(|_| ())
            .map_err(transport_error)
    }

    fn subscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.subscribe
            .call1(&JsValue::NULL, &JsValue::from_str(topic))
            .map(|_| ())
            .map_err(transport_error)
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<(), TransportError> {
        self.unsubscribe
            .call1(&JsValue::NULL, &JsValue::from_str(topic))
            .map(|_| ())
            .map_err(transport_error)
    }
}

fn transport_error(err: JsValue) -> TransportError {
    TransportError::Rejected(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// ホストへ通知する属性の変更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeUpdate {
    Address(Ipv4Addr),
    Netmask(Ipv4Addr),
    Gateway(Ipv4Addr),
    Mtu(u16),
    Flags(NetifFlags),
    Dns { slot: usize, addr: Option<Ipv4Addr> },
}

/// JS へ渡す属性値（文字列 / 数値 / null）
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeValue {
    Text(String),
    Number(u32),
    Unset,
}

impl AttributeUpdate {
    fn name(&self) -> &'static str {
        match self {
            AttributeUpdate::Address(_) => "address",
            AttributeUpdate::Netmask(_) => "netmask",
            AttributeUpdate::Gateway(_) => "gateway",
            AttributeUpdate::Mtu(_) => "mtu",
            AttributeUpdate::Flags(_) => "flags",
            AttributeUpdate::Dns { .. } => "dns",
        }
    }

    fn value(&self) -> AttributeValue {
        match *self {
            AttributeUpdate::Address(addr)
            | AttributeUpdate::Netmask(addr)
            | AttributeUpdate::Gateway(addr) => AttributeValue::Text(addr.to_string()),
            AttributeUpdate::Mtu(mtu) => AttributeValue::Number(u32::from(mtu)),
            AttributeUpdate::Flags(flags) => AttributeValue::Number(u32::from(flags.bits())),
            AttributeUpdate::Dns { addr: Some(addr), .. } => AttributeValue::Text(addr.to_string()),
            AttributeUpdate::Dns { addr: None, .. } => AttributeValue::Unset,
        }
    }

    fn slot(&self) -> Option<usize> {
        match *self {
            AttributeUpdate::Dns { slot, .. } => Some(slot),
            _ => None,
        }
    }
}

impl From<AttributeValue> for JsValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Text(text) => JsValue::from_str(&text),
            AttributeValue::Number(n) => JsValue::from(n),
            AttributeValue::Unset => JsValue::NULL,
        }
    }
}

type InjectFn = Box<dyn FnMut(&[u8]) -> Result<(), StackError>>;
type UpdateFn = Box<dyn FnMut(AttributeUpdate)>;

/// ホスト側 IP スタック
///
/// パケット注入と属性変更の通知をクロージャに委ねる。
/// 登録はホストが getter を読んで行う。
struct HostStack {
    inject: InjectFn,
    update: UpdateFn,
}

impl HostStack {
    /// JS 関数から構築する。`on_attribute` がなければ属性変更は通知しない
    fn from_js(inject: Function, on_attribute: Option<Function>) -> Self {
        HostStack {
            inject: Box::new(move |packet: &[u8]| js_inject(&inject, packet)),
            update: Box::new(move |update: AttributeUpdate| {
                if let Some(callback) = &on_attribute {
                    js_notify(callback, update);
                }
            }),
        }
    }
}

impl NetStack for HostStack {
    fn register(&mut self, _info: &NetifInfo) -> Result<(), StackError> {
        Ok(())
    }

    fn deregister(&mut self) {}

    fn inject(&mut self, packet: &[u8]) -> Result<(), StackError> {
        (self.inject)(packet)
    }

    fn set_address(&mut self, addr: Ipv4Addr) {
        (self.update)(AttributeUpdate::Address(addr));
    }

    fn set_netmask(&mut self, netmask: Ipv4Addr) {
        (self.update)(AttributeUpdate::Netmask(netmask));
    }

    fn set_gateway(&mut self, gateway: Ipv4Addr) {
        (self.update)(AttributeUpdate::Gateway(gateway));
    }

    fn set_mtu(&mut self, mtu: u16) {
        (self.update)(AttributeUpdate::Mtu(mtu));
    }

    fn set_flags(&mut self, flags: NetifFlags) {
        (self.update)(AttributeUpdate::Flags(flags));
    }

    fn set_dns_server(&mut self, slot: usize, addr: Option<Ipv4Addr>) {
        (self.update)(AttributeUpdate::Dns { slot, addr });
    }
}

fn js_inject(inject: &Function, packet: &[u8]) -> Result<(), StackError> {
    let data = Uint8Array::from(packet);
    match inject.call1(&JsValue::NULL, &data) {
        // 明示的に false を返したときだけ破棄扱い
        Ok(ret) if ret.as_bool() == Some(false) => Err(StackError::Dropped),
        Ok(_) => Ok(()),
        Err(_) => Err(StackError::Dropped),
    }
}

fn js_notify(callback: &Function, update: AttributeUpdate) {
    let name = JsValue::from_str(update.name());
    let value = JsValue::from(update.value());
    let result = match update.slot() {
        Some(slot) => callback.call3(&JsValue::NULL, &name, &value, &JsValue::from(slot as u32)),
        None => callback.call2(&JsValue::NULL, &name, &value),
    };
    if let Err(e) = result {
        warn!("attribute callback for {} failed: {:?}", update.name(), e);
    }
}

fn parse_addr(text: &str) -> Result<Ipv4Addr, JsError> {
    text.parse()
        .map_err(|_| JsError::new(&format!("Invalid IPv4 address: {}", text)))
}

/// MQTT トンネルインターフェース
///
/// ## 内部アーキテクチャ
///
/// ```text
/// MqttInterface
///   ├── Interface    (mqttif-netif) - 状態遷移・送受信経路
///   │     ├── JsPubSub - JS の publish/subscribe/unsubscribe
///   │     └── HostStack - JS の inject と属性変更通知
///   └── DnsServers   (mqttif-netif) - DNS リゾルバーリスト
/// ```
///
/// ## スレッド安全性
///
/// WASM は シングルスレッドのため、`!Send + !Sync` を満たす。
/// JS からは単一スレッドで呼び出される前提。
#[wasm_bindgen]
pub struct MqttInterface {
    inner: Interface<JsPubSub, HostStack>,
    dns: DnsServers,
}

#[wasm_bindgen]
impl MqttInterface {
    /// インターフェースを生成する（Down・未購読）
    ///
    /// # 引数
    /// - `config_json`: `InterfaceConfig` の JSON（`topic_prefix` 必須）
    /// - `publish`: `(topic: string, payload: Uint8Array) => void`
    /// - `subscribe` / `unsubscribe`: `(topic: string) => void`
    /// - `inject`: `(packet: Uint8Array) => boolean | void`
    /// - `on_attribute`（省略可）: `(name: string, value: string | number | null, slot?: number) => void`
    ///   - `name` は `"address"` / `"netmask"` / `"gateway"` / `"mtu"` / `"flags"` / `"dns"`
    ///   - `"dns"` のときだけ `slot` が付き、未設定スロットの `value` は `null`
    ///
    /// # エラー
    /// - 設定 JSON が不正
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        publish: Function,
        subscribe: Function,
        unsubscribe: Function,
        inject: Function,
        on_attribute: Option<Function>,
    ) -> Result<MqttInterface, JsError> {
        let config = InterfaceConfig::from_json(config_json)
            .map_err(|e| JsError::new(&format!("Invalid mqttif config: {}", e)))?;
        let dns = config
            .dns_servers()
            .map_err(|e| JsError::new(&format!("Invalid mqttif config: {}", e)))?;

        let transport = JsPubSub { publish, subscribe, unsubscribe };
        let stack = HostStack::from_js(inject, on_attribute);
        let mut inner = Interface::create(&config, transport, stack)
            .map_err(|e| JsError::new(&format!("mqttif create failed: {}", e)))?;
        inner.apply_dns(&dns);

        Ok(MqttInterface { inner, dns })
    }

    /// 自ノードのアドレスを設定する（購読中なら再購読）
    #[wasm_bindgen(js_name = "setAddress")]
    pub fn set_address(&mut self, addr: &str) -> Result<(), JsError> {
        self.inner.set_address(parse_addr(addr)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setNetmask")]
    pub fn set_netmask(&mut self, netmask: &str) -> Result<(), JsError> {
        self.inner.set_netmask(parse_addr(netmask)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setGateway")]
    pub fn set_gateway(&mut self, gateway: &str) -> Result<(), JsError> {
        self.inner.set_gateway(parse_addr(gateway)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setMtu")]
    pub fn set_mtu(&mut self, mtu: u16) {
        self.inner.set_mtu(mtu);
    }

    /// lwIP の `NETIF_FLAG_*` と同じビット値
    #[wasm_bindgen(js_name = "setFlag")]
    pub fn set_flag(&mut self, flag: u8) {
        self.inner.set_flag(NetifFlags::from_bits(flag));
    }

    #[wasm_bindgen(js_name = "clearFlag")]
    pub fn clear_flag(&mut self, flag: u8) {
        self.inner.clear_flag(NetifFlags::from_bits(flag));
    }

    #[wasm_bindgen]
    pub fn subscribe(&mut self) {
        self.inner.subscribe();
    }

    #[wasm_bindgen]
    pub fn unsubscribe(&mut self) {
        self.inner.unsubscribe();
    }

    #[wasm_bindgen(js_name = "setUp")]
    pub fn set_up(&mut self) {
        self.inner.set_up();
    }

    /// Down にする（購読も解除する）
    #[wasm_bindgen(js_name = "setDown")]
    pub fn set_down(&mut self) {
        self.inner.set_down();
    }

    /// スタックからの送信パケットを publish する
    ///
    /// # エラー
    /// - IPv4 ヘッダーが読めない
    /// - サイズ超過（パケットは破棄）
    /// - publish 関数が例外を投げた
    #[wasm_bindgen]
    pub fn send(&mut self, packet: &[u8]) -> Result<(), JsError> {
        self.inner
            .send(packet)
            .map_err(|e| JsError::new(&format!("mqttif send failed: {}", e)))
    }

    /// ネクストホップ指定で送信する
    #[wasm_bindgen(js_name = "sendTo")]
    pub fn send_to(&mut self, next_hop: &str, packet: &[u8]) -> Result<(), JsError> {
        let next_hop = parse_addr(next_hop)?;
        self.inner
            .send_to(next_hop, packet)
            .map_err(|e| JsError::new(&format!("mqttif send failed: {}", e)))
    }

    /// MQTT クライアントの `message` イベントから呼び出す
    ///
    /// # 戻り値
    /// - `true`: 復号してスタックに渡した
    /// - `false`: 無関係なトピック、またはダウン中
    ///
    /// # エラー
    /// - 短すぎる・認証失敗・スタックが拒否（いずれもパケットは破棄済み）
    #[wasm_bindgen(js_name = "onMessage")]
    pub fn on_message(&mut self, topic: &str, payload: &[u8]) -> Result<bool, JsError> {
        match self.inner.on_message(topic, payload) {
            Ok(Inbound::Delivered { .. }) => Ok(true),
            Ok(Inbound::Ignored) => Ok(false),
            Err(e) => Err(JsError::new(&format!("mqttif receive failed: {}", e))),
        }
    }

    /// DNS サーバーリストを空にする
    #[wasm_bindgen(js_name = "clearDns")]
    pub fn clear_dns(&mut self) {
        self.dns.clear();
        self.inner.apply_dns(&self.dns);
    }

    /// DNS サーバーを追加し、使用したスロット番号を返す
    #[wasm_bindgen(js_name = "addDns")]
    pub fn add_dns(&mut self, addr: &str) -> Result<u32, JsError> {
        let slot = self
            .dns
            .add(parse_addr(addr)?)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        self.inner.apply_dns(&self.dns);
        Ok(slot as u32)
    }

    /// 設定済みの DNS サーバー（ドット区切り文字列の配列）
    #[wasm_bindgen(js_name = "dnsServers")]
    pub fn dns_servers(&self) -> js_sys::Array {
        self.dns
            .servers()
            .map(|addr| JsValue::from_str(&addr.to_string()))
            .collect()
    }

    /// Down・購読解除してインターフェースを破棄する
    #[wasm_bindgen]
    pub fn destroy(self) {
        let _ = self.inner.destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn address(&self) -> String {
        self.inner.address().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn netmask(&self) -> String {
        self.inner.netmask().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn gateway(&self) -> String {
        self.inner.gateway().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mtu(&self) -> u16 {
        self.inner.mtu()
    }

    #[wasm_bindgen(getter)]
    pub fn flags(&self) -> u8 {
        self.inner.flags().bits()
    }

    #[wasm_bindgen(getter, js_name = "isUp")]
    pub fn is_up(&self) -> bool {
        self.inner.is_up()
    }

    #[wasm_bindgen(getter, js_name = "isSubscribed")]
    pub fn is_subscribed(&self) -> bool {
        self.inner.is_subscribed()
    }

    #[wasm_bindgen(getter, js_name = "isEncrypted")]
    pub fn is_encrypted(&self) -> bool {
        self.inner.is_encrypted()
    }

    #[wasm_bindgen(getter, js_name = "receiveTopic")]
    pub fn receive_topic(&self) -> String {
        self.inner.receive_topic().to_string()
    }

    #[wasm_bindgen(getter, js_name = "broadcastTopic")]
    pub fn broadcast_topic(&self) -> String {
        self.inner.broadcast_topic().to_string()
    }

    /// インターフェース統計を JSON 文字列で返す
    ///
    /// # 戻り値
    /// JSON 文字列:
    /// ```json
    /// {
    ///   "tx_packets": 42, "tx_bytes": 61234, "tx_dropped_oversized": 0, "tx_errors": 0,
    ///   "rx_packets": 38, "rx_bytes": 50210, "rx_ignored": 3, "rx_truncated": 0,
    ///   "rx_auth_failures": 1, "rx_injection_rejected": 0
    /// }
    /// ```
    #[wasm_bindgen(js_name = "getStats")]
    pub fn get_stats(&self) -> Result<String, JsError> {
        serde_json::to_string(self.inner.stats())
            .map_err(|e| JsError::new(&format!("Stats serialization failed: {}", e)))
    }
}
