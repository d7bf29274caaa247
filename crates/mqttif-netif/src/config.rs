//! インターフェース設定
//!
//! ## JSON 形式
//! ```json
//! {
//!   "topic_prefix": "net",
//!   "passphrase": "secret",
//!   "mtu": 1500,
//!   "address": "10.0.0.5",
//!   "netmask": "255.255.255.0",
//!   "gateway": "10.0.0.1",
//!   "dns": ["10.0.0.1"]
//! }
//! ```
//!
//! 必須は `topic_prefix` のみ。`passphrase` が空なら暗号化しない。

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::net::Ipv4Addr;

use mqttif_crypto::BUFFER_CAPACITY;
use serde::Deserialize;

use crate::dns::DnsServers;
use crate::error::ConfigError;
use crate::stack::DEFAULT_MTU;

/// 許容する最小 MTU（IPv4 の最小値）
pub const MIN_MTU: u16 = 68;

fn default_mtu() -> u16 {
    DEFAULT_MTU
}

/// インターフェース設定
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceConfig {
    /// トピックの名前空間
    pub topic_prefix: String,
    /// 共有パスフレーズ（空なら平文）
    #[serde(default)]
    pub passphrase: String,
    #[serde(default = "default_mtu")]
    pub mtu: u16,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub netmask: Option<String>,
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub dns: Vec<String>,
}

/// 検証済みのアドレス設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressConfig {
    pub address: Option<Ipv4Addr>,
    pub netmask: Option<Ipv4Addr>,
    pub gateway: Option<Ipv4Addr>,
}

impl InterfaceConfig {
    /// プレフィックスだけを指定した平文設定
    pub fn new(topic_prefix: &str) -> Self {
        InterfaceConfig {
            topic_prefix: topic_prefix.to_string(),
            passphrase: String::new(),
            mtu: DEFAULT_MTU,
            address: None,
            netmask: None,
            gateway: None,
            dns: Vec::new(),
        }
    }

    /// パスフレーズを設定する
    pub fn with_passphrase(mut self, passphrase: &str) -> Self {
        self.passphrase = passphrase.to_string();
        self
    }

    /// JSON 文字列から読み込んで検証する
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: InterfaceConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 値の範囲を検証する
    pub fn validate(&self) -> Result<(), ConfigError> {
        // MQTT のワイルドカードは publish トピックに使えない
        let prefix = &self.topic_prefix;
        if prefix.is_empty() || prefix.contains(['+', '#', '\0']) {
            return Err(ConfigError::InvalidTopicPrefix(prefix.clone()));
        }
        if self.mtu < MIN_MTU || usize::from(self.mtu) > BUFFER_CAPACITY {
            return Err(ConfigError::InvalidMtu(self.mtu));
        }
        self.addresses()?;
        self.dns_servers()?;
        Ok(())
    }

    /// アドレス・ネットマスク・ゲートウェイを解釈する
    pub fn addresses(&self) -> Result<AddressConfig, ConfigError> {
        Ok(AddressConfig {
            address: parse_optional(&self.address)?,
            netmask: parse_optional(&self.netmask)?,
            gateway: parse_optional(&self.gateway)?,
        })
    }

    /// DNS サーバーリストを組み立てる
    pub fn dns_servers(&self) -> Result<DnsServers, ConfigError> {
        let mut servers = DnsServers::new();
        for entry in &self.dns {
            servers.add(parse_addr(entry)?)?;
        }
        Ok(servers)
    }
}

// パスフレーズをログに出さない
impl core::fmt::Debug for InterfaceConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InterfaceConfig")
            .field("topic_prefix", &self.topic_prefix)
            .field("encrypted", &!self.passphrase.is_empty())
            .field("mtu", &self.mtu)
            .field("address", &self.address)
            .field("netmask", &self.netmask)
            .field("gateway", &self.gateway)
            .field("dns", &self.dns)
            .finish()
    }
}

fn parse_addr(text: &str) -> Result<Ipv4Addr, ConfigError> {
    text.parse().map_err(|_| ConfigError::InvalidAddress(text.to_string()))
}

fn parse_optional(text: &Option<String>) -> Result<Option<Ipv4Addr>, ConfigError> {
    text.as_deref().map(parse_addr).transpose()
}
