//! インターフェースコントローラー
//!
//! 一つのトンネル端点の状態（アドレス、フラグ、購読状態、鍵、作業バッファ）を持ち、
//! up/down/subscribe/unsubscribe の遷移と送受信経路を実装する。
//!
//! ## 状態遷移
//!
//! ```text
//!            set_up()                subscribe()
//!   Down ─────────────→ Up     未購読 ─────────────→ 購読中
//!        ←─────────────            ←─────────────
//!           set_down()              unsubscribe() / set_down()
//! ```
//!
//! `up` と購読状態は独立。`set_up()` は購読しない。`set_down()` は購読も解除する。
//!
//! ## スレッド安全性
//!
//! すべての状態変更は `&mut self` を取る。アドレス変更と再購読は
//! 受信処理に対してアトミックで、作業バッファも同時に一つの操作しか使わない。

use core::net::Ipv4Addr;

use log::{debug, info, trace, warn};
use mqttif_crypto::{CryptoError, FrameCodec, TunnelKey};
use mqttif_transport::{PubSub, TopicKind, TopicSet};

use crate::config::InterfaceConfig;
use crate::dns::DnsServers;
use crate::error::NetifError;
use crate::flags::NetifFlags;
use crate::packet;
use crate::stack::{NetStack, NetifInfo, NETIF_NAME};
use crate::stats::InterfaceStats;

/// 受信メッセージの処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// 復号してスタックに渡した
    Delivered { kind: TopicKind, len: usize },
    /// 無関係なトピック、またはダウン中（エラーではない）
    Ignored,
}

/// MQTT トンネルインターフェース
pub struct Interface<T: PubSub, S: NetStack> {
    transport: T,
    stack: S,
    topics: TopicSet,
    codec: FrameCodec,
    netmask: Ipv4Addr,
    gateway: Ipv4Addr,
    mtu: u16,
    flags: NetifFlags,
    up: bool,
    subscribed: bool,
    stats: InterfaceStats,
}

impl<T: PubSub, S: NetStack> Interface<T, S> {
    /// インターフェースを生成してスタックに登録する
    ///
    /// 鍵導出はここで一度だけ行う。生成直後は Down・未購読。
    /// 設定にアドレス類があれば登録後に反映する（DNS は `apply_dns` で別途反映）。
    ///
    /// # エラー
    /// - `NetifError::Config`: 設定が不正
    /// - `NetifError::Registration`: スタックへの登録失敗
    pub fn create(config: &InterfaceConfig, transport: T, mut stack: S) -> Result<Self, NetifError> {
        config.validate()?;
        let addresses = config.addresses()?;

        let key = TunnelKey::derive(&config.passphrase);
        let codec = FrameCodec::new(key.as_ref());
        let topics = TopicSet::new(&config.topic_prefix);

        let flags = NetifFlags::LINK_UP;
        let info = NetifInfo { name: NETIF_NAME, mtu: config.mtu, flags };
        stack.register(&info).map_err(NetifError::Registration)?;

        info!(
            "mqttif {} created: prefix={} mtu={} encrypted={}",
            NETIF_NAME,
            topics.prefix(),
            config.mtu,
            codec.is_encrypted()
        );

        let mut iface = Interface {
            transport,
            stack,
            topics,
            codec,
            netmask: Ipv4Addr::UNSPECIFIED,
            gateway: Ipv4Addr::UNSPECIFIED,
            mtu: config.mtu,
            flags,
            up: false,
            subscribed: false,
            stats: InterfaceStats::default(),
        };

        if let Some(addr) = addresses.address {
            iface.set_address(addr);
        }
        if let Some(netmask) = addresses.netmask {
            iface.set_netmask(netmask);
        }
        if let Some(gateway) = addresses.gateway {
            iface.set_gateway(gateway);
        }

        Ok(iface)
    }

    /// 自ノードのアドレスを変更する
    ///
    /// 受信トピックを再計算し、購読中なら旧トピックを解除して新トピックを購読する。
    /// ブロードキャストトピックと重なる側の解除/購読は行わない
    /// （MQTT の購読は参照カウントされないため）。
    pub fn set_address(&mut self, addr: Ipv4Addr) {
        self.stack.set_address(addr);
        if addr == self.topics.address() {
            return;
        }

        let old = self.topics.readdress(addr);
        debug!("receive topic {} -> {}", old, self.topics.receive());

        if self.subscribed {
            if old != self.topics.broadcast() {
                unsubscribe_topic(&mut self.transport, &old);
            }
            if !self.topics.receive_is_broadcast() {
                subscribe_topic(&mut self.transport, self.topics.receive());
            }
        }
    }

    pub fn set_netmask(&mut self, netmask: Ipv4Addr) {
        self.netmask = netmask;
        self.stack.set_netmask(netmask);
    }

    pub fn set_gateway(&mut self, gateway: Ipv4Addr) {
        self.gateway = gateway;
        self.stack.set_gateway(gateway);
    }

    /// MTU をスタックに通知する（コーデックは MTU を強制しない）
    pub fn set_mtu(&mut self, mtu: u16) {
        if usize::from(mtu) > self.codec.max_packet_size() {
            warn!("mtu {} exceeds frame capacity {}", mtu, self.codec.max_packet_size());
        }
        self.mtu = mtu;
        self.stack.set_mtu(mtu);
    }

    pub fn set_flag(&mut self, flag: NetifFlags) {
        self.flags.insert(flag);
        self.stack.set_flags(self.flags);
    }

    pub fn clear_flag(&mut self, flag: NetifFlags) {
        self.flags.remove(flag);
        self.stack.set_flags(self.flags);
    }

    /// 受信トピックとブロードキャストトピックを購読する
    ///
    /// 購読済みなら何もしない（トランスポート側の重複排除には頼らない）。
    pub fn subscribe(&mut self) {
        if self.subscribed {
            debug!("already subscribed");
            return;
        }
        for topic in self.topics.subscriptions() {
            subscribe_topic(&mut self.transport, topic);
        }
        self.subscribed = true;
        self.set_flag(NetifFlags::LINK_UP);
    }

    /// 二つのトピックの購読を解除する。未購読なら何もしない
    pub fn unsubscribe(&mut self) {
        if !self.subscribed {
            return;
        }
        for topic in self.topics.subscriptions() {
            unsubscribe_topic(&mut self.transport, topic);
        }
        self.subscribed = false;
        self.clear_flag(NetifFlags::LINK_UP);
    }

    /// Up にする（購読はしない）
    pub fn set_up(&mut self) {
        self.up = true;
        self.set_flag(NetifFlags::UP);
        info!("mqttif {} up", NETIF_NAME);
    }

    /// Down にする。購読中なら解除する
    pub fn set_down(&mut self) {
        self.up = false;
        self.clear_flag(NetifFlags::UP);
        self.unsubscribe();
        info!("mqttif {} down", NETIF_NAME);
    }

    /// DNS サーバーリストをスタックに反映する
    pub fn apply_dns(&mut self, servers: &DnsServers) {
        servers.apply(&mut self.stack);
    }

    /// Down にしてスタックから登録解除し、トランスポートとスタックを返す
    ///
    /// トピック文字列と作業バッファはここで解放される。
    pub fn destroy(mut self) -> (T, S) {
        self.set_down();
        self.stack.deregister();
        info!("mqttif {} destroyed", NETIF_NAME);
        (self.transport, self.stack)
    }

    /// IPv4 パケットを宛先アドレスのトピックに送信する
    ///
    /// Up/購読状態には依存しない（ダウン中でも送信できる）。
    ///
    /// # エラー
    /// - `NetifError::MalformedPacket`: IPv4 ヘッダーが読めない
    /// - その他は `send_to` と同じ
    pub fn send(&mut self, packet: &[u8]) -> Result<(), NetifError> {
        let (Some(src), Some(dst)) = (packet::source(packet), packet::destination(packet)) else {
            self.stats.tx_errors += 1;
            return Err(NetifError::MalformedPacket { len: packet.len() });
        };
        trace!("routing {} -> {}", src, dst);
        self.send_to(dst, packet)
    }

    /// スタックが選んだネクストホップのトピックにパケットを送信する
    ///
    /// # エラー
    /// - `NetifError::Crypto(OversizedPacket)`: フレームに収まらない（送信しない）
    /// - `NetifError::Transport`: publish 失敗
    pub fn send_to(&mut self, next_hop: Ipv4Addr, packet: &[u8]) -> Result<(), NetifError> {
        let topic = self.topics.destination(next_hop);

        let payload = match self.codec.encode(packet) {
            Ok(payload) => payload,
            Err(e) => {
                if let CryptoError::OversizedPacket { .. } = e {
                    self.stats.tx_dropped_oversized += 1;
                } else {
                    self.stats.tx_errors += 1;
                }
                warn!("dropping packet to {}: {}", topic, e);
                return Err(e.into());
            }
        };

        if let Err(e) = self.transport.publish(&topic, payload) {
            self.stats.tx_errors += 1;
            warn!("publish to {} failed: {}", topic, e);
            return Err(e.into());
        }

        self.stats.tx_packets += 1;
        self.stats.tx_bytes += packet.len() as u64;
        debug!("sent {} bytes to {}", packet.len(), topic);
        Ok(())
    }

    /// トランスポートからの受信コールバック
    ///
    /// 受信トピックかブロードキャストトピックに完全一致するメッセージだけを受け付け、
    /// 復号してスタックに渡す。
    ///
    /// # エラー
    /// - `NetifError::Crypto`: 短すぎる、または認証失敗（何も注入しない）
    /// - `NetifError::InjectionRejected`: スタックが受け取らなかった（再送なし）
    pub fn on_message(&mut self, topic: &str, payload: &[u8]) -> Result<Inbound, NetifError> {
        let Some(kind) = self.topics.classify(topic) else {
            trace!("ignoring message on {}", topic);
            self.stats.rx_ignored += 1;
            return Ok(Inbound::Ignored);
        };
        if !self.up {
            trace!("interface down, ignoring message on {}", topic);
            self.stats.rx_ignored += 1;
            return Ok(Inbound::Ignored);
        }

        let packet = match self.codec.decode(payload) {
            Ok(packet) => packet,
            Err(e) => {
                match e {
                    CryptoError::AuthenticationFailure => {
                        self.stats.rx_auth_failures += 1;
                        warn!("mqttif decrypt error on {}: {} bytes rejected", topic, payload.len());
                    }
                    CryptoError::TruncatedMessage { len } => {
                        self.stats.rx_truncated += 1;
                        debug!("truncated message on {}: {} bytes", topic, len);
                    }
                    _ => {}
                }
                return Err(e.into());
            }
        };

        if let Err(e) = self.stack.inject(packet) {
            self.stats.rx_injection_rejected += 1;
            warn!("stack rejected {} byte packet: {}", packet.len(), e);
            return Err(NetifError::InjectionRejected);
        }

        let len = packet.len();
        self.stats.rx_packets += 1;
        self.stats.rx_bytes += len as u64;
        debug!("received {} bytes on {}", len, topic);
        Ok(Inbound::Delivered { kind, len })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.topics.address()
    }

    pub fn netmask(&self) -> Ipv4Addr {
        self.netmask
    }

    pub fn gateway(&self) -> Ipv4Addr {
        self.gateway
    }

    pub fn mtu(&self) -> u16 {
        self.mtu
    }

    pub fn flags(&self) -> NetifFlags {
        self.flags
    }

    pub fn is_up(&self) -> bool {
        self.up
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn is_encrypted(&self) -> bool {
        self.codec.is_encrypted()
    }

    pub fn topic_prefix(&self) -> &str {
        self.topics.prefix()
    }

    pub fn receive_topic(&self) -> &str {
        self.topics.receive()
    }

    pub fn broadcast_topic(&self) -> &str {
        self.topics.broadcast()
    }

    pub fn stats(&self) -> &InterfaceStats {
        &self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }
}

// subscribe / unsubscribe は投げっぱなし。失敗はログに残すだけ
fn subscribe_topic<T: PubSub>(transport: &mut T, topic: &str) {
    match transport.subscribe(topic) {
        Ok(()) => debug!("subscribed {}", topic),
        Err(e) => warn!("subscribe {} failed: {}", topic, e),
    }
}

fn unsubscribe_topic<T: PubSub>(transport: &mut T, topic: &str) {
    match transport.unsubscribe(topic) {
        Ok(()) => debug!("unsubscribed {}", topic),
        Err(e) => warn!("unsubscribe {} failed: {}", topic, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StackError;
    use crate::test_support::{ipv4_packet, MemoryStack, RecordingTransport, TransportCall};
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use mqttif_transport::TransportError;

    type TestInterface = Interface<RecordingTransport, MemoryStack>;

    fn create(config: InterfaceConfig) -> TestInterface {
        Interface::create(&config, RecordingTransport::default(), MemoryStack::default()).unwrap()
    }

    fn plain() -> TestInterface {
        create(InterfaceConfig::new("net"))
    }

    fn subscribes(iface: &TestInterface) -> Vec<&str> {
        iface
            .transport()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Subscribe(topic) => Some(topic.as_str()),
                _ => None,
            })
            .collect()
    }

    fn unsubscribes(iface: &TestInterface) -> Vec<&str> {
        iface
            .transport()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Unsubscribe(topic) => Some(topic.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_create_registers_down_and_unsubscribed() {
        let iface = plain();

        assert!(!iface.is_up());
        assert!(!iface.is_subscribed());
        assert!(!iface.is_encrypted());
        assert_eq!(iface.receive_topic(), "net/0.0.0.0");
        assert_eq!(iface.broadcast_topic(), "net/255.255.255.255");

        let info = iface.stack().registered.unwrap();
        assert_eq!(info.name, "mq");
        assert_eq!(info.mtu, 1500);
        assert_eq!(info.flags, NetifFlags::LINK_UP);
        assert!(iface.transport().calls.is_empty());
    }

    #[test]
    fn test_create_surfaces_registration_failure() {
        let stack = MemoryStack { fail_register: true, ..Default::default() };
        let result = Interface::create(&InterfaceConfig::new("net"), RecordingTransport::default(), stack);
        assert!(matches!(
            result,
            Err(NetifError::Registration(StackError::RegistrationFailed(_)))
        ));
    }

    #[test]
    fn test_create_applies_configured_addresses() {
        let config = InterfaceConfig::from_json(
            r#"{"topic_prefix":"net","address":"10.0.0.5","netmask":"255.0.0.0","gateway":"10.0.0.1"}"#,
        )
        .unwrap();
        let iface = create(config);

        assert_eq!(iface.address(), Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(iface.netmask(), Ipv4Addr::new(255, 0, 0, 0));
        assert_eq!(iface.gateway(), Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(iface.stack().address, Some(Ipv4Addr::new(10, 0, 0, 5)));
        assert_eq!(iface.receive_topic(), "net/10.0.0.5");
    }

    #[test]
    fn test_set_address_recomputes_receive_topic() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));

        assert_eq!(iface.receive_topic(), "net/10.0.0.5");
        assert_eq!(iface.broadcast_topic(), "net/255.255.255.255");
        // 未購読なので何も発行しない
        assert!(iface.transport().calls.is_empty());
    }

    #[test]
    fn test_set_address_resubscribes_when_subscribed() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));
        iface.subscribe();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 6));

        assert_eq!(
            iface.transport().calls[2..],
            [
                TransportCall::Unsubscribe("net/10.0.0.5".to_string()),
                TransportCall::Subscribe("net/10.0.0.6".to_string()),
            ]
        );
        assert!(iface.is_subscribed());
    }

    #[test]
    fn test_set_same_address_does_not_resubscribe() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));
        iface.subscribe();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));

        assert_eq!(iface.transport().calls.len(), 2);
    }

    #[test]
    fn test_broadcast_address_subscribes_topic_once() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::BROADCAST);
        iface.subscribe();
        assert_eq!(subscribes(&iface), ["net/255.255.255.255"]);

        iface.unsubscribe();
        assert_eq!(unsubscribes(&iface), ["net/255.255.255.255"]);
    }

    #[test]
    fn test_readdress_to_and_from_broadcast_keeps_broadcast_subscription() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));
        iface.set_up();
        iface.subscribe();

        iface.set_address(Ipv4Addr::BROADCAST);
        iface.set_address(Ipv4Addr::new(10, 0, 0, 6));

        assert_eq!(
            iface.transport().calls[2..],
            [
                TransportCall::Unsubscribe("net/10.0.0.5".to_string()),
                TransportCall::Subscribe("net/10.0.0.6".to_string()),
            ]
        );
        assert!(unsubscribes(&iface).iter().all(|topic| *topic != "net/255.255.255.255"));
        assert!(iface.is_subscribed());

        let pkt = ipv4_packet([10, 0, 0, 9], [255, 255, 255, 255], 28);
        assert_eq!(
            iface.on_message("net/255.255.255.255", &pkt),
            Ok(Inbound::Delivered { kind: TopicKind::Broadcast, len: 28 })
        );
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let mut iface = plain();
        iface.subscribe();
        iface.subscribe();

        assert_eq!(subscribes(&iface), ["net/0.0.0.0", "net/255.255.255.255"]);
        assert!(iface.flags().contains(NetifFlags::LINK_UP));
    }

    #[test]
    fn test_unsubscribe_twice_is_harmless() {
        let mut iface = plain();
        iface.subscribe();
        iface.unsubscribe();
        iface.unsubscribe();

        assert!(!iface.is_subscribed());
        assert_eq!(unsubscribes(&iface), ["net/0.0.0.0", "net/255.255.255.255"]);
        assert!(!iface.flags().contains(NetifFlags::LINK_UP));
    }

    #[test]
    fn test_subscribe_failure_is_logged_not_fatal() {
        let mut iface = plain();
        iface.transport.fail_subscribe = true;
        iface.subscribe();

        assert!(iface.is_subscribed());
        assert_eq!(subscribes(&iface).len(), 2);
    }

    #[test]
    fn test_set_up_does_not_subscribe() {
        let mut iface = plain();
        iface.set_up();

        assert!(iface.is_up());
        assert!(!iface.is_subscribed());
        assert!(iface.flags().contains(NetifFlags::UP));
        assert_eq!(iface.stack().flags, Some(NetifFlags::UP | NetifFlags::LINK_UP));
    }

    #[test]
    fn test_set_down_unsubscribes() {
        let mut iface = plain();
        iface.set_up();
        iface.subscribe();
        iface.set_down();

        assert!(!iface.is_up());
        assert!(!iface.is_subscribed());
        assert_eq!(unsubscribes(&iface).len(), 2);
        assert!(!iface.flags().contains(NetifFlags::UP));
    }

    #[test]
    fn test_attribute_updates_are_forwarded() {
        let mut iface = plain();
        iface.set_netmask(Ipv4Addr::new(255, 255, 255, 0));
        iface.set_gateway(Ipv4Addr::new(10, 0, 0, 1));
        iface.set_mtu(1280);
        iface.set_flag(NetifFlags::BROADCAST);
        iface.clear_flag(NetifFlags::LINK_UP);

        let stack = iface.stack();
        assert_eq!(stack.netmask, Some(Ipv4Addr::new(255, 255, 255, 0)));
        assert_eq!(stack.gateway, Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(stack.mtu, Some(1280));
        assert_eq!(stack.flags, Some(NetifFlags::BROADCAST));
        assert_eq!(iface.mtu(), 1280);
        assert!(iface.transport().calls.is_empty());
    }

    #[test]
    fn test_destroy_tears_down() {
        let mut iface = plain();
        iface.set_up();
        iface.subscribe();
        let (transport, stack) = iface.destroy();

        assert!(stack.deregistered);
        let unsubscribed = transport
            .calls
            .iter()
            .filter(|call| matches!(call, TransportCall::Unsubscribe(_)))
            .count();
        assert_eq!(unsubscribed, 2);
    }

    #[test]
    fn test_send_publishes_to_destination_topic() {
        let mut iface = plain();
        let pkt = ipv4_packet([10, 0, 0, 5], [10, 0, 0, 9], 40);
        iface.send(&pkt).unwrap();

        assert_eq!(
            iface.transport().calls,
            [TransportCall::Publish("net/10.0.0.9".to_string(), pkt.clone())]
        );
        assert_eq!(iface.stats().tx_packets, 1);
        assert_eq!(iface.stats().tx_bytes, 40);
    }

    #[test]
    fn test_send_to_uses_next_hop() {
        let mut iface = plain();
        let pkt = ipv4_packet([10, 0, 0, 5], [192, 168, 0, 1], 20);
        iface.send_to(Ipv4Addr::new(10, 0, 0, 1), &pkt).unwrap();

        assert!(matches!(
            &iface.transport().calls[0],
            TransportCall::Publish(topic, _) if topic == "net/10.0.0.1"
        ));
    }

    #[test]
    fn test_send_while_down_is_allowed() {
        let mut iface = create(InterfaceConfig::new("net").with_passphrase("secret"));
        assert!(!iface.is_up());

        let pkt = ipv4_packet([10, 0, 0, 5], [10, 0, 0, 9], 100);
        iface.send(&pkt).unwrap();

        match &iface.transport().calls[0] {
            TransportCall::Publish(topic, payload) => {
                assert_eq!(topic, "net/10.0.0.9");
                assert_eq!(payload.len(), 100 + mqttif_crypto::FRAME_OVERHEAD);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_send_rejects_non_ipv4_packet() {
        let mut iface = plain();
        let mut pkt = ipv4_packet([10, 0, 0, 5], [10, 0, 0, 9], 40);
        pkt[0] = 0x60;

        assert_eq!(iface.send(&pkt), Err(NetifError::MalformedPacket { len: 40 }));
        assert!(iface.transport().calls.is_empty());
    }

    #[test]
    fn test_send_rejects_malformed_packet() {
        let mut iface = plain();
        let result = iface.send(&[0x45, 0, 0]);

        assert_eq!(result, Err(NetifError::MalformedPacket { len: 3 }));
        assert!(iface.transport().calls.is_empty());
        assert_eq!(iface.stats().tx_errors, 1);
    }

    #[test]
    fn test_send_drops_oversized_packet() {
        let mut iface = create(InterfaceConfig::new("net").with_passphrase("secret"));
        let pkt = ipv4_packet([10, 0, 0, 5], [10, 0, 0, 9], 2040);
        let result = iface.send(&pkt);

        assert!(matches!(
            result,
            Err(NetifError::Crypto(CryptoError::OversizedPacket { len: 2040, .. }))
        ));
        assert!(iface.transport().calls.is_empty());
        assert_eq!(iface.stats().tx_dropped_oversized, 1);
    }

    #[test]
    fn test_send_reports_publish_failure() {
        let mut iface = plain();
        iface.transport.fail_publish = true;
        let pkt = ipv4_packet([10, 0, 0, 5], [10, 0, 0, 9], 20);

        assert_eq!(
            iface.send(&pkt),
            Err(NetifError::Transport(TransportError::Disconnected))
        );
        assert_eq!(iface.stats().tx_errors, 1);
        assert_eq!(iface.stats().tx_packets, 0);
    }

    #[test]
    fn test_on_message_injects_on_receive_and_broadcast() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));
        iface.set_up();

        let pkt = ipv4_packet([10, 0, 0, 9], [10, 0, 0, 5], 32);
        assert_eq!(
            iface.on_message("net/10.0.0.5", &pkt),
            Ok(Inbound::Delivered { kind: TopicKind::Receive, len: 32 })
        );
        assert_eq!(
            iface.on_message("net/255.255.255.255", &pkt),
            Ok(Inbound::Delivered { kind: TopicKind::Broadcast, len: 32 })
        );
        assert_eq!(iface.stack().injected, vec![pkt.clone(), pkt]);
        assert_eq!(iface.stats().rx_packets, 2);
    }

    #[test]
    fn test_on_message_exact_topic_match() {
        let mut iface = create(InterfaceConfig::new("prefix"));
        iface.set_address(Ipv4Addr::new(1, 2, 3, 4));
        iface.set_up();

        for topic in ["prefix/1.2.3.4x", "otherprefix/1.2.3.4", "prefix/1.2.3.", "prefix"] {
            assert_eq!(iface.on_message(topic, b"data"), Ok(Inbound::Ignored), "{}", topic);
        }
        assert!(iface.stack().injected.is_empty());
        assert_eq!(iface.stats().rx_ignored, 4);
    }

    #[test]
    fn test_on_message_ignored_while_down() {
        let mut iface = plain();
        assert_eq!(iface.on_message("net/0.0.0.0", b"data"), Ok(Inbound::Ignored));
        assert!(iface.stack().injected.is_empty());
    }

    #[test]
    fn test_old_receive_topic_rejected_after_readdress() {
        let mut iface = plain();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 5));
        iface.set_up();
        iface.subscribe();
        iface.set_address(Ipv4Addr::new(10, 0, 0, 6));

        assert_eq!(iface.on_message("net/10.0.0.5", b"old"), Ok(Inbound::Ignored));
        assert!(matches!(
            iface.on_message("net/10.0.0.6", b"new"),
            Ok(Inbound::Delivered { kind: TopicKind::Receive, len: 3 })
        ));
        assert_eq!(iface.stack().injected, vec![b"new".to_vec()]);
    }

    #[test]
    fn test_on_message_auth_failure_injects_nothing() {
        let mut iface = create(InterfaceConfig::new("net").with_passphrase("secret"));
        iface.set_up();

        let garbage = vec![0xA5u8; 80];
        assert_eq!(
            iface.on_message("net/255.255.255.255", &garbage),
            Err(NetifError::Crypto(CryptoError::AuthenticationFailure))
        );
        assert!(iface.stack().injected.is_empty());
        assert_eq!(iface.stats().rx_auth_failures, 1);
    }

    #[test]
    fn test_on_message_truncated() {
        let mut iface = create(InterfaceConfig::new("net").with_passphrase("secret"));
        iface.set_up();

        assert_eq!(
            iface.on_message("net/0.0.0.0", &[0u8; 10]),
            Err(NetifError::Crypto(CryptoError::TruncatedMessage { len: 10 }))
        );
        assert_eq!(iface.stats().rx_truncated, 1);
    }

    #[test]
    fn test_on_message_injection_rejected() {
        let mut iface = plain();
        iface.set_up();
        iface.stack.fail_inject = true;

        assert_eq!(
            iface.on_message("net/0.0.0.0", b"data"),
            Err(NetifError::InjectionRejected)
        );
        assert_eq!(iface.stats().rx_injection_rejected, 1);

        // 次のメッセージには影響しない
        iface.stack.fail_inject = false;
        assert!(iface.on_message("net/0.0.0.0", b"data").is_ok());
    }

    #[test]
    fn test_encrypted_loopback_between_instances() {
        let config = InterfaceConfig::new("net").with_passphrase("secret");
        let mut a = create(config.clone());
        let mut b = create(config);
        a.set_address(Ipv4Addr::new(10, 0, 0, 1));
        b.set_address(Ipv4Addr::new(10, 0, 0, 2));
        b.set_up();

        let pkt = ipv4_packet([10, 0, 0, 1], [10, 0, 0, 2], 100);
        a.send(&pkt).unwrap();

        let TransportCall::Publish(topic, payload) = a.transport().calls[0].clone() else {
            panic!("expected publish");
        };
        assert_eq!(b.on_message(&topic, &payload), Ok(Inbound::Delivered { kind: TopicKind::Receive, len: 100 }));
        assert_eq!(b.stack().injected, vec![pkt]);
    }

    #[test]
    fn test_apply_dns() {
        let mut iface = plain();
        let mut servers = DnsServers::new();
        servers.add(Ipv4Addr::new(8, 8, 8, 8)).unwrap();
        iface.apply_dns(&servers);

        assert_eq!(iface.stack().dns, [Some(Ipv4Addr::new(8, 8, 8, 8)), None]);
    }
}
