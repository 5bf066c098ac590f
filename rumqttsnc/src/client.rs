//! The client core: externally invoked operations, the inbound datagram
//! dispatcher and the periodic `process` driver. All of it runs on the
//! host's thread; nothing here blocks or suspends.

use crate::pending::{PendingEntry, PendingQueue};
use crate::state::Session;
use crate::transport::{Clock, PacketSocket};
use crate::{
    AckCode, ClientError, ClientState, DisconnectReason, MqttSnOptions, RegisterCallback,
    SubscribeCallback, UnsubscribeCallback,
};

use bytes::{Bytes, BytesMut};
use mqttsnbytes::{
    check, Advertise, ConnAck, Connect, Disconnect, GwInfo, Packet, PingReq, PingResp, PubAck,
    Publish, QoS, RegAck, Register, ReturnCode, SearchGw, SubAck, Subscribe, TopicFilter, TopicId,
    UnsubAck, Unsubscribe,
};
use std::net::Ipv6Addr;

/// Largest frame the client accepts or produces
const MAX_PACKET_SIZE: usize = 255;
/// Smallest decodable frame: length octet + message type octet
const MIN_PACKET_SIZE: usize = 2;
/// Seconds the proactive ping runs ahead of the announced keep alive
const KEEP_ALIVE_DELAY: u16 = 5;

/// MQTT-SN client over a host provided UDP socket and clock.
///
/// Drive it from three places, all on one thread: the operation methods,
/// [`receive`](Self::receive) for every inbound datagram, and
/// [`process`](Self::process) on a periodic tick of a second or less.
pub struct MqttSnClient<S, C> {
    socket: S,
    clock: C,
    /// Session configuration, present once `connect` was called
    options: Option<MqttSnOptions>,
    session: Session,
    subscribe_queue: PendingQueue<SubscribeCallback>,
    register_queue: PendingQueue<RegisterCallback>,
    unsubscribe_queue: PendingQueue<UnsubscribeCallback>,
    on_connected: Option<Box<dyn FnMut(ReturnCode)>>,
    on_publish_received: Option<Box<dyn FnMut(Bytes, QoS, u16)>>,
    on_advertise: Option<Box<dyn FnMut(Ipv6Addr, u16, u8, u16)>>,
    on_search_gw: Option<Box<dyn FnMut(Ipv6Addr, u16, u8)>>,
    on_published: Option<Box<dyn FnMut(AckCode, u16)>>,
    on_disconnected: Option<Box<dyn FnMut(DisconnectReason)>>,
}

impl<S: PacketSocket, C: Clock> MqttSnClient<S, C> {
    pub fn new(socket: S, clock: C) -> MqttSnClient<S, C> {
        MqttSnClient {
            socket,
            clock,
            options: None,
            session: Session::new(),
            subscribe_queue: PendingQueue::new(|callback: SubscribeCallback| {
                callback(AckCode::Timeout, 0)
            }),
            register_queue: PendingQueue::new(|callback: RegisterCallback| {
                callback(AckCode::Timeout, 0)
            }),
            unsubscribe_queue: PendingQueue::new(|callback: UnsubscribeCallback| {
                callback(AckCode::Timeout)
            }),
            on_connected: None,
            on_publish_received: None,
            on_advertise: None,
            on_search_gw: None,
            on_published: None,
            on_disconnected: None,
        }
    }

    /// Opens and binds the socket
    pub fn start(&mut self, port: u16) -> Result<(), ClientError> {
        self.socket.open()?;
        self.socket.bind(port)?;
        Ok(())
    }

    /// Closes the socket and tears the session down. Every pending request
    /// is failed with a timeout, then the disconnected callback reports
    /// [`DisconnectReason::Client`].
    pub fn stop(&mut self) -> Result<(), ClientError> {
        self.socket.close()?;

        if self.session.state != ClientState::Disconnected
            && self.session.state != ClientState::Lost
        {
            self.teardown();
            self.session.state = ClientState::Disconnected;
            if let Some(callback) = self.on_disconnected.as_mut() {
                callback(DisconnectReason::Client);
            }
        }

        Ok(())
    }

    pub fn state(&self) -> ClientState {
        self.session.state
    }

    /// Opens a session with the gateway named in `options`. The reply is
    /// asynchronous: CONNACK fires the connected callback and moves the
    /// client to [`ClientState::Active`].
    pub fn connect(&mut self, options: MqttSnOptions) -> Result<(), ClientError> {
        self.session.require(&[
            ClientState::Disconnected,
            ClientState::Lost,
            ClientState::Asleep,
            ClientState::Awake,
        ])?;

        let mut connect = Connect::new(options.client_id.as_str());
        connect.duration = options.keep_alive;
        connect.clean_session = options.clean_session;

        let keep_alive = options.keep_alive;
        let gw_timeout = gateway_timeout_millis(&options);
        self.options = Some(options);
        self.send_to_gateway(&Packet::Connect(connect))?;

        debug!("Connect. Keep alive = {}s", keep_alive);
        let now = self.clock.now_millis();
        self.session.disconnect_requested = false;
        self.session.sleep_requested = false;
        self.session.gw_deadline = now.wrapping_add(gw_timeout);
        self.session.ping_deadline = now.wrapping_add(u32::from(keep_alive) * 1000);
        Ok(())
    }

    /// Subscribes to a full topic name at QoS 0. The callback resolves with
    /// the granted topic id, or [`AckCode::Timeout`] and topic id 0.
    pub fn subscribe(
        &mut self,
        topic: impl Into<String>,
        qos: QoS,
        callback: impl FnOnce(AckCode, u16) + 'static,
    ) -> Result<(), ClientError> {
        self.session.require(&[ClientState::Active])?;
        if qos != QoS::AtMostOnce {
            return Err(ClientError::NotImplemented);
        }

        let packet_id = self.session.next_packet_id();
        admit(&self.subscribe_queue, packet_id, self.max_pending())?;

        let topic = topic.into();
        debug!("Subscribe. Topic = {}, Pkid = {}", topic, packet_id);
        let subscribe = Subscribe::new(packet_id, topic, qos);
        let frame = self.send_to_gateway(&Packet::Subscribe(subscribe))?;
        let callback: SubscribeCallback = Box::new(callback);
        let entry = self.pending_entry(packet_id, frame, callback);
        self.subscribe_queue.push(entry);
        Ok(())
    }

    /// Asks the gateway for the topic id of a name this client publishes
    /// to. The callback resolves with the assigned id.
    pub fn register(
        &mut self,
        topic: impl Into<String>,
        callback: impl FnOnce(AckCode, u16) + 'static,
    ) -> Result<(), ClientError> {
        self.session.require(&[ClientState::Active])?;

        let packet_id = self.session.next_packet_id();
        admit(&self.register_queue, packet_id, self.max_pending())?;

        let topic = topic.into();
        debug!("Register. Topic = {}, Pkid = {}", topic, packet_id);
        let register = Register::new(packet_id, topic);
        let frame = self.send_to_gateway(&Packet::Register(register))?;
        let callback: RegisterCallback = Box::new(callback);
        let entry = self.pending_entry(packet_id, frame, callback);
        self.register_queue.push(entry);
        Ok(())
    }

    /// Publishes a payload at QoS 0 under a topic id obtained from
    /// [`register`](Self::register) or [`subscribe`](Self::subscribe).
    /// Fire and forget: nothing is queued and no callback resolves.
    pub fn publish(
        &mut self,
        topic_id: u16,
        qos: QoS,
        payload: impl Into<Bytes>,
    ) -> Result<(), ClientError> {
        self.session.require(&[ClientState::Active])?;
        if qos != QoS::AtMostOnce {
            return Err(ClientError::NotImplemented);
        }

        let mut publish = Publish::new(TopicId::Normal(topic_id), qos, payload.into());
        publish.msg_id = self.session.next_packet_id();

        debug!(
            "Publish. Topic id = {}, Payload Size = {}",
            topic_id,
            publish.payload.len()
        );
        self.send_to_gateway(&Packet::Publish(publish))?;
        Ok(())
    }

    /// Drops the subscription behind a gateway assigned topic id
    pub fn unsubscribe(
        &mut self,
        topic_id: u16,
        callback: impl FnOnce(AckCode) + 'static,
    ) -> Result<(), ClientError> {
        self.session.require(&[ClientState::Active])?;

        let packet_id = self.session.next_packet_id();
        admit(&self.unsubscribe_queue, packet_id, self.max_pending())?;

        debug!("Unsubscribe. Topic id = {}, Pkid = {}", topic_id, packet_id);
        let unsubscribe = Unsubscribe::new(packet_id, TopicFilter::Id(topic_id));
        let frame = self.send_to_gateway(&Packet::Unsubscribe(unsubscribe))?;
        let callback: UnsubscribeCallback = Box::new(callback);
        let entry = self.pending_entry(packet_id, frame, callback);
        self.unsubscribe_queue.push(entry);
        Ok(())
    }

    /// Asks the gateway to end the session. The confirming DISCONNECT
    /// fires the disconnected callback with [`DisconnectReason::Server`].
    pub fn disconnect(&mut self) -> Result<(), ClientError> {
        self.session.require(&[
            ClientState::Active,
            ClientState::Awake,
            ClientState::Asleep,
        ])?;

        debug!("Disconnect");
        self.send_to_gateway(&Packet::Disconnect(Disconnect::new()))?;

        self.session.disconnect_requested = true;
        self.arm_gw_deadline();
        Ok(())
    }

    /// Asks the gateway to park the session for `duration` seconds. The
    /// confirming DISCONNECT moves the client to [`ClientState::Asleep`].
    pub fn sleep(&mut self, duration: u16) -> Result<(), ClientError> {
        self.session.require(&[
            ClientState::Active,
            ClientState::Awake,
            ClientState::Asleep,
        ])?;

        debug!("Sleep. Duration = {}s", duration);
        self.send_to_gateway(&Packet::Disconnect(Disconnect::with_duration(duration)))?;

        self.session.sleep_requested = true;
        self.arm_gw_deadline();
        Ok(())
    }

    /// Wakes a sleeping session so the gateway flushes held messages. The
    /// gateway ends the drain with PINGRESP, which puts the client back to
    /// sleep; `timeout` seconds without it and the session counts as lost.
    pub fn awake(&mut self, timeout: u16) -> Result<(), ClientError> {
        self.session.require(&[ClientState::Awake, ClientState::Asleep])?;

        self.send_pingreq()?;

        debug!("Awake. Timeout = {}s", timeout);
        self.session.state = ClientState::Awake;
        let now = self.clock.now_millis();
        self.session.gw_deadline = now.wrapping_add(u32::from(timeout) * 1000);
        Ok(())
    }

    /// Multicasts SEARCHGW with the given hop radius. Answering gateways
    /// surface through the search callback.
    pub fn search_gateway(
        &mut self,
        addr: Ipv6Addr,
        port: u16,
        radius: u8,
    ) -> Result<(), ClientError> {
        debug!("Search gateway. Radius = {}", radius);
        self.send_frame(&Packet::SearchGw(SearchGw::new(radius)), addr, port, radius)?;
        Ok(())
    }

    /// Periodic driver. Emits the keep alive ping, detects gateway loss and
    /// sweeps the pending queues, in that order.
    pub fn process(&mut self) -> Result<(), ClientError> {
        let now = self.clock.now_millis();

        // Proactive ping, only meaningful while the session is active
        if self.session.state == ClientState::Active
            && self.session.ping_deadline != 0
            && self.session.ping_deadline <= now
        {
            self.send_pingreq()?;
            self.arm_gw_deadline();
        }

        // Gateway liveness
        if self.session.gw_deadline != 0 && self.session.gw_deadline <= now {
            warn!("Gateway stopped answering, session lost");
            self.teardown();
            self.session.state = ClientState::Lost;
            if let Some(callback) = self.on_disconnected.as_mut() {
                callback(DisconnectReason::Timeout);
            }
        }

        // Pending request timeouts
        let retry_limit = self
            .options
            .as_ref()
            .map_or(0, |options| options.max_retransmissions);
        let Self {
            socket,
            subscribe_queue,
            register_queue,
            unsubscribe_queue,
            ..
        } = self;
        subscribe_queue.handle_tick(now, retry_limit, |entry| resend(socket, entry));
        register_queue.handle_tick(now, retry_limit, |entry| resend(socket, entry));
        unsubscribe_queue.handle_tick(now, retry_limit, |entry| resend(socket, entry));

        Ok(())
    }

    /// Inbound datagram entry point. Malformed frames, frames from anyone
    /// but the configured gateway and acks nobody asked for are dropped
    /// without side effects.
    pub fn receive(&mut self, datagram: &[u8], addr: Ipv6Addr, port: u16) {
        if datagram.len() < MIN_PACKET_SIZE || datagram.len() > MAX_PACKET_SIZE {
            warn!("Dropping datagram of {} octets", datagram.len());
            return;
        }

        let frame_length = match check(datagram, MAX_PACKET_SIZE) {
            Ok(fixed_header) => fixed_header.frame_length(),
            Err(e) => {
                warn!("Dropping undecodable datagram: {}", e);
                return;
            }
        };
        if frame_length != datagram.len() {
            warn!(
                "Dropping datagram: declared {} octets, received {}",
                frame_length,
                datagram.len()
            );
            return;
        }

        let packet = match mqttsnbytes::read(&mut BytesMut::from(datagram), MAX_PACKET_SIZE) {
            Ok(packet) => packet,
            Err(e) => {
                warn!("Dropping undecodable datagram: {}", e);
                return;
            }
        };

        // Everything except gateway discovery and the gateway's own ping
        // must come from the configured gateway
        match &packet {
            Packet::Advertise(_) | Packet::GwInfo(_) | Packet::PingReq(_) => {}
            _ => {
                if !self.is_gateway(addr, port) {
                    trace!("Ignoring {:?} from {}:{}", packet, addr, port);
                    return;
                }
            }
        }

        match packet {
            Packet::ConnAck(connack) => self.handle_connack(connack),
            Packet::SubAck(suback) => self.handle_suback(suback),
            Packet::RegAck(regack) => self.handle_regack(regack),
            Packet::PubAck(puback) => self.handle_puback(puback),
            Packet::UnsubAck(unsuback) => self.handle_unsuback(unsuback),
            Packet::Publish(publish) => self.handle_publish(publish),
            Packet::PingReq(_) => self.handle_pingreq(addr, port),
            Packet::PingResp(_) => self.handle_pingresp(),
            Packet::Disconnect(disconnect) => self.handle_disconnect(disconnect),
            Packet::Advertise(advertise) => self.handle_advertise(advertise, addr, port),
            Packet::GwInfo(gwinfo) => self.handle_gwinfo(gwinfo, addr, port),
            packet => trace!("Ignoring unexpected {:?}", packet),
        }
    }

    /// Called when the gateway accepts or refuses the connection
    pub fn on_connected(&mut self, callback: impl FnMut(ReturnCode) + 'static) {
        self.on_connected = Some(Box::new(callback));
    }

    /// Called with (payload, qos, topic id) for every inbound publish
    pub fn on_publish_received(&mut self, callback: impl FnMut(Bytes, QoS, u16) + 'static) {
        self.on_publish_received = Some(Box::new(callback));
    }

    /// Called with (address, port, gateway id, duration) on ADVERTISE
    pub fn on_advertise(&mut self, callback: impl FnMut(Ipv6Addr, u16, u8, u16) + 'static) {
        self.on_advertise = Some(Box::new(callback));
    }

    /// Called with (address, port, gateway id) when a gateway answers a
    /// search
    pub fn on_search_gw(&mut self, callback: impl FnMut(Ipv6Addr, u16, u8) + 'static) {
        self.on_search_gw = Some(Box::new(callback));
    }

    /// Called with (code, topic id) when the gateway acks or rejects a
    /// publish
    pub fn on_published(&mut self, callback: impl FnMut(AckCode, u16) + 'static) {
        self.on_published = Some(Box::new(callback));
    }

    /// Called with the reason whenever the session ends or goes to sleep
    pub fn on_disconnected(&mut self, callback: impl FnMut(DisconnectReason) + 'static) {
        self.on_disconnected = Some(Box::new(callback));
    }

    fn handle_connack(&mut self, connack: ConnAck) {
        debug!("ConnAck. Code = {:?}", connack.code);
        self.session.state = ClientState::Active;
        self.session.gw_deadline = 0;

        // Start the keep alive schedule of the fresh session; an idle
        // client must still ping ahead of the gateway's expiry window
        if let Some(options) = &self.options {
            let now = self.clock.now_millis();
            let keep_alive = options.keep_alive.saturating_sub(KEEP_ALIVE_DELAY);
            self.session.ping_deadline = now.wrapping_add(u32::from(keep_alive) * 1000);
        }

        if let Some(callback) = self.on_connected.as_mut() {
            callback(connack.code);
        }
    }

    fn handle_suback(&mut self, suback: SubAck) {
        if self.session.state != ClientState::Active {
            return;
        }

        match self.subscribe_queue.take(suback.msg_id) {
            Some(entry) => {
                debug!("SubAck. Pkid = {}, Topic id = {}", suback.msg_id, suback.topic_id);
                (entry.callback)(suback.code.into(), suback.topic_id);
            }
            None => trace!("Ignoring unsolicited suback pkid {}", suback.msg_id),
        }
    }

    fn handle_regack(&mut self, regack: RegAck) {
        if self.session.state != ClientState::Active {
            return;
        }

        match self.register_queue.take(regack.msg_id) {
            Some(entry) => {
                debug!("RegAck. Pkid = {}, Topic id = {}", regack.msg_id, regack.topic_id);
                (entry.callback)(regack.code.into(), regack.topic_id);
            }
            None => trace!("Ignoring unsolicited regack pkid {}", regack.msg_id),
        }
    }

    fn handle_puback(&mut self, puback: PubAck) {
        if self.session.state != ClientState::Active {
            return;
        }

        debug!("PubAck. Code = {:?}, Topic id = {}", puback.code, puback.topic_id);
        if let Some(callback) = self.on_published.as_mut() {
            callback(puback.code.into(), puback.topic_id);
        }
    }

    fn handle_unsuback(&mut self, unsuback: UnsubAck) {
        if self.session.state != ClientState::Active {
            return;
        }

        match self.unsubscribe_queue.take(unsuback.msg_id) {
            Some(entry) => {
                debug!("UnsubAck. Pkid = {}", unsuback.msg_id);
                (entry.callback)(AckCode::Accepted);
            }
            None => trace!("Ignoring unsolicited unsuback pkid {}", unsuback.msg_id),
        }
    }

    fn handle_publish(&mut self, publish: Publish) {
        if self.session.state != ClientState::Active && self.session.state != ClientState::Awake {
            return;
        }

        let topic_id = match publish.topic {
            TopicId::Normal(id) | TopicId::Predefined(id) => id,
            TopicId::Short(name) => u16::from_be_bytes(name),
        };

        if let Some(callback) = self.on_publish_received.as_mut() {
            callback(publish.payload, publish.qos, topic_id);
        }
    }

    fn handle_pingreq(&mut self, addr: Ipv6Addr, port: u16) {
        if self.session.state != ClientState::Active {
            return;
        }

        if let Err(e) = self.send_frame(&Packet::PingResp(PingResp), addr, port, 0) {
            warn!("Failed to answer pingreq: {}", e);
        }
    }

    fn handle_pingresp(&mut self) {
        self.session.gw_deadline = 0;

        if self.session.state == ClientState::Awake {
            debug!("PingResp, wake window over, back to sleep");
            self.session.state = ClientState::Asleep;
            if let Some(callback) = self.on_disconnected.as_mut() {
                callback(DisconnectReason::Asleep);
            }
        }
    }

    fn handle_disconnect(&mut self, disconnect: Disconnect) {
        match self.session.state {
            ClientState::Active | ClientState::Awake | ClientState::Asleep => {}
            _ => return,
        }

        debug!("Disconnect from gateway. Duration = {:?}", disconnect.duration);

        // Intent decides the outcome, so read it before teardown clears it
        let (state, reason) = if self.session.sleep_requested {
            (ClientState::Asleep, DisconnectReason::Asleep)
        } else {
            (ClientState::Disconnected, DisconnectReason::Server)
        };

        self.teardown();
        self.session.state = state;
        if let Some(callback) = self.on_disconnected.as_mut() {
            callback(reason);
        }
    }

    fn handle_advertise(&mut self, advertise: Advertise, addr: Ipv6Addr, port: u16) {
        if let Some(callback) = self.on_advertise.as_mut() {
            callback(addr, port, advertise.gw_id, advertise.duration);
        }
    }

    fn handle_gwinfo(&mut self, gwinfo: GwInfo, addr: Ipv6Addr, port: u16) {
        // An empty address field means the gateway itself answered; another
        // client's answer carries the gateway's address instead
        let gateway_addr = if gwinfo.gw_addr.is_empty() {
            addr
        } else {
            match <[u8; 16]>::try_from(&gwinfo.gw_addr[..]) {
                Ok(octets) => Ipv6Addr::from(octets),
                Err(_) => {
                    trace!("Ignoring gwinfo with {} octet address", gwinfo.gw_addr.len());
                    return;
                }
            }
        };

        if let Some(callback) = self.on_search_gw.as_mut() {
            callback(gateway_addr, port, gwinfo.gw_id);
        }
    }

    /// True when the sender is the gateway this session is bound to
    fn is_gateway(&self, addr: Ipv6Addr, port: u16) -> bool {
        match &self.options {
            Some(options) => options.gateway_addr == addr && options.gateway_port == port,
            None => false,
        }
    }

    fn max_pending(&self) -> usize {
        self.options.as_ref().map_or(0, |options| options.max_pending)
    }

    fn pending_entry<F>(&mut self, packet_id: u16, frame: Bytes, callback: F) -> PendingEntry<F> {
        // The operations that enqueue all require an established session,
        // so options are present here
        let (addr, port, timeout) = match &self.options {
            Some(options) => (
                options.gateway_addr,
                options.gateway_port,
                gateway_timeout_millis(options),
            ),
            None => (Ipv6Addr::UNSPECIFIED, 0, 0),
        };

        PendingEntry {
            addr,
            port,
            packet_id,
            timestamp: self.clock.now_millis(),
            timeout,
            retransmissions: 0,
            callback,
            frame,
        }
    }

    fn send_pingreq(&mut self) -> Result<(), ClientError> {
        let pingreq = match &self.options {
            Some(options) => PingReq::with_client_id(options.client_id.as_str()),
            None => return Err(ClientError::InvalidState(self.session.state)),
        };

        debug!("Pingreq");
        self.send_to_gateway(&Packet::PingReq(pingreq))?;
        Ok(())
    }

    fn arm_gw_deadline(&mut self) {
        if let Some(options) = &self.options {
            let timeout = gateway_timeout_millis(options);
            self.session.gw_deadline = self.clock.now_millis().wrapping_add(timeout);
        }
    }

    fn send_to_gateway(&mut self, packet: &Packet) -> Result<Bytes, ClientError> {
        let (addr, port) = match &self.options {
            Some(options) => (options.gateway_addr, options.gateway_port),
            None => return Err(ClientError::InvalidState(self.session.state)),
        };

        self.send_frame(packet, addr, port, 0)
    }

    /// Encodes and sends one frame, returning the bytes that went out so a
    /// pending entry can keep its verbatim copy. Any send while the session
    /// is active pushes the next keep alive ping out.
    fn send_frame(
        &mut self,
        packet: &Packet,
        addr: Ipv6Addr,
        port: u16,
        hop_limit: u8,
    ) -> Result<Bytes, ClientError> {
        let mut buffer = BytesMut::with_capacity(MAX_PACKET_SIZE);
        packet.write(&mut buffer)?;
        if buffer.len() > MAX_PACKET_SIZE {
            return Err(ClientError::Codec(mqttsnbytes::Error::PayloadTooLong));
        }

        let frame = buffer.freeze();
        self.socket.send_to(&frame, addr, port, hop_limit)?;

        if self.session.state == ClientState::Active {
            if let Some(options) = &self.options {
                let keep_alive = options.keep_alive.saturating_sub(KEEP_ALIVE_DELAY);
                self.session.ping_deadline = self
                    .clock
                    .now_millis()
                    .wrapping_add(u32::from(keep_alive) * 1000);
            }
        }

        Ok(frame)
    }

    /// Housekeeping shared by every session ending: intents and timers are
    /// cleared and every pending request is failed with a timeout
    fn teardown(&mut self) {
        self.session.clear_for_teardown();
        self.subscribe_queue.force_timeout();
        self.register_queue.force_timeout();
        self.unsubscribe_queue.force_timeout();
    }
}

fn gateway_timeout_millis(options: &MqttSnOptions) -> u32 {
    u32::from(options.gateway_timeout) * 1000
}

fn admit<F>(queue: &PendingQueue<F>, packet_id: u16, limit: usize) -> Result<(), ClientError> {
    if queue.len() >= limit {
        return Err(ClientError::NoBuffers);
    }
    if queue.contains(packet_id) {
        return Err(ClientError::PacketIdInUse(packet_id));
    }
    Ok(())
}

fn resend<S: PacketSocket, F>(socket: &mut S, entry: &PendingEntry<F>) -> bool {
    match socket.send_to(&entry.frame, entry.addr, entry.port, 0) {
        Ok(()) => {
            debug!("Resent request pkid {}", entry.packet_id);
            true
        }
        Err(e) => {
            warn!("Resend of pkid {} failed: {}", entry.packet_id, e);
            false
        }
    }
}
