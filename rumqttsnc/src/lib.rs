//! A pure rust MQTT-SN client for constrained nodes talking to a gateway
//! over a low power UDP mesh. The client is caller driven: there is no
//! runtime and nothing blocks. The host owns the socket and the clock,
//! feeds inbound datagrams into [`MqttSnClient::receive`] and calls
//! [`MqttSnClient::process`] periodically to advance timers.
//!
//! Connect, subscribe and publish at QoS 0
//! ----------------------------
//!
//! ```no_run
//! use rumqttsnc::{MqttSnClient, MqttSnOptions, QoS, StdClock};
//! # use rumqttsnc::PacketSocket;
//! # fn run(socket: impl PacketSocket) -> Result<(), Box<dyn std::error::Error>> {
//! let options = MqttSnOptions::builder()
//!     .gateway_addr("fd00::1".parse()?)
//!     .gateway_port(10000)
//!     .client_id("node-7".parse()?)
//!     .keep_alive(60)
//!     .gateway_timeout(10)
//!     .build();
//!
//! let mut client = MqttSnClient::new(socket, StdClock::new());
//! client.on_connected(|code| println!("connected: {:?}", code));
//! client.on_publish_received(|payload, _qos, topic_id| {
//!     println!("topic {}: {:?}", topic_id, payload);
//! });
//!
//! client.start(47193)?;
//! client.connect(options)?;
//! loop {
//!     // host: read the socket, then
//!     // client.receive(&datagram, peer_addr, peer_port);
//!     client.process()?;
//! }
//! # }
//! ```
//!
//! Quick overview of behaviour
//! - Control requests that expect a reply (subscribe, register, unsubscribe)
//!   are tracked by packet id and resolved by the matching ack, or failed
//!   with [`AckCode::Timeout`] when the gateway stays silent
//! - Keep alive pings go out shortly before the gateway would expire the
//!   session; a missing ping response marks the session [`ClientState::Lost`]
//! - Sleep mode is driven with [`MqttSnClient::sleep`] and
//!   [`MqttSnClient::awake`]; the gateway buffers publishes in between
//!
//! ## Important notes
//!
//! - The three entry points (`receive`, the operation methods, `process`)
//!   must be called from one thread; the client never re-enters itself.
//! - Application payloads travel at QoS 0 only. Requesting a higher level
//!   returns [`ClientError::NotImplemented`].

#[macro_use]
extern crate log;

use std::fmt::{self, Debug, Formatter};
use std::net::Ipv6Addr;
use std::str::FromStr;
use typed_builder::TypedBuilder;

mod client;
mod pending;
mod state;
mod transport;

pub use client::MqttSnClient;
pub use mqttsnbytes::*;
pub use state::{ClientState, DisconnectReason};
pub use transport::{Clock, PacketSocket, StdClock};

/// Final status handed to a request callback: the wire return codes plus
/// the client side timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckCode {
    Accepted,
    Congestion,
    InvalidTopicId,
    NotSupported,
    /// No acknowledgement arrived within the retransmission window
    Timeout,
}

impl From<ReturnCode> for AckCode {
    fn from(code: ReturnCode) -> AckCode {
        match code {
            ReturnCode::Accepted => AckCode::Accepted,
            ReturnCode::RejectedCongestion => AckCode::Congestion,
            ReturnCode::RejectedInvalidTopicId => AckCode::InvalidTopicId,
            ReturnCode::RejectedNotSupported => AckCode::NotSupported,
        }
    }
}

/// Resolution of a subscribe request. Topic id is 0 on timeout
pub type SubscribeCallback = Box<dyn FnOnce(AckCode, u16)>;
/// Resolution of a register request. Topic id is 0 on timeout
pub type RegisterCallback = Box<dyn FnOnce(AckCode, u16)>;
/// Resolution of an unsubscribe request
pub type UnsubscribeCallback = Box<dyn FnOnce(AckCode)>;

/// Client Error
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("operation not allowed in client state {0:?}")]
    InvalidState(ClientState),
    #[error("only QoS 0 is supported")]
    NotImplemented,
    #[error("pending request queue is full")]
    NoBuffers,
    #[error("packet id {0} is still awaiting an acknowledgement")]
    PacketIdInUse(u16),
    #[error("packet serialization: {0}")]
    Codec(#[from] mqttsnbytes::Error),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClientIdError {
    #[error("client id is empty")]
    Empty,
    #[error("client id is longer than 23 octets")]
    TooLong,
}

/// Client identifier, 1-23 octets as the protocol demands
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClientId(String);

impl FromStr for ClientId {
    type Err = ClientIdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Err(ClientIdError::Empty)
        } else if s.len() > 23 {
            Err(ClientIdError::TooLong)
        } else {
            Ok(Self(s.to_string()))
        }
    }
}

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<ClientId> for String {
    fn from(c: ClientId) -> Self {
        c.0
    }
}

/// Options to configure one session with a gateway
///
/// Handed to [`MqttSnClient::connect`]; the gateway address and port pin
/// the session's peer and every frame from anyone else is ignored.
///
/// ```
/// # use rumqttsnc::MqttSnOptions;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = MqttSnOptions::builder()
///     .gateway_addr("fd00::1".parse()?)
///     .client_id("node-7".parse()?)
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Clone, TypedBuilder)]
pub struct MqttSnOptions {
    /// gateway address the session is bound to
    pub gateway_addr: Ipv6Addr,
    /// gateway udp port
    #[builder(default = 10000)]
    pub gateway_port: u16,
    /// client identifier
    pub client_id: ClientId,
    /// keep alive interval in seconds announced in CONNECT
    #[builder(default = 60)]
    pub keep_alive: u16,
    /// seconds to wait for a gateway reply before the session counts as lost
    #[builder(default = 10)]
    pub gateway_timeout: u16,
    /// ask the gateway to discard subscriptions of a previous session
    #[builder(default = true)]
    pub clean_session: bool,
    /// resend attempts for an expired control request before its callback
    /// is failed with a timeout
    #[builder(default = 0)]
    pub max_retransmissions: u8,
    /// cap on in flight control requests, per request kind
    #[builder(default = 16)]
    pub max_pending: usize,
}

impl Debug for MqttSnOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MqttSnOptions")
            .field("gateway_addr", &self.gateway_addr)
            .field("gateway_port", &self.gateway_port)
            .field("client_id", &self.client_id)
            .field("keep_alive", &self.keep_alive)
            .field("gateway_timeout", &self.gateway_timeout)
            .field("clean_session", &self.clean_session)
            .finish()
    }
}
