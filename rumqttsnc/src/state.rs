//! Session bookkeeping: lifecycle state, the packet id counter, the two
//! session timers and the teardown intent flags.
//
// Methods here only mutate the bookkeeping, they never touch the network.
// The client decides when to send; this module decides what is allowed and
// what the timers say.

use crate::ClientError;

/// Lifecycle state of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// No session, or the gateway confirmed the disconnect
    Disconnected,
    /// Session established, application traffic allowed
    Active,
    /// Gateway holds messages until the next wake up
    Asleep,
    /// Briefly online to drain held messages, returns to Asleep on PINGRESP
    Awake,
    /// Gateway stopped answering within its deadline
    Lost,
}

/// Why the disconnected callback fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The gateway ended the session
    Server,
    /// Local stop
    Client,
    /// Expected handover into sleep mode
    Asleep,
    /// The gateway liveness deadline elapsed
    Timeout,
}

/// Per session bookkeeping owned by the client
#[derive(Debug)]
pub(crate) struct Session {
    pub state: ClientState,
    /// Next packet id to hand out. Never 0; 0 is the no-id sentinel used
    /// in timeout callbacks
    next_packet_id: u16,
    /// Absolute deadline (ms) for the next proactive PINGREQ. 0 = disarmed
    pub ping_deadline: u32,
    /// Absolute deadline (ms) for an expected gateway reply. 0 = disarmed
    pub gw_deadline: u32,
    /// A local disconnect is in flight
    pub disconnect_requested: bool,
    /// A sleep handover is in flight
    pub sleep_requested: bool,
}

impl Session {
    pub fn new() -> Session {
        Session {
            state: ClientState::Disconnected,
            next_packet_id: 1,
            ping_deadline: 0,
            gw_deadline: 0,
            disconnect_requested: false,
            sleep_requested: false,
        }
    }

    /// Hands out the next packet id. Ids are consumed even when the send
    /// that follows fails, so a retry can never collide with an earlier
    /// correlation.
    pub fn next_packet_id(&mut self) -> u16 {
        let packet_id = self.next_packet_id;
        self.next_packet_id = match packet_id {
            u16::MAX => 1,
            id => id + 1,
        };

        packet_id
    }

    pub fn require(&self, allowed: &[ClientState]) -> Result<(), ClientError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ClientError::InvalidState(self.state))
        }
    }

    /// Housekeeping shared by every way a session ends: teardown intents
    /// and both timers are cleared. Queues are flushed by the client, which
    /// owns them.
    pub fn clear_for_teardown(&mut self) {
        self.disconnect_requested = false;
        self.sleep_requested = false;
        self.ping_deadline = 0;
        self.gw_deadline = 0;
    }
}
