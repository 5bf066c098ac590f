//! Host collaborator traits. The networking stack and the timebase differ
//! per platform, so the client is generic over both: a datagram socket it
//! drives for output and a monotonic millisecond clock it reads.

use std::io;
use std::net::Ipv6Addr;
use std::time::Instant;

/// A UDP socket the host lends to the client.
///
/// Only the outbound half is abstracted here. Inbound datagrams are read by
/// the host however its stack works and handed to
/// [`MqttSnClient::receive`](crate::MqttSnClient::receive) together with the
/// sender's address, which keeps the client free of any receive loop.
pub trait PacketSocket {
    fn open(&mut self) -> io::Result<()>;

    fn bind(&mut self, port: u16) -> io::Result<()>;

    /// Sends one frame. `hop_limit` 0 leaves the stack's default in place;
    /// multicast gateway discovery passes its search radius here.
    fn send_to(&mut self, frame: &[u8], addr: Ipv6Addr, port: u16, hop_limit: u8)
        -> io::Result<()>;

    fn close(&mut self) -> io::Result<()>;
}

/// Monotonic millisecond timebase. Wrapping after ~49 days is tolerated.
pub trait Clock {
    fn now_millis(&self) -> u32;
}

/// [`Clock`] backed by std's monotonic clock, counting from construction
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> StdClock {
        StdClock {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_millis(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }
}
