//! Connects to a gateway over plain UDP, subscribes to one topic and dumps
//! everything it hears. Gateway address and port come from the command
//! line: `syncsub fd00::1 10000`.

use rumqttsnc::{ClientState, MqttSnClient, MqttSnOptions, PacketSocket, QoS, StdClock};
use std::cell::RefCell;
use std::io;
use std::net::{Ipv6Addr, SocketAddr, SocketAddrV6, UdpSocket};
use std::rc::Rc;
use std::time::Duration;

/// Host side of the socket contract, backed by std's UDP socket. Clones
/// share the handle so the receive loop can read what the client bound.
#[derive(Clone, Default)]
struct MeshSocket {
    socket: Rc<RefCell<Option<UdpSocket>>>,
}

impl MeshSocket {
    fn recv(&self, buffer: &mut [u8]) -> Option<(usize, Ipv6Addr, u16)> {
        let socket = self.socket.borrow();
        let socket = socket.as_ref()?;
        match socket.recv_from(buffer) {
            Ok((len, SocketAddr::V6(peer))) => Some((len, *peer.ip(), peer.port())),
            Ok((_, SocketAddr::V4(_))) => None,
            Err(_) => None,
        }
    }
}

impl PacketSocket for MeshSocket {
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn bind(&mut self, port: u16) -> io::Result<()> {
        let socket = UdpSocket::bind((Ipv6Addr::UNSPECIFIED, port))?;
        socket.set_nonblocking(true)?;
        *self.socket.borrow_mut() = Some(socket);
        Ok(())
    }

    fn send_to(
        &mut self,
        frame: &[u8],
        addr: Ipv6Addr,
        port: u16,
        _hop_limit: u8,
    ) -> io::Result<()> {
        let socket = self.socket.borrow();
        let socket = socket
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "socket not bound"))?;
        socket.send_to(frame, SocketAddrV6::new(addr, port, 0, 0))?;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        *self.socket.borrow_mut() = None;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let gateway_addr: Ipv6Addr = args.next().unwrap_or_else(|| "::1".into()).parse()?;
    let gateway_port: u16 = args.next().unwrap_or_else(|| "10000".into()).parse()?;

    let options = MqttSnOptions::builder()
        .gateway_addr(gateway_addr)
        .gateway_port(gateway_port)
        .client_id("syncsub".parse()?)
        .keep_alive(60)
        .gateway_timeout(10)
        .build();

    let socket = MeshSocket::default();
    let mut client = MqttSnClient::new(socket.clone(), StdClock::new());
    client.on_connected(|code| println!("connected: {:?}", code));
    client.on_disconnected(|reason| println!("disconnected: {:?}", reason));
    client.on_publish_received(|payload, qos, topic_id| {
        println!("publish: topic {} qos {:?} payload {:?}", topic_id, qos, payload);
    });

    client.start(0)?;
    client.connect(options)?;

    let mut subscribed = false;
    let mut buffer = [0u8; 255];
    loop {
        while let Some((len, addr, port)) = socket.recv(&mut buffer) {
            client.receive(&buffer[..len], addr, port);
        }

        if client.state() == ClientState::Active && !subscribed {
            client.subscribe("sensors/temp", QoS::AtMostOnce, |code, topic_id| {
                println!("subscribed: {:?} topic id {}", code, topic_id);
            })?;
            subscribed = true;
        }

        client.process()?;
        std::thread::sleep(Duration::from_millis(100));
    }
}
