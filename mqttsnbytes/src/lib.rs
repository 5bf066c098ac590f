use bytes::{Buf, BufMut, Bytes, BytesMut};
use core::fmt::{self, Display, Formatter};

mod advertise;
mod connack;
mod connect;
mod disconnect;
mod ping;
mod puback;
mod publish;
mod regack;
mod register;
mod search;
mod suback;
mod subscribe;
mod unsuback;
mod unsubscribe;

pub use advertise::*;
pub use connack::*;
pub use connect::*;
pub use disconnect::*;
pub use ping::*;
pub use puback::*;
pub use publish::*;
pub use regack::*;
pub use register::*;
pub use search::*;
pub use suback::*;
pub use subscribe::*;
pub use unsuback::*;
pub use unsubscribe::*;

/// Error during serialization and deserialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidPacketType(u8),
    InvalidProtocolId(u8),
    InvalidQoS(u8),
    InvalidReturnCode(u8),
    InvalidTopicIdType(u8),
    PayloadTooLong,
    TopicNotUtf8,
    MalformedPacket,
    PayloadSizeLimitExceeded(usize),
    /// More bytes required to frame packet. Argument
    /// implies minimum additional bytes required to
    /// proceed further
    InsufficientBytes(usize),
}

/// MQTT-SN message type
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    Advertise = 0x00,
    SearchGw = 0x01,
    GwInfo = 0x02,
    Connect = 0x04,
    ConnAck = 0x05,
    Register = 0x0A,
    RegAck = 0x0B,
    Publish = 0x0C,
    PubAck = 0x0D,
    Subscribe = 0x12,
    SubAck = 0x13,
    Unsubscribe = 0x14,
    UnsubAck = 0x15,
    PingReq = 0x16,
    PingResp = 0x17,
    Disconnect = 0x18,
}

/// Quality of service
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// Return code carried by CONNACK, REGACK, PUBACK and SUBACK
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    Accepted = 0x00,
    RejectedCongestion = 0x01,
    RejectedInvalidTopicId = 0x02,
    RejectedNotSupported = 0x03,
}

/// Topic addressing used by publish packets. The 2 octet topic field is
/// interpreted according to the topic id type bits of the flags octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicId {
    /// Gateway assigned id of a registered topic name
    Normal(u16),
    /// Id agreed out of band between client and gateway
    Predefined(u16),
    /// Two character topic name carried in place of an id
    Short([u8; 2]),
}

/// Topic addressing used by subscribe and unsubscribe packets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicFilter {
    /// Full topic name
    Name(String),
    /// Gateway assigned id of a registered topic name
    Id(u16),
    /// Two character topic name
    Short([u8; 2]),
}

pub(crate) const TOPIC_ID_NORMAL: u8 = 0b00;
pub(crate) const TOPIC_ID_PREDEFINED: u8 = 0b01;
pub(crate) const TOPIC_ID_SHORT: u8 = 0b10;

pub(crate) const FLAG_DUP: u8 = 0b1000_0000;
pub(crate) const FLAG_QOS_MASK: u8 = 0b0110_0000;
pub(crate) const FLAG_RETAIN: u8 = 0b0001_0000;
pub(crate) const FLAG_CLEAN_SESSION: u8 = 0b0000_0100;
pub(crate) const FLAG_TOPIC_ID_MASK: u8 = 0b0000_0011;

/// Packet type from the first octets of a datagram
///
/// ```ignore
///          +--------+----------------+-----------------------+
/// short    | Length | MsgType        | variable part ...     |
///          +--------+----------------+-----------------------+
///          | 0x01   | Length (2)     | MsgType | variable ...|
///          +--------+----------------+-----------------------+
/// ```
///
/// The length field counts the whole frame, itself included. Frames up to
/// 255 octets use the single octet form; 0x01 in the first octet announces
/// the 3 octet form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    /// Raw message type octet
    msg_type: u8,
    /// Length of the fixed header: length field octets + message type octet.
    /// Either 2 or 4
    fixed_header_len: usize,
    /// Length of the variable part following the fixed header
    remaining_len: usize,
}

impl FixedHeader {
    pub fn new(msg_type: u8, length_field_len: usize, remaining_len: usize) -> FixedHeader {
        FixedHeader {
            msg_type,
            fixed_header_len: length_field_len + 1,
            remaining_len,
        }
    }

    pub fn packet_type(&self) -> Result<PacketType, Error> {
        match self.msg_type {
            0x00 => Ok(PacketType::Advertise),
            0x01 => Ok(PacketType::SearchGw),
            0x02 => Ok(PacketType::GwInfo),
            0x04 => Ok(PacketType::Connect),
            0x05 => Ok(PacketType::ConnAck),
            0x0A => Ok(PacketType::Register),
            0x0B => Ok(PacketType::RegAck),
            0x0C => Ok(PacketType::Publish),
            0x0D => Ok(PacketType::PubAck),
            0x12 => Ok(PacketType::Subscribe),
            0x13 => Ok(PacketType::SubAck),
            0x14 => Ok(PacketType::Unsubscribe),
            0x15 => Ok(PacketType::UnsubAck),
            0x16 => Ok(PacketType::PingReq),
            0x17 => Ok(PacketType::PingResp),
            0x18 => Ok(PacketType::Disconnect),
            num => Err(Error::InvalidPacketType(num)),
        }
    }

    /// Returns the size of the full frame (length field + message type +
    /// variable part)
    pub fn frame_length(&self) -> usize {
        self.fixed_header_len + self.remaining_len
    }
}

/// Encapsulates all MQTT-SN packet types
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Advertise(Advertise),
    SearchGw(SearchGw),
    GwInfo(GwInfo),
    Connect(Connect),
    ConnAck(ConnAck),
    Register(Register),
    RegAck(RegAck),
    Publish(Publish),
    PubAck(PubAck),
    Subscribe(Subscribe),
    SubAck(SubAck),
    Unsubscribe(Unsubscribe),
    UnsubAck(UnsubAck),
    PingReq(PingReq),
    PingResp(PingResp),
    Disconnect(Disconnect),
}

impl Packet {
    /// Serializes the packet, length field included
    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        match self {
            Packet::Advertise(packet) => packet.write(buffer),
            Packet::SearchGw(packet) => packet.write(buffer),
            Packet::GwInfo(packet) => packet.write(buffer),
            Packet::Connect(packet) => packet.write(buffer),
            Packet::ConnAck(packet) => packet.write(buffer),
            Packet::Register(packet) => packet.write(buffer),
            Packet::RegAck(packet) => packet.write(buffer),
            Packet::Publish(packet) => packet.write(buffer),
            Packet::PubAck(packet) => packet.write(buffer),
            Packet::Subscribe(packet) => packet.write(buffer),
            Packet::SubAck(packet) => packet.write(buffer),
            Packet::Unsubscribe(packet) => packet.write(buffer),
            Packet::UnsubAck(packet) => packet.write(buffer),
            Packet::PingReq(packet) => packet.write(buffer),
            Packet::PingResp(packet) => packet.write(buffer),
            Packet::Disconnect(packet) => packet.write(buffer),
        }
    }
}

/// Checks if the buffer holds a complete frame and returns its fixed header.
/// A datagram transport hands over whole frames, so a disagreement between
/// the declared and the received length is a framing error rather than a
/// request for more bytes.
pub fn check(stream: &[u8], max_size: usize) -> Result<FixedHeader, Error> {
    let fixed_header = parse_fixed_header(stream)?;

    if fixed_header.frame_length() > max_size {
        return Err(Error::PayloadSizeLimitExceeded(fixed_header.frame_length()));
    }

    if stream.len() < fixed_header.frame_length() {
        return Err(Error::InsufficientBytes(
            fixed_header.frame_length() - stream.len(),
        ));
    }

    Ok(fixed_header)
}

/// Parses the length field and the message type octet
fn parse_fixed_header(stream: &[u8]) -> Result<FixedHeader, Error> {
    // At least a length octet and a message type octet
    if stream.len() < 2 {
        return Err(Error::InsufficientBytes(2 - stream.len()));
    }

    if stream[0] == 0x01 {
        // 3 octet length field
        if stream.len() < 4 {
            return Err(Error::InsufficientBytes(4 - stream.len()));
        }

        let frame_len = u16::from_be_bytes([stream[1], stream[2]]) as usize;
        if frame_len < 4 {
            return Err(Error::MalformedPacket);
        }

        Ok(FixedHeader::new(stream[3], 3, frame_len - 4))
    } else {
        let frame_len = stream[0] as usize;
        if frame_len < 2 {
            return Err(Error::MalformedPacket);
        }

        Ok(FixedHeader::new(stream[1], 1, frame_len - 2))
    }
}

/// Reads a buffer and extracts the next MQTT-SN packet out of it
pub fn read(stream: &mut BytesMut, max_size: usize) -> Result<Packet, Error> {
    let fixed_header = check(stream, max_size)?;
    let packet = stream.split_to(fixed_header.frame_length());
    let packet_type = fixed_header.packet_type()?;

    let packet = packet.freeze();
    let packet = match packet_type {
        PacketType::Advertise => Packet::Advertise(Advertise::read(fixed_header, packet)?),
        PacketType::SearchGw => Packet::SearchGw(SearchGw::read(fixed_header, packet)?),
        PacketType::GwInfo => Packet::GwInfo(GwInfo::read(fixed_header, packet)?),
        PacketType::Connect => Packet::Connect(Connect::read(fixed_header, packet)?),
        PacketType::ConnAck => Packet::ConnAck(ConnAck::read(fixed_header, packet)?),
        PacketType::Register => Packet::Register(Register::read(fixed_header, packet)?),
        PacketType::RegAck => Packet::RegAck(RegAck::read(fixed_header, packet)?),
        PacketType::Publish => Packet::Publish(Publish::read(fixed_header, packet)?),
        PacketType::PubAck => Packet::PubAck(PubAck::read(fixed_header, packet)?),
        PacketType::Subscribe => Packet::Subscribe(Subscribe::read(fixed_header, packet)?),
        PacketType::SubAck => Packet::SubAck(SubAck::read(fixed_header, packet)?),
        PacketType::Unsubscribe => Packet::Unsubscribe(Unsubscribe::read(fixed_header, packet)?),
        PacketType::UnsubAck => Packet::UnsubAck(UnsubAck::read(fixed_header, packet)?),
        PacketType::PingReq => Packet::PingReq(PingReq::read(fixed_header, packet)?),
        PacketType::PingResp => Packet::PingResp(PingResp::read(fixed_header, packet)?),
        PacketType::Disconnect => Packet::Disconnect(Disconnect::read(fixed_header, packet)?),
    };

    Ok(packet)
}

/// Writes the frame length field and returns the number of octets it took.
/// `remaining_len` counts everything after the message type octet.
fn write_frame_length(stream: &mut BytesMut, remaining_len: usize) -> Result<usize, Error> {
    if remaining_len + 2 <= 0xFF {
        stream.put_u8((remaining_len + 2) as u8);
        Ok(1)
    } else if remaining_len + 4 <= 0xFFFF {
        stream.put_u8(0x01);
        stream.put_u16((remaining_len + 4) as u16);
        Ok(3)
    } else {
        Err(Error::PayloadTooLong)
    }
}

/// Maps a number to QoS
pub fn qos(num: u8) -> Result<QoS, Error> {
    match num {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        qos => Err(Error::InvalidQoS(qos)),
    }
}

/// Maps a number to a return code
pub fn return_code(num: u8) -> Result<ReturnCode, Error> {
    match num {
        0x00 => Ok(ReturnCode::Accepted),
        0x01 => Ok(ReturnCode::RejectedCongestion),
        0x02 => Ok(ReturnCode::RejectedInvalidTopicId),
        0x03 => Ok(ReturnCode::RejectedNotSupported),
        num => Err(Error::InvalidReturnCode(num)),
    }
}

/// Extracts the qos bits of a flags octet
fn flags_qos(flags: u8) -> Result<QoS, Error> {
    qos((flags & FLAG_QOS_MASK) >> 5)
}

/// Pre checks before the fixed size reads below. MQTT-SN strings are not
/// length prefixed, they run to the end of the frame, so exhausting the
/// buffer early must surface as a framing error instead of a panic
fn read_u16(stream: &mut Bytes) -> Result<u16, Error> {
    if stream.len() < 2 {
        return Err(Error::MalformedPacket);
    }

    Ok(stream.get_u16())
}

fn read_u8(stream: &mut Bytes) -> Result<u8, Error> {
    if stream.is_empty() {
        return Err(Error::MalformedPacket);
    }

    Ok(stream.get_u8())
}

/// Reads the rest of the frame as a UTF-8 string
fn read_remaining_string(stream: &mut Bytes) -> Result<String, Error> {
    let bytes = stream.split_to(stream.len());
    match String::from_utf8(bytes.to_vec()) {
        Ok(v) => Ok(v),
        Err(_e) => Err(Error::TopicNotUtf8),
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Error = {:?}", self)
    }
}

impl std::error::Error for Error {}
