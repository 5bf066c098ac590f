use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Application message. The topic field is always two octets; the topic id
/// type bits of the flags octet say how to interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publish {
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
    pub topic: TopicId,
    pub msg_id: u16,
    pub payload: Bytes,
}

impl Publish {
    pub fn new<P: Into<Bytes>>(topic: TopicId, qos: QoS, payload: P) -> Publish {
        Publish {
            dup: false,
            qos,
            retain: false,
            topic,
            msg_id: 0,
            payload: payload.into(),
        }
    }

    fn len(&self) -> usize {
        // flags + topic + msg id + payload
        1 + 2 + 2 + self.payload.len()
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);

        let flags = read_u8(&mut bytes)?;
        let qos = flags_qos(flags)?;

        if bytes.len() < 4 {
            return Err(Error::MalformedPacket);
        }

        let raw_topic = [bytes.get_u8(), bytes.get_u8()];
        let topic = match flags & FLAG_TOPIC_ID_MASK {
            TOPIC_ID_NORMAL => TopicId::Normal(u16::from_be_bytes(raw_topic)),
            TOPIC_ID_PREDEFINED => TopicId::Predefined(u16::from_be_bytes(raw_topic)),
            TOPIC_ID_SHORT => TopicId::Short(raw_topic),
            t => return Err(Error::InvalidTopicIdType(t)),
        };

        let msg_id = read_u16(&mut bytes)?;
        let payload = bytes.split_to(bytes.len());

        Ok(Publish {
            dup: flags & FLAG_DUP != 0,
            qos,
            retain: flags & FLAG_RETAIN != 0,
            topic,
            msg_id,
            payload,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Publish as u8);

        let mut flags = (self.qos as u8) << 5;
        if self.dup {
            flags |= FLAG_DUP;
        }
        if self.retain {
            flags |= FLAG_RETAIN;
        }

        let raw_topic = match self.topic {
            TopicId::Normal(id) => {
                flags |= TOPIC_ID_NORMAL;
                id.to_be_bytes()
            }
            TopicId::Predefined(id) => {
                flags |= TOPIC_ID_PREDEFINED;
                id.to_be_bytes()
            }
            TopicId::Short(name) => {
                flags |= TOPIC_ID_SHORT;
                name
            }
        };

        buffer.put_u8(flags);
        buffer.extend_from_slice(&raw_topic);
        buffer.put_u16(self.msg_id);
        buffer.extend_from_slice(&self.payload);

        Ok(count + 1 + len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn qos0_publish_parsing_works() {
        let stream = &[
            0x0A, 0x0C, // length, message type
            0x00, // flags: qos 0, normal topic id
            0x00, 0x2A, // topic id = 42
            0x00, 0x00, // msg id
            0xDE, 0xAD, 0xBE, // payload
        ];

        let fixed_header = check(stream, 255).unwrap();
        let publish = Publish::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap();

        assert_eq!(publish.topic, TopicId::Normal(42));
        assert_eq!(publish.qos, QoS::AtMostOnce);
        assert_eq!(publish.msg_id, 0);
        assert_eq!(&publish.payload[..], &[0xDE, 0xAD, 0xBE]);
    }

    #[test]
    fn publish_encoding_works() {
        let mut publish = Publish::new(TopicId::Normal(5), QoS::AtMostOnce, vec![1, 2, 3]);
        publish.msg_id = 7;

        let mut buf = BytesMut::new();
        publish.write(&mut buf).unwrap();

        assert_eq!(
            &buf[..],
            &[0x0A, 0x0C, 0x00, 0x00, 0x05, 0x00, 0x07, 0x01, 0x02, 0x03]
        );
    }

    #[test]
    fn reserved_qos_bits_are_rejected() {
        let stream = &[
            0x08, 0x0C, // length, message type
            0x60, // flags: reserved qos pattern
            0x00, 0x2A, 0x00, 0x00, 0xFF,
        ];

        let fixed_header = check(stream, 255).unwrap();
        let got = Publish::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap_err();

        assert_eq!(got, Error::InvalidQoS(3));
    }
}
