use super::*;
use bytes::{Buf, Bytes};

/// Binds a topic name to a gateway assigned topic id. Sent by the client
/// with a zero topic id; the assignment comes back in REGACK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    pub topic_id: u16,
    pub msg_id: u16,
    pub topic: String,
}

impl Register {
    pub fn new<S: Into<String>>(msg_id: u16, topic: S) -> Register {
        Register {
            topic_id: 0,
            msg_id,
            topic: topic.into(),
        }
    }

    fn len(&self) -> usize {
        // topic id + msg id + topic name
        2 + 2 + self.topic.len()
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let topic_id = read_u16(&mut bytes)?;
        let msg_id = read_u16(&mut bytes)?;
        let topic = read_remaining_string(&mut bytes)?;

        Ok(Register {
            topic_id,
            msg_id,
            topic,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Register as u8);
        buffer.put_u16(self.topic_id);
        buffer.put_u16(self.msg_id);
        buffer.extend_from_slice(self.topic.as_bytes());

        Ok(count + 1 + len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn register_encoding_works() {
        let register = Register::new(2, "sensors/temp");

        let mut buf = BytesMut::new();
        register.write(&mut buf).unwrap();

        assert_eq!(
            &buf[..8],
            &[
                0x12, 0x0A, // length, message type
                0x00, 0x00, // topic id, always 0 from the client
                0x00, 0x02, // msg id
                b's', b'e',
            ]
        );
        assert_eq!(buf.len(), 18);
    }
}
