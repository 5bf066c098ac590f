use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Acknowledgement to subscribe, carries the granted qos and the topic id
/// assigned to the subscribed name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubAck {
    pub qos: QoS,
    pub topic_id: u16,
    pub msg_id: u16,
    pub code: ReturnCode,
}

impl SubAck {
    pub fn new(qos: QoS, topic_id: u16, msg_id: u16, code: ReturnCode) -> SubAck {
        SubAck {
            qos,
            topic_id,
            msg_id,
            code,
        }
    }

    fn len(&self) -> usize {
        // flags + topic id + msg id + return code
        1 + 2 + 2 + 1
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let flags = read_u8(&mut bytes)?;
        let qos = flags_qos(flags)?;
        let topic_id = read_u16(&mut bytes)?;
        let msg_id = read_u16(&mut bytes)?;
        let code = return_code(read_u8(&mut bytes)?)?;

        Ok(SubAck {
            qos,
            topic_id,
            msg_id,
            code,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::SubAck as u8);
        buffer.put_u8((self.qos as u8) << 5);
        buffer.put_u16(self.topic_id);
        buffer.put_u16(self.msg_id);
        buffer.put_u8(self.code as u8);

        Ok(count + 1 + len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suback_parsing_works() {
        let stream = &[
            0x08, 0x13, // length, message type
            0x00, // flags: granted qos 0
            0x00, 0x2A, // topic id = 42
            0x00, 0x01, // msg id = 1
            0x00, // accepted
        ];

        let fixed_header = check(stream, 255).unwrap();
        let suback = SubAck::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap();

        assert_eq!(suback, SubAck::new(QoS::AtMostOnce, 42, 1, ReturnCode::Accepted));
    }

    #[test]
    fn suback_encoding_works() {
        let suback = SubAck::new(QoS::AtMostOnce, 42, 1, ReturnCode::Accepted);

        let mut buf = BytesMut::new();
        suback.write(&mut buf).unwrap();

        assert_eq!(&buf[..], &[0x08, 0x13, 0x00, 0x00, 0x2A, 0x00, 0x01, 0x00]);
    }
}
