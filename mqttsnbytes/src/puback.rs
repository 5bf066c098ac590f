use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Acknowledgement to publish. Also sent unsolicited by the gateway to
/// report an invalid topic id on a QoS 0 publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubAck {
    pub topic_id: u16,
    pub msg_id: u16,
    pub code: ReturnCode,
}

impl PubAck {
    pub fn new(topic_id: u16, msg_id: u16, code: ReturnCode) -> PubAck {
        PubAck {
            topic_id,
            msg_id,
            code,
        }
    }

    fn len(&self) -> usize {
        // topic id + msg id + return code
        2 + 2 + 1
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let topic_id = read_u16(&mut bytes)?;
        let msg_id = read_u16(&mut bytes)?;
        let code = return_code(read_u8(&mut bytes)?)?;

        Ok(PubAck {
            topic_id,
            msg_id,
            code,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::PubAck as u8);
        buffer.put_u16(self.topic_id);
        buffer.put_u16(self.msg_id);
        buffer.put_u8(self.code as u8);

        Ok(count + 1 + len)
    }
}
