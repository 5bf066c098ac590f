use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Acknowledgement to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsubAck {
    pub msg_id: u16,
}

impl UnsubAck {
    pub fn new(msg_id: u16) -> UnsubAck {
        UnsubAck { msg_id }
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let msg_id = read_u16(&mut bytes)?;

        Ok(UnsubAck { msg_id })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let count = write_frame_length(buffer, 2)?;
        buffer.put_u8(PacketType::UnsubAck as u8);
        buffer.put_u16(self.msg_id);

        Ok(count + 3)
    }
}
