use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Acknowledgement to connect packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnAck {
    pub code: ReturnCode,
}

impl ConnAck {
    pub fn new(code: ReturnCode) -> ConnAck {
        ConnAck { code }
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let code = return_code(read_u8(&mut bytes)?)?;

        Ok(ConnAck { code })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let count = write_frame_length(buffer, 1)?;
        buffer.put_u8(PacketType::ConnAck as u8);
        buffer.put_u8(self.code as u8);

        Ok(count + 2)
    }
}
