use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Acknowledgement to register, carries the assigned topic id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegAck {
    pub topic_id: u16,
    pub msg_id: u16,
    pub code: ReturnCode,
}

impl RegAck {
    pub fn new(topic_id: u16, msg_id: u16, code: ReturnCode) -> RegAck {
        RegAck {
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

        Ok(RegAck {
            topic_id,
            msg_id,
            code,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::RegAck as u8);
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
    fn regack_parsing_works() {
        let stream = &[
            0x07, 0x0B, // length, message type
            0x00, 0x2A, // topic id = 42
            0x00, 0x01, // msg id
            0x00, // accepted
        ];

        let fixed_header = check(stream, 255).unwrap();
        let regack = RegAck::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap();

        assert_eq!(regack, RegAck::new(42, 1, ReturnCode::Accepted));
    }
}
