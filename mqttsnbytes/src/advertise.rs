use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Gateway broadcast announcing its presence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advertise {
    pub gw_id: u8,
    /// Seconds until the next ADVERTISE from this gateway
    pub duration: u16,
}

impl Advertise {
    pub fn new(gw_id: u8, duration: u16) -> Advertise {
        Advertise { gw_id, duration }
    }

    fn len(&self) -> usize {
        // gateway id + duration
        1 + 2
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let gw_id = read_u8(&mut bytes)?;
        let duration = read_u16(&mut bytes)?;

        Ok(Advertise { gw_id, duration })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Advertise as u8);
        buffer.put_u8(self.gw_id);
        buffer.put_u16(self.duration);

        Ok(count + 1 + len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn advertise_parsing_works() {
        let stream = &[
            0x05, 0x00, // length, message type
            0x02, // gateway id
            0x03, 0x84, // duration = 900s
        ];

        let fixed_header = check(stream, 255).unwrap();
        let advertise = Advertise::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap();

        assert_eq!(advertise, Advertise::new(2, 900));
    }
}
