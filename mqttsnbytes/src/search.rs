use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Multicast probe for gateways within the given hop radius
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchGw {
    pub radius: u8,
}

impl SearchGw {
    pub fn new(radius: u8) -> SearchGw {
        SearchGw { radius }
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let radius = read_u8(&mut bytes)?;

        Ok(SearchGw { radius })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let count = write_frame_length(buffer, 1)?;
        buffer.put_u8(PacketType::SearchGw as u8);
        buffer.put_u8(self.radius);

        Ok(count + 2)
    }
}

/// Answer to SEARCHGW. `gw_addr` is empty when the answering gateway is the
/// sender itself; a 16 octet value is the IPv6 address of another gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GwInfo {
    pub gw_id: u8,
    pub gw_addr: Bytes,
}

impl GwInfo {
    pub fn new(gw_id: u8) -> GwInfo {
        GwInfo {
            gw_id,
            gw_addr: Bytes::new(),
        }
    }

    fn len(&self) -> usize {
        1 + self.gw_addr.len()
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let gw_id = read_u8(&mut bytes)?;
        let gw_addr = bytes.split_to(bytes.len());

        Ok(GwInfo { gw_id, gw_addr })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::GwInfo as u8);
        buffer.put_u8(self.gw_id);
        buffer.extend_from_slice(&self.gw_addr);

        Ok(count + 1 + len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn searchgw_encoding_works() {
        let mut buf = BytesMut::new();
        SearchGw::new(3).write(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x03, 0x01, 0x03]);
    }

    #[test]
    fn gwinfo_with_address_is_parsed() {
        let stream = &[
            0x07, 0x02, // length, message type
            0x01, // gateway id
            0xfd, 0x00, 0xde, 0xad, // opaque gateway address
        ];

        let fixed_header = check(stream, 255).unwrap();
        let gwinfo = GwInfo::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap();

        assert_eq!(gwinfo.gw_id, 1);
        assert_eq!(&gwinfo.gw_addr[..], &[0xfd, 0x00, 0xde, 0xad]);
    }

    #[test]
    fn gwinfo_without_address_is_parsed() {
        let stream = &[0x03, 0x02, 0x01];
        let fixed_header = check(stream, 255).unwrap();
        let gwinfo = GwInfo::read(fixed_header, Bytes::copy_from_slice(stream)).unwrap();

        assert_eq!(gwinfo, GwInfo::new(1));
    }
}
