use super::*;
use bytes::{Buf, Bytes};

const PROTOCOL_ID: u8 = 0x01;

/// Connection packet initiated by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect {
    /// Keep alive interval in seconds
    pub duration: u16,
    /// Client identifier, 1-23 octets
    pub client_id: String,
    /// Clean session. Asks the gateway to clear previous state
    pub clean_session: bool,
}

impl Connect {
    pub fn new<S: Into<String>>(id: S) -> Connect {
        Connect {
            duration: 60,
            client_id: id.into(),
            clean_session: true,
        }
    }

    fn len(&self) -> usize {
        // flags + protocol id + duration + client id
        1 + 1 + 2 + self.client_id.len()
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Connect, Error> {
        bytes.advance(fixed_header.fixed_header_len);

        let flags = read_u8(&mut bytes)?;
        let protocol_id = read_u8(&mut bytes)?;
        if protocol_id != PROTOCOL_ID {
            return Err(Error::InvalidProtocolId(protocol_id));
        }

        let duration = read_u16(&mut bytes)?;
        let client_id = read_remaining_string(&mut bytes)?;

        Ok(Connect {
            duration,
            client_id,
            clean_session: flags & FLAG_CLEAN_SESSION != 0,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Connect as u8);

        let mut flags = 0;
        if self.clean_session {
            flags |= FLAG_CLEAN_SESSION;
        }

        buffer.put_u8(flags);
        buffer.put_u8(PROTOCOL_ID);
        buffer.put_u16(self.duration);
        buffer.extend_from_slice(self.client_id.as_bytes());

        Ok(count + 1 + len)
    }
}
