use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Ping request. A sleeping client includes its id to ask the gateway to
/// flush buffered messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingReq {
    pub client_id: Option<String>,
}

impl PingReq {
    pub fn new() -> PingReq {
        PingReq { client_id: None }
    }

    pub fn with_client_id<S: Into<String>>(id: S) -> PingReq {
        PingReq {
            client_id: Some(id.into()),
        }
    }

    fn len(&self) -> usize {
        self.client_id.as_ref().map_or(0, |id| id.len())
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let client_id = if bytes.is_empty() {
            None
        } else {
            Some(read_remaining_string(&mut bytes)?)
        };

        Ok(PingReq { client_id })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::PingReq as u8);
        if let Some(id) = &self.client_id {
            buffer.extend_from_slice(id.as_bytes());
        }

        Ok(count + 1 + len)
    }
}

impl Default for PingReq {
    fn default() -> Self {
        Self::new()
    }
}

/// Ping response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingResp;

impl PingResp {
    pub fn read(_fixed_header: FixedHeader, _bytes: Bytes) -> Result<Self, Error> {
        Ok(PingResp)
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        buffer.put_slice(&[0x02, PacketType::PingResp as u8]);
        Ok(2)
    }
}
