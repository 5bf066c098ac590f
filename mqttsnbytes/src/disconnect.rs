use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Session teardown. A non zero duration asks the gateway to keep the
/// session and hold messages while the client sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnect {
    pub duration: Option<u16>,
}

impl Disconnect {
    pub fn new() -> Disconnect {
        Disconnect { duration: None }
    }

    pub fn with_duration(duration: u16) -> Disconnect {
        Disconnect {
            duration: Some(duration),
        }
    }

    fn len(&self) -> usize {
        self.duration.map_or(0, |_| 2)
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);
        let duration = if bytes.is_empty() {
            None
        } else {
            Some(read_u16(&mut bytes)?)
        };

        Ok(Disconnect { duration })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Disconnect as u8);
        if let Some(duration) = self.duration {
            buffer.put_u16(duration);
        }

        Ok(count + 1 + len)
    }
}

impl Default for Disconnect {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_disconnect_round_trips() {
        let mut buf = BytesMut::new();
        Disconnect::new().write(&mut buf).unwrap();
        assert_eq!(&buf[..], &[0x02, 0x18]);

        let fixed_header = check(&buf, 255).unwrap();
        let disconnect = Disconnect::read(fixed_header, buf.freeze()).unwrap();
        assert_eq!(disconnect.duration, None);
    }

    #[test]
    fn sleep_disconnect_encoding_works() {
        let mut buf = BytesMut::new();
        Disconnect::with_duration(300).write(&mut buf).unwrap();

        assert_eq!(&buf[..], &[0x04, 0x18, 0x01, 0x2C]);
    }
}
