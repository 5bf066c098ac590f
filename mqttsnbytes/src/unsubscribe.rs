use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Unsubscription packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsubscribe {
    pub msg_id: u16,
    pub topic: TopicFilter,
}

impl Unsubscribe {
    pub fn new(msg_id: u16, topic: TopicFilter) -> Unsubscribe {
        Unsubscribe { msg_id, topic }
    }

    fn len(&self) -> usize {
        1 + 2 + topic_filter_len(&self.topic)
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);

        let flags = read_u8(&mut bytes)?;
        let msg_id = read_u16(&mut bytes)?;
        let topic = read_topic_filter(flags, &mut bytes)?;

        Ok(Unsubscribe { msg_id, topic })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Unsubscribe as u8);
        buffer.put_u8(topic_filter_flags(&self.topic));
        buffer.put_u16(self.msg_id);
        write_topic_filter(&self.topic, buffer);

        Ok(count + 1 + len)
    }
}
