use super::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Subscription packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscribe {
    pub dup: bool,
    pub qos: QoS,
    pub msg_id: u16,
    pub topic: TopicFilter,
}

impl Subscribe {
    pub fn new<S: Into<String>>(msg_id: u16, path: S, qos: QoS) -> Subscribe {
        Subscribe {
            dup: false,
            qos,
            msg_id,
            topic: TopicFilter::Name(path.into()),
        }
    }

    fn len(&self) -> usize {
        1 + 2 + topic_filter_len(&self.topic)
    }

    pub fn read(fixed_header: FixedHeader, mut bytes: Bytes) -> Result<Self, Error> {
        bytes.advance(fixed_header.fixed_header_len);

        let flags = read_u8(&mut bytes)?;
        let qos = flags_qos(flags)?;
        let msg_id = read_u16(&mut bytes)?;
        let topic = read_topic_filter(flags, &mut bytes)?;

        Ok(Subscribe {
            dup: flags & FLAG_DUP != 0,
            qos,
            msg_id,
            topic,
        })
    }

    pub fn write(&self, buffer: &mut BytesMut) -> Result<usize, Error> {
        let len = self.len();
        let count = write_frame_length(buffer, len)?;
        buffer.put_u8(PacketType::Subscribe as u8);

        let mut flags = (self.qos as u8) << 5;
        if self.dup {
            flags |= FLAG_DUP;
        }
        flags |= topic_filter_flags(&self.topic);

        buffer.put_u8(flags);
        buffer.put_u16(self.msg_id);
        write_topic_filter(&self.topic, buffer);

        Ok(count + 1 + len)
    }
}

pub(crate) fn topic_filter_len(topic: &TopicFilter) -> usize {
    match topic {
        TopicFilter::Name(name) => name.len(),
        TopicFilter::Id(_) | TopicFilter::Short(_) => 2,
    }
}

pub(crate) fn topic_filter_flags(topic: &TopicFilter) -> u8 {
    match topic {
        TopicFilter::Name(_) => TOPIC_ID_NORMAL,
        TopicFilter::Id(_) => TOPIC_ID_NORMAL,
        TopicFilter::Short(_) => TOPIC_ID_SHORT,
    }
}

pub(crate) fn write_topic_filter(topic: &TopicFilter, buffer: &mut BytesMut) {
    match topic {
        TopicFilter::Name(name) => buffer.extend_from_slice(name.as_bytes()),
        TopicFilter::Id(id) => buffer.put_u16(*id),
        TopicFilter::Short(name) => buffer.extend_from_slice(name),
    }
}

pub(crate) fn read_topic_filter(flags: u8, bytes: &mut Bytes) -> Result<TopicFilter, Error> {
    match flags & FLAG_TOPIC_ID_MASK {
        TOPIC_ID_NORMAL => Ok(TopicFilter::Name(read_remaining_string(bytes)?)),
        TOPIC_ID_PREDEFINED => Ok(TopicFilter::Id(read_u16(bytes)?)),
        TOPIC_ID_SHORT => {
            if bytes.len() < 2 {
                return Err(Error::MalformedPacket);
            }
            Ok(TopicFilter::Short([bytes.get_u8(), bytes.get_u8()]))
        }
        t => Err(Error::InvalidTopicIdType(t)),
    }
}
