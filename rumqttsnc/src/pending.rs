//! Correlation table for control requests awaiting a gateway reply. One
//! queue instance exists per request kind (subscribe, register,
//! unsubscribe) so every queue is statically typed over its callback shape
//! instead of erasing it behind a context pointer.

use bytes::Bytes;
use std::net::Ipv6Addr;

/// One in flight request. Owns a verbatim copy of the wire frame so the
/// sweep can resend it without re-encoding.
pub(crate) struct PendingEntry<F> {
    pub addr: Ipv6Addr,
    pub port: u16,
    /// Primary key within the queue
    pub packet_id: u16,
    /// Enqueue time (ms)
    pub timestamp: u32,
    /// Retransmission timeout (ms)
    pub timeout: u32,
    pub retransmissions: u8,
    pub callback: F,
    pub frame: Bytes,
}

/// Insertion ordered queue of pending requests, keyed by packet id.
///
/// The timeout invoker is fixed at construction: it is the one way a
/// callback leaves the queue without its acknowledgement. Entries never
/// move between queue instances.
pub(crate) struct PendingQueue<F> {
    on_timeout: fn(F),
    entries: Vec<PendingEntry<F>>,
}

impl<F> PendingQueue<F> {
    pub fn new(on_timeout: fn(F)) -> PendingQueue<F> {
        PendingQueue {
            on_timeout,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, packet_id: u16) -> bool {
        self.entries.iter().any(|entry| entry.packet_id == packet_id)
    }

    /// Appends an entry. The caller has already checked capacity and packet
    /// id uniqueness; a duplicate here would break ack correlation.
    pub fn push(&mut self, entry: PendingEntry<F>) {
        debug_assert!(!self.contains(entry.packet_id));
        self.entries.push(entry);
    }

    /// Removes and returns the first entry matching the packet id
    pub fn take(&mut self, packet_id: u16) -> Option<PendingEntry<F>> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.packet_id == packet_id)?;

        Some(self.entries.remove(index))
    }

    /// Sweeps expired entries. An expired entry is resent and rescheduled
    /// while it has retransmissions left and the resend succeeds; otherwise
    /// its callback is failed with the timeout invoker and it is dropped.
    pub fn handle_tick(
        &mut self,
        now: u32,
        retry_limit: u8,
        mut resend: impl FnMut(&PendingEntry<F>) -> bool,
    ) {
        let mut index = 0;
        while index < self.entries.len() {
            let entry = &mut self.entries[index];
            if now.wrapping_sub(entry.timestamp) < entry.timeout {
                index += 1;
                continue;
            }

            if entry.retransmissions < retry_limit && resend(entry) {
                entry.retransmissions += 1;
                entry.timestamp = now;
                index += 1;
            } else {
                let entry = self.entries.remove(index);
                (self.on_timeout)(entry.callback);
            }
        }
    }

    /// Fails every remaining entry with the timeout invoker and drains the
    /// queue. Called on session teardown.
    pub fn force_timeout(&mut self) {
        for entry in self.entries.drain(..) {
            (self.on_timeout)(entry.callback);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::net::Ipv6Addr;
    use std::rc::Rc;

    type Callback = Box<dyn FnOnce()>;

    fn build_queue() -> PendingQueue<Callback> {
        PendingQueue::new(|callback: Callback| callback())
    }

    fn build_entry(packet_id: u16, timestamp: u32, timeout: u32, callback: Callback) -> PendingEntry<Callback> {
        PendingEntry {
            addr: Ipv6Addr::LOCALHOST,
            port: 10000,
            packet_id,
            timestamp,
            timeout,
            retransmissions: 0,
            callback,
            frame: Bytes::from_static(&[0x02, 0x16]),
        }
    }

    fn timeout_counter(queue_hits: &Rc<RefCell<Vec<u16>>>, packet_id: u16) -> Callback {
        let hits = queue_hits.clone();
        Box::new(move || hits.borrow_mut().push(packet_id))
    }

    #[test]
    fn take_returns_the_matching_entry_and_nothing_else() {
        let mut queue = build_queue();
        queue.push(build_entry(1, 0, 10_000, Box::new(|| ())));
        queue.push(build_entry(2, 0, 10_000, Box::new(|| ())));

        let entry = queue.take(2).unwrap();
        assert_eq!(entry.packet_id, 2);
        assert_eq!(queue.len(), 1);

        assert!(queue.take(42).is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(1));
    }

    #[test]
    fn tick_fails_expired_entries_in_insertion_order() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut queue = build_queue();
        queue.push(build_entry(1, 0, 10_000, timeout_counter(&hits, 1)));
        queue.push(build_entry(2, 5_000, 10_000, timeout_counter(&hits, 2)));
        queue.push(build_entry(3, 12_000, 10_000, timeout_counter(&hits, 3)));

        queue.handle_tick(15_000, 0, |_| true);

        assert_eq!(*hits.borrow(), vec![1, 2]);
        assert_eq!(queue.len(), 1);
        assert!(queue.contains(3));
    }

    #[test]
    fn tick_leaves_fresh_entries_alone() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut queue = build_queue();
        queue.push(build_entry(1, 0, 10_000, timeout_counter(&hits, 1)));

        queue.handle_tick(9_999, 0, |_| true);

        assert!(hits.borrow().is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn expired_entry_is_resent_until_the_retry_limit() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let resends = Rc::new(RefCell::new(0));
        let mut queue = build_queue();
        queue.push(build_entry(1, 0, 10_000, timeout_counter(&hits, 1)));

        let counter = resends.clone();
        queue.handle_tick(10_000, 2, |_| {
            *counter.borrow_mut() += 1;
            true
        });
        assert!(hits.borrow().is_empty());

        let counter = resends.clone();
        queue.handle_tick(20_000, 2, |_| {
            *counter.borrow_mut() += 1;
            true
        });
        assert!(hits.borrow().is_empty());

        // retries exhausted, third expiry surfaces the timeout
        queue.handle_tick(30_000, 2, |_| unreachable!("no retries left"));

        assert_eq!(*resends.borrow(), 2);
        assert_eq!(*hits.borrow(), vec![1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn failed_resend_surfaces_the_timeout_immediately() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut queue = build_queue();
        queue.push(build_entry(1, 0, 10_000, timeout_counter(&hits, 1)));

        queue.handle_tick(10_000, 2, |_| false);

        assert_eq!(*hits.borrow(), vec![1]);
        assert!(queue.is_empty());
    }

    #[test]
    fn force_timeout_drains_everything() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let mut queue = build_queue();
        queue.push(build_entry(1, 0, 10_000, timeout_counter(&hits, 1)));
        queue.push(build_entry(2, 0, 60_000, timeout_counter(&hits, 2)));

        queue.force_timeout();

        assert_eq!(*hits.borrow(), vec![1, 2]);
        assert!(queue.is_empty());
    }
}
