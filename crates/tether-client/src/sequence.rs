//! Outbound message ids

/// Allocates message ids, reusing the inbound id while a reply is in progress
///
/// Id 0 is reserved and never returned.
#[derive(Debug, Clone, Default)]
pub struct SequenceGenerator {
    last: u16,
    reply_id: u16,
}

impl SequenceGenerator {
    /// Create a generator whose first fresh id is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for an outbound frame
    pub fn next_id(&mut self) -> u16 {
        if self.reply_id != 0 {
            return self.reply_id;
        }
        self.last = self.last.wrapping_add(1);
        if self.last == 0 {
            self.last = 1;
        }
        self.last
    }

    /// Enter the reply context of inbound message `id`
    pub fn begin_reply(&mut self, id: u16) {
        self.reply_id = id;
    }

    /// Leave the reply context
    pub fn end_reply(&mut self) {
        self.reply_id = 0;
    }

    /// Id being replied to, if any
    pub fn reply_id(&self) -> Option<u16> {
        (self.reply_id != 0).then_some(self.reply_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_starts_at_one() {
        let mut ids = SequenceGenerator::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    fn test_wraps_past_zero() {
        let mut ids = SequenceGenerator::new();
        let mut seen = HashSet::new();
        for _ in 0..u16::MAX {
            let id = ids.next_id();
            assert_ne!(id, 0);
            seen.insert(id);
        }
        assert_eq!(seen.len(), usize::from(u16::MAX));
        // Counter is now at 65535; the next id skips 0.
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_reply_context_reuses_id() {
        let mut ids = SequenceGenerator::new();
        ids.next_id();
        ids.begin_reply(42);
        assert_eq!(ids.reply_id(), Some(42));
        assert_eq!(ids.next_id(), 42);
        assert_eq!(ids.next_id(), 42);
        ids.end_reply();
        assert_eq!(ids.reply_id(), None);
        assert_eq!(ids.next_id(), 2);
    }
}
