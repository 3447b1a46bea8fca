//! Correlation id generation for outgoing commands.

/// Wrapping message id counter.
///
/// The first id handed out is 1; after `u32::MAX` the sequence continues at 0.
#[derive(Debug, Clone, Default)]
pub struct MessageIdGenerator {
    counter: u32,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `counter`; the next id is `counter + 1`.
    pub fn starting_at(counter: u32) -> Self {
        Self { counter }
    }

    /// Advance the counter and return the new id.
    pub fn next_id(&mut self) -> u32 {
        self.counter = self.counter.wrapping_add(1);
        self.counter
    }

    /// The most recently issued id (0 before the first call).
    pub fn current(&self) -> u32 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_id_is_one() {
        let mut ids = MessageIdGenerator::new();
        assert_eq!(ids.current(), 0);
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }

    #[test]
    fn wraps_to_zero_after_max() {
        let mut ids = MessageIdGenerator::starting_at(u32::MAX - 2);
        let seq: Vec<u32> = (0..4).map(|_| ids.next_id()).collect();
        assert_eq!(seq, vec![u32::MAX - 1, u32::MAX, 0, 1]);
    }
}
