//! Message-id generation.
//!
//! Every message needs a globally unique id. The generator is a
//! capability owned by the room so tests can inject a deterministic one.

use rand::Rng;

/// Produces fresh, globally unique message ids.
pub trait MessageIds: Send + 'static {
    /// Returns the next id. Each call must return a distinct value.
    fn next_id(&mut self) -> String;
}

/// Random 32-character hex ids (128 bits of entropy).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl MessageIds for RandomIds {
    fn next_id(&mut self) -> String {
        let bytes: [u8; 16] = rand::rng().random();
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Counting ids ("m-1", "m-2", …) for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageIds for SequentialIds {
    fn next_id(&mut self) -> String {
        self.next += 1;
        format!("m-{}", self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_32_hex_chars() {
        let mut ids = RandomIds;
        let id = ids.next_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_ids_do_not_repeat() {
        let mut ids = RandomIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), "m-1");
        assert_eq!(ids.next_id(), "m-2");
    }
}
