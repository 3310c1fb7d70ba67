//! Composite storage key derivation.
//!
//! These names are persisted; changing them orphans existing data.

use super::slot::Slot;

pub(crate) fn latest_key(key: &str) -> String {
    format!("{}-latest", key)
}

pub(crate) fn metadata_key(key: &str, slot: Slot) -> String {
    format!("{}-{}-metadata", key, slot)
}

pub(crate) fn chunk_key(key: &str, slot: Slot, index: usize) -> String {
    format!("{}-{}-chunk-{}", key, slot, index)
}

pub(crate) fn complete_key(key: &str, slot: Slot) -> String {
    format!("{}-{}-complete", key, slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_are_bit_exact() {
        assert_eq!(latest_key("session-jwt"), "session-jwt-latest");
        assert_eq!(metadata_key("session-jwt", Slot::A), "session-jwt-A-metadata");
        assert_eq!(chunk_key("session-jwt", Slot::B, 12), "session-jwt-B-chunk-12");
        assert_eq!(complete_key("session-jwt", Slot::B), "session-jwt-B-complete");
    }
}
