//! Instance identifiers and timestamps.

use uuid::Uuid;

/// Generates a fresh unique instance identifier.
pub fn new_instance_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_unique() {
        assert_ne!(new_instance_id(), new_instance_id());
    }

    #[test]
    fn unix_now_is_past_2020() {
        assert!(unix_now() > 1_577_836_800);
    }
}
