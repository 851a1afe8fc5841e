//! Wall-clock helper

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as Unix seconds
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2024-01-01 as a sanity floor
        assert!(unix_timestamp() > 1_704_000_000);
    }
}
