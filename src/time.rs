use std::time::{SystemTime, UNIX_EPOCH};
use chrono::{DateTime, Utc};

/// Steam timestamps are parsed into UTC datetimes.
pub type ServerTime = DateTime<Utc>;

pub fn get_system_time() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(n) => n.as_secs(),
        // should never occur
        Err(_) => 0,
    }
}
