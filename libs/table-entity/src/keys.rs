//! Defaults for key fields left unset on a new entity.

use chrono::{Datelike, Local, Utc};
use uuid::Uuid;

use crate::config::ClockZone;

/// Source of synthesized partition and row keys.
pub trait KeySource: Send + Sync {
    fn partition_key(&self) -> String;
    fn row_key(&self) -> String;
}

/// `"{year}-{month}"`, month not zero-padded.
pub fn partition_key_for(date: &impl Datelike) -> String {
    format!("{}-{}", date.year(), date.month())
}

/// Fresh v4 UUID, hyphenated lower-case.
pub fn new_row_key() -> String {
    Uuid::new_v4().to_string()
}

/// System clock + random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeys {
    clock: ClockZone,
}

impl SystemKeys {
    pub fn new(clock: ClockZone) -> Self {
        Self { clock }
    }
}

impl KeySource for SystemKeys {
    fn partition_key(&self) -> String {
        match self.clock {
            ClockZone::Local => partition_key_for(&Local::now()),
            ClockZone::Utc => partition_key_for(&Utc::now()),
        }
    }

    fn row_key(&self) -> String {
        new_row_key()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn month_is_not_padded() {
        let date = NaiveDate::from_ymd_opt(2017, 3, 9).unwrap();
        assert_eq!(partition_key_for(&date), "2017-3");
        let date = NaiveDate::from_ymd_opt(2017, 10, 10).unwrap();
        assert_eq!(partition_key_for(&date), "2017-10");
    }

    #[test]
    fn row_keys_are_distinct_uuids() {
        let keys = SystemKeys::new(ClockZone::Utc);
        let a = keys.row_key();
        let b = keys.row_key();
        assert_ne!(a, b);
        let parsed = Uuid::parse_str(&a).unwrap();
        assert_eq!(parsed.to_string(), a);
    }

    #[test]
    fn utc_partition_key_matches_clock() {
        let before = partition_key_for(&Utc::now());
        let key = SystemKeys::new(ClockZone::Utc).partition_key();
        let after = partition_key_for(&Utc::now());
        assert!(key == before || key == after);
    }
}
