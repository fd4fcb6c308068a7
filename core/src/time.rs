//! Time related utils.

use crate::{Error, Result};
use chrono::{TimeZone, Utc};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime with current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Whole seconds since the UNIX epoch.
pub fn epoch_seconds(time: DateTime) -> i64 {
    time.timestamp()
}

/// Build a DateTime from whole seconds since the UNIX epoch.
pub fn from_epoch_seconds(secs: i64) -> Result<DateTime> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::unexpected(format!("epoch seconds {secs} out of range")))
}

/// Format time into RFC3339: `2022-03-13T07:20:04Z`
pub fn format_rfc3339(t: DateTime) -> String {
    t.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_round_trip() -> Result<()> {
        let t = from_epoch_seconds(1_700_000_000)?;
        assert_eq!(epoch_seconds(t), 1_700_000_000);
        assert_eq!(format_rfc3339(t), "2023-11-14T22:13:20Z");
        Ok(())
    }

    #[test]
    fn test_from_epoch_seconds_out_of_range() {
        assert!(from_epoch_seconds(i64::MAX).is_err());
    }
}
