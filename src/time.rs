use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use color_eyre::{Report, Result, eyre::eyre};
use serde::Deserialize;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// An instant taken from the schedule feed or the local clock.
///
/// The feed sends naive date-times that are implicitly UTC, so a string
/// without a zone suffix is read as UTC. Epoch milliseconds are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "RawTimestamp")]
pub struct Timestamp(DateTime<Utc>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_millis(millis: i64) -> Result<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| eyre!("timestamp out of range: {millis}ms"))
    }

    pub fn in_zone(&self, tz: Tz) -> DateTime<Tz> {
        self.0.with_timezone(&tz)
    }
}

impl FromStr for Timestamp {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, NAIVE_FORMAT)
            .map(|naive| Self(naive.and_utc()))
            .map_err(|e| eyre!("invalid show time {s:?}: {e}"))
    }
}

impl TryFrom<RawTimestamp> for Timestamp {
    type Error = Report;

    fn try_from(raw: RawTimestamp) -> Result<Self> {
        match raw {
            RawTimestamp::Millis(millis) => Self::from_millis(millis),
            RawTimestamp::Text(text) => text.parse(),
        }
    }
}

/// Short weekday and month/day in `tz`, e.g. `Wed 3/10`.
pub fn day_label(ts: Timestamp, tz: Tz) -> String {
    ts.in_zone(tz).format("%a %-m/%-d").to_string()
}

/// 12-hour clock time in `tz`, e.g. `7:30pm`.
pub fn time_label(ts: Timestamp, tz: Tz) -> String {
    ts.in_zone(tz).format("%-I:%M%P").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::{Los_Angeles, New_York};
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    #[test]
    fn naive_strings_are_utc() {
        let t = ts("2024-03-05T23:30:00");
        assert_eq!(day_label(t, New_York), "Tue 3/5");
        assert_eq!(time_label(t, New_York), "6:30pm");
    }

    #[test]
    fn labels_depend_only_on_instant() {
        let naive = ts("2024-03-05T23:30:00");
        let zulu = ts("2024-03-05T23:30:00Z");
        let offset = ts("2024-03-05T18:30:00-05:00");
        let millis = Timestamp::from_millis(1_709_681_400_000).unwrap();

        for other in [zulu, offset, millis] {
            assert_eq!(day_label(naive, New_York), day_label(other, New_York));
            assert_eq!(time_label(naive, New_York), time_label(other, New_York));
        }
    }

    #[test]
    fn late_utc_times_fall_on_previous_local_day() {
        let t = ts("2024-03-06T03:15:00");
        assert_eq!(day_label(t, New_York), "Tue 3/5");
        assert_eq!(time_label(t, New_York), "10:15pm");
        assert_eq!(day_label(ts("2024-03-01T19:00:00"), Los_Angeles), "Fri 3/1");
        assert_eq!(time_label(ts("2024-03-01T19:00:00"), Los_Angeles), "11:00am");
    }

    #[test]
    fn noon_and_midnight() {
        assert_eq!(time_label(ts("2024-07-04T16:00:00"), New_York), "12:00pm");
        assert_eq!(time_label(ts("2024-07-04T04:00:00"), New_York), "12:00am");
        assert_eq!(day_label(ts("2024-07-04T04:00:00"), New_York), "Thu 7/4");
    }

    #[test]
    fn fractional_seconds() {
        assert_eq!(ts("2024-03-05T23:30:00.250"), ts("2024-03-05T23:30:00.250Z"));
    }

    #[test]
    fn deserializes_both_forms() {
        let text: Timestamp = serde_json::from_str("\"2024-03-05T23:30:00\"").unwrap();
        let millis: Timestamp = serde_json::from_str("1709681400000").unwrap();
        assert_eq!(text, millis);
        assert!(serde_json::from_str::<Timestamp>("\"next tuesday\"").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!("03/05/2024".parse::<Timestamp>().is_err());
        assert!("".parse::<Timestamp>().is_err());
    }
}
