use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time with second precision, persisted as `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn at(time: NaiveDateTime) -> Self {
        Self(time.with_nanosecond(0).unwrap_or(time))
    }

    pub fn parse(input: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn drops_sub_second_precision() {
        let time = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_milli_opt(8, 30, 15, 750)
            .unwrap();

        let stamp = Timestamp::at(time);
        assert_eq!(stamp.to_string(), "2025-03-01 08:30:15");
        assert_eq!(Timestamp::parse("2025-03-01 08:30:15").unwrap(), stamp);
    }

    #[test]
    fn rejects_other_formats() {
        assert!(Timestamp::parse("2025-03-01T08:30:15Z").is_err());
        assert!(serde_json::from_str::<Timestamp>("42").is_err());
    }
}
