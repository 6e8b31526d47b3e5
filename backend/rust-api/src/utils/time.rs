use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Wire and storage format of attempt timestamps. Lexicographic order of the
/// formatted strings equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Local wall-clock time truncated to whole seconds.
pub fn now_seconds() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter for `NaiveDateTime` using [`TIMESTAMP_FORMAT`].
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_seconds_has_no_subsecond_part() {
        assert_eq!(now_seconds().nanosecond(), 0);
    }

    #[test]
    fn timestamp_strings_sort_chronologically() {
        let earlier = NaiveDate::from_ymd_opt(2025, 1, 9)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .unwrap();
        let later = NaiveDate::from_ymd_opt(2025, 1, 10)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();

        let a = earlier.format(TIMESTAMP_FORMAT).to_string();
        let b = later.format(TIMESTAMP_FORMAT).to_string();
        assert!(a < b);
    }

    #[test]
    fn format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date), "2025-03-07");
    }
}
