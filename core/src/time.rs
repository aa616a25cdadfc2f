//! Date helpers for item payloads.
//!
//! The server stores scheduled and due dates as the UTC timestamp of the
//! calendar date at midnight, regardless of the user's timezone. Creation and
//! modification stamps are plain fractional seconds since the epoch.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Seconds since the epoch, with sub-second precision.
pub fn timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Today's calendar date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `date` moved by `days`, or `None` past the representable calendar.
pub fn offset_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let delta = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    }
}

/// Timestamp of `date` at 00:00 UTC.
pub fn as_timestamp(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .timestamp()
}

/// Calendar date of a timestamp produced by `as_timestamp`.
pub fn date_from_timestamp(secs: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.date_naive())
}

/// Serde adapter for `Option<NaiveDate>` fields stored as `as_timestamp`
/// integers. `None` is written as JSON `null`.
pub mod date_stamp {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<Option<NaiveDate>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(Some(date)) => serializer.serialize_i64(super::as_timestamp(*date)),
            _ => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<i64>::deserialize(deserializer)? {
            Some(secs) => super::date_from_timestamp(secs)
                .map(|date| Some(Some(date)))
                .ok_or_else(|| de::Error::custom(format!("timestamp {secs} out of range"))),
            None => Ok(Some(None)),
        }
    }
}
