use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Clock convention of the quoted time strings in the first sheet column.
///
/// Recordings seen so far use a 12-hour clock with no AM/PM marker, which is
/// why that is the default. Sessions exported with a 24-hour clock need
/// `TwentyFourHour`, otherwise afternoon samples fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::TwelveHour => write!(f, "12-hour"),
            TimeFormat::TwentyFourHour => write!(f, "24-hour"),
        }
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "12h" | "12" => Ok(TimeFormat::TwelveHour),
            "24h" | "24" => Ok(TimeFormat::TwentyFourHour),
            other => Err(format!("unknown time format {other:?} (expected 12h or 24h)")),
        }
    }
}

impl TimeFormat {
    /// Parse a cell such as `'09:41:07.250000'` into a time of day.
    ///
    /// The enclosing single quotes are part of the stored text and must be
    /// present, with nothing around them. The seconds carry a fraction of one
    /// to six digits. A 12-hour value has no meridiem and is read as AM, so
    /// `'12:00:01.0'` is one second past midnight.
    pub fn parse(self, raw: &str) -> Option<NaiveTime> {
        let inner = raw.strip_prefix('\'')?.strip_suffix('\'')?;
        let (_, fraction) = inner.rsplit_once('.')?;
        if !(1..=6).contains(&fraction.len()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match self {
            TimeFormat::TwelveHour => {
                NaiveTime::parse_from_str(&format!("{inner} AM"), "%I:%M:%S%.f %p").ok()
            }
            TimeFormat::TwentyFourHour => NaiveTime::parse_from_str(inner, "%H:%M:%S%.f").ok(),
        }
    }
}

/// Signed seconds from `start` to `t`, with microsecond resolution.
pub fn seconds_between(start: NaiveTime, t: NaiveTime) -> f64 {
    let delta = t.signed_duration_since(start);
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}
