//! Calendar-checked TOML dates and times.
//!
//! Values are validated (month and day bounds, leap years, 24-hour clock,
//! offset range) but never converted to an absolute instant.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use regex::Regex;

static PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<y>[0-9]{4})-(?P<mo>[0-9]{2})-(?P<d>[0-9]{2}))?(?:(?:^|[Tt ])(?P<h>[0-9]{2}):(?P<mi>[0-9]{2}):(?P<s>[0-9]{2})(?:\.(?P<frac>[0-9]+))?(?P<off>[Zz]|[+-][0-9]{2}:[0-9]{2})?)?$",
    )
    .unwrap()
});

/// UTC offset of an offset date-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    /// `Z`
    Z,
    /// `+HH:MM` / `-HH:MM`, stored as signed minutes
    Custom { minutes: i16 },
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Z => write!(f, "Z"),
            Offset::Custom { minutes } => {
                let sign = if minutes < 0 { '-' } else { '+' };
                let abs = minutes.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 60, abs % 60)
            }
        }
    }
}

/// A TOML date-time in one of its four flavours.
///
/// | date | time | offset | flavour               |
/// |------|------|--------|-----------------------|
/// | yes  | yes  | yes    | offset date-time      |
/// | yes  | yes  | no     | local date-time       |
/// | yes  | no   | no     | local date            |
/// | no   | yes  | no     | local time            |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datetime {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub offset: Option<Offset>,
}

/// Why a date-time lexeme was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DatetimeError(pub String);

fn field(caps: &regex::Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

impl FromStr for Datetime {
    type Err = DatetimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = PARTS
            .captures(s)
            .ok_or_else(|| DatetimeError("not an RFC 3339 date or time".to_string()))?;

        let date = match (field(&caps, "y"), field(&caps, "mo"), field(&caps, "d")) {
            (Some(y), Some(mo), Some(d)) => {
                if !(1..=12).contains(&mo) {
                    return Err(DatetimeError(format!("month {mo} is out of range")));
                }
                let date = NaiveDate::from_ymd_opt(y as i32, mo, d).ok_or_else(|| {
                    DatetimeError(format!("day {d} does not exist in {y:04}-{mo:02}"))
                })?;
                Some(date)
            }
            _ => None,
        };

        let time = match (field(&caps, "h"), field(&caps, "mi"), field(&caps, "s")) {
            (Some(h), Some(mi), Some(sec)) => {
                let nanos = match caps.name("frac") {
                    Some(m) => {
                        // Sub-nanosecond digits are truncated.
                        let digits: String = m.as_str().chars().take(9).collect();
                        format!("{digits:0<9}")
                            .parse::<u32>()
                            .map_err(|e| DatetimeError(e.to_string()))?
                    }
                    None => 0,
                };
                if h > 23 || mi > 59 || sec > 59 {
                    return Err(DatetimeError(format!(
                        "time {h:02}:{mi:02}:{sec:02} is out of range"
                    )));
                }
                let time = NaiveTime::from_hms_nano_opt(h, mi, sec, nanos)
                    .ok_or_else(|| DatetimeError(format!("invalid fraction in {s}")))?;
                Some(time)
            }
            _ => None,
        };

        let offset = match caps.name("off").map(|m| m.as_str()) {
            None => None,
            Some("Z" | "z") => Some(Offset::Z),
            Some(off) => {
                let hours: i16 = off[1..3].parse().map_err(|_| DatetimeError(off.to_string()))?;
                let mins: i16 = off[4..6].parse().map_err(|_| DatetimeError(off.to_string()))?;
                if hours > 23 || mins > 59 {
                    return Err(DatetimeError(format!("offset {off} is out of range")));
                }
                let total = hours * 60 + mins;
                Some(Offset::Custom {
                    minutes: if off.starts_with('-') { -total } else { total },
                })
            }
        };

        match (date, time, offset) {
            (None, None, _) => Err(DatetimeError("empty date-time".to_string())),
            (None, Some(_), Some(_)) => Err(DatetimeError(
                "a time without a date cannot carry an offset".to_string(),
            )),
            _ => Ok(Datetime { date, time, offset }),
        }
    }
}

impl fmt::Display for Datetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(date) = self.date {
            write!(f, "{:04}-{:02}-{:02}", date.year(), date.month(), date.day())?;
            if self.time.is_some() {
                write!(f, "T")?;
            }
        }
        if let Some(time) = self.time {
            write!(f, "{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())?;
            let nanos = time.nanosecond();
            if nanos != 0 {
                let frac = format!("{nanos:09}");
                write!(f, ".{}", frac.trim_end_matches('0'))?;
            }
        }
        if let Some(offset) = self.offset {
            write!(f, "{offset}")?;
        }
        Ok(())
    }
}
