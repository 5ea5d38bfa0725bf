//! Publication cadence of a data source.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::IndexError;

/// The temporal grid a source publishes files on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawInterval")]
pub enum IntervalKind {
    Day,
    /// Weeks closing on Sunday.
    Week,
    /// Calendar months, referenced by their last day.
    Month,
    /// Three periods per month closing on the 10th, the 20th and the last day.
    Dekad,
    /// Fixed steps of `n` days counted from the start of the range.
    NDay(u32),
}

impl IntervalKind {
    /// Rejects kinds no sequence can be generated for.
    pub fn validate(self) -> Result<Self, IndexError> {
        match self {
            IntervalKind::NDay(0) => Err(IndexError::InvalidInterval(
                "day step must be positive".to_string(),
            )),
            kind => Ok(kind),
        }
    }

    fn from_days(days: i64) -> Result<Self, IndexError> {
        match days {
            1 => Ok(IntervalKind::Day),
            n if n > 0 => u32::try_from(n)
                .map(IntervalKind::NDay)
                .map_err(|_| IndexError::InvalidInterval(format!("day step {n} is too large"))),
            n => Err(IndexError::InvalidInterval(format!(
                "day step must be positive, got {n}"
            ))),
        }
    }
}

impl FromStr for IntervalKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dekad" | "dekadal" | "decadal" | "decade" => Ok(IntervalKind::Dekad),
            "day" | "daily" | "1" => Ok(IntervalKind::Day),
            "week" | "weekly" | "7" => Ok(IntervalKind::Week),
            "month" | "monthly" => Ok(IntervalKind::Month),
            other => match other.parse::<i64>() {
                Ok(days) => IntervalKind::from_days(days),
                Err(_) => Err(IndexError::InvalidInterval(format!(
                    "unrecognised interval `{s}`"
                ))),
            },
        }
    }
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalKind::Day => write!(f, "day"),
            IntervalKind::Week => write!(f, "week"),
            IntervalKind::Month => write!(f, "month"),
            IntervalKind::Dekad => write!(f, "dekad"),
            IntervalKind::NDay(n) => write!(f, "{n}"),
        }
    }
}

// Config files may spell the interval as a name or as a bare day count.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawInterval {
    Days(i64),
    Name(String),
}

impl TryFrom<RawInterval> for IntervalKind {
    type Error = IndexError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        match raw {
            RawInterval::Days(days) => IntervalKind::from_days(days),
            RawInterval::Name(name) => name.parse(),
        }
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        interval: IntervalKind,
    }

    #[test]
    fn should_parse_interval_names() {
        for name in ["dekad", "dekadal", "decadal", "Decade"] {
            assert_eq!(name.parse::<IntervalKind>().unwrap(), IntervalKind::Dekad);
        }
        assert_eq!("daily".parse::<IntervalKind>().unwrap(), IntervalKind::Day);
        assert_eq!("1".parse::<IntervalKind>().unwrap(), IntervalKind::Day);
        assert_eq!("weekly".parse::<IntervalKind>().unwrap(), IntervalKind::Week);
        assert_eq!("7".parse::<IntervalKind>().unwrap(), IntervalKind::Week);
        assert_eq!("month".parse::<IntervalKind>().unwrap(), IntervalKind::Month);
        assert_eq!("8".parse::<IntervalKind>().unwrap(), IntervalKind::NDay(8));
    }

    #[test]
    fn should_reject_unknown_or_non_positive_intervals() {
        assert!(matches!(
            "fortnight".parse::<IntervalKind>(),
            Err(IndexError::InvalidInterval(_))
        ));
        assert!(matches!(
            "0".parse::<IntervalKind>(),
            Err(IndexError::InvalidInterval(_))
        ));
        assert!(matches!(
            "-3".parse::<IntervalKind>(),
            Err(IndexError::InvalidInterval(_))
        ));
        assert!(IntervalKind::NDay(0).validate().is_err());
        assert_eq!(IntervalKind::NDay(5).validate(), Ok(IntervalKind::NDay(5)));
    }

    #[test]
    fn should_deserialise_name_or_day_count() {
        let h: Holder = toml::from_str(r#"interval = "dekadal""#).unwrap();
        assert_eq!(h.interval, IntervalKind::Dekad);

        let h: Holder = toml::from_str("interval = 8").unwrap();
        assert_eq!(h.interval, IntervalKind::NDay(8));

        assert!(toml::from_str::<Holder>("interval = 0").is_err());
    }

    #[test]
    fn should_display_canonical_name() {
        assert_eq!(IntervalKind::Dekad.to_string(), "dekad");
        assert_eq!(IntervalKind::NDay(8).to_string(), "8");
        assert_eq!(
            IntervalKind::Week.to_string().parse::<IntervalKind>().unwrap(),
            IntervalKind::Week
        );
    }
}
