//! Calendar frequencies for resampling.

use crate::error::ConfigError;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar bucket size.
///
/// Every bucket is labelled by its right edge: the last calendar day of the
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Daily,
    /// Weeks running Monday through Sunday, labelled by the Sunday.
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// Short code as accepted by `from_str`.
    pub fn code(self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
            Frequency::Monthly => "M",
            Frequency::Quarterly => "Q",
            Frequency::Yearly => "A",
        }
    }

    /// Last calendar day of the period containing `date`, or `None` when that
    /// day lies past the last representable date.
    pub fn period_end(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => Some(date),
            Frequency::Weekly => {
                let to_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
                date.checked_add_days(Days::new(u64::from(to_sunday)))
            }
            Frequency::Monthly => month_end(date.year(), date.month()),
            Frequency::Quarterly => {
                let last_month = ((date.month() - 1) / 3 + 1) * 3;
                month_end(date.year(), last_month)
            }
            Frequency::Yearly => month_end(date.year(), 12),
        }
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    if year == NaiveDate::MAX.year() && month == 12 {
        return Some(NaiveDate::MAX);
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

impl FromStr for Frequency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "D" => Ok(Frequency::Daily),
            "W" | "W-SUN" => Ok(Frequency::Weekly),
            "M" | "ME" => Ok(Frequency::Monthly),
            "Q" | "QE" => Ok(Frequency::Quarterly),
            "A" | "Y" | "YE" => Ok(Frequency::Yearly),
            _ => Err(ConfigError::UnknownFrequency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.code().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("w".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("W-SUN".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("ME".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert_eq!("y".parse::<Frequency>().unwrap(), Frequency::Yearly);
        assert!(matches!(
            "H".parse::<Frequency>(),
            Err(ConfigError::UnknownFrequency(_))
        ));
    }

    #[test]
    fn week_ends_on_sunday() {
        // 2024-01-01 was a Monday
        assert_eq!(Frequency::Weekly.period_end(d(2024, 1, 1)), Some(d(2024, 1, 7)));
        assert_eq!(Frequency::Weekly.period_end(d(2024, 1, 6)), Some(d(2024, 1, 7)));
        assert_eq!(Frequency::Weekly.period_end(d(2024, 1, 7)), Some(d(2024, 1, 7)));
        assert_eq!(Frequency::Weekly.period_end(d(2024, 1, 8)), Some(d(2024, 1, 14)));
    }

    #[test]
    fn month_quarter_year_ends() {
        assert_eq!(Frequency::Monthly.period_end(d(2024, 2, 10)), Some(d(2024, 2, 29)));
        assert_eq!(Frequency::Monthly.period_end(d(2023, 12, 1)), Some(d(2023, 12, 31)));
        assert_eq!(Frequency::Quarterly.period_end(d(2024, 5, 3)), Some(d(2024, 6, 30)));
        assert_eq!(Frequency::Quarterly.period_end(d(2024, 12, 31)), Some(d(2024, 12, 31)));
        assert_eq!(Frequency::Yearly.period_end(d(2024, 3, 3)), Some(d(2024, 12, 31)));
        assert_eq!(Frequency::Daily.period_end(d(2024, 3, 3)), Some(d(2024, 3, 3)));
    }

    #[test]
    fn week_end_past_last_date_is_none() {
        let last = NaiveDate::MAX;
        if last.weekday() != chrono::Weekday::Sun {
            assert_eq!(Frequency::Weekly.period_end(last), None);
        }
        assert_eq!(Frequency::Monthly.period_end(last), Some(last));
        assert_eq!(Frequency::Yearly.period_end(last), Some(last));
        assert_eq!(Frequency::Daily.period_end(last), Some(last));
    }

    #[test]
    fn display_round_trips() {
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Yearly,
        ] {
            assert_eq!(freq.to_string().parse::<Frequency>().unwrap(), freq);
        }
    }
}
