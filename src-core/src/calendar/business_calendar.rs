//! Business-day counting used to scale daily quotas into weekly and monthly targets.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How the "week" of a date is measured when scaling a daily target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WeekConvention {
    /// A nominal Monday to Friday week, always five days.
    #[default]
    Standard,
    /// The ISO week (Monday to Sunday) containing the date, holidays excluded.
    IsoWeek,
    /// The ISO week containing the date, clipped to the date's month.
    IsoWeekInMonth,
}

pub trait BusinessCalendar: Send + Sync {
    fn business_days_in_month(&self, date: NaiveDate) -> u32;
    fn business_days_in_week(&self, date: NaiveDate, convention: WeekConvention) -> u32;
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Monday to Friday calendar with an optional holiday list.
#[derive(Debug, Clone, Default)]
pub struct WeekdayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        WeekdayCalendar {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    fn count_between(&self, from: NaiveDate, to: NaiveDate) -> u32 {
        from.iter_days()
            .take_while(|d| *d <= to)
            .filter(|d| self.is_business_day(*d))
            .count() as u32
    }
}

impl BusinessCalendar for WeekdayCalendar {
    fn business_days_in_month(&self, date: NaiveDate) -> u32 {
        self.count_between(month_start(date), month_end(date))
    }

    fn business_days_in_week(&self, date: NaiveDate, convention: WeekConvention) -> u32 {
        let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        let sunday = monday + Duration::days(6);
        match convention {
            WeekConvention::Standard => 5,
            WeekConvention::IsoWeek => self.count_between(monday, sunday),
            WeekConvention::IsoWeekInMonth => {
                let from = monday.max(month_start(date));
                let to = sunday.min(month_end(date));
                self.count_between(from, to)
            }
        }
    }
}
