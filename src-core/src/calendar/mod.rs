pub mod business_calendar;

pub use business_calendar::{month_end, month_start, BusinessCalendar, WeekConvention, WeekdayCalendar};
