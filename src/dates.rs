//! Calendar arithmetic helpers shared by the schedule advancer, the email
//! scheduler and the debt ledger.

use time::{Date, Month, util::days_in_year_month};

/// Add whole calendar months to a date, clamping the day-of-month to the last
/// day of the target month (e.g., Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: Date, months: u32) -> Date {
    let mut year = date.year();
    let mut month = date.month();

    for _ in 0..months {
        if month == Month::December {
            year += 1;
        }
        month = month.next();
    }

    let day = date.day().min(days_in_year_month(year, month));

    Date::from_calendar_date(year, month, day).expect("clamped day is always a valid date")
}

/// Add whole calendar years to a date, clamping Feb 29 to Feb 28 in non-leap
/// years.
pub fn add_years(date: Date, years: i32) -> Date {
    let year = date.year() + years;
    let day = date.day().min(days_in_year_month(year, date.month()));

    Date::from_calendar_date(year, date.month(), day).expect("clamped day is always a valid date")
}

/// The number of whole calendar months between two dates, counting month
/// components only. The day-of-month is ignored, so Jan 31 to Feb 1 counts as
/// one month. Negative when `end` is in an earlier month than `start`.
pub fn months_between(start: Date, end: Date) -> i64 {
    let year_months = (end.year() as i64 - start.year() as i64) * 12;
    let months = end.month() as i64 - start.month() as i64;

    year_months + months
}
