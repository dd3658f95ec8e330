use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

fn last_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last_day = first_of_next.pred_opt()?;
    Some(last_day - Duration::days(i64::from(last_day.weekday().num_days_from_sunday())))
}

/// EU summer time runs from 01:00 UTC on the last Sunday of March to 01:00 UTC
/// on the last Sunday of October.
fn summer_time_window(year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let switch = NaiveTime::from_hms_opt(1, 0, 0)?;
    Some((
        last_sunday(year, 3)?.and_time(switch),
        last_sunday(year, 10)?.and_time(switch),
    ))
}

/// Wall-clock time in France (CET/CEST) for a UTC instant.
pub fn paris_time(utc: DateTime<Utc>) -> NaiveDateTime {
    let naive = utc.naive_utc();
    let summer = summer_time_window(naive.year())
        .is_some_and(|(start, end)| naive >= start && naive < end);
    naive + Duration::hours(if summer { 2 } else { 1 })
}

pub fn paris_now() -> NaiveDateTime {
    paris_time(Utc::now())
}
