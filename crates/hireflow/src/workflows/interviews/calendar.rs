use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use super::domain::{clock_time, Interview, InterviewStatus};

const FIRST_SLOT_HOUR: u32 = 9;
const LAST_SLOT_HOUR: u32 = 17;
const SLOT_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview: Option<Interview>,
}

/// Month laid out for a Sunday-first grid: blanks before day one, then every day.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; leading];
    cells.extend((1..=31).filter_map(|day| NaiveDate::from_ymd_opt(year, month, day).map(Some)));
    Some(cells)
}

/// Half-hour slots from 09:00 to 17:30; a slot is taken when an interview starts at it.
pub fn time_slots(interviews: &[Interview], date: NaiveDate) -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|hour| (0..60).step_by(SLOT_MINUTES as usize).map(move |minute| (hour, minute)))
        .filter_map(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0))
        .map(|time| {
            let interview = interviews
                .iter()
                .find(|interview| interview.date == date && interview.time == time)
                .cloned();
            TimeSlot {
                time,
                available: interview.is_none(),
                interview,
            }
        })
        .collect()
}

pub fn on_date(interviews: &[Interview], date: NaiveDate) -> Vec<Interview> {
    interviews
        .iter()
        .filter(|interview| interview.date == date)
        .cloned()
        .collect()
}

/// `None` keeps every interview.
pub fn with_status(interviews: &[Interview], status: Option<InterviewStatus>) -> Vec<Interview> {
    interviews
        .iter()
        .filter(|interview| status.map_or(true, |status| interview.status == status))
        .cloned()
        .collect()
}
