//! Point-in-time check-in eligibility.
//!
//! Works on an already-fetched list of active windows in `(start_time, id)`
//! order; the first window in that order wins every tie.

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::check_in_window::{CheckInWindow, ClockTime, weekday_name};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NextWindow {
    pub window: CheckInWindow,
    /// Weekday the window opens on, 0 = Sunday.
    #[schema(example = 5)]
    pub day: u8,
    /// 0 when it opens later today.
    #[schema(example = 4)]
    pub days_ahead: u8,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(example = json!({
    "allowed": false,
    "reason": "Check-in is closed. Next window: Morning shift (08:00-10:00) on Monday",
    "active_window": null,
    "next_window": null
}))]
pub struct CheckInDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub active_window: Option<CheckInWindow>,
    pub next_window: Option<NextWindow>,
}

pub fn evaluate(windows: &[CheckInWindow], now: NaiveDateTime) -> CheckInDecision {
    let today = now.weekday();
    let time = ClockTime::from_naive(now.time());

    if let Some(window) = windows
        .iter()
        .find(|w| w.days_of_week.contains(today) && w.covers(time))
    {
        return CheckInDecision {
            allowed: true,
            reason: None,
            active_window: Some(window.clone()),
            next_window: None,
        };
    }

    match next_window(windows, today, time) {
        Some((window, day, days_ahead)) => CheckInDecision {
            allowed: false,
            reason: Some(closed_reason(window, day, days_ahead)),
            active_window: None,
            next_window: Some(NextWindow {
                window: window.clone(),
                day: day.num_days_from_sunday() as u8,
                days_ahead,
            }),
        },
        None => CheckInDecision {
            allowed: false,
            reason: Some("No active check-in windows are configured".to_string()),
            active_window: None,
            next_window: None,
        },
    }
}

fn next_window(
    windows: &[CheckInWindow],
    today: Weekday,
    time: ClockTime,
) -> Option<(&CheckInWindow, Weekday, u8)> {
    if let Some(window) = windows
        .iter()
        .find(|w| w.days_of_week.contains(today) && w.start_time > time)
    {
        return Some((window, today, 0));
    }

    // Offset 7 is today again, a week out.
    let mut day = today;
    for days_ahead in 1..=7u8 {
        day = day.succ();
        if let Some(window) = windows.iter().find(|w| w.days_of_week.contains(day)) {
            return Some((window, day, days_ahead));
        }
    }

    None
}

fn closed_reason(window: &CheckInWindow, day: Weekday, days_ahead: u8) -> String {
    let when = if days_ahead == 0 {
        "today".to_string()
    } else {
        format!("on {}", weekday_name(day))
    };

    format!(
        "Check-in is closed. Next window: {} ({}-{}) {}",
        window.name, window.start_time, window.end_time, when
    )
}
