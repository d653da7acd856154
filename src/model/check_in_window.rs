use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use crate::error::WindowError;

/// Wall-clock time of day with minute precision, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Truncates seconds.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl FromStr for ClockTime {
    type Err = String;

    /// Strict `HH:mm`: two digits, a colon, two digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(format!("'{s}' is not in HH:mm format"));
        }

        let digit = |i: usize| u16::from(bytes[i] - b'0');
        let hour = digit(0) * 10 + digit(1);
        let minute = digit(3) * 10 + digit(4);

        Self::new(hour, minute)
            .ok_or_else(|| format!("'{s}' is out of range (hour 00-23, minute 00-59)"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Weekdays a window is active on, in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaysOfWeek(Vec<Weekday>);

impl DaysOfWeek {
    /// Builds the set from Sunday-based indices (0 = Sunday .. 6 = Saturday).
    /// Duplicates collapse onto their first occurrence.
    pub fn from_indices<I>(indices: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut days = Vec::new();
        for index in indices {
            let day = weekday_from_index(index)
                .ok_or_else(|| format!("days_of_week value {index} must be between 0 and 6"))?;
            if !days.contains(&day) {
                days.push(day);
            }
        }

        if days.is_empty() {
            return Err("days_of_week must contain at least one day".to_string());
        }
        Ok(Self(days))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn indices(&self) -> Vec<u8> {
        self.0
            .iter()
            .map(|d| d.num_days_from_sunday() as u8)
            .collect()
    }

    /// Storage form, e.g. `"1,3,5"`.
    pub fn to_db_string(&self) -> String {
        self.indices()
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn parse_db(raw: &str) -> Result<Self, String> {
        let indices = raw
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<i64>()
                    .map_err(|_| format!("invalid weekday '{part}' in '{raw}'"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_indices(indices)
    }
}

impl Serialize for DaysOfWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.indices().serialize(serializer)
    }
}

fn weekday_from_index(index: i64) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "company_id": 10,
        "name": "Morning shift",
        "description": "Front desk opening",
        "start_time": "08:00",
        "end_time": "10:00",
        "days_of_week": [1, 2, 3, 4, 5],
        "is_active": true,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z"
    })
)]
pub struct CheckInWindow {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 10)]
    pub company_id: u64,

    #[schema(example = "Morning shift")]
    pub name: String,

    #[schema(example = "Front desk opening", nullable = true)]
    pub description: Option<String>,

    #[schema(example = "08:00", value_type = String)]
    pub start_time: ClockTime,

    #[schema(example = "10:00", value_type = String)]
    pub end_time: ClockTime,

    #[schema(example = json!([1, 2, 3, 4, 5]), value_type = Vec<u8>)]
    pub days_of_week: DaysOfWeek,

    #[schema(example = true)]
    pub is_active: bool,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl CheckInWindow {
    /// Closed interval: both boundaries count.
    pub fn covers(&self, time: ClockTime) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCheckInWindow {
    #[schema(example = "Morning shift")]
    pub name: String,
    #[schema(example = "Front desk opening", nullable = true)]
    pub description: Option<String>,
    #[schema(example = "08:00")]
    pub start_time: String,
    #[schema(example = "10:00")]
    pub end_time: String,
    #[schema(example = json!([1, 2, 3, 4, 5]))]
    pub days_of_week: Vec<i64>,
    #[schema(example = true, nullable = true)]
    pub is_active: Option<bool>,
}

/// Partial update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCheckInWindow {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, nullable = true)]
    pub description: Option<Option<String>>,
    #[schema(example = "09:00")]
    pub start_time: Option<String>,
    #[schema(example = "17:00")]
    pub end_time: Option<String>,
    #[schema(example = json!([1, 3, 5]))]
    pub days_of_week: Option<Vec<i64>>,
    pub is_active: Option<bool>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A validated window body, ready to be written to storage.
#[derive(Debug, Clone)]
pub struct WindowDraft {
    pub name: String,
    pub description: Option<String>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub days_of_week: DaysOfWeek,
    pub is_active: bool,
}

impl From<CheckInWindow> for WindowDraft {
    fn from(window: CheckInWindow) -> Self {
        Self {
            name: window.name,
            description: window.description,
            start_time: window.start_time,
            end_time: window.end_time,
            days_of_week: window.days_of_week,
            is_active: window.is_active,
        }
    }
}

/// Row shape of the `check_in_windows` table.
#[derive(Debug, sqlx::FromRow)]
pub struct CheckInWindowRow {
    pub id: u64,
    pub company_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub days_of_week: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CheckInWindowRow> for CheckInWindow {
    type Error = WindowError;

    fn try_from(row: CheckInWindowRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = move |reason: String| WindowError::CorruptRecord { id, reason };

        let start_time = row.start_time.parse().map_err(corrupt)?;
        let end_time = row.end_time.parse().map_err(corrupt)?;
        let days_of_week = DaysOfWeek::parse_db(&row.days_of_week).map_err(corrupt)?;

        Ok(Self {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            description: row.description,
            start_time,
            end_time,
            days_of_week,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_clock_time() {
        assert_eq!(t("00:00").minutes, 0);
        assert_eq!(t("09:05").minutes, 545);
        assert_eq!(t("23:59").minutes, 1439);
        assert_eq!(t("07:30").to_string(), "07:30");
    }

    #[test]
    fn rejects_malformed_clock_time() {
        for bad in ["9:00", "24:00", "12:60", "12-30", "12:300", "", "ab:cd", " 9:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn clock_time_ordering_matches_chronology() {
        assert!(t("08:59") < t("09:00"));
        assert!(t("17:00") < t("17:01"));
        assert!(t("10:00") > t("09:59"));
    }

    #[test]
    fn from_naive_drops_seconds() {
        let time = NaiveTime::from_hms_opt(17, 0, 59).unwrap();
        assert_eq!(ClockTime::from_naive(time), t("17:00"));
    }

    #[test]
    fn days_of_week_keeps_order_through_storage() {
        let days = DaysOfWeek::from_indices([0, 2, 4]).unwrap();
        assert_eq!(days.indices(), vec![0, 2, 4]);

        let stored = DaysOfWeek::from_indices([1, 3, 5]).unwrap().to_db_string();
        assert_eq!(stored, "1,3,5");
        assert_eq!(DaysOfWeek::parse_db(&stored).unwrap().indices(), vec![1, 3, 5]);

        let unordered = DaysOfWeek::from_indices([5, 1, 3]).unwrap();
        assert_eq!(DaysOfWeek::parse_db(&unordered.to_db_string()).unwrap(), unordered);
    }

    #[test]
    fn days_of_week_collapses_duplicates() {
        let days = DaysOfWeek::from_indices([3, 1, 3, 1]).unwrap();
        assert_eq!(days.indices(), vec![3, 1]);
    }

    #[test]
    fn days_of_week_rejects_empty_and_out_of_range() {
        assert!(DaysOfWeek::from_indices(Vec::<i64>::new()).is_err());
        assert!(DaysOfWeek::from_indices([7]).is_err());
        assert!(DaysOfWeek::from_indices([-1]).is_err());
        assert!(DaysOfWeek::parse_db("1,x").is_err());
        assert!(DaysOfWeek::parse_db("").is_err());
    }

    #[test]
    fn sunday_is_index_zero() {
        let days = DaysOfWeek::from_indices([0]).unwrap();
        assert!(days.contains(Weekday::Sun));
        assert!(!days.contains(Weekday::Mon));
    }

    #[test]
    fn window_serializes_wire_form() {
        let window = CheckInWindow {
            id: 1,
            company_id: 2,
            name: "Morning".into(),
            description: None,
            start_time: t("08:00"),
            end_time: t("10:30"),
            days_of_week: DaysOfWeek::from_indices([1, 3]).unwrap(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["start_time"], "08:00");
        assert_eq!(json["end_time"], "10:30");
        assert_eq!(json["days_of_week"], serde_json::json!([1, 3]));
    }

    #[test]
    fn update_distinguishes_null_from_omitted_description() {
        let cleared: UpdateCheckInWindow =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateCheckInWindow = serde_json::from_str(r#"{"description": "Desk"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Desk".to_string())));

        let untouched: UpdateCheckInWindow = serde_json::from_str(r#"{"name": "Early"}"#).unwrap();
        assert_eq!(untouched.description, None);
    }

    #[test]
    fn corrupt_row_is_reported() {
        let row = CheckInWindowRow {
            id: 9,
            company_id: 1,
            name: "Broken".into(),
            description: None,
            start_time: "25:00".into(),
            end_time: "26:00".into(),
            days_of_week: "1".into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        match CheckInWindow::try_from(row) {
            Err(WindowError::CorruptRecord { id, .. }) => assert_eq!(id, 9),
            other => panic!("expected corrupt record, got {other:?}"),
        }
    }
}
