use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(pub String);

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterviewKind {
    Phone,
    #[default]
    Video,
    InPerson,
}

impl InterviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewKind::Phone => "phone",
            InterviewKind::Video => "video",
            InterviewKind::InPerson => "in-person",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::Confirmed => "confirmed",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(InterviewStatus::Scheduled),
            "confirmed" => Some(InterviewStatus::Confirmed),
            "completed" => Some(InterviewStatus::Completed),
            "cancelled" => Some(InterviewStatus::Cancelled),
            "rescheduled" => Some(InterviewStatus::Rescheduled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub candidate_name: String,
    pub candidate_email: String,
    pub position: String,
    pub kind: InterviewKind,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub interviewer: String,
    pub interviewer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    pub status: InterviewStatus,
    #[serde(default)]
    pub notes: String,
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<u8>,
}

fn default_duration() -> u32 {
    60
}

fn default_round() -> u32 {
    1
}

/// Scheduling request as submitted by a recruiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInterview {
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub kind: InterviewKind,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub interviewer: String,
    #[serde(default)]
    pub interviewer_email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "default_round")]
    pub round: u32,
}

impl NewInterview {
    /// Every new interview starts out `scheduled`; blank location and link are dropped.
    pub fn into_interview(self, id: InterviewId) -> Interview {
        Interview {
            id,
            candidate_name: self.candidate_name,
            candidate_email: self.candidate_email,
            position: self.position,
            kind: self.kind,
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes,
            interviewer: self.interviewer,
            interviewer_email: self.interviewer_email,
            location: non_blank(self.location),
            meeting_link: non_blank(self.meeting_link),
            status: InterviewStatus::Scheduled,
            notes: self.notes,
            round: self.round,
            ai_score: None,
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `HH:MM` wall-clock times, accepting seconds on input.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time {raw:?}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_interviews_take_form_defaults() {
        let request: NewInterview = serde_json::from_value(json!({
            "candidate_name": "Sarah Johnson",
            "candidate_email": "sarah.johnson@email.com",
            "date": "2024-01-25",
            "time": "10:00",
            "location": "  "
        }))
        .expect("request parses");

        let interview = request.into_interview(InterviewId("int-1".to_string()));

        assert_eq!(interview.kind, InterviewKind::Video);
        assert_eq!(interview.duration_minutes, 60);
        assert_eq!(interview.round, 1);
        assert_eq!(interview.status, InterviewStatus::Scheduled);
        assert_eq!(interview.location, None);
    }

    #[test]
    fn times_round_trip_as_hours_and_minutes() {
        let request: NewInterview = serde_json::from_value(json!({
            "candidate_name": "Emily Rodriguez",
            "candidate_email": "emily.rodriguez@email.com",
            "kind": "in-person",
            "date": "2024-01-26",
            "time": "11:00:00"
        }))
        .expect("request parses");

        let interview = request.into_interview(InterviewId("int-2".to_string()));
        let encoded = serde_json::to_value(&interview).expect("encodes");

        assert_eq!(encoded["time"], json!("11:00"));
        assert_eq!(encoded["kind"], json!("in-person"));
        assert!(clock_time::parse("25:00").is_none());
    }
}
