use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidates tracked by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl CandidateId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(pub String);

impl StageId {
    pub const APPLIED: &'static str = "applied";
    pub const SCREENING: &'static str = "screening";
    pub const INTERVIEW: &'static str = "interview";
    pub const OFFER: &'static str = "offer";
    pub const HIRED: &'static str = "hired";
    pub const REJECTED: &'static str = "rejected";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A person moving through the hiring pipeline.
///
/// `status` always names the stage that currently holds the candidate; only the
/// registry and the transition reducer change it once the candidate is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    pub position: String,
    /// Externally computed fit score in `0..=100`.
    pub score: u8,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: String,
    pub applied_on: NaiveDate,
    pub last_activity: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    pub status: StageId,
}

impl Candidate {
    /// Clamp the score and drop blank or repeated skills, keeping first-seen order.
    pub fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.skills.len());
        for skill in self.skills.drain(..) {
            let trimmed = skill.trim();
            if trimmed.is_empty() || seen.iter().any(|known: &String| known == trimmed) {
                continue;
            }
            seen.push(trimmed.to_string());
        }
        self.skills = seen;
        self.score = self.score.min(100);
    }
}

/// Named bucket in the hiring pipeline holding candidates in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl Stage {
    pub fn new(id: &str, title: &str, color: &str) -> Self {
        Self {
            id: StageId::new(id),
            title: title.to_string(),
            color: color.to_string(),
            candidates: Vec::new(),
        }
    }

    pub fn contains(&self, candidate_id: &CandidateId) -> bool {
        self.position_of(candidate_id).is_some()
    }

    pub(crate) fn position_of(&self, candidate_id: &CandidateId) -> Option<usize> {
        self.candidates
            .iter()
            .position(|candidate| &candidate.id == candidate_id)
    }
}

/// Per-stage headcount used by board headers and the stats strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    pub id: StageId,
    pub title: String,
    pub color: String,
    pub count: usize,
}
