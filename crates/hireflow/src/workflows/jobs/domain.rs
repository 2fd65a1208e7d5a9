use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::screening::JobDraft;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Remote,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Paused,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Paused => "paused",
            JobStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(JobStatus::Active),
            "paused" => Some(JobStatus::Paused),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
}

/// Percentage weights applied when matching candidates against a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingCriteria {
    pub skills_weight: u8,
    pub experience_weight: u8,
    pub education_weight: u8,
    pub location_weight: u8,
}

impl Default for MatchingCriteria {
    fn default() -> Self {
        Self {
            skills_weight: 40,
            experience_weight: 30,
            education_weight: 15,
            location_weight: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub department: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary: SalaryRange,
    pub description: String,
    pub requirements: Vec<String>,
    pub skills: Vec<String>,
    pub experience: String,
    pub posted_on: NaiveDate,
    pub status: JobStatus,
    pub applicants: u32,
    pub ai_matching_enabled: bool,
    pub matching_criteria: MatchingCriteria,
}

/// Free-text form a recruiter fills in before a posting exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobForm {
    pub title: String,
    pub department: String,
    pub location: String,
    pub employment_type: EmploymentType,
    pub salary_min: String,
    pub salary_max: String,
    pub description: String,
    /// One requirement per line.
    pub requirements: String,
    /// Comma separated.
    pub skills: String,
    pub experience: String,
}

impl JobForm {
    pub fn into_posting(self, id: JobId, posted_on: NaiveDate) -> JobPosting {
        JobPosting {
            id,
            salary: SalaryRange {
                min: parse_salary(&self.salary_min),
                max: parse_salary(&self.salary_max),
            },
            requirements: split_requirements(&self.requirements),
            skills: split_skills(&self.skills),
            title: self.title,
            department: self.department,
            location: self.location,
            employment_type: self.employment_type,
            description: self.description,
            experience: self.experience,
            posted_on,
            status: JobStatus::Active,
            applicants: 0,
            ai_matching_enabled: true,
            matching_criteria: MatchingCriteria::default(),
        }
    }

    /// Fill the free-text fields from a generated draft.
    pub fn apply_draft(&mut self, draft: JobDraft) {
        self.description = draft.description;
        self.requirements = draft.requirements.join("\n");
        self.skills = draft.skills.join(", ");
        self.experience = "3+ years".to_string();
    }
}

/// Non-blank lines, kept as written.
pub fn split_requirements(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_skills(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

/// Leading digits of the field; anything unparseable is zero.
pub fn parse_salary(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Search text plus an optional status; `None` means every status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub search: String,
    pub status: Option<JobStatus>,
}

impl JobFilter {
    pub fn matches(&self, job: &JobPosting) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = job.title.to_lowercase().contains(&needle)
            || job.department.to_lowercase().contains(&needle);
        let matches_status = self.status.map_or(true, |status| job.status == status);
        matches_search && matches_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> JobForm {
        JobForm {
            title: "Senior Full Stack Developer".to_string(),
            department: "Engineering".to_string(),
            location: "San Francisco, CA".to_string(),
            employment_type: EmploymentType::FullTime,
            salary_min: "120000".to_string(),
            salary_max: "lots".to_string(),
            description: "Build the platform".to_string(),
            requirements: "5+ years of experience\n\n  \nProficiency in React".to_string(),
            skills: "React, Node.js , ,TypeScript".to_string(),
            experience: "5+ years".to_string(),
        }
    }

    #[test]
    fn form_fields_are_split_into_lists() {
        let posting = form().into_posting(
            JobId("job-1".to_string()),
            NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        );

        assert_eq!(
            posting.requirements,
            vec!["5+ years of experience", "Proficiency in React"]
        );
        assert_eq!(posting.skills, vec!["React", "Node.js", "TypeScript"]);
        assert_eq!(posting.salary, SalaryRange { min: 120000, max: 0 });
        assert_eq!(posting.status, JobStatus::Active);
        assert_eq!(posting.applicants, 0);
        assert!(posting.ai_matching_enabled);
        assert_eq!(posting.matching_criteria.skills_weight, 40);
    }

    #[test]
    fn salary_takes_leading_digits() {
        assert_eq!(parse_salary(" 95000"), 95000);
        assert_eq!(parse_salary("120k"), 120);
        assert_eq!(parse_salary(""), 0);
        assert_eq!(parse_salary("-5"), 0);
    }

    #[test]
    fn filter_matches_title_or_department_and_status() {
        let posting = form().into_posting(
            JobId("job-1".to_string()),
            NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"),
        );

        let by_department = JobFilter {
            search: "ENGINEER".to_string(),
            status: None,
        };
        assert!(by_department.matches(&posting));

        let paused_only = JobFilter {
            search: String::new(),
            status: Some(JobStatus::Paused),
        };
        assert!(!paused_only.matches(&posting));

        let unrelated = JobFilter {
            search: "designer".to_string(),
            status: Some(JobStatus::Active),
        };
        assert!(!unrelated.matches(&posting));
    }

    #[test]
    fn drafts_fill_the_form_text() {
        let mut form = form();
        form.apply_draft(JobDraft::fallback("Data Engineer"));

        assert!(form.description.contains("Data Engineer"));
        assert_eq!(form.requirements.lines().count(), 5);
        assert_eq!(split_skills(&form.skills).len(), 8);
        assert_eq!(form.experience, "3+ years");
    }

    #[test]
    fn employment_types_use_kebab_case() {
        let json = serde_json::to_string(&EmploymentType::PartTime).expect("serializes");
        assert_eq!(json, "\"part-time\"");
        assert_eq!(EmploymentType::PartTime.as_str(), "part-time");
    }
}
