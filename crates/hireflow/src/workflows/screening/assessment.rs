use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Parse result for model output: either the service's own object or a fixed default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "assessment", rename_all = "snake_case")]
pub enum ParseOutcome<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> ParseOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ParseOutcome::Fallback(_))
    }

    pub fn get(&self) -> &T {
        match self {
            ParseOutcome::Parsed(value) | ParseOutcome::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            ParseOutcome::Parsed(value) | ParseOutcome::Fallback(value) => value,
        }
    }

    /// Transform the payload while keeping where it came from.
    pub fn map<U, F>(self, f: F) -> ParseOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ParseOutcome::Parsed(value) => ParseOutcome::Parsed(f(value)),
            ParseOutcome::Fallback(value) => ParseOutcome::Fallback(f(value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Hire,
    Interview,
    Reject,
}

/// Resume-screening response shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAssessment {
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_score: u8,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub skills: SkillsAssessment,
    #[serde(default)]
    pub experience: ExperienceAssessment,
    #[serde(default)]
    pub education: EducationAssessment,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsAssessment {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub match_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceAssessment {
    #[serde(default)]
    pub years: f32,
    #[serde(default)]
    pub relevant_roles: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub match_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationAssessment {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub relevance: u8,
}

/// Per-skill match derived for the screening panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillMatch {
    pub name: String,
    pub score: u8,
}

impl ResumeAssessment {
    /// Technical skills with a score that tapers by five per rank, floored at 70.
    pub fn skill_matches(&self) -> Vec<SkillMatch> {
        self.skills
            .technical
            .iter()
            .enumerate()
            .map(|(rank, name)| {
                let taper = u8::try_from(rank.saturating_mul(5)).unwrap_or(u8::MAX);
                SkillMatch {
                    name: name.clone(),
                    score: self.skills.match_score.saturating_sub(taper).max(70),
                }
            })
            .collect()
    }

    /// Default used when the service reply is not valid JSON.
    pub fn fallback(raw: &str) -> Self {
        Self {
            overall_score: 75,
            recommendation: Recommendation::Interview,
            skills: SkillsAssessment {
                technical: vec!["Various technical skills identified".to_string()],
                soft: vec!["Communication".to_string(), "Problem-solving".to_string()],
                match_score: 75,
            },
            experience: ExperienceAssessment {
                years: 3.0,
                relevant_roles: vec!["Previous relevant positions".to_string()],
                match_score: 70,
            },
            education: EducationAssessment {
                degree: "Bachelor's Degree".to_string(),
                institution: "University".to_string(),
                relevance: 80,
            },
            strengths: vec![
                "Strong background".to_string(),
                "Relevant experience".to_string(),
            ],
            concerns: vec!["Minor areas for improvement".to_string()],
            summary: "Candidate shows promise with relevant skills and experience.".to_string(),
            reasoning: raw.to_string(),
        }
    }
}

/// Job-generation response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

impl JobDraft {
    pub fn fallback(job_title: &str) -> Self {
        Self {
            description: format!(
                "We are seeking a talented {job_title} to join our dynamic team. This role offers \
                 an exciting opportunity to work on challenging projects and contribute to our \
                 company's growth. The ideal candidate will bring expertise, creativity, and a \
                 passion for excellence to drive our mission forward."
            ),
            requirements: strings(&[
                "Bachelor's degree in relevant field or equivalent experience",
                "3+ years of relevant professional experience",
                "Strong problem-solving and analytical skills",
                "Excellent communication and teamwork abilities",
                "Proficiency in relevant tools and technologies",
            ]),
            skills: strings(&[
                "Technical expertise",
                "Problem-solving",
                "Communication",
                "Teamwork",
                "Leadership",
                "Project management",
                "Analytical thinking",
                "Adaptability",
            ]),
            benefits: strings(&[
                "Competitive salary and equity package",
                "Comprehensive health, dental, and vision insurance",
                "Flexible work arrangements and remote options",
                "Professional development opportunities",
                "Collaborative and innovative work environment",
            ]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitRecommendation {
    ExcellentFit,
    GoodFit,
    PartialFit,
    PoorFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryAlignment {
    Above,
    Within,
    Below,
    Unknown,
}

/// Candidate/job matching response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAssessment {
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_match_score: u8,
    pub recommendation: FitRecommendation,
    pub skills_match: SkillsMatch,
    pub experience_match: ExperienceMatch,
    pub cultural_fit: CulturalFit,
    pub salary_expectation: SalaryExpectation,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub interview_questions: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsMatch {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceMatch {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub relevant_experience: Vec<String>,
    #[serde(default)]
    pub experience_gaps: Vec<String>,
    #[serde(default)]
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalFit {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub analysis: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryExpectation {
    pub alignment: SalaryAlignment,
    #[serde(default)]
    pub analysis: String,
}

impl MatchAssessment {
    pub fn fallback() -> Self {
        Self {
            overall_match_score: 75,
            recommendation: FitRecommendation::GoodFit,
            skills_match: SkillsMatch {
                score: 80,
                matched_skills: strings(&["Relevant technical skills", "Communication"]),
                missing_skills: strings(&["Some advanced skills"]),
                analysis: "Strong skill alignment with room for growth".to_string(),
            },
            experience_match: ExperienceMatch {
                score: 70,
                relevant_experience: strings(&["Previous relevant roles"]),
                experience_gaps: strings(&["Some specific experience areas"]),
                analysis: "Good experience foundation".to_string(),
            },
            cultural_fit: CulturalFit {
                score: 85,
                strengths: strings(&["Team collaboration", "Problem-solving approach"]),
                concerns: strings(&["Minor cultural considerations"]),
                analysis: "Strong cultural alignment".to_string(),
            },
            salary_expectation: SalaryExpectation {
                alignment: SalaryAlignment::Within,
                analysis: "Salary expectations appear reasonable".to_string(),
            },
            strengths: strings(&["Strong technical background", "Good communication skills"]),
            concerns: strings(&["Some skill gaps to address"]),
            interview_questions: strings(&[
                "Tell us about your experience with...",
                "How would you approach...",
                "Describe a challenging project...",
            ]),
            summary: "This candidate shows strong potential with good skill alignment and \
                      cultural fit."
                .to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn parse_resume_assessment(text: &str) -> ParseOutcome<ResumeAssessment> {
    parse_or_else(text, || ResumeAssessment::fallback(text))
}

pub fn parse_job_draft(text: &str, job_title: &str) -> ParseOutcome<JobDraft> {
    parse_or_else(text, || JobDraft::fallback(job_title))
}

pub fn parse_match_assessment(text: &str) -> ParseOutcome<MatchAssessment> {
    parse_or_else(text, MatchAssessment::fallback)
}

fn parse_or_else<T, F>(text: &str, fallback: F) -> ParseOutcome<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match serde_json::from_str(strip_json_fences(text)) {
        Ok(value) => ParseOutcome::Parsed(value),
        Err(err) => {
            tracing::debug!(error = %err, "model reply was not the expected JSON; using default");
            ParseOutcome::Fallback(fallback())
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences some models wrap around JSON.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(str::trim)
                .unwrap_or(stripped)
        }
        None => text,
    }
}

/// Accept any JSON number, rounding and clamping it into `0..=100`.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}
