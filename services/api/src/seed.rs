use crate::infra::InMemoryDocumentStore;
use chrono::NaiveDate;
use hireflow::documents::{to_document, DocumentStore, CANDIDATES};
use hireflow::workflows::interviews::{Interview, InterviewId, InterviewKind, InterviewStatus};
use hireflow::workflows::jobs::{
    EmploymentType, JobId, JobPosting, JobStatus, MatchingCriteria, SalaryRange,
};
use hireflow::workflows::pipeline::{
    Candidate, CandidateId, RegistryError, StageId, StageRegistry,
};
use tracing::warn;

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap_or_default()
}

struct Sample {
    id: &'static str,
    name: &'static str,
    location: &'static str,
    score: u8,
    skills: &'static [&'static str],
    experience: &'static str,
    applied: u32,
    last_activity: u32,
    notes: &'static str,
    stage: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "1",
        name: "Sarah Johnson",
        location: "San Francisco, CA",
        score: 92,
        skills: &["React", "Node.js", "TypeScript", "AWS", "PostgreSQL"],
        experience: "5+ years",
        applied: 20,
        last_activity: 20,
        notes: "Strong technical background with leadership experience",
        stage: StageId::APPLIED,
    },
    Sample {
        id: "2",
        name: "Michael Chen",
        location: "Seattle, WA",
        score: 76,
        skills: &["Python", "Django", "PostgreSQL", "Docker"],
        experience: "3+ years",
        applied: 19,
        last_activity: 19,
        notes: "Good technical skills, needs frontend experience",
        stage: StageId::APPLIED,
    },
    Sample {
        id: "3",
        name: "Emily Rodriguez",
        location: "Austin, TX",
        score: 88,
        skills: &["React", "Python", "AWS", "MongoDB"],
        experience: "4+ years",
        applied: 18,
        last_activity: 21,
        notes: "Excellent problem-solving skills",
        stage: StageId::SCREENING,
    },
    Sample {
        id: "4",
        name: "David Kim",
        location: "New York, NY",
        score: 85,
        skills: &["React", "Node.js", "GraphQL", "Kubernetes"],
        experience: "6+ years",
        applied: 15,
        last_activity: 22,
        notes: "Scheduled for technical interview on Jan 25",
        stage: StageId::INTERVIEW,
    },
    Sample {
        id: "5",
        name: "Lisa Wang",
        location: "Los Angeles, CA",
        score: 90,
        skills: &["Vue.js", "Node.js", "TypeScript", "GCP"],
        experience: "5+ years",
        applied: 16,
        last_activity: 22,
        notes: "Completed first round, scheduling final interview",
        stage: StageId::INTERVIEW,
    },
    Sample {
        id: "6",
        name: "Alex Thompson",
        location: "Chicago, IL",
        score: 94,
        skills: &["React", "Node.js", "TypeScript", "AWS", "Docker"],
        experience: "7+ years",
        applied: 10,
        last_activity: 23,
        notes: "Offer extended, awaiting response",
        stage: StageId::OFFER,
    },
];

pub(crate) fn sample_candidates() -> Vec<Candidate> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(index, sample)| Candidate {
            id: CandidateId(sample.id.to_string()),
            name: sample.name.to_string(),
            email: format!("{}@email.com", sample.name.to_lowercase().replace(' ', ".")),
            phone: format!("+1-555-{:04}", 123 + index),
            location: sample.location.to_string(),
            position: "Senior Full Stack Developer".to_string(),
            score: sample.score,
            skills: sample.skills.iter().map(|skill| skill.to_string()).collect(),
            experience: sample.experience.to_string(),
            applied_on: day(1, sample.applied),
            last_activity: day(1, sample.last_activity),
            notes: sample.notes.to_string(),
            resume_url: None,
            status: StageId::new(sample.stage),
        })
        .collect()
}

/// Standard board populated with the sample candidates.
pub(crate) fn sample_registry() -> Result<StageRegistry, RegistryError> {
    let mut registry = StageRegistry::standard();
    for candidate in sample_candidates() {
        registry.admit(candidate)?;
    }
    Ok(registry)
}

/// Store the board's candidates so later status patches find their records.
pub(crate) async fn mirror_candidates(store: &InMemoryDocumentStore, registry: &StageRegistry) {
    for stage in registry.stages() {
        for candidate in &stage.candidates {
            let created = match to_document(candidate) {
                Ok(record) => store.create(CANDIDATES, record).await,
                Err(err) => Err(err),
            };
            if let Err(err) = created {
                warn!(candidate = %candidate.id, error = %err, "sample candidate not stored");
            }
        }
    }
}

pub(crate) fn sample_jobs() -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: JobId("1".to_string()),
            title: "Senior Full Stack Developer".to_string(),
            department: "Engineering".to_string(),
            location: "San Francisco, CA".to_string(),
            employment_type: EmploymentType::FullTime,
            salary: SalaryRange {
                min: 120_000,
                max: 180_000,
            },
            description: "Join our growing engineering team.".to_string(),
            requirements: vec![
                "5+ years of experience in full stack development".to_string(),
                "Proficiency in React, Node.js, and TypeScript".to_string(),
            ],
            skills: vec!["React".to_string(), "Node.js".to_string(), "AWS".to_string()],
            experience: "5+ years".to_string(),
            posted_on: day(1, 15),
            status: JobStatus::Active,
            applicants: 47,
            ai_matching_enabled: true,
            matching_criteria: MatchingCriteria::default(),
        },
        JobPosting {
            id: JobId("3".to_string()),
            title: "UX Designer".to_string(),
            department: "Design".to_string(),
            location: "New York, NY".to_string(),
            employment_type: EmploymentType::FullTime,
            salary: SalaryRange {
                min: 80_000,
                max: 120_000,
            },
            description: "Create intuitive user experiences.".to_string(),
            requirements: vec!["2+ years of UX design experience".to_string()],
            skills: vec!["Figma".to_string(), "User Research".to_string()],
            experience: "2+ years".to_string(),
            posted_on: day(1, 20),
            status: JobStatus::Paused,
            applicants: 31,
            ai_matching_enabled: false,
            matching_criteria: MatchingCriteria {
                skills_weight: 45,
                experience_weight: 25,
                education_weight: 20,
                location_weight: 10,
            },
        },
    ]
}

pub(crate) fn sample_interviews() -> Vec<Interview> {
    let at = |hour: u32| chrono::NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
    vec![
        Interview {
            id: InterviewId("1".to_string()),
            candidate_name: "Sarah Johnson".to_string(),
            candidate_email: "sarah.johnson@email.com".to_string(),
            position: "Senior Full Stack Developer".to_string(),
            kind: InterviewKind::Video,
            date: day(1, 25),
            time: at(10),
            duration_minutes: 60,
            interviewer: "John Smith".to_string(),
            interviewer_email: "john.smith@company.com".to_string(),
            location: None,
            meeting_link: Some("https://meet.google.com/abc-defg-hij".to_string()),
            status: InterviewStatus::Confirmed,
            notes: "Technical interview - focus on React and system design".to_string(),
            round: 2,
            ai_score: Some(92),
        },
        Interview {
            id: InterviewId("2".to_string()),
            candidate_name: "Michael Chen".to_string(),
            candidate_email: "michael.chen@email.com".to_string(),
            position: "Senior Full Stack Developer".to_string(),
            kind: InterviewKind::Phone,
            date: day(1, 25),
            time: at(14),
            duration_minutes: 30,
            interviewer: "Jane Doe".to_string(),
            interviewer_email: "jane.doe@company.com".to_string(),
            location: None,
            meeting_link: None,
            status: InterviewStatus::Scheduled,
            notes: "Initial screening call".to_string(),
            round: 1,
            ai_score: Some(76),
        },
    ]
}
