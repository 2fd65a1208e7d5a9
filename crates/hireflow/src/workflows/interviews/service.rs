use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::documents::{to_document, DocumentRecord, DocumentStore, StoreError, INTERVIEWS};
use crate::workflows::jobs::COMPANY_NAME;
use crate::workflows::screening::{GeneratedEmail, InterviewEmailRequest, ScoringService};

use super::calendar::{self, TimeSlot};
use super::domain::{clock_time, Interview, InterviewId, InterviewStatus, NewInterview};

static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_interview_id() -> InterviewId {
    let id = INTERVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InterviewId(format!("int-{id:06}"))
}

#[derive(Serialize)]
struct InterviewDocument<'a> {
    id: &'a str,
    candidate_name: &'a str,
    candidate_email: &'a str,
    position: &'a str,
    interview_type: &'static str,
    interview_date: String,
    interview_time: String,
    duration_minutes: u32,
    interviewer_name: &'a str,
    interviewer_email: &'a str,
    location: Option<&'a str>,
    meeting_link: Option<&'a str>,
    status: &'static str,
    notes: &'a str,
    round_number: u32,
    created_at: String,
}

fn interview_document(
    interview: &Interview,
    at: DateTime<Utc>,
) -> Result<DocumentRecord, StoreError> {
    to_document(&InterviewDocument {
        id: &interview.id.0,
        candidate_name: &interview.candidate_name,
        candidate_email: &interview.candidate_email,
        position: &interview.position,
        interview_type: interview.kind.as_str(),
        interview_date: interview.date.format("%Y-%m-%d").to_string(),
        interview_time: interview.time.format(clock_time::FORMAT).to_string(),
        duration_minutes: interview.duration_minutes,
        interviewer_name: &interview.interviewer,
        interviewer_email: &interview.interviewer_email,
        location: interview.location.as_deref(),
        meeting_link: interview.meeting_link.as_deref(),
        status: interview.status.as_str(),
        notes: &interview.notes,
        round_number: interview.round,
        created_at: at.to_rfc3339(),
    })
}

/// Result of scheduling: the interview plus the confirmation email when one was drafted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledInterview {
    pub interview: Interview,
    pub email: Option<GeneratedEmail>,
}

pub struct InterviewScheduler<D, S> {
    interviews: RwLock<Vec<Interview>>,
    store: Arc<D>,
    mailer: Option<Arc<S>>,
}

impl<D, S> InterviewScheduler<D, S>
where
    D: DocumentStore + 'static,
    S: ScoringService + 'static,
{
    pub fn new(store: Arc<D>, mailer: Option<Arc<S>>) -> Self {
        Self {
            interviews: RwLock::new(Vec::new()),
            store,
            mailer,
        }
    }

    pub fn with_interviews(self, interviews: Vec<Interview>) -> Self {
        *self.interviews.write().unwrap_or_else(PoisonError::into_inner) = interviews;
        self
    }

    /// Book an interview, persist it and draft the confirmation email.
    ///
    /// Store and email failures are logged; the interview is booked either way.
    pub async fn schedule(
        &self,
        request: NewInterview,
    ) -> Result<ScheduledInterview, InterviewServiceError> {
        if request.candidate_name.trim().is_empty() {
            return Err(InterviewServiceError::MissingField("candidate_name"));
        }
        if request.candidate_email.trim().is_empty() {
            return Err(InterviewServiceError::MissingField("candidate_email"));
        }

        let interview = request.into_interview(next_interview_id());

        match interview_document(&interview, Utc::now()) {
            Ok(record) => {
                if let Err(err) = self.store.create(INTERVIEWS, record).await {
                    warn!(interview = %interview.id, error = %err, "interview not persisted");
                }
            }
            Err(err) => warn!(interview = %interview.id, error = %err, "interview not encoded"),
        }

        let email = self.draft_email(&interview).await;

        self.interviews
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(interview.clone());
        info!(
            interview = %interview.id,
            candidate = %interview.candidate_name,
            date = %interview.date,
            "interview scheduled"
        );

        Ok(ScheduledInterview { interview, email })
    }

    async fn draft_email(&self, interview: &Interview) -> Option<GeneratedEmail> {
        let mailer = self.mailer.as_ref()?;
        let request = InterviewEmailRequest {
            candidate_email: interview.candidate_email.clone(),
            candidate_name: interview.candidate_name.clone(),
            interview_date: interview.date.format("%-m/%-d/%Y").to_string(),
            interview_time: interview.time.format(clock_time::FORMAT).to_string(),
            interview_type: Some(interview.kind.as_str().to_string()),
            job_title: Some(interview.position.clone()),
            company_name: Some(COMPANY_NAME.to_string()),
        };

        match mailer.interview_email(&request).await {
            Ok(email) => {
                info!(interview = %interview.id, subject = %email.subject, "confirmation email drafted");
                Some(email)
            }
            Err(err) => {
                warn!(interview = %interview.id, error = %err, "confirmation email failed");
                None
            }
        }
    }

    /// Interviews matching the optional status and day filters.
    pub fn list(&self, status: Option<InterviewStatus>, date: Option<NaiveDate>) -> Vec<Interview> {
        let interviews = self.read();
        match date {
            Some(date) => calendar::with_status(&calendar::on_date(&interviews, date), status),
            None => calendar::with_status(&interviews, status),
        }
    }

    pub fn slots(&self, date: NaiveDate) -> Vec<TimeSlot> {
        calendar::time_slots(&self.read(), date)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Interview>> {
        self.interviews.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
}
