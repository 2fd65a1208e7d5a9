//! Job postings: form parsing, list filtering, and generated drafts.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    EmploymentType, JobFilter, JobForm, JobId, JobPosting, JobStatus, MatchingCriteria,
    SalaryRange,
};
pub use router::{jobs_router, JobQuery};
pub use service::{JobPostingService, JobServiceError, COMPANY_NAME};
