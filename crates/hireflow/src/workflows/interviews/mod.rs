//! Interview scheduling with month and time-slot views.

pub mod calendar;
pub mod domain;
pub mod router;
pub mod service;

pub use calendar::{month_grid, time_slots, TimeSlot};
pub use domain::{Interview, InterviewId, InterviewKind, InterviewStatus, NewInterview};
pub use router::{interviews_router, MonthView};
pub use service::{InterviewScheduler, InterviewServiceError, ScheduledInterview};
