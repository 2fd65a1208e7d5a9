use crate::infra::InMemoryDocumentStore;
use crate::seed::{mirror_candidates, sample_interviews, sample_jobs, sample_registry};
use chrono::{Datelike, NaiveDate};
use clap::Args;
use hireflow::config::PersistenceConfig;
use hireflow::documents::CANDIDATES;
use hireflow::error::AppError;
use hireflow::workflows::interviews::{month_grid, time_slots, Interview};
use hireflow::workflows::jobs::{JobFilter, JobStatus};
use hireflow::workflows::pipeline::{
    MoveRequest, PersistenceQueue, PipelineBoard, StageId, StageRegistry, TransitionOutcome,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day to show interview slots for (YYYY-MM-DD). Defaults to 2024-01-25.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) slots_on: Option<NaiveDate>,
    /// Print the final board as JSON after the walkthrough.
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { slots_on, json } = args;

    let registry = match sample_registry() {
        Ok(registry) => registry,
        Err(err) => {
            println!("Sample board rejected: {err}");
            StageRegistry::standard()
        }
    };

    println!("Candidate pipeline demo");
    render_board(&registry);

    let store = Arc::new(InMemoryDocumentStore::default());
    mirror_candidates(store.as_ref(), &registry).await;
    let queue = PersistenceQueue::spawn(store.clone(), PersistenceConfig::default());
    let board = PipelineBoard::new(registry, queue);

    let moves = [
        ("Advance Michael Chen to interview", MoveRequest::new("2", StageId::INTERVIEW)),
        ("Drop Sarah Johnson onto Alex Thompson", MoveRequest::new("1", "6")),
        ("Drop Lisa Wang onto David Kim", MoveRequest::new("5", "4")),
        ("Move an unknown candidate", MoveRequest::new("99", StageId::HIRED)),
        ("Move Emily Rodriguez to an unknown stage", MoveRequest::new("3", "archived")),
        ("Reject Michael Chen", MoveRequest::new("2", StageId::REJECTED)),
    ];

    println!("\nMoves");
    for (label, request) in moves {
        match board.move_candidate(&request) {
            TransitionOutcome::Moved {
                candidate,
                from,
                to,
            } => println!("  {label}: {} moved {from} -> {to}", candidate.name),
            TransitionOutcome::Unchanged { reason } => {
                println!("  {label}: unchanged ({})", reason.label())
            }
        }
    }

    let registry = board.shutdown().await;
    println!("\nBoard after moves");
    render_board(&registry);

    println!("\nStored candidate statuses");
    for record in store.records(CANDIDATES) {
        println!(
            "  {:<16} {}",
            record.get("name").and_then(|value| value.as_str()).unwrap_or("?"),
            record.get("status").and_then(|value| value.as_str()).unwrap_or("?")
        );
    }

    println!("\nJob board");
    let jobs = sample_jobs();
    let filters = [
        ("all", JobFilter::default()),
        (
            "active",
            JobFilter {
                search: String::new(),
                status: Some(JobStatus::Active),
            },
        ),
        (
            "search \"design\"",
            JobFilter {
                search: "design".to_string(),
                status: None,
            },
        ),
    ];
    for (label, filter) in filters {
        let titles: Vec<&str> = jobs
            .iter()
            .filter(|job| filter.matches(job))
            .map(|job| job.title.as_str())
            .collect();
        println!("  {label:<18} {}", titles.join(", "));
    }

    let interviews = sample_interviews();
    let slots_on = slots_on
        .or_else(|| NaiveDate::from_ymd_opt(2024, 1, 25))
        .unwrap_or_default();
    render_calendar(&interviews, slots_on);

    if json {
        match serde_json::to_string_pretty(&registry) {
            Ok(body) => println!("\n{body}"),
            Err(err) => println!("\nBoard JSON unavailable: {err}"),
        }
    }

    Ok(())
}

fn render_board(registry: &StageRegistry) {
    for stage in registry.stages() {
        let names: Vec<&str> = stage
            .candidates
            .iter()
            .map(|candidate| candidate.name.as_str())
            .collect();
        println!(
            "  {:<13} {:>2}  {}",
            stage.title,
            stage.candidates.len(),
            names.join(", ")
        );
    }
}

fn render_calendar(interviews: &[Interview], date: NaiveDate) {
    println!("\nInterview calendar for {}", date.format("%B %Y"));
    println!("  Su Mo Tu We Th Fr Sa");
    if let Some(grid) = month_grid(date.year(), date.month()) {
        for week in grid.chunks(7) {
            let row: Vec<String> = week
                .iter()
                .map(|cell| match cell {
                    Some(day) => format!("{:>2}", day.day()),
                    None => "  ".to_string(),
                })
                .collect();
            println!("  {}", row.join(" "));
        }
    }

    let slots = time_slots(interviews, date);
    let open: Vec<String> = slots
        .iter()
        .filter(|slot| slot.available)
        .map(|slot| slot.time.format("%H:%M").to_string())
        .collect();
    println!("\nSlots on {date}: {} open of {}", open.len(), slots.len());
    for slot in slots.iter().filter(|slot| !slot.available) {
        if let Some(interview) = &slot.interview {
            println!(
                "  {} booked: {} with {} ({})",
                slot.time.format("%H:%M"),
                interview.candidate_name,
                interview.interviewer,
                interview.kind.as_str()
            );
        }
    }
}
