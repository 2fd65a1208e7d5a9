use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryDocumentStore};
use crate::routes::{with_workflow_routes, Services};
use crate::seed::{mirror_candidates, sample_interviews, sample_jobs, sample_registry};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hireflow::config::AppConfig;
use hireflow::error::AppError;
use hireflow::telemetry;
use hireflow::workflows::interviews::InterviewScheduler;
use hireflow::workflows::jobs::JobPostingService;
use hireflow::workflows::pipeline::{PersistenceQueue, PipelineBoard, StageRegistry};
use hireflow::workflows::screening::{ScoringClient, ScreeningIntake};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryDocumentStore::default());
    let scoring = match &config.scoring {
        Some(scoring) => Some(Arc::new(ScoringClient::new(scoring)?)),
        None => {
            warn!("SCORING_BASE_URL not set; screening and generated drafts are disabled");
            None
        }
    };

    let registry = if args.seed {
        let registry = sample_registry().unwrap_or_else(|err| {
            warn!(error = %err, "sample board rejected; starting empty");
            StageRegistry::standard()
        });
        mirror_candidates(store.as_ref(), &registry).await;
        registry
    } else {
        StageRegistry::standard()
    };

    let queue = PersistenceQueue::spawn(store.clone(), config.persistence);
    let board = Arc::new(PipelineBoard::new(registry, queue));
    let pending = board.clone();

    let mut jobs = JobPostingService::new(store.clone(), scoring.clone());
    let mut interviews = InterviewScheduler::new(store.clone(), scoring.clone());
    if args.seed {
        jobs = jobs.with_postings(sample_jobs());
        interviews = interviews.with_interviews(sample_interviews());
    }

    let services = Services {
        board: board.clone(),
        jobs: Arc::new(jobs),
        interviews: Arc::new(interviews),
        screening: scoring.map(|scoring| Arc::new(ScreeningIntake::new(scoring, board))),
    };

    let app = with_workflow_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seeded = args.seed, "hireflow api ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drain_board(pending).await;
    Ok(())
}

/// Flush the persistence queue once every route has released the board.
pub(crate) async fn drain_board(board: Arc<PipelineBoard>) {
    match Arc::try_unwrap(board) {
        Ok(board) => {
            let registry = board.shutdown().await;
            info!(
                candidates = registry.candidate_count(),
                "pipeline persistence drained"
            );
        }
        Err(board) => warn!(
            holders = Arc::strong_count(&board),
            "pipeline board still shared; queued changes may be lost"
        ),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown requested");
}
