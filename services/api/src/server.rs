use crate::cli::ServeArgs;
use crate::infra::{default_assessment_catalog, AppState, InMemoryAssessmentStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use maturity_scoring::assessments::AssessmentScoringService;
use maturity_scoring::config::AppConfig;
use maturity_scoring::error::AppError;
use maturity_scoring::scoring::ScoringMapRepository;
use maturity_scoring::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let repository = Arc::new(ScoringMapRepository::load_from_dir(
        &config.scoring.map_dir,
        default_assessment_catalog(),
    )?);
    let store = Arc::new(InMemoryAssessmentStore::default());
    let scoring_service = Arc::new(AssessmentScoringService::new(repository.clone(), store));

    let app = with_assessment_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(Extension(repository))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "maturity scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
