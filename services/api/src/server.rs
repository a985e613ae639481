use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCareerStore, InMemoryTeacherStore, InMemoryTemplateCatalog};
use crate::routes::with_sponsorship_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use career_sponsorship::config::AppConfig;
use career_sponsorship::error::AppError;
use career_sponsorship::telemetry;
use career_sponsorship::workflows::sponsorship::SponsorshipService;
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

    let codes = config.sponsorship.code_generator();
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        codes: codes.clone(),
    };

    let careers = Arc::new(InMemoryCareerStore::default());
    let teachers = Arc::new(InMemoryTeacherStore::default());
    let catalog = Arc::new(InMemoryTemplateCatalog::default());
    let service = Arc::new(SponsorshipService::new(catalog.clone(), codes));

    let app = with_sponsorship_routes(careers, teachers, catalog, service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "career sponsorship service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
