use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryConsumptionStore, InMemoryFoodCatalog, InMemoryInventoryStore,
    InMemoryProfileDirectory, InMemoryScoreStore,
};
use crate::routes::with_advisor_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use nourish_ai::config::AppConfig;
use nourish_ai::error::AppError;
use nourish_ai::telemetry;
use nourish_ai::workflows::advisor::service::{AdvisorConfig, AdvisorService, AdvisorStores};
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

    let stores = AdvisorStores {
        inventory: Arc::new(InMemoryInventoryStore::default()),
        consumption: Arc::new(InMemoryConsumptionStore::default()),
        catalog: Arc::new(InMemoryFoodCatalog::seeded()),
        profiles: Arc::new(InMemoryProfileDirectory::default()),
        scores: Arc::new(InMemoryScoreStore::default()),
    };

    let mut advisor_config = AdvisorConfig::default();
    if let Some(grams) = config.advisor.community_weekly_grams {
        advisor_config.waste.community.weekly_grams = grams;
        advisor_config.waste.community.monthly_grams = grams * 4.0;
        advisor_config.waste.community.yearly_grams = grams * 48.0;
    }
    if let Some(cost) = config.advisor.community_weekly_cost {
        advisor_config.waste.community.weekly_cost = cost;
        advisor_config.waste.community.monthly_cost = cost * 4.0;
        advisor_config.waste.community.yearly_cost = cost * 48.0;
    }
    let advisor_service = Arc::new(AdvisorService::new(stores, advisor_config));

    let app = with_advisor_routes(advisor_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "food advisory service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
