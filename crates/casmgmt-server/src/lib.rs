use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use casmgmt_core::ServicesManager;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod handlers;
pub mod response;
pub mod view;
pub mod wire;

pub use config::{Config, ConfigError};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ServicesManager>,
    pub default_service_url: String,
    pub metrics: Option<PrometheusHandle>,
    pub ensure_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(registry: Arc<dyn ServicesManager>, default_service_url: impl Into<String>) -> Self {
        Self {
            registry,
            default_service_url: default_service_url.into(),
            metrics: None,
            ensure_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::update_evaluation_order,
        handlers::delete_service,
        handlers::list_services,
        handlers::manage,
        handlers::health_check,
    ),
    components(
        schemas(
            response::OperationResult,
            view::ManageView,
            casmgmt_core::RegisteredService,
        )
    )
)]
pub struct ApiDoc;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(render_metrics))
        .route("/manage.html", get(handlers::manage))
        .route("/getServices.html", get(handlers::list_services))
        .route(
            "/updateRegisteredServiceEvaluationOrder.html",
            post(handlers::update_evaluation_order),
        )
        .route("/deleteRegisteredService.html", post(handlers::delete_service))
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), axum::Error>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    listener.set_nonblocking(true).map_err(axum::Error::new)?;
    axum::Server::from_tcp(listener)
        .map_err(axum::Error::new)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(axum::Error::new)
}

async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics.as_ref().map(|h| h.render()).unwrap_or_default()
}

async fn track_requests<B>(req: Request<B>, next: Next<B>) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!("casmgmt_http_requests_total", "path" => path.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("casmgmt_http_request_duration_seconds", "path" => path.clone())
        .record(started.elapsed().as_secs_f64());
    tracing::debug!(%method, %path, status = response.status().as_u16(), "request handled");
    response
}
