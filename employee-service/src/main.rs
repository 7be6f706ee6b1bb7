use axum::{Router, routing::get};
use employee_service::{
    api::{handler::employee, state::EmployeeAppState},
    config::{DEFAULT_CONFIG_PATH, ServiceConfig},
    domain::service::RemoteEmployeeService,
    infrastructure::client::HttpEmployeeApiClient,
};
use shared::telemetry::TelemetrySettings;
use std::{env, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        employee::find_all,
        employee::search_by_name,
        employee::find_by_id,
        employee::highest_salary,
        employee::top_ten_earners,
        employee::create,
        employee::delete,
    ),
    tags(
        (name = "Employees", description = "Employee lookup, aggregation and management"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    let _guard =
        shared::telemetry::init_telemetry("employee-service", &TelemetrySettings::from_env());

    let config_path = env::var("EMPLOYEE_SERVICE_CONFIG_PATH")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ServiceConfig::load(&config_path)
        .and_then(|config| {
            config.with_overrides(
                env::var("EMPLOYEE_API_BASE_URL").ok(),
                env::var("SERVER_PORT").ok(),
            )
        })
        .expect("Failed to load employee service config");

    let base_url = config
        .employee_api_url()
        .expect("Employee API base URL is invalid");
    let api_client = HttpEmployeeApiClient::new(base_url, config.request_timeout())
        .expect("Failed to build employee API client");
    tracing::info!(base_url = %api_client.base_url(), "Using employee API");

    let state = Arc::new(EmployeeAppState {
        employee_service: Arc::new(RemoteEmployeeService::new(Arc::new(api_client))),
    });

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(config.rate_limit.per_second)
        .burst_size(config.rate_limit.burst_size)
        .key_extractor(SmartIpKeyExtractor)
        .use_headers()
        .finish()
        .expect("Failed to build governor config");

    let app = Router::new()
        .route(
            "/headpat",
            get(|| async {
                axum::Json(shared::responses::HeadpatResponse {
                    message: "nyaa~! all systems operational, senpai! (=^-w-^=)",
                })
            }),
        )
        .route(
            "/api/v1/employee",
            get(employee::find_all).post(employee::create),
        )
        .route(
            "/api/v1/employee/search/{search_string}",
            get(employee::search_by_name),
        )
        .route(
            "/api/v1/employee/highestSalary",
            get(employee::highest_salary),
        )
        .route(
            "/api/v1/employee/topTenHighestEarningEmployeeNames",
            get(employee::top_ten_earners),
        )
        .route(
            "/api/v1/employee/{id}",
            get(employee::find_by_id).delete(employee::delete),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Per-IP rate limiting
        .layer(GovernorLayer::new(governor_conf))
        // tracing log (turn request into info level)
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .with_state(state);

    let port = config.server_port;
    tracing::info!("employee-service listening on 0.0.0.0:{port}");

    let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Failed to bind");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shared::shutdown::shutdown_signal("employee-service"))
    .await
    .expect("Oppsie! Server crashed!");

    tracing::info!("employee-service shut down");
}
