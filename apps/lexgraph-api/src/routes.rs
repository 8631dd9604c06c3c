use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	trace::TraceLayer,
};

use lexgraph_domain::entity::LegalSection;
use lexgraph_service::{
	AnalysisResult, AnalyzeRequest, Error as ServiceError, GraphView, HealthStatus,
	SearchResponse,
};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SearchParams {
	q: String,
}

#[derive(Serialize)]
struct ErrorBody {
	detail: String,
}

pub struct ApiError {
	status: StatusCode,
	detail: String,
}
impl ApiError {
	fn new(status: StatusCode, detail: impl Into<String>) -> Self {
		Self { status, detail: detail.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let status = match &err {
			ServiceError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
			ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
			ServiceError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
			ServiceError::InternalInconsistency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		};

		Self::new(status, err.message())
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { detail: self.detail })).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_origins);

	Router::new()
		.route("/health", get(health))
		.route("/analyze", post(analyze))
		.route("/graph/{section_id}", get(section_graph))
		.route("/section/{section_id}", get(section))
		.route("/search", get(search))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
	let origins = origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(_) => {
				tracing::warn!(%origin, "Skipping CORS origin that is not a valid header value.");

				None
			},
		})
		.collect::<Vec<_>>();

	CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
	let status = state.service.health().await?;

	Ok(Json(status))
}

async fn analyze(
	State(state): State<AppState>,
	payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
	let Json(req) = payload?;
	let result = state.service.analyze(req).await?;

	Ok(Json(result))
}

async fn section_graph(
	State(state): State<AppState>,
	Path(section_id): Path<String>,
) -> Result<Json<GraphView>, ApiError> {
	let view = state.service.section_graph(&section_id).await?;

	Ok(Json(view))
}

async fn section(
	State(state): State<AppState>,
	Path(section_id): Path<String>,
) -> Result<Json<LegalSection>, ApiError> {
	let section = state.service.section(&section_id).await?;

	Ok(Json(section))
}

async fn search(
	State(state): State<AppState>,
	params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Query(params) = params?;
	let response = state.service.search(&params.q).await?;

	Ok(Json(response))
}
