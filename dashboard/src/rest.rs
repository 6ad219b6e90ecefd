use crate::engine::Engine;
use crate::errors::Error;
use crate::metrics::{self, REQUESTS_TOTAL};
use crate::model::{FleetView, MachineDetail, MachineMasterRecord, Table};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    engine: Engine,
}

#[derive(Debug, Serialize)]
pub struct FleetResponse {
    #[serde(flatten)]
    pub fleet: FleetView,
    pub plants: Table,
}

pub fn create_router(engine: Engine) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/api/v1/plants", get(get_plants))
        .route("/api/v1/machines", get(get_machines))
        .route("/api/v1/machines/:machine_id", get(get_machine))
        .route("/api/v1/fleet", get(get_fleet))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

async fn run_view<T, F>(view: &'static str, engine: Engine, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Engine) -> crate::errors::Result<T> + Send + 'static,
{
    REQUESTS_TOTAL.with_label_values(&[view]).inc();
    let span = info_span!("request", view, request_id = %Uuid::new_v4());
    let task_span = span.clone();

    async move {
        match tokio::task::spawn_blocking(move || task_span.in_scope(|| f(&engine))).await {
            Ok(result) => result.map_err(AppError::from),
            Err(e) => Err(AppError::from(Error::Task(e))),
        }
    }
    .instrument(span)
    .await
}

async fn get_plants(State(state): State<AppState>) -> Result<Json<Table>, AppError> {
    run_view("plants", state.engine, |engine| engine.plants())
        .await
        .map(Json)
}

async fn get_machines(
    State(state): State<AppState>,
) -> Result<Json<Vec<MachineMasterRecord>>, AppError> {
    run_view("machines", state.engine, |engine| engine.master())
        .await
        .map(Json)
}

async fn get_fleet(State(state): State<AppState>) -> Result<Json<FleetResponse>, AppError> {
    run_view("fleet", state.engine, |engine| {
        let fleet = engine.fleet()?;
        let plants = engine.plants()?;
        Ok(FleetResponse { fleet, plants })
    })
    .await
    .map(Json)
}

async fn get_machine(
    State(state): State<AppState>,
    Path(machine_id): Path<String>,
) -> Result<Json<MachineDetail>, AppError> {
    run_view("machine", state.engine, move |engine| engine.machine(&machine_id))
        .await
        .map(Json)
}

async fn get_metrics() -> Result<String, AppError> {
    Ok(metrics::gather_metrics()?)
}

pub struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::MachineNotFound(machine_id) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "machine not found", "machine_id": machine_id })),
            )
                .into_response(),
            other => {
                error!("API error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "dashboard data is currently unavailable" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}
