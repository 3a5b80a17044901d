use std::sync::OnceLock;
use std::time::Instant;

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};

use crate::storage::SeaOrmStorage;

use super::helpers::success_response;
use super::types::HealthResponse;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the process start time. Called once from main.
pub fn mark_start_time() {
    let _ = START_TIME.set(Instant::now());
}

pub async fn health_check(storage: web::Data<SeaOrmStorage>) -> ActixResult<impl Responder> {
    let uptime_seconds = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0);

    Ok(success_response(HealthResponse {
        status: "ok".to_string(),
        backend: storage.backend_name().to_string(),
        uptime_seconds,
    }))
}

/// Readiness probe: verifies the database connection answers.
pub async fn readiness_check(storage: web::Data<SeaOrmStorage>) -> HttpResponse {
    match storage.get_db().ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ready" })),
        Err(e) => HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({ "status": "unavailable", "error": e.to_string() })),
    }
}

/// Liveness probe: the process is up and serving requests.
pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive" }))
}
