use actix_web::HttpResponse;

/// Liveness probe. It does not touch the database.
#[tracing::instrument(name = "Health Check handler")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
