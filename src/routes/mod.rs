pub mod health;
pub mod vacancy;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{middleware::auth::attach_viewer, AppState};

const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        vacancy::list_vacancies,
        vacancy::get_vacancy,
        vacancy::create_vacancy,
        vacancy::update_vacancy,
        vacancy::apply_to_vacancy,
        vacancy::decide_application,
    ),
    tags((name = "vacancies", description = "Vacancy listing and applications"))
)]
pub struct ApiDoc;

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/vacancies",
            get(vacancy::list_vacancies).post(vacancy::create_vacancy),
        )
        .route(
            "/api/vacancies/:id",
            get(vacancy::get_vacancy).patch(vacancy::update_vacancy),
        )
        .route(
            "/api/vacancies/:id/applications",
            post(vacancy::apply_to_vacancy),
        )
        .route(
            "/api/vacancies/:id/applications/:application_id",
            patch(vacancy::decide_application),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            attach_viewer,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi))
        .merge(api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
