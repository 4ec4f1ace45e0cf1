use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        application_dto::{ApplicationResponse, ApplyPayload, DecisionPayload},
        vacancy_dto::{
            CreateVacancyPayload, UpdateVacancyPayload, VacancyDetailResponse,
            VacancyListResponse, VacancyResponse,
        },
    },
    error::Result,
    models::user::Viewer,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/vacancies",
    params(
        ("page" = Option<i64>, Query, description = "Page number, starting at 1"),
        ("pageSize" = Option<i64>, Query, description = "Items per page (max 50)"),
        ("status" = Option<String>, Query, description = "OPEN or CLOSED"),
        ("modality" = Option<String>, Query, description = "Exact modality"),
        ("seniority" = Option<String>, Query, description = "Exact seniority"),
        ("contractType" = Option<String>, Query, description = "Exact contract type"),
        ("locationState" = Option<String>, Query, description = "Exact state"),
        ("locationCity" = Option<String>, Query, description = "Exact city"),
        ("course" = Option<String>, Query, description = "Preferred course"),
        ("search" = Option<String>, Query, description = "Free text search"),
        ("recruiterId" = Option<Uuid>, Query, description = "Owning recruiter"),
        ("minSalary" = Option<i64>, Query, description = "Lower salary bound"),
        ("maxSalary" = Option<i64>, Query, description = "Upper salary bound"),
        ("mine" = Option<bool>, Query, description = "Only the caller's vacancies"),
        ("includeDrafts" = Option<bool>, Query, description = "Include drafts with mine=true"),
        ("accepted" = Option<String>, Query, description = "only or exclude accepted vacancies")
    ),
    responses(
        (status = 200, description = "Filtered, ranked vacancies", body = Json<VacancyListResponse>),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn list_vacancies(
    State(state): State<AppState>,
    viewer: Option<Extension<Viewer>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let viewer = viewer.map(|Extension(v)| v);
    let result = state.vacancy_service.list(&raw, viewer.as_ref()).await?;
    Ok(Json(VacancyListResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    responses(
        (status = 200, description = "Vacancy as seen by the caller", body = Json<VacancyDetailResponse>),
        (status = 403, description = "Draft owned by someone else"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    viewer: Option<Extension<Viewer>>,
) -> Result<impl IntoResponse> {
    let viewer = viewer.map(|Extension(v)| v);
    let projection = state.vacancy_service.get(id, viewer.as_ref()).await?;
    Ok(Json(VacancyDetailResponse::from(projection)))
}

#[utoipa::path(
    post,
    path = "/api/vacancies",
    request_body = CreateVacancyPayload,
    responses(
        (status = 201, description = "Vacancy created", body = Json<VacancyResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Caller is not a recruiter")
    )
)]
#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    viewer: Option<Extension<Viewer>>,
    Json(payload): Json<CreateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let viewer = viewer.map(|Extension(v)| v);
    let vacancy = state
        .vacancy_service
        .create(payload, viewer.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(VacancyResponse::from(vacancy))))
}

#[utoipa::path(
    patch,
    path = "/api/vacancies/{id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    request_body = UpdateVacancyPayload,
    responses(
        (status = 200, description = "Vacancy updated", body = Json<VacancyResponse>),
        (status = 400, description = "Invalid or empty payload"),
        (status = 403, description = "Caller does not own the vacancy"),
        (status = 404, description = "Vacancy not found")
    )
)]
#[axum::debug_handler]
pub async fn update_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    viewer: Option<Extension<Viewer>>,
    Json(payload): Json<UpdateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let viewer = viewer.map(|Extension(v)| v);
    let vacancy = state
        .vacancy_service
        .update(id, payload, viewer.as_ref())
        .await?;
    Ok(Json(VacancyResponse::from(vacancy)))
}

#[utoipa::path(
    post,
    path = "/api/vacancies/{id}/applications",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID")
    ),
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationResponse>),
        (status = 403, description = "Caller may not apply"),
        (status = 404, description = "Vacancy not found"),
        (status = 409, description = "Already applied")
    )
)]
#[axum::debug_handler]
pub async fn apply_to_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    viewer: Option<Extension<Viewer>>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let viewer = viewer.map(|Extension(v)| v);
    let application = state
        .application_service
        .apply(id, payload, viewer.as_ref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/vacancies/{id}/applications/{application_id}",
    params(
        ("id" = Uuid, Path, description = "Vacancy ID"),
        ("application_id" = Uuid, Path, description = "Application ID")
    ),
    request_body = DecisionPayload,
    responses(
        (status = 200, description = "Decision recorded", body = Json<ApplicationResponse>),
        (status = 400, description = "Status must be ACCEPTED or REJECTED"),
        (status = 403, description = "Caller does not own the vacancy"),
        (status = 404, description = "Vacancy or application not found")
    )
)]
#[axum::debug_handler]
pub async fn decide_application(
    State(state): State<AppState>,
    Path((id, application_id)): Path<(Uuid, Uuid)>,
    viewer: Option<Extension<Viewer>>,
    Json(payload): Json<DecisionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let viewer = viewer.map(|Extension(v)| v);
    let application = state
        .application_service
        .decide(id, application_id, payload, viewer.as_ref())
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}
