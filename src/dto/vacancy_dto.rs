use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dto::application_dto::ApplicationResponse;
use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::services::vacancy_service::{VacancyList, VacancyListEntry};
use crate::vacancy::{Permissions, VacancyFilters, VacancyProjection};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_salary_range"))]
pub struct CreateVacancyPayload {
    #[validate(length(min = 1, max = 160))]
    pub title: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub skills: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub preferred_courses: Vec<String>,
    #[validate(length(max = 100))]
    pub keywords: Option<Vec<String>>,
    pub modality: Option<String>,
    pub seniority: Option<String>,
    pub contract_type: Option<String>,
    pub workload: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    #[validate(length(min = 1, max = 8))]
    pub salary_currency: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub benefits: Vec<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub company_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub contact_url: Option<String>,
    pub status: Option<VacancyStatus>,
    pub is_draft: Option<bool>,
}

fn validate_create_salary_range(
    payload: &CreateVacancyPayload,
) -> Result<(), ValidationError> {
    check_salary_range(payload.salary_min, payload.salary_max)
}

fn validate_update_salary_range(
    payload: &UpdateVacancyPayload,
) -> Result<(), ValidationError> {
    check_salary_range(payload.salary_min, payload.salary_max)
}

pub fn check_salary_range(min: Option<i64>, max: Option<i64>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            let mut error = ValidationError::new("salary_range");
            error.message = Some("salaryMin must not exceed salaryMax".into());
            Err(error)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_salary_range"))]
pub struct UpdateVacancyPayload {
    #[validate(length(min = 1, max = 160))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub description: Option<String>,
    #[validate(length(max = 50))]
    pub skills: Option<Vec<String>>,
    #[validate(length(max = 50))]
    pub preferred_courses: Option<Vec<String>>,
    #[validate(length(max = 100))]
    pub keywords: Option<Vec<String>>,
    pub modality: Option<String>,
    pub seniority: Option<String>,
    pub contract_type: Option<String>,
    pub workload: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    #[validate(length(min = 1, max = 8))]
    pub salary_currency: Option<String>,
    #[validate(length(max = 50))]
    pub benefits: Option<Vec<String>>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub company_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(url)]
    pub contact_url: Option<String>,
    pub status: Option<VacancyStatus>,
    pub is_draft: Option<bool>,
}

impl UpdateVacancyPayload {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.skills.is_none()
            && self.preferred_courses.is_none()
            && self.keywords.is_none()
            && self.modality.is_none()
            && self.seniority.is_none()
            && self.contract_type.is_none()
            && self.workload.is_none()
            && self.salary_min.is_none()
            && self.salary_max.is_none()
            && self.salary_currency.is_none()
            && self.benefits.is_none()
            && self.application_deadline.is_none()
            && self.location_city.is_none()
            && self.location_state.is_none()
            && self.location_country.is_none()
            && self.company_name.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && self.contact_url.is_none()
            && self.status.is_none()
            && self.is_draft.is_none()
    }

    /// Whether any field the keyword set is derived from changes.
    pub fn touches_keyword_sources(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.skills.is_some()
            || self.preferred_courses.is_some()
            || self.modality.is_some()
            || self.seniority.is_some()
            || self.contract_type.is_some()
            || self.benefits.is_some()
            || self.location_city.is_some()
            || self.location_state.is_some()
            || self.location_country.is_some()
            || self.company_name.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub preferred_courses: Vec<String>,
    pub keywords: Vec<String>,
    pub modality: Option<String>,
    pub seniority: Option<String>,
    pub contract_type: Option<String>,
    pub workload: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub benefits: Vec<String>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub company_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_url: Option<String>,
    pub status: VacancyStatus,
    pub is_draft: bool,
    pub recruiter_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    pub can_edit: bool,
    pub can_apply: bool,
    pub application: Option<ApplicationResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyListItem {
    #[serde(flatten)]
    pub vacancy: VacancyResponse,
    pub viewer_state: ViewerState,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyListResponse {
    pub items: Vec<VacancyListItem>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub has_more: bool,
    pub filters: VacancyFilters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyDetailResponse {
    pub vacancy: VacancyResponse,
    pub applications: Vec<ApplicationResponse>,
    pub permissions: Permissions,
}

impl From<Vacancy> for VacancyResponse {
    fn from(value: Vacancy) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            skills: value.skills,
            preferred_courses: value.preferred_courses,
            keywords: value.keywords,
            modality: value.modality,
            seniority: value.seniority,
            contract_type: value.contract_type,
            workload: value.workload,
            salary_min: value.salary_min,
            salary_max: value.salary_max,
            salary_currency: value.salary_currency,
            benefits: value.benefits,
            application_deadline: value.application_deadline,
            location_city: value.location_city,
            location_state: value.location_state,
            location_country: value.location_country,
            company_name: value.company_name,
            contact_email: value.contact_email,
            contact_phone: value.contact_phone,
            contact_url: value.contact_url,
            status: value.status,
            is_draft: value.is_draft,
            recruiter_id: value.recruiter_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            closed_at: value.closed_at,
        }
    }
}

impl From<VacancyListEntry> for VacancyListItem {
    fn from(value: VacancyListEntry) -> Self {
        Self {
            vacancy: value.vacancy.into(),
            viewer_state: ViewerState {
                can_edit: value.permissions.can_edit,
                can_apply: value.permissions.can_apply,
                application: value.application.map(Into::into),
            },
        }
    }
}

impl From<VacancyList> for VacancyListResponse {
    fn from(value: VacancyList) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
            page: value.page,
            page_size: value.page_size,
            has_more: value.has_more,
            filters: value.filters,
        }
    }
}

impl From<VacancyProjection> for VacancyDetailResponse {
    fn from(value: VacancyProjection) -> Self {
        Self {
            vacancy: value.vacancy.into(),
            applications: value.applications.into_iter().map(Into::into).collect(),
            permissions: value.permissions,
        }
    }
}
