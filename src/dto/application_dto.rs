use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{ApplicationStatus, VacancyApplication};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
    #[validate(url)]
    pub portfolio_url: Option<String>,
    #[validate(length(max = 2000))]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DecisionPayload {
    pub status: ApplicationStatus,
    #[serde(alias = "decisionNote")]
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub vacancy_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub additional_info: Option<String>,
    pub status: ApplicationStatus,
    pub decision_note: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<VacancyApplication> for ApplicationResponse {
    fn from(value: VacancyApplication) -> Self {
        Self {
            id: value.id,
            vacancy_id: value.vacancy_id,
            applicant_id: value.applicant_id,
            cover_letter: value.cover_letter,
            resume_url: value.resume_url,
            portfolio_url: value.portfolio_url,
            additional_info: value.additional_info,
            status: value.status,
            decision_note: value.decision_note,
            decided_at: value.decided_at,
            decided_by: value.decided_by,
            created_at: value.created_at,
        }
    }
}
