use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vacancy_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum VacancyStatus {
    Open,
    Closed,
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::Open => "OPEN",
            VacancyStatus::Closed => "CLOSED",
        }
    }
}

impl std::str::FromStr for VacancyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(VacancyStatus::Open),
            "CLOSED" => Ok(VacancyStatus::Closed),
            other => Err(format!("unknown vacancy status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vacancy {
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

impl Vacancy {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.recruiter_id == user_id
    }

    pub fn is_published_and_open(&self) -> bool {
        !self.is_draft && self.status == VacancyStatus::Open
    }

    /// Applies a status change, stamping or clearing the closure time on transitions.
    pub fn set_status(&mut self, status: VacancyStatus, now: DateTime<Utc>) {
        match (self.status, status) {
            (VacancyStatus::Open, VacancyStatus::Closed) => self.closed_at = Some(now),
            (VacancyStatus::Closed, VacancyStatus::Open) => self.closed_at = None,
            _ => {}
        }
        self.status = status;
    }
}
