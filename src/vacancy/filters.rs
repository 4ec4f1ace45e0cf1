use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::error::{Error, Result};
use crate::models::vacancy::VacancyStatus;

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 50;
/// Largest page whose offset still fits in an `i64` at the maximum page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// How the viewer's accepted vacancies take part in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptedMode {
    /// Accepted vacancies stay visible even after they close.
    #[default]
    Default,
    /// Only accepted vacancies.
    Only,
    /// Everything except accepted vacancies.
    Exclude,
}

/// Query filters for the vacancy listing after coercion and bounds checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacancyFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VacancyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mine: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_drafts: Option<bool>,
    pub accepted: AcceptedMode,
    pub page: i64,
    pub page_size: i64,
}

impl Default for VacancyFilters {
    fn default() -> Self {
        Self {
            status: None,
            modality: None,
            seniority: None,
            contract_type: None,
            location_state: None,
            location_city: None,
            course: None,
            search: None,
            recruiter_id: None,
            min_salary: None,
            max_salary: None,
            mine: None,
            include_drafts: None,
            accepted: AcceptedMode::Default,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl VacancyFilters {
    pub fn is_mine(&self) -> bool {
        self.mine.unwrap_or(false)
    }

    pub fn wants_drafts(&self) -> bool {
        self.include_drafts.unwrap_or(false)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Parses raw query parameters into [`VacancyFilters`].
///
/// Unknown keys are ignored. Malformed booleans count as absent and pagination
/// is coerced into bounds; every other recognised field that fails its
/// constraint is reported as a field-level validation error.
pub fn normalize_filters(raw: &HashMap<String, String>) -> Result<VacancyFilters> {
    let mut errors = ValidationErrors::new();
    let mut filters = VacancyFilters {
        modality: text(raw, "modality"),
        seniority: text(raw, "seniority"),
        contract_type: text(raw, "contractType"),
        location_state: text(raw, "locationState"),
        location_city: text(raw, "locationCity"),
        course: text(raw, "course"),
        search: text(raw, "search"),
        mine: text(raw, "mine").and_then(|v| parse_bool(&v)),
        include_drafts: text(raw, "includeDrafts").and_then(|v| parse_bool(&v)),
        page: pagination(raw, "page", 1, MAX_PAGE),
        page_size: pagination(raw, "pageSize", DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        ..VacancyFilters::default()
    };

    if let Some(status) = text(raw, "status") {
        match status.parse::<VacancyStatus>() {
            Ok(parsed) => filters.status = Some(parsed),
            Err(_) => errors.add(
                "status",
                invalid("invalid_status", "status must be OPEN or CLOSED"),
            ),
        }
    }

    if let Some(recruiter_id) = text(raw, "recruiterId") {
        match Uuid::parse_str(&recruiter_id) {
            Ok(parsed) => filters.recruiter_id = Some(parsed),
            Err(_) => errors.add(
                "recruiterId",
                invalid("invalid_id", "recruiterId must be a valid identifier"),
            ),
        }
    }

    match salary(raw, "minSalary") {
        Ok(value) => filters.min_salary = value,
        Err(err) => errors.add("minSalary", err),
    }
    match salary(raw, "maxSalary") {
        Ok(value) => filters.max_salary = value,
        Err(err) => errors.add("maxSalary", err),
    }

    if let Some(accepted) = text(raw, "accepted") {
        match accepted.to_ascii_lowercase().as_str() {
            "default" => filters.accepted = AcceptedMode::Default,
            "only" => filters.accepted = AcceptedMode::Only,
            "exclude" => filters.accepted = AcceptedMode::Exclude,
            _ => errors.add(
                "accepted",
                invalid("invalid_mode", "accepted must be only or exclude"),
            ),
        }
    }

    if errors.is_empty() {
        Ok(filters)
    } else {
        Err(Error::Validation(errors))
    }
}

/// Truthy: `1 true yes on`. Falsy: `0 false no off`. Anything else is absent.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn text(raw: &HashMap<String, String>, key: &str) -> Option<String> {
    raw.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn pagination(raw: &HashMap<String, String>, key: &str, default: i64, max: i64) -> i64 {
    text(raw, key)
        .and_then(|value| value.parse::<i64>().ok())
        .map(|value| value.clamp(1, max))
        .unwrap_or(default)
}

fn salary(
    raw: &HashMap<String, String>,
    key: &str,
) -> std::result::Result<Option<i64>, ValidationError> {
    let Some(value) = text(raw, key) else {
        return Ok(None);
    };
    match value.parse::<i64>() {
        Ok(parsed) if parsed >= 0 => Ok(Some(parsed)),
        _ => Err(invalid(
            "invalid_salary",
            "salary bounds must be non-negative integers",
        )),
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
