pub mod application_service;
pub mod notification_service;
pub mod vacancy_service;

use crate::error::{Error, Result};
use crate::models::user::Viewer;

pub(crate) fn require_viewer(viewer: Option<&Viewer>) -> Result<&Viewer> {
    viewer.ok_or_else(|| Error::Forbidden("Authentication required".to_string()))
}

/// Trims free text; blank input becomes `None`.
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
