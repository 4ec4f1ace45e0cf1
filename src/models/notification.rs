use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    VacancyPublished,
    VacancyApplication,
    VacancyApplicationDecision,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::VacancyPublished => "VACANCY_PUBLISHED",
            NotificationKind::VacancyApplication => "VACANCY_APPLICATION",
            NotificationKind::VacancyApplicationDecision => "VACANCY_APPLICATION_DECISION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Recipient {
    User(Uuid),
    Audience(Vec<UserType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}
