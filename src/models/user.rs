use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account type carried by the session. Unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserType {
    Aluno,
    Gestor,
    Recrutador,
    Other(String),
}

impl UserType {
    pub fn as_str(&self) -> &str {
        match self {
            UserType::Aluno => "aluno",
            UserType::Gestor => "gestor",
            UserType::Recrutador => "recrutador",
            UserType::Other(value) => value.as_str(),
        }
    }

    pub fn is_recruiter(&self) -> bool {
        matches!(self, UserType::Recrutador)
    }
}

impl From<String> for UserType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "aluno" => UserType::Aluno,
            "gestor" => UserType::Gestor,
            "recrutador" => UserType::Recrutador,
            _ => UserType::Other(value),
        }
    }
}

impl From<&str> for UserType {
    fn from(value: &str) -> Self {
        UserType::from(value.to_string())
    }
}

impl From<UserType> for String {
    fn from(value: UserType) -> Self {
        value.as_str().to_string()
    }
}

/// Identity of the caller for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: Uuid,
    pub user_type: UserType,
    pub course: Option<String>,
}

impl Viewer {
    pub fn new(id: Uuid, user_type: impl Into<UserType>, course: Option<String>) -> Self {
        Self {
            id,
            user_type: user_type.into(),
            course,
        }
    }
}
