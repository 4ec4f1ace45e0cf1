use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::Viewer;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default, alias = "role")]
    pub user_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
}

impl Claims {
    pub fn for_viewer(viewer: &Viewer, ttl: Duration) -> Self {
        let exp = (Utc::now() + ttl).timestamp().max(0) as usize;
        Self {
            sub: viewer.id.to_string(),
            exp,
            user_type: viewer.user_type.as_str().to_string(),
            course: viewer.course.clone(),
        }
    }

    fn into_viewer(self) -> Option<Viewer> {
        let id = Uuid::parse_str(&self.sub).ok()?;
        let course = self
            .course
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Some(Viewer::new(id, self.user_type, course))
    }
}

pub fn issue_token(secret: &str, claims: &Claims) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("failed to sign token: {}", e)))
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

/// Resolves a bearer token into a [`Viewer`] extension.
///
/// Requests without an `Authorization` header pass through anonymously.
pub async fn attach_viewer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return next.run(req).await;
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let claims = match decode::<Claims>(
        token.trim(),
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            return unauthorized("invalid_token");
        }
    };

    match claims.into_viewer() {
        Some(viewer) => {
            req.extensions_mut().insert(viewer);
            next.run(req).await
        }
        None => unauthorized("invalid_subject"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_accepted_as_user_type_alias() {
        let id = Uuid::new_v4();
        let raw = json!({ "sub": id.to_string(), "exp": 0, "role": "gestor" });
        let claims: Claims = serde_json::from_value(raw).expect("claims");
        let viewer = claims.into_viewer().expect("viewer");
        assert_eq!(viewer.id, id);
        assert!(matches!(viewer.user_type, crate::models::user::UserType::Gestor));
    }

    #[test]
    fn tokens_round_trip_through_the_secret() {
        let viewer = Viewer::new(Uuid::new_v4(), "aluno", Some("Direito".into()));
        let token = issue_token("secret", &Claims::for_viewer(&viewer, Duration::hours(1)))
            .expect("token");

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        )
        .expect("decode");
        assert_eq!(data.claims.into_viewer(), Some(viewer));
    }

    #[test]
    fn non_uuid_subjects_are_rejected() {
        let claims = Claims {
            sub: "42".into(),
            exp: 0,
            user_type: "aluno".into(),
            course: None,
        };
        assert!(claims.into_viewer().is_none());
    }
}
