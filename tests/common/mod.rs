#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use talent_backend::{
    middleware::auth::{issue_token, Claims},
    models::user::Viewer,
    repository::{MemoryNotificationSink, MemoryVacancyRepository},
    routes, AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "test_secret_key";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryVacancyRepository>,
    pub sink: Arc<MemoryNotificationSink>,
}

pub fn test_app() -> TestApp {
    let repo = Arc::new(MemoryVacancyRepository::new());
    let sink = Arc::new(MemoryNotificationSink::new());
    let state = AppState::new(repo.clone(), sink.clone(), SECRET);
    TestApp {
        router: routes::app(state),
        repo,
        sink,
    }
}

pub struct User {
    pub id: Uuid,
    pub token: String,
}

pub fn user(user_type: &str, course: Option<&str>) -> User {
    let viewer = Viewer::new(Uuid::new_v4(), user_type, course.map(str::to_string));
    let claims = Claims::for_viewer(&viewer, chrono::Duration::hours(1));
    let token = issue_token(SECRET, &claims).expect("token");
    User {
        id: viewer.id,
        token,
    }
}

pub fn recruiter() -> User {
    user("recrutador", None)
}

pub fn student(course: Option<&str>) -> User {
    user("aluno", course)
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(&bytes).into()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, JsonValue) {
        self.send(Method::GET, uri, token, None).await
    }

    /// Creates a vacancy as `owner` and returns its id.
    pub async fn create_vacancy(&self, owner: &User, body: JsonValue) -> String {
        let (status, created) = self
            .send(Method::POST, "/api/vacancies", Some(&owner.token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        created["id"].as_str().expect("vacancy id").to_string()
    }
}

pub fn vacancy_body(title: &str) -> JsonValue {
    json!({
        "title": title,
        "description": "Desenvolvimento de APIs em Rust",
        "skills": ["Rust", "SQL"],
        "preferredCourses": ["Ciência da Computação"],
        "modality": "Remoto",
        "salaryMin": 3000,
        "salaryMax": 5000,
        "status": "OPEN",
        "isDraft": false
    })
}
