pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod vacancy;

use std::sync::Arc;

use sqlx::PgPool;

use crate::repository::{NotificationSink, PgNotificationSink, PgVacancyRepository, VacancyRepository};
use crate::services::{
    application_service::ApplicationService, notification_service::NotificationService,
    vacancy_service::VacancyService,
};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn VacancyRepository>,
    pub vacancy_service: VacancyService,
    pub application_service: ApplicationService,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn VacancyRepository>,
        sink: Arc<dyn NotificationSink>,
        jwt_secret: &str,
    ) -> Self {
        let notification_service = NotificationService::new(sink);
        let vacancy_service = VacancyService::new(repo.clone(), notification_service.clone());
        let application_service = ApplicationService::new(repo.clone(), notification_service);

        Self {
            repo,
            vacancy_service,
            application_service,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    pub fn from_pool(pool: PgPool, jwt_secret: &str) -> Self {
        Self::new(
            Arc::new(PgVacancyRepository::new(pool.clone())),
            Arc::new(PgNotificationSink::new(pool)),
            jwt_secret,
        )
    }
}
