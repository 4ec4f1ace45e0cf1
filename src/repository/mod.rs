//! Storage seams for vacancies, applications and notifications.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::application::VacancyApplication;
use crate::models::notification::NewNotification;
use crate::models::vacancy::Vacancy;
use crate::vacancy::WhereClause;

pub use memory::{MemoryNotificationSink, MemoryVacancyRepository};
pub use postgres::{PgNotificationSink, PgVacancyRepository};

#[async_trait]
pub trait VacancyRepository: Send + Sync {
    async fn insert_vacancy(&self, vacancy: &Vacancy) -> Result<Vacancy>;
    async fn update_vacancy(&self, vacancy: &Vacancy) -> Result<Vacancy>;
    async fn find_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>>;
    /// Newest first.
    async fn list_vacancies(
        &self,
        clause: &WhereClause,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Vacancy>>;
    async fn count_vacancies(&self, clause: &WhereClause) -> Result<i64>;

    /// Ids of vacancies where the applicant's application was accepted.
    async fn accepted_vacancy_ids(&self, applicant_id: Uuid) -> Result<Vec<Uuid>>;
    async fn applications_for_vacancy(&self, vacancy_id: Uuid) -> Result<Vec<VacancyApplication>>;
    async fn applications_by_applicant(
        &self,
        applicant_id: Uuid,
        vacancy_ids: &[Uuid],
    ) -> Result<Vec<VacancyApplication>>;
    async fn find_application(&self, id: Uuid) -> Result<Option<VacancyApplication>>;
    async fn find_application_for(
        &self,
        vacancy_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<VacancyApplication>>;
    /// Fails with `Error::Conflict` when the applicant already applied.
    async fn insert_application(
        &self,
        application: &VacancyApplication,
    ) -> Result<VacancyApplication>;
    async fn update_application(
        &self,
        application: &VacancyApplication,
    ) -> Result<VacancyApplication>;

    async fn ping(&self) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: NewNotification) -> Result<()>;
}
