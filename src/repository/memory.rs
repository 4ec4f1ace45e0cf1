use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::{NotificationSink, VacancyRepository};
use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, VacancyApplication};
use crate::models::notification::NewNotification;
use crate::models::vacancy::Vacancy;
use crate::vacancy::WhereClause;

#[derive(Debug, Default)]
struct MemoryState {
    vacancies: Vec<Vacancy>,
    applications: Vec<VacancyApplication>,
}

/// Process-local store evaluating [`WhereClause`]s directly against rows.
#[derive(Debug, Default)]
pub struct MemoryVacancyRepository {
    state: Mutex<MemoryState>,
}

impl MemoryVacancyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }

    fn matching(state: &MemoryState, clause: &WhereClause) -> Vec<Vacancy> {
        let mut items: Vec<Vacancy> = state
            .vacancies
            .iter()
            .filter(|v| clause.matches(v))
            .cloned()
            .collect();
        // Same order as the SQL listing: created_at DESC, id DESC.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        items
    }
}

#[async_trait]
impl VacancyRepository for MemoryVacancyRepository {
    async fn insert_vacancy(&self, vacancy: &Vacancy) -> Result<Vacancy> {
        let mut state = self.lock()?;
        if state.vacancies.iter().any(|v| v.id == vacancy.id) {
            return Err(Error::Conflict("vacancy already exists".to_string()));
        }
        state.vacancies.push(vacancy.clone());
        Ok(vacancy.clone())
    }

    async fn update_vacancy(&self, vacancy: &Vacancy) -> Result<Vacancy> {
        let mut state = self.lock()?;
        let slot = state
            .vacancies
            .iter_mut()
            .find(|v| v.id == vacancy.id)
            .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;
        *slot = vacancy.clone();
        Ok(vacancy.clone())
    }

    async fn find_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>> {
        let state = self.lock()?;
        Ok(state.vacancies.iter().find(|v| v.id == id).cloned())
    }

    async fn list_vacancies(
        &self,
        clause: &WhereClause,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Vacancy>> {
        let state = self.lock()?;
        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(Self::matching(&state, clause)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn count_vacancies(&self, clause: &WhereClause) -> Result<i64> {
        let state = self.lock()?;
        let count = state.vacancies.iter().filter(|v| clause.matches(v)).count();
        Ok(count as i64)
    }

    async fn accepted_vacancy_ids(&self, applicant_id: Uuid) -> Result<Vec<Uuid>> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.applicant_id == applicant_id && a.status == ApplicationStatus::Accepted)
            .map(|a| a.vacancy_id)
            .collect())
    }

    async fn applications_for_vacancy(&self, vacancy_id: Uuid) -> Result<Vec<VacancyApplication>> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.vacancy_id == vacancy_id)
            .cloned()
            .collect())
    }

    async fn applications_by_applicant(
        &self,
        applicant_id: Uuid,
        vacancy_ids: &[Uuid],
    ) -> Result<Vec<VacancyApplication>> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .filter(|a| a.applicant_id == applicant_id && vacancy_ids.contains(&a.vacancy_id))
            .cloned()
            .collect())
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<VacancyApplication>> {
        let state = self.lock()?;
        Ok(state.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_application_for(
        &self,
        vacancy_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<VacancyApplication>> {
        let state = self.lock()?;
        Ok(state
            .applications
            .iter()
            .find(|a| a.vacancy_id == vacancy_id && a.applicant_id == applicant_id)
            .cloned())
    }

    async fn insert_application(
        &self,
        application: &VacancyApplication,
    ) -> Result<VacancyApplication> {
        let mut state = self.lock()?;
        let duplicate = state.applications.iter().any(|a| {
            a.vacancy_id == application.vacancy_id && a.applicant_id == application.applicant_id
        });
        if duplicate {
            return Err(Error::Conflict(
                "applicant already applied to this vacancy".to_string(),
            ));
        }
        state.applications.push(application.clone());
        Ok(application.clone())
    }

    async fn update_application(
        &self,
        application: &VacancyApplication,
    ) -> Result<VacancyApplication> {
        let mut state = self.lock()?;
        let slot = state
            .applications
            .iter_mut()
            .find(|a| a.id == application.id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        *slot = application.clone();
        Ok(application.clone())
    }

    async fn ping(&self) -> Result<()> {
        self.lock().map(|_| ())
    }
}

/// Records notifications instead of delivering them.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    sent: Mutex<Vec<NewNotification>>,
}

impl MemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NewNotification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for MemoryNotificationSink {
    async fn notify(&self, notification: NewNotification) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| Error::Internal("notification log lock poisoned".to_string()))?
            .push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tokio_test::assert_ok;

    use super::*;
    use crate::vacancy::test_support::vacancy;

    #[tokio::test]
    async fn listing_breaks_timestamp_ties_by_descending_id() {
        let repo = MemoryVacancyRepository::new();
        let stamp = Utc::now();
        let mut low = vacancy("Low");
        low.id = Uuid::from_u128(1);
        low.created_at = stamp;
        let mut high = vacancy("High");
        high.id = Uuid::from_u128(2);
        high.created_at = stamp;
        let mut newest = vacancy("Newest");
        newest.id = Uuid::from_u128(0);
        newest.created_at = stamp + Duration::seconds(1);
        for row in [&high, &low, &newest] {
            assert_ok!(repo.insert_vacancy(row).await);
        }

        let clause = WhereClause::default();
        let all = assert_ok!(repo.list_vacancies(&clause, 0, 10).await);
        let titles: Vec<&str> = all.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Newest", "High", "Low"]);

        let second_page = assert_ok!(repo.list_vacancies(&clause, 2, 2).await);
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].id, low.id);
        assert_eq!(assert_ok!(repo.count_vacancies(&clause).await), 3);
    }

    #[tokio::test]
    async fn offsets_past_the_end_yield_an_empty_page() {
        let repo = MemoryVacancyRepository::new();
        assert_ok!(repo.insert_vacancy(&vacancy("Only")).await);

        let page = assert_ok!(
            repo.list_vacancies(&WhereClause::default(), i64::MAX, 50)
                .await
        );
        assert!(page.is_empty());
    }
}
