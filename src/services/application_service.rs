use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::application_dto::{ApplyPayload, DecisionPayload};
use crate::error::{field_error, Error, Result};
use crate::models::application::{ApplicationStatus, VacancyApplication};
use crate::models::user::Viewer;
use crate::models::vacancy::VacancyStatus;
use crate::repository::VacancyRepository;
use crate::services::notification_service::NotificationService;
use crate::services::{clean_text, require_viewer};
use crate::vacancy::can_user_apply;

/// Application workflow: none -> PENDING -> ACCEPTED | REJECTED.
#[derive(Clone)]
pub struct ApplicationService {
    repo: Arc<dyn VacancyRepository>,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(repo: Arc<dyn VacancyRepository>, notifications: NotificationService) -> Self {
        Self {
            repo,
            notifications,
        }
    }

    pub async fn apply(
        &self,
        vacancy_id: Uuid,
        payload: ApplyPayload,
        viewer: Option<&Viewer>,
    ) -> Result<VacancyApplication> {
        let viewer = require_viewer(viewer)?;
        let vacancy = self
            .repo
            .find_vacancy(vacancy_id)
            .await?
            .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;

        let owner = vacancy.is_owned_by(viewer.id);
        if vacancy.is_draft && !owner {
            return Err(Error::NotFound("Vacancy not found".to_string()));
        }
        if owner {
            return Err(Error::Forbidden(
                "Recruiters cannot apply to their own vacancy".to_string(),
            ));
        }
        if vacancy.status != VacancyStatus::Open {
            return Err(Error::Forbidden(
                "Vacancy is not accepting applications".to_string(),
            ));
        }
        if !can_user_apply(&viewer.user_type) {
            return Err(Error::Forbidden(format!(
                "Users of type '{}' cannot apply to vacancies",
                viewer.user_type.as_str()
            )));
        }
        if self
            .repo
            .find_application_for(vacancy.id, viewer.id)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(
                "You already applied to this vacancy".to_string(),
            ));
        }

        let now = Utc::now();
        let application = VacancyApplication {
            id: Uuid::new_v4(),
            vacancy_id: vacancy.id,
            applicant_id: viewer.id,
            cover_letter: clean_text(payload.cover_letter),
            resume_url: clean_text(payload.resume_url),
            portfolio_url: clean_text(payload.portfolio_url),
            additional_info: clean_text(payload.additional_info),
            status: ApplicationStatus::Pending,
            decision_note: None,
            decided_at: None,
            decided_by: None,
            created_at: now,
            updated_at: now,
        };
        let application = self.repo.insert_application(&application).await?;

        tracing::info!(
            vacancy_id = %vacancy.id,
            application_id = %application.id,
            applicant_id = %viewer.id,
            "application submitted"
        );
        self.notifications
            .application_received(&vacancy, &application)
            .await;

        Ok(application)
    }

    /// Decisions overwrite any earlier decision on the same application.
    pub async fn decide(
        &self,
        vacancy_id: Uuid,
        application_id: Uuid,
        payload: DecisionPayload,
        viewer: Option<&Viewer>,
    ) -> Result<VacancyApplication> {
        let viewer = require_viewer(viewer)?;
        if !payload.status.is_decision() {
            return Err(field_error(
                "status",
                "invalid_decision",
                "status must be ACCEPTED or REJECTED",
            ));
        }

        let vacancy = self
            .repo
            .find_vacancy(vacancy_id)
            .await?
            .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))?;
        if !vacancy.is_owned_by(viewer.id) {
            return Err(Error::Forbidden(
                "Only the vacancy owner can decide applications".to_string(),
            ));
        }

        let mut application = self
            .repo
            .find_application(application_id)
            .await?
            .filter(|a| a.vacancy_id == vacancy.id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        let now = Utc::now();
        application.status = payload.status;
        application.decision_note = clean_text(payload.note);
        application.decided_at = Some(now);
        application.decided_by = Some(viewer.id);
        application.updated_at = now;
        let application = self.repo.update_application(&application).await?;

        tracing::info!(
            vacancy_id = %vacancy.id,
            application_id = %application.id,
            status = application.status.as_str(),
            "application decided"
        );
        self.notifications
            .application_decided(&vacancy, &application)
            .await;

        Ok(application)
    }
}
