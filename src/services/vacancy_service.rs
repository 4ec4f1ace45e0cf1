use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dto::vacancy_dto::{check_salary_range, CreateVacancyPayload, UpdateVacancyPayload};
use crate::error::{Error, Result};
use crate::models::application::VacancyApplication;
use crate::models::user::Viewer;
use crate::models::vacancy::{Vacancy, VacancyStatus};
use crate::repository::VacancyRepository;
use crate::services::notification_service::NotificationService;
use crate::services::{clean_list, clean_text, require_viewer};
use crate::vacancy::projection::permissions_for;
use crate::vacancy::{
    build_where, extract_keywords, normalize_filters, project_for_viewer, resolve_keywords,
    sort_by_relevance, KeywordSource, Permissions, VacancyFilters, VacancyProjection,
    WhereOptions,
};

#[derive(Clone)]
pub struct VacancyService {
    repo: Arc<dyn VacancyRepository>,
    notifications: NotificationService,
}

#[derive(Debug, Clone)]
pub struct VacancyListEntry {
    pub vacancy: Vacancy,
    pub permissions: Permissions,
    /// The viewer's own application to this vacancy, if any.
    pub application: Option<VacancyApplication>,
}

#[derive(Debug, Clone)]
pub struct VacancyList {
    pub items: Vec<VacancyListEntry>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub has_more: bool,
    pub filters: VacancyFilters,
}

impl VacancyService {
    pub fn new(repo: Arc<dyn VacancyRepository>, notifications: NotificationService) -> Self {
        Self {
            repo,
            notifications,
        }
    }

    pub async fn list(
        &self,
        raw: &HashMap<String, String>,
        viewer: Option<&Viewer>,
    ) -> Result<VacancyList> {
        let filters = normalize_filters(raw)?;
        let accepted_vacancy_ids = match viewer {
            Some(viewer) => self.repo.accepted_vacancy_ids(viewer.id).await?,
            None => Vec::new(),
        };
        let options = WhereOptions {
            accepted_vacancy_ids,
            accepted_mode: filters.accepted,
        };
        let clause = build_where(&filters, viewer, &options);

        let total = self.repo.count_vacancies(&clause).await?;
        let mut vacancies = self
            .repo
            .list_vacancies(&clause, filters.offset(), filters.page_size)
            .await?;

        let course = filters
            .course
            .as_deref()
            .or_else(|| viewer.and_then(|v| v.course.as_deref()));
        sort_by_relevance(&mut vacancies, course, &options.accepted_vacancy_ids);

        let applications = match viewer {
            Some(viewer) if !vacancies.is_empty() => {
                let ids: Vec<Uuid> = vacancies.iter().map(|v| v.id).collect();
                self.repo.applications_by_applicant(viewer.id, &ids).await?
            }
            _ => Vec::new(),
        };

        let items: Vec<VacancyListEntry> = vacancies
            .into_iter()
            .map(|vacancy| VacancyListEntry {
                permissions: permissions_for(&vacancy, viewer),
                application: applications
                    .iter()
                    .find(|a| a.vacancy_id == vacancy.id)
                    .cloned(),
                vacancy,
            })
            .collect();

        let has_more = filters.offset().saturating_add(items.len() as i64) < total;
        Ok(VacancyList {
            items,
            total,
            page: filters.page,
            page_size: filters.page_size,
            has_more,
            filters,
        })
    }

    pub async fn get(&self, id: Uuid, viewer: Option<&Viewer>) -> Result<VacancyProjection> {
        let vacancy = self.find(id).await?;
        if vacancy.is_draft && !viewer.is_some_and(|v| vacancy.is_owned_by(v.id)) {
            return Err(Error::Forbidden("Vacancy is not published".to_string()));
        }
        let applications = self.repo.applications_for_vacancy(vacancy.id).await?;
        Ok(project_for_viewer(vacancy, applications, viewer))
    }

    pub async fn create(
        &self,
        payload: CreateVacancyPayload,
        viewer: Option<&Viewer>,
    ) -> Result<Vacancy> {
        let viewer = require_viewer(viewer)?;
        if !viewer.user_type.is_recruiter() {
            return Err(Error::Forbidden(
                "Only recruiters can create vacancies".to_string(),
            ));
        }

        let now = Utc::now();
        let status = payload.status.unwrap_or(VacancyStatus::Open);
        let mut vacancy = Vacancy {
            id: Uuid::new_v4(),
            title: payload.title.trim().to_string(),
            description: payload.description.trim().to_string(),
            skills: clean_list(payload.skills),
            preferred_courses: clean_list(payload.preferred_courses),
            keywords: Vec::new(),
            modality: clean_text(payload.modality),
            seniority: clean_text(payload.seniority),
            contract_type: clean_text(payload.contract_type),
            workload: clean_text(payload.workload),
            salary_min: payload.salary_min,
            salary_max: payload.salary_max,
            salary_currency: clean_text(payload.salary_currency),
            benefits: clean_list(payload.benefits),
            application_deadline: payload.application_deadline,
            location_city: clean_text(payload.location_city),
            location_state: clean_text(payload.location_state),
            location_country: clean_text(payload.location_country),
            company_name: clean_text(payload.company_name),
            contact_email: clean_text(payload.contact_email),
            contact_phone: clean_text(payload.contact_phone),
            contact_url: clean_text(payload.contact_url),
            status,
            is_draft: payload.is_draft.unwrap_or(false),
            recruiter_id: viewer.id,
            created_at: now,
            updated_at: now,
            closed_at: (status == VacancyStatus::Closed).then_some(now),
        };
        vacancy.keywords = resolve_keywords(
            payload.keywords.as_deref(),
            &KeywordSource::from(&vacancy),
        );

        let vacancy = self.repo.insert_vacancy(&vacancy).await?;
        tracing::info!(
            vacancy_id = %vacancy.id,
            recruiter_id = %viewer.id,
            is_draft = vacancy.is_draft,
            "vacancy created"
        );
        if vacancy.is_published_and_open() {
            self.notifications.vacancy_published(&vacancy).await;
        }

        Ok(vacancy)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateVacancyPayload,
        viewer: Option<&Viewer>,
    ) -> Result<Vacancy> {
        let viewer = require_viewer(viewer)?;
        let mut vacancy = self.find(id).await?;
        if !vacancy.is_owned_by(viewer.id) {
            return Err(Error::Forbidden(
                "Only the vacancy owner can edit it".to_string(),
            ));
        }
        if payload.is_empty() {
            return Err(Error::BadRequest("No changes supplied".to_string()));
        }

        let was_draft = vacancy.is_draft;
        let rederive_keywords = payload.touches_keyword_sources();
        let now = Utc::now();

        if let Some(title) = payload.title {
            vacancy.title = title.trim().to_string();
        }
        if let Some(description) = payload.description {
            vacancy.description = description.trim().to_string();
        }
        if let Some(skills) = payload.skills {
            vacancy.skills = clean_list(skills);
        }
        if let Some(courses) = payload.preferred_courses {
            vacancy.preferred_courses = clean_list(courses);
        }
        if let Some(benefits) = payload.benefits {
            vacancy.benefits = clean_list(benefits);
        }
        merge_text(&mut vacancy.modality, payload.modality);
        merge_text(&mut vacancy.seniority, payload.seniority);
        merge_text(&mut vacancy.contract_type, payload.contract_type);
        merge_text(&mut vacancy.workload, payload.workload);
        merge_text(&mut vacancy.salary_currency, payload.salary_currency);
        merge_text(&mut vacancy.location_city, payload.location_city);
        merge_text(&mut vacancy.location_state, payload.location_state);
        merge_text(&mut vacancy.location_country, payload.location_country);
        merge_text(&mut vacancy.company_name, payload.company_name);
        merge_text(&mut vacancy.contact_email, payload.contact_email);
        merge_text(&mut vacancy.contact_phone, payload.contact_phone);
        merge_text(&mut vacancy.contact_url, payload.contact_url);
        if payload.salary_min.is_some() {
            vacancy.salary_min = payload.salary_min;
        }
        if payload.salary_max.is_some() {
            vacancy.salary_max = payload.salary_max;
        }
        if payload.application_deadline.is_some() {
            vacancy.application_deadline = payload.application_deadline;
        }
        if let Some(is_draft) = payload.is_draft {
            vacancy.is_draft = is_draft;
        }
        if let Some(status) = payload.status {
            vacancy.set_status(status, now);
        }

        if let Err(mut error) = check_salary_range(vacancy.salary_min, vacancy.salary_max) {
            error.message = Some("salaryMin must not exceed salaryMax after the update".into());
            let mut errors = validator::ValidationErrors::new();
            errors.add("salaryMin", error);
            return Err(Error::Validation(errors));
        }

        match payload.keywords {
            Some(keywords) => {
                vacancy.keywords =
                    resolve_keywords(Some(keywords.as_slice()), &KeywordSource::from(&vacancy));
            }
            None if rederive_keywords => {
                vacancy.keywords = extract_keywords(&KeywordSource::from(&vacancy));
            }
            None => {}
        }
        vacancy.updated_at = now;

        let vacancy = self.repo.update_vacancy(&vacancy).await?;
        tracing::info!(
            vacancy_id = %vacancy.id,
            status = vacancy.status.as_str(),
            is_draft = vacancy.is_draft,
            "vacancy updated"
        );
        if was_draft && vacancy.is_published_and_open() {
            self.notifications.vacancy_published(&vacancy).await;
        }

        Ok(vacancy)
    }

    async fn find(&self, id: Uuid) -> Result<Vacancy> {
        self.repo
            .find_vacancy(id)
            .await?
            .ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))
    }
}

fn merge_text(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = clean_text(value);
    }
}
