use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{NotificationSink, VacancyRepository};
use crate::error::Result;
use crate::models::application::{ApplicationStatus, VacancyApplication};
use crate::models::notification::{NewNotification, Recipient};
use crate::models::vacancy::Vacancy;
use crate::vacancy::{Predicate, WhereClause};

const VACANCY_COLUMNS: &str = "id, title, description, skills, preferred_courses, keywords, \
    modality, seniority, contract_type, workload, salary_min, salary_max, salary_currency, \
    benefits, application_deadline, location_city, location_state, location_country, \
    company_name, contact_email, contact_phone, contact_url, status, is_draft, recruiter_id, \
    created_at, updated_at, closed_at";

const APPLICATION_COLUMNS: &str = "id, vacancy_id, applicant_id, cover_letter, resume_url, \
    portfolio_url, additional_info, status, decision_note, decided_at, decided_by, \
    created_at, updated_at";

#[derive(Clone)]
pub struct PgVacancyRepository {
    pool: PgPool,
}

impl PgVacancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::RecruiterIs(id) => {
            qb.push("recruiter_id = ").push_bind(*id);
        }
        Predicate::IsDraft(flag) => {
            qb.push("is_draft = ").push_bind(*flag);
        }
        Predicate::StatusIs(status) => {
            qb.push("status = ").push_bind(*status);
        }
        Predicate::TextEquals(field, value) => {
            qb.push(format!("LOWER({}) = LOWER(", field.column()))
                .push_bind(value.clone())
                .push(")");
        }
        Predicate::PreferredCourse(course) => {
            qb.push(
                "EXISTS (SELECT 1 FROM UNNEST(preferred_courses) AS course WHERE LOWER(course) = LOWER(",
            )
            .push_bind(course.clone())
            .push("))");
        }
        Predicate::Keyword(keyword) => {
            qb.push_bind(keyword.clone()).push(" = ANY(keywords)");
        }
        Predicate::Skill(skill) => {
            qb.push_bind(skill.clone()).push(" = ANY(skills)");
        }
        Predicate::SalaryMinAtLeast(min) => {
            qb.push("salary_min >= ").push_bind(*min);
        }
        Predicate::SalaryMaxAtMost(max) => {
            qb.push("salary_max <= ").push_bind(*max);
        }
        Predicate::TitleContains(needle) => {
            qb.push("title ILIKE ").push_bind(like_pattern(needle));
        }
        Predicate::DescriptionContains(needle) => {
            qb.push("description ILIKE ").push_bind(like_pattern(needle));
        }
        Predicate::IdIn(ids) => {
            qb.push("id = ANY(").push_bind(ids.clone()).push(")");
        }
        Predicate::IdNotIn(ids) => {
            qb.push("NOT (id = ANY(").push_bind(ids.clone()).push("))");
        }
        Predicate::Any(alternatives) if alternatives.is_empty() => {
            qb.push("FALSE");
        }
        Predicate::Any(alternatives) => {
            qb.push("(");
            for (i, alternative) in alternatives.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_predicate(qb, alternative);
            }
            qb.push(")");
        }
    }
}

fn push_where(qb: &mut QueryBuilder<'_, Postgres>, clause: &WhereClause) {
    for (i, predicate) in clause.conditions.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(qb, predicate);
    }
}

#[async_trait]
impl VacancyRepository for PgVacancyRepository {
    async fn insert_vacancy(&self, vacancy: &Vacancy) -> Result<Vacancy> {
        let sql = format!(
            r#"
            INSERT INTO vacancies (
                id, title, description, skills, preferred_courses, keywords,
                modality, seniority, contract_type, workload, salary_min, salary_max, salary_currency,
                benefits, application_deadline, location_city, location_state, location_country,
                company_name, contact_email, contact_phone, contact_url, status, is_draft, recruiter_id,
                created_at, updated_at, closed_at
            ) VALUES (
                $1,$2,$3,$4,$5,$6,
                $7,$8,$9,$10,$11,$12,$13,
                $14,$15,$16,$17,$18,
                $19,$20,$21,$22,$23,$24,$25,
                $26,$27,$28
            )
            RETURNING {}
            "#,
            VACANCY_COLUMNS
        );

        let stored = sqlx::query_as::<_, Vacancy>(&sql)
            .bind(vacancy.id)
            .bind(&vacancy.title)
            .bind(&vacancy.description)
            .bind(&vacancy.skills)
            .bind(&vacancy.preferred_courses)
            .bind(&vacancy.keywords)
            .bind(&vacancy.modality)
            .bind(&vacancy.seniority)
            .bind(&vacancy.contract_type)
            .bind(&vacancy.workload)
            .bind(vacancy.salary_min)
            .bind(vacancy.salary_max)
            .bind(&vacancy.salary_currency)
            .bind(&vacancy.benefits)
            .bind(vacancy.application_deadline)
            .bind(&vacancy.location_city)
            .bind(&vacancy.location_state)
            .bind(&vacancy.location_country)
            .bind(&vacancy.company_name)
            .bind(&vacancy.contact_email)
            .bind(&vacancy.contact_phone)
            .bind(&vacancy.contact_url)
            .bind(vacancy.status)
            .bind(vacancy.is_draft)
            .bind(vacancy.recruiter_id)
            .bind(vacancy.created_at)
            .bind(vacancy.updated_at)
            .bind(vacancy.closed_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn update_vacancy(&self, vacancy: &Vacancy) -> Result<Vacancy> {
        let sql = format!(
            r#"
            UPDATE vacancies
            SET
                title = $2,
                description = $3,
                skills = $4,
                preferred_courses = $5,
                keywords = $6,
                modality = $7,
                seniority = $8,
                contract_type = $9,
                workload = $10,
                salary_min = $11,
                salary_max = $12,
                salary_currency = $13,
                benefits = $14,
                application_deadline = $15,
                location_city = $16,
                location_state = $17,
                location_country = $18,
                company_name = $19,
                contact_email = $20,
                contact_phone = $21,
                contact_url = $22,
                status = $23,
                is_draft = $24,
                updated_at = $25,
                closed_at = $26
            WHERE id = $1
            RETURNING {}
            "#,
            VACANCY_COLUMNS
        );

        let stored = sqlx::query_as::<_, Vacancy>(&sql)
            .bind(vacancy.id)
            .bind(&vacancy.title)
            .bind(&vacancy.description)
            .bind(&vacancy.skills)
            .bind(&vacancy.preferred_courses)
            .bind(&vacancy.keywords)
            .bind(&vacancy.modality)
            .bind(&vacancy.seniority)
            .bind(&vacancy.contract_type)
            .bind(&vacancy.workload)
            .bind(vacancy.salary_min)
            .bind(vacancy.salary_max)
            .bind(&vacancy.salary_currency)
            .bind(&vacancy.benefits)
            .bind(vacancy.application_deadline)
            .bind(&vacancy.location_city)
            .bind(&vacancy.location_state)
            .bind(&vacancy.location_country)
            .bind(&vacancy.company_name)
            .bind(&vacancy.contact_email)
            .bind(&vacancy.contact_phone)
            .bind(&vacancy.contact_url)
            .bind(vacancy.status)
            .bind(vacancy.is_draft)
            .bind(vacancy.updated_at)
            .bind(vacancy.closed_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(stored)
    }

    async fn find_vacancy(&self, id: Uuid) -> Result<Option<Vacancy>> {
        let sql = format!("SELECT {} FROM vacancies WHERE id = $1", VACANCY_COLUMNS);
        let vacancy = sqlx::query_as::<_, Vacancy>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vacancy)
    }

    async fn list_vacancies(
        &self,
        clause: &WhereClause,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Vacancy>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM vacancies",
            VACANCY_COLUMNS
        ));
        push_where(&mut qb, clause);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let items = qb
            .build_query_as::<Vacancy>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn count_vacancies(&self, clause: &WhereClause) -> Result<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM vacancies");
        push_where(&mut qb, clause);
        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn accepted_vacancy_ids(&self, applicant_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT vacancy_id FROM vacancy_applications WHERE applicant_id = $1 AND status = $2",
        )
        .bind(applicant_id)
        .bind(ApplicationStatus::Accepted)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn applications_for_vacancy(&self, vacancy_id: Uuid) -> Result<Vec<VacancyApplication>> {
        let sql = format!(
            "SELECT {} FROM vacancy_applications WHERE vacancy_id = $1 ORDER BY created_at ASC",
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, VacancyApplication>(&sql)
            .bind(vacancy_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn applications_by_applicant(
        &self,
        applicant_id: Uuid,
        vacancy_ids: &[Uuid],
    ) -> Result<Vec<VacancyApplication>> {
        if vacancy_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {} FROM vacancy_applications WHERE applicant_id = $1 AND vacancy_id = ANY($2)",
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, VacancyApplication>(&sql)
            .bind(applicant_id)
            .bind(vacancy_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<VacancyApplication>> {
        let sql = format!(
            "SELECT {} FROM vacancy_applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, VacancyApplication>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn find_application_for(
        &self,
        vacancy_id: Uuid,
        applicant_id: Uuid,
    ) -> Result<Option<VacancyApplication>> {
        let sql = format!(
            "SELECT {} FROM vacancy_applications WHERE vacancy_id = $1 AND applicant_id = $2",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, VacancyApplication>(&sql)
            .bind(vacancy_id)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn insert_application(
        &self,
        application: &VacancyApplication,
    ) -> Result<VacancyApplication> {
        let sql = format!(
            r#"
            INSERT INTO vacancy_applications (
                id, vacancy_id, applicant_id, cover_letter, resume_url, portfolio_url,
                additional_info, status, decision_note, decided_at, decided_by, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let stored = sqlx::query_as::<_, VacancyApplication>(&sql)
            .bind(application.id)
            .bind(application.vacancy_id)
            .bind(application.applicant_id)
            .bind(&application.cover_letter)
            .bind(&application.resume_url)
            .bind(&application.portfolio_url)
            .bind(&application.additional_info)
            .bind(application.status)
            .bind(&application.decision_note)
            .bind(application.decided_at)
            .bind(application.decided_by)
            .bind(application.created_at)
            .bind(application.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn update_application(
        &self,
        application: &VacancyApplication,
    ) -> Result<VacancyApplication> {
        let sql = format!(
            r#"
            UPDATE vacancy_applications
            SET status = $2, decision_note = $3, decided_at = $4, decided_by = $5, updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let stored = sqlx::query_as::<_, VacancyApplication>(&sql)
            .bind(application.id)
            .bind(application.status)
            .bind(&application.decision_note)
            .bind(application.decided_at)
            .bind(application.decided_by)
            .bind(application.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(stored)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgNotificationSink {
    pool: PgPool,
}

impl PgNotificationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PgNotificationSink {
    async fn notify(&self, notification: NewNotification) -> Result<()> {
        match &notification.recipient {
            Recipient::User(recipient_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO notifications (id, recipient_id, kind, title, message)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(*recipient_id)
                .bind(notification.kind.as_str())
                .bind(&notification.title)
                .bind(&notification.message)
                .execute(&self.pool)
                .await?;
            }
            Recipient::Audience(user_types) => {
                let user_types: Vec<String> =
                    user_types.iter().map(|t| t.as_str().to_string()).collect();
                sqlx::query(
                    r#"
                    INSERT INTO notifications (id, recipient_id, kind, title, message)
                    SELECT gen_random_uuid(), id, $1, $2, $3
                    FROM users
                    WHERE user_type = ANY($4)
                    "#,
                )
                .bind(notification.kind.as_str())
                .bind(&notification.title)
                .bind(&notification.message)
                .bind(user_types)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vacancy::VacancyStatus;
    use crate::vacancy::predicate::TextField;

    fn render(clause: &WhereClause) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM vacancies");
        push_where(&mut qb, clause);
        qb.sql().to_string()
    }

    #[test]
    fn empty_clause_renders_no_where() {
        assert_eq!(render(&WhereClause::default()), "SELECT id FROM vacancies");
    }

    #[test]
    fn renders_bound_conditions_joined_with_and() {
        let clause = WhereClause {
            conditions: vec![
                Predicate::IsDraft(false),
                Predicate::StatusIs(VacancyStatus::Open),
                Predicate::TextEquals(TextField::Modality, "Remoto".into()),
                Predicate::Any(vec![
                    Predicate::TitleContains("rust".into()),
                    Predicate::Keyword("rust".into()),
                ]),
            ],
        };
        assert_eq!(
            render(&clause),
            "SELECT id FROM vacancies WHERE is_draft = $1 AND status = $2 \
             AND LOWER(modality) = LOWER($3) AND (title ILIKE $4 OR $5 = ANY(keywords))"
        );
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
