use std::sync::Arc;

use crate::models::application::{ApplicationStatus, VacancyApplication};
use crate::models::notification::{NewNotification, NotificationKind, Recipient};
use crate::models::user::UserType;
use crate::models::vacancy::Vacancy;
use crate::repository::NotificationSink;

/// Builds the messages emitted by the vacancy workflow and hands them to a sink.
///
/// Delivery is best effort: a failing sink is logged and never fails the
/// operation that triggered it.
#[derive(Clone)]
pub struct NotificationService {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationService {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub async fn vacancy_published(&self, vacancy: &Vacancy) {
        let notification = NewNotification {
            recipient: Recipient::Audience(vec![UserType::Aluno, UserType::Gestor]),
            kind: NotificationKind::VacancyPublished,
            title: "Nova vaga publicada".to_string(),
            message: format!("A vaga \"{}\" está aberta para candidaturas.", vacancy.title),
        };
        self.deliver(notification).await;
    }

    pub async fn application_received(&self, vacancy: &Vacancy, application: &VacancyApplication) {
        let notification = NewNotification {
            recipient: Recipient::User(vacancy.recruiter_id),
            kind: NotificationKind::VacancyApplication,
            title: "Nova candidatura".to_string(),
            message: format!(
                "Você recebeu uma nova candidatura para a vaga \"{}\".",
                vacancy.title
            ),
        };
        tracing::debug!(application_id = %application.id, "notifying vacancy owner");
        self.deliver(notification).await;
    }

    pub async fn application_decided(&self, vacancy: &Vacancy, application: &VacancyApplication) {
        let verdict = match application.status {
            ApplicationStatus::Accepted => "aceita",
            ApplicationStatus::Rejected => "recusada",
            ApplicationStatus::Pending => "atualizada",
        };
        let mut message = format!(
            "Sua candidatura para a vaga \"{}\" foi {}.",
            vacancy.title, verdict
        );
        if let Some(note) = application
            .decision_note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
        {
            message.push_str(&format!(" Observação: {}", note));
        }

        let notification = NewNotification {
            recipient: Recipient::User(application.applicant_id),
            kind: NotificationKind::VacancyApplicationDecision,
            title: "Atualização da candidatura".to_string(),
            message,
        };
        self.deliver(notification).await;
    }

    async fn deliver(&self, notification: NewNotification) {
        let kind = notification.kind.as_str();
        if let Err(e) = self.sink.notify(notification).await {
            tracing::warn!(error = ?e, kind, "failed to deliver notification");
        }
    }
}
