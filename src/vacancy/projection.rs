use serde::Serialize;

use crate::models::application::VacancyApplication;
use crate::models::user::{UserType, Viewer};
use crate::models::vacancy::{Vacancy, VacancyStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_edit: bool,
    pub can_apply: bool,
    pub can_manage_applications: bool,
}

/// A vacancy with only the applications the viewer is allowed to see.
#[derive(Debug, Clone)]
pub struct VacancyProjection {
    pub vacancy: Vacancy,
    pub applications: Vec<VacancyApplication>,
    pub permissions: Permissions,
}

/// Students and managers may apply to vacancies; other account types may not.
pub fn can_user_apply(user_type: &UserType) -> bool {
    matches!(user_type, UserType::Aluno | UserType::Gestor)
}

pub fn is_owner(vacancy: &Vacancy, viewer: Option<&Viewer>) -> bool {
    viewer.is_some_and(|v| vacancy.is_owned_by(v.id))
}

pub fn permissions_for(vacancy: &Vacancy, viewer: Option<&Viewer>) -> Permissions {
    let owner = is_owner(vacancy, viewer);
    let viewer_can_apply = viewer.is_some_and(|v| can_user_apply(&v.user_type));
    Permissions {
        can_edit: owner,
        can_apply: !vacancy.is_draft && vacancy.status == VacancyStatus::Open && viewer_can_apply,
        can_manage_applications: owner,
    }
}

pub fn project_for_viewer(
    vacancy: Vacancy,
    applications: Vec<VacancyApplication>,
    viewer: Option<&Viewer>,
) -> VacancyProjection {
    let permissions = permissions_for(&vacancy, viewer);
    let applications = if is_owner(&vacancy, viewer) {
        applications
    } else {
        match viewer {
            Some(viewer) => applications
                .into_iter()
                .filter(|a| a.applicant_id == viewer.id)
                .take(1)
                .collect(),
            None => Vec::new(),
        }
    };

    VacancyProjection {
        vacancy,
        applications,
        permissions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vacancy::test_support::{application, vacancy};
    use uuid::Uuid;

    #[test]
    fn owner_sees_every_application() {
        let owner = Viewer::new(Uuid::new_v4(), "recrutador", None);
        let mut v = vacancy("Dev");
        v.recruiter_id = owner.id;
        let apps = vec![
            application(v.id, Uuid::new_v4()),
            application(v.id, Uuid::new_v4()),
        ];

        let projection = project_for_viewer(v, apps, Some(&owner));
        assert_eq!(projection.applications.len(), 2);
        assert_eq!(
            projection.permissions,
            Permissions {
                can_edit: true,
                can_apply: false,
                can_manage_applications: true,
            }
        );
    }

    #[test]
    fn applicant_sees_only_their_own_application() {
        let student = Viewer::new(Uuid::new_v4(), "aluno", None);
        let v = vacancy("Dev");
        let apps = vec![
            application(v.id, Uuid::new_v4()),
            application(v.id, student.id),
        ];

        let projection = project_for_viewer(v, apps, Some(&student));
        assert_eq!(projection.applications.len(), 1);
        assert_eq!(projection.applications[0].applicant_id, student.id);
        assert!(projection.permissions.can_apply);
        assert!(!projection.permissions.can_edit);
    }

    #[test]
    fn strangers_and_anonymous_see_nothing() {
        let v = vacancy("Dev");
        let apps = vec![application(v.id, Uuid::new_v4())];
        let stranger = Viewer::new(Uuid::new_v4(), "gestor", None);

        let projection = project_for_viewer(v.clone(), apps.clone(), Some(&stranger));
        assert!(projection.applications.is_empty());
        assert!(projection.permissions.can_apply);

        let anonymous = project_for_viewer(v, apps, None);
        assert!(anonymous.applications.is_empty());
        assert!(!anonymous.permissions.can_apply);
    }

    #[test]
    fn closed_or_draft_vacancies_cannot_be_applied_to() {
        let student = Viewer::new(Uuid::new_v4(), "aluno", None);
        let mut closed = vacancy("Closed");
        closed.status = VacancyStatus::Closed;
        let mut draft = vacancy("Draft");
        draft.is_draft = true;

        assert!(!permissions_for(&closed, Some(&student)).can_apply);
        assert!(!permissions_for(&draft, Some(&student)).can_apply);
    }

    #[test]
    fn only_students_and_managers_can_apply() {
        assert!(can_user_apply(&UserType::Aluno));
        assert!(can_user_apply(&UserType::Gestor));
        assert!(!can_user_apply(&UserType::Recrutador));
        assert!(!can_user_apply(&UserType::Other("admin".into())));
    }
}
