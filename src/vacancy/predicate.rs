use uuid::Uuid;

use crate::models::user::Viewer;
use crate::models::vacancy::{Vacancy, VacancyStatus};

use super::filters::{AcceptedMode, VacancyFilters};

/// Scalar text columns compared with case-insensitive equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Modality,
    Seniority,
    ContractType,
    LocationState,
    LocationCity,
}

impl TextField {
    pub fn column(&self) -> &'static str {
        match self {
            TextField::Modality => "modality",
            TextField::Seniority => "seniority",
            TextField::ContractType => "contract_type",
            TextField::LocationState => "location_state",
            TextField::LocationCity => "location_city",
        }
    }

    pub fn value<'a>(&self, vacancy: &'a Vacancy) -> Option<&'a str> {
        match self {
            TextField::Modality => vacancy.modality.as_deref(),
            TextField::Seniority => vacancy.seniority.as_deref(),
            TextField::ContractType => vacancy.contract_type.as_deref(),
            TextField::LocationState => vacancy.location_state.as_deref(),
            TextField::LocationCity => vacancy.location_city.as_deref(),
        }
    }
}

/// A single condition over a vacancy row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    RecruiterIs(Uuid),
    IsDraft(bool),
    StatusIs(VacancyStatus),
    TextEquals(TextField, String),
    /// Case-insensitive membership in `preferred_courses`.
    PreferredCourse(String),
    /// Exact membership in the lowercase keyword set.
    Keyword(String),
    /// Exact membership in `skills`.
    Skill(String),
    SalaryMinAtLeast(i64),
    SalaryMaxAtMost(i64),
    TitleContains(String),
    DescriptionContains(String),
    IdIn(Vec<Uuid>),
    IdNotIn(Vec<Uuid>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        match self {
            Predicate::RecruiterIs(id) => vacancy.recruiter_id == *id,
            Predicate::IsDraft(flag) => vacancy.is_draft == *flag,
            Predicate::StatusIs(status) => vacancy.status == *status,
            Predicate::TextEquals(field, expected) => field
                .value(vacancy)
                .is_some_and(|actual| actual.to_lowercase() == expected.to_lowercase()),
            Predicate::PreferredCourse(course) => {
                let course = course.to_lowercase();
                vacancy
                    .preferred_courses
                    .iter()
                    .any(|c| c.to_lowercase() == course)
            }
            Predicate::Keyword(keyword) => vacancy.keywords.iter().any(|k| k == keyword),
            Predicate::Skill(skill) => vacancy.skills.iter().any(|s| s == skill),
            Predicate::SalaryMinAtLeast(min) => vacancy.salary_min.is_some_and(|v| v >= *min),
            Predicate::SalaryMaxAtMost(max) => vacancy.salary_max.is_some_and(|v| v <= *max),
            Predicate::TitleContains(needle) => contains_ignore_case(&vacancy.title, needle),
            Predicate::DescriptionContains(needle) => {
                contains_ignore_case(&vacancy.description, needle)
            }
            Predicate::IdIn(ids) => ids.contains(&vacancy.id),
            Predicate::IdNotIn(ids) => !ids.contains(&vacancy.id),
            Predicate::Any(alternatives) => alternatives.iter().any(|p| p.matches(vacancy)),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Conjunction of predicates. An empty clause matches every vacancy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    pub conditions: Vec<Predicate>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        self.conditions.iter().all(|p| p.matches(vacancy))
    }
}

/// Accumulates required conditions and a single group of alternatives.
///
/// Each method consumes the builder and hands back the extended one; the
/// alternatives are folded into one `Any` condition by [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct WhereClauseBuilder {
    all: Vec<Predicate>,
    any: Vec<Predicate>,
}

impl WhereClauseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, predicate: Predicate) -> Self {
        self.all.push(predicate);
        self
    }

    pub fn require_if(self, condition: bool, predicate: impl FnOnce() -> Predicate) -> Self {
        if condition {
            self.require(predicate())
        } else {
            self
        }
    }

    pub fn alternative(mut self, predicate: Predicate) -> Self {
        self.any.push(predicate);
        self
    }

    pub fn alternatives(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.any.extend(predicates);
        self
    }

    pub fn build(self) -> WhereClause {
        let mut conditions = self.all;
        if !self.any.is_empty() {
            conditions.push(Predicate::Any(self.any));
        }
        WhereClause { conditions }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WhereOptions {
    pub accepted_vacancy_ids: Vec<Uuid>,
    pub accepted_mode: AcceptedMode,
}

/// Translates listing filters and the caller's identity into a [`WhereClause`].
pub fn build_where(
    filters: &VacancyFilters,
    viewer: Option<&Viewer>,
    options: &WhereOptions,
) -> WhereClause {
    let mine = filters.is_mine();
    let accepted = &options.accepted_vacancy_ids;
    let mut builder = WhereClauseBuilder::new();

    builder = match (mine, viewer, filters.recruiter_id) {
        (true, Some(viewer), _) => builder.require(Predicate::RecruiterIs(viewer.id)),
        (_, _, Some(recruiter_id)) => builder.require(Predicate::RecruiterIs(recruiter_id)),
        _ => builder,
    };

    let drafts_visible = mine && filters.wants_drafts() && viewer.is_some();
    builder = builder.require_if(!drafts_visible, || Predicate::IsDraft(false));

    builder = match filters.status {
        Some(status) => builder.require(Predicate::StatusIs(status)),
        None if mine => builder,
        None => match options.accepted_mode {
            AcceptedMode::Only => builder,
            AcceptedMode::Default if !accepted.is_empty() => builder.require(Predicate::Any(vec![
                Predicate::StatusIs(VacancyStatus::Open),
                Predicate::IdIn(accepted.clone()),
            ])),
            _ => builder.require(Predicate::StatusIs(VacancyStatus::Open)),
        },
    };

    let exact = [
        (TextField::Modality, &filters.modality),
        (TextField::Seniority, &filters.seniority),
        (TextField::ContractType, &filters.contract_type),
        (TextField::LocationState, &filters.location_state),
        (TextField::LocationCity, &filters.location_city),
    ];
    for (field, value) in exact {
        if let Some(value) = value {
            builder = builder.require(Predicate::TextEquals(field, value.clone()));
        }
    }

    // Course, salary and search alternatives share one OR group.
    if let Some(course) = &filters.course {
        builder = builder.alternatives([
            Predicate::PreferredCourse(course.clone()),
            Predicate::Keyword(course.to_lowercase()),
        ]);
    }
    if let Some(min) = filters.min_salary {
        builder = builder.alternative(Predicate::SalaryMinAtLeast(min));
    }
    if let Some(max) = filters.max_salary {
        builder = builder.alternative(Predicate::SalaryMaxAtMost(max));
    }
    if let Some(search) = &filters.search {
        builder = builder.alternatives([
            Predicate::TitleContains(search.clone()),
            Predicate::DescriptionContains(search.clone()),
            Predicate::Skill(search.clone()),
            Predicate::Keyword(search.to_lowercase()),
        ]);
    }

    builder = match options.accepted_mode {
        AcceptedMode::Only => builder.require(Predicate::IdIn(accepted.clone())),
        AcceptedMode::Exclude if !accepted.is_empty() => {
            builder.require(Predicate::IdNotIn(accepted.clone()))
        }
        _ => builder,
    };

    builder.build()
}
