//! Vacancy listing and visibility rules with no I/O.

pub mod filters;
pub mod keywords;
pub mod predicate;
pub mod projection;
pub mod ranking;

pub use filters::{normalize_filters, AcceptedMode, VacancyFilters};
pub use keywords::{extract_keywords, resolve_keywords, KeywordSource};
pub use predicate::{build_where, Predicate, WhereClause, WhereClauseBuilder, WhereOptions};
pub use projection::{can_user_apply, project_for_viewer, Permissions, VacancyProjection};
pub use ranking::sort_by_relevance;
