use std::cmp::Reverse;

use uuid::Uuid;

use crate::models::vacancy::Vacancy;

/// Items the relevance sorter can order.
pub trait Rankable {
    fn rank_id(&self) -> Uuid;
    fn preferred_courses(&self) -> &[String];
}

impl Rankable for Vacancy {
    fn rank_id(&self) -> Uuid {
        self.id
    }

    fn preferred_courses(&self) -> &[String] {
        &self.preferred_courses
    }
}

pub fn normalize_course(course: &str) -> Option<String> {
    let course = course.trim().to_lowercase();
    (!course.is_empty()).then_some(course)
}

/// Affinity between a normalized course and a vacancy's preferred courses.
///
/// 3 for an exact match, 2 when either contains the other, 1 when a preferred
/// course starts with the course's first word, 0 otherwise.
pub fn course_score(course: &str, preferred: &[String]) -> u8 {
    let preferred: Vec<String> = preferred.iter().map(|c| c.trim().to_lowercase()).collect();

    if preferred.iter().any(|c| c == course) {
        return 3;
    }
    if preferred
        .iter()
        .any(|c| !c.is_empty() && (c.contains(course) || course.contains(c.as_str())))
    {
        return 2;
    }
    match course.split_whitespace().next() {
        Some(first) if preferred.iter().any(|c| c.starts_with(first)) => 1,
        _ => 0,
    }
}

/// Stable sort: priority ids first, then by course affinity, highest first.
/// Ties keep their incoming order.
pub fn sort_by_relevance<T: Rankable>(items: &mut [T], course: Option<&str>, priority: &[Uuid]) {
    let course = course.and_then(normalize_course);
    items.sort_by_cached_key(|item| {
        let prioritized = priority.contains(&item.rank_id());
        let score = course
            .as_deref()
            .map(|c| course_score(c, item.preferred_courses()))
            .unwrap_or(0);
        (!prioritized, Reverse(score))
    });
}
