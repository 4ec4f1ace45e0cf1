use std::collections::BTreeSet;

use crate::models::vacancy::Vacancy;

const MIN_TOKEN_CHARS: usize = 3;

/// Vacancy fields the keyword set is derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSource<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub modality: Option<&'a str>,
    pub seniority: Option<&'a str>,
    pub contract_type: Option<&'a str>,
    pub location_city: Option<&'a str>,
    pub location_state: Option<&'a str>,
    pub location_country: Option<&'a str>,
    pub company_name: Option<&'a str>,
    pub skills: &'a [String],
    pub preferred_courses: &'a [String],
    pub benefits: &'a [String],
}

impl<'a> From<&'a Vacancy> for KeywordSource<'a> {
    fn from(vacancy: &'a Vacancy) -> Self {
        Self {
            title: &vacancy.title,
            description: &vacancy.description,
            modality: vacancy.modality.as_deref(),
            seniority: vacancy.seniority.as_deref(),
            contract_type: vacancy.contract_type.as_deref(),
            location_city: vacancy.location_city.as_deref(),
            location_state: vacancy.location_state.as_deref(),
            location_country: vacancy.location_country.as_deref(),
            company_name: vacancy.company_name.as_deref(),
            skills: &vacancy.skills,
            preferred_courses: &vacancy.preferred_courses,
            benefits: &vacancy.benefits,
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '|' | '/' | '\\' | '-')
}

fn whole(set: &mut BTreeSet<String>, value: &str) {
    let value = value.trim().to_lowercase();
    if !value.is_empty() {
        set.insert(value);
    }
}

fn split(set: &mut BTreeSet<String>, value: &str) {
    for token in value.split(is_separator) {
        if token.chars().count() >= MIN_TOKEN_CHARS {
            set.insert(token.to_lowercase());
        }
    }
}

/// Derives the lowercase, deduplicated keyword set for a vacancy.
///
/// Title and company name are kept whole. Other free text is tokenized and
/// short tokens are dropped. Skills, courses and benefits are kept whole.
pub fn extract_keywords(source: &KeywordSource<'_>) -> Vec<String> {
    let mut set = BTreeSet::new();

    whole(&mut set, source.title);
    if let Some(company) = source.company_name {
        whole(&mut set, company);
    }

    split(&mut set, source.description);
    let free_text = [
        source.modality,
        source.seniority,
        source.contract_type,
        source.location_city,
        source.location_state,
        source.location_country,
    ];
    for value in free_text.into_iter().flatten() {
        split(&mut set, value);
    }

    for value in source
        .skills
        .iter()
        .chain(source.preferred_courses)
        .chain(source.benefits)
    {
        whole(&mut set, value);
    }

    set.into_iter().collect()
}

/// Caller-supplied keywords win over derived ones; they are only lowercased.
pub fn resolve_keywords(explicit: Option<&[String]>, source: &KeywordSource<'_>) -> Vec<String> {
    match explicit {
        Some(keywords) if !keywords.is_empty() => {
            let mut seen = BTreeSet::new();
            keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty() && seen.insert(k.clone()))
                .collect()
        }
        _ => extract_keywords(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn keeps_title_and_company_whole_and_splits_free_text() {
        let skills = strings(&["Rust", "PostgreSQL"]);
        let courses = strings(&["Ciência da Computação"]);
        let benefits = strings(&["Vale Refeição"]);
        let source = KeywordSource {
            title: "Desenvolvedor Backend Jr",
            description: "APIs em Rust; deploy/CI - sem on-call",
            modality: Some("Híbrido"),
            location_city: Some("São Paulo"),
            company_name: Some("Acme Ltda"),
            skills: &skills,
            preferred_courses: &courses,
            benefits: &benefits,
            ..KeywordSource::default()
        };

        let keywords = extract_keywords(&source);

        for expected in [
            "desenvolvedor backend jr",
            "acme ltda",
            "apis",
            "rust",
            "deploy",
            "sem",
            "híbrido",
            "são",
            "paulo",
            "postgresql",
            "ciência da computação",
            "vale refeição",
        ] {
            assert!(keywords.contains(&expected.to_string()), "missing {expected}");
        }
        // Short tokens from split fields are discarded.
        for dropped in ["em", "ci", "on"] {
            assert!(!keywords.contains(&dropped.to_string()), "kept {dropped}");
        }
        assert!(keywords.contains(&"call".to_string()));
    }

    #[test]
    fn output_is_deduplicated() {
        let skills = strings(&["Rust", "rust"]);
        let source = KeywordSource {
            title: "Rust",
            description: "rust RUST",
            skills: &skills,
            ..KeywordSource::default()
        };
        assert_eq!(extract_keywords(&source), vec!["rust".to_string()]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let skills = strings(&["Go", "Kubernetes"]);
        let source = KeywordSource {
            title: "SRE",
            description: "Observabilidade, SLOs | incidentes",
            seniority: Some("Pleno"),
            skills: &skills,
            ..KeywordSource::default()
        };
        let first: BTreeSet<_> = extract_keywords(&source).into_iter().collect();
        let second: BTreeSet<_> = extract_keywords(&source).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn explicit_keywords_take_precedence() {
        let explicit = strings(&["Rust", " Tokio ", "rust", ""]);
        let source = KeywordSource {
            title: "Ignored title",
            ..KeywordSource::default()
        };
        assert_eq!(
            resolve_keywords(Some(explicit.as_slice()), &source),
            strings(&["rust", "tokio"])
        );
        assert_eq!(
            resolve_keywords(Some(&[][..]), &source),
            strings(&["ignored title"])
        );
        assert_eq!(resolve_keywords(None, &source), strings(&["ignored title"]));
    }
}
