use serde::{Deserialize, Serialize};

use crate::models::consultant::Consultant;

/// Filters from the expert search form. Empty values match everything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

fn chosen(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        chosen(&self.region).is_none()
            && chosen(&self.keyword).is_none()
            && self.specialties.is_empty()
    }

    pub fn matches(&self, consultant: &Consultant) -> bool {
        if let Some(region) = chosen(&self.region) {
            if consultant.geographical_expertise != region {
                return false;
            }

            // The country picker is only shown once a region is picked
            if let Some(country) = chosen(&self.country) {
                if consultant.country_expertise != country {
                    return false;
                }
            }
        }

        if !self.specialties.is_empty()
            && !self
                .specialties
                .iter()
                .any(|s| consultant.functional_expertise.contains(s))
        {
            return false;
        }

        if let Some(keyword) = chosen(&self.keyword) {
            let keyword = keyword.to_lowercase();
            let haystacks = [
                consultant.full_name(),
                consultant.company.clone(),
                consultant.current_role.clone(),
            ];

            if !haystacks
                .iter()
                .any(|h| h.to_lowercase().contains(&keyword))
            {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, consultants: Vec<Consultant>) -> Vec<Consultant> {
        if self.is_empty() {
            return consultants;
        }

        consultants.into_iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::mock_data::mock_consultants;

    fn names(consultants: &[Consultant]) -> Vec<String> {
        consultants.iter().map(Consultant::full_name).collect()
    }

    #[test]
    fn test_empty_filters_match_all() {
        let filters = SearchFilters::default();
        assert!(filters.is_empty());
        assert_eq!(filters.apply(mock_consultants()).len(), 5);
    }

    #[test]
    fn test_region_and_country() {
        let filters = SearchFilters {
            region: Some(String::from("Europe")),
            ..Default::default()
        };
        assert_eq!(
            names(&filters.apply(mock_consultants())),
            vec!["Emma Johnson", "Carlos Rodriguez"]
        );

        let filters = SearchFilters {
            region: Some(String::from("Europe")),
            country: Some(String::from("Spain")),
            ..Default::default()
        };
        assert_eq!(names(&filters.apply(mock_consultants())), vec!["Carlos Rodriguez"]);

        // Country alone is ignored
        let filters = SearchFilters {
            country: Some(String::from("Spain")),
            ..Default::default()
        };
        assert_eq!(filters.apply(mock_consultants()).len(), 5);
    }

    #[test]
    fn test_specialties_any_of() {
        let filters = SearchFilters {
            specialties: vec![
                String::from("Urban Planning"),
                String::from("Investment Analysis"),
            ],
            ..Default::default()
        };

        assert_eq!(
            names(&filters.apply(mock_consultants())),
            vec!["John Smith", "Emma Johnson", "Liam Walsh"]
        );
    }

    #[test]
    fn test_keyword() {
        let filters = SearchFilters {
            keyword: Some(String::from("hospitality")),
            ..Default::default()
        };
        assert_eq!(names(&filters.apply(mock_consultants())), vec!["Carlos Rodriguez"]);

        let filters = SearchFilters {
            keyword: Some(String::from("TANAKA")),
            ..Default::default()
        };
        assert_eq!(names(&filters.apply(mock_consultants())), vec!["Aiko Tanaka"]);

        let filters = SearchFilters {
            keyword: Some(String::from("  ")),
            ..Default::default()
        };
        assert!(filters.is_empty());
    }

    #[test]
    fn test_combined() {
        let filters = SearchFilters {
            region: Some(String::from("Europe")),
            specialties: vec![String::from("Sustainability")],
            keyword: Some(String::from("carlos")),
            ..Default::default()
        };

        assert!(filters.apply(mock_consultants()).is_empty());
    }
}
