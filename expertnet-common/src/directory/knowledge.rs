use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::article::KnowledgeArticle;

pub const DEFAULT_ARTICLE_PAGE_SIZE: u32 = 12;
pub const RELATED_ARTICLE_COUNT: usize = 3;

/// Page size used when listing the whole knowledge base for facets.
pub const FACET_SCAN_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSort {
    #[default]
    Recent,
    Popular,
    Trending,
    Title,
}

impl ArticleSort {
    /// Unknown names fall back to `Recent`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "popular" => Self::Popular,
            "trending" => Self::Trending,
            "title" => Self::Title,
            _ => Self::Recent,
        }
    }

    fn cms_sort(self) -> &'static str {
        match self {
            Self::Recent => "publishedAt:desc",
            Self::Popular => "viewCount:desc",
            Self::Trending => "engagementScore:desc",
            Self::Title => "title:asc",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArticleQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort: ArticleSort,
    /// `None` and `"all"` both mean every category.
    pub category: Option<String>,
    pub search: Option<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_ARTICLE_PAGE_SIZE,
            sort: ArticleSort::default(),
            category: None,
            search: None,
            tags: Vec::new(),
            authors: Vec::new(),
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl ArticleQuery {
    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "all")
    }

    fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Query parameters for the CMS `/api/knowledge-articles` listing.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            (String::from("pagination[page]"), self.page.to_string()),
            (String::from("pagination[pageSize]"), self.page_size.to_string()),
            (String::from("sort"), String::from(self.sort.cms_sort())),
        ];

        if let Some(category) = self.category() {
            params.push((String::from("filters[category][$eq]"), String::from(category)));
        }

        if let Some(search) = self.search() {
            for (i, field) in ["title", "summary", "content"].iter().enumerate() {
                params.push((
                    format!("filters[$or][{i}][{field}][$containsi]"),
                    String::from(search),
                ));
            }
        }

        for (i, tag) in self.tags.iter().enumerate() {
            params.push((format!("filters[tags][$contains][{i}]"), tag.clone()));
        }

        for (i, author) in self.authors.iter().enumerate() {
            params.push((format!("filters[author][name][$in][{i}]"), author.clone()));
        }

        params.push((String::from("populate"), String::from("*")));

        params
    }

    /// A tag filter matches articles carrying any of the chosen tags.
    pub fn matches(&self, article: &KnowledgeArticle) -> bool {
        if self.category().is_some_and(|c| article.category != c) {
            return false;
        }

        if let Some(search) = self.search() {
            if ![&article.title, &article.summary, &article.content]
                .iter()
                .any(|field| contains_ci(field, search))
            {
                return false;
            }
        }

        if !self.tags.is_empty() && !self.tags.iter().any(|t| article.tags.contains(t)) {
            return false;
        }

        self.authors.is_empty() || self.authors.contains(&article.author)
    }

    pub fn sort(&self, articles: &mut [KnowledgeArticle]) {
        match self.sort {
            ArticleSort::Recent => articles.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
            ArticleSort::Popular => articles.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
            ArticleSort::Trending => articles.sort_by(|a, b| {
                b.engagement_score
                    .partial_cmp(&a.engagement_score)
                    .unwrap_or(Ordering::Equal)
            }),
            ArticleSort::Title => articles.sort_by(|a, b| a.title.cmp(&b.title)),
        }
    }
}

/// Parameters for the CMS query that finds articles related to `article`: same
/// category, or failing that a shared tag among its first two.
pub fn related_params(article: &KnowledgeArticle) -> Vec<(String, String)> {
    let mut params = vec![
        (String::from("populate"), String::from("*")),
        (
            String::from("pagination[pageSize]"),
            RELATED_ARTICLE_COUNT.to_string(),
        ),
        (String::from("filters[id][$ne]"), article.id.clone()),
    ];

    if !article.category.is_empty() && article.category != "General" {
        params.push((String::from("filters[category][$eq]"), article.category.clone()));
    } else {
        for (i, tag) in article.tags.iter().take(2).enumerate() {
            params.push((format!("filters[tags][$contains][{i}]"), tag.clone()));
        }
    }

    params
}

/// Whether `other` belongs beside `article`: a shared category or tag.
pub fn is_related(article: &KnowledgeArticle, other: &KnowledgeArticle) -> bool {
    other.id != article.id
        && (other.category == article.category
            || other.tags.iter().any(|t| article.tags.contains(t)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::mock_data;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn ids(query: &ArticleQuery) -> Vec<String> {
        let mut articles: Vec<_> = mock_data::mock_articles()
            .into_iter()
            .filter(|a| query.matches(a))
            .collect();
        query.sort(&mut articles);
        articles.into_iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_params() {
        let params = ArticleQuery::default().to_params();
        assert_eq!(param(&params, "pagination[pageSize]"), Some("12"));
        assert_eq!(param(&params, "sort"), Some("publishedAt:desc"));
        assert_eq!(param(&params, "populate"), Some("*"));

        let query = ArticleQuery {
            category: Some(String::from("Technology")),
            search: Some(String::from("blockchain")),
            sort: ArticleSort::Popular,
            tags: vec![String::from("AI"), String::from("PropTech")],
            authors: vec![String::from("Sarah Chen")],
            ..Default::default()
        };
        let params = query.to_params();

        assert_eq!(param(&params, "sort"), Some("viewCount:desc"));
        assert_eq!(param(&params, "filters[category][$eq]"), Some("Technology"));
        assert_eq!(
            param(&params, "filters[$or][2][content][$containsi]"),
            Some("blockchain")
        );
        assert_eq!(param(&params, "filters[tags][$contains][1]"), Some("PropTech"));
        assert_eq!(param(&params, "filters[author][name][$in][0]"), Some("Sarah Chen"));

        let all = ArticleQuery {
            category: Some(String::from("all")),
            ..Default::default()
        };
        assert!(param(&all.to_params(), "filters[category][$eq]").is_none());
    }

    #[test]
    fn test_filter_and_sort() {
        assert_eq!(ids(&ArticleQuery::default()), vec!["1", "2", "3", "4", "5", "6"]);

        let by_title = ArticleQuery {
            sort: ArticleSort::Title,
            ..Default::default()
        };
        assert_eq!(ids(&by_title)[0], "2");

        let popular = ArticleQuery {
            sort: ArticleSort::Popular,
            ..Default::default()
        };
        assert_eq!(ids(&popular)[..2], ["1", "4"]);

        let tech = ArticleQuery {
            category: Some(String::from("Technology")),
            ..Default::default()
        };
        assert_eq!(ids(&tech), vec!["5"]);

        let search = ArticleQuery {
            search: Some(String::from("GREEN BUILDING")),
            ..Default::default()
        };
        assert_eq!(ids(&search), vec!["3"]);

        let tagged = ArticleQuery {
            tags: vec![String::from("Market Analysis")],
            ..Default::default()
        };
        assert_eq!(ids(&tagged), vec!["2", "4"]);

        let authors = ArticleQuery {
            authors: vec![String::from("Emma Johnson"), String::from("Michael Brown")],
            ..Default::default()
        };
        assert_eq!(ids(&authors), vec!["1", "6"]);
    }

    #[test]
    fn test_related() {
        let articles = mock_data::mock_articles();
        let urban = &articles[0];

        let related: Vec<_> = articles
            .iter()
            .filter(|a| is_related(urban, a))
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(related, vec!["3", "5"]);

        let params = related_params(urban);
        assert_eq!(param(&params, "filters[id][$ne]"), Some("1"));
        assert_eq!(param(&params, "filters[category][$eq]"), Some("Urban Planning"));

        let mut general = urban.clone();
        general.category = String::from("General");
        let params = related_params(&general);
        assert!(param(&params, "filters[category][$eq]").is_none());
        assert_eq!(param(&params, "filters[tags][$contains][1]"), Some("Technology"));
        assert!(param(&params, "filters[tags][$contains][2]").is_none());
    }
}
