use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::timeline::RawEntity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub author: String,
    pub published_at: String,
    pub category: String,
    pub tags: Vec<String>,
    pub view_count: u64,
    pub engagement_score: f64,
    pub read_time: u32,
    pub is_featured: bool,
    pub slug: String,
    pub like_count: u64,
}

/// The distinct categories, tags and authors across the knowledge base, sorted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFacets {
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
}

impl ArticleFacets {
    pub fn collect(articles: &[KnowledgeArticle]) -> Self {
        let mut facets = Self {
            categories: articles.iter().map(|a| a.category.clone()).collect(),
            tags: articles.iter().flat_map(|a| a.tags.iter().cloned()).collect(),
            authors: articles.iter().map(|a| a.author.clone()).collect(),
        };

        for list in [&mut facets.categories, &mut facets.tags, &mut facets.authors] {
            list.retain(|v| !v.is_empty());
            list.sort();
            list.dedup();
        }

        facets
    }
}

/// Featured, most viewed and newest articles picked out of one listing page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleHighlights {
    pub featured: Vec<KnowledgeArticle>,
    pub popular: Vec<KnowledgeArticle>,
    pub recent: Vec<KnowledgeArticle>,
}

pub const HIGHLIGHT_COUNT: usize = 3;

impl ArticleHighlights {
    pub fn pick(articles: &[KnowledgeArticle]) -> Self {
        let featured = articles.iter().filter(|a| a.is_featured).cloned().collect();

        let mut popular = articles.to_vec();
        popular.sort_by(|a, b| b.view_count.cmp(&a.view_count));
        popular.truncate(HIGHLIGHT_COUNT);

        let mut recent = articles.to_vec();
        recent.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        recent.truncate(HIGHLIGHT_COUNT);

        Self {
            featured,
            popular,
            recent,
        }
    }
}

/// Lowercases and joins whitespace runs with `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }

    slug
}

#[derive(Debug, Default, Deserialize)]
pub struct RawName {
    #[serde(default)]
    pub name: Option<String>,
}

/// A relation that may come back nested (`{ data: { attributes } }`) or flat.
#[derive(Debug, Deserialize)]
pub struct RawNested<T> {
    #[serde(default = "Option::default")]
    pub data: Option<RawEntity<T>>,
    #[serde(flatten)]
    pub inline: T,
}

impl<T> RawNested<T> {
    fn resolve(self) -> T {
        match self.data.and_then(|d| d.attributes) {
            Some(nested) => nested,
            None => self.inline,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCoverImage {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticleAttributes {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cover_image: Option<RawNested<RawCoverImage>>,
    #[serde(default)]
    pub author: Option<RawNested<RawName>>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default, rename = "published_at")]
    pub published_at_snake: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default, rename = "view_count")]
    pub view_count_snake: Option<u64>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default, rename = "engagement_score")]
    pub engagement_score_snake: Option<f64>,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default, rename = "read_time")]
    pub read_time_snake: Option<u32>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default, rename = "is_featured")]
    pub is_featured_snake: Option<bool>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub like_count: Option<u64>,
    #[serde(default, rename = "like_count")]
    pub like_count_snake: Option<u64>,
}

/// An article entry in either the nested (`attributes`) or the flat CMS shape.
#[derive(Debug, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub attributes: Option<RawArticleAttributes>,
    #[serde(flatten)]
    pub inline: RawArticleAttributes,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_zero<T: PartialEq + Default>(value: Option<T>) -> Option<T> {
    value.filter(|v| *v != T::default())
}

impl RawArticle {
    pub fn into_article(self) -> KnowledgeArticle {
        let id = match &self.id {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let attr = self.attributes.unwrap_or(self.inline);

        let title = attr.title.unwrap_or_default();
        let slug = non_empty(attr.slug).unwrap_or_else(|| slugify(&title));

        KnowledgeArticle {
            id,
            summary: non_empty(attr.summary)
                .or(attr.excerpt)
                .unwrap_or_default(),
            content: attr.content.unwrap_or_default(),
            cover_image: attr
                .cover_image
                .map(RawNested::resolve)
                .and_then(|img| non_empty(img.url)),
            author: attr
                .author
                .map(RawNested::resolve)
                .and_then(|a| non_empty(a.name))
                .unwrap_or_else(|| String::from("Unknown Author")),
            published_at: non_empty(attr.published_at)
                .or_else(|| non_empty(attr.published_at_snake))
                .or_else(|| non_empty(attr.created_at))
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            category: non_empty(attr.category).unwrap_or_else(|| String::from("General")),
            tags: attr.tags.unwrap_or_default(),
            view_count: non_zero(attr.view_count)
                .or(attr.view_count_snake)
                .unwrap_or(0),
            engagement_score: non_zero(attr.engagement_score)
                .or(attr.engagement_score_snake)
                .unwrap_or(0.0),
            read_time: non_zero(attr.read_time)
                .or_else(|| non_zero(attr.read_time_snake))
                .unwrap_or(5),
            is_featured: attr.is_featured.unwrap_or(false)
                || attr.is_featured_snake.unwrap_or(false),
            slug,
            like_count: non_zero(attr.like_count)
                .or(attr.like_count_snake)
                .unwrap_or(0),
            title,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn article(value: Value) -> KnowledgeArticle {
        serde_json::from_value::<RawArticle>(value).unwrap().into_article()
    }

    #[test]
    fn test_nested_shape() {
        let a = article(json!({
            "id": 7,
            "attributes": {
                "title": "Reading Cap Rates",
                "excerpt": "What the spread tells you.",
                "author": { "data": { "id": 2, "attributes": { "name": "Emma Johnson" } } },
                "coverImage": { "data": { "id": 1, "attributes": { "url": "/uploads/cap.jpg" } } },
                "publishedAt": "2025-02-01T08:00:00Z",
                "category": "Investment Analysis",
                "tags": ["Cap Rates"],
                "viewCount": 310,
                "isFeatured": true
            }
        }));

        assert_eq!(a.id, "7");
        assert_eq!(a.summary, "What the spread tells you.");
        assert_eq!(a.author, "Emma Johnson");
        assert_eq!(a.cover_image.as_deref(), Some("/uploads/cap.jpg"));
        assert_eq!(a.view_count, 310);
        assert!(a.is_featured);
        assert_eq!(a.slug, "reading-cap-rates");
        assert_eq!(a.read_time, 5);
    }

    #[test]
    fn test_flat_shape_and_defaults() {
        let a = article(json!({
            "id": "12",
            "title": "  Zoning   Basics",
            "author": { "name": "" },
            "coverImage": { "url": "/uploads/zoning.png" },
            "published_at": "2024-11-03T10:00:00Z",
            "view_count": 44,
            "read_time": 3,
            "is_featured": true,
            "like_count": 6
        }));

        assert_eq!(a.id, "12");
        assert_eq!(a.author, "Unknown Author");
        assert_eq!(a.cover_image.as_deref(), Some("/uploads/zoning.png"));
        assert_eq!(a.published_at, "2024-11-03T10:00:00Z");
        assert_eq!(a.category, "General");
        assert_eq!(a.view_count, 44);
        assert_eq!(a.read_time, 3);
        assert!(a.is_featured);
        assert_eq!(a.like_count, 6);
        assert_eq!(a.slug, "-zoning-basics");
        assert!(a.tags.is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("The Future of Urban Living"), "the-future-of-urban-living");
        assert_eq!(slugify("a\t\nb"), "a-b");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_facets_and_highlights() {
        let a = article(json!({
            "id": 1,
            "title": "A",
            "author": { "name": "Sarah Chen" },
            "category": "Tech",
            "tags": ["AI", "PropTech"],
            "viewCount": 10,
            "publishedAt": "2025-01-01"
        }));
        let b = article(json!({
            "id": 2,
            "title": "B",
            "category": "Legal",
            "tags": ["AI"],
            "viewCount": 50,
            "isFeatured": true,
            "publishedAt": "2024-01-01"
        }));

        let facets = ArticleFacets::collect(&[a.clone(), b.clone()]);
        assert_eq!(facets.categories, vec!["Legal", "Tech"]);
        assert_eq!(facets.tags, vec!["AI", "PropTech"]);
        assert_eq!(facets.authors, vec!["Sarah Chen", "Unknown Author"]);

        let highlights = ArticleHighlights::pick(&[a, b]);
        assert_eq!(highlights.featured.len(), 1);
        assert_eq!(highlights.popular[0].id, "2");
        assert_eq!(highlights.recent[0].id, "1");
    }
}
