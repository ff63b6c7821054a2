use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::post::FeedPost;

pub const DEFAULT_FEED_PAGE_SIZE: u32 = 10;

/// Posts scoring at least this much count as trending.
pub const TRENDING_SCORE: f64 = 50.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedCategory {
    #[default]
    All,
    Trending,
    Featured,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    #[default]
    Recent,
    Popular,
    Trending,
    Engagement,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
}

impl FeedCategory {
    /// Unknown names fall back to `All`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "trending" => Self::Trending,
            "featured" => Self::Featured,
            _ => Self::All,
        }
    }
}

impl FeedSort {
    /// Unknown names fall back to `Recent`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "popular" => Self::Popular,
            "trending" => Self::Trending,
            "engagement" => Self::Engagement,
            _ => Self::Recent,
        }
    }
}

impl DateRange {
    pub fn from_param(value: &str) -> Self {
        match value {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            _ => Self::All,
        }
    }

    pub fn since(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::Today => Some(now - Duration::days(1)),
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(now - Duration::days(30)),
        }
    }
}

/// Filters, ordering and paging for the global deal feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedQuery {
    pub page: u32,
    pub page_size: u32,
    pub category: FeedCategory,
    pub search: Option<String>,
    pub sort: FeedSort,
    pub post_types: Vec<String>,
    pub sentiments: Vec<String>,
    pub date_range: DateRange,
    pub deal_size: Option<String>,
    pub location: Option<String>,
    pub property_types: Vec<String>,
    pub has_media: bool,
    pub has_comments: bool,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_FEED_PAGE_SIZE,
            category: FeedCategory::default(),
            search: None,
            sort: FeedSort::default(),
            post_types: Vec::new(),
            sentiments: Vec::new(),
            date_range: DateRange::default(),
            deal_size: None,
            location: None,
            property_types: Vec::new(),
            has_media: false,
            has_comments: false,
        }
    }
}

fn chosen(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn push_in(params: &mut Vec<(String, String)>, field: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        params.push((format!("filters[{field}][$in][{i}]"), value.clone()));
    }
}

impl FeedQuery {
    /// Query parameters for the CMS `/api/posts` listing.
    pub fn to_params(&self, now: DateTime<Utc>) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            (String::from("pagination[page]"), self.page.to_string()),
            (String::from("pagination[pageSize]"), self.page_size.to_string()),
        ];

        for relation in ["author", "property", "reactions", "comments", "tags"] {
            params.push((format!("populate[{relation}]"), String::from("true")));
        }

        match self.category {
            FeedCategory::All => {}
            FeedCategory::Trending => params.push((
                String::from("filters[engagement_score][$gte]"),
                TRENDING_SCORE.to_string(),
            )),
            FeedCategory::Featured => {
                params.push((String::from("filters[is_featured]"), String::from("true")))
            }
        }

        if let Some(search) = chosen(&self.search) {
            for (i, field) in ["body_md", "location", "deal_size"].iter().enumerate() {
                params.push((format!("filters[$or][{i}][{field}][$containsi]"), String::from(search)));
            }
        }

        push_in(&mut params, "post_type", &self.post_types);
        push_in(&mut params, "sentiment", &self.sentiments);
        push_in(&mut params, "property_type", &self.property_types);

        if self.has_media {
            params.push((String::from("filters[media_urls][$notNull]"), String::from("true")));
        }

        if self.has_comments {
            params.push((String::from("filters[comments][$notNull]"), String::from("true")));
        }

        if let Some(deal_size) = chosen(&self.deal_size) {
            params.push((String::from("filters[deal_size]"), String::from(deal_size)));
        }

        if let Some(location) = chosen(&self.location) {
            params.push((String::from("filters[location][$containsi]"), String::from(location)));
        }

        if let Some(since) = self.date_range.since(now) {
            params.push((String::from("filters[createdAt][$gte]"), since.to_rfc3339()));
        }

        let sort = match self.sort {
            FeedSort::Recent => "createdAt:desc",
            FeedSort::Popular | FeedSort::Engagement => "engagement_score:desc",
            FeedSort::Trending => {
                params.push((String::from("filters[is_trending]"), String::from("true")));
                "engagement_score:desc"
            }
        };
        params.push((String::from("sort[0]"), String::from(sort)));

        params
    }

    pub fn matches(&self, post: &FeedPost, now: DateTime<Utc>) -> bool {
        let category_ok = match self.category {
            FeedCategory::All => true,
            FeedCategory::Trending => post.engagement_score >= TRENDING_SCORE,
            FeedCategory::Featured => post.is_featured,
        };

        if !category_ok || (self.sort == FeedSort::Trending && !post.is_trending) {
            return false;
        }

        if let Some(search) = chosen(&self.search) {
            if ![&post.body_md, &post.location, &post.deal_size]
                .iter()
                .any(|field| contains_ci(field, search))
            {
                return false;
            }
        }

        let listed = |values: &[String], value: &str| {
            values.is_empty() || values.iter().any(|v| v == value)
        };

        if !listed(&self.post_types, &post.post_type)
            || !listed(&self.sentiments, &post.sentiment)
            || !listed(&self.property_types, &post.property_type)
        {
            return false;
        }

        if (self.has_media && post.media_urls.is_empty())
            || (self.has_comments && post.comments.is_empty())
        {
            return false;
        }

        if chosen(&self.deal_size).is_some_and(|size| post.deal_size != size) {
            return false;
        }

        if chosen(&self.location).is_some_and(|loc| !contains_ci(&post.location, loc)) {
            return false;
        }

        if let Some(since) = self.date_range.since(now) {
            match DateTime::parse_from_rfc3339(&post.created_at) {
                Ok(created) if created >= since => {}
                _ => return false,
            }
        }

        true
    }

    /// Orders posts the way the backend would for this query's sort.
    pub fn sort(&self, posts: &mut [FeedPost]) {
        match self.sort {
            FeedSort::Recent => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            FeedSort::Popular | FeedSort::Trending | FeedSort::Engagement => {
                posts.sort_by(|a, b| {
                    b.engagement_score
                        .partial_cmp(&a.engagement_score)
                        .unwrap_or(Ordering::Equal)
                })
            }
        }
    }
}
