use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::timeline::Property;

/// A post in the global deal feed. Carries the author inline, unlike a
/// consultant's own timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedPost {
    pub post_id: String,
    pub person_id: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub author_company: String,
    pub author_role: String,
    pub post_type: String,
    pub body_md: String,
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_data: Option<Property>,
    pub sentiment: String,
    pub visibility: String,
    pub reactions: Vec<Value>,
    pub comments: Vec<Value>,
    pub created_at: String,
    pub updated_at: String,
    pub engagement_score: f64,
    pub deal_size: String,
    pub location: String,
    pub property_type: String,
    pub is_trending: bool,
    pub is_featured: bool,
    pub read_time: u32,
    pub tags: Vec<String>,
    pub view_count: u64,
    pub share_count: u64,
    pub save_count: u64,
    pub deal_stage: String,
    pub roi_estimate: String,
    pub market_trend: String,
}

impl FeedPost {
    pub fn is_active_deal(&self) -> bool {
        self.post_type == "NewListing" || self.post_type == "ProgressUpdate"
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawConsultantLink {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPostAuthor {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub consultant: Option<RawConsultantLink>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPostProperty {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default, rename = "headline_metric")]
    pub headline_metric: Option<String>,
    #[serde(default, rename = "deal_size")]
    pub deal_size: Option<f64>,
    #[serde(default, rename = "property_type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub irr: Option<f64>,
    #[serde(default, rename = "completion_percentage")]
    pub completion_percentage: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawTag {
    #[serde(default)]
    pub name: String,
}

/// A post as the CMS returns it from `/api/posts`, with relations populated inline.
#[derive(Debug, Default, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default, rename = "documentId")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub body_md: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub deal_size: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub is_trending: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub tags: Option<Vec<RawTag>>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub share_count: Option<u64>,
    #[serde(default)]
    pub save_count: Option<u64>,
    #[serde(default)]
    pub deal_stage: Option<String>,
    #[serde(default)]
    pub roi_estimate: Option<String>,
    #[serde(default)]
    pub market_trend: Option<String>,
    #[serde(default)]
    pub media_urls: Option<Vec<String>>,
    #[serde(default)]
    pub reactions: Option<Vec<Value>>,
    #[serde(default)]
    pub comments: Option<Vec<Value>>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub author: Option<RawPostAuthor>,
    #[serde(default)]
    pub property: Option<RawPostProperty>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    non_empty(value).unwrap_or_else(|| String::from(default))
}

impl RawPostProperty {
    fn uid(&self) -> Option<String> {
        non_empty(self.document_id.clone()).or_else(|| self.id.map(|id| id.to_string()))
    }

    fn into_property(self) -> Property {
        let property_uid = self.uid().unwrap_or_default();

        Property {
            property_uid,
            title: or_default(self.title, "Property"),
            address: self.address.unwrap_or_default(),
            property_type: or_default(self.property_type, "Unknown"),
            // The feed does not carry a lifecycle status for properties
            status: String::from("Stabilised"),
            headline_metric: self.headline_metric.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            roles: self.roles.unwrap_or_default(),
            deal_size: Some(self.deal_size.unwrap_or(0.0)),
            irr: Some(self.irr.unwrap_or(0.0)),
            completion_percentage: Some(self.completion_percentage.unwrap_or(0.0)),
        }
    }
}

impl RawPost {
    pub fn into_post(self) -> FeedPost {
        let author = self.author.unwrap_or_default();
        let consultant = author.consultant.unwrap_or_default();
        let author_id = author
            .id
            .map_or_else(|| String::from("unknown"), |id| id.to_string());

        let property_uid = self.property.as_ref().and_then(RawPostProperty::uid);
        let property_data = self.property.map(RawPostProperty::into_property);

        let now = Utc::now().to_rfc3339();

        FeedPost {
            post_id: non_empty(self.document_id)
                .or_else(|| self.id.map(|id| id.to_string()))
                .unwrap_or_default(),
            person_id: author_id,
            author_name: or_default(author.username, "Unknown User"),
            author_avatar: non_empty(author.avatar),
            author_company: non_empty(author.company)
                .or_else(|| non_empty(consultant.company))
                .unwrap_or_else(|| String::from("Unknown Company")),
            author_role: non_empty(author.title)
                .or_else(|| non_empty(consultant.title))
                .unwrap_or_else(|| String::from("Real Estate Professional")),
            post_type: or_default(self.post_type, "Insight"),
            body_md: self.body_md.unwrap_or_default(),
            media_urls: self.media_urls.unwrap_or_default(),
            property_uid,
            property_data,
            sentiment: or_default(self.sentiment, "Neutral"),
            visibility: String::from("Public"),
            reactions: self.reactions.unwrap_or_default(),
            comments: self.comments.unwrap_or_default(),
            created_at: non_empty(self.created_at).unwrap_or_else(|| now.clone()),
            updated_at: non_empty(self.updated_at).unwrap_or(now),
            engagement_score: self.engagement_score.unwrap_or(0.0),
            deal_size: or_default(self.deal_size, "Unknown"),
            location: or_default(self.location, "Unknown"),
            property_type: or_default(self.property_type, "Unknown"),
            is_trending: self.is_trending.unwrap_or(false),
            is_featured: self.is_featured.unwrap_or(false),
            read_time: self.read_time.filter(|t| *t > 0).unwrap_or(1),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|t| t.name)
                .collect(),
            view_count: self.view_count.unwrap_or(0),
            share_count: self.share_count.unwrap_or(0),
            save_count: self.save_count.unwrap_or(0),
            deal_stage: or_default(self.deal_stage, "Active"),
            roi_estimate: or_default(self.roi_estimate, "Unknown"),
            market_trend: or_default(self.market_trend, "Stable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_into_post() {
        let raw: RawPost = serde_json::from_value(json!({
            "id": 31,
            "documentId": "post-abc",
            "post_type": "NewListing",
            "body_md": "Grade A logistics shed, **fully let**.",
            "sentiment": "Bull",
            "deal_size": "$25M",
            "location": "Rotterdam",
            "engagement_score": 72.5,
            "is_trending": true,
            "tags": [{ "name": "Logistics" }, { "name": "Netherlands" }],
            "createdAt": "2025-06-01T09:00:00Z",
            "updatedAt": "2025-06-02T09:00:00Z",
            "author": {
                "id": 4,
                "username": "aiko.tanaka",
                "consultant": { "company": "Tanaka Advisory", "title": "Principal" }
            },
            "property": { "id": 9, "title": "Maasvlakte DC", "irr": 9.1 }
        }))
        .unwrap();

        let post = raw.into_post();

        assert_eq!(post.post_id, "post-abc");
        assert_eq!(post.person_id, "4");
        assert_eq!(post.author_company, "Tanaka Advisory");
        assert_eq!(post.author_role, "Principal");
        assert_eq!(post.tags, vec!["Logistics", "Netherlands"]);
        assert!(post.is_trending);
        assert!(post.is_active_deal());
        assert_eq!(post.property_uid.as_deref(), Some("9"));

        let property = post.property_data.unwrap();
        assert_eq!(property.title, "Maasvlakte DC");
        assert_eq!(property.status, "Stabilised");
        assert_eq!(property.property_type, "Unknown");
        assert_eq!(property.deal_size, Some(0.0));
    }

    #[test]
    fn test_into_post_defaults() {
        let raw: RawPost = serde_json::from_value(json!({ "id": 5 })).unwrap();
        let post = raw.into_post();

        assert_eq!(post.post_id, "5");
        assert_eq!(post.person_id, "unknown");
        assert_eq!(post.author_name, "Unknown User");
        assert_eq!(post.author_company, "Unknown Company");
        assert_eq!(post.author_role, "Real Estate Professional");
        assert_eq!(post.post_type, "Insight");
        assert_eq!(post.sentiment, "Neutral");
        assert_eq!(post.deal_size, "Unknown");
        assert_eq!(post.deal_stage, "Active");
        assert_eq!(post.market_trend, "Stable");
        assert_eq!(post.read_time, 1);
        assert!(!post.created_at.is_empty());
        assert!(post.property_data.is_none());
        assert!(post.author_avatar.is_none());
    }
}
