use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelinePost {
    pub post_id: String,
    pub person_id: String,
    pub created_at: String,
    pub body_md: String,
    pub media_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_uid: Option<String>,
    pub post_type: String,
    pub sentiment: String,
    pub visibility: String,
    pub reactions: Vec<Value>,
    pub comments: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_data: Option<Property>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub property_uid: String,
    pub title: String,
    pub address: String,
    pub property_type: String,
    pub status: String,
    pub headline_metric: String,
    pub images: Vec<String>,
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_percentage: Option<f64>,
}

/// An entity wrapped the way the CMS nests relations: `{ id, attributes }`.
#[derive(Debug, Deserialize)]
pub struct RawEntity<T> {
    pub id: Value,
    #[serde(default = "Option::default")]
    pub attributes: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct RawRelation<T> {
    #[serde(default = "Option::default")]
    pub data: Option<RawEntity<T>>,
}

#[derive(Debug, Deserialize)]
pub struct RawRelationList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<RawEntity<T>>,
}

#[derive(Debug, Deserialize)]
pub struct RawMediaAttributes {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPropertyAttributes {
    #[serde(default)]
    pub property_uid: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub headline_metric: String,
    #[serde(default)]
    pub images: Option<RawRelationList<RawMediaAttributes>>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub deal_size: Option<f64>,
    #[serde(default)]
    pub irr: Option<f64>,
    #[serde(default)]
    pub completion_percentage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawTimelineAttributes {
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at_cms: Option<String>,
    #[serde(default)]
    pub body_md: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub media_urls: Option<Vec<String>>,
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub reactions: Option<Vec<Value>>,
    #[serde(default)]
    pub comments: Option<Vec<Value>>,
    #[serde(default)]
    pub property_uid: Option<String>,
    #[serde(default)]
    pub property: Option<RawRelation<RawPropertyAttributes>>,
    #[serde(default)]
    pub author: Option<RawRelation<Value>>,
}

pub type RawTimelineItem = RawEntity<RawTimelineAttributes>;

/// The distinct properties attached to a timeline, in first-seen order.
pub fn timeline_properties(posts: Vec<TimelinePost>) -> Vec<Property> {
    let mut properties: Vec<Property> = Vec::new();

    for property in posts.into_iter().filter_map(|post| post.property_data) {
        if !properties.iter().any(|p| p.property_uid == property.property_uid) {
            properties.push(property);
        }
    }

    properties
}

fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RawEntity<RawPropertyAttributes> {
    fn into_property(self) -> Option<Property> {
        let id = id_to_string(&self.id);
        let prop = self.attributes?;

        Some(Property {
            property_uid: non_empty(prop.property_uid).unwrap_or(id),
            title: prop.title,
            address: non_empty(prop.location).unwrap_or(prop.address),
            property_type: prop.property_type,
            status: prop.status,
            headline_metric: prop.headline_metric,
            images: prop
                .images
                .map(|list| {
                    list.data
                        .into_iter()
                        .filter_map(|img| img.attributes.map(|a| a.url))
                        .collect()
                })
                .unwrap_or_default(),
            roles: prop.roles.unwrap_or_default(),
            deal_size: prop.deal_size,
            irr: prop.irr,
            completion_percentage: prop.completion_percentage,
        })
    }
}

impl RawTimelineItem {
    pub fn into_post(self) -> TimelinePost {
        let id = id_to_string(&self.id);
        let attr = self.attributes.unwrap_or_default();

        let property_data = attr
            .property
            .and_then(|relation| relation.data)
            .and_then(RawEntity::into_property);

        let person_id = attr
            .author
            .and_then(|relation| relation.data)
            .map(|author| id_to_string(&author.id))
            .unwrap_or_default();

        let property_uid = non_empty(attr.property_uid)
            .or_else(|| property_data.as_ref().map(|p| p.property_uid.clone()));

        TimelinePost {
            post_id: non_empty(attr.post_id).unwrap_or(id),
            person_id,
            created_at: non_empty(attr.created_at)
                .or(attr.created_at_cms)
                .unwrap_or_default(),
            body_md: non_empty(attr.body_md)
                .or(attr.content)
                .unwrap_or_default(),
            media_urls: attr.media_urls.unwrap_or_default(),
            property_uid,
            post_type: non_empty(attr.post_type).or(attr.kind).unwrap_or_default(),
            sentiment: non_empty(attr.sentiment).unwrap_or_else(|| String::from("Neutral")),
            visibility: non_empty(attr.visibility).unwrap_or_else(|| String::from("Public")),
            reactions: attr.reactions.unwrap_or_default(),
            comments: attr.comments.unwrap_or_default(),
            property_data,
        }
    }
}
