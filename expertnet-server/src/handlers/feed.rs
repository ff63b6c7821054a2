use expertnet_common::directory::feed::{
    DateRange, FeedCategory, FeedSort, DEFAULT_FEED_PAGE_SIZE,
};
use expertnet_common::directory::{Directory, FeedQuery};

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::handlers::comma_list;
use crate::handlers::error::HttpErrorResponse;

pub const MAX_FEED_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    // Comma separated
    pub post_types: Option<String>,
    pub sentiments: Option<String>,
    pub property_type: Option<String>,
    pub date_range: Option<String>,
    pub deal_size: Option<String>,
    pub location: Option<String>,
    pub has_media: Option<String>,
    pub has_comments: Option<String>,
}

fn is_true(value: &Option<String>) -> bool {
    value.as_deref() == Some("true")
}

impl FeedParams {
    pub fn query(&self) -> FeedQuery {
        FeedQuery {
            page: self.page.unwrap_or(1).max(1),
            page_size: self
                .limit
                .unwrap_or(DEFAULT_FEED_PAGE_SIZE)
                .clamp(1, MAX_FEED_PAGE_SIZE),
            category: FeedCategory::from_param(self.category.as_deref().unwrap_or_default()),
            search: self.search.clone(),
            sort: FeedSort::from_param(self.sort_by.as_deref().unwrap_or_default()),
            post_types: comma_list(self.post_types.as_deref()),
            sentiments: comma_list(self.sentiments.as_deref()),
            date_range: DateRange::from_param(self.date_range.as_deref().unwrap_or_default()),
            deal_size: self.deal_size.clone().filter(|d| d != "all"),
            location: self.location.clone(),
            property_types: comma_list(self.property_type.as_deref()),
            has_media: is_true(&self.has_media),
            has_comments: is_true(&self.has_comments),
        }
    }
}

pub async fn list_posts(
    directory: web::Data<dyn Directory>,
    params: web::Query<FeedParams>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let page = directory.posts(&params.query()).await?;
    Ok(HttpResponse::Ok().json(page))
}
