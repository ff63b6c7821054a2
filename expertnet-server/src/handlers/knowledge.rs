use expertnet_common::directory::knowledge::{ArticleSort, DEFAULT_ARTICLE_PAGE_SIZE};
use expertnet_common::directory::{ArticleQuery, Directory};
use expertnet_common::models::article::{ArticleHighlights, KnowledgeArticle};
use expertnet_common::models::page::PageInfo;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::handlers::error::HttpErrorResponse;
use crate::handlers::{comma_list, DataResponse};

pub const MAX_ARTICLE_PAGE_SIZE: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    // Comma separated
    pub tags: Option<String>,
    pub authors: Option<String>,
}

impl ArticleParams {
    pub fn query(&self) -> ArticleQuery {
        ArticleQuery {
            page: self.page.unwrap_or(1).max(1),
            page_size: self
                .page_size
                .unwrap_or(DEFAULT_ARTICLE_PAGE_SIZE)
                .clamp(1, MAX_ARTICLE_PAGE_SIZE),
            sort: ArticleSort::from_param(self.sort_by.as_deref().unwrap_or_default()),
            category: self.category.clone(),
            search: self.search.clone(),
            tags: comma_list(self.tags.as_deref()),
            authors: comma_list(self.authors.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleListing {
    pub data: Vec<KnowledgeArticle>,
    pub pagination: PageInfo,
    pub highlights: ArticleHighlights,
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub data: KnowledgeArticle,
    pub related: Vec<KnowledgeArticle>,
}

pub async fn list_articles(
    directory: web::Data<dyn Directory>,
    params: web::Query<ArticleParams>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let page = directory.articles(&params.query()).await?;

    Ok(HttpResponse::Ok().json(ArticleListing {
        highlights: ArticleHighlights::pick(&page.data),
        data: page.data,
        pagination: page.pagination,
    }))
}

pub async fn get_article(
    directory: web::Data<dyn Directory>,
    id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let article = directory.article(&id).await?;

    // An article still renders when its neighbours cannot be fetched
    let related = match directory.related_articles(&article).await {
        Ok(related) => related,
        Err(e) => {
            log::warn!("Related articles for {} unavailable: {e}", article.id);
            Vec::new()
        }
    };

    Ok(HttpResponse::Ok().json(ArticleDetail {
        data: article,
        related,
    }))
}

pub async fn article_facets(
    directory: web::Data<dyn Directory>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let facets = directory.article_facets().await?;
    Ok(HttpResponse::Ok().json(DataResponse::new(facets)))
}
