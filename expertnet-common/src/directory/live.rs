use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cms::{CmsClient, CmsResponse, Envelope};
use crate::directory::knowledge::{related_params, FACET_SCAN_SIZE, RELATED_ARTICLE_COUNT};
use crate::directory::{ArticleQuery, Directory, DirectoryError, FeedQuery};
use crate::models::article::{ArticleFacets, KnowledgeArticle, RawArticle};
use crate::models::consultant::{Consultant, RawConsultant};
use crate::models::page::{Page, PageInfo};
use crate::models::post::{FeedPost, RawPost};
use crate::models::timeline::{timeline_properties, Property, RawTimelineItem, TimelinePost};

/// Reads consultants and their timelines from the CMS using a server-side API token.
#[derive(Clone)]
pub struct LiveDirectory {
    cms: CmsClient,
    api_token: Option<String>,
}

#[derive(Deserialize)]
struct TimelineListing {
    #[serde(default)]
    data: Vec<RawTimelineItem>,
}

fn check(resp: &CmsResponse, what: &str) -> Result<(), DirectoryError> {
    match resp.status {
        s if s.is_success() => Ok(()),
        StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(String::from(what))),
        status => Err(DirectoryError::Backend {
            status: status.as_u16(),
            message: resp.error_message().unwrap_or_else(|| {
                String::from(status.canonical_reason().unwrap_or("Unknown error"))
            }),
        }),
    }
}

pub fn parse_consultants(
    resp: &CmsResponse,
    base_url: &str,
) -> Result<Vec<Consultant>, DirectoryError> {
    check(resp, "Consultants")?;

    Ok(resp
        .parse::<Envelope<Vec<RawConsultant>>>()?
        .data
        .into_iter()
        .map(|raw| raw.into_consultant(base_url))
        .collect())
}

pub fn parse_timeline(resp: &CmsResponse) -> Result<Vec<TimelinePost>, DirectoryError> {
    check(resp, "Timeline")?;

    // A missing `data` key is an empty timeline, but the body itself must be an object
    let body = resp.parse::<Value>()?;
    if !body.is_object() {
        return Err(DirectoryError::Decode(String::from(
            "Expected a timeline listing object",
        )));
    }

    Ok(serde_json::from_value::<TimelineListing>(body)?
        .data
        .into_iter()
        .map(RawTimelineItem::into_post)
        .collect())
}

/// Reads one page of a CMS listing, converting each entry with `convert`.
fn parse_page<R, T>(
    resp: &CmsResponse,
    what: &str,
    page: u32,
    page_size: u32,
    convert: impl Fn(R) -> T,
) -> Result<Page<T>, DirectoryError>
where
    R: DeserializeOwned,
{
    check(resp, what)?;

    let envelope = resp.parse::<Envelope<Vec<R>>>()?;
    let meta = envelope.meta.as_ref().and_then(|m| m.pagination.as_ref());
    let pagination = PageInfo::from_cms(meta, page, page_size, envelope.data.len());

    Ok(Page {
        data: envelope.data.into_iter().map(convert).collect(),
        pagination,
    })
}

pub fn parse_posts(resp: &CmsResponse, query: &FeedQuery) -> Result<Page<FeedPost>, DirectoryError> {
    parse_page(resp, "Posts", query.page, query.page_size, RawPost::into_post)
}

pub fn parse_articles(
    resp: &CmsResponse,
    page: u32,
    page_size: u32,
) -> Result<Page<KnowledgeArticle>, DirectoryError> {
    parse_page(resp, "Articles", page, page_size, RawArticle::into_article)
}

pub fn parse_article(resp: &CmsResponse, id: &str) -> Result<KnowledgeArticle, DirectoryError> {
    check(resp, &format!("Article {id}"))?;

    match resp.parse::<Envelope<Option<RawArticle>>>()?.data {
        Some(raw) => Ok(raw.into_article()),
        None => Err(DirectoryError::NotFound(format!("Article {id}"))),
    }
}

impl LiveDirectory {
    pub fn new(cms: CmsClient, api_token: Option<String>) -> Self {
        Self { cms, api_token }
    }

    async fn get<Q>(&self, path: &str, query: &Q) -> Result<CmsResponse, DirectoryError>
    where
        Q: Serialize + ?Sized,
    {
        let builder = self
            .cms
            .request(Method::GET, path, self.api_token.as_deref())
            .query(query);

        let resp = CmsResponse::send(builder).await?;

        if !resp.is_success() {
            log::warn!("GET {} returned {}", path, resp.status);
        }

        Ok(resp)
    }
}

#[async_trait]
impl Directory for LiveDirectory {
    async fn consultants(&self, limit: Option<u32>) -> Result<Vec<Consultant>, DirectoryError> {
        let mut query = vec![("populate", String::from("*"))];
        if let Some(limit) = limit {
            query.push(("pagination[limit]", limit.to_string()));
        }

        let resp = self.get("/api/consultants", &query).await?;
        parse_consultants(&resp, self.cms.base_url())
    }

    async fn consultant(&self, document_id: &str) -> Result<Consultant, DirectoryError> {
        let resp = self
            .get(
                &format!("/api/consultants/{document_id}"),
                &[("populate", String::from("*"))],
            )
            .await?;

        check(&resp, &format!("Consultant {document_id}"))?;

        let raw = resp.parse::<Envelope<RawConsultant>>()?.data;
        Ok(raw.into_consultant(self.cms.base_url()))
    }

    async fn consultant_timeline(
        &self,
        document_id: &str,
    ) -> Result<Vec<TimelinePost>, DirectoryError> {
        let resp = self
            .get(
                "/api/timeline-items",
                &[
                    ("populate", String::from("*")),
                    ("filters[author][documentId][$eq]", String::from(document_id)),
                ],
            )
            .await?;

        parse_timeline(&resp)
    }

    async fn consultant_properties(
        &self,
        document_id: &str,
    ) -> Result<Vec<Property>, DirectoryError> {
        Ok(timeline_properties(self.consultant_timeline(document_id).await?))
    }

    async fn posts(&self, query: &FeedQuery) -> Result<Page<FeedPost>, DirectoryError> {
        let resp = self.get("/api/posts", &query.to_params(Utc::now())).await?;
        parse_posts(&resp, query)
    }

    async fn articles(&self, query: &ArticleQuery) -> Result<Page<KnowledgeArticle>, DirectoryError> {
        let resp = self.get("/api/knowledge-articles", &query.to_params()).await?;
        parse_articles(&resp, query.page, query.page_size)
    }

    async fn article(&self, id: &str) -> Result<KnowledgeArticle, DirectoryError> {
        let resp = self
            .get(
                &format!("/api/knowledge-articles/{id}"),
                &[("populate", String::from("*"))],
            )
            .await?;

        parse_article(&resp, id)
    }

    async fn related_articles(
        &self,
        article: &KnowledgeArticle,
    ) -> Result<Vec<KnowledgeArticle>, DirectoryError> {
        let resp = self
            .get("/api/knowledge-articles", &related_params(article))
            .await?;

        let mut related = parse_articles(&resp, 1, RELATED_ARTICLE_COUNT as u32)?.data;
        related.retain(|a| a.id != article.id);
        related.truncate(RELATED_ARTICLE_COUNT);

        Ok(related)
    }

    async fn article_facets(&self) -> Result<ArticleFacets, DirectoryError> {
        let query = ArticleQuery {
            page_size: FACET_SCAN_SIZE,
            ..Default::default()
        };

        Ok(ArticleFacets::collect(&self.articles(&query).await?.data))
    }
}
