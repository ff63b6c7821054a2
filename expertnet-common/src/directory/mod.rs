use async_trait::async_trait;
use std::fmt;

use crate::models::article::{ArticleFacets, KnowledgeArticle};
use crate::models::consultant::Consultant;
use crate::models::page::Page;
use crate::models::post::FeedPost;
use crate::models::timeline::{Property, TimelinePost};

pub mod feed;
pub mod knowledge;
pub mod live;
pub mod mock;
pub mod search;

pub use feed::FeedQuery;
pub use knowledge::ArticleQuery;
pub use live::LiveDirectory;
pub use mock::MockDirectory;
pub use search::SearchFilters;

#[async_trait]
pub trait Directory: Send + Sync {
    async fn consultants(&self, limit: Option<u32>) -> Result<Vec<Consultant>, DirectoryError>;

    async fn consultant(&self, document_id: &str) -> Result<Consultant, DirectoryError>;

    async fn consultant_timeline(
        &self,
        document_id: &str,
    ) -> Result<Vec<TimelinePost>, DirectoryError>;

    /// Properties the consultant has posted about, without duplicates.
    async fn consultant_properties(
        &self,
        document_id: &str,
    ) -> Result<Vec<Property>, DirectoryError>;

    async fn posts(&self, query: &FeedQuery) -> Result<Page<FeedPost>, DirectoryError>;

    async fn articles(&self, query: &ArticleQuery) -> Result<Page<KnowledgeArticle>, DirectoryError>;

    async fn article(&self, id: &str) -> Result<KnowledgeArticle, DirectoryError>;

    async fn related_articles(
        &self,
        article: &KnowledgeArticle,
    ) -> Result<Vec<KnowledgeArticle>, DirectoryError>;

    async fn article_facets(&self) -> Result<ArticleFacets, DirectoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    NotFound(String),
    Backend { status: u16, message: String },
    Network(String),
    Decode(String),
}

impl std::error::Error for DirectoryError {}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::NotFound(what) => write!(f, "DirectoryError: Not found: {what}"),
            DirectoryError::Backend { status, message } => {
                write!(f, "DirectoryError: Backend returned {status}: {message}")
            }
            DirectoryError::Network(msg) => write!(f, "DirectoryError: Network failure: {msg}"),
            DirectoryError::Decode(msg) => write!(f, "DirectoryError: Malformed response: {msg}"),
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            DirectoryError::Decode(error.to_string())
        } else {
            DirectoryError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(error: serde_json::Error) -> Self {
        DirectoryError::Decode(error.to_string())
    }
}
