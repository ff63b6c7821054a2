use async_trait::async_trait;
use chrono::Utc;

use crate::directory::knowledge::{is_related, RELATED_ARTICLE_COUNT};
use crate::directory::{ArticleQuery, Directory, DirectoryError, FeedQuery};
use crate::mock_data;
use crate::models::article::{ArticleFacets, KnowledgeArticle};
use crate::models::consultant::Consultant;
use crate::models::page::Page;
use crate::models::post::FeedPost;
use crate::models::timeline::{Property, TimelinePost};

pub struct MockDirectory {
    consultants: Vec<Consultant>,
    feed: Vec<FeedPost>,
    articles: Vec<KnowledgeArticle>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            consultants: mock_data::mock_consultants(),
            feed: mock_data::mock_feed(),
            articles: mock_data::mock_articles(),
        }
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn consultants(&self, limit: Option<u32>) -> Result<Vec<Consultant>, DirectoryError> {
        let limit = limit.map_or(self.consultants.len(), |l| l as usize);
        Ok(self.consultants.iter().take(limit).cloned().collect())
    }

    async fn consultant(&self, document_id: &str) -> Result<Consultant, DirectoryError> {
        self.consultants
            .iter()
            .find(|c| c.document_id == document_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("Consultant {document_id}")))
    }

    async fn consultant_timeline(
        &self,
        document_id: &str,
    ) -> Result<Vec<TimelinePost>, DirectoryError> {
        self.consultant(document_id).await?;
        Ok(mock_data::mock_timeline(document_id))
    }

    async fn consultant_properties(
        &self,
        document_id: &str,
    ) -> Result<Vec<Property>, DirectoryError> {
        self.consultant(document_id).await?;
        Ok(mock_data::mock_properties(document_id))
    }

    async fn posts(&self, query: &FeedQuery) -> Result<Page<FeedPost>, DirectoryError> {
        let now = Utc::now();
        let mut posts: Vec<FeedPost> = self
            .feed
            .iter()
            .filter(|p| query.matches(p, now))
            .cloned()
            .collect();
        query.sort(&mut posts);

        Ok(Page::slice(posts, query.page, query.page_size))
    }

    async fn articles(&self, query: &ArticleQuery) -> Result<Page<KnowledgeArticle>, DirectoryError> {
        let mut articles: Vec<KnowledgeArticle> = self
            .articles
            .iter()
            .filter(|a| query.matches(a))
            .cloned()
            .collect();
        query.sort(&mut articles);

        Ok(Page::slice(articles, query.page, query.page_size))
    }

    async fn article(&self, id: &str) -> Result<KnowledgeArticle, DirectoryError> {
        self.articles
            .iter()
            .find(|a| a.id == id || a.slug == id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("Article {id}")))
    }

    async fn related_articles(
        &self,
        article: &KnowledgeArticle,
    ) -> Result<Vec<KnowledgeArticle>, DirectoryError> {
        Ok(self
            .articles
            .iter()
            .filter(|a| is_related(article, a))
            .take(RELATED_ARTICLE_COUNT)
            .cloned()
            .collect())
    }

    async fn article_facets(&self) -> Result<ArticleFacets, DirectoryError> {
        Ok(ArticleFacets::collect(&self.articles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_directory() {
        let directory = MockDirectory::new();

        assert_eq!(directory.consultants(None).await.unwrap().len(), 5);
        assert_eq!(directory.consultants(Some(2)).await.unwrap().len(), 2);

        let emma = directory.consultant("consultant-emma-johnson").await.unwrap();
        assert_eq!(emma.full_name(), "Emma Johnson");

        assert_eq!(
            directory.consultant("missing").await,
            Err(DirectoryError::NotFound(String::from("Consultant missing")))
        );

        assert_eq!(
            directory
                .consultant_timeline("consultant-emma-johnson")
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(directory.consultant_timeline("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_feed() {
        let directory = MockDirectory::new();

        let first = directory
            .posts(&FeedQuery {
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.data.len(), 2);
        assert_eq!(first.data[0].post_id, "feed-1");
        assert_eq!(first.pagination.total, 5);
        assert_eq!(first.pagination.page_count, 3);
        assert!(first.pagination.has_more);

        let last = directory
            .posts(&FeedQuery {
                page: 3,
                page_size: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(last.data.len(), 1);
        assert!(!last.pagination.has_more);

        let featured = directory
            .posts(&FeedQuery {
                category: crate::directory::feed::FeedCategory::Featured,
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<_> = featured.data.iter().map(|p| p.post_id.as_str()).collect();
        assert_eq!(ids, vec!["feed-2", "feed-5"]);
    }

    #[tokio::test]
    async fn test_mock_knowledge() {
        let directory = MockDirectory::new();

        let page = directory
            .articles(&ArticleQuery {
                page_size: 4,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.data.len(), 4);
        assert_eq!(page.pagination.total, 6);
        assert!(page.pagination.has_more);

        let by_slug = directory
            .article("investment-opportunities-global-real-estate")
            .await
            .unwrap();
        assert_eq!(by_slug.id, "4");
        assert_eq!(directory.article("4").await.unwrap(), by_slug);
        assert_eq!(
            directory.article("99").await,
            Err(DirectoryError::NotFound(String::from("Article 99")))
        );

        let related = directory.related_articles(&by_slug).await.unwrap();
        assert!(related.len() <= RELATED_ARTICLE_COUNT);
        assert!(related.iter().all(|a| a.id != "4"));
        assert_eq!(related[0].id, "2");

        let facets = directory.article_facets().await.unwrap();
        assert_eq!(facets.categories.len(), 6);
        assert_eq!(facets.authors.len(), 6);
        assert!(facets.tags.contains(&String::from("PropTech")));
    }

    #[tokio::test]
    async fn test_mock_properties() {
        let directory = MockDirectory::new();

        let properties = directory
            .consultant_properties("consultant-john-smith")
            .await
            .unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].title, "Harbour Tower");

        assert_eq!(
            directory.consultant_properties("missing").await,
            Err(DirectoryError::NotFound(String::from("Consultant missing")))
        );
    }
}
