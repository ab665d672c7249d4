//! ContentSource trait and its boxed wrapper.

use std::future::Future;
use std::pin::Pin;

use ladle_types::error::ContentError;
use ladle_types::knowledge::{Author, Category, Comment, Recipe};

/// Read-only access to the content provider's collections.
///
/// Each fetch returns at most `limit` records, newest first.
/// Implementations live in ladle-infra (e.g., `CosmicClient`).
pub trait ContentSource: Send + Sync {
    fn recipes(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Recipe>, ContentError>> + Send;

    fn categories(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Category>, ContentError>> + Send;

    fn authors(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Author>, ContentError>> + Send;

    fn comments(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Comment>, ContentError>> + Send;
}

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ContentError>> + Send + 'a>>;

/// Object-safe version of [`ContentSource`] with boxed futures.
pub trait ContentSourceDyn: Send + Sync {
    fn recipes_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Recipe>>;
    fn categories_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Category>>;
    fn authors_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Author>>;
    fn comments_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Comment>>;
}

impl<T: ContentSource> ContentSourceDyn for T {
    fn recipes_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Recipe>> {
        Box::pin(self.recipes(limit))
    }

    fn categories_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Category>> {
        Box::pin(self.categories(limit))
    }

    fn authors_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Author>> {
        Box::pin(self.authors(limit))
    }

    fn comments_boxed(&self, limit: usize) -> BoxFuture<'_, Vec<Comment>> {
        Box::pin(self.comments(limit))
    }
}

/// Type-erased content source.
///
/// `BoxContentSource` itself implements [`ContentSource`], so generic code
/// (e.g., `StreamAdapter<P, C>`) accepts it like any concrete source.
pub struct BoxContentSource {
    inner: Box<dyn ContentSourceDyn + Send + Sync>,
}

impl BoxContentSource {
    pub fn new<T: ContentSource + 'static>(source: T) -> Self {
        Self {
            inner: Box::new(source),
        }
    }
}

impl ContentSource for BoxContentSource {
    async fn recipes(&self, limit: usize) -> Result<Vec<Recipe>, ContentError> {
        self.inner.recipes_boxed(limit).await
    }

    async fn categories(&self, limit: usize) -> Result<Vec<Category>, ContentError> {
        self.inner.categories_boxed(limit).await
    }

    async fn authors(&self, limit: usize) -> Result<Vec<Author>, ContentError> {
        self.inner.authors_boxed(limit).await
    }

    async fn comments(&self, limit: usize) -> Result<Vec<Comment>, ContentError> {
        self.inner.comments_boxed(limit).await
    }
}

/// A source with nothing in it. Used when no bucket is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContentSource;

impl ContentSource for EmptyContentSource {
    async fn recipes(&self, _limit: usize) -> Result<Vec<Recipe>, ContentError> {
        Ok(Vec::new())
    }

    async fn categories(&self, _limit: usize) -> Result<Vec<Category>, ContentError> {
        Ok(Vec::new())
    }

    async fn authors(&self, _limit: usize) -> Result<Vec<Author>, ContentError> {
        Ok(Vec::new())
    }

    async fn comments(&self, _limit: usize) -> Result<Vec<Comment>, ContentError> {
        Ok(Vec::new())
    }
}
