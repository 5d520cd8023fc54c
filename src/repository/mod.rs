use crate::domain::category::Category;
use crate::domain::product::{Product, ProductPage, ProductUpdate};
use crate::domain::types::ProductId;

pub mod cache;
pub mod errors;
pub mod http;

pub use cache::{CacheKey, CachedRepository, QueryStatus};
pub use errors::{RepositoryError, RepositoryResult};
pub use http::HttpCatalogRepository;

/// Catalog client used by the running application: HTTP behind the cache.
pub type CatalogRepository = CachedRepository<HttpCatalogRepository>;

/// Read-only operations of the remote catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogReader {
    /// Fetch every product as a single page.
    async fn list_products(&self) -> RepositoryResult<ProductPage>;
    /// Retrieve a product by its identifier.
    async fn get_product(&self, id: ProductId) -> RepositoryResult<Product>;
    /// List the category vocabulary.
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
}

/// Write operations of the remote catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogWriter {
    /// Apply a partial update and return the product as stored by the catalog.
    async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> RepositoryResult<Product>;
}
