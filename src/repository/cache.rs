//! Query cache in front of a catalog client.
//!
//! Resolved reads are kept until invalidated. Concurrent identical reads wait
//! on the same in-flight request instead of issuing their own. Failed reads
//! are forgotten so the next caller asks the catalog again.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductPage, ProductUpdate};
use crate::domain::types::ProductId;
use crate::repository::{CatalogReader, CatalogWriter, RepositoryResult};

/// Identifies one cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Categories,
}

/// Loading flag of a cached read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Never requested, invalidated, or last attempt failed.
    Idle,
    /// A request is in flight.
    Loading,
    /// A resolved value is cached.
    Ready,
}

struct QueryCache<K, V> {
    entries: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<K, Arc<OnceCell<V>>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn get_or_load<F, Fut>(&self, key: K, load: F) -> RepositoryResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RepositoryResult<V>>,
    {
        let cell = self.entries().entry(key).or_default().clone();

        match cell.get_or_try_init(load).await {
            Ok(value) => Ok(value.clone()),
            Err(e) => {
                let mut entries = self.entries();
                if entries
                    .get(&key)
                    .is_some_and(|current| Arc::ptr_eq(current, &cell) && !current.initialized())
                {
                    entries.remove(&key);
                }
                Err(e)
            }
        }
    }

    fn status(&self, key: &K) -> QueryStatus {
        match self.entries().get(key) {
            None => QueryStatus::Idle,
            Some(cell) if cell.initialized() => QueryStatus::Ready,
            Some(_) => QueryStatus::Loading,
        }
    }

    fn invalidate(&self, key: &K) {
        self.entries().remove(key);
    }
}

/// Caching decorator over any catalog client.
pub struct CachedRepository<R> {
    inner: R,
    products: QueryCache<(), ProductPage>,
    product: QueryCache<ProductId, Product>,
    categories: QueryCache<(), Vec<Category>>,
}

impl<R> CachedRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            products: QueryCache::default(),
            product: QueryCache::default(),
            categories: QueryCache::default(),
        }
    }

    /// Borrow the wrapped client.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn status(&self, key: CacheKey) -> QueryStatus {
        match key {
            CacheKey::Products => self.products.status(&()),
            CacheKey::Product(id) => self.product.status(&id),
            CacheKey::Categories => self.categories.status(&()),
        }
    }

    /// Drop the cached value so the next read refetches it.
    pub fn invalidate(&self, key: CacheKey) {
        log::debug!("Invalidating cached {key:?}");
        match key {
            CacheKey::Products => self.products.invalidate(&()),
            CacheKey::Product(id) => self.product.invalidate(&id),
            CacheKey::Categories => self.categories.invalidate(&()),
        }
    }
}

impl<R: CatalogReader> CatalogReader for CachedRepository<R> {
    async fn list_products(&self) -> RepositoryResult<ProductPage> {
        self.products
            .get_or_load((), || self.inner.list_products())
            .await
    }

    async fn get_product(&self, id: ProductId) -> RepositoryResult<Product> {
        self.product
            .get_or_load(id, || self.inner.get_product(id))
            .await
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        self.categories
            .get_or_load((), || self.inner.list_categories())
            .await
    }
}

impl<R: CatalogWriter> CatalogWriter for CachedRepository<R> {
    async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> RepositoryResult<Product> {
        let product = self.inner.update_product(id, update).await?;
        self.invalidate(CacheKey::Product(id));
        self.invalidate(CacheKey::Products);
        Ok(product)
    }
}
