use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::category::Category;
use crate::domain::product::{Product, ProductPage, ProductUpdate};
use crate::domain::types::{ProductId, TypeConstraintError};
use crate::models::category::Category as ApiCategory;
use crate::models::product::{
    Product as ApiProduct, ProductPage as ApiProductPage, ProductPatch,
};
use crate::repository::{CatalogReader, CatalogWriter, RepositoryError, RepositoryResult};

/// Catalog client talking to the remote HTTP API.
///
/// `reqwest::Client` keeps an internal connection pool, so clones are cheap.
#[derive(Clone, Debug)]
pub struct HttpCatalogRepository {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

impl HttpCatalogRepository {
    /// Create a client for `base_url`. Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::Config(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> RepositoryResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RepositoryError::Config(format!("{path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        let url = self.url(path)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

fn normalize_base_url(base_url: &str) -> RepositoryResult<Url> {
    let trimmed = base_url.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|e| RepositoryError::Config(format!("{trimmed}: {e}")))
}

async fn ensure_success(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Maps a failed catalog response to the error taxonomy.
fn status_error(status: StatusCode, body: &str) -> RepositoryError {
    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    match status {
        StatusCode::NOT_FOUND => RepositoryError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            RepositoryError::Validation(message)
        }
        _ => RepositoryError::Network(format!("catalog responded {status}: {message}")),
    }
}

fn decode<T, U>(value: T) -> RepositoryResult<U>
where
    U: TryFrom<T, Error = TypeConstraintError>,
{
    Ok(U::try_from(value)?)
}

impl CatalogReader for HttpCatalogRepository {
    async fn list_products(&self) -> RepositoryResult<ProductPage> {
        let page: ApiProductPage = self.get("products?limit=0").await?;
        decode(page)
    }

    async fn get_product(&self, id: ProductId) -> RepositoryResult<Product> {
        let product: ApiProduct = self.get(&format!("products/{id}")).await?;
        decode(product)
    }

    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let categories: Vec<ApiCategory> = self.get("products/categories").await?;
        categories.into_iter().map(decode).collect()
    }
}

impl CatalogWriter for HttpCatalogRepository {
    async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> RepositoryResult<Product> {
        let url = self.url(&format!("products/{id}"))?;
        log::debug!("PATCH {url}");
        let response = self
            .client
            .patch(url)
            .json(&ProductPatch::from(update))
            .send()
            .await?;
        let product: ApiProduct = ensure_success(response).await?.json().await?;
        decode(product)
    }
}
