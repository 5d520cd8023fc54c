//! Helpers for integration tests.

use std::net::TcpListener;
use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use storefront::models::product::ProductPatch;

/// Products served by the mock catalog.
pub const PRODUCT_IDS: [i32; 2] = [1, 7];

/// Requests observed by the mock catalog.
#[derive(Default)]
pub struct CatalogState {
    patches: Mutex<Vec<(i32, ProductPatch)>>,
    reject_updates: Mutex<Option<String>>,
}

/// Catalog API served from a local port.
pub struct MockCatalog {
    pub base_url: String,
    state: web::Data<CatalogState>,
}

impl MockCatalog {
    pub fn start() -> Self {
        let state = web::Data::new(CatalogState::default());
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock catalog");
        let port = listener.local_addr().expect("Missing local address").port();

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/products", web::get().to(list_products))
                .route("/products/categories", web::get().to(list_categories))
                .route("/products/{id}", web::get().to(get_product))
                .route("/products/{id}", web::patch().to(patch_product))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)
        .expect("Failed to start mock catalog")
        .run();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            state,
        }
    }

    /// Every PATCH body received so far.
    pub fn patches(&self) -> Vec<(i32, ProductPatch)> {
        self.state.patches.lock().unwrap().clone()
    }

    /// Answer subsequent updates with `400` and `message`.
    pub fn reject_updates(&self, message: &str) {
        *self.state.reject_updates.lock().unwrap() = Some(message.to_string());
    }
}

pub fn product_json(id: i32) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "description": "An everyday product.",
        "price": 9.99,
        "discountPercentage": 7.17,
        "brand": "Essence",
        "category": "beauty",
        "stock": 5,
        "thumbnail": format!("https://cdn.example.com/{id}/thumbnail.png"),
        "reviews": [{
            "rating": 4,
            "comment": "Very satisfied!",
            "date": "2024-05-23T08:56:21.618Z",
            "reviewerName": "Eleanor Collins",
            "reviewerEmail": "eleanor.collins@x.dummyjson.com"
        }]
    })
}

fn not_found(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": format!("Product with id '{id}' not found") }))
}

async fn list_products() -> HttpResponse {
    let products = PRODUCT_IDS.iter().map(|id| product_json(*id)).collect::<Vec<_>>();
    HttpResponse::Ok().json(json!({
        "products": products,
        "total": PRODUCT_IDS.len(),
        "skip": 0,
        "limit": PRODUCT_IDS.len()
    }))
}

async fn list_categories() -> HttpResponse {
    HttpResponse::Ok().json(json!([
        { "slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty" },
        { "slug": "groceries", "name": "Groceries", "url": "https://dummyjson.com/products/category/groceries" }
    ]))
}

async fn get_product(id: web::Path<i32>) -> HttpResponse {
    let id = id.into_inner();
    if PRODUCT_IDS.contains(&id) {
        HttpResponse::Ok().json(product_json(id))
    } else {
        not_found(id)
    }
}

async fn patch_product(
    id: web::Path<i32>,
    patch: web::Json<ProductPatch>,
    state: web::Data<CatalogState>,
) -> HttpResponse {
    let id = id.into_inner();
    if !PRODUCT_IDS.contains(&id) {
        return not_found(id);
    }
    if let Some(message) = state.reject_updates.lock().unwrap().clone() {
        return HttpResponse::BadRequest().json(json!({ "message": message }));
    }

    let patch = patch.into_inner();
    let mut product = product_json(id);
    if let Some(title) = &patch.title {
        product["title"] = json!(title);
    }
    if let Some(reviews) = &patch.reviews {
        product["reviews"] = json!(reviews);
    }
    state.patches.lock().unwrap().push((id, patch));
    HttpResponse::Ok().json(product)
}
