use actix_web::http::StatusCode;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::CatalogRepository;
use crate::routes::{base_context, render_error, render_template};
use crate::services::products::show_products as show_products_service;

#[get("/")]
pub async fn index(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<CatalogRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_products_service(repo.get_ref()).await {
        Ok(page) => {
            let mut context = base_context(&flash_messages, "index");
            context.insert("products", &page.products);
            context.insert("total", &page.total);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => render_error(
            &tera,
            &flash_messages,
            &format!("Failed to load products: {err}"),
            StatusCode::BAD_GATEWAY,
        ),
    }
}
