use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::product::Product;
use crate::forms::products::{EditAction, EditProductForm};
use crate::repository::CatalogRepository;
use crate::routes::{base_context, redirect, render_error, render_template};
use crate::services::ServiceError;
use crate::services::editor::ProductEditor;
use crate::services::inflight::InFlightUpdates;
use crate::services::products::{
    apply_edit as apply_edit_service, open_editor as open_editor_service,
    show_product as show_product_service,
};

#[derive(Deserialize)]
struct ProductQueryParams {
    #[serde(default)]
    edit: bool,
}

fn service_error_response(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    err: ServiceError,
) -> HttpResponse {
    match err {
        ServiceError::NotFound => render_error(
            tera,
            flash_messages,
            "Product not found.",
            StatusCode::NOT_FOUND,
        ),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
        err => render_error(
            tera,
            flash_messages,
            &format!("Failed to load product: {err}"),
            StatusCode::BAD_GATEWAY,
        ),
    }
}

/// Renders the detail page, with the edit form mounted when `editor` is set.
fn render_product_page(
    product: &Product,
    editor: Option<&ProductEditor>,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "product");
    context.insert("product", product);
    context.insert("editor", &editor);
    render_template(tera, "products/show.html", &context)
}

#[get("/product/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    params: web::Query<ProductQueryParams>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<CatalogRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product = match show_product_service(product_id.into_inner(), repo.get_ref()).await {
        Ok(product) => product,
        Err(err) => return service_error_response(&tera, &flash_messages, err),
    };

    let editor = if params.edit {
        Some(open_editor_service(product.id, repo.get_ref()).await)
    } else {
        None
    };

    render_product_page(&product, editor.as_ref(), &flash_messages, &tera)
}

#[post("/product/{product_id}/edit")]
pub async fn edit_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<CatalogRepository>,
    in_flight: web::Data<InFlightUpdates>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<EditProductForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let submitted = form.action() == EditAction::Submit;

    match apply_edit_service(product_id, form, repo.get_ref(), in_flight.get_ref()).await {
        Ok(editor) if editor.is_closed() => {
            if submitted {
                FlashMessage::success("Product updated successfully.").send();
            }
            redirect(&format!("/product/{product_id}"))
        }
        Ok(editor) => match show_product_service(product_id, repo.get_ref()).await {
            Ok(product) => render_product_page(&product, Some(&editor), &flash_messages, &tera),
            Err(err) => service_error_response(&tera, &flash_messages, err),
        },
        Err(err) => service_error_response(&tera, &flash_messages, err),
    }
}
